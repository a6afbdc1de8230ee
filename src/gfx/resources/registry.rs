use std::collections::BTreeMap;

use crate::gfx::scene::ObjectId;

/// GPU-side resources owned per scene object
///
/// Entries are released exactly once: either by [`release`](Self::release),
/// by being replaced, or when the registry is dropped.
pub struct ResourceRegistry<R> {
    entries: BTreeMap<ObjectId, R>,
}

impl<R> ResourceRegistry<R> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Stores resources for `id`, dropping any previous entry
    pub fn insert(&mut self, id: ObjectId, resources: R) {
        if self.entries.insert(id, resources).is_some() {
            log::debug!("Replaced GPU resources for object {}", id.raw());
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<&R> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut R> {
        self.entries.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Drops the resources for `id`; false if there were none
    pub fn release(&mut self, id: ObjectId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<R> Default for ResourceRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};

    struct Tracked(Rc<Cell<usize>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_release_drops_once() {
        let drops = Rc::new(Cell::new(0));
        let mut registry = ResourceRegistry::new();
        registry.insert(ObjectId(1), Tracked(drops.clone()));

        assert!(registry.release(ObjectId(1)));
        assert_eq!(drops.get(), 1);

        assert!(!registry.release(ObjectId(1)));
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_replace_and_drop_release_everything() {
        let drops = Rc::new(Cell::new(0));
        {
            let mut registry = ResourceRegistry::new();
            registry.insert(ObjectId(1), Tracked(drops.clone()));
            registry.insert(ObjectId(1), Tracked(drops.clone()));
            assert_eq!(drops.get(), 1);

            registry.insert(ObjectId(2), Tracked(drops.clone()));
            assert_eq!(registry.len(), 2);
        }
        assert_eq!(drops.get(), 3);
    }
}
