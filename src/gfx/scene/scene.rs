use cgmath::Vector3;

use crate::error::{Result, ViewerError};

use super::object::{LightData, MeshData, ObjectId, ObjectKind, SceneObject, Transform};

/// Index of the light in the object list; it never moves
pub const LIGHT_INDEX: usize = 0;

/// Scene containing the light and every mesh object, in insertion order
///
/// The light always occupies slot 0 and cannot be removed. Mesh objects are
/// appended after it; the list is append-only.
pub struct Scene {
    objects: Vec<SceneObject>,
    selected: usize,
    next_id: u64,
}

impl Scene {
    /// Creates a scene holding only the default light ("Light", at (0, 2, 0), power 40)
    pub fn new() -> Self {
        Self::with_light("Light", Vector3::new(0.0, 2.0, 0.0), 40.0)
    }

    pub fn with_light(name: &str, position: Vector3<f32>, power: f32) -> Self {
        let light = SceneObject {
            id: ObjectId(0),
            name: name.to_string(),
            transform: Transform {
                translation: position,
                scale: Vector3::new(power, power, power),
                ..Default::default()
            },
            kind: ObjectKind::Light(LightData::default()),
        };

        Self {
            objects: vec![light],
            selected: LIGHT_INDEX,
            next_id: 1,
        }
    }

    /// Appends a mesh object and returns its id
    pub fn add_mesh(&mut self, name: impl Into<String>, mesh: MeshData) -> ObjectId {
        self.add_mesh_with_transform(name, mesh, Transform::default())
    }

    pub fn add_mesh_with_transform(
        &mut self,
        name: impl Into<String>,
        mesh: MeshData,
        transform: Transform,
    ) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push(SceneObject {
            id,
            name: name.into(),
            transform,
            kind: ObjectKind::Mesh(mesh),
        });
        id
    }

    pub fn light(&self) -> &SceneObject {
        &self.objects[LIGHT_INDEX]
    }

    pub fn light_mut(&mut self) -> &mut SceneObject {
        &mut self.objects[LIGHT_INDEX]
    }

    pub fn light_color(&self) -> [f32; 3] {
        self.light().as_light().map(|l| l.color).unwrap_or([1.0; 3])
    }

    pub fn set_light_color(&mut self, color: [f32; 3]) {
        if let Some(light) = self.light_mut().as_light_mut() {
            light.color = color;
        }
    }

    /// Iterates mesh objects in scene order
    pub fn meshes(&self) -> impl Iterator<Item = (&SceneObject, &MeshData)> {
        self.objects
            .iter()
            .filter_map(|object| object.as_mesh().map(|mesh| (object, mesh)))
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Gets immutable reference to an object by index
    pub fn get_object(&self, index: usize) -> Option<&SceneObject> {
        self.objects.get(index)
    }

    /// Gets mutable reference to an object by index
    pub fn get_object_mut(&mut self, index: usize) -> Option<&mut SceneObject> {
        self.objects.get_mut(index)
    }

    pub fn find(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn find_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|object| object.id == id)
    }

    /// Gets all object names for UI display, light first
    pub fn get_object_names(&self) -> Vec<String> {
        self.objects.iter().map(|obj| obj.name.clone()).collect()
    }

    /// Gets the total number of objects, including the light
    pub fn get_object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.objects.len() - 1
    }

    // Selection

    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.objects.len() {
            return Err(ViewerError::precondition(format!(
                "object index {} out of range ({} objects)",
                index,
                self.objects.len()
            )));
        }
        self.selected = index;
        Ok(())
    }

    pub fn select_last(&mut self) {
        self.selected = self.objects.len() - 1;
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> &SceneObject {
        &self.objects[self.selected]
    }

    pub fn selected_mut(&mut self) -> &mut SceneObject {
        &mut self.objects[self.selected]
    }

    pub fn is_mesh_selected(&self) -> bool {
        self.selected != LIGHT_INDEX
    }

    /// Selected mesh, or a precondition error when the light is selected
    pub fn selected_mesh_mut(&mut self) -> Result<(ObjectId, &mut MeshData)> {
        let object = &mut self.objects[self.selected];
        let id = object.id;
        match &mut object.kind {
            ObjectKind::Mesh(mesh) => Ok((id, mesh)),
            ObjectKind::Light(_) => Err(ViewerError::precondition(
                "textures and materials can only be applied to a mesh object",
            )),
        }
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let (total_vertices, total_triangles) = self
            .meshes()
            .fold((0, 0), |(v, t), (_, mesh)| {
                (v + mesh.vertex_count(), t + mesh.triangle_count())
            });

        SceneStatistics {
            object_count: self.objects.len(),
            total_triangles,
            total_vertices,
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, PartialEq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::make_cube_at_origin;

    #[test]
    fn test_light_is_first_and_selected() {
        let scene = Scene::new();
        assert_eq!(scene.get_object_count(), 1);
        assert!(scene.light().is_light());
        assert_eq!(scene.light().light_power(), 40.0);
        assert_eq!(scene.light().light_position(), Vector3::new(0.0, 2.0, 0.0));
        assert!(!scene.is_mesh_selected());
    }

    #[test]
    fn test_ids_are_stable_and_unique() {
        let mut scene = Scene::new();
        let a = scene.add_mesh("Cube A", make_cube_at_origin());
        let b = scene.add_mesh("Cube B", make_cube_at_origin());
        assert_ne!(a, b);
        assert_ne!(a, scene.light().id());
        assert_eq!(scene.find(b).map(|o| o.name.as_str()), Some("Cube B"));
        assert_eq!(scene.get_object_names(), vec!["Light", "Cube A", "Cube B"]);
    }

    #[test]
    fn test_selection_bounds_and_light_rejection() {
        let mut scene = Scene::new();
        assert!(scene.selected_mesh_mut().is_err());
        assert!(scene.select(1).is_err());

        scene.add_mesh("Cube", make_cube_at_origin());
        scene.select(1).unwrap();
        assert!(scene.is_mesh_selected());
        assert!(scene.selected_mesh_mut().is_ok());
    }

    #[test]
    fn test_statistics_count_only_meshes() {
        let mut scene = Scene::new();
        scene.add_mesh("Cube", make_cube_at_origin());
        assert_eq!(
            scene.get_statistics(),
            SceneStatistics {
                object_count: 2,
                total_triangles: 12,
                total_vertices: 14,
            }
        );
    }
}
