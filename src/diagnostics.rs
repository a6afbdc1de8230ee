//! Diagnostic text collection
//!
//! Shader compiler output, OBJ/image load failures and graphics-API errors are
//! logged through the `log` facade and also buffered here so the host can show
//! them to the user.

use std::collections::VecDeque;

/// Where a diagnostic line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Shader,
    Load,
    Graphics,
    Input,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Bounded buffer of diagnostic lines, oldest dropped first
#[derive(Debug)]
pub struct Diagnostics {
    lines: VecDeque<Diagnostic>,
    capacity: usize,
}

impl Diagnostics {
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Records a diagnostic and forwards it to the logger
    pub fn report(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        match kind {
            DiagnosticKind::Load => log::error!("{}", message),
            _ => log::warn!("{}", message),
        }

        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(Diagnostic { kind, message });
    }

    /// Removes and returns every buffered line
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        self.lines.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.lines.iter().filter(|d| d.kind == kind).count()
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oldest_lines_dropped_at_capacity() {
        let mut diagnostics = Diagnostics::with_capacity(2);
        diagnostics.report(DiagnosticKind::Shader, "first");
        diagnostics.report(DiagnosticKind::Load, "second");
        diagnostics.report(DiagnosticKind::Graphics, "third");

        let lines = diagnostics.drain();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].message, "second");
        assert_eq!(lines[1].kind, DiagnosticKind::Graphics);
        assert!(diagnostics.is_empty());
    }
}
