//! Error types for the Tartan viewer
//!
//! Parse and decode failures abort the operation and leave the scene as it
//! was. Precondition violations are rejected before any GPU call is made.
//! Graphics-API validation errors are not represented here: they are
//! non-fatal and flow through [`Diagnostics`](crate::diagnostics::Diagnostics).

use std::path::PathBuf;

/// Errors produced while reading a Wavefront OBJ file
#[derive(Debug, thiserror::Error)]
pub enum ObjError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: malformed number '{token}' in '{record}' record")]
    MalformedNumber {
        line: usize,
        record: &'static str,
        token: String,
    },

    #[error("line {line}: '{record}' record expects {expected} components, found {found}")]
    ComponentCount {
        line: usize,
        record: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: face corner '{corner}' is not a v/vt/vn triplet")]
    MalformedFaceCorner { line: usize, corner: String },

    #[error("line {line}: {pool} index {index} is out of range (pool holds {len})")]
    IndexOutOfRange {
        line: usize,
        pool: &'static str,
        index: u32,
        len: usize,
    },

    #[error("file contains no faces")]
    NoFaces,
}

/// Errors surfaced by the viewer and its GPU resource manager
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error(transparent)]
    Obj(#[from] ObjError),

    #[error("failed to load image '{path}': {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("precondition violated: {0}")]
    Precondition(String),

    #[error("required graphics capability unavailable: {0}")]
    UnsupportedContext(String),

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

impl ViewerError {
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }
}

pub type Result<T, E = ViewerError> = std::result::Result<T, E>;
