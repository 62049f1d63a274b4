//! Error types for mesh loading and pipeline setup

use std::path::PathBuf;

use thiserror::Error;

/// Result type for rast3d-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading meshes or configuring the pipeline
///
/// Degenerate math inside a render call is never reported here; it only
/// causes the affected triangle to be culled.
#[derive(Error, Debug)]
pub enum Error {
    /// Mesh file does not exist
    #[error("mesh file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// OBJ syntax error
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Malformed STL data
    #[error("malformed STL: {0}")]
    Stl(String),

    /// File extension has no loader
    #[error("unsupported mesh format: {0}")]
    UnsupportedFormat(String),

    /// Index list does not describe whole triangles
    #[error("index count {0} is not a multiple of 3")]
    IndexCount(usize),

    /// Triangle refers to a vertex that does not exist
    #[error("vertex index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    /// Camera parameters violate fov/plane constraints
    #[error("invalid camera: {0}")]
    InvalidCamera(String),

    /// Viewport has a zero dimension
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },
}
