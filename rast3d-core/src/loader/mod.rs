//! Mesh loading from OBJ and STL files

pub mod obj;
pub mod stl;

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::geometry::Mesh;

/// Load and validate a mesh, choosing the parser by file extension
pub fn load_mesh(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let mesh = match extension.as_str() {
        "obj" => obj::parse_obj(&fs::read_to_string(path)?)?,
        "stl" => stl::parse_stl(&fs::read(path)?)?,
        other => return Err(Error::UnsupportedFormat(other.to_string())),
    };
    mesh.validate()?;

    info!(
        path = %path.display(),
        vertices = mesh.vertices.len(),
        triangles = mesh.triangle_count(),
        "loaded mesh"
    );
    Ok(mesh)
}
