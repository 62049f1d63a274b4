//! Geometry primitives for 3D rendering
use crate::error::{Error, Result};
use crate::math::{ColorRGB, Vector3};

/// Colour given to vertices whose source format carries none
pub const DEFAULT_VERTEX_COLOR: ColorRGB = ColorRGB::new(1.0, 0.0, 1.0);

/// A mesh vertex with position and colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vector3,
    pub color: ColorRGB,
}

impl Vertex {
    pub fn new(position: Vector3, color: ColorRGB) -> Self {
        Self { position, color }
    }

    /// Vertex at `position` with [`DEFAULT_VERTEX_COLOR`]
    pub fn uncolored(position: Vector3) -> Self {
        Self::new(position, DEFAULT_VERTEX_COLOR)
    }
}

/// An indexed triangle mesh
///
/// Every three consecutive entries of `indices` form one triangle. A valid
/// mesh has `indices.len() % 3 == 0` and every index below `vertices.len()`;
/// see [`Mesh::validate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(triangles * 3),
        }
    }

    /// Append a vertex and return its index
    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        self.vertices.push(vertex);
        (self.vertices.len() - 1) as u32
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Number of whole triangles in the index list
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The three vertices of triangle `i`, or `None` if any index is out of range
    pub fn triangle(&self, i: usize) -> Option<[Vertex; 3]> {
        let base = i.checked_mul(3)?;
        let idx = self.indices.get(base..base + 3)?;
        Some([
            *self.vertices.get(idx[0] as usize)?,
            *self.vertices.get(idx[1] as usize)?,
            *self.vertices.get(idx[2] as usize)?,
        ])
    }

    /// Check the index invariants
    pub fn validate(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(Error::IndexCount(self.indices.len()));
        }
        let vertex_count = self.vertices.len();
        match self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            Some(&index) => Err(Error::IndexOutOfRange {
                index,
                vertex_count,
            }),
            None => Ok(()),
        }
    }

    /// Create a cube centred on the origin with a distinct colour per corner
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let corners = [
            ([-h, -h, h], [1.0, 0.0, 0.0]),
            ([h, -h, h], [0.0, 1.0, 0.0]),
            ([h, h, h], [0.0, 0.0, 1.0]),
            ([-h, h, h], [1.0, 1.0, 0.0]),
            ([-h, -h, -h], [1.0, 0.0, 1.0]),
            ([h, -h, -h], [0.0, 1.0, 1.0]),
            ([h, h, -h], [1.0, 1.0, 1.0]),
            ([-h, h, -h], [1.0, 0.5, 0.0]),
        ];

        let mut mesh = Self::with_capacity(corners.len(), 12);
        for (position, color) in corners {
            mesh.add_vertex(Vertex::new(position.into(), color.into()));
        }

        // Front face
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 2, 3);
        // Back face
        mesh.add_triangle(5, 4, 7);
        mesh.add_triangle(5, 7, 6);
        // Top face
        mesh.add_triangle(3, 2, 6);
        mesh.add_triangle(3, 6, 7);
        // Bottom face
        mesh.add_triangle(4, 5, 1);
        mesh.add_triangle(4, 1, 0);
        // Right face
        mesh.add_triangle(1, 5, 6);
        mesh.add_triangle(1, 6, 2);
        // Left face
        mesh.add_triangle(4, 0, 3);
        mesh.add_triangle(4, 3, 7);

        mesh
    }
}
