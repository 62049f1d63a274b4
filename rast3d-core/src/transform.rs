//! Object placement: translation, rotation and scale
use crate::geometry::Mesh;
use crate::math::{Matrix4, Quaternion, Vector3};

/// Placement of one object instance in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3,
    pub scale: Vector3,
    pub rotation: Quaternion,
}

impl Transform {
    pub fn new(position: Vector3, scale: Vector3, rotation: Quaternion) -> Self {
        Self {
            position,
            scale,
            rotation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Vector3::ZERO, Vector3::splat(1.0), Quaternion::IDENTITY)
    }

    /// Identity with the position in the last column
    pub fn translation_matrix(&self) -> Matrix4 {
        Matrix4::translation(self.position)
    }

    /// Diagonal of the scale components
    pub fn scale_matrix(&self) -> Matrix4 {
        Matrix4::scaling(self.scale)
    }

    /// Rotation matrix of the (unit) rotation quaternion
    pub fn rotation_matrix(&self) -> Matrix4 {
        let Quaternion { w, vector } = self.rotation;
        let Vector3 { x, y, z } = vector;

        Matrix4::from_rows([
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - w * z),
                2.0 * (x * z + w * y),
                0.0,
            ],
            [
                2.0 * (x * y + w * z),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - w * x),
                0.0,
            ],
            [
                2.0 * (x * z - w * y),
                2.0 * (y * z + w * x),
                1.0 - 2.0 * (x * x + y * y),
                0.0,
            ],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Local-to-world matrix: `translation · rotation · scale`
    ///
    /// A point is scaled first, then rotated, then translated.
    pub fn transform_matrix(&self) -> Matrix4 {
        self.translation_matrix()
            .compose(&self.rotation_matrix())
            .compose(&self.scale_matrix())
    }

    /// Apply `q` in the object's local frame and re-normalize
    pub fn rotate_local(&mut self, q: Quaternion) {
        self.rotation = (self.rotation * q).normalize();
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// A mesh placed in the world
///
/// The mesh is borrowed: it must outlive every renderable that refers to it.
#[derive(Debug, Clone, Copy)]
pub struct Renderable<'a> {
    pub mesh: &'a Mesh,
    pub transform: Transform,
}

impl<'a> Renderable<'a> {
    pub fn new(mesh: &'a Mesh, transform: Transform) -> Self {
        Self { mesh, transform }
    }
}
