//! Linear algebra kernel: vectors, quaternions and 4x4 matrices

pub mod matrix;
pub mod quaternion;
pub mod vector;

pub use matrix::Matrix4;
pub use quaternion::{rotate_axis_angle, Quaternion};
pub use vector::{ColorRGB, Vector2, Vector3};
