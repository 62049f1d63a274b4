//! rast3d core library: math, camera and the triangle pipeline
//!
//! Takes an indexed triangle mesh and a camera and produces screen-space
//! coloured triangles for a 2D rasterizer. Meshes go from object space
//! through world space, camera space, a depth-range test, NDC and a screen
//! test to viewport pixels.

pub mod camera;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod math;
pub mod projection;
pub mod renderer;
pub mod transform;

// Re-export commonly used types
pub use camera::{Camera, CameraBasis, Movement, Movements, ROTATION_STEP, TRANSLATION_STEP};
pub use error::{Error, Result};
pub use geometry::{Mesh, Vertex, DEFAULT_VERTEX_COLOR};
pub use loader::load_mesh;
pub use math::{ColorRGB, Matrix4, Quaternion, Vector2, Vector3};
pub use projection::{CameraSnapshot, PointNdc, Viewport};
pub use renderer::{
    RenderStats, Renderer, ScreenTriangle, ScreenVertex, TriangleOutcome, TriangleSink,
};
pub use transform::{Renderable, Transform};
