//! Camera snapshots, perspective projection and viewport mapping
use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::math::{ColorRGB, Matrix4, Vector2, Vector3};

/// Output surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width over height; the only aspect ratio used for projection
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Map NDC to pixels with the origin at the top-left and Y pointing down
    pub fn to_screen(&self, ndc: Vector2) -> Vector2 {
        Vector2::new(
            (ndc.x + 1.0) / 2.0 * self.width as f32,
            (1.0 - (ndc.y + 1.0) / 2.0) * self.height as f32,
        )
    }
}

/// A vertex projected to normalized device coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointNdc {
    pub position: Vector2,
    pub color: ColorRGB,
}

impl PointNdc {
    pub fn new(position: Vector2, color: ColorRGB) -> Self {
        Self { position, color }
    }

    /// Inside the `[-1, 1] × [-1, 1]` square; NaN is never inside
    pub fn in_screen(&self) -> bool {
        (-1.0..=1.0).contains(&self.position.x) && (-1.0..=1.0).contains(&self.position.y)
    }
}

/// Camera parameters frozen for one render call
///
/// Captured once per call so every vertex of the frame sees the same camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSnapshot {
    pub near_plane: f32,
    pub far_plane: f32,
    pub fov: f32,
    /// `1 / tan(fov / 2)`
    pub focal_length: f32,
    pub aspect_ratio: f32,
    pub view_matrix: Matrix4,
}

impl CameraSnapshot {
    pub fn capture(camera: &Camera, viewport: Viewport) -> Self {
        Self {
            near_plane: camera.near_plane,
            far_plane: camera.far_plane,
            fov: camera.fov,
            focal_length: 1.0 / (camera.fov.to_radians() * 0.5).tan(),
            aspect_ratio: viewport.aspect_ratio(),
            view_matrix: camera.view_matrix(),
        }
    }

    /// World space to camera space
    pub fn to_camera_space(&self, world: Vector3) -> Vector3 {
        self.view_matrix.transform_point(world)
    }

    /// Camera-space point lies between the planes: `-far <= z <= -near`
    pub fn in_frustum(&self, point: Vector3) -> bool {
        point.z <= -self.near_plane && point.z >= -self.far_plane
    }

    /// Perspective-project a camera-space point
    ///
    /// Divides by the view depth `-z`, positive in front of the camera. Points
    /// on the camera plane (`z = 0`) give non-finite coordinates.
    pub fn project(&self, point: Vector3, color: ColorRGB) -> PointNdc {
        let depth = -point.z;
        PointNdc::new(
            Vector2::new(
                point.x / depth * self.focal_length / self.aspect_ratio,
                point.y / depth * self.focal_length,
            ),
            color,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(width: u32, height: u32) -> CameraSnapshot {
        let camera = Camera::with_planes(Vector3::ZERO, 90.0, 0.1, 100.0).unwrap();
        CameraSnapshot::capture(&camera, Viewport::new(width, height).unwrap())
    }

    #[test]
    fn test_viewport_rejects_zero_size() {
        assert!(Viewport::new(0, 10).is_err());
        assert!(Viewport::new(10, 0).is_err());
        assert!((Viewport::new(800, 600).unwrap().aspect_ratio() - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_viewport_mapping_flips_y() {
        let v = Viewport::new(800, 600).unwrap();
        assert_eq!(v.to_screen(Vector2::new(-1.0, 1.0)), Vector2::new(0.0, 0.0));
        assert_eq!(v.to_screen(Vector2::new(1.0, -1.0)), Vector2::new(800.0, 600.0));
        assert_eq!(v.to_screen(Vector2::ZERO), Vector2::new(400.0, 300.0));
    }

    #[test]
    fn test_focal_length() {
        let s = snapshot(100, 100);
        assert!((s.focal_length - 1.0).abs() < 1e-6);
        assert!((s.aspect_ratio - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_frustum_depth_range() {
        let s = snapshot(100, 100);
        assert!(s.in_frustum(Vector3::new(0.0, 0.0, -50.05)));
        assert!(s.in_frustum(Vector3::new(0.0, 0.0, -0.1)));
        assert!(s.in_frustum(Vector3::new(0.0, 0.0, -100.0)));
        assert!(!s.in_frustum(Vector3::new(0.0, 0.0, 0.0)));
        assert!(!s.in_frustum(Vector3::new(0.0, 0.0, -0.05)));
        assert!(!s.in_frustum(Vector3::new(0.0, 0.0, -100.5)));
        assert!(!s.in_frustum(Vector3::new(0.0, 0.0, 5.0)));
        assert!(!s.in_frustum(Vector3::new(0.0, 0.0, f32::NAN)));
    }

    #[test]
    fn test_projection_keeps_up_and_right() {
        let s = snapshot(100, 100);
        let p = s.project(Vector3::new(1.0, 2.0, -4.0), ColorRGB::ZERO);
        assert!((p.position.x - 0.25).abs() < 1e-6);
        assert!((p.position.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_projection_uses_viewport_aspect() {
        let s = snapshot(200, 100);
        let p = s.project(Vector3::new(1.0, 1.0, -1.0), ColorRGB::ZERO);
        assert!((p.position.x - 0.5).abs() < 1e-6);
        assert!((p.position.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_projection_on_camera_plane_is_not_finite() {
        let s = snapshot(100, 100);
        let p = s.project(Vector3::new(1.0, 0.0, 0.0), ColorRGB::ZERO);
        assert!(!p.position.x.is_finite());
        assert!(!p.in_screen());
    }

    #[test]
    fn test_in_screen_box() {
        let inside = PointNdc::new(Vector2::new(1.0, -1.0), ColorRGB::ZERO);
        let outside = PointNdc::new(Vector2::new(1.01, 0.0), ColorRGB::ZERO);
        let nan = PointNdc::new(Vector2::new(f32::NAN, 0.0), ColorRGB::ZERO);
        assert!(inside.in_screen());
        assert!(!outside.in_screen());
        assert!(!nan.in_screen());
    }
}
