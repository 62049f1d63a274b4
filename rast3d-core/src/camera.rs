//! Free-flying camera driven by movement commands
use crate::error::{Error, Result};
use crate::geometry::Vertex;
use crate::math::{Matrix4, Quaternion, Vector3};
use crate::projection::{CameraSnapshot, PointNdc, Viewport};

/// Distance moved per tick by a translation command
pub const TRANSLATION_STEP: f32 = 0.01;

/// Degrees turned per tick by a rotation command
pub const ROTATION_STEP: f32 = 0.2;

/// One movement intent for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    MoveUp,
    MoveDown,
    YawLeft,
    YawRight,
    PitchUp,
    PitchDown,
}

impl Movement {
    /// All intents in the order [`Camera::apply`] processes them
    pub const ALL: [Movement; 10] = [
        Movement::MoveForward,
        Movement::MoveBackward,
        Movement::StrafeLeft,
        Movement::StrafeRight,
        Movement::MoveUp,
        Movement::MoveDown,
        Movement::YawLeft,
        Movement::YawRight,
        Movement::PitchUp,
        Movement::PitchDown,
    ];

    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Set of intents active during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Movements(u16);

impl Movements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, movement: Movement) {
        self.0 |= movement.bit();
    }

    pub fn contains(&self, movement: Movement) -> bool {
        self.0 & movement.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Active intents in processing order
    pub fn iter(&self) -> impl Iterator<Item = Movement> + '_ {
        Movement::ALL.into_iter().filter(|m| self.contains(*m))
    }
}

impl FromIterator<Movement> for Movements {
    fn from_iter<I: IntoIterator<Item = Movement>>(iter: I) -> Self {
        let mut set = Movements::new();
        for movement in iter {
            set.insert(movement);
        }
        set
    }
}

/// World-space axes of the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub forward: Vector3,
    pub up: Vector3,
    pub right: Vector3,
}

/// Camera configuration for 3D rendering
///
/// With the identity orientation the camera looks down world -Z with +Y up
/// and +X to the right. `fov` is the vertical field of view in degrees. The
/// aspect ratio comes from the [`Viewport`] at projection time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vector3,
    pub orientation: Quaternion,
    pub fov: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

impl Camera {
    pub const DEFAULT_NEAR: f32 = 0.1;
    pub const DEFAULT_FAR: f32 = 1000.0;

    pub fn new(position: Vector3, fov: f32) -> Result<Self> {
        Self::with_planes(position, fov, Self::DEFAULT_NEAR, Self::DEFAULT_FAR)
    }

    pub fn with_planes(position: Vector3, fov: f32, near_plane: f32, far_plane: f32) -> Result<Self> {
        let camera = Self {
            position,
            orientation: Quaternion::IDENTITY,
            fov,
            near_plane,
            far_plane,
        };
        camera.validate()?;
        Ok(camera)
    }

    /// Check `0 < fov < 180` and `0 < near < far`
    pub fn validate(&self) -> Result<()> {
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(Error::InvalidCamera(format!(
                "fov must be in (0, 180) degrees, got {}",
                self.fov
            )));
        }
        if !(self.near_plane > 0.0 && self.near_plane < self.far_plane) {
            return Err(Error::InvalidCamera(format!(
                "planes must satisfy 0 < near < far, got near {} far {}",
                self.near_plane, self.far_plane
            )));
        }
        Ok(())
    }

    /// Forward, up and right vectors for the current orientation
    pub fn basis(&self) -> CameraBasis {
        let forward = self.orientation.rotate(-Vector3::Z);
        let up = self.orientation.rotate(Vector3::Y);
        CameraBasis {
            forward,
            up,
            right: forward.cross(up),
        }
    }

    /// World-to-camera matrix
    ///
    /// The rotation rows are `right, up, -forward`, so the look direction maps
    /// to camera -Z. It is applied after translating by `-position`.
    pub fn view_matrix(&self) -> Matrix4 {
        let CameraBasis { forward, up, right } = self.basis();
        let rotation = Matrix4::from_rows([
            [right.x, right.y, right.z, 0.0],
            [up.x, up.y, up.z, 0.0],
            [-forward.x, -forward.y, -forward.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        rotation.compose(&Matrix4::translation(-self.position))
    }

    /// Freeze the parameters needed to project one frame into `viewport`
    pub fn snapshot(&self, viewport: Viewport) -> CameraSnapshot {
        CameraSnapshot::capture(self, viewport)
    }

    /// Project a world-space vertex to normalized device coordinates
    ///
    /// The vertex must lie in front of the camera; at camera-space z = 0 the
    /// result is not finite.
    pub fn ndc(&self, vertex: &Vertex, viewport: Viewport) -> PointNdc {
        let snapshot = self.snapshot(viewport);
        snapshot.project(snapshot.to_camera_space(vertex.position), vertex.color)
    }

    /// Rotate about the camera's local X axis; positive looks up
    pub fn pitch(&mut self, degrees: f32) {
        let pitch = Quaternion::from_axis_angle(Vector3::X, degrees);
        self.orientation = (self.orientation * pitch).normalize();
    }

    /// Rotate about the world Y axis; positive turns left
    pub fn yaw(&mut self, degrees: f32) {
        let yaw = Quaternion::from_axis_angle(Vector3::Y, degrees);
        self.orientation = (yaw * self.orientation).normalize();
    }

    /// Apply one tick of movement commands
    ///
    /// Translations use the basis as it was before any command of this tick.
    pub fn apply(&mut self, movements: &Movements) {
        let CameraBasis { forward, up, right } = self.basis();
        let step = TRANSLATION_STEP;

        for movement in movements.iter() {
            match movement {
                Movement::MoveForward => self.position += forward * step,
                Movement::MoveBackward => self.position -= forward * step,
                Movement::StrafeLeft => self.position -= right * step,
                Movement::StrafeRight => self.position += right * step,
                Movement::MoveUp => self.position += up * step,
                Movement::MoveDown => self.position -= up * step,
                Movement::YawLeft => self.yaw(ROTATION_STEP),
                Movement::YawRight => self.yaw(-ROTATION_STEP),
                Movement::PitchUp => self.pitch(ROTATION_STEP),
                Movement::PitchDown => self.pitch(-ROTATION_STEP),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vector3, b: Vector3) -> bool {
        (a - b).magnitude() < 1e-4
    }

    fn camera() -> Camera {
        Camera::with_planes(Vector3::ZERO, 90.0, 0.1, 100.0).unwrap()
    }

    #[test]
    fn test_identity_orientation_basis() {
        let basis = camera().basis();
        assert!(close(basis.forward, -Vector3::Z));
        assert!(close(basis.up, Vector3::Y));
        assert!(close(basis.right, Vector3::X));
    }

    #[test]
    fn test_view_matrix_at_origin_is_identity() {
        assert!(camera().view_matrix().approx_eq(&Matrix4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_view_matrix_translates_then_rotates() {
        let mut cam = camera();
        cam.position = Vector3::new(1.0, 2.0, 3.0);
        cam.yaw(90.0);

        // Camera now looks down world -X; a point ahead of it lands on camera -Z.
        let ahead = cam.position + cam.basis().forward * 4.0;
        assert!(close(cam.view_matrix() * ahead, Vector3::new(0.0, 0.0, -4.0)));

        let above = cam.position + Vector3::Y;
        assert!(close(cam.view_matrix() * above, Vector3::Y));
    }

    #[test]
    fn test_view_matrix_inverse_recovers_world_point() {
        let mut cam = camera();
        cam.position = Vector3::new(-3.0, 0.5, 8.0);
        cam.yaw(37.0);
        cam.pitch(-12.0);
        let view = cam.view_matrix();
        let inverse = view.try_inverse().unwrap();
        let p = Vector3::new(2.0, -1.0, 4.0);
        assert!(close(inverse * (view * p), p));
    }

    #[test]
    fn test_yaw_is_world_frame_and_pitch_is_local() {
        let mut cam = camera();
        cam.pitch(30.0);
        cam.yaw(90.0);
        // World-frame yaw keeps the camera's right vector horizontal: no roll.
        assert!(cam.basis().right.y.abs() < 1e-5);
        assert!(close(cam.basis().right, -Vector3::Z));

        let mut cam = camera();
        cam.yaw(90.0);
        cam.pitch(90.0);
        // Local pitch rotates about the already-yawed right axis.
        assert!(close(cam.basis().forward, Vector3::Y));
    }

    #[test]
    fn test_positive_rotations_turn_left_and_up() {
        let mut cam = camera();
        cam.yaw(10.0);
        assert!(cam.basis().forward.x < 0.0);

        let mut cam = camera();
        cam.pitch(10.0);
        assert!(cam.basis().forward.y > 0.0);
    }

    #[test]
    fn test_apply_moves_along_basis() {
        let mut cam = camera();
        cam.apply(&[Movement::MoveForward, Movement::StrafeRight].into_iter().collect());
        assert!(close(
            cam.position,
            Vector3::new(TRANSLATION_STEP, 0.0, -TRANSLATION_STEP)
        ));

        cam.apply(&[Movement::MoveBackward, Movement::StrafeLeft].into_iter().collect());
        assert!(close(cam.position, Vector3::ZERO));

        cam.apply(&[Movement::MoveUp].into_iter().collect());
        assert!(close(cam.position, Vector3::new(0.0, TRANSLATION_STEP, 0.0)));
        cam.apply(&[Movement::MoveDown].into_iter().collect());
        assert!(close(cam.position, Vector3::ZERO));
    }

    #[test]
    fn test_apply_uses_basis_from_start_of_tick() {
        let mut cam = camera();
        cam.apply(&[Movement::YawLeft, Movement::MoveForward].into_iter().collect());
        assert!(close(cam.position, Vector3::new(0.0, 0.0, -TRANSLATION_STEP)));

        let mut expected = camera();
        expected.yaw(ROTATION_STEP);
        assert!((cam.orientation - expected.orientation).magnitude() < 1e-6);
    }

    #[test]
    fn test_opposing_rotations_cancel() {
        let mut cam = camera();
        cam.apply(&[Movement::YawLeft, Movement::YawRight].into_iter().collect());
        cam.apply(&[Movement::PitchUp, Movement::PitchDown].into_iter().collect());
        assert!((cam.orientation - Quaternion::IDENTITY).magnitude() < 1e-5);
    }

    #[test]
    fn test_movement_set_deduplicates() {
        let set: Movements = [Movement::PitchUp, Movement::PitchUp, Movement::YawRight]
            .into_iter()
            .collect();
        assert_eq!(set.iter().count(), 2);
        assert!(set.contains(Movement::PitchUp));
        assert!(!set.contains(Movement::PitchDown));
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Movement::YawRight, Movement::PitchUp]
        );
        assert!(Movements::new().is_empty());
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(Camera::new(Vector3::ZERO, 0.0).is_err());
        assert!(Camera::new(Vector3::ZERO, 180.0).is_err());
        assert!(Camera::with_planes(Vector3::ZERO, 60.0, 10.0, 1.0).is_err());
        assert!(Camera::with_planes(Vector3::ZERO, 60.0, 0.0, 1.0).is_err());
        assert!(Camera::with_planes(Vector3::ZERO, 60.0, 0.5, 1.0).is_ok());
        assert!(Camera::new(Vector3::ZERO, f32::NAN).is_err());
    }

    #[test]
    fn test_ndc_of_point_straight_ahead_is_centre() {
        let cam = camera();
        let viewport = Viewport::new(800, 600).unwrap();
        for d in [0.5, 5.0, 50.0, 99.0] {
            let vertex = Vertex::uncolored(Vector3::new(0.0, 0.0, -d));
            let p = cam.ndc(&vertex, viewport);
            assert!(p.position.x.abs() < 1e-6);
            assert!(p.position.y.abs() < 1e-6);
        }
    }
}
