use std::path::Path;

use anyhow::Context;
use rast3d_core::{Camera, ColorRGB, Quaternion, Transform, Vector3};
use serde::Deserialize;

/// Viewer settings loaded from a TOML file
///
/// Every section and key is optional; missing values fall back to the
/// built-in scene (a camera at the origin looking at an object five units
/// down -Z).
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub camera: CameraConfig,
    pub object: ObjectConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            fov: 80.0,
            near_plane: Camera::DEFAULT_NEAR,
            far_plane: Camera::DEFAULT_FAR,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ObjectConfig {
    pub position: [f32; 3],
    pub scale: [f32; 3],
    pub rotation_axis: [f32; 3],
    pub rotation_degrees: f32,
    /// Local axis the object spins about
    pub spin_axis: [f32; 3],
    /// Degrees turned per frame while spinning
    pub spin_degrees: f32,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, -5.0],
            scale: [1.0, 1.0, 1.0],
            rotation_axis: [1.0, 2.0, 3.0],
            rotation_degrees: 60.0,
            spin_axis: [0.0, 1.0, 0.0],
            spin_degrees: 0.5,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub target_fps: u32,
    pub background: [f32; 3],
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            target_fps: 30,
            background: [0.0, 0.0, 0.0],
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&source)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(source)?;
        if config.display.target_fps == 0 {
            anyhow::bail!("display.target_fps must be at least 1");
        }
        Ok(config)
    }

    pub fn camera(&self) -> rast3d_core::Result<Camera> {
        let c = &self.camera;
        Camera::with_planes(Vector3::from(c.position), c.fov, c.near_plane, c.far_plane)
    }

    /// Initial placement of the displayed object
    pub fn object_transform(&self) -> Transform {
        let o = &self.object;
        Transform::new(
            Vector3::from(o.position),
            Vector3::from(o.scale),
            Quaternion::from_axis_angle(Vector3::from(o.rotation_axis), o.rotation_degrees),
        )
    }

    /// Per-frame rotation applied while the object spins
    pub fn spin(&self) -> Quaternion {
        Quaternion::from_axis_angle(
            Vector3::from(self.object.spin_axis),
            self.object.spin_degrees,
        )
    }

    pub fn background(&self) -> ColorRGB {
        ColorRGB::from(self.display.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.display.target_fps, 30);

        let camera = config.camera().unwrap();
        assert_eq!(camera.position, Vector3::ZERO);
        assert_eq!(camera.fov, 80.0);
        assert_eq!(config.object_transform().position, Vector3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml_str(
            r#"
            [camera]
            fov = 60.0

            [object]
            position = [1.0, 2.0, -10.0]
            spin_degrees = 0.0

            [display]
            background = [0.1, 0.2, 0.3]
            "#,
        )
        .unwrap();

        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.camera.far_plane, Camera::DEFAULT_FAR);
        assert_eq!(config.object.scale, [1.0, 1.0, 1.0]);
        assert_eq!(config.object_transform().position, Vector3::new(1.0, 2.0, -10.0));
        assert_eq!(config.spin(), Quaternion::IDENTITY);
        assert_eq!(config.background(), ColorRGB::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_object_rotation_is_normalized() {
        let config = AppConfig::default();
        let rotation = config.object_transform().rotation;
        assert!((rotation.magnitude() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_spin_axis_is_independent_of_placement() {
        let spin = AppConfig::default().spin();
        let expected = Quaternion::from_axis_angle(Vector3::Y, 0.5);
        assert!((spin.w - expected.w).abs() < 1e-6);
        assert!((spin.vector - expected.vector).magnitude() < 1e-6);

        let config = AppConfig::from_toml_str(
            "[object]\nrotation_axis = [1.0, 0.0, 0.0]\nspin_axis = [0.0, 0.0, 1.0]\nspin_degrees = 90.0\n",
        )
        .unwrap();
        let turned = config.spin().rotate(Vector3::X);
        assert!((turned - Vector3::Y).magnitude() < 1e-5);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(AppConfig::from_toml_str("[display]\ntarget_fps = 0\n").is_err());
        assert!(AppConfig::from_toml_str("[camera]\nzoom = 2.0\n").is_err());
        assert!(AppConfig::from_toml_str("[camera]\nfov = \"wide\"\n").is_err());

        let config = AppConfig::from_toml_str("[camera]\nnear_plane = 5.0\nfar_plane = 1.0\n").unwrap();
        assert!(config.camera().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[display]\ntarget_fps = 60").unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.display.target_fps, 60);

        let missing = file.path().with_extension("missing");
        let err = AppConfig::load(&missing).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
