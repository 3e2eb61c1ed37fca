use std::path::{ Path, PathBuf };

use serde::{ Deserialize, Serialize };
use thiserror::Error;

use crate::engine::geometry::OpenEdgePolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid config {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
}

/// Demo settings, read from a JSON file. Every field is optional.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub clear_color: [f32; 4],
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub colors: ColorConfig,
    pub occluder: OccluderShape,
    pub open_edge_policy: OpenEdgePolicy,
    /// Spin the occluder about the x axis.
    pub rotate_occluder: bool,
    /// Window pixel (origin bottom-left) whose stencil count is logged at
    /// debug level every frame.
    pub stencil_probe: Option<[i32; 2]>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Radians.
    pub pitch: f32,
    /// Radians.
    pub yaw: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub move_speed: f32,
    pub mouse_sensitivity: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub move_speed: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ColorConfig {
    pub object: [f32; 3],
    pub ground: [f32; 3],
    pub ambient_strength: f32,
}

/// Mesh that casts the shadow.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum OccluderShape {
    Triangle,
    Box {
        half_extents: [f32; 3],
    },
    Sphere {
        radius: f32,
        segments: u32,
    },
    Obj {
        path: PathBuf,
        #[serde(default = "unit_scale")]
        scale: f32,
    },
}

fn unit_scale() -> f32 {
    1.0
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            clear_color: [0.2, 0.3, 0.3, 1.0],
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            colors: ColorConfig::default(),
            occluder: OccluderShape::default(),
            open_edge_policy: OpenEdgePolicy::Reject,
            rotate_occluder: true,
            stencil_probe: None,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Stencil Shadows".to_string(),
            width: 800,
            height: 600,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            pitch: 0.0,
            yaw: 0.0,
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            move_speed: 2.5,
            mouse_sensitivity: 0.002,
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [1.2, 2.0, 3.0],
            color: [1.0, 1.0, 1.0],
            move_speed: 1.0,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            object: [1.0, 0.5, 0.2],
            ground: [0.8, 0.8, 0.8],
            ambient_strength: 0.1,
        }
    }
}

impl Default for OccluderShape {
    fn default() -> Self {
        OccluderShape::Box { half_extents: [0.5, 0.5, 0.2] }
    }
}

impl DemoConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(DemoConfig::from_json("{}").unwrap(), DemoConfig::default());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = DemoConfig::from_json(
            r#"{
                "window": { "width": 1024 },
                "light": { "position": [0.0, 3.0, 0.0] },
                "open_edge_policy": "close_on_self",
                "stencil_probe": [400, 300]
            }"#
        ).unwrap();

        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.light.position, [0.0, 3.0, 0.0]);
        assert_eq!(config.light.color, [1.0, 1.0, 1.0]);
        assert_eq!(config.open_edge_policy, OpenEdgePolicy::CloseOnSelf);
        assert_eq!(config.stencil_probe, Some([400, 300]));
    }

    #[test]
    fn test_occluder_shapes() {
        let config = DemoConfig::from_json(r#"{ "occluder": { "shape": "sphere", "radius": 0.4, "segments": 12 } }"#).unwrap();
        assert_eq!(config.occluder, OccluderShape::Sphere { radius: 0.4, segments: 12 });

        let config = DemoConfig::from_json(r#"{ "occluder": { "shape": "obj", "path": "meshes/teapot.obj" } }"#).unwrap();
        assert_eq!(config.occluder, OccluderShape::Obj { path: PathBuf::from("meshes/teapot.obj"), scale: 1.0 });

        let config = DemoConfig::from_json(r#"{ "occluder": { "shape": "triangle" } }"#).unwrap();
        assert_eq!(config.occluder, OccluderShape::Triangle);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(DemoConfig::from_json("{ \"window\": 3 }").is_err());
        assert!(DemoConfig::from_json("{ \"occluder\": { \"shape\": \"torus\" } }").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = DemoConfig::load("/nonexistent/stencil-shadows.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
