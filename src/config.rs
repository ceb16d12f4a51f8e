use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    #[serde(default = "WindowConfig::default_target_fps")]
    pub target_fps: u32,
}

impl WindowConfig {
    const fn default_target_fps() -> u32 {
        60
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Starling Engine".to_string(),
            width: 800,
            height: 450,
            vsync: true,
            target_fps: Self::default_target_fps(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "CameraConfig::default_position")]
    pub position: [f32; 3],
    #[serde(default)]
    pub target: [f32; 3],
    #[serde(default = "CameraConfig::default_fov_y")]
    pub fov_y_degrees: f32,
}

impl CameraConfig {
    const fn default_position() -> [f32; 3] {
        [10.0, 10.0, 10.0]
    }

    const fn default_fov_y() -> f32 {
        45.0
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Self::default_position(),
            target: [0.0, 0.0, 0.0],
            fov_y_degrees: Self::default_fov_y(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    /// Behaviour scripts attached to the demo scene as HUD entities.
    #[serde(default)]
    pub scripts: Vec<String>,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("Parsing {}", path.display()))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("[config] {err:#}; using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_or_default("config/definitely_not_here.json");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.target_fps, 60);
        assert!(config.scripts.is_empty());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "window": { "title": "t", "width": 640, "height": 360, "vsync": false } }"#)
                .unwrap();
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.target_fps, 60);
        assert_eq!(config.camera.fov_y_degrees, 45.0);
    }
}
