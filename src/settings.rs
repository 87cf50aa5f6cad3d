//! Optional user settings read from `cubes.json` in the working directory.

use std::{io, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::camera::Camera;

pub const SETTINGS_FILE: &str = "cubes.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub vsync: bool,
    /// Images bound to texture units 0 and 1.
    pub textures: [String; 2],
    pub camera_speed: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub clear_color: [f32; 4],
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        let camera = Camera::default();
        Self {
            window_title: "Textured Cube".to_string(),
            window_width: 800,
            window_height: 800,
            vsync: true,
            textures: ["container.jpg".to_string(), "mossyRock.jpg".to_string()],
            camera_speed: camera.speed,
            fov_degrees: camera.fov,
            near: camera.near,
            far: camera.far,
            clear_color: [0.1, 0.2, 0.3, 1.0],
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Starting camera with the configured lens and speed.
    pub fn camera(&self) -> Camera {
        Camera {
            speed: self.camera_speed,
            fov: self.fov_degrees,
            near: self.near,
            far: self.far,
            ..Camera::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("textured-cubes-no-such-settings.json");
        assert_eq!(Settings::load(path).unwrap(), Settings::default());
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let path = std::env::temp_dir().join(format!(
            "textured-cubes-{}-settings.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "window_width": 1280, "camera_speed": 5.0 }"#).unwrap();
        let settings = Settings::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.window_width, 1280);
        assert_eq!(settings.camera_speed, 5.0);
        assert_eq!(settings.window_height, 800);
        assert_eq!(settings.textures[1], "mossyRock.jpg");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = serde_json::from_str::<Settings>(r#"{ "window_widht": 10 }"#).unwrap_err();
        assert!(err.to_string().contains("window_widht"));
    }

    #[test]
    fn defaults_match_the_demo() {
        let settings = Settings::default();
        assert_eq!(settings.textures, ["container.jpg", "mossyRock.jpg"]);
        assert_eq!(settings.camera(), Camera::default());
        assert_eq!(settings.clear_color, [0.1, 0.2, 0.3, 1.0]);
    }
}
