/// User settings
///
/// Stored as JSON next to the other per-user config files:
/// - Linux: ~/.config/image-gallery/config.json
/// - macOS: ~/Library/Application Support/image-gallery/config.json
/// - Windows: %APPDATA%\image-gallery\config.json
///
/// A missing file means defaults. A malformed file is reported and also falls
/// back to defaults; the app never refuses to start over its settings.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Width of one grid tile in logical pixels (96 to 512)
    pub tile_width: f32,
    /// Gap between grid tiles, both axes
    pub tile_spacing: f32,
    /// Longest edge of decoded thumbnails in pixels (64 to 1024)
    pub thumbnail_size: u32,
    /// Scale factor applied per wheel notch in the viewer (> 1.0)
    pub wheel_zoom_step: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tile_width: 180.0,
            tile_spacing: 8.0,
            thumbnail_size: 256,
            wheel_zoom_step: 1.1,
        }
    }
}

impl Config {
    /// Load the config from the default location, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            log::debug!("no config directory on this platform, using defaults");
            return Self::default();
        };

        if !path.exists() {
            // Seed an editable file so users can find the knobs
            let config = Self::default();
            if let Err(e) = config.save_to(&path) {
                log::debug!("could not write default config to {}: {}", path.display(), e);
            }
            return config;
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Read and sanitise a config file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        let config: Config = serde_json::from_str(&json)?;
        Ok(config.sanitized())
    }

    /// Write the config as pretty JSON, creating the parent directory.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("image-gallery");
        path.push("config.json");
        Some(path)
    }

    /// Clamp every field into its usable range
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            tile_width: if self.tile_width.is_finite() {
                self.tile_width.clamp(96.0, 512.0)
            } else {
                defaults.tile_width
            },
            tile_spacing: if self.tile_spacing.is_finite() {
                self.tile_spacing.max(0.0)
            } else {
                defaults.tile_spacing
            },
            thumbnail_size: self.thumbnail_size.clamp(64, 1024),
            wheel_zoom_step: if self.wheel_zoom_step.is_finite() && self.wheel_zoom_step > 1.0 {
                self.wheel_zoom_step
            } else {
                defaults.wheel_zoom_step
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("image-gallery-config-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load_from(&temp_path("does-not-exist.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip.json");
        let config = Config {
            tile_width: 240.0,
            tile_spacing: 4.0,
            thumbnail_size: 512,
            wheel_zoom_step: 1.25,
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_path("partial.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{ "thumbnail_size": 128 }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.thumbnail_size, 128);
        assert_eq!(config.tile_width, Config::default().tile_width);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = temp_path("broken.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_sanitize_clamps_out_of_range_values() {
        let config = Config {
            tile_width: 10_000.0,
            tile_spacing: -3.0,
            thumbnail_size: 4,
            wheel_zoom_step: 0.5,
        }
        .sanitized();

        assert_eq!(config.tile_width, 512.0);
        assert_eq!(config.tile_spacing, 0.0);
        assert_eq!(config.thumbnail_size, 64);
        assert_eq!(config.wheel_zoom_step, Config::default().wheel_zoom_step);
    }
}
