use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{CatalogError, ResourceCatalog};
use crate::viewport::{Fov, MIN_FOV};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("invalid resource catalog: {0}")]
    Catalog(#[from] CatalogError),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window_width: i32,
    pub window_height: i32,
    pub initial_fov: i32,
    pub fov_step: i32,
    pub min_fov: i32,
    pub frame_delay_ms: u64,
    pub seed: Option<u64>,
    /// Window pixels per terminal cell.
    pub cell_pixels: i32,
    pub catalog: ResourceCatalog,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            initial_fov: 10,
            fov_step: 2,
            min_fov: MIN_FOV,
            frame_delay_ms: 50,
            seed: None,
            cell_pixels: 10,
            catalog: ResourceCatalog::builtin(),
        }
    }
}

impl GameConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_width <= 0 || self.window_height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "window must be positive, got {}x{}",
                self.window_width, self.window_height
            )));
        }
        if self.min_fov < MIN_FOV {
            return Err(ConfigError::Invalid(format!(
                "min_fov must be at least {MIN_FOV}, got {}",
                self.min_fov
            )));
        }
        let max_fov = self.window_width.min(self.window_height);
        if self.initial_fov < self.min_fov || self.initial_fov > max_fov {
            return Err(ConfigError::Invalid(format!(
                "initial_fov {} outside {}..={max_fov}",
                self.initial_fov, self.min_fov
            )));
        }
        if self.fov_step < 1 {
            return Err(ConfigError::Invalid("fov_step must be positive".to_string()));
        }
        if self.cell_pixels < 1 {
            return Err(ConfigError::Invalid(
                "cell_pixels must be positive".to_string(),
            ));
        }
        self.catalog.validate()?;
        Ok(())
    }

    pub fn fov(&self) -> Fov {
        Fov::for_window(
            self.initial_fov,
            self.min_fov,
            self.fov_step,
            self.window_width,
            self.window_height,
        )
    }

    pub fn console_size(&self) -> (i32, i32) {
        (
            (self.window_width / self.cell_pixels).max(1),
            (self.window_height / self.cell_pixels).max(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TileType;

    #[test]
    fn defaults_match_the_classic_window() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!((config.window_width, config.window_height), (800, 600));
        assert_eq!(config.fov().value(), 10);
        assert_eq!(config.frame_delay_ms, 50);
        assert_eq!(config.console_size(), (80, 60));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "seed": 42, "initial_fov": 8 }"#).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.initial_fov, 8);
        assert_eq!(config.window_width, 800);
        assert!(config.catalog.lookup(TileType(2)).is_some());
    }

    #[test]
    fn rejects_fov_below_floor_or_beyond_window() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "min_fov": 1 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "initial_fov": 700 }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn catalog_errors_surface_through_config() {
        let text = r#"{ "catalog": [{
            "tile_type": 1, "name": "weed", "drops": [],
            "disappearance_probability": 0.5, "spawn_rate": 3, "color": [1, 2, 3]
        }] }"#;
        assert!(matches!(
            GameConfig::from_json(text),
            Err(ConfigError::Catalog(CatalogError::ReservedTileType(_)))
        ));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        fs::write(&path, r#"{ "window_width": 400, "window_height": 300 }"#).unwrap();

        let config = GameConfig::load_from_path(&path).unwrap();
        assert_eq!(config.console_size(), (40, 30));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            GameConfig::load_from_path(dir.path().join("absent.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
