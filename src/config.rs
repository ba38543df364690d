// src/config.rs
//! Editor settings, loaded from an optional JSON file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::Point2D;

/// Environment variable naming a settings file.
pub const CONFIG_ENV_VAR: &str = "DUNGEON_ED_CONFIG";

pub const DEFAULT_MAX_CHILD_CORRIDORS: usize = 3;
pub const DEFAULT_NODE_WIDTH: f32 = 160.0;
pub const DEFAULT_NODE_HEIGHT: f32 = 75.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How many corridors a single room may branch into.
    pub max_child_corridors: usize,
    /// Room type catalog to use instead of the embedded one.
    pub catalog_path: Option<PathBuf>,
    pub node_width: f32,
    pub node_height: f32,
    /// Where the entrance lands when the first node of an empty graph is created.
    pub entrance_position: Point2D,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_child_corridors: DEFAULT_MAX_CHILD_CORRIDORS,
            catalog_path: None,
            node_width: DEFAULT_NODE_WIDTH,
            node_height: DEFAULT_NODE_HEIGHT,
            entrance_position: Point2D::new(200.0, 200.0),
        }
    }
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!("Loaded settings from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Loads the file named by `DUNGEON_ED_CONFIG`, or the defaults when it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings = Settings::from_json_str(r#"{ "max_child_corridors": 1 }"#).unwrap();
        assert_eq!(settings.max_child_corridors, 1);
        assert!(settings.catalog_path.is_none());
        assert_approx_eq!(settings.node_width, DEFAULT_NODE_WIDTH);
        assert_approx_eq!(settings.entrance_position.x, 200.0);
    }

    #[test]
    fn test_malformed_settings() {
        assert!(matches!(
            Settings::from_json_str(r#"{ "max_child_corridors": "many" }"#),
            Err(ConfigError::Json(_))
        ));
    }
}
