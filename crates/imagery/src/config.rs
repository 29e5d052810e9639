//! Configuration for the local scene source.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for [`LocalSceneSource`](crate::LocalSceneSource).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSourceConfig {
    /// Path to the scene catalog YAML file.
    pub catalog_path: PathBuf,

    /// Half width of the compositing window in days.
    pub window_days: i64,

    /// Scenes at or above this cloudy pixel percentage are skipped.
    pub max_cloud_percentage: f64,

    /// Nominal ground sampling distance of the scenes in meters.
    pub gsd_m: f64,
}

impl Default for SceneSourceConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("data/scenes/catalog.yaml"),
            window_days: 15,
            max_cloud_percentage: 20.0,
            gsd_m: 30.0,
        }
    }
}

impl SceneSourceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SCENE_CATALOG") {
            config.catalog_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("COMPOSITE_WINDOW_DAYS") {
            if let Ok(days) = val.parse() {
                config.window_days = days;
            }
        }

        if let Ok(val) = std::env::var("MAX_CLOUD_PERCENTAGE") {
            if let Ok(pct) = val.parse() {
                config.max_cloud_percentage = pct;
            }
        }

        if let Ok(val) = std::env::var("IMAGERY_GSD_M") {
            if let Ok(gsd) = val.parse() {
                config.gsd_m = gsd;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.window_days <= 0 {
            return Err("window_days must be > 0".to_string());
        }

        if !(0.0..=100.0).contains(&self.max_cloud_percentage) {
            return Err("max_cloud_percentage must be 0-100".to_string());
        }

        if !(self.gsd_m.is_finite() && self.gsd_m > 0.0) {
            return Err("gsd_m must be > 0".to_string());
        }

        Ok(())
    }
}
