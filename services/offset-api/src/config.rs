//! Service configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};

use imagery::SceneSourceConfig;
use offset_report::ReportConfig;
use renderer::ComparisonOptions;
use soc_inference::InferenceConfig;

/// Everything needed to assemble the report pipeline at start-up.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Linear patch model JSON. `None` starts the service without a model.
    pub model_path: Option<PathBuf>,
    pub inference: InferenceConfig,
    pub scenes: SceneSourceConfig,
    pub report: ReportConfig,
    pub comparison: ComparisonOptions,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut comparison = ComparisonOptions::default();
        if let Ok(val) = std::env::var("COMPARISON_CELL_SIZE") {
            if let Ok(size) = val.parse() {
                comparison.cell_size = size;
            }
        }

        Self {
            model_path: std::env::var("MODEL_PATH").ok().map(PathBuf::from),
            inference: InferenceConfig::from_env(),
            scenes: SceneSourceConfig::from_env(),
            report: ReportConfig::from_env(),
            comparison,
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.inference
            .validate()
            .map_err(anyhow::Error::msg)
            .context("invalid inference configuration")?;
        self.scenes
            .validate()
            .map_err(anyhow::Error::msg)
            .context("invalid scene source configuration")?;
        self.report
            .validate()
            .map_err(anyhow::Error::msg)
            .context("invalid report configuration")?;
        self.inference
            .ensure_gsd(self.scenes.gsd_m)
            .context("scene source and inference disagree on GSD")?;
        if self.comparison.cell_size == 0 {
            anyhow::bail!("comparison cell size must be > 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServiceConfig::default();
        assert!(config.model_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_section_reported() {
        let mut config = ServiceConfig::default();
        config.inference.patch_size = 0;
        let err = config.validate().unwrap_err();
        assert!(format!("{:#}", err).contains("patch_size"));
    }

    #[test]
    fn test_scene_gsd_must_match_inference() {
        let mut config = ServiceConfig::default();
        config.scenes.gsd_m = 10.0;
        let err = config.validate().unwrap_err();
        assert!(format!("{:#}", err).contains("GSD"));
    }
}
