//! Application state for the offset API.

use std::sync::Arc;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{info, warn};

use imagery::{ImageSource, LocalSceneSource};
use offset_report::OffsetReportBuilder;
use renderer::ComparisonOptions;
use soc_inference::{LinearPatchModel, Predictor};

use crate::config::ServiceConfig;

/// Shared application state.
pub struct AppState {
    /// Report pipeline with its image source and predictor.
    pub builder: OffsetReportBuilder,

    /// Layout of comparison map images.
    pub comparison: ComparisonOptions,

    /// Prometheus handle, when a recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(builder: OffsetReportBuilder, comparison: ComparisonOptions) -> Self {
        Self {
            builder,
            comparison,
            prometheus: None,
        }
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Build the pipeline from configuration: scene catalog, model file and
    /// valuation constants.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        let source = LocalSceneSource::from_config(
            config.scenes.clone(),
            config.inference.bands.clone(),
        )
        .with_context(|| {
            format!(
                "Failed to open scene catalog {}",
                config.scenes.catalog_path.display()
            )
        })?;
        let image_source: Arc<dyn ImageSource> = Arc::new(source);

        let predictor = load_predictor(config)?;

        let builder = OffsetReportBuilder::new(
            image_source,
            predictor,
            config.inference.clone(),
            config.report.clone(),
        )
        .context("Failed to build report pipeline")?;

        Ok(Self::new(builder, config.comparison))
    }

    pub fn model_loaded(&self) -> bool {
        self.builder.has_model()
    }
}

/// Load the configured model.
///
/// A missing or unreadable file leaves the service without a model; a model
/// whose bands differ from the configured band list is a start-up error.
fn load_predictor(config: &ServiceConfig) -> Result<Option<Arc<dyn Predictor>>> {
    let Some(path) = &config.model_path else {
        warn!("MODEL_PATH not set, reports will answer ModelUnavailable");
        return Ok(None);
    };

    let model = match LinearPatchModel::from_file(path) {
        Ok(model) => model,
        Err(e) => {
            warn!(error = %e, path = %path.display(), "Model not loaded");
            return Ok(None);
        }
    };

    if model.bands != config.inference.bands {
        anyhow::bail!(
            "model '{}' expects bands {} but the pipeline supplies {}",
            model.name,
            model.bands,
            config.inference.bands
        );
    }

    info!(model = %model.name, "Predictor ready");
    Ok(Some(Arc::new(model)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &std::path::Path) -> ServiceConfig {
        let catalog = dir.join("catalog.yaml");
        std::fs::write(&catalog, "scenes: []\n").unwrap();

        let mut config = ServiceConfig::default();
        config.scenes.catalog_path = catalog;
        config
    }

    #[test]
    fn test_missing_model_file_starts_without_model() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.model_path = Some(dir.path().join("absent.json"));

        let state = AppState::from_config(&config).unwrap();
        assert!(!state.model_loaded());
    }

    #[test]
    fn test_model_band_mismatch_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("model.json");
        std::fs::write(
            &model,
            r#"{"name":"m","bands":["B2","B3"],"weights":[0.1,0.2],"intercept":0.0}"#,
        )
        .unwrap();

        let mut config = config_in(dir.path());
        config.model_path = Some(model);
        assert!(AppState::from_config(&config).is_err());
    }

    #[test]
    fn test_missing_catalog_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ServiceConfig::default();
        config.scenes.catalog_path = dir.path().join("nope.yaml");
        assert!(AppState::from_config(&config).is_err());
    }
}
