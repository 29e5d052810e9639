//! A linear patch model described by a JSON file.
//!
//! The model averages each band over the tile and applies a weighted sum:
//! `soc = intercept + Σ weight[b] · mean(tile[.., .., b])`.
//!
//! ```json
//! {
//!   "name": "soc-linear-v1",
//!   "bands": ["B2", "B3", "B4", "B8", "B11", "NDVI", "SAVI", "BSI"],
//!   "weights": [0.01, 0.0, -0.02, 0.03, -0.01, 0.02, 0.01, -0.015],
//!   "intercept": 0.012,
//!   "clamp_non_negative": true
//! }
//! ```

use std::path::Path;

use ndarray::Axis;
use serde::{Deserialize, Serialize};
use tracing::info;

use soc_common::{BandList, Result, SocError};

use crate::predictor::{Predictor, TileBatch};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearPatchModel {
    pub name: String,
    pub bands: BandList,
    pub weights: Vec<f32>,
    pub intercept: f32,
    /// Clamp negative outputs to zero (negative SOC is not physical).
    #[serde(default = "default_clamp")]
    pub clamp_non_negative: bool,
}

fn default_clamp() -> bool {
    true
}

impl LinearPatchModel {
    pub fn new(
        name: impl Into<String>,
        bands: BandList,
        weights: Vec<f32>,
        intercept: f32,
    ) -> Result<Self> {
        let model = Self {
            name: name.into(),
            bands,
            weights,
            intercept,
            clamp_non_negative: true,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)
            .map_err(|e| SocError::model_unavailable(format!("invalid model file: {}", e)))?;
        model.validate()?;
        Ok(model)
    }

    /// Load a model file; any failure means the model is unavailable.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SocError::model_unavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        let model = Self::from_json(&json)?;
        info!(
            model = %model.name,
            bands = %model.bands,
            path = %path.display(),
            "Loaded linear patch model"
        );
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        if self.weights.len() != self.bands.len() {
            return Err(SocError::invalid_configuration(format!(
                "model '{}' has {} weights for {} bands",
                self.name,
                self.weights.len(),
                self.bands.len()
            )));
        }
        if self.weights.iter().any(|w| !w.is_finite()) || !self.intercept.is_finite() {
            return Err(SocError::invalid_configuration(format!(
                "model '{}' has non-finite coefficients",
                self.name
            )));
        }
        Ok(())
    }
}

impl Predictor for LinearPatchModel {
    fn predict(&self, batch: &TileBatch) -> Result<Vec<f32>> {
        if !batch.is_empty() && batch.band_count() != self.weights.len() {
            return Err(SocError::inference(format!(
                "model '{}' expects {} bands, batch has {}",
                self.name,
                self.weights.len(),
                batch.band_count()
            )));
        }

        let predictions = batch
            .iter()
            .map(|tile| {
                let band_means = tile
                    .mean_axis(Axis(0))
                    .and_then(|rows| rows.mean_axis(Axis(0)));
                let value = match band_means {
                    Some(means) => {
                        self.intercept
                            + means
                                .iter()
                                .zip(&self.weights)
                                .map(|(mean, weight)| mean * weight)
                                .sum::<f32>()
                    }
                    None => 0.0,
                };
                if self.clamp_non_negative {
                    value.max(0.0)
                } else {
                    value
                }
            })
            .collect();

        Ok(predictions)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    fn two_band_model() -> LinearPatchModel {
        LinearPatchModel::new("test", BandList::new(["B4", "B8"]), vec![1.0, 2.0], 0.5).unwrap()
    }

    #[test]
    fn test_weight_count_must_match_bands() {
        let result = LinearPatchModel::new("bad", BandList::new(["B4"]), vec![1.0, 2.0], 0.0);
        assert!(matches!(result, Err(SocError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_predict_uses_band_means() {
        let mut tiles = Array4::<f32>::zeros((2, 2, 2, 2));
        // Tile 0: band 0 mean = 1, band 1 mean = 0.5
        tiles.slice_mut(ndarray::s![0, .., .., 0]).fill(1.0);
        tiles.slice_mut(ndarray::s![0, .., .., 1]).fill(0.5);
        // Tile 1: band 1 mean = 0.25 (half the pixels at 0.5)
        tiles.slice_mut(ndarray::s![1, 0, .., 1]).fill(0.5);

        let predictions = two_band_model().predict(&TileBatch::new(tiles)).unwrap();
        assert_eq!(predictions.len(), 2);
        assert!((predictions[0] - 2.5).abs() < 1e-6);
        assert!((predictions[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_clamps_negative_output() {
        let model =
            LinearPatchModel::new("neg", BandList::new(["B4"]), vec![-1.0], 0.0).unwrap();
        let tiles = Array4::<f32>::ones((1, 2, 2, 1));
        let predictions = model.predict(&TileBatch::new(tiles)).unwrap();
        assert_eq!(predictions, vec![0.0]);
    }

    #[test]
    fn test_band_mismatch_is_inference_error() {
        let tiles = Array4::<f32>::ones((1, 2, 2, 3));
        let result = two_band_model().predict(&TileBatch::new(tiles));
        assert!(matches!(result, Err(SocError::Inference(_))));
    }

    #[test]
    fn test_from_json_defaults_clamp() {
        let json = r#"{"name":"m","bands":["B4"],"weights":[0.1],"intercept":0.0}"#;
        let model = LinearPatchModel::from_json(json).unwrap();
        assert!(model.clamp_non_negative);
        assert_eq!(model.name(), "m");
    }

    #[test]
    fn test_from_file_loads_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("soc_model.json");
        let written = two_band_model();
        std::fs::write(&path, serde_json::to_string(&written).unwrap()).unwrap();

        let model = LinearPatchModel::from_file(&path).unwrap();
        assert_eq!(model.name, "test");
        assert_eq!(model.bands, written.bands);
        assert_eq!(model.weights, vec![1.0, 2.0]);
        assert_eq!(model.intercept, 0.5);
    }

    #[test]
    fn test_missing_file_is_model_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let result = LinearPatchModel::from_file(dir.path().join("soc_model.json"));
        assert!(matches!(result, Err(SocError::ModelUnavailable(_))));
    }

    #[test]
    fn test_malformed_file_is_model_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("soc_model.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = LinearPatchModel::from_file(&path);
        assert!(matches!(result, Err(SocError::ModelUnavailable(_))));
    }
}
