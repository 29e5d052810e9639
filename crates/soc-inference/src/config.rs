//! Configuration for tiled inference.

use serde::{Deserialize, Serialize};

use soc_common::{BandList, SocError};

use crate::carbon::SoilConstants;

const GSD_TOLERANCE_M: f64 = 1e-6;

/// Configuration for the tiling and estimation steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Tile edge length in pixels.
    pub patch_size: usize,

    /// Ground sampling distance of the imagery in meters per pixel.
    pub gsd_m: f64,

    /// Band order the model expects.
    pub bands: BandList,

    /// Soil physical constants.
    pub soil: SoilConstants,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            patch_size: 32,
            gsd_m: 30.0,
            bands: BandList::default(),
            soil: SoilConstants::default(),
        }
    }
}

impl InferenceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self {
            soil: SoilConstants::from_env(),
            ..Self::default()
        };

        if let Ok(val) = std::env::var("PATCH_SIZE") {
            if let Ok(size) = val.parse() {
                config.patch_size = size;
            }
        }

        if let Ok(val) = std::env::var("IMAGERY_GSD_M") {
            if let Ok(gsd) = val.parse() {
                config.gsd_m = gsd;
            }
        }

        if let Ok(val) = std::env::var("MODEL_BANDS") {
            if let Ok(bands) = BandList::parse(&val) {
                config.bands = bands;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.patch_size == 0 {
            return Err("patch_size must be > 0".to_string());
        }

        if !(self.gsd_m.is_finite() && self.gsd_m > 0.0) {
            return Err("gsd_m must be > 0".to_string());
        }

        if self.bands.is_empty() {
            return Err("bands must not be empty".to_string());
        }

        self.soil.validate()
    }

    /// Reject imagery whose resolution differs from the configured GSD.
    ///
    /// A tile covers `patch_size * gsd_m` meters; rasters at another
    /// resolution would change the ground footprint the model was fit on.
    pub fn ensure_gsd(&self, gsd_m: f64) -> soc_common::Result<()> {
        if (gsd_m - self.gsd_m).abs() > GSD_TOLERANCE_M {
            return Err(SocError::invalid_configuration(format!(
                "imagery GSD {} m does not match configured {} m",
                gsd_m, self.gsd_m
            )));
        }
        Ok(())
    }
}
