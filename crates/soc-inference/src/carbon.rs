//! Conversion of a prediction surface into a regional carbon mass.

use serde::{Deserialize, Serialize};

use soc_common::PredictionSurface;

const KG_PER_TON: f64 = 1000.0;

/// Soil physical constants used to turn SOC fraction into carbon mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilConstants {
    /// Dry bulk density in kg/m³.
    pub bulk_density_kg_m3: f64,
    /// Sampled soil depth in meters.
    pub depth_m: f64,
}

impl Default for SoilConstants {
    fn default() -> Self {
        Self {
            bulk_density_kg_m3: 1300.0,
            depth_m: 0.3,
        }
    }
}

impl SoilConstants {
    /// Load constants from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut soil = Self::default();

        if let Ok(val) = std::env::var("SOIL_BULK_DENSITY_KG_M3") {
            if let Ok(density) = val.parse() {
                soil.bulk_density_kg_m3 = density;
            }
        }

        if let Ok(val) = std::env::var("SOIL_DEPTH_M") {
            if let Ok(depth) = val.parse() {
                soil.depth_m = depth;
            }
        }

        soil
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.bulk_density_kg_m3.is_finite() && self.bulk_density_kg_m3 > 0.0) {
            return Err("bulk_density_kg_m3 must be > 0".to_string());
        }
        if !(self.depth_m.is_finite() && self.depth_m > 0.0) {
            return Err("depth_m must be > 0".to_string());
        }
        Ok(())
    }

    /// Soil mass in kg under `area_sq_m` down to the configured depth.
    pub fn soil_mass_kg(&self, area_sq_m: f64) -> f64 {
        area_sq_m * self.depth_m * self.bulk_density_kg_m3
    }
}

/// Carbon mass derived from one prediction surface.
#[derive(Debug, Clone, PartialEq)]
pub struct CarbonEstimate {
    pub surface: PredictionSurface,
    pub total_carbon_tons: f64,
    /// Mean SOC over positive pixels; `None` when no pixel was positive.
    pub average_soc: Option<f64>,
    /// Number of strictly positive pixels that entered the mean.
    pub contributing_pixels: usize,
    pub total_soil_mass_kg: f64,
}

impl CarbonEstimate {
    /// Total carbon expressed in megatons.
    pub fn total_megatons(&self, tons_per_megaton: f64) -> f64 {
        self.total_carbon_tons / tons_per_megaton
    }
}

/// Estimate total carbon for a region from its prediction surface.
///
/// Only strictly positive pixels enter the SOC mean; zero pixels are
/// unpredicted area (edge remainders, masked ground) and are excluded rather
/// than counted as zero measurements. With no positive pixel the total is
/// exactly zero.
pub fn estimate(
    surface: PredictionSurface,
    region_area_sq_m: f64,
    soil_bulk_density_kg_m3: f64,
    soil_depth_m: f64,
) -> CarbonEstimate {
    let total_soil_mass_kg = region_area_sq_m * soil_depth_m * soil_bulk_density_kg_m3;

    let (sum, count) = surface
        .positive_values()
        .fold((0.0f64, 0usize), |(sum, count), value| {
            (sum + value as f64, count + 1)
        });

    if count == 0 {
        return CarbonEstimate {
            surface,
            total_carbon_tons: 0.0,
            average_soc: None,
            contributing_pixels: 0,
            total_soil_mass_kg,
        };
    }

    let average_soc = sum / count as f64;
    let total_carbon_tons = total_soil_mass_kg * average_soc / KG_PER_TON;

    CarbonEstimate {
        surface,
        total_carbon_tons,
        average_soc: Some(average_soc),
        contributing_pixels: count,
        total_soil_mass_kg,
    }
}

/// `estimate` bound to a fixed set of soil constants.
#[derive(Debug, Clone, Copy, Default)]
pub struct CarbonEstimator {
    soil: SoilConstants,
}

impl CarbonEstimator {
    pub fn new(soil: SoilConstants) -> Self {
        Self { soil }
    }

    pub fn soil(&self) -> &SoilConstants {
        &self.soil
    }

    pub fn estimate(&self, surface: PredictionSurface, region_area_sq_m: f64) -> CarbonEstimate {
        estimate(
            surface,
            region_area_sq_m,
            self.soil.bulk_density_kg_m3,
            self.soil.depth_m,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soil_mass() {
        let soil = SoilConstants::default();
        assert!((soil.soil_mass_kg(900.0) - 351_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_surface_is_exactly_zero() {
        let result = estimate(PredictionSurface::zeros(4, 4), 1e6, 1300.0, 0.3);
        assert_eq!(result.total_carbon_tons, 0.0);
        assert_eq!(result.average_soc, None);
        assert_eq!(result.contributing_pixels, 0);
    }

    #[test]
    fn test_zero_extent_surface() {
        let result = estimate(PredictionSurface::zeros(0, 0), 1e6, 1300.0, 0.3);
        assert_eq!(result.total_carbon_tons, 0.0);
    }

    #[test]
    fn test_negative_predictions_are_excluded() {
        let mut surface = PredictionSurface::zeros(1, 2);
        surface.fill_block(0, 0, 1, -0.5);
        surface.fill_block(0, 1, 1, 0.25);
        let result = estimate(surface, 1000.0, 1000.0, 1.0);
        assert_eq!(result.average_soc, Some(0.25));
        assert_eq!(result.contributing_pixels, 1);
    }

    #[test]
    fn test_estimator_uses_constants() {
        let mut surface = PredictionSurface::zeros(2, 2);
        surface.fill_block(0, 0, 2, 0.5);
        let estimator = CarbonEstimator::new(SoilConstants {
            bulk_density_kg_m3: 1000.0,
            depth_m: 1.0,
        });
        let result = estimator.estimate(surface, 2.0);
        // 2 m² × 1 m × 1000 kg/m³ × 0.5 / 1000
        assert!((result.total_carbon_tons - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate() {
        assert!(SoilConstants::default().validate().is_ok());
        let soil = SoilConstants {
            bulk_density_kg_m3: 0.0,
            depth_m: 0.3,
        };
        assert!(soil.validate().is_err());
        let soil = SoilConstants {
            bulk_density_kg_m3: 1300.0,
            depth_m: f64::NAN,
        };
        assert!(soil.validate().is_err());
    }
}
