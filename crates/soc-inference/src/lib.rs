//! Tiled patch inference and soil carbon estimation.
//!
//! This crate turns an imagery raster into a physical carbon mass:
//!
//! ```text
//! RasterArray [row, col, band]
//!      │
//!      ▼
//! TilingEngine::tile_and_predict
//!      │
//!      ├─► NaN → 0
//!      │
//!      ├─► TileGrid: non-overlapping patch_size squares, row-major
//!      │
//!      ├─► one TileBatch ──► Predictor::predict (single call)
//!      │
//!      └─► broadcast each scalar over its tile footprint
//!               │
//!               ▼
//!        PredictionSurface [row, col]
//!               │
//!               ▼
//! CarbonEstimator::estimate (mean over positive pixels × soil mass)
//!               │
//!               ▼
//!        CarbonEstimate
//! ```
//!
//! # Example
//!
//! ```ignore
//! use soc_inference::{tile_and_predict, estimate, SoilConstants};
//!
//! let surface = tile_and_predict(raster, 32, &model)?;
//! let soil = SoilConstants::default();
//! let carbon = estimate(surface, area_sq_m, soil.bulk_density_kg_m3, soil.depth_m);
//! println!("{} t", carbon.total_carbon_tons);
//! ```

pub mod carbon;
pub mod config;
pub mod linear;
pub mod predictor;
pub mod tiling;

pub use carbon::{estimate, CarbonEstimate, CarbonEstimator, SoilConstants};
pub use config::InferenceConfig;
pub use linear::LinearPatchModel;
pub use predictor::{Predictor, TileBatch};
pub use tiling::{tile_and_predict, TileGrid, TileOrigin, TilingEngine};
