//! Imagery acquisition for the SOC pipeline.
//!
//! The pipeline only sees the [`ImageSource`] capability: one composite raster
//! per (region, nominal date), bands in a fixed order. [`LocalSceneSource`] is
//! a file-backed implementation over a catalog of Sentinel-2 scenes:
//!
//! ```text
//! fetch(region, date)
//!      │
//!      ├─► catalog: scenes in date ± window, intersecting region, cloud < max
//!      │
//!      ├─► per scene: clip → QA60 cloud mask → /10000 → NDVI, SAVI, BSI
//!      │
//!      ├─► per-pixel median across scenes (NaN ignored)
//!      │
//!      └─► select bands in model order
//! ```

pub mod catalog;
pub mod composite;
pub mod config;
pub mod local;
pub mod scene;
pub mod source;
pub mod spectral;

pub use catalog::{SceneCatalog, SceneEntry};
pub use config::SceneSourceConfig;
pub use local::LocalSceneSource;
pub use source::ImageSource;
