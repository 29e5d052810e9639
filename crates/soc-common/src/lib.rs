//! Common types shared across the SOC offset pipeline crates.

pub mod bands;
pub mod error;
pub mod raster;
pub mod region;
pub mod time;

pub use bands::{BandList, DEFAULT_BANDS};
pub use error::{Result, SocError};
pub use raster::{PredictionSurface, RasterArray};
pub use region::Region;
pub use time::{CompositingWindow, ObservationDate, TimeParseError};
