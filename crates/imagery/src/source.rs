//! The image source capability.

use async_trait::async_trait;

use soc_common::{ObservationDate, RasterArray, Region, Result};

/// Supplies one cloud-filtered, index-augmented composite per nominal date.
///
/// Implementations own their compositing window, cloud filtering and any
/// retry policy. When no qualifying imagery exists they fail with
/// `SocError::NoImageryAvailable`.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch the composite raster for `region` around `date`.
    async fn fetch(&self, region: &Region, date: ObservationDate) -> Result<RasterArray>;

    /// Source name for logs.
    fn name(&self) -> &str {
        "image-source"
    }
}
