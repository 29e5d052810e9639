//! Error types for the SOC offset pipeline.

use thiserror::Error;

/// Result type alias using SocError.
pub type Result<T> = std::result::Result<T, SocError>;

/// Errors that terminate a single estimate or report request.
///
/// None of these are retried inside the pipeline.
#[derive(Debug, Error)]
pub enum SocError {
    /// The raster is smaller than one tile in at least one dimension.
    #[error("region too small to tile: raster is {rows}x{cols} pixels, patch size is {patch_size}")]
    RegionTooSmall {
        rows: usize,
        cols: usize,
        patch_size: usize,
    },

    /// The image source found no qualifying imagery for the date window.
    #[error("no imagery available for {date}: {reason}")]
    NoImageryAvailable { date: String, reason: String },

    /// No predictor is loaded.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// Bad patch size, malformed region, unorderable dates or band mismatch.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The report deadline elapsed before both estimates completed.
    #[error("deadline of {deadline_ms} ms exceeded while building report")]
    DeadlineExceeded { deadline_ms: u64 },

    /// The predictor failed or returned a malformed batch.
    #[error("inference failed: {0}")]
    Inference(String),

    /// The image source failed for a reason other than missing imagery.
    #[error("image source error: {0}")]
    ImageSource(String),
}

impl SocError {
    pub fn region_too_small(rows: usize, cols: usize, patch_size: usize) -> Self {
        Self::RegionTooSmall {
            rows,
            cols,
            patch_size,
        }
    }

    pub fn no_imagery(date: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NoImageryAvailable {
            date: date.into(),
            reason: reason.into(),
        }
    }

    pub fn model_unavailable(msg: impl Into<String>) -> Self {
        Self::ModelUnavailable(msg.into())
    }

    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    pub fn image_source(msg: impl Into<String>) -> Self {
        Self::ImageSource(msg.into())
    }

    /// Stable machine-readable code for API responses and metric labels.
    pub fn error_code(&self) -> &'static str {
        match self {
            SocError::RegionTooSmall { .. } => "RegionTooSmall",
            SocError::NoImageryAvailable { .. } => "NoImageryAvailable",
            SocError::ModelUnavailable(_) => "ModelUnavailable",
            SocError::InvalidConfiguration(_) => "InvalidConfiguration",
            SocError::DeadlineExceeded { .. } => "DeadlineExceeded",
            SocError::Inference(_) => "InferenceFailed",
            SocError::ImageSource(_) => "ImageSourceError",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            SocError::InvalidConfiguration(_) => 400,
            SocError::NoImageryAvailable { .. } => 404,
            SocError::RegionTooSmall { .. } => 422,
            SocError::ModelUnavailable(_) => 503,
            SocError::DeadlineExceeded { .. } => 504,
            SocError::ImageSource(_) => 502,
            SocError::Inference(_) => 500,
        }
    }
}

impl From<std::io::Error> for SocError {
    fn from(err: std::io::Error) -> Self {
        SocError::ImageSource(err.to_string())
    }
}

impl From<ndarray::ShapeError> for SocError {
    fn from(err: ndarray::ShapeError) -> Self {
        SocError::InvalidConfiguration(format!("array shape error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(SocError::region_too_small(10, 10, 32).http_status_code(), 422);
        assert_eq!(SocError::no_imagery("2024-01-01", "none").http_status_code(), 404);
        assert_eq!(SocError::model_unavailable("x").http_status_code(), 503);
        assert_eq!(SocError::invalid_configuration("x").http_status_code(), 400);
        assert_eq!(
            SocError::DeadlineExceeded { deadline_ms: 10 }.http_status_code(),
            504
        );
    }

    #[test]
    fn test_region_too_small_message() {
        let err = SocError::region_too_small(5, 40, 32);
        assert_eq!(err.error_code(), "RegionTooSmall");
        assert!(err.to_string().contains("5x40"));
    }
}
