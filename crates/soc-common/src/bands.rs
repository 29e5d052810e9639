//! Band ordering for the model input rasters.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SocError};

/// Band order the patch model was trained on: Sentinel-2 reflectance bands
/// followed by the derived spectral indices.
pub const DEFAULT_BANDS: [&str; 8] = ["B2", "B3", "B4", "B8", "B11", "NDVI", "SAVI", "BSI"];

/// An ordered list of band names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandList(Vec<String>);

impl BandList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Parse a comma-separated band list, e.g. `"B2,B3,B4"`.
    pub fn parse(s: &str) -> Result<Self> {
        let names: Vec<String> = s
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect();

        if names.is_empty() {
            return Err(SocError::invalid_configuration("band list is empty"));
        }

        Ok(Self(names))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|band| band == name)
    }

    /// Require `actual` to carry exactly these bands in exactly this order.
    pub fn ensure_matches(&self, actual: &[String]) -> Result<()> {
        if actual.len() != self.0.len() {
            return Err(SocError::invalid_configuration(format!(
                "expected {} bands {:?}, raster has {} bands {:?}",
                self.0.len(),
                self.0,
                actual.len(),
                actual
            )));
        }

        for (index, (expected, found)) in self.0.iter().zip(actual).enumerate() {
            if expected != found {
                return Err(SocError::invalid_configuration(format!(
                    "band {} is '{}', expected '{}'",
                    index, found, expected
                )));
            }
        }

        Ok(())
    }
}

impl Default for BandList {
    fn default() -> Self {
        Self::new(DEFAULT_BANDS)
    }
}

impl std::fmt::Display for BandList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}
