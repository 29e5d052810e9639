//! Rectangular regions of interest in WGS84 degrees.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SocError};

/// Mean Earth radius (IUGG) in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A lon/lat rectangle: `(min_lon, min_lat, max_lon, max_lat)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Region {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Build from two opposite corners given as `[lon, lat]` pairs.
    ///
    /// Corners may be given in any order; the rectangle is normalized.
    pub fn from_corners(a: [f64; 2], b: [f64; 2]) -> Self {
        Self {
            min_lon: a[0].min(b[0]),
            min_lat: a[1].min(b[1]),
            max_lon: a[0].max(b[0]),
            max_lat: a[1].max(b[1]),
        }
    }

    /// Reject non-finite, out-of-range or empty rectangles.
    pub fn validate(&self) -> Result<()> {
        let coords = [self.min_lon, self.min_lat, self.max_lon, self.max_lat];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(SocError::invalid_configuration(format!(
                "region has non-finite coordinates: {:?}",
                self
            )));
        }
        if self.min_lon < -180.0 || self.max_lon > 180.0 {
            return Err(SocError::invalid_configuration(format!(
                "region longitude outside [-180, 180]: {:?}",
                self
            )));
        }
        if self.min_lat < -90.0 || self.max_lat > 90.0 {
            return Err(SocError::invalid_configuration(format!(
                "region latitude outside [-90, 90]: {:?}",
                self
            )));
        }
        if self.min_lon >= self.max_lon || self.min_lat >= self.max_lat {
            return Err(SocError::invalid_configuration(format!(
                "region is empty or inverted: {:?}",
                self
            )));
        }
        Ok(())
    }

    /// Width in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Height in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn intersects(&self, other: &Region) -> bool {
        self.min_lon < other.max_lon
            && self.max_lon > other.min_lon
            && self.min_lat < other.max_lat
            && self.max_lat > other.min_lat
    }

    pub fn intersection(&self, other: &Region) -> Option<Region> {
        if !self.intersects(other) {
            return None;
        }

        Some(Region {
            min_lon: self.min_lon.max(other.min_lon),
            min_lat: self.min_lat.max(other.min_lat),
            max_lon: self.max_lon.min(other.max_lon),
            max_lat: self.max_lat.min(other.max_lat),
        })
    }

    /// Ground area in square meters on a spherical Earth.
    ///
    /// Exact for a lon/lat rectangle on the sphere:
    /// `R² · Δλ · (sin φ_max − sin φ_min)`.
    pub fn area_sq_meters(&self) -> f64 {
        let delta_lon = self.width().to_radians();
        let band = self.max_lat.to_radians().sin() - self.min_lat.to_radians().sin();
        (EARTH_RADIUS_M * EARTH_RADIUS_M * delta_lon * band).abs()
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.6},{:.6},{:.6},{:.6}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes() {
        let region = Region::from_corners([10.5, 20.0], [10.0, 19.5]);
        assert_eq!(region, Region::new(10.0, 19.5, 10.5, 20.0));
    }

    #[test]
    fn test_validate() {
        assert!(Region::new(10.0, 10.0, 11.0, 11.0).validate().is_ok());
        assert!(Region::new(11.0, 10.0, 10.0, 11.0).validate().is_err());
        assert!(Region::new(10.0, 10.0, 10.0, 11.0).validate().is_err());
        assert!(Region::new(-181.0, 10.0, 10.0, 11.0).validate().is_err());
        assert!(Region::new(f64::NAN, 10.0, 10.0, 11.0).validate().is_err());
    }

    #[test]
    fn test_area_one_degree_at_equator() {
        // One degree square at the equator is roughly 111.2 km x 111.2 km.
        let area = Region::new(0.0, 0.0, 1.0, 1.0).area_sq_meters();
        assert!((area / 1e6 - 12_364.0).abs() < 10.0, "area was {}", area);
    }

    #[test]
    fn test_area_shrinks_towards_pole() {
        let equator = Region::new(0.0, 0.0, 1.0, 1.0).area_sq_meters();
        let north = Region::new(0.0, 60.0, 1.0, 61.0).area_sq_meters();
        assert!(north < equator * 0.55);
    }
}
