//! Common fixtures for SOC pipeline tests.

use soc_common::{ObservationDate, Region};

/// Common regions of interest.
pub mod regions {
    /// A ~1 km square farm plot in the Po valley.
    pub const FARM_PLOT: (f64, f64, f64, f64) = (9.10, 45.20, 9.11, 45.21);

    /// A plot straddling the equator.
    pub const EQUATORIAL: (f64, f64, f64, f64) = (30.0, -0.005, 30.01, 0.005);

    /// Inverted corners (min > max).
    pub const INVERTED: (f64, f64, f64, f64) = (10.0, 10.0, 5.0, 5.0);
}

/// Common nominal dates.
pub mod dates {
    pub const START: &str = "2023-06-15";
    pub const END: &str = "2024-06-15";
}

pub fn region(bbox: (f64, f64, f64, f64)) -> Region {
    Region::new(bbox.0, bbox.1, bbox.2, bbox.3)
}

/// Parse a fixture date; panics on malformed input.
pub fn date(s: &str) -> ObservationDate {
    ObservationDate::parse(s).expect("fixture date is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_valid() {
        assert!(region(regions::FARM_PLOT).validate().is_ok());
        assert!(region(regions::EQUATORIAL).validate().is_ok());
        assert!(region(regions::INVERTED).validate().is_err());
        assert!(date(dates::START) < date(dates::END));
    }
}
