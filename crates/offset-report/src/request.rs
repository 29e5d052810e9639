//! Report request parsing.

use serde::{Deserialize, Serialize};

use soc_common::{ObservationDate, Region, Result, SocError};

/// Raw report request as submitted by a client.
///
/// `coords` holds `[lon, lat]` corner points; the region is their bounding
/// rectangle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    pub coords: Vec<[f64; 2]>,
    pub start_date: String,
    pub end_date: String,
}

/// A validated request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedRequest {
    pub region: Region,
    pub start: ObservationDate,
    pub end: ObservationDate,
}

impl ReportRequest {
    pub fn new(
        coords: Vec<[f64; 2]>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            coords,
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    /// Parse the region and dates, rejecting malformed input.
    pub fn parse(&self) -> Result<ParsedRequest> {
        let region = region_from_points(&self.coords)?;
        let start = ObservationDate::parse(&self.start_date)?;
        let end = ObservationDate::parse(&self.end_date)?;
        ensure_ordered(start, end)?;

        Ok(ParsedRequest { region, start, end })
    }
}

/// Bounding rectangle of at least two `[lon, lat]` points.
pub fn region_from_points(points: &[[f64; 2]]) -> Result<Region> {
    let (first, rest) = match points {
        [first, rest @ ..] if !rest.is_empty() => (first, rest),
        _ => {
            return Err(SocError::invalid_configuration(format!(
                "region needs at least two corner points, got {}",
                points.len()
            )))
        }
    };

    let region = rest
        .iter()
        .fold(Region::from_corners(*first, *first), |acc, point| {
            Region::new(
                acc.min_lon.min(point[0]),
                acc.min_lat.min(point[1]),
                acc.max_lon.max(point[0]),
                acc.max_lat.max(point[1]),
            )
        });

    region.validate()?;
    Ok(region)
}

/// Start may equal end; start after end is rejected.
pub fn ensure_ordered(start: ObservationDate, end: ObservationDate) -> Result<()> {
    if start > end {
        return Err(SocError::invalid_configuration(format!(
            "start date {} is after end date {}",
            start, end
        )));
    }
    Ok(())
}
