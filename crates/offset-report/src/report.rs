//! Offset report types.

use serde::{Deserialize, Serialize};

use soc_common::{ObservationDate, Region};
use soc_inference::CarbonEstimate;

use crate::config::ReportConfig;

/// Conditions worth surfacing alongside an otherwise valid report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "flag")]
pub enum ReportFlag {
    /// The raster for `date` was smaller than one tile; its total is zero.
    RegionTooSmall { date: ObservationDate },
}

/// Carbon estimate for one nominal date.
#[derive(Debug, Clone)]
pub struct DateEstimate {
    pub date: ObservationDate,
    pub estimate: CarbonEstimate,
    /// Set when the raster could not hold a single tile.
    pub region_too_small: bool,
}

impl DateEstimate {
    pub fn new(date: ObservationDate, estimate: CarbonEstimate) -> Self {
        Self {
            date,
            estimate,
            region_too_small: false,
        }
    }

    pub fn too_small(date: ObservationDate, estimate: CarbonEstimate) -> Self {
        Self {
            date,
            estimate,
            region_too_small: true,
        }
    }

    pub fn total_carbon_tons(&self) -> f64 {
        self.estimate.total_carbon_tons
    }
}

/// Two-date carbon comparison for one region.
#[derive(Debug, Clone)]
pub struct OffsetReport {
    pub region: Region,
    pub start: DateEstimate,
    pub end: DateEstimate,
    /// `end − start` in tons; negative means carbon was lost.
    pub offset_tons: f64,
    pub offset_megatons: f64,
    pub start_megatons: f64,
    pub end_megatons: f64,
    pub offset_value: f64,
    pub flags: Vec<ReportFlag>,
    /// Always `None`: no settlement backend is wired in.
    pub transaction_hash: Option<String>,
}

impl OffsetReport {
    /// Difference two estimates and value the result.
    pub fn from_estimates(
        region: Region,
        start: DateEstimate,
        end: DateEstimate,
        config: &ReportConfig,
    ) -> Self {
        let offset_tons = end.total_carbon_tons() - start.total_carbon_tons();
        let scale = config.tons_per_megaton;

        let flags = [&start, &end]
            .into_iter()
            .filter(|estimate| estimate.region_too_small)
            .map(|estimate| ReportFlag::RegionTooSmall {
                date: estimate.date,
            })
            .collect();

        Self {
            region,
            offset_megatons: offset_tons / scale,
            start_megatons: start.total_carbon_tons() / scale,
            end_megatons: end.total_carbon_tons() / scale,
            offset_value: offset_tons * config.price_per_ton,
            offset_tons,
            start,
            end,
            flags,
            transaction_hash: None,
        }
    }

    pub fn has_flags(&self) -> bool {
        !self.flags.is_empty()
    }

    pub fn summary(&self) -> OffsetSummary {
        OffsetSummary {
            start_megatons: self.start_megatons,
            end_megatons: self.end_megatons,
            carbon_offset_megatons: self.offset_megatons,
            offset_value: self.offset_value,
            transaction_hash: self.transaction_hash.clone(),
            flags: self.flags.clone(),
        }
    }
}

/// Consumer view of a report.
///
/// `transaction_hash` is serialized as `null`; it never signals a settled
/// transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetSummary {
    pub start_megatons: f64,
    pub end_megatons: f64,
    pub carbon_offset_megatons: f64,
    pub offset_value: f64,
    pub transaction_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<ReportFlag>,
}
