//! Configuration for offset valuation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Valuation constants and request limits for report building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Monetary value of one ton of carbon.
    pub price_per_ton: f64,

    /// Tons per reported megaton.
    pub tons_per_megaton: f64,

    /// Abandon a report that takes longer than this (milliseconds).
    #[serde(default)]
    pub deadline_ms: Option<u64>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            price_per_ton: 5.0,
            tons_per_megaton: 1_000_000.0,
            deadline_ms: None,
        }
    }
}

impl ReportConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("CARBON_PRICE_PER_TON") {
            if let Ok(price) = val.parse() {
                config.price_per_ton = price;
            }
        }

        if let Ok(val) = std::env::var("TONS_PER_MEGATON") {
            if let Ok(scale) = val.parse() {
                config.tons_per_megaton = scale;
            }
        }

        if let Ok(val) = std::env::var("REPORT_DEADLINE_MS") {
            if let Ok(ms) = val.parse() {
                config.deadline_ms = Some(ms);
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.price_per_ton.is_finite() {
            return Err("price_per_ton must be finite".to_string());
        }

        if !(self.tons_per_megaton.is_finite() && self.tons_per_megaton > 0.0) {
            return Err("tons_per_megaton must be > 0".to_string());
        }

        if self.deadline_ms == Some(0) {
            return Err("deadline_ms must be > 0 when set".to_string());
        }

        Ok(())
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();
        assert_eq!(config.price_per_ton, 5.0);
        assert_eq!(config.tons_per_megaton, 1e6);
        assert!(config.deadline().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ReportConfig::default();
        config.tons_per_megaton = 0.0;
        assert!(config.validate().is_err());

        config = ReportConfig::default();
        config.price_per_ton = f64::NAN;
        assert!(config.validate().is_err());

        config = ReportConfig::default();
        config.deadline_ms = Some(0);
        assert!(config.validate().is_err());
    }
}
