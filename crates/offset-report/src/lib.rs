//! Carbon offset reports over two observation dates.
//!
//! ```text
//! (region, start, end)
//!      │
//!      ├──────────────────────────────┐
//!      ▼                              ▼
//! estimate_date(start)           estimate_date(end)       (concurrent)
//!   fetch → bands → tile/predict → estimate
//!      │                              │
//!      └──────────────┬───────────────┘
//!                     ▼
//!     offset = end − start (signed), value = offset × price
//!                     ▼
//!               OffsetReport
//! ```

pub mod builder;
pub mod config;
pub mod report;
pub mod request;

pub use builder::OffsetReportBuilder;
pub use config::ReportConfig;
pub use report::{DateEstimate, OffsetReport, OffsetSummary, ReportFlag};
pub use request::{ParsedRequest, ReportRequest};
