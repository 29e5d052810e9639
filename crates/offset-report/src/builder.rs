//! Two-date offset report orchestration.

use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{info, instrument, warn};

use imagery::ImageSource;
use soc_common::{ObservationDate, PredictionSurface, Region, Result, SocError};
use soc_inference::{CarbonEstimator, InferenceConfig, Predictor, TilingEngine};

use crate::config::ReportConfig;
use crate::report::{DateEstimate, OffsetReport};
use crate::request::{ensure_ordered, ReportRequest};

/// Builds [`OffsetReport`]s from an injected image source and predictor.
///
/// The predictor is optional so a service can start without a model and
/// answer `ModelUnavailable` per request.
#[derive(Clone)]
pub struct OffsetReportBuilder {
    image_source: Arc<dyn ImageSource>,
    predictor: Option<Arc<dyn Predictor>>,
    engine: TilingEngine,
    estimator: CarbonEstimator,
    inference: InferenceConfig,
    report: ReportConfig,
}

impl OffsetReportBuilder {
    pub fn new(
        image_source: Arc<dyn ImageSource>,
        predictor: Option<Arc<dyn Predictor>>,
        inference: InferenceConfig,
        report: ReportConfig,
    ) -> Result<Self> {
        inference
            .validate()
            .map_err(SocError::invalid_configuration)?;
        report.validate().map_err(SocError::invalid_configuration)?;

        Ok(Self {
            image_source,
            predictor,
            engine: TilingEngine::new(inference.patch_size)?,
            estimator: CarbonEstimator::new(inference.soil),
            inference,
            report,
        })
    }

    pub fn has_model(&self) -> bool {
        self.predictor.is_some()
    }

    pub fn inference_config(&self) -> &InferenceConfig {
        &self.inference
    }

    pub fn report_config(&self) -> &ReportConfig {
        &self.report
    }

    /// Parse a raw request and build its report.
    pub async fn build_request(&self, request: &ReportRequest) -> Result<OffsetReport> {
        let parsed = request.parse()?;
        self.build(parsed.region, parsed.start, parsed.end).await
    }

    /// Estimate both dates concurrently and difference them.
    #[instrument(skip_all, fields(region = %region, start = %start, end = %end))]
    pub async fn build(
        &self,
        region: Region,
        start: ObservationDate,
        end: ObservationDate,
    ) -> Result<OffsetReport> {
        let started = Instant::now();
        let result = self.build_inner(region, start, end).await;
        histogram!("soc_report_seconds").record(started.elapsed().as_secs_f64());

        match &result {
            Ok(report) => {
                counter!("soc_reports_built_total").increment(1);
                info!(
                    offset_tons = report.offset_tons,
                    offset_value = report.offset_value,
                    flags = report.flags.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Offset report built"
                );
            }
            Err(e) => {
                counter!("soc_report_failures_total", "code" => e.error_code()).increment(1);
                warn!(error = %e, code = e.error_code(), "Offset report failed");
            }
        }

        result
    }

    async fn build_inner(
        &self,
        region: Region,
        start: ObservationDate,
        end: ObservationDate,
    ) -> Result<OffsetReport> {
        region.validate()?;
        ensure_ordered(start, end)?;
        let predictor = self
            .predictor
            .clone()
            .ok_or_else(|| SocError::model_unavailable("no predictor is loaded"))?;

        let both = async {
            tokio::try_join!(
                self.estimate_date(&region, start, Arc::clone(&predictor)),
                self.estimate_date(&region, end, Arc::clone(&predictor)),
            )
        };

        let (start_estimate, end_estimate) = match self.report.deadline() {
            Some(deadline) => tokio::time::timeout(deadline, both).await.map_err(|_| {
                SocError::DeadlineExceeded {
                    deadline_ms: deadline.as_millis() as u64,
                }
            })??,
            None => both.await?,
        };

        Ok(OffsetReport::from_estimates(
            region,
            start_estimate,
            end_estimate,
            &self.report,
        ))
    }

    /// Fetch, validate, tile, predict and estimate for one date.
    ///
    /// A raster smaller than one tile yields a zero estimate marked as too
    /// small rather than an error.
    #[instrument(skip_all, fields(date = %date))]
    pub async fn estimate_date(
        &self,
        region: &Region,
        date: ObservationDate,
        predictor: Arc<dyn Predictor>,
    ) -> Result<DateEstimate> {
        let raster = self.image_source.fetch(region, date).await?;
        self.inference.bands.ensure_matches(raster.bands())?;
        self.inference.ensure_gsd(raster.gsd_m())?;

        let (rows, cols) = (raster.rows(), raster.cols());
        let engine = self.engine;
        let predicted = tokio::task::spawn_blocking(move || {
            engine.tile_and_predict(raster, predictor.as_ref())
        })
        .await
        .map_err(|e| SocError::inference(format!("prediction task failed: {}", e)))?;

        let area = region.area_sq_meters();
        match predicted {
            Ok(surface) => {
                let estimate = self.estimator.estimate(surface, area);
                info!(
                    rows,
                    cols,
                    total_carbon_tons = estimate.total_carbon_tons,
                    contributing_pixels = estimate.contributing_pixels,
                    "Date estimate complete"
                );
                Ok(DateEstimate::new(date, estimate))
            }
            Err(SocError::RegionTooSmall { patch_size, .. }) => {
                warn!(rows, cols, patch_size, "Region too small to tile, using zero estimate");
                let estimate = self
                    .estimator
                    .estimate(PredictionSurface::zeros(rows, cols), area);
                Ok(DateEstimate::too_small(date, estimate))
            }
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for OffsetReportBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OffsetReportBuilder")
            .field("image_source", &self.image_source.name())
            .field(
                "predictor",
                &self.predictor.as_ref().map(|predictor| predictor.name()),
            )
            .field("inference", &self.inference)
            .field("report", &self.report)
            .finish()
    }
}
