//! Stub predictors and image sources for pipeline tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use imagery::ImageSource;
use soc_common::{ObservationDate, RasterArray, Region, Result, SocError};
use soc_inference::{Predictor, TileBatch};

/// Returns each tile's batch index as its prediction.
///
/// Used to check that tile `k` of the batch lands on footprint `k`.
#[derive(Debug, Default)]
pub struct BatchIndexPredictor;

impl Predictor for BatchIndexPredictor {
    fn predict(&self, batch: &TileBatch) -> Result<Vec<f32>> {
        Ok((0..batch.len()).map(|k| k as f32).collect())
    }

    fn name(&self) -> &str {
        "batch-index"
    }
}

/// Returns the same value for every tile.
#[derive(Debug)]
pub struct ConstantPredictor(pub f32);

impl Predictor for ConstantPredictor {
    fn predict(&self, batch: &TileBatch) -> Result<Vec<f32>> {
        Ok(vec![self.0; batch.len()])
    }
}

/// Returns the top-left pixel of band 0 of each tile.
#[derive(Debug, Default)]
pub struct FirstPixelPredictor;

impl Predictor for FirstPixelPredictor {
    fn predict(&self, batch: &TileBatch) -> Result<Vec<f32>> {
        Ok(batch.iter().map(|tile| tile[[0, 0, 0]]).collect())
    }
}

/// Always fails with an inference error.
#[derive(Debug, Default)]
pub struct FailingPredictor;

impl Predictor for FailingPredictor {
    fn predict(&self, _batch: &TileBatch) -> Result<Vec<f32>> {
        Err(SocError::inference("stub predictor failure"))
    }
}

/// Returns one value fewer than the batch size.
#[derive(Debug, Default)]
pub struct ShortBatchPredictor;

impl Predictor for ShortBatchPredictor {
    fn predict(&self, batch: &TileBatch) -> Result<Vec<f32>> {
        Ok(vec![1.0; batch.len().saturating_sub(1)])
    }
}

/// Wraps another predictor and records every call.
#[derive(Debug)]
pub struct RecordingPredictor<P> {
    inner: P,
    calls: AtomicUsize,
    batch_sizes: Mutex<Vec<usize>>,
}

impl<P> RecordingPredictor<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            batch_sizes: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes
            .lock()
            .map(|sizes| sizes.clone())
            .unwrap_or_default()
    }
}

impl<P: Predictor> Predictor for RecordingPredictor<P> {
    fn predict(&self, batch: &TileBatch) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut sizes) = self.batch_sizes.lock() {
            sizes.push(batch.len());
        }
        self.inner.predict(batch)
    }
}

/// In-memory image source keyed by date.
///
/// Dates with no raster answer `NoImageryAvailable`.
#[derive(Debug, Default)]
pub struct StaticImageSource {
    rasters: HashMap<ObservationDate, RasterArray>,
    delay: Option<Duration>,
    fetches: AtomicUsize,
}

impl StaticImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raster(mut self, date: ObservationDate, raster: RasterArray) -> Self {
        self.rasters.insert(date, raster);
        self
    }

    /// Sleep this long before answering each fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageSource for StaticImageSource {
    async fn fetch(&self, _region: &Region, date: ObservationDate) -> Result<RasterArray> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.rasters
            .get(&date)
            .cloned()
            .ok_or_else(|| SocError::no_imagery(date.to_string(), "no scene in stub source"))
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::constant_raster;

    #[test]
    fn test_recording_predictor_counts_calls() {
        let predictor = RecordingPredictor::new(ConstantPredictor(2.0));
        let batch = TileBatch::new(ndarray::Array4::zeros((3, 2, 2, 1)));
        assert_eq!(predictor.predict(&batch).unwrap(), vec![2.0; 3]);
        assert_eq!(predictor.calls(), 1);
        assert_eq!(predictor.batch_sizes(), vec![3]);
    }

    #[tokio::test]
    async fn test_static_source_missing_date() {
        let date = ObservationDate::from_ymd(2024, 1, 1).unwrap();
        let other = ObservationDate::from_ymd(2024, 6, 1).unwrap();
        let source = StaticImageSource::new().with_raster(date, constant_raster(2, 2, 1, 1.0));
        let region = Region::new(0.0, 0.0, 1.0, 1.0);

        assert!(source.fetch(&region, date).await.is_ok());
        assert!(matches!(
            source.fetch(&region, other).await,
            Err(SocError::NoImageryAvailable { .. })
        ));
        assert_eq!(source.fetches(), 2);
    }
}
