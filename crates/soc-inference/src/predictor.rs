//! Predictor capability and the tile batches it consumes.

use ndarray::{Array4, ArrayView3, ArrayView4, Axis};

use soc_common::Result;

/// A batch of equally sized tiles indexed `[tile, row, col, band]`.
///
/// Tile `k` is the k-th tile of the row-major grid scan.
#[derive(Debug, Clone)]
pub struct TileBatch {
    tiles: Array4<f32>,
}

impl TileBatch {
    pub fn new(tiles: Array4<f32>) -> Self {
        Self { tiles }
    }

    /// Number of tiles in the batch.
    pub fn len(&self) -> usize {
        self.tiles.dim().0
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Edge length of each tile in pixels.
    pub fn patch_size(&self) -> usize {
        self.tiles.dim().1
    }

    pub fn band_count(&self) -> usize {
        self.tiles.dim().3
    }

    pub fn tile(&self, index: usize) -> ArrayView3<'_, f32> {
        self.tiles.index_axis(Axis(0), index)
    }

    pub fn tiles(&self) -> ArrayView4<'_, f32> {
        self.tiles.view()
    }

    pub fn iter(&self) -> impl Iterator<Item = ArrayView3<'_, f32>> {
        self.tiles.outer_iter()
    }
}

/// Opaque patch-level regression model.
///
/// Implementations must return exactly one scalar per tile, in batch order.
/// They may block for a long time; callers run them off the async executor.
pub trait Predictor: Send + Sync {
    /// Predict one SOC value per tile.
    fn predict(&self, batch: &TileBatch) -> Result<Vec<f32>>;

    /// Human-readable model name for logs.
    fn name(&self) -> &str {
        "predictor"
    }
}
