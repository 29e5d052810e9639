//! Fixed-size tiling of rasters and reassembly of per-tile predictions.
//!
//! Tiles are cut on a grid of stride `patch_size` starting at (0, 0), with no
//! overlap and no padding. Rows or columns left over when the extent is not a
//! multiple of `patch_size` are never tiled and stay zero in the surface.
//! This underestimates coverage near region edges; downstream averaging
//! relies on exactly this behaviour.

use std::time::Instant;

use metrics::{counter, histogram};
use ndarray::{s, Array4};
use tracing::{debug, instrument};

use soc_common::{PredictionSurface, RasterArray, Result, SocError};

use crate::predictor::{Predictor, TileBatch};

/// Position of one tile in the grid scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileOrigin {
    /// Position in the row-major scan, equal to the batch index.
    pub index: usize,
    pub grid_row: usize,
    pub grid_col: usize,
    /// Top-left pixel row.
    pub row: usize,
    /// Top-left pixel column.
    pub col: usize,
}

/// The tile layout for one raster extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    rows: usize,
    cols: usize,
    patch_size: usize,
    tile_rows: usize,
    tile_cols: usize,
}

impl TileGrid {
    /// Lay out tiles over a `rows` x `cols` raster.
    ///
    /// Fails with `RegionTooSmall` when not even one tile fits.
    pub fn new(rows: usize, cols: usize, patch_size: usize) -> Result<Self> {
        if patch_size == 0 {
            return Err(SocError::invalid_configuration("patch size must be > 0"));
        }
        if rows < patch_size || cols < patch_size {
            return Err(SocError::region_too_small(rows, cols, patch_size));
        }

        Ok(Self {
            rows,
            cols,
            patch_size,
            tile_rows: rows / patch_size,
            tile_cols: cols / patch_size,
        })
    }

    pub fn patch_size(&self) -> usize {
        self.patch_size
    }

    /// Tiles per column of the grid.
    pub fn tile_rows(&self) -> usize {
        self.tile_rows
    }

    /// Tiles per row of the grid.
    pub fn tile_cols(&self) -> usize {
        self.tile_cols
    }

    pub fn len(&self) -> usize {
        self.tile_rows * self.tile_cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pixels in the remainder strips that no tile covers.
    pub fn uncovered_pixels(&self) -> usize {
        let covered = self.len() * self.patch_size * self.patch_size;
        self.rows * self.cols - covered
    }

    /// Tile origins in row-major order: increasing row, then increasing column.
    ///
    /// Both batch construction and surface assembly enumerate tiles through
    /// this iterator, so batch index and footprint always correspond.
    pub fn origins(&self) -> impl Iterator<Item = TileOrigin> + '_ {
        let tile_cols = self.tile_cols;
        let patch = self.patch_size;
        (0..self.len()).map(move |index| {
            let grid_row = index / tile_cols;
            let grid_col = index % tile_cols;
            TileOrigin {
                index,
                grid_row,
                grid_col,
                row: grid_row * patch,
                col: grid_col * patch,
            }
        })
    }
}

/// Cuts rasters into tiles, runs the predictor once, and rebuilds a surface.
#[derive(Debug, Clone, Copy)]
pub struct TilingEngine {
    patch_size: usize,
}

impl TilingEngine {
    pub fn new(patch_size: usize) -> Result<Self> {
        if patch_size == 0 {
            return Err(SocError::invalid_configuration("patch size must be > 0"));
        }
        Ok(Self { patch_size })
    }

    pub fn patch_size(&self) -> usize {
        self.patch_size
    }

    /// Run the full tile → batch predict → assemble pipeline.
    #[instrument(
        skip_all,
        fields(rows = raster.rows(), cols = raster.cols(), patch = self.patch_size)
    )]
    pub fn tile_and_predict(
        &self,
        mut raster: RasterArray,
        predictor: &dyn Predictor,
    ) -> Result<PredictionSurface> {
        if raster.band_count() == 0 {
            return Err(SocError::invalid_configuration("raster has no bands"));
        }

        let replaced = raster.sanitize_nan();
        if replaced > 0 {
            debug!(replaced, "Replaced NaN pixels with zero before tiling");
        }

        let grid = TileGrid::new(raster.rows(), raster.cols(), self.patch_size)?;
        let batch = self.extract_batch(&raster, &grid);

        let started = Instant::now();
        let predictions = predictor.predict(&batch)?;
        let elapsed = started.elapsed();

        histogram!("soc_inference_seconds").record(elapsed.as_secs_f64());
        counter!("soc_tiles_predicted_total").increment(batch.len() as u64);
        debug!(
            tiles = batch.len(),
            uncovered_pixels = grid.uncovered_pixels(),
            model = predictor.name(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Batch prediction complete"
        );

        assemble(&grid, raster.rows(), raster.cols(), &predictions)
    }

    /// Copy every tile of `grid` out of the raster into one batch.
    pub fn extract_batch(&self, raster: &RasterArray, grid: &TileGrid) -> TileBatch {
        let patch = grid.patch_size();
        let data = raster.data();
        let mut tiles = Array4::<f32>::zeros((grid.len(), patch, patch, raster.band_count()));

        for origin in grid.origins() {
            let source = data.slice(s![
                origin.row..origin.row + patch,
                origin.col..origin.col + patch,
                ..
            ]);
            tiles
                .slice_mut(s![origin.index, .., .., ..])
                .assign(&source);
        }

        TileBatch::new(tiles)
    }
}

/// Broadcast `predictions[k]` over the footprint of tile `k`.
pub fn assemble(
    grid: &TileGrid,
    rows: usize,
    cols: usize,
    predictions: &[f32],
) -> Result<PredictionSurface> {
    if predictions.len() != grid.len() {
        return Err(SocError::inference(format!(
            "predictor returned {} values for {} tiles",
            predictions.len(),
            grid.len()
        )));
    }

    let mut surface = PredictionSurface::zeros(rows, cols);
    for origin in grid.origins() {
        surface.fill_block(
            origin.row,
            origin.col,
            grid.patch_size(),
            predictions[origin.index],
        );
    }

    Ok(surface)
}

/// Tile `raster` with `patch_size` squares and predict each tile.
pub fn tile_and_predict(
    raster: RasterArray,
    patch_size: usize,
    predictor: &dyn Predictor,
) -> Result<PredictionSurface> {
    TilingEngine::new(patch_size)?.tile_and_predict(raster, predictor)
}
