//! Multi-band imagery rasters and per-pixel prediction surfaces.

use ndarray::{s, Array2, Array3, ArrayView2, ArrayView3};

use crate::error::{Result, SocError};

/// A multi-band raster indexed `[row, col, band]`.
///
/// Row 0 is the northern edge. All bands share the same row/col extent.
#[derive(Debug, Clone)]
pub struct RasterArray {
    data: Array3<f32>,
    bands: Vec<String>,
    /// Ground sampling distance in meters per pixel.
    gsd_m: f64,
}

impl RasterArray {
    /// Wrap an array, checking that the band axis matches the band names.
    pub fn new(data: Array3<f32>, bands: Vec<String>, gsd_m: f64) -> Result<Self> {
        let (_, _, band_count) = data.dim();
        if band_count != bands.len() {
            return Err(SocError::invalid_configuration(format!(
                "raster has {} band planes but {} band names",
                band_count,
                bands.len()
            )));
        }
        if !(gsd_m.is_finite() && gsd_m > 0.0) {
            return Err(SocError::invalid_configuration(format!(
                "ground sampling distance must be positive, got {}",
                gsd_m
            )));
        }

        Ok(Self { data, bands, gsd_m })
    }

    /// Build from a band-interleaved-by-pixel buffer in row-major order.
    pub fn from_interleaved(
        values: Vec<f32>,
        rows: usize,
        cols: usize,
        bands: Vec<String>,
        gsd_m: f64,
    ) -> Result<Self> {
        let data = Array3::from_shape_vec((rows, cols, bands.len()), values)?;
        Self::new(data, bands, gsd_m)
    }

    pub fn rows(&self) -> usize {
        self.data.dim().0
    }

    pub fn cols(&self) -> usize {
        self.data.dim().1
    }

    pub fn band_count(&self) -> usize {
        self.data.dim().2
    }

    pub fn bands(&self) -> &[String] {
        &self.bands
    }

    pub fn gsd_m(&self) -> f64 {
        self.gsd_m
    }

    pub fn data(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }

    /// Single band plane as a `[row, col]` view.
    pub fn band(&self, name: &str) -> Option<ArrayView2<'_, f32>> {
        let index = self.bands.iter().position(|band| band == name)?;
        Some(self.data.slice(s![.., .., index]))
    }

    /// Replace every NaN with zero and return how many were replaced.
    ///
    /// Imagery gaps are treated as "no signal" rather than missing data.
    pub fn sanitize_nan(&mut self) -> usize {
        let mut replaced = 0;
        self.data.map_inplace(|value| {
            if value.is_nan() {
                *value = 0.0;
                replaced += 1;
            }
        });
        replaced
    }
}

/// One scalar per raster pixel; zero means "unpredicted".
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionSurface {
    values: Array2<f32>,
}

impl PredictionSurface {
    /// An all-zero surface with the given extent.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            values: Array2::zeros((rows, cols)),
        }
    }

    pub fn from_array(values: Array2<f32>) -> Self {
        Self { values }
    }

    pub fn rows(&self) -> usize {
        self.values.dim().0
    }

    pub fn cols(&self) -> usize {
        self.values.dim().1
    }

    pub fn values(&self) -> ArrayView2<'_, f32> {
        self.values.view()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.values.get((row, col)).copied()
    }

    /// Broadcast `value` over the square block starting at (`row`, `col`).
    ///
    /// The block is clipped to the surface extent.
    pub fn fill_block(&mut self, row: usize, col: usize, size: usize, value: f32) {
        let row_end = (row + size).min(self.rows());
        let col_end = (col + size).min(self.cols());
        if row >= row_end || col >= col_end {
            return;
        }
        self.values
            .slice_mut(s![row..row_end, col..col_end])
            .fill(value);
    }

    /// Iterator over strictly positive pixel values.
    pub fn positive_values(&self) -> impl Iterator<Item = f32> + '_ {
        self.values.iter().copied().filter(|value| *value > 0.0)
    }

    pub fn positive_count(&self) -> usize {
        self.positive_values().count()
    }

    pub fn has_positive(&self) -> bool {
        self.values.iter().any(|value| *value > 0.0)
    }

    /// Smallest strictly positive value, if any pixel is positive.
    pub fn min_positive(&self) -> Option<f32> {
        self.positive_values().reduce(f32::min)
    }

    /// Largest value over the whole surface (0 for an empty surface).
    pub fn max_value(&self) -> f32 {
        self.values.iter().copied().fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band_names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("B{}", i)).collect()
    }

    #[test]
    fn test_band_count_must_match_names() {
        let data = Array3::<f32>::zeros((4, 4, 3));
        assert!(RasterArray::new(data.clone(), band_names(3), 30.0).is_ok());
        assert!(RasterArray::new(data, band_names(2), 30.0).is_err());
    }

    #[test]
    fn test_from_interleaved_layout() {
        // 1 row, 2 cols, 2 bands: pixel 0 = (1, 2), pixel 1 = (3, 4)
        let raster =
            RasterArray::from_interleaved(vec![1.0, 2.0, 3.0, 4.0], 1, 2, band_names(2), 30.0)
                .unwrap();
        assert_eq!(raster.data()[[0, 1, 0]], 3.0);
        assert_eq!(raster.band("B1").unwrap()[[0, 0]], 2.0);
    }

    #[test]
    fn test_sanitize_nan() {
        let mut raster = RasterArray::from_interleaved(
            vec![f32::NAN, 1.0, f32::NAN, 2.0],
            2,
            2,
            band_names(1),
            30.0,
        )
        .unwrap();
        assert_eq!(raster.sanitize_nan(), 2);
        assert!(raster.data().iter().all(|value| value.is_finite()));
        assert_eq!(raster.data()[[0, 0, 0]], 0.0);
        assert_eq!(raster.data()[[1, 1, 0]], 2.0);
    }

    #[test]
    fn test_fill_block_clips_to_extent() {
        let mut surface = PredictionSurface::zeros(3, 3);
        surface.fill_block(2, 2, 4, 1.5);
        assert_eq!(surface.get(2, 2), Some(1.5));
        assert_eq!(surface.positive_count(), 1);
    }

    #[test]
    fn test_surface_statistics() {
        let mut surface = PredictionSurface::zeros(2, 2);
        assert!(!surface.has_positive());
        assert_eq!(surface.min_positive(), None);

        surface.fill_block(0, 0, 1, 0.4);
        surface.fill_block(1, 1, 1, 0.1);
        assert_eq!(surface.min_positive(), Some(0.1));
        assert_eq!(surface.max_value(), 0.4);
    }
}
