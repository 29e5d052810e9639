//! Spectral indices derived from Sentinel-2 reflectance.

use ndarray::{s, Array3, ArrayView3, Axis};

use crate::scene::REFLECTANCE_BANDS;

/// Bands produced by [`add_indices`], in order.
pub const INDEXED_BANDS: [&str; 8] = ["B2", "B3", "B4", "B8", "B11", "NDVI", "SAVI", "BSI"];

/// Soil brightness correction factor for SAVI.
pub const SAVI_L: f32 = 0.5;

const BLUE: usize = 0;
const RED: usize = 2;
const NIR: usize = 3;
const SWIR: usize = 4;

fn ratio(numerator: f32, denominator: f32) -> f32 {
    if denominator == 0.0 {
        f32::NAN
    } else {
        numerator / denominator
    }
}

/// Normalized difference vegetation index: `(NIR − RED) / (NIR + RED)`.
pub fn ndvi(nir: f32, red: f32) -> f32 {
    ratio(nir - red, nir + red)
}

/// Soil adjusted vegetation index with L = 0.5.
pub fn savi(nir: f32, red: f32) -> f32 {
    ratio(nir - red, nir + red + SAVI_L) * (1.0 + SAVI_L)
}

/// Bare soil index: `((SWIR + RED) − (NIR + BLUE)) / ((SWIR + RED) + (NIR + BLUE))`.
pub fn bsi(swir: f32, red: f32, nir: f32, blue: f32) -> f32 {
    let soil = swir + red;
    let vegetation = nir + blue;
    ratio(soil - vegetation, soil + vegetation)
}

/// Append NDVI, SAVI and BSI planes to a reflectance array.
///
/// Input bands follow [`REFLECTANCE_BANDS`]; output follows [`INDEXED_BANDS`].
/// A zero denominator yields NaN.
pub fn add_indices(reflectance: ArrayView3<'_, f32>) -> Array3<f32> {
    let (rows, cols, _) = reflectance.dim();
    let base = REFLECTANCE_BANDS.len();
    let mut out = Array3::<f32>::zeros((rows, cols, INDEXED_BANDS.len()));
    out.slice_mut(s![.., .., ..base])
        .assign(&reflectance.slice(s![.., .., ..base]));

    for (mut pixel, source) in out
        .lanes_mut(Axis(2))
        .into_iter()
        .zip(reflectance.lanes(Axis(2)))
    {
        let (blue, red, nir, swir) = (source[BLUE], source[RED], source[NIR], source[SWIR]);
        pixel[base] = ndvi(nir, red);
        pixel[base + 1] = savi(nir, red);
        pixel[base + 2] = bsi(swir, red, nir, blue);
    }

    out
}
