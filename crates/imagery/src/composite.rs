//! Per-pixel median compositing across scenes.

use ndarray::Array3;
use rayon::prelude::*;

use soc_common::{Result, SocError};

/// Median of the finite samples, or NaN when there are none.
///
/// An even count averages the two middle values.
pub fn nan_median(samples: &[f32]) -> f32 {
    let mut finite: Vec<f32> = samples.iter().copied().filter(|v| !v.is_nan()).collect();
    if finite.is_empty() {
        return f32::NAN;
    }
    finite.sort_by(f32::total_cmp);

    let mid = finite.len() / 2;
    if finite.len() % 2 == 1 {
        finite[mid]
    } else {
        (finite[mid - 1] + finite[mid]) / 2.0
    }
}

/// Combine same-shaped scenes into one array by per-pixel, per-band median.
///
/// NaN samples (masked cloud) are ignored. A pixel masked in every scene
/// stays NaN.
pub fn median_composite(scenes: &[Array3<f32>]) -> Result<Array3<f32>> {
    let first = scenes
        .first()
        .ok_or_else(|| SocError::image_source("no scenes to composite"))?;
    let shape = first.dim();

    if let Some(other) = scenes.iter().find(|scene| scene.dim() != shape) {
        return Err(SocError::image_source(format!(
            "scene shape {:?} does not match {:?}",
            other.dim(),
            shape
        )));
    }

    if scenes.len() == 1 {
        return Ok(first.clone());
    }

    let flattened: Vec<Vec<f32>> = scenes
        .iter()
        .map(|scene| scene.iter().copied().collect())
        .collect();
    let len = shape.0 * shape.1 * shape.2;

    let values: Vec<f32> = (0..len)
        .into_par_iter()
        .map_init(
            || Vec::with_capacity(flattened.len()),
            |samples, i| {
                samples.clear();
                samples.extend(flattened.iter().map(|scene| scene[i]));
                nan_median(samples)
            },
        )
        .collect();

    Ok(Array3::from_shape_vec(shape, values)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_median_odd_and_even() {
        assert_eq!(nan_median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(nan_median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
    }

    #[test]
    fn test_nan_median_ignores_nan() {
        assert_eq!(nan_median(&[f32::NAN, 5.0, 1.0]), 3.0);
        assert!(nan_median(&[f32::NAN, f32::NAN]).is_nan());
        assert!(nan_median(&[]).is_nan());
    }

    #[test]
    fn test_median_composite() {
        let a = Array3::from_elem((2, 2, 1), 1.0f32);
        let b = Array3::from_elem((2, 2, 1), 3.0f32);
        let mut c = Array3::from_elem((2, 2, 1), 10.0f32);
        c[[0, 0, 0]] = f32::NAN;

        let out = median_composite(&[a, b, c]).unwrap();
        assert_eq!(out[[0, 0, 0]], 2.0);
        assert_eq!(out[[1, 1, 0]], 3.0);
    }

    #[test]
    fn test_median_composite_shape_mismatch() {
        let a = Array3::<f32>::zeros((2, 2, 1));
        let b = Array3::<f32>::zeros((3, 2, 1));
        assert!(median_composite(&[a, b]).is_err());
        assert!(median_composite(&[]).is_err());
    }
}
