//! Test support for the SOC offset crates.
//!
//! - [`generators`]: synthetic rasters in the pipeline band layout
//! - [`stubs`]: predictors and image sources with scripted behaviour
//! - [`fixtures`]: named regions and observation dates
//!
//! Pulled in as a dev-dependency only:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod stubs;

pub use fixtures::*;
pub use generators::*;
pub use stubs::*;

/// Assert two numbers differ by no more than `epsilon`.
///
/// Operands are widened to `f64`, so `f32` surface values compare directly
/// against `f64` expectations.
///
/// ```ignore
/// assert_approx_eq!(report.offset_tons, 0.98, 1e-6);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr, $epsilon:expr) => {{
        let actual = $actual as f64;
        let expected = $expected as f64;
        let epsilon = $epsilon as f64;
        if !((actual - expected).abs() <= epsilon) {
            panic!(
                "assertion failed: {} = {:?}, expected {:?} within {:?}",
                stringify!($actual),
                actual,
                expected,
                epsilon
            );
        }
    }};
}
