//! Image rendering for SOC prediction surfaces.
//!
//! - Colour ramp mapping (YlGn, zero = transparent)
//! - Two-panel start/end comparison maps with a shared scale
//! - Indexed / RGBA PNG encoding

pub mod colormap;
pub mod comparison;
pub mod error;
pub mod png;

pub use colormap::{Color, ColorScale};
pub use comparison::{
    compose_comparison, render_comparison, shared_scale, ComparisonImage, ComparisonOptions,
};
pub use error::{RenderError, Result};
pub use png::encode_png;
