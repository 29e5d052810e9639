//! Colour ramps for SOC surfaces.

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Yellow-to-green sequential ramp (ColorBrewer YlGn, 9 classes).
pub const YLGN: [Color; 9] = [
    Color::rgb(255, 255, 229),
    Color::rgb(247, 252, 185),
    Color::rgb(217, 240, 163),
    Color::rgb(173, 221, 142),
    Color::rgb(120, 198, 121),
    Color::rgb(65, 171, 93),
    Color::rgb(35, 132, 67),
    Color::rgb(0, 104, 55),
    Color::rgb(0, 69, 41),
];

/// Linear color interpolation
fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f32 * t_inv) + (color2.r as f32 * t)).round() as u8,
        ((color1.g as f32 * t_inv) + (color2.g as f32 * t)).round() as u8,
        ((color1.b as f32 * t_inv) + (color2.b as f32 * t)).round() as u8,
        ((color1.a as f32 * t_inv) + (color2.a as f32 * t)).round() as u8,
    )
}

/// Sample an evenly spaced ramp at `t` in `[0, 1]`.
pub fn ramp_color(stops: &[Color], t: f32) -> Color {
    match stops {
        [] => Color::transparent(),
        [only] => *only,
        _ => {
            let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
            let scaled = t * (stops.len() - 1) as f32;
            let lower = (scaled.floor() as usize).min(stops.len() - 2);
            interpolate_color(stops[lower], stops[lower + 1], scaled - lower as f32)
        }
    }
}

/// Maps SOC values onto the YlGn ramp between `vmin` and `vmax`.
///
/// Zero (unpredicted) and non-finite values are transparent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub vmin: f32,
    pub vmax: f32,
}

impl ColorScale {
    pub fn new(vmin: f32, vmax: f32) -> Self {
        Self { vmin, vmax }
    }

    /// Position of `value` on the scale, clamped to `[0, 1]`.
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.vmax - self.vmin;
        let range = if range.abs() < f32::EPSILON { 1.0 } else { range };
        ((value - self.vmin) / range).clamp(0.0, 1.0)
    }

    pub fn color(&self, value: f32) -> Color {
        if !value.is_finite() || value <= 0.0 {
            return Color::transparent();
        }
        ramp_color(&YLGN, self.normalize(value))
    }
}
