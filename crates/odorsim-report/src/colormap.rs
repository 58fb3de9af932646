//! Sequential colormaps for dissimilarity heatmaps.
//!
//! Each map is a piecewise-linear ramp through a handful of control points
//! sampled from the reference palette.

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

const INFERNO: [(f64, [u8; 3]); 6] = [
    (0.0, [0, 0, 4]),
    (0.2, [50, 10, 94]),
    (0.4, [120, 28, 109]),
    (0.6, [188, 55, 84]),
    (0.8, [243, 119, 26]),
    (1.0, [252, 255, 164]),
];

const ROCKET: [(f64, [u8; 3]); 6] = [
    (0.0, [3, 5, 26]),
    (0.2, [76, 29, 75]),
    (0.4, [161, 26, 91]),
    (0.6, [228, 50, 64]),
    (0.8, [244, 133, 95]),
    (1.0, [250, 235, 221]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Colormap {
    Inferno,
    /// Inferno reversed: small distances bright
    InfernoR,
    Rocket,
}

impl Colormap {
    /// Color at `t` in [0, 1]; values outside are clamped.
    pub fn sample(&self, t: f64) -> RGBColor {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        match self {
            Colormap::Inferno => interpolate(&INFERNO, t),
            Colormap::InfernoR => interpolate(&INFERNO, 1.0 - t),
            Colormap::Rocket => interpolate(&ROCKET, t),
        }
    }

    /// Color for `value` on the [vmin, vmax] scale.
    pub fn sample_range(&self, value: f64, vmin: f64, vmax: f64) -> RGBColor {
        let span = vmax - vmin;
        let t = if span > 0.0 { (value - vmin) / span } else { 0.0 };
        self.sample(t)
    }
}

fn interpolate(stops: &[(f64, [u8; 3])], t: f64) -> RGBColor {
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
            return RGBColor(lerp(c0[0], c1[0]), lerp(c0[1], c1[1]), lerp(c0[2], c1[2]));
        }
    }
    let [r, g, b] = stops[stops.len() - 1].1;
    RGBColor(r, g, b)
}
