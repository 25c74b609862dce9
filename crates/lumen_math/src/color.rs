//! HSV color helpers used for procedural material colors.

use glam::Vec3;
use rand::Rng;

use crate::sampling::random_range;

/// Sampling bounds for a random HSV color.
///
/// Values above 1.0 are allowed for `value` and produce HDR colors,
/// which is how emissive intensities are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HsvRange {
    pub hue: (f32, f32),
    pub saturation: (f32, f32),
    pub value: (f32, f32),
}

impl HsvRange {
    /// Full hue/saturation range with value in `[min, max]`.
    pub fn with_value(min: f32, max: f32) -> Self {
        Self {
            value: (min, max),
            ..Self::default()
        }
    }
}

impl Default for HsvRange {
    fn default() -> Self {
        Self {
            hue: (0.0, 1.0),
            saturation: (0.0, 1.0),
            value: (0.0, 1.0),
        }
    }
}

/// Convert HSV (all components nominally in [0, 1]) to linear RGB.
///
/// `v` is not clamped, so `v > 1` scales the result past 1.0.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let h = h.rem_euclid(1.0) * 6.0;
    let sector = h.floor();
    let f = h - sector;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector as u32 {
        0 => Vec3::new(v, t, p),
        1 => Vec3::new(q, v, p),
        2 => Vec3::new(p, v, t),
        3 => Vec3::new(p, q, v),
        4 => Vec3::new(t, p, v),
        _ => Vec3::new(v, p, q),
    }
}

/// Draw a random color; hue, saturation and value are sampled in that order.
pub fn random_hsv<R: Rng + ?Sized>(rng: &mut R, range: HsvRange) -> Vec3 {
    let h = random_range(rng, range.hue.0, range.hue.1);
    let s = random_range(rng, range.saturation.0, range.saturation.1);
    let v = random_range(rng, range.value.0, range.value.1);
    hsv_to_rgb(h, s, v)
}
