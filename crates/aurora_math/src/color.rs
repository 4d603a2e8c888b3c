//! RGB color helpers.

use crate::{Interval, Vec3};

/// Color type alias (linear RGB, typically 0-1 but unbounded for radiance)
pub type Color = Vec3;

/// Post-processing and conversion operations on linear RGB colors.
pub trait ColorExt {
    /// Scale by `2^exposure` (photographic stops).
    fn apply_exposure(self, exposure: f32) -> Color;

    /// Raise each channel to `1 / gamma`. Non-positive channels map to 0.
    fn apply_gamma(self, gamma: f32) -> Color;

    /// Clip each channel to [0, 1].
    fn saturate(self) -> Color;

    /// Quantize to 8 bits per channel after clipping.
    fn to_rgb8(self) -> [u8; 3];

    fn is_black(self) -> bool;

    /// Rec. 709 relative luminance.
    fn luminance(self) -> f32;
}

impl ColorExt for Color {
    fn apply_exposure(self, exposure: f32) -> Color {
        self * exposure.exp2()
    }

    fn apply_gamma(self, gamma: f32) -> Color {
        let inv = 1.0 / gamma;
        let channel = |c: f32| if c > 0.0 { c.powf(inv) } else { 0.0 };
        Color::new(channel(self.x), channel(self.y), channel(self.z))
    }

    fn saturate(self) -> Color {
        Color::new(
            Interval::UNIT.clamp(self.x),
            Interval::UNIT.clamp(self.y),
            Interval::UNIT.clamp(self.z),
        )
    }

    fn to_rgb8(self) -> [u8; 3] {
        let c = self.saturate();
        [
            (c.x * 255.0) as u8,
            (c.y * 255.0) as u8,
            (c.z * 255.0) as u8,
        ]
    }

    fn is_black(self) -> bool {
        self.x <= 0.0 && self.y <= 0.0 && self.z <= 0.0
    }

    fn luminance(self) -> f32 {
        0.2126 * self.x + 0.7152 * self.y + 0.0722 * self.z
    }
}
