pub use kurbo::{Affine, Point, Size, Vec2};

/// Opaque 24-bit RGB color used for tints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Opaque white, the neutral tint.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a packed `0xRRGGBB` value. Bits above 24 are ignored.
    pub fn from_u32(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xff) as u8,
            g: ((v >> 8) & 0xff) as u8,
            b: (v & 0xff) as u8,
        }
    }

    /// Pack into `0xRRGGBB`.
    pub fn to_u32(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// Format as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Rgb8 {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Return `v` when finite, otherwise `fallback`.
pub(crate) fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}

/// Divide by a scale factor, treating a zero or non-finite scale as identity.
pub(crate) fn div_scale(v: f64, scale: f64) -> f64 {
    if scale == 0.0 || !scale.is_finite() {
        v
    } else {
        v / scale
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
