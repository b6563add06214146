//! Colors with straight (non-premultiplied) alpha

use serde::{Deserialize, Serialize};

/// RGBA color, every channel in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    /// Site palette
    pub const ROSE_GOLD: Rgba = Rgba::rgb8(183, 110, 121);
    pub const ROSE_LIGHT: Rgba = Rgba::rgb8(212, 145, 154);
    pub const TEAL: Rgba = Rgba::rgb8(0, 212, 170);
    pub const GOLD: Rgba = Rgba::rgb8(255, 215, 0);
    pub const PINK: Rgba = Rgba::rgb8(255, 107, 157);
    pub const LAVENDER: Rgba = Rgba::rgb8(240, 230, 255);
    pub const EMBER: Rgba = Rgba::rgb8(255, 107, 61);
    pub const AMBER: Rgba = Rgba::rgb8(255, 179, 71);
    pub const DEEP_SPACE: Rgba = Rgba::rgb8(5, 8, 24);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 8-bit channels
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Color from hue (degrees), saturation and lightness (percent), like CSS `hsl()`
    pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let s = (saturation / 100.0).clamp(0.0, 1.0);
        let l = (lightness / 100.0).clamp(0.0, 1.0);
        let h = hue.rem_euclid(360.0) / 60.0;

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = l - chroma / 2.0;
        Self::new(r + m, g + m, b + m, 1.0)
    }

    /// Same color with a different alpha (clamped to [0, 1])
    #[inline]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Same color with alpha scaled by `factor` (clamped to [0, 1])
    #[inline]
    pub fn fade(self, factor: f32) -> Self {
        self.with_alpha(self.a * factor)
    }

    /// CSS `rgba(...)` string for canvas fill/stroke styles
    pub fn to_css(&self) -> String {
        format!(
            "rgba({},{},{},{:.4})",
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            self.a.clamp(0.0, 1.0)
        )
    }
}
