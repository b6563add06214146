//! Software raster surface
//!
//! Linear RGBA f32 buffer with real alpha and additive blending. Good enough
//! for the headless runner and for tests that need to see actual light
//! accumulation; browsers use the canvas surface instead.

use glam::Vec2;

use super::surface::{BlendMode, GradientStop, Surface, sample_gradient};
use crate::color::Rgba;

/// Premultiplied-free RGBA pixel buffer
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
    blend: BlendMode,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 4]; (width as usize) * (height as usize)],
            blend: BlendMode::Alpha,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at (x, y), `None` when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let [r, g, b, a] = self.pixels[(y * self.width + x) as usize];
        Some(Rgba::new(r, g, b, a))
    }

    /// Mean luminance over the whole buffer, handy for smoke checks
    pub fn mean_luminance(&self) -> f32 {
        if self.pixels.is_empty() {
            return 0.0;
        }
        let total: f32 = self
            .pixels
            .iter()
            .map(|[r, g, b, _]| 0.2126 * r + 0.7152 * g + 0.0722 * b)
            .sum();
        total / self.pixels.len() as f32
    }

    /// 8-bit RGBA bytes, row-major
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|px| px.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
            .collect()
    }

    #[inline]
    fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let alpha = (color.a * coverage).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let px = &mut self.pixels[(y as u32 * self.width + x as u32) as usize];
        match self.blend {
            BlendMode::Alpha => {
                px[0] = color.r * alpha + px[0] * (1.0 - alpha);
                px[1] = color.g * alpha + px[1] * (1.0 - alpha);
                px[2] = color.b * alpha + px[2] * (1.0 - alpha);
                px[3] = alpha + px[3] * (1.0 - alpha);
            }
            BlendMode::Additive => {
                px[0] = (px[0] + color.r * alpha).min(1.0);
                px[1] = (px[1] + color.g * alpha).min(1.0);
                px[2] = (px[2] + color.b * alpha).min(1.0);
                px[3] = (px[3] + alpha).min(1.0);
            }
        }
    }

    /// Pixel-space bounding box of a disk, clipped to the surface
    fn clip_box(&self, center: Vec2, radius: Vec2) -> Option<(i32, i32, i32, i32)> {
        let x0 = ((center.x - radius.x).floor() as i32).max(0);
        let y0 = ((center.y - radius.y).floor() as i32).max(0);
        let x1 = ((center.x + radius.x).ceil() as i32).min(self.width as i32 - 1);
        let y1 = ((center.y + radius.y).ceil() as i32).min(self.height as i32 - 1);
        (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
    }
}

impl Surface for PixelSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    fn resize(&mut self, size: Vec2) {
        let width = size.x.max(0.0).round() as u32;
        let height = size.y.max(0.0).round() as u32;
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![[0.0; 4]; (width as usize) * (height as usize)];
    }

    fn clear(&mut self) {
        self.pixels.fill([0.0; 4]);
    }

    fn set_blend(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        let x0 = (origin.x.floor() as i32).max(0);
        let y0 = (origin.y.floor() as i32).max(0);
        let x1 = ((origin.x + size.x).ceil() as i32).min(self.width as i32);
        let y1 = ((origin.y + size.y).ceil() as i32).min(self.height as i32);
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_pixel(x, y, color, 1.0);
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        // Sub-pixel stars still leave a mark
        let radius = radius.max(0.5);
        let Some((x0, y0, x1, y1)) = self.clip_box(center, Vec2::splat(radius)) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_pixel(x, y, color, coverage);
                }
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let delta = to - from;
        let steps = delta.length().ceil().max(1.0) as u32;
        // Hairlines get proportionally less coverage instead of vanishing
        let coverage = width.clamp(0.0, 1.0);
        let half = (width * 0.5).max(0.5);
        for i in 0..=steps {
            let p = from + delta * (i as f32 / steps as f32);
            if half <= 0.5 {
                self.blend_pixel(p.x.floor() as i32, p.y.floor() as i32, color, coverage);
            } else {
                self.fill_circle(p, half, color);
            }
        }
    }

    fn stroke_ellipse(&mut self, center: Vec2, radii: Vec2, width: f32, color: Rgba) {
        let circumference = std::f32::consts::TAU * radii.x.max(radii.y);
        let steps = circumference.ceil().max(8.0) as u32;
        let half = (width * 0.5).max(0.5);
        for i in 0..steps {
            let theta = i as f32 / steps as f32 * std::f32::consts::TAU;
            let p = center + Vec2::new(theta.cos() * radii.x, theta.sin() * radii.y);
            self.fill_circle(p, half, color);
        }
    }

    fn fill_radial_gradient(&mut self, center: Vec2, inner: f32, outer: f32, stops: &[GradientStop]) {
        let Some((x0, y0, x1, y1)) = self.clip_box(center, Vec2::splat(outer)) else {
            return;
        };
        let span = (outer - inner).max(f32::EPSILON);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                if d > outer {
                    continue;
                }
                let t = ((d - inner) / span).clamp(0.0, 1.0);
                self.blend_pixel(x, y, sample_gradient(stops, t), 1.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_additive_accumulates() {
        let mut surface = PixelSurface::new(8, 8);
        surface.set_blend(BlendMode::Additive);
        let dim = Rgba::new(0.3, 0.3, 0.3, 1.0);
        surface.fill_rect(Vec2::ZERO, Vec2::splat(8.0), dim);
        surface.fill_rect(Vec2::ZERO, Vec2::splat(8.0), dim);
        let px = surface.pixel(4, 4).unwrap_or(Rgba::TRANSPARENT);
        assert!((px.r - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_alpha_occludes() {
        let mut surface = PixelSurface::new(8, 8);
        surface.set_blend(BlendMode::Additive);
        surface.fill_rect(Vec2::ZERO, Vec2::splat(8.0), Rgba::WHITE);
        surface.set_blend(BlendMode::Alpha);
        surface.fill_circle(Vec2::splat(4.0), 3.0, Rgba::BLACK);
        let px = surface.pixel(4, 4).unwrap_or(Rgba::WHITE);
        assert!(px.r < 1e-5);
        // Corner is outside the disk and keeps the additive white
        let corner = surface.pixel(0, 0).unwrap_or(Rgba::TRANSPARENT);
        assert!((corner.r - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_fade_darkens_toward_color() {
        let mut surface = PixelSurface::new(4, 4);
        surface.fill_rect(Vec2::ZERO, Vec2::splat(4.0), Rgba::WHITE);
        for _ in 0..100 {
            surface.fade(Rgba::BLACK.with_alpha(0.15));
        }
        assert!(surface.mean_luminance() < 0.01);
    }

    #[test]
    fn test_resize_reallocates() {
        let mut surface = PixelSurface::new(4, 4);
        surface.resize(Vec2::new(10.0, 6.0));
        assert_eq!((surface.width(), surface.height()), (10, 6));
        assert_eq!(surface.to_rgba8().len(), 10 * 6 * 4);
        assert!(surface.pixel(9, 5).is_some());
        assert!(surface.pixel(10, 5).is_none());
    }

    #[test]
    fn test_drawing_off_surface_is_ignored() {
        let mut surface = PixelSurface::new(4, 4);
        surface.fill_circle(Vec2::new(-100.0, -100.0), 5.0, Rgba::WHITE);
        surface.fill_radial_gradient(
            Vec2::new(500.0, 500.0),
            0.0,
            10.0,
            &[GradientStop::new(0.0, Rgba::WHITE)],
        );
        assert_eq!(surface.mean_luminance(), 0.0);
    }
}
