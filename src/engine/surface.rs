//! Drawing surface contract
//!
//! The engine only draws through [`Surface`]; it never reads pixels back.
//! Implementations: [`RecordingSurface`] (headless, records calls),
//! [`super::raster::PixelSurface`] (software raster) and the wasm32 canvas
//! surface in `platform`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// How new drawing combines with what is already on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// Source-over: opaque shapes occlude
    #[default]
    Alpha,
    /// Colors sum (light sources, glows)
    Additive,
}

/// Color stop for radial gradients; `offset` in [0, 1] from inner to outer radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Sample a gradient at `t` in [0, 1], linearly interpolating between stops
pub fn sample_gradient(stops: &[GradientStop], t: f32) -> Rgba {
    let Some(first) = stops.first() else {
        return Rgba::TRANSPARENT;
    };
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let u = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            return Rgba::new(
                a.color.r + (b.color.r - a.color.r) * u,
                a.color.g + (b.color.g - a.color.g) * u,
                a.color.b + (b.color.b - a.color.b) * u,
                a.color.a + (b.color.a - a.color.a) * u,
            );
        }
    }
    stops[stops.len() - 1].color
}

/// A mutable 2D raster target
pub trait Surface {
    /// Current drawable size in pixels
    fn size(&self) -> Vec2;

    /// Change the drawable size (host resize)
    fn resize(&mut self, size: Vec2);

    /// Erase everything to transparent
    fn clear(&mut self);

    fn set_blend(&mut self, mode: BlendMode);

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);

    fn stroke_ellipse(&mut self, center: Vec2, radii: Vec2, width: f32, color: Rgba);

    /// Fill the disk of `outer` radius with a gradient running from `inner` to `outer`
    fn fill_radial_gradient(&mut self, center: Vec2, inner: f32, outer: f32, stops: &[GradientStop]);

    /// Marks the start of a depth layer; surfaces may ignore it
    fn begin_layer(&mut self, _depth: usize) {}

    /// Cover the whole surface with a translucent color (trail effect)
    fn fade(&mut self, color: Rgba) {
        self.set_blend(BlendMode::Alpha);
        let size = self.size();
        self.fill_rect(Vec2::ZERO, size, color);
    }
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Blend(BlendMode),
    Layer(usize),
    Rect {
        origin: Vec2,
        size: Vec2,
        color: Rgba,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
    Ellipse {
        center: Vec2,
        radii: Vec2,
        width: f32,
        color: Rgba,
    },
    Gradient {
        center: Vec2,
        inner: f32,
        outer: f32,
        stops: Vec<GradientStop>,
    },
}

/// Headless surface that records every call
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: Vec2,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain recorded commands (call between frames to bound memory)
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn resize(&mut self, size: Vec2) {
        self.size = size;
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn set_blend(&mut self, mode: BlendMode) {
        self.commands.push(DrawCommand::Blend(mode));
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        self.commands.push(DrawCommand::Rect { origin, size, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn stroke_ellipse(&mut self, center: Vec2, radii: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Ellipse {
            center,
            radii,
            width,
            color,
        });
    }

    fn fill_radial_gradient(&mut self, center: Vec2, inner: f32, outer: f32, stops: &[GradientStop]) {
        self.commands.push(DrawCommand::Gradient {
            center,
            inner,
            outer,
            stops: stops.to_vec(),
        });
    }

    fn begin_layer(&mut self, depth: usize) {
        self.commands.push(DrawCommand::Layer(depth));
    }
}
