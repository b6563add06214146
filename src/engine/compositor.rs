//! Back-to-front layer compositing
//!
//! Layers are drawn strictly in slice order. Each layer sets its own blend
//! mode first, so nothing drawn for a back layer can land on top of a front
//! one regardless of what the layers contain.

use glam::Vec2;

use super::decoration::FrameContext;
use super::layer::{Layer, RenderStyle};
use super::particle::Particle;
use super::surface::{GradientStop, Surface};
use crate::wrap_coord;

/// Parallax shift for a layer: pointer × sensitivity × surface size
#[inline]
pub fn parallax_offset(pointer: Vec2, sensitivity: f32, size: Vec2) -> Vec2 {
    pointer * sensitivity * size
}

/// Draw every layer, back to front
pub fn composite_frame<S: Surface + ?Sized>(
    layers: &[Layer],
    pointer: Vec2,
    ctx: &FrameContext,
    surface: &mut S,
) {
    for (depth, layer) in layers.iter().enumerate() {
        surface.begin_layer(depth);
        surface.set_blend(layer.blend);

        let offset = parallax_offset(pointer, layer.parallax, ctx.size);
        for decoration in &layer.decorations {
            decoration.draw(surface, offset, ctx);
        }

        let Some(field) = &layer.field else {
            continue;
        };
        for particle in field.particles() {
            if particle.is_dead() {
                continue;
            }
            let alpha = particle.alpha();
            if alpha <= 0.0 {
                continue;
            }
            let mut pos = particle.pos + offset;
            if layer.wrap {
                pos = Vec2::new(wrap_coord(pos.x, ctx.size.x), wrap_coord(pos.y, ctx.size.y));
            }
            draw_particle(surface, layer.style, particle, pos, alpha);
        }
    }
}

fn draw_particle<S: Surface + ?Sized>(
    surface: &mut S,
    style: RenderStyle,
    particle: &Particle,
    pos: Vec2,
    alpha: f32,
) {
    let color = particle.color.with_alpha(alpha);
    match style {
        RenderStyle::Point => surface.fill_circle(pos, particle.size, color),
        RenderStyle::Glow { halo, core } => {
            let stops = [
                GradientStop::new(0.0, color),
                GradientStop::new(0.5, color.with_alpha(alpha * core)),
                GradientStop::new(1.0, color.with_alpha(0.0)),
            ];
            surface.fill_radial_gradient(pos, 0.0, particle.size * halo, &stops);
        }
        RenderStyle::LineFlare { min_size, alpha: flare } => {
            surface.fill_circle(pos, particle.size, color);
            if particle.size > min_size {
                let arm = particle.size * 3.0;
                let flare_color = color.with_alpha(alpha * flare);
                surface.stroke_line(pos - Vec2::X * arm, pos + Vec2::X * arm, 0.5, flare_color);
                surface.stroke_line(pos - Vec2::Y * arm, pos + Vec2::Y * arm, 0.5, flare_color);
            }
        }
    }
}
