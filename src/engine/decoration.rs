//! Static decorative elements: glows, rings, flares, lensing arcs
//!
//! Decorations hold no per-tick state. Every one is a pure function of the
//! frame number and surface size and is recomputed each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::surface::{GradientStop, Surface};
use crate::color::Rgba;
use crate::polar_to_cartesian;

/// Per-frame inputs shared by everything drawn in one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub frame: u64,
    pub size: Vec2,
    /// False under reduced motion: pulses hold their base value and arcs stop
    pub animate: bool,
}

impl FrameContext {
    /// Frame number as f64 time, zero when animation is suppressed
    #[inline]
    fn t(&self) -> f64 {
        if self.animate { self.frame as f64 } else { 0.0 }
    }
}

/// `base + amplitude · sin(frame · rate + phase)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    pub base: f32,
    pub amplitude: f32,
    pub rate: f32,
    pub phase: f32,
}

impl Pulse {
    pub const fn steady(value: f32) -> Self {
        Self {
            base: value,
            amplitude: 0.0,
            rate: 0.0,
            phase: 0.0,
        }
    }

    pub const fn new(base: f32, amplitude: f32, rate: f32) -> Self {
        Self {
            base,
            amplitude,
            rate,
            phase: 0.0,
        }
    }

    pub fn value(&self, ctx: &FrameContext) -> f32 {
        if !ctx.animate {
            return self.base;
        }
        // f64 keeps the phase accurate for very long-running scenes
        let wave = (ctx.t() * self.rate as f64 + self.phase as f64).sin() as f32;
        self.base + self.amplitude * wave
    }
}

/// A length that may scale with the surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Extent {
    Px(f32),
    /// Fraction of surface width
    Width(f32),
    /// Fraction of the larger surface side
    MaxSide(f32),
}

impl Extent {
    pub fn resolve(&self, size: Vec2) -> f32 {
        match *self {
            Extent::Px(px) => px,
            Extent::Width(f) => f * size.x,
            Extent::MaxSide(f) => f * size.x.max(size.y),
        }
    }
}

/// Something drawn every tick that isn't a particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decoration {
    /// Radial gradient anchored at a fraction of the surface; `alpha` scales every stop
    RadialGlow {
        anchor: Vec2,
        inner: Extent,
        outer: Extent,
        stops: Vec<GradientStop>,
        alpha: Pulse,
    },
    /// Concentric elliptical rings from `outer` down to `inner`, brighter inward
    GlowRings {
        outer: f32,
        inner: f32,
        step: f32,
        squash: f32,
        width: f32,
        color: Rgba,
        max_alpha: f32,
    },
    /// Solid disk at the anchor with pulsing radius and alpha
    PulsingStar {
        anchor: Vec2,
        radius: Pulse,
        alpha: Pulse,
        color: Rgba,
    },
    /// Horizontal + vertical line through the anchor
    CrossFlare {
        anchor: Vec2,
        arm: f32,
        width: f32,
        color: Rgba,
        alpha: Pulse,
    },
    /// Evenly spaced dots circling the anchor, each pulsing out of phase
    LensingArcs {
        anchor: Vec2,
        count: u32,
        orbit_radius: f32,
        dot_radius: f32,
        /// Radians per frame
        angular_speed: f32,
        color: Rgba,
        alpha: Pulse,
    },
    /// Thin circular orbit path
    OrbitRing {
        anchor: Vec2,
        radius: f32,
        width: f32,
        color: Rgba,
    },
}

impl Decoration {
    /// Draw at the current frame, shifted by the layer's parallax `offset`
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, offset: Vec2, ctx: &FrameContext) {
        let at = |anchor: Vec2| anchor * ctx.size + offset;
        match self {
            Decoration::RadialGlow {
                anchor,
                inner,
                outer,
                stops,
                alpha,
            } => {
                let scale = alpha.value(ctx).max(0.0);
                let scaled: Vec<GradientStop> = stops
                    .iter()
                    .map(|s| GradientStop::new(s.offset, s.color.fade(scale)))
                    .collect();
                surface.fill_radial_gradient(
                    at(*anchor),
                    inner.resolve(ctx.size),
                    outer.resolve(ctx.size),
                    &scaled,
                );
            }
            Decoration::GlowRings {
                outer,
                inner,
                step,
                squash,
                width,
                color,
                max_alpha,
            } => {
                if *step <= 0.0 || outer <= inner {
                    return;
                }
                let center = at(Vec2::splat(0.5));
                let span = outer - inner;
                let mut r = *outer;
                while r > *inner {
                    let alpha = (outer - r) / span * max_alpha;
                    surface.stroke_ellipse(center, Vec2::new(r, r * squash), *width, color.with_alpha(alpha));
                    r -= step;
                }
            }
            Decoration::PulsingStar {
                anchor,
                radius,
                alpha,
                color,
            } => {
                let r = radius.value(ctx);
                if r > 0.0 {
                    surface.fill_circle(at(*anchor), r, color.with_alpha(alpha.value(ctx)));
                }
            }
            Decoration::CrossFlare {
                anchor,
                arm,
                width,
                color,
                alpha,
            } => {
                let c = at(*anchor);
                let color = color.with_alpha(alpha.value(ctx));
                surface.stroke_line(c - Vec2::X * *arm, c + Vec2::X * *arm, *width, color);
                surface.stroke_line(c - Vec2::Y * *arm, c + Vec2::Y * *arm, *width, color);
            }
            Decoration::LensingArcs {
                anchor,
                count,
                orbit_radius,
                dot_radius,
                angular_speed,
                color,
                alpha,
            } => {
                let c = at(*anchor);
                let spin = (ctx.t() * *angular_speed as f64) as f32;
                for i in 0..*count {
                    let slot = i as f32 * std::f32::consts::TAU / *count as f32;
                    // Each dot pulses three times faster than the ring spins, offset by its index
                    let pulse = Pulse {
                        phase: alpha.phase + i as f32,
                        ..*alpha
                    };
                    surface.fill_circle(
                        c + polar_to_cartesian(*orbit_radius, spin + slot),
                        *dot_radius,
                        color.with_alpha(pulse.value(ctx)),
                    );
                }
            }
            Decoration::OrbitRing {
                anchor,
                radius,
                width,
                color,
            } => {
                surface.stroke_ellipse(at(*anchor), Vec2::splat(*radius), *width, *color);
            }
        }
    }
}
