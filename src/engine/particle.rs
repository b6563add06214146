//! Particle state and lifecycle
//!
//! A particle's life fraction runs from 0 (born) to 1 (dead) and is derived
//! from its age in frames. Alpha is a pure function of life, so a dead
//! particle has exactly zero alpha.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::motion::Motion;
use crate::color::Rgba;

/// How long a particle lives
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Lifespan {
    /// Fixed-population particles (stars, planets) never age
    Immortal,
    /// Lives for `lifetime` frames; zero or negative means it dies immediately
    Finite { lifetime: f32 },
}

/// Alpha as a function of life fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlphaCurve {
    /// Always fully visible
    #[default]
    Constant,
    /// 1 at birth, linearly down to 0 at death
    Fade,
    /// sin(life·π): rises from 0, peaks mid-life, back to 0 at death
    Pulse,
}

impl AlphaCurve {
    /// Alpha at a given life fraction, always in [0, 1] and 0 once life reaches 1
    pub fn alpha(&self, life: f32) -> f32 {
        if life >= 1.0 || life.is_nan() {
            return 0.0;
        }
        let life = life.max(0.0);
        let alpha = match self {
            AlphaCurve::Constant => 1.0,
            AlphaCurve::Fade => 1.0 - life,
            AlphaCurve::Pulse => (life * std::f32::consts::PI).sin(),
        };
        alpha.clamp(0.0, 1.0)
    }
}

/// Sinusoidal brightness modulation (opacity only, never position)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Twinkle {
    pub phase: f32,
    /// Phase advance per frame
    pub speed: f32,
    pub base: f32,
    pub depth: f32,
}

impl Twinkle {
    /// No modulation
    pub const STEADY: Twinkle = Twinkle {
        phase: 0.0,
        speed: 0.0,
        base: 1.0,
        depth: 0.0,
    };

    #[inline]
    pub fn factor(&self) -> f32 {
        (self.base + self.phase.sin() * self.depth).clamp(0.0, 1.0)
    }

    #[inline]
    fn advance(&mut self, dt: f32) {
        // Keep the phase small so long-running tabs don't lose sin() precision
        self.phase = crate::wrap_angle(self.phase + self.speed * dt);
    }
}

/// A single animated point-like unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    /// Base position in surface space (before parallax)
    pub pos: Vec2,
    pub size: f32,
    /// Base color; `a` is the particle's peak opacity
    pub color: Rgba,
    /// Frames lived so far
    pub age: f32,
    pub lifespan: Lifespan,
    pub curve: AlphaCurve,
    pub twinkle: Twinkle,
    /// Kinematic state, fixed for the particle's whole life
    pub motion: Motion,
}

impl Particle {
    pub fn new(pos: Vec2, size: f32, color: Rgba, motion: Motion) -> Self {
        let mut particle = Self {
            pos,
            size,
            color,
            age: 0.0,
            lifespan: Lifespan::Immortal,
            curve: AlphaCurve::Constant,
            twinkle: Twinkle::STEADY,
            motion,
        };
        particle.pos = particle.motion.position(pos);
        particle
    }

    /// Give the particle a finite lifetime; non-positive lifetimes die at once
    pub fn with_lifespan(mut self, lifespan: Lifespan, curve: AlphaCurve) -> Self {
        self.lifespan = lifespan;
        self.curve = curve;
        self
    }

    /// Start partway through life (pre-warmed populations)
    pub fn with_life(mut self, life: f32) -> Self {
        if let Lifespan::Finite { lifetime } = self.lifespan {
            if lifetime > 0.0 {
                self.age = life.clamp(0.0, 1.0) * lifetime;
            }
        }
        self
    }

    pub fn with_twinkle(mut self, twinkle: Twinkle) -> Self {
        self.twinkle = twinkle;
        self
    }

    /// Life fraction in [0, 1]; always 0 for immortal particles
    pub fn life(&self) -> f32 {
        match self.lifespan {
            Lifespan::Immortal => 0.0,
            Lifespan::Finite { lifetime } if lifetime > 0.0 => (self.age / lifetime).min(1.0),
            Lifespan::Finite { .. } => 1.0,
        }
    }

    /// Alpha from the lifecycle curve alone
    #[inline]
    pub fn lifecycle_alpha(&self) -> f32 {
        self.curve.alpha(self.life())
    }

    /// Final draw alpha: lifecycle × peak opacity × twinkle × motion brightness
    pub fn alpha(&self) -> f32 {
        (self.lifecycle_alpha() * self.color.a * self.twinkle.factor() * self.motion.brightness())
            .clamp(0.0, 1.0)
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        matches!(self.lifespan, Lifespan::Finite { .. }) && self.life() >= 1.0
    }

    /// Advance by one tick of `dt` frames: age, twinkle, then kinematics
    pub fn step(&mut self, dt: f32) {
        if self.is_dead() {
            return;
        }
        if let Lifespan::Finite { .. } = self.lifespan {
            self.age += dt;
        }
        self.twinkle.advance(dt);
        self.pos = self.motion.advance(self.pos, dt);
    }
}
