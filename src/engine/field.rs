//! Particle populations
//!
//! A field owns the particles of one layer. Fixed fields are created once and
//! keep their exact size forever (dead particles are renewed in place).
//! Streaming fields spawn every tick and prune the dead, with a hard cap so a
//! misconfigured spawn/decay balance can't grow memory without bound.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::motion::MotionKind;
use super::particle::{AlphaCurve, Lifespan, Particle, Twinkle};
use super::rng::{Range, SceneRng};
use crate::color::Rgba;
use crate::error::ConfigError;

/// Growth policy of a field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Population {
    /// Size fixed at creation
    Fixed,
    /// `per_tick` spawn attempts per frame, each succeeding with `spawn_chance`
    Streaming {
        spawn_chance: f32,
        per_tick: u32,
        max_population: usize,
    },
}

/// Where new particles appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Origin {
    /// Uniform over the surface
    #[default]
    Anywhere,
    /// Uniform along x, just below the bottom edge
    BelowBottom { margin: u32 },
    /// Surface center (orbit models place themselves relative to it)
    Center,
}

/// Sinusoidal opacity modulation drawn per particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TwinkleSpec {
    pub speed: Range,
    pub base: f32,
    pub depth: f32,
}

/// Everything needed to create particles for one layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnSpec {
    /// Particles created at mount
    pub count: usize,
    pub population: Population,
    pub origin: Origin,
    pub size: Range,
    /// Peak opacity in [0, 1]
    pub opacity: Range,
    pub palette: Vec<Rgba>,
    /// Lifetime in frames; `None` for immortal particles
    pub lifetime: Option<Range>,
    pub curve: AlphaCurve,
    /// Start initial particles at a random point in their life
    pub prewarm: bool,
    pub twinkle: Option<TwinkleSpec>,
    pub motion: MotionKind,
}

impl SpawnSpec {
    pub fn validate(&self, layer: &str) -> Result<(), ConfigError> {
        self.size.validate("size")?;
        if !(self.size.min > 0.0) {
            return Err(ConfigError::NotPositive {
                field: "size",
                value: self.size.min,
            });
        }
        self.opacity.validate("opacity")?;
        if self.opacity.min < 0.0 || self.opacity.max > 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "opacity",
                value: if self.opacity.min < 0.0 { self.opacity.min } else { self.opacity.max },
                min: 0.0,
                max: 1.0,
            });
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette {
                layer: layer.to_string(),
            });
        }
        if let Some(lifetime) = self.lifetime {
            lifetime.validate("lifetime")?;
        }
        if let Some(twinkle) = self.twinkle {
            twinkle.speed.validate("twinkle.speed")?;
            for value in [twinkle.base, twinkle.depth] {
                if !value.is_finite() {
                    return Err(ConfigError::NotFinite {
                        field: "twinkle",
                        value,
                    });
                }
            }
        }
        if let Population::Streaming {
            spawn_chance,
            max_population,
            ..
        } = self.population
        {
            if !(0.0..=1.0).contains(&spawn_chance) {
                return Err(ConfigError::OutOfRange {
                    field: "spawn_chance",
                    value: spawn_chance,
                    min: 0.0,
                    max: 1.0,
                });
            }
            if max_population == 0 {
                return Err(ConfigError::MissingCap {
                    layer: layer.to_string(),
                });
            }
        }
        self.motion.validate()
    }
}

/// Bounded set of particles for one layer
#[derive(Debug, Clone)]
pub struct ParticleField {
    spec: SpawnSpec,
    particles: Vec<Particle>,
    cap_warned: bool,
}

impl ParticleField {
    pub fn new(spec: SpawnSpec) -> Self {
        let capacity = match spec.population {
            Population::Fixed => spec.count,
            Population::Streaming { max_population, .. } => max_population.min(4096),
        };
        Self {
            spec,
            particles: Vec::with_capacity(capacity),
            cap_warned: false,
        }
    }

    /// Field holding hand-placed particles that never grows (orbit diagrams)
    pub fn from_particles(spec: SpawnSpec, particles: Vec<Particle>) -> Self {
        Self {
            spec: SpawnSpec {
                count: particles.len(),
                population: Population::Fixed,
                ..spec
            },
            particles,
            cap_warned: false,
        }
    }

    /// Create the initial population for a surface of `bounds` size
    pub fn populate(&mut self, bounds: Vec2, rng: &mut SceneRng) {
        let count = self.spec.count;
        for i in 0..count {
            let particle = self.make_particle(bounds, Some((i, count)), rng);
            self.particles.push(particle);
        }
    }

    /// Create one particle from the spawn ranges and append it
    pub fn spawn(&mut self, bounds: Vec2, rng: &mut SceneRng) -> &Particle {
        let particle = self.make_particle(bounds, None, rng);
        self.particles.push(particle);
        let last = self.particles.len() - 1;
        &self.particles[last]
    }

    /// Run this tick's spawn attempts (streaming fields only), honoring the hard cap.
    /// Returns how many particles were added.
    pub fn emit(&mut self, bounds: Vec2, rng: &mut SceneRng) -> usize {
        let Population::Streaming {
            spawn_chance,
            per_tick,
            max_population,
        } = self.spec.population
        else {
            return 0;
        };

        let mut spawned = 0;
        for _ in 0..per_tick {
            if !rng.chance(spawn_chance) {
                continue;
            }
            if self.particles.len() >= max_population {
                if !self.cap_warned {
                    log::warn!(
                        "particle field reached its hard cap of {max_population}; skipping spawns"
                    );
                    self.cap_warned = true;
                }
                break;
            }
            self.spawn(bounds, rng);
            spawned += 1;
        }
        spawned
    }

    /// Age and move every particle by `dt` frames. Fixed fields renew their
    /// dead in place so the population never changes size.
    pub fn advance(&mut self, dt: f32) {
        let renew = matches!(self.spec.population, Population::Fixed);
        for particle in &mut self.particles {
            particle.step(dt);
            if renew && particle.is_dead() {
                particle.age = 0.0;
            }
        }
    }

    /// Re-anchor orbits after the surface changed size by `scale`
    /// (new size / old size). Free-moving particles stay where they are.
    pub fn rescale(&mut self, scale: Vec2) {
        for particle in &mut self.particles {
            particle.motion.rescale_center(scale);
            particle.pos = particle.motion.position(particle.pos);
        }
    }

    /// Drop dead particles; returns how many were removed
    pub fn prune(&mut self) -> usize {
        let before = self.particles.len();
        self.particles.retain(|p| !p.is_dead());
        before - self.particles.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    fn make_particle(&self, bounds: Vec2, slot: Option<(usize, usize)>, rng: &mut SceneRng) -> Particle {
        let spec = &self.spec;
        let center = bounds * 0.5;
        let origin = match spec.origin {
            Origin::Anywhere => Vec2::new(rng.unit() * bounds.x, rng.unit() * bounds.y),
            Origin::BelowBottom { margin } => Vec2::new(rng.unit() * bounds.x, bounds.y + margin as f32),
            Origin::Center => center,
        };

        let motion = spec.motion.instantiate(center, slot, rng);
        let size = rng.sample(spec.size);
        let opacity = rng.sample(spec.opacity);
        let color = rng.pick(&spec.palette).copied().unwrap_or(Rgba::WHITE).with_alpha(opacity);

        let mut particle = Particle::new(origin, size, color, motion);
        if let Some(lifetime) = spec.lifetime {
            particle = particle.with_lifespan(
                Lifespan::Finite {
                    lifetime: rng.sample(lifetime),
                },
                spec.curve,
            );
            if spec.prewarm && slot.is_some() {
                particle = particle.with_life(rng.unit());
            }
        } else {
            particle.curve = spec.curve;
        }
        if let Some(twinkle) = spec.twinkle {
            particle = particle.with_twinkle(Twinkle {
                phase: rng.angle(),
                speed: rng.sample(twinkle.speed),
                base: twinkle.base,
                depth: twinkle.depth,
            });
        }
        particle
    }
}
