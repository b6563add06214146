//! Per-particle kinematics
//!
//! Three models, chosen per layer at configuration time:
//! - Drift: straight-line velocity with optional damping
//! - Orbit: circular/elliptical orbit around a fixed center
//! - RiseFall: constant vertical acceleration (gentle gravity)
//!
//! A particle's [`Motion`] is set at spawn and never switches variant.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::{Range, SceneRng};
use crate::error::ConfigError;
use crate::{polar_to_cartesian, wrap_angle};

/// Angular speed law for orbits, in radians per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OrbitSpeed {
    /// Same speed for every radius (planets, clock hands)
    Fixed(f32),
    /// `base + k / radius`: inner particles orbit faster (accretion disk)
    InverseRadius { base: f32, k: f32 },
    /// Uniform random speed per particle, either direction (nebula swirl)
    Random(Range),
}

impl OrbitSpeed {
    /// Angular speed at `radius`; `rng` is only consumed by [`OrbitSpeed::Random`]
    pub fn sample(&self, radius: f32, rng: &mut SceneRng) -> f32 {
        match *self {
            OrbitSpeed::Fixed(speed) => speed,
            OrbitSpeed::InverseRadius { base, k } => base + k / radius,
            OrbitSpeed::Random(range) => rng.sample(range),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            OrbitSpeed::Fixed(speed) if !speed.is_finite() => Err(ConfigError::NotFinite {
                field: "orbit.speed",
                value: speed,
            }),
            OrbitSpeed::InverseRadius { k, .. } if !(k > 0.0) => Err(ConfigError::NotPositive {
                field: "orbit.k",
                value: k,
            }),
            OrbitSpeed::InverseRadius { base, .. } if !base.is_finite() => {
                Err(ConfigError::NotFinite {
                    field: "orbit.base",
                    value: base,
                })
            }
            OrbitSpeed::Random(range) => range.validate("orbit.speed"),
            _ => Ok(()),
        }
    }
}

/// Cosmetic beaming: the approaching side (cos(angle) > 0) is drawn brighter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Doppler {
    pub approaching: f32,
    pub receding: f32,
}

impl Default for Doppler {
    fn default() -> Self {
        Self {
            approaching: 1.5,
            receding: 0.5,
        }
    }
}

/// Small positional wobble layered on top of an orbit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wobble {
    pub phase: f32,
    pub speed: f32,
    pub amplitude: Vec2,
}

impl Wobble {
    #[inline]
    fn offset(&self) -> Vec2 {
        Vec2::new(
            self.phase.sin() * self.amplitude.x,
            (self.phase * 0.7).cos() * self.amplitude.y,
        )
    }
}

/// Kinematic state carried by each particle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    Drift {
        vel: Vec2,
        /// Velocity multiplier per frame (1.0 = undamped)
        damping: f32,
    },
    Orbit {
        center: Vec2,
        radius: f32,
        /// Current angle, kept in [0, 2π)
        angle: f32,
        /// Radians per frame
        angular_speed: f32,
        /// Vertical scale of the orbit (1.0 = circle)
        squash: f32,
        doppler: Option<Doppler>,
        wobble: Option<Wobble>,
    },
    RiseFall {
        vel: Vec2,
        /// Added to vertical velocity every frame (positive pulls down)
        gravity: f32,
    },
}

impl Motion {
    pub fn drift(vel: Vec2, damping: f32) -> Self {
        Motion::Drift { vel, damping }
    }

    pub fn orbit(center: Vec2, radius: f32, angle: f32, angular_speed: f32, squash: f32) -> Self {
        Motion::Orbit {
            center,
            radius,
            angle: wrap_angle(angle),
            angular_speed,
            squash,
            doppler: None,
            wobble: None,
        }
    }

    pub fn rise_fall(vel: Vec2, gravity: f32) -> Self {
        Motion::RiseFall { vel, gravity }
    }

    /// Position implied by the kinematic state; free-moving models keep `current`
    pub fn position(&self, current: Vec2) -> Vec2 {
        match *self {
            Motion::Orbit {
                center,
                radius,
                angle,
                squash,
                wobble,
                ..
            } => {
                let on_orbit = polar_to_cartesian(radius, angle) * Vec2::new(1.0, squash);
                center + on_orbit + wobble.map(|w| w.offset()).unwrap_or(Vec2::ZERO)
            }
            Motion::Drift { .. } | Motion::RiseFall { .. } => current,
        }
    }

    /// Advance one step of `dt` frames, returning the new position
    pub fn advance(&mut self, pos: Vec2, dt: f32) -> Vec2 {
        match self {
            Motion::Drift { vel, damping } => {
                let next = pos + *vel * dt;
                if *damping != 1.0 {
                    *vel *= damping.powf(dt);
                }
                next
            }
            Motion::Orbit {
                angle,
                angular_speed,
                wobble,
                ..
            } => {
                *angle = wrap_angle(*angle + *angular_speed * dt);
                if let Some(w) = wobble {
                    w.phase = wrap_angle(w.phase + w.speed * dt);
                }
                self.position(pos)
            }
            Motion::RiseFall { vel, gravity } => {
                let next = pos + *vel * dt;
                vel.y += *gravity * dt;
                next
            }
        }
    }

    /// Brightness multiplier from the motion itself (Doppler side for orbits)
    pub fn brightness(&self) -> f32 {
        match self {
            Motion::Orbit {
                angle,
                doppler: Some(doppler),
                ..
            } => {
                if angle.cos() > 0.0 {
                    doppler.approaching
                } else {
                    doppler.receding
                }
            }
            _ => 1.0,
        }
    }

    /// Scale an orbit's center about the surface origin so it keeps its
    /// relative place after a resize; free-moving models are untouched
    pub fn rescale_center(&mut self, scale: Vec2) {
        if let Motion::Orbit { center, .. } = self {
            *center *= scale;
        }
    }

    /// Current orbit angle, if this is an orbit
    pub fn angle(&self) -> Option<f32> {
        match self {
            Motion::Orbit { angle, .. } => Some(*angle),
            _ => None,
        }
    }
}

/// How initial orbit angles are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AngleSpread {
    /// Uniform random in [0, 2π)
    #[default]
    Random,
    /// `i / count · 2π` for the i-th initial particle
    Even,
}

/// Motion model selection for a layer, with the ranges particles are drawn from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MotionKind {
    Drift {
        velocity_x: Range,
        velocity_y: Range,
        damping: f32,
    },
    Orbit {
        radius: Range,
        speed: OrbitSpeed,
        squash: f32,
        spread: AngleSpread,
        doppler: Option<Doppler>,
        /// Wobble amplitude; phase is randomized per particle
        wobble: Option<(Vec2, f32)>,
    },
    RiseFall {
        velocity_x: Range,
        velocity_y: Range,
        gravity: f32,
    },
}

impl MotionKind {
    /// Stationary drift (twinkling stars)
    pub fn still() -> Self {
        MotionKind::Drift {
            velocity_x: Range::fixed(0.0),
            velocity_y: Range::fixed(0.0),
            damping: 1.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            MotionKind::Drift {
                velocity_x,
                velocity_y,
                damping,
            } => {
                velocity_x.validate("drift.velocity_x")?;
                velocity_y.validate("drift.velocity_y")?;
                if !(*damping > 0.0 && *damping <= 1.0) {
                    return Err(ConfigError::OutOfRange {
                        field: "drift.damping",
                        value: *damping,
                        min: 0.0,
                        max: 1.0,
                    });
                }
                Ok(())
            }
            MotionKind::Orbit {
                radius,
                speed,
                squash,
                wobble,
                ..
            } => {
                radius.validate("orbit.radius")?;
                // Keeps InverseRadius away from a division by zero
                if !(radius.min > 0.0) {
                    return Err(ConfigError::NotPositive {
                        field: "orbit.radius",
                        value: radius.min,
                    });
                }
                speed.validate()?;
                if !(*squash > 0.0 && *squash <= 1.0) {
                    return Err(ConfigError::OutOfRange {
                        field: "orbit.squash",
                        value: *squash,
                        min: 0.0,
                        max: 1.0,
                    });
                }
                if let Some((amp, speed)) = wobble {
                    for value in [amp.x, amp.y, *speed] {
                        if !value.is_finite() {
                            return Err(ConfigError::NotFinite {
                                field: "orbit.wobble",
                                value,
                            });
                        }
                    }
                }
                Ok(())
            }
            MotionKind::RiseFall {
                velocity_x,
                velocity_y,
                gravity,
            } => {
                velocity_x.validate("rise_fall.velocity_x")?;
                velocity_y.validate("rise_fall.velocity_y")?;
                if !gravity.is_finite() {
                    return Err(ConfigError::NotFinite {
                        field: "rise_fall.gravity",
                        value: *gravity,
                    });
                }
                Ok(())
            }
        }
    }

    /// Draw a fresh motion state; `slot` is `Some((i, count))` for initial
    /// population so [`AngleSpread::Even`] can space particles
    pub fn instantiate(&self, center: Vec2, slot: Option<(usize, usize)>, rng: &mut SceneRng) -> Motion {
        match self {
            MotionKind::Drift {
                velocity_x,
                velocity_y,
                damping,
            } => Motion::Drift {
                vel: Vec2::new(rng.sample(*velocity_x), rng.sample(*velocity_y)),
                damping: *damping,
            },
            MotionKind::Orbit {
                radius,
                speed,
                squash,
                spread,
                doppler,
                wobble,
            } => {
                let angle = match (spread, slot) {
                    (AngleSpread::Even, Some((i, count))) if count > 0 => {
                        i as f32 / count as f32 * std::f32::consts::TAU
                    }
                    _ => rng.angle(),
                };
                let r = rng.sample(*radius);
                let angular_speed = speed.sample(r, rng);
                let wobble = wobble.map(|(amplitude, speed)| Wobble {
                    phase: rng.angle(),
                    speed,
                    amplitude,
                });
                Motion::Orbit {
                    center,
                    radius: r,
                    angle: wrap_angle(angle),
                    angular_speed,
                    squash: *squash,
                    doppler: *doppler,
                    wobble,
                }
            }
            MotionKind::RiseFall {
                velocity_x,
                velocity_y,
                gravity,
            } => Motion::RiseFall {
                vel: Vec2::new(rng.sample(*velocity_x), rng.sample(*velocity_y)),
                gravity: *gravity,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::TAU;

    #[test]
    fn test_drift_moves_and_damps() {
        let mut m = Motion::drift(Vec2::new(2.0, 0.0), 0.5);
        let p = m.advance(Vec2::ZERO, 1.0);
        assert_eq!(p, Vec2::new(2.0, 0.0));
        let p = m.advance(p, 1.0);
        assert_eq!(p, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_rise_fall_accelerates_linearly() {
        let mut m = Motion::rise_fall(Vec2::new(0.0, -3.0), 0.03);
        let mut pos = Vec2::ZERO;
        for _ in 0..100 {
            pos = m.advance(pos, 1.0);
        }
        if let Motion::RiseFall { vel, .. } = m {
            assert!((vel.y - 0.0).abs() < 1e-4);
        } else {
            panic!("variant changed");
        }
        // Sum of an arithmetic sequence: 100 * -3 + 0.03 * (0 + 1 + ... + 99)
        assert!((pos.y - (-300.0 + 0.03 * 4950.0)).abs() < 0.05);
    }

    #[test]
    fn test_orbit_position_is_squashed() {
        let m = Motion::orbit(Vec2::new(250.0, 250.0), 100.0, std::f32::consts::FRAC_PI_2, 0.0, 0.3);
        let pos = m.position(Vec2::ZERO);
        assert!((pos.x - 250.0).abs() < 1e-3);
        assert!((pos.y - 280.0).abs() < 1e-3);
    }

    #[test]
    fn test_rescale_moves_orbit_center_only() {
        let mut orbit = Motion::orbit(Vec2::new(250.0, 100.0), 40.0, 0.0, 0.01, 1.0);
        orbit.rescale_center(Vec2::new(2.0, 3.0));
        assert_eq!(orbit.position(Vec2::ZERO), Vec2::new(540.0, 300.0));

        let mut drift = Motion::drift(Vec2::X, 1.0);
        drift.rescale_center(Vec2::splat(2.0));
        assert_eq!(drift, Motion::drift(Vec2::X, 1.0));
    }

    #[test]
    fn test_doppler_brighter_on_approaching_side() {
        let mut m = Motion::orbit(Vec2::ZERO, 100.0, 0.0, 0.0, 0.3);
        if let Motion::Orbit { doppler, .. } = &mut m {
            *doppler = Some(Doppler::default());
        }
        assert_eq!(m.brightness(), 1.5);

        let mut far = m;
        if let Motion::Orbit { angle, .. } = &mut far {
            *angle = std::f32::consts::PI;
        }
        assert_eq!(far.brightness(), 0.5);
    }

    #[test]
    fn test_inner_orbits_complete_faster() {
        let law = OrbitSpeed::InverseRadius { base: 0.003, k: 0.5 };
        let mut rng = SceneRng::new(7);
        let mut inner = Motion::orbit(Vec2::ZERO, 90.0, 0.0, law.sample(90.0, &mut rng), 1.0);
        let mut outer = Motion::orbit(Vec2::ZERO, 210.0, 0.0, law.sample(210.0, &mut rng), 1.0);

        let (mut inner_revs, mut outer_revs) = (0u32, 0u32);
        let (mut pi, mut po) = (Vec2::ZERO, Vec2::ZERO);
        for _ in 0..5000 {
            let before_i = inner.angle().unwrap_or_default();
            let before_o = outer.angle().unwrap_or_default();
            pi = inner.advance(pi, 1.0);
            po = outer.advance(po, 1.0);
            if inner.angle().unwrap_or_default() < before_i {
                inner_revs += 1;
            }
            if outer.angle().unwrap_or_default() < before_o {
                outer_revs += 1;
            }
        }
        assert!(inner_revs > outer_revs, "{inner_revs} vs {outer_revs}");
    }

    #[test]
    fn test_orbit_validation_rejects_zero_radius() {
        let kind = MotionKind::Orbit {
            radius: Range::new(0.0, 10.0),
            speed: OrbitSpeed::InverseRadius { base: 0.0, k: 1.0 },
            squash: 1.0,
            spread: AngleSpread::Random,
            doppler: None,
            wobble: None,
        };
        assert!(matches!(
            kind.validate(),
            Err(ConfigError::NotPositive { field: "orbit.radius", .. })
        ));
    }

    proptest! {
        #[test]
        fn orbit_angle_advances_by_speed(angle in 0.0f32..TAU, speed in -0.5f32..0.5, dt in 0.1f32..4.0) {
            let mut m = Motion::orbit(Vec2::ZERO, 50.0, angle, speed, 1.0);
            let start = m.angle().unwrap_or_default();
            m.advance(Vec2::ZERO, dt);
            let expected = wrap_angle(start + speed * dt);
            let got = m.angle().unwrap_or_default();
            let diff = (got - expected).abs();
            prop_assert!(diff < 1e-4 || (TAU - diff) < 1e-4);
        }

        #[test]
        fn inverse_radius_speed_strictly_decreasing(r1 in 1.0f32..500.0, dr in 0.5f32..500.0) {
            let law = OrbitSpeed::InverseRadius { base: 0.003, k: 0.5 };
            let mut rng = SceneRng::new(0);
            prop_assert!(law.sample(r1, &mut rng) > law.sample(r1 + dr, &mut rng));
        }
    }
}
