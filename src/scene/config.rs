//! Scene configuration and validation
//!
//! Pure data: nothing here animates. A config is validated once, as a whole,
//! before any layer is built, so an invalid scene is never partially applied.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::consts;
use crate::engine::decoration::Decoration;
use crate::engine::field::{Origin, ParticleField, Population, SpawnSpec};
use crate::engine::layer::{Layer, RenderStyle};
use crate::engine::motion::{Motion, MotionKind};
use crate::engine::particle::{AlphaCurve, Particle};
use crate::engine::rng::{Range, SceneRng};
use crate::engine::surface::BlendMode;
use crate::error::ConfigError;
use crate::settings::Settings;

/// What happens to the previous frame at the top of each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Fade {
    /// Erase everything
    Clear,
    /// Paint a translucent color over the last frame; `color.a` sets trail length
    Trail { color: Rgba },
}

/// A hand-placed orbiting body (planet, clock hand tip)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Orbit center as a fraction of the surface
    pub anchor: Vec2,
    pub orbit_radius: f32,
    /// Starting angle, radians
    pub angle: f32,
    /// Radians per frame
    pub angular_speed: f32,
    pub size: f32,
    pub color: Rgba,
}

/// Particles of a layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum LayerContent {
    /// Decorations only
    #[default]
    Empty,
    /// Randomized population drawn from ranges
    Spawn(SpawnSpec),
    /// Fixed bodies on fixed orbits
    Bodies(Vec<Body>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub name: String,
    pub depth: u32,
    #[serde(default)]
    pub parallax: f32,
    pub style: RenderStyle,
    #[serde(default)]
    pub blend: BlendMode,
    #[serde(default)]
    pub wrap: bool,
    #[serde(default)]
    pub decorations: Vec<Decoration>,
    #[serde(default)]
    pub content: LayerContent,
}

impl LayerConfig {
    pub fn new(name: impl Into<String>, depth: u32, style: RenderStyle) -> Self {
        Self {
            name: name.into(),
            depth,
            parallax: 0.0,
            style,
            blend: BlendMode::Alpha,
            wrap: false,
            decorations: Vec::new(),
            content: LayerContent::Empty,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=consts::MAX_PARALLAX).contains(&self.parallax) {
            return Err(ConfigError::OutOfRange {
                field: "parallax",
                value: self.parallax,
                min: 0.0,
                max: consts::MAX_PARALLAX,
            });
        }
        match self.style {
            RenderStyle::Glow { halo, core } => {
                positive("glow.halo", halo)?;
                unit("glow.core", core)?;
            }
            RenderStyle::LineFlare { min_size, alpha } => {
                finite("flare.min_size", min_size)?;
                unit("flare.alpha", alpha)?;
            }
            RenderStyle::Point => {}
        }
        match &self.content {
            LayerContent::Empty => Ok(()),
            LayerContent::Spawn(spec) => spec.validate(&self.name),
            LayerContent::Bodies(bodies) => {
                for body in bodies {
                    positive("body.orbit_radius", body.orbit_radius)?;
                    positive("body.size", body.size)?;
                    finite("body.angle", body.angle)?;
                    finite("body.angular_speed", body.angular_speed)?;
                    finite("body.anchor", body.anchor.x)?;
                    finite("body.anchor", body.anchor.y)?;
                }
                Ok(())
            }
        }
    }

    /// Build the runtime layer and its initial population
    pub fn build(&self, bounds: Vec2, settings: &Settings, rng: &mut SceneRng) -> Layer {
        let mut layer = Layer::new(self.name.clone(), self.depth);
        layer.parallax = self.parallax;
        layer.style = self.style;
        layer.blend = self.blend;
        layer.wrap = self.wrap;
        layer.decorations = self.decorations.clone();
        layer.field = match &self.content {
            LayerContent::Empty => None,
            LayerContent::Spawn(spec) => {
                let mut spec = spec.clone();
                spec.count = settings.scale_count(spec.count);
                if let Population::Streaming { max_population, .. } = &mut spec.population {
                    *max_population = settings.cap_population(*max_population);
                }
                let mut field = ParticleField::new(spec);
                field.populate(bounds, rng);
                Some(field)
            }
            LayerContent::Bodies(bodies) => {
                let particles = bodies
                    .iter()
                    .map(|b| {
                        let motion = Motion::orbit(b.anchor * bounds, b.orbit_radius, b.angle, b.angular_speed, 1.0);
                        Particle::new(b.anchor * bounds, b.size, b.color, motion)
                    })
                    .collect();
                Some(ParticleField::from_particles(placed_spec(bodies), particles))
            }
        };
        layer
    }
}

/// Spawn description recorded for hand-placed bodies; never used to spawn
fn placed_spec(bodies: &[Body]) -> SpawnSpec {
    SpawnSpec {
        count: bodies.len(),
        population: Population::Fixed,
        origin: Origin::Center,
        size: Range::fixed(1.0),
        opacity: Range::fixed(1.0),
        palette: bodies.iter().map(|b| b.color).collect(),
        lifetime: None,
        curve: AlphaCurve::Constant,
        prewarm: false,
        twinkle: None,
        motion: MotionKind::still(),
    }
}

/// Complete description of one visual effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub name: String,
    pub width: f32,
    pub height: f32,
    /// Simulated frames per tick
    #[serde(default = "default_dt")]
    pub dt: f32,
    pub fade: Fade,
    #[serde(default = "default_seed")]
    pub seed: u64,
    pub layers: Vec<LayerConfig>,
}

fn default_dt() -> f32 {
    consts::FRAME_DT
}

fn default_seed() -> u64 {
    consts::DEFAULT_SEED
}

impl SceneConfig {
    pub fn new(name: impl Into<String>, width: f32, height: f32, fade: Fade) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            dt: consts::FRAME_DT,
            fade,
            seed: consts::DEFAULT_SEED,
            layers: Vec::new(),
        }
    }

    pub fn with_layer(mut self, layer: LayerConfig) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::EmptySurface {
                width: self.width,
                height: self.height,
            });
        }
        positive("dt", self.dt)?;
        if let Fade::Trail { color } = self.fade {
            if !(color.a > 0.0 && color.a <= 1.0) {
                return Err(ConfigError::OutOfRange {
                    field: "fade.alpha",
                    value: color.a,
                    min: 0.0,
                    max: 1.0,
                });
            }
        }
        if self.layers.is_empty() {
            return Err(ConfigError::NoLayers);
        }
        self.layers.iter().try_for_each(LayerConfig::validate)
    }

    /// Parse a JSON scene description
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: 1.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::QualityPreset;

    fn drift_layer(count: usize) -> LayerConfig {
        let mut layer = LayerConfig::new("dust", 0, RenderStyle::Point);
        layer.content = LayerContent::Spawn(SpawnSpec {
            count,
            population: Population::Fixed,
            origin: Origin::Anywhere,
            size: Range::new(0.5, 1.5),
            opacity: Range::new(0.3, 1.0),
            palette: vec![Rgba::WHITE],
            lifetime: None,
            curve: AlphaCurve::Constant,
            prewarm: false,
            twinkle: None,
            motion: MotionKind::Drift {
                velocity_x: Range::new(-0.2, 0.2),
                velocity_y: Range::new(-0.2, 0.2),
                damping: 1.0,
            },
        });
        layer
    }

    fn config() -> SceneConfig {
        SceneConfig::new("test", 400.0, 300.0, Fade::Clear).with_layer(drift_layer(50))
    }

    #[test]
    fn test_valid_config() {
        assert_eq!(config().validate(), Ok(()));
    }

    #[test]
    fn test_inverted_range_is_fatal() {
        let mut cfg = config();
        if let LayerContent::Spawn(spec) = &mut cfg.layers[0].content {
            spec.opacity = Range::new(0.9, 0.1);
        }
        assert!(matches!(cfg.validate(), Err(ConfigError::InvertedRange { field: "opacity", .. })));
    }

    #[test]
    fn test_surface_and_layer_checks() {
        let mut cfg = config();
        cfg.width = 0.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::EmptySurface { .. })));

        let cfg = SceneConfig::new("empty", 10.0, 10.0, Fade::Clear);
        assert_eq!(cfg.validate(), Err(ConfigError::NoLayers));

        let mut cfg = config();
        cfg.layers[0].parallax = 3.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::OutOfRange { field: "parallax", .. })));

        let mut cfg = config();
        cfg.fade = Fade::Trail {
            color: Rgba::DEEP_SPACE.with_alpha(0.0),
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::OutOfRange { field: "fade.alpha", .. })));
    }

    #[test]
    fn test_body_orbit_radius_must_be_positive() {
        let mut layer = LayerConfig::new("planets", 1, RenderStyle::Point);
        layer.content = LayerContent::Bodies(vec![Body {
            anchor: Vec2::splat(0.5),
            orbit_radius: 0.0,
            angle: 0.0,
            angular_speed: 0.01,
            size: 4.0,
            color: Rgba::GOLD,
        }]);
        let cfg = SceneConfig::new("orbits", 100.0, 100.0, Fade::Clear).with_layer(layer);
        assert!(matches!(cfg.validate(), Err(ConfigError::NotPositive { .. })));
    }

    #[test]
    fn test_build_applies_quality() {
        let settings = Settings::from_preset(QualityPreset::Low);
        let mut rng = SceneRng::new(1);
        let layer = drift_layer(50).build(Vec2::new(400.0, 300.0), &settings, &mut rng);
        assert_eq!(layer.population(), 25);
    }

    #[test]
    fn test_json_round_trip() {
        let cfg = config();
        let json = serde_json::to_string(&cfg).unwrap_or_default();
        assert_eq!(SceneConfig::from_json(&json).ok(), Some(cfg));
    }
}
