//! Built-in scenes
//!
//! One adapter per visual on the site. Every preset is plain configuration
//! and goes through the same validation as a hand-written scene.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::config::{Body, Fade, LayerConfig, LayerContent, SceneConfig};
use crate::clock::{self, ClockReading, HandAngles};
use crate::color::Rgba;
use crate::consts;
use crate::engine::decoration::{Decoration, Extent, Pulse};
use crate::engine::field::{Origin, Population, SpawnSpec, TwinkleSpec};
use crate::engine::layer::RenderStyle;
use crate::engine::motion::{AngleSpread, Doppler, MotionKind, OrbitSpeed};
use crate::engine::particle::AlphaCurve;
use crate::engine::rng::Range;
use crate::engine::surface::{BlendMode, GradientStop};

/// The site's animated visuals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneKind {
    Starfield,
    Nebula,
    BlackHole,
    Finale,
    OrbitDiagram,
    SpaceTimeClock,
}

impl SceneKind {
    pub const ALL: [SceneKind; 6] = [
        SceneKind::Starfield,
        SceneKind::Nebula,
        SceneKind::BlackHole,
        SceneKind::Finale,
        SceneKind::OrbitDiagram,
        SceneKind::SpaceTimeClock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SceneKind::Starfield => "starfield",
            SceneKind::Nebula => "nebula",
            SceneKind::BlackHole => "black-hole",
            SceneKind::Finale => "finale",
            SceneKind::OrbitDiagram => "orbit-diagram",
            SceneKind::SpaceTimeClock => "space-time-clock",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s.to_lowercase())
    }

    /// Natural surface size; `None` means the scene fills the viewport
    pub fn default_size(&self) -> Option<Vec2> {
        match self {
            SceneKind::Starfield => None,
            SceneKind::Nebula => Some(Vec2::new(800.0, 500.0)),
            SceneKind::BlackHole => Some(Vec2::new(500.0, 500.0)),
            SceneKind::Finale => None,
            SceneKind::OrbitDiagram => Some(Vec2::new(720.0, 720.0)),
            SceneKind::SpaceTimeClock => Some(Vec2::new(440.0, 220.0)),
        }
    }

    /// Configuration for a `viewport`-sized host. Fixed-size scenes ignore
    /// the viewport width; the finale keeps its 400 px height.
    pub fn config(&self, viewport: Vec2) -> SceneConfig {
        let size = self.default_size().unwrap_or(viewport);
        log::info!("Building {} preset at {}x{}", self.as_str(), size.x, size.y);
        match self {
            SceneKind::Starfield => starfield(size),
            SceneKind::Nebula => nebula(size),
            SceneKind::BlackHole => black_hole(size),
            SceneKind::Finale => finale(Vec2::new(size.x, 400.0)),
            SceneKind::OrbitDiagram => orbit_diagram(size),
            SceneKind::SpaceTimeClock => space_time_clock(size, clock::unix_now()),
        }
    }
}

fn spawn(count: usize, palette: Vec<Rgba>, size: Range, motion: MotionKind) -> SpawnSpec {
    SpawnSpec {
        count,
        population: Population::Fixed,
        origin: Origin::Anywhere,
        size,
        opacity: Range::fixed(1.0),
        palette,
        lifetime: None,
        curve: AlphaCurve::Constant,
        prewarm: false,
        twinkle: None,
        motion,
    }
}

fn glow(anchor: Vec2, outer: Extent, stops: Vec<GradientStop>) -> Decoration {
    Decoration::RadialGlow {
        anchor,
        inner: Extent::Px(0.0),
        outer,
        stops,
        alpha: Pulse::steady(1.0),
    }
}

/// Three parallax star layers over a deep-space gradient, plus rose-gold shimmer stars
pub fn starfield(size: Vec2) -> SceneConfig {
    let mut background = LayerConfig::new("background", 0, RenderStyle::Point);
    background.decorations = vec![
        glow(
            Vec2::splat(0.5),
            Extent::MaxSide(1.0),
            vec![
                GradientStop::new(0.0, Rgba::rgb8(10, 13, 31)),
                GradientStop::new(0.5, Rgba::rgb8(5, 8, 24)),
                GradientStop::new(1.0, Rgba::rgb8(2, 4, 8)),
            ],
        ),
        glow(
            Vec2::new(0.3, 0.4),
            Extent::Width(0.4),
            vec![
                GradientStop::new(0.0, Rgba::ROSE_GOLD.with_alpha(0.04)),
                GradientStop::new(0.5, Rgba::rgb8(26, 5, 51).with_alpha(0.05)),
                GradientStop::new(1.0, Rgba::TRANSPARENT),
            ],
        ),
        glow(
            Vec2::new(0.7, 0.6),
            Extent::Width(0.35),
            vec![
                GradientStop::new(0.0, Rgba::TEAL.with_alpha(0.04)),
                GradientStop::new(1.0, Rgba::TRANSPARENT),
            ],
        ),
    ];

    let twinkle = Some(TwinkleSpec {
        speed: Range::new(0.005, 0.025),
        base: 0.6,
        depth: 0.4,
    });
    let star_layer = |name: &str, depth: u32, count: usize, parallax: f32, sizes: Range, color: Rgba| {
        let mut layer = LayerConfig::new(
            name,
            depth,
            RenderStyle::LineFlare {
                min_size: 2.0,
                alpha: 0.3,
            },
        );
        layer.parallax = parallax;
        layer.wrap = true;
        layer.content = LayerContent::Spawn(SpawnSpec {
            opacity: Range::new(0.3, 1.0),
            twinkle,
            ..spawn(count, vec![color], sizes, MotionKind::still())
        });
        layer
    };

    let mut shimmer = LayerConfig::new(
        "shimmer",
        4,
        RenderStyle::Glow {
            halo: 4.0,
            core: 0.3,
        },
    );
    shimmer.blend = BlendMode::Additive;
    shimmer.content = LayerContent::Spawn(SpawnSpec {
        twinkle: Some(TwinkleSpec {
            speed: Range::fixed(0.03),
            base: 0.4,
            depth: 0.6,
        }),
        ..spawn(15, vec![Rgba::ROSE_GOLD], Range::new(1.0, 3.0), MotionKind::still())
    });

    SceneConfig::new("starfield", size.x, size.y, Fade::Clear)
        .with_layer(background)
        .with_layer(star_layer("far", 1, 200, 0.01, Range::new(0.5, 1.2), Rgba::WHITE))
        .with_layer(star_layer("mid", 2, 100, 0.025, Range::new(1.0, 2.0), Rgba::LAVENDER))
        .with_layer(star_layer("near", 3, 40, 0.05, Range::new(1.5, 3.0), Rgba::ROSE_GOLD))
        .with_layer(shimmer)
}

/// Swirling gas around a pulsing central star
pub fn nebula(size: Vec2) -> SceneConfig {
    // Rose dominates; teal and green split the rest
    let mut palette = Vec::new();
    for (hue, weight) in [(340.0, 4), (200.0, 3), (150.0, 3)] {
        for i in 0..weight {
            let t = i as f32 / weight as f32;
            palette.push(Rgba::hsl(hue, 60.0 + 40.0 * t, 80.0 - 30.0 * t));
        }
    }

    let mut gas = LayerConfig::new(
        "gas",
        0,
        RenderStyle::Glow {
            halo: 1.0,
            core: 0.5,
        },
    );
    gas.blend = BlendMode::Additive;
    gas.parallax = 0.01;
    gas.content = LayerContent::Spawn(SpawnSpec {
        count: 600,
        // 4.5 spawns/tick × ~133 frame mean life keeps roughly 600 alive
        population: Population::Streaming {
            spawn_chance: 0.75,
            per_tick: 6,
            max_population: 900,
        },
        origin: Origin::Center,
        size: Range::new(0.5, 4.5),
        opacity: Range::fixed(0.7),
        palette,
        lifetime: Some(Range::new(200.0 / 3.0, 200.0)),
        curve: AlphaCurve::Pulse,
        prewarm: true,
        twinkle: None,
        motion: MotionKind::Orbit {
            radius: Range::new(50.0, 230.0),
            speed: OrbitSpeed::Random(Range::new(-0.0015, 0.0015)),
            squash: 0.5,
            spread: AngleSpread::Random,
            doppler: None,
            wobble: Some((Vec2::new(8.0, 4.0), 0.02)),
        },
    });

    let warm = Rgba::rgb8(255, 240, 220);
    let mut core = LayerConfig::new("core", 1, RenderStyle::Point);
    core.blend = BlendMode::Additive;
    core.decorations = vec![
        Decoration::RadialGlow {
            anchor: Vec2::splat(0.5),
            inner: Extent::Px(0.0),
            outer: Extent::Px(80.0),
            stops: vec![
                GradientStop::new(0.0, Rgba::rgb8(255, 220, 200)),
                GradientStop::new(0.5, Rgba::ROSE_GOLD.with_alpha(0.04 / 0.06)),
                GradientStop::new(1.0, Rgba::TRANSPARENT),
            ],
            alpha: Pulse::new(0.06, 0.03, 0.02),
        },
        Decoration::PulsingStar {
            anchor: Vec2::splat(0.5),
            radius: Pulse::new(4.0, 1.5, 0.05),
            alpha: Pulse::new(0.6, 0.3, 0.07),
            color: warm,
        },
        Decoration::CrossFlare {
            anchor: Vec2::splat(0.5),
            arm: 40.0,
            width: 1.0,
            color: warm,
            alpha: Pulse::new(0.15, 0.1, 0.04),
        },
    ];

    SceneConfig::new(
        "nebula",
        size.x,
        size.y,
        Fade::Trail {
            color: Rgba::DEEP_SPACE.with_alpha(0.04),
        },
    )
    .with_layer(gas)
    .with_layer(core)
}

/// Accretion disk with Doppler beaming, photon sphere, event horizon and lensing arcs
pub fn black_hole(size: Vec2) -> SceneConfig {
    let mut rings = LayerConfig::new("accretion-glow", 0, RenderStyle::Point);
    rings.blend = BlendMode::Additive;
    rings.decorations = vec![Decoration::GlowRings {
        outer: 160.0,
        inner: 80.0,
        step: 5.0,
        squash: 0.3,
        width: 3.0,
        color: Rgba::rgb8(255, 140, 50),
        max_alpha: 0.08,
    }];

    let mut disk = LayerConfig::new("disk", 1, RenderStyle::Point);
    disk.blend = BlendMode::Additive;
    disk.content = LayerContent::Spawn(SpawnSpec {
        opacity: Range::new(0.24, 0.8),
        ..spawn(
            200,
            vec![Rgba::EMBER, Rgba::AMBER],
            Range::new(0.5, 2.5),
            MotionKind::Orbit {
                radius: Range::new(90.0, 210.0),
                speed: OrbitSpeed::InverseRadius { base: 0.003, k: 0.5 },
                squash: 0.3,
                spread: AngleSpread::Even,
                doppler: Some(Doppler::default()),
                wobble: None,
            },
        )
    });

    let mut photon = LayerConfig::new("photon-sphere", 2, RenderStyle::Point);
    photon.blend = BlendMode::Additive;
    photon.decorations = vec![Decoration::RadialGlow {
        anchor: Vec2::splat(0.5),
        inner: Extent::Px(55.0),
        outer: Extent::Px(85.0),
        stops: vec![
            GradientStop::new(0.0, Rgba::TRANSPARENT),
            GradientStop::new(0.5, Rgba::rgb8(255, 200, 100).with_alpha(0.12)),
            GradientStop::new(1.0, Rgba::TRANSPARENT),
        ],
        alpha: Pulse::steady(1.0),
    }];

    // Opaque: hides disk particles passing behind it
    let mut horizon = LayerConfig::new("event-horizon", 3, RenderStyle::Point);
    horizon.decorations = vec![glow(
        Vec2::splat(0.5),
        Extent::Px(65.0),
        vec![
            GradientStop::new(0.0, Rgba::BLACK),
            GradientStop::new(0.7, Rgba::BLACK),
            GradientStop::new(0.9, Rgba::DEEP_SPACE.with_alpha(0.8)),
            GradientStop::new(1.0, Rgba::TRANSPARENT),
        ],
    )];

    let mut lensing = LayerConfig::new("lensing", 4, RenderStyle::Point);
    lensing.blend = BlendMode::Additive;
    lensing.decorations = vec![Decoration::LensingArcs {
        anchor: Vec2::splat(0.5),
        count: 3,
        orbit_radius: 80.0,
        dot_radius: 3.0,
        angular_speed: 0.01,
        color: Rgba::rgb8(200, 200, 255),
        alpha: Pulse::new(0.2, 0.1, 0.03),
    }];

    SceneConfig::new(
        "black-hole",
        size.x,
        size.y,
        Fade::Trail {
            color: Rgba::DEEP_SPACE.with_alpha(0.15),
        },
    )
    .with_layer(rings)
    .with_layer(disk)
    .with_layer(photon)
    .with_layer(horizon)
    .with_layer(lensing)
}

/// Confetti rising from below the bottom edge and falling back under gravity
pub fn finale(size: Vec2) -> SceneConfig {
    let mut sparks = LayerConfig::new(
        "sparks",
        0,
        RenderStyle::LineFlare {
            min_size: 2.0,
            alpha: 0.4,
        },
    );
    sparks.blend = BlendMode::Additive;
    sparks.content = LayerContent::Spawn(SpawnSpec {
        count: 0,
        population: Population::Streaming {
            spawn_chance: 0.7,
            per_tick: 1,
            max_population: consts::DEFAULT_MAX_POPULATION / 2,
        },
        origin: Origin::BelowBottom { margin: 10 },
        size: Range::new(0.5, 3.5),
        opacity: Range::fixed(1.0),
        palette: vec![
            Rgba::ROSE_GOLD,
            Rgba::ROSE_LIGHT,
            Rgba::TEAL,
            Rgba::GOLD,
            Rgba::PINK,
            Rgba::WHITE,
        ],
        lifetime: Some(Range::new(50.0, 125.0)),
        curve: AlphaCurve::Fade,
        prewarm: false,
        twinkle: Some(TwinkleSpec {
            speed: Range::fixed(0.1),
            base: 0.7,
            depth: 0.3,
        }),
        motion: MotionKind::RiseFall {
            velocity_x: Range::new(-1.0, 1.0),
            velocity_y: Range::new(-4.5, -1.5),
            gravity: 0.03,
        },
    });

    SceneConfig::new(
        "finale",
        size.x,
        size.y,
        Fade::Trail {
            color: Rgba::DEEP_SPACE.with_alpha(0.08),
        },
    )
    .with_layer(sparks)
}

/// Inner planets through Saturn on fixed circular orbits around a glowing sun
pub fn orbit_diagram(size: Vec2) -> SceneConfig {
    // (orbit radius px, period s, color, display size)
    const PLANETS: [(f32, f32, Rgba, f32); 6] = [
        (90.0, 4.0, Rgba::rgb8(181, 181, 181), 30.0),
        (130.0, 6.0, Rgba::rgb8(232, 205, 160), 38.0),
        (175.0, 10.0, Rgba::rgb8(75, 156, 211), 40.0),
        (220.0, 16.0, Rgba::rgb8(193, 68, 14), 32.0),
        (280.0, 40.0, Rgba::rgb8(200, 139, 58), 70.0),
        (345.0, 100.0, Rgba::rgb8(228, 209, 145), 65.0),
    ];
    let center = Vec2::splat(0.5);

    let mut orbits = LayerConfig::new("orbits", 0, RenderStyle::Point);
    orbits.decorations = PLANETS
        .iter()
        .map(|&(radius, _, _, _)| Decoration::OrbitRing {
            anchor: center,
            radius,
            width: 1.0,
            color: Rgba::LAVENDER.with_alpha(0.1),
        })
        .collect();

    let mut sun = LayerConfig::new("sun", 1, RenderStyle::Point);
    sun.blend = BlendMode::Additive;
    sun.decorations = vec![
        glow(
            center,
            Extent::Px(60.0),
            vec![
                GradientStop::new(0.0, Rgba::GOLD.with_alpha(0.6)),
                GradientStop::new(0.5, Rgba::AMBER.with_alpha(0.2)),
                GradientStop::new(1.0, Rgba::TRANSPARENT),
            ],
        ),
        Decoration::PulsingStar {
            anchor: center,
            radius: Pulse::new(25.0, 1.0, 0.03),
            alpha: Pulse::steady(1.0),
            color: Rgba::GOLD,
        },
    ];

    let mut planets = LayerConfig::new(
        "planets",
        2,
        RenderStyle::Glow {
            halo: 1.5,
            core: 0.9,
        },
    );
    planets.content = LayerContent::Bodies(
        PLANETS
            .iter()
            .enumerate()
            .map(|(i, &(orbit_radius, period, color, display))| Body {
                anchor: center,
                orbit_radius,
                // Spread starting positions so the diagram doesn't open in a line
                angle: i as f32 * 2.4,
                angular_speed: TAU / (period * consts::NOMINAL_FPS),
                size: display / 8.0,
                color,
            })
            .collect(),
    );

    SceneConfig::new("orbit-diagram", size.x, size.y, Fade::Clear)
        .with_layer(orbits)
        .with_layer(sun)
        .with_layer(planets)
}

/// Earth (UTC) and Mars (MTC) clock faces whose hand tips orbit in real time
pub fn space_time_clock(size: Vec2, unix: f64) -> SceneConfig {
    // A Mars second is 1/86400 of a sol, slightly longer than an Earth second
    let mars_rate = (86_400.0 / clock::MARS_SOL_SECONDS) as f32;
    let faces = [
        (Vec2::new(0.25, 0.5), clock::earth_utc(unix), 1.0, Rgba::rgb8(75, 156, 211)),
        (Vec2::new(0.75, 0.5), clock::mars_coordinated(unix), mars_rate, Rgba::rgb8(193, 68, 14)),
    ];

    log::info!(
        "Space-time clock set to Earth {} UTC, Mars {} MTC (sol {})",
        faces[0].1.display(),
        faces[1].1.display(),
        faces[1].1.sol.unwrap_or_default()
    );

    let mut dials = LayerConfig::new("dials", 0, RenderStyle::Point);
    let mut hands = LayerConfig::new("hands", 1, RenderStyle::Point);
    hands.blend = BlendMode::Additive;
    let mut bodies = Vec::new();
    for (anchor, reading, rate, color) in faces {
        dials.decorations.push(Decoration::OrbitRing {
            anchor,
            radius: 95.0,
            width: 2.0,
            color,
        });
        dials.decorations.push(Decoration::OrbitRing {
            anchor,
            radius: 85.0,
            width: 0.5,
            color: color.with_alpha(0.19),
        });
        dials.decorations.push(Decoration::PulsingStar {
            anchor,
            radius: Pulse::steady(4.0),
            alpha: Pulse::steady(1.0),
            color,
        });
        bodies.extend(clock_hands(anchor, &reading, rate, color));
    }
    hands.content = LayerContent::Bodies(bodies);

    SceneConfig::new("space-time-clock", size.x, size.y, Fade::Clear)
        .with_layer(dials)
        .with_layer(hands)
}

/// Hour, minute and second hand tips for one face. `rate` is clock seconds
/// per Earth second.
fn clock_hands(anchor: Vec2, reading: &ClockReading, rate: f32, color: Rgba) -> [Body; 3] {
    let angles = reading.hand_angles();
    // Radians per frame for one revolution every `seconds` clock seconds
    let speed = |seconds: f32| TAU * rate / (seconds * consts::NOMINAL_FPS);
    let hand = |radius: f32, degrees: f32, period: f32, size: f32, color: Rgba| Body {
        anchor,
        orbit_radius: radius,
        angle: HandAngles::to_surface_radians(degrees),
        angular_speed: speed(period),
        size,
        color,
    };
    [
        hand(50.0, angles.hour, 43_200.0, 4.0, color),
        hand(70.0, angles.minute, 3_600.0, 3.0, color.with_alpha(0.8)),
        hand(75.0, angles.second, 60.0, 2.0, Rgba::PINK),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pointer::PointerSignal;
    use crate::engine::raster::PixelSurface;
    use crate::engine::render_loop::ManualTicker;
    use crate::engine::surface::RecordingSurface;
    use crate::scene::handle::{Scene, mount};
    use crate::settings::Settings;

    const VIEWPORT: Vec2 = Vec2::new(1024.0, 768.0);

    #[test]
    fn test_every_preset_validates() {
        for kind in SceneKind::ALL {
            let config = kind.config(VIEWPORT);
            assert_eq!(config.validate(), Ok(()), "{}", kind.as_str());
            assert_eq!(SceneKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_preset_populations() {
        let settings = Settings::default();
        let count = |config: SceneConfig| Scene::build(&config, &settings).map(|s| s.population());
        assert_eq!(count(starfield(VIEWPORT)), Ok(355));
        assert_eq!(count(nebula(Vec2::new(800.0, 500.0))), Ok(600));
        assert_eq!(count(black_hole(Vec2::splat(500.0))), Ok(200));
        assert_eq!(count(finale(Vec2::new(1024.0, 400.0))), Ok(0));
        assert_eq!(count(orbit_diagram(Vec2::splat(720.0))), Ok(6));
        assert_eq!(count(space_time_clock(Vec2::new(440.0, 220.0), 0.0)), Ok(6));
    }

    #[test]
    fn test_orbit_diagram_keeps_six_planets() {
        let mut scene = Scene::build(&orbit_diagram(Vec2::splat(720.0)), &Settings::default()).expect("valid");
        let mut surface = RecordingSurface::new(720.0, 720.0);
        for _ in 0..6000 {
            scene.tick(&mut surface, Vec2::ZERO);
            surface.take_commands();
        }
        assert_eq!(scene.population(), 6);
        // After 100 s Mercury (4 s period) is back where it started
        let mercury = scene.layers()[2]
            .field
            .as_ref()
            .and_then(|f| f.particles().first().map(|p| p.pos))
            .unwrap_or_default();
        assert!(mercury.distance(Vec2::new(360.0 + 90.0, 360.0)) < 0.5, "{mercury}");
    }

    #[test]
    fn test_finale_population_stabilizes() {
        let mut scene = Scene::build(&finale(Vec2::new(800.0, 400.0)), &Settings::default()).expect("valid");
        let mut surface = RecordingSurface::new(800.0, 400.0);
        let mut trailing = Vec::new();
        for tick in 0..2500 {
            scene.tick(&mut surface, Vec2::ZERO);
            surface.take_commands();
            if tick >= 1500 {
                trailing.push(scene.population() as f32);
            }
        }
        let mean = trailing.iter().sum::<f32>() / trailing.len() as f32;
        assert!(mean > 40.0 && mean < 85.0, "mean {mean}");
        assert!(scene.population() < consts::DEFAULT_MAX_POPULATION / 2);
    }

    #[test]
    fn test_nebula_stays_under_cap() {
        let mut scene = Scene::build(&nebula(Vec2::new(800.0, 500.0)), &Settings::default()).expect("valid");
        let mut surface = RecordingSurface::new(800.0, 500.0);
        for _ in 0..1500 {
            scene.tick(&mut surface, Vec2::ZERO);
            surface.take_commands();
        }
        let population = scene.population();
        assert!(population > 400 && population <= 900, "{population}");
    }

    #[test]
    fn test_black_hole_horizon_occludes() {
        let config = black_hole(Vec2::splat(500.0));
        let mut handle = mount(
            PixelSurface::new(500, 500),
            &config,
            &Settings::default(),
            PointerSignal::new(),
            ManualTicker::new(),
        )
        .expect("valid");
        for _ in 0..120 {
            if let Some(id) = handle.ticker_mut().fire_next() {
                handle.on_tick(id);
            }
        }
        let surface = handle.surface();
        let center = surface.pixel(250, 250).unwrap_or(Rgba::WHITE);
        assert!(center.r < 0.05, "{center:?}");
        // The approaching (right) side of the disk is lit
        let lit = (330..460).any(|x| (240..260).any(|y| surface.pixel(x, y).is_some_and(|p| p.r > 0.2)));
        assert!(lit);
    }

    #[test]
    fn test_clock_hands_start_at_reading() {
        // 1970-01-01T03:00:00Z: hour hand at 90°, i.e. pointing +x
        let config = space_time_clock(Vec2::new(440.0, 220.0), 3.0 * 3600.0);
        let scene = Scene::build(&config, &Settings::default()).expect("valid");
        let hour_tip = scene.layers()[1]
            .field
            .as_ref()
            .and_then(|f| f.particles().first().map(|p| p.pos))
            .unwrap_or_default();
        assert!(hour_tip.distance(Vec2::new(110.0 + 50.0, 110.0)) < 1e-3, "{hour_tip}");
    }
}
