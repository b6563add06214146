//! Mounted scenes
//!
//! A [`Scene`] is the per-visual state (layers, frame counter, RNG). A
//! [`SceneHandle`] binds it to a surface, the shared pointer signal and a
//! render loop. Tick order:
//! 1. Apply a pending resize
//! 2. Fade or clear the surface
//! 3. Spawn, advance and prune every layer
//! 4. Composite layers back to front
//! 5. Increment the frame counter and reschedule

use glam::Vec2;

use super::config::{Fade, SceneConfig};
use crate::engine::compositor::composite_frame;
use crate::engine::decoration::FrameContext;
use crate::engine::layer::Layer;
use crate::engine::pointer::PointerSignal;
use crate::engine::render_loop::{LoopState, RenderLoop, TickId, TickSource};
use crate::engine::rng::SceneRng;
use crate::engine::surface::Surface;
use crate::error::{ConfigError, MountError};
use crate::settings::Settings;

/// Frames between population debug logs (about ten seconds at 60 Hz)
const STATS_INTERVAL: u64 = 600;

/// Runtime state of one visual effect
#[derive(Debug, Clone)]
pub struct Scene {
    name: String,
    layers: Vec<Layer>,
    size: Vec2,
    pending_size: Option<Vec2>,
    frame: u64,
    dt: f32,
    fade: Fade,
    rng: SceneRng,
    parallax: bool,
    animate: bool,
}

impl Scene {
    /// Validate `config` and build every layer with its initial population
    pub fn build(config: &SceneConfig, settings: &Settings) -> Result<Self, ConfigError> {
        config.validate()?;

        let size = config.size();
        let mut rng = SceneRng::new(settings.seed.unwrap_or(config.seed));
        let mut layers: Vec<Layer> = config
            .layers
            .iter()
            .map(|layer| layer.build(size, settings, &mut rng))
            .collect();
        // Stable: equal depths keep their configured order
        layers.sort_by_key(|layer| layer.depth);

        let fade = match config.fade {
            Fade::Trail { .. } if !settings.trails => Fade::Clear,
            fade => fade,
        };

        Ok(Self {
            name: config.name.clone(),
            layers,
            size,
            pending_size: None,
            frame: 0,
            dt: config.dt,
            fade,
            rng,
            parallax: settings.effective_parallax(),
            animate: settings.animate(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Ticks run so far; wraps only at `u64::MAX`
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Total particles across all layers
    pub fn population(&self) -> usize {
        self.layers.iter().map(Layer::population).sum()
    }

    /// Queue new dimensions; applied at the top of the next tick.
    /// Particle state is untouched.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            log::warn!("Scene '{}': ignoring resize to {width}x{height}", self.name);
            return;
        }
        self.pending_size = Some(Vec2::new(width, height));
    }

    /// Run one tick against `surface`
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S, pointer: Vec2) {
        if let Some(size) = self.pending_size.take() {
            let scale = size / self.size;
            for field in self.layers.iter_mut().filter_map(|layer| layer.field.as_mut()) {
                field.rescale(scale);
            }
            self.size = size;
            surface.resize(size);
        }

        match self.fade {
            Fade::Clear => surface.clear(),
            Fade::Trail { color } => surface.fade(color),
        }

        for layer in &mut self.layers {
            if let Some(field) = &mut layer.field {
                field.emit(self.size, &mut self.rng);
                field.advance(self.dt);
                field.prune();
            }
        }

        let ctx = FrameContext {
            frame: self.frame,
            size: self.size,
            animate: self.animate,
        };
        let pointer = if self.parallax { pointer } else { Vec2::ZERO };
        composite_frame(&self.layers, pointer, &ctx, surface);

        self.frame = self.frame.wrapping_add(1);
        if self.frame % STATS_INTERVAL == 0 {
            log::debug!(
                "Scene '{}': frame {}, {} particles in {} layers",
                self.name,
                self.frame,
                self.population(),
                self.layers.len()
            );
        }
    }
}

/// A scene bound to its surface and render loop
#[derive(Debug)]
pub struct SceneHandle<S: Surface, T: TickSource> {
    scene: Scene,
    surface: S,
    pointer: PointerSignal,
    render_loop: RenderLoop<T>,
}

impl<S: Surface, T: TickSource> SceneHandle<S, T> {
    /// Host callback: run the tick identified by `id`. Returns false when the
    /// id is stale or the loop is not running (nothing is drawn).
    pub fn on_tick(&mut self, id: TickId) -> bool {
        if !self.render_loop.accept(id) {
            return false;
        }
        self.scene.tick(&mut self.surface, self.pointer.get());
        self.render_loop.reschedule();
        true
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.scene.resize(width, height);
    }

    /// Resume after [`Self::stop`]
    pub fn start(&mut self) -> bool {
        self.render_loop.start()
    }

    /// Cancel the pending tick; safe to call repeatedly
    pub fn stop(&mut self) -> bool {
        self.render_loop.stop()
    }

    pub fn state(&self) -> LoopState {
        self.render_loop.state()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn ticker(&self) -> &T {
        self.render_loop.ticker()
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        self.render_loop.ticker_mut()
    }

    pub fn frame(&self) -> u64 {
        self.scene.frame()
    }

    pub fn population(&self) -> usize {
        self.scene.population()
    }
}

/// Validate `config`, build the scene and start its loop on `ticker`.
/// On error nothing is scheduled.
pub fn mount<S: Surface, T: TickSource>(
    mut surface: S,
    config: &SceneConfig,
    settings: &Settings,
    pointer: PointerSignal,
    ticker: T,
) -> Result<SceneHandle<S, T>, MountError> {
    let scene = match Scene::build(config, settings) {
        Ok(scene) => scene,
        Err(e) => {
            log::warn!("Scene '{}' rejected: {e}", config.name);
            return Err(e.into());
        }
    };

    let available = surface.size();
    if !(available.x > 0.0 && available.y > 0.0) {
        log::warn!("Scene '{}': surface is {}x{}, not mounting", config.name, available.x, available.y);
        return Err(MountError::ResourceUnavailable(format!(
            "surface has size {}x{}",
            available.x, available.y
        )));
    }
    if available != scene.size() {
        surface.resize(scene.size());
    }

    let mut render_loop = RenderLoop::new(ticker);
    render_loop.start();
    log::info!(
        "Mounted scene '{}' ({}x{}, {} layers, {} particles, seed {:#x})",
        scene.name(),
        scene.size().x,
        scene.size().y,
        scene.layers().len(),
        scene.population(),
        scene.rng.seed()
    );

    Ok(SceneHandle {
        scene,
        surface,
        pointer,
        render_loop,
    })
}

/// Stop the loop and release the scene
pub fn unmount<S: Surface, T: TickSource>(mut handle: SceneHandle<S, T>) {
    handle.stop();
    log::info!(
        "Unmounted scene '{}' after {} frames",
        handle.scene.name(),
        handle.scene.frame()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::engine::field::{Origin, Population, SpawnSpec};
    use crate::engine::layer::RenderStyle;
    use crate::engine::motion::{Motion, MotionKind};
    use crate::engine::particle::AlphaCurve;
    use crate::engine::render_loop::ManualTicker;
    use crate::engine::rng::Range;
    use crate::engine::surface::{DrawCommand, RecordingSurface};
    use crate::scene::config::{LayerConfig, LayerContent};
    use crate::scene::presets::{black_hole, orbit_diagram};

    fn drift_scene(count: usize) -> SceneConfig {
        let mut layer = LayerConfig::new("dust", 0, RenderStyle::Point);
        layer.parallax = 0.02;
        layer.content = LayerContent::Spawn(SpawnSpec {
            count,
            population: Population::Fixed,
            origin: Origin::Anywhere,
            size: Range::new(0.5, 1.5),
            opacity: Range::new(0.3, 1.0),
            palette: vec![Rgba::WHITE, Rgba::LAVENDER],
            lifetime: None,
            curve: AlphaCurve::Constant,
            prewarm: false,
            twinkle: None,
            motion: MotionKind::Drift {
                velocity_x: Range::new(-0.3, 0.3),
                velocity_y: Range::new(-0.3, 0.3),
                damping: 0.999,
            },
        });
        SceneConfig::new("drift", 640.0, 480.0, Fade::Clear).with_layer(layer)
    }

    fn run(handle: &mut SceneHandle<RecordingSurface, ManualTicker>, ticks: usize) {
        for _ in 0..ticks {
            let Some(id) = handle.ticker_mut().fire_next() else {
                break;
            };
            handle.on_tick(id);
            handle.surface_mut().take_commands();
        }
    }

    #[test]
    fn test_drift_scene_end_to_end() {
        let mut handle = mount(
            RecordingSurface::new(640.0, 480.0),
            &drift_scene(50),
            &Settings::default(),
            PointerSignal::new(),
            ManualTicker::new(),
        )
        .expect("valid scene mounts");

        run(&mut handle, 1000);
        handle.stop();

        assert_eq!(handle.population(), 50);
        assert_eq!(handle.frame(), 1000);
        assert_eq!(handle.ticker().outstanding(), 0);
        assert_eq!(handle.state(), LoopState::Stopped);
    }

    #[test]
    fn test_no_tick_after_stop() {
        let mut handle = mount(
            RecordingSurface::new(640.0, 480.0),
            &drift_scene(5),
            &Settings::default(),
            PointerSignal::new(),
            ManualTicker::new(),
        )
        .expect("valid scene mounts");
        run(&mut handle, 3);
        // Host delivers a late callback for the tick we're about to cancel
        let Some(late) = handle.ticker_mut().fire_next() else {
            panic!("a tick should be pending");
        };
        handle.stop();
        handle.stop();
        assert!(!handle.on_tick(late));
        assert_eq!(handle.frame(), 3);

        handle.start();
        run(&mut handle, 2);
        assert_eq!(handle.frame(), 5);
    }

    #[test]
    fn test_resize_keeps_population_and_applies_next_tick() {
        let mut handle = mount(
            RecordingSurface::new(640.0, 480.0),
            &drift_scene(30),
            &Settings::default(),
            PointerSignal::new(),
            ManualTicker::new(),
        )
        .expect("valid scene mounts");
        run(&mut handle, 10);
        let before: Vec<Vec2> = handle.scene().layers()[0]
            .field
            .as_ref()
            .map(|f| f.particles().iter().map(|p| p.pos).collect())
            .unwrap_or_default();

        handle.resize(1280.0, 720.0);
        // Nothing changes until the next tick starts
        assert_eq!(handle.surface().size(), Vec2::new(640.0, 480.0));
        assert_eq!(handle.scene().size(), Vec2::new(640.0, 480.0));

        run(&mut handle, 1);
        assert_eq!(handle.surface().size(), Vec2::new(1280.0, 720.0));
        assert_eq!(handle.population(), 30);
        let after: Vec<Vec2> = handle.scene().layers()[0]
            .field
            .as_ref()
            .map(|f| f.particles().iter().map(|p| p.pos).collect())
            .unwrap_or_default();
        // Positions continued from where they were (one step of slow drift)
        for (a, b) in before.iter().zip(&after) {
            assert!(a.distance(*b) < 1.0);
        }
    }

    fn orbit_centers(scene: &Scene) -> Vec<Vec2> {
        scene
            .layers()
            .iter()
            .filter_map(|layer| layer.field.as_ref())
            .flat_map(|field| field.particles())
            .filter_map(|p| match p.motion {
                Motion::Orbit { center, .. } => Some(center),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_resize_recenters_orbits_with_decorations() {
        let mut handle = mount(
            RecordingSurface::new(500.0, 500.0),
            &black_hole(Vec2::splat(500.0)),
            &Settings::default(),
            PointerSignal::new(),
            ManualTicker::new(),
        )
        .expect("valid scene mounts");
        run(&mut handle, 5);
        let population = handle.population();

        handle.resize(1000.0, 1000.0);
        run(&mut handle, 1);

        let centers = orbit_centers(handle.scene());
        assert!(!centers.is_empty());
        for center in &centers {
            assert!(center.distance(Vec2::splat(500.0)) < 1e-3, "orbit around {center}");
        }
        // The disk itself sits around the new center, not the old one
        let disk: Vec<Vec2> = handle
            .scene()
            .layers()
            .iter()
            .filter_map(|layer| layer.field.as_ref())
            .flat_map(|field| field.particles().iter().map(|p| p.pos))
            .collect();
        let centroid = disk.iter().copied().sum::<Vec2>() / disk.len() as f32;
        assert!(centroid.distance(Vec2::splat(500.0)) < 50.0, "disk centroid {centroid}");
        assert_eq!(handle.population(), population);
    }

    #[test]
    fn test_resize_keeps_bodies_at_relative_anchor() {
        let mut handle = mount(
            RecordingSurface::new(720.0, 720.0),
            &orbit_diagram(Vec2::splat(720.0)),
            &Settings::default(),
            PointerSignal::new(),
            ManualTicker::new(),
        )
        .expect("valid scene mounts");
        run(&mut handle, 3);
        handle.resize(360.0, 540.0);
        run(&mut handle, 1);
        for center in orbit_centers(handle.scene()) {
            assert!(center.distance(Vec2::new(180.0, 270.0)) < 1e-3, "orbit around {center}");
        }
    }

    #[test]
    fn test_mount_rejects_invalid_config() {
        let mut config = drift_scene(10);
        config.layers[0].parallax = -0.5;
        let ticker = ManualTicker::new();
        let result = mount(
            RecordingSurface::new(640.0, 480.0),
            &config,
            &Settings::default(),
            PointerSignal::new(),
            ticker,
        );
        assert!(matches!(result, Err(MountError::Config(_))));
    }

    #[test]
    fn test_mount_requires_surface() {
        let result = mount(
            RecordingSurface::new(0.0, 0.0),
            &drift_scene(10),
            &Settings::default(),
            PointerSignal::new(),
            ManualTicker::new(),
        );
        assert!(matches!(result, Err(MountError::ResourceUnavailable(_))));
    }

    #[test]
    fn test_pointer_feeds_parallax_unless_reduced_motion() {
        let pointer = PointerSignal::new();
        pointer.set(Vec2::new(1.0, 0.0));

        let first_circle = |settings: &Settings| {
            let mut handle = mount(
                RecordingSurface::new(640.0, 480.0),
                &drift_scene(1),
                settings,
                pointer.clone(),
                ManualTicker::new(),
            )
            .expect("valid scene mounts");
            let id = handle.ticker_mut().fire_next();
            if let Some(id) = id {
                handle.on_tick(id);
            }
            let pos = handle.scene().layers()[0]
                .field
                .as_ref()
                .and_then(|f| f.particles().first().map(|p| p.pos))
                .unwrap_or_default();
            let drawn = handle.surface().commands().iter().find_map(|c| match c {
                DrawCommand::Circle { center, .. } => Some(*center),
                _ => None,
            });
            (pos, drawn)
        };

        let (pos, drawn) = first_circle(&Settings::default());
        assert_eq!(drawn, Some(pos + Vec2::new(0.02 * 640.0, 0.0)));

        let calm = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        let (pos, drawn) = first_circle(&calm);
        assert_eq!(drawn, Some(pos));
    }

    #[test]
    fn test_trails_setting_selects_fade() {
        let mut config = drift_scene(1);
        config.fade = Fade::Trail {
            color: Rgba::DEEP_SPACE.with_alpha(0.1),
        };
        let tick_first = |settings: &Settings| {
            let mut handle = mount(
                RecordingSurface::new(640.0, 480.0),
                &config,
                settings,
                PointerSignal::new(),
                ManualTicker::new(),
            )
            .expect("valid scene mounts");
            if let Some(id) = handle.ticker_mut().fire_next() {
                handle.on_tick(id);
            }
            handle.surface().commands().first().cloned()
        };
        assert_eq!(tick_first(&Settings::default()), Some(DrawCommand::Blend(crate::engine::BlendMode::Alpha)));
        let no_trails = Settings {
            trails: false,
            ..Settings::default()
        };
        assert_eq!(tick_first(&no_trails), Some(DrawCommand::Clear));
    }

    #[test]
    fn test_same_seed_same_scene() {
        let settings = Settings {
            seed: Some(7),
            ..Settings::default()
        };
        let a = Scene::build(&drift_scene(20), &settings).expect("valid");
        let b = Scene::build(&drift_scene(20), &settings).expect("valid");
        let pos = |s: &Scene| -> Vec<Vec2> {
            s.layers()[0]
                .field
                .as_ref()
                .map(|f| f.particles().iter().map(|p| p.pos).collect())
                .unwrap_or_default()
        };
        assert_eq!(pos(&a), pos(&b));
        // Settings seed overrides the config's
        assert_eq!(a.rng.seed(), 7);
        let c = Scene::build(&drift_scene(20), &Settings::default()).expect("valid");
        assert_eq!(c.rng.seed(), drift_scene(20).seed);
    }
}
