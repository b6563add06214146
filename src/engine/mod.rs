//! Deterministic animation engine
//!
//! Everything that evolves per tick lives here. Like a fixed-step game sim:
//! - Seeded RNG only (one stream per scene)
//! - Stable iteration order (layers back to front, particles in spawn order)
//! - No platform dependencies; drawing goes through the [`Surface`] trait

pub mod compositor;
pub mod decoration;
pub mod field;
pub mod layer;
pub mod motion;
pub mod particle;
pub mod pointer;
pub mod raster;
pub mod render_loop;
pub mod rng;
pub mod surface;

pub use compositor::composite_frame;
pub use decoration::Decoration;
pub use field::{ParticleField, Population, SpawnSpec};
pub use layer::{Layer, RenderStyle};
pub use motion::{Motion, MotionKind, OrbitSpeed};
pub use particle::{AlphaCurve, Lifespan, Particle};
pub use pointer::PointerSignal;
pub use raster::PixelSurface;
pub use render_loop::{LoopState, ManualTicker, RenderLoop, TickId, TickSource};
pub use rng::{Range, SceneRng};
pub use surface::{BlendMode, DrawCommand, GradientStop, RecordingSurface, Surface};
