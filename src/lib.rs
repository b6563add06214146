//! Stellar Canvas - procedural celestial animations for a 2D raster surface
//!
//! Core modules:
//! - `engine`: Deterministic particle engine (fields, motion, layers, compositing, render loop)
//! - `scene`: Per-visual configuration, presets and mount/unmount lifecycle
//! - `settings`: User preferences (quality, trails, reduced motion)
//! - `chat`: Credential-rotating relay for the cosmic guide chat
//! - `clock`: Earth and Mars clock readings
//! - `platform`: Browser canvas + requestAnimationFrame binding (wasm32 only)

pub mod chat;
pub mod clock;
pub mod color;
pub mod engine;
pub mod error;
pub mod platform;
pub mod scene;
pub mod settings;

pub use color::Rgba;
pub use error::{ConfigError, MountError};
pub use scene::{SceneConfig, SceneHandle, SceneKind, mount, unmount};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Nominal display refresh rate the presets are tuned for
    pub const NOMINAL_FPS: f32 = 60.0;
    /// One tick of simulated time, measured in frames
    pub const FRAME_DT: f32 = 1.0;

    /// Seed used when neither the settings nor the host provide one
    pub const DEFAULT_SEED: u64 = 0x5EED_C0DE;

    /// Hard population cap for streaming scenes that don't set their own
    pub const DEFAULT_MAX_POPULATION: usize = 1024;

    /// Parallax sensitivity bounds accepted by scene validation
    pub const MAX_PARALLAX: f32 = 1.0;
}

/// Wrap an angle to [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Wrap a coordinate into [0, extent); extents of zero leave it unchanged
#[inline]
pub fn wrap_coord(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return value;
    }
    let wrapped = value.rem_euclid(extent);
    if wrapped >= extent { 0.0 } else { wrapped }
}
