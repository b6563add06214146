//! Scene adapters and lifecycle
//!
//! - `config`: validated, serde-friendly description of a visual
//! - `presets`: the built-in visuals
//! - `handle`: mount / unmount and the per-tick driver

pub mod config;
pub mod handle;
pub mod presets;

pub use config::{Body, Fade, LayerConfig, LayerContent, SceneConfig};
pub use handle::{Scene, SceneHandle, mount, unmount};
pub use presets::SceneKind;
