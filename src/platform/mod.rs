//! Platform bindings
//!
//! Browser-only pieces live in `web` (wasm32):
//! - Canvas 2D surface
//! - requestAnimationFrame tick source
//! - Pointer and resize listeners, removed on unmount
//!
//! Native builds drive scenes headlessly (see the binary) and need nothing here.

#[cfg(target_arch = "wasm32")]
pub mod web;
