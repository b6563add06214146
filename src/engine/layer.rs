//! Depth layers

use serde::{Deserialize, Serialize};

use super::decoration::Decoration;
use super::field::ParticleField;
use super::surface::BlendMode;

/// How each particle in a layer is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RenderStyle {
    /// Filled circle of the particle's size
    Point,
    /// Radial gradient of radius `size · halo`; `core` sets the mid-stop alpha fraction
    Glow { halo: f32, core: f32 },
    /// Point, plus a cross flare of arm `3 · size` for particles larger than `min_size`
    LineFlare { min_size: f32, alpha: f32 },
}

/// Ordered group of particles and decorations sharing one parallax depth
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    /// Sort key; lower depths are drawn first (further back)
    pub depth: u32,
    /// Pixel offset per unit pointer offset, as a fraction of the surface size
    pub parallax: f32,
    pub style: RenderStyle,
    pub blend: BlendMode,
    /// Wrap particle positions around the surface edges after parallax
    pub wrap: bool,
    pub decorations: Vec<Decoration>,
    pub field: Option<ParticleField>,
}

impl Layer {
    pub fn new(name: impl Into<String>, depth: u32) -> Self {
        Self {
            name: name.into(),
            depth,
            parallax: 0.0,
            style: RenderStyle::Point,
            blend: BlendMode::Alpha,
            wrap: false,
            decorations: Vec::new(),
            field: None,
        }
    }

    pub fn population(&self) -> usize {
        self.field.as_ref().map_or(0, ParticleField::len)
    }
}
