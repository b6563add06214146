//! Error types for scene configuration and mounting
//!
//! The chat boundary keeps its own errors in [`crate::chat`].

/// Invalid scene parameters, detected once at scene creation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field}: range min {min} is greater than max {max}")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },

    #[error("{field}: value {value} is not a finite number")]
    NotFinite { field: &'static str, value: f32 },

    #[error("{field}: value {value} must be positive")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field}: value {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("layer '{layer}' has an empty color palette")]
    EmptyPalette { layer: String },

    #[error("scene has no layers")]
    NoLayers,

    #[error("layer '{layer}' spawns particles but has no population cap")]
    MissingCap { layer: String },

    #[error("surface dimensions {width}x{height} must both be positive")]
    EmptySurface { width: f32, height: f32 },
}

/// A scene that could not be mounted; no animation is started
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("drawing surface unavailable: {0}")]
    ResourceUnavailable(String),
}
