//! Animation settings and preferences
//!
//! Stored as JSON: LocalStorage on the web, a file named by the
//! `STELLAR_CANVAS_SETTINGS` environment variable on native.

use serde::{Deserialize, Serialize};

use crate::consts;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Hard population ceiling for any single streaming layer
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 300,
            QualityPreset::Medium => consts::DEFAULT_MAX_POPULATION,
            QualityPreset::High => 2048,
        }
    }

    /// Multiplier applied to configured particle counts
    pub fn count_scale(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.5,
            QualityPreset::Medium => 1.0,
            QualityPreset::High => 1.0,
        }
    }
}

/// User preferences applied to every mounted scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    /// Partial-alpha fade between frames; off means a full clear every tick
    pub trails: bool,
    /// Pointer-driven parallax
    pub parallax: bool,

    // === Accessibility ===
    /// Reduced motion (no parallax, decorations stop pulsing)
    pub reduced_motion: bool,

    /// Fixed RNG seed; `None` uses the scene's own seed
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            trails: true,
            parallax: true,
            reduced_motion: false,
            seed: None,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Effective parallax (respects reduced_motion)
    pub fn effective_parallax(&self) -> bool {
        self.parallax && !self.reduced_motion
    }

    /// Whether decorations animate (respects reduced_motion)
    pub fn animate(&self) -> bool {
        !self.reduced_motion
    }

    /// Scale a configured particle count by the quality preset
    pub fn scale_count(&self, count: usize) -> usize {
        (count as f32 * self.quality.count_scale()).round() as usize
    }

    /// Clamp a configured population cap to the preset ceiling
    pub fn cap_population(&self, max_population: usize) -> usize {
        max_population.min(self.quality.max_particles())
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "stellar_canvas_settings";

    /// Environment variable naming a JSON settings file
    pub const ENV_VAR: &'static str = "STELLAR_CANVAS_SETTINGS";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only). Returns whether the write succeeded.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> bool {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok()).flatten() else {
            log::warn!("LocalStorage unavailable; settings not saved");
            return false;
        };
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not serialize settings: {e}");
                return false;
            }
        };
        match storage.set_item(Self::STORAGE_KEY, &json) {
            Ok(()) => {
                log::info!("Settings saved");
                true
            }
            Err(e) => {
                log::warn!("Could not save settings: {e:?}");
                false
            }
        }
    }

    /// Load settings from the file named by `STELLAR_CANVAS_SETTINGS`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::env::var(Self::ENV_VAR) {
            Ok(path) => Self::load_from(std::path::Path::new(&path)),
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to the file named by `STELLAR_CANVAS_SETTINGS`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> bool {
        match std::env::var(Self::ENV_VAR) {
            Ok(path) => self.save_to(std::path::Path::new(&path)),
            Err(_) => {
                log::warn!("{} is not set; settings not saved", Self::ENV_VAR);
                false
            }
        }
    }

    /// Read a JSON settings file, falling back to defaults on any error
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read settings file {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write settings as JSON. Returns whether the write succeeded.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> bool {
        let result = self
            .to_json()
            .map_err(std::io::Error::other)
            .and_then(|json| std::fs::write(path, json));
        match result {
            Ok(()) => {
                log::info!("Settings saved to {}", path.display());
                true
            }
            Err(e) => {
                log::warn!("Could not save settings to {}: {e}", path.display());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"quality":"Low","reduced_motion":true}"#)
            .unwrap_or_default();
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(settings.reduced_motion);
        assert!(settings.trails);
        assert!(!settings.effective_parallax());
        assert!(!settings.animate());
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            seed: Some(42),
            trails: false,
            ..Settings::from_preset(QualityPreset::High)
        };
        let json = settings.to_json().unwrap_or_default();
        assert_eq!(Settings::from_json(&json).ok(), Some(settings));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(Settings::from_json("{quality: ").is_err());
        assert!(Settings::from_json(r#"{"quality":"Ultra"}"#).is_err());
    }

    #[test]
    fn test_quality_scaling() {
        let low = Settings::from_preset(QualityPreset::Low);
        assert_eq!(low.scale_count(200), 100);
        assert_eq!(low.cap_population(5000), 300);
        let medium = Settings::default();
        assert_eq!(medium.scale_count(50), 50);
        assert_eq!(medium.cap_population(600), 600);
        assert_eq!(QualityPreset::from_str("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::High.as_str(), "High");
    }

    #[test]
    fn test_save_then_load_file() {
        let path = std::env::temp_dir().join(format!("stellar-canvas-settings-{}.json", std::process::id()));
        let settings = Settings {
            quality: QualityPreset::Low,
            parallax: false,
            seed: Some(9),
            ..Settings::default()
        };
        assert!(settings.save_to(&path));
        assert_eq!(Settings::load_from(&path), settings);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_failed_save_reported() {
        let path = std::env::temp_dir().join("stellar-canvas-missing-dir").join("nested").join("settings.json");
        assert!(!Settings::default().save_to(&path));
        assert_eq!(Settings::load_from(&path), Settings::default());
    }
}
