//! Session configuration
//!
//! Passed explicitly into the session at construction. Persisted in
//! LocalStorage on the web; read from a JSON file natively.

use serde::{Deserialize, Serialize};

use crate::WorldBounds;
use crate::consts::{TILE_SIZE, WORLD_HEIGHT, WORLD_WIDTH};

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyPreset {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl DifficultyPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPreset::Easy => "Easy",
            DifficultyPreset::Normal => "Normal",
            DifficultyPreset::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyPreset::Easy),
            "normal" | "med" | "medium" => Some(DifficultyPreset::Normal),
            "hard" => Some(DifficultyPreset::Hard),
            _ => None,
        }
    }

    /// Tornado speed multiplier for this preset
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            DifficultyPreset::Easy => 0.75,
            DifficultyPreset::Normal => 1.0,
            DifficultyPreset::Hard => 1.5,
        }
    }
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Session length (seconds)
    pub session_seconds: f32,
    /// Combo lost per second while not aiming
    pub combo_decay_per_second: f32,

    // === World ===
    /// Terrain tile edge (world units)
    pub tile_size: f32,
    pub world_width: f32,
    pub world_height: f32,

    // === Difficulty ===
    /// Speed multiplier applied to every tornado
    pub difficulty: f32,
    /// Player vehicle health
    pub max_health: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            session_seconds: 90.0,
            combo_decay_per_second: 0.5,

            tile_size: TILE_SIZE,
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,

            difficulty: 1.0,
            max_health: 100.0,
        }
    }
}

impl Settings {
    /// Default settings at a difficulty preset
    pub fn from_preset(preset: DifficultyPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    pub fn apply_preset(&mut self, preset: DifficultyPreset) {
        self.difficulty = preset.speed_multiplier();
    }

    pub fn bounds(&self) -> WorldBounds {
        WorldBounds::new(self.world_width, self.world_height)
    }

    /// Parse a (possibly partial) JSON document; missing keys take defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Replace nonsensical values with defaults or clamp them
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let positive = |v: f32, fallback: f32| if v.is_finite() && v > 0.0 { v } else { fallback };
        self.session_seconds = positive(self.session_seconds, defaults.session_seconds);
        self.tile_size = positive(self.tile_size, defaults.tile_size);
        self.world_width = positive(self.world_width, defaults.world_width);
        self.world_height = positive(self.world_height, defaults.world_height);
        self.max_health = positive(self.max_health, defaults.max_health);
        self.difficulty = if self.difficulty.is_finite() {
            self.difficulty.max(0.0)
        } else {
            defaults.difficulty
        };
        self.combo_decay_per_second = if self.combo_decay_per_second.is_finite() {
            self.combo_decay_per_second.max(0.0)
        } else {
            defaults.combo_decay_per_second
        };
        self
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "storm_chaser_settings";

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
                    Err(e) => log::warn!("Stored settings unreadable ({}), using defaults", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only). Returns whether they were stored.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> bool {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::warn!("No LocalStorage, settings not saved");
            return false;
        };
        match serde_json::to_string(self) {
            Ok(json) => report_save(storage.set_item(Self::STORAGE_KEY, &json)),
            Err(e) => {
                log::warn!("Failed to encode settings: {}", e);
                false
            }
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Can't read {}: {}, using defaults", path.display(), e);
                return Self::default();
            }
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Bad settings in {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> bool {
        // Nothing persisted natively
        false
    }
}

/// Log the outcome of a storage write
#[cfg(any(target_arch = "wasm32", test))]
fn report_save<E: std::fmt::Debug>(result: Result<(), E>) -> bool {
    match result {
        Ok(()) => {
            log::info!("Settings saved");
            true
        }
        Err(e) => {
            log::warn!("Failed to save settings: {:?}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_merges_over_defaults() {
        let s = Settings::from_json(r#"{ "session_seconds": 60, "difficulty": 1.5, "extra": true }"#)
            .unwrap();
        assert_eq!(s.session_seconds, 60.0);
        assert_eq!(s.difficulty, 1.5);
        assert_eq!(s.combo_decay_per_second, 0.5);
        assert_eq!(s.tile_size, 75.0);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(Settings::from_json("not json").is_err());
        assert!(Settings::from_json(r#"{ "tile_size": "big" }"#).is_err());
    }

    #[test]
    fn test_failed_storage_write_is_reported() {
        assert!(report_save::<&str>(Ok(())));
        assert!(!report_save(Err("QuotaExceededError")));
    }

    #[test]
    fn test_sanitized_clamps_nonsense() {
        let s = Settings {
            session_seconds: -5.0,
            combo_decay_per_second: -1.0,
            tile_size: 0.0,
            world_width: f32::NAN,
            world_height: 900.0,
            difficulty: -2.0,
            max_health: 0.0,
        }
        .sanitized();
        assert_eq!(s.session_seconds, 90.0);
        assert_eq!(s.combo_decay_per_second, 0.0);
        assert_eq!(s.tile_size, 75.0);
        assert_eq!(s.world_width, 2400.0);
        assert_eq!(s.world_height, 900.0);
        assert_eq!(s.difficulty, 0.0);
        assert_eq!(s.max_health, 100.0);
    }

    #[test]
    fn test_presets() {
        assert_eq!(Settings::from_preset(DifficultyPreset::Hard).difficulty, 1.5);
        assert_eq!(DifficultyPreset::from_str("EASY"), Some(DifficultyPreset::Easy));
        assert_eq!(DifficultyPreset::from_str("nightmare"), None);
    }

    #[test]
    fn test_json_round_trip_keeps_values() {
        let s = Settings::from_preset(DifficultyPreset::Easy);
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_missing_file_falls_back() {
        let s = Settings::load_from_path(std::path::Path::new("/nonexistent/storm.json"));
        assert_eq!(s, Settings::default());
    }
}
