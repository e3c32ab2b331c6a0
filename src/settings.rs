//! Game settings and tuning
//!
//! Persisted as JSON in the key-value store, separately from scores.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::KeyValueStore;

/// Gameplay balance knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Magnitude of the gravity scale applied to the body
    pub gravity_scale: f32,
    /// Vertical speed set on each flip
    pub flip_velocity: f32,
    /// Pixels beyond the visible half-height before dying
    pub bounds_margin: f32,
    /// Seconds per score point
    pub score_interval: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity_scale: GRAVITY_SCALE,
            flip_velocity: FLIP_VELOCITY,
            bounds_margin: BOUNDS_MARGIN,
            score_interval: SCORE_INTERVAL,
        }
    }
}

/// Player preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound effects on/off
    pub sound: bool,
    /// Background drone while alive
    pub ambient: bool,
    /// Master volume (0.0 - 1.0)
    pub volume: f32,

    // === Visual Effects ===
    /// Camera shake on death
    pub screen_shake: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,

    // === Debug ===
    /// R forces game over
    pub debug_keys: bool,

    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            ambient: true,
            volume: 0.8,
            screen_shake: true,
            reduced_motion: false,
            debug_keys: true,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "flip_gravity_settings";

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective ambient audio (needs sound enabled)
    pub fn effective_ambient(&self) -> bool {
        self.sound && self.ambient
    }

    /// Output volume for the audio back-end, 0.0 when sound is off
    pub fn effective_volume(&self) -> f32 {
        if self.sound && self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Load settings from the store, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                store.set(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.tuning.gravity_scale, 10.0);
        assert_eq!(settings.tuning.bounds_margin, 20.0);
        assert!(settings.effective_screen_shake());
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn test_effective_volume() {
        assert_eq!(Settings::default().effective_volume(), 0.8);

        let loud = Settings {
            volume: 3.0,
            ..Default::default()
        };
        assert_eq!(loud.effective_volume(), 1.0);

        let muted = Settings {
            sound: false,
            ..Default::default()
        };
        assert_eq!(muted.effective_volume(), 0.0);
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        settings.sound = false;
        settings.tuning.bounds_margin = 35.0;
        settings.save(&mut store);

        let loaded = Settings::load(&store);
        assert!(!loaded.sound);
        assert!(!loaded.effective_ambient());
        assert_eq!(loaded.tuning.bounds_margin, 35.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, r#"{"screen_shake":false,"tuning":{"flip_velocity":20.0}}"#);
        let loaded = Settings::load(&store);
        assert!(!loaded.screen_shake);
        assert!(loaded.sound);
        assert_eq!(loaded.tuning.flip_velocity, 20.0);
        assert_eq!(loaded.tuning.gravity_scale, 10.0);
    }

    #[test]
    fn test_garbage_falls_back() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "nope");
        let loaded = Settings::load(&store);
        assert!(loaded.sound);
    }
}
