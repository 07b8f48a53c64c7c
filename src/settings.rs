//! Player preferences
//!
//! Stored as JSON in LocalStorage. Missing fields fall back to defaults so
//! older saved blobs keep loading.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_DAMAGE_TEXTS;

/// Visual effect budget
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

    /// Following preset in the menu cycle Low, Medium, High
    pub fn next(self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Live particle cap
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 150,
            QualityPreset::Medium => 400,
            QualityPreset::High => 1000,
        }
    }

    /// Segments used for circle tessellation
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 12,
            QualityPreset::Medium => 20,
            QualityPreset::High => 32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: QualityPreset,

    /// Hit sparks and death bursts
    pub particles: bool,
    /// Floating damage numbers and labels
    pub damage_numbers: bool,

    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            damage_numbers: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Effective particle cap
    pub fn max_particles(&self) -> usize {
        if self.particles {
            self.quality.max_particles()
        } else {
            0
        }
    }

    /// Effective floating text cap
    pub fn max_texts(&self) -> usize {
        if self.damage_numbers {
            MAX_DAMAGE_TEXTS
        } else {
            0
        }
    }

    /// Gain applied to every sound effect
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "fireblade_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(json) = storage.and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten()) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring stored settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        else {
            return;
        };

        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("LocalStorage rejected settings");
                }
            }
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_caps() {
        let mut settings = Settings::default();
        assert_eq!(settings.max_particles(), 400);
        assert_eq!(settings.max_texts(), MAX_DAMAGE_TEXTS);

        settings.particles = false;
        settings.damage_numbers = false;
        assert_eq!(settings.max_particles(), 0);
        assert_eq!(settings.max_texts(), 0);
    }

    #[test]
    fn test_mute_zeroes_volume() {
        let mut settings = Settings::default();
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);
        assert!(settings.toggle_mute());
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"muted":true,"quality":"High"}"#)
            .expect("valid settings json");
        assert!(settings.muted);
        assert_eq!(settings.quality, QualityPreset::High);
        assert!(settings.particles);
    }

    #[test]
    fn test_preset_cycle_wraps() {
        let mut preset = QualityPreset::default();
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(preset);
            preset = preset.next();
        }
        assert_eq!(preset, QualityPreset::default());
        assert_eq!(
            seen,
            vec![QualityPreset::Medium, QualityPreset::High, QualityPreset::Low]
        );
        assert!(QualityPreset::High.max_particles() > QualityPreset::Low.max_particles());
    }
}
