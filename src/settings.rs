//! Game settings and preferences
//!
//! Persisted separately from the best score in LocalStorage.

use serde::{Deserialize, Serialize};

/// User preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Decorative particle effects (the loss burst)
    pub particles: bool,
    /// Reduced motion: disables particles regardless of the toggle above.
    /// OR-ed with the system prefers-reduced-motion query at startup.
    pub reduced_motion: bool,
    /// Show the control hint overlay
    pub show_hint: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            particles: true,
            reduced_motion: false,
            show_hint: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "glyph_dash_settings";

    /// Effective particle toggle (respects reduced_motion)
    pub fn effective_particles(&self) -> bool {
        self.particles && !self.reduced_motion
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_overrides_particles() {
        let mut s = Settings::default();
        assert!(s.effective_particles());
        s.reduced_motion = true;
        assert!(!s.effective_particles());
        s.particles = false;
        s.reduced_motion = false;
        assert!(!s.effective_particles());
    }

    #[test]
    fn test_settings_round_trip() {
        let s = Settings {
            particles: false,
            reduced_motion: true,
            show_hint: false,
        };
        let json = serde_json::to_string(&s).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.particles, s.particles);
        assert_eq!(back.reduced_motion, s.reduced_motion);
        assert_eq!(back.show_hint, s.show_hint);
    }
}
