//! Best score persistence
//!
//! One integer under a fixed LocalStorage key. Reads and writes are
//! best-effort: a missing or unparsable value means "no saved best", and
//! a failed write leaves the in-memory value as the record.

/// The best floored score across all sessions
#[derive(Debug, Clone, Copy, Default)]
pub struct BestScore {
    pub value: u32,
}

impl BestScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "glyph_dash_best";

    /// Raise the record if `score` beats it, persisting on change.
    /// Returns true when a new record was set.
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.value {
            self.value = score;
            self.save();
            true
        } else {
            false
        }
    }

    /// Load the saved best from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(raw)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(value) = raw.trim().parse::<u32>() {
                    log::info!("Loaded best score: {}", value);
                    return Self { value };
                }
                log::warn!("Ignoring unparsable best score {:?}", raw);
            }
        }

        log::info!("No saved best score, starting fresh");
        Self::default()
    }

    /// Save the best to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if storage
                .set_item(Self::STORAGE_KEY, &self.value.to_string())
                .is_err()
            {
                log::warn!("Could not persist best score {}", self.value);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_raises_on_better() {
        let mut best = BestScore::default();
        assert!(best.record(10));
        assert_eq!(best.value, 10);
    }

    #[test]
    fn test_record_is_monotonic() {
        let mut best = BestScore { value: 100 };
        assert!(!best.record(100));
        assert!(!best.record(40));
        assert_eq!(best.value, 100);
        assert!(best.record(101));
        assert_eq!(best.value, 101);
    }

    #[test]
    fn test_record_sequence_never_decreases() {
        let mut best = BestScore::default();
        let mut seen_max = 0u32;
        for score in [3u32, 1, 7, 7, 2, 30, 29, 31] {
            best.record(score);
            seen_max = seen_max.max(score);
            assert_eq!(best.value, seen_max);
        }
        assert_eq!(best.value, 31);
    }
}
