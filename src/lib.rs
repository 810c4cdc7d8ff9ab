//! Glyph Dash - a one-button endless runner drawn from font glyphs
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game state)
//! - `glyphs`: Glyph measurement (canvas-backed with a deterministic fallback)
//! - `renderer`: Canvas 2D rendering pass (wasm only)
//! - `score`: Persisted best score
//! - `settings`: User preferences (particles, reduced motion)

pub mod glyphs;
pub mod score;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod renderer;

pub use score::BestScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Largest delta time a single step will integrate, regardless of how
    /// long the host stalled. Keeps obstacles from tunneling through the
    /// player after a long frame.
    pub const MAX_DT: f32 = 1.0 / 30.0;

    /// Logical viewport (layout units). The canvas height falls back to
    /// the same 640:200 aspect when the element reports no usable height.
    pub const VIEW_W: f32 = 640.0;
    pub const VIEW_H: f32 = 200.0;
    /// Distance from the viewport bottom to the ground line
    pub const GROUND_INSET: f32 = 16.0;

    /// Player defaults
    pub const PLAYER_X: f32 = 52.0;
    pub const PLAYER_SIZE_PX: f32 = 30.0;
    /// Downward acceleration, units/s²
    pub const GRAVITY: f32 = 1500.0;
    /// Vertical velocity applied on jump (negative = up in screen coordinates)
    pub const JUMP_IMPULSE: f32 = -460.0;

    /// World speed curve: speed = min(MAX_SPEED, BASE_SPEED + score * SPEED_GROWTH)
    pub const BASE_SPEED: f32 = 170.0;
    pub const MAX_SPEED: f32 = 520.0;
    pub const SPEED_GROWTH: f32 = 0.04;

    /// Score accrues at 60 units per second, so units ≈ frames at 60fps
    pub const SCORE_RATE: f32 = 60.0;

    /// Spawn pacing: base delay range in seconds
    pub const SPAWN_DELAY_MIN: f32 = 0.75;
    pub const SPAWN_DELAY_MAX: f32 = 1.35;
    /// Obstacles enter this far past the right edge
    pub const SPAWN_MARGIN: f32 = 10.0;
    /// Obstacles are culled once fully this far past the left edge
    pub const DESPAWN_MARGIN: f32 = 30.0;

    /// Obstacle cluster geometry
    pub const CLUSTER_SIZE_MIN: f32 = 20.0;
    pub const CLUSTER_SIZE_MAX: f32 = 33.0;
    pub const CLUSTER_JITTER: f32 = 5.0;
    pub const CLUSTER_GLYPH_MIN: f32 = 18.0;
    pub const CLUSTER_GAP_MIN: f32 = 2.0;
    pub const CLUSTER_GAP_MAX: f32 = 4.0;
    pub const OBSTACLE_MIN_W: f32 = 14.0;
    pub const OBSTACLE_MIN_H: f32 = 16.0;

    /// Loss burst size
    pub const BURST_COUNT: usize = 14;
    /// Sparks die once their radius decays below this
    pub const SPARK_MIN_RADIUS: f32 = 0.4;
    /// Multiplicative spark radius decay rate per second
    pub const SPARK_DECAY: f32 = 1.8;
}

/// World speed for a given score: non-decreasing, clamped to
/// [BASE_SPEED, MAX_SPEED].
#[inline]
pub fn speed_for_score(score: f32) -> f32 {
    (consts::BASE_SPEED + score * consts::SPEED_GROWTH).min(consts::MAX_SPEED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_starts_at_base() {
        assert_eq!(speed_for_score(0.0), consts::BASE_SPEED);
    }

    #[test]
    fn test_speed_caps() {
        assert_eq!(speed_for_score(1e9), consts::MAX_SPEED);
    }

    #[test]
    fn test_speed_monotonic() {
        let mut prev = speed_for_score(0.0);
        for i in 1..2000 {
            let s = speed_for_score(i as f32 * 17.0);
            assert!(s >= prev, "speed decreased at score {}", i * 17);
            assert!(s <= consts::MAX_SPEED);
            prev = s;
        }
    }
}
