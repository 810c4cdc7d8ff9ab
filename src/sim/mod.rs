//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clamped variable timestep, never more than MAX_DT per call
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, overlaps};
pub use spawn::{next_spawn_delay, spawn_obstacle};
pub use state::{
    ClusterGlyph, FACE_IDLE, FACE_LOSE, FACE_RUN, GamePhase, GameState, OBSTACLE_GLYPHS, Obstacle,
    Player, Spark,
};
pub use tick::tick;
