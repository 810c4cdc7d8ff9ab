//! Game state and core simulation types
//!
//! Everything the step and render passes touch lives in one explicit
//! `GameState` so a test harness can drive a whole session without a
//! browser in sight.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use crate::consts::*;
use crate::glyphs::GlyphMetrics;
use crate::speed_for_score;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the first input; simulation is idle, renderer shows
    /// the start banner
    NotStarted,
    /// Active run
    Running,
    /// Run ended on a collision; waiting for restart
    GameOver,
}

/// Player faces, one per phase. The collision box is the max envelope
/// across all three so swapping faces never changes the hitbox.
pub const FACE_IDLE: &str = "🐱";
pub const FACE_RUN: &str = "😼";
pub const FACE_LOSE: &str = "🙀";

/// Symbols the spawner builds obstacle clusters from
pub const OBSTACLE_GLYPHS: &[&str] = &["🌵", "🪨", "🌲", "🍄"];

/// The player sprite. `pos` is the top-left of the collision box; x is
/// fixed for the whole session, only y moves.
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Vertical velocity (positive = falling)
    pub vy: f32,
    pub grounded: bool,
    /// Collision box extent, constant across a session
    pub size: Vec2,
}

impl Player {
    /// Measure all three faces and take the max envelope, then rest the
    /// player on the ground line.
    pub fn new<M: GlyphMetrics>(metrics: &M, ground_y: f32) -> Self {
        let mut w = 0.0f32;
        let mut h = 0.0f32;
        for face in [FACE_IDLE, FACE_RUN, FACE_LOSE] {
            let b = metrics.measure(face, PLAYER_SIZE_PX);
            w = w.max(b.width);
            h = h.max(b.height());
        }
        let size = Vec2::new(w, h);
        Self {
            pos: Vec2::new(PLAYER_X, ground_y - size.y),
            vy: 0.0,
            grounded: true,
            size,
        }
    }

    #[inline]
    pub fn hitbox(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    /// Apply the jump impulse. Only valid while grounded; no double-jump,
    /// no variable height.
    pub fn jump(&mut self) {
        if self.grounded {
            self.vy = JUMP_IMPULSE;
            self.grounded = false;
        }
    }

    /// Face glyph for the given phase
    pub fn face(phase: GamePhase) -> &'static str {
        match phase {
            GamePhase::NotStarted => FACE_IDLE,
            GamePhase::Running => FACE_RUN,
            GamePhase::GameOver => FACE_LOSE,
        }
    }
}

/// One glyph inside an obstacle cluster, positioned relative to the
/// cluster origin. Frozen at spawn time.
#[derive(Debug, Clone)]
pub struct ClusterGlyph {
    pub symbol: &'static str,
    /// Horizontal offset from the cluster's left edge
    pub offset_x: f32,
    /// Font size the glyph is drawn at
    pub size_px: f32,
}

/// An obstacle: a horizontal run of glyphs sharing one collision box.
/// `pos` is the top-left; the box rests exactly on the ground line.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: Vec2,
    pub glyphs: Vec<ClusterGlyph>,
}

impl Obstacle {
    #[inline]
    pub fn hitbox(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }
}

/// A loss spark. Decorative only - never collides with anything.
#[derive(Debug, Clone)]
pub struct Spark {
    pub pos: Vec2,
    pub radius: f32,
    /// Extra horizontal speed on top of the world scroll
    pub drift: f32,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed, kept for restart and reproduction
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Real-valued score; floored for display and best-score comparisons
    pub score: f32,
    /// Best floored score seen so far (loaded at startup, raised on loss)
    pub best: u32,
    /// Current horizontal scroll rate, derived from score each step
    pub speed: f32,
    /// Countdown to the next obstacle spawn
    pub spawn_timer: f32,
    /// Viewport extent in layout units
    pub view: Vec2,
    /// Y of the ground line
    pub ground_y: f32,
    /// False under reduced motion: the loss burst is never spawned
    pub effects_enabled: bool,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub sparks: Vec<Spark>,
}

impl GameState {
    pub fn new<M: GlyphMetrics>(seed: u64, metrics: &M, view_w: f32, view_h: f32) -> Self {
        let ground_y = view_h - GROUND_INSET;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::NotStarted,
            score: 0.0,
            best: 0,
            speed: BASE_SPEED,
            spawn_timer: SPAWN_DELAY_MIN,
            view: Vec2::new(view_w, view_h),
            ground_y,
            effects_enabled: true,
            player: Player::new(metrics, ground_y),
            obstacles: Vec::new(),
            sparks: Vec::new(),
        }
    }

    /// Adopt a new viewport size. The ground line follows the bottom edge;
    /// a grounded player is re-seated on it.
    pub fn resize(&mut self, view_w: f32, view_h: f32) {
        self.view = Vec2::new(view_w, view_h);
        self.ground_y = view_h - GROUND_INSET;
        if self.player.grounded {
            self.player.pos.y = self.ground_y - self.player.size.y;
        }
    }

    /// Full reset into a fresh run: entity lists cleared, score zeroed,
    /// speed back to base, player re-seated and re-measured.
    pub fn restart<M: GlyphMetrics>(&mut self, metrics: &M) {
        self.rng = Pcg32::seed_from_u64(self.seed.wrapping_add(1));
        self.seed = self.seed.wrapping_add(1);
        self.score = 0.0;
        self.speed = BASE_SPEED;
        self.spawn_timer = SPAWN_DELAY_MIN;
        self.player = Player::new(metrics, self.ground_y);
        self.obstacles.clear();
        self.sparks.clear();
        self.phase = GamePhase::Running;
    }

    /// Jump intent (space / up-arrow / w). Starts the run on first press;
    /// ignored after a loss - restarting is a distinct intent.
    pub fn press_jump(&mut self) {
        match self.phase {
            GamePhase::NotStarted => {
                self.phase = GamePhase::Running;
                self.player.jump();
            }
            GamePhase::Running => self.player.jump(),
            GamePhase::GameOver => {}
        }
    }

    /// Restart intent (r key or the restart control): full reset from any
    /// phase straight into a running session.
    pub fn press_restart<M: GlyphMetrics>(&mut self, metrics: &M) {
        self.restart(metrics);
    }

    /// Pointer-down on the play surface. The first tap only starts the
    /// run; after a loss a tap restarts.
    pub fn pointer_down<M: GlyphMetrics>(&mut self, metrics: &M) {
        match self.phase {
            GamePhase::NotStarted => self.phase = GamePhase::Running,
            GamePhase::Running => self.player.jump(),
            GamePhase::GameOver => self.restart(metrics),
        }
    }

    /// Recompute the world speed from the current score
    #[inline]
    pub fn refresh_speed(&mut self) {
        self.speed = speed_for_score(self.score);
    }

    /// Floored score as shown to the player
    #[inline]
    pub fn display_score(&self) -> u32 {
        self.score as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyphs::HeuristicMetrics;

    fn fresh() -> GameState {
        GameState::new(7, &HeuristicMetrics, VIEW_W, VIEW_H)
    }

    #[test]
    fn test_player_box_is_max_envelope() {
        let m = HeuristicMetrics;
        let player = Player::new(&m, 100.0);
        let mut w = 0.0f32;
        let mut h = 0.0f32;
        for face in [FACE_IDLE, FACE_RUN, FACE_LOSE] {
            let b = m.measure(face, PLAYER_SIZE_PX);
            w = w.max(b.width);
            h = h.max(b.height());
        }
        assert_eq!(player.size.x, w);
        assert_eq!(player.size.y, h);
        // The box does not depend on which face is showing
        for phase in [GamePhase::NotStarted, GamePhase::Running, GamePhase::GameOver] {
            let _ = Player::face(phase);
            assert_eq!(player.hitbox().w, w);
            assert_eq!(player.hitbox().h, h);
        }
    }

    #[test]
    fn test_player_rests_on_ground() {
        let state = fresh();
        let p = &state.player;
        assert!(p.grounded);
        assert_eq!(p.pos.y + p.size.y, state.ground_y);
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut p = Player::new(&HeuristicMetrics, 100.0);
        p.jump();
        assert_eq!(p.vy, JUMP_IMPULSE);
        assert!(!p.grounded);
        // Airborne jump is a no-op
        p.vy = -10.0;
        p.jump();
        assert_eq!(p.vy, -10.0);
    }

    #[test]
    fn test_first_jump_starts_run() {
        let mut state = fresh();
        state.press_jump();
        assert_eq!(state.phase, GamePhase::Running);
        assert!(!state.player.grounded);
    }

    #[test]
    fn test_first_tap_starts_without_jumping() {
        let mut state = fresh();
        state.pointer_down(&HeuristicMetrics);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.player.grounded);
    }

    #[test]
    fn test_jump_ignored_after_loss() {
        let mut state = fresh();
        state.phase = GamePhase::GameOver;
        state.press_jump();
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_tap_restarts_after_loss() {
        let mut state = fresh();
        state.phase = GamePhase::GameOver;
        state.score = 123.0;
        state.pointer_down(&HeuristicMetrics);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0.0);
    }

    #[test]
    fn test_restart_clears_everything() {
        let mut state = fresh();
        state.phase = GamePhase::GameOver;
        state.score = 480.0;
        state.speed = 400.0;
        state.obstacles.push(Obstacle {
            pos: Vec2::new(300.0, 150.0),
            size: Vec2::new(20.0, 20.0),
            glyphs: Vec::new(),
        });
        state.sparks.push(Spark {
            pos: Vec2::new(50.0, 150.0),
            radius: 3.0,
            drift: 10.0,
        });
        state.player.pos.y = 40.0;
        state.player.grounded = false;

        state.press_restart(&HeuristicMetrics);

        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.obstacles.is_empty());
        assert!(state.sparks.is_empty());
        assert_eq!(state.score, 0.0);
        assert_eq!(state.speed, BASE_SPEED);
        assert!(state.player.grounded);
        assert_eq!(state.player.pos.y, state.ground_y - state.player.size.y);
    }

    #[test]
    fn test_resize_reseats_grounded_player() {
        let mut state = fresh();
        state.resize(800.0, 250.0);
        assert_eq!(state.ground_y, 250.0 - GROUND_INSET);
        assert_eq!(state.player.pos.y, state.ground_y - state.player.size.y);
    }
}
