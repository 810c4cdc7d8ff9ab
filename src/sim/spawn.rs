//! Procedural obstacle spawning
//!
//! Clusters of 1-3 glyphs with randomized sizes and spacing, laid out
//! left-to-right and dropped onto the ground line just past the right
//! edge of the viewport. The RNG is passed in so tests can pin geometry
//! to a seed.

use glam::Vec2;
use rand::Rng;

use super::state::{ClusterGlyph, OBSTACLE_GLYPHS, Obstacle};
use crate::consts::*;
use crate::glyphs::GlyphMetrics;

/// Build one obstacle cluster entering from off-screen right.
///
/// The cluster's shape is fixed here; glyphs never move or resize
/// relative to the cluster origin afterwards.
pub fn spawn_obstacle<R: Rng, M: GlyphMetrics>(
    rng: &mut R,
    metrics: &M,
    view_w: f32,
    ground_y: f32,
) -> Obstacle {
    let count = rng.random_range(1..=3usize);
    let base_size = rng.random_range(CLUSTER_SIZE_MIN..=CLUSTER_SIZE_MAX);

    let mut glyphs = Vec::with_capacity(count);
    let mut cursor = 0.0f32;
    let mut trailing_gap = 0.0f32;
    let mut max_height = 0.0f32;

    for _ in 0..count {
        let size_px =
            (base_size + rng.random_range(-CLUSTER_JITTER..=CLUSTER_JITTER)).max(CLUSTER_GLYPH_MIN);
        let symbol = OBSTACLE_GLYPHS[rng.random_range(0..OBSTACLE_GLYPHS.len())];
        let b = metrics.measure(symbol, size_px);

        glyphs.push(ClusterGlyph {
            symbol,
            offset_x: cursor,
            size_px,
        });
        max_height = max_height.max(b.height());

        trailing_gap = rng.random_range(CLUSTER_GAP_MIN..=CLUSTER_GAP_MAX);
        cursor += b.width + trailing_gap;
    }

    // Width is the glyph span without the gap past the last glyph
    let width = (cursor - trailing_gap).max(OBSTACLE_MIN_W);
    let height = max_height.max(OBSTACLE_MIN_H);

    Obstacle {
        pos: Vec2::new(view_w + SPAWN_MARGIN, ground_y - height),
        size: Vec2::new(width, height),
        glyphs,
    }
}

/// Delay until the next spawn: a uniform base interval plus a bonus that
/// shrinks toward zero as speed approaches its cap, so obstacles pack
/// tighter as difficulty rises but never faster than the base range.
pub fn next_spawn_delay<R: Rng>(rng: &mut R, speed: f32) -> f32 {
    let base = rng.random_range(SPAWN_DELAY_MIN..=SPAWN_DELAY_MAX);
    base + ((520.0 - speed) / 900.0).max(0.0)
}
