//! Glyph measurement
//!
//! Every solid thing in the game - the player, the obstacle clusters - is a
//! font glyph, and its collision box comes from measuring that glyph at its
//! render size. The canvas-backed provider asks the 2D context for tight
//! bounding-box metrics; when the browser cannot report them (older engines
//! return non-finite or missing actualBoundingBox fields) a deterministic
//! heuristic stands in so layout never collapses to zero-size geometry.

/// Font stack used for all gameplay glyphs, measurement and drawing alike.
pub const GLYPH_FONT: &str =
    "'Noto Color Emoji', 'Apple Color Emoji', 'Segoe UI Emoji', sans-serif";

/// Tight pixel footprint of one rendered symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphBox {
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl GlyphBox {
    /// Heuristic box for a symbol the measurement surface cannot describe:
    /// ascent ≈ 0.78×size, descent ≈ 0.22×size, width never below 1px.
    pub fn heuristic(size_px: f32) -> Self {
        Self {
            width: size_px.max(1.0),
            ascent: size_px * 0.78,
            descent: size_px * 0.22,
        }
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    /// True when every field is finite and the box has usable extent.
    fn is_usable(&self) -> bool {
        self.width.is_finite()
            && self.ascent.is_finite()
            && self.descent.is_finite()
            && self.width >= 1.0
            && self.height() > 0.0
    }
}

/// A surface that can report the pixel footprint of a symbol at a size.
pub trait GlyphMetrics {
    fn measure(&self, symbol: &str, size_px: f32) -> GlyphBox;
}

/// Deterministic provider used by native builds and the test suite.
/// Mirrors the fallback the canvas provider degrades to.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMetrics;

impl GlyphMetrics for HeuristicMetrics {
    fn measure(&self, _symbol: &str, size_px: f32) -> GlyphBox {
        GlyphBox::heuristic(size_px)
    }
}

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasMetrics;

#[cfg(target_arch = "wasm32")]
mod canvas {
    use super::{GLYPH_FONT, GlyphBox, GlyphMetrics};
    use web_sys::CanvasRenderingContext2d;

    /// Measures glyphs through a 2D context's `measureText`.
    ///
    /// The context's active font is swapped for the requested size and
    /// restored before returning, so callers never observe the change.
    pub struct CanvasMetrics {
        ctx: CanvasRenderingContext2d,
    }

    impl CanvasMetrics {
        pub fn new(ctx: CanvasRenderingContext2d) -> Self {
            Self { ctx }
        }
    }

    impl GlyphMetrics for CanvasMetrics {
        fn measure(&self, symbol: &str, size_px: f32) -> GlyphBox {
            let saved_font = self.ctx.font();
            self.ctx
                .set_font(&format!("{}px {}", size_px as u32, GLYPH_FONT));

            let measured = self.ctx.measure_text(symbol).ok().map(|m| GlyphBox {
                width: m.width() as f32,
                ascent: m.actual_bounding_box_ascent() as f32,
                descent: m.actual_bounding_box_descent() as f32,
            });

            self.ctx.set_font(&saved_font);

            match measured {
                Some(b) if b.is_usable() => b,
                _ => GlyphBox::heuristic(size_px),
            }
        }
    }
}
