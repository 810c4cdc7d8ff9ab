//! Canvas 2D rendering
//!
//! A read-only pass over `GameState`: background grid, ground line,
//! obstacle clusters, the player's face, loss sparks and the text
//! overlays, redrawn in full every frame. Colors come from CSS custom
//! properties on the document root so the page stylesheet owns the theme.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::consts::*;
use crate::glyphs::GLYPH_FONT;
use crate::sim::{GamePhase, GameState, Player};

/// Spacing of the cosmetic background grid lines
const GRID_STEP: f32 = 40.0;
/// Font for overlay text
const UI_FONT: &str = "'Fira Code', monospace";

/// Renderer colors, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: String,
    pub ink: String,
    pub grid: String,
    pub accent: String,
    pub shadow: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: "#f7f3e8".to_string(),
            ink: "#38352c".to_string(),
            grid: "rgba(56,53,44,0.07)".to_string(),
            accent: "#d95d4e".to_string(),
            shadow: "rgba(56,53,44,0.18)".to_string(),
        }
    }
}

impl Theme {
    /// Read the theme from CSS custom properties on the document root,
    /// falling back to the built-in palette for any missing variable.
    pub fn from_document(document: &Document) -> Self {
        let mut theme = Self::default();
        let style = document
            .document_element()
            .and_then(|root| {
                web_sys::window().and_then(|w| w.get_computed_style(&root).ok().flatten())
            });

        if let Some(style) = style {
            let mut read = |name: &str, slot: &mut String| {
                if let Ok(value) = style.get_property_value(name) {
                    let value = value.trim();
                    if !value.is_empty() {
                        *slot = value.to_string();
                    }
                }
            };
            read("--gd-bg", &mut theme.bg);
            read("--gd-ink", &mut theme.ink);
            read("--gd-grid", &mut theme.grid);
            read("--gd-accent", &mut theme.accent);
            read("--gd-shadow", &mut theme.shadow);
        }

        theme
    }
}

pub struct Renderer {
    ctx: CanvasRenderingContext2d,
    theme: Theme,
}

impl Renderer {
    pub fn new(canvas: &HtmlCanvasElement, theme: Theme) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        Ok(Self { ctx, theme })
    }

    /// Context handle for the glyph-metrics provider
    pub fn context(&self) -> CanvasRenderingContext2d {
        self.ctx.clone()
    }

    /// Draw one frame. `dpr` maps layout units onto backing-store pixels.
    pub fn draw(&self, state: &GameState, dpr: f64, show_hint: bool) {
        let ctx = &self.ctx;
        let w = state.view.x as f64;
        let h = state.view.y as f64;
        let ground = state.ground_y as f64;

        ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0).ok();

        // Background
        ctx.set_fill_style_str(&self.theme.bg);
        ctx.fill_rect(0.0, 0.0, w, h);

        // Faint vertical grid
        ctx.set_stroke_style_str(&self.theme.grid);
        ctx.set_line_width(1.0);
        ctx.begin_path();
        let mut x = GRID_STEP as f64;
        while x < w {
            ctx.move_to(x, 0.0);
            ctx.line_to(x, ground);
            x += GRID_STEP as f64;
        }
        ctx.stroke();

        // Ground line
        ctx.set_stroke_style_str(&self.theme.ink);
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.move_to(0.0, ground);
        ctx.line_to(w, ground);
        ctx.stroke();

        self.draw_obstacles(state, ground);
        self.draw_player(state, ground);

        if state.effects_enabled {
            self.draw_sparks(state);
        }

        self.draw_overlays(state, w, show_hint);
    }

    fn draw_obstacles(&self, state: &GameState, ground: f64) {
        let ctx = &self.ctx;
        ctx.set_text_align("left");
        ctx.set_text_baseline("bottom");

        for ob in &state.obstacles {
            // Soft silhouette behind the cluster
            ctx.set_fill_style_str(&self.theme.shadow);
            ctx.fill_rect(
                ob.pos.x as f64 + 1.0,
                ob.pos.y as f64 + 3.0,
                ob.size.x as f64,
                ob.size.y as f64,
            );

            ctx.set_fill_style_str(&self.theme.ink);
            for g in &ob.glyphs {
                ctx.set_font(&format!("{}px {}", g.size_px as u32, GLYPH_FONT));
                ctx.fill_text(g.symbol, (ob.pos.x + g.offset_x) as f64, ground)
                    .ok();
            }
        }
    }

    fn draw_player(&self, state: &GameState, ground: f64) {
        let ctx = &self.ctx;
        let p = &state.player;
        let baseline = (p.pos.y + p.size.y) as f64;

        // Ground shadow shrinks a little while airborne
        let center_x = (p.pos.x + p.size.x * 0.5) as f64;
        let squash = if p.grounded { 1.0 } else { 0.7 };
        ctx.set_fill_style_str(&self.theme.shadow);
        ctx.begin_path();
        ctx.ellipse(
            center_x,
            ground + 4.0,
            p.size.x as f64 * 0.45 * squash,
            3.0,
            0.0,
            0.0,
            std::f64::consts::TAU,
        )
        .ok();
        ctx.fill();

        // Face glyph, shadow pass first for contrast against the grid
        let face = Player::face(state.phase);
        ctx.set_font(&format!("{}px {}", PLAYER_SIZE_PX as u32, GLYPH_FONT));
        ctx.set_text_align("left");
        ctx.set_text_baseline("bottom");
        ctx.set_fill_style_str(&self.theme.shadow);
        ctx.fill_text(face, p.pos.x as f64 + 2.0, baseline + 2.0).ok();
        ctx.set_fill_style_str(&self.theme.ink);
        ctx.fill_text(face, p.pos.x as f64, baseline).ok();
    }

    fn draw_sparks(&self, state: &GameState) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str(&self.theme.accent);
        for s in &state.sparks {
            ctx.begin_path();
            ctx.arc(
                s.pos.x as f64,
                s.pos.y as f64,
                s.radius as f64,
                0.0,
                std::f64::consts::TAU,
            )
            .ok();
            ctx.fill();
        }
    }

    fn draw_overlays(&self, state: &GameState, w: f64, show_hint: bool) {
        let ctx = &self.ctx;

        if show_hint {
            ctx.set_fill_style_str(&self.theme.ink);
            ctx.set_global_alpha(0.55);
            ctx.set_font(&format!("11px {}", UI_FONT));
            ctx.set_text_align("left");
            ctx.set_text_baseline("top");
            ctx.fill_text("space / \u{2191} / w: jump   r: restart", 10.0, 8.0)
                .ok();
            ctx.set_global_alpha(1.0);
        }

        let banner = match state.phase {
            GamePhase::NotStarted => Some("tap or press space to start"),
            GamePhase::GameOver => Some("game over - tap or press r to restart"),
            GamePhase::Running => None,
        };
        if let Some(text) = banner {
            ctx.set_fill_style_str(&self.theme.ink);
            ctx.set_font(&format!("16px {}", UI_FONT));
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            ctx.fill_text(text, w / 2.0, state.view.y as f64 * 0.38)
                .ok();
        }
    }
}
