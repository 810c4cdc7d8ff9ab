//! Glyph Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent, Window};

    use glyph_dash::consts::*;
    use glyph_dash::glyphs::CanvasMetrics;
    use glyph_dash::renderer::{Renderer, Theme};
    use glyph_dash::sim::{GamePhase, GameState, tick};
    use glyph_dash::{BestScore, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        metrics: CanvasMetrics,
        renderer: Renderer,
        settings: Settings,
        best: BestScore,
        /// Last rAF timestamp (ms); zeroed when the tab is hidden so the
        /// return frame does not integrate the hidden interval
        last_time: f64,
        /// Phase seen last frame, for persist-on-loss detection
        last_phase: GamePhase,
    }

    impl Game {
        /// Step the simulation and sync persistence on a loss transition
        fn update(&mut self, dt: f32) {
            tick(&mut self.state, &self.metrics, dt);

            if self.state.phase == GamePhase::GameOver && self.last_phase != GamePhase::GameOver {
                if self.best.record(self.state.display_score()) {
                    log::info!("New best score: {}", self.best.value);
                }
                self.state.best = self.state.best.max(self.best.value);
            }
            self.last_phase = self.state.phase;
        }

        /// Update score HUD elements in the DOM; missing elements are fine
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&self.state.display_score().to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-best") {
                el.set_text_content(Some(&self.state.best.to_string()));
            }
        }
    }

    /// Layout size of the canvas in CSS pixels. A collapsed height falls
    /// back to the fixed 640:200 aspect of the width.
    fn canvas_layout_size(canvas: &HtmlCanvasElement) -> (f32, f32) {
        let w = canvas.client_width() as f32;
        let w = if w > 0.0 { w } else { VIEW_W };
        let h = canvas.client_height() as f32;
        let h = if h > 0.0 { h } else { w * (VIEW_H / VIEW_W) };
        (w, h)
    }

    /// Size the backing store for the current devicePixelRatio
    fn apply_dpi(canvas: &HtmlCanvasElement, window: &Window, w: f32, h: f32) {
        let dpr = window.device_pixel_ratio();
        canvas.set_width((w as f64 * dpr) as u32);
        canvas.set_height((h as f64 * dpr) as u32);
    }

    fn prefers_reduced_motion(window: &Window) -> bool {
        window
            .match_media("(prefers-reduced-motion: reduce)")
            .ok()
            .flatten()
            .map(|mq| mq.matches())
            .unwrap_or(false)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Glyph Dash starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window; not initializing");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document; not initializing");
            return;
        };

        // Startup precondition: without the canvas there is no game
        let canvas: HtmlCanvasElement = match document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::error!("Canvas element missing; not initializing");
                return;
            }
        };

        let (view_w, view_h) = canvas_layout_size(&canvas);
        apply_dpi(&canvas, &window, view_w, view_h);

        let renderer = match Renderer::new(&canvas, Theme::from_document(&document)) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Renderer init failed: {:?}", e);
                return;
            }
        };
        let metrics = CanvasMetrics::new(renderer.context());

        let settings = Settings::load();
        let reduced = settings.reduced_motion || prefers_reduced_motion(&window);
        let best = BestScore::load();

        let seed = js_sys::Date::now() as u64;
        let mut state = GameState::new(seed, &metrics, view_w, view_h);
        state.best = best.value;
        state.effects_enabled = settings.particles && !reduced;

        log::info!(
            "Game initialized with seed {} ({}x{}, effects {})",
            seed,
            view_w,
            view_h,
            state.effects_enabled
        );

        let game = Rc::new(RefCell::new(Game {
            state,
            metrics,
            renderer,
            settings,
            best,
            last_time: 0.0,
            last_phase: GamePhase::NotStarted,
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game.clone());
        setup_visibility_handler(game.clone());
        setup_resize_handler(canvas.clone(), game.clone());

        request_animation_frame(game);

        log::info!("Glyph Dash running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard: jump keys and restart key
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let g = &mut *g;
                match event.key().as_str() {
                    " " | "ArrowUp" | "w" | "W" => {
                        event.prevent_default();
                        g.state.press_jump();
                    }
                    "r" | "R" => {
                        g.state.press_restart(&g.metrics);
                        log::info!("Restarted via keyboard");
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer: tap to start / jump / restart depending on phase
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let g = &mut *g;
                g.state.pointer_down(&g.metrics);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                let g = &mut *g;
                g.state.press_restart(&g.metrics);
                log::info!("Restarted via button");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Hidden tabs stop producing frames; drop the timestamp reference so
    /// the first frame back starts from a clean delta instead of a
    /// catch-up stall. Game state is untouched.
    fn setup_visibility_handler(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                game.borrow_mut().last_time = 0.0;
                log::info!("Tab hidden; clock reference reset");
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize_handler(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (w, h) = canvas_layout_size(&canvas);
            apply_dpi(&canvas, &window_clone, w, h);
            game.borrow_mut().state.resize(w, h);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt);

            let dpr = web_sys::window()
                .map(|w| w.device_pixel_ratio())
                .unwrap_or(1.0);
            let show_hint = g.settings.show_hint;
            g.renderer.draw(&g.state, dpr, show_hint);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless smoke run: auto-play with a trivial jump policy so the full
/// simulation is exercisable without a browser.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glyph_dash::consts::*;
    use glyph_dash::glyphs::HeuristicMetrics;
    use glyph_dash::sim::{GamePhase, GameState, tick};

    env_logger::init();
    log::info!("Glyph Dash (native) starting headless run...");

    let metrics = HeuristicMetrics;
    let mut state = GameState::new(0xC0FFEE, &metrics, VIEW_W, VIEW_H);
    state.press_jump();

    let dt = 1.0 / 60.0;
    let max_ticks = 60 * 120; // two minutes, then call it a day
    let mut ticks = 0u32;

    while state.phase == GamePhase::Running && ticks < max_ticks {
        // Jump when the nearest obstacle closes within ~0.3s of travel
        let player_right = state.player.pos.x + state.player.size.x;
        let closing = state
            .obstacles
            .iter()
            .any(|ob| ob.pos.x > player_right && ob.pos.x - player_right < state.speed * 0.3);
        if closing {
            state.press_jump();
        }

        tick(&mut state, &metrics, dt);
        ticks += 1;
    }

    log::info!(
        "Run ended after {:.1}s: score {} best {}",
        ticks as f32 * dt,
        state.display_score(),
        state.best
    );
    println!(
        "score: {}  best: {}",
        state.display_score(),
        state.best
    );
}
