//! Fireblade entry point
//!
//! Browser build: wires DOM input, the HUD and the animation-frame loop
//! around a `Session`. Native build: plays a short headless run and logs it.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent, MouseEvent,
        PointerEvent,
    };

    use fireblade::audio::AudioManager;
    use fireblade::consts::ROAR_COST;
    use fireblade::renderer::{DrawList, RenderState, build_scene};
    use fireblade::sim::GamePhase;
    use fireblade::sim::progression::xp_threshold;
    use fireblade::wisdom::wisdom;
    use fireblade::{FrameOutcome, Session, Settings};

    /// Drag distance (CSS pixels) for a full-strength joystick push
    const JOYSTICK_RANGE: f32 = 50.0;

    /// Browser-side game instance
    struct Game {
        session: Session,
        render_state: Option<RenderState>,
        draw_list: DrawList,
        audio: AudioManager,
        settings: Settings,
        overlay: Option<CanvasRenderingContext2d>,
        /// Logical viewport (CSS pixels)
        viewport: Vec2,
        dpr: f64,
        joystick_origin: Option<Vec2>,
        /// An animation frame is currently scheduled
        loop_active: bool,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            let mut game = Self {
                session: Session::new(seed),
                render_state: None,
                draw_list: DrawList::default(),
                audio: AudioManager::new(),
                settings,
                overlay: None,
                viewport: Vec2::ONE,
                dpr: 1.0,
                joystick_origin: None,
                loop_active: false,
            };
            game.apply_settings();
            game
        }

        fn apply_settings(&mut self) {
            self.session
                .set_effect_limits(self.settings.max_particles(), self.settings.max_texts());
            self.audio.set_volume(self.settings.effective_volume());
        }

        fn start_run(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.session.start(seed);
            self.joystick_origin = None;
            self.audio.resume();
        }

        /// Returns true when the key is a movement key
        fn set_key(&mut self, code: &str, down: bool) -> bool {
            let keys = &mut self.session.input.keys;
            match code {
                "KeyW" | "ArrowUp" => keys.up = down,
                "KeyS" | "ArrowDown" => keys.down = down,
                "KeyA" | "ArrowLeft" => keys.left = down,
                "KeyD" | "ArrowRight" => keys.right = down,
                _ => return false,
            }
            true
        }

        fn request_ability(&mut self) {
            if self.session.phase() == GamePhase::Playing {
                self.session.request_ability();
            }
        }

        fn frame(&mut self, time: f64) -> FrameOutcome {
            let outcome = self.session.frame(time);
            if let FrameOutcome::Stepped(_) = outcome {
                self.audio.play_events(self.session.events());
            }
            self.render();
            outcome
        }

        fn render(&mut self) {
            build_scene(
                &self.session.state,
                self.viewport,
                self.settings.quality.circle_segments(),
                &mut self.draw_list,
            );

            if let Some(render_state) = self.render_state.as_mut() {
                match render_state.render(&self.draw_list.vertices) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => log::error!("Out of memory!"),
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
            self.draw_labels();
        }

        /// Floating texts go on the 2D overlay canvas
        fn draw_labels(&self) {
            let Some(ctx) = &self.overlay else { return };

            let _ = ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
            ctx.clear_rect(0.0, 0.0, self.viewport.x as f64, self.viewport.y as f64);
            ctx.set_font("bold 24px Arial");
            ctx.set_text_align("center");
            ctx.set_line_width(3.0);
            ctx.set_stroke_style_str("black");

            for label in &self.draw_list.labels {
                let text = label.text.to_string();
                let (x, y) = (label.pos.x as f64, label.pos.y as f64);
                ctx.set_global_alpha(label.alpha as f64);
                ctx.set_fill_style_str(&css_color(label.color));
                let _ = ctx.stroke_text(&text, x, y);
                let _ = ctx.fill_text(&text, x, y);
            }
            ctx.set_global_alpha(1.0);
        }

        fn update_hud(&self, document: &Document) {
            let status = self.session.status();

            set_text(document, "hud-level", &status.level.to_string());
            set_text(document, "hud-score", &status.score.to_string());
            set_text(
                document,
                "hud-hp-text",
                &format!("{:.0} / {:.0}", status.hp, status.max_hp),
            );
            set_fill(document, "hud-hp-fill", status.hp / status.max_hp);
            set_fill(document, "hud-mp-fill", status.mp / status.max_mp);
            set_fill(
                document,
                "hud-xp-fill",
                status.xp as f32 / xp_threshold(status.level) as f32,
            );

            if let Some(el) = document.get_element_by_id("hud-combo") {
                if status.combo > 1 {
                    let _ = el.set_attribute("class", "hud-item");
                    set_text(document, "hud-combo-value", &format!("{} HITS", status.combo));
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("ability-btn") {
                let class = if status.mp >= ROAR_COST {
                    "ability ready"
                } else {
                    "ability"
                };
                let _ = el.set_attribute("class", class);
            }
        }

        fn show_game_over(&self, document: &Document) {
            let summary = self.session.summary();
            let quote = wisdom(&summary, js_sys::Math::random() as f32);
            log::info!("Master says: {}", quote);

            set_text(document, "final-score", &summary.score.to_string());
            set_text(document, "final-level", &summary.level.to_string());
            set_text(document, "wisdom-text", quote);
            show(document, "game-over", true);
            show(document, "hud", false);
        }
    }

    fn css_color(color: [f32; 4]) -> String {
        format!(
            "rgb({}, {}, {})",
            (color[0] * 255.0) as u8,
            (color[1] * 255.0) as u8,
            (color[2] * 255.0) as u8
        )
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Size a bar fill element to a fraction of its track
    fn set_fill(document: &Document, id: &str, fraction: f32) {
        if let Some(el) = document.get_element_by_id(id) {
            let pct = (fraction.clamp(0.0, 1.0) * 100.0).round();
            let _ = el.set_attribute("style", &format!("width: {pct}%"));
        }
    }

    /// Toggle the `hidden` class, leaving other classes in place
    fn show(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let class = el.get_attribute("class").unwrap_or_default();
            let mut tokens: Vec<&str> = class
                .split_whitespace()
                .filter(|token| *token != "hidden")
                .collect();
            if !visible {
                tokens.push("hidden");
            }
            let _ = el.set_attribute("class", &tokens.join(" "));
        }
    }

    /// Logical size, physical size and device pixel ratio of the page
    fn measure(window: &web_sys::Window) -> (Vec2, u32, u32, f64) {
        let dpr = window.device_pixel_ratio();
        let w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0);
        let h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0);
        (
            Vec2::new(w as f32, h as f32),
            (w * dpr) as u32,
            (h * dpr) as u32,
            dpr,
        )
    }

    async fn init_gpu(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
        logical: Vec2,
    ) -> Result<RenderState, String> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| e.to_string())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| e.to_string())?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height, logical.to_array())
            .await
            .map_err(|e| e.to_string())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Fireblade starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        show(&document, "loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let overlay_canvas: Option<HtmlCanvasElement> = document
            .get_element_by_id("overlay")
            .and_then(|el| el.dyn_into().ok());

        let (logical, width, height, dpr) = measure(&window);
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));
        {
            let mut g = game.borrow_mut();
            g.viewport = logical;
            g.dpr = dpr;
            g.session.set_viewport(logical.x, logical.y);
            if let Some(overlay) = &overlay_canvas {
                overlay.set_width(width);
                overlay.set_height(height);
                g.overlay = overlay
                    .get_context("2d")
                    .ok()
                    .flatten()
                    .and_then(|ctx| ctx.dyn_into().ok());
            }
        }

        // The simulation runs even when no GPU is available
        match init_gpu(&canvas, width, height, logical).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("GPU unavailable, continuing without rendering: {}", e),
        }

        setup_keyboard(game.clone())?;
        setup_joystick(&document, game.clone());
        setup_buttons(&document, game.clone());
        setup_resize(&canvas, overlay_canvas, game.clone())?;
        setup_visibility(&document, game.clone())?;

        set_text(&document, "quality-btn", game.borrow().settings.quality.as_str());
        show(&document, "menu", true);
        game.borrow_mut().render();

        log::info!("Fireblade ready");
        Ok(())
    }

    fn start_game(game: &Rc<RefCell<Game>>) {
        game.borrow_mut().start_run();
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            show(&document, "menu", false);
            show(&document, "game-over", false);
            show(&document, "hud", true);
        }
        ensure_loop(game);
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let code = event.code();
                if g.set_key(&code, true) {
                    event.prevent_default();
                    return;
                }
                match code.as_str() {
                    "Space" if !event.repeat() => {
                        event.prevent_default();
                        g.request_ability();
                    }
                    "KeyM" => {
                        let muted = g.settings.toggle_mute();
                        g.settings.save();
                        g.apply_settings();
                        log::info!("Muted: {}", muted);
                    }
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().set_key(&event.code(), false);
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    /// Virtual joystick: drag anywhere on the pad, direction and strength
    /// come from the offset to the touch-down point
    fn setup_joystick(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(pad) = document.get_element_by_id("joystick") else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let origin = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                game.borrow_mut().joystick_origin = Some(origin);
            });
            let _ = pad.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                let Some(origin) = g.joystick_origin else {
                    return;
                };
                event.prevent_default();
                let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                let push = ((pos - origin) / JOYSTICK_RANGE).clamp_length_max(1.0);
                g.session.input.joystick = push;

                if let Some(knob) = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id("joystick-knob"))
                {
                    let offset = push * JOYSTICK_RANGE;
                    let _ = knob.set_attribute(
                        "style",
                        &format!("transform: translate({}px, {}px)", offset.x, offset.y),
                    );
                }
            });
            let _ = pad.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for name in ["pointerup", "pointercancel", "pointerleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                let mut g = game.borrow_mut();
                g.joystick_origin = None;
                g.session.input.joystick = Vec2::ZERO;
                if let Some(knob) = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id("joystick-knob"))
                {
                    let _ = knob.remove_attribute("style");
                }
            });
            let _ = pad.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    start_game(&game);
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("ability-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                game.borrow_mut().request_ability();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("quality-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let next = g.settings.quality.next();
                g.settings.quality = next;
                g.settings.save();
                g.apply_settings();
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    set_text(&document, "quality-btn", next.as_str());
                }
                log::info!("Quality: {}", next.as_str());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(
        canvas: &HtmlCanvasElement,
        overlay: Option<HtmlCanvasElement>,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (logical, width, height, dpr) = measure(&window);
            canvas.set_width(width);
            canvas.set_height(height);
            if let Some(overlay) = &overlay {
                overlay.set_width(width);
                overlay.set_height(height);
            }

            let mut g = game.borrow_mut();
            g.viewport = logical;
            g.dpr = dpr;
            g.session.set_viewport(logical.x, logical.y);
            if let Some(render_state) = g.render_state.as_mut() {
                render_state.resize(width, height, logical.to_array());
            }
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Hidden tab stops the clock; showing it again resumes the run
    fn setup_visibility(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if doc.hidden() {
                game.borrow_mut().session.stop();
                log::info!("Paused (tab hidden)");
            } else {
                game.borrow_mut().session.resume();
                ensure_loop(&game);
            }
        });
        document.add_event_listener_with_callback(
            "visibilitychange",
            closure.as_ref().unchecked_ref(),
        )?;
        closure.forget();
        Ok(())
    }

    /// Schedule frames unless a loop is already running
    fn ensure_loop(game: &Rc<RefCell<Game>>) {
        let schedule = {
            let mut g = game.borrow_mut();
            if g.loop_active || !g.session.is_running() {
                false
            } else {
                g.loop_active = true;
                true
            }
        };
        if schedule {
            request_animation_frame(game.clone());
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let outcome = {
            let mut g = game.borrow_mut();
            let outcome = g.frame(time);
            let document = web_sys::window().and_then(|w| w.document());

            if let Some(document) = &document {
                g.update_hud(document);
            }
            if outcome == FrameOutcome::Halted {
                g.loop_active = false;
                if g.session.phase() == GamePhase::GameOver {
                    if let Some(document) = &document {
                        g.show_game_over(document);
                    }
                }
            }
            outcome
        };

        if outcome != FrameOutcome::Halted {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    log::info!("Fireblade (native) starting headless run, seed {}", seed);
    log::info!("The playable build targets the browser - run with `trunk serve`");

    let summary = headless::run(seed, 120.0);
    let quote = fireblade::wisdom::wisdom(&summary, Pcg32::seed_from_u64(seed).random());

    println!("Score {} at level {}", summary.score, summary.level);
    println!("\"{}\"", quote);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use fireblade::consts::ROAR_COST;
    use fireblade::sim::RunSummary;
    use fireblade::{FrameOutcome, Session};
    use glam::Vec2;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Circle the arena at 60 fps for up to `seconds`, stunning whenever
    /// mana allows
    pub fn run(seed: u64, seconds: f64) -> RunSummary {
        let mut session = Session::new(seed);
        session.set_viewport(1280.0, 720.0);
        session.start(seed);

        let mut now = 0.0;
        while now < seconds * 1000.0 {
            let t = (now / 1000.0) as f32;
            session.input.joystick = Vec2::from_angle(t * 0.5);
            if session.status().mp >= ROAR_COST {
                session.request_ability();
            }
            if session.frame(now) == FrameOutcome::Halted {
                break;
            }
            now += FRAME_MS;
        }

        let summary = session.summary();
        log::info!(
            "Headless run finished after {:.1}s: {:?}",
            session.state.elapsed,
            summary
        );
        summary
    }
}
