//! Browser adapter: canvas surface, DOM text sinks and overlays, listeners,
//! the `requestAnimationFrame` loop and the celebration's DOM particles.
//!
//! Everything that touches `web_sys` lives here. The page may provide the
//! elements itself (matching ids); anything missing is created on start.

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, HtmlInputElement,
    HtmlSelectElement, window,
};

use crate::celebration::{Celebration, Expiry, Particle, ParticleKind};
use crate::game::obstacle::{ObstacleGenerator, ObstacleShape};
use crate::game::{FIELD_HEIGHT, FIELD_WIDTH, GameEvent, GameState};
use crate::input::{self, InputOutcome};
use crate::render::{self, PathSegment, Surface};
use crate::settings::{SettingChange, Settings};

const CANVAS_ID: &str = "gameCanvas";
const SCORE_ID: &str = "score";
const HIGH_SCORE_ID: &str = "highScore";
const GAME_OVER_ID: &str = "gameOver";
const CELEBRATION_ID: &str = "celebration";
const BG_COLOR_ID: &str = "bgColor";
const PIPE_SHAPE_ID: &str = "pipeShape";
const STYLE_ID: &str = "fp-styles";

const COSMETIC_CSS: &str = "
.confetti { position: fixed; width: 8px; height: 8px; border-radius: 2px; pointer-events: none; z-index: 60; animation: fp-confetti 1.2s ease-out forwards; }
@keyframes fp-confetti { to { transform: translate(var(--dx), 220px) rotate(540deg); opacity: 0; } }
.heart-float { position: fixed; font-size: 28px; pointer-events: none; z-index: 60; animation: fp-float 2.5s ease-out forwards; }
@keyframes fp-float { to { transform: translateY(-90px); opacity: 0; } }
.pop { animation: fp-pop 0.4s ease-out; }
@keyframes fp-pop { 0% { transform: translateX(-50%) scale(0.6); } 100% { transform: translateX(-50%) scale(1); } }
";

// --- Console logging ----------------------------------------------------------

/// Forwards `log` records to the browser console.
pub struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            log::Level::Info => web_sys::console::info_1(&msg),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

pub fn init_logging() {
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    // A second call (e.g. hot reload) keeps the first logger.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

// --- Canvas surface -----------------------------------------------------------

struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl Surface for CanvasSurface {
    fn clear(&mut self, color: &str) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx.arc(cx, cy, r, 0.0, std::f64::consts::TAU).ok();
        self.ctx.fill();
    }

    fn fill_path(&mut self, path: &[PathSegment], color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        for seg in path {
            match *seg {
                PathSegment::MoveTo(x, y) => self.ctx.move_to(x, y),
                PathSegment::CubicTo(c1x, c1y, c2x, c2y, x, y) => {
                    self.ctx.bezier_curve_to(c1x, c1y, c2x, c2y, x, y)
                }
            }
        }
        self.ctx.fill();
    }
}

// --- App state ----------------------------------------------------------------

struct App {
    surface: CanvasSurface,
    game: GameState,
    settings: Settings,
    celebration: Celebration,
    // live cosmetic nodes keyed by particle id
    particles: HashMap<u32, Element>,
    rng: SmallRng,
}

thread_local! {
    static APP: std::cell::RefCell<Option<App>> = std::cell::RefCell::new(None);
    // listener sets + frame loops wired so far; stays at 1 after the first start
    static WIRED: std::cell::Cell<u32> = const { std::cell::Cell::new(0) };
}

fn with_app<T>(f: impl FnOnce(&mut App) -> T) -> Option<T> {
    APP.with(|cell| cell.borrow_mut().as_mut().map(f))
}

/// Set up the page and run the game. Later calls leave the running game
/// alone: one listener set, one frame loop.
pub fn start() -> Result<(), JsValue> {
    if APP.with(|cell| cell.borrow().is_some()) {
        log::debug!("start_game called while already running; ignoring");
        return Ok(());
    }
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    ensure_styles(&doc)?;

    let canvas: HtmlCanvasElement = match doc.get_element_by_id(CANVAS_ID) {
        Some(el) => el.dyn_into()?,
        None => {
            let c: HtmlCanvasElement = ensure_element(
                &doc,
                CANVAS_ID,
                "canvas",
                "display:block; margin:24px auto 0; border:2px solid #222; border-radius:8px; cursor:pointer;",
                "",
            )?
            .dyn_into()?;
            c.set_width(FIELD_WIDTH as u32);
            c.set_height(FIELD_HEIGHT as u32);
            c
        }
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    ensure_element(&doc, SCORE_ID, "div", "position:fixed; top:10px; left:12px; font-family:'Fira Code', monospace; font-size:16px; padding:4px 8px; background:rgba(0,0,0,0.42); border-radius:6px; color:#ffd166; z-index:45;", "Flappy Points: 0")?;
    ensure_element(&doc, HIGH_SCORE_ID, "div", "position:fixed; top:44px; left:12px; font-family:'Fira Code', monospace; font-size:16px; padding:4px 8px; background:rgba(0,0,0,0.42); border-radius:6px; color:#ffffff; z-index:45;", "High Score: 0")?;
    ensure_element(&doc, GAME_OVER_ID, "div", "display:none; position:fixed; inset:0; align-items:center; justify-content:center; font-family:sans-serif; font-size:36px; color:#fff; background:rgba(0,0,0,0.55); z-index:50; pointer-events:none;", "Game Over! Click or press Space to restart")?;
    ensure_element(&doc, CELEBRATION_ID, "div", "display:none; position:fixed; top:24px; left:50%; transform:translateX(-50%); font-family:sans-serif; font-size:28px; font-weight:bold; color:#ff4d8d; z-index:55; pointer-events:none;", "New High Score!")?;
    ensure_controls(&doc)?;

    let mut settings = Settings::default();
    if let Some(input) = doc
        .get_element_by_id(BG_COLOR_ID)
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
    {
        settings.background = input.value();
    }
    if let Some(select) = doc
        .get_element_by_id(PIPE_SHAPE_ID)
        .and_then(|e| e.dyn_into::<HtmlSelectElement>().ok())
    {
        settings.obstacle_shape = ObstacleShape::from_tag(&select.value());
    }

    let mut game = GameState::with_field(
        canvas.width() as f64,
        canvas.height() as f64,
        ObstacleGenerator::from_entropy(),
    );
    game.set_obstacle_shape(settings.obstacle_shape);
    paint_page_background(&settings.background);

    let app = App {
        surface: CanvasSurface {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        },
        game,
        settings,
        celebration: Celebration::default(),
        particles: HashMap::new(),
        rng: SmallRng::from_entropy(),
    };
    APP.with(|cell| cell.replace(Some(app)));
    log::info!(
        "game started on {}x{} canvas",
        canvas.width(),
        canvas.height()
    );

    // Pointer activation
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            with_app(on_activate);
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // Key activation; Space must not scroll the page
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            if input::is_activation_key(&evt.code()) {
                evt.prevent_default();
                with_app(on_activate);
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // Settings controls
    if let Some(el) = doc.get_element_by_id(BG_COLOR_ID) {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
            let Some(input) = evt
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            let color = input.value();
            with_app(|app| apply_setting(app, SettingChange::Background(color)));
        }) as Box<dyn FnMut(_)>);
        el.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    if let Some(el) = doc.get_element_by_id(PIPE_SHAPE_ID) {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
            let Some(select) = evt
                .target()
                .and_then(|t| t.dyn_into::<HtmlSelectElement>().ok())
            else {
                return;
            };
            let shape = ObstacleShape::from_tag(&select.value());
            with_app(|app| apply_setting(app, SettingChange::ObstacleShape(shape)));
        }) as Box<dyn FnMut(_)>);
        el.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_loop();
    WIRED.with(|w| w.set(w.get() + 1));
    Ok(())
}

/// Merge a JSON settings document into the running game.
pub fn configure(json: &str) -> Result<(), JsValue> {
    with_app(|app| -> Result<(), JsValue> {
        let merged = app
            .settings
            .merged_with_json(json)
            .map_err(|e| JsValue::from_str(&format!("invalid settings: {e}")))?;
        apply_setting(app, SettingChange::Background(merged.background));
        apply_setting(app, SettingChange::ObstacleShape(merged.obstacle_shape));
        sync_controls(&app.settings);
        Ok(())
    })
    .unwrap_or_else(|| Err(JsValue::from_str("game not started")))
}

pub fn high_score() -> u32 {
    APP.with(|cell| cell.borrow().as_ref().map_or(0, |app| app.game.high_score()))
}

// --- Frame loop ---------------------------------------------------------------

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_loop() {
    let f: FrameCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_app(|app| frame(app, ts));
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn frame(app: &mut App, now: f64) {
    for event in app.game.tick() {
        match event {
            GameEvent::Scored(score) => set_text(SCORE_ID, &format!("Flappy Points: {score}")),
            GameEvent::NewHighScore(high) => {
                set_text(HIGH_SCORE_ID, &format!("High Score: {high}"));
                celebrate(app, now);
            }
            GameEvent::GameOver => set_display(GAME_OVER_ID, "flex"),
        }
    }

    render::render(&mut app.surface, &app.game, &app.settings);

    for expiry in app.celebration.expire(now) {
        match expiry {
            Expiry::HideBanner => {
                if !app.celebration.banner_visible() {
                    hide_banner();
                }
            }
            Expiry::Remove(id) => {
                if let Some(el) = app.particles.remove(&id) {
                    el.remove();
                }
            }
        }
    }
}

fn on_activate(app: &mut App) {
    if input::activate(&mut app.game) == InputOutcome::Restarted {
        app.celebration.dismiss_banner();
        hide_banner();
        set_display(GAME_OVER_ID, "none");
        set_text(SCORE_ID, "Flappy Points: 0");
        set_text(HIGH_SCORE_ID, &format!("High Score: {}", app.game.high_score()));
    }
}

fn apply_setting(app: &mut App, change: SettingChange) {
    app.settings.apply(change);
    app.game.set_obstacle_shape(app.settings.obstacle_shape);
    paint_page_background(&app.settings.background);
}

// --- Celebration DOM ----------------------------------------------------------

fn celebrate(app: &mut App, now: f64) {
    let Some(win) = window() else { return };
    let Some(doc) = win.document() else { return };
    let Some(body) = doc.body() else { return };

    if let Some(banner) = doc.get_element_by_id(CELEBRATION_ID) {
        set_display(CELEBRATION_ID, "block");
        banner.class_list().add_1("pop").ok();
    }

    let viewport_width = win
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(FIELD_WIDTH);
    for particle in app.celebration.fire(now, viewport_width, &mut app.rng) {
        match spawn_particle(&doc, &body, &particle) {
            Ok(el) => {
                app.particles.insert(particle.id, el);
            }
            Err(e) => log::warn!("could not add particle: {e:?}"),
        }
    }
}

fn spawn_particle(doc: &Document, body: &HtmlElement, p: &Particle) -> Result<Element, JsValue> {
    let el = doc.create_element("div")?;
    let mut style = format!("left:{}px; top:{}px;", p.x, p.y);
    match p.kind {
        ParticleKind::Confetti { color, spread } => {
            el.set_class_name("confetti");
            style.push_str(&format!(" background-color:{color}; --dx:{spread:.0}px;"));
        }
        ParticleKind::Heart => {
            el.set_class_name("heart-float");
            el.set_text_content(Some("❤️"));
        }
    }
    el.set_attribute("style", &style)?;
    body.append_child(&el)?;
    Ok(el)
}

fn hide_banner() {
    set_display(CELEBRATION_ID, "none");
    if let Some(el) = element(CELEBRATION_ID) {
        el.class_list().remove_1("pop").ok();
    }
}

// --- DOM helpers --------------------------------------------------------------

fn element(id: &str) -> Option<Element> {
    window()?.document()?.get_element_by_id(id)
}

fn set_text(id: &str, text: &str) {
    if let Some(el) = element(id) {
        el.set_text_content(Some(text));
    }
}

fn set_display(id: &str, value: &str) {
    if let Some(el) = element(id).and_then(|e| e.dyn_into::<HtmlElement>().ok()) {
        el.style().set_property("display", value).ok();
    }
}

fn paint_page_background(color: &str) {
    if let Some(body) = window().and_then(|w| w.document()).and_then(|d| d.body()) {
        body.style().set_property("background-color", color).ok();
    }
}

fn sync_controls(settings: &Settings) {
    if let Some(input) = element(BG_COLOR_ID).and_then(|e| e.dyn_into::<HtmlInputElement>().ok()) {
        input.set_value(&settings.background);
    }
    if let Some(select) = element(PIPE_SHAPE_ID).and_then(|e| e.dyn_into::<HtmlSelectElement>().ok()) {
        // no option exists for an unrecognised tag; keep the current selection
        if settings.obstacle_shape != ObstacleShape::Unknown {
            select.set_value(settings.obstacle_shape.tag());
        }
    }
}

/// Return the element with `id`, creating it under `<body>` if absent.
fn ensure_element(
    doc: &Document,
    id: &str,
    tag: &str,
    style: &str,
    text: &str,
) -> Result<Element, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
    let el = doc.create_element(tag)?;
    el.set_id(id);
    if !text.is_empty() {
        el.set_text_content(Some(text));
    }
    el.set_attribute("style", style)?;
    body.append_child(&el)?;
    Ok(el)
}

fn ensure_controls(doc: &Document) -> Result<(), JsValue> {
    if doc.get_element_by_id(BG_COLOR_ID).is_some() && doc.get_element_by_id(PIPE_SHAPE_ID).is_some() {
        return Ok(());
    }
    let panel = ensure_element(
        doc,
        "fp-controls",
        "div",
        "position:fixed; top:10px; right:12px; display:flex; gap:8px; align-items:center; font-family:sans-serif; font-size:14px; padding:6px 10px; background:rgba(0,0,0,0.42); border-radius:6px; color:#fff; z-index:45;",
        "",
    )?;
    if doc.get_element_by_id(BG_COLOR_ID).is_none() {
        let input: HtmlInputElement = doc.create_element("input")?.dyn_into()?;
        input.set_id(BG_COLOR_ID);
        input.set_type("color");
        input.set_value(crate::settings::DEFAULT_BACKGROUND);
        panel.append_child(&input)?;
    }
    if doc.get_element_by_id(PIPE_SHAPE_ID).is_none() {
        let select: HtmlSelectElement = doc.create_element("select")?.dyn_into()?;
        select.set_id(PIPE_SHAPE_ID);
        select.set_inner_html(
            "<option value='rect'>Rectangle</option><option value='square'>Square</option><option value='circle'>Circle</option><option value='heart'>Heart</option>",
        );
        panel.append_child(&select)?;
    }
    Ok(())
}

fn ensure_styles(doc: &Document) -> Result<(), JsValue> {
    if doc.get_element_by_id(STYLE_ID).is_some() {
        return Ok(());
    }
    let head = doc.head().ok_or_else(|| JsValue::from_str("no head"))?;
    let style = doc.create_element("style")?;
    style.set_id(STYLE_ID);
    style.set_text_content(Some(COSMETIC_CSS));
    head.append_child(&style)?;
    Ok(())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn shape_select() -> HtmlSelectElement {
        element(PIPE_SHAPE_ID)
            .and_then(|e| e.dyn_into::<HtmlSelectElement>().ok())
            .expect("shape control")
    }

    #[wasm_bindgen_test]
    fn repeated_start_wires_one_loop_and_listener_set() {
        start().expect("first start");
        start().expect("second start");
        start().expect("third start");
        assert_eq!(WIRED.with(|w| w.get()), 1);

        // crash, then click once: a single listener restarts without also jumping
        with_app(|app| {
            app.game.restart();
            while !app.game.is_game_over() {
                app.game.tick();
            }
        });
        let canvas = element(CANVAS_ID).expect("canvas");
        let click = web_sys::MouseEvent::new("click").expect("event");
        canvas.dispatch_event(&click).expect("dispatch");
        let bird = with_app(|app| (app.game.is_game_over(), *app.game.bird())).expect("running");
        assert!(!bird.0);
        assert_eq!(bird.1, crate::game::Bird::default());
    }

    #[wasm_bindgen_test]
    fn unknown_shape_leaves_control_selection() {
        start().expect("start");
        configure(r#"{"obstacle_shape":"circle"}"#).expect("circle");
        assert_eq!(shape_select().value(), "circle");
        configure(r#"{"obstacle_shape":"triangle"}"#).expect("triangle");
        assert_eq!(shape_select().value(), "circle");
        assert_eq!(
            with_app(|app| app.settings.obstacle_shape),
            Some(ObstacleShape::Unknown)
        );
    }
}
