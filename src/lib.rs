//! Flappy Points core crate.
//!
//! A Flappy-Bird variant for the browser. Game logic (`game`), drawing
//! (`render`), input mapping (`input`), settings and the high-score
//! celebration are plain Rust and run under `cargo test` on the host; the
//! `web` module is the thin wasm/DOM adapter that drives them once per
//! animation frame.

use wasm_bindgen::prelude::*;

pub mod celebration;
pub mod game;
pub mod input;
pub mod render;
pub mod settings;
mod web;

pub use game::obstacle::{Obstacle, ObstacleGenerator, ObstacleShape};
pub use game::{GameEvent, GameState};
pub use settings::{SettingChange, Settings};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    web::init_logging();
}

/// Create or adopt the page elements and start the frame loop.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::start()
}

/// Apply a JSON settings document, e.g. `{"obstacle_shape":"heart"}`.
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    web::configure(json)
}

#[wasm_bindgen]
pub fn high_score() -> u32 {
    web::high_score()
}
