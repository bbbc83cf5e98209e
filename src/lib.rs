//! Clickshake core crate.
//!
//! A single-page toy: clicking anywhere shakes the portrait, bursts particles
//! out of the click point, flips the custom cursor every other click, flashes
//! an overlay glyph and speaks a short line. Interaction logic lives in plain
//! Rust modules (testable natively); `page` binds it to the DOM.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod controller;
pub mod cursor;
pub mod error;
mod page;
pub mod particles;
pub mod shake;
pub mod speech;
pub mod timers;

pub use config::{OverlayOnClick, PageConfig};
pub use controller::Controller;
pub use error::PageError;
pub use particles::{Particle, ParticleEmitter, ParticleStyle};
pub use timers::{ClearPolicy, Deferred, ManualScheduler, Scheduler};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    tracing_wasm::set_as_global_default();
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_page() -> Result<(), JsValue> {
    page::mount(PageConfig::default()).map_err(Into::into)
}

/// Mount with a JSON configuration (camelCase keys, every field optional).
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_page_with_config(json: &str) -> Result<(), JsValue> {
    let config = PageConfig::from_json(json)?;
    page::mount(config).map_err(Into::into)
}

#[wasm_bindgen]
pub fn unmount_page() {
    page::unmount();
}

/// Burst particles at a viewport point without the rest of the click effects.
#[wasm_bindgen]
pub fn trigger_explosion(x: f64, y: f64) {
    page::trigger_explosion(x, y);
}

/// Advance the cursor flip counter without a click.
#[wasm_bindgen]
pub fn trigger_click() {
    page::trigger_click();
}

// Seed source for particle randomness when the `rng` feature is off.
#[allow(dead_code)]
fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
