//! Lift Scene Engine - scroll-lifted rigid body scenes rendered to canvas
//!
//! Architecture:
//! - core/        - config, errors, math, randomness
//! - geometry/    - outline parsing, simplification, physics proxies
//! - domain/      - shape definitions, catalog, paint
//! - systems/     - solver adapter, arena, layout, lift model, input
//! - simulation/  - per-container scene orchestration
//! - api/         - browser surface (wasm32 only)

pub mod core;
pub mod domain;
pub mod geometry;
pub mod simulation;
pub mod systems;

#[cfg(target_arch = "wasm32")]
pub mod api;

use wasm_bindgen::prelude::*;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    #[cfg(target_arch = "wasm32")]
    init_logging();

    log::info!("lift-scene-engine {} initialized", version());
}

#[cfg(target_arch = "wasm32")]
fn init_logging() {
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"lift-scene-engine: logger already set".into());
    }
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use crate::core::{EngineError, SceneConfig};
pub use domain::ShapeCatalog;
pub use simulation::{ContainerMetrics, Scene};

#[cfg(target_arch = "wasm32")]
pub use api::{SceneHost, ShapeLibrary};
