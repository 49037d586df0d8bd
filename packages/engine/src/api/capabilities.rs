//! Platform capability probe
//!
//! Probed once per mounted scene. Each missing primitive maps to a fixed
//! fallback strategy; nothing re-checks support at runtime.

use js_sys::Reflect;
use wasm_bindgen::JsValue;
use web_sys::{Performance, Window};

/// Debounce for window resize events when `ResizeObserver` is missing
pub const RESIZE_DEBOUNCE_MS: i32 = 80;
/// Start the loop a little before the container scrolls into view
pub const INTERSECTION_ROOT_MARGIN: &str = "400px 0px";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeStrategy {
    Observer,
    /// Window `resize` + `orientationchange`, debounced
    Debounced { delay_ms: i32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisibilityStrategy {
    Observer { root_margin: &'static str },
    /// Treat the container as permanently in view
    AlwaysVisible,
}

#[derive(Clone)]
pub enum Clock {
    Performance(Performance),
    Date,
}

impl Clock {
    /// Milliseconds on this clock's timeline
    pub fn now(&self) -> f64 {
        match self {
            Clock::Performance(p) => p.now(),
            Clock::Date => js_sys::Date::now(),
        }
    }
}

#[derive(Clone)]
pub struct Capabilities {
    pub resize: ResizeStrategy,
    pub visibility: VisibilityStrategy,
    pub clock: Clock,
}

impl Capabilities {
    pub fn probe(window: &Window) -> Self {
        let resize = if has_global(window, "ResizeObserver") {
            ResizeStrategy::Observer
        } else {
            log::warn!("ResizeObserver unavailable, falling back to debounced window resize");
            ResizeStrategy::Debounced { delay_ms: RESIZE_DEBOUNCE_MS }
        };

        let visibility = if has_global(window, "IntersectionObserver") {
            VisibilityStrategy::Observer { root_margin: INTERSECTION_ROOT_MARGIN }
        } else {
            log::warn!("IntersectionObserver unavailable, scenes always run");
            VisibilityStrategy::AlwaysVisible
        };

        let clock = match window.performance() {
            Some(p) => Clock::Performance(p),
            None => {
                log::warn!("performance.now unavailable, using Date.now");
                Clock::Date
            }
        };

        Self { resize, visibility, clock }
    }
}

fn has_global(window: &Window, name: &str) -> bool {
    Reflect::has(window.as_ref(), &JsValue::from_str(name)).unwrap_or(false)
}
