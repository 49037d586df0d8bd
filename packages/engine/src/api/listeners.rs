//! Page-wide scroll and wheel listeners
//!
//! Installed once per page. Every mounted scene registers weakly with the
//! dispatcher and receives the same input stream.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, WheelEvent, Window};

use crate::simulation::Scene;
use crate::systems::InputDispatcher;

use super::capabilities::Clock;

thread_local! {
    static DISPATCHER: RefCell<Option<InputDispatcher<Scene>>> = const { RefCell::new(None) };
}

/// Register a scene, installing the page listeners on first use
pub fn register_scene(window: &Window, clock: &Clock, scene: &Rc<RefCell<Scene>>) {
    let first = DISPATCHER.with(|d| {
        let mut d = d.borrow_mut();
        let first = d.is_none();
        let dispatcher = d.get_or_insert_with(|| InputDispatcher::new(scroll_y(window)));
        dispatcher.register(scene);
        first
    });
    if first {
        install(window, clock.clone());
    }
}

/// Scenes still receiving page input
pub fn live_scenes() -> usize {
    DISPATCHER.with(|d| d.borrow_mut().as_mut().map_or(0, |d| d.live_count()))
}

fn scroll_y(window: &Window) -> f32 {
    window.scroll_y().unwrap_or(0.0) as f32
}

fn install(window: &Window, clock: Clock) {
    let opts = AddEventListenerOptions::new();
    opts.set_passive(true);

    let scroll_window = window.clone();
    let scroll_clock = clock.clone();
    let on_scroll = Closure::<dyn FnMut(Event)>::new(move |_ev: Event| {
        let y = scroll_y(&scroll_window);
        let now = scroll_clock.now();
        DISPATCHER.with(|d| {
            if let Some(d) = d.borrow_mut().as_mut() {
                d.on_scroll(y, now);
            }
        });
    });

    let on_wheel = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
        let delta = ev.dyn_ref::<WheelEvent>().map_or(0.0, |w| w.delta_y() as f32);
        let now = clock.now();
        DISPATCHER.with(|d| {
            if let Some(d) = d.borrow_mut().as_mut() {
                d.on_wheel(delta, now);
            }
        });
    });

    for (name, cb) in [("scroll", &on_scroll), ("wheel", &on_wheel)] {
        if window
            .add_event_listener_with_callback_and_add_event_listener_options(
                name,
                cb.as_ref().unchecked_ref(),
                &opts,
            )
            .is_err()
        {
            log::warn!("could not listen for '{}' events", name);
        }
    }

    // page lifetime
    on_scroll.forget();
    on_wheel.forget();
    log::debug!("scroll/wheel listeners installed");
}
