//! JS-facing surface
//!
//! `ShapeLibrary` holds the prepared catalog and config; `mount` turns a
//! container element into a running `SceneHost` with its own canvas, loop,
//! observers and input registration. Failures are logged and yield `None`,
//! never an exception the page has to handle.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, ResizeObserver, Window,
};

use crate::core::{EngineError, SceneConfig};
use crate::domain::ShapeCatalog;
use crate::simulation::{ContainerMetrics, LoopCommand, PerfStats, Scene, SceneRenderer};

use super::canvas::{CanvasRenderer, CssVarResolver};
use super::capabilities::{Capabilities, Clock, ResizeStrategy, VisibilityStrategy};
use super::listeners;

/// Ancestor observed for visibility when present
const WRAP_SELECTOR: &str = ".lift-scene-wrap";

fn js_error(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct ShapeLibrary {
    catalog: Arc<ShapeCatalog>,
    config: Arc<SceneConfig>,
}

#[wasm_bindgen]
impl ShapeLibrary {
    /// Parse a shape bundle and an optional config override (both JSON)
    #[wasm_bindgen(constructor)]
    pub fn new(bundle_json: &str, config_json: Option<String>) -> Result<ShapeLibrary, JsValue> {
        let config = match config_json.as_deref() {
            Some(json) => SceneConfig::from_json(json).map_err(js_error)?,
            None => SceneConfig::default(),
        };
        let catalog = ShapeCatalog::from_bundle_json(bundle_json, &config.geometry).map_err(js_error)?;
        log::info!(
            "shape library: {} of {} shapes prepared",
            catalog.prepared_count(),
            catalog.len()
        );
        Ok(Self { catalog: Arc::new(catalog), config: Arc::new(config) })
    }

    #[wasm_bindgen(js_name = manifestJson)]
    pub fn manifest_json(&self) -> String {
        self.catalog.manifest_json()
    }

    /// Mount a scene into `container`; `None` (and a console warning) on failure
    pub fn mount(&self, container: HtmlElement) -> Option<SceneHost> {
        match self.mount_scene(container) {
            Ok(host) => Some(host),
            Err(err) => {
                log::warn!("scene not mounted: {}", err);
                None
            }
        }
    }

    /// Mount a scene into every element matching `selector`
    #[wasm_bindgen(js_name = mountAll)]
    pub fn mount_all(&self, selector: &str) -> js_sys::Array {
        let out = js_sys::Array::new();
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::warn!("mountAll: no document");
            return out;
        };
        let Ok(nodes) = document.query_selector_all(selector) else {
            log::warn!("mountAll: invalid selector '{}'", selector);
            return out;
        };
        for i in 0..nodes.length() {
            let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
                continue;
            };
            if let Some(host) = self.mount(el) {
                out.push(&JsValue::from(host));
            }
        }
        out
    }
}

impl ShapeLibrary {
    fn mount_scene(&self, container: HtmlElement) -> Result<SceneHost, EngineError> {
        let window = web_sys::window().ok_or(EngineError::MissingHost("window"))?;
        let document = window.document().ok_or(EngineError::MissingHost("document"))?;
        let caps = Capabilities::probe(&window);

        let mut renderer = CanvasRenderer::attach(&window, &document, &container)?;
        let metrics = measure(&window, &container);
        let styles = CssVarResolver::for_element(&window, &container);
        let seed = (js_sys::Math::random() * f64::from(u32::MAX)) as u32;
        let mut scene = Scene::new(&self.catalog, self.config.clone(), metrics, &styles, seed);
        scene.set_page_visible(!document.hidden(), caps.clock.now());

        renderer.resize(&scene.canvas());
        scene.draw(&mut renderer);

        let handle = LoopHandle {
            window: window.clone(),
            container: container.clone(),
            clock: caps.clock.clone(),
            scene: Rc::new(RefCell::new(scene)),
            renderer: Rc::new(RefCell::new(renderer)),
            frame_cb: Rc::new(RefCell::new(None)),
            raf_id: Rc::new(Cell::new(None)),
        };

        // Nothing holds the handle yet; a failed watcher only has to undo the canvas
        let hooks = match install_hooks(&handle, &document, &caps) {
            Ok(hooks) => hooks,
            Err(err) => {
                handle.renderer.borrow_mut().detach();
                return Err(err);
            }
        };

        handle.install_frame_callback();
        listeners::register_scene(&window, &caps.clock, &handle.scene);
        if caps.visibility == VisibilityStrategy::AlwaysVisible {
            handle.set_in_view(true);
        }

        Ok(SceneHost { handle, hooks: RefCell::new(hooks), disposed: Cell::new(false) })
    }
}

fn measure(window: &Window, container: &HtmlElement) -> ContainerMetrics {
    let width = container.client_width() as f32;
    let height = container.client_height() as f32;
    let viewport = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .map_or(width, |v| v as f32);
    ContainerMetrics::new(width, height).with_viewport(viewport, window.device_pixel_ratio() as f32)
}

/// Shared pieces the frame callback and observers need
#[derive(Clone)]
struct LoopHandle {
    window: Window,
    container: HtmlElement,
    clock: Clock,
    scene: Rc<RefCell<Scene>>,
    renderer: Rc<RefCell<CanvasRenderer>>,
    frame_cb: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    raf_id: Rc<Cell<Option<i32>>>,
}

impl LoopHandle {
    fn install_frame_callback(&self) {
        let handle = self.clone();
        *self.frame_cb.borrow_mut() = Some(Closure::new(move |_ts: f64| handle.on_frame()));
    }

    fn on_frame(&self) {
        self.raf_id.set(None);
        let now = self.clock.now();
        let running = match (self.scene.try_borrow_mut(), self.renderer.try_borrow_mut()) {
            (Ok(mut scene), Ok(mut renderer)) => {
                scene.tick(now, &mut *renderer);
                scene.is_running()
            }
            _ => true,
        };
        if running {
            self.request_frame();
        }
    }

    fn request_frame(&self) {
        if self.raf_id.get().is_some() {
            return;
        }
        let cb = self.frame_cb.borrow();
        let Some(cb) = cb.as_ref() else {
            return;
        };
        match self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => self.raf_id.set(Some(id)),
            Err(_) => log::warn!("requestAnimationFrame failed"),
        }
    }

    fn stop(&self) {
        if let Some(id) = self.raf_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }

    fn apply(&self, cmd: LoopCommand) {
        match cmd {
            LoopCommand::Start => self.request_frame(),
            LoopCommand::Stop => self.stop(),
            LoopCommand::None => {}
        }
    }

    fn set_in_view(&self, in_view: bool) {
        let cmd = self.scene.borrow_mut().set_in_view(in_view, self.clock.now());
        self.apply(cmd);
    }

    fn set_page_visible(&self, visible: bool) {
        let cmd = self.scene.borrow_mut().set_page_visible(visible, self.clock.now());
        self.apply(cmd);
    }

    fn resize(&self) {
        let metrics = measure(&self.window, &self.container);
        if let (Ok(mut scene), Ok(mut renderer)) =
            (self.scene.try_borrow_mut(), self.renderer.try_borrow_mut())
        {
            scene.resize(metrics, &mut *renderer);
        }
    }
}

/// Install every watcher, or release the ones already installed and fail
fn install_hooks(
    handle: &LoopHandle,
    document: &Document,
    caps: &Capabilities,
) -> Result<Vec<Hook>, EngineError> {
    let mut hooks = Vec::new();
    if let Err(err) = push_hooks(handle, document, caps, &mut hooks) {
        for hook in hooks {
            hook.release(&handle.window);
        }
        return Err(err);
    }
    Ok(hooks)
}

fn push_hooks(
    handle: &LoopHandle,
    document: &Document,
    caps: &Capabilities,
    hooks: &mut Vec<Hook>,
) -> Result<(), EngineError> {
    hooks.push(watch_resize(handle, caps.resize)?);
    hooks.push(watch_page_visibility(handle, document)?);
    hooks.extend(watch_intersection(handle, caps.visibility)?);
    Ok(())
}

/// Something registered with the page that must be undone on dispose
enum Hook {
    Resize {
        observer: ResizeObserver,
        _cb: Closure<dyn FnMut(js_sys::Array)>,
    },
    Intersection {
        observer: IntersectionObserver,
        _cb: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
    },
    Listener {
        target: EventTarget,
        events: &'static [&'static str],
        cb: Closure<dyn FnMut(Event)>,
        /// Debounce timer fired by this listener, if any
        timer: Option<(Rc<Cell<Option<i32>>>, Rc<Closure<dyn FnMut()>>)>,
    },
}

impl Hook {
    fn release(self, window: &Window) {
        match self {
            Hook::Resize { observer, .. } => observer.disconnect(),
            Hook::Intersection { observer, .. } => observer.disconnect(),
            Hook::Listener { target, events, cb, timer } => {
                for event in events {
                    let _ = target.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
                }
                if let Some(id) = timer.and_then(|(pending, _)| pending.take()) {
                    window.clear_timeout_with_handle(id);
                }
            }
        }
    }
}

fn listen(
    target: &EventTarget,
    events: &'static [&'static str],
    cb: Closure<dyn FnMut(Event)>,
    timer: Option<(Rc<Cell<Option<i32>>>, Rc<Closure<dyn FnMut()>>)>,
) -> Result<Hook, EngineError> {
    for event in events {
        target
            .add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())
            .map_err(|_| EngineError::MissingHost("event target"))?;
    }
    Ok(Hook::Listener { target: target.clone(), events, cb, timer })
}

fn watch_resize(handle: &LoopHandle, strategy: ResizeStrategy) -> Result<Hook, EngineError> {
    match strategy {
        ResizeStrategy::Observer => {
            let h = handle.clone();
            let cb = Closure::<dyn FnMut(js_sys::Array)>::new(move |_entries: js_sys::Array| h.resize());
            let observer = ResizeObserver::new(cb.as_ref().unchecked_ref())
                .map_err(|_| EngineError::MissingHost("ResizeObserver"))?;
            observer.observe(&handle.container);
            Ok(Hook::Resize { observer, _cb: cb })
        }
        ResizeStrategy::Debounced { delay_ms } => {
            let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

            let h = handle.clone();
            let fire_pending = pending.clone();
            let fire: Rc<Closure<dyn FnMut()>> = Rc::new(Closure::new(move || {
                fire_pending.set(None);
                h.resize();
            }));

            let window = handle.window.clone();
            let schedule_pending = pending.clone();
            let schedule_fire = fire.clone();
            let schedule = Closure::<dyn FnMut(Event)>::new(move |_ev: Event| {
                if let Some(id) = schedule_pending.take() {
                    window.clear_timeout_with_handle(id);
                }
                let f: &Closure<dyn FnMut()> = &schedule_fire;
                match window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    f.as_ref().unchecked_ref(),
                    delay_ms,
                ) {
                    Ok(id) => schedule_pending.set(Some(id)),
                    Err(_) => log::warn!("resize debounce timer failed"),
                }
            });

            listen(
                handle.window.as_ref(),
                &["resize", "orientationchange"],
                schedule,
                Some((pending, fire)),
            )
        }
    }
}

fn watch_page_visibility(handle: &LoopHandle, document: &Document) -> Result<Hook, EngineError> {
    let h = handle.clone();
    let doc = document.clone();
    let cb = Closure::<dyn FnMut(Event)>::new(move |_ev: Event| h.set_page_visible(!doc.hidden()));
    listen(document.as_ref(), &["visibilitychange"], cb, None)
}

fn watch_intersection(
    handle: &LoopHandle,
    strategy: VisibilityStrategy,
) -> Result<Option<Hook>, EngineError> {
    match strategy {
        // started once the frame callback exists
        VisibilityStrategy::AlwaysVisible => Ok(None),
        VisibilityStrategy::Observer { root_margin } => {
            let h = handle.clone();
            let cb = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
                move |entries: js_sys::Array, _observer: IntersectionObserver| {
                    let in_view = entries
                        .iter()
                        .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
                        .last()
                        .map(|e| e.is_intersecting());
                    if let Some(in_view) = in_view {
                        h.set_in_view(in_view);
                    }
                },
            );
            let init = IntersectionObserverInit::new();
            init.set_root_margin(root_margin);
            init.set_threshold(&JsValue::from_f64(0.0));
            let observer = IntersectionObserver::new_with_options(cb.as_ref().unchecked_ref(), &init)
                .map_err(|_| EngineError::MissingHost("IntersectionObserver"))?;

            let target: Element = handle
                .container
                .closest(WRAP_SELECTOR)
                .ok()
                .flatten()
                .unwrap_or_else(|| handle.container.clone().into());
            observer.observe(&target);
            Ok(Some(Hook::Intersection { observer, _cb: cb }))
        }
    }
}

/// One mounted scene
#[wasm_bindgen]
pub struct SceneHost {
    handle: LoopHandle,
    hooks: RefCell<Vec<Hook>>,
    disposed: Cell<bool>,
}

#[wasm_bindgen]
impl SceneHost {
    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.handle.scene.borrow().is_running()
    }

    #[wasm_bindgen(getter, js_name = instanceCount)]
    pub fn instance_count(&self) -> u32 {
        self.handle.scene.borrow().instance_count() as u32
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f32 {
        self.handle.scene.borrow().scale()
    }

    #[wasm_bindgen(getter, js_name = liftEnergy)]
    pub fn lift_energy(&self) -> f32 {
        self.handle.scene.borrow().lift().energy()
    }

    /// Enable or disable per-frame perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&self, enabled: bool) {
        self.handle.scene.borrow_mut().enable_perf_metrics(enabled);
    }

    /// Last frame perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        self.handle.scene.borrow().perf_stats()
    }

    /// Re-measure the container now
    pub fn resize(&self) {
        self.handle.resize();
    }

    /// Stop the loop, detach observers and listeners, remove the canvas
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        self.handle.stop();
        for hook in self.hooks.borrow_mut().drain(..) {
            hook.release(&self.handle.window);
        }
        // breaks the frame callback's reference cycle
        self.handle.frame_cb.borrow_mut().take();
        self.handle.renderer.borrow_mut().detach();
        log::debug!("scene disposed, {} live before drop", listeners::live_scenes());
    }
}

impl Drop for SceneHost {
    fn drop(&mut self) {
        self.dispose();
    }
}
