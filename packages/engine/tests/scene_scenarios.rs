use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use lift_scene_engine::domain::{NoStyles, PaintStyle, ShapeCatalog, ShapeDefinition};
use lift_scene_engine::geometry::PreparedShape;
use lift_scene_engine::simulation::{CanvasSize, DrawTransform, LoopCommand, SceneRenderer};
use lift_scene_engine::systems::{InputDispatcher, InputOutcome};
use lift_scene_engine::{ContainerMetrics, Scene, SceneConfig};

const SQUARE: &str = "M0 0 L100 0 L100 100 L0 100 Z";
const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Default)]
struct CountingRenderer {
    resizes: usize,
    frames: usize,
    draws: usize,
}

impl SceneRenderer for CountingRenderer {
    fn resize(&mut self, _canvas: &CanvasSize) {
        self.resizes += 1;
    }

    fn clear(&mut self, _width: f32, _height: f32) {
        self.frames += 1;
    }

    fn draw(&mut self, _shape: &PreparedShape, _style: &PaintStyle, _transform: &DrawTransform) {
        self.draws += 1;
    }
}

fn quiet_config() -> SceneConfig {
    let mut cfg = SceneConfig::default();
    cfg.layout.kick_linear = 0.0;
    cfg.layout.kick_angular = 0.0;
    cfg.lift.angular_jitter = 0.0;
    cfg
}

fn scene(count: u32, cfg: SceneConfig) -> Scene {
    let catalog = ShapeCatalog::from_definitions(vec![ShapeDefinition::new("square", SQUARE, count)], &cfg.geometry);
    let metrics = ContainerMetrics::new(800.0, 600.0).with_viewport(1200.0, 1.0);
    Scene::new(&catalog, Arc::new(cfg), metrics, &NoStyles, 11)
}

/// Run `frames` animation frames starting at `start`, returns the next timestamp
fn run(scene: &mut Scene, renderer: &mut CountingRenderer, start: f64, frames: usize) -> f64 {
    let mut ts = start;
    for _ in 0..frames {
        scene.tick(ts, renderer);
        ts += FRAME_MS;
    }
    ts
}

#[test]
fn sustained_scrolling_lifts_a_resting_body() {
    let mut scene = scene(1, quiet_config());
    let mut r = CountingRenderer::default();
    assert_eq!(scene.set_in_view(true, 0.0), LoopCommand::Start);

    let mut ts = run(&mut scene, &mut r, 0.0, 240);
    let rest_y = scene.body_state(0).unwrap().position.y;
    assert!(rest_y > 400.0 && rest_y < 600.0, "body should rest on the ground, y = {}", rest_y);

    let mut highest = rest_y;
    for _ in 0..60 {
        assert_eq!(scene.on_lift_input(60.0, ts), InputOutcome::Accepted);
        scene.tick(ts, &mut r);
        highest = highest.min(scene.body_state(0).unwrap().position.y);
        ts += FRAME_MS;
    }
    assert!(highest < rest_y - 5.0, "rest {} highest {}", rest_y, highest);
    assert!(scene.lift().energy() > 0.0);
}

#[test]
fn loop_follows_view_and_page_visibility() {
    let mut scene = scene(2, quiet_config());
    assert!(!scene.is_running());

    assert_eq!(scene.set_in_view(true, 0.0), LoopCommand::Start);
    assert_eq!(scene.set_page_visible(false, 10.0), LoopCommand::Stop);
    assert!(!scene.is_running());
    assert_eq!(scene.on_lift_input(80.0, 11.0), InputOutcome::Accepted);

    assert_eq!(scene.set_page_visible(true, 5000.0), LoopCommand::Start);
    assert_eq!(scene.set_in_view(false, 5001.0), LoopCommand::Stop);
    assert_eq!(scene.on_lift_input(80.0, 5002.0), InputOutcome::Guarded);
}

#[test]
fn one_input_stream_drives_only_scenes_in_view() {
    let near = Rc::new(RefCell::new(scene(1, quiet_config())));
    let far = Rc::new(RefCell::new(scene(1, quiet_config())));
    near.borrow_mut().set_in_view(true, 0.0);

    let mut dispatcher = InputDispatcher::new(1000.0);
    dispatcher.register(&near);
    dispatcher.register(&far);

    assert_eq!(dispatcher.on_scroll(1100.0, 1.0), 2);
    assert_eq!(dispatcher.on_wheel(40.0, 2.0), 2);
    assert!(near.borrow().lift().energy() > 0.0);
    assert_eq!(far.borrow().lift().energy(), 0.0);

    drop(far);
    assert_eq!(dispatcher.live_count(), 1);
}

#[test]
fn resize_redraws_once_at_the_new_scale() {
    let mut scene = scene(4, quiet_config());
    let mut r = CountingRenderer::default();
    scene.set_in_view(true, 0.0);
    run(&mut scene, &mut r, 0.0, 120);

    let frames_before = r.frames;
    scene.resize(ContainerMetrics::new(400.0, 600.0).with_viewport(400.0, 2.0), &mut r);
    assert_eq!(r.resizes, 1);
    assert_eq!(r.frames, frames_before + 1);
    assert!(r.draws >= 4);
    // phone breakpoint: max(150, 0.6 * 400) / 500
    assert!((scene.scale() - 0.48).abs() < 1e-6);
    assert_eq!(scene.canvas().css_width, 400.0);

    for i in 0..scene.instance_count() {
        let x = scene.body_state(i).unwrap().position.x;
        assert!(x.is_finite());
    }
}
