use crate::core::config::FIXED_DT;
use crate::systems::{ease_factor, InputOutcome};

use super::{FrameReport, PerfTimer, Scene, SceneRenderer};

pub(super) fn on_lift_input(scene: &mut Scene, delta_y: f32, now: f64) -> InputOutcome {
    let in_view = scene.visibility.in_view();
    scene.lift.on_input(&scene.config.lift, delta_y, now, in_view)
}

pub(super) fn physics_step(scene: &mut Scene, dt_ms: f32, now: f64) {
    let cfg = &scene.config;
    let gravity = cfg.physics.gravity_y_accel().abs();

    if let Some(accel) = scene.lift.advance(&cfg.lift, dt_ms, now, gravity) {
        let jitter = cfg.lift.angular_jitter;
        for inst in &scene.instances {
            // screen y grows downward
            scene.world.apply_vertical_accel(inst.handles.body, -accel, dt_ms);
            scene.world.add_step_angvel(inst.handles.body, scene.rng.centered() * jitter);
        }
    }

    if let Some(damp) = ease_factor(&cfg.lift, dt_ms) {
        for inst in &scene.instances {
            scene.world.damp_velocity(inst.handles.body, damp);
        }
    }
}

pub(super) fn advance(scene: &mut Scene, dt_ms: f32, now: f64) {
    physics_step(scene, dt_ms, now);
    scene.world.step(dt_ms);
}

pub(super) fn tick(scene: &mut Scene, ts: f64, renderer: &mut dyn SceneRenderer) -> FrameReport {
    let frame_timer = scene.perf_enabled.then(PerfTimer::start);
    let plan = scene.frame_loop.begin_frame(ts, &scene.config.render);

    let physics_timer = scene.perf_enabled.then(PerfTimer::start);
    for _ in 0..plan.steps {
        advance(scene, FIXED_DT, ts);
    }
    let physics_ms = physics_timer.map_or(0.0, |t| t.elapsed_ms());

    let draw_timer = scene.perf_enabled.then(PerfTimer::start);
    let drew = !plan.skip_draw && scene.is_dirty();
    if drew {
        scene.draw(renderer);
    }
    let draw_ms = draw_timer.map_or(0.0, |t| t.elapsed_ms());

    scene.frame += 1;
    let report = FrameReport { steps: plan.steps, dt: plan.dt, drew, skipped: plan.skip_draw };

    if let Some(timer) = frame_timer {
        let stats = &mut scene.perf_stats;
        stats.reset();
        stats.frame_ms = timer.elapsed_ms();
        stats.physics_ms = physics_ms;
        stats.draw_ms = draw_ms;
        stats.dt_ms = plan.dt;
        stats.steps = plan.steps;
        stats.drew = drew;
        stats.skipped = plan.skip_draw;
        stats.lift_energy = scene.lift.energy();
        stats.lift_accel = scene.lift.last_accel();
        stats.instances = scene.instances.len() as u32;
        stats.sleeping = scene.world.sleeping_count() as u32;
    }

    report
}
