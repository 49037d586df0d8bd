use crate::core::config::FIXED_DT;
use crate::systems::{rescale_body, target_scale};

use super::render::canvas_size;
use super::{ContainerMetrics, Scene, SceneRenderer};

/// Relative scale change below which bodies keep their geometry
const RESCALE_EPS: f32 = 0.001;

pub(super) fn resize(scene: &mut Scene, metrics: ContainerMetrics, renderer: &mut dyn SceneRenderer) {
    let cfg = scene.config.clone();

    scene.metrics = metrics;
    scene.canvas = canvas_size(&metrics, cfg.render.dpr_cap);
    renderer.resize(&scene.canvas);

    scene
        .arena
        .resize(&mut scene.world, &cfg.arena, metrics.width, metrics.height);

    match target_scale(
        &cfg.responsive,
        cfg.geometry.reference_width,
        metrics.width,
        metrics.viewport_width,
    ) {
        Some(new_scale) => {
            let ratio = new_scale / scene.prev_scale;
            if ratio.is_finite() && (ratio - 1.0).abs() > RESCALE_EPS {
                for inst in &scene.instances {
                    if !rescale_body(
                        &mut scene.world,
                        inst.handles,
                        &inst.shape,
                        cfg.geometry.proxy,
                        new_scale,
                    ) {
                        log::warn!("shape '{}': rescale to {} failed", inst.definition.id, new_scale);
                    }
                }
                scene.prev_scale = new_scale;
            }
            scene.scale = new_scale;
        }
        None => log::warn!(
            "resize {}x{}: no usable scale, keeping {}",
            metrics.width,
            metrics.height,
            scene.scale
        ),
    }

    for inst in &scene.instances {
        scene.world.wake(inst.handles.body);
        scene
            .world
            .apply_vertical_accel(inst.handles.body, -cfg.lift.resize_nudge, FIXED_DT);
    }

    log::info!(
        "scene resized to {}x{} (scale {:.3})",
        metrics.width,
        metrics.height,
        scene.scale
    );
    scene.draw(renderer);
}
