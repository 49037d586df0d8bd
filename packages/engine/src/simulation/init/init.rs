use std::sync::Arc;

use crate::core::{Rng, SceneConfig};
use crate::domain::{resolve_paint, ShapeCatalog, StyleResolver};
use crate::systems::{create_body, spawn_plan, target_scale, Arena, DirtyTracker, LiftState, PhysicsWorld};

use super::perf_stats::PerfStats;
use super::render::canvas_size;
use super::{ContainerMetrics, FrameLoop, Instance, Scene, Visibility};

/// Scale used when the responsive table cannot produce one
const FALLBACK_SCALE: f32 = 1.0;

pub(super) fn create_scene(
    catalog: &ShapeCatalog,
    config: Arc<SceneConfig>,
    metrics: ContainerMetrics,
    styles: &dyn StyleResolver,
    seed: u32,
) -> Scene {
    let cfg = config.as_ref();
    let mut rng = Rng::new(seed);
    let mut world = PhysicsWorld::new(&cfg.physics);
    let arena = Arena::new(
        &mut world,
        &cfg.arena,
        metrics.width,
        metrics.height,
        cfg.material.friction,
    );

    let scale = target_scale(
        &cfg.responsive,
        cfg.geometry.reference_width,
        metrics.width,
        metrics.viewport_width,
    )
    .unwrap_or_else(|| {
        log::warn!(
            "no usable scale for container {}x{}, using {}",
            metrics.width,
            metrics.height,
            FALLBACK_SCALE
        );
        FALLBACK_SCALE
    });

    let spawns = catalog.spawn_list();
    let plan = spawn_plan(&cfg.layout, spawns.len(), metrics.width, &mut rng);

    let mut instances = Vec::with_capacity(spawns.len());
    let mut skipped_instances = 0;
    for ((definition, shape), spawn) in spawns.into_iter().zip(plan) {
        let Some(handles) = create_body(
            &mut world,
            &shape,
            cfg.geometry.proxy,
            scale,
            spawn.position,
            &cfg.material,
        ) else {
            log::warn!("shape '{}': no body created at scale {}", definition.id, scale);
            skipped_instances += 1;
            continue;
        };
        world.set_step_velocity(handles.body, spawn.linvel, spawn.angvel);
        let style = resolve_paint(&definition.paint, styles);
        instances.push(Instance { handles, definition, shape, style });
    }

    let skipped_shapes = catalog.len() - catalog.prepared_count();
    log::info!(
        "scene {}x{}: {} instances, scale {:.3}, {} shape(s) skipped",
        metrics.width,
        metrics.height,
        instances.len(),
        scale,
        skipped_shapes
    );

    Scene {
        canvas: canvas_size(&metrics, cfg.render.dpr_cap),
        dirty: DirtyTracker::new(cfg.render.move_eps_pos, cfg.render.move_eps_ang),
        world,
        arena,
        instances,
        skipped_instances,
        metrics,
        scale,
        prev_scale: scale,
        lift: LiftState::new(),
        visibility: Visibility::new(),
        frame_loop: FrameLoop::new(),
        rng,
        frame: 0,
        perf_enabled: false,
        perf_stats: PerfStats::default(),
        config,
    }
}
