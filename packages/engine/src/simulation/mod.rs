//! Scene - one animated container
//!
//! A scene owns its physics world, arena walls, instances, lift energy and
//! frame loop. Everything runs on the caller's thread; the host drives it by
//! forwarding animation frames, input, resize and visibility changes.
//!
//! Per frame: input -> lift model -> `physics_step` (forces) -> solver step
//! -> dirty check -> draw.

use std::sync::Arc;

use rapier2d::prelude::RigidBodyHandle;

use crate::core::{Rng, SceneConfig, Vec2};
use crate::domain::{PaintStyle, ShapeCatalog, ShapeDefinition, StyleResolver};
use crate::geometry::PreparedShape;
use crate::systems::{
    Arena, BodyHandles, BodyState, DirtyTracker, InputOutcome, LiftInput, LiftSink, LiftState,
    PhysicsWorld,
};

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "init/init.rs"]
mod init;
#[path = "step/step.rs"]
mod step;
#[path = "frame/frame_loop.rs"]
mod frame_loop;
#[path = "frame/visibility.rs"]
mod visibility;
#[path = "render/render.rs"]
mod render;
#[path = "resize/resize.rs"]
mod resize;

pub use frame_loop::{FrameLoop, FramePlan};
pub use perf_stats::PerfStats;
pub use render::{canvas_size, CanvasSize, DrawTransform, SceneRenderer};
pub use visibility::{LoopCommand, Visibility};

use perf_timer::PerfTimer;

/// Host container measurements in CSS pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerMetrics {
    pub width: f32,
    pub height: f32,
    /// Drives the responsive breakpoint choice
    pub viewport_width: f32,
    pub device_pixel_ratio: f32,
}

impl ContainerMetrics {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height, viewport_width: width, device_pixel_ratio: 1.0 }
    }

    pub fn with_viewport(mut self, viewport_width: f32, device_pixel_ratio: f32) -> Self {
        self.viewport_width = viewport_width;
        self.device_pixel_ratio = device_pixel_ratio;
        self
    }
}

/// One spawned occurrence of a shape definition
pub struct Instance {
    pub handles: BodyHandles,
    pub definition: Arc<ShapeDefinition>,
    pub shape: Arc<PreparedShape>,
    pub style: PaintStyle,
}

/// What one animation frame did
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub steps: u32,
    pub dt: f32,
    pub drew: bool,
    pub skipped: bool,
}

pub struct Scene {
    config: Arc<SceneConfig>,
    world: PhysicsWorld,
    arena: Arena,
    instances: Vec<Instance>,
    skipped_instances: usize,

    metrics: ContainerMetrics,
    canvas: CanvasSize,
    /// Current drawing scale
    scale: f32,
    /// Scale the body geometry was last built at
    prev_scale: f32,

    lift: LiftState,
    dirty: DirtyTracker<RigidBodyHandle>,
    visibility: Visibility,
    frame_loop: FrameLoop,
    rng: Rng,
    frame: u64,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: PerfStats,
}

impl Scene {
    /// Build the arena and spawn every prepared shape of `catalog`.
    ///
    /// Shapes that fail preparation or body creation are skipped and logged.
    pub fn new(
        catalog: &ShapeCatalog,
        config: Arc<SceneConfig>,
        metrics: ContainerMetrics,
        styles: &dyn StyleResolver,
        seed: u32,
    ) -> Self {
        init::create_scene(catalog, config, metrics, styles, seed)
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Spawns dropped at construction (bad geometry or scale)
    pub fn skipped_instances(&self) -> usize {
        self.skipped_instances
    }

    pub fn metrics(&self) -> ContainerMetrics {
        self.metrics
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn body_scale(&self) -> f32 {
        self.prev_scale
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn lift(&self) -> &LiftState {
        &self.lift
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_running(&self) -> bool {
        self.visibility.running()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn body_state(&self, index: usize) -> Option<BodyState> {
        let inst = self.instances.get(index)?;
        self.world.body_state(inst.handles.body)
    }

    /// Collision area of an instance in px²
    pub fn instance_area(&self, index: usize) -> Option<f32> {
        let inst = self.instances.get(index)?;
        self.world.collider_area(inst.handles.collider)
    }

    pub fn sleeping_count(&self) -> usize {
        self.world.sleeping_count()
    }

    /// Move an instance, e.g. to set up a deterministic layout
    pub fn place_instance(&mut self, index: usize, position: Vec2, linvel: Vec2, angvel: f32) {
        if let Some(inst) = self.instances.get(index) {
            self.world.set_position(inst.handles.body, position);
            self.world.set_step_velocity(inst.handles.body, linvel, angvel);
        }
    }

    // === INPUT ===

    pub fn on_lift_input(&mut self, delta_y: f32, now: f64) -> InputOutcome {
        step::on_lift_input(self, delta_y, now)
    }

    // === STEPPING ===

    /// Lift forces and easing for one step; does not advance the solver
    pub fn physics_step(&mut self, dt_ms: f32, now: f64) {
        step::physics_step(self, dt_ms, now);
    }

    /// `physics_step` followed by one solver step of `dt_ms`
    pub fn advance(&mut self, dt_ms: f32, now: f64) {
        step::advance(self, dt_ms, now);
    }

    /// Run one animation frame at timestamp `ts`
    pub fn tick(&mut self, ts: f64, renderer: &mut dyn SceneRenderer) -> FrameReport {
        step::tick(self, ts, renderer)
    }

    // === RENDERING ===

    /// True if any instance moved beyond the epsilons since its last sample
    pub fn is_dirty(&mut self) -> bool {
        render::is_dirty(self)
    }

    /// Clear and redraw every instance
    pub fn draw(&mut self, renderer: &mut dyn SceneRenderer) {
        render::draw(self, renderer);
    }

    pub fn draw_transform(&self, index: usize) -> Option<DrawTransform> {
        render::draw_transform(self, index)
    }

    // === RESIZE / VISIBILITY ===

    /// Container size changed: canvas, walls, scale, then one synchronous draw
    pub fn resize(&mut self, metrics: ContainerMetrics, renderer: &mut dyn SceneRenderer) {
        resize::resize(self, metrics, renderer);
    }

    pub fn set_in_view(&mut self, in_view: bool, now: f64) -> LoopCommand {
        let cmd = self.visibility.set_in_view(in_view);
        self.on_loop_command(cmd, now)
    }

    pub fn set_page_visible(&mut self, visible: bool, now: f64) -> LoopCommand {
        let cmd = self.visibility.set_page_visible(visible);
        self.on_loop_command(cmd, now)
    }

    fn on_loop_command(&mut self, cmd: LoopCommand, now: f64) -> LoopCommand {
        match cmd {
            LoopCommand::Start => {
                self.frame_loop.restart(now);
                log::debug!("scene loop start at {:.1}ms", now);
            }
            LoopCommand::Stop => log::debug!("scene loop stop"),
            LoopCommand::None => {}
        }
        cmd
    }

    // === PERF ===

    /// Enable or disable per-frame perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.perf_enabled = enabled;
        if !enabled {
            self.perf_stats.reset();
        }
    }

    /// Last frame perf snapshot (zeros when perf disabled)
    pub fn perf_stats(&self) -> PerfStats {
        self.perf_stats.clone()
    }
}

impl LiftSink for Scene {
    fn on_lift_input(&mut self, input: LiftInput) {
        step::on_lift_input(self, input.delta_y, input.now);
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
