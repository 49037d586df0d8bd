//! PhysicsWorld - thin adapter over the rapier2d pipeline
//!
//! The engine speaks pixels, milliseconds and per-step velocities; rapier is
//! driven in pixels and seconds. Every unit conversion happens in this file.

use rapier2d::prelude::*;

use crate::core::config::{BodyMaterial, PhysicsConfig, FIXED_DT};
use crate::core::Vec2;

/// px/ms² -> px/s²
pub const ACCEL_MS_TO_S: f32 = 1.0e6;

/// Per-step velocity -> per-second velocity
#[inline]
pub fn per_step_to_per_sec(v: f32) -> f32 {
    v * 1000.0 / FIXED_DT
}

/// Snapshot of a body's state in engine-facing units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyState {
    pub position: Vec2,
    pub angle: f32,
    /// px/s
    pub linvel: Vec2,
    /// rad/s
    pub angvel: f32,
    pub mass: f32,
    pub sleeping: bool,
}

pub struct PhysicsWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    can_sleep: bool,
}

impl PhysicsWorld {
    pub fn new(cfg: &PhysicsConfig) -> Self {
        let mut params = IntegrationParameters::default();
        params.dt = FIXED_DT / 1000.0;
        params.length_unit = cfg.length_unit.max(1.0);
        params.num_internal_pgs_iterations = cfg.velocity_iterations.max(1);
        params.num_internal_stabilization_iterations = cfg.position_iterations.max(1);

        let g = ACCEL_MS_TO_S * cfg.gravity_scale;
        Self {
            gravity: vector![cfg.gravity_x * g, cfg.gravity_y * g],
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            can_sleep: cfg.enable_sleeping,
        }
    }

    /// Advance the solver by `dt_ms`
    pub fn step(&mut self, dt_ms: f32) {
        self.params.dt = (dt_ms / 1000.0).max(0.0);
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    // === STATIC BOXES (arena walls) ===

    pub fn insert_fixed_box(
        &mut self,
        center: Vec2,
        half: Vec2,
        friction: f32,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body = self.bodies.insert(
            RigidBodyBuilder::fixed()
                .translation(vector![center.x, center.y])
                .build(),
        );
        let collider = ColliderBuilder::cuboid(half.x, half.y).friction(friction).build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        (body, collider)
    }

    pub fn move_fixed_box(
        &mut self,
        body: RigidBodyHandle,
        collider: ColliderHandle,
        center: Vec2,
        half: Vec2,
    ) {
        if let Some(rb) = self.bodies.get_mut(body) {
            rb.set_translation(vector![center.x, center.y], true);
        }
        if let Some(col) = self.colliders.get_mut(collider) {
            col.set_shape(SharedShape::cuboid(half.x, half.y));
        }
    }

    // === DYNAMIC BODIES ===

    /// Insert a dynamic body at rest with one collider built from `parts`.
    ///
    /// Returns `None` when the parts do not form a usable shape.
    pub fn insert_dynamic(
        &mut self,
        position: Vec2,
        parts: &[Vec<Vec2>],
        material: &BodyMaterial,
    ) -> Option<(RigidBodyHandle, ColliderHandle)> {
        let shape = shape_from_parts(parts)?;
        let drag = per_step_to_per_sec(material.friction_air.max(0.0));
        let body = self.bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(vector![position.x, position.y])
                .linear_damping(drag)
                .angular_damping(drag)
                .can_sleep(self.can_sleep)
                .build(),
        );
        let collider = ColliderBuilder::new(shape)
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        Some((body, collider))
    }

    /// Swap the collider geometry of an existing body in place.
    pub fn set_parts(&mut self, collider: ColliderHandle, parts: &[Vec<Vec2>]) -> bool {
        let Some(shape) = shape_from_parts(parts) else {
            return false;
        };
        let Some(col) = self.colliders.get_mut(collider) else {
            return false;
        };
        col.set_shape(shape);
        // mass follows the new shape now, not at the next step
        if let Some(rb) = col.parent().and_then(|parent| self.bodies.get_mut(parent)) {
            rb.recompute_mass_properties_from_colliders(&self.colliders);
        }
        true
    }

    pub fn body_state(&self, body: RigidBodyHandle) -> Option<BodyState> {
        let rb = self.bodies.get(body)?;
        let t = rb.translation();
        let v = rb.linvel();
        Some(BodyState {
            position: Vec2::new(t.x, t.y),
            angle: rb.rotation().angle(),
            linvel: Vec2::new(v.x, v.y),
            angvel: rb.angvel(),
            mass: rb.mass(),
            sleeping: rb.is_sleeping(),
        })
    }

    /// Area of a collider's shape in px²
    pub fn collider_area(&self, collider: ColliderHandle) -> Option<f32> {
        let col = self.colliders.get(collider)?;
        Some(col.shape().mass_properties(1.0).mass())
    }

    pub fn set_position(&mut self, body: RigidBodyHandle, position: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body) {
            rb.set_translation(vector![position.x, position.y], true);
        }
    }

    /// Set velocities given per step (px/step, rad/step)
    pub fn set_step_velocity(&mut self, body: RigidBodyHandle, linvel: Vec2, angvel: f32) {
        if let Some(rb) = self.bodies.get_mut(body) {
            rb.set_linvel(
                vector![per_step_to_per_sec(linvel.x), per_step_to_per_sec(linvel.y)],
                true,
            );
            rb.set_angvel(per_step_to_per_sec(angvel), true);
        }
    }

    /// Apply a mass-scaled vertical acceleration (px/ms², negative is up) for
    /// one step of `dt_ms`. Net acceleration is the same for every body.
    pub fn apply_vertical_accel(&mut self, body: RigidBodyHandle, accel: f32, dt_ms: f32) {
        if let Some(rb) = self.bodies.get_mut(body) {
            let impulse = rb.mass() * accel * ACCEL_MS_TO_S * (dt_ms / 1000.0);
            rb.apply_impulse(vector![0.0, impulse], true);
        }
    }

    /// Add a per-step angular velocity perturbation
    pub fn add_step_angvel(&mut self, body: RigidBodyHandle, delta: f32) {
        if let Some(rb) = self.bodies.get_mut(body) {
            let w = rb.angvel() + per_step_to_per_sec(delta);
            rb.set_angvel(w, true);
        }
    }

    /// Scale linear and angular velocity without waking the body
    pub fn damp_velocity(&mut self, body: RigidBodyHandle, factor: f32) {
        if let Some(rb) = self.bodies.get_mut(body) {
            if rb.is_sleeping() {
                return;
            }
            let v = *rb.linvel() * factor;
            let w = rb.angvel() * factor;
            rb.set_linvel(v, false);
            rb.set_angvel(w, false);
        }
    }

    pub fn wake(&mut self, body: RigidBodyHandle) {
        if let Some(rb) = self.bodies.get_mut(body) {
            rb.wake_up(true);
        }
    }

    pub fn sleeping_count(&self) -> usize {
        self.bodies
            .iter()
            .filter(|(_, rb)| rb.is_dynamic() && rb.is_sleeping())
            .count()
    }
}

fn shape_from_parts(parts: &[Vec<Vec2>]) -> Option<SharedShape> {
    let to_points = |part: &Vec<Vec2>| -> Vec<Point<Real>> {
        part.iter().map(|p| point![p.x, p.y]).collect()
    };
    match parts {
        [] => None,
        [single] => SharedShape::convex_hull(&to_points(single)),
        many => {
            let shapes: Vec<(Isometry<Real>, SharedShape)> = many
                .iter()
                .filter_map(|part| SharedShape::convex_hull(&to_points(part)))
                .map(|s| (Isometry::identity(), s))
                .collect();
            if shapes.is_empty() {
                None
            } else {
                Some(SharedShape::compound(shapes))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(half: f32) -> Vec<Vec<Vec2>> {
        vec![vec![
            Vec2::new(-half, -half),
            Vec2::new(half, -half),
            Vec2::new(half, half),
            Vec2::new(-half, half),
        ]]
    }

    #[test]
    fn dynamic_body_starts_at_rest() {
        let mut world = PhysicsWorld::new(&PhysicsConfig::default());
        let (body, _) = world
            .insert_dynamic(Vec2::new(10.0, 20.0), &square(5.0), &BodyMaterial::default())
            .unwrap();
        let state = world.body_state(body).unwrap();
        assert_eq!(state.position, Vec2::new(10.0, 20.0));
        assert_eq!(state.linvel, Vec2::zero());
        assert_eq!(state.angvel, 0.0);
    }

    #[test]
    fn empty_parts_are_refused() {
        let mut world = PhysicsWorld::new(&PhysicsConfig::default());
        assert!(world
            .insert_dynamic(Vec2::zero(), &[], &BodyMaterial::default())
            .is_none());
    }

    #[test]
    fn gravity_pulls_bodies_down() {
        let mut world = PhysicsWorld::new(&PhysicsConfig::default());
        let (body, _) = world
            .insert_dynamic(Vec2::zero(), &square(5.0), &BodyMaterial::default())
            .unwrap();
        for _ in 0..10 {
            world.step(FIXED_DT);
        }
        let state = world.body_state(body).unwrap();
        assert!(state.position.y > 0.0);
        assert!(state.linvel.y > 0.0);
    }

    #[test]
    fn set_parts_rescales_collider_area() {
        let mut world = PhysicsWorld::new(&PhysicsConfig::default());
        let (_, collider) = world
            .insert_dynamic(Vec2::zero(), &square(5.0), &BodyMaterial::default())
            .unwrap();
        assert!((world.collider_area(collider).unwrap() - 100.0).abs() < 1e-2);
        assert!(world.set_parts(collider, &square(10.0)));
        assert!((world.collider_area(collider).unwrap() - 400.0).abs() < 1e-2);
    }

    #[test]
    fn set_parts_updates_mass_before_the_next_step() {
        let mut world = PhysicsWorld::new(&PhysicsConfig::default());
        let (body, collider) = world
            .insert_dynamic(Vec2::zero(), &square(5.0), &BodyMaterial::default())
            .unwrap();
        let before = world.body_state(body).unwrap().mass;
        assert!(before > 0.0);

        assert!(world.set_parts(collider, &square(10.0)));
        let after = world.body_state(body).unwrap().mass;
        assert!((after / before - 4.0).abs() < 1e-3, "{} -> {}", before, after);
    }
}
