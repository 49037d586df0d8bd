//! Body factory: prepared shape + scale -> dynamic rigid body

use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

use crate::core::config::{BodyMaterial, PhysicsProxy};
use crate::core::Vec2;
use crate::geometry::PreparedShape;

use super::physics_world::PhysicsWorld;

/// Handles for one spawned body
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyHandles {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

/// Create a dynamic body at `position`, at rest.
///
/// The prepared polygon is copied before scaling. Returns `None` for a
/// non-positive or non-finite scale, or when the shape yields no collider.
pub fn create_body(
    world: &mut PhysicsWorld,
    shape: &PreparedShape,
    proxy: PhysicsProxy,
    scale: f32,
    position: Vec2,
    material: &BodyMaterial,
) -> Option<BodyHandles> {
    if !(scale.is_finite() && scale > 0.0) || !position.is_finite() {
        return None;
    }
    let parts = shape.local_parts(proxy, scale);
    if parts.iter().all(|p| p.len() < 3) {
        return None;
    }
    world
        .insert_dynamic(position, &parts, material)
        .map(|(body, collider)| BodyHandles { body, collider })
}

/// Replace the collider of an existing body with the shape at a new scale
pub fn rescale_body(
    world: &mut PhysicsWorld,
    handles: BodyHandles,
    shape: &PreparedShape,
    proxy: PhysicsProxy,
    scale: f32,
) -> bool {
    if !(scale.is_finite() && scale > 0.0) {
        return false;
    }
    world.set_parts(handles.collider, &shape.local_parts(proxy, scale))
}
