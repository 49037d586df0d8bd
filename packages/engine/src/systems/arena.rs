//! Arena: ground, ceiling and side walls around the container
//!
//! Walls sit just outside the visible rectangle. The ceiling is raised by
//! `ceiling_offset` so lifted bodies can leave the top edge before being capped.

use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

use crate::core::config::ArenaConfig;
use crate::core::Vec2;

use super::physics_world::PhysicsWorld;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallSide {
    Ground,
    Ceiling,
    Left,
    Right,
}

/// Axis-aligned wall box: center and half extents
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallRect {
    pub side: WallSide,
    pub center: Vec2,
    pub half: Vec2,
}

impl WallRect {
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }
}

/// Wall boxes for a `width` x `height` container
pub fn wall_rects(cfg: &ArenaConfig, width: f32, height: f32) -> [WallRect; 4] {
    let t = cfg.wall_thickness.max(1.0);
    let span = cfg.min_span.max(width * 3.0);
    let wall_h = height * cfg.wall_height_factor.max(1.0);
    [
        WallRect {
            side: WallSide::Ground,
            center: Vec2::new(width / 2.0, height + t / 2.0),
            half: Vec2::new(span / 2.0, t / 2.0),
        },
        WallRect {
            side: WallSide::Ceiling,
            center: Vec2::new(width / 2.0, -cfg.ceiling_offset - t / 2.0),
            half: Vec2::new(span / 2.0, t / 2.0),
        },
        WallRect {
            side: WallSide::Left,
            center: Vec2::new(-t / 2.0, height / 2.0),
            half: Vec2::new(t / 2.0, wall_h / 2.0),
        },
        WallRect {
            side: WallSide::Right,
            center: Vec2::new(width + t / 2.0, height / 2.0),
            half: Vec2::new(t / 2.0, wall_h / 2.0),
        },
    ]
}

/// True when the walls close off every edge of the container rectangle
pub fn encloses(rects: &[WallRect; 4], width: f32, height: f32) -> bool {
    const EPS: f32 = 1e-3;
    rects.iter().all(|r| match r.side {
        WallSide::Ground => {
            r.min().y >= height - EPS && r.min().x <= 0.0 && r.max().x >= width
        }
        WallSide::Ceiling => r.max().y <= EPS && r.min().x <= 0.0 && r.max().x >= width,
        WallSide::Left => r.max().x <= EPS && r.min().y <= 0.0 && r.max().y >= height,
        WallSide::Right => {
            r.min().x >= width - EPS && r.min().y <= 0.0 && r.max().y >= height
        }
    })
}

struct Wall {
    rect: WallRect,
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

pub struct Arena {
    walls: Vec<Wall>,
}

impl Arena {
    pub fn new(
        world: &mut PhysicsWorld,
        cfg: &ArenaConfig,
        width: f32,
        height: f32,
        friction: f32,
    ) -> Self {
        let walls = wall_rects(cfg, width, height)
            .into_iter()
            .map(|rect| {
                let (body, collider) = world.insert_fixed_box(rect.center, rect.half, friction);
                Wall { rect, body, collider }
            })
            .collect();
        Self { walls }
    }

    /// Move and resize every wall in place for the new container size
    pub fn resize(&mut self, world: &mut PhysicsWorld, cfg: &ArenaConfig, width: f32, height: f32) {
        for (wall, rect) in self.walls.iter_mut().zip(wall_rects(cfg, width, height)) {
            world.move_fixed_box(wall.body, wall.collider, rect.center, rect.half);
            wall.rect = rect;
        }
    }

    pub fn rects(&self) -> Vec<WallRect> {
        self.walls.iter().map(|w| w.rect).collect()
    }

    pub fn rect(&self, side: WallSide) -> Option<WallRect> {
        self.walls.iter().map(|w| w.rect).find(|r| r.side == side)
    }
}
