//! Initial layout: shuffled horizontal slots above the top edge

use crate::core::config::LayoutConfig;
use crate::core::{Rng, Vec2};

/// Spawn position and kick for one instance. Velocities are per step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPoint {
    pub position: Vec2,
    pub slot: usize,
    pub linvel: Vec2,
    pub angvel: f32,
}

pub fn spawn_plan(cfg: &LayoutConfig, count: usize, container_width: f32, rng: &mut Rng) -> Vec<SpawnPoint> {
    if count == 0 {
        return Vec::new();
    }
    let margin = cfg.min_margin.max(container_width * cfg.margin_pct);
    let usable = (container_width - 2.0 * margin).max(1.0);
    let slot_w = usable / count as f32;

    let mut slots: Vec<usize> = (0..count).collect();
    rng.shuffle(&mut slots);

    let (y_lo, y_hi) = if cfg.spawn_y_min <= cfg.spawn_y_max {
        (cfg.spawn_y_min, cfg.spawn_y_max)
    } else {
        (cfg.spawn_y_max, cfg.spawn_y_min)
    };

    slots
        .into_iter()
        .map(|slot| {
            let jitter = rng.centered() * cfg.slot_jitter * slot_w;
            let x = margin + (slot as f32 + 0.5) * slot_w + jitter;
            let y = rng.range(y_lo, y_hi).min(y_hi);
            SpawnPoint {
                position: Vec2::new(x, y),
                slot,
                linvel: Vec2::new(rng.centered() * cfg.kick_linear, 0.0),
                angvel: rng.centered() * cfg.kick_angular,
            }
        })
        .collect()
}
