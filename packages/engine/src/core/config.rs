//! Scene configuration
//!
//! All tunables live in one immutable struct handed to `Scene::new`.
//! Units follow the authoring side of the engine: pixels, milliseconds and
//! per-step velocities (one step = `FIXED_DT` ms). The solver adapter converts
//! to seconds at the seam (see `systems::physics_world`).
//!
//! Every field has a default, so a JSON override only needs the keys it changes:
//! ```
//! use lift_scene_engine::core::SceneConfig;
//!
//! let cfg = SceneConfig::from_json(r#"{ "lift": { "tauMs": 500 } }"#).unwrap();
//! assert_eq!(cfg.lift.tau_ms, 500.0);
//! assert_eq!(cfg.render.dpr_cap, 1.35);
//! ```

use serde::Deserialize;

use super::error::EngineError;

/// Fixed physics timestep in milliseconds
pub const FIXED_DT: f32 = 1000.0 / 60.0;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConfig {
    pub physics: PhysicsConfig,
    pub material: BodyMaterial,
    pub geometry: GeometryConfig,
    pub layout: LayoutConfig,
    pub arena: ArenaConfig,
    pub responsive: ResponsiveConfig,
    pub lift: LiftConfig,
    pub render: RenderConfig,
}

impl SceneConfig {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        serde_json::from_str(json).map_err(EngineError::Config)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicsConfig {
    pub gravity_x: f32,
    pub gravity_y: f32,
    /// Multiplier turning the gravity vector into px/ms²
    pub gravity_scale: f32,
    pub enable_sleeping: bool,
    pub position_iterations: usize,
    pub velocity_iterations: usize,
    /// Typical body size in pixels, lets the solver scale its tolerances
    pub length_unit: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_x: 0.0,
            gravity_y: 1.0,
            gravity_scale: 0.00125,
            enable_sleeping: true,
            position_iterations: 3,
            velocity_iterations: 3,
            length_unit: 100.0,
        }
    }
}

impl PhysicsConfig {
    /// Vertical gravity in px/ms²
    pub fn gravity_y_accel(&self) -> f32 {
        self.gravity_y * self.gravity_scale
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BodyMaterial {
    pub restitution: f32,
    pub friction: f32,
    /// Fraction of velocity lost per step to air drag
    pub friction_air: f32,
    /// Mass per square pixel
    pub density: f32,
}

impl Default for BodyMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.35,
            friction: 0.3,
            friction_air: 0.0012,
            density: 0.001,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhysicsProxy {
    /// Single convex polygon around the outer sub-path
    ConvexHull,
    /// Compound of ear-clipped triangles, keeps concave outlines
    Triangulated,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeometryConfig {
    /// Distance in source units between samples along curves
    pub sample_density: f32,
    pub simplify_tolerance: f32,
    /// Outline width (source units) that maps to scale 1.0
    pub reference_width: f32,
    pub proxy: PhysicsProxy,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            sample_density: 10.0,
            simplify_tolerance: 25.0,
            reference_width: 500.0,
            proxy: PhysicsProxy::ConvexHull,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub margin_pct: f32,
    pub min_margin: f32,
    /// Spawn band above the top edge, both negative
    pub spawn_y_min: f32,
    pub spawn_y_max: f32,
    /// Horizontal jitter as a fraction of one slot
    pub slot_jitter: f32,
    /// Per-step horizontal velocity kick
    pub kick_linear: f32,
    /// Per-step angular velocity kick (radians)
    pub kick_angular: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin_pct: 0.07,
            min_margin: 24.0,
            spawn_y_min: -250.0,
            spawn_y_max: -100.0,
            slot_jitter: 0.4,
            kick_linear: 0.35,
            kick_angular: 0.02,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArenaConfig {
    pub wall_thickness: f32,
    /// Distance of the ceiling above the top edge
    pub ceiling_offset: f32,
    /// Minimum width of ground and ceiling
    pub min_span: f32,
    /// Side wall height as a multiple of container height
    pub wall_height_factor: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            wall_thickness: 120.0,
            ceiling_offset: 400.0,
            min_span: 27184.0,
            wall_height_factor: 5.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsiveRule {
    /// `None` matches every viewport
    pub max_viewport_width: Option<f32>,
    pub percent_of_container: f32,
    pub min_px: f32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResponsiveConfig {
    pub rules: Vec<ResponsiveRule>,
}

impl Default for ResponsiveConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                ResponsiveRule { max_viewport_width: Some(480.0), percent_of_container: 0.6, min_px: 150.0 },
                ResponsiveRule { max_viewport_width: Some(768.0), percent_of_container: 0.6, min_px: 175.0 },
                ResponsiveRule { max_viewport_width: None, percent_of_container: 0.30, min_px: 0.0 },
            ],
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LiftConfig {
    pub energy_per_px: f32,
    /// px/ms² of lift per unit of energy
    pub base_accel_per_energy: f32,
    /// Acceleration ceiling per second of step, floored at 0.2
    pub cap_accel_per_sec: f32,
    /// Energy decay time constant, floored at 60 ms
    pub tau_ms: f32,
    pub burst_window_ms: f32,
    /// Ignore input while the scene is out of view
    pub viewport_guard: bool,
    /// Ignore non-positive deltas
    pub up_only: bool,
    /// Max angular velocity perturbation per step (radians)
    pub angular_jitter: f32,
    /// Extra velocity damping rate per second, clamped to [0, 1]
    pub ease_per_sec: f32,
    /// Fraction of gravity added to lift while a burst is active
    pub anti_sag_bias: f32,
    pub hard_clamp: f32,
    pub ema_alpha: f32,
    pub energy_floor: f32,
    /// Upward px/ms² per unit mass given to bodies after a rescale
    pub resize_nudge: f32,
}

impl Default for LiftConfig {
    fn default() -> Self {
        Self {
            energy_per_px: 0.5,
            base_accel_per_energy: 0.000015,
            cap_accel_per_sec: 0.0000056,
            tau_ms: 360.0,
            burst_window_ms: 50.0,
            viewport_guard: true,
            up_only: true,
            angular_jitter: 0.01,
            ease_per_sec: 0.06,
            anti_sag_bias: 0.05,
            hard_clamp: 140.0,
            ema_alpha: 0.75,
            energy_floor: 0.00001,
            resize_nudge: 0.000002,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    pub dpr_cap: f32,
    pub target_fps: f32,
    pub move_eps_pos: f32,
    pub move_eps_ang: f32,
    pub max_steps_per_frame: u32,
    /// Elapsed time clamp per frame (ms)
    pub max_frame_dt: f32,
    /// Frames slower than this multiple of the target interval trigger skipping
    pub slow_frame_factor: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dpr_cap: 1.35,
            target_fps: 60.0,
            move_eps_pos: 0.2,
            move_eps_ang: 0.002,
            max_steps_per_frame: 4,
            max_frame_dt: 50.0,
            slow_frame_factor: 1.4,
        }
    }
}

impl RenderConfig {
    pub fn target_frame_ms(&self) -> f32 {
        1000.0 / self.target_fps.max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let cfg = SceneConfig::from_json("{}").unwrap();
        assert_eq!(cfg.physics.gravity_scale, 0.00125);
        assert_eq!(cfg.responsive.rules.len(), 3);
        assert_eq!(cfg.geometry.proxy, PhysicsProxy::ConvexHull);
    }

    #[test]
    fn nested_override_keeps_sibling_defaults() {
        let cfg = SceneConfig::from_json(
            r#"{ "geometry": { "proxy": "triangulated" }, "render": { "dprCap": 2.0 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.geometry.proxy, PhysicsProxy::Triangulated);
        assert_eq!(cfg.geometry.sample_density, 10.0);
        assert_eq!(cfg.render.dpr_cap, 2.0);
        assert_eq!(cfg.render.max_steps_per_frame, 4);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = SceneConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
