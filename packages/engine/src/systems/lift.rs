//! Scroll-energy model
//!
//! Raw scroll/wheel deltas are low-pass filtered into `smoothed_delta`, which
//! feeds a slowly decaying `energy` scalar. Force is derived from energy only
//! inside a short burst window after the last qualifying input, and is capped
//! per step no matter how much energy is stored.
//!
//! Accelerations are px/ms² (matching gravity), times are ms.

use crate::core::config::LiftConfig;

/// Why an input did or did not add energy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// Energy was added and the burst window restarted
    Accepted,
    /// Scene out of view with the viewport guard on; state untouched
    Guarded,
    /// Delta filtered out (direction policy) or smoothed to nothing
    Ignored,
}

#[derive(Clone, Debug, Default)]
pub struct LiftState {
    smoothed_delta: f32,
    energy: f32,
    last_input_ms: f64,
    burst_active: bool,
    last_accel: f32,
}

impl LiftState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn energy(&self) -> f32 {
        self.energy
    }

    pub fn smoothed_delta(&self) -> f32 {
        self.smoothed_delta
    }

    pub fn burst_active(&self) -> bool {
        self.burst_active
    }

    pub fn last_input_ms(&self) -> f64 {
        self.last_input_ms
    }

    /// Upward acceleration applied by the most recent `advance` (0 when none)
    pub fn last_accel(&self) -> f32 {
        self.last_accel
    }

    pub fn on_input(&mut self, cfg: &LiftConfig, raw_delta: f32, now: f64, visible: bool) -> InputOutcome {
        if cfg.viewport_guard && !visible {
            return InputOutcome::Guarded;
        }
        if !raw_delta.is_finite() || (cfg.up_only && raw_delta <= 0.0) {
            return InputOutcome::Ignored;
        }

        let clamp = cfg.hard_clamp.abs();
        let delta = raw_delta.clamp(-clamp, clamp);
        let alpha = cfg.ema_alpha.clamp(0.0, 1.0);
        self.smoothed_delta = alpha * self.smoothed_delta + (1.0 - alpha) * delta;

        let add = self.smoothed_delta.max(0.0) * cfg.energy_per_px;
        if add > 0.0 {
            self.energy += add;
            self.last_input_ms = now;
            self.burst_active = true;
            InputOutcome::Accepted
        } else {
            InputOutcome::Ignored
        }
    }

    /// One physics step of `dt_ms` at time `now`.
    ///
    /// Expires the burst, decays energy and returns the upward acceleration
    /// (px/ms², positive means up) to apply to every dynamic body this step.
    /// `gravity` is the vertical gravity magnitude in px/ms².
    pub fn advance(&mut self, cfg: &LiftConfig, dt_ms: f32, now: f64, gravity: f32) -> Option<f32> {
        let since_input = (now - self.last_input_ms).max(0.0) as f32;
        let window = cfg.burst_window_ms.max(f32::EPSILON);
        if since_input > window {
            self.burst_active = false;
        }

        self.energy *= (-dt_ms.max(0.0) / cfg.tau_ms.max(60.0)).exp();
        self.last_accel = 0.0;

        if !(self.energy > cfg.energy_floor && self.burst_active) {
            return None;
        }

        let burst_factor = (1.0 - since_input / window).max(0.1);
        let uncapped = cfg.base_accel_per_energy * self.energy * burst_factor;
        let accel = (uncapped + cfg.anti_sag_bias * gravity).min(step_cap(cfg, dt_ms));
        self.last_accel = accel;
        Some(accel)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Per-step acceleration ceiling for a step of `dt_ms`
pub fn step_cap(cfg: &LiftConfig, dt_ms: f32) -> f32 {
    cfg.cap_accel_per_sec.max(0.2) * step_seconds(dt_ms)
}

/// Continuous velocity damping factor for a step, `None` when easing is off
pub fn ease_factor(cfg: &LiftConfig, dt_ms: f32) -> Option<f32> {
    let ease = cfg.ease_per_sec.clamp(0.0, 1.0);
    (ease > 0.0).then(|| (-ease * step_seconds(dt_ms)).exp())
}

#[inline]
fn step_seconds(dt_ms: f32) -> f32 {
    (dt_ms / 1000.0).max(0.001)
}
