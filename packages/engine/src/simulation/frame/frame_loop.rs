//! Fixed-timestep accumulator with a bounded step count and frame skipping

use crate::core::config::{RenderConfig, FIXED_DT};

/// What the scene should do for one animation frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FramePlan {
    /// Fixed steps to run this frame
    pub steps: u32,
    /// Clamped elapsed time since the previous frame (ms)
    pub dt: f32,
    pub skip_draw: bool,
}

#[derive(Clone, Debug, Default)]
pub struct FrameLoop {
    accumulator: f32,
    last_ts: Option<f64>,
    frame_skip: u32,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resample the clock so the first frame after a pause sees a small dt
    pub fn restart(&mut self, ts: f64) {
        self.last_ts = Some(ts);
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    pub fn begin_frame(&mut self, ts: f64, cfg: &RenderConfig) -> FramePlan {
        let last = self.last_ts.unwrap_or(ts);
        let raw = (ts - last) as f32;
        let dt = if raw.is_finite() { raw.clamp(0.0, cfg.max_frame_dt.max(0.0)) } else { 0.0 };
        self.last_ts = Some(ts);

        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= FIXED_DT && steps < cfg.max_steps_per_frame {
            self.accumulator -= FIXED_DT;
            steps += 1;
        }

        let slow = dt > cfg.target_frame_ms() * cfg.slow_frame_factor;
        self.frame_skip = if slow { (self.frame_skip + 1) % 2 } else { 0 };

        FramePlan { steps, dt, skip_draw: self.frame_skip != 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_runs_no_steps() {
        let mut fl = FrameLoop::new();
        let plan = fl.begin_frame(1000.0, &RenderConfig::default());
        assert_eq!(plan.steps, 0);
        assert_eq!(plan.dt, 0.0);
        assert!(!plan.skip_draw);
    }

    #[test]
    fn accumulator_carries_remainder() {
        let cfg = RenderConfig::default();
        let mut fl = FrameLoop::new();
        fl.restart(0.0);
        assert_eq!(fl.begin_frame(10.0, &cfg).steps, 0);
        assert_eq!(fl.begin_frame(20.0, &cfg).steps, 1);
        assert!((fl.accumulator() - (20.0 - FIXED_DT)).abs() < 1e-4);
    }

    #[test]
    fn long_gaps_are_clamped() {
        let cfg = RenderConfig::default();
        let mut fl = FrameLoop::new();
        fl.restart(0.0);
        let plan = fl.begin_frame(10_000.0, &cfg);
        assert_eq!(plan.dt, 50.0);
        assert!(plan.steps == 2 || plan.steps == 3);
    }

    #[test]
    fn step_count_is_bounded() {
        let cfg = RenderConfig { max_frame_dt: 1000.0, ..RenderConfig::default() };
        let mut fl = FrameLoop::new();
        fl.restart(0.0);
        assert_eq!(fl.begin_frame(500.0, &cfg).steps, 4);
    }

    #[test]
    fn slow_frames_skip_every_other_draw() {
        let cfg = RenderConfig::default();
        let mut fl = FrameLoop::new();
        fl.restart(0.0);
        let skips: Vec<bool> = (1..=4).map(|i| fl.begin_frame(i as f64 * 40.0, &cfg).skip_draw).collect();
        assert_eq!(skips, vec![true, false, true, false]);
        // a fast frame resets the toggle
        assert!(!fl.begin_frame(160.0 + 16.0, &cfg).skip_draw);
        assert!(!fl.begin_frame(176.0 + 16.0, &cfg).skip_draw);
    }

    #[test]
    fn clock_going_backwards_is_harmless() {
        let cfg = RenderConfig::default();
        let mut fl = FrameLoop::new();
        fl.restart(100.0);
        let plan = fl.begin_frame(50.0, &cfg);
        assert_eq!(plan.dt, 0.0);
        assert_eq!(plan.steps, 0);
    }
}
