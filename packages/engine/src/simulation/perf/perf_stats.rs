use wasm_bindgen::prelude::*;

/// Per-frame timings and counters, filled only while perf metrics are enabled
#[wasm_bindgen]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PerfStats {
    pub(crate) frame_ms: f64,
    pub(crate) physics_ms: f64,
    pub(crate) draw_ms: f64,
    pub(crate) dt_ms: f32,
    pub(crate) steps: u32,
    pub(crate) drew: bool,
    pub(crate) skipped: bool,
    pub(crate) lift_energy: f32,
    pub(crate) lift_accel: f32,
    pub(crate) instances: u32,
    pub(crate) sleeping: u32,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn frame_ms(&self) -> f64 { self.frame_ms }
    #[wasm_bindgen(getter)]
    pub fn physics_ms(&self) -> f64 { self.physics_ms }
    #[wasm_bindgen(getter)]
    pub fn draw_ms(&self) -> f64 { self.draw_ms }
    #[wasm_bindgen(getter)]
    pub fn dt_ms(&self) -> f32 { self.dt_ms }
    #[wasm_bindgen(getter)]
    pub fn steps(&self) -> u32 { self.steps }
    #[wasm_bindgen(getter)]
    pub fn drew(&self) -> bool { self.drew }
    #[wasm_bindgen(getter)]
    pub fn skipped(&self) -> bool { self.skipped }
    #[wasm_bindgen(getter)]
    pub fn lift_energy(&self) -> f32 { self.lift_energy }
    #[wasm_bindgen(getter)]
    pub fn lift_accel(&self) -> f32 { self.lift_accel }
    #[wasm_bindgen(getter)]
    pub fn instances(&self) -> u32 { self.instances }
    #[wasm_bindgen(getter)]
    pub fn sleeping(&self) -> u32 { self.sleeping }
}
