//! Rendering seam
//!
//! The scene never touches a drawing API directly. It hands each instance's
//! prepared shape, resolved paint and body transform to a `SceneRenderer`.

use crate::core::Vec2;
use crate::domain::PaintStyle;
use crate::geometry::PreparedShape;
use crate::systems::TransformSnapshot;

use super::{ContainerMetrics, Scene};

/// Canvas backing store dimensions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSize {
    /// CSS pixels
    pub css_width: f32,
    pub css_height: f32,
    /// Backing store pixels
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Effective device pixel ratio after the cap
    pub pixel_ratio: f32,
}

pub fn canvas_size(metrics: &ContainerMetrics, dpr_cap: f32) -> CanvasSize {
    let dpr = if metrics.device_pixel_ratio.is_finite() && metrics.device_pixel_ratio > 0.0 {
        metrics.device_pixel_ratio
    } else {
        1.0
    };
    let pixel_ratio = dpr.min(dpr_cap.max(f32::EPSILON));
    // hosts report fractional sizes; the canvas uses whole css pixels
    let css_width = metrics.width.max(0.0).trunc();
    let css_height = metrics.height.max(0.0).trunc();
    CanvasSize {
        css_width,
        css_height,
        pixel_width: ((css_width * pixel_ratio).floor() as u32).max(1),
        pixel_height: ((css_height * pixel_ratio).floor() as u32).max(1),
        pixel_ratio,
    }
}

/// Where and how to draw one instance.
///
/// Applied as: translate(position), rotate(angle),
/// translate(-centroid * scale), scale(scale).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawTransform {
    pub position: Vec2,
    pub angle: f32,
    /// Centroid in source units
    pub centroid: Vec2,
    pub scale: f32,
}

impl DrawTransform {
    /// Map a point in outline source units to screen space
    pub fn apply(&self, p: Vec2) -> Vec2 {
        let local = (p - self.centroid) * self.scale;
        let (sin, cos) = self.angle.sin_cos();
        self.position + Vec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos)
    }

    /// Stroke width in source units that renders as `width` screen pixels
    pub fn line_width(&self, width: f32) -> f32 {
        if self.scale > 0.0 {
            width / self.scale
        } else {
            width
        }
    }
}

pub trait SceneRenderer {
    /// Backing store changed size; the default does nothing
    fn resize(&mut self, _canvas: &CanvasSize) {}

    /// Clear the whole surface (CSS pixels)
    fn clear(&mut self, width: f32, height: f32);

    fn draw(&mut self, shape: &PreparedShape, style: &PaintStyle, transform: &DrawTransform);
}

pub(super) fn draw_transform(scene: &Scene, index: usize) -> Option<DrawTransform> {
    let inst = scene.instances.get(index)?;
    let state = scene.world.body_state(inst.handles.body)?;
    Some(DrawTransform {
        position: state.position,
        angle: state.angle,
        centroid: inst.shape.centroid,
        scale: scene.scale,
    })
}

pub(super) fn is_dirty(scene: &mut Scene) -> bool {
    let world = &scene.world;
    let samples = scene.instances.iter().filter_map(|inst| {
        let state = world.body_state(inst.handles.body)?;
        Some((
            inst.handles.body,
            TransformSnapshot { x: state.position.x, y: state.position.y, angle: state.angle },
        ))
    });
    scene.dirty.observe_all(samples)
}

pub(super) fn draw(scene: &mut Scene, renderer: &mut dyn SceneRenderer) {
    renderer.clear(scene.canvas.css_width, scene.canvas.css_height);
    for (i, inst) in scene.instances.iter().enumerate() {
        if let Some(transform) = draw_transform(scene, i) {
            renderer.draw(&inst.shape, &inst.style, &transform);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backing_store_caps_dpr() {
        let m = ContainerMetrics::new(800.0, 600.0).with_viewport(800.0, 3.0);
        let c = canvas_size(&m, 1.35);
        assert_eq!(c.pixel_ratio, 1.35);
        assert_eq!(c.pixel_width, 1080);
        assert_eq!(c.pixel_height, 810);
    }

    #[test]
    fn backing_store_never_collapses() {
        let m = ContainerMetrics::new(0.0, 0.4).with_viewport(0.0, f32::NAN);
        let c = canvas_size(&m, 1.35);
        assert_eq!(c.pixel_ratio, 1.0);
        assert_eq!((c.pixel_width, c.pixel_height), (1, 1));
    }

    #[test]
    fn transform_maps_centroid_to_position() {
        let t = DrawTransform {
            position: Vec2::new(100.0, 50.0),
            angle: std::f32::consts::FRAC_PI_2,
            centroid: Vec2::new(10.0, 10.0),
            scale: 2.0,
        };
        assert_eq!(t.apply(Vec2::new(10.0, 10.0)), Vec2::new(100.0, 50.0));
        let p = t.apply(Vec2::new(11.0, 10.0));
        assert!((p.x - 100.0).abs() < 1e-4);
        assert!((p.y - 52.0).abs() < 1e-4);
        assert_eq!(t.line_width(3.0), 1.5);
    }
}
