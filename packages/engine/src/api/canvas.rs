//! Canvas 2D renderer and CSS variable lookup

use std::collections::HashMap;
use std::sync::Arc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, CssStyleDeclaration, Document, HtmlCanvasElement, HtmlElement, Path2d, Window};

use crate::core::EngineError;
use crate::domain::{PaintStyle, StyleResolver};
use crate::geometry::PreparedShape;
use crate::simulation::{CanvasSize, DrawTransform, SceneRenderer};

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Drawable per shape id, built on first use
    paths: HashMap<Arc<str>, Path2d>,
    /// Container we switched to `position: relative`, restored on detach
    positioned: Option<HtmlElement>,
}

/// Canvas overlays the container instead of joining its flow
const CANVAS_STYLE: [(&str, &str); 7] = [
    ("position", "absolute"),
    ("left", "0"),
    ("top", "0"),
    ("width", "100%"),
    ("height", "100%"),
    ("display", "block"),
    ("pointer-events", "none"),
];

impl CanvasRenderer {
    /// Create a canvas and overlay it on `container`
    pub fn attach(window: &Window, document: &Document, container: &HtmlElement) -> Result<Self, EngineError> {
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .ok()
            .and_then(|el| el.dyn_into().ok())
            .ok_or(EngineError::MissingHost("canvas element"))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into().ok())
            .ok_or(EngineError::MissingHost("2d context"))?;

        let style = canvas.style();
        for (name, value) in CANVAS_STYLE {
            let _ = style.set_property(name, value);
        }
        container
            .append_child(&canvas)
            .map_err(|_| EngineError::MissingHost("container"))?;

        let positioned = is_static(window, container).then(|| {
            let _ = container.style().set_property("position", "relative");
            container.clone()
        });

        Ok(Self { canvas, ctx, paths: HashMap::new(), positioned })
    }

    pub fn detach(&mut self) {
        self.canvas.remove();
        if let Some(container) = self.positioned.take() {
            let _ = container.style().remove_property("position");
        }
    }

    fn path_for(&mut self, shape: &PreparedShape) -> Option<&Path2d> {
        if !self.paths.contains_key(&shape.id) {
            match Path2d::new_with_path_string(&shape.path_data) {
                Ok(path) => {
                    self.paths.insert(shape.id.clone(), path);
                }
                Err(_) => {
                    log::warn!("shape '{}': Path2D rejected outline", shape.id);
                    return None;
                }
            }
        }
        self.paths.get(&shape.id)
    }

    fn draw_inner(
        &mut self,
        shape: &PreparedShape,
        style: &PaintStyle,
        t: &DrawTransform,
    ) -> Result<(), JsValue> {
        let ctx = self.ctx.clone();
        let Some(path) = self.path_for(shape) else {
            return Ok(());
        };
        let scale = f64::from(t.scale);
        ctx.save();
        ctx.translate(f64::from(t.position.x), f64::from(t.position.y))?;
        ctx.rotate(f64::from(t.angle))?;
        ctx.translate(-f64::from(t.centroid.x) * scale, -f64::from(t.centroid.y) * scale)?;
        ctx.scale(scale, scale)?;

        ctx.set_fill_style_str(&style.fill);
        ctx.fill_with_path_2d(path);
        if let (true, Some(stroke)) = (style.has_stroke(), style.stroke.as_deref()) {
            ctx.set_stroke_style_str(stroke);
            ctx.set_line_width(f64::from(t.line_width(style.line_width)));
            ctx.stroke_with_path(path);
        }
        ctx.restore();
        Ok(())
    }
}

impl SceneRenderer for CanvasRenderer {
    fn resize(&mut self, canvas: &CanvasSize) {
        self.canvas.set_width(canvas.pixel_width);
        self.canvas.set_height(canvas.pixel_height);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", canvas.css_width));
        let _ = style.set_property("height", &format!("{}px", canvas.css_height));
        let pr = f64::from(canvas.pixel_ratio);
        if self.ctx.set_transform(pr, 0.0, 0.0, pr, 0.0, 0.0).is_err() {
            log::warn!("canvas setTransform failed");
        }
    }

    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, f64::from(width), f64::from(height));
    }

    fn draw(&mut self, shape: &PreparedShape, style: &PaintStyle, transform: &DrawTransform) {
        if self.draw_inner(shape, style, transform).is_err() {
            self.ctx.restore();
        }
    }
}

fn is_static(window: &Window, element: &HtmlElement) -> bool {
    window
        .get_computed_style(element)
        .ok()
        .flatten()
        .and_then(|style| style.get_property_value("position").ok())
        .map_or(true, |position| position.is_empty() || position == "static")
}

/// Resolves custom properties against the container's computed style
pub struct CssVarResolver {
    style: Option<CssStyleDeclaration>,
}

impl CssVarResolver {
    pub fn for_element(window: &Window, element: &HtmlElement) -> Self {
        Self { style: window.get_computed_style(element).ok().flatten() }
    }
}

impl StyleResolver for CssVarResolver {
    fn resolve(&self, var_name: &str) -> Option<String> {
        self.style.as_ref()?.get_property_value(var_name).ok()
    }
}
