//! Browser-facing layer: wasm-bindgen exports, canvas rendering and page listeners.

pub mod canvas;
pub mod capabilities;
pub mod listeners;
pub mod wasm;

pub use canvas::{CanvasRenderer, CssVarResolver};
pub use capabilities::{Capabilities, Clock, ResizeStrategy, VisibilityStrategy};
pub use wasm::{SceneHost, ShapeLibrary};
