//! Domain: shape definitions, the prepared catalog and paint resolution.

pub mod content;
pub mod paint;
pub mod shape;

pub use content::{CatalogEntry, ShapeCatalog};
pub use paint::{resolve_paint, NoStyles, PaintStyle, StyleResolver};
pub use shape::{PaintRefs, ShapeDefinition};
