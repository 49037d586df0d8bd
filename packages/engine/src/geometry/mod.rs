//! Geometry preparation
//!
//! Turns SVG-style outline data into a closed, simplified polygon that the
//! solver can use as a collision proxy. The full outline is kept untouched
//! for drawing; only the physics proxy is simplified.

pub mod path;
pub mod polygon;
pub mod prepare;
pub mod simplify;

pub use prepare::{prepare_outline, sub_path_polygons, PreparedShape};
