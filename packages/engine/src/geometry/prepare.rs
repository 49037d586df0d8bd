//! Outline -> physics proxy pipeline
//!
//! 1. split the outline into closed sub-paths
//! 2. sample + simplify each one, force closure
//! 3. keep the sub-path with the largest |signed area| (first wins on ties)
//! 4. optionally reduce it to its convex hull, then take the centroid
//!
//! Outlines often carry decorative holes and inner strokes; the outer
//! boundary encloses the most area, so it alone defines collision geometry.

use std::sync::Arc;

use kurbo::BezPath;

use crate::core::config::{GeometryConfig, PhysicsProxy};
use crate::core::{GeometryError, Vec2};

use super::path::{parse_outline, sample_sub_path, split_sub_paths};
use super::polygon::{
    centroid, convex_hull, distinct_vertex_count, ensure_closed, signed_area, triangulate,
};
use super::simplify::simplify_polyline;

/// Smallest enclosed area (source units²) accepted as a physics proxy
const MIN_PROXY_AREA: f32 = 1e-3;

/// Geometry derived once from a shape definition, shared read-only by every
/// instance spawned from it.
#[derive(Debug, Clone)]
pub struct PreparedShape {
    /// Shape identifier, also the renderer's cache key
    pub id: Arc<str>,
    /// Closed physics polygon in source coordinates (first == last)
    pub polygon: Vec<Vec2>,
    /// Centroid of `polygon`; the body origin maps here
    pub centroid: Vec2,
    /// |signed area| of `polygon`
    pub area: f32,
    /// Ear-clipped triangles of `polygon`, only for the triangulated proxy
    pub triangles: Vec<[Vec2; 3]>,
    /// Full outline for drawing
    pub outline: BezPath,
    pub path_data: Arc<str>,
}

impl PreparedShape {
    /// Collision parts relative to the centroid, scaled by `scale`.
    ///
    /// Always returns a fresh copy, the prepared polygon is never mutated.
    pub fn local_parts(&self, proxy: PhysicsProxy, scale: f32) -> Vec<Vec<Vec2>> {
        let to_local = |p: &Vec2| (*p - self.centroid) * scale;
        match proxy {
            PhysicsProxy::Triangulated if !self.triangles.is_empty() => self
                .triangles
                .iter()
                .map(|t| t.iter().map(to_local).collect())
                .collect(),
            _ => {
                let ring = super::polygon::open_ring(&self.polygon);
                vec![ring.iter().map(to_local).collect()]
            }
        }
    }
}

/// Closed, simplified polygon for every sub-path of an outline.
pub fn sub_path_polygons(
    outline: &BezPath,
    cfg: &GeometryConfig,
) -> Vec<Vec<Vec2>> {
    split_sub_paths(outline)
        .iter()
        .map(|sub| {
            let mut pts = sample_sub_path(sub, cfg.sample_density);
            if cfg.simplify_tolerance > 0.0 && pts.len() > 4 {
                pts = simplify_polyline(&pts, cfg.simplify_tolerance);
            }
            ensure_closed(pts)
        })
        .collect()
}

/// Index of the polygon with the largest |area|; ties keep the earliest.
pub fn select_largest(polygons: &[Vec<Vec2>]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, poly) in polygons.iter().enumerate() {
        let area = signed_area(poly).abs();
        if best.map_or(true, |(_, a)| area > a) {
            best = Some((i, area));
        }
    }
    best.map(|(i, _)| i)
}

pub fn prepare_outline(
    id: &str,
    path_data: &str,
    cfg: &GeometryConfig,
) -> Result<PreparedShape, GeometryError> {
    let outline = parse_outline(path_data)?;
    let mut polygons = sub_path_polygons(&outline, cfg);
    let best = select_largest(&polygons).ok_or(GeometryError::EmptyOutline)?;
    let selected = polygons.swap_remove(best);

    let polygon = if cfg.proxy == PhysicsProxy::ConvexHull && selected.len() > 3 {
        convex_hull(&selected)
    } else {
        selected
    };

    let area = signed_area(&polygon).abs();
    let points = distinct_vertex_count(&polygon);
    if points < 3 || !(area > MIN_PROXY_AREA) {
        return Err(GeometryError::Degenerate { points, area });
    }

    let triangles = match cfg.proxy {
        PhysicsProxy::Triangulated => triangulate(&polygon),
        PhysicsProxy::ConvexHull => Vec::new(),
    };

    Ok(PreparedShape {
        id: Arc::from(id),
        centroid: centroid(&polygon),
        polygon,
        area,
        triangles,
        outline,
        path_data: Arc::from(path_data),
    })
}
