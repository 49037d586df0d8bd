//! Polygon helpers: closure, shoelace area, centroid, hull, triangulation.

use earcutr::earcut;

use crate::core::Vec2;

/// Squared distance under which first and last point count as the same
pub const CLOSURE_EPS_SQ: f32 = 1e-6;

/// Append a copy of the first point when the ring is not already closed.
pub fn ensure_closed(mut points: Vec<Vec2>) -> Vec<Vec2> {
    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first.distance_squared(last) > CLOSURE_EPS_SQ {
            points.push(first);
        }
    }
    points
}

pub fn is_closed(points: &[Vec2]) -> bool {
    match (points.first(), points.last()) {
        (Some(a), Some(b)) => a.distance_squared(*b) <= CLOSURE_EPS_SQ,
        _ => false,
    }
}

/// Ring without its closing duplicate
pub fn open_ring(points: &[Vec2]) -> &[Vec2] {
    if points.len() > 1 && is_closed(points) {
        &points[..points.len() - 1]
    } else {
        points
    }
}

/// Shoelace formula. Works on open or closed rings.
pub fn signed_area(points: &[Vec2]) -> f32 {
    let ring = open_ring(points);
    if ring.len() < 3 {
        return 0.0;
    }
    let mut area = 0.0f64;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[j], ring[i]);
        area += f64::from(a.x) * f64::from(b.y) - f64::from(b.x) * f64::from(a.y);
        j = i;
    }
    (0.5 * area) as f32
}

/// Area-weighted centroid; falls back to the vertex mean for zero-area rings.
pub fn centroid(points: &[Vec2]) -> Vec2 {
    let ring = open_ring(points);
    if ring.is_empty() {
        return Vec2::zero();
    }
    let mut cx = 0.0f64;
    let mut cy = 0.0f64;
    let mut twice_area = 0.0f64;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[j], ring[i]);
        let cross = f64::from(a.x) * f64::from(b.y) - f64::from(b.x) * f64::from(a.y);
        twice_area += cross;
        cx += (f64::from(a.x) + f64::from(b.x)) * cross;
        cy += (f64::from(a.y) + f64::from(b.y)) * cross;
        j = i;
    }
    if twice_area.abs() < 1e-9 {
        let sum = ring.iter().fold(Vec2::zero(), |acc, p| acc + *p);
        return sum / ring.len() as f32;
    }
    let k = 1.0 / (3.0 * twice_area);
    Vec2::new((cx * k) as f32, (cy * k) as f32)
}

/// Convex hull (monotone chain), returned closed.
pub fn convex_hull(points: &[Vec2]) -> Vec<Vec2> {
    let mut pts: Vec<Vec2> = open_ring(points).to_vec();
    if pts.len() <= 3 {
        return ensure_closed(pts);
    }
    pts.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
    });
    let cross = |o: Vec2, a: Vec2, b: Vec2| (a - o).cross(b - o);

    let mut lower: Vec<Vec2> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<Vec2> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    ensure_closed(lower)
}

/// Ear-clip a simple polygon into triangles.
pub fn triangulate(points: &[Vec2]) -> Vec<[Vec2; 3]> {
    let ring = open_ring(points);
    if ring.len() < 3 {
        return Vec::new();
    }
    let flat: Vec<f64> = ring
        .iter()
        .flat_map(|p| [f64::from(p.x), f64::from(p.y)])
        .collect();
    let idx = earcut(&flat, &[], 2).unwrap_or_default();
    idx.chunks_exact(3)
        .filter(|t| t.iter().all(|&i| i < ring.len()))
        .map(|t| [ring[t[0]], ring[t[1]], ring[t[2]]])
        .filter(|t| (t[1] - t[0]).cross(t[2] - t[0]).abs() > 1e-6)
        .collect()
}

/// Number of distinct vertices, ignoring the closing duplicate
pub fn distinct_vertex_count(points: &[Vec2]) -> usize {
    let ring = open_ring(points);
    let mut count = 0;
    for (i, p) in ring.iter().enumerate() {
        if ring[..i].iter().all(|q| q.distance_squared(*p) > CLOSURE_EPS_SQ) {
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f32, y: f32, s: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(x, y),
            Vec2::new(x + s, y),
            Vec2::new(x + s, y + s),
            Vec2::new(x, y + s),
        ]
    }

    #[test]
    fn closure_appends_first_point_once() {
        let closed = ensure_closed(square(0.0, 0.0, 10.0));
        assert_eq!(closed.len(), 5);
        assert!(is_closed(&closed));
        assert_eq!(ensure_closed(closed.clone()), closed);
    }

    #[test]
    fn area_sign_follows_winding() {
        let sq = square(0.0, 0.0, 10.0);
        let a = signed_area(&sq);
        let mut rev = sq.clone();
        rev.reverse();
        assert!((a.abs() - 100.0).abs() < 1e-4);
        assert!((signed_area(&rev) + a).abs() < 1e-4);
        assert!((signed_area(&ensure_closed(sq)) - a).abs() < 1e-4);
    }

    #[test]
    fn centroid_of_square() {
        let c = centroid(&ensure_closed(square(10.0, 20.0, 40.0)));
        assert!((c.x - 30.0).abs() < 1e-4);
        assert!((c.y - 40.0).abs() < 1e-4);
    }

    #[test]
    fn centroid_is_area_weighted() {
        // L-shape: 2x1 block plus 1x1 block on top of its left half
        let l = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let c = centroid(&l);
        assert!((c.x - 5.0 / 6.0).abs() < 1e-5);
        assert!((c.y - 5.0 / 6.0).abs() < 1e-5);
    }

    #[test]
    fn hull_drops_concave_vertex() {
        let mut pts = square(0.0, 0.0, 10.0);
        pts.insert(2, Vec2::new(5.0, 5.0));
        let hull = convex_hull(&pts);
        assert!(is_closed(&hull));
        assert_eq!(distinct_vertex_count(&hull), 4);
        assert!(!hull.contains(&Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn triangulation_covers_area() {
        let l = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let tris = triangulate(&l);
        let total: f32 = tris.iter().map(|t| signed_area(t).abs()).sum();
        assert!((total - 3.0).abs() < 1e-4);
    }
}
