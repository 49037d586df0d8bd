//! Douglas-Peucker polyline reduction

use crate::core::Vec2;

/// Squared distance from `p` to segment `a`-`b`
pub fn sq_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let d = b - a;
    let mut closest = a;
    let len2 = d.length_squared();
    if len2 > 0.0 {
        let t = (p - a).dot(d) / len2;
        if t > 1.0 {
            closest = b;
        } else if t > 0.0 {
            closest = a + d * t;
        }
    }
    p.distance_squared(closest)
}

/// Drop every point that lies within `tolerance` of the chord between its
/// retained neighbours. Both endpoints are always kept.
pub fn simplify_polyline(points: &[Vec2], tolerance: f32) -> Vec<Vec2> {
    if points.len() <= 2 || !(tolerance > 0.0) {
        return points.to_vec();
    }
    let sq_tol = tolerance * tolerance;
    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut stack = vec![(0usize, last)];
    while let Some((first, end)) = stack.pop() {
        let mut max = sq_tol;
        let mut index = None;
        for i in first + 1..end {
            let d = sq_segment_distance(points[i], points[first], points[end]);
            if d > max {
                max = d;
                index = Some(i);
            }
        }
        if let Some(i) = index {
            keep[i] = true;
            stack.push((first, i));
            stack.push((i, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}
