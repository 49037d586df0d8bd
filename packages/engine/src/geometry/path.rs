//! Outline parsing, sub-path splitting and sampling.

use kurbo::{BezPath, CubicBez, Line, ParamCurve, ParamCurveArclen, PathEl, Point, QuadBez};

use crate::core::{GeometryError, Vec2};

const ARCLEN_ACCURACY: f64 = 1e-3;

pub fn parse_outline(path_data: &str) -> Result<BezPath, GeometryError> {
    BezPath::from_svg(path_data).map_err(|e| GeometryError::InvalidPath(e.to_string()))
}

/// Split an outline into disjoint sub-paths.
///
/// A new sub-path starts only where a move follows a close. A move in the
/// middle of an open run stays in the current sub-path and acts as a jump.
pub fn split_sub_paths(outline: &BezPath) -> Vec<BezPath> {
    let mut out = Vec::new();
    let mut current = BezPath::new();
    let mut closed = false;

    for el in outline.elements() {
        if let PathEl::MoveTo(_) = el {
            if closed && !current.elements().is_empty() {
                out.push(std::mem::take(&mut current));
            }
        }
        closed = matches!(el, PathEl::ClosePath);
        current.push(*el);
    }
    if has_segments(&current) {
        out.push(current);
    }
    out.retain(has_segments);
    out
}

fn has_segments(path: &BezPath) -> bool {
    path.elements()
        .iter()
        .any(|el| !matches!(el, PathEl::MoveTo(_) | PathEl::ClosePath))
}

/// Sample a sub-path into points roughly `density` apart along its length.
///
/// Segment endpoints are always emitted so corners survive sampling.
pub fn sample_sub_path(path: &BezPath, density: f32) -> Vec<Vec2> {
    let density = f64::from(density.max(0.5));
    let mut out: Vec<Vec2> = Vec::new();
    let mut start = Point::ZERO;
    let mut current = Point::ZERO;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                start = p;
                current = p;
                push_point(&mut out, p);
            }
            PathEl::LineTo(p) => {
                sample_curve(&Line::new(current, p), density, &mut out);
                current = p;
            }
            PathEl::QuadTo(c, p) => {
                sample_curve(&QuadBez::new(current, c, p), density, &mut out);
                current = p;
            }
            PathEl::CurveTo(c1, c2, p) => {
                sample_curve(&CubicBez::new(current, c1, c2, p), density, &mut out);
                current = p;
            }
            PathEl::ClosePath => {
                if current != start {
                    sample_curve(&Line::new(current, start), density, &mut out);
                }
                current = start;
            }
        }
    }
    out
}

fn sample_curve<C: ParamCurve + ParamCurveArclen>(curve: &C, density: f64, out: &mut Vec<Vec2>) {
    let len = curve.arclen(ARCLEN_ACCURACY);
    let n = (len / density).ceil().max(1.0) as usize;
    for i in 1..n {
        let t = curve.inv_arclen(len * i as f64 / n as f64, ARCLEN_ACCURACY);
        push_point(out, curve.eval(t));
    }
    push_point(out, curve.end());
}

fn push_point(out: &mut Vec<Vec2>, p: Point) {
    let v = Vec2::from(p);
    if out.last().map_or(true, |last| last.distance_squared(v) > 1e-12) {
        out.push(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_after_close_starts_new_sub_path() {
        let outline = parse_outline("M0 0 L10 0 L10 10 Z M20 20 L30 20 L30 30 Z").unwrap();
        assert_eq!(split_sub_paths(&outline).len(), 2);
    }

    #[test]
    fn move_without_close_stays_in_same_sub_path() {
        let outline = parse_outline("M0 0 L10 0 L10 10 M20 20 L30 20 L30 30 Z").unwrap();
        assert_eq!(split_sub_paths(&outline).len(), 1);
    }

    #[test]
    fn empty_outline_has_no_sub_paths() {
        let outline = parse_outline("").unwrap();
        assert!(split_sub_paths(&outline).is_empty());
    }

    #[test]
    fn sampling_keeps_corners_and_spacing() {
        let outline = parse_outline("M0 0 L100 0 L100 100 L0 100 Z").unwrap();
        let pts = sample_sub_path(&outline, 10.0);
        for corner in [Vec2::new(100.0, 0.0), Vec2::new(100.0, 100.0), Vec2::new(0.0, 100.0)] {
            assert!(pts.iter().any(|p| p.distance_squared(corner) < 1e-6));
        }
        for w in pts.windows(2) {
            assert!(w[0].distance_squared(w[1]).sqrt() <= 10.0 + 1e-3);
        }
    }

    #[test]
    fn curves_are_sampled_densely() {
        let outline = parse_outline("M0 0 C0 100 100 100 100 0").unwrap();
        let pts = sample_sub_path(&outline, 5.0);
        assert!(pts.len() > 20);
        assert!(pts.last().unwrap().distance_squared(Vec2::new(100.0, 0.0)) < 1e-6);
    }
}
