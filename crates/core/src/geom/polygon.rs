//! Pure polygon operations.
//!
//! Every function here is total: degenerate input (fewer than three
//! vertices, zero-length edges, consecutive duplicates) yields zero
//! measures or an unchanged copy, never a panic or an error. Callers treat
//! degenerate geometry as a data-quality condition, not a crash condition.

use crate::geometry::{Point, Polygon};

/// Signed area via the shoelace formula.
///
/// Positive for counter-clockwise winding in a y-up frame (negative in the
/// raster frame, where y grows downward). Fewer than three vertices yield 0.
pub fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }
    area / 2.0
}

/// Boundary length including the closing edge from the last vertex back to
/// the first. Fewer than two vertices yield 0.
pub fn perimeter(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }

    (0..n)
        .map(|i| points[i].distance(points[(i + 1) % n]))
        .sum()
}

/// Point-in-polygon test by ray casting.
///
/// Boundary behavior is half-open as usual for ray casting; callers that
/// need to admit touching placements rely on that. Degenerate polygons
/// contain nothing.
pub fn contains_point(points: &[Point], p: Point) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = points[i];
        let pj = points[j];

        if ((pi.y > p.y) != (pj.y > p.y))
            && (p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Minimum distance from `p` to the polygon boundary, including the
/// closing edge. Empty input yields infinity; a single vertex yields the
/// distance to it.
///
/// Combined with [`contains_point`], this turns the half-open ray-cast
/// into closed ("on or inside") or open ("strictly inside") containment.
pub fn boundary_distance(points: &[Point], p: Point) -> f64 {
    let n = points.len();
    match n {
        0 => f64::INFINITY,
        1 => p.distance(points[0]),
        _ => (0..n)
            .map(|i| segment_distance(p, points[i], points[(i + 1) % n]))
            .fold(f64::INFINITY, f64::min),
    }
}

fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// A copy translated by `(dx, dy)`.
pub fn translate(points: &[Point], dx: f64, dy: f64) -> Polygon {
    points
        .iter()
        .map(|p| Point::new(p.x + dx, p.y + dy))
        .collect()
}

/// A copy rotated about the origin by `radians`.
pub fn rotate(points: &[Point], radians: f64) -> Polygon {
    if radians.abs() < 1e-12 {
        return points.to_vec();
    }

    let cos_a = radians.cos();
    let sin_a = radians.sin();
    points
        .iter()
        .map(|p| Point::new(p.x * cos_a - p.y * sin_a, p.x * sin_a + p.y * cos_a))
        .collect()
}

/// A copy uniformly scaled about the origin.
pub fn scale(points: &[Point], factor: f64) -> Polygon {
    points
        .iter()
        .map(|p| Point::new(p.x * factor, p.y * factor))
        .collect()
}

/// A copy with consecutive duplicate vertices removed, including a trailing
/// vertex that repeats the first.
pub fn dedupe(points: &[Point]) -> Polygon {
    let mut out: Polygon = Vec::with_capacity(points.len());
    for &p in points {
        if out.last().is_some_and(|&last| coincident(last, p)) {
            continue;
        }
        out.push(p);
    }

    while out.len() > 1 && coincident(out[0], out[out.len() - 1]) {
        out.pop();
    }
    out
}

/// True if the polygon's winding is convex throughout. Collinear runs are
/// tolerated; fewer than three vertices are not convex.
pub fn is_convex(points: &[Point]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }

    let mut sign = 0i32;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];

        let cross = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
        if cross.abs() > 1e-10 {
            let current = if cross > 0.0 { 1 } else { -1 };
            if sign == 0 {
                sign = current;
            } else if sign != current {
                return false;
            }
        }
    }
    true
}

/// A copy with counter-clockwise winding (positive signed area).
pub fn ensure_ccw(points: &[Point]) -> Polygon {
    if signed_area(points) < 0.0 {
        points.iter().rev().copied().collect()
    } else {
        points.to_vec()
    }
}

fn coincident(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Polygon {
        vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ]
    }

    #[test]
    fn test_signed_area_winding() {
        let ccw = square(10.0);
        assert_relative_eq!(signed_area(&ccw), 100.0, epsilon = 1e-9);

        let cw: Polygon = ccw.into_iter().rev().collect();
        assert_relative_eq!(signed_area(&cw), -100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_signed_area_degenerate() {
        assert_relative_eq!(signed_area(&[]), 0.0);
        assert_relative_eq!(
            signed_area(&[Point::new(0.0, 0.0), Point::new(5.0, 5.0)]),
            0.0
        );
    }

    #[test]
    fn test_perimeter_triangle() {
        let tri = vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 4.0),
        ];
        assert_relative_eq!(perimeter(&tri), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_perimeter_zero_length_edges() {
        let mut poly = square(10.0);
        poly.push(Point::new(0.0, 10.0));
        assert_relative_eq!(perimeter(&poly), 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_contains_point() {
        let poly = square(10.0);
        assert!(contains_point(&poly, Point::new(5.0, 5.0)));
        assert!(!contains_point(&poly, Point::new(15.0, 5.0)));
        assert!(!contains_point(&poly, Point::new(-1.0, 5.0)));
    }

    #[test]
    fn test_contains_point_concave() {
        // L-shape with the notch at the top right
        let l = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(5.0, 5.0),
            Point::new(5.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(contains_point(&l, Point::new(2.0, 8.0)));
        assert!(!contains_point(&l, Point::new(8.0, 8.0)));
    }

    #[test]
    fn test_boundary_distance() {
        let poly = square(10.0);
        assert_relative_eq!(
            boundary_distance(&poly, Point::new(5.0, 5.0)),
            5.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            boundary_distance(&poly, Point::new(10.0, 5.0)),
            0.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            boundary_distance(&poly, Point::new(13.0, 14.0)),
            5.0,
            epsilon = 1e-9
        );
        assert!(boundary_distance(&[], Point::new(0.0, 0.0)).is_infinite());
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let rotated = rotate(&[Point::new(1.0, 0.0)], std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(rotated[0].x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(rotated[0].y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_dedupe_consecutive_and_closing() {
        let poly = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(0.0, 0.0),
        ];
        let cleaned = dedupe(&poly);
        assert_eq!(cleaned.len(), 4);
    }

    #[test]
    fn test_is_convex() {
        assert!(is_convex(&square(10.0)));

        let l = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(5.0, 5.0),
            Point::new(5.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(!is_convex(&l));
    }

    #[test]
    fn test_ensure_ccw() {
        let cw: Polygon = square(10.0).into_iter().rev().collect();
        let ccw = ensure_ccw(&cw);
        assert!(signed_area(&ccw) > 0.0);
    }
}
