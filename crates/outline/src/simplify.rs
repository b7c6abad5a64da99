//! Polygon simplification (Ramer-Douglas-Peucker).

use stickernest_core::geom::polygon;
use stickernest_core::{Error, Point, Polygon, Result};

/// Reduces a dense vertex sequence to a minimal set within `epsilon`.
///
/// Classic recursive RDP: the interior point farthest from the anchor
/// segment splits the sequence when its perpendicular distance exceeds
/// `epsilon`; otherwise the whole subsequence collapses to its endpoints.
/// Sequences shorter than three points are returned unchanged. The result
/// is deterministic, and a larger `epsilon` never yields more vertices.
pub fn simplify(points: &[Point], epsilon: f64) -> Polygon {
    if points.len() < 3 {
        return points.to_vec();
    }
    rdp(points, epsilon)
}

fn rdp(points: &[Point], epsilon: f64) -> Polygon {
    let end = points.len() - 1;

    let mut dmax = 0.0;
    let mut index = 0;
    for i in 1..end {
        let d = perpendicular_distance(points[i], points[0], points[end]);
        if d > dmax {
            dmax = d;
            index = i;
        }
    }

    if dmax > epsilon {
        let mut left = rdp(&points[..=index], epsilon);
        let right = rdp(&points[index..], epsilon);
        // The split point closes the left half and opens the right one.
        left.pop();
        left.extend(right);
        left
    } else {
        vec![points[0], points[end]]
    }
}

/// Perpendicular distance from `p` to the segment `a`-`b`, falling back to
/// the point distance when the segment is degenerate.
fn perpendicular_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;

    if dx == 0.0 && dy == 0.0 {
        return p.distance(a);
    }

    let numerator = (dy * p.x - dx * p.y + b.x * a.y - b.y * a.x).abs();
    numerator / (dx * dx + dy * dy).sqrt()
}

/// Final outline cleanup: removes consecutive duplicates (including a
/// closing vertex that repeats the first) and rejects outlines that no
/// longer form a polygon.
///
/// Returns [`Error::UnusableOutline`] when fewer than three vertices
/// survive; the caller should restore its previous state rather than
/// proceed with a broken cutline.
pub fn clean_outline(points: &[Point]) -> Result<Polygon> {
    let cleaned = polygon::dedupe(points);
    if cleaned.len() < 3 {
        return Err(Error::UnusableOutline(cleaned.len()));
    }
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Dense square outline with collinear midpoints on every edge.
    fn dense_square(size: f64, per_edge: usize) -> Polygon {
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
            Point::new(0.0, 0.0),
        ];

        let mut out = Vec::new();
        for pair in corners.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            for i in 0..per_edge {
                let t = i as f64 / per_edge as f64;
                out.push(Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t));
            }
        }
        out.push(corners[4]);
        out
    }

    /// Distance from a point to the nearest segment of a polyline.
    fn distance_to_polyline(p: Point, line: &[Point]) -> f64 {
        line.windows(2)
            .map(|seg| {
                let (a, b) = (seg[0], seg[1]);
                let dx = b.x - a.x;
                let dy = b.y - a.y;
                let len_sq = dx * dx + dy * dy;
                if len_sq == 0.0 {
                    return p.distance(a);
                }
                let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
                p.distance(Point::new(a.x + t * dx, a.y + t * dy))
            })
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn test_collinear_points_collapse() {
        let dense = dense_square(100.0, 10);
        let simplified = simplify(&dense, 0.5);
        // Four corners plus the repeated closing vertex.
        assert_eq!(simplified.len(), 5);
        assert_relative_eq!(simplified[0].x, 0.0);
        assert_relative_eq!(simplified[1].x, 100.0);
    }

    #[test]
    fn test_short_sequences_unchanged() {
        let two = vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)];
        assert_eq!(simplify(&two, 1.0), two);
        assert!(simplify(&[], 1.0).is_empty());
    }

    #[test]
    fn test_tolerance_bound_holds() {
        // Noisy sine-ish outline.
        let noisy: Polygon = (0..200)
            .map(|i| {
                let x = i as f64;
                Point::new(x, 10.0 * (x / 15.0).sin() + if i % 3 == 0 { 0.8 } else { -0.4 })
            })
            .collect();

        let epsilon = 2.0;
        let simplified = simplify(&noisy, epsilon);
        assert!(simplified.len() < noisy.len());

        for p in &noisy {
            let d = distance_to_polyline(*p, &simplified);
            assert!(d <= epsilon + 1e-9, "point {:?} drifted {:.3}", p, d);
        }
    }

    #[test]
    fn test_vertex_count_monotone_in_epsilon() {
        let dense = dense_square(100.0, 25);
        let mut previous = usize::MAX;
        for epsilon in [0.1, 0.5, 1.0, 5.0, 20.0] {
            let count = simplify(&dense, epsilon).len();
            assert!(count <= previous);
            previous = count;
        }
    }

    #[test]
    fn test_degenerate_anchor_falls_back_to_point_distance() {
        // First and last point coincide, so the anchor segment is a point.
        let loop_back = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 0.0),
        ];
        let simplified = simplify(&loop_back, 1.0);
        assert_eq!(simplified.len(), 3);

        let collapsed = simplify(&loop_back, 20.0);
        assert_eq!(collapsed.len(), 2);
    }

    #[test]
    fn test_clean_outline_rejects_collapsed() {
        let collapsed = vec![
            Point::new(1.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 1.0),
        ];
        assert!(matches!(
            clean_outline(&collapsed),
            Err(Error::UnusableOutline(1))
        ));
    }

    #[test]
    fn test_clean_outline_strips_closing_duplicate() {
        let mut square = dense_square(10.0, 1);
        assert_eq!(square.len(), 5);
        square.insert(2, square[2]);

        let cleaned = clean_outline(&square).unwrap();
        assert_eq!(cleaned.len(), 4);
    }
}
