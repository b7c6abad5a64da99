//! Core geometry value types.

use crate::geom::polygon;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 2D point in pixel (or device) units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// An ordered vertex sequence, implicitly closed (the last point connects
/// back to the first). Producers are not required to remove consecutive
/// duplicates and winding direction is not normalized; consumers that need
/// a winding compute the signed area.
pub type Polygon = Vec<Point>;

/// Axis-aligned bounding box of a polygon set.
///
/// `width == right - left` and `height == bottom - top` always hold. A set
/// with zero width or height is degenerate: valid to carry around, but
/// rejected by pricing and nesting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Creates bounds from edge coordinates, deriving width and height.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            width: (right - left).max(0.0),
            height: (bottom - top).max(0.0),
        }
    }

    /// Bounds of a vertex slice. Empty input yields zero bounds.
    pub fn of(points: &[Point]) -> Self {
        if points.is_empty() {
            return Self::default();
        }

        let mut left = f64::INFINITY;
        let mut top = f64::INFINITY;
        let mut right = f64::NEG_INFINITY;
        let mut bottom = f64::NEG_INFINITY;

        for p in points {
            left = left.min(p.x);
            top = top.min(p.y);
            right = right.max(p.x);
            bottom = bottom.max(p.y);
        }

        Self::new(left, top, right, bottom)
    }

    /// The smallest bounds enclosing both inputs. Both operands are taken
    /// literally; a zero-size bounds still contributes its position.
    pub fn union(&self, other: &Bounds) -> Self {
        Self::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// True if the box has no usable extent.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Bounding-box area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// A set of polygons belonging to one design.
///
/// May represent disjoint shapes or a shape with holes; by the convention of
/// the boolean-offset backend, holes carry the opposite winding of their
/// enclosing ring.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolygonSet {
    polygons: Vec<Polygon>,
}

impl PolygonSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from existing polygons.
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    /// Creates a set containing a single polygon.
    pub fn from_polygon(polygon: Polygon) -> Self {
        Self {
            polygons: vec![polygon],
        }
    }

    /// An axis-aligned rectangle with its top-left corner at `(x, y)`.
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_polygon(vec![
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ])
    }

    /// Appends a polygon to the set.
    pub fn push(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    /// The polygons in the set.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Consumes the set, returning its polygons.
    pub fn into_polygons(self) -> Vec<Polygon> {
        self.polygons
    }

    /// Number of polygons in the set.
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// True if the set holds no polygons.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Iterates over the polygons.
    pub fn iter(&self) -> std::slice::Iter<'_, Polygon> {
        self.polygons.iter()
    }

    /// Bounding box of every vertex in the set. Zero bounds when empty.
    pub fn bounds(&self) -> Bounds {
        let mut left = f64::INFINITY;
        let mut top = f64::INFINITY;
        let mut right = f64::NEG_INFINITY;
        let mut bottom = f64::NEG_INFINITY;
        let mut seen = false;

        for p in self.polygons.iter().flatten() {
            left = left.min(p.x);
            top = top.min(p.y);
            right = right.max(p.x);
            bottom = bottom.max(p.y);
            seen = true;
        }

        if !seen {
            return Bounds::default();
        }
        Bounds::new(left, top, right, bottom)
    }

    /// Total boundary length: the sum over every polygon of the distance
    /// between consecutive vertices, including the closing edge.
    pub fn perimeter(&self) -> f64 {
        self.polygons.iter().map(|p| polygon::perimeter(p)).sum()
    }

    /// Net enclosed area: the absolute value of the summed signed areas, so
    /// oppositely wound holes subtract from their enclosing rings.
    pub fn net_area(&self) -> f64 {
        self.polygons
            .iter()
            .map(|p| polygon::signed_area(p))
            .sum::<f64>()
            .abs()
    }

    /// True if no polygon in the set has at least three vertices.
    pub fn is_degenerate(&self) -> bool {
        self.polygons.iter().all(|p| p.len() < 3)
    }

    /// A copy translated by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            polygons: self
                .polygons
                .iter()
                .map(|p| polygon::translate(p, dx, dy))
                .collect(),
        }
    }

    /// A copy rotated about the origin by `radians`.
    pub fn rotated(&self, radians: f64) -> Self {
        Self {
            polygons: self
                .polygons
                .iter()
                .map(|p| polygon::rotate(p, radians))
                .collect(),
        }
    }

    /// A copy uniformly scaled about the origin.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            polygons: self
                .polygons
                .iter()
                .map(|p| polygon::scale(p, factor))
                .collect(),
        }
    }
}

impl From<Vec<Polygon>> for PolygonSet {
    fn from(polygons: Vec<Polygon>) -> Self {
        Self::from_polygons(polygons)
    }
}

impl<'a> IntoIterator for &'a PolygonSet {
    type Item = &'a Polygon;
    type IntoIter = std::slice::Iter<'a, Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.iter()
    }
}
