//! Sheet definition and printable-region construction.

use stickernest_core::geom::polygon;
use stickernest_core::{Bounds, Error, Point, PolygonSet, Result};
use stickernest_outline::offset::{difference, pieces_to_set, Piece};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-side margins of a sheet, in the same units as its dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    /// The same margin on all four sides.
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// A rectangular region of the sheet excluded from placement
/// (registration marks, damaged substrate).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeepOut {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A print sheet: outer dimensions, margins, and keep-out zones.
///
/// The sheet itself is only a description; [`Sheet::printable_region`]
/// runs the boolean subtraction that nesting actually places into. A
/// fresh region is built per nesting run and never mutated afterward.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sheet {
    width: f64,
    height: f64,
    margins: Margins,
    keep_outs: Vec<KeepOut>,
}

impl Sheet {
    /// Creates a sheet with no margins or keep-outs.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margins: Margins::default(),
            keep_outs: Vec::new(),
        }
    }

    /// Sets per-side margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Sets the same margin on every side.
    pub fn with_uniform_margin(self, value: f64) -> Self {
        self.with_margins(Margins::uniform(value))
    }

    /// Adds a keep-out rectangle.
    pub fn with_keep_out(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.keep_outs.push(KeepOut {
            x,
            y,
            width,
            height,
        });
        self
    }

    /// Sheet width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Sheet height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// The configured keep-out rectangles.
    pub fn keep_outs(&self) -> &[KeepOut] {
        &self.keep_outs
    }

    /// Builds the printable region: the sheet rectangle minus the union of
    /// margin strips and keep-outs.
    ///
    /// Keep-outs that sever the sheet leave several disjoint pieces; a
    /// sheet whose subtractions swallow it entirely is rejected with
    /// [`Error::InvalidSheet`].
    pub fn printable_region(&self) -> Result<PrintableRegion> {
        if !(self.width > 0.0) || !(self.height > 0.0) {
            return Err(Error::InvalidSheet(format!(
                "sheet dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        let m = &self.margins;
        if m.top < 0.0 || m.right < 0.0 || m.bottom < 0.0 || m.left < 0.0 {
            return Err(Error::InvalidSheet("margins must be non-negative".into()));
        }

        let subject = PolygonSet::rectangle(0.0, 0.0, self.width, self.height);

        let mut clips = PolygonSet::new();
        let mut add_strip = |x: f64, y: f64, w: f64, h: f64| {
            if w > 0.0 && h > 0.0 {
                clips.push(
                    PolygonSet::rectangle(x, y, w, h)
                        .into_polygons()
                        .remove(0),
                );
            }
        };

        add_strip(0.0, 0.0, self.width, m.top);
        add_strip(0.0, self.height - m.bottom, self.width, m.bottom);
        add_strip(0.0, 0.0, m.left, self.height);
        add_strip(self.width - m.right, 0.0, m.right, self.height);
        for k in &self.keep_outs {
            add_strip(k.x, k.y, k.width, k.height);
        }

        let pieces = difference(&subject, &clips);
        if pieces.is_empty() {
            return Err(Error::InvalidSheet(
                "margins and keep-outs leave no printable area".into(),
            ));
        }

        Ok(PrintableRegion { pieces })
    }
}

/// The area placements may occupy: one or more disjoint pieces, each an
/// exterior ring with holes punched by interior keep-outs.
#[derive(Debug, Clone)]
pub struct PrintableRegion {
    pieces: Vec<Piece>,
}

impl PrintableRegion {
    /// The disjoint pieces of the region.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Bounding box over every piece.
    pub fn bounds(&self) -> Bounds {
        self.as_polygon_set().bounds()
    }

    /// Usable area: piece exteriors minus their holes.
    pub fn area(&self) -> f64 {
        self.pieces
            .iter()
            .map(|piece| {
                let outer = polygon::signed_area(&piece.exterior).abs();
                let holes: f64 = piece
                    .holes
                    .iter()
                    .map(|h| polygon::signed_area(h).abs())
                    .sum();
                (outer - holes).max(0.0)
            })
            .sum()
    }

    /// True if the point lies inside some piece and outside its holes.
    /// Boundary contact counts as inside; a placement flush against the
    /// sheet edge or a keep-out is still printable.
    pub fn contains(&self, p: Point) -> bool {
        self.piece_containing(p).is_some()
    }

    /// Index of the piece containing the point, if any.
    fn piece_containing(&self, p: Point) -> Option<usize> {
        self.pieces.iter().position(|piece| {
            on_or_inside(&piece.exterior, p)
                && !piece.holes.iter().any(|h| strictly_inside(h, p))
        })
    }

    /// True if the whole polygon set sits inside one piece of the region.
    ///
    /// Every vertex and edge midpoint of the set must fall in the same
    /// piece, and no hole or exterior corner of that piece may poke into
    /// the set. Vertex sampling, not exact edge clipping; the sample
    /// density matches the boolean backend's snapped grid well enough for
    /// placement work.
    pub fn admits(&self, set: &PolygonSet) -> bool {
        let mut first = None;
        for poly in set {
            if let Some(p) = poly.first() {
                first = Some(*p);
                break;
            }
        }
        let Some(first) = first else {
            return false;
        };
        let Some(index) = self.piece_containing(first) else {
            return false;
        };
        let piece = &self.pieces[index];

        let inside_piece = |p: Point| {
            on_or_inside(&piece.exterior, p)
                && !piece.holes.iter().any(|h| strictly_inside(h, p))
        };

        for poly in set {
            let n = poly.len();
            for i in 0..n {
                let a = poly[i];
                let b = poly[(i + 1) % n];
                if !inside_piece(a) {
                    return false;
                }
                let mid = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
                if !inside_piece(mid) {
                    return false;
                }
            }
        }

        // A region corner strictly inside the set means an excluded zone
        // juts into the design; a corner merely touching it does not.
        let corners = piece.holes.iter().flatten().chain(piece.exterior.iter());
        for corner in corners {
            if set.iter().any(|poly| strictly_inside(poly, *corner)) {
                return false;
            }
        }

        // Holes need denser probes: a set can swallow a hole whole while
        // every hole corner lands exactly on the set's boundary. Edge
        // midpoints and the vertex mean catch that.
        for hole in &piece.holes {
            let n = hole.len();
            if n == 0 {
                continue;
            }
            let mut probes = Vec::with_capacity(n + 1);
            let mut mean = Point::new(0.0, 0.0);
            for i in 0..n {
                let a = hole[i];
                let b = hole[(i + 1) % n];
                probes.push(Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0));
                mean.x += a.x / n as f64;
                mean.y += a.y / n as f64;
            }
            probes.push(mean);

            for probe in probes {
                if set.iter().any(|poly| strictly_inside(poly, probe)) {
                    return false;
                }
            }
        }

        true
    }

    /// Flattens the region to a polygon set (exteriors and holes, winding
    /// preserved) for renderers.
    pub fn as_polygon_set(&self) -> PolygonSet {
        pieces_to_set(self.pieces.clone())
    }
}

/// Tolerance for boundary contact; the boolean backend snaps to a far
/// coarser grid than this.
const TOUCH_EPS: f64 = 1e-7;

fn on_or_inside(ring: &[Point], p: Point) -> bool {
    polygon::contains_point(ring, p) || polygon::boundary_distance(ring, p) <= TOUCH_EPS
}

fn strictly_inside(ring: &[Point], p: Point) -> bool {
    polygon::contains_point(ring, p) && polygon::boundary_distance(ring, p) > TOUCH_EPS
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plain_sheet_is_one_piece() {
        let region = Sheet::new(100.0, 50.0).printable_region().unwrap();
        assert_eq!(region.pieces().len(), 1);
        assert_relative_eq!(region.area(), 5000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_margins_shrink_region() {
        let region = Sheet::new(100.0, 100.0)
            .with_uniform_margin(10.0)
            .printable_region()
            .unwrap();

        assert_relative_eq!(region.area(), 6400.0, epsilon = 1e-6);
        let b = region.bounds();
        assert_relative_eq!(b.left, 10.0, epsilon = 1e-6);
        assert_relative_eq!(b.right, 90.0, epsilon = 1e-6);

        assert!(region.contains(Point::new(50.0, 50.0)));
        assert!(!region.contains(Point::new(5.0, 50.0)));
    }

    #[test]
    fn test_asymmetric_margins() {
        let region = Sheet::new(100.0, 100.0)
            .with_margins(Margins {
                top: 5.0,
                right: 20.0,
                bottom: 10.0,
                left: 0.0,
            })
            .printable_region()
            .unwrap();

        let b = region.bounds();
        assert_relative_eq!(b.left, 0.0, epsilon = 1e-6);
        assert_relative_eq!(b.top, 5.0, epsilon = 1e-6);
        assert_relative_eq!(b.right, 80.0, epsilon = 1e-6);
        assert_relative_eq!(b.bottom, 90.0, epsilon = 1e-6);
    }

    #[test]
    fn test_interior_keep_out_becomes_hole() {
        let region = Sheet::new(100.0, 100.0)
            .with_keep_out(40.0, 40.0, 20.0, 20.0)
            .printable_region()
            .unwrap();

        assert_eq!(region.pieces().len(), 1);
        assert_eq!(region.pieces()[0].holes.len(), 1);
        assert_relative_eq!(region.area(), 9600.0, epsilon = 1e-6);
        assert!(!region.contains(Point::new(50.0, 50.0)));
        assert!(region.contains(Point::new(20.0, 20.0)));
    }

    #[test]
    fn test_keep_out_can_split_sheet() {
        let region = Sheet::new(100.0, 100.0)
            .with_keep_out(45.0, 0.0, 10.0, 100.0)
            .printable_region()
            .unwrap();

        assert_eq!(region.pieces().len(), 2);
    }

    #[test]
    fn test_degenerate_sheets_rejected() {
        assert!(Sheet::new(0.0, 100.0).printable_region().is_err());
        assert!(Sheet::new(100.0, 100.0)
            .with_uniform_margin(60.0)
            .printable_region()
            .is_err());
        assert!(Sheet::new(100.0, 100.0)
            .with_keep_out(-10.0, -10.0, 200.0, 200.0)
            .printable_region()
            .is_err());
    }

    #[test]
    fn test_admits_respects_holes_and_edges() {
        let region = Sheet::new(100.0, 100.0)
            .with_keep_out(40.0, 40.0, 20.0, 20.0)
            .printable_region()
            .unwrap();

        let fits = PolygonSet::rectangle(5.0, 5.0, 30.0, 30.0);
        assert!(region.admits(&fits));

        let overlaps_hole = PolygonSet::rectangle(35.0, 35.0, 30.0, 30.0);
        assert!(!region.admits(&overlaps_hole));

        let outside = PolygonSet::rectangle(80.0, 80.0, 30.0, 30.0);
        assert!(!region.admits(&outside));
    }

    #[test]
    fn test_admits_rejects_swallowed_hole_with_aligned_edges() {
        let region = Sheet::new(100.0, 100.0)
            .with_keep_out(40.0, 40.0, 20.0, 20.0)
            .printable_region()
            .unwrap();

        // Covers the keep-out completely while every keep-out corner lies
        // exactly on the shape's boundary.
        let swallow = PolygonSet::rectangle(40.0, 20.0, 20.0, 60.0);
        assert!(!region.admits(&swallow));

        // Merely sharing an edge with the keep-out is fine.
        let flush = PolygonSet::rectangle(10.0, 40.0, 30.0, 20.0);
        assert!(region.admits(&flush));
    }
}
