//! Polygon offsetting and boolean differences.
//!
//! Grows or shrinks a polygon set by a fixed distance with rounded joins
//! (cutline generation), and subtracts clip shapes from a subject (sheet
//! region construction). All boolean work runs on coordinates scaled by
//! [`CLIPPER_SCALE`] and snapped to the integer grid, then scaled back,
//! which keeps the overlay numerically robust on arbitrary float input.
//!
//! Offsetting is a dilation/erosion by a disk: every boundary edge
//! contributes a parallel quad and every vertex a polygonal arc disk, and
//! the union (outward) or difference (inward) against the source region
//! resolves the joins. Output polygon count has no relation to input count;
//! offsetting merges loops that come within `2 * distance` of each other
//! and can split concave ones.

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;

use stickernest_core::geom::polygon;
use stickernest_core::{Point, Polygon, PolygonSet};

/// Fixed scale factor between input coordinates and the integer grid the
/// boolean backend works on.
pub const CLIPPER_SCALE: f64 = 100.0;

/// Vertices used to approximate a full circle at round joins.
const ROUND_JOIN_SEGMENTS: usize = 24;

type FloatPath = Vec<[f64; 2]>;
type FloatShapes = Vec<Vec<FloatPath>>;

/// One connected piece of a boolean result: an exterior ring plus any holes
/// punched through it. Holes carry the opposite winding of the exterior.
#[derive(Debug, Clone)]
pub struct Piece {
    pub exterior: Polygon,
    pub holes: Vec<Polygon>,
}

impl Piece {
    /// Flattens the piece into its rings, exterior first.
    pub fn into_polygons(self) -> Vec<Polygon> {
        let mut out = vec![self.exterior];
        out.extend(self.holes);
        out
    }
}

/// Flattens boolean pieces into a single polygon set, exterior rings and
/// holes interleaved, winding preserved.
pub fn pieces_to_set(pieces: Vec<Piece>) -> PolygonSet {
    let mut set = PolygonSet::new();
    for piece in pieces {
        for ring in piece.into_polygons() {
            set.push(ring);
        }
    }
    set
}

/// Offsets every polygon of the set by `distance` with rounded joins.
///
/// Positive distances grow the covered region (cutline generation), negative
/// distances shrink it. Every input polygon is treated as a solid outline:
/// overlapping or nearby loops merge, and a loop eroded below the offset
/// distance disappears. Zero distance returns the input unchanged.
pub fn offset_set(set: &PolygonSet, distance: f64) -> PolygonSet {
    if distance == 0.0 || set.is_empty() {
        return set.clone();
    }

    let solids: Vec<FloatPath> = set
        .iter()
        .map(|p| polygon::dedupe(p))
        .filter(|p| p.len() >= 3)
        .map(|p| to_scaled_path(&polygon::ensure_ccw(&p)))
        .collect();
    if solids.is_empty() {
        return PolygonSet::new();
    }

    let radius = distance.abs() * CLIPPER_SCALE;

    if distance > 0.0 {
        // Dilation: region ∪ boundary tube. The join disks circumscribe the
        // true arc radius so the grown region never undercuts it.
        let mut tube = Vec::new();
        for path in &solids {
            tube.extend(tube_paths(path, radius, true));
        }
        let shapes = solids.overlay(&tube, OverlayRule::Union, FillRule::NonZero);
        flatten_shapes(shapes)
    } else {
        // Erosion: normalize the region first so the tube follows actual
        // boundaries (including holes the union itself produces), then
        // subtract it. Join disks stay inscribed so erosion never overcuts.
        let region: FloatShapes = if solids.len() == 1 {
            vec![vec![solids[0].clone()]]
        } else {
            let (subj, clip) = solids.split_at(1);
            subj.to_vec()
                .overlay(&clip.to_vec(), OverlayRule::Union, FillRule::NonZero)
        };

        let mut region_paths: Vec<FloatPath> = Vec::new();
        let mut tube: Vec<FloatPath> = Vec::new();
        for shape in &region {
            for contour in shape {
                if contour.len() < 3 {
                    continue;
                }
                tube.extend(tube_paths(contour, radius, false));
                region_paths.push(contour.clone());
            }
        }
        if region_paths.is_empty() {
            return PolygonSet::new();
        }

        let shapes = region_paths.overlay(&tube, OverlayRule::Difference, FillRule::NonZero);
        let result = flatten_shapes(shapes);
        if result.is_empty() {
            log::debug!("offset by {distance} collapsed every polygon");
        }
        result
    }
}

/// Boolean difference: `subject` minus the union of `clips`.
///
/// Both sides may hold any number of rings; each ring is filled non-zero
/// with whatever winding it carries. The result is grouped into connected
/// pieces, possibly none (fully clipped) or several (clips that sever the
/// subject).
pub fn difference(subject: &PolygonSet, clips: &PolygonSet) -> Vec<Piece> {
    let subj: Vec<FloatPath> = subject
        .iter()
        .filter(|p| p.len() >= 3)
        .map(|p| to_scaled_path(p))
        .collect();
    if subj.is_empty() {
        return Vec::new();
    }

    let clip: Vec<FloatPath> = clips
        .iter()
        .filter(|p| p.len() >= 3)
        .map(|p| to_scaled_path(&polygon::ensure_ccw(p)))
        .collect();

    // Nothing to subtract: each subject ring is its own piece.
    if clip.is_empty() {
        return subj
            .iter()
            .map(|path| Piece {
                exterior: from_scaled_contour(path),
                holes: Vec::new(),
            })
            .collect();
    }

    let shapes = subj.overlay(&clip, OverlayRule::Difference, FillRule::NonZero);
    shapes_to_pieces(shapes)
}

/// Parallel quad per edge and arc disk per vertex, in scaled coordinates.
///
/// Together with the source region these cover the Minkowski disk sweep of
/// the boundary. `circumscribe` widens the disks to enclose the true arc
/// (used for dilation); otherwise they stay inscribed (used for erosion).
fn tube_paths(contour: &FloatPath, radius: f64, circumscribe: bool) -> Vec<FloatPath> {
    let n = contour.len();
    let mut out = Vec::with_capacity(n * 2);

    let disk_radius = if circumscribe {
        radius / (std::f64::consts::PI / ROUND_JOIN_SEGMENTS as f64).cos()
    } else {
        radius
    };

    for i in 0..n {
        let a = contour[i];
        let b = contour[(i + 1) % n];

        let dx = b[0] - a[0];
        let dy = b[1] - a[1];
        let len = (dx * dx + dy * dy).sqrt();
        if len > 1e-9 {
            // Quad of width 2r centered on the edge. Wound counter-clockwise
            // like the disks; mixed windings would cancel under non-zero
            // fill where quads and disks overlap.
            let nx = -dy / len * radius;
            let ny = dx / len * radius;
            out.push(vec![
                [snap(a[0] + nx), snap(a[1] + ny)],
                [snap(a[0] - nx), snap(a[1] - ny)],
                [snap(b[0] - nx), snap(b[1] - ny)],
                [snap(b[0] + nx), snap(b[1] + ny)],
            ]);
        }

        out.push(disk(a, disk_radius));
    }

    out
}

/// Regular polygon approximating a disk around `center`.
fn disk(center: [f64; 2], radius: f64) -> FloatPath {
    let step = std::f64::consts::TAU / ROUND_JOIN_SEGMENTS as f64;
    (0..ROUND_JOIN_SEGMENTS)
        .map(|i| {
            let angle = i as f64 * step;
            [
                snap(center[0] + radius * angle.cos()),
                snap(center[1] + radius * angle.sin()),
            ]
        })
        .collect()
}

fn to_scaled_path(points: &[Point]) -> FloatPath {
    points
        .iter()
        .map(|p| [snap(p.x * CLIPPER_SCALE), snap(p.y * CLIPPER_SCALE)])
        .collect()
}

fn snap(v: f64) -> f64 {
    v.round()
}

fn from_scaled_contour(contour: &FloatPath) -> Polygon {
    contour
        .iter()
        .map(|&[x, y]| Point::new(x / CLIPPER_SCALE, y / CLIPPER_SCALE))
        .collect()
}

fn flatten_shapes(shapes: FloatShapes) -> PolygonSet {
    pieces_to_set(shapes_to_pieces(shapes))
}

fn shapes_to_pieces(shapes: FloatShapes) -> Vec<Piece> {
    shapes
        .into_iter()
        .filter_map(|shape| {
            let mut contours = shape.into_iter().filter(|c| c.len() >= 3);
            let exterior = from_scaled_contour(&contours.next()?);
            let holes = contours.map(|c| from_scaled_contour(&c)).collect();
            Some(Piece { exterior, holes })
        })
        .collect()
}
