//! No-Fit Polygon (NFP) computation.
//!
//! The NFP of a stationary shape A and an orbiting shape B is the set of
//! positions for B's reference point at which B touches or overlaps A.
//! During placement a candidate translation is valid exactly when it lies
//! outside every placed shape's NFP.
//!
//! Two paths:
//! - **Convex pair**: direct Minkowski sum by sorted edge-vector merge,
//!   O(n + m)
//! - **General pair**: ear-clipping triangulation of both shapes, pairwise
//!   convex Minkowski sums, union of the parts via `i_overlay`
//!
//! Multi-polygon sets are handled pairwise ring against ring with one
//! final union; hole rings are treated as solid, which only over-covers
//! (a placement refused near a hole is merely conservative).

use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::{Arc, RwLock};

use geo::{Coord, ConvexHull, LineString};
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;

use stickernest_core::geom::polygon;
use stickernest_core::{Error, Point, Polygon, PolygonSet, Result};

/// NFP computation result: one or more forbidden-position polygons.
#[derive(Debug, Clone, Default)]
pub struct Nfp {
    pub polygons: Vec<Polygon>,
}

impl Nfp {
    /// Creates an empty NFP.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an NFP from a single polygon.
    pub fn from_polygon(polygon: Polygon) -> Self {
        Self {
            polygons: vec![polygon],
        }
    }

    /// Creates an NFP from multiple polygons.
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    /// True if there are no forbidden positions.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// The NFP as a polygon set (for offsetting by a spacing gap).
    pub fn to_set(&self) -> PolygonSet {
        PolygonSet::from_polygons(self.polygons.clone())
    }
}

/// Computes the NFP between two polygon sets.
///
/// `stationary` is taken at the origin with no rotation; `orbiting` is
/// rotated by `rotation` radians first. The caller maps the result to a
/// placed instance by rotating it by the instance's rotation and
/// translating it to the instance's position.
pub fn compute_nfp(stationary: &PolygonSet, orbiting: &PolygonSet, rotation: f64) -> Result<Nfp> {
    let stat_rings = usable_rings(stationary);
    let orb_rings: Vec<Polygon> = usable_rings(orbiting)
        .into_iter()
        .map(|ring| polygon::rotate(&ring, rotation))
        .collect();

    if stat_rings.is_empty() || orb_rings.is_empty() {
        return Err(Error::InvalidGeometry(
            "NFP requires polygons with at least 3 vertices".into(),
        ));
    }

    // Fast path: one convex ring on each side.
    if let ([s], [o]) = (stat_rings.as_slice(), orb_rings.as_slice()) {
        if polygon::is_convex(s) && polygon::is_convex(o) {
            let reflected = reflect(o);
            return minkowski_sum_convex(s, &reflected);
        }
    }

    // General case: triangulate every ring, sum triangle pairs, union.
    let mut partials: Vec<Polygon> = Vec::new();
    for s_ring in &stat_rings {
        let s_parts = triangulate(s_ring);
        for o_ring in &orb_rings {
            let o_parts = triangulate(o_ring);
            for s_part in &s_parts {
                for o_part in &o_parts {
                    let reflected = reflect(o_part);
                    if let Ok(nfp) = minkowski_sum_convex(s_part, &reflected) {
                        partials.extend(nfp.polygons.into_iter().filter(|p| p.len() >= 3));
                    }
                }
            }
        }
    }

    if partials.is_empty() {
        // Degenerate triangulation; fall back to the hulls.
        let s_hull = hull_of_rings(&stat_rings);
        let o_hull = hull_of_rings(&orb_rings);
        let reflected = reflect(&o_hull);
        return minkowski_sum_convex(&s_hull, &reflected);
    }

    union_polygons(partials)
}

/// Rotates an NFP about the origin.
pub fn rotate_nfp(nfp: &Nfp, radians: f64) -> Nfp {
    Nfp {
        polygons: nfp
            .polygons
            .iter()
            .map(|p| polygon::rotate(p, radians))
            .collect(),
    }
}

/// Translates an NFP.
pub fn translate_nfp(nfp: &Nfp, dx: f64, dy: f64) -> Nfp {
    Nfp {
        polygons: nfp
            .polygons
            .iter()
            .map(|p| polygon::translate(p, dx, dy))
            .collect(),
    }
}

/// Positions closer to an NFP boundary than this count as touching, not
/// overlapping.
const TOUCH_EPS: f64 = 1e-7;

/// True if the point lies outside (or exactly on the boundary of) every
/// NFP in the list. Touching is not overlap, so boundary positions are
/// allowed.
pub fn point_outside_all(p: Point, nfps: &[Nfp]) -> bool {
    !nfps.iter().any(|nfp| {
        nfp.polygons.iter().any(|poly| {
            polygon::contains_point(poly, p) && polygon::boundary_distance(poly, p) > TOUCH_EPS
        })
    })
}

fn usable_rings(set: &PolygonSet) -> Vec<Polygon> {
    set.iter()
        .map(|p| polygon::dedupe(p))
        .filter(|p| p.len() >= 3)
        .collect()
}

fn reflect(points: &[Point]) -> Polygon {
    points.iter().map(|p| Point::new(-p.x, -p.y)).collect()
}

/// Minkowski sum of two convex polygons by merging their edge vectors in
/// angle order.
fn minkowski_sum_convex(poly_a: &[Point], poly_b: &[Point]) -> Result<Nfp> {
    let a = polygon::ensure_ccw(poly_a);
    let b = polygon::ensure_ccw(poly_b);
    if a.len() < 3 || b.len() < 3 {
        return Err(Error::InvalidGeometry(
            "Minkowski sum requires polygons with at least 3 vertices".into(),
        ));
    }

    let edges_a = edge_vectors(&a);
    let edges_b = edge_vectors(&b);

    let start_a = bottom_left_vertex(&a);
    let start_b = bottom_left_vertex(&b);
    let mut current = Point::new(a[start_a].x + b[start_b].x, a[start_a].y + b[start_b].y);

    let merged = merge_edge_vectors(&edges_a, start_a, &edges_b, start_b);

    let mut result = Vec::with_capacity(merged.len() + 1);
    result.push(current);
    for (dx, dy) in merged {
        current = Point::new(current.x + dx, current.y + dy);
        result.push(current);
    }

    // Drop the duplicated closing vertex.
    if result.len() > 1 {
        let first = result[0];
        let last = result[result.len() - 1];
        if (first.x - last.x).abs() < 1e-9 && (first.y - last.y).abs() < 1e-9 {
            result.pop();
        }
    }

    Ok(Nfp::from_polygon(result))
}

fn edge_vectors(points: &[Point]) -> Vec<(f64, f64)> {
    let n = points.len();
    (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            (points[j].x - points[i].x, points[j].y - points[i].y)
        })
        .collect()
}

fn bottom_left_vertex(points: &[Point]) -> usize {
    let mut min_idx = 0;
    for (i, p) in points.iter().enumerate() {
        let m = points[min_idx];
        if p.y < m.y || (p.y == m.y && p.x < m.x) {
            min_idx = i;
        }
    }
    min_idx
}

fn edge_angle(dx: f64, dy: f64) -> f64 {
    let angle = dy.atan2(dx);
    if angle < 0.0 {
        angle + 2.0 * PI
    } else {
        angle
    }
}

fn merge_edge_vectors(
    edges_a: &[(f64, f64)],
    start_a: usize,
    edges_b: &[(f64, f64)],
    start_b: usize,
) -> Vec<(f64, f64)> {
    let n_a = edges_a.len();
    let n_b = edges_b.len();

    let mut result = Vec::with_capacity(n_a + n_b);
    let mut i_a = 0;
    let mut i_b = 0;

    while i_a < n_a || i_b < n_b {
        if i_a >= n_a {
            result.push(edges_b[(start_b + i_b) % n_b]);
            i_b += 1;
        } else if i_b >= n_b {
            result.push(edges_a[(start_a + i_a) % n_a]);
            i_a += 1;
        } else {
            let ea = edges_a[(start_a + i_a) % n_a];
            let eb = edges_b[(start_b + i_b) % n_b];
            let angle_a = edge_angle(ea.0, ea.1);
            let angle_b = edge_angle(eb.0, eb.1);

            if angle_a <= angle_b + 1e-10 {
                result.push(ea);
                i_a += 1;
            }
            if angle_b <= angle_a + 1e-10 {
                result.push(eb);
                i_b += 1;
            }
        }
    }

    result
}

/// Ear-clipping triangulation; convex inputs come back whole.
fn triangulate(ring: &[Point]) -> Vec<Polygon> {
    if ring.len() < 3 {
        return Vec::new();
    }
    if polygon::is_convex(ring) {
        return vec![ring.to_vec()];
    }

    let mut vertices = polygon::ensure_ccw(ring);
    let mut triangles = Vec::new();

    while vertices.len() > 3 {
        let n = vertices.len();
        let mut clipped = false;

        for i in 0..n {
            let prev = (i + n - 1) % n;
            let next = (i + 1) % n;
            if is_ear(&vertices, prev, i, next) {
                triangles.push(vec![vertices[prev], vertices[i], vertices[next]]);
                vertices.remove(i);
                clipped = true;
                break;
            }
        }

        if !clipped {
            // Degenerate ring; approximate by its hull.
            return vec![hull_of_rings(&[ring.to_vec()])];
        }
    }

    if vertices.len() == 3 {
        triangles.push(vertices);
    }
    triangles
}

fn is_ear(vertices: &[Point], prev: usize, curr: usize, next: usize) -> bool {
    let a = vertices[prev];
    let b = vertices[curr];
    let c = vertices[next];

    // Reflex vertices cannot be ears in a CCW ring.
    let cross = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
    if cross <= 0.0 {
        return false;
    }

    for (i, p) in vertices.iter().enumerate() {
        if i == prev || i == curr || i == next {
            continue;
        }
        if point_in_triangle(*p, a, b, c) {
            return false;
        }
    }
    true
}

fn point_in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let v0 = (c.x - a.x, c.y - a.y);
    let v1 = (b.x - a.x, b.y - a.y);
    let v2 = (p.x - a.x, p.y - a.y);

    let dot00 = v0.0 * v0.0 + v0.1 * v0.1;
    let dot01 = v0.0 * v1.0 + v0.1 * v1.1;
    let dot02 = v0.0 * v2.0 + v0.1 * v2.1;
    let dot11 = v1.0 * v1.0 + v1.1 * v1.1;
    let dot12 = v1.0 * v2.0 + v1.1 * v2.1;

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom.abs() < 1e-18 {
        return false;
    }
    let inv = 1.0 / denom;
    let u = (dot11 * dot02 - dot01 * dot12) * inv;
    let v = (dot00 * dot12 - dot01 * dot02) * inv;

    u > 1e-10 && v > 1e-10 && (u + v) < 1.0 - 1e-10
}

/// Convex hull over every vertex of the given rings.
fn hull_of_rings(rings: &[Polygon]) -> Polygon {
    let coords: Vec<Coord<f64>> = rings
        .iter()
        .flatten()
        .map(|p| Coord { x: p.x, y: p.y })
        .collect();
    if coords.len() < 3 {
        return rings.iter().flatten().copied().collect();
    }

    let hull = LineString::from(coords).convex_hull();
    let count = hull.exterior().coords().count();
    hull.exterior()
        .coords()
        .take(count.saturating_sub(1)) // drop the duplicate closing point
        .map(|c| Point::new(c.x, c.y))
        .collect()
}

/// Unions partial NFPs into the final forbidden region.
fn union_polygons(polygons: Vec<Polygon>) -> Result<Nfp> {
    if polygons.len() <= 1 {
        return Ok(Nfp::from_polygons(polygons));
    }

    let paths: Vec<Vec<[f64; 2]>> = polygons
        .iter()
        .map(|p| {
            polygon::ensure_ccw(p)
                .iter()
                .map(|q| [q.x, q.y])
                .collect()
        })
        .collect();

    let (subj, clip) = paths.split_at(1);
    let shapes = subj
        .to_vec()
        .overlay(&clip.to_vec(), OverlayRule::Union, FillRule::NonZero);

    let mut merged: Vec<Polygon> = Vec::new();
    for shape in shapes {
        for contour in shape {
            if contour.len() >= 3 {
                merged.push(contour.iter().map(|&[x, y]| Point::new(x, y)).collect());
            }
        }
    }

    if merged.is_empty() {
        // Union failed outright; fall back to the raw partials.
        return Ok(Nfp::from_polygons(polygons));
    }
    Ok(Nfp::from_polygons(merged))
}

// ============================================================================
// NFP Cache
// ============================================================================

/// Cache key: geometry id pair plus relative rotation in millidegrees.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct NfpCacheKey {
    stationary: String,
    orbiting: String,
    rotation_millideg: i64,
}

impl NfpCacheKey {
    fn new(stationary: &str, orbiting: &str, rotation_rad: f64) -> Self {
        Self {
            stationary: stationary.to_string(),
            orbiting: orbiting.to_string(),
            rotation_millideg: ((rotation_rad * 180.0 / PI) * 1000.0).round() as i64,
        }
    }
}

/// Thread-safe cache of computed NFPs.
///
/// Quantity runs re-place the same design many times; the NFP between two
/// designs at a given relative rotation never changes, so it is computed
/// once at the origin and transformed per placed instance.
#[derive(Debug, Default)]
pub struct NfpCache {
    cache: RwLock<HashMap<NfpCacheKey, Arc<Nfp>>>,
}

impl NfpCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached NFP for the key or computes and stores it.
    pub fn get_or_compute<F>(&self, key: (&str, &str, f64), compute: F) -> Result<Arc<Nfp>>
    where
        F: FnOnce() -> Result<Nfp>,
    {
        let cache_key = NfpCacheKey::new(key.0, key.1, key.2);

        {
            let cache = self
                .cache
                .read()
                .map_err(|e| Error::Internal(format!("NFP cache read lock: {e}")))?;
            if let Some(nfp) = cache.get(&cache_key) {
                return Ok(Arc::clone(nfp));
            }
        }

        let nfp = Arc::new(compute()?);
        let mut cache = self
            .cache
            .write()
            .map_err(|e| Error::Internal(format!("NFP cache write lock: {e}")))?;
        cache.insert(cache_key, Arc::clone(&nfp));
        Ok(nfp)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
