//! Single-pass greedy nesting.

use stickernest_core::{Point, PolygonSet, Result};
use stickernest_outline::offset::offset_set;

use crate::candidate::Candidate;
use crate::nfp::{compute_nfp, point_outside_all, rotate_nfp, translate_nfp, Nfp, NfpCache};
use crate::sheet::{PrintableRegion, Sheet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Nesting parameters.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NestConfig {
    /// Minimum gap between placed designs.
    pub spacing: f64,

    /// Grid step for candidate positions; `None` derives one from the
    /// smallest candidate dimension.
    pub sample_step: Option<f64>,
}

impl NestConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the spacing gap between designs.
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Fixes the position sampling step.
    pub fn with_sample_step(mut self, step: f64) -> Self {
        self.sample_step = Some(step);
        self
    }
}

/// The transform that carries a candidate's original polygons to their
/// nested position: rotate about the origin by `rotation_degrees`, then
/// translate by `(dx, dy)`. Immutable once emitted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    pub design_id: String,
    /// Copy number for candidates with quantity above one.
    pub instance: usize,
    pub dx: f64,
    pub dy: f64,
    pub rotation_degrees: f64,
}

impl Placement {
    /// Applies the placement transform to a polygon set.
    pub fn transform(&self, set: &PolygonSet) -> PolygonSet {
        set.rotated(self.rotation_degrees.to_radians())
            .translated(self.dx, self.dy)
    }
}

/// Outcome of one nesting pass over one sheet.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NestResult {
    /// Placements in the order they were made.
    pub placements: Vec<Placement>,

    /// Ids of candidates with at least one copy that found no position.
    pub unplaced: Vec<String>,

    /// Placed design area over printable area.
    pub utilization: f64,
}

impl NestResult {
    /// True when every requested copy was placed.
    pub fn all_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Number of placed copies.
    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    fn deduplicate_unplaced(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.unplaced.retain(|id| seen.insert(id.clone()));
    }
}

/// One already-placed copy, kept for NFP generation against later
/// candidates.
struct PlacedInstance {
    id: String,
    outline: PolygonSet,
    dx: f64,
    dy: f64,
    rotation: f64,
}

/// Greedy bottom-left nester.
///
/// A single deterministic pass: candidates ordered by decreasing
/// bounding-box area (ties by id), every allowed rotation tried, the
/// bottom-left-most valid position chosen. No re-optimization loop; the
/// pass returns after each candidate has been attempted once, and the same
/// input always produces the same layout.
pub struct Nester {
    config: NestConfig,
    nfp_cache: NfpCache,
}

impl Nester {
    /// Creates a nester with the given configuration.
    pub fn new(config: NestConfig) -> Self {
        Self {
            config,
            nfp_cache: NfpCache::new(),
        }
    }

    /// Creates a nester with default configuration.
    pub fn default_config() -> Self {
        Self::new(NestConfig::default())
    }

    /// Places the candidates into the sheet's printable region.
    ///
    /// Copies that fit nowhere are reported in
    /// [`NestResult::unplaced`]; they are never silently dropped and never
    /// abort the pass.
    pub fn nest(&self, candidates: &[Candidate], sheet: &Sheet) -> Result<NestResult> {
        let region = sheet.printable_region()?;
        for candidate in candidates {
            candidate.validate()?;
        }

        let mut order: Vec<usize> = (0..candidates.len()).collect();
        order.sort_by(|&a, &b| {
            candidates[b]
                .measure()
                .partial_cmp(&candidates[a].measure())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| candidates[a].id().cmp(candidates[b].id()))
        });

        let sample_step = self
            .config
            .sample_step
            .unwrap_or_else(|| auto_sample_step(candidates));

        let mut result = NestResult::default();
        let mut placed: Vec<PlacedInstance> = Vec::new();
        let mut placed_area = 0.0;

        for &index in &order {
            let candidate = &candidates[index];
            for instance in 0..candidate.quantity() {
                match self.place_one(candidate, &region, &placed, sample_step) {
                    Some((dx, dy, rotation_degrees)) => {
                        placed.push(PlacedInstance {
                            id: candidate.id().to_string(),
                            outline: candidate.outline().clone(),
                            dx,
                            dy,
                            rotation: rotation_degrees.to_radians(),
                        });
                        placed_area += candidate.outline().net_area();
                        result.placements.push(Placement {
                            design_id: candidate.id().to_string(),
                            instance,
                            dx,
                            dy,
                            rotation_degrees,
                        });
                    }
                    None => {
                        log::warn!(
                            "no position for candidate '{}' copy {}",
                            candidate.id(),
                            instance
                        );
                        result.unplaced.push(candidate.id().to_string());
                    }
                }
            }
        }

        let usable = region.area();
        if usable > 0.0 {
            result.utilization = placed_area / usable;
        }
        result.deduplicate_unplaced();
        Ok(result)
    }

    /// Finds the bottom-left-most valid (position, rotation) pair for one
    /// copy, or `None` when nothing fits.
    fn place_one(
        &self,
        candidate: &Candidate,
        region: &PrintableRegion,
        placed: &[PlacedInstance],
        sample_step: f64,
    ) -> Option<(f64, f64, f64)> {
        let region_bounds = region.bounds();
        let mut best: Option<(f64, f64, f64, f64, f64)> = None; // (key_y, key_x, dx, dy, deg)

        for degrees in candidate.rotations_deg() {
            let radians = degrees.to_radians();
            let rotated = candidate.outline().rotated(radians);
            let shape_bounds = rotated.bounds();

            // Translation window keeping the rotated AABB inside the region
            // AABB; empty when the shape cannot fit at this rotation.
            let min_dx = region_bounds.left - shape_bounds.left;
            let max_dx = region_bounds.right - shape_bounds.right;
            let min_dy = region_bounds.top - shape_bounds.top;
            let max_dy = region_bounds.bottom - shape_bounds.bottom;
            if max_dx < min_dx - 1e-9 || max_dy < min_dy - 1e-9 {
                continue;
            }

            let nfps = self.nfps_for(candidate, radians, placed);

            let consider = |dx: f64, dy: f64, best: &mut Option<(f64, f64, f64, f64, f64)>| {
                let key_y = dy + shape_bounds.top;
                let key_x = dx + shape_bounds.left;
                if let Some((by, bx, _, _, _)) = *best {
                    let better = key_y < by - 1e-9 || (key_y < by + 1e-9 && key_x < bx - 1e-9);
                    if !better {
                        return;
                    }
                }
                if !point_outside_all(Point::new(dx, dy), &nfps) {
                    return;
                }
                if !region.admits(&rotated.translated(dx, dy)) {
                    return;
                }
                *best = Some((key_y, key_x, dx, dy, degrees));
            };

            // Grid scan over the window, both edges included.
            let steps_x = ((max_dx - min_dx) / sample_step).ceil().max(0.0) as usize;
            let steps_y = ((max_dy - min_dy) / sample_step).ceil().max(0.0) as usize;
            for iy in 0..=steps_y {
                let dy = (min_dy + iy as f64 * sample_step).min(max_dy);
                for ix in 0..=steps_x {
                    let dx = (min_dx + ix as f64 * sample_step).min(max_dx);
                    consider(dx, dy, &mut best);
                }
            }

            // NFP vertices are natural touching positions; try them too.
            for nfp in &nfps {
                for poly in &nfp.polygons {
                    for p in poly {
                        if p.x >= min_dx - 1e-9
                            && p.x <= max_dx + 1e-9
                            && p.y >= min_dy - 1e-9
                            && p.y <= max_dy + 1e-9
                        {
                            consider(p.x.clamp(min_dx, max_dx), p.y.clamp(min_dy, max_dy), &mut best);
                        }
                    }
                }
            }
        }

        best.map(|(_, _, dx, dy, degrees)| (dx, dy, degrees))
    }

    /// NFPs of the candidate at `rotation` against every placed instance,
    /// transformed to sheet coordinates and inflated by the spacing gap.
    fn nfps_for(&self, candidate: &Candidate, rotation: f64, placed: &[PlacedInstance]) -> Vec<Nfp> {
        let mut nfps = Vec::with_capacity(placed.len());

        for instance in placed {
            let relative = rotation - instance.rotation;
            let at_origin = self.nfp_cache.get_or_compute(
                (instance.id.as_str(), candidate.id(), relative),
                || compute_nfp(&instance.outline, candidate.outline(), relative),
            );
            let at_origin = match at_origin {
                Ok(nfp) => nfp,
                Err(e) => {
                    log::warn!(
                        "NFP {} vs {} failed ({e}); skipping pair",
                        instance.id,
                        candidate.id()
                    );
                    continue;
                }
            };

            let transformed = translate_nfp(
                &rotate_nfp(&at_origin, instance.rotation),
                instance.dx,
                instance.dy,
            );
            nfps.push(self.inflate(transformed));
        }

        nfps
    }

    /// Grows an NFP by the spacing gap so placements keep their distance.
    fn inflate(&self, nfp: Nfp) -> Nfp {
        if self.config.spacing <= 0.0 {
            return nfp;
        }
        let grown = offset_set(&nfp.to_set(), self.config.spacing);
        if grown.is_empty() {
            return nfp;
        }
        Nfp::from_polygons(grown.into_polygons())
    }
}

/// Grid step derived from the smallest candidate dimension (a quarter of
/// it, clamped to a practical range).
fn auto_sample_step(candidates: &[Candidate]) -> f64 {
    let mut min_dim = f64::INFINITY;
    for candidate in candidates {
        let b = candidate.outline().bounds();
        if b.width > 0.0 {
            min_dim = min_dim.min(b.width);
        }
        if b.height > 0.0 {
            min_dim = min_dim.min(b.height);
        }
    }
    if !min_dim.is_finite() {
        return 1.0;
    }
    (min_dim / 4.0).clamp(0.5, 10.0)
}
