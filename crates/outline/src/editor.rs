//! Immutable design/editing pipeline state.
//!
//! The host application owns the current [`EditorState`] and replaces it
//! wholesale when an operation succeeds; on failure it simply keeps the
//! previous value. No stage ever mutates shared state.

use stickernest_core::geom::polygon;
use stickernest_core::{Bounds, Error, Polygon, PolygonSet, Result};

use crate::offset::offset_set;
use crate::simplify::{clean_outline, simplify};
use crate::trace::{trace_outline, RasterMask};

/// Perpendicular-distance tolerance (px) applied to traced contours.
pub const DEFAULT_SIMPLIFY_EPSILON: f64 = 2.0;

/// Clearance (px) between a design outline and its cutline.
pub const DEFAULT_CUTLINE_CLEARANCE: f64 = 10.0;

/// One consistent snapshot of a design: its outline polygons, the cutline
/// offset around them, and the cutline bounds used for pricing and display.
#[derive(Debug, Clone)]
pub struct EditorState {
    design: PolygonSet,
    cutline: PolygonSet,
    bounds: Bounds,
    clearance: f64,
}

impl EditorState {
    /// Builds a state from a rasterized design: traces the first foreground
    /// region, simplifies the contour within `epsilon`, cleans it, and
    /// offsets the result outward by `clearance`.
    ///
    /// Fails with [`Error::NoForegroundPixel`] on an all-background raster
    /// and [`Error::UnusableOutline`] when the traced contour collapses.
    pub fn from_raster(mask: &impl RasterMask, epsilon: f64, clearance: f64) -> Result<Self> {
        let contour = trace_outline(mask)?;
        let simplified = simplify(&contour, epsilon);
        let outline = clean_outline(&simplified)?;
        Self::from_design(PolygonSet::from_polygon(outline), clearance)
    }

    /// Builds a state from an already-parsed vector shape list.
    ///
    /// Polygons that do not survive duplicate removal with at least three
    /// vertices are dropped; an input with no usable polygon at all is
    /// rejected.
    pub fn from_vector(shapes: Vec<Polygon>, clearance: f64) -> Result<Self> {
        let usable: Vec<Polygon> = shapes
            .iter()
            .map(|p| polygon::dedupe(p))
            .filter(|p| p.len() >= 3)
            .collect();
        if usable.is_empty() {
            return Err(Error::InvalidGeometry(
                "no usable polygons in vector input".into(),
            ));
        }
        Self::from_design(PolygonSet::from_polygons(usable), clearance)
    }

    fn from_design(design: PolygonSet, clearance: f64) -> Result<Self> {
        let cutline = offset_set(&design, clearance);
        let bounds = cutline.bounds();
        if bounds.is_degenerate() {
            return Err(Error::InvalidGeometry(
                "design produced a degenerate cutline".into(),
            ));
        }

        Ok(Self {
            design,
            cutline,
            bounds,
            clearance,
        })
    }

    /// The design outline polygons.
    pub fn design(&self) -> &PolygonSet {
        &self.design
    }

    /// The cutline offset around the design.
    pub fn cutline(&self) -> &PolygonSet {
        &self.cutline
    }

    /// Bounds of the cutline, the box pricing measures.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The clearance the cutline was generated with.
    pub fn clearance(&self) -> f64 {
        self.clearance
    }

    /// A new state with the design uniformly rescaled and the cutline
    /// regenerated. The factor must be positive.
    pub fn scaled(&self, factor: f64) -> Result<Self> {
        if !(factor > 0.0) {
            return Err(Error::InvalidGeometry(format!(
                "scale factor must be positive, got {factor}"
            )));
        }
        Self::from_design(self.design.scaled(factor), self.clearance)
    }

    /// A new state with the cutline regenerated at a different clearance.
    pub fn with_clearance(&self, clearance: f64) -> Result<Self> {
        Self::from_design(self.design.clone(), clearance)
    }
}
