//! Placement candidates.

use stickernest_core::geom::polygon;
use stickernest_core::{Bounds, Error, PolygonSet, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One design awaiting placement: its cutline polygons plus the discrete
/// rotation angles it may be tried at.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Candidate {
    id: String,
    outline: PolygonSet,
    rotations_deg: Vec<f64>,
    quantity: usize,
}

impl Candidate {
    /// Creates a candidate with no rotation freedom and quantity 1.
    pub fn new(id: impl Into<String>, outline: PolygonSet) -> Self {
        Self {
            id: id.into(),
            outline,
            rotations_deg: Vec::new(),
            quantity: 1,
        }
    }

    /// Sets the allowed rotation angles in degrees.
    pub fn with_rotations_deg(mut self, angles: Vec<f64>) -> Self {
        self.rotations_deg = angles;
        self
    }

    /// Allows the four axis-aligned rotations (0, 90, 180, 270 degrees).
    pub fn with_axis_aligned_rotations(self) -> Self {
        self.with_rotations_deg(vec![0.0, 90.0, 180.0, 270.0])
    }

    /// Allows `n` evenly spaced rotations over the full turn.
    pub fn with_rotation_steps(self, n: usize) -> Self {
        if n == 0 {
            return self.with_rotations_deg(Vec::new());
        }
        let step = 360.0 / n as f64;
        self.with_rotations_deg((0..n).map(|i| i as f64 * step).collect())
    }

    /// Sets how many copies to place.
    pub fn with_quantity(mut self, quantity: usize) -> Self {
        self.quantity = quantity;
        self
    }

    /// The design identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The cutline polygons, in design coordinates.
    pub fn outline(&self) -> &PolygonSet {
        &self.outline
    }

    /// Allowed rotations in degrees; an empty list means 0 only.
    pub fn rotations_deg(&self) -> Vec<f64> {
        if self.rotations_deg.is_empty() {
            vec![0.0]
        } else {
            self.rotations_deg.clone()
        }
    }

    /// Number of copies to place.
    pub fn quantity(&self) -> usize {
        self.quantity
    }

    /// Bounding-box area at rotation 0, the greedy ordering measure.
    pub fn measure(&self) -> f64 {
        self.outline.bounds().area()
    }

    /// Bounding box of the outline rotated about the origin by `degrees`.
    pub fn bounds_at_rotation(&self, degrees: f64) -> Bounds {
        if degrees == 0.0 {
            return self.outline.bounds();
        }
        self.outline.rotated(degrees.to_radians()).bounds()
    }

    /// Structural validation before a nesting pass.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::InvalidGeometry("candidate with empty id".into()));
        }
        if self.quantity == 0 {
            return Err(Error::InvalidGeometry(format!(
                "candidate '{}' has quantity 0",
                self.id
            )));
        }

        let usable = self
            .outline
            .iter()
            .any(|p| polygon::dedupe(p).len() >= 3);
        if !usable {
            return Err(Error::InvalidGeometry(format!(
                "candidate '{}' has no polygon with at least 3 vertices",
                self.id
            )));
        }
        Ok(())
    }
}
