//! Renderer-facing layout annotations.
//!
//! Alignment crosshairs and a job label the print shop can stamp onto a
//! finished layout. These are presentation geometry only: they are
//! computed from the sheet dimensions after nesting and have no effect on
//! placement.

use stickernest_core::Point;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Crosshair arm length, in sheet units.
const MARKER_SIZE: f64 = 20.0;

/// Corner inset of the label anchor.
const LABEL_INSET: f64 = 10.0;

/// A text annotation identifying the print job.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JobLabel {
    pub text: String,
    /// Baseline-left anchor of the text.
    pub anchor: Point,
    pub font_size: f64,
}

/// Corner crosshair markers for a sheet: one vertical and one horizontal
/// stroke per corner, inset by the marker size.
pub fn alignment_markers(sheet_width: f64, sheet_height: f64) -> Vec<(Point, Point)> {
    let centers = [
        Point::new(MARKER_SIZE, MARKER_SIZE),
        Point::new(sheet_width - MARKER_SIZE, MARKER_SIZE),
        Point::new(MARKER_SIZE, sheet_height - MARKER_SIZE),
        Point::new(sheet_width - MARKER_SIZE, sheet_height - MARKER_SIZE),
    ];

    let half = MARKER_SIZE / 2.0;
    let mut segments = Vec::with_capacity(8);
    for c in centers {
        segments.push((Point::new(c.x, c.y - half), Point::new(c.x, c.y + half)));
        segments.push((Point::new(c.x - half, c.y), Point::new(c.x + half, c.y)));
    }
    segments
}

/// Job label anchored at the bottom-left corner of the sheet.
pub fn job_label(text: impl Into<String>, sheet_height: f64) -> JobLabel {
    JobLabel {
        text: text.into(),
        anchor: Point::new(LABEL_INSET, sheet_height - LABEL_INSET),
        font_size: 12.0,
    }
}
