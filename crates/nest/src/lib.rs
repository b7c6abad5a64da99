//! # Stickernest Nest
//!
//! Packs accepted sticker cutlines onto a bounded print sheet.
//!
//! The sheet is a rectangle with margin strips and keep-out zones
//! subtracted (possibly leaving several disjoint printable pieces). Each
//! candidate is a cutline polygon set with a list of allowed rotations.
//! Placement is a single deterministic greedy pass: largest candidates
//! first, no-fit polygons against everything already placed, bottom-left
//! position selection. Candidates that fit nowhere are reported back,
//! never dropped; the caller decides whether to shrink them, open a second
//! sheet, or fail the job.
//!
//! ## Quick Start
//!
//! ```
//! use stickernest_nest::{Candidate, Nester, NestConfig, Sheet};
//! use stickernest_core::PolygonSet;
//!
//! let sheet = Sheet::new(300.0, 200.0)
//!     .with_uniform_margin(10.0)
//!     .with_keep_out(20.0, 20.0, 40.0, 40.0);
//!
//! let candidates = vec![
//!     Candidate::new("order-1", PolygonSet::rectangle(0.0, 0.0, 60.0, 40.0))
//!         .with_quantity(3)
//!         .with_axis_aligned_rotations(),
//! ];
//!
//! let nester = Nester::new(NestConfig::new().with_spacing(4.0));
//! let result = nester.nest(&candidates, &sheet).unwrap();
//! assert!(result.all_placed());
//! ```
//!
//! The pass is CPU-bound and synchronous; hosts nest large batches on a
//! worker task and drop the result if the user cancels.

pub mod candidate;
pub mod markers;
pub mod nester;
pub mod nfp;
pub mod sheet;

// Re-exports
pub use candidate::Candidate;
pub use markers::{alignment_markers, job_label, JobLabel};
pub use nester::{NestConfig, Nester, NestResult, Placement};
pub use sheet::{KeepOut, Margins, PrintableRegion, Sheet};
pub use stickernest_core::{Bounds, Error, Point, Polygon, PolygonSet, Result};
