//! # Stickernest Outline
//!
//! Turns an uploaded design into a precise cuttable outline.
//!
//! This crate covers the front half of the design-geometry pipeline:
//!
//! - **Contour tracing** ([`trace`]): Moore-neighbor boundary tracing over a
//!   raster mask, producing one closed pixel-boundary polygon
//! - **Simplification** ([`simplify`]): Ramer-Douglas-Peucker vertex
//!   reduction within a perpendicular-distance tolerance
//! - **Offsetting** ([`offset`]): grow/shrink polygon sets with rounded
//!   joins, and boolean difference for sheet-region construction, both on
//!   scaled integer coordinates
//! - **Editor state** ([`editor`]): an immutable snapshot of a design, its
//!   cutline, and its bounds, derived in one step from a raster or a parsed
//!   vector shape list
//!
//! ## Quick Start
//!
//! ```no_run
//! use stickernest_outline::editor::EditorState;
//!
//! let image = image::open("design.png").unwrap().to_rgba8();
//! let state = EditorState::from_raster(&image, 2.0, 10.0).unwrap();
//!
//! println!(
//!     "{} outline vertices, cutline perimeter {:.1} px",
//!     state.design().polygons()[0].len(),
//!     state.cutline().perimeter()
//! );
//! ```
//!
//! All stages are synchronous, allocation-only, and deterministic; hosts
//! that trace large rasters run the pipeline on a worker and drop the result
//! if cancelled.

pub mod editor;
pub mod offset;
pub mod simplify;
pub mod trace;

// Re-exports
pub use editor::EditorState;
pub use offset::{difference, offset_set, pieces_to_set, Piece, CLIPPER_SCALE};
pub use simplify::{clean_outline, simplify};
pub use trace::{trace_outline, RasterMask};
pub use stickernest_core::{Bounds, Error, Point, Polygon, PolygonSet, Result};
