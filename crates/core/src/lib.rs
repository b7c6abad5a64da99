//! # Stickernest Core
//!
//! Shared value types and the polygon kernel for the stickernest
//! design-geometry pipeline.
//!
//! This crate provides the foundational types shared between the outline
//! extraction, pricing, and sheet-nesting crates:
//!
//! - **Value types**: [`Point`], [`Polygon`], [`PolygonSet`], [`Bounds`]
//! - **Polygon kernel**: [`geom::polygon`] - pure, total operations
//!   (bounds, perimeter, signed area, containment, transforms)
//! - **Error type**: [`Error`] - shared across the workspace
//!
//! Every type here is a plain value: produced by one pipeline stage and
//! consumed by the next, never aliased and mutated. Kernel operations do not
//! fail on degenerate input (fewer than three vertices, zero-length edges,
//! repeated points); they return zero measures instead, since degenerate
//! geometry is a routine state during interactive editing.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod error;
pub mod geom;
pub mod geometry;

// Re-exports
pub use error::{Error, Result};
pub use geometry::{Bounds, Point, Polygon, PolygonSet};
