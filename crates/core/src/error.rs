//! Shared error type.

use thiserror::Error;

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the pipeline.
///
/// Degenerate geometry (empty polygons, zero-area bounds, unknown config
/// ids) is deliberately *not* represented here: those are routine states
/// during interactive editing and the affected operations return zero or
/// neutral values instead. Only conditions with no salvageable default
/// become errors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The raster contains no foreground pixel to trace.
    #[error("no foreground pixel found in raster")]
    NoForegroundPixel,

    /// An outline collapsed below three vertices after cleanup; the caller
    /// should restore its previous state rather than proceed.
    #[error("outline unusable after cleanup: {0} vertices remain")]
    UnusableOutline(usize),

    /// A geometry input violates a structural requirement.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A sheet definition cannot produce a printable region.
    #[error("invalid sheet: {0}")]
    InvalidSheet(String),

    /// A pricing configuration failed validation at load time.
    #[error("invalid pricing config: {0}")]
    InvalidConfig(String),

    /// Internal failure (lock poisoning and similar).
    #[error("internal error: {0}")]
    Internal(String),
}
