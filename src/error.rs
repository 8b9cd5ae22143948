// src/error.rs

use thiserror::Error;

/// Errors raised by slab generation, symmetry analysis and screening.
///
/// Per-orientation failures during a screening run are *not* surfaced
/// through this type; they are collected as `OrientationFailure` records
/// on the outcome so the rest of the run survives.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SlabError {
    #[error("invalid Miller indices ({h},{k},{l}): {reason}")]
    InvalidOrientation { h: i32, k: i32, l: i32, reason: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("symmetry search failed: {0}")]
    Symmetry(String),

    #[error("degenerate geometry: {0}")]
    Geometry(String),

    /// A failure of the library's own machinery (e.g. a worker thread
    /// dying), not of the caller's input.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SlabError {
    pub fn invalid_orientation(h: i32, k: i32, l: i32, reason: impl Into<String>) -> Self {
        SlabError::InvalidOrientation { h, k, l, reason: reason.into() }
    }
}
