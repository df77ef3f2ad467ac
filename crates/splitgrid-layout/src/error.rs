//! Layout errors.
//!
//! Every failure surfaced by the engine is a [`LayoutError`]. Callers that only
//! care about the broad class use [`LayoutError::kind`]:
//!
//! - [`LayoutErrorKind::InvalidConfiguration`]: a declarative mismatch (empty
//!   axis, dangling splitter key, bad bounds, mixed modes). Detected when a
//!   provider is built or a splitter is activated.
//! - [`LayoutErrorKind::NotFound`]: a query or write named a track that was
//!   never declared.
//!
//! Edge splitters with no neighbor and out-of-range drag values are not
//! errors; see `ConservationOutcome::BoundaryNoop` and the drag adapter's
//! clamping.

use thiserror::Error;

use crate::store::LayoutMode;
use crate::tracks::Axis;

/// Broad error class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutErrorKind {
    InvalidConfiguration,
    NotFound,
}

/// Errors produced by the layout engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("{axis} axis has no tracks")]
    EmptyAxis { axis: Axis },

    #[error("splitter references unknown {axis} track `{key}`")]
    UnknownTrack { axis: Axis, key: String },

    #[error("{axis} track `{key}` not found")]
    TrackNotFound { axis: Axis, key: String },

    #[error("splitter `{key}` bounds must satisfy 0 <= min <= max (got min {min}, max {max})")]
    InvalidBounds { key: String, min: f64, max: f64 },

    #[error("splitter `{key}` cannot be both leading and trailing")]
    ConflictingPolarity { key: String },

    #[error("{axis} values supplied both as defaults and as controlled values")]
    ConflictingModes { axis: Axis },

    #[error("operation requires a {expected:?} layout")]
    ModeMismatch { expected: LayoutMode },

    #[error("span must be finite and >= 0 (got {span})")]
    InvalidSpan { span: f64 },

    #[error("{axis} track `{key}` has invalid value {value}")]
    InvalidTrackValue { axis: Axis, key: String, value: f64 },

    #[error("fraction total must be finite and > 0 (got {total})")]
    NonPositiveFractionTotal { total: f64 },

    #[error("keyboard step must be finite and > 0 (got {step})")]
    InvalidKeyboardStep { step: f64 },
}

impl LayoutError {
    /// Broad class of this error.
    #[must_use]
    pub const fn kind(&self) -> LayoutErrorKind {
        match self {
            Self::TrackNotFound { .. } => LayoutErrorKind::NotFound,
            Self::EmptyAxis { .. }
            | Self::UnknownTrack { .. }
            | Self::InvalidBounds { .. }
            | Self::ConflictingPolarity { .. }
            | Self::ConflictingModes { .. }
            | Self::ModeMismatch { .. }
            | Self::InvalidSpan { .. }
            | Self::InvalidTrackValue { .. }
            | Self::NonPositiveFractionTotal { .. }
            | Self::InvalidKeyboardStep { .. } => LayoutErrorKind::InvalidConfiguration,
        }
    }

    /// Whether this is a configuration error.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self.kind(), LayoutErrorKind::InvalidConfiguration)
    }

    pub(crate) fn not_found(axis: Axis, key: &str) -> Self {
        Self::TrackNotFound {
            axis,
            key: key.to_owned(),
        }
    }
}
