#![forbid(unsafe_code)]

//! Conservation engine: turn one splitter's new value into a paired update.
//!
//! A splitter edits one track. The space that track gains or loses comes from
//! the track immediately before it (leading polarity) or immediately after it
//! (trailing polarity), in declaration order. The axis total never changes.
//!
//! # Failure Modes
//!
//! - Edited track missing: [`LayoutError::TrackNotFound`].
//! - Edge track with no neighbor on the requested side:
//!   [`ConservationOutcome::BoundaryNoop`], state untouched.
//!
//! Values are expected to be clamped by the caller; nothing here re-clamps.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LayoutError;
use crate::store::{DeltaOutcome, LayoutStore};
use crate::tracks::{Axis, AxisTracks};

/// Which neighbor absorbs an edited track's change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// The splitter sits at the track's start; the preceding track absorbs.
    Leading,
    /// The splitter sits at the track's end; the following track absorbs.
    Trailing,
}

impl Polarity {
    /// Growth direction along the axis: pointer motion toward increasing
    /// coordinates grows a trailing track and shrinks a leading one.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Leading => -1.0,
            Self::Trailing => 1.0,
        }
    }
}

/// Result of resolving one splitter update.
#[derive(Debug, Clone, PartialEq)]
pub enum ConservationOutcome {
    /// Both tracks were written.
    Applied {
        neighbor: String,
        track_value: f64,
        neighbor_value: f64,
    },
    /// Controlled layout: the update was proposed to the consumer.
    Proposed {
        neighbor: String,
        track_value: f64,
        neighbor_value: f64,
    },
    /// No neighbor on the requested side.
    BoundaryNoop,
}

impl ConservationOutcome {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::BoundaryNoop)
    }
}

/// Key of the track that absorbs `key`'s change, `None` at the axis edge.
pub fn resolve_neighbor<'a>(
    tracks: &'a AxisTracks,
    key: &str,
    polarity: Polarity,
) -> Result<Option<&'a str>, LayoutError> {
    let index = tracks
        .index_of(key)
        .ok_or_else(|| LayoutError::not_found(tracks.axis(), key))?;
    let neighbor = match polarity {
        Polarity::Leading => index.checked_sub(1),
        Polarity::Trailing => index.checked_add(1),
    };
    Ok(neighbor.and_then(|i| tracks.key_at(i)))
}

/// Set `key` to `requested` and let its neighbor absorb the difference.
pub fn conserve<S>(
    store: &mut S,
    axis: Axis,
    key: &str,
    polarity: Polarity,
    requested: f64,
) -> Result<ConservationOutcome, LayoutError>
where
    S: LayoutStore + ?Sized,
{
    let Some(neighbor) = resolve_neighbor(store.tracks(axis), key, polarity)?.map(str::to_owned)
    else {
        debug!(axis = %axis, key, ?polarity, "edge splitter has no neighbor; ignoring update");
        return Ok(ConservationOutcome::BoundaryNoop);
    };

    let outcome = match store.apply_delta(axis, key, &neighbor, requested)? {
        DeltaOutcome::Applied {
            track_value,
            neighbor_value,
        } => ConservationOutcome::Applied {
            neighbor,
            track_value,
            neighbor_value,
        },
        DeltaOutcome::Proposed {
            track_value,
            neighbor_value,
        } => ConservationOutcome::Proposed {
            neighbor,
            track_value,
            neighbor_value,
        },
    };
    Ok(outcome)
}
