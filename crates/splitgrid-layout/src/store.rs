#![forbid(unsafe_code)]

//! Layout state stores.
//!
//! [`LayoutStore`] is the handle splitters and queries receive. Two
//! implementations cover the two operation modes:
//!
//! - [`UncontrolledStore`] owns its values and applies paired writes itself.
//! - [`ControlledStore`] mirrors values owned by the consumer. A paired write
//!   is turned into the complete next mapping for both axes and handed to the
//!   change handler; nothing is stored until the consumer syncs the values
//!   back through [`LayoutStore::replace`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LayoutError;
use crate::tracks::{Axis, AxisTracks, TrackValues};

/// Who owns the layout values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    Uncontrolled,
    Controlled,
}

/// Change notification for controlled layouts: `(rows, columns)`.
pub type ChangeHandler = Box<dyn FnMut(&TrackValues, &TrackValues)>;

/// Result of a paired write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeltaOutcome {
    /// Both values were stored.
    Applied { track_value: f64, neighbor_value: f64 },
    /// The values were proposed to the consumer and not stored.
    Proposed { track_value: f64, neighbor_value: f64 },
}

impl DeltaOutcome {
    /// `(track_value, neighbor_value)` regardless of mode.
    #[must_use]
    pub const fn values(&self) -> (f64, f64) {
        match *self {
            Self::Applied {
                track_value,
                neighbor_value,
            }
            | Self::Proposed {
                track_value,
                neighbor_value,
            } => (track_value, neighbor_value),
        }
    }

    #[must_use]
    pub const fn is_proposed(&self) -> bool {
        matches!(self, Self::Proposed { .. })
    }
}

/// Shared handle to the per-axis track values of one layout.
pub trait LayoutStore {
    /// Operation mode of this store.
    fn mode(&self) -> LayoutMode;

    /// Current values for `axis`.
    fn tracks(&self, axis: Axis) -> &AxisTracks;

    /// Set `track_key` to `new_value` and let `steal_from_key` absorb the
    /// difference. The only mutator; both writes land together or not at all.
    fn apply_delta(
        &mut self,
        axis: Axis,
        track_key: &str,
        steal_from_key: &str,
        new_value: f64,
    ) -> Result<DeltaOutcome, LayoutError>;

    /// Replace an axis wholesale.
    fn replace(&mut self, axis: Axis, values: TrackValues) -> Result<(), LayoutError>;
}

/// Internally owned layout values.
#[derive(Debug, Clone, PartialEq)]
pub struct UncontrolledStore {
    rows: AxisTracks,
    columns: AxisTracks,
}

impl UncontrolledStore {
    /// Initialize from default values.
    pub fn new(default_rows: TrackValues, default_columns: TrackValues) -> Result<Self, LayoutError> {
        Ok(Self {
            rows: AxisTracks::new(Axis::Rows, default_rows)?,
            columns: AxisTracks::new(Axis::Columns, default_columns)?,
        })
    }

    fn tracks_mut(&mut self, axis: Axis) -> &mut AxisTracks {
        match axis {
            Axis::Rows => &mut self.rows,
            Axis::Columns => &mut self.columns,
        }
    }
}

impl LayoutStore for UncontrolledStore {
    fn mode(&self) -> LayoutMode {
        LayoutMode::Uncontrolled
    }

    fn tracks(&self, axis: Axis) -> &AxisTracks {
        match axis {
            Axis::Rows => &self.rows,
            Axis::Columns => &self.columns,
        }
    }

    fn apply_delta(
        &mut self,
        axis: Axis,
        track_key: &str,
        steal_from_key: &str,
        new_value: f64,
    ) -> Result<DeltaOutcome, LayoutError> {
        let (track_value, neighbor_value) =
            self.tracks_mut(axis)
                .write_pair(track_key, steal_from_key, new_value)?;
        Ok(DeltaOutcome::Applied {
            track_value,
            neighbor_value,
        })
    }

    fn replace(&mut self, axis: Axis, values: TrackValues) -> Result<(), LayoutError> {
        self.tracks_mut(axis).replace(values)
    }
}

/// Consumer-owned layout values.
pub struct ControlledStore {
    rows: AxisTracks,
    columns: AxisTracks,
    on_change: Option<ChangeHandler>,
}

impl ControlledStore {
    /// Mirror the consumer's current values.
    pub fn new(
        rows: TrackValues,
        columns: TrackValues,
        on_change: Option<ChangeHandler>,
    ) -> Result<Self, LayoutError> {
        Ok(Self {
            rows: AxisTracks::new(Axis::Rows, rows)?,
            columns: AxisTracks::new(Axis::Columns, columns)?,
            on_change,
        })
    }

    #[must_use]
    pub fn has_change_handler(&self) -> bool {
        self.on_change.is_some()
    }
}

impl fmt::Debug for ControlledStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlledStore")
            .field("rows", &self.rows)
            .field("columns", &self.columns)
            .field("on_change", &self.has_change_handler())
            .finish()
    }
}

impl LayoutStore for ControlledStore {
    fn mode(&self) -> LayoutMode {
        LayoutMode::Controlled
    }

    fn tracks(&self, axis: Axis) -> &AxisTracks {
        match axis {
            Axis::Rows => &self.rows,
            Axis::Columns => &self.columns,
        }
    }

    fn apply_delta(
        &mut self,
        axis: Axis,
        track_key: &str,
        steal_from_key: &str,
        new_value: f64,
    ) -> Result<DeltaOutcome, LayoutError> {
        let next = self
            .tracks(axis)
            .with_pair(track_key, steal_from_key, new_value)?;
        let track_value = next.get(track_key).copied().unwrap_or(new_value);
        let neighbor_value = next.get(steal_from_key).copied().unwrap_or_default();

        match self.on_change.as_mut() {
            Some(on_change) => match axis {
                Axis::Rows => on_change(&next, self.columns.values()),
                Axis::Columns => on_change(self.rows.values(), &next),
            },
            None => debug!(
                axis = %axis,
                key = track_key,
                "controlled layout change dropped: no change handler"
            ),
        }

        Ok(DeltaOutcome::Proposed {
            track_value,
            neighbor_value,
        })
    }

    fn replace(&mut self, axis: Axis, values: TrackValues) -> Result<(), LayoutError> {
        match axis {
            Axis::Rows => self.rows.replace(values),
            Axis::Columns => self.columns.replace(values),
        }
    }
}
