#![forbid(unsafe_code)]

//! Read-only layout views.
//!
//! [`LayoutQuery`] borrows a store and the container's pixel spans and
//! derives per-track sizes and grid template strings from them. Nothing is
//! written; calling any method twice without an intervening mutation returns
//! the same result.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::store::LayoutStore;
use crate::tracks::Axis;
use crate::units::{Unit, validate_span};

/// Container size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaneSpans {
    pub width: f64,
    pub height: f64,
}

impl PaneSpans {
    /// Validate and build spans.
    pub fn new(width: f64, height: f64) -> Result<Self, LayoutError> {
        Ok(Self {
            width: validate_span(width)?,
            height: validate_span(height)?,
        })
    }

    /// Pixel span along `axis` (height for rows, width for columns).
    #[must_use]
    pub const fn span(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Rows => self.height,
            Axis::Columns => self.width,
        }
    }
}

/// Derived, read-only view over a layout.
#[derive(Clone, Copy)]
pub struct LayoutQuery<'a> {
    store: &'a dyn LayoutStore,
    spans: PaneSpans,
}

impl<'a> LayoutQuery<'a> {
    #[must_use]
    pub fn new(store: &'a dyn LayoutStore, spans: PaneSpans) -> Self {
        Self { store, spans }
    }

    #[must_use]
    pub const fn spans(&self) -> PaneSpans {
        self.spans
    }

    /// Size of one track in `unit`.
    pub fn layout_value(&self, axis: Axis, key: &str, unit: Unit) -> Result<f64, LayoutError> {
        let tracks = self.store.tracks(axis);
        let value = tracks.require(key)?;
        match unit {
            Unit::Fr => Ok(value),
            Unit::Px => Ok(tracks.scale(self.spans.span(axis))?.to_pixels(value)),
        }
    }

    /// Space-separated `{value}{unit}` tokens, one per track in declaration
    /// order. An axis without tracks yields an empty string.
    pub fn grid_template(&self, axis: Axis, unit: Unit) -> Result<String, LayoutError> {
        let tracks = self.store.tracks(axis);
        if tracks.is_empty() {
            return Ok(String::new());
        }
        let scale = match unit {
            Unit::Fr => None,
            Unit::Px => Some(tracks.scale(self.spans.span(axis))?),
        };
        let suffix = unit.suffix();
        let tokens: Vec<String> = tracks
            .iter()
            .map(|(_, value)| {
                let value = scale.map_or(value, |scale| scale.to_pixels(value));
                format!("{value}{suffix}")
            })
            .collect();
        Ok(tokens.join(" "))
    }

    /// Template for the rows axis.
    pub fn grid_template_rows(&self, unit: Unit) -> Result<String, LayoutError> {
        self.grid_template(Axis::Rows, unit)
    }

    /// Template for the columns axis.
    pub fn grid_template_columns(&self, unit: Unit) -> Result<String, LayoutError> {
        self.grid_template(Axis::Columns, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutErrorKind;
    use crate::store::UncontrolledStore;
    use crate::tracks::{TrackValues, track_values};

    fn store(rows: &[(&str, f64)], columns: &[(&str, f64)]) -> UncontrolledStore {
        UncontrolledStore::new(
            track_values(rows.iter().copied()),
            track_values(columns.iter().copied()),
        )
        .expect("valid defaults")
    }

    #[test]
    fn px_and_fr_values() {
        let store = store(&[("c", 1.0), ("d", 1.0)], &[("a", 1.0), ("b", 1.0)]);
        let query = LayoutQuery::new(&store, PaneSpans::new(500.0, 500.0).expect("spans"));
        assert_eq!(query.layout_value(Axis::Columns, "a", Unit::Px), Ok(250.0));
        assert_eq!(query.layout_value(Axis::Rows, "c", Unit::Px), Ok(250.0));
        assert_eq!(query.layout_value(Axis::Columns, "a", Unit::Fr), Ok(1.0));
        assert_eq!(query.layout_value(Axis::Rows, "c", Unit::Fr), Ok(1.0));
    }

    #[test]
    fn templates_match_declaration_order() {
        let store = store(&[("c", 3.0), ("d", 4.0)], &[("a", 1.0), ("b", 2.0)]);
        let query = LayoutQuery::new(&store, PaneSpans::new(500.0, 500.0).expect("spans"));
        assert_eq!(
            query.grid_template_rows(Unit::Px).as_deref(),
            Ok("214.28571428571428px 285.7142857142857px")
        );
        assert_eq!(query.grid_template_rows(Unit::Fr).as_deref(), Ok("3fr 4fr"));
        assert_eq!(
            query.grid_template_columns(Unit::Px).as_deref(),
            Ok("166.66666666666666px 333.3333333333333px")
        );
        assert_eq!(query.grid_template_columns(Unit::Fr).as_deref(), Ok("1fr 2fr"));
    }

    #[test]
    fn repeated_reads_are_identical() {
        let store = store(&[("c", 1.0)], &[("a", 0.3), ("b", 0.7)]);
        let query = LayoutQuery::new(&store, PaneSpans::new(333.0, 10.0).expect("spans"));
        let first = query.grid_template_columns(Unit::Fr);
        let second = query.grid_template_columns(Unit::Fr);
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_key_is_not_found() {
        let store = store(&[("c", 1.0)], &[("a", 1.0)]);
        let query = LayoutQuery::new(&store, PaneSpans::new(100.0, 100.0).expect("spans"));
        let err = query
            .layout_value(Axis::Columns, "missing", Unit::Fr)
            .expect_err("unknown key");
        assert_eq!(err.kind(), LayoutErrorKind::NotFound);
    }

    #[test]
    fn empty_axis_renders_empty_template() {
        let store = UncontrolledStore::new(TrackValues::default(), track_values([("a", 1.0)]))
            .expect("valid defaults");
        let query = LayoutQuery::new(&store, PaneSpans::new(100.0, 100.0).expect("spans"));
        assert_eq!(query.grid_template_rows(Unit::Px).as_deref(), Ok(""));
    }

    #[test]
    fn all_zero_tracks_cannot_be_converted_to_pixels() {
        let store = store(&[("c", 0.0), ("d", 0.0)], &[("a", 1.0)]);
        let query = LayoutQuery::new(&store, PaneSpans::new(100.0, 100.0).expect("spans"));
        assert_eq!(query.grid_template_rows(Unit::Fr).as_deref(), Ok("0fr 0fr"));
        assert!(query.grid_template_rows(Unit::Px).is_err());
    }

    #[test]
    fn spans_reject_negative_sizes() {
        assert_eq!(
            PaneSpans::new(-1.0, 10.0),
            Err(LayoutError::InvalidSpan { span: -1.0 })
        );
        assert!(PaneSpans::new(10.0, f64::NAN).is_err());
    }
}
