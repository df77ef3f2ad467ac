#![forbid(unsafe_code)]

//! Axes and their ordered track values.
//!
//! [`AxisTracks`] owns the fractional value of every track on one axis, in
//! declaration order. Declaration order is significant: it decides which
//! track a splitter steals space from and the order of grid template tokens.
//!
//! # Invariants
//!
//! 1. Every stored value is finite and `>= 0`.
//! 2. [`AxisTracks::write_pair`] conserves the axis total: the amount one track
//!    gains is exactly what its neighbor loses.
//! 3. Every mutation bumps [`AxisTracks::generation`]; the cached total is
//!    only reused for the generation it was computed at.

use std::cell::Cell;
use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};
use splitgrid_core::Point;

use crate::error::LayoutError;
use crate::units::AxisScale;

/// Insertion-ordered map from track key to fractional value.
pub type TrackValues = IndexMap<String, f64, FxBuildHasher>;

/// Build [`TrackValues`] from `(key, value)` pairs, keeping their order.
pub fn track_values<K, I>(pairs: I) -> TrackValues
where
    K: Into<String>,
    I: IntoIterator<Item = (K, f64)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// One of the two independent layout dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Rows,
    Columns,
}

impl Axis {
    pub const ALL: [Self; 2] = [Self::Rows, Self::Columns];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rows => "rows",
            Self::Columns => "columns",
        }
    }

    /// Whether tracks on this axis are laid out left to right.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Columns)
    }

    /// Coordinate of `point` along this axis (`x` for columns, `y` for rows).
    #[must_use]
    pub const fn project(self, point: Point) -> f64 {
        match self {
            Self::Rows => point.y,
            Self::Columns => point.x,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered track values for one axis.
#[derive(Debug, Clone)]
pub struct AxisTracks {
    axis: Axis,
    values: TrackValues,
    generation: u64,
    total_cache: Cell<Option<(u64, f64)>>,
}

impl AxisTracks {
    /// Validate and take ownership of `values`.
    pub fn new(axis: Axis, values: TrackValues) -> Result<Self, LayoutError> {
        validate_values(axis, &values)?;
        Ok(Self {
            axis,
            values,
            generation: 0,
            total_cache: Cell::new(None),
        })
    }

    /// An axis with no tracks.
    #[must_use]
    pub fn empty(axis: Axis) -> Self {
        Self {
            axis,
            values: TrackValues::default(),
            generation: 0,
            total_cache: Cell::new(None),
        }
    }

    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Fractional value of `key`, `None` if the track was never declared.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Like [`get`](Self::get), but a missing key is [`LayoutError::TrackNotFound`].
    pub fn require(&self, key: &str) -> Result<f64, LayoutError> {
        self.get(key)
            .ok_or_else(|| LayoutError::not_found(self.axis, key))
    }

    /// Declaration index of `key`.
    #[must_use]
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.values.get_index_of(key)
    }

    /// Key declared at `index`.
    #[must_use]
    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.values.get_index(index).map(|(k, _)| k.as_str())
    }

    /// Tracks in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[must_use]
    pub fn values(&self) -> &TrackValues {
        &self.values
    }

    /// Mutation counter.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Sum of all track values, cached per generation.
    #[must_use]
    pub fn total(&self) -> f64 {
        match self.total_cache.get() {
            Some((generation, total)) if generation == self.generation => return total,
            _ => {}
        }
        let total: f64 = self.values.values().sum();
        self.total_cache.set(Some((self.generation, total)));
        total
    }

    /// Unit scale for this axis against a pixel span.
    pub fn scale(&self, span: f64) -> Result<AxisScale, LayoutError> {
        AxisScale::new(self.total(), span)
    }

    /// Values `(track, steal_from)` would hold after `track` is set to
    /// `new_value` and `steal_from` absorbs the difference.
    pub fn paired(
        &self,
        track: &str,
        steal_from: &str,
        new_value: f64,
    ) -> Result<(f64, f64), LayoutError> {
        let old_track = self.require(track)?;
        let old_steal = self.require(steal_from)?;
        if track == steal_from {
            // Stealing from itself cannot change anything.
            return Ok((old_track, old_track));
        }
        let rest = old_track - new_value + old_steal;
        if rest < 0.0 && new_value <= old_track + old_steal {
            // Rounding noise when the track takes the whole pair.
            return Ok((new_value, 0.0));
        }
        Ok((new_value, rest))
    }

    /// The full mapping as it would look after the paired write, without
    /// touching `self`.
    pub fn with_pair(
        &self,
        track: &str,
        steal_from: &str,
        new_value: f64,
    ) -> Result<TrackValues, LayoutError> {
        let (track_value, steal_value) = self.paired(track, steal_from, new_value)?;
        let mut next = self.values.clone();
        next.insert(track.to_owned(), track_value);
        next.insert(steal_from.to_owned(), steal_value);
        Ok(next)
    }

    /// Apply the paired write. Both values are computed before either is
    /// stored, so a missing key leaves the axis untouched.
    pub(crate) fn write_pair(
        &mut self,
        track: &str,
        steal_from: &str,
        new_value: f64,
    ) -> Result<(f64, f64), LayoutError> {
        let (track_value, steal_value) = self.paired(track, steal_from, new_value)?;
        if let Some(slot) = self.values.get_mut(track) {
            *slot = track_value;
        }
        if let Some(slot) = self.values.get_mut(steal_from) {
            *slot = steal_value;
        }
        self.generation = self.generation.wrapping_add(1);
        Ok((track_value, steal_value))
    }

    /// Replace every value at once. Order follows `values`.
    pub fn replace(&mut self, values: TrackValues) -> Result<(), LayoutError> {
        validate_values(self.axis, &values)?;
        self.values = values;
        self.generation = self.generation.wrapping_add(1);
        Ok(())
    }
}

impl PartialEq for AxisTracks {
    fn eq(&self, other: &Self) -> bool {
        self.axis == other.axis && self.values == other.values
    }
}

pub(crate) fn validate_values(axis: Axis, values: &TrackValues) -> Result<(), LayoutError> {
    for (key, &value) in values {
        if !(value.is_finite() && value >= 0.0) {
            return Err(LayoutError::InvalidTrackValue {
                axis,
                key: key.clone(),
                value,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(pairs: &[(&str, f64)]) -> AxisTracks {
        AxisTracks::new(Axis::Columns, track_values(pairs.iter().copied()))
            .expect("valid test tracks")
    }

    #[test]
    fn keeps_declaration_order() {
        let tracks = columns(&[("z", 1.0), ("a", 2.0), ("m", 3.0)]);
        let keys: Vec<_> = tracks.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["z", "a", "m"]);
        assert_eq!(tracks.index_of("a"), Some(1));
        assert_eq!(tracks.key_at(2), Some("m"));
        assert_eq!(tracks.key_at(3), None);
    }

    #[test]
    fn paired_write_conserves_total() {
        let mut tracks = columns(&[("a", 1.0), ("b", 1.0), ("c", 2.0)]);
        let before = tracks.total();
        let (a, b) = tracks.write_pair("a", "b", 0.5).expect("known keys");
        assert_eq!((a, b), (0.5, 1.5));
        assert_eq!(tracks.get("c"), Some(2.0));
        assert!((tracks.total() - before).abs() < 1e-12);
    }

    #[test]
    fn taking_the_whole_pair_leaves_exactly_zero() {
        let mut tracks = columns(&[("a", 0.1), ("b", 0.2)]);
        let (a, b) = tracks.write_pair("a", "b", 0.1 + 0.2).expect("known keys");
        assert_eq!(a, 0.1 + 0.2);
        assert_eq!(b, 0.0);
    }

    #[test]
    fn unknown_key_writes_nothing() {
        let mut tracks = columns(&[("a", 1.0), ("b", 1.0)]);
        let err = tracks.write_pair("a", "nope", 0.5).expect_err("must fail");
        assert_eq!(err, LayoutError::not_found(Axis::Columns, "nope"));
        assert_eq!(tracks.get("a"), Some(1.0));
        assert_eq!(tracks.generation(), 0);
    }

    #[test]
    fn total_cache_follows_generation() {
        let mut tracks = columns(&[("a", 1.0), ("b", 3.0)]);
        assert_eq!(tracks.total(), 4.0);
        tracks
            .replace(track_values([("a", 2.0), ("b", 3.0)]))
            .expect("valid values");
        assert_eq!(tracks.generation(), 1);
        assert_eq!(tracks.total(), 5.0);
    }

    #[test]
    fn with_pair_leaves_source_untouched() {
        let tracks = columns(&[("a", 1.0), ("b", 1.0)]);
        let next = tracks.with_pair("b", "a", 1.25).expect("known keys");
        assert_eq!(next.get("a"), Some(&0.75));
        assert_eq!(next.get("b"), Some(&1.25));
        assert_eq!(tracks.get("b"), Some(1.0));
        assert_eq!(tracks.generation(), 0);
    }

    #[test]
    fn self_steal_is_inert() {
        let mut tracks = columns(&[("a", 1.0), ("b", 1.0)]);
        assert_eq!(tracks.write_pair("a", "a", 0.2), Ok((1.0, 1.0)));
        assert_eq!(tracks.get("a"), Some(1.0));
    }

    #[test]
    fn rejects_negative_and_non_finite_values() {
        let err = AxisTracks::new(Axis::Rows, track_values([("c", -1.0)]))
            .expect_err("negative value");
        assert!(matches!(err, LayoutError::InvalidTrackValue { axis: Axis::Rows, .. }));
        assert!(AxisTracks::new(Axis::Rows, track_values([("c", f64::NAN)])).is_err());
        assert!(AxisTracks::new(Axis::Rows, track_values([("c", 0.0)])).is_ok());
    }

    #[test]
    fn axis_projection_picks_coordinate() {
        let p = Point::new(3.0, 9.0);
        assert_eq!(Axis::Columns.project(p), 3.0);
        assert_eq!(Axis::Rows.project(p), 9.0);
        assert_eq!(Axis::Rows.to_string(), "rows");
        assert!(Axis::Columns.is_horizontal());
    }
}
