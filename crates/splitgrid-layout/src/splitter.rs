#![forbid(unsafe_code)]

//! Splitter declarations.
//!
//! A consumer declares a splitter with a [`SplitterConfig`]: the track it
//! edits, fractional bounds, where it sits on its pane, and optional
//! overrides. [`Splitter::resolve`] checks the declaration against the
//! layout and produces the immutable [`Splitter`] the drag adapter runs on.
//!
//! # Resolution rules
//!
//! | orientation | axis    | default polarity |
//! |-------------|---------|------------------|
//! | `start`     | columns | leading          |
//! | `end`       | columns | trailing         |
//! | `top`       | rows    | leading          |
//! | `bottom`    | rows    | trailing         |
//!
//! `is_leading` / `is_trailing` override the default polarity; setting both
//! is rejected.

use serde::{Deserialize, Serialize};
use splitgrid_core::EnvironmentId;

use crate::conservation::Polarity;
use crate::error::LayoutError;
use crate::store::LayoutStore;
use crate::tracks::Axis;

/// Where a splitter sits on its pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Start,
    #[default]
    End,
    Top,
    Bottom,
}

impl Orientation {
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Start | Self::End => Axis::Columns,
            Self::Top | Self::Bottom => Axis::Rows,
        }
    }

    #[must_use]
    pub const fn default_polarity(self) -> Polarity {
        match self {
            Self::Start | Self::Top => Polarity::Leading,
            Self::End | Self::Bottom => Polarity::Trailing,
        }
    }
}

/// Whether a splitter can be dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitterMode {
    /// Decorative boundary; input is ignored.
    Fixed,
    /// Draggable.
    Variable,
}

/// Fractional `[min, max]` range for the edited track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds")]
pub struct SplitterBounds {
    min: f64,
    max: f64,
}

#[derive(Deserialize)]
struct RawBounds {
    min: f64,
    max: f64,
}

impl TryFrom<RawBounds> for SplitterBounds {
    type Error = LayoutError;

    fn try_from(raw: RawBounds) -> Result<Self, Self::Error> {
        Self::new("<deserialized>", raw.min, raw.max)
    }
}

impl SplitterBounds {
    /// Validate `0 <= min <= max`, both finite.
    pub fn new(key: &str, min: f64, max: f64) -> Result<Self, LayoutError> {
        let valid = min.is_finite() && max.is_finite() && min >= 0.0 && min <= max;
        if !valid {
            return Err(LayoutError::InvalidBounds {
                key: key.to_owned(),
                min,
                max,
            });
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Declarative splitter description, as supplied by the consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Track this splitter edits.
    pub layout_key: String,
    /// Minimum track value, in fractional units.
    pub min: f64,
    /// Maximum track value, in fractional units.
    pub max: f64,
    #[serde(default)]
    pub orientation: Orientation,
    /// Force leading polarity.
    #[serde(default)]
    pub is_leading: bool,
    /// Force trailing polarity.
    #[serde(default)]
    pub is_trailing: bool,
    /// Disable dragging.
    #[serde(default)]
    pub is_fixed: bool,
    /// Environment whose events drive this splitter.
    #[serde(default)]
    pub environment: EnvironmentId,
}

impl SplitterConfig {
    /// A variable `end` splitter in the ambient environment.
    #[must_use]
    pub fn new(layout_key: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            layout_key: layout_key.into(),
            min,
            max,
            orientation: Orientation::default(),
            is_leading: false,
            is_trailing: false,
            is_fixed: false,
            environment: EnvironmentId::AMBIENT,
        }
    }

    #[must_use]
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn leading(mut self) -> Self {
        self.is_leading = true;
        self
    }

    #[must_use]
    pub fn trailing(mut self) -> Self {
        self.is_trailing = true;
        self
    }

    #[must_use]
    pub fn fixed(mut self) -> Self {
        self.is_fixed = true;
        self
    }

    #[must_use]
    pub fn environment(mut self, environment: EnvironmentId) -> Self {
        self.environment = environment;
        self
    }
}

/// A validated, active splitter.
///
/// Only [`Splitter::resolve`] builds one; it serializes for replay logs but
/// is never loaded back, since validity depends on the layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Splitter {
    axis: Axis,
    key: String,
    bounds: SplitterBounds,
    polarity: Polarity,
    mode: SplitterMode,
    environment: EnvironmentId,
}

impl Splitter {
    /// Check `config` against the layout in `store`.
    pub fn resolve<S>(config: &SplitterConfig, store: &S) -> Result<Self, LayoutError>
    where
        S: LayoutStore + ?Sized,
    {
        let key = config.layout_key.as_str();
        let polarity = match (config.is_leading, config.is_trailing) {
            (true, true) => {
                return Err(LayoutError::ConflictingPolarity {
                    key: key.to_owned(),
                });
            }
            (true, false) => Polarity::Leading,
            (false, true) => Polarity::Trailing,
            (false, false) => config.orientation.default_polarity(),
        };
        let bounds = SplitterBounds::new(key, config.min, config.max)?;

        let axis = config.orientation.axis();
        let tracks = store.tracks(axis);
        if tracks.is_empty() {
            return Err(LayoutError::EmptyAxis { axis });
        }
        if !tracks.contains(key) {
            return Err(LayoutError::UnknownTrack {
                axis,
                key: key.to_owned(),
            });
        }

        Ok(Self {
            axis,
            key: key.to_owned(),
            bounds,
            polarity,
            mode: if config.is_fixed {
                SplitterMode::Fixed
            } else {
                SplitterMode::Variable
            },
            environment: config.environment,
        })
    }

    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn bounds(&self) -> SplitterBounds {
        self.bounds
    }

    #[must_use]
    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }

    #[must_use]
    pub const fn mode(&self) -> SplitterMode {
        self.mode
    }

    #[must_use]
    pub const fn is_fixed(&self) -> bool {
        matches!(self.mode, SplitterMode::Fixed)
    }

    #[must_use]
    pub const fn environment(&self) -> EnvironmentId {
        self.environment
    }
}
