#![forbid(unsafe_code)]

//! Conversion between fractional (`fr`) and pixel (`px`) track units.
//!
//! A track's fractional value is its weight relative to the other tracks on
//! the same axis. Its pixel size is that weight's share of the axis span:
//!
//! ```text
//! px = fr * total_span / total_fractions
//! fr = px * total_fractions / total_span
//! ```
//!
//! # Failure Modes
//!
//! A non-positive (or non-finite) fraction total and a negative (or
//! non-finite) span are configuration errors. A zero span is valid: every
//! track is zero pixels wide and every pixel offset maps to zero fractions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Unit a track size is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Fractional weight.
    #[default]
    Fr,
    /// Absolute pixels.
    Px,
}

impl Unit {
    /// Suffix used in grid template tokens.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::Px => "px",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A validated `(total_fractions, total_span)` pair for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    total_fractions: f64,
    total_span: f64,
}

impl AxisScale {
    /// Validate and build a scale.
    pub fn new(total_fractions: f64, total_span: f64) -> Result<Self, LayoutError> {
        if !(total_fractions.is_finite() && total_fractions > 0.0) {
            return Err(LayoutError::NonPositiveFractionTotal {
                total: total_fractions,
            });
        }
        validate_span(total_span)?;
        Ok(Self {
            total_fractions,
            total_span,
        })
    }

    #[must_use]
    pub const fn total_fractions(&self) -> f64 {
        self.total_fractions
    }

    #[must_use]
    pub const fn total_span(&self) -> f64 {
        self.total_span
    }

    /// Pixels covered by one fractional unit.
    #[must_use]
    pub fn pixels_per_fraction(&self) -> f64 {
        self.total_span / self.total_fractions
    }

    #[must_use]
    pub fn to_pixels(&self, fraction: f64) -> f64 {
        fraction * self.total_span / self.total_fractions
    }

    /// Inverse of [`to_pixels`](Self::to_pixels) for a non-zero span.
    ///
    /// A zero span has no pixels to measure against, so every offset maps to
    /// 0 fractions and `to_fraction(to_pixels(f)) == f` does not hold there.
    #[must_use]
    pub fn to_fraction(&self, pixels: f64) -> f64 {
        if self.total_span == 0.0 {
            return 0.0;
        }
        pixels * self.total_fractions / self.total_span
    }
}

/// Convert a pixel length to fractional units.
///
/// Returns 0 for any `pixels` when `total_span` is 0.
pub fn to_fraction(pixels: f64, total_fractions: f64, total_span: f64) -> Result<f64, LayoutError> {
    Ok(AxisScale::new(total_fractions, total_span)?.to_fraction(pixels))
}

/// Convert a fractional value to pixels.
pub fn to_pixels(fraction: f64, total_fractions: f64, total_span: f64) -> Result<f64, LayoutError> {
    Ok(AxisScale::new(total_fractions, total_span)?.to_pixels(fraction))
}

/// Pixels covered by one fractional unit.
pub fn pixels_per_fraction(total_fractions: f64, total_span: f64) -> Result<f64, LayoutError> {
    Ok(AxisScale::new(total_fractions, total_span)?.pixels_per_fraction())
}

pub(crate) fn validate_span(span: f64) -> Result<f64, LayoutError> {
    if span.is_finite() && span >= 0.0 {
        Ok(span)
    } else {
        Err(LayoutError::InvalidSpan { span })
    }
}
