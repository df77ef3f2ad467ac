#![forbid(unsafe_code)]

//! Splitter input events.
//!
//! Host adapters translate native pointer and keyboard events into
//! [`SplitterInput`] values. Every event carries the [`EnvironmentId`] of the
//! window-like object it was observed on, so a splitter bound to one
//! environment can ignore events routed from another.
//!
//! # Invariants
//!
//! 1. Pointer events always carry a pointer id; a drag is owned by the
//!    pointer that started it.
//! 2. `Cancel` never carries a position: a canceled gesture commits nothing
//!    beyond the last processed move.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Identity of the environment (window, document, surface) event listeners
/// attach to.
///
/// [`EnvironmentId::AMBIENT`] stands for the host's global environment and is
/// what splitters bind to unless configured otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct EnvironmentId(u64);

impl EnvironmentId {
    /// The ambient (global) environment.
    pub const AMBIENT: Self = Self(0);

    /// Create an environment id from a raw host handle.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw host handle.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Whether this is the ambient environment.
    #[inline]
    pub const fn is_ambient(self) -> bool {
        self.0 == 0
    }
}

/// Why an in-flight gesture was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum CancelReason {
    /// The environment lost focus (window blur).
    Blur,
    /// The user pressed Escape.
    EscapeKey,
    /// The host canceled the pointer stream (touch interrupted, capture lost).
    PointerCancel,
    /// Canceled by application code.
    Programmatic,
}

/// Discrete keys a focused splitter responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum NavigationKey {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
}

impl NavigationKey {
    /// Whether the key moves along the horizontal axis.
    #[inline]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::ArrowLeft | Self::ArrowRight)
    }

    /// Whether the key moves along the vertical axis.
    #[inline]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::ArrowUp | Self::ArrowDown)
    }

    /// Unit direction of an arrow key: `+1` toward increasing coordinates
    /// (right, down), `-1` toward decreasing ones. `None` for `Home`/`End`.
    #[inline]
    pub const fn step_sign(self) -> Option<f64> {
        match self {
            Self::ArrowRight | Self::ArrowDown => Some(1.0),
            Self::ArrowLeft | Self::ArrowUp => Some(-1.0),
            Self::Home | Self::End => None,
        }
    }
}

/// One input event delivered to a splitter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "event", rename_all = "snake_case")
)]
pub enum SplitterInput {
    /// Primary button pressed on the splitter handle.
    PointerDown {
        pointer_id: u32,
        position: Point,
        #[cfg_attr(feature = "serde", serde(default))]
        environment: EnvironmentId,
    },
    /// Pointer moved while the environment is listening.
    PointerMove {
        pointer_id: u32,
        position: Point,
        #[cfg_attr(feature = "serde", serde(default))]
        environment: EnvironmentId,
    },
    /// Pointer released.
    PointerUp {
        pointer_id: u32,
        position: Point,
        #[cfg_attr(feature = "serde", serde(default))]
        environment: EnvironmentId,
    },
    /// Navigation key pressed while the splitter has focus.
    Key {
        key: NavigationKey,
        #[cfg_attr(feature = "serde", serde(default))]
        environment: EnvironmentId,
    },
    /// The gesture collaborator abandoned the gesture.
    Cancel {
        reason: CancelReason,
        #[cfg_attr(feature = "serde", serde(default))]
        environment: EnvironmentId,
    },
}

impl SplitterInput {
    /// Pointer press in the ambient environment.
    pub const fn pointer_down(pointer_id: u32, position: Point) -> Self {
        Self::PointerDown {
            pointer_id,
            position,
            environment: EnvironmentId::AMBIENT,
        }
    }

    /// Pointer move in the ambient environment.
    pub const fn pointer_move(pointer_id: u32, position: Point) -> Self {
        Self::PointerMove {
            pointer_id,
            position,
            environment: EnvironmentId::AMBIENT,
        }
    }

    /// Pointer release in the ambient environment.
    pub const fn pointer_up(pointer_id: u32, position: Point) -> Self {
        Self::PointerUp {
            pointer_id,
            position,
            environment: EnvironmentId::AMBIENT,
        }
    }

    /// Key press in the ambient environment.
    pub const fn key(key: NavigationKey) -> Self {
        Self::Key {
            key,
            environment: EnvironmentId::AMBIENT,
        }
    }

    /// Cancellation in the ambient environment.
    pub const fn cancel(reason: CancelReason) -> Self {
        Self::Cancel {
            reason,
            environment: EnvironmentId::AMBIENT,
        }
    }

    /// Re-tag the event with a different environment.
    #[must_use]
    pub const fn in_environment(self, id: EnvironmentId) -> Self {
        match self {
            Self::PointerDown {
                pointer_id,
                position,
                ..
            } => Self::PointerDown {
                pointer_id,
                position,
                environment: id,
            },
            Self::PointerMove {
                pointer_id,
                position,
                ..
            } => Self::PointerMove {
                pointer_id,
                position,
                environment: id,
            },
            Self::PointerUp {
                pointer_id,
                position,
                ..
            } => Self::PointerUp {
                pointer_id,
                position,
                environment: id,
            },
            Self::Key { key, .. } => Self::Key {
                key,
                environment: id,
            },
            Self::Cancel { reason, .. } => Self::Cancel {
                reason,
                environment: id,
            },
        }
    }

    /// Environment the event was observed in.
    pub const fn environment(&self) -> EnvironmentId {
        match *self {
            Self::PointerDown { environment, .. }
            | Self::PointerMove { environment, .. }
            | Self::PointerUp { environment, .. }
            | Self::Key { environment, .. }
            | Self::Cancel { environment, .. } => environment,
        }
    }

    /// Pointer id for pointer events.
    pub const fn pointer_id(&self) -> Option<u32> {
        match *self {
            Self::PointerDown { pointer_id, .. }
            | Self::PointerMove { pointer_id, .. }
            | Self::PointerUp { pointer_id, .. } => Some(pointer_id),
            Self::Key { .. } | Self::Cancel { .. } => None,
        }
    }

    /// Pointer position for pointer events.
    pub const fn position(&self) -> Option<Point> {
        match *self {
            Self::PointerDown { position, .. }
            | Self::PointerMove { position, .. }
            | Self::PointerUp { position, .. } => Some(position),
            Self::Key { .. } | Self::Cancel { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_default_to_ambient_environment() {
        let events = [
            SplitterInput::pointer_down(1, Point::new(1.0, 2.0)),
            SplitterInput::pointer_move(1, Point::new(3.0, 2.0)),
            SplitterInput::pointer_up(1, Point::new(3.0, 2.0)),
            SplitterInput::key(NavigationKey::Home),
            SplitterInput::cancel(CancelReason::Blur),
        ];
        for event in events {
            assert!(event.environment().is_ambient(), "{event:?}");
        }
    }

    #[test]
    fn retagging_preserves_payload() {
        let env = EnvironmentId::new(7);
        let moved = SplitterInput::pointer_move(4, Point::new(10.0, 20.0)).in_environment(env);
        assert_eq!(moved.environment(), env);
        assert_eq!(moved.pointer_id(), Some(4));
        assert_eq!(moved.position(), Some(Point::new(10.0, 20.0)));

        let key = SplitterInput::key(NavigationKey::End).in_environment(env);
        assert_eq!(key.environment().get(), 7);
        assert_eq!(key.pointer_id(), None);
        assert_eq!(key.position(), None);
    }

    #[test]
    fn arrow_keys_report_axis_and_sign() {
        assert!(NavigationKey::ArrowLeft.is_horizontal());
        assert!(NavigationKey::ArrowDown.is_vertical());
        assert!(!NavigationKey::Home.is_horizontal());
        assert!(!NavigationKey::End.is_vertical());
        assert_eq!(NavigationKey::ArrowRight.step_sign(), Some(1.0));
        assert_eq!(NavigationKey::ArrowUp.step_sign(), Some(-1.0));
        assert_eq!(NavigationKey::Home.step_sign(), None);
    }
}
