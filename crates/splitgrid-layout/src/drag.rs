#![forbid(unsafe_code)]

//! Drag-to-layout adapter.
//!
//! [`SplitterDrag`] is a per-splitter lifecycle machine. It consumes
//! [`SplitterInput`] events from the gesture collaborator and turns pointer
//! motion into clamped track values, which it hands to the conservation
//! engine.
//!
//! ```text
//! Idle --down--> Dragging --move--> Dragging
//!   ^                |
//!   +----up/cancel---+
//! ```
//!
//! # Invariants
//!
//! 1. The edited track's value lands inside the splitter's bounds, capped
//!    by invariant 2; a clamped request lands exactly on the violated end.
//! 2. The neighbor never goes negative: the upper bound is lowered to the
//!    pair's combined size, and that cap wins over `min` when they conflict.
//! 3. Moves are measured from the press origin, not from the previous move,
//!    so a controlled consumer that ignores proposals still sees stable values.
//! 4. Release and cancel commit nothing beyond the last processed move.
//! 5. Every event yields exactly one [`DragTransition`] with a monotonically
//!    increasing `transition_id`.
//! 6. Presses and moves with a non-finite coordinate are ignored.
//!
//! # Direction
//!
//! Pointer motion toward increasing coordinates grows a trailing track and
//! shrinks a leading one. Right-to-left layouts flip this for column
//! splitters only.

use serde::{Deserialize, Serialize};
use splitgrid_core::{CancelReason, NavigationKey, Point, SplitterInput};
use tracing::{debug, trace};

use crate::conservation::{ConservationOutcome, conserve, resolve_neighbor};
use crate::error::LayoutError;
use crate::query::PaneSpans;
use crate::splitter::Splitter;
use crate::store::LayoutStore;
use crate::tracks::Axis;
use crate::units::AxisScale;

/// Default arrow-key step in pixels.
pub const DEFAULT_KEYBOARD_STEP: f64 = 50.0;

/// Horizontal flow of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// Input tuning knobs.
///
/// Deserialization goes through [`DragTuning::new`], so a loaded config can
/// never carry an invalid step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDragTuning")]
pub struct DragTuning {
    keyboard_step: f64,
}

#[derive(Deserialize)]
struct RawDragTuning {
    keyboard_step: f64,
}

impl TryFrom<RawDragTuning> for DragTuning {
    type Error = LayoutError;

    fn try_from(raw: RawDragTuning) -> Result<Self, Self::Error> {
        Self::new(raw.keyboard_step)
    }
}

impl DragTuning {
    /// Tuning with an explicit arrow-key step in pixels.
    pub fn new(keyboard_step: f64) -> Result<Self, LayoutError> {
        if !(keyboard_step.is_finite() && keyboard_step > 0.0) {
            return Err(LayoutError::InvalidKeyboardStep {
                step: keyboard_step,
            });
        }
        Ok(Self { keyboard_step })
    }

    #[must_use]
    pub const fn keyboard_step(&self) -> f64 {
        self.keyboard_step
    }
}

impl Default for DragTuning {
    fn default() -> Self {
        Self {
            keyboard_step: DEFAULT_KEYBOARD_STEP,
        }
    }
}

/// Everything the adapter needs from the enclosing layout besides the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragContext {
    pub spans: PaneSpans,
    pub direction: Direction,
    pub tuning: DragTuning,
}

impl DragContext {
    #[must_use]
    pub fn new(spans: PaneSpans) -> Self {
        Self {
            spans,
            direction: Direction::default(),
            tuning: DragTuning::default(),
        }
    }

    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn with_tuning(mut self, tuning: DragTuning) -> Self {
        self.tuning = tuning;
        self
    }
}

/// Drag lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    Idle,
    Dragging {
        pointer_id: u32,
        /// Pointer coordinate along the splitter axis at press time.
        origin: f64,
        /// Edited track's pixel size at press time.
        origin_px: f64,
        /// Edited track's pixel size after the last processed move.
        last_px: f64,
    },
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    PointerMismatch,
    ForeignEnvironment,
    FixedSplitter,
    /// No neighbor to steal space from.
    Boundary,
    ActiveStateDisallowsDiscreteInput,
    KeyOffAxis,
    /// Pointer position with a NaN or infinite coordinate.
    NonFinitePosition,
}

/// One applied (or proposed) track change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackResize {
    pub neighbor: String,
    /// Edited track's new value, in fractional units.
    pub value: f64,
    /// Edited track's new value, in pixels.
    pub value_px: f64,
    pub neighbor_value: f64,
    /// The request fell outside the bounds and was clamped.
    pub clamped: bool,
    /// Controlled layout: proposed to the consumer, not stored.
    pub proposed: bool,
}

/// Effect of one lifecycle step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragEffect {
    Started {
        pointer_id: u32,
        origin_px: f64,
    },
    Resized {
        pointer_id: u32,
        resize: TrackResize,
    },
    Released {
        pointer_id: u32,
        value_px: f64,
    },
    Canceled {
        pointer_id: Option<u32>,
        reason: CancelReason,
    },
    KeyboardApplied {
        key: NavigationKey,
        resize: TrackResize,
    },
    Noop {
        reason: DragNoopReason,
    },
}

/// One state-machine transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragTransition {
    pub transition_id: u64,
    pub from: DragState,
    pub to: DragState,
    pub effect: DragEffect,
}

/// Lifecycle machine binding one splitter to its layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitterDrag {
    splitter: Splitter,
    state: DragState,
    transition_counter: u64,
}

impl SplitterDrag {
    #[must_use]
    pub fn new(splitter: Splitter) -> Self {
        Self {
            splitter,
            state: DragState::Idle,
            transition_counter: 0,
        }
    }

    #[must_use]
    pub fn splitter(&self) -> &Splitter {
        &self.splitter
    }

    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    /// Whether a gesture is in flight.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    /// Drop any in-flight gesture without touching the layout.
    ///
    /// Returns `None` if already idle.
    pub fn force_cancel(&mut self) -> Option<DragTransition> {
        let DragState::Dragging { pointer_id, .. } = self.state else {
            return None;
        };
        Some(self.transition(
            DragState::Idle,
            DragEffect::Canceled {
                pointer_id: Some(pointer_id),
                reason: CancelReason::Programmatic,
            },
        ))
    }

    /// Apply one input event.
    pub fn handle<S>(
        &mut self,
        store: &mut S,
        context: &DragContext,
        input: &SplitterInput,
    ) -> Result<DragTransition, LayoutError>
    where
        S: LayoutStore + ?Sized,
    {
        if input.environment() != self.splitter.environment() {
            return Ok(self.noop(DragNoopReason::ForeignEnvironment));
        }
        let unusable_position = matches!(
            *input,
            SplitterInput::PointerDown { position, .. } | SplitterInput::PointerMove { position, .. }
                if !position.is_finite()
        );
        if unusable_position {
            return Ok(self.noop(DragNoopReason::NonFinitePosition));
        }

        match (self.state, *input) {
            (DragState::Idle, SplitterInput::PointerDown { .. } | SplitterInput::Key { .. })
                if self.splitter.is_fixed() =>
            {
                Ok(self.noop(DragNoopReason::FixedSplitter))
            }
            (
                DragState::Idle,
                SplitterInput::PointerDown {
                    pointer_id,
                    position,
                    ..
                },
            ) => self.press(store, context, pointer_id, position),
            (DragState::Idle, SplitterInput::Key { key, .. }) => {
                self.keyboard(store, context, key)
            }
            (DragState::Idle, _) => Ok(self.noop(DragNoopReason::IdleWithoutActiveDrag)),

            (
                DragState::Dragging {
                    pointer_id,
                    origin,
                    origin_px,
                    ..
                },
                SplitterInput::PointerMove {
                    pointer_id: incoming,
                    position,
                    ..
                },
            ) => {
                if incoming != pointer_id {
                    return Ok(self.noop(DragNoopReason::PointerMismatch));
                }
                let coordinate = self.splitter.axis().project(position);
                let delta = (coordinate - origin) * self.growth_sign(context.direction);
                self.drag_to(store, context, pointer_id, origin_px + delta)
            }
            (
                DragState::Dragging {
                    pointer_id,
                    last_px,
                    ..
                },
                SplitterInput::PointerUp {
                    pointer_id: incoming,
                    ..
                },
            ) => {
                if incoming != pointer_id {
                    return Ok(self.noop(DragNoopReason::PointerMismatch));
                }
                debug!(key = self.splitter.key(), pointer_id, value_px = last_px, "drag released");
                Ok(self.transition(
                    DragState::Idle,
                    DragEffect::Released {
                        pointer_id,
                        value_px: last_px,
                    },
                ))
            }
            (DragState::Dragging { pointer_id, .. }, SplitterInput::Cancel { reason, .. }) => {
                debug!(key = self.splitter.key(), pointer_id, ?reason, "drag canceled");
                Ok(self.transition(
                    DragState::Idle,
                    DragEffect::Canceled {
                        pointer_id: Some(pointer_id),
                        reason,
                    },
                ))
            }
            (DragState::Dragging { .. }, SplitterInput::PointerDown { .. }) => {
                Ok(self.noop(DragNoopReason::ActiveDragAlreadyInProgress))
            }
            (DragState::Dragging { .. }, SplitterInput::Key { .. }) => {
                Ok(self.noop(DragNoopReason::ActiveStateDisallowsDiscreteInput))
            }
        }
    }

    fn press<S>(
        &mut self,
        store: &mut S,
        context: &DragContext,
        pointer_id: u32,
        position: Point,
    ) -> Result<DragTransition, LayoutError>
    where
        S: LayoutStore + ?Sized,
    {
        let axis = self.splitter.axis();
        let tracks = store.tracks(axis);
        if resolve_neighbor(tracks, self.splitter.key(), self.splitter.polarity())?.is_none() {
            debug!(axis = %axis, key = self.splitter.key(), "edge splitter press ignored");
            return Ok(self.noop(DragNoopReason::Boundary));
        }
        let value = tracks.require(self.splitter.key())?;
        let origin_px = tracks.scale(context.spans.span(axis))?.to_pixels(value);
        debug!(axis = %axis, key = self.splitter.key(), pointer_id, origin_px, "drag started");
        Ok(self.transition(
            DragState::Dragging {
                pointer_id,
                origin: axis.project(position),
                origin_px,
                last_px: origin_px,
            },
            DragEffect::Started {
                pointer_id,
                origin_px,
            },
        ))
    }

    fn drag_to<S>(
        &mut self,
        store: &mut S,
        context: &DragContext,
        pointer_id: u32,
        requested_px: f64,
    ) -> Result<DragTransition, LayoutError>
    where
        S: LayoutStore + ?Sized,
    {
        let Some(resize) = self.resize(store, context, Request::Pixels(requested_px))? else {
            return Ok(self.noop(DragNoopReason::Boundary));
        };
        trace!(
            key = self.splitter.key(),
            value = resize.value,
            value_px = resize.value_px,
            clamped = resize.clamped,
            "drag resized track"
        );
        let to = match self.state {
            DragState::Dragging {
                pointer_id,
                origin,
                origin_px,
                ..
            } => DragState::Dragging {
                pointer_id,
                origin,
                origin_px,
                last_px: resize.value_px,
            },
            DragState::Idle => DragState::Idle,
        };
        Ok(self.transition(to, DragEffect::Resized { pointer_id, resize }))
    }

    fn keyboard<S>(
        &mut self,
        store: &mut S,
        context: &DragContext,
        key: NavigationKey,
    ) -> Result<DragTransition, LayoutError>
    where
        S: LayoutStore + ?Sized,
    {
        let axis = self.splitter.axis();
        let request = match key {
            NavigationKey::Home => Request::Fraction(self.splitter.bounds().min()),
            NavigationKey::End => Request::Fraction(self.splitter.bounds().max()),
            arrow => {
                let on_axis = match axis {
                    Axis::Columns => arrow.is_horizontal(),
                    Axis::Rows => arrow.is_vertical(),
                };
                let Some(step_sign) = arrow.step_sign().filter(|_| on_axis) else {
                    return Ok(self.noop(DragNoopReason::KeyOffAxis));
                };
                let tracks = store.tracks(axis);
                let current = tracks.require(self.splitter.key())?;
                let current_px = tracks.scale(context.spans.span(axis))?.to_pixels(current);
                let step = step_sign * context.tuning.keyboard_step();
                Request::Pixels(current_px + step * self.growth_sign(context.direction))
            }
        };

        let Some(resize) = self.resize(store, context, request)? else {
            return Ok(self.noop(DragNoopReason::Boundary));
        };
        trace!(key = self.splitter.key(), ?key, value = resize.value, "keyboard resized track");
        Ok(self.transition(DragState::Idle, DragEffect::KeyboardApplied { key, resize }))
    }

    /// Clamp the request to the splitter bounds and hand it to the
    /// conservation engine. `None` when the splitter has no neighbor.
    fn resize<S>(
        &self,
        store: &mut S,
        context: &DragContext,
        request: Request,
    ) -> Result<Option<TrackResize>, LayoutError>
    where
        S: LayoutStore + ?Sized,
    {
        let axis = self.splitter.axis();
        let tracks = store.tracks(axis);
        let key = self.splitter.key();
        let Some(neighbor) = resolve_neighbor(tracks, key, self.splitter.polarity())? else {
            return Ok(None);
        };
        // The track can grow at most by what its neighbor holds.
        let pair = tracks.require(key)? + tracks.require(neighbor)?;
        let bounds = self.splitter.bounds();
        let upper = bounds.max().min(pair);
        let lower = bounds.min().min(upper);
        let scale = tracks.scale(context.spans.span(axis))?;
        let (value, clamped) = clamp_request(scale, request, lower, upper);

        let resize = match conserve(
            store,
            axis,
            self.splitter.key(),
            self.splitter.polarity(),
            value,
        )? {
            ConservationOutcome::BoundaryNoop => None,
            ConservationOutcome::Applied {
                neighbor,
                track_value,
                neighbor_value,
            } => Some(TrackResize {
                neighbor,
                value: track_value,
                value_px: scale.to_pixels(track_value),
                neighbor_value,
                clamped,
                proposed: false,
            }),
            ConservationOutcome::Proposed {
                neighbor,
                track_value,
                neighbor_value,
            } => Some(TrackResize {
                neighbor,
                value: track_value,
                value_px: scale.to_pixels(track_value),
                neighbor_value,
                clamped,
                proposed: true,
            }),
        };
        Ok(resize)
    }

    fn growth_sign(&self, direction: Direction) -> f64 {
        let sign = self.splitter.polarity().sign();
        if direction == Direction::Rtl && self.splitter.axis().is_horizontal() {
            -sign
        } else {
            sign
        }
    }

    fn noop(&mut self, reason: DragNoopReason) -> DragTransition {
        self.transition(self.state, DragEffect::Noop { reason })
    }

    fn transition(&mut self, to: DragState, effect: DragEffect) -> DragTransition {
        let from = self.state;
        self.state = to;
        self.transition_counter = self.transition_counter.saturating_add(1);
        DragTransition {
            transition_id: self.transition_counter,
            from,
            to,
            effect,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Request {
    Pixels(f64),
    Fraction(f64),
}

/// Clamp `request` to `[lower, upper]` fractions. A request outside the range
/// lands exactly on the violated end.
fn clamp_request(scale: AxisScale, request: Request, lower: f64, upper: f64) -> (f64, bool) {
    match request {
        Request::Fraction(value) => (value.clamp(lower, upper), !(lower..=upper).contains(&value)),
        Request::Pixels(px) => {
            let (lower_px, upper_px) = (scale.to_pixels(lower), scale.to_pixels(upper));
            if px <= lower_px {
                (lower, px < lower_px)
            } else if px >= upper_px {
                (upper, px > upper_px)
            } else {
                (scale.to_fraction(px).clamp(lower, upper), false)
            }
        }
    }
}
