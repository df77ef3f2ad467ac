#![forbid(unsafe_code)]

//! Resizable pane layouts built from conserved fractional tracks.
//!
//! A layout has two independent axes, rows and columns. Each axis holds an
//! ordered set of named tracks sized in fractional units. Splitters edit one
//! track at a time; whatever the track gains or loses is taken from its
//! neighbor, so an axis' total never changes while dragging.
//!
//! ```text
//!   columns: a=1 b=1        drag a's end splitter left by 125px
//!   |----a----|----b----|  ------------------------------------>  |-a-|------b------|
//!        250px     250px                                          125px     375px
//! ```
//!
//! # Layers
//!
//! - [`units`]: `fr` <-> `px` conversion.
//! - [`tracks`]: per-axis ordered track values.
//! - [`store`]: uncontrolled and controlled state ownership.
//! - [`conservation`]: neighbor resolution and paired writes.
//! - [`splitter`]: splitter declarations and validation.
//! - [`drag`]: pointer and keyboard input turned into clamped resizes.
//! - [`query`]: read-only values and grid templates.
//! - [`provider`]: the facade tying these together.

pub mod conservation;
pub mod drag;
pub mod error;
pub mod provider;
pub mod query;
pub mod splitter;
pub mod store;
pub mod tracks;
pub mod units;

pub use conservation::{ConservationOutcome, Polarity, conserve, resolve_neighbor};
pub use drag::{
    DEFAULT_KEYBOARD_STEP, Direction, DragContext, DragEffect, DragNoopReason, DragState,
    DragTransition, DragTuning, SplitterDrag, TrackResize,
};
pub use error::{LayoutError, LayoutErrorKind};
pub use provider::{PaneProvider, PaneProviderConfig};
pub use query::{LayoutQuery, PaneSpans};
pub use splitter::{Orientation, Splitter, SplitterBounds, SplitterConfig, SplitterMode};
pub use store::{
    ChangeHandler, ControlledStore, DeltaOutcome, LayoutMode, LayoutStore, UncontrolledStore,
};
pub use tracks::{Axis, AxisTracks, TrackValues, track_values};
pub use units::{AxisScale, Unit};

pub use splitgrid_core::{CancelReason, EnvironmentId, NavigationKey, Point, SplitterInput};
