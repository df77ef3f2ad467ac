#![forbid(unsafe_code)]

//! Core: input vocabulary for splitgrid splitters.
//!
//! # Role in splitgrid
//! `splitgrid-core` is the boundary with the input-gesture collaborator. It
//! defines the pointer positions and discrete input events a host adapter
//! (DOM listener, winit window, terminal mouse reader) translates its native
//! events into before handing them to `splitgrid-layout`.
//!
//! # Primary responsibilities
//! - **Point**: pointer coordinates in layout pixels.
//! - **SplitterInput**: press / move / release / key / cancel events tagged
//!   with the pointer and the environment they were observed in.
//! - **EnvironmentId**: identity of the window-like object listeners attach to.
//!
//! Nothing here owns layout state; the layout engine consumes these values
//! and decides what they mean for a splitter.

pub mod event;
pub mod geometry;

pub use event::{CancelReason, EnvironmentId, NavigationKey, SplitterInput};
pub use geometry::Point;
