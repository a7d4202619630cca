#![forbid(unsafe_code)]

//! Core: geometry, pointer input, and animation primitives.
//!
//! # Role in tabdeck
//! `tabdeck-core` is the input and geometry layer. It owns the canonical
//! pointer event types, the CSS-pixel geometry used by hit-testing, and the
//! easing curves used by completion animations.
//!
//! # Primary responsibilities
//! - **Geometry**: [`Point`], [`Offset`], [`Size`], [`Rect`] in CSS pixels.
//! - **Input**: [`PointerEvent`], unifying mouse, pen, and touch into one shape.
//! - **Animation**: [`CubicBezier`] timing curves and [`OffsetTransition`]
//!   for hosts that animate frame by frame.
//! - **Logging**: `tracing` re-exports behind the `tracing` feature.
//!
//! # How it fits in the system
//! `tabdeck-layout` maps pointer positions to slots using the geometry types.
//! `tabdeck-web` consumes [`PointerEvent`] and drives animations from a
//! host-provided clock ([`Instant`]).

pub mod animation;
pub mod event;
pub mod geometry;
pub mod logging;

pub use animation::{CubicBezier, OffsetTransition};
pub use event::{PointerButton, PointerButtons, PointerEvent, PointerKind};
pub use geometry::{Offset, Point, Rect, Size};
pub use web_time::Instant;

#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
