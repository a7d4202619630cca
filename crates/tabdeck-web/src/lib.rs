#![forbid(unsafe_code)]

//! `tabdeck-web` provides host-driven drag-and-reorder controllers for the
//! tabdeck dock and app picker.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding page pushes pointer, focus and frame
//!   signals and performs the [`HostCommand`]s it gets back.
//! - **Deterministic time**: every entry point takes the host's `now`;
//!   long-press and completion deadlines fire from `tick`.
//! - **No DOM access**: measurement goes through an injected
//!   [`GeometryProvider`](tabdeck_layout::GeometryProvider), rendering
//!   through [`ItemVisual`].
//!
//! Layers, bottom up:
//! - [`DragMachine`]: pure lifecycle transitions.
//! - [`ReorderController`]: listener lease, click guard, transition
//!   suppression and periodic measurement around one machine.
//! - [`DockReorder`] / [`PickerReorder`]: apply settled gestures to the
//!   collection owner and the shared visible count.

pub mod config;
pub mod controller;
pub mod dock;
pub mod machine;
pub mod picker;
pub mod settle;
pub mod visual;

pub use config::{LIFT_OPACITY, LIFT_ROTATION_DEG, ReorderConfig, SlotShape};
pub use controller::{
    ClickDecision, Dispatch, DispatchLog, DispatchOutcome, HostCommand, HostPhase, IgnoredReason,
    ReorderController, Settlement,
};
pub use dock::DockReorder;
pub use machine::{
    CancelReason, DragEffect, DragFrame, DragInput, DragMachine, DragMachineError, DragPhase,
    DragSession, DragTransition, NoopReason,
};
pub use picker::{PickerHint, PickerReorder};
pub use settle::apply_edit;
pub use visual::{ItemVisual, TransitionSpec, magnification};
