#![forbid(unsafe_code)]

//! Host-driven reorder controller.
//!
//! This module bridges browser pointer, focus and frame signals into
//! [`DragMachine`] inputs while enforcing:
//! - one session at a time, with global listeners attached for exactly the
//!   lifetime of that session,
//! - click suppression for gestures that moved, and
//! - one frame without transitions after every splice.
//!
//! The host owns the clock: every entry point takes `now`. Pending
//! long-press and completion deadlines fire from [`ReorderController::tick`],
//! or from the next pointer signal when that arrives first.

use tabdeck_core::{Instant, Offset, Point, PointerEvent};
use tabdeck_layout::{
    GeometryProvider, GridMetrics, Region, RowMetrics, SlotLayout, SurfaceGeometry,
};

use crate::config::{ReorderConfig, SlotShape};
use crate::machine::{
    CancelReason, DragEffect, DragFrame, DragInput, DragMachine, DragMachineError, DragPhase,
    DragSession, DragTransition,
};
use crate::visual::{ItemVisual, TransitionSpec};

/// Side effect the host must perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostCommand {
    /// Listen for move/up/cancel signals on the window.
    AttachGlobalListeners,
    DetachGlobalListeners,
    /// Enter or leave drag mode (grabbing cursor, no text selection).
    SetDragCursor(bool),
    /// Close the surface the drag started on.
    CloseSurface,
    /// Call [`ReorderController::animation_frame`] on the next frame.
    RequestAnimationFrame,
}

/// Host signal recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostPhase {
    PointerDown,
    PointerMove,
    PointerUp,
    ContextMenu,
    Blur,
    VisibilityChange,
    Tick,
    AnimationFrame,
    Teardown,
}

/// Why a host signal never reached the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoredReason {
    NoActiveSession,
    NothingPending,
    MachineRejectedEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchOutcome {
    Forwarded,
    HostStateUpdated,
    Ignored(IgnoredReason),
}

/// Structured record of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchLog {
    pub phase: HostPhase,
    pub transition_id: Option<u64>,
    pub outcome: DispatchOutcome,
}

/// A settled gesture the collection owner must apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Settlement {
    /// Splice `from` into `to`.
    Reorder { from: usize, to: usize },
    /// The item at `index` was dropped on the surface's transfer region.
    Transfer { index: usize, region: Region },
}

/// Result of one host signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub transition: Option<DragTransition>,
    pub commands: Vec<HostCommand>,
    pub settled: Option<Settlement>,
    pub log: DispatchLog,
}

impl Dispatch {
    fn ignored(phase: HostPhase, reason: IgnoredReason) -> Self {
        Self {
            transition: None,
            commands: Vec::new(),
            settled: None,
            log: DispatchLog {
                phase,
                transition_id: None,
                outcome: DispatchOutcome::Ignored(reason),
            },
        }
    }

    fn host_state_updated(phase: HostPhase, commands: Vec<HostCommand>) -> Self {
        Self {
            transition: None,
            commands,
            settled: None,
            log: DispatchLog {
                phase,
                transition_id: None,
                outcome: DispatchOutcome::HostStateUpdated,
            },
        }
    }

    /// Fold a timer dispatch that fired on the way into this one.
    fn after(due: Option<Self>, mut next: Self) -> Self {
        let Some(due) = due else {
            return next;
        };
        let mut commands = due.commands;
        commands.append(&mut next.commands);
        next.commands = commands;
        next.settled = next.settled.or(due.settled);
        if next.transition.is_none() {
            next.transition = due.transition;
            next.log = DispatchLog {
                phase: next.log.phase,
                ..due.log
            };
        }
        next
    }

    /// Whether the host must perform `command`.
    #[must_use]
    pub fn has_command(&self, command: HostCommand) -> bool {
        self.commands.contains(&command)
    }
}

/// What to do with a click on an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickDecision {
    Navigate(usize),
    Suppressed,
}

/// Moved flag that outlives the gesture so the trailing click sees it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct ClickGuard {
    suppress: bool,
    until: Option<Instant>,
}

impl ClickGuard {
    fn hold(&mut self) {
        self.suppress = true;
        self.until = None;
    }

    fn release(&mut self, has_moved: bool, until: Instant) {
        if has_moved || self.suppress {
            self.suppress = true;
            self.until = Some(until);
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn expire(&mut self, now: Instant) {
        if self.until.is_some_and(|until| now >= until) {
            self.clear();
        }
    }
}

/// Drag-and-reorder controller for one collection surface.
///
/// The controller never owns the collection. Settled gestures come back as
/// [`Settlement`]s for the owner to apply.
#[derive(Debug)]
pub struct ReorderController<G> {
    machine: DragMachine,
    config: ReorderConfig,
    geometry: G,
    measured: Option<SurfaceGeometry>,
    measured_at: Option<Instant>,
    len: usize,
    listeners_attached: bool,
    drag_cursor: bool,
    click_guard: ClickGuard,
    transitions_suppressed: bool,
    surface_open: bool,
}

impl<G: GeometryProvider> ReorderController<G> {
    /// Construct a controller over `len` items, validating `config`.
    pub fn new(config: ReorderConfig, geometry: G, len: usize) -> Result<Self, DragMachineError> {
        let machine = DragMachine::new(&config)?;
        Ok(Self {
            machine,
            config,
            geometry,
            measured: None,
            measured_at: None,
            len,
            listeners_attached: false,
            drag_cursor: false,
            click_guard: ClickGuard::default(),
            transitions_suppressed: false,
            surface_open: false,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ReorderConfig {
        &self.config
    }

    #[must_use]
    pub const fn geometry(&self) -> &G {
        &self.geometry
    }

    #[must_use]
    pub const fn machine_state(&self) -> DragSession {
        self.machine.state()
    }

    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        self.machine.phase()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of laid-out items. Takes effect on the next measurement.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
    }

    /// Whether the host currently holds global listeners for a session.
    #[must_use]
    pub const fn listeners_attached(&self) -> bool {
        self.listeners_attached
    }

    /// Whether item transitions are disabled for the current frame.
    #[must_use]
    pub const fn transitions_suppressed(&self) -> bool {
        self.transitions_suppressed
    }

    /// Last measurement, if any.
    #[must_use]
    pub const fn measured(&self) -> Option<SurfaceGeometry> {
        self.measured
    }

    /// Slot layout derived from the last measurement.
    #[must_use]
    pub fn slot_layout(&self) -> Option<SlotLayout> {
        self.measured.as_ref().and_then(|g| self.layout_for(g))
    }

    /// Region the held item is over, while dragging.
    #[must_use]
    pub fn drag_region(&self) -> Option<Region> {
        match self.machine.state() {
            DragSession::Dragging { region, .. } => Some(region),
            _ => None,
        }
    }

    /// Eased offset of the completing item, for frame-by-frame hosts.
    #[must_use]
    pub fn completion_offset_at(&self, now: Instant) -> Option<Offset> {
        self.machine.completion_offset_at(now)
    }

    /// Re-measure the surface now.
    pub fn relayout(&mut self, now: Instant) -> Option<SurfaceGeometry> {
        self.measured = self.geometry.measure();
        self.measured_at = Some(now);
        if self.measured.is_none() {
            tracing::debug!("surface not laid out, skipping measurement");
        }
        self.measured
    }

    /// Mark the surface open or closed. An open surface is re-measured
    /// periodically from [`tick`](Self::tick) when the config asks for it.
    pub fn set_surface_open(&mut self, open: bool, now: Instant) {
        self.surface_open = open;
        if open {
            self.relayout(now);
        }
    }

    #[must_use]
    pub const fn surface_open(&self) -> bool {
        self.surface_open
    }

    /// Handle pointer-down (or touch-start) on item `index`.
    pub fn pointer_down(&mut self, index: usize, event: PointerEvent, now: Instant) -> Dispatch {
        let due = self.fire_due(now);
        self.relayout(now);
        let frame = self.frame_at(event.position);
        let dispatch = self.forward(
            HostPhase::PointerDown,
            DragInput::Press {
                index,
                pointer_id: event.pointer_id,
                button: event.button,
                position: event.position,
                at: now,
            },
            frame,
            now,
        );
        Dispatch::after(due, dispatch)
    }

    /// Handle a global pointer-move (or touch-move).
    pub fn pointer_move(&mut self, event: PointerEvent, now: Instant) -> Dispatch {
        let due = self.fire_due(now);
        if !self.machine.is_active() {
            let ignored = Dispatch::ignored(HostPhase::PointerMove, IgnoredReason::NoActiveSession);
            return Dispatch::after(due, ignored);
        }
        if self.measured.is_none() {
            self.relayout(now);
        }
        let frame = self.frame_at(event.position);
        let dispatch = self.forward(
            HostPhase::PointerMove,
            DragInput::Move {
                pointer_id: event.pointer_id,
                position: event.position,
                primary_held: event.primary_held(),
                at: now,
            },
            frame,
            now,
        );
        Dispatch::after(due, dispatch)
    }

    /// Handle a global pointer-up (or touch-end).
    pub fn pointer_up(&mut self, event: PointerEvent, now: Instant) -> Dispatch {
        let due = self.fire_due(now);
        if !self.machine.is_active() {
            let ignored = Dispatch::ignored(HostPhase::PointerUp, IgnoredReason::NoActiveSession);
            return Dispatch::after(due, ignored);
        }
        let frame = self.frame_at(event.position);
        let dispatch = self.forward(
            HostPhase::PointerUp,
            DragInput::Release {
                pointer_id: event.pointer_id,
                position: event.position,
                at: now,
            },
            frame,
            now,
        );
        Dispatch::after(due, dispatch)
    }

    pub fn context_menu(&mut self, now: Instant) -> Dispatch {
        self.cancel(HostPhase::ContextMenu, CancelReason::ContextMenu, now)
    }

    pub fn blur(&mut self, now: Instant) -> Dispatch {
        self.cancel(HostPhase::Blur, CancelReason::Blur, now)
    }

    /// Any visibility change (hidden or shown) cancels the session.
    pub fn visibility_change(&mut self, now: Instant) -> Dispatch {
        self.cancel(HostPhase::VisibilityChange, CancelReason::VisibilityChange, now)
    }

    /// Advance timers to `now`.
    pub fn tick(&mut self, now: Instant) -> Dispatch {
        self.click_guard.expire(now);
        if let Some(every) = self.config.remeasure_every
            && (self.surface_open || self.machine.is_active())
            && self
                .measured_at
                .is_none_or(|at| now.saturating_duration_since(at) >= every)
        {
            self.relayout(now);
        }
        if !self.machine.is_active() {
            return Dispatch::ignored(HostPhase::Tick, IgnoredReason::NoActiveSession);
        }
        self.forward(
            HostPhase::Tick,
            DragInput::Tick { now },
            DragFrame::UNMEASURED,
            now,
        )
    }

    /// Re-enable transitions after the frame that rendered a splice.
    pub fn animation_frame(&mut self) -> Dispatch {
        if !self.transitions_suppressed {
            return Dispatch::ignored(HostPhase::AnimationFrame, IgnoredReason::NothingPending);
        }
        self.transitions_suppressed = false;
        Dispatch::host_state_updated(HostPhase::AnimationFrame, Vec::new())
    }

    /// Decide whether a click on item `index` navigates.
    pub fn click(&mut self, index: usize, now: Instant) -> ClickDecision {
        self.click_guard.expire(now);
        if self.click_guard.suppress || self.machine.phase() == DragPhase::Completing {
            tracing::debug!(index, "click suppressed after drag");
            ClickDecision::Suppressed
        } else {
            ClickDecision::Navigate(index)
        }
    }

    /// Release every host resource. A pending completion is committed
    /// early; any other session is cancelled.
    pub fn teardown(&mut self, now: Instant) -> Dispatch {
        let committed = self.machine.finish_completion();
        let transition = committed.or_else(|| self.machine.force_cancel());
        let settled = match committed.map(|t| t.effect) {
            Some(DragEffect::Committed { origin, target }) => Some(Settlement::Reorder {
                from: origin,
                to: target,
            }),
            _ => None,
        };
        let mut commands = Vec::new();
        self.end_session(&mut commands);
        self.click_guard.clear();
        self.transitions_suppressed = false;
        self.surface_open = false;
        tracing::debug!(
            had_session = transition.is_some(),
            committed = settled.is_some(),
            ?now,
            "reorder controller torn down"
        );
        match transition {
            Some(transition) => Dispatch {
                transition: Some(transition),
                commands,
                settled,
                log: DispatchLog {
                    phase: HostPhase::Teardown,
                    transition_id: Some(transition.transition_id),
                    outcome: DispatchOutcome::Forwarded,
                },
            },
            None if commands.is_empty() => {
                Dispatch::ignored(HostPhase::Teardown, IgnoredReason::NoActiveSession)
            }
            None => Dispatch::host_state_updated(HostPhase::Teardown, commands),
        }
    }

    /// Visual state of item `index` for the current frame.
    #[must_use]
    pub fn item_visual(&self, index: usize) -> ItemVisual {
        let sibling = if self.transitions_suppressed {
            TransitionSpec::None
        } else {
            TransitionSpec::Animate {
                duration: self.config.sibling_transition,
                easing: self.config.sibling_easing,
            }
        };
        let layout = self.slot_layout();
        let shift = |origin: usize, target: usize| {
            layout.map_or(Offset::ZERO, |l| l.sibling_offset(index, origin, target))
        };
        match self.machine.state() {
            DragSession::Dragging {
                origin,
                target,
                visual,
                ..
            } => {
                if index == origin {
                    ItemVisual::lifted(visual, self.config.lift_scale)
                } else {
                    ItemVisual::shifted(shift(origin, target), sibling)
                }
            }
            DragSession::Completing {
                origin,
                target,
                offset,
                ..
            } => {
                if index == origin {
                    ItemVisual::settling(
                        offset,
                        TransitionSpec::Animate {
                            duration: self.config.completion,
                            easing: self.config.completion_easing,
                        },
                    )
                } else {
                    ItemVisual::shifted(shift(origin, target), sibling)
                }
            }
            DragSession::Idle | DragSession::Armed { .. } => ItemVisual::at_rest(sibling),
        }
    }

    /// Fire a long-press or completion deadline that passed before the
    /// host ticked, so pointer input sees the session the timer left.
    fn fire_due(&mut self, now: Instant) -> Option<Dispatch> {
        let deadline = self.machine.pending_deadline()?;
        if deadline > now {
            return None;
        }
        Some(self.forward(
            HostPhase::Tick,
            DragInput::Tick { now },
            DragFrame::UNMEASURED,
            now,
        ))
    }

    fn cancel(&mut self, phase: HostPhase, reason: CancelReason, now: Instant) -> Dispatch {
        if !self.machine.is_active() {
            return Dispatch::ignored(phase, IgnoredReason::NoActiveSession);
        }
        self.forward(
            phase,
            DragInput::Cancel { reason },
            DragFrame::UNMEASURED,
            now,
        )
    }

    fn forward(
        &mut self,
        phase: HostPhase,
        input: DragInput,
        frame: DragFrame,
        now: Instant,
    ) -> Dispatch {
        match self.machine.apply(input, &frame) {
            Ok(transition) => {
                let mut commands = Vec::new();
                let settled = self.react(&transition, now, &mut commands);
                Dispatch {
                    transition: Some(transition),
                    commands,
                    settled,
                    log: DispatchLog {
                        phase,
                        transition_id: Some(transition.transition_id),
                        outcome: DispatchOutcome::Forwarded,
                    },
                }
            }
            Err(error) => {
                tracing::warn!(?phase, %error, "drag machine rejected input");
                Dispatch::ignored(phase, IgnoredReason::MachineRejectedEvent)
            }
        }
    }

    fn react(
        &mut self,
        transition: &DragTransition,
        now: Instant,
        commands: &mut Vec<HostCommand>,
    ) -> Option<Settlement> {
        let guard_until = now + self.config.click_guard;
        match transition.effect {
            DragEffect::Armed { index, .. } => {
                self.begin_session(commands);
                tracing::debug!(index, "press armed");
                None
            }
            DragEffect::DragStarted { index } => {
                self.drag_cursor = true;
                commands.push(HostCommand::SetDragCursor(true));
                tracing::debug!(index, "drag started");
                None
            }
            DragEffect::DragUpdated {
                target, has_moved, ..
            } => {
                if has_moved {
                    self.click_guard.hold();
                }
                tracing::trace!(target, has_moved, "drag updated");
                None
            }
            DragEffect::ArmAbandoned { index, distance } => {
                self.end_session(commands);
                tracing::debug!(index, distance, "press abandoned before long-press");
                None
            }
            DragEffect::Released { index, has_moved } => {
                self.end_session(commands);
                self.click_guard.release(has_moved, guard_until);
                tracing::debug!(index, has_moved, "released without reorder");
                None
            }
            DragEffect::Canceled {
                index,
                reason,
                has_moved,
            } => {
                self.end_session(commands);
                self.click_guard.release(has_moved, guard_until);
                tracing::debug!(?index, ?reason, "drag cancelled");
                None
            }
            DragEffect::DroppedOutside {
                index,
                region,
                has_moved,
            } => {
                self.end_session(commands);
                self.click_guard.release(has_moved, guard_until);
                Some(Settlement::Transfer { index, region })
            }
            DragEffect::CompletionStarted { origin, target, .. } => {
                self.end_session(commands);
                self.click_guard.hold();
                tracing::debug!(origin, target, "completion started");
                None
            }
            DragEffect::Committed { origin, target } => {
                self.click_guard.clear();
                self.transitions_suppressed = true;
                commands.push(HostCommand::RequestAnimationFrame);
                Some(Settlement::Reorder {
                    from: origin,
                    to: target,
                })
            }
            DragEffect::Noop { reason } => {
                tracing::trace!(?reason, "input ignored");
                None
            }
        }
    }

    fn begin_session(&mut self, commands: &mut Vec<HostCommand>) {
        if !self.listeners_attached {
            self.listeners_attached = true;
            commands.push(HostCommand::AttachGlobalListeners);
        }
    }

    fn end_session(&mut self, commands: &mut Vec<HostCommand>) {
        if self.drag_cursor {
            self.drag_cursor = false;
            commands.push(HostCommand::SetDragCursor(false));
        }
        if self.listeners_attached {
            self.listeners_attached = false;
            commands.push(HostCommand::DetachGlobalListeners);
        }
    }

    fn frame_at(&self, position: Point) -> DragFrame {
        match self.measured {
            Some(geometry) => DragFrame {
                slots: self.layout_for(&geometry),
                region: self.config.drop_rule.classify(&geometry, position),
            },
            None => DragFrame::UNMEASURED,
        }
    }

    fn layout_for(&self, geometry: &SurfaceGeometry) -> Option<SlotLayout> {
        if geometry.container.is_empty() {
            return None;
        }
        match self.config.slots {
            SlotShape::Row { stride } => {
                RowMetrics::new(geometry.container, stride, self.len).map(SlotLayout::Row)
            }
            SlotShape::Grid { .. } => GridMetrics::measure(
                geometry.container,
                self.len,
                self.config.slots.columns_at(geometry.viewport.width),
            )
            .map(SlotLayout::Grid),
        }
    }
}
