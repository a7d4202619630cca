#![forbid(unsafe_code)]

//! Deterministic drag-and-reorder lifecycle.
//!
//! ```text
//! Idle -> Armed -> Dragging -> Completing -> Idle
//!           \         \----------------------> Idle (release, drop-out, cancel)
//!            \-------------------------------> Idle (slop, release, cancel)
//! ```
//!
//! [`DragMachine::apply`] is a function from the current [`DragSession`], one
//! [`DragInput`] and the [`DragFrame`] measured for that input to the next
//! session plus a [`DragEffect`]. It never touches the collection, timers or
//! the host; the controller reads the effect and does that.
//!
//! # Invariants
//!
//! 1. Every target index lies in `[0, n-1]` for the frame's slot count.
//! 2. Rejected input leaves the session unchanged and yields
//!    [`DragEffect::Noop`] with a reason.
//! 3. `Completing` is entered only when the gesture moved past the move
//!    threshold and the release target differs from the origin.

use std::fmt;
use std::time::Duration;

use tabdeck_core::{CubicBezier, Instant, Offset, OffsetTransition, Point, PointerButton};
use tabdeck_layout::{DropRule, Region, SlotLayout};

use crate::config::ReorderConfig;

/// Drag session state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragSession {
    Idle,
    /// Pressed, waiting for the long-press deadline.
    Armed {
        index: usize,
        pointer_id: u32,
        press: Point,
        deadline: Instant,
    },
    Dragging {
        origin: usize,
        target: usize,
        pointer_id: u32,
        press: Point,
        /// Pointer minus press position.
        raw: Offset,
        /// Offset actually rendered for the held item.
        visual: Offset,
        /// Slot delta from origin to target.
        snap: Offset,
        has_moved: bool,
        region: Region,
    },
    /// Released onto a new slot; the splice happens at `deadline`.
    Completing {
        origin: usize,
        target: usize,
        from: Offset,
        offset: Offset,
        started: Instant,
        deadline: Instant,
    },
}

impl DragSession {
    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        match self {
            Self::Idle => DragPhase::Idle,
            Self::Armed { .. } => DragPhase::Armed,
            Self::Dragging { .. } => DragPhase::Dragging,
            Self::Completing { .. } => DragPhase::Completing,
        }
    }

    /// Index of the item this session holds.
    #[must_use]
    pub const fn held_index(&self) -> Option<usize> {
        match *self {
            Self::Idle => None,
            Self::Armed { index, .. } => Some(index),
            Self::Dragging { origin, .. } | Self::Completing { origin, .. } => Some(origin),
        }
    }

    const fn pointer_id(&self) -> Option<u32> {
        match *self {
            Self::Armed { pointer_id, .. } | Self::Dragging { pointer_id, .. } => Some(pointer_id),
            Self::Idle | Self::Completing { .. } => None,
        }
    }

    const fn has_moved(&self) -> bool {
        match *self {
            Self::Dragging { has_moved, .. } => has_moved,
            Self::Completing { .. } => true,
            Self::Idle | Self::Armed { .. } => false,
        }
    }
}

/// Phase label recorded on transitions.
///
/// `Cancelled` only appears as the `to` phase of a cancel transition; the
/// session itself is `Idle` afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragPhase {
    Idle,
    Armed,
    Dragging,
    Completing,
    Cancelled,
}

/// Why a session was abandoned without committing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelReason {
    Blur,
    VisibilityChange,
    ContextMenu,
    /// Teardown or another caller outside the event stream.
    Programmatic,
}

/// Explicit no-op diagnostics for input that is safely ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoopReason {
    IdleWithoutSession,
    SessionAlreadyActive,
    ButtonNotAllowed,
    PointerMismatch,
    NoTarget,
    StateDisallowsInput,
    WithinArmSlop,
    DeadlineNotReached,
    /// The surface has no usable layout; the update is skipped.
    Unmeasured,
}

/// One pointer or timer input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragInput {
    Press {
        index: usize,
        pointer_id: u32,
        button: PointerButton,
        position: Point,
        at: Instant,
    },
    Move {
        pointer_id: u32,
        position: Point,
        /// A move without the primary button held is a lost release.
        primary_held: bool,
        at: Instant,
    },
    Release {
        pointer_id: u32,
        position: Point,
        at: Instant,
    },
    Tick {
        now: Instant,
    },
    Cancel {
        reason: CancelReason,
    },
}

impl DragInput {
    fn position(&self) -> Option<Point> {
        match *self {
            Self::Press { position, .. }
            | Self::Move { position, .. }
            | Self::Release { position, .. } => Some(position),
            Self::Tick { .. } | Self::Cancel { .. } => None,
        }
    }
}

/// Layout facts measured for one input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragFrame {
    /// `None` when the surface is not laid out.
    pub slots: Option<SlotLayout>,
    /// Where the input position sits relative to the surface.
    pub region: Region,
}

impl DragFrame {
    /// A frame for inputs that carry no position.
    pub const UNMEASURED: Self = Self {
        slots: None,
        region: Region::Inside,
    };
}

/// Effect of one lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEffect {
    Armed {
        index: usize,
        pointer_id: u32,
        deadline: Instant,
    },
    DragStarted {
        index: usize,
    },
    /// The pointer left the slop radius before the deadline.
    ArmAbandoned {
        index: usize,
        distance: f32,
    },
    DragUpdated {
        origin: usize,
        target: usize,
        visual: Offset,
        region: Region,
        has_moved: bool,
    },
    /// Released without a reorder; the click may proceed unless `has_moved`.
    Released {
        index: usize,
        has_moved: bool,
    },
    /// Released over the surface's transfer region.
    DroppedOutside {
        index: usize,
        region: Region,
        has_moved: bool,
    },
    CompletionStarted {
        origin: usize,
        target: usize,
        offset: Offset,
        duration: Duration,
    },
    /// The completion finished (deadline or teardown); splice `origin` into
    /// `target`.
    Committed {
        origin: usize,
        target: usize,
    },
    Canceled {
        index: Option<usize>,
        reason: CancelReason,
        has_moved: bool,
    },
    Noop {
        reason: NoopReason,
    },
}

/// One state-machine transition with telemetry fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTransition {
    pub transition_id: u64,
    pub from: DragPhase,
    pub to: DragPhase,
    pub effect: DragEffect,
}

/// Drag lifecycle machine for one collection surface.
#[derive(Debug, Clone)]
pub struct DragMachine {
    state: DragSession,
    long_press: Duration,
    arm_slop: f32,
    move_threshold: f32,
    snap_blend: f32,
    completion: Duration,
    completion_easing: CubicBezier,
    transfer_region: Region,
    transition_counter: u64,
}

impl DragMachine {
    /// Construct a machine, rejecting unusable thresholds.
    pub fn new(config: &ReorderConfig) -> Result<Self, DragMachineError> {
        if config.long_press.is_zero() {
            return Err(DragMachineError::InvalidLongPress);
        }
        if !(config.arm_slop.is_finite() && config.arm_slop > 0.0) {
            return Err(DragMachineError::InvalidArmSlop {
                value: config.arm_slop,
            });
        }
        if !(config.move_threshold.is_finite() && config.move_threshold >= 0.0) {
            return Err(DragMachineError::InvalidMoveThreshold {
                value: config.move_threshold,
            });
        }
        if !(0.0..=1.0).contains(&config.snap_blend) {
            return Err(DragMachineError::InvalidSnapBlend {
                value: config.snap_blend,
            });
        }
        Ok(Self {
            state: DragSession::Idle,
            long_press: config.long_press,
            arm_slop: config.arm_slop,
            move_threshold: config.move_threshold,
            snap_blend: config.snap_blend,
            completion: config.completion,
            completion_easing: config.completion_easing,
            transfer_region: match config.drop_rule {
                DropRule::OutsideContent { .. } => Region::Outside,
                DropRule::DropZone => Region::DropZone,
            },
            transition_counter: 0,
        })
    }

    /// Current session.
    #[must_use]
    pub const fn state(&self) -> DragSession {
        self.state
    }

    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        self.state.phase()
    }

    /// Whether a session is in progress (anything but `Idle`).
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, DragSession::Idle)
    }

    /// Region that turns a release into [`DragEffect::DroppedOutside`].
    #[must_use]
    pub const fn transfer_region(&self) -> Region {
        self.transfer_region
    }

    /// Eased offset of the completing item at `now`, for hosts that animate
    /// frame by frame. `None` outside `Completing`.
    #[must_use]
    pub fn completion_offset_at(&self, now: Instant) -> Option<Offset> {
        let DragSession::Completing {
            from,
            offset,
            started,
            ..
        } = self.state
        else {
            return None;
        };
        let slide = OffsetTransition::new(from, offset, self.completion)
            .easing(self.completion_easing);
        Some(slide.offset_at(now.saturating_duration_since(started)))
    }

    /// Deadline of the armed press or the pending completion.
    #[must_use]
    pub const fn pending_deadline(&self) -> Option<Instant> {
        match self.state {
            DragSession::Armed { deadline, .. } | DragSession::Completing { deadline, .. } => {
                Some(deadline)
            }
            DragSession::Idle | DragSession::Dragging { .. } => None,
        }
    }

    /// Commit a pending completion without waiting for its deadline.
    pub fn finish_completion(&mut self) -> Option<DragTransition> {
        let DragSession::Completing { origin, target, .. } = self.state else {
            return None;
        };
        self.state = DragSession::Idle;
        Some(self.record(
            DragPhase::Completing,
            DragPhase::Idle,
            DragEffect::Committed { origin, target },
        ))
    }

    /// Unconditionally reset to `Idle`, returning a `Programmatic` cancel
    /// transition if a session was active. A pending completion is dropped
    /// without committing.
    pub fn force_cancel(&mut self) -> Option<DragTransition> {
        let from = self.state;
        if matches!(from, DragSession::Idle) {
            return None;
        }
        self.state = DragSession::Idle;
        Some(self.record(
            from.phase(),
            DragPhase::Cancelled,
            DragEffect::Canceled {
                index: from.held_index(),
                reason: CancelReason::Programmatic,
                has_moved: from.has_moved(),
            },
        ))
    }

    /// Apply one input measured against `frame`.
    pub fn apply(
        &mut self,
        input: DragInput,
        frame: &DragFrame,
    ) -> Result<DragTransition, DragMachineError> {
        if let Some(position) = input.position()
            && !(position.x.is_finite() && position.y.is_finite())
        {
            return Err(DragMachineError::NonFinitePosition {
                x: position.x,
                y: position.y,
            });
        }

        let from = self.state;
        if let Some(active) = from.pointer_id() {
            let incoming = match input {
                DragInput::Move { pointer_id, .. } | DragInput::Release { pointer_id, .. } => {
                    Some(pointer_id)
                }
                _ => None,
            };
            if incoming.is_some_and(|id| id != active) {
                return Ok(self.noop(NoopReason::PointerMismatch));
            }
        }

        let effect = match (from, input) {
            (
                DragSession::Idle,
                DragInput::Press {
                    index,
                    pointer_id,
                    button,
                    position,
                    at,
                },
            ) => {
                if button != PointerButton::Primary {
                    DragEffect::Noop {
                        reason: NoopReason::ButtonNotAllowed,
                    }
                } else if frame.slots.is_some_and(|slots| index >= slots.count()) {
                    DragEffect::Noop {
                        reason: NoopReason::NoTarget,
                    }
                } else {
                    let deadline = at + self.long_press;
                    self.state = DragSession::Armed {
                        index,
                        pointer_id,
                        press: position,
                        deadline,
                    };
                    DragEffect::Armed {
                        index,
                        pointer_id,
                        deadline,
                    }
                }
            }
            (DragSession::Idle, _) => DragEffect::Noop {
                reason: NoopReason::IdleWithoutSession,
            },
            (_, DragInput::Press { .. }) => DragEffect::Noop {
                reason: NoopReason::SessionAlreadyActive,
            },

            (
                DragSession::Armed { index, press, .. },
                DragInput::Move {
                    position,
                    primary_held,
                    ..
                },
            ) => {
                let distance = position.offset_from(press).length();
                if !primary_held {
                    self.state = DragSession::Idle;
                    DragEffect::Released {
                        index,
                        has_moved: false,
                    }
                } else if distance > self.arm_slop {
                    self.state = DragSession::Idle;
                    DragEffect::ArmAbandoned { index, distance }
                } else {
                    DragEffect::Noop {
                        reason: NoopReason::WithinArmSlop,
                    }
                }
            }
            (DragSession::Armed { index, .. }, DragInput::Release { .. }) => {
                self.state = DragSession::Idle;
                DragEffect::Released {
                    index,
                    has_moved: false,
                }
            }
            (
                DragSession::Armed {
                    index,
                    pointer_id,
                    press,
                    deadline,
                },
                DragInput::Tick { now },
            ) => {
                if now >= deadline {
                    self.state = DragSession::Dragging {
                        origin: index,
                        target: index,
                        pointer_id,
                        press,
                        raw: Offset::ZERO,
                        visual: Offset::ZERO,
                        snap: Offset::ZERO,
                        has_moved: false,
                        region: Region::Inside,
                    };
                    DragEffect::DragStarted { index }
                } else {
                    DragEffect::Noop {
                        reason: NoopReason::DeadlineNotReached,
                    }
                }
            }

            (
                DragSession::Dragging { .. },
                DragInput::Move {
                    position,
                    primary_held,
                    at,
                    ..
                },
            ) => {
                if primary_held {
                    self.drag_to(position, frame)
                } else {
                    self.release(position, at, frame)
                }
            }
            (DragSession::Dragging { .. }, DragInput::Release { position, at, .. }) => {
                self.release(position, at, frame)
            }
            (DragSession::Dragging { .. }, DragInput::Tick { .. }) => DragEffect::Noop {
                reason: NoopReason::StateDisallowsInput,
            },

            (
                DragSession::Armed { .. } | DragSession::Dragging { .. },
                DragInput::Cancel { reason },
            ) => {
                self.state = DragSession::Idle;
                DragEffect::Canceled {
                    index: from.held_index(),
                    reason,
                    has_moved: from.has_moved(),
                }
            }

            (
                DragSession::Completing {
                    origin,
                    target,
                    deadline,
                    ..
                },
                DragInput::Tick { now },
            ) => {
                if now >= deadline {
                    self.state = DragSession::Idle;
                    DragEffect::Committed { origin, target }
                } else {
                    DragEffect::Noop {
                        reason: NoopReason::DeadlineNotReached,
                    }
                }
            }
            (DragSession::Completing { .. }, _) => DragEffect::Noop {
                reason: NoopReason::StateDisallowsInput,
            },
        };

        let to = match effect {
            DragEffect::Canceled { .. } => DragPhase::Cancelled,
            _ => self.state.phase(),
        };
        Ok(self.record(from.phase(), to, effect))
    }

    fn drag_to(&mut self, position: Point, frame: &DragFrame) -> DragEffect {
        let DragSession::Dragging {
            origin,
            pointer_id,
            press,
            has_moved,
            ..
        } = self.state
        else {
            return DragEffect::Noop {
                reason: NoopReason::StateDisallowsInput,
            };
        };
        let Some(slots) = frame.slots else {
            return DragEffect::Noop {
                reason: NoopReason::Unmeasured,
            };
        };
        let Some(hit) = slots.hit_test(position) else {
            return DragEffect::Noop {
                reason: NoopReason::NoTarget,
            };
        };

        let raw = position.offset_from(press);
        let has_moved = has_moved || self.crossed_move_threshold(raw);
        let target = if frame.region == self.transfer_region {
            origin
        } else {
            hit
        };
        let snap = slots.slot_delta(origin, target);
        let visual = if frame.region == Region::Inside {
            raw.lerp(snap, self.snap_blend)
        } else {
            raw
        };

        self.state = DragSession::Dragging {
            origin,
            target,
            pointer_id,
            press,
            raw,
            visual,
            snap,
            has_moved,
            region: frame.region,
        };
        DragEffect::DragUpdated {
            origin,
            target,
            visual,
            region: frame.region,
            has_moved,
        }
    }

    fn release(&mut self, position: Point, at: Instant, frame: &DragFrame) -> DragEffect {
        let DragSession::Dragging {
            origin,
            target,
            press,
            visual,
            snap,
            has_moved,
            ..
        } = self.state
        else {
            return DragEffect::Noop {
                reason: NoopReason::StateDisallowsInput,
            };
        };
        let has_moved = has_moved || self.crossed_move_threshold(position.offset_from(press));
        self.state = DragSession::Idle;

        if frame.region == self.transfer_region {
            return DragEffect::DroppedOutside {
                index: origin,
                region: frame.region,
                has_moved,
            };
        }

        let (target, offset) = match frame.slots {
            Some(slots) => match slots.hit_test(position) {
                Some(hit) => (hit, slots.slot_delta(origin, hit)),
                None => (target, snap),
            },
            None => (target, snap),
        };
        if !has_moved || target == origin {
            return DragEffect::Released {
                index: origin,
                has_moved,
            };
        }

        self.state = DragSession::Completing {
            origin,
            target,
            from: visual,
            offset,
            started: at,
            deadline: at + self.completion,
        };
        DragEffect::CompletionStarted {
            origin,
            target,
            offset,
            duration: self.completion,
        }
    }

    fn crossed_move_threshold(&self, raw: Offset) -> bool {
        raw.dx.abs() > self.move_threshold || raw.dy.abs() > self.move_threshold
    }

    fn noop(&mut self, reason: NoopReason) -> DragTransition {
        let phase = self.state.phase();
        self.record(phase, phase, DragEffect::Noop { reason })
    }

    fn record(&mut self, from: DragPhase, to: DragPhase, effect: DragEffect) -> DragTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        DragTransition {
            transition_id: self.transition_counter,
            from,
            to,
            effect,
        }
    }
}

/// Drag machine construction and input errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragMachineError {
    InvalidLongPress,
    InvalidArmSlop { value: f32 },
    InvalidMoveThreshold { value: f32 },
    InvalidSnapBlend { value: f32 },
    NonFinitePosition { x: f32, y: f32 },
}

impl fmt::Display for DragMachineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLongPress => write!(f, "long-press duration must be > 0"),
            Self::InvalidArmSlop { value } => write!(f, "arm slop must be > 0 (got {value})"),
            Self::InvalidMoveThreshold { value } => {
                write!(f, "move threshold must be >= 0 (got {value})")
            }
            Self::InvalidSnapBlend { value } => {
                write!(f, "snap blend must be in [0, 1] (got {value})")
            }
            Self::NonFinitePosition { x, y } => {
                write!(f, "pointer position must be finite (got {x}, {y})")
            }
        }
    }
}

impl std::error::Error for DragMachineError {}
