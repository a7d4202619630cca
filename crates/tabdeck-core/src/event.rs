#![forbid(unsafe_code)]

//! Canonical pointer input.
//!
//! Mouse, pen, and touch input all arrive as a [`PointerEvent`]. Touch
//! contacts are reported as the primary button so the drag controller has a
//! single code path for both input families.

use bitflags::bitflags;

use crate::geometry::Point;

/// Physical device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Mouse,
    Pen,
    Touch,
}

/// The button whose state changed on a press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Auxiliary,
    Secondary,
    Back,
    Forward,
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub const fn from_dom(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Primary),
            1 => Some(Self::Auxiliary),
            2 => Some(Self::Secondary),
            3 => Some(Self::Back),
            4 => Some(Self::Forward),
            _ => None,
        }
    }

    /// The bit this button occupies in a [`PointerButtons`] mask.
    #[must_use]
    pub const fn mask(self) -> PointerButtons {
        match self {
            Self::Primary => PointerButtons::PRIMARY,
            Self::Secondary => PointerButtons::SECONDARY,
            Self::Auxiliary => PointerButtons::AUXILIARY,
            Self::Back => PointerButtons::BACK,
            Self::Forward => PointerButtons::FORWARD,
        }
    }
}

bitflags! {
    /// Buttons currently held, in DOM `MouseEvent.buttons` bit order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PointerButtons: u16 {
        const PRIMARY = 0b0000_0001;
        const SECONDARY = 0b0000_0010;
        const AUXILIARY = 0b0000_0100;
        const BACK = 0b0000_1000;
        const FORWARD = 0b0001_0000;
    }
}

/// One pointer sample delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: u32,
    pub kind: PointerKind,
    pub button: PointerButton,
    /// Buttons held after this event was processed.
    pub buttons: PointerButtons,
    pub position: Point,
}

impl PointerEvent {
    /// A mouse event with `button` pressed (or released) at `position`.
    #[must_use]
    pub fn mouse(pointer_id: u32, button: PointerButton, position: Point) -> Self {
        Self {
            pointer_id,
            kind: PointerKind::Mouse,
            button,
            buttons: button.mask(),
            position,
        }
    }

    /// A touch contact, normalized to a primary-button pointer.
    #[must_use]
    pub fn touch(identifier: u32, position: Point) -> Self {
        Self {
            pointer_id: identifier,
            kind: PointerKind::Touch,
            button: PointerButton::Primary,
            buttons: PointerButtons::PRIMARY,
            position,
        }
    }

    /// Replace the held-button mask (builder pattern).
    #[must_use]
    pub fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Whether the primary button (or a touch contact) is still held.
    #[must_use]
    pub fn primary_held(&self) -> bool {
        self.buttons.contains(PointerButtons::PRIMARY)
    }

    #[must_use]
    pub fn is_touch(&self) -> bool {
        matches!(self.kind, PointerKind::Touch)
    }
}
