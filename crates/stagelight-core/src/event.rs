#![forbid(unsafe_code)]

//! Canonical host input events.
//!
//! The host (a browser binding or the headless test host) translates its raw
//! input into these values and pushes them into the session. The session
//! answers with a disposition telling the host whether the event may still
//! reach page content.
//!
//! # Design Notes
//!
//! - Pointer coordinates are viewport-relative, like `clientX`/`clientY`.
//! - Keyboard navigation reacts on key-up; focus trapping reacts on key-down,
//!   mirroring how browsers deliver Tab before moving focus.
//! - `Modifiers` use bitflags for easy combination.

use bitflags::bitflags;

use crate::geometry::Point;
use crate::node::NodeId;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// A pointer (mouse, pen, touch) event.
    Pointer(PointerEvent),

    /// The viewport was resized.
    Resize {
        /// New viewport width in pixels.
        width: f64,
        /// New viewport height in pixels.
        height: f64,
    },

    /// The page or a scroll container scrolled.
    Scroll,
}

impl Event {
    /// Key-up for `code` with no modifiers.
    #[must_use]
    pub const fn key_up(code: KeyCode) -> Self {
        Self::Key(KeyEvent::new(code).with_kind(KeyEventKind::Up))
    }

    /// Key-down for `code` with no modifiers.
    #[must_use]
    pub const fn key_down(code: KeyCode) -> Self {
        Self::Key(KeyEvent::new(code))
    }

    /// Pointer click at `position` on `target`.
    #[must_use]
    pub const fn click(position: Point, target: Option<NodeId>) -> Self {
        Self::Pointer(PointerEvent {
            kind: PointerEventKind::Click,
            position,
            target,
        })
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// Whether the key went down or up.
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a key-down event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Down,
        }
    }

    /// Set modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the event kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Check if Shift is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// Key codes the session reacts to. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Tab,
    Enter,
    /// A printable character.
    Char(char),
    /// Any other key.
    Other,
}

impl KeyCode {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "Tab" => Self::Tab,
            "Enter" => Self::Enter,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Other,
                }
            }
        }
    }
}

/// Key event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Down,
    Up,
}

bitflags! {
    /// Modifier keys.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const NONE  = 0b0000;
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const META  = 0b1000;
    }
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Phase of the pointer interaction.
    pub kind: PointerEventKind,
    /// Viewport-relative position.
    pub position: Point,
    /// Innermost node under the pointer, when the host knows it.
    pub target: Option<NodeId>,
}

/// Pointer event phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Down,
    Up,
    Click,
}
