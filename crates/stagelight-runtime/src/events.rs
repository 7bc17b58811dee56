#![forbid(unsafe_code)]

//! Input arbitration.
//!
//! The host forwards every input event it sees while a session is active. The
//! layer decides whether the page may still receive the event, and emits a
//! [`Signal`] for anything the session has to act on:
//!
//! | Input | Effect | Disposition |
//! |-------|--------|-------------|
//! | Tab / Shift+Tab (down) | focus cycles within popover and active element | consumed |
//! | Escape / arrows (up) | `EscapePress` / `ArrowRightPress` / `ArrowLeftPress` | pass-through |
//! | click on an enabled popover button | `NextClick` / `PrevClick` / `CloseClick` | consumed |
//! | pointer on the dimmed region | `OverlayClick` on click | consumed |
//! | pointer inside the stage hole | none | pass-through unless interaction is disabled |
//! | resize / scroll | one refresh on the next frame | pass-through |
//!
//! Resize and scroll bursts collapse into a single pending refresh frame: a
//! new request replaces the pending one.

use stagelight_backend::{Dom, FrameHandle, FrameScheduler};
use stagelight_core::Config;
use stagelight_core::event::{Event, KeyCode, KeyEvent, KeyEventKind, PointerEvent, PointerEventKind};
use stagelight_widgets::{PopoverAction, StageHit};

use crate::bus::{Bus, Signal};
use crate::highlight::Controller;

/// Whether the host may let an event reach page content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    /// Prevent default handling and stop propagation.
    Consumed,
    PassThrough,
}

impl Disposition {
    #[must_use]
    pub const fn is_consumed(self) -> bool {
        matches!(self, Self::Consumed)
    }
}

/// Global listener state of one session.
#[derive(Debug, Default)]
pub struct EventLayer {
    attached: bool,
    refresh: Option<FrameHandle>,
}

impl EventLayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start listening. Returns `false` if already attached.
    pub fn attach(&mut self) -> bool {
        if self.attached {
            return false;
        }
        self.attached = true;
        tracing::debug!(target: "stagelight.events", "listeners attached");
        true
    }

    /// Stop listening and drop a pending refresh. Returns `false` if not
    /// attached.
    pub fn detach(&mut self, frames: &mut dyn FrameScheduler) -> bool {
        if !self.attached {
            return false;
        }
        self.attached = false;
        if let Some(frame) = self.refresh.take() {
            frames.cancel_frame(frame);
        }
        tracing::debug!(target: "stagelight.events", "listeners detached");
        true
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// The pending refresh frame, if any.
    #[must_use]
    pub fn pending_refresh(&self) -> Option<FrameHandle> {
        self.refresh
    }

    /// Claim `frame` if it is the pending refresh.
    pub fn take_refresh(&mut self, frame: FrameHandle) -> bool {
        if self.refresh == Some(frame) {
            self.refresh = None;
            true
        } else {
            false
        }
    }

    /// Arbitrate one input event.
    pub fn handle(
        &mut self,
        event: &Event,
        dom: &mut dyn Dom,
        frames: &mut dyn FrameScheduler,
        controller: &Controller,
        config: &Config,
        bus: &mut Bus<Signal>,
    ) -> Disposition {
        if !self.attached {
            return Disposition::PassThrough;
        }
        match event {
            Event::Key(key) => self.key(key, dom, controller, config, bus),
            Event::Pointer(pointer) => pointer_event(pointer, dom, controller, config, bus),
            Event::Resize { .. } | Event::Scroll => {
                self.request_refresh(frames);
                Disposition::PassThrough
            }
        }
    }

    fn key(
        &mut self,
        key: &KeyEvent,
        dom: &mut dyn Dom,
        controller: &Controller,
        config: &Config,
        bus: &mut Bus<Signal>,
    ) -> Disposition {
        match (key.kind, key.code) {
            (KeyEventKind::Down, KeyCode::Tab) => {
                controller.trap_focus(dom, key.shift());
                Disposition::Consumed
            }
            (KeyEventKind::Up, code) if config.allow_keyboard_control => {
                let signal = match code {
                    KeyCode::Escape => Signal::EscapePress,
                    KeyCode::ArrowRight => Signal::ArrowRightPress,
                    KeyCode::ArrowLeft => Signal::ArrowLeftPress,
                    _ => return Disposition::PassThrough,
                };
                tracing::debug!(target: "stagelight.events", signal = ?signal, "key signal");
                bus.emit(signal);
                Disposition::PassThrough
            }
            _ => Disposition::PassThrough,
        }
    }

    fn request_refresh(&mut self, frames: &mut dyn FrameScheduler) {
        if let Some(pending) = self.refresh.take() {
            frames.cancel_frame(pending);
        }
        self.refresh = Some(frames.request_frame());
    }
}

fn pointer_event(
    pointer: &PointerEvent,
    dom: &mut dyn Dom,
    controller: &Controller,
    config: &Config,
    bus: &mut Bus<Signal>,
) -> Disposition {
    let click = pointer.kind == PointerEventKind::Click;
    let popover = controller.popover();

    if let Some(target) = pointer.target.filter(|t| popover.contains(dom, *t)) {
        if let Some(action) = popover.action_for(dom, target) {
            if click {
                let signal = match action {
                    PopoverAction::Next => Signal::NextClick,
                    PopoverAction::Previous => Signal::PrevClick,
                    PopoverAction::Close => Signal::CloseClick,
                };
                tracing::debug!(target: "stagelight.events", signal = ?signal, "popover button");
                bus.emit(signal);
            }
            return Disposition::Consumed;
        }
        // Text in the title and description stays selectable.
        let in_text = popover
            .nodes()
            .is_some_and(|n| dom.contains(n.title, target) || dom.contains(n.description, target));
        return if in_text {
            Disposition::PassThrough
        } else {
            Disposition::Consumed
        };
    }

    match controller.stage().hit(pointer.position) {
        StageHit::Hole if config.disable_active_interaction => Disposition::Consumed,
        StageHit::Hole | StageHit::None => Disposition::PassThrough,
        StageHit::Overlay => {
            if click {
                tracing::debug!(target: "stagelight.events", "overlay click");
                bus.emit(Signal::OverlayClick);
            }
            Disposition::Consumed
        }
    }
}
