#![forbid(unsafe_code)]

//! Stagelight public facade crate.
//!
//! Stagelight dims a page except for one element, shows a popover next to
//! it, and walks the user through an ordered list of such steps. This crate
//! re-exports the everyday types from the internal crates, offers a
//! [`prelude`], and adds a few helpers for running a session on the
//! headless host.
//!
//! ```
//! use stagelight::prelude::*;
//!
//! let mut host = stagelight::headless(Size::new(1024.0, 768.0));
//! host.dom_mut().add_with_id("intro", Rect::new(100.0, 100.0, 50.0, 50.0));
//!
//! let steps = vec![
//!     Step::new("#intro").popover(PopoverContent::new().title("Welcome")),
//!     Step::new("#missing").popover(PopoverContent::new().title("Anywhere")),
//! ];
//! let mut tour = stagelight::driver(host, Config::default().animate(false)).with_steps(steps);
//! tour.drive(0).unwrap();
//! assert_eq!(tour.active_index(), Some(0));
//! tour.move_next().unwrap();
//! tour.move_next().unwrap();
//! assert!(!tour.is_active());
//! ```

use std::time::Duration;

// --- Core re-exports -------------------------------------------------------

pub use stagelight_core::{
    Align, Button, Buttons, Config, Error, Event, KeyCode, KeyEvent, KeyEventKind, Modifiers,
    NodeId, OverlayClickBehavior, Point, PointerEvent, PointerEventKind, PopoverContent, Rect,
    Result, Side, Size, format_progress,
};

// --- Backend re-exports ----------------------------------------------------

pub use stagelight_backend::{BackendClock, Dom, FrameHandle, FrameScheduler, Host};

// --- Host re-exports -------------------------------------------------------

pub use stagelight_web::{DeterministicClock, HeadlessDom, HeadlessHost, HostFrames};

#[cfg(target_arch = "wasm32")]
pub use stagelight_web::BrowserHost;

// --- Runtime re-exports ----------------------------------------------------

pub use stagelight_runtime::{
    Command, Disposition, ElementRef, FrameOutcome, HookContext, Hooks, RenderContext,
    SessionState, Signal, Step, StepPopover, Tour, steps_from_json,
};

pub use stagelight_widgets::classes;

// --- Session factory -------------------------------------------------------

/// Popover size the headless document assumes unless told otherwise.
pub const HEADLESS_POPOVER_SIZE: Size = Size::new(300.0, 150.0);

/// Most frames [`run_until_idle`] pumps before giving up.
pub const MAX_IDLE_FRAMES: usize = 1024;

/// Create an idle session over `host`.
pub fn driver<H: Host>(host: H, config: Config) -> Tour<H> {
    Tour::new(host, config)
}

/// Headless host with an empty document and a popover of
/// [`HEADLESS_POPOVER_SIZE`].
#[must_use]
pub fn headless(viewport: Size) -> HeadlessHost {
    HeadlessHost::with_dom(
        HeadlessDom::new(viewport).with_intrinsic_size(classes::POPOVER, HEADLESS_POPOVER_SIZE),
    )
}

/// Advance the headless clock by `dt` and run every frame that fires.
pub fn run_frame(tour: &mut Tour<HeadlessHost>, dt: Duration) -> Result<Vec<FrameOutcome>> {
    let fired = tour.host_mut().advance_frame(dt);
    fired.into_iter().map(|frame| tour.on_frame(frame)).collect()
}

/// Run frames `dt` apart until none are pending. Returns how many ran.
///
/// Stops after [`MAX_IDLE_FRAMES`] with a warning if the queue keeps
/// refilling.
pub fn run_until_idle(tour: &mut Tour<HeadlessHost>, dt: Duration) -> Result<usize> {
    let mut ran = 0;
    while !tour.host().frame_queue().pending().is_empty() {
        if ran >= MAX_IDLE_FRAMES {
            tracing::warn!(target: "stagelight.driver", ran, "frame queue did not drain");
            break;
        }
        ran += run_frame(tour, dt)?.len();
    }
    Ok(ran)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Button, Buttons, Config, Dom, Error, Event, FrameOutcome, HeadlessHost, Hooks, Host,
        KeyCode, NodeId, OverlayClickBehavior, Point, PopoverContent, Rect, Result, Side, Size,
        Step, StepPopover, Tour,
    };

    pub use crate::{backend, core, runtime, web, widgets};
}

pub use stagelight_backend as backend;
pub use stagelight_core as core;
pub use stagelight_runtime as runtime;
pub use stagelight_web as web;
pub use stagelight_widgets as widgets;
