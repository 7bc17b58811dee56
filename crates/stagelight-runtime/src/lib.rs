#![forbid(unsafe_code)]

//! Session runtime: highlight state machine, input arbitration and the
//! step-sequence driver.
//!
//! # Role in Stagelight
//! `stagelight-runtime` is where a session lives. The [`Tour`] handle owns a
//! host, drives the renderers from `stagelight-widgets` through the
//! [`Controller`], and turns host input into navigation.
//!
//! # Data flow
//!
//! ```text
//! Tour ──▶ Controller ──▶ StageRenderer / PopoverRenderer ──▶ Dom
//!  ▲
//!  └── Bus<Signal> ◀── EventLayer ◀── host Event
//! ```
//!
//! # Frames
//! The controller never blocks. Transitions and debounced refreshes request a
//! frame from the host; the host hands each fired [`FrameHandle`] back to
//! [`Tour::on_frame`].
//!
//! [`FrameHandle`]: stagelight_backend::FrameHandle

pub mod bus;
pub mod events;
pub mod highlight;
pub mod hooks;
pub mod state;
pub mod step;
pub mod tour;

pub use bus::{Bus, Signal};
pub use events::{Disposition, EventLayer};
pub use highlight::{Controller, Env, FrameOutcome, Teardown};
pub use hooks::{Command, Hook, HookContext, Hooks, RenderContext, RenderHook};
pub use state::{SessionState, Transition};
pub use step::{ElementRef, Step, StepPopover, steps_from_json};
pub use tour::Tour;
