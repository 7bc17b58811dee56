#![forbid(unsafe_code)]

//! Core: geometry, easing, canonical events, and session configuration.
//!
//! # Role in Stagelight
//! `stagelight-core` holds everything that is pure data or pure math. The
//! renderers (`stagelight-widgets`) and the highlight controller
//! (`stagelight-runtime`) build on these types; nothing here touches a DOM.
//!
//! # Primary responsibilities
//! - **Rect / Size / Point**: viewport-relative pixel geometry.
//! - **Easing**: quadratic ease-in-out and rectangle interpolation.
//! - **Event**: canonical host input (keys, pointer, resize, scroll).
//! - **Config**: session options merged over defaults, loadable from JSON/TOML.
//! - **PopoverContent**: the data half of a step's popover.

pub mod buttons;
pub mod config;
pub mod content;
pub mod easing;
pub mod error;
pub mod event;
pub mod geometry;
pub mod node;
pub mod placement;

pub use buttons::{Button, Buttons};
pub use config::{Config, OverlayClickBehavior};
pub use content::{PopoverContent, format_progress};
pub use error::{Error, Result};
pub use event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerEvent, PointerEventKind};
pub use geometry::{Point, Rect, Size};
pub use node::NodeId;
pub use placement::{Align, Side};
