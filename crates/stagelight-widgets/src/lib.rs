#![forbid(unsafe_code)]

//! Renderers for the two nodes a Stagelight session mounts.
//!
//! - [`stage`]: the full-viewport overlay with a rounded cut-out around the
//!   active element, and its animation between two rectangles.
//! - [`popover`]: the floating panel with title, description, progress and
//!   navigation buttons, positioned by the pure rules in [`placement`].
//! - [`focus`] and [`scroll`]: the Tab trap and scroll-into-view policy shared
//!   by both.
//!
//! Every renderer writes through `&mut dyn Dom`; none of them keeps session
//! state beyond the handles of the nodes it mounted.

pub mod focus;
pub mod placement;
pub mod popover;
pub mod scroll;
pub mod stage;

pub use placement::{Arrow, Placement, PlacementRequest, RenderedSide, compute_placement};
pub use popover::{PopoverAction, PopoverDom, PopoverRenderer};
pub use stage::{StageHit, StageRenderer, StageShape, corner_radius};

/// Class names and ids written into the document.
pub mod classes {
    pub const OVERLAY: &str = "stagelight-overlay";
    pub const OVERLAY_ANIMATED: &str = "stagelight-overlay-animated";

    pub const POPOVER: &str = "stagelight-popover";
    pub const POPOVER_ARROW: &str = "stagelight-popover-arrow";
    pub const ARROW_NONE: &str = "stagelight-popover-arrow-none";
    pub const TITLE: &str = "stagelight-popover-title";
    pub const DESCRIPTION: &str = "stagelight-popover-description";
    pub const CLOSE_BTN: &str = "stagelight-popover-close-btn";
    pub const FOOTER: &str = "stagelight-popover-footer";
    pub const PROGRESS: &str = "stagelight-popover-progress-text";
    pub const NAV_BTNS: &str = "stagelight-popover-navigation-btns";
    pub const PREV_BTN: &str = "stagelight-popover-prev-btn";
    pub const NEXT_BTN: &str = "stagelight-popover-next-btn";
    pub const BTN_DISABLED: &str = "stagelight-popover-btn-disabled";

    /// On the body while a session is active.
    pub const ACTIVE: &str = "stagelight-active";
    /// On the body when transitions animate.
    pub const FADE: &str = "stagelight-fade";
    /// On the body when transitions are instant.
    pub const SIMPLE: &str = "stagelight-simple";
    /// On the highlighted element.
    pub const ACTIVE_ELEMENT: &str = "stagelight-active-element";
    pub const NO_INTERACTION: &str = "stagelight-no-interaction";

    pub const POPOVER_CONTENT_ID: &str = "stagelight-popover-content";
    pub const TITLE_ID: &str = "stagelight-popover-title";
    pub const DESCRIPTION_ID: &str = "stagelight-popover-description";
    pub const PLACEHOLDER_ID: &str = "stagelight-dummy-element";
}
