#![forbid(unsafe_code)]

//! Data half of a step's popover: text, placement request, and button options.
//!
//! Every field is optional. At render time a missing field falls back to the
//! session [`Config`](crate::Config) and then to a built-in default.

use serde::{Deserialize, Serialize};

use crate::buttons::Buttons;
use crate::placement::{Align, Side};

/// Default progress template.
pub const DEFAULT_PROGRESS_TEXT: &str = "{current} of {total}";
/// Default label of the "next" button.
pub const DEFAULT_NEXT_TEXT: &str = "Next \u{2192}";
/// Default label of the "previous" button.
pub const DEFAULT_PREV_TEXT: &str = "\u{2190} Previous";
/// Default label of the "next" button on the last step.
pub const DEFAULT_DONE_TEXT: &str = "Done";

/// Popover text and options for one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PopoverContent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub side: Option<Side>,
    pub align: Option<Align>,
    pub show_buttons: Option<Buttons>,
    pub disable_buttons: Option<Buttons>,
    pub show_progress: Option<bool>,
    pub progress_text: Option<String>,
    pub next_btn_text: Option<String>,
    pub prev_btn_text: Option<String>,
    pub done_btn_text: Option<String>,
    pub popover_class: Option<String>,
}

impl PopoverContent {
    /// Empty content.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Request a side.
    #[must_use]
    pub fn side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    /// Request an alignment.
    #[must_use]
    pub fn align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    /// Set the visible buttons.
    #[must_use]
    pub fn show_buttons(mut self, buttons: Buttons) -> Self {
        self.show_buttons = Some(buttons);
        self
    }

    /// Set the disabled buttons.
    #[must_use]
    pub fn disable_buttons(mut self, buttons: Buttons) -> Self {
        self.disable_buttons = Some(buttons);
        self
    }

    /// Toggle the progress line.
    #[must_use]
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = Some(show);
        self
    }

    /// Set the progress text (already formatted, or a template).
    #[must_use]
    pub fn progress_text(mut self, text: impl Into<String>) -> Self {
        self.progress_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn next_btn_text(mut self, text: impl Into<String>) -> Self {
        self.next_btn_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn prev_btn_text(mut self, text: impl Into<String>) -> Self {
        self.prev_btn_text = Some(text.into());
        self
    }

    /// Label of the "next" button on the last step.
    #[must_use]
    pub fn done_btn_text(mut self, text: impl Into<String>) -> Self {
        self.done_btn_text = Some(text.into());
        self
    }

    /// Set an extra CSS class on the popover wrapper.
    #[must_use]
    pub fn popover_class(mut self, class: impl Into<String>) -> Self {
        self.popover_class = Some(class.into());
        self
    }

    /// Layer `top` over `self`: every field set in `top` wins.
    #[must_use]
    pub fn overlaid_with(self, top: &PopoverContent) -> Self {
        let top = top.clone();
        Self {
            title: top.title.or(self.title),
            description: top.description.or(self.description),
            side: top.side.or(self.side),
            align: top.align.or(self.align),
            show_buttons: top.show_buttons.or(self.show_buttons),
            disable_buttons: top.disable_buttons.or(self.disable_buttons),
            show_progress: top.show_progress.or(self.show_progress),
            progress_text: top.progress_text.or(self.progress_text),
            next_btn_text: top.next_btn_text.or(self.next_btn_text),
            prev_btn_text: top.prev_btn_text.or(self.prev_btn_text),
            done_btn_text: top.done_btn_text.or(self.done_btn_text),
            popover_class: top.popover_class.or(self.popover_class),
        }
    }

    /// Whether there is any text to show.
    #[must_use]
    pub fn has_text(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.is_empty())
            || self.description.as_deref().is_some_and(|d| !d.is_empty())
    }
}

/// Substitute `{current}` and `{total}` in a progress template.
///
/// The double-brace spelling (`{{current}}`) is accepted as well.
#[must_use]
pub fn format_progress(template: &str, current: usize, total: usize) -> String {
    let current = current.to_string();
    let total = total.to_string();
    template
        .replace("{{current}}", &current)
        .replace("{{total}}", &total)
        .replace("{current}", &current)
        .replace("{total}", &total)
}
