#![forbid(unsafe_code)]

//! Session configuration.
//!
//! A [`Config`] is plain data. It can be built in code, or loaded from JSON or
//! TOML; any key left out keeps its default, so a partial document merges over
//! the built-in values.
//!
//! ```toml
//! animate = false
//! overlayOpacity = 0.5
//! showButtons = ["next", "close"]
//! progressText = "{current} / {total}"
//! ```
//!
//! Callbacks are not part of this record; the runtime keeps them in its own
//! hook table.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::buttons::Buttons;
use crate::error::Result;

/// What a click on the dimmed overlay does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverlayClickBehavior {
    /// Close the session (subject to `allow_close`).
    #[default]
    Close,
    /// Advance to the next step.
    NextStep,
}

/// Behavior flags for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Animate the stage between elements.
    pub animate: bool,
    /// Fill color of the dimmed overlay.
    pub overlay_color: String,
    /// Overlay opacity in `[0, 1]`.
    pub overlay_opacity: f64,
    /// Scroll targets into view smoothly.
    pub smooth_scroll: bool,
    /// Whether Escape, the close button and overlay clicks may end the session.
    pub allow_close: bool,
    pub overlay_click_behavior: OverlayClickBehavior,
    /// Padding between the element and the stage edge, in pixels.
    pub stage_padding: f64,
    /// Corner radius of the stage hole, in pixels.
    pub stage_radius: f64,
    /// Block pointer interaction with the highlighted element.
    pub disable_active_interaction: bool,
    pub allow_keyboard_control: bool,
    /// Extra class added to every popover.
    pub popover_class: Option<String>,
    /// Gap between the stage and the popover, in pixels.
    pub popover_offset: f64,
    pub show_buttons: Option<Buttons>,
    pub disable_buttons: Option<Buttons>,
    pub show_progress: bool,
    pub progress_text: Option<String>,
    pub next_btn_text: Option<String>,
    pub prev_btn_text: Option<String>,
    pub done_btn_text: Option<String>,
    /// Selector of the node that hosts the overlay and popover. Defaults to
    /// the document body.
    pub attach: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            animate: true,
            overlay_color: "#000".to_string(),
            overlay_opacity: 0.7,
            smooth_scroll: false,
            allow_close: true,
            overlay_click_behavior: OverlayClickBehavior::Close,
            stage_padding: 10.0,
            stage_radius: 5.0,
            disable_active_interaction: false,
            allow_keyboard_control: true,
            popover_class: None,
            popover_offset: 10.0,
            show_buttons: None,
            disable_buttons: None,
            show_progress: false,
            progress_text: None,
            next_btn_text: None,
            prev_btn_text: None,
            done_btn_text: None,
            attach: None,
        }
    }
}

impl Config {
    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a file, choosing the format by extension (`.toml`, else JSON).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext == "toml") {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    /// Check every value is in range.
    ///
    /// Returns one message per problem; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(0.0..=1.0).contains(&self.overlay_opacity) {
            errors.push(format!(
                "overlayOpacity must be in [0, 1], got {}",
                self.overlay_opacity
            ));
        }
        for (name, value) in [
            ("stagePadding", self.stage_padding),
            ("stageRadius", self.stage_radius),
            ("popoverOffset", self.popover_offset),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{name} must be a finite value >= 0, got {value}"));
            }
        }
        if self.overlay_color.trim().is_empty() {
            errors.push("overlayColor must not be empty".into());
        }
        if self.attach.as_deref().is_some_and(|a| a.trim().is_empty()) {
            errors.push("attach must not be an empty selector".into());
        }

        errors
    }

    /// Copy with every out-of-range value pulled back into range.
    #[must_use]
    pub fn normalized(&self) -> Self {
        fn non_negative(v: f64) -> f64 {
            if v.is_finite() { v.max(0.0) } else { 0.0 }
        }

        let mut out = self.clone();
        out.overlay_opacity = if self.overlay_opacity.is_nan() {
            Self::default().overlay_opacity
        } else {
            self.overlay_opacity.clamp(0.0, 1.0)
        };
        out.stage_padding = non_negative(self.stage_padding);
        out.stage_radius = non_negative(self.stage_radius);
        out.popover_offset = non_negative(self.popover_offset);
        if out.overlay_color.trim().is_empty() {
            out.overlay_color = Self::default().overlay_color;
        }
        if out.attach.as_deref().is_some_and(|a| a.trim().is_empty()) {
            out.attach = None;
        }
        out
    }

    /// Set `animate`.
    #[must_use]
    pub fn animate(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    /// Set the overlay color.
    #[must_use]
    pub fn overlay_color(mut self, color: impl Into<String>) -> Self {
        self.overlay_color = color.into();
        self
    }

    /// Set the overlay opacity.
    #[must_use]
    pub fn overlay_opacity(mut self, opacity: f64) -> Self {
        self.overlay_opacity = opacity;
        self
    }

    #[must_use]
    pub fn smooth_scroll(mut self, smooth: bool) -> Self {
        self.smooth_scroll = smooth;
        self
    }

    #[must_use]
    pub fn allow_close(mut self, allow: bool) -> Self {
        self.allow_close = allow;
        self
    }

    #[must_use]
    pub fn overlay_click_behavior(mut self, behavior: OverlayClickBehavior) -> Self {
        self.overlay_click_behavior = behavior;
        self
    }

    /// Set the stage padding.
    #[must_use]
    pub fn stage_padding(mut self, padding: f64) -> Self {
        self.stage_padding = padding;
        self
    }

    /// Set the stage corner radius.
    #[must_use]
    pub fn stage_radius(mut self, radius: f64) -> Self {
        self.stage_radius = radius;
        self
    }

    #[must_use]
    pub fn disable_active_interaction(mut self, disable: bool) -> Self {
        self.disable_active_interaction = disable;
        self
    }

    #[must_use]
    pub fn allow_keyboard_control(mut self, allow: bool) -> Self {
        self.allow_keyboard_control = allow;
        self
    }

    #[must_use]
    pub fn popover_class(mut self, class: impl Into<String>) -> Self {
        self.popover_class = Some(class.into());
        self
    }

    /// Set the popover offset.
    #[must_use]
    pub fn popover_offset(mut self, offset: f64) -> Self {
        self.popover_offset = offset;
        self
    }

    #[must_use]
    pub fn show_buttons(mut self, buttons: Buttons) -> Self {
        self.show_buttons = Some(buttons);
        self
    }

    #[must_use]
    pub fn disable_buttons(mut self, buttons: Buttons) -> Self {
        self.disable_buttons = Some(buttons);
        self
    }

    #[must_use]
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Set the progress template (`{current}` and `{total}` are substituted).
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

    #[must_use]
    pub fn done_btn_text(mut self, text: impl Into<String>) -> Self {
        self.done_btn_text = Some(text.into());
        self
    }

    /// Mount overlay and popover under the node matching `selector`.
    #[must_use]
    pub fn attach(mut self, selector: impl Into<String>) -> Self {
        self.attach = Some(selector.into());
        self
    }
}
