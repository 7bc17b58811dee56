#![forbid(unsafe_code)]

//! Steps: what to highlight and what to say about it.

use std::fmt;
use std::rc::Rc;

use serde::Deserialize;
use serde::de::Deserializer;
use stagelight_core::node::NodeId;
use stagelight_core::{PopoverContent, Result};

use crate::hooks::{Hook, HookContext, RenderContext, RenderHook};

/// How a step names its element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementRef {
    /// Resolved against the document each time the step activates.
    Selector(String),
    Node(NodeId),
}

impl From<&str> for ElementRef {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for ElementRef {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl From<NodeId> for ElementRef {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

impl<'de> Deserialize<'de> for ElementRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::Selector)
    }
}

/// Popover content plus the popover's own callbacks.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct StepPopover {
    #[serde(flatten)]
    pub content: PopoverContent,
    #[serde(skip)]
    pub on_next_click: Option<Hook>,
    #[serde(skip)]
    pub on_prev_click: Option<Hook>,
    #[serde(skip)]
    pub on_close_click: Option<Hook>,
    #[serde(skip)]
    pub on_popover_render: Option<RenderHook>,
}

impl StepPopover {
    #[must_use]
    pub fn new(content: PopoverContent) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    /// Replaces the default "next" behavior. The hook is then responsible
    /// for advancing.
    #[must_use]
    pub fn on_next_click(mut self, hook: impl Fn(&mut HookContext<'_>) + 'static) -> Self {
        self.on_next_click = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_prev_click(mut self, hook: impl Fn(&mut HookContext<'_>) + 'static) -> Self {
        self.on_prev_click = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_close_click(mut self, hook: impl Fn(&mut HookContext<'_>) + 'static) -> Self {
        self.on_close_click = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_popover_render(mut self, hook: impl Fn(&mut RenderContext<'_>) + 'static) -> Self {
        self.on_popover_render = Some(Rc::new(hook));
        self
    }
}

impl From<PopoverContent> for StepPopover {
    fn from(content: PopoverContent) -> Self {
        Self::new(content)
    }
}

impl fmt::Debug for StepPopover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepPopover")
            .field("content", &self.content)
            .field("on_next_click", &self.on_next_click.is_some())
            .field("on_prev_click", &self.on_prev_click.is_some())
            .field("on_close_click", &self.on_close_click.is_some())
            .field("on_popover_render", &self.on_popover_render.is_some())
            .finish()
    }
}

/// One stop of a tour, or the argument to a single highlight.
///
/// A step without an element, or whose selector matches nothing, highlights
/// the zero-size placeholder anchor in the middle of the viewport. A step
/// without a popover shows none.
#[derive(Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Step {
    pub element: Option<ElementRef>,
    pub popover: Option<StepPopover>,
    #[serde(skip)]
    pub on_highlight_started: Option<Hook>,
    #[serde(skip)]
    pub on_highlighted: Option<Hook>,
    #[serde(skip)]
    pub on_deselected: Option<Hook>,
}

impl Step {
    #[must_use]
    pub fn new(element: impl Into<ElementRef>) -> Self {
        Self {
            element: Some(element.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn popover(mut self, popover: impl Into<StepPopover>) -> Self {
        self.popover = Some(popover.into());
        self
    }

    #[must_use]
    pub fn on_highlight_started(mut self, hook: impl Fn(&mut HookContext<'_>) + 'static) -> Self {
        self.on_highlight_started = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_highlighted(mut self, hook: impl Fn(&mut HookContext<'_>) + 'static) -> Self {
        self.on_highlighted = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_deselected(mut self, hook: impl Fn(&mut HookContext<'_>) + 'static) -> Self {
        self.on_deselected = Some(Rc::new(hook));
        self
    }

    /// The popover content, if the step has a popover.
    #[must_use]
    pub fn content(&self) -> Option<&PopoverContent> {
        self.popover.as_ref().map(|p| &p.content)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("element", &self.element)
            .field("popover", &self.popover)
            .field("on_highlight_started", &self.on_highlight_started.is_some())
            .field("on_highlighted", &self.on_highlighted.is_some())
            .field("on_deselected", &self.on_deselected.is_some())
            .finish()
    }
}

/// Parse a JSON array of steps. Callbacks cannot be expressed in JSON and
/// start out unset.
pub fn steps_from_json(json: &str) -> Result<Vec<Step>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stagelight_core::{Buttons, Side};

    #[test]
    fn parses_steps_from_json() {
        let steps = steps_from_json(
            r##"[
                { "element": "#intro", "popover": { "title": "Hi", "side": "left", "showButtons": ["next"] } },
                { "popover": { "description": "Anywhere" } },
                { "element": ".missing" }
            ]"##,
        )
        .unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].element, Some(ElementRef::from("#intro")));
        let content = steps[0].content().unwrap();
        assert_eq!(content.title.as_deref(), Some("Hi"));
        assert_eq!(content.side, Some(Side::Left));
        assert_eq!(content.show_buttons, Some(Buttons::NEXT));
        assert!(steps[1].element.is_none());
        assert!(steps[2].popover.is_none());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(steps_from_json("{").is_err());
    }

    #[test]
    fn builders_attach_hooks() {
        let step = Step::new(NodeId(4))
            .popover(StepPopover::new(PopoverContent::new().title("t")).on_next_click(|_| {}))
            .on_deselected(|_| {});
        assert_eq!(step.element, Some(ElementRef::Node(NodeId(4))));
        assert!(step.popover.as_ref().unwrap().on_next_click.is_some());
        assert!(step.on_deselected.is_some());
        assert!(step.on_highlighted.is_none());
        assert!(format!("{step:?}").contains("on_deselected: true"));
    }
}
