#![forbid(unsafe_code)]

//! Popover mounting, content and positioning.
//!
//! Each [`PopoverRenderer::render`] call removes the previous popover and
//! builds a fresh one; handles are never reused across activations.
//! [`PopoverRenderer::reposition`] re-runs placement on the mounted popover
//! without rebuilding it.
//!
//! The renderer does not decide what a button does. The session asks
//! [`PopoverRenderer::action_for`] which control a click landed on and routes
//! it to a callback or a bus signal.

use stagelight_backend::Dom;
use stagelight_core::buttons::{Button, Buttons};
use stagelight_core::content::{DEFAULT_NEXT_TEXT, DEFAULT_PREV_TEXT};
use stagelight_core::geometry::Size;
use stagelight_core::node::NodeId;
use stagelight_core::placement::{Align, Side};
use stagelight_core::{Config, PopoverContent};

use crate::classes;
use crate::focus;
use crate::placement::{Placement, PlacementRequest, compute_placement};
use crate::scroll;

/// Handles to the nodes of one mounted popover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopoverDom {
    pub wrapper: NodeId,
    pub arrow: NodeId,
    pub title: NodeId,
    pub description: NodeId,
    pub close_button: NodeId,
    pub footer: NodeId,
    pub progress: NodeId,
    pub footer_buttons: NodeId,
    pub previous_button: NodeId,
    pub next_button: NodeId,
}

/// A popover control that was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopoverAction {
    Next,
    Previous,
    Close,
}

impl From<PopoverAction> for Button {
    fn from(action: PopoverAction) -> Self {
        match action {
            PopoverAction::Next => Button::Next,
            PopoverAction::Previous => Button::Previous,
            PopoverAction::Close => Button::Close,
        }
    }
}

#[derive(Debug, Clone)]
struct Mounted {
    dom: PopoverDom,
    side: Option<Side>,
    align: Align,
    placement: Option<Placement>,
}

/// Mounts and positions the popover.
#[derive(Debug, Default)]
pub struct PopoverRenderer {
    mounted: Option<Mounted>,
}

impl PopoverRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a popover for `target` under `root`.
    ///
    /// Text and buttons come from `content`, falling back to `config` and the
    /// built-in labels. `on_render` runs after the content is in place and
    /// before positioning, so it may add or restyle nodes. Afterwards the
    /// popover is positioned, scrolled into view, and the first focusable
    /// node of the popover (or of the target) receives focus.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        dom: &mut dyn Dom,
        root: NodeId,
        target: NodeId,
        content: &PopoverContent,
        config: &Config,
        placeholder: bool,
        on_render: &mut dyn FnMut(&mut dyn Dom, &PopoverDom),
    ) -> PopoverDom {
        self.teardown(dom);

        let nodes = build(dom);
        dom.append_child(root, nodes.wrapper);
        fill(dom, &nodes, content, config);

        self.mounted = Some(Mounted {
            dom: nodes,
            side: content.side,
            align: content.align.unwrap_or_default(),
            placement: None,
        });

        on_render(dom, &nodes);

        self.reposition(dom, target, config, placeholder);
        scroll::bring_in_view(dom, nodes.wrapper, config.smooth_scroll);

        let containers: &[NodeId] = if placeholder {
            &[nodes.wrapper]
        } else {
            &[nodes.wrapper, target]
        };
        if let Some(first) = dom.focusable_elements(containers).first() {
            dom.focus(*first);
        }
        nodes
    }

    /// Re-run placement against the current target rectangle.
    pub fn reposition(
        &mut self,
        dom: &mut dyn Dom,
        target: NodeId,
        config: &Config,
        placeholder: bool,
    ) -> Option<Placement> {
        let mounted = self.mounted.as_mut()?;
        let wrapper = mounted.dom.wrapper;

        // Measure at the natural position.
        for property in ["left", "top", "right", "bottom"] {
            dom.set_style(wrapper, property, "");
        }
        let measured = dom.bounding_rect(wrapper);

        let placement = compute_placement(&PlacementRequest {
            viewport: dom.viewport(),
            target: dom.bounding_rect(target),
            popover: Size::new(measured.width, measured.height),
            side: mounted.side,
            align: mounted.align,
            padding: config.stage_padding,
            offset: config.popover_offset,
            placeholder,
        });

        dom.set_style(wrapper, "left", &format!("{}px", placement.rect.x));
        dom.set_style(wrapper, "top", &format!("{}px", placement.rect.y));
        dom.set_style(wrapper, "right", "auto");
        dom.set_style(wrapper, "bottom", "auto");
        apply_arrow(dom, mounted.dom.arrow, &placement);

        tracing::debug!(
            target: "stagelight.popover",
            side = placement.side.as_str(),
            x = placement.rect.x,
            y = placement.rect.y,
            arrow = ?placement.arrow,
            "popover positioned"
        );
        mounted.placement = Some(placement);
        Some(placement)
    }

    /// Hide the mounted popover without removing it.
    pub fn hide(&mut self, dom: &mut dyn Dom) {
        if let Some(m) = &self.mounted {
            dom.set_style(m.dom.wrapper, "display", "none");
        }
    }

    /// Remove the mounted popover, if any.
    pub fn teardown(&mut self, dom: &mut dyn Dom) {
        if let Some(m) = self.mounted.take() {
            dom.remove_node(m.dom.wrapper);
        }
    }

    /// Handles of the mounted popover.
    #[must_use]
    pub fn nodes(&self) -> Option<PopoverDom> {
        self.mounted.as_ref().map(|m| m.dom)
    }

    /// Placement of the last positioning pass.
    #[must_use]
    pub fn placement(&self) -> Option<Placement> {
        self.mounted.as_ref().and_then(|m| m.placement)
    }

    /// Which enabled control `node` belongs to, if any.
    #[must_use]
    pub fn action_for(&self, dom: &dyn Dom, node: NodeId) -> Option<PopoverAction> {
        let m = self.mounted.as_ref()?;
        [
            (m.dom.next_button, PopoverAction::Next),
            (m.dom.previous_button, PopoverAction::Previous),
            (m.dom.close_button, PopoverAction::Close),
        ]
        .into_iter()
        .find(|(button, _)| dom.contains(*button, node))
        .filter(|(button, _)| dom.attribute(*button, "disabled").is_none())
        .map(|(_, action)| action)
    }

    /// Whether `node` is inside the mounted popover.
    #[must_use]
    pub fn contains(&self, dom: &dyn Dom, node: NodeId) -> bool {
        self.mounted
            .as_ref()
            .is_some_and(|m| dom.contains(m.dom.wrapper, node))
    }

    /// Cycle focus within the popover and `target`. See [`focus::cycle_focus`].
    pub fn trap_focus(&self, dom: &mut dyn Dom, target: Option<NodeId>, backwards: bool) {
        let mut containers = Vec::with_capacity(2);
        if let Some(m) = &self.mounted {
            containers.push(m.dom.wrapper);
        }
        containers.extend(target);
        focus::cycle_focus(dom, &containers, backwards);
    }
}

fn element(dom: &mut dyn Dom, tag: &str, class: &str) -> NodeId {
    let node = dom.create_element(tag);
    dom.add_class(node, class);
    node
}

fn build(dom: &mut dyn Dom) -> PopoverDom {
    let wrapper = element(dom, "div", classes::POPOVER);
    dom.set_style(wrapper, "position", "fixed");
    dom.set_attribute(wrapper, "id", classes::POPOVER_CONTENT_ID);
    dom.set_attribute(wrapper, "role", "dialog");
    dom.set_attribute(wrapper, "aria-labelledby", classes::TITLE_ID);
    dom.set_attribute(wrapper, "aria-describedby", classes::DESCRIPTION_ID);

    let arrow = element(dom, "div", classes::POPOVER_ARROW);

    let title = element(dom, "header", classes::TITLE);
    dom.set_attribute(title, "id", classes::TITLE_ID);

    let description = element(dom, "div", classes::DESCRIPTION);
    dom.set_attribute(description, "id", classes::DESCRIPTION_ID);

    let close_button = element(dom, "button", classes::CLOSE_BTN);
    dom.set_attribute(close_button, "type", "button");
    dom.set_attribute(close_button, "aria-label", "Close");
    dom.set_text(close_button, "\u{00d7}");

    let footer = element(dom, "footer", classes::FOOTER);
    let progress = element(dom, "span", classes::PROGRESS);
    let footer_buttons = element(dom, "span", classes::NAV_BTNS);

    let previous_button = element(dom, "button", classes::PREV_BTN);
    dom.set_attribute(previous_button, "type", "button");
    let next_button = element(dom, "button", classes::NEXT_BTN);
    dom.set_attribute(next_button, "type", "button");

    dom.append_child(footer_buttons, previous_button);
    dom.append_child(footer_buttons, next_button);
    dom.append_child(footer, progress);
    dom.append_child(footer, footer_buttons);

    for child in [arrow, title, description, close_button, footer] {
        dom.append_child(wrapper, child);
    }

    PopoverDom {
        wrapper,
        arrow,
        title,
        description,
        close_button,
        footer,
        progress,
        footer_buttons,
        previous_button,
        next_button,
    }
}

fn show(dom: &mut dyn Dom, node: NodeId, visible: bool, display: &str) {
    dom.set_style(node, "display", if visible { display } else { "none" });
}

fn fill(dom: &mut dyn Dom, nodes: &PopoverDom, content: &PopoverContent, config: &Config) {
    show(dom, nodes.wrapper, true, "block");

    for (node, text) in [
        (nodes.title, content.title.as_deref()),
        (nodes.description, content.description.as_deref()),
    ] {
        let text = text.unwrap_or_default();
        dom.set_text(node, text);
        show(dom, node, !text.is_empty(), "block");
    }

    let visible = content
        .show_buttons
        .or(config.show_buttons)
        .unwrap_or_else(Buttons::all);
    let disabled = content
        .disable_buttons
        .or(config.disable_buttons)
        .unwrap_or_default();
    let show_progress = content.show_progress.unwrap_or(config.show_progress);
    let show_footer =
        show_progress || visible.intersects(Buttons::NEXT | Buttons::PREVIOUS);

    show(dom, nodes.close_button, visible.has(Button::Close), "block");

    if show_footer {
        show(dom, nodes.footer, true, "flex");
        show(dom, nodes.progress, show_progress, "block");
        let progress = content
            .progress_text
            .as_deref()
            .or(config.progress_text.as_deref())
            .unwrap_or_default();
        dom.set_text(nodes.progress, progress);
    } else {
        show(dom, nodes.footer, false, "flex");
    }

    let next_text = content
        .next_btn_text
        .as_deref()
        .or(config.next_btn_text.as_deref())
        .unwrap_or(DEFAULT_NEXT_TEXT);
    let prev_text = content
        .prev_btn_text
        .as_deref()
        .or(config.prev_btn_text.as_deref())
        .unwrap_or(DEFAULT_PREV_TEXT);
    dom.set_text(nodes.next_button, next_text);
    dom.set_text(nodes.previous_button, prev_text);

    for (node, button) in [
        (nodes.next_button, Button::Next),
        (nodes.previous_button, Button::Previous),
        (nodes.close_button, Button::Close),
    ] {
        if disabled.has(button) {
            dom.set_attribute(node, "disabled", "");
            dom.add_class(node, classes::BTN_DISABLED);
        }
        if button != Button::Close {
            show(dom, node, visible.has(button), "inline-block");
        }
    }

    let class = content
        .popover_class
        .as_deref()
        .or(config.popover_class.as_deref())
        .unwrap_or_default();
    for c in class.split_whitespace() {
        dom.add_class(nodes.wrapper, c);
    }
}

fn apply_arrow(dom: &mut dyn Dom, arrow: NodeId, placement: &Placement) {
    const SIDES: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];
    const ALIGNS: [Align; 3] = [Align::Start, Align::Center, Align::End];

    dom.remove_class(arrow, classes::ARROW_NONE);
    for side in SIDES {
        dom.remove_class(arrow, &arrow_side_class(side));
    }
    for align in ALIGNS {
        dom.remove_class(arrow, &arrow_align_class(align));
    }

    match placement.arrow {
        Some(a) => {
            dom.add_class(arrow, &arrow_side_class(a.side));
            dom.add_class(arrow, &arrow_align_class(a.align));
        }
        None => dom.add_class(arrow, classes::ARROW_NONE),
    }
}

/// Class marking the arrow's side.
#[must_use]
pub fn arrow_side_class(side: Side) -> String {
    format!("{}-side-{}", classes::POPOVER_ARROW, side.as_str())
}

/// Class marking the arrow's alignment.
#[must_use]
pub fn arrow_align_class(align: Align) -> String {
    format!("{}-align-{}", classes::POPOVER_ARROW, align.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stagelight_core::geometry::Rect;
    use stagelight_web::HeadlessDom;

    fn setup() -> (HeadlessDom, NodeId) {
        let mut dom = HeadlessDom::new(Size::new(1000.0, 800.0))
            .with_intrinsic_size(classes::POPOVER, Size::new(200.0, 100.0));
        let target = dom.add_with_id("target", Rect::new(400.0, 400.0, 100.0, 50.0));
        (dom, target)
    }

    fn render(
        renderer: &mut PopoverRenderer,
        dom: &mut HeadlessDom,
        target: NodeId,
        content: &PopoverContent,
        config: &Config,
    ) -> PopoverDom {
        let body = dom.body();
        renderer.render(dom, body, target, content, config, false, &mut |_, _| {})
    }

    #[test]
    fn renders_text_and_hides_empty_fields() {
        let (mut dom, target) = setup();
        let mut r = PopoverRenderer::new();
        let nodes = render(
            &mut r,
            &mut dom,
            target,
            &PopoverContent::new().title("Hello"),
            &Config::default(),
        );
        assert_eq!(dom.text_content(nodes.title), "Hello");
        assert_eq!(dom.style(nodes.title, "display").as_deref(), Some("block"));
        assert_eq!(dom.style(nodes.description, "display").as_deref(), Some("none"));
        assert_eq!(dom.attribute(nodes.wrapper, "role").as_deref(), Some("dialog"));
    }

    #[test]
    fn rerender_replaces_previous_popover() {
        let (mut dom, target) = setup();
        let mut r = PopoverRenderer::new();
        let content = PopoverContent::new().title("a");
        let first = render(&mut r, &mut dom, target, &content, &Config::default());
        let second = render(&mut r, &mut dom, target, &content, &Config::default());
        assert_ne!(first.wrapper, second.wrapper);
        assert!(!dom.is_connected(first.wrapper));
        assert_eq!(dom.count_with_class(classes::POPOVER), 1);
    }

    #[test]
    fn footer_collapses_without_nav_or_progress() {
        let (mut dom, target) = setup();
        let mut r = PopoverRenderer::new();
        let nodes = render(
            &mut r,
            &mut dom,
            target,
            &PopoverContent::new()
                .title("x")
                .show_buttons(Buttons::CLOSE)
                .show_progress(false),
            &Config::default(),
        );
        assert_eq!(dom.style(nodes.footer, "display").as_deref(), Some("none"));
        assert_eq!(dom.style(nodes.close_button, "display").as_deref(), Some("block"));
    }

    #[test]
    fn step_buttons_override_config() {
        let (mut dom, target) = setup();
        let mut r = PopoverRenderer::new();
        let config = Config::default().show_buttons(Buttons::CLOSE);
        let nodes = render(
            &mut r,
            &mut dom,
            target,
            &PopoverContent::new().show_buttons(Buttons::NEXT),
            &config,
        );
        assert_eq!(dom.style(nodes.next_button, "display").as_deref(), Some("inline-block"));
        assert_eq!(dom.style(nodes.previous_button, "display").as_deref(), Some("none"));
        assert_eq!(dom.style(nodes.close_button, "display").as_deref(), Some("none"));
    }

    #[test]
    fn disabled_button_reports_no_action() {
        let (mut dom, target) = setup();
        let mut r = PopoverRenderer::new();
        let nodes = render(
            &mut r,
            &mut dom,
            target,
            &PopoverContent::new().disable_buttons(Buttons::PREVIOUS),
            &Config::default(),
        );
        assert!(dom.has_class(nodes.previous_button, classes::BTN_DISABLED));
        assert_eq!(r.action_for(&dom, nodes.previous_button), None);
        assert_eq!(r.action_for(&dom, nodes.next_button), Some(PopoverAction::Next));
        assert_eq!(r.action_for(&dom, nodes.close_button), Some(PopoverAction::Close));
        assert_eq!(r.action_for(&dom, nodes.title), None);
    }

    #[test]
    fn labels_fall_back_to_config_then_defaults() {
        let (mut dom, target) = setup();
        let mut r = PopoverRenderer::new();
        let config = Config::default().prev_btn_text("Back");
        let nodes = render(&mut r, &mut dom, target, &PopoverContent::new(), &config);
        assert_eq!(dom.text_content(nodes.previous_button), "Back");
        assert_eq!(dom.text_content(nodes.next_button), DEFAULT_NEXT_TEXT);
    }

    #[test]
    fn positions_inside_viewport_and_sets_arrow() {
        let (mut dom, target) = setup();
        let mut r = PopoverRenderer::new();
        let nodes = render(
            &mut r,
            &mut dom,
            target,
            &PopoverContent::new().side(Side::Bottom).align(Align::Center),
            &Config::default(),
        );
        let rect = dom.bounding_rect(nodes.wrapper);
        assert_eq!(rect, Rect::new(350.0, 470.0, 200.0, 100.0));
        assert!(dom.has_class(nodes.arrow, &arrow_side_class(Side::Bottom)));
        assert!(dom.has_class(nodes.arrow, &arrow_align_class(Align::Center)));
    }

    #[test]
    fn reposition_follows_target_without_remount() {
        let (mut dom, target) = setup();
        let mut r = PopoverRenderer::new();
        let config = Config::default();
        let nodes = render(
            &mut r,
            &mut dom,
            target,
            &PopoverContent::new().side(Side::Bottom),
            &config,
        );
        dom.set_layout(target, Rect::new(100.0, 100.0, 100.0, 50.0));
        let placement = r.reposition(&mut dom, target, &config, false).unwrap();
        assert_eq!(r.nodes(), Some(nodes));
        assert_eq!(dom.bounding_rect(nodes.wrapper), placement.rect);
        assert_eq!(placement.rect.y, 170.0);
    }

    #[test]
    fn hide_then_teardown() {
        let (mut dom, target) = setup();
        let mut r = PopoverRenderer::new();
        let nodes = render(&mut r, &mut dom, target, &PopoverContent::new(), &Config::default());
        r.hide(&mut dom);
        assert_eq!(dom.bounding_rect(nodes.wrapper), Rect::default());
        r.teardown(&mut dom);
        r.teardown(&mut dom);
        assert_eq!(dom.count_with_class(classes::POPOVER), 0);
    }

    #[test]
    fn focuses_first_focusable() {
        let (mut dom, target) = setup();
        let mut r = PopoverRenderer::new();
        let nodes = render(&mut r, &mut dom, target, &PopoverContent::new(), &Config::default());
        assert_eq!(dom.active_element(), Some(nodes.close_button));
    }

    #[test]
    fn render_hook_runs_before_positioning() {
        let (mut dom, target) = setup();
        let mut r = PopoverRenderer::new();
        let body = dom.body();
        let mut seen = None;
        let nodes = r.render(
            &mut dom,
            body,
            target,
            &PopoverContent::new(),
            &Config::default(),
            false,
            &mut |dom, nodes| {
                seen = Some(nodes.wrapper);
                dom.set_style(nodes.wrapper, "width", "300px");
            },
        );
        assert_eq!(seen, Some(nodes.wrapper));
        assert_eq!(r.placement().unwrap().rect.width, 300.0);
    }

    #[test]
    fn popover_class_is_split() {
        let (mut dom, target) = setup();
        let mut r = PopoverRenderer::new();
        let config = Config::default().popover_class("theme-dark wide");
        let nodes = render(&mut r, &mut dom, target, &PopoverContent::new(), &config);
        assert!(dom.has_class(nodes.wrapper, "theme-dark"));
        assert!(dom.has_class(nodes.wrapper, "wide"));
    }
}
