#![forbid(unsafe_code)]

//! Scroll-into-view policy.

use stagelight_backend::{Dom, ScrollAlign, ScrollBehavior, ScrollIntoView};
use stagelight_core::node::NodeId;

/// Scroll `node` into view unless it is already fully visible.
///
/// Smooth scrolling is only requested when enabled and the node has no
/// scrollable parent, since nested smooth scrolls tend to stop short. Nodes
/// taller than the viewport are aligned to the top, everything else is
/// centered. Returns whether a scroll was requested.
pub fn bring_in_view(dom: &mut dyn Dom, node: NodeId, smooth: bool) -> bool {
    let rect = dom.bounding_rect(node);
    let viewport = dom.viewport();
    if rect.is_within(viewport) {
        return false;
    }

    let behavior = if smooth && !dom.has_scrollable_parent(node) {
        ScrollBehavior::Smooth
    } else {
        ScrollBehavior::Instant
    };
    let block = if rect.height > viewport.height {
        ScrollAlign::Start
    } else {
        ScrollAlign::Center
    };
    dom.scroll_into_view(
        node,
        ScrollIntoView {
            behavior,
            block,
            inline: ScrollAlign::Center,
        },
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stagelight_core::geometry::{Rect, Size};
    use stagelight_web::HeadlessDom;

    fn dom() -> HeadlessDom {
        let mut dom = HeadlessDom::new(Size::new(800.0, 600.0));
        dom.add_with_id("end", Rect::new(0.0, 4000.0, 10.0, 10.0));
        dom
    }

    #[test]
    fn visible_node_is_left_alone() {
        let mut dom = dom();
        let n = dom.add_with_id("n", Rect::new(10.0, 10.0, 100.0, 100.0));
        assert!(!bring_in_view(&mut dom, n, true));
        assert!(dom.scroll_log().is_empty());
    }

    #[test]
    fn offscreen_node_is_centered_smoothly() {
        let mut dom = dom();
        let n = dom.add_with_id("n", Rect::new(10.0, 2000.0, 100.0, 100.0));
        assert!(bring_in_view(&mut dom, n, true));
        let record = dom.scroll_log()[0];
        assert_eq!(record.options.behavior, ScrollBehavior::Smooth);
        assert_eq!(record.options.block, ScrollAlign::Center);
        assert_eq!(dom.bounding_rect(n).center().y, 300.0);
    }

    #[test]
    fn tall_node_aligns_to_start() {
        let mut dom = dom();
        let n = dom.add_with_id("n", Rect::new(10.0, 2000.0, 100.0, 900.0));
        bring_in_view(&mut dom, n, false);
        let record = dom.scroll_log()[0];
        assert_eq!(record.options.behavior, ScrollBehavior::Instant);
        assert_eq!(record.options.block, ScrollAlign::Start);
        assert_eq!(dom.bounding_rect(n).y, 0.0);
    }

    #[test]
    fn scrollable_parent_disables_smooth() {
        let mut dom = dom();
        let body = dom.body();
        let pane = dom.add_element(body, "div", Rect::new(0.0, 0.0, 800.0, 4000.0));
        dom.set_scrollable(pane, true);
        let n = dom.add_element(pane, "div", Rect::new(10.0, 2000.0, 100.0, 100.0));
        bring_in_view(&mut dom, n, true);
        assert_eq!(dom.scroll_log()[0].options.behavior, ScrollBehavior::Instant);
    }
}
