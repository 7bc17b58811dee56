#![forbid(unsafe_code)]
#![doc = "Host boundary traits for Stagelight: document access, frame scheduling, and time."]
#![doc = ""]
#![doc = "This crate defines the boundary between the highlight runtime and the page it"]
#![doc = "decorates (a real browser document via `web-sys`, or the in-memory document in"]
#![doc = "`stagelight-web` used by tests). Nothing above this boundary touches a DOM API."]

use core::time::Duration;

use stagelight_core::geometry::{Rect, Size};
use stagelight_core::node::NodeId;

/// Monotonic clock abstraction.
///
/// Browser hosts use `performance.now()`; the headless host is advanced
/// explicitly. The runtime never calls `Instant::now()` directly.
pub trait BackendClock {
    /// Returns elapsed time since an unspecified epoch, monotonically increasing.
    fn now_mono(&self) -> Duration;
}

/// Handle to one requested display frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// The display-refresh primitive (`requestAnimationFrame` on the web).
///
/// A requested frame fires at most once. When it fires, the host hands the
/// handle back to the session.
pub trait FrameScheduler {
    /// Ask for a callback on the next display frame.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a pending request. Unknown or already fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Scroll animation style for [`Dom::scroll_into_view`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollBehavior {
    /// Jump immediately.
    #[default]
    Instant,
    Smooth,
}

/// Where the element should land along an axis after scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollAlign {
    Start,
    #[default]
    Center,
    End,
    Nearest,
}

/// Options for [`Dom::scroll_into_view`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScrollIntoView {
    pub behavior: ScrollBehavior,
    /// Vertical alignment.
    pub block: ScrollAlign,
    /// Horizontal alignment.
    pub inline: ScrollAlign,
}

/// Document access.
///
/// Object safe so renderers can take `&mut dyn Dom`. Operations on nodes that
/// no longer exist are no-ops (queries return empty values), matching how a
/// detached browser node behaves.
pub trait Dom {
    /// Current viewport size (`innerWidth`/`innerHeight`).
    fn viewport(&self) -> Size;

    /// The document body.
    fn body(&self) -> NodeId;

    /// First node matching a simple selector: `#id`, `.class`, or a tag name.
    fn query_selector(&self, selector: &str) -> Option<NodeId>;

    /// Whether the node is attached to the document.
    fn is_connected(&self, node: NodeId) -> bool;

    /// Create a detached element. `svg` and `path` are created in the SVG
    /// namespace.
    fn create_element(&mut self, tag: &str) -> NodeId;

    /// Append `child` as the last child of `parent`, detaching it first.
    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Detach `node` (with its subtree) from its parent.
    fn remove_node(&mut self, node: NodeId);

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn first_child(&self, node: NodeId) -> Option<NodeId>;

    /// Lowercase tag name, `None` for unknown nodes.
    fn tag_name(&self, node: NodeId) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn remove_attribute(&mut self, node: NodeId, name: &str);

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn add_class(&mut self, node: NodeId, class: &str);

    fn remove_class(&mut self, node: NodeId, class: &str);

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Set one inline style property. An empty value removes it.
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    /// Replace the node's children with a text node.
    fn set_text(&mut self, node: NodeId, text: &str);

    fn text_content(&self, node: NodeId) -> String;

    /// Viewport-relative bounding box (`getBoundingClientRect`).
    fn bounding_rect(&self, node: NodeId) -> Rect;

    fn scroll_into_view(&mut self, node: NodeId, options: ScrollIntoView);

    /// Whether the node's parent element scrolls its own content.
    fn has_scrollable_parent(&self, node: NodeId) -> bool;

    /// Focusable descendants of `containers` (containers included when
    /// focusable themselves), in document order.
    fn focusable_elements(&self, containers: &[NodeId]) -> Vec<NodeId>;

    /// The currently focused element, if any besides the body.
    fn active_element(&self) -> Option<NodeId>;

    fn focus(&mut self, node: NodeId);

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Nearest inclusive ancestor carrying `class`.
    fn closest_with_class(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.has_class(n, class) {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }
}

/// A host combining clock, document and frame scheduler.
///
/// Concrete implementations:
/// - `stagelight-web::HeadlessHost`: in-memory document, explicit time.
/// - `stagelight-web::BrowserHost` (wasm32): `web-sys` document.
pub trait Host {
    /// Clock implementation.
    type Clock: BackendClock;

    /// Document implementation.
    type Dom: Dom;

    /// Frame scheduler implementation.
    type Frames: FrameScheduler;

    /// Access the monotonic clock.
    fn clock(&self) -> &Self::Clock;

    /// Read access to the document.
    fn dom(&self) -> &Self::Dom;

    /// Write access to the document.
    fn dom_mut(&mut self) -> &mut Self::Dom;

    /// Access the frame scheduler.
    fn frames(&mut self) -> &mut Self::Frames;

    /// Document and frame scheduler at once, for code that paints and
    /// schedules in the same step.
    fn dom_and_frames(&mut self) -> (&mut Self::Dom, &mut Self::Frames);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct TestClock {
        elapsed: Duration,
    }

    impl BackendClock for TestClock {
        fn now_mono(&self) -> Duration {
            self.elapsed
        }
    }

    #[derive(Default)]
    struct TestFrames {
        next: u64,
        pending: Vec<FrameHandle>,
    }

    impl FrameScheduler for TestFrames {
        fn request_frame(&mut self) -> FrameHandle {
            self.next += 1;
            let handle = FrameHandle(self.next);
            self.pending.push(handle);
            handle
        }

        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.pending.retain(|h| *h != handle);
        }
    }

    /// Only parent links and classes; enough for the provided methods.
    #[derive(Default)]
    struct TreeDom {
        parents: HashMap<NodeId, NodeId>,
        classes: HashMap<NodeId, Vec<String>>,
    }

    impl Dom for TreeDom {
        fn viewport(&self) -> Size {
            Size::new(800.0, 600.0)
        }
        fn body(&self) -> NodeId {
            NodeId(0)
        }
        fn query_selector(&self, _: &str) -> Option<NodeId> {
            None
        }
        fn is_connected(&self, _: NodeId) -> bool {
            true
        }
        fn create_element(&mut self, _: &str) -> NodeId {
            unreachable!()
        }
        fn append_child(&mut self, parent: NodeId, child: NodeId) {
            self.parents.insert(child, parent);
        }
        fn remove_node(&mut self, node: NodeId) {
            self.parents.remove(&node);
        }
        fn parent(&self, node: NodeId) -> Option<NodeId> {
            self.parents.get(&node).copied()
        }
        fn first_child(&self, _: NodeId) -> Option<NodeId> {
            None
        }
        fn tag_name(&self, _: NodeId) -> Option<String> {
            Some("div".into())
        }
        fn set_attribute(&mut self, _: NodeId, _: &str, _: &str) {}
        fn remove_attribute(&mut self, _: NodeId, _: &str) {}
        fn attribute(&self, _: NodeId, _: &str) -> Option<String> {
            None
        }
        fn add_class(&mut self, node: NodeId, class: &str) {
            self.classes.entry(node).or_default().push(class.to_string());
        }
        fn remove_class(&mut self, _: NodeId, _: &str) {}
        fn has_class(&self, node: NodeId, class: &str) -> bool {
            self.classes
                .get(&node)
                .is_some_and(|c| c.iter().any(|c| c == class))
        }
        fn set_style(&mut self, _: NodeId, _: &str, _: &str) {}
        fn style(&self, _: NodeId, _: &str) -> Option<String> {
            None
        }
        fn set_text(&mut self, _: NodeId, _: &str) {}
        fn text_content(&self, _: NodeId) -> String {
            String::new()
        }
        fn bounding_rect(&self, _: NodeId) -> Rect {
            Rect::default()
        }
        fn scroll_into_view(&mut self, _: NodeId, _: ScrollIntoView) {}
        fn has_scrollable_parent(&self, _: NodeId) -> bool {
            false
        }
        fn focusable_elements(&self, _: &[NodeId]) -> Vec<NodeId> {
            Vec::new()
        }
        fn active_element(&self) -> Option<NodeId> {
            None
        }
        fn focus(&mut self, _: NodeId) {}
    }

    fn chain() -> TreeDom {
        // 0 <- 1 <- 2 <- 3
        let mut dom = TreeDom::default();
        dom.append_child(NodeId(0), NodeId(1));
        dom.append_child(NodeId(1), NodeId(2));
        dom.append_child(NodeId(2), NodeId(3));
        dom
    }

    #[test]
    fn clock_returns_elapsed() {
        let clock = TestClock {
            elapsed: Duration::from_millis(42),
        };
        assert_eq!(clock.now_mono(), Duration::from_millis(42));
    }

    #[test]
    fn frames_cancel_removes_pending() {
        let mut frames = TestFrames::default();
        let a = frames.request_frame();
        let b = frames.request_frame();
        assert_ne!(a, b);
        frames.cancel_frame(a);
        frames.cancel_frame(FrameHandle(999));
        assert_eq!(frames.pending, vec![b]);
    }

    #[test]
    fn contains_walks_ancestors() {
        let dom = chain();
        assert!(dom.contains(NodeId(0), NodeId(3)));
        assert!(dom.contains(NodeId(2), NodeId(2)));
        assert!(!dom.contains(NodeId(3), NodeId(1)));
    }

    #[test]
    fn closest_with_class_is_inclusive() {
        let mut dom = chain();
        dom.add_class(NodeId(1), "wrapper");
        dom.add_class(NodeId(3), "leaf");
        assert_eq!(dom.closest_with_class(NodeId(3), "wrapper"), Some(NodeId(1)));
        assert_eq!(dom.closest_with_class(NodeId(3), "leaf"), Some(NodeId(3)));
        assert_eq!(dom.closest_with_class(NodeId(0), "wrapper"), None);
    }

    #[test]
    fn dom_is_object_safe() {
        let mut dom = chain();
        let dyn_dom: &mut dyn Dom = &mut dom;
        assert_eq!(dyn_dom.viewport(), Size::new(800.0, 600.0));
        assert!(dyn_dom.contains(NodeId(0), NodeId(2)));
    }

    #[test]
    fn scroll_options_default() {
        let opts = ScrollIntoView::default();
        assert_eq!(opts.behavior, ScrollBehavior::Instant);
        assert_eq!(opts.block, ScrollAlign::Center);
    }
}
