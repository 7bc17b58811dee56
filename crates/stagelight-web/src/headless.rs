#![forbid(unsafe_code)]

//! In-memory document for deterministic tests.
//!
//! [`HeadlessDom`] keeps a node arena with attributes, classes, inline styles
//! and text. Layout is supplied by the test: page elements get a
//! document-space rectangle, and the document scrolls as a whole.
//!
//! Library-owned nodes are `position: fixed`; their box is derived from the
//! inline `left`/`top`/`right`/`bottom`/`width`/`height` styles (`px` or `%`
//! of the viewport), falling back to an intrinsic size registered per class.
//! That is enough to measure a popover, position it, and read it back.

use ahash::{AHashMap, AHashSet};
use stagelight_backend::{Dom, ScrollAlign, ScrollIntoView};
use stagelight_core::geometry::{Point, Rect, Size};
use stagelight_core::node::NodeId;

#[derive(Debug, Clone, Default)]
struct NodeData {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: AHashMap<String, String>,
    classes: Vec<String>,
    styles: AHashMap<String, String>,
    text: String,
    /// Document-space box of page content.
    layout: Option<Rect>,
}

/// One call to [`Dom::scroll_into_view`], as recorded by the headless document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRecord {
    pub node: NodeId,
    pub options: ScrollIntoView,
}

/// Deterministic in-memory document.
#[derive(Debug, Clone)]
pub struct HeadlessDom {
    nodes: Vec<NodeData>,
    body: NodeId,
    viewport: Size,
    scroll: Point,
    scrollable: AHashSet<NodeId>,
    focused: Option<NodeId>,
    intrinsic: Vec<(String, Size)>,
    scroll_log: Vec<ScrollRecord>,
}

impl HeadlessDom {
    /// Empty document (just a body) with the given viewport.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        let body = NodeData {
            tag: "body".to_string(),
            ..NodeData::default()
        };
        Self {
            nodes: vec![body],
            body: NodeId(0),
            viewport,
            scroll: Point::default(),
            scrollable: AHashSet::new(),
            focused: None,
            intrinsic: Vec::new(),
            scroll_log: Vec::new(),
        }
    }

    /// Register the size a fixed node carrying `class` takes when its inline
    /// styles do not say otherwise.
    #[must_use]
    pub fn with_intrinsic_size(mut self, class: &str, size: Size) -> Self {
        self.set_intrinsic_size(class, size);
        self
    }

    /// See [`with_intrinsic_size`](Self::with_intrinsic_size).
    pub fn set_intrinsic_size(&mut self, class: &str, size: Size) {
        if let Some(entry) = self.intrinsic.iter_mut().find(|(c, _)| c == class) {
            entry.1 = size;
        } else {
            self.intrinsic.push((class.to_string(), size));
        }
    }

    /// Append a page element with a document-space box.
    pub fn add_element(&mut self, parent: NodeId, tag: &str, layout: Rect) -> NodeId {
        let node = self.create_element(tag);
        self.set_layout(node, layout);
        self.append_child(parent, node);
        node
    }

    /// Append a `div` with `id` directly under the body.
    pub fn add_with_id(&mut self, id: &str, layout: Rect) -> NodeId {
        let body = self.body;
        let node = self.add_element(body, "div", layout);
        self.set_attribute(node, "id", id);
        node
    }

    /// Set the document-space box of a node.
    pub fn set_layout(&mut self, node: NodeId, layout: Rect) {
        if let Some(data) = self.node_mut(node) {
            data.layout = Some(layout);
        }
    }

    /// Resize the viewport. The host still has to deliver the resize event.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Current document scroll offset.
    #[must_use]
    pub const fn scroll_offset(&self) -> Point {
        self.scroll
    }

    /// Scroll the document without going through `scroll_into_view`.
    pub fn set_scroll_offset(&mut self, offset: Point) {
        self.scroll = offset;
    }

    /// Mark whether `node` scrolls its own content.
    pub fn set_scrollable(&mut self, node: NodeId, scrollable: bool) {
        if scrollable {
            self.scrollable.insert(node);
        } else {
            self.scrollable.remove(&node);
        }
    }

    /// Every `scroll_into_view` call so far.
    #[must_use]
    pub fn scroll_log(&self) -> &[ScrollRecord] {
        &self.scroll_log
    }

    pub fn clear_scroll_log(&mut self) {
        self.scroll_log.clear();
    }

    /// Children of `node` in order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map_or(&[], |d| d.children.as_slice())
    }

    /// Connected nodes carrying `class`, in document order.
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        self.walk(self.body)
            .into_iter()
            .filter(|n| self.has_class(*n, class))
            .collect()
    }

    /// Number of connected nodes carrying `class`.
    #[must_use]
    pub fn count_with_class(&self, class: &str) -> usize {
        self.find_by_class(class).len()
    }

    /// Number of connected nodes whose `id` attribute is `id`.
    #[must_use]
    pub fn count_with_id(&self, id: &str) -> usize {
        self.walk(self.body)
            .into_iter()
            .filter(|n| self.attribute(*n, "id").as_deref() == Some(id))
            .count()
    }

    fn node(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node.0 as usize)
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(node.0 as usize)
    }

    /// Pre-order traversal of `root` and its descendants.
    fn walk(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            let Some(data) = self.node(n) else {
                continue;
            };
            out.push(n);
            stack.extend(data.children.iter().rev().copied());
        }
        out
    }

    fn is_hidden(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            let Some(data) = self.node(n) else {
                return true;
            };
            if data.styles.get("display").is_some_and(|d| d == "none") {
                return true;
            }
            current = data.parent;
        }
        false
    }

    fn is_fixed(data: &NodeData) -> bool {
        data.styles.get("position").is_some_and(|p| p == "fixed")
    }

    fn intrinsic_size(&self, data: &NodeData) -> Option<Size> {
        self.intrinsic
            .iter()
            .find(|(class, _)| data.classes.iter().any(|c| c == class))
            .map(|(_, size)| *size)
    }

    fn fixed_rect(&self, data: &NodeData) -> Rect {
        let vp = self.viewport;
        let intrinsic = self.intrinsic_size(data);
        let style = |name: &str, reference: f64| css_length(data.styles.get(name), reference);

        let width = style("width", vp.width)
            .or(intrinsic.map(|s| s.width))
            .or(data.layout.map(|r| r.width))
            .unwrap_or(0.0);
        let height = style("height", vp.height)
            .or(intrinsic.map(|s| s.height))
            .or(data.layout.map(|r| r.height))
            .unwrap_or(0.0);

        let x = match (style("left", vp.width), style("right", vp.width)) {
            (Some(left), _) => left,
            (None, Some(right)) => vp.width - right - width,
            (None, None) => 0.0,
        };
        let y = match (style("top", vp.height), style("bottom", vp.height)) {
            (Some(top), _) => top,
            (None, Some(bottom)) => vp.height - bottom - height,
            (None, None) => 0.0,
        };
        Rect::new(x, y, width, height)
    }

    /// Extent of the scrollable document.
    fn document_size(&self) -> Size {
        let mut size = self.viewport;
        for data in &self.nodes {
            if let Some(r) = data.layout {
                size.width = size.width.max(r.right());
                size.height = size.height.max(r.bottom());
            }
        }
        size
    }

    fn is_focusable(&self, node: NodeId) -> bool {
        let Some(data) = self.node(node) else {
            return false;
        };
        if data.attributes.contains_key("disabled")
            || data.styles.get("pointer-events").is_some_and(|p| p == "none")
            || self.is_hidden(node)
        {
            return false;
        }
        match data.tag.as_str() {
            "button" | "input" | "select" | "textarea" => true,
            "a" => data.attributes.contains_key("href"),
            _ => data
                .attributes
                .get("tabindex")
                .and_then(|t| t.parse::<i32>().ok())
                .is_some_and(|t| t >= 0),
        }
    }
}

/// Parse a `px`, `%` or bare-zero CSS length.
fn css_length(value: Option<&String>, reference: f64) -> Option<f64> {
    let v = value?.trim();
    if let Some(px) = v.strip_suffix("px") {
        px.trim().parse().ok()
    } else if let Some(pct) = v.strip_suffix('%') {
        pct.trim()
            .parse::<f64>()
            .ok()
            .map(|p| reference * p / 100.0)
    } else if v == "0" {
        Some(0.0)
    } else {
        None
    }
}

fn aligned_scroll(start: f64, len: f64, view: f64, current: f64, align: ScrollAlign) -> f64 {
    match align {
        ScrollAlign::Start => start,
        ScrollAlign::Center => start + len / 2.0 - view / 2.0,
        ScrollAlign::End => start + len - view,
        ScrollAlign::Nearest => {
            if start < current {
                start
            } else if start + len > current + view {
                start + len - view
            } else {
                current
            }
        }
    }
}

impl Dom for HeadlessDom {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn body(&self) -> NodeId {
        self.body
    }

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let selector = selector.trim();
        self.walk(self.body).into_iter().find(|n| {
            if let Some(id) = selector.strip_prefix('#') {
                self.attribute(*n, "id").as_deref() == Some(id)
            } else if let Some(class) = selector.strip_prefix('.') {
                self.has_class(*n, class)
            } else {
                self.node(*n)
                    .is_some_and(|d| d.tag.eq_ignore_ascii_case(selector))
            }
        })
    }

    fn is_connected(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == self.body {
                return true;
            }
            current = self.node(n).and_then(|d| d.parent);
        }
        false
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            tag: tag.to_ascii_lowercase(),
            ..NodeData::default()
        });
        id
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.node(parent).is_none() || self.node(child).is_none() || self.contains(child, parent)
        {
            return;
        }
        self.remove_node(child);
        if let Some(data) = self.node_mut(child) {
            data.parent = Some(parent);
        }
        if let Some(data) = self.node_mut(parent) {
            data.children.push(child);
        }
    }

    fn remove_node(&mut self, node: NodeId) {
        let Some(parent) = self.node(node).and_then(|d| d.parent) else {
            return;
        };
        if let Some(data) = self.node_mut(parent) {
            data.children.retain(|c| *c != node);
        }
        if let Some(data) = self.node_mut(node) {
            data.parent = None;
        }
        if self.focused.is_some_and(|f| self.contains(node, f)) {
            self.focused = None;
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|d| d.parent)
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|d| d.children.first().copied())
    }

    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.node(node).map(|d| d.tag.clone())
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(data) = self.node_mut(node) {
            data.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(data) = self.node_mut(node) {
            data.attributes.remove(name);
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.node(node).and_then(|d| d.attributes.get(name).cloned())
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(data) = self.node_mut(node) {
            if !data.classes.iter().any(|c| c == class) {
                data.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(data) = self.node_mut(node) {
            data.classes.retain(|c| c != class);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node)
            .is_some_and(|d| d.classes.iter().any(|c| c == class))
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(data) = self.node_mut(node) {
            if value.is_empty() {
                data.styles.remove(property);
            } else {
                data.styles.insert(property.to_string(), value.to_string());
            }
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.node(node).and_then(|d| d.styles.get(property).cloned())
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        let children = self.children(node).to_vec();
        for child in children {
            self.remove_node(child);
        }
        if let Some(data) = self.node_mut(node) {
            data.text = text.to_string();
        }
    }

    fn text_content(&self, node: NodeId) -> String {
        self.walk(node)
            .into_iter()
            .filter_map(|n| self.node(n))
            .map(|d| d.text.as_str())
            .collect()
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        if !self.is_connected(node) || self.is_hidden(node) {
            return Rect::default();
        }
        let Some(data) = self.node(node) else {
            return Rect::default();
        };
        if Self::is_fixed(data) {
            return self.fixed_rect(data);
        }
        data.layout
            .map(|r| r.translate(-self.scroll.x, -self.scroll.y))
            .unwrap_or_default()
    }

    fn scroll_into_view(&mut self, node: NodeId, options: ScrollIntoView) {
        self.scroll_log.push(ScrollRecord { node, options });
        let Some(data) = self.node(node) else {
            return;
        };
        if Self::is_fixed(data) {
            return;
        }
        let Some(rect) = data.layout else {
            return;
        };
        let doc = self.document_size();
        let vp = self.viewport;
        let max_x = (doc.width - vp.width).max(0.0);
        let max_y = (doc.height - vp.height).max(0.0);
        let y = aligned_scroll(rect.y, rect.height, vp.height, self.scroll.y, options.block);
        let x = aligned_scroll(rect.x, rect.width, vp.width, self.scroll.x, options.inline);
        self.scroll = Point::new(x.clamp(0.0, max_x), y.clamp(0.0, max_y));
    }

    fn has_scrollable_parent(&self, node: NodeId) -> bool {
        self.parent(node)
            .is_some_and(|p| self.scrollable.contains(&p))
    }

    fn focusable_elements(&self, containers: &[NodeId]) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = Vec::new();
        for &container in containers {
            if !self.is_connected(container) {
                continue;
            }
            for n in self.walk(container) {
                if self.is_focusable(n) && !out.contains(&n) {
                    out.push(n);
                }
            }
        }
        out
    }

    fn active_element(&self) -> Option<NodeId> {
        self.focused.filter(|f| self.is_connected(*f))
    }

    fn focus(&mut self, node: NodeId) {
        if self.is_connected(node) {
            self.focused = Some(node);
        }
    }
}
