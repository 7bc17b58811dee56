#![forbid(unsafe_code)]

//! `web-sys` binding of the host traits. Only compiled on `wasm32` targets.
//!
//! The embedder owns listener wiring: it translates DOM events into
//! [`stagelight_core::Event`] values (using [`BrowserHost::node_for`] for
//! pointer targets), feeds them to the session, and calls
//! `preventDefault()`/`stopPropagation()` when the session reports the event
//! as consumed. Fired animation frames are collected by
//! [`BrowserHost::take_ready_frames`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use stagelight_backend::{
    BackendClock, Dom, FrameHandle, FrameScheduler, Host, ScrollAlign, ScrollBehavior,
    ScrollIntoView,
};
use stagelight_core::geometry::{Rect, Size};
use stagelight_core::node::NodeId;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, SvgElement, Window};
use web_time::Instant;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

const FOCUSABLE_QUERY: &str = "a[href]:not([disabled]), button:not([disabled]), \
     textarea:not([disabled]), input[type=\"text\"]:not([disabled]), \
     input[type=\"radio\"]:not([disabled]), input[type=\"checkbox\"]:not([disabled]), \
     select:not([disabled]), [tabindex]:not([tabindex=\"-1\"])";

/// `performance.now()`-backed monotonic clock.
#[derive(Debug, Clone)]
pub struct WebClock {
    origin: Instant,
}

impl BackendClock for WebClock {
    fn now_mono(&self) -> core::time::Duration {
        self.origin.elapsed()
    }
}

/// `requestAnimationFrame` scheduler.
pub struct RafFrames {
    window: Window,
    next_id: u64,
    raf_ids: Rc<RefCell<HashMap<FrameHandle, i32>>>,
    ready: Rc<RefCell<Vec<FrameHandle>>>,
}

impl FrameScheduler for RafFrames {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        let ready = Rc::clone(&self.ready);
        let raf_ids = Rc::clone(&self.raf_ids);
        let callback = Closure::once_into_js(move |_ts: f64| {
            raf_ids.borrow_mut().remove(&handle);
            ready.borrow_mut().push(handle);
        });
        if let Ok(id) = self
            .window
            .request_animation_frame(callback.unchecked_ref())
        {
            self.raf_ids.borrow_mut().insert(handle, id);
        }
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(id) = self.raf_ids.borrow_mut().remove(&handle) {
            let _ = self.window.cancel_animation_frame(id);
        }
        self.ready.borrow_mut().retain(|h| *h != handle);
    }
}

/// Node arena over live `Element`s.
pub struct WebDom {
    window: Window,
    document: Document,
    nodes: RefCell<Vec<Element>>,
}

impl WebDom {
    fn element(&self, node: NodeId) -> Option<Element> {
        self.nodes.borrow().get(node.0 as usize).cloned()
    }

    /// Handle for `element`, registering it on first sight.
    pub fn node_for(&self, element: &Element) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(index) = nodes.iter().position(|e| e == element) {
            return NodeId(index as u32);
        }
        nodes.push(element.clone());
        NodeId((nodes.len() - 1) as u32)
    }

    fn with_style(&self, node: NodeId, f: impl FnOnce(&web_sys::CssStyleDeclaration)) {
        let Some(el) = self.element(node) else {
            return;
        };
        if let Some(html) = el.dyn_ref::<HtmlElement>() {
            f(&html.style());
        } else if let Some(svg) = el.dyn_ref::<SvgElement>() {
            f(&svg.style());
        }
    }
}

fn scroll_position(align: ScrollAlign) -> web_sys::ScrollLogicalPosition {
    match align {
        ScrollAlign::Start => web_sys::ScrollLogicalPosition::Start,
        ScrollAlign::Center => web_sys::ScrollLogicalPosition::Center,
        ScrollAlign::End => web_sys::ScrollLogicalPosition::End,
        ScrollAlign::Nearest => web_sys::ScrollLogicalPosition::Nearest,
    }
}

impl Dom for WebDom {
    fn viewport(&self) -> Size {
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Size::new(dim(self.window.inner_width()), dim(self.window.inner_height()))
    }

    fn body(&self) -> NodeId {
        match self.document.body() {
            Some(body) => self.node_for(&body),
            None => self.document.document_element().map_or(NodeId(0), |e| self.node_for(&e)),
        }
    }

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let el = self.document.query_selector(selector).ok().flatten()?;
        Some(self.node_for(&el))
    }

    fn is_connected(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|e| e.is_connected())
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        let created = if matches!(tag, "svg" | "path") {
            self.document.create_element_ns(Some(SVG_NS), tag)
        } else {
            self.document.create_element(tag)
        };
        match created {
            Ok(el) => self.node_for(&el),
            // Creation only fails for invalid tag names; hand back an inert
            // detached div so callers keep a usable handle.
            Err(_) => self
                .document
                .create_element("div")
                .map_or(NodeId(u32::MAX), |el| self.node_for(&el)),
        }
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let (Some(p), Some(c)) = (self.element(parent), self.element(child)) {
            let _ = p.append_child(&c);
        }
    }

    fn remove_node(&mut self, node: NodeId) {
        if let Some(el) = self.element(node) {
            el.remove();
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.element(node)?.parent_element()?;
        Some(self.node_for(&parent))
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        let child = self.element(node)?.first_element_child()?;
        Some(self.node_for(&child))
    }

    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.element(node).map(|e| e.tag_name().to_ascii_lowercase())
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element(node) {
            let _ = el.set_attribute(name, value);
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.element(node) {
            let _ = el.remove_attribute(name);
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?.get_attribute(name)
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element(node) {
            let _ = el.class_list().add_1(class);
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element(node) {
            let _ = el.class_list().remove_1(class);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|e| e.class_list().contains(class))
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        self.with_style(node, |style| {
            if value.is_empty() {
                let _ = style.remove_property(property);
            } else {
                let _ = style.set_property(property, value);
            }
        });
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        let mut out = None;
        self.with_style(node, |style| {
            out = style
                .get_property_value(property)
                .ok()
                .filter(|v| !v.is_empty());
        });
        out
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(el) = self.element(node) {
            el.set_text_content(Some(text));
        }
    }

    fn text_content(&self, node: NodeId) -> String {
        self.element(node)
            .and_then(|e| e.text_content())
            .unwrap_or_default()
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        self.element(node).map_or_else(Rect::default, |e| {
            let r = e.get_bounding_client_rect();
            Rect::new(r.x(), r.y(), r.width(), r.height())
        })
    }

    fn scroll_into_view(&mut self, node: NodeId, options: ScrollIntoView) {
        let Some(el) = self.element(node) else {
            return;
        };
        let opts = web_sys::ScrollIntoViewOptions::new();
        opts.set_behavior(match options.behavior {
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        });
        opts.set_block(scroll_position(options.block));
        opts.set_inline(scroll_position(options.inline));
        el.scroll_into_view_with_scroll_into_view_options(&opts);
    }

    fn has_scrollable_parent(&self, node: NodeId) -> bool {
        self.element(node)
            .and_then(|e| e.parent_element())
            .is_some_and(|p| p.scroll_height() > p.client_height())
    }

    fn focusable_elements(&self, containers: &[NodeId]) -> Vec<NodeId> {
        let mut out = Vec::new();
        for &container in containers {
            let Some(el) = self.element(container) else {
                continue;
            };
            if el.matches(FOCUSABLE_QUERY).unwrap_or(false) {
                out.push(container);
            }
            let Ok(list) = el.query_selector_all(FOCUSABLE_QUERY) else {
                continue;
            };
            for i in 0..list.length() {
                if let Some(child) = list.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    let id = self.node_for(&child);
                    if !out.contains(&id) {
                        out.push(id);
                    }
                }
            }
        }
        out
    }

    fn active_element(&self) -> Option<NodeId> {
        let el = self.document.active_element()?;
        if self.document.body().is_some_and(|b| *b == el) {
            return None;
        }
        Some(self.node_for(&el))
    }

    fn focus(&mut self, node: NodeId) {
        if let Some(html) = self.element(node).and_then(|e| e.dyn_into::<HtmlElement>().ok()) {
            let _ = html.focus();
        }
    }
}

/// Host over the live browser document.
pub struct BrowserHost {
    clock: WebClock,
    dom: WebDom,
    frames: RafFrames,
}

impl BrowserHost {
    /// Bind to the global `window`. Returns `None` outside a window context.
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self {
            clock: WebClock {
                origin: Instant::now(),
            },
            dom: WebDom {
                window: window.clone(),
                document,
                nodes: RefCell::new(Vec::new()),
            },
            frames: RafFrames {
                window,
                next_id: 0,
                raf_ids: Rc::new(RefCell::new(HashMap::new())),
                ready: Rc::new(RefCell::new(Vec::new())),
            },
        })
    }

    /// Handle for a DOM element, e.g. an event target.
    pub fn node_for(&self, element: &Element) -> NodeId {
        self.dom.node_for(element)
    }

    /// Frames that fired since the last call, oldest first.
    pub fn take_ready_frames(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut *self.frames.ready.borrow_mut())
    }
}

impl Host for BrowserHost {
    type Clock = WebClock;
    type Dom = WebDom;
    type Frames = RafFrames;

    fn clock(&self) -> &Self::Clock {
        &self.clock
    }

    fn dom(&self) -> &Self::Dom {
        &self.dom
    }

    fn dom_mut(&mut self) -> &mut Self::Dom {
        &mut self.dom
    }

    fn frames(&mut self) -> &mut Self::Frames {
        &mut self.frames
    }

    fn dom_and_frames(&mut self) -> (&mut Self::Dom, &mut Self::Frames) {
        (&mut self.dom, &mut self.frames)
    }
}
