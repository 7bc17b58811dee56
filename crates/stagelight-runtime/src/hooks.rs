#![forbid(unsafe_code)]

//! Lifecycle and navigation callbacks.
//!
//! A hook receives a [`HookContext`] describing the element and step it fires
//! for, plus read access to the session config and state. Hooks never get the
//! session itself; they queue [`Command`]s instead, and the session applies
//! them once the hook has returned.
//!
//! Step-level hooks take precedence over the session-wide ones in [`Hooks`].

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use stagelight_backend::Dom;
use stagelight_core::Config;
use stagelight_core::node::NodeId;
use stagelight_widgets::PopoverDom;

use crate::state::SessionState;
use crate::step::Step;

/// Lifecycle or navigation callback.
pub type Hook = Rc<dyn Fn(&mut HookContext<'_>)>;

/// Callback run after a popover is filled and before it is positioned.
pub type RenderHook = Rc<dyn Fn(&mut RenderContext<'_>)>;

/// A session operation requested from inside a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveNext,
    MovePrevious,
    MoveTo(usize),
    /// Tear the session down without consulting `on_destroy_started`.
    Destroy,
    Refresh,
}

/// What a hook sees.
pub struct HookContext<'a> {
    element: Option<NodeId>,
    step: &'a Step,
    config: &'a Config,
    state: &'a SessionState,
    commands: &'a mut Vec<Command>,
}

impl<'a> HookContext<'a> {
    pub(crate) fn new(
        element: Option<NodeId>,
        step: &'a Step,
        config: &'a Config,
        state: &'a SessionState,
        commands: &'a mut Vec<Command>,
    ) -> Self {
        Self {
            element,
            step,
            config,
            state,
            commands,
        }
    }

    /// The element the hook fires for. `None` for the placeholder anchor.
    #[must_use]
    pub fn element(&self) -> Option<NodeId> {
        self.element
    }

    #[must_use]
    pub fn step(&self) -> &Step {
        self.step
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        self.config
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        self.state
    }

    pub fn move_next(&mut self) {
        self.commands.push(Command::MoveNext);
    }

    pub fn move_previous(&mut self) {
        self.commands.push(Command::MovePrevious);
    }

    pub fn move_to(&mut self, index: usize) {
        self.commands.push(Command::MoveTo(index));
    }

    /// Request teardown. Runs after the hook returns.
    pub fn destroy(&mut self) {
        self.commands.push(Command::Destroy);
    }

    pub fn refresh(&mut self) {
        self.commands.push(Command::Refresh);
    }
}

/// What a popover render hook sees: the hook context plus the document and
/// the freshly built popover nodes.
pub struct RenderContext<'a> {
    dom: &'a mut dyn Dom,
    popover: PopoverDom,
    hook: HookContext<'a>,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(dom: &'a mut dyn Dom, popover: PopoverDom, hook: HookContext<'a>) -> Self {
        Self { dom, popover, hook }
    }

    /// Document access for restyling or adding nodes.
    pub fn dom(&mut self) -> &mut dyn Dom {
        &mut *self.dom
    }

    #[must_use]
    pub fn popover(&self) -> &PopoverDom {
        &self.popover
    }
}

impl<'a> Deref for RenderContext<'a> {
    type Target = HookContext<'a>;

    fn deref(&self) -> &Self::Target {
        &self.hook
    }
}

impl DerefMut for RenderContext<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.hook
    }
}

/// Session-wide hooks.
#[derive(Clone, Default)]
pub struct Hooks {
    pub on_popover_render: Option<RenderHook>,
    pub on_highlight_started: Option<Hook>,
    pub on_highlighted: Option<Hook>,
    pub on_deselected: Option<Hook>,
    /// Replaces teardown for user-initiated destroys (Escape, close button,
    /// overlay click, moving past either end). The hook decides, usually by
    /// calling [`HookContext::destroy`].
    pub on_destroy_started: Option<Hook>,
    pub on_destroyed: Option<Hook>,
    pub on_next_click: Option<Hook>,
    pub on_prev_click: Option<Hook>,
    pub on_close_click: Option<Hook>,
}

macro_rules! hook_setters {
    ($($name:ident),* $(,)?) => {
        $(
            #[must_use]
            pub fn $name(mut self, hook: impl Fn(&mut HookContext<'_>) + 'static) -> Self {
                self.$name = Some(Rc::new(hook));
                self
            }
        )*
    };
}

impl Hooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    hook_setters!(
        on_highlight_started,
        on_highlighted,
        on_deselected,
        on_destroy_started,
        on_destroyed,
        on_next_click,
        on_prev_click,
        on_close_click,
    );

    #[must_use]
    pub fn on_popover_render(mut self, hook: impl Fn(&mut RenderContext<'_>) + 'static) -> Self {
        self.on_popover_render = Some(Rc::new(hook));
        self
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_popover_render", &self.on_popover_render.is_some())
            .field("on_highlight_started", &self.on_highlight_started.is_some())
            .field("on_highlighted", &self.on_highlighted.is_some())
            .field("on_deselected", &self.on_deselected.is_some())
            .field("on_destroy_started", &self.on_destroy_started.is_some())
            .field("on_destroyed", &self.on_destroyed.is_some())
            .field("on_next_click", &self.on_next_click.is_some())
            .field("on_prev_click", &self.on_prev_click.is_some())
            .field("on_close_click", &self.on_close_click.is_some())
            .finish()
    }
}

/// Run `hook`, if any, with a fresh context.
pub(crate) fn fire(
    hook: Option<&Hook>,
    element: Option<NodeId>,
    step: &Step,
    config: &Config,
    state: &SessionState,
    commands: &mut Vec<Command>,
) -> bool {
    let Some(hook) = hook else {
        return false;
    };
    let mut cx = HookContext::new(element, step, config, state, commands);
    hook(&mut cx);
    true
}
