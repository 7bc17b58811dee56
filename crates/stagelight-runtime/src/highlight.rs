#![forbid(unsafe_code)]

//! The highlight state machine.
//!
//! # States
//!
//! - idle: no session state.
//! - active: an element is highlighted and the stage is at rest.
//! - transitioning: an animation loop moves the stage toward a new element.
//!
//! # Cancellation
//!
//! Every highlight bumps the session generation. Each animation frame carries
//! the generation it was requested for, and [`Controller::animate`] refuses
//! to paint for anything but the current one. Starting a new transition is
//! therefore the only way an older loop stops; no frame is ever cancelled to
//! achieve it.
//!
//! # Timing of one highlight
//!
//! 1. Resolve the element, falling back to the placeholder anchor.
//! 2. Hide the current popover.
//! 3. Scroll the element into view.
//! 4. Swap active/previous bookkeeping and the element markers.
//! 5. Paint at once (first highlight, same element, or animation off), or
//!    start a transition from the last painted rectangle. In the latter case
//!    the popover mounts when the transition completes.

use core::time::Duration;

use stagelight_backend::{Dom, FrameScheduler};
use stagelight_core::Config;
use stagelight_core::Result;
use stagelight_core::easing::TRANSITION_DURATION;
use stagelight_core::node::NodeId;
use stagelight_widgets::{PopoverRenderer, StageRenderer, classes, scroll};

use crate::hooks::{Command, HookContext, Hooks, RenderContext, fire};
use crate::state::{SessionState, Transition};
use crate::step::{ElementRef, Step};

/// Borrowed view of the host and session settings the controller works
/// through.
pub struct Env<'a> {
    pub dom: &'a mut dyn Dom,
    pub frames: &'a mut dyn FrameScheduler,
    /// Current monotonic time.
    pub now: Duration,
    pub config: &'a Config,
    pub hooks: &'a Hooks,
    /// Commands queued by hooks.
    pub commands: &'a mut Vec<Command>,
}

/// What an animation frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameOutcome {
    /// Painted an intermediate rectangle and asked for another frame.
    Running,
    /// Painted the final rectangle.
    Completed,
    /// The frame belonged to a superseded loop and painted nothing.
    Stale,
}

/// What a torn-down session left behind, for the post-teardown hooks.
#[derive(Debug, Clone, Default)]
pub struct Teardown {
    /// The element that was active, `None` for the placeholder.
    pub element: Option<NodeId>,
    pub step: Option<Step>,
    /// Focus to restore.
    pub focus: Option<NodeId>,
}

/// Owns the session state and the two renderers.
#[derive(Debug, Default)]
pub struct Controller {
    state: SessionState,
    stage: StageRenderer,
    popover: PopoverRenderer,
}

impl Controller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    #[must_use]
    pub fn stage(&self) -> &StageRenderer {
        &self.stage
    }

    #[must_use]
    pub fn popover(&self) -> &PopoverRenderer {
        &self.popover
    }

    /// Start a session: mark the body and remember who had focus.
    /// Returns `false` when already started.
    pub fn init(&mut self, dom: &mut dyn Dom, config: &Config) -> bool {
        if self.state.initialized {
            return false;
        }
        self.state.initialized = true;
        self.state.focus_before = dom.active_element();
        let body = dom.body();
        dom.add_class(body, classes::ACTIVE);
        dom.add_class(
            body,
            if config.animate {
                classes::FADE
            } else {
                classes::SIMPLE
            },
        );
        true
    }

    /// Make `step` the active step.
    pub fn highlight(&mut self, env: &mut Env<'_>, step: Step) -> Result<()> {
        let target = self.resolve(env.dom, step.element.as_ref());
        self.transfer(env, target, step)
    }

    fn resolve(&mut self, dom: &mut dyn Dom, element: Option<&ElementRef>) -> NodeId {
        let found = match element {
            Some(ElementRef::Selector(selector)) => dom.query_selector(selector),
            Some(ElementRef::Node(node)) => Some(*node).filter(|n| dom.is_connected(*n)),
            None => None,
        };
        if let Some(node) = found {
            return node;
        }
        if let Some(element) = element {
            tracing::warn!(
                target: "stagelight.highlight",
                element = ?element,
                "element not found, highlighting placeholder"
            );
        }
        self.placeholder(dom)
    }

    fn placeholder(&mut self, dom: &mut dyn Dom) -> NodeId {
        if let Some(node) = self.state.placeholder.filter(|n| dom.is_connected(*n)) {
            return node;
        }
        let node = dom.create_element("div");
        dom.set_attribute(node, "id", classes::PLACEHOLDER_ID);
        for (property, value) in [
            ("position", "fixed"),
            ("top", "50%"),
            ("left", "50%"),
            ("width", "0"),
            ("height", "0"),
            ("pointer-events", "none"),
            ("opacity", "0"),
        ] {
            dom.set_style(node, property, value);
        }
        let body = dom.body();
        dom.append_child(body, node);
        self.state.placeholder = Some(node);
        node
    }

    fn transfer(&mut self, env: &mut Env<'_>, to: NodeId, to_step: Step) -> Result<()> {
        let from = self.state.active_element;
        let from_step = self.state.active_step.clone();
        // Re-targeting the element already in flight keeps easing from the
        // last painted rect instead of snapping.
        let in_flight = self.state.transition.is_some_and(|t| t.to == to);
        let is_first = from.is_none_or(|f| f == to && !in_flight);

        if from.is_some_and(|f| f != to) {
            if let Some(step) = &from_step {
                let hook = step.on_deselected.as_ref().or(env.hooks.on_deselected.as_ref());
                let element = self.state.visible(from);
                fire(hook, element, step, env.config, &self.state, env.commands);
            }
        }
        let hook = to_step
            .on_highlight_started
            .as_ref()
            .or(env.hooks.on_highlight_started.as_ref());
        let element = self.state.visible(Some(to));
        fire(hook, element, &to_step, env.config, &self.state, env.commands);

        self.popover.hide(env.dom);
        scroll::bring_in_view(env.dom, to, env.config.smooth_scroll);

        if let Some(previous) = from.filter(|f| *f != to) {
            unmark(env.dom, previous);
        }
        mark(env.dom, to, env.config);

        let generation = self.state.bump_generation();
        self.state.previous_element = from;
        self.state.previous_step = from_step;
        self.state.active_element = Some(to);
        self.state.active_step = Some(to_step);

        tracing::debug!(
            target: "stagelight.highlight",
            element = %to,
            generation,
            first = is_first,
            "highlight started"
        );

        if is_first || !env.config.animate {
            return self.complete(env, to);
        }

        let from_rect = self
            .state
            .active_stage_position
            .unwrap_or_else(|| env.dom.bounding_rect(to));
        let popover_deferred = self
            .state
            .active_step
            .as_ref()
            .is_some_and(|s| s.popover.is_some());
        self.state.transition = Some(Transition {
            generation,
            started_at: env.now,
            from: from_rect,
            to,
            popover_deferred,
        });
        let frame = env.frames.request_frame();
        self.state.track_frame(frame, generation);
        Ok(())
    }

    /// Advance the transition for a frame requested under `generation`.
    pub fn animate(&mut self, env: &mut Env<'_>, generation: u64) -> Result<FrameOutcome> {
        let Some(transition) = self
            .state
            .transition
            .filter(|t| t.generation == generation)
        else {
            tracing::debug!(
                target: "stagelight.highlight",
                generation,
                current = self.state.generation,
                "stale frame rejected"
            );
            return Ok(FrameOutcome::Stale);
        };

        let elapsed = env.now.saturating_sub(transition.started_at);
        if elapsed >= TRANSITION_DURATION || !env.config.animate {
            self.complete(env, transition.to)?;
            return Ok(FrameOutcome::Completed);
        }

        let to = env.dom.bounding_rect(transition.to);
        let root = mount_root(env.dom, env.config);
        let rect = self.stage.animate(
            env.dom,
            root,
            elapsed,
            TRANSITION_DURATION,
            transition.from,
            to,
            env.config,
        )?;
        self.state.active_stage_position = Some(rect);
        let frame = env.frames.request_frame();
        self.state.track_frame(frame, generation);
        Ok(FrameOutcome::Running)
    }

    /// Paint the exact target box, mount the popover and fire `on_highlighted`.
    fn complete(&mut self, env: &mut Env<'_>, to: NodeId) -> Result<()> {
        let rect = env.dom.bounding_rect(to);
        let root = mount_root(env.dom, env.config);
        self.stage.paint(env.dom, root, rect, env.config)?;
        self.state.active_stage_position = Some(rect);
        self.state.transition = None;

        let Some(step) = self.state.active_step.clone() else {
            return Ok(());
        };
        if step.popover.is_some() {
            self.render_popover(env, to, &step);
        } else {
            self.popover.teardown(env.dom);
            self.state.popover = None;
        }

        let hook = step.on_highlighted.as_ref().or(env.hooks.on_highlighted.as_ref());
        let element = self.state.visible(Some(to));
        fire(hook, element, &step, env.config, &self.state, env.commands);
        tracing::debug!(target: "stagelight.highlight", element = %to, "highlight completed");
        Ok(())
    }

    fn render_popover(&mut self, env: &mut Env<'_>, to: NodeId, step: &Step) {
        let Some(popover) = &step.popover else {
            return;
        };
        let root = mount_root(env.dom, env.config);
        let hook = popover
            .on_popover_render
            .clone()
            .or_else(|| env.hooks.on_popover_render.clone());
        let element = self.state.visible(Some(to));
        let placeholder = self.state.is_placeholder(to);
        let state = &self.state;
        let config = env.config;
        let commands = &mut *env.commands;

        let nodes = self.popover.render(
            env.dom,
            root,
            to,
            &popover.content,
            config,
            placeholder,
            &mut |dom, nodes| {
                if let Some(hook) = &hook {
                    let cx = HookContext::new(element, step, config, state, commands);
                    hook(&mut RenderContext::new(dom, *nodes, cx));
                }
            },
        );
        self.state.popover = Some(nodes);
    }

    /// Repaint for the current layout (after a resize or scroll).
    ///
    /// Mid-transition only the last painted rectangle is repainted; the next
    /// frame picks up the new target box anyway.
    pub fn refresh(&mut self, env: &mut Env<'_>) -> Result<()> {
        let Some(active) = self.state.active_element else {
            return Ok(());
        };
        let root = mount_root(env.dom, env.config);
        if self.state.transition.is_some() {
            if let Some(rect) = self.state.active_stage_position {
                self.stage.paint(env.dom, root, rect, env.config)?;
            }
            return Ok(());
        }
        let rect = env.dom.bounding_rect(active);
        self.stage.paint(env.dom, root, rect, env.config)?;
        self.state.active_stage_position = Some(rect);
        let placeholder = self.state.is_placeholder(active);
        self.popover
            .reposition(env.dom, active, env.config, placeholder);
        Ok(())
    }

    /// Cycle focus within the popover and the active element.
    pub fn trap_focus(&self, dom: &mut dyn Dom, backwards: bool) {
        self.popover
            .trap_focus(dom, self.state.active_element, backwards);
    }

    /// Remove every node the session mounted and reset the state.
    pub fn teardown(&mut self, dom: &mut dyn Dom, frames: &mut dyn FrameScheduler) -> Teardown {
        self.stage.teardown(dom);
        self.popover.teardown(dom);
        if let Some(active) = self.state.active_element {
            unmark(dom, active);
        }
        if let Some(placeholder) = self.state.placeholder {
            dom.remove_node(placeholder);
        }
        let body = dom.body();
        for class in [classes::ACTIVE, classes::FADE, classes::SIMPLE] {
            dom.remove_class(body, class);
        }
        for frame in self.state.frames.keys() {
            frames.cancel_frame(*frame);
        }

        let out = Teardown {
            element: self.state.visible(self.state.active_element),
            step: self.state.active_step.take(),
            focus: self.state.focus_before,
        };
        tracing::debug!(
            target: "stagelight.highlight",
            generation = self.state.generation,
            "session torn down"
        );
        self.state.reset();
        out
    }
}

/// Where the stage and popover mount: the `attach` selector or the body.
fn mount_root(dom: &dyn Dom, config: &Config) -> NodeId {
    config
        .attach
        .as_deref()
        .and_then(|selector| dom.query_selector(selector))
        .unwrap_or_else(|| dom.body())
}

fn mark(dom: &mut dyn Dom, node: NodeId, config: &Config) {
    dom.add_class(node, classes::ACTIVE_ELEMENT);
    if config.disable_active_interaction {
        dom.add_class(node, classes::NO_INTERACTION);
    }
    dom.set_attribute(node, "aria-haspopup", "dialog");
    dom.set_attribute(node, "aria-expanded", "true");
    dom.set_attribute(node, "aria-controls", classes::POPOVER_CONTENT_ID);
}

fn unmark(dom: &mut dyn Dom, node: NodeId) {
    dom.remove_class(node, classes::ACTIVE_ELEMENT);
    dom.remove_class(node, classes::NO_INTERACTION);
    for attribute in ["aria-haspopup", "aria-expanded", "aria-controls"] {
        dom.remove_attribute(node, attribute);
    }
}
