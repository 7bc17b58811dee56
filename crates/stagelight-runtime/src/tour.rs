#![forbid(unsafe_code)]

//! The session handle and step-sequence driver.
//!
//! A [`Tour`] owns the host, the config, the hooks and the step list. It has
//! two modes:
//!
//! - **single highlight** ([`Tour::highlight`]): one step, no buttons and no
//!   progress unless the step asks for them.
//! - **sequence** ([`Tour::drive`]): linear navigation over the step list.
//!   Each stop gets computed buttons, labels and progress, overridden by the
//!   step's own popover fields.
//!
//! The host forwards input with [`Tour::handle_event`] and fired frames with
//! [`Tour::on_frame`]. Commands queued by hooks run once the hook returns.

use std::mem;

use stagelight_backend::{BackendClock, Dom, FrameHandle, Host};
use stagelight_core::content::{DEFAULT_DONE_TEXT, DEFAULT_PROGRESS_TEXT};
use stagelight_core::event::Event;
use stagelight_core::node::NodeId;
use stagelight_core::{
    Button, Buttons, Config, Error, OverlayClickBehavior, PopoverContent, Result, format_progress,
};

use crate::bus::{Bus, Signal};
use crate::events::{Disposition, EventLayer};
use crate::highlight::{Controller, Env, FrameOutcome};
use crate::hooks::{Command, Hook, Hooks, fire};
use crate::state::SessionState;
use crate::step::{Step, StepPopover};

/// One guided-tour session over a host document.
pub struct Tour<H: Host> {
    host: H,
    config: Config,
    hooks: Hooks,
    steps: Vec<Step>,
    controller: Controller,
    events: EventLayer,
    bus: Bus<Signal>,
    commands: Vec<Command>,
}

impl<H: Host> Tour<H> {
    /// Create an idle session. Out-of-range config values are clamped and
    /// reported at warn level.
    pub fn new(host: H, config: Config) -> Self {
        Self {
            host,
            config: checked(config),
            hooks: Hooks::default(),
            steps: Vec::new(),
            controller: Controller::new(),
            events: EventLayer::new(),
            bus: Bus::new(),
            commands: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    #[must_use]
    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the config. Takes effect from the next highlight.
    pub fn set_config(&mut self, config: Config) {
        self.config = checked(config);
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn set_hooks(&mut self, hooks: Hooks) {
        self.hooks = hooks;
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Replace the step list. A running session ends first.
    pub fn set_steps(&mut self, steps: Vec<Step>) -> Result<()> {
        self.teardown()?;
        self.steps = steps;
        Ok(())
    }

    pub fn state(&self) -> &SessionState {
        self.controller.state()
    }

    /// Read access to the renderers, for hit-testing and inspection.
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Observe every signal the event layer emits.
    pub fn subscribe(&mut self, listener: impl FnMut(&Signal) + 'static) {
        self.bus.subscribe(listener);
    }

    pub fn is_active(&self) -> bool {
        self.controller.state().is_initialized()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.controller.state().active_index()
    }

    /// The highlighted element, or the placeholder anchor.
    pub fn active_element(&self) -> Option<NodeId> {
        self.controller.state().active_element()
    }

    pub fn previous_element(&self) -> Option<NodeId> {
        self.controller.state().previous_element()
    }

    pub fn active_step(&self) -> Option<&Step> {
        self.controller.state().active_step()
    }

    pub fn previous_step(&self) -> Option<&Step> {
        self.controller.state().previous_step()
    }

    pub fn has_next_step(&self) -> bool {
        self.active_index().is_some_and(|i| i + 1 < self.steps.len())
    }

    pub fn has_previous_step(&self) -> bool {
        self.active_index().is_some_and(|i| i > 0)
    }

    pub fn is_first_step(&self) -> bool {
        self.active_index() == Some(0)
    }

    pub fn is_last_step(&self) -> bool {
        self.active_index()
            .is_some_and(|i| i + 1 == self.steps.len())
    }

    /// Highlight one step outside sequence mode.
    pub fn highlight(&mut self, mut step: Step) -> Result<()> {
        self.start();
        if let Some(popover) = step.popover.as_mut() {
            let defaults = PopoverContent::new()
                .show_buttons(Buttons::empty())
                .show_progress(false)
                .progress_text("");
            popover.content = defaults.overlaid_with(&popover.content);
        }
        self.controller.state_mut().active_index = None;
        self.with_env(|c, env| c.highlight(env, step))?;
        self.flush()
    }

    /// Start sequence mode at `start`.
    ///
    /// An empty step list ends any running session and fails with
    /// [`Error::NoSteps`]. An out-of-range `start` ends the session.
    pub fn drive(&mut self, start: usize) -> Result<()> {
        if self.steps.is_empty() {
            tracing::error!(target: "stagelight.driver", "no steps to drive through");
            self.teardown()?;
            return Err(Error::NoSteps);
        }
        if start >= self.steps.len() {
            tracing::debug!(
                target: "stagelight.driver",
                start,
                total = self.steps.len(),
                "start index out of range"
            );
            return self.teardown();
        }
        self.go_to(start)
    }

    /// Advance one step. Past the last step the session ends.
    pub fn move_next(&mut self) -> Result<()> {
        let Some(index) = self.navigable_index()? else {
            return Ok(());
        };
        if index + 1 < self.steps.len() {
            self.go_to(index + 1)
        } else {
            self.destroy_session(true)
        }
    }

    /// Go back one step. Before the first step the session ends.
    pub fn move_previous(&mut self) -> Result<()> {
        let Some(index) = self.navigable_index()? else {
            return Ok(());
        };
        match index.checked_sub(1) {
            Some(previous) => self.go_to(previous),
            None => self.destroy_session(true),
        }
    }

    /// Jump to `index`. An out-of-range index ends the session.
    pub fn move_to(&mut self, index: usize) -> Result<()> {
        if self.steps.is_empty() {
            tracing::error!(target: "stagelight.driver", "no steps to move through");
            return self.teardown();
        }
        if index < self.steps.len() {
            self.go_to(index)
        } else {
            self.destroy_session(true)
        }
    }

    /// Repaint the stage and reposition the popover for the current layout.
    pub fn refresh(&mut self) -> Result<()> {
        if !self.is_active() {
            return Ok(());
        }
        self.with_env(|c, env| c.refresh(env))?;
        self.flush()
    }

    /// End the session now. Never consults `on_destroy_started`.
    pub fn destroy(&mut self) -> Result<()> {
        self.teardown()
    }

    /// Arbitrate one host input event and act on the signals it produced.
    ///
    /// Errors raised while acting are logged; the disposition is returned
    /// regardless so the host can still decide on default handling.
    pub fn handle_event(&mut self, event: &Event) -> Disposition {
        let (dom, frames) = self.host.dom_and_frames();
        let disposition = self.events.handle(
            event,
            dom,
            frames,
            &self.controller,
            &self.config,
            &mut self.bus,
        );
        if let Err(err) = self.process_signals() {
            tracing::error!(target: "stagelight.driver", error = %err, "signal handling failed");
        }
        disposition
    }

    /// Run a fired frame.
    ///
    /// A pending refresh reports [`FrameOutcome::Completed`]; a frame the
    /// session no longer tracks reports [`FrameOutcome::Stale`].
    pub fn on_frame(&mut self, frame: FrameHandle) -> Result<FrameOutcome> {
        if self.events.take_refresh(frame) {
            self.refresh()?;
            return Ok(FrameOutcome::Completed);
        }
        let Some(generation) = self.controller.state_mut().take_frame(frame) else {
            tracing::debug!(target: "stagelight.driver", frame = frame.0, "untracked frame ignored");
            return Ok(FrameOutcome::Stale);
        };
        let outcome = self.with_env(|c, env| c.animate(env, generation))?;
        self.flush()?;
        Ok(outcome)
    }

    fn start(&mut self) {
        let dom = self.host.dom_mut();
        if self.controller.init(dom, &self.config) {
            self.events.attach();
        }
    }

    fn with_env<R>(&mut self, f: impl FnOnce(&mut Controller, &mut Env<'_>) -> R) -> R {
        let now = self.host.clock().now_mono();
        let (dom, frames) = self.host.dom_and_frames();
        let mut env = Env {
            dom,
            frames,
            now,
            config: &self.config,
            hooks: &self.hooks,
            commands: &mut self.commands,
        };
        f(&mut self.controller, &mut env)
    }

    /// Current index, or `None` when navigation does not apply. An empty
    /// step list ends the session.
    fn navigable_index(&mut self) -> Result<Option<usize>> {
        if self.steps.is_empty() {
            tracing::error!(target: "stagelight.driver", "no steps to move through");
            self.teardown()?;
            return Ok(None);
        }
        Ok(self.active_index())
    }

    fn go_to(&mut self, index: usize) -> Result<()> {
        let Some(step) = self.sequence_step(index) else {
            return Ok(());
        };
        self.start();
        self.controller.state_mut().active_index = Some(index);
        tracing::debug!(
            target: "stagelight.driver",
            index,
            total = self.steps.len(),
            "moving to step"
        );
        self.with_env(|c, env| c.highlight(env, step))?;
        self.flush()
    }

    /// The step at `index` with its popover filled in for sequence mode.
    fn sequence_step(&self, index: usize) -> Option<Step> {
        let mut step = self.steps.get(index)?.clone();
        let total = self.steps.len();
        let Some(popover) = step.popover.as_mut() else {
            return Some(step);
        };
        let own = &popover.content;
        let config = &self.config;

        let mut show = Buttons::NEXT | Buttons::PREVIOUS;
        if config.allow_close {
            show |= Buttons::CLOSE;
        }
        if let Some(configured) = config.show_buttons.filter(|b| !b.is_empty()) {
            show &= configured;
        }
        let mut disable = config.disable_buttons.unwrap_or_default();
        if index == 0 {
            disable |= Buttons::PREVIOUS;
        }

        let mut computed = PopoverContent::new()
            .show_buttons(show)
            .disable_buttons(disable)
            .show_progress(config.show_progress);
        if index + 1 == total {
            let done = own
                .done_btn_text
                .as_deref()
                .or(config.done_btn_text.as_deref())
                .unwrap_or(DEFAULT_DONE_TEXT);
            computed = computed.next_btn_text(done);
        }

        let mut content = computed.overlaid_with(own);
        let template = content
            .progress_text
            .as_deref()
            .or(config.progress_text.as_deref())
            .unwrap_or(DEFAULT_PROGRESS_TEXT);
        content.progress_text = Some(format_progress(template, index + 1, total));
        popover.content = content;
        Some(step)
    }

    fn process_signals(&mut self) -> Result<()> {
        while let Some(signal) = self.bus.pop() {
            self.apply_signal(signal)?;
        }
        Ok(())
    }

    fn apply_signal(&mut self, signal: Signal) -> Result<()> {
        match signal {
            Signal::OverlayClick => match self.config.overlay_click_behavior {
                OverlayClickBehavior::Close if self.config.allow_close => {
                    self.destroy_session(true)
                }
                OverlayClickBehavior::Close => Ok(()),
                OverlayClickBehavior::NextStep => self.move_next(),
            },
            Signal::EscapePress if self.config.allow_close => self.destroy_session(true),
            Signal::EscapePress => Ok(()),
            Signal::ArrowRightPress => self.arrow(Button::Next),
            Signal::ArrowLeftPress => self.arrow(Button::Previous),
            Signal::NextClick => self.navigate(Button::Next),
            Signal::PrevClick => self.navigate(Button::Previous),
            Signal::CloseClick => self.navigate(Button::Close),
        }
    }

    fn arrow(&mut self, button: Button) -> Result<()> {
        let state = self.controller.state();
        if state.is_transitioning() || state.active_index().is_none() {
            return Ok(());
        }
        self.navigate(button)
    }

    /// Run the click hook for `button`, or the default navigation when
    /// neither the step nor the session supplies one.
    fn navigate(&mut self, button: Button) -> Result<()> {
        let state = self.controller.state();
        let Some(step) = state.active_step().cloned() else {
            return Ok(());
        };
        if let Some(hook) = click_hook(step.popover.as_ref(), &self.hooks, button) {
            let element = state.visible(state.active_element());
            fire(Some(&hook), element, &step, &self.config, state, &mut self.commands);
            return self.flush();
        }
        match button {
            Button::Next => self.move_next(),
            Button::Previous => self.move_previous(),
            Button::Close => self.destroy_session(true),
        }
    }

    /// End the session. When `with_hook` is set and `on_destroy_started`
    /// exists, the hook runs instead and decides.
    fn destroy_session(&mut self, with_hook: bool) -> Result<()> {
        if with_hook {
            if let Some(hook) = self.hooks.on_destroy_started.clone() {
                let state = self.controller.state();
                let step = state.active_step().cloned().unwrap_or_default();
                let element = state.visible(state.active_element());
                fire(Some(&hook), element, &step, &self.config, state, &mut self.commands);
                return self.flush();
            }
        }
        self.teardown()
    }

    fn teardown(&mut self) -> Result<()> {
        if !self.is_active() {
            return Ok(());
        }
        let (dom, frames) = self.host.dom_and_frames();
        self.events.detach(frames);
        let torn = self.controller.teardown(dom, frames);
        self.bus.clear();
        if let Some(focus) = torn.focus.filter(|n| dom.is_connected(*n)) {
            dom.focus(focus);
        }
        if let Some(step) = &torn.step {
            let state = self.controller.state();
            let deselected = step.on_deselected.as_ref().or(self.hooks.on_deselected.as_ref());
            fire(deselected, torn.element, step, &self.config, state, &mut self.commands);
            fire(
                self.hooks.on_destroyed.as_ref(),
                torn.element,
                step,
                &self.config,
                state,
                &mut self.commands,
            );
        }
        tracing::debug!(target: "stagelight.driver", "session destroyed");
        self.flush()
    }

    fn flush(&mut self) -> Result<()> {
        loop {
            let batch = mem::take(&mut self.commands);
            if batch.is_empty() {
                return Ok(());
            }
            for command in batch {
                match command {
                    Command::MoveNext => self.move_next()?,
                    Command::MovePrevious => self.move_previous()?,
                    Command::MoveTo(index) => self.move_to(index)?,
                    Command::Destroy => self.teardown()?,
                    Command::Refresh => self.refresh()?,
                }
            }
        }
    }
}

impl<H: Host + std::fmt::Debug> std::fmt::Debug for Tour<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tour")
            .field("host", &self.host)
            .field("config", &self.config)
            .field("hooks", &self.hooks)
            .field("steps", &self.steps.len())
            .field("state", self.controller.state())
            .field("events", &self.events)
            .finish()
    }
}

fn click_hook(popover: Option<&StepPopover>, hooks: &Hooks, button: Button) -> Option<Hook> {
    let (own, session) = match button {
        Button::Next => (popover.and_then(|p| p.on_next_click.as_ref()), &hooks.on_next_click),
        Button::Previous => (popover.and_then(|p| p.on_prev_click.as_ref()), &hooks.on_prev_click),
        Button::Close => (
            popover.and_then(|p| p.on_close_click.as_ref()),
            &hooks.on_close_click,
        ),
    };
    own.or(session.as_ref()).cloned()
}

fn checked(config: Config) -> Config {
    for problem in config.validate() {
        tracing::warn!(target: "stagelight.driver", problem = %problem, "config value out of range");
    }
    config.normalized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use stagelight_core::geometry::{Rect, Size};
    use stagelight_core::{KeyCode, Point};
    use stagelight_web::HeadlessHost;
    use stagelight_widgets::classes;

    const RECTS: [Rect; 5] = [
        Rect::new(100.0, 100.0, 50.0, 50.0),
        Rect::new(300.0, 300.0, 80.0, 40.0),
        Rect::new(500.0, 100.0, 60.0, 60.0),
        Rect::new(100.0, 500.0, 40.0, 40.0),
        Rect::new(700.0, 400.0, 30.0, 30.0),
    ];

    fn host() -> HeadlessHost {
        let mut host = HeadlessHost::new(Size::new(1024.0, 768.0));
        let dom = host.dom_mut();
        dom.set_intrinsic_size(classes::POPOVER, Size::new(200.0, 100.0));
        for (i, rect) in RECTS.iter().enumerate() {
            dom.add_with_id(&format!("s{i}"), *rect);
        }
        host
    }

    fn steps(n: usize) -> Vec<Step> {
        (0..n)
            .map(|i| {
                Step::new(format!("#s{i}"))
                    .popover(PopoverContent::new().title(format!("Step {i}")))
            })
            .collect()
    }

    fn tour(config: Config, n: usize) -> Tour<HeadlessHost> {
        Tour::new(host(), config).with_steps(steps(n))
    }

    fn text(t: &Tour<HeadlessHost>, class: &str) -> String {
        let dom = t.host().dom();
        dom.find_by_class(class)
            .first()
            .map(|n| dom.text_content(*n))
            .unwrap_or_default()
    }

    fn mounted(t: &Tour<HeadlessHost>) -> usize {
        let dom = t.host().dom();
        dom.count_with_class(classes::OVERLAY)
            + dom.count_with_class(classes::POPOVER)
            + dom.count_with_id(classes::PLACEHOLDER_ID)
    }

    #[test]
    fn drive_paints_first_step_and_disables_previous() {
        let mut t = tour(Config::default().animate(false), 2);
        t.drive(0).unwrap();
        assert!(t.is_active());
        assert!(t.is_first_step());
        assert_eq!(t.state().active_stage_position(), Some(RECTS[0]));
        let prev = t.controller.popover().nodes().unwrap().previous_button;
        assert!(t.host().dom().attribute(prev, "disabled").is_some());
        assert_eq!(text(&t, classes::NEXT_BTN), stagelight_core::content::DEFAULT_NEXT_TEXT);
    }

    #[test]
    fn last_step_shows_done() {
        let mut t = tour(Config::default().animate(false).done_btn_text("Finish"), 2);
        t.drive(1).unwrap();
        assert!(t.is_last_step());
        assert!(!t.has_next_step());
        assert!(t.has_previous_step());
        assert_eq!(text(&t, classes::NEXT_BTN), "Finish");
    }

    #[test]
    fn progress_uses_one_based_index() {
        let config = Config::default()
            .animate(false)
            .show_progress(true)
            .progress_text("{current} of {total}");
        let mut t = tour(config, 5);
        t.drive(2).unwrap();
        assert_eq!(text(&t, classes::PROGRESS), "3 of 5");
    }

    #[test]
    fn moving_past_either_end_destroys() {
        let mut t = tour(Config::default().animate(false), 2);
        t.drive(1).unwrap();
        t.move_next().unwrap();
        assert!(!t.is_active());
        assert_eq!(mounted(&t), 0);

        t.drive(0).unwrap();
        t.move_previous().unwrap();
        assert!(!t.is_active());
        assert_eq!(mounted(&t), 0);
    }

    #[test]
    fn drive_without_steps_fails() {
        let mut t = tour(Config::default(), 0);
        assert!(matches!(t.drive(0), Err(Error::NoSteps)));
        assert!(!t.is_active());
    }

    #[test]
    fn drive_out_of_range_ends_quietly() {
        let mut t = tour(Config::default().animate(false), 2);
        t.drive(0).unwrap();
        t.drive(7).unwrap();
        assert!(!t.is_active());
    }

    #[test]
    fn move_to_jumps() {
        let mut t = tour(Config::default().animate(false), 3);
        t.drive(0).unwrap();
        t.move_to(2).unwrap();
        assert_eq!(t.active_index(), Some(2));
        assert_eq!(t.previous_element(), t.host().dom().query_selector("#s0"));
        assert_eq!(t.state().active_stage_position(), Some(RECTS[2]));
    }

    #[test]
    fn single_highlight_has_no_buttons() {
        let mut t = tour(Config::default().animate(false), 0);
        t.highlight(Step::new("#s1").popover(PopoverContent::new().title("Alone")))
            .unwrap();
        assert_eq!(t.active_index(), None);
        let nodes = t.controller.popover().nodes().unwrap();
        let dom = t.host().dom();
        assert_eq!(dom.style(nodes.footer, "display").as_deref(), Some("none"));
        assert_eq!(dom.style(nodes.close_button, "display").as_deref(), Some("none"));
    }

    #[test]
    fn escape_destroys_unless_close_disallowed() {
        let mut t = tour(Config::default().animate(false).allow_close(false), 2);
        t.drive(0).unwrap();
        t.handle_event(&Event::key_up(KeyCode::Escape));
        assert!(t.is_active());

        let mut t = tour(Config::default().animate(false), 2);
        t.drive(0).unwrap();
        t.handle_event(&Event::key_up(KeyCode::Escape));
        assert!(!t.is_active());
    }

    #[test]
    fn arrows_navigate_in_sequence_mode() {
        let mut t = tour(Config::default().animate(false), 3);
        t.drive(0).unwrap();
        t.handle_event(&Event::key_up(KeyCode::ArrowRight));
        assert_eq!(t.active_index(), Some(1));
        t.handle_event(&Event::key_up(KeyCode::ArrowLeft));
        assert_eq!(t.active_index(), Some(0));
    }

    #[test]
    fn arrows_ignored_mid_transition() {
        let mut t = tour(Config::default(), 3);
        t.drive(0).unwrap();
        t.move_next().unwrap();
        assert!(t.state().is_transitioning());
        t.handle_event(&Event::key_up(KeyCode::ArrowRight));
        assert_eq!(t.active_index(), Some(1));
    }

    #[test]
    fn destroy_started_hook_intercepts() {
        let asked = Rc::new(Cell::new(0));
        let counter = Rc::clone(&asked);
        let hooks = Hooks::new().on_destroy_started(move |_| counter.set(counter.get() + 1));
        let mut t = tour(Config::default().animate(false), 2).with_hooks(hooks);
        t.drive(0).unwrap();
        t.handle_event(&Event::key_up(KeyCode::Escape));
        assert_eq!(asked.get(), 1);
        assert!(t.is_active());
        t.destroy().unwrap();
        assert_eq!(asked.get(), 1);
        assert!(!t.is_active());
    }

    #[test]
    fn destroy_started_hook_can_confirm() {
        let hooks = Hooks::new().on_destroy_started(|cx| cx.destroy());
        let mut t = tour(Config::default().animate(false), 1).with_hooks(hooks);
        t.drive(0).unwrap();
        t.move_next().unwrap();
        assert!(!t.is_active());
        assert_eq!(mounted(&t), 0);
    }

    #[test]
    fn click_hook_replaces_navigation() {
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let hooks = Hooks::new().on_next_click(move |_| counter.set(counter.get() + 1));
        let mut t = tour(Config::default().animate(false), 3).with_hooks(hooks);
        t.drive(0).unwrap();
        let next = t.controller.popover().nodes().unwrap().next_button;
        t.handle_event(&Event::click(Point::new(0.0, 0.0), Some(next)));
        assert_eq!(clicks.get(), 1);
        assert_eq!(t.active_index(), Some(0));
    }

    #[test]
    fn next_button_advances_by_default() {
        let mut t = tour(Config::default().animate(false), 3);
        t.drive(0).unwrap();
        let next = t.controller.popover().nodes().unwrap().next_button;
        let d = t.handle_event(&Event::click(Point::new(0.0, 0.0), Some(next)));
        assert!(d.is_consumed());
        assert_eq!(t.active_index(), Some(1));
    }

    #[test]
    fn overlay_click_can_advance() {
        let config = Config::default()
            .animate(false)
            .overlay_click_behavior(OverlayClickBehavior::NextStep);
        let mut t = tour(config, 3);
        t.drive(0).unwrap();
        let d = t.handle_event(&Event::click(Point::new(1000.0, 10.0), None));
        assert!(d.is_consumed());
        assert_eq!(t.active_index(), Some(1));
    }

    #[test]
    fn overlay_click_advances_past_next_click_hook() {
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let hooks = Hooks::new().on_next_click(move |_| counter.set(counter.get() + 1));
        let config = Config::default()
            .animate(false)
            .overlay_click_behavior(OverlayClickBehavior::NextStep);
        let mut t = tour(config, 3).with_hooks(hooks);
        t.drive(0).unwrap();
        t.handle_event(&Event::click(Point::new(1000.0, 10.0), None));
        assert_eq!(clicks.get(), 0);
        assert_eq!(t.active_index(), Some(1));
    }

    #[test]
    fn hook_commands_run_after_the_hook() {
        let hooks = Hooks::new().on_highlighted(|cx| {
            if cx.state().active_index() == Some(0) {
                cx.move_next();
            }
        });
        let mut t = tour(Config::default().animate(false), 3).with_hooks(hooks);
        t.drive(0).unwrap();
        assert_eq!(t.active_index(), Some(1));
    }

    #[test]
    fn teardown_fires_deselected_then_destroyed() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (Rc::clone(&log), Rc::clone(&log));
        let hooks = Hooks::new()
            .on_deselected(move |cx| a.borrow_mut().push(("deselected", cx.element())))
            .on_destroyed(move |cx| b.borrow_mut().push(("destroyed", cx.element())));
        let mut t = tour(Config::default().animate(false), 1).with_hooks(hooks);
        t.drive(0).unwrap();
        let element = t.active_element();
        t.destroy().unwrap();
        assert_eq!(
            *log.borrow(),
            vec![("deselected", element), ("destroyed", element)]
        );
    }

    #[test]
    fn destroy_restores_focus() {
        let mut host = host();
        let dom = host.dom_mut();
        let body = dom.body();
        let input = dom.add_element(body, "input", Rect::new(0.0, 0.0, 10.0, 10.0));
        dom.focus(input);
        let mut t = Tour::new(host, Config::default().animate(false)).with_steps(steps(2));
        t.drive(0).unwrap();
        assert_ne!(t.host().dom().active_element(), Some(input));
        t.destroy().unwrap();
        assert_eq!(t.host().dom().active_element(), Some(input));
    }

    #[test]
    fn config_is_normalized() {
        let t = Tour::new(host(), Config::default().overlay_opacity(3.0).stage_padding(-4.0));
        assert_eq!(t.config().overlay_opacity, 1.0);
        assert_eq!(t.config().stage_padding, 0.0);
    }

    #[test]
    fn set_steps_ends_running_session() {
        let mut t = tour(Config::default().animate(false), 2);
        t.drive(0).unwrap();
        t.set_steps(steps(3)).unwrap();
        assert!(!t.is_active());
        assert_eq!(t.steps().len(), 3);
    }
}
