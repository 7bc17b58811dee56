#![forbid(unsafe_code)]

//! Per-session highlight state.
//!
//! One [`SessionState`] lives inside each controller; there is no global
//! store. Reset on destroy, except for the generation counter, which keeps
//! counting so frames scheduled by an earlier session can never match.

use core::time::Duration;

use ahash::AHashMap;
use stagelight_backend::FrameHandle;
use stagelight_core::geometry::Rect;
use stagelight_core::node::NodeId;
use stagelight_widgets::PopoverDom;

use crate::step::Step;

/// An in-flight stage animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Token of the animation loop allowed to paint.
    pub generation: u64,
    pub started_at: Duration,
    /// Last painted rectangle when the transition began.
    pub from: Rect,
    pub to: NodeId,
    /// The popover mounts when the transition completes.
    pub popover_deferred: bool,
}

/// Everything the controller tracks between calls.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub(crate) initialized: bool,
    pub(crate) active_index: Option<usize>,
    pub(crate) active_element: Option<NodeId>,
    pub(crate) previous_element: Option<NodeId>,
    pub(crate) active_step: Option<Step>,
    pub(crate) previous_step: Option<Step>,
    pub(crate) active_stage_position: Option<Rect>,
    pub(crate) generation: u64,
    pub(crate) transition: Option<Transition>,
    pub(crate) frames: AHashMap<FrameHandle, u64>,
    pub(crate) placeholder: Option<NodeId>,
    pub(crate) focus_before: Option<NodeId>,
    pub(crate) popover: Option<PopoverDom>,
}

impl SessionState {
    /// Whether a session is running (listeners attached, body marked).
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Position in the step list; `None` outside sequence mode.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    #[must_use]
    pub fn active_element(&self) -> Option<NodeId> {
        self.active_element
    }

    #[must_use]
    pub fn previous_element(&self) -> Option<NodeId> {
        self.previous_element
    }

    #[must_use]
    pub fn active_step(&self) -> Option<&Step> {
        self.active_step.as_ref()
    }

    #[must_use]
    pub fn previous_step(&self) -> Option<&Step> {
        self.previous_step.as_ref()
    }

    /// The last rectangle painted on the stage.
    #[must_use]
    pub fn active_stage_position(&self) -> Option<Rect> {
        self.active_stage_position
    }

    /// Token of the authoritative animation loop.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Handle of the mounted placeholder anchor.
    #[must_use]
    pub fn placeholder(&self) -> Option<NodeId> {
        self.placeholder
    }

    /// Whether `node` is the placeholder anchor.
    #[must_use]
    pub fn is_placeholder(&self, node: NodeId) -> bool {
        self.placeholder == Some(node)
    }

    /// Nodes of the mounted popover.
    #[must_use]
    pub fn popover(&self) -> Option<&PopoverDom> {
        self.popover.as_ref()
    }

    /// `element` as hooks see it: `None` for the placeholder.
    pub(crate) fn visible(&self, element: Option<NodeId>) -> Option<NodeId> {
        element.filter(|e| !self.is_placeholder(*e))
    }

    /// Invalidate every outstanding animation loop and return the new token.
    pub(crate) fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub(crate) fn track_frame(&mut self, frame: FrameHandle, generation: u64) {
        self.frames.insert(frame, generation);
    }

    /// Generation a fired animation frame was requested for.
    pub(crate) fn take_frame(&mut self, frame: FrameHandle) -> Option<u64> {
        self.frames.remove(&frame)
    }

    /// Back to the empty state, keeping the generation counter.
    pub(crate) fn reset(&mut self) {
        *self = Self {
            generation: self.generation + 1,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_keeps_generations_monotone() {
        let mut state = SessionState::default();
        let first = state.bump_generation();
        state.initialized = true;
        state.active_index = Some(2);
        state.track_frame(FrameHandle(1), first);
        state.reset();
        assert!(!state.is_initialized());
        assert_eq!(state.active_index(), None);
        assert!(state.generation() > first);
        assert_eq!(state.take_frame(FrameHandle(1)), None);
    }

    #[test]
    fn frames_are_taken_once() {
        let mut state = SessionState::default();
        let generation = state.bump_generation();
        state.track_frame(FrameHandle(9), generation);
        assert_eq!(state.take_frame(FrameHandle(9)), Some(generation));
        assert_eq!(state.take_frame(FrameHandle(9)), None);
    }

    #[test]
    fn placeholder_is_hidden_from_hooks() {
        let state = SessionState {
            placeholder: Some(NodeId(5)),
            ..SessionState::default()
        };
        assert_eq!(state.visible(Some(NodeId(5))), None);
        assert_eq!(state.visible(Some(NodeId(6))), Some(NodeId(6)));
    }
}
