#![forbid(unsafe_code)]

//! Tab trapping between the popover and the highlighted element.

use stagelight_backend::Dom;
use stagelight_core::node::NodeId;

/// Move focus to the next (or previous) focusable node within `containers`.
///
/// Wraps at both ends. When focus is outside the set, forward movement lands
/// on the first node and backward movement on the last. Returns the node that
/// received focus, or `None` when nothing in the set is focusable.
pub fn cycle_focus(dom: &mut dyn Dom, containers: &[NodeId], backwards: bool) -> Option<NodeId> {
    let focusable = dom.focusable_elements(containers);
    let first = *focusable.first()?;
    let last = *focusable.last()?;

    let index = dom
        .active_element()
        .and_then(|active| focusable.iter().position(|n| *n == active));

    let next = match (index, backwards) {
        (None, false) => first,
        (None, true) => last,
        (Some(i), false) => focusable.get(i + 1).copied().unwrap_or(first),
        (Some(i), true) => i
            .checked_sub(1)
            .and_then(|j| focusable.get(j).copied())
            .unwrap_or(last),
    };
    dom.focus(next);
    Some(next)
}
