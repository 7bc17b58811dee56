#![forbid(unsafe_code)]

//! Typed signal bus between the event layer and the session.
//!
//! The event layer only translates input; it never navigates. It emits a
//! [`Signal`] and the session drains the queue after the input is handled,
//! deciding what each signal means under the current config. Observers may
//! subscribe to see every signal as it is emitted.

use std::collections::VecDeque;
use std::fmt;

/// Input the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Click on the dimmed region of the stage.
    OverlayClick,
    EscapePress,
    ArrowLeftPress,
    ArrowRightPress,
    NextClick,
    PrevClick,
    CloseClick,
}

type Listener<T> = Box<dyn FnMut(&T)>;

/// FIFO bus with synchronous observers.
pub struct Bus<T> {
    queue: VecDeque<T>,
    listeners: Vec<Listener<T>>,
}

impl<T> Bus<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            listeners: Vec::new(),
        }
    }

    /// Notify observers and queue `value` for the next drain.
    pub fn emit(&mut self, value: T) {
        for listener in &mut self.listeners {
            listener(&value);
        }
        self.queue.push_back(value);
    }

    /// Observe every emitted value.
    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Oldest queued value.
    pub fn pop(&mut self) -> Option<T> {
        self.queue.pop_front()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop queued values. Observers stay subscribed.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<T> Default for Bus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Bus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("queue", &self.queue)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn drains_in_emit_order() {
        let mut bus = Bus::new();
        bus.emit(Signal::ArrowRightPress);
        bus.emit(Signal::EscapePress);
        assert_eq!(bus.pop(), Some(Signal::ArrowRightPress));
        assert_eq!(bus.pop(), Some(Signal::EscapePress));
        assert_eq!(bus.pop(), None);
    }

    #[test]
    fn observers_see_every_signal() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut bus = Bus::new();
        bus.subscribe(move |s: &Signal| sink.borrow_mut().push(*s));
        bus.emit(Signal::OverlayClick);
        bus.clear();
        bus.emit(Signal::CloseClick);
        assert!(!bus.is_empty());
        assert_eq!(*seen.borrow(), vec![Signal::OverlayClick, Signal::CloseClick]);
    }
}
