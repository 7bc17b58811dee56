#![forbid(unsafe_code)]

//! `stagelight-web` provides the hosts a Stagelight session runs against.
//!
//! Design goals:
//! - **Host-driven frames**: the embedder decides when a display frame fires
//!   and hands the frame handle back to the session.
//! - **Deterministic time**: the headless host advances a monotonic clock
//!   explicitly, so transitions can be sampled at exact instants.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! [`HeadlessHost`] pairs an in-memory [`HeadlessDom`] with those two
//! pieces and is what the test suites drive. On `wasm32` targets,
//! `BrowserHost` binds the same traits to the real document.

pub mod headless;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::BrowserHost;

use core::time::Duration;

use stagelight_backend::{BackendClock, FrameHandle, FrameScheduler, Host};
use stagelight_core::geometry::Size;

pub use headless::HeadlessDom;

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl BackendClock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// Frame scheduler that queues requests until the host fires them.
#[derive(Debug, Default, Clone)]
pub struct HostFrames {
    next_id: u64,
    pending: Vec<FrameHandle>,
    requested_total: u64,
    cancelled_total: u64,
}

impl HostFrames {
    /// Create an empty scheduler.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
            requested_total: 0,
            cancelled_total: 0,
        }
    }

    /// Requests that have not fired or been cancelled, oldest first.
    #[must_use]
    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    /// Take every pending request; they count as fired.
    pub fn take_ready(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }

    /// Number of frames requested over the scheduler's lifetime.
    #[must_use]
    pub const fn requested_total(&self) -> u64 {
        self.requested_total
    }

    /// Number of pending requests that were cancelled.
    #[must_use]
    pub const fn cancelled_total(&self) -> u64 {
        self.cancelled_total
    }
}

impl FrameScheduler for HostFrames {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requested_total += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        if self.pending.len() != before {
            self.cancelled_total += 1;
        }
    }
}

/// In-memory host: headless document, explicit clock, queued frames.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    clock: DeterministicClock,
    dom: HeadlessDom,
    frames: HostFrames,
}

impl HeadlessHost {
    /// Create a host with an empty document of the given viewport size.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self::with_dom(HeadlessDom::new(viewport))
    }

    /// Create a host around a prepared document.
    #[must_use]
    pub fn with_dom(dom: HeadlessDom) -> Self {
        Self {
            clock: DeterministicClock::new(),
            dom,
            frames: HostFrames::new(),
        }
    }

    /// Advance the clock by `dt` and fire every pending frame.
    ///
    /// The returned handles must be passed back to the session in order.
    pub fn advance_frame(&mut self, dt: Duration) -> Vec<FrameHandle> {
        self.clock.advance(dt);
        self.frames.take_ready()
    }

    /// Mutable clock access for tests that need to move time without firing
    /// frames.
    pub fn clock_mut(&mut self) -> &mut DeterministicClock {
        &mut self.clock
    }

    /// Read-only view of the frame queue.
    #[must_use]
    pub fn frame_queue(&self) -> &HostFrames {
        &self.frames
    }
}

impl Host for HeadlessHost {
    type Clock = DeterministicClock;
    type Dom = HeadlessDom;
    type Frames = HostFrames;

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_clock_advances() {
        let mut clock = DeterministicClock::new();
        assert_eq!(clock.now_mono(), Duration::ZERO);
        clock.advance(Duration::from_millis(16));
        clock.advance(Duration::from_millis(16));
        assert_eq!(clock.now_mono(), Duration::from_millis(32));
        clock.set(Duration::from_secs(1));
        assert_eq!(clock.now_mono(), Duration::from_secs(1));
    }

    #[test]
    fn clock_advance_saturates() {
        let mut clock = DeterministicClock::new();
        clock.set(Duration::MAX);
        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.now_mono(), Duration::MAX);
    }

    #[test]
    fn frames_fire_once() {
        let mut frames = HostFrames::new();
        let a = frames.request_frame();
        let b = frames.request_frame();
        assert_eq!(frames.take_ready(), vec![a, b]);
        assert!(frames.take_ready().is_empty());
        assert_eq!(frames.requested_total(), 2);
    }

    #[test]
    fn cancel_counts_only_pending() {
        let mut frames = HostFrames::new();
        let a = frames.request_frame();
        frames.cancel_frame(a);
        frames.cancel_frame(a);
        assert_eq!(frames.cancelled_total(), 1);
        assert!(frames.pending().is_empty());
    }

    #[test]
    fn advance_frame_moves_clock_and_drains() {
        let mut host = HeadlessHost::new(Size::new(1024.0, 768.0));
        let handle = host.frames().request_frame();
        let fired = host.advance_frame(Duration::from_millis(16));
        assert_eq!(fired, vec![handle]);
        assert_eq!(host.clock().now_mono(), Duration::from_millis(16));
        assert!(host.frame_queue().pending().is_empty());
    }
}
