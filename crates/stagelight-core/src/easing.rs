#![forbid(unsafe_code)]

//! Easing and interpolation helpers for stage transitions.
//!
//! # Invariants
//!
//! 1. `interpolate_rect(from, to, 0, d)` returns `from` bit-for-bit.
//! 2. `interpolate_rect(from, to, e, d)` returns `to` bit-for-bit for any
//!    `e >= d`, so the final frame never carries rounding drift.
//! 3. Each of x, y, width and height is eased independently.

use std::time::Duration;

use crate::geometry::Rect;

/// How long a stage transition between two elements takes.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(400);

/// Quadratic ease-in-out on normalized time `t` in `[0, 1]`.
///
/// Inputs outside the range are clamped.
#[inline]
pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u / 2.0
    }
}

/// Linear interpolation between `from` and `to`.
#[inline]
pub fn lerp(from: f64, to: f64, progress: f64) -> f64 {
    from + (to - from) * progress
}

/// Eased rectangle `elapsed` into a transition of length `duration`.
pub fn interpolate_rect(from: Rect, to: Rect, elapsed: Duration, duration: Duration) -> Rect {
    if duration.is_zero() || elapsed >= duration {
        return to;
    }
    let progress = ease_in_out_quad(elapsed.as_secs_f64() / duration.as_secs_f64());
    Rect::new(
        lerp(from.x, to.x, progress),
        lerp(from.y, to.y, progress),
        lerp(from.width, to.width, progress),
        lerp(from.height, to.height, progress),
    )
}
