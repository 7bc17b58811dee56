#![forbid(unsafe_code)]

//! Pure popover placement.
//!
//! Given the target's viewport rectangle and the popover's measured size,
//! [`compute_placement`] picks the side the popover renders on, its box, and
//! where the arrow points. It never touches the document, which is what makes
//! the bounds property testable.
//!
//! # Side selection
//!
//! Each side "fits" when the popover, grown by the stage padding and popover
//! offset, lies on that side of the target without crossing the viewport
//! edge. A requested side that fits wins outright. Otherwise the first fitting
//! side in the order left, right, top, bottom is used. When nothing fits the
//! popover floats centered near the bottom of the viewport without an arrow.
//!
//! # Arrow
//!
//! The arrow normally sits on the rendered side with the requested alignment.
//! When the target extends past the viewport on the axis perpendicular to that
//! side, the arrow is redirected so it never points off-screen. The box is not
//! affected by this.

use stagelight_core::geometry::{Rect, Size};
use stagelight_core::placement::{Align, Side};

/// Thickness of the popover arrow, in pixels.
pub const ARROW_SIZE: f64 = 5.0;

/// Gap between the floating popover and the bottom of the viewport.
pub const FLOATING_BOTTOM_GAP: f64 = 10.0;

/// The side a popover actually rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderedSide {
    Top,
    Right,
    Bottom,
    Left,
    /// Centered over the viewport (placeholder target or `Side::Over`).
    Over,
    /// No side fit; centered horizontally near the bottom.
    Floating,
}

impl RenderedSide {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Over => "over",
            Self::Floating => "floating",
        }
    }
}

/// Where the arrow is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arrow {
    pub side: Side,
    pub align: Align,
}

/// Inputs to [`compute_placement`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRequest {
    pub viewport: Size,
    /// Viewport-relative target rectangle (unpadded).
    pub target: Rect,
    /// Measured popover size.
    pub popover: Size,
    /// Requested side; `None` lets the fit order decide.
    pub side: Option<Side>,
    pub align: Align,
    /// Stage padding.
    pub padding: f64,
    /// Popover offset.
    pub offset: f64,
    /// The target is the zero-size placeholder.
    pub placeholder: bool,
}

/// Result of [`compute_placement`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Viewport-relative popover box.
    pub rect: Rect,
    pub side: RenderedSide,
    /// `None` means the arrow is hidden.
    pub arrow: Option<Arrow>,
}

/// Choose side, box and arrow for a popover.
#[must_use]
pub fn compute_placement(req: &PlacementRequest) -> Placement {
    let vp = req.viewport;
    let el = req.target;
    let real = req.popover;
    // Footprint including the gap to the stage.
    let width = real.width + req.padding + req.offset;
    let height = real.height + req.padding + req.offset;

    if req.placeholder || req.side == Some(Side::Over) {
        let rect = Rect::new(
            vp.width / 2.0 - real.width / 2.0,
            vp.height / 2.0 - real.height / 2.0,
            real.width,
            real.height,
        );
        return Placement {
            rect: rect.clamp_into(vp),
            side: RenderedSide::Over,
            arrow: None,
        };
    }

    let top_value = el.top() - height;
    let bottom_value = vp.height - (el.bottom() + height);
    let left_value = el.left() - width;
    let right_value = vp.width - (el.right() + width);

    let mut top_fits = top_value >= 0.0;
    let mut bottom_fits = bottom_value >= 0.0;
    let mut left_fits = left_value >= 0.0;
    let mut right_fits = right_value >= 0.0;
    let none_fit = !(top_fits || bottom_fits || left_fits || right_fits);

    match req.side {
        Some(Side::Top) if top_fits => (bottom_fits, left_fits, right_fits) = (false, false, false),
        Some(Side::Bottom) if bottom_fits => (top_fits, left_fits, right_fits) = (false, false, false),
        Some(Side::Left) if left_fits => (top_fits, bottom_fits, right_fits) = (false, false, false),
        Some(Side::Right) if right_fits => (top_fits, bottom_fits, left_fits) = (false, false, false),
        _ => {}
    }

    let (rect, side) = if none_fit {
        let rect = Rect::new(
            vp.width / 2.0 - real.width / 2.0,
            vp.height - FLOATING_BOTTOM_GAP - real.height,
            real.width,
            real.height,
        );
        (rect, RenderedSide::Floating)
    } else if left_fits {
        let x = left_value.min(vp.width - width - ARROW_SIZE);
        let y = cross_start(req.align, el.top(), el.height, real.height, vp.height, req.padding);
        (Rect::new(x, y, real.width, real.height), RenderedSide::Left)
    } else if right_fits {
        let right = right_value.min(vp.width - width - ARROW_SIZE);
        let x = vp.width - right - real.width;
        let y = cross_start(req.align, el.top(), el.height, real.height, vp.height, req.padding);
        (Rect::new(x, y, real.width, real.height), RenderedSide::Right)
    } else if top_fits {
        let y = top_value.min(vp.height - height - ARROW_SIZE);
        let x = cross_start(req.align, el.left(), el.width, real.width, vp.width, req.padding);
        (Rect::new(x, y, real.width, real.height), RenderedSide::Top)
    } else {
        let bottom = bottom_value.min(vp.height - height - ARROW_SIZE);
        let y = vp.height - bottom - real.height;
        let x = cross_start(req.align, el.left(), el.width, real.width, vp.width, req.padding);
        (Rect::new(x, y, real.width, real.height), RenderedSide::Bottom)
    };

    let footprint = Size::new(width, height);
    let arrow = match side {
        RenderedSide::Floating | RenderedSide::Over => None,
        RenderedSide::Top => Some(Side::Top),
        RenderedSide::Right => Some(Side::Right),
        RenderedSide::Bottom => Some(Side::Bottom),
        RenderedSide::Left => Some(Side::Left),
    }
    .map(|s| arrow_direction(s, req.align, el, footprint, vp));

    Placement {
        rect: rect.clamp_into(vp),
        side,
        arrow,
    }
}

/// Offset along the cross axis for an aligned popover.
///
/// `start`/`len` describe the target on that axis, `size` the popover and
/// `view` the viewport. The result is kept within
/// `[ARROW_SIZE, view - size - ARROW_SIZE]`.
fn cross_start(align: Align, start: f64, len: f64, size: f64, view: f64, padding: f64) -> f64 {
    let wanted = match align {
        Align::Start => start - padding,
        Align::End => start - size + len + padding,
        Align::Center => start + len / 2.0 - size / 2.0,
    };
    wanted.min(view - size - ARROW_SIZE).max(ARROW_SIZE)
}

/// Arrow side and alignment for a popover on `side` of `target`.
///
/// `popover` is the popover footprint including padding and offset.
#[must_use]
pub fn arrow_direction(side: Side, align: Align, target: Rect, popover: Size, viewport: Size) -> Arrow {
    let mut arrow = Arrow { side, align };
    let mut set = |side, align| arrow = Arrow { side, align };

    match side {
        Side::Top | Side::Bottom => {
            let edge_align = if side == Side::Top { Align::End } else { Align::Start };
            if target.left() + target.width <= 0.0 {
                set(Side::Right, edge_align);
            } else if target.left() + target.width - popover.width <= 0.0 {
                set(side, Align::Start);
            }
            if target.left() >= viewport.width {
                set(Side::Left, edge_align);
            } else if target.left() + popover.width >= viewport.width {
                set(side, Align::End);
            }
        }
        Side::Left | Side::Right => {
            let edge_align = if side == Side::Left { Align::End } else { Align::Start };
            if target.top() + target.height <= 0.0 {
                set(Side::Bottom, edge_align);
            } else if target.top() + target.height - popover.height <= 0.0 {
                set(side, Align::Start);
            }
            if target.top() >= viewport.height {
                set(Side::Top, edge_align);
            } else if target.top() + popover.height >= viewport.height {
                set(side, Align::End);
            }
        }
        Side::Over => {}
    }
    arrow
}
