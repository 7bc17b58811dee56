//! Property-based invariant tests for popover placement and the stage shape.
//!
//! 1. A popover no larger than the viewport always lands fully inside it.
//! 2. A requested side that fits is the side that renders.
//! 3. Over and placeholder placements are centered and arrowless.
//! 4. The hole radius never exceeds half the padded box.
//! 5. The center of a visible hole is clickable through.

use proptest::prelude::*;
use stagelight_core::{Align, Point, Rect, Side, Size};
use stagelight_widgets::placement::RenderedSide;
use stagelight_widgets::{PlacementRequest, StageHit, StageShape, compute_placement, corner_radius};

// ── Helpers ─────────────────────────────────────────────────────────────

fn viewport() -> impl Strategy<Value = Size> {
    (320.0f64..2560.0, 240.0f64..1600.0).prop_map(|(w, h)| Size::new(w, h))
}

fn side() -> impl Strategy<Value = Option<Side>> {
    prop_oneof![
        Just(None),
        Just(Some(Side::Top)),
        Just(Some(Side::Right)),
        Just(Some(Side::Bottom)),
        Just(Some(Side::Left)),
        Just(Some(Side::Over)),
    ]
}

fn align() -> impl Strategy<Value = Align> {
    prop_oneof![Just(Align::Start), Just(Align::Center), Just(Align::End)]
}

/// A viewport, a target overlapping it at least partly, and a popover that
/// fits the viewport.
fn scene() -> impl Strategy<Value = (Size, Rect, Size)> {
    viewport().prop_flat_map(|vp| {
        let target = (
            -200.0..vp.width,
            -200.0..vp.height,
            1.0f64..600.0,
            1.0f64..600.0,
        )
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h));
        let popover = (40.0..vp.width.min(400.0), 30.0..vp.height.min(300.0))
            .prop_map(|(w, h)| Size::new(w, h));
        (Just(vp), target, popover)
    })
}

fn request(vp: Size, target: Rect, popover: Size, side: Option<Side>, align: Align) -> PlacementRequest {
    PlacementRequest {
        viewport: vp,
        target,
        popover,
        side,
        align,
        padding: 10.0,
        offset: 10.0,
        placeholder: false,
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Bounds
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn popover_stays_in_viewport((vp, target, popover) in scene(), side in side(), align in align()) {
        let p = compute_placement(&request(vp, target, popover, side, align));
        prop_assert!(p.rect.is_within(vp), "{:?} escapes {:?}", p.rect, vp);
        prop_assert_eq!(p.rect.size(), popover);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Requested side
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fitting_request_is_honored((vp, target, popover) in scene(), align in align()) {
        let room_below = vp.height - (target.bottom() + popover.height + 20.0);
        prop_assume!(room_below >= 0.0);
        let p = compute_placement(&request(vp, target, popover, Some(Side::Bottom), align));
        prop_assert_eq!(p.side, RenderedSide::Bottom);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Centered placements
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn placeholder_is_centered((vp, target, popover) in scene(), side in side()) {
        let mut req = request(vp, target, popover, side, Align::Start);
        req.placeholder = true;
        let p = compute_placement(&req);
        prop_assert_eq!(p.side, RenderedSide::Over);
        prop_assert!(p.arrow.is_none());
        prop_assert!((p.rect.center().x - vp.width / 2.0).abs() < 1e-6);
        prop_assert!((p.rect.center().y - vp.height / 2.0).abs() < 1e-6);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Radius clamp
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn radius_is_bounded(configured in -50.0f64..500.0, w in 0.0f64..800.0, h in 0.0f64..800.0) {
        let r = corner_radius(configured, w, h);
        prop_assert!(r >= 0.0);
        prop_assert!(r <= w / 2.0 && r <= h / 2.0);
        prop_assert!(r <= configured.max(0.0));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Hole hit-testing
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn hole_center_passes_through(
        vp in viewport(),
        (fx, fy) in (0.1f64..0.9, 0.1f64..0.9),
        (w, h) in (2.0f64..200.0, 2.0f64..200.0),
        radius in 0.0f64..40.0,
    ) {
        let center = Point::new(vp.width * fx, vp.height * fy);
        let target = Rect::new(center.x - w / 2.0, center.y - h / 2.0, w, h);
        let shape = StageShape::new(vp, target, 10.0, radius);
        prop_assert_eq!(shape.hit(center), StageHit::Hole);
        prop_assert_eq!(shape.hit(Point::new(-1.0, -1.0)), StageHit::None);
    }
}
