#![forbid(unsafe_code)]

//! Stage overlay: a viewport-sized SVG path with a rounded hole.
//!
//! # Invariants
//!
//! 1. At most one overlay is mounted per renderer; repainting only rewrites
//!    the path data.
//! 2. The hole is the target rectangle inflated by the stage padding, with a
//!    corner radius of `floor(clamp(radius, 0, min(w/2, h/2)))`.
//! 3. Only the painted region captures pointer events; the hole lets them
//!    through to the page.

use core::fmt::Write as _;
use std::time::Duration;

use stagelight_backend::Dom;
use stagelight_core::easing::interpolate_rect;
use stagelight_core::geometry::{Point, Rect, Size};
use stagelight_core::node::NodeId;
use stagelight_core::{Config, Error, Result};

use crate::classes;

/// Corner radius of the stage hole for a padded box of `width` x `height`.
///
/// Never negative and never more than half of either side, so arcs cannot
/// overlap. Non-finite inputs collapse to 0.
#[must_use]
pub fn corner_radius(configured: f64, width: f64, height: f64) -> f64 {
    if !(configured.is_finite() && width.is_finite() && height.is_finite()) {
        return 0.0;
    }
    configured.min(width / 2.0).min(height / 2.0).max(0.0).floor()
}

/// Where a point falls relative to the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageHit {
    /// Inside the cut-out; the page underneath is reachable.
    Hole,
    /// On the dimmed, painted region.
    Overlay,
    /// Outside the viewport.
    None,
}

/// Geometry of one painted stage frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageShape {
    pub viewport: Size,
    /// Padded hole rectangle.
    pub hole: Rect,
    pub radius: f64,
}

impl StageShape {
    /// Shape for `target` (unpadded) in `viewport`.
    #[must_use]
    pub fn new(viewport: Size, target: Rect, padding: f64, configured_radius: f64) -> Self {
        let hole = target.inflate(padding);
        Self {
            viewport,
            hole,
            radius: corner_radius(configured_radius, hole.width, hole.height),
        }
    }

    /// SVG path data: the viewport rectangle, then the hole wound the other
    /// way so `evenodd` filling leaves it transparent.
    #[must_use]
    pub fn path_data(&self) -> String {
        let Size {
            width: vw,
            height: vh,
        } = self.viewport;
        let Rect {
            x,
            y,
            width,
            height,
        } = self.hole;
        let r = self.radius;
        let inner_w = (width - r * 2.0).max(0.0);
        let inner_h = (height - r * 2.0).max(0.0);

        let mut d = String::with_capacity(192);
        let _ = write!(d, "M{vw},0L0,0L0,{vh}L{vw},{vh}L{vw},0Z");
        let _ = write!(
            d,
            "M{},{y} h{inner_w} a{r},{r} 0 0 1 {r},{r} v{inner_h} a{r},{r} 0 0 1 -{r},{r} \
             h-{inner_w} a{r},{r} 0 0 1 -{r},-{r} v-{inner_h} a{r},{r} 0 0 1 {r},-{r} z",
            x + r
        );
        d
    }

    /// Classify a viewport-relative point.
    #[must_use]
    pub fn hit(&self, p: Point) -> StageHit {
        if !Rect::from_size(self.viewport).contains(p) {
            return StageHit::None;
        }
        if self.in_hole(p) {
            StageHit::Hole
        } else {
            StageHit::Overlay
        }
    }

    fn in_hole(&self, p: Point) -> bool {
        let h = self.hole;
        if !h.contains(p) {
            return false;
        }
        let r = self.radius;
        // Distance to the nearest point of the inner (unrounded) rectangle.
        let cx = p.x.clamp(h.x + r, (h.right() - r).max(h.x + r));
        let cy = p.y.clamp(h.y + r, (h.bottom() - r).max(h.y + r));
        let (dx, dy) = (p.x - cx, p.y - cy);
        dx * dx + dy * dy <= r * r
    }
}

#[derive(Debug, Clone, Copy)]
struct Mounted {
    svg: NodeId,
    shape: StageShape,
}

/// Mounts, repaints and removes the overlay.
#[derive(Debug, Default)]
pub struct StageRenderer {
    mounted: Option<Mounted>,
}

impl StageRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint the stage around `rect` (viewport-relative, unpadded).
    ///
    /// Mounts the overlay under `root` on first use; afterwards only the path
    /// data and view box change. Fails with [`Error::MissingStagePath`] when
    /// the mounted overlay lost its path child.
    pub fn paint(
        &mut self,
        dom: &mut dyn Dom,
        root: NodeId,
        rect: Rect,
        config: &Config,
    ) -> Result<()> {
        let viewport = dom.viewport();
        let shape = StageShape::new(viewport, rect, config.stage_padding, config.stage_radius);

        let svg = match self.mounted {
            Some(m) => m.svg,
            None => {
                let svg = mount_overlay(dom, root, config);
                tracing::debug!(target: "stagelight.stage", svg = %svg, "overlay mounted");
                svg
            }
        };

        let path = dom
            .first_child(svg)
            .filter(|p| dom.tag_name(*p).as_deref() == Some("path"))
            .ok_or(Error::MissingStagePath)?;

        dom.set_attribute(svg, "viewBox", &format!("0 0 {} {}", viewport.width, viewport.height));
        dom.set_attribute(path, "d", &shape.path_data());
        self.mounted = Some(Mounted { svg, shape });
        Ok(())
    }

    /// Paint the eased rectangle `elapsed` into a `duration` transition and
    /// return it.
    #[allow(clippy::too_many_arguments)]
    pub fn animate(
        &mut self,
        dom: &mut dyn Dom,
        root: NodeId,
        elapsed: Duration,
        duration: Duration,
        from: Rect,
        to: Rect,
        config: &Config,
    ) -> Result<Rect> {
        let rect = interpolate_rect(from, to, elapsed, duration);
        self.paint(dom, root, rect, config)?;
        Ok(rect)
    }

    /// Remove the overlay if mounted.
    pub fn teardown(&mut self, dom: &mut dyn Dom) {
        if let Some(m) = self.mounted.take() {
            dom.remove_node(m.svg);
        }
    }

    /// The overlay svg node, if mounted.
    #[must_use]
    pub fn node(&self) -> Option<NodeId> {
        self.mounted.map(|m| m.svg)
    }

    /// Shape of the last paint.
    #[must_use]
    pub fn shape(&self) -> Option<StageShape> {
        self.mounted.map(|m| m.shape)
    }

    /// Classify a point against the last paint. `None` when nothing is mounted.
    #[must_use]
    pub fn hit(&self, p: Point) -> StageHit {
        self.mounted.map_or(StageHit::None, |m| m.shape.hit(p))
    }
}

fn mount_overlay(dom: &mut dyn Dom, root: NodeId, config: &Config) -> NodeId {
    let svg = dom.create_element("svg");
    dom.add_class(svg, classes::OVERLAY);
    if config.animate {
        dom.add_class(svg, classes::OVERLAY_ANIMATED);
    }
    dom.set_attribute(svg, "version", "1.1");
    dom.set_attribute(svg, "preserveAspectRatio", "xMinYMin slice");
    for (property, value) in [
        ("fill-rule", "evenodd"),
        ("clip-rule", "evenodd"),
        ("stroke-linejoin", "round"),
        ("stroke-miterlimit", "2"),
        ("z-index", "10000"),
        ("position", "fixed"),
        ("top", "0"),
        ("left", "0"),
        ("width", "100%"),
        ("height", "100%"),
        ("pointer-events", "none"),
    ] {
        dom.set_style(svg, property, value);
    }

    let path = dom.create_element("path");
    dom.set_style(path, "fill", &config.overlay_color);
    dom.set_style(path, "opacity", &config.overlay_opacity.to_string());
    dom.set_style(path, "pointer-events", "auto");
    dom.set_style(path, "cursor", "auto");

    dom.append_child(svg, path);
    dom.append_child(root, svg);
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stagelight_web::HeadlessDom;

    fn dom() -> HeadlessDom {
        HeadlessDom::new(Size::new(1000.0, 800.0))
    }

    #[test]
    fn radius_clamps_to_half_sides() {
        assert_eq!(corner_radius(5.0, 100.0, 100.0), 5.0);
        assert_eq!(corner_radius(50.0, 20.0, 60.0), 10.0);
        assert_eq!(corner_radius(5.0, 0.0, 0.0), 0.0);
        assert_eq!(corner_radius(5.0, 1.0, 1.0), 0.0);
        assert_eq!(corner_radius(-3.0, 10.0, 10.0), 0.0);
        assert_eq!(corner_radius(4.7, 100.0, 100.0), 4.0);
        assert_eq!(corner_radius(f64::NAN, 10.0, 10.0), 0.0);
    }

    #[test]
    fn non_finite_sides_give_square_corners() {
        assert_eq!(corner_radius(5.0, f64::NAN, f64::NAN), 0.0);
        assert_eq!(corner_radius(5.0, 10.0, f64::NAN), 0.0);
        assert_eq!(corner_radius(f64::INFINITY, 10.0, 10.0), 0.0);
        assert_eq!(corner_radius(5.0, f64::INFINITY, f64::INFINITY), 0.0);
    }

    #[test]
    fn path_data_shape() {
        let shape = StageShape::new(
            Size::new(1000.0, 800.0),
            Rect::new(100.0, 100.0, 50.0, 50.0),
            10.0,
            5.0,
        );
        assert_eq!(shape.hole, Rect::new(90.0, 90.0, 70.0, 70.0));
        assert_eq!(
            shape.path_data(),
            "M1000,0L0,0L0,800L1000,800L1000,0Z\
             M95,90 h60 a5,5 0 0 1 5,5 v60 a5,5 0 0 1 -5,5 \
             h-60 a5,5 0 0 1 -5,-5 v-60 a5,5 0 0 1 5,-5 z"
        );
    }

    #[test]
    fn degenerate_target_has_no_negative_segments() {
        let shape = StageShape::new(Size::new(100.0, 100.0), Rect::new(50.0, 50.0, 0.0, 0.0), 0.0, 5.0);
        let d = shape.path_data();
        assert!(!d.contains("--"), "{d}");
        assert_eq!(shape.radius, 0.0);
    }

    #[test]
    fn hit_regions() {
        let shape = StageShape::new(
            Size::new(1000.0, 800.0),
            Rect::new(100.0, 100.0, 50.0, 50.0),
            10.0,
            5.0,
        );
        assert_eq!(shape.hit(Point::new(125.0, 125.0)), StageHit::Hole);
        assert_eq!(shape.hit(Point::new(91.0, 120.0)), StageHit::Hole);
        // Rounded corner: just inside the square hole but outside the arc.
        assert_eq!(shape.hit(Point::new(90.2, 90.2)), StageHit::Overlay);
        assert_eq!(shape.hit(Point::new(10.0, 10.0)), StageHit::Overlay);
        assert_eq!(shape.hit(Point::new(-1.0, 10.0)), StageHit::None);
    }

    #[test]
    fn paint_is_idempotent() {
        let mut dom = dom();
        let body = dom.body();
        let mut stage = StageRenderer::new();
        let config = Config::default();
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);

        stage.paint(&mut dom, body, rect, &config).unwrap();
        let svg = stage.node().unwrap();
        let path = dom.first_child(svg).unwrap();
        let first = dom.attribute(path, "d");

        stage.paint(&mut dom, body, rect, &config).unwrap();
        assert_eq!(stage.node(), Some(svg));
        assert_eq!(dom.first_child(svg), Some(path));
        assert_eq!(dom.attribute(path, "d"), first);
        assert_eq!(dom.count_with_class(classes::OVERLAY), 1);
    }

    #[test]
    fn overlay_pointer_events_only_on_path() {
        let mut dom = dom();
        let body = dom.body();
        let mut stage = StageRenderer::new();
        stage
            .paint(&mut dom, body, Rect::new(0.0, 0.0, 10.0, 10.0), &Config::default())
            .unwrap();
        let svg = stage.node().unwrap();
        let path = dom.first_child(svg).unwrap();
        assert_eq!(dom.style(svg, "pointer-events").as_deref(), Some("none"));
        assert_eq!(dom.style(path, "pointer-events").as_deref(), Some("auto"));
        assert_eq!(dom.style(path, "fill").as_deref(), Some("#000"));
        assert_eq!(dom.style(path, "opacity").as_deref(), Some("0.7"));
    }

    #[test]
    fn missing_path_is_structural_error() {
        let mut dom = dom();
        let body = dom.body();
        let mut stage = StageRenderer::new();
        let config = Config::default();
        stage
            .paint(&mut dom, body, Rect::new(0.0, 0.0, 10.0, 10.0), &config)
            .unwrap();
        let svg = stage.node().unwrap();
        let path = dom.first_child(svg).unwrap();
        dom.remove_node(path);
        let err = stage
            .paint(&mut dom, body, Rect::new(0.0, 0.0, 10.0, 10.0), &config)
            .unwrap_err();
        assert!(matches!(err, Error::MissingStagePath));
    }

    #[test]
    fn teardown_is_safe_twice() {
        let mut dom = dom();
        let body = dom.body();
        let mut stage = StageRenderer::new();
        stage
            .paint(&mut dom, body, Rect::new(0.0, 0.0, 10.0, 10.0), &Config::default())
            .unwrap();
        stage.teardown(&mut dom);
        stage.teardown(&mut dom);
        assert_eq!(dom.count_with_class(classes::OVERLAY), 0);
        assert_eq!(stage.hit(Point::new(1.0, 1.0)), StageHit::None);
    }

    #[test]
    fn animate_ends_exactly_on_target() {
        let mut dom = dom();
        let body = dom.body();
        let mut stage = StageRenderer::new();
        let config = Config::default();
        let from = Rect::new(100.0, 100.0, 50.0, 50.0);
        let to = Rect::new(300.0, 300.0, 80.0, 40.0);
        let d = Duration::from_millis(400);
        let start = stage
            .animate(&mut dom, body, Duration::ZERO, d, from, to, &config)
            .unwrap();
        assert_eq!(start, from);
        let end = stage.animate(&mut dom, body, d, d, from, to, &config).unwrap();
        assert_eq!(end, to);
        assert_eq!(stage.shape().unwrap().hole, to.inflate(10.0));
    }
}
