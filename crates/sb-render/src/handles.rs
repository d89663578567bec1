//! Selection handles: layout, hit testing, and the geometry of dragging them.
//!
//! Eight resize handles sit on the corners and edge midpoints of the
//! element's rotated box; the rotation handle floats above the top edge.
//! Handle sizes are given in screen pixels and converted with the zoom so
//! they stay the same size on screen.

use crate::hit::{element_transform, to_local};
use kurbo::{Point, Vec2};
use sb_core::{Element, MIN_ELEMENT_SIZE};

/// Handle hit radius in screen pixels.
pub const HANDLE_RADIUS: f64 = 6.0;
/// Distance of the rotation handle above the top edge, in screen pixels.
pub const ROTATE_OFFSET: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    Rotate,
}

impl Handle {
    pub const ALL: [Handle; 9] = [
        Handle::TopLeft,
        Handle::Top,
        Handle::TopRight,
        Handle::Right,
        Handle::BottomRight,
        Handle::Bottom,
        Handle::BottomLeft,
        Handle::Left,
        Handle::Rotate,
    ];

    /// Which box edges the handle drags: `-1` the left/top edge, `1` the
    /// right/bottom edge, `0` neither.
    pub fn edges(self) -> (i8, i8) {
        match self {
            Handle::TopLeft => (-1, -1),
            Handle::Top => (0, -1),
            Handle::TopRight => (1, -1),
            Handle::Right => (1, 0),
            Handle::BottomRight => (1, 1),
            Handle::Bottom => (0, 1),
            Handle::BottomLeft => (-1, 1),
            Handle::Left => (-1, 0),
            Handle::Rotate => (0, 0),
        }
    }

    pub fn is_resize(self) -> bool {
        self != Handle::Rotate
    }

    /// CSS cursor the host should show while hovering the handle.
    pub fn cursor(self) -> &'static str {
        match self {
            Handle::TopLeft | Handle::BottomRight => "nwse-resize",
            Handle::TopRight | Handle::BottomLeft => "nesw-resize",
            Handle::Top | Handle::Bottom => "ns-resize",
            Handle::Left | Handle::Right => "ew-resize",
            Handle::Rotate => "grab",
        }
    }

    fn local_position(self, w: f64, h: f64, zoom: f64) -> Point {
        if self == Handle::Rotate {
            return Point::new(w / 2.0, -ROTATE_OFFSET / zoom);
        }
        let (ex, ey) = self.edges();
        let along = |e: i8, size: f64| match e {
            -1 => 0.0,
            1 => size,
            _ => size / 2.0,
        };
        Point::new(along(ex, w), along(ey, h))
    }
}

/// Canvas positions of every handle of `el` at the given zoom.
pub fn handle_positions(el: &Element, zoom: f64) -> [(Handle, Point); 9] {
    let t = element_transform(el);
    Handle::ALL.map(|h| (h, t * h.local_position(el.width(), el.height(), zoom)))
}

/// The handle under `canvas`, if any. The rotation handle is checked first
/// since it can overlap the top edge on small elements.
pub fn hit_handle(el: &Element, canvas: Point, zoom: f64) -> Option<Handle> {
    let reach = HANDLE_RADIUS / zoom;
    let positions = handle_positions(el, zoom);
    positions
        .iter()
        .rev()
        .find(|(_, p)| p.distance(canvas) <= reach)
        .map(|(h, _)| *h)
}

/// New `(top-left, width, height)` after dragging a resize handle of
/// `start` to `canvas`. Edges the handle does not own stay put, sizes are
/// floored, and the rotation is unchanged.
pub fn resize(start: &Element, handle: Handle, canvas: Point) -> (Point, f64, f64) {
    let local = to_local(start, canvas);
    let (w, h) = (start.width(), start.height());
    let (ex, ey) = handle.edges();

    let (x0, x1) = drag_span(0.0, w, ex, local.x);
    let (y0, y1) = drag_span(0.0, h, ey, local.y);

    let origin = element_transform(start) * Point::new(x0, y0);
    (origin, x1 - x0, y1 - y0)
}

/// Move one end of `[lo, hi]` to `to`, keeping the other fixed and the span
/// at least the minimum size. Crossing over flips which end moves.
fn drag_span(lo: f64, hi: f64, edge: i8, to: f64) -> (f64, f64) {
    let (fixed, moving) = match edge {
        -1 => (hi, to),
        1 => (lo, to),
        _ => return (lo, hi),
    };
    if moving >= fixed {
        (fixed, moving.max(fixed + MIN_ELEMENT_SIZE))
    } else {
        (moving.min(fixed - MIN_ELEMENT_SIZE), fixed)
    }
}

/// Rotation (degrees) after dragging the rotation handle from `from` to
/// `to`, both in canvas space, measured around the element's center.
pub fn rotation_after_drag(start: &Element, from: Point, to: Point) -> f64 {
    let center = element_transform(start) * Point::new(start.width() / 2.0, start.height() / 2.0);
    let a0 = (from - center).atan2();
    let a1 = (to - center).atan2();
    start.rotation() + (a1 - a0).to_degrees()
}

/// Top-left that keeps the element's center fixed when it is rotated to
/// `rotation` degrees (elements rotate about their top-left otherwise).
pub fn origin_for_rotation(start: &Element, rotation: f64) -> Point {
    let half = Vec2::new(start.width() / 2.0, start.height() / 2.0);
    let center = element_transform(start) * half.to_point();
    let r = rotation.to_radians();
    let rotated = Vec2::new(
        half.x * r.cos() - half.y * r.sin(),
        half.x * r.sin() + half.y * r.cos(),
    );
    center - rotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::{ElementKind, ElementPatch};

    fn rect_at(x: f64, y: f64) -> Element {
        Element::create(ElementKind::Rectangle, x, y, None)
    }

    fn near(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn handles_sit_on_corners_and_midpoints() {
        let el = rect_at(10.0, 10.0);
        let pos = handle_positions(&el, 1.0);
        assert!(near(pos[0].1, Point::new(10.0, 10.0)));
        assert!(near(pos[3].1, Point::new(110.0, 60.0)));
        assert!(near(pos[8].1, Point::new(60.0, 10.0 - ROTATE_OFFSET)));
    }

    #[test]
    fn handle_hit_scales_with_zoom() {
        let el = rect_at(0.0, 0.0);
        assert_eq!(hit_handle(&el, Point::new(103.0, 103.0), 1.0), Some(Handle::BottomRight));
        // At 4× zoom the reach is 1.5 canvas units.
        assert_eq!(hit_handle(&el, Point::new(103.0, 103.0), 4.0), None);
        assert_eq!(hit_handle(&el, Point::new(50.0, 50.0), 1.0), None);
    }

    #[test]
    fn resize_bottom_right_grows() {
        let el = rect_at(0.0, 0.0);
        let (origin, w, h) = resize(&el, Handle::BottomRight, Point::new(150.0, 120.0));
        assert!(near(origin, Point::ZERO));
        assert_eq!((w, h), (150.0, 120.0));
    }

    #[test]
    fn resize_top_left_keeps_bottom_right_fixed() {
        let el = rect_at(0.0, 0.0);
        let (origin, w, h) = resize(&el, Handle::TopLeft, Point::new(20.0, 30.0));
        assert!(near(origin, Point::new(20.0, 30.0)));
        assert_eq!((w, h), (80.0, 70.0));
    }

    #[test]
    fn resize_never_goes_below_floor() {
        let el = rect_at(0.0, 0.0);
        for target in [Point::new(100.0, 100.0), Point::new(99.0, 98.0), Point::new(0.0, 0.0)] {
            let (_, w, h) = resize(&el, Handle::TopLeft, target);
            assert!(w >= MIN_ELEMENT_SIZE && h >= MIN_ELEMENT_SIZE, "{target:?}");
        }
    }

    #[test]
    fn resize_crossing_over_flips() {
        let el = rect_at(0.0, 0.0);
        let (origin, w, _) = resize(&el, Handle::Right, Point::new(-40.0, 50.0));
        assert!(near(origin, Point::new(-40.0, 0.0)));
        assert_eq!(w, 40.0);
    }

    #[test]
    fn resize_in_rotated_frame() {
        let el = rect_at(0.0, 0.0).update(&ElementPatch {
            rotation: Some(90.0),
            ..ElementPatch::default()
        });
        // Local +x points down the canvas; dragging Right down to y=150 widens.
        let (origin, w, h) = resize(&el, Handle::Right, Point::new(-50.0, 150.0));
        assert!(near(origin, Point::ZERO));
        assert!((w - 150.0).abs() < 1e-9);
        assert_eq!(h, 100.0);
    }

    #[test]
    fn rotation_drag_adds_angle() {
        let el = rect_at(0.0, 0.0);
        // Center is (50, 50); drag from straight above to straight right.
        let r = rotation_after_drag(&el, Point::new(50.0, 0.0), Point::new(100.0, 50.0));
        assert!((r - 90.0).abs() < 1e-9);
    }

    #[test]
    fn rotating_about_center_moves_origin() {
        let el = rect_at(0.0, 0.0);
        let origin = origin_for_rotation(&el, 180.0);
        assert!(near(origin, Point::new(100.0, 100.0)));
    }
}
