//! Element → kurbo path, in element-local coordinates.
//!
//! Local space has the element's top-left at the origin and is unrotated;
//! combine with [`crate::hit::element_transform`] to place it on the canvas.
//! Renderers walk these paths instead of re-deriving shape geometry.

use kurbo::{BezPath, Ellipse, Point, Rect, Shape, Vec2};
use sb_core::model::{DrawProps, Element, Payload};
use sb_core::ElementKind;

/// Path tolerance when flattening ellipses and rounded corners.
const TOLERANCE: f64 = 0.1;

/// Chat bubble body takes the top share of the box; the tail fills the rest.
const BUBBLE_BODY: f64 = 0.8;
/// Arrow head length as a share of the box width.
const ARROW_HEAD: f64 = 0.35;
/// Arrow shaft thickness as a share of the box height.
const ARROW_SHAFT: f64 = 0.5;

/// Outline of the element's visible shape, or `None` for kinds painted
/// from other data (text glyphs, image pixels).
pub fn outline(el: &Element) -> Option<BezPath> {
    let (w, h) = (el.width(), el.height());
    let corner = el.shape().map(|s| s.corner_radius).unwrap_or(0.0);
    match el.kind() {
        ElementKind::Rectangle | ElementKind::RectangleText => {
            Some(Rect::new(0.0, 0.0, w, h).to_rounded_rect(corner).to_path(TOLERANCE))
        }
        ElementKind::Circle | ElementKind::CircleText => Some(
            Ellipse::from_rect(Rect::new(0.0, 0.0, w, h)).to_path(TOLERANCE),
        ),
        ElementKind::Triangle => {
            let sides = el.shape().and_then(|s| s.sides).unwrap_or(3);
            Some(polygon(&regular_polygon(w, h, sides)))
        }
        ElementKind::Star => {
            let shape = el.shape();
            let points = shape.and_then(|s| s.sides).unwrap_or(5);
            let inner = shape.and_then(|s| s.star_inner_radius).unwrap_or(50.0) / 100.0;
            Some(polygon(&star(w, h, points, inner)))
        }
        ElementKind::ChatBubble => Some(chat_bubble(w, h, corner)),
        ElementKind::ArrowLeft => Some(polygon(&arrow(w, h, true))),
        ElementKind::ArrowRight => Some(polygon(&arrow(w, h, false))),
        ElementKind::Pencil | ElementKind::Pen => match el.payload() {
            Payload::Draw(draw) => Some(stroke_path(draw)),
            _ => None,
        },
        ElementKind::Text | ElementKind::Image => None,
    }
}

fn polygon(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        path.close_path();
    }
    path
}

/// Vertices of a regular polygon inscribed in the `w × h` box, first vertex
/// pointing up.
fn regular_polygon(w: f64, h: f64, sides: u32) -> Vec<Point> {
    let sides = sides.max(3);
    let center = Point::new(w / 2.0, h / 2.0);
    (0..sides)
        .map(|i| {
            let angle = -std::f64::consts::FRAC_PI_2
                + i as f64 * std::f64::consts::TAU / sides as f64;
            center + Vec2::new(angle.cos() * w / 2.0, angle.sin() * h / 2.0)
        })
        .collect()
}

/// Star with `points` tips; `inner` is the inner radius as a fraction of the
/// outer one.
fn star(w: f64, h: f64, points: u32, inner: f64) -> Vec<Point> {
    let points = points.max(2);
    let center = Point::new(w / 2.0, h / 2.0);
    (0..points * 2)
        .map(|i| {
            let angle =
                -std::f64::consts::FRAC_PI_2 + i as f64 * std::f64::consts::PI / points as f64;
            let r = if i % 2 == 0 { 1.0 } else { inner };
            center + Vec2::new(angle.cos() * r * w / 2.0, angle.sin() * r * h / 2.0)
        })
        .collect()
}

fn chat_bubble(w: f64, h: f64, corner: f64) -> BezPath {
    let body_h = h * BUBBLE_BODY;
    let mut path = Rect::new(0.0, 0.0, w, body_h)
        .to_rounded_rect(corner.min(body_h / 2.0))
        .to_path(TOLERANCE);
    // Tail hangs from the lower-left quarter of the body.
    path.move_to((w * 0.15, body_h));
    path.line_to((w * 0.1, h));
    path.line_to((w * 0.35, body_h));
    path.close_path();
    path
}

fn arrow(w: f64, h: f64, pointing_left: bool) -> Vec<Point> {
    let head = w * ARROW_HEAD;
    let shaft_top = h * (1.0 - ARROW_SHAFT) / 2.0;
    let shaft_bottom = h - shaft_top;
    let right_facing = [
        Point::new(0.0, shaft_top),
        Point::new(w - head, shaft_top),
        Point::new(w - head, 0.0),
        Point::new(w, h / 2.0),
        Point::new(w - head, h),
        Point::new(w - head, shaft_bottom),
        Point::new(0.0, shaft_bottom),
    ];
    if pointing_left {
        right_facing.iter().map(|p| Point::new(w - p.x, p.y)).collect()
    } else {
        right_facing.to_vec()
    }
}

/// Freehand stroke through the recorded points. With non-zero tension the
/// stroke is a cardinal spline: quadratic end segments, cubic in between.
pub fn stroke_path(draw: &DrawProps) -> BezPath {
    let pts = &draw.points;
    let mut path = BezPath::new();
    let Some(first) = pts.first() else {
        return path;
    };
    path.move_to(*first);
    if draw.tension == 0.0 || pts.len() < 3 {
        for p in &pts[1..] {
            path.line_to(*p);
        }
        return path;
    }

    // (incoming, outgoing) control points for every interior point.
    let controls: Vec<(Point, Point)> = pts
        .windows(3)
        .map(|w| control_points(w[0], w[1], w[2], draw.tension))
        .collect();
    let last = pts.len() - 1;

    path.quad_to(controls[0].0, pts[1]);
    for i in 1..last - 1 {
        path.curve_to(controls[i - 1].1, controls[i].0, pts[i + 1]);
    }
    path.quad_to(controls[last - 2].1, pts[last]);
    path
}

fn control_points(p0: Point, p1: Point, p2: Point, tension: f64) -> (Point, Point) {
    let d01 = p0.distance(p1);
    let d12 = p1.distance(p2);
    let total = d01 + d12;
    if total == 0.0 {
        return (p1, p1);
    }
    let fa = tension * d01 / total;
    let fb = tension * d12 / total;
    let span = p2 - p0;
    (p1 - span * fa, p1 + span * fb)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox_of(kind: ElementKind) -> Rect {
        let el = Element::create(kind, 0.0, 0.0, None);
        outline(&el).unwrap().bounding_box()
    }

    #[test]
    fn shape_outlines_stay_inside_the_box() {
        for kind in ElementKind::ALL.into_iter().filter(|k| k.is_shape()) {
            let bb = bbox_of(kind);
            assert!(bb.x0 >= -1e-6 && bb.y0 >= -1e-6, "{kind}: {bb:?}");
            assert!(bb.x1 <= 100.0 + 1e-6 && bb.y1 <= 100.0 + 1e-6, "{kind}: {bb:?}");
        }
    }

    #[test]
    fn text_and_image_have_no_outline() {
        assert!(outline(&Element::create(ElementKind::Text, 0.0, 0.0, None)).is_none());
        assert!(outline(&Element::create(ElementKind::Image, 0.0, 0.0, None)).is_none());
    }

    #[test]
    fn star_alternates_radii() {
        let pts = star(100.0, 100.0, 5, 0.5);
        assert_eq!(pts.len(), 10);
        let c = Point::new(50.0, 50.0);
        assert!((pts[0].distance(c) - 50.0).abs() < 1e-9);
        assert!((pts[1].distance(c) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn pen_strokes_are_polylines() {
        let pen = Element::create(ElementKind::Pen, 0.0, 0.0, None).with_points(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 0.0),
        ]);
        let path = outline(&pen).unwrap();
        assert_eq!(path.elements().len(), 3);
        assert!(
            path.elements()
                .iter()
                .all(|e| !matches!(e, kurbo::PathEl::CurveTo(..) | kurbo::PathEl::QuadTo(..)))
        );
    }

    #[test]
    fn pencil_strokes_are_smoothed() {
        let pencil = Element::create(ElementKind::Pencil, 0.0, 0.0, None).with_points(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 0.0),
            Point::new(30.0, 10.0),
        ]);
        let path = outline(&pencil).unwrap();
        assert!(
            path.elements()
                .iter()
                .any(|e| matches!(e, kurbo::PathEl::CurveTo(..)))
        );
    }
}
