//! Hit testing: canvas point → element lookup.
//!
//! Walks the scene back to front (last painted = topmost) and tests the
//! point against each element's rotated bounding box.

use kurbo::{Affine, Point, Rect, Vec2};
use sb_core::{Element, ElementId, Scene};

/// Element-local → canvas transform. Elements rotate about their top-left.
pub fn element_transform(el: &Element) -> Affine {
    Affine::translate(Vec2::new(el.x(), el.y())) * Affine::rotate(el.rotation().to_radians())
}

/// Map a canvas point into the element's unrotated local frame.
pub fn to_local(el: &Element, canvas: Point) -> Point {
    element_transform(el).inverse() * canvas
}

/// Extra reach around thin elements so strokes stay grabbable.
fn slop(el: &Element) -> f64 {
    el.draw().map(|d| d.stroke_width / 2.0).unwrap_or(0.0)
}

/// Whether `canvas` falls inside the element's rotated box.
pub fn contains(el: &Element, canvas: Point) -> bool {
    let local = to_local(el, canvas);
    let s = slop(el);
    Rect::new(-s, -s, el.width() + s, el.height() + s).contains(local)
}

/// Find the topmost visible element at `canvas`.
/// Returns `None` if nothing is hit (background).
pub fn hit_test(scene: &Scene, canvas: Point) -> Option<ElementId> {
    let hit = scene
        .iter()
        .rev()
        .filter(|el| el.visible() && el.kind().is_pointer_selectable())
        .find(|el| contains(el, canvas))
        .map(|el| el.id());
    log::trace!("hit test at ({:.1}, {:.1}) -> {hit:?}", canvas.x, canvas.y);
    hit
}

/// Axis-aligned canvas bounds of the rotated element.
pub fn world_bounds(el: &Element) -> Rect {
    let t = element_transform(el);
    let (w, h) = (el.width(), el.height());
    let corners = [
        t * Point::ZERO,
        t * Point::new(w, 0.0),
        t * Point::new(w, h),
        t * Point::new(0.0, h),
    ];
    corners[1..]
        .iter()
        .fold(Rect::from_points(corners[0], corners[0]), |r, p| r.union_pt(*p))
}
