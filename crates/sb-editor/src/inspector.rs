//! Contextual inspector selection and inspector-driven edits.
//!
//! Which inspector is showing is pure derived data: it follows from the
//! selected element, the active tool and the viewport, and is recomputed
//! after every state change.

use crate::state::EditorState;
use crate::tools::ToolKind;
use kurbo::Point;
use sb_core::config::DrawingStyle;
use sb_core::{Color, Element, ElementId, ElementKind, ElementPatch, ModelError, Result, Viewport};
use serde_json::Value;

/// The contextual controls for the selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectorKind {
    /// Plain text, or a captioned shape in edit mode.
    Text,
    Image,
    /// Selection toolbar for a finished stroke.
    Draw,
    Shape(ElementKind),
}

/// Where the inspector floats: horizontally centered on the element, just
/// above its top edge, in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InspectorPlacement {
    pub kind: InspectorKind,
    pub element: ElementId,
    pub left: f64,
    pub top: f64,
}

/// The inspector for the current selection, or `None` when nothing (or a
/// removed element) is selected.
///
/// A stroke selected while a draw tool is active gets no floating
/// inspector; the persistent [`draw_inspector`] covers it instead.
pub fn inspector_for(
    state: &EditorState,
    active_tool: ToolKind,
    viewport: &Viewport,
    offset: f64,
) -> Option<InspectorPlacement> {
    let el = state.selected_element()?;
    let kind = el.kind();
    if kind.is_draw() && active_tool.is_draw() {
        return None;
    }

    let inspector = if kind == ElementKind::Text || (el.is_editing() && kind.is_text_like()) {
        InspectorKind::Text
    } else if kind.is_image() {
        InspectorKind::Image
    } else if kind.is_draw() {
        InspectorKind::Draw
    } else {
        InspectorKind::Shape(kind)
    };

    let anchor = viewport.to_screen(Point::new(el.x() + el.width() / 2.0, el.y()));
    Some(InspectorPlacement {
        kind: inspector,
        element: el.id(),
        left: anchor.x,
        top: anchor.y - offset,
    })
}

// ─── Draw inspector ──────────────────────────────────────────────────────

/// The persistent toolbar shown while pencil or pen is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawInspector {
    /// Selected stroke of the active tool's kind; edits apply to it as well
    /// as to the drawing style.
    pub target: Option<ElementId>,
    /// Values the toolbar displays: the target's when there is one.
    pub values: DrawingStyle,
}

pub fn draw_inspector(
    state: &EditorState,
    active_tool: ToolKind,
    style: &DrawingStyle,
) -> Option<DrawInspector> {
    if !active_tool.is_draw() {
        return None;
    }
    let selected = state.selected_element();
    if selected.is_some_and(|el| el.is_editing()) {
        return None;
    }
    let target = selected.filter(|el| Some(el.kind()) == active_tool.element_kind());
    let values = match target.and_then(|el| el.draw()) {
        Some(d) => DrawingStyle {
            stroke: d.stroke,
            stroke_width: d.stroke_width,
            tension: d.tension,
        },
        None => *style,
    };
    Some(DrawInspector {
        target: target.map(Element::id),
        values,
    })
}

/// Stroke smoothing shown as a "corner radius" slider on the draw toolbar.
pub fn tension_to_radius(tension: f64) -> f64 {
    (tension * 100.0).round()
}

pub fn radius_to_tension(radius: f64) -> f64 {
    (radius / 100.0).max(0.0)
}

// ─── Property edits ──────────────────────────────────────────────────────

/// Turn one inspector edit (`key` as the camelCase field name, `value` as
/// the control's raw string) into a patch for `kind`.
///
/// The value is read as JSON first, so `12`, `true` and `"bold"` all work;
/// anything that is not valid JSON is taken as a plain string (colors,
/// text). Unknown keys and ill-typed values are rejected, as are keys
/// the inspector does not own (edit mode is toggled by the editor only).
pub fn property_patch(kind: ElementKind, key: &str, value: &str) -> Result<ElementPatch> {
    let invalid = || ModelError::InvalidProperty {
        key: key.to_string(),
        value: value.to_string(),
    };

    if matches!(key, "id" | "type" | "isEditing") {
        return Err(invalid());
    }

    if kind.is_draw() && key == "cornerRadius" {
        let radius: f64 = value.trim().parse().map_err(|_| invalid())?;
        return Ok(ElementPatch {
            tension: Some(radius_to_tension(radius)),
            ..ElementPatch::default()
        });
    }
    if is_color_key(key) {
        let color: Color = value.trim().parse().map_err(|_| invalid())?;
        return patch_from(key, Value::String(color.to_hex())).ok_or_else(invalid);
    }

    let parsed = serde_json::from_str::<Value>(value).ok();
    parsed
        .and_then(|v| patch_from(key, v))
        .or_else(|| patch_from(key, Value::String(value.to_string())))
        .ok_or_else(invalid)
}

fn is_color_key(key: &str) -> bool {
    matches!(key, "color" | "stroke" | "textColor" | "textStroke" | "fill")
}

fn patch_from(key: &str, value: Value) -> Option<ElementPatch> {
    let mut object = serde_json::Map::new();
    object.insert(key.to_string(), value);
    let patch: ElementPatch = serde_json::from_value(Value::Object(object)).ok()?;
    (!patch.is_empty()).then_some(patch)
}
