//! The element data model.
//!
//! An [`Element`] is a set of common fields (identity, kind, box, rotation,
//! flags) plus one [`Payload`] variant chosen by the element's kind. Elements
//! are immutable values: every edit goes through [`Element::update`] (or one
//! of the other `&self -> Element` helpers) and produces a new element, so
//! history snapshots can share untouched elements behind `Arc`.
//!
//! Geometry is stored in canvas space. `x`/`y` is the top-left corner of the
//! unrotated box; rotation is in degrees around that corner and is never
//! normalized here.

use crate::color::Color;
use crate::geometry::TransformEnd;
use crate::id::ElementId;
use crate::kind::{ElementKind, PayloadClass};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Smallest width/height a stored element may have.
pub const MIN_ELEMENT_SIZE: f64 = 5.0;
pub const MIN_FONT_SIZE: f64 = 5.0;
pub const MAX_FONT_SIZE: f64 = 200.0;

pub const DEFAULT_IMAGE_SRC: &str = "/role.png";
pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const PENCIL_TENSION: f64 = 0.5;

pub fn clamp_font_size(size: f64) -> f64 {
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

// ─── Payload enums ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    /// Dash pattern in multiples of the stroke width.
    pub fn dash_pattern(self) -> &'static [f64] {
        match self {
            StrokeStyle::Solid => &[],
            StrokeStyle::Dashed => &[4.0, 2.0],
            StrokeStyle::Dotted => &[1.0, 1.5],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "bold")]
    Bold,
    #[serde(rename = "italic")]
    Italic,
    #[serde(rename = "italic bold")]
    BoldItalic,
}

impl FontStyle {
    pub fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => FontStyle::Normal,
            (true, false) => FontStyle::Bold,
            (false, true) => FontStyle::Italic,
            (true, true) => FontStyle::BoldItalic,
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, FontStyle::Italic | FontStyle::BoldItalic)
    }

    /// CSS `font` shorthand prefix.
    pub fn css_prefix(self) -> &'static str {
        match self {
            FontStyle::Normal => "",
            FontStyle::Bold => "bold ",
            FontStyle::Italic => "italic ",
            FontStyle::BoldItalic => "italic bold ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
    Lowercase,
    Capitalize,
}

impl TextTransform {
    pub fn apply(self, text: &str) -> String {
        match self {
            TextTransform::None => text.to_string(),
            TextTransform::Uppercase => text.to_uppercase(),
            TextTransform::Lowercase => text.to_lowercase(),
            TextTransform::Capitalize => text
                .split(' ')
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

// ─── Payloads ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeProps {
    /// Fill color.
    pub color: Color,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    pub corner_radius: f64,
    /// Polygon side / star point count.
    pub sides: Option<u32>,
    /// Star inner radius as a percentage of the outer radius.
    pub star_inner_radius: Option<f64>,
}

impl ShapeProps {
    pub fn filled(color: Color) -> Self {
        Self {
            color,
            stroke: None,
            stroke_width: 0.0,
            stroke_style: StrokeStyle::Solid,
            corner_radius: 0.0,
            sides: None,
            star_inner_radius: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextProps {
    pub text: String,
    pub font_family: String,
    pub font_size: f64,
    pub text_color: Color,
    pub font_style: FontStyle,
    pub align: TextAlign,
    pub line_height: f64,
    pub letter_spacing: f64,
    pub text_decoration: TextDecoration,
    pub text_transform: TextTransform,
    /// Caption outline (text-shapes only).
    pub text_stroke: Option<Color>,
    pub text_stroke_width: f64,
}

impl TextProps {
    pub fn new(text: &str, font_size: f64, text_color: Color) -> Self {
        Self {
            text: text.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size,
            text_color,
            font_style: FontStyle::Normal,
            align: TextAlign::Left,
            line_height: 1.0,
            letter_spacing: 0.0,
            text_decoration: TextDecoration::None,
            text_transform: TextTransform::None,
            text_stroke: None,
            text_stroke_width: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageProps {
    pub src: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawProps {
    /// Stroke points relative to the element's `(x, y)`.
    pub points: Vec<Point>,
    pub stroke: Color,
    pub stroke_width: f64,
    /// Curve smoothing; 0 draws straight segments.
    pub tension: f64,
    pub fill: Option<Color>,
}

/// Kind-specific element data. The variant always agrees with
/// `ElementKind::payload_class` of the owning element.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Shape(ShapeProps),
    Text(TextProps),
    TextShape { shape: ShapeProps, text: TextProps },
    Image(ImageProps),
    Draw(DrawProps),
}

impl Payload {
    pub fn class(&self) -> PayloadClass {
        match self {
            Payload::Shape(_) => PayloadClass::Shape,
            Payload::Text(_) => PayloadClass::Text,
            Payload::TextShape { .. } => PayloadClass::TextShape,
            Payload::Image(_) => PayloadClass::Image,
            Payload::Draw(_) => PayloadClass::Draw,
        }
    }
}

// ─── Patch ───────────────────────────────────────────────────────────────

/// A partial update. Only `Some` fields are applied; fields that do not
/// exist on the target's payload are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_editing: Option<bool>,

    // Shape
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Shape outline or draw stroke color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_style: Option<StrokeStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sides: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub star_inner_radius: Option<f64>,

    // Text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_transform: Option<TextTransform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_stroke: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_stroke_width: Option<f64>,

    // Image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    // Draw
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
}

impl ElementPatch {
    pub fn is_empty(&self) -> bool {
        *self == ElementPatch::default()
    }

    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn bounds(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn editing(on: bool) -> Self {
        Self {
            is_editing: Some(on),
            ..Self::default()
        }
    }
}

fn set<T>(slot: &mut T, value: &Option<T>)
where
    T: Clone,
{
    if let Some(v) = value {
        *slot = v.clone();
    }
}

// ─── Element ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "crate::record::ElementRecord", try_from = "crate::record::ElementRecord")]
pub struct Element {
    pub(crate) id: ElementId,
    pub(crate) kind: ElementKind,
    pub(crate) name: String,
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) rotation: f64,
    pub(crate) visible: bool,
    pub(crate) locked: bool,
    pub(crate) is_editing: bool,
    pub(crate) payload: Payload,
}

impl Element {
    /// A fully initialized element of `kind` with its default payload,
    /// top-left at `(x, y)`. A fresh ID is generated when none is given.
    pub fn create(kind: ElementKind, x: f64, y: f64, id: Option<ElementId>) -> Element {
        let id = id.unwrap_or_else(ElementId::generate);
        let (width, height) = default_size(kind);
        Element {
            id,
            kind,
            name: format!("{kind} {}", id.short_suffix()),
            x,
            y,
            width,
            height,
            rotation: 0.0,
            visible: true,
            locked: false,
            is_editing: false,
            payload: default_payload(kind),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Rotation in degrees, as stored (not normalized).
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Unrotated box in canvas space.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn shape(&self) -> Option<&ShapeProps> {
        match &self.payload {
            Payload::Shape(shape) | Payload::TextShape { shape, .. } => Some(shape),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&TextProps> {
        match &self.payload {
            Payload::Text(text) | Payload::TextShape { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<&ImageProps> {
        match &self.payload {
            Payload::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn draw(&self) -> Option<&DrawProps> {
        match &self.payload {
            Payload::Draw(draw) => Some(draw),
            _ => None,
        }
    }

    /// Whether the pointer may move this element.
    pub fn is_draggable(&self) -> bool {
        self.visible && !self.locked && !self.is_editing
    }

    /// Return a new element with every supplied field of `patch` applied.
    ///
    /// Supplied sizes are floored to [`MIN_ELEMENT_SIZE`] and supplied font
    /// sizes are clamped to the font range. Fields the payload does not
    /// carry are ignored.
    pub fn update(&self, patch: &ElementPatch) -> Element {
        let mut next = self.clone();
        set(&mut next.name, &patch.name);
        set(&mut next.x, &patch.x);
        set(&mut next.y, &patch.y);
        if let Some(w) = patch.width {
            next.width = w.max(MIN_ELEMENT_SIZE);
        }
        if let Some(h) = patch.height {
            next.height = h.max(MIN_ELEMENT_SIZE);
        }
        set(&mut next.rotation, &patch.rotation);
        set(&mut next.visible, &patch.visible);
        set(&mut next.locked, &patch.locked);
        set(&mut next.is_editing, &patch.is_editing);

        match &mut next.payload {
            Payload::Shape(shape) => apply_shape(shape, patch),
            Payload::Text(text) => apply_text(text, patch),
            Payload::TextShape { shape, text } => {
                apply_shape(shape, patch);
                apply_text(text, patch);
            }
            Payload::Image(image) => set(&mut image.src, &patch.src),
            Payload::Draw(draw) => {
                if let Some(stroke) = patch.stroke {
                    draw.stroke = stroke;
                }
                set(&mut draw.stroke_width, &patch.stroke_width);
                set(&mut draw.tension, &patch.tension);
                if let Some(fill) = patch.fill {
                    draw.fill = Some(fill);
                }
            }
        }
        next
    }

    /// Set the box without the size floor. Only for in-progress previews,
    /// which must go through [`Element::normalized`] before being stored.
    pub fn preview_bounds(&self, x: f64, y: f64, width: f64, height: f64) -> Element {
        let mut next = self.clone();
        next.x = x;
        next.y = y;
        next.width = width;
        next.height = height;
        next
    }

    /// Replace the stroke points of a draw element. No-op on other payloads.
    pub fn with_points(&self, points: Vec<Point>) -> Element {
        let mut next = self.clone();
        if let Payload::Draw(draw) = &mut next.payload {
            draw.points = points;
        }
        next
    }

    /// Make a preview fit for storage: sizes are floored, and draw elements
    /// are re-anchored so the stroke's bounding box starts at `(x, y)`.
    pub fn normalized(&self) -> Element {
        let mut next = self.clone();
        if let Payload::Draw(draw) = &mut next.payload {
            if let Some(bbox) = points_bbox(&draw.points) {
                for p in &mut draw.points {
                    p.x -= bbox.x0;
                    p.y -= bbox.y0;
                }
                next.x += bbox.x0;
                next.y += bbox.y0;
                next.width = bbox.width();
                next.height = bbox.height();
            }
        }
        next.width = next.width.max(MIN_ELEMENT_SIZE);
        next.height = next.height.max(MIN_ELEMENT_SIZE);
        next
    }

    /// Deep copy under a new identity, offset by `nudge` on both axes.
    pub fn duplicate(&self, new_id: ElementId, nudge: f64) -> Element {
        let mut next = self.clone();
        next.id = new_id;
        next.x += nudge;
        next.y += nudge;
        next.is_editing = false;
        next
    }

    /// The canonical patch for the end of a handle transform: scale is
    /// folded into width/height (floored), text scales with `scale_y`.
    pub fn transform_patch(&self, end: &TransformEnd) -> ElementPatch {
        let mut patch = ElementPatch {
            x: Some(end.x),
            y: Some(end.y),
            width: Some((self.width * end.scale_x).max(MIN_ELEMENT_SIZE)),
            height: Some((self.height * end.scale_y).max(MIN_ELEMENT_SIZE)),
            rotation: Some(end.rotation),
            ..ElementPatch::default()
        };
        if let Some(text) = self.text() {
            patch.font_size = Some(clamp_font_size((text.font_size * end.scale_y).round()));
        }
        patch
    }
}

fn apply_shape(shape: &mut ShapeProps, patch: &ElementPatch) {
    set(&mut shape.color, &patch.color);
    if let Some(stroke) = patch.stroke {
        shape.stroke = Some(stroke);
    }
    set(&mut shape.stroke_width, &patch.stroke_width);
    set(&mut shape.stroke_style, &patch.stroke_style);
    set(&mut shape.corner_radius, &patch.corner_radius);
    if let Some(sides) = patch.sides {
        shape.sides = Some(sides.max(3));
    }
    if let Some(r) = patch.star_inner_radius {
        shape.star_inner_radius = Some(r);
    }
}

fn apply_text(text: &mut TextProps, patch: &ElementPatch) {
    set(&mut text.text, &patch.text);
    set(&mut text.font_family, &patch.font_family);
    if let Some(size) = patch.font_size {
        text.font_size = clamp_font_size(size);
    }
    set(&mut text.text_color, &patch.text_color);
    set(&mut text.font_style, &patch.font_style);
    set(&mut text.align, &patch.align);
    set(&mut text.line_height, &patch.line_height);
    set(&mut text.letter_spacing, &patch.letter_spacing);
    set(&mut text.text_decoration, &patch.text_decoration);
    set(&mut text.text_transform, &patch.text_transform);
    if let Some(stroke) = patch.text_stroke {
        text.text_stroke = Some(stroke);
    }
    set(&mut text.text_stroke_width, &patch.text_stroke_width);
}

/// Bounding box of a point list, `None` when empty.
pub fn points_bbox(points: &[Point]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    Some(
        rest.iter()
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p)),
    )
}

pub(crate) fn default_size(kind: ElementKind) -> (f64, f64) {
    match kind.payload_class() {
        PayloadClass::Image => (200.0, 300.0),
        PayloadClass::Text => (200.0, 50.0),
        PayloadClass::Draw => (0.0, 0.0),
        PayloadClass::Shape | PayloadClass::TextShape => (100.0, 100.0),
    }
}

pub(crate) fn default_payload(kind: ElementKind) -> Payload {
    match kind.payload_class() {
        PayloadClass::Image => Payload::Image(ImageProps {
            src: DEFAULT_IMAGE_SRC.to_string(),
        }),
        PayloadClass::Text => Payload::Text(TextProps::new("Hello World", 20.0, Color::BLACK)),
        PayloadClass::TextShape => Payload::TextShape {
            shape: ShapeProps::filled(Color::rgb8(0x8b, 0x5c, 0xf6)),
            text: TextProps::new("Label", 14.0, Color::WHITE),
        },
        PayloadClass::Draw => Payload::Draw(DrawProps {
            points: Vec::new(),
            stroke: Color::BLACK,
            stroke_width: 2.0,
            tension: if kind == ElementKind::Pencil {
                PENCIL_TENSION
            } else {
                0.0
            },
            fill: None,
        }),
        PayloadClass::Shape => {
            let mut shape = ShapeProps::filled(match kind {
                ElementKind::Circle => Color::rgb8(0xef, 0x44, 0x44),
                ElementKind::Triangle => Color::rgb8(0x10, 0xb9, 0x81),
                ElementKind::Star => Color::rgb8(0xf5, 0x9e, 0x0b),
                _ => Color::rgb8(0x3b, 0x82, 0xf6),
            });
            match kind {
                ElementKind::Triangle => shape.sides = Some(3),
                ElementKind::Star => {
                    shape.sides = Some(5);
                    shape.star_inner_radius = Some(50.0);
                }
                _ => {}
            }
            Payload::Shape(shape)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Element {
        Element::create(
            ElementKind::Rectangle,
            10.0,
            20.0,
            Some(ElementId::intern("1718000004321")),
        )
    }

    #[test]
    fn create_uses_kind_defaults() {
        let r = rect();
        assert_eq!(r.name(), "rectangle 4321");
        assert_eq!((r.width(), r.height()), (100.0, 100.0));
        assert_eq!(r.shape().unwrap().color.to_hex(), "#3B82F6");

        let star = Element::create(ElementKind::Star, 0.0, 0.0, None);
        assert_eq!(star.shape().unwrap().sides, Some(5));
        assert_eq!(star.shape().unwrap().star_inner_radius, Some(50.0));

        let text = Element::create(ElementKind::Text, 0.0, 0.0, None);
        assert_eq!((text.width(), text.height()), (200.0, 50.0));
        assert_eq!(text.text().unwrap().text, "Hello World");
        assert_eq!(text.text().unwrap().font_size, 20.0);

        let bubble = Element::create(ElementKind::ChatBubble, 0.0, 0.0, None);
        assert_eq!(bubble.shape().unwrap().color.to_hex(), "#8B5CF6");
        assert_eq!(bubble.text().unwrap().text_color, Color::WHITE);

        let image = Element::create(ElementKind::Image, 0.0, 0.0, None);
        assert_eq!((image.width(), image.height()), (200.0, 300.0));
        assert_eq!(image.image().unwrap().src, DEFAULT_IMAGE_SRC);

        let pen = Element::create(ElementKind::Pen, 0.0, 0.0, None);
        let pencil = Element::create(ElementKind::Pencil, 0.0, 0.0, None);
        assert_eq!(pen.draw().unwrap().tension, 0.0);
        assert!(pencil.draw().unwrap().tension > 0.0);
    }

    #[test]
    fn update_is_pure_and_partial() {
        let r = rect();
        let moved = r.update(&ElementPatch::position(50.0, 60.0));
        assert_eq!((r.x(), r.y()), (10.0, 20.0));
        assert_eq!((moved.x(), moved.y()), (50.0, 60.0));
        assert_eq!(moved.width(), r.width());
        assert_eq!(moved.shape(), r.shape());
    }

    #[test]
    fn update_floors_supplied_sizes() {
        let r = rect().update(&ElementPatch {
            width: Some(0.0),
            height: Some(-30.0),
            ..ElementPatch::default()
        });
        assert_eq!((r.width(), r.height()), (MIN_ELEMENT_SIZE, MIN_ELEMENT_SIZE));
    }

    #[test]
    fn update_ignores_foreign_fields() {
        let r = rect();
        let patched = r.update(&ElementPatch {
            text: Some("nope".into()),
            src: Some("/x.png".into()),
            ..ElementPatch::default()
        });
        assert_eq!(patched, r);
    }

    #[test]
    fn font_size_is_clamped() {
        let t = Element::create(ElementKind::Text, 0.0, 0.0, None);
        let big = t.update(&ElementPatch {
            font_size: Some(900.0),
            ..ElementPatch::default()
        });
        assert_eq!(big.text().unwrap().font_size, MAX_FONT_SIZE);
    }

    #[test]
    fn normalized_reanchors_strokes() {
        let pen = Element::create(ElementKind::Pen, 100.0, 100.0, None).with_points(vec![
            Point::new(0.0, 0.0),
            Point::new(-20.0, 10.0),
            Point::new(30.0, 40.0),
        ]);
        let n = pen.normalized();
        assert_eq!((n.x(), n.y()), (80.0, 100.0));
        assert_eq!((n.width(), n.height()), (50.0, 40.0));
        assert_eq!(n.draw().unwrap().points[0], Point::new(20.0, 0.0));
    }

    #[test]
    fn duplicate_gets_new_identity_and_offset() {
        let r = rect();
        let copy = r.duplicate(ElementId::intern("copy-1"), 20.0);
        assert_ne!(copy.id(), r.id());
        assert_eq!((copy.x(), copy.y()), (30.0, 40.0));
        assert_eq!(copy.shape(), r.shape());
    }

    #[test]
    fn transform_patch_floors_and_scales_font() {
        let t = Element::create(ElementKind::Text, 0.0, 0.0, None);
        let patch = t.transform_patch(&TransformEnd {
            x: 5.0,
            y: 6.0,
            rotation: 30.0,
            scale_x: 0.001,
            scale_y: 2.0,
        });
        assert_eq!(patch.width, Some(MIN_ELEMENT_SIZE));
        assert_eq!(patch.height, Some(100.0));
        assert_eq!(patch.font_size, Some(40.0));

        let odd = t.transform_patch(&TransformEnd {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.23,
        });
        assert_eq!(odd.font_size, Some(25.0));
    }

    #[test]
    fn text_transform_capitalize() {
        assert_eq!(TextTransform::Capitalize.apply("hello big world"), "Hello Big World");
    }
}
