//! Flat, kind-tagged element records: the serialized form of an element.
//!
//! ```json
//! {"id":"1718000001234","type":"rectangle","name":"rectangle 1234",
//!  "x":20,"y":80,"width":100,"height":120,"rotation":0,
//!  "visible":true,"locked":false,"color":"#3B82F6"}
//! ```
//!
//! Only fields that belong to the element's payload are written. On read,
//! missing payload fields fall back to the kind's defaults, and fields that
//! belong to another payload are ignored.

use crate::color::Color;
use crate::error::ModelError;
use crate::id::ElementId;
use crate::kind::ElementKind;
use crate::model::{
    DrawProps, Element, FontStyle, ImageProps, MIN_ELEMENT_SIZE, Payload, ShapeProps,
    StrokeStyle, TextAlign, TextDecoration, TextProps, TextTransform, clamp_font_size,
    default_payload, default_size,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "yes")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    /// Edit mode is transient and never written.
    #[serde(default, skip_serializing)]
    pub is_editing: bool,

    // Shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_style: Option<StrokeStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sides: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub star_inner_radius: Option<f64>,

    // Text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_transform: Option<TextTransform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_stroke: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_stroke_width: Option<f64>,

    // Image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    // Draw: points are flattened `[x0, y0, x1, y1, ...]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
}

fn yes() -> bool {
    true
}

impl ElementRecord {
    fn bare(el: &Element) -> Self {
        ElementRecord {
            id: el.id,
            kind: el.kind,
            name: Some(el.name.clone()),
            x: el.x,
            y: el.y,
            width: Some(el.width),
            height: Some(el.height),
            rotation: el.rotation,
            visible: el.visible,
            locked: el.locked,
            is_editing: el.is_editing,
            color: None,
            stroke: None,
            stroke_width: None,
            stroke_style: None,
            corner_radius: None,
            sides: None,
            star_inner_radius: None,
            text: None,
            font_family: None,
            font_size: None,
            text_color: None,
            font_style: None,
            align: None,
            line_height: None,
            letter_spacing: None,
            text_decoration: None,
            text_transform: None,
            text_stroke: None,
            text_stroke_width: None,
            src: None,
            points: None,
            tension: None,
            fill: None,
        }
    }

    fn write_shape(&mut self, shape: &ShapeProps) {
        self.color = Some(shape.color);
        self.stroke = shape.stroke;
        self.stroke_width = Some(shape.stroke_width);
        self.stroke_style = Some(shape.stroke_style);
        self.corner_radius = Some(shape.corner_radius);
        self.sides = shape.sides;
        self.star_inner_radius = shape.star_inner_radius;
    }

    fn write_text(&mut self, text: &TextProps) {
        self.text = Some(text.text.clone());
        self.font_family = Some(text.font_family.clone());
        self.font_size = Some(text.font_size);
        self.text_color = Some(text.text_color);
        self.font_style = Some(text.font_style);
        self.align = Some(text.align);
        self.line_height = Some(text.line_height);
        self.letter_spacing = Some(text.letter_spacing);
        self.text_decoration = Some(text.text_decoration);
        self.text_transform = Some(text.text_transform);
        self.text_stroke = text.text_stroke;
        self.text_stroke_width = Some(text.text_stroke_width);
    }

    fn read_shape(&self, mut shape: ShapeProps) -> ShapeProps {
        if let Some(c) = self.color {
            shape.color = c;
        }
        if self.stroke.is_some() {
            shape.stroke = self.stroke;
        }
        if let Some(w) = self.stroke_width {
            shape.stroke_width = w;
        }
        if let Some(s) = self.stroke_style {
            shape.stroke_style = s;
        }
        if let Some(r) = self.corner_radius {
            shape.corner_radius = r;
        }
        if self.sides.is_some() {
            shape.sides = self.sides;
        }
        if self.star_inner_radius.is_some() {
            shape.star_inner_radius = self.star_inner_radius;
        }
        shape
    }

    fn read_text(&self, mut text: TextProps) -> TextProps {
        if let Some(t) = &self.text {
            text.text = t.clone();
        }
        if let Some(f) = &self.font_family {
            text.font_family = f.clone();
        }
        if let Some(s) = self.font_size {
            text.font_size = clamp_font_size(s);
        }
        if let Some(c) = self.text_color {
            text.text_color = c;
        }
        if let Some(s) = self.font_style {
            text.font_style = s;
        }
        if let Some(a) = self.align {
            text.align = a;
        }
        if let Some(l) = self.line_height {
            text.line_height = l;
        }
        if let Some(l) = self.letter_spacing {
            text.letter_spacing = l;
        }
        if let Some(d) = self.text_decoration {
            text.text_decoration = d;
        }
        if let Some(t) = self.text_transform {
            text.text_transform = t;
        }
        if self.text_stroke.is_some() {
            text.text_stroke = self.text_stroke;
        }
        if let Some(w) = self.text_stroke_width {
            text.text_stroke_width = w;
        }
        text
    }

    fn read_points(&self) -> Result<Vec<Point>, ModelError> {
        let Some(flat) = &self.points else {
            return Ok(Vec::new());
        };
        if flat.len() % 2 != 0 {
            return Err(ModelError::InvalidRecord {
                id: self.id.to_string(),
                reason: format!("odd number of point coordinates ({})", flat.len()),
            });
        }
        Ok(flat
            .chunks_exact(2)
            .map(|xy| Point::new(xy[0], xy[1]))
            .collect())
    }
}

impl From<Element> for ElementRecord {
    fn from(el: Element) -> Self {
        let mut rec = ElementRecord::bare(&el);
        match &el.payload {
            Payload::Shape(shape) => rec.write_shape(shape),
            Payload::Text(text) => rec.write_text(text),
            Payload::TextShape { shape, text } => {
                rec.write_shape(shape);
                rec.write_text(text);
            }
            Payload::Image(image) => rec.src = Some(image.src.clone()),
            Payload::Draw(draw) => {
                rec.points = Some(draw.points.iter().flat_map(|p| [p.x, p.y]).collect());
                rec.stroke = Some(draw.stroke);
                rec.stroke_width = Some(draw.stroke_width);
                rec.tension = Some(draw.tension);
                rec.fill = draw.fill;
            }
        }
        rec
    }
}

impl TryFrom<ElementRecord> for Element {
    type Error = ModelError;

    fn try_from(rec: ElementRecord) -> Result<Self, Self::Error> {
        let invalid = |reason: String| ModelError::InvalidRecord {
            id: rec.id.to_string(),
            reason,
        };
        let (default_w, default_h) = default_size(rec.kind);
        let width = rec.width.unwrap_or(default_w);
        let height = rec.height.unwrap_or(default_h);
        let font_size = rec.font_size.unwrap_or(MIN_ELEMENT_SIZE);
        for (field, value) in [
            ("x", rec.x),
            ("y", rec.y),
            ("rotation", rec.rotation),
            ("width", width),
            ("height", height),
            ("fontSize", font_size),
        ] {
            if !value.is_finite() {
                return Err(invalid(format!("{field} is not finite")));
            }
        }

        let payload = match default_payload(rec.kind) {
            Payload::Shape(shape) => Payload::Shape(rec.read_shape(shape)),
            Payload::Text(text) => Payload::Text(rec.read_text(text)),
            Payload::TextShape { shape, text } => Payload::TextShape {
                shape: rec.read_shape(shape),
                text: rec.read_text(text),
            },
            Payload::Image(image) => Payload::Image(ImageProps {
                src: rec.src.clone().unwrap_or(image.src),
            }),
            Payload::Draw(draw) => Payload::Draw(DrawProps {
                points: rec.read_points()?,
                stroke: rec.stroke.unwrap_or(draw.stroke),
                stroke_width: rec.stroke_width.unwrap_or(draw.stroke_width),
                tension: rec.tension.unwrap_or(draw.tension),
                fill: rec.fill.or(draw.fill),
            }),
        };

        Ok(Element {
            id: rec.id,
            kind: rec.kind,
            name: rec
                .name
                .unwrap_or_else(|| format!("{} {}", rec.kind, rec.id.short_suffix())),
            x: rec.x,
            y: rec.y,
            width: width.max(MIN_ELEMENT_SIZE),
            height: height.max(MIN_ELEMENT_SIZE),
            rotation: rec.rotation,
            visible: rec.visible,
            locked: rec.locked,
            is_editing: rec.is_editing,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_kind_survives_json() {
        for kind in ElementKind::ALL {
            let el = Element::create(kind, 12.5, -4.0, None);
            let json = serde_json::to_string(&el).unwrap();
            let back: Element = serde_json::from_str(&json).unwrap();
            // Fresh strokes are 0x0 until committed; loading floors them.
            assert_eq!(back, el.normalized(), "{kind}");
        }
    }

    #[test]
    fn record_is_flat_and_kind_tagged() {
        let el = Element::create(
            ElementKind::Triangle,
            1.0,
            2.0,
            Some(ElementId::intern("tri-0001")),
        );
        let value = serde_json::to_value(&el).unwrap();
        assert_eq!(value["type"], "triangle");
        assert_eq!(value["color"], "#10B981");
        assert_eq!(value["sides"], 3);
        assert!(value.get("text").is_none());
        assert!(value.get("isEditing").is_none());
    }

    #[test]
    fn missing_fields_take_kind_defaults() {
        let el: Element =
            serde_json::from_str(r#"{"id":"abc12345","type":"chat-bubble","x":0,"y":0}"#).unwrap();
        assert_eq!(el.name(), "chat-bubble 2345");
        assert_eq!(el.text().unwrap().text, "Label");
        assert_eq!((el.width(), el.height()), (100.0, 100.0));
        assert!(el.visible());
    }

    #[test]
    fn draw_points_are_flattened() {
        let el = Element::create(ElementKind::Pencil, 0.0, 0.0, None)
            .with_points(vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
        let value = serde_json::to_value(&el).unwrap();
        assert_eq!(value["points"], serde_json::json!([1.0, 2.0, 3.0, 4.0]));
    }

    #[test]
    fn odd_point_list_is_rejected() {
        let err = serde_json::from_str::<Element>(
            r#"{"id":"p1","type":"pen","x":0,"y":0,"points":[1,2,3]}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = serde_json::from_str::<Element>(r#"{"id":"h1","type":"hexagon","x":0,"y":0}"#);
        assert!(err.is_err());
    }

    #[test]
    fn loaded_sizes_are_floored() {
        let el: Element = serde_json::from_str(
            r#"{"id":"r0","type":"rectangle","x":0,"y":0,"width":0,"height":-10}"#,
        )
        .unwrap();
        assert_eq!((el.width(), el.height()), (MIN_ELEMENT_SIZE, MIN_ELEMENT_SIZE));
    }

    #[test]
    fn loaded_font_size_is_clamped() {
        let small: Element =
            serde_json::from_str(r#"{"id":"t0","type":"text","x":0,"y":0,"fontSize":0}"#).unwrap();
        assert_eq!(small.text().unwrap().font_size, 5.0);
        let big: Element = serde_json::from_str(
            r#"{"id":"t1","type":"circle-text","x":0,"y":0,"fontSize":900}"#,
        )
        .unwrap();
        assert_eq!(big.text().unwrap().font_size, 200.0);
    }

    #[test]
    fn non_finite_size_is_rejected() {
        let el = Element::create(ElementKind::Rectangle, 0.0, 0.0, None);
        let mut rec = ElementRecord::bare(&el);
        rec.height = Some(f64::NAN);
        assert!(matches!(
            Element::try_from(rec),
            Err(ModelError::InvalidRecord { .. })
        ));
    }
}
