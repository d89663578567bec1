//! Element kinds and the kind-group membership tests.
//!
//! Every "what sort of thing is this" question in the editor goes through
//! the predicates here instead of matching on kinds at each call site.
//!
//! | Kind | shape | text-shape | text-like | draw | image |
//! |------|:-----:|:----------:|:---------:|:----:|:-----:|
//! | rectangle, circle, triangle, star | ✓ | | | | |
//! | chat-bubble, arrow-left/right, rectangle-text, circle-text | ✓ | ✓ | ✓ | | |
//! | text | | | ✓ | | |
//! | pencil, pen | | | | ✓ | |
//! | image | | | | | ✓ |

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of placeable element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    Image,
    Text,
    Rectangle,
    Circle,
    Triangle,
    Star,
    ChatBubble,
    ArrowLeft,
    ArrowRight,
    RectangleText,
    CircleText,
    Pencil,
    Pen,
}

/// Which payload variant an element of a given kind carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadClass {
    Shape,
    Text,
    TextShape,
    Image,
    Draw,
}

impl ElementKind {
    pub const ALL: [ElementKind; 13] = [
        ElementKind::Image,
        ElementKind::Text,
        ElementKind::Rectangle,
        ElementKind::Circle,
        ElementKind::Triangle,
        ElementKind::Star,
        ElementKind::ChatBubble,
        ElementKind::ArrowLeft,
        ElementKind::ArrowRight,
        ElementKind::RectangleText,
        ElementKind::CircleText,
        ElementKind::Pencil,
        ElementKind::Pen,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Image => "image",
            ElementKind::Text => "text",
            ElementKind::Rectangle => "rectangle",
            ElementKind::Circle => "circle",
            ElementKind::Triangle => "triangle",
            ElementKind::Star => "star",
            ElementKind::ChatBubble => "chat-bubble",
            ElementKind::ArrowLeft => "arrow-left",
            ElementKind::ArrowRight => "arrow-right",
            ElementKind::RectangleText => "rectangle-text",
            ElementKind::CircleText => "circle-text",
            ElementKind::Pencil => "pencil",
            ElementKind::Pen => "pen",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    pub fn payload_class(self) -> PayloadClass {
        match self {
            ElementKind::Image => PayloadClass::Image,
            ElementKind::Text => PayloadClass::Text,
            ElementKind::Pencil | ElementKind::Pen => PayloadClass::Draw,
            ElementKind::ChatBubble
            | ElementKind::ArrowLeft
            | ElementKind::ArrowRight
            | ElementKind::RectangleText
            | ElementKind::CircleText => PayloadClass::TextShape,
            ElementKind::Rectangle
            | ElementKind::Circle
            | ElementKind::Triangle
            | ElementKind::Star => PayloadClass::Shape,
        }
    }

    /// Plain geometric shapes without a caption.
    pub fn is_basic_shape(self) -> bool {
        self.payload_class() == PayloadClass::Shape
    }

    /// Shapes that carry a caption.
    pub fn is_text_shape(self) -> bool {
        self.payload_class() == PayloadClass::TextShape
    }

    /// Any shape, captioned or not.
    pub fn is_shape(self) -> bool {
        self.is_basic_shape() || self.is_text_shape()
    }

    /// Kinds whose content can be edited inline (double-click).
    pub fn is_text_like(self) -> bool {
        matches!(
            self.payload_class(),
            PayloadClass::Text | PayloadClass::TextShape
        )
    }

    pub fn is_draw(self) -> bool {
        self.payload_class() == PayloadClass::Draw
    }

    pub fn is_image(self) -> bool {
        self == ElementKind::Image
    }

    /// Whether elements of this kind can be picked with the pointer.
    /// Every kind currently can; visibility and locking are per-element.
    pub fn is_pointer_selectable(self) -> bool {
        true
    }

    /// Kinds that are created by dragging out a box (as opposed to
    /// accumulating a freehand stroke).
    pub fn is_box_created(self) -> bool {
        !self.is_draw()
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
