//! Pointer input as seen by the tools.
//!
//! Hosts report raw screen positions; the editor resolves the canvas
//! position and what is under the pointer before a tool sees the event.

use kurbo::Point;
use sb_core::ElementId;
use sb_render::Handle;

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Platform command key: ⌘ on macOS, Ctrl elsewhere.
    pub fn cmd(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// What the pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Element(ElementId),
    /// A selection handle of the given element.
    Handle(ElementId, Handle),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Host pointer id; one gesture follows one pointer.
    pub pointer_id: u32,
    pub screen: Point,
    /// Canvas-space position, `None` when the host could not resolve one.
    pub canvas: Option<Point>,
    pub modifiers: Modifiers,
    /// Hit result. Only resolved while the select tool is active.
    pub target: Option<HitTarget>,
}

impl PointerEvent {
    /// Event at a canvas point with an identity viewport. Handy in tests.
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            pointer_id: 1,
            screen: Point::new(x, y),
            canvas: Some(Point::new(x, y)),
            modifiers: Modifiers::NONE,
            target: None,
        }
    }

    pub fn on(mut self, target: HitTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_pointer(mut self, pointer_id: u32) -> Self {
        self.pointer_id = pointer_id;
        self
    }

    /// Same event with the canvas position missing.
    pub fn without_position(mut self) -> Self {
        self.canvas = None;
        self
    }
}
