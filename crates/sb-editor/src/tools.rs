//! Tool strategies for canvas interactions.
//!
//! Each tool turns the pointer-down/move/up of one gesture into
//! [`ToolEffect`]s. Tools never touch the scene: they read a snapshot
//! through the [`InteractionContext`] and queue effects that the editor
//! applies through history.
//!
//! | Tool | Gesture | Result |
//! |------|---------|--------|
//! | select | press on element, drag | select, then one move commit |
//! | select | press on handle, drag | one resize / rotate commit |
//! | hand | drag | pan the viewport |
//! | shapes, text, image | drag out a box | one element, back to select |
//! | pencil, pen | drag | one stroke, tool stays active |

use crate::input::{HitTarget, PointerEvent};
use crate::state::EditorState;
use kurbo::{Point, Vec2};
use sb_core::config::{DrawingStyle, EditorConfig};
use sb_core::geometry::{TransformEnd, diagonal, normalize_box};
use sb_core::{Element, ElementId, ElementKind, ElementPatch, clamp_font_size};
use sb_render::handles::{self, Handle};
use smallvec::SmallVec;
use std::fmt;

/// The active tool determines how pointer events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Select,
    Hand,
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
    Text,
    Image,
}

impl ToolKind {
    pub const ALL: [ToolKind; 15] = [
        ToolKind::Select,
        ToolKind::Hand,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Triangle,
        ToolKind::Star,
        ToolKind::ChatBubble,
        ToolKind::ArrowLeft,
        ToolKind::ArrowRight,
        ToolKind::RectangleText,
        ToolKind::CircleText,
        ToolKind::Pencil,
        ToolKind::Pen,
        ToolKind::Text,
        ToolKind::Image,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Hand => "hand",
            other => match other.element_kind() {
                Some(kind) => kind.as_str(),
                None => "select",
            },
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// The element kind this tool creates, if it creates one.
    pub fn element_kind(self) -> Option<ElementKind> {
        match self {
            ToolKind::Select | ToolKind::Hand => None,
            ToolKind::Rectangle => Some(ElementKind::Rectangle),
            ToolKind::Circle => Some(ElementKind::Circle),
            ToolKind::Triangle => Some(ElementKind::Triangle),
            ToolKind::Star => Some(ElementKind::Star),
            ToolKind::ChatBubble => Some(ElementKind::ChatBubble),
            ToolKind::ArrowLeft => Some(ElementKind::ArrowLeft),
            ToolKind::ArrowRight => Some(ElementKind::ArrowRight),
            ToolKind::RectangleText => Some(ElementKind::RectangleText),
            ToolKind::CircleText => Some(ElementKind::CircleText),
            ToolKind::Pencil => Some(ElementKind::Pencil),
            ToolKind::Pen => Some(ElementKind::Pen),
            ToolKind::Text => Some(ElementKind::Text),
            ToolKind::Image => Some(ElementKind::Image),
        }
    }

    pub fn for_element_kind(kind: ElementKind) -> ToolKind {
        Self::ALL
            .into_iter()
            .find(|t| t.element_kind() == Some(kind))
            .unwrap_or(ToolKind::Select)
    }

    /// Freehand tools (pencil, pen).
    pub fn is_draw(self) -> bool {
        self.element_kind().is_some_and(|k| k.is_draw())
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something a tool wants done. Applied in order by the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolEffect {
    /// Add a finished element to the scene (tracked).
    Commit(Element),
    /// Patch an existing element (tracked).
    Update { id: ElementId, patch: ElementPatch },
    /// Change the selection (untracked on its own).
    Select(Option<ElementId>),
    /// Leave inline text editing on an element (untracked).
    StopEditing(ElementId),
    SetTool(ToolKind),
    /// A one-shot tool finished its job; the UI returns to select.
    ToolConsumed,
    /// Pan the viewport by a screen-space delta.
    PanBy(Vec2),
}

pub type Effects = SmallVec<[ToolEffect; 4]>;

/// Per-gesture state threaded through the three pointer stages.
///
/// `is_drawing` and `preview` are owned by the dispatcher between events
/// and handed back in on the next one; the state view and style are
/// read-only snapshots.
pub struct InteractionContext<'a> {
    pub is_drawing: bool,
    /// Uncommitted element being drawn or transformed. May share its id
    /// with a scene element, in which case it replaces it when rendered.
    pub preview: Option<Element>,
    pub state: &'a EditorState,
    pub style: &'a DrawingStyle,
    pub config: &'a EditorConfig,
    effects: Effects,
}

impl<'a> InteractionContext<'a> {
    pub fn new(state: &'a EditorState, style: &'a DrawingStyle, config: &'a EditorConfig) -> Self {
        Self {
            is_drawing: false,
            preview: None,
            state,
            style,
            config,
            effects: SmallVec::new(),
        }
    }

    pub fn emit(&mut self, effect: ToolEffect) {
        self.effects.push(effect);
    }

    pub fn effects(&self) -> &[ToolEffect] {
        &self.effects
    }

    pub fn take_effects(&mut self) -> Effects {
        std::mem::take(&mut self.effects)
    }

    /// End the gesture without committing anything.
    fn reset(&mut self) {
        self.is_drawing = false;
        self.preview = None;
    }

    /// Leave edit mode on the selected element and clear the selection, as
    /// every creation gesture does before it starts.
    fn release_selection(&mut self) {
        let state = self.state;
        if let Some(el) = state.selected_element().filter(|el| el.is_editing()) {
            self.emit(ToolEffect::StopEditing(el.id()));
        }
        if state.selected.is_some() {
            self.emit(ToolEffect::Select(None));
        }
    }
}

/// Trait for tools that turn a pointer gesture into effects.
pub trait ToolStrategy {
    fn kind(&self) -> ToolKind;

    fn on_pointer_down(&mut self, event: &PointerEvent, ctx: &mut InteractionContext);

    fn on_pointer_move(&mut self, event: &PointerEvent, ctx: &mut InteractionContext);

    fn on_pointer_up(&mut self, event: &PointerEvent, ctx: &mut InteractionContext);

    /// Whether a gesture is in progress.
    fn is_active(&self) -> bool;

    /// Abandon any gesture in progress.
    fn cancel(&mut self);

    /// Transient scale of the element being transformed; `(1, 1)` otherwise.
    fn live_scale(&self) -> (f64, f64) {
        (1.0, 1.0)
    }
}

// ─── Shape Tool ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
enum ShapeState {
    #[default]
    Idle,
    Drawing {
        anchor: Point,
        /// Default-initialized element the preview is derived from.
        base: Element,
    },
}

/// Drag out a box to create an element of one kind. Covers every
/// box-created kind: basic shapes, captioned shapes, text and images.
pub struct ShapeTool {
    tool: ToolKind,
    kind: ElementKind,
    state: ShapeState,
}

impl ShapeTool {
    pub fn new(tool: ToolKind, kind: ElementKind) -> Self {
        Self {
            tool,
            kind,
            state: ShapeState::Idle,
        }
    }

    /// Text grows with the box, keeping the default size/height ratio. A
    /// flat box keeps the font size of the `previous` preview.
    fn preview_for(
        base: &Element,
        previous: Option<&Element>,
        anchor: Point,
        current: Point,
    ) -> Element {
        let r = normalize_box(anchor, current);
        let preview = base.preview_bounds(r.x0, r.y0, r.width(), r.height());
        let Some(text) = base.text() else {
            return preview;
        };
        let font_size = if r.height() > 0.0 {
            clamp_font_size((text.font_size * r.height() / base.height()).round())
        } else {
            previous
                .and_then(Element::text)
                .map_or(text.font_size, |t| t.font_size)
        };
        preview.update(&ElementPatch {
            font_size: Some(font_size),
            ..ElementPatch::default()
        })
    }
}

impl ToolStrategy for ShapeTool {
    fn kind(&self) -> ToolKind {
        self.tool
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, ctx: &mut InteractionContext) {
        let Some(p) = event.canvas else {
            log::debug!("{}: pointer-down without position ignored", self.tool);
            return;
        };
        ctx.release_selection();

        let mut base = Element::create(self.kind, p.x, p.y, None);
        if self.kind.is_image() {
            base = base.update(&ElementPatch {
                src: Some(ctx.config.default_image_src.clone()),
                ..ElementPatch::default()
            });
        }
        ctx.preview = Some(base.preview_bounds(p.x, p.y, 0.0, 0.0));
        ctx.is_drawing = true;
        log::debug!("{}: drawing from ({:.1}, {:.1})", self.tool, p.x, p.y);
        self.state = ShapeState::Drawing { anchor: p, base };
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, ctx: &mut InteractionContext) {
        let ShapeState::Drawing { anchor, base } = &self.state else {
            return;
        };
        if let Some(p) = event.canvas {
            ctx.preview = Some(Self::preview_for(base, ctx.preview.as_ref(), *anchor, p));
        }
    }

    fn on_pointer_up(&mut self, event: &PointerEvent, ctx: &mut InteractionContext) {
        let ShapeState::Drawing { anchor, base } = std::mem::take(&mut self.state) else {
            return;
        };
        let Some(p) = event.canvas else {
            log::debug!("{}: pointer-up without position, gesture discarded", self.tool);
            ctx.reset();
            return;
        };

        let drawn = normalize_box(anchor, p);
        if diagonal(drawn) < ctx.config.min_gesture_diagonal {
            log::debug!(
                "{}: diagonal {:.2} below threshold, treated as click",
                self.tool,
                diagonal(drawn)
            );
            ctx.reset();
            ctx.emit(ToolEffect::SetTool(ToolKind::Select));
            return;
        }

        let element = Self::preview_for(&base, ctx.preview.as_ref(), anchor, p).normalized();
        let id = element.id();
        ctx.reset();
        ctx.emit(ToolEffect::Commit(element));
        ctx.emit(ToolEffect::Select(Some(id)));
        ctx.emit(ToolEffect::ToolConsumed);
    }

    fn is_active(&self) -> bool {
        matches!(self.state, ShapeState::Drawing { .. })
    }

    fn cancel(&mut self) {
        self.state = ShapeState::Idle;
    }
}

// ─── Freehand Tool ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
enum FreehandState {
    #[default]
    Idle,
    Drawing {
        anchor: Point,
        base: Element,
        /// Points relative to `anchor`.
        points: Vec<Point>,
    },
}

/// Pencil and pen: accumulate a stroke while the pointer is down.
pub struct FreehandTool {
    tool: ToolKind,
    kind: ElementKind,
    state: FreehandState,
}

impl FreehandTool {
    pub fn new(tool: ToolKind, kind: ElementKind) -> Self {
        Self {
            tool,
            kind,
            state: FreehandState::Idle,
        }
    }

    fn push_point(points: &mut Vec<Point>, p: Point) {
        if points.last() != Some(&p) {
            points.push(p);
        }
    }
}

impl ToolStrategy for FreehandTool {
    fn kind(&self) -> ToolKind {
        self.tool
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, ctx: &mut InteractionContext) {
        let Some(p) = event.canvas else {
            return;
        };
        ctx.release_selection();

        let tension = if self.kind == ElementKind::Pencil {
            ctx.style.tension
        } else {
            0.0
        };
        let base = Element::create(self.kind, p.x, p.y, None).update(&ElementPatch {
            stroke: Some(ctx.style.stroke),
            stroke_width: Some(ctx.style.stroke_width),
            tension: Some(tension),
            ..ElementPatch::default()
        });
        let points = vec![Point::ZERO];
        ctx.preview = Some(base.with_points(points.clone()));
        ctx.is_drawing = true;
        self.state = FreehandState::Drawing {
            anchor: p,
            base,
            points,
        };
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, ctx: &mut InteractionContext) {
        let FreehandState::Drawing {
            anchor,
            base,
            points,
        } = &mut self.state
        else {
            return;
        };
        if let Some(p) = event.canvas {
            Self::push_point(points, (p - *anchor).to_point());
            log::trace!("{}: {} points", self.tool, points.len());
            ctx.preview = Some(base.with_points(points.clone()));
        }
    }

    fn on_pointer_up(&mut self, event: &PointerEvent, ctx: &mut InteractionContext) {
        let FreehandState::Drawing {
            anchor,
            base,
            mut points,
        } = std::mem::take(&mut self.state)
        else {
            return;
        };
        if let Some(p) = event.canvas {
            Self::push_point(&mut points, (p - anchor).to_point());
        }
        ctx.reset();
        if points.len() < 2 {
            log::debug!("{}: single-point stroke discarded", self.tool);
            return;
        }
        let element = base.with_points(points).normalized();
        let id = element.id();
        ctx.emit(ToolEffect::Commit(element));
        ctx.emit(ToolEffect::Select(Some(id)));
    }

    fn is_active(&self) -> bool {
        matches!(self.state, FreehandState::Drawing { .. })
    }

    fn cancel(&mut self) {
        self.state = FreehandState::Idle;
    }
}

// ─── Select Tool ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
enum SelectState {
    #[default]
    Idle,
    /// Moving an element. `grab` is the canvas point the press landed on.
    Dragging {
        start: Element,
        grab: Point,
        moved: bool,
    },
    Resizing {
        start: Element,
        handle: Handle,
        scale: (f64, f64),
        origin: Point,
    },
    Rotating {
        start: Element,
        from: Point,
        rotation: Option<f64>,
    },
}

/// Select, move, resize and rotate existing elements.
#[derive(Default)]
pub struct SelectTool {
    state: SelectState,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn press_element(&mut self, id: ElementId, p: Point, ctx: &mut InteractionContext) {
        let state = ctx.state;
        let Some(el) = state.scene.get(id) else {
            log::warn!("select: pressed stale element {id:?}");
            return;
        };
        if state.selected != Some(id) {
            if let Some(prev) = state.selected_element().filter(|prev| prev.is_editing()) {
                ctx.emit(ToolEffect::StopEditing(prev.id()));
            }
            ctx.emit(ToolEffect::Select(Some(id)));
        }
        if el.is_draggable() {
            self.state = SelectState::Dragging {
                start: el.clone(),
                grab: p,
                moved: false,
            };
            ctx.is_drawing = true;
            ctx.preview = Some(el.clone());
        } else {
            log::debug!("select: {id:?} is locked or being edited, not dragging");
        }
    }

    fn press_handle(&mut self, id: ElementId, handle: Handle, p: Point, ctx: &mut InteractionContext) {
        let state = ctx.state;
        let Some(el) = state.scene.get(id) else {
            return;
        };
        if el.locked() {
            return;
        }
        self.state = if handle.is_resize() {
            SelectState::Resizing {
                start: el.clone(),
                handle,
                scale: (1.0, 1.0),
                origin: Point::new(el.x(), el.y()),
            }
        } else {
            SelectState::Rotating {
                start: el.clone(),
                from: p,
                rotation: None,
            }
        };
        ctx.is_drawing = true;
        ctx.preview = Some(el.clone());
    }
}

impl ToolStrategy for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, ctx: &mut InteractionContext) {
        let Some(p) = event.canvas else {
            return;
        };
        match event.target {
            Some(HitTarget::Handle(id, handle)) => self.press_handle(id, handle, p, ctx),
            Some(HitTarget::Element(id)) => self.press_element(id, p, ctx),
            None => ctx.release_selection(),
        }
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, ctx: &mut InteractionContext) {
        let Some(p) = event.canvas else {
            return;
        };
        match &mut self.state {
            SelectState::Idle => {}
            SelectState::Dragging { start, grab, moved } => {
                let d = p - *grab;
                *moved |= d != Vec2::ZERO;
                ctx.preview = Some(start.preview_bounds(
                    start.x() + d.x,
                    start.y() + d.y,
                    start.width(),
                    start.height(),
                ));
            }
            SelectState::Resizing {
                start,
                handle,
                scale,
                origin,
            } => {
                let (o, w, h) = handles::resize(start, *handle, p);
                *scale = (w / start.width(), h / start.height());
                *origin = o;
                let mut preview = start.preview_bounds(o.x, o.y, w, h);
                if let Some(text) = start.text() {
                    preview = preview.update(&ElementPatch {
                        font_size: Some((text.font_size * scale.1).round()),
                        ..ElementPatch::default()
                    });
                }
                ctx.preview = Some(preview);
            }
            SelectState::Rotating {
                start,
                from,
                rotation,
            } => {
                let r = handles::rotation_after_drag(start, *from, p);
                let o = handles::origin_for_rotation(start, r);
                *rotation = Some(r);
                ctx.preview = Some(start.update(&ElementPatch {
                    x: Some(o.x),
                    y: Some(o.y),
                    rotation: Some(r),
                    ..ElementPatch::default()
                }));
            }
        }
    }

    fn on_pointer_up(&mut self, event: &PointerEvent, ctx: &mut InteractionContext) {
        if event.canvas.is_some() {
            self.on_pointer_move(event, ctx);
        }
        let state = std::mem::take(&mut self.state);
        ctx.reset();
        match state {
            SelectState::Idle => {}
            SelectState::Dragging { start, grab, moved } => {
                let Some(p) = event.canvas.filter(|_| moved) else {
                    return;
                };
                let d = p - grab;
                ctx.emit(ToolEffect::Update {
                    id: start.id(),
                    patch: ElementPatch::position(start.x() + d.x, start.y() + d.y),
                });
            }
            SelectState::Resizing {
                start,
                scale,
                origin,
                ..
            } => {
                if scale == (1.0, 1.0) && origin == Point::new(start.x(), start.y()) {
                    return;
                }
                // Scale is folded into width/height here and never stored.
                let patch = start.transform_patch(&TransformEnd {
                    x: origin.x,
                    y: origin.y,
                    rotation: start.rotation(),
                    scale_x: scale.0,
                    scale_y: scale.1,
                });
                ctx.emit(ToolEffect::Update {
                    id: start.id(),
                    patch,
                });
            }
            SelectState::Rotating {
                start, rotation, ..
            } => {
                let Some(r) = rotation else {
                    return;
                };
                let o = handles::origin_for_rotation(&start, r);
                ctx.emit(ToolEffect::Update {
                    id: start.id(),
                    patch: ElementPatch {
                        x: Some(o.x),
                        y: Some(o.y),
                        rotation: Some(r),
                        ..ElementPatch::default()
                    },
                });
            }
        }
    }

    fn is_active(&self) -> bool {
        !matches!(self.state, SelectState::Idle)
    }

    fn cancel(&mut self) {
        self.state = SelectState::Idle;
    }

    fn live_scale(&self) -> (f64, f64) {
        match self.state {
            SelectState::Resizing { scale, .. } => scale,
            _ => (1.0, 1.0),
        }
    }
}

// ─── Hand Tool ───────────────────────────────────────────────────────────

/// Pan the canvas. Works in screen space, so zoom does not affect speed.
#[derive(Default)]
pub struct HandTool {
    last: Option<Point>,
}

impl HandTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ToolStrategy for HandTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Hand
    }

    fn on_pointer_down(&mut self, event: &PointerEvent, ctx: &mut InteractionContext) {
        self.last = Some(event.screen);
        ctx.is_drawing = true;
    }

    fn on_pointer_move(&mut self, event: &PointerEvent, ctx: &mut InteractionContext) {
        let Some(last) = self.last else {
            return;
        };
        let delta = event.screen - last;
        if delta != Vec2::ZERO {
            ctx.emit(ToolEffect::PanBy(delta));
        }
        self.last = Some(event.screen);
    }

    fn on_pointer_up(&mut self, event: &PointerEvent, ctx: &mut InteractionContext) {
        self.on_pointer_move(event, ctx);
        self.last = None;
        ctx.reset();
    }

    fn is_active(&self) -> bool {
        self.last.is_some()
    }

    fn cancel(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::{MIN_ELEMENT_SIZE, Scene};

    struct Rig {
        state: EditorState,
        style: DrawingStyle,
        config: EditorConfig,
        is_drawing: bool,
        preview: Option<Element>,
    }

    impl Rig {
        fn new(state: EditorState) -> Self {
            Self {
                state,
                style: DrawingStyle::default(),
                config: EditorConfig::default(),
                is_drawing: false,
                preview: None,
            }
        }

        /// Run one stage and collect what the tool emitted.
        fn run(
            &mut self,
            tool: &mut dyn ToolStrategy,
            stage: fn(&mut dyn ToolStrategy, &PointerEvent, &mut InteractionContext),
            event: PointerEvent,
        ) -> Effects {
            let mut ctx = InteractionContext::new(&self.state, &self.style, &self.config);
            ctx.is_drawing = self.is_drawing;
            ctx.preview = self.preview.take();
            stage(tool, &event, &mut ctx);
            self.is_drawing = ctx.is_drawing;
            self.preview = ctx.preview.take();
            ctx.take_effects()
        }

        fn gesture(&mut self, tool: &mut dyn ToolStrategy, points: &[(f64, f64)]) -> Vec<ToolEffect> {
            let mut all = Vec::new();
            let (first, rest) = points.split_first().unwrap();
            let (last, middle) = rest.split_last().unwrap();
            all.extend(self.run(tool, |t, e, c| t.on_pointer_down(e, c), PointerEvent::at(first.0, first.1)));
            for p in middle {
                all.extend(self.run(tool, |t, e, c| t.on_pointer_move(e, c), PointerEvent::at(p.0, p.1)));
            }
            all.extend(self.run(tool, |t, e, c| t.on_pointer_up(e, c), PointerEvent::at(last.0, last.1)));
            all
        }
    }

    fn committed(effects: &[ToolEffect]) -> Option<&Element> {
        effects.iter().find_map(|e| match e {
            ToolEffect::Commit(el) => Some(el),
            _ => None,
        })
    }

    #[test]
    fn tool_names_roundtrip() {
        for tool in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(tool.as_str()), Some(tool));
        }
        assert_eq!(ToolKind::from_name("lasso"), None);
    }

    #[test]
    fn shape_drag_in_every_direction() {
        let anchor = (120.0, 80.0);
        for end in [(20.0, 200.0), (220.0, 200.0), (20.0, 10.0), (220.0, 10.0)] {
            let mut rig = Rig::new(EditorState::default());
            let mut tool = ShapeTool::new(ToolKind::Rectangle, ElementKind::Rectangle);
            let effects = rig.gesture(&mut tool, &[anchor, ((anchor.0 + end.0) / 2.0, 150.0), end]);
            let el = committed(&effects).expect("rectangle committed");
            assert_eq!(el.x(), f64::min(anchor.0, end.0));
            assert_eq!(el.y(), f64::min(anchor.1, end.1));
            assert_eq!(el.width(), (end.0 - anchor.0).abs());
            assert_eq!(el.height(), (end.1 - anchor.1).abs());
            assert!(effects.contains(&ToolEffect::ToolConsumed));
            assert!(!rig.is_drawing);
            assert!(rig.preview.is_none());
        }
    }

    #[test]
    fn tiny_drag_is_a_click() {
        let mut rig = Rig::new(EditorState::default());
        let mut tool = ShapeTool::new(ToolKind::Circle, ElementKind::Circle);
        let effects = rig.gesture(&mut tool, &[(10.0, 10.0), (12.0, 12.0), (13.0, 13.0)]);
        assert!(committed(&effects).is_none());
        assert_eq!(effects.last(), Some(&ToolEffect::SetTool(ToolKind::Select)));
        assert!(!tool.is_active());
    }

    #[test]
    fn missing_position_on_release_discards_silently() {
        let mut rig = Rig::new(EditorState::default());
        let mut tool = ShapeTool::new(ToolKind::Star, ElementKind::Star);
        rig.run(&mut tool, |t, e, c| t.on_pointer_down(e, c), PointerEvent::at(0.0, 0.0));
        rig.run(&mut tool, |t, e, c| t.on_pointer_move(e, c), PointerEvent::at(50.0, 50.0));
        let effects = rig.run(
            &mut tool,
            |t, e, c| t.on_pointer_up(e, c),
            PointerEvent::at(50.0, 50.0).without_position(),
        );
        assert!(effects.is_empty());
        assert!(rig.preview.is_none());
    }

    #[test]
    fn text_font_follows_drawn_height() {
        let mut rig = Rig::new(EditorState::default());
        let mut tool = ShapeTool::new(ToolKind::Text, ElementKind::Text);
        // Default text is 200×50 at 20px; a 100-high box doubles the font.
        let effects = rig.gesture(&mut tool, &[(0.0, 0.0), (300.0, 100.0)]);
        let el = committed(&effects).unwrap();
        assert_eq!(el.text().unwrap().font_size, 40.0);

        let huge = rig.gesture(&mut tool, &[(0.0, 0.0), (100.0, 5000.0)]);
        assert_eq!(committed(&huge).unwrap().text().unwrap().font_size, 200.0);
    }

    #[test]
    fn flat_text_box_keeps_last_font_size() {
        let mut rig = Rig::new(EditorState::default());
        let mut tool = ShapeTool::new(ToolKind::Text, ElementKind::Text);
        // 20px * 20 / 50 = 8px, then the release flattens the box.
        let effects = rig.gesture(&mut tool, &[(0.0, 0.0), (100.0, 20.0), (200.0, 0.0)]);
        let el = committed(&effects).unwrap();
        assert_eq!(el.text().unwrap().font_size, 8.0);
        assert_eq!(el.height(), MIN_ELEMENT_SIZE);

        // Flat from the start: the default font survives.
        let mut label = ShapeTool::new(ToolKind::RectangleText, ElementKind::RectangleText);
        let effects = rig.gesture(&mut label, &[(0.0, 0.0), (120.0, 0.0)]);
        assert_eq!(committed(&effects).unwrap().text().unwrap().font_size, 14.0);
    }

    #[test]
    fn creation_clears_selection_and_exits_edit_mode() {
        let text = Element::create(ElementKind::Text, 0.0, 0.0, None).update(&ElementPatch::editing(true));
        let id = text.id();
        let state = EditorState::new(Scene::from_elements([text])).with_selection(Some(id));
        let mut rig = Rig::new(state);
        let mut tool = ShapeTool::new(ToolKind::Rectangle, ElementKind::Rectangle);
        let effects = rig.run(&mut tool, |t, e, c| t.on_pointer_down(e, c), PointerEvent::at(300.0, 300.0));
        assert_eq!(
            effects.as_slice(),
            &[ToolEffect::StopEditing(id), ToolEffect::Select(None)]
        );
        assert!(rig.is_drawing);
    }

    #[test]
    fn freehand_accumulates_and_stays_active() {
        let mut rig = Rig::new(EditorState::default());
        let mut tool = FreehandTool::new(ToolKind::Pencil, ElementKind::Pencil);
        let effects = rig.gesture(&mut tool, &[(10.0, 10.0), (20.0, 15.0), (30.0, 5.0), (40.0, 20.0)]);
        let el = committed(&effects).unwrap();
        assert_eq!(el.draw().unwrap().points.len(), 4);
        assert_eq!((el.x(), el.y()), (10.0, 5.0));
        assert_eq!(el.draw().unwrap().tension, rig.style.tension);
        assert!(!effects.contains(&ToolEffect::ToolConsumed));
        assert!(!effects.iter().any(|e| matches!(e, ToolEffect::SetTool(_))));
    }

    #[test]
    fn pen_forces_zero_tension() {
        let mut rig = Rig::new(EditorState::default());
        let mut tool = FreehandTool::new(ToolKind::Pen, ElementKind::Pen);
        let effects = rig.gesture(&mut tool, &[(0.0, 0.0), (10.0, 10.0), (20.0, 0.0)]);
        assert_eq!(committed(&effects).unwrap().draw().unwrap().tension, 0.0);
    }

    #[test]
    fn single_point_stroke_is_dropped() {
        let mut rig = Rig::new(EditorState::default());
        let mut tool = FreehandTool::new(ToolKind::Pen, ElementKind::Pen);
        let effects = rig.gesture(&mut tool, &[(5.0, 5.0), (5.0, 5.0)]);
        assert!(committed(&effects).is_none());
    }

    #[test]
    fn drag_commits_once_on_release() {
        let el = Element::create(ElementKind::Rectangle, 0.0, 0.0, None);
        let id = el.id();
        let mut rig = Rig::new(EditorState::new(Scene::from_elements([el])));
        let mut tool = SelectTool::new();

        let down = rig.run(
            &mut tool,
            |t, e, c| t.on_pointer_down(e, c),
            PointerEvent::at(10.0, 10.0).on(HitTarget::Element(id)),
        );
        assert_eq!(down.as_slice(), &[ToolEffect::Select(Some(id))]);

        let mid = rig.run(&mut tool, |t, e, c| t.on_pointer_move(e, c), PointerEvent::at(30.0, 15.0));
        assert!(mid.is_empty());
        assert_eq!(rig.preview.as_ref().unwrap().x(), 20.0);

        let up = rig.run(&mut tool, |t, e, c| t.on_pointer_up(e, c), PointerEvent::at(50.0, 60.0));
        assert_eq!(
            up.as_slice(),
            &[ToolEffect::Update {
                id,
                patch: ElementPatch::position(40.0, 50.0)
            }]
        );
    }

    #[test]
    fn locked_elements_select_but_do_not_drag() {
        let el = Element::create(ElementKind::Rectangle, 0.0, 0.0, None).update(&ElementPatch {
            locked: Some(true),
            ..ElementPatch::default()
        });
        let id = el.id();
        let mut rig = Rig::new(EditorState::new(Scene::from_elements([el])));
        let mut tool = SelectTool::new();
        let down = rig.run(
            &mut tool,
            |t, e, c| t.on_pointer_down(e, c),
            PointerEvent::at(10.0, 10.0).on(HitTarget::Element(id)),
        );
        assert_eq!(down.as_slice(), &[ToolEffect::Select(Some(id))]);
        assert!(!tool.is_active());
    }

    #[test]
    fn resize_commits_canonical_size_and_resets_scale() {
        let el = Element::create(ElementKind::Rectangle, 0.0, 0.0, None);
        let id = el.id();
        let mut rig = Rig::new(EditorState::new(Scene::from_elements([el])).with_selection(Some(id)));
        let mut tool = SelectTool::new();

        rig.run(
            &mut tool,
            |t, e, c| t.on_pointer_down(e, c),
            PointerEvent::at(100.0, 100.0).on(HitTarget::Handle(id, Handle::BottomRight)),
        );
        rig.run(&mut tool, |t, e, c| t.on_pointer_move(e, c), PointerEvent::at(200.0, 150.0));
        assert_eq!(tool.live_scale(), (2.0, 1.5));

        let up = rig.run(&mut tool, |t, e, c| t.on_pointer_up(e, c), PointerEvent::at(-500.0, -500.0));
        let ToolEffect::Update { patch, .. } = &up[0] else {
            panic!("expected update, got {up:?}");
        };
        assert!(patch.width.unwrap() >= 5.0);
        assert!(patch.height.unwrap() >= 5.0);
        assert_eq!(tool.live_scale(), (1.0, 1.0));
    }

    #[test]
    fn resizing_text_rounds_font_size() {
        let el = Element::create(ElementKind::Text, 0.0, 0.0, None);
        let id = el.id();
        let mut rig = Rig::new(EditorState::new(Scene::from_elements([el])).with_selection(Some(id)));
        let mut tool = SelectTool::new();

        rig.run(
            &mut tool,
            |t, e, c| t.on_pointer_down(e, c),
            PointerEvent::at(200.0, 50.0).on(HitTarget::Handle(id, Handle::BottomRight)),
        );
        // 50 -> 61.5 is a 1.23 scale: 20px becomes 24.6, shown and stored as 25.
        rig.run(&mut tool, |t, e, c| t.on_pointer_move(e, c), PointerEvent::at(200.0, 61.5));
        let preview = rig.preview.as_ref().unwrap();
        assert_eq!(preview.text().unwrap().font_size, 25.0);

        let up = rig.run(&mut tool, |t, e, c| t.on_pointer_up(e, c), PointerEvent::at(200.0, 61.5));
        let ToolEffect::Update { patch, .. } = &up[0] else {
            panic!("expected update, got {up:?}");
        };
        assert_eq!(patch.font_size, Some(25.0));
    }

    #[test]
    fn empty_press_clears_selection() {
        let el = Element::create(ElementKind::Circle, 0.0, 0.0, None);
        let id = el.id();
        let mut rig = Rig::new(EditorState::new(Scene::from_elements([el])).with_selection(Some(id)));
        let mut tool = SelectTool::new();
        let effects = rig.run(&mut tool, |t, e, c| t.on_pointer_down(e, c), PointerEvent::at(500.0, 500.0));
        assert_eq!(effects.as_slice(), &[ToolEffect::Select(None)]);
    }

    #[test]
    fn hand_pans_by_screen_delta() {
        let mut rig = Rig::new(EditorState::default());
        let mut tool = HandTool::new();
        let effects = rig.gesture(&mut tool, &[(0.0, 0.0), (10.0, 5.0), (15.0, 5.0)]);
        assert_eq!(
            effects,
            vec![
                ToolEffect::PanBy(Vec2::new(10.0, 5.0)),
                ToolEffect::PanBy(Vec2::new(5.0, 0.0)),
            ]
        );
    }
}
