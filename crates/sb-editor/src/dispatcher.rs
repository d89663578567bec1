//! Routes pointer events to the active tool strategy.
//!
//! The dispatcher owns the active strategy and the per-gesture context
//! values (`is_drawing`, `preview`) between events. One gesture follows one
//! pointer: a second pointer pressing mid-gesture is ignored, and so are
//! moves and releases from any pointer but the one that started it.

use crate::input::PointerEvent;
use crate::state::EditorState;
use crate::tools::{
    Effects, FreehandTool, HandTool, InteractionContext, SelectTool, ShapeTool, ToolKind,
    ToolStrategy,
};
use sb_core::config::{DrawingStyle, EditorConfig};
use sb_core::{Element, ElementKind};

/// Build the strategy for `kind`. Creation tools without a dedicated
/// strategy share the generic box-drawing one.
pub fn strategy_for(kind: ToolKind) -> Box<dyn ToolStrategy> {
    match kind {
        ToolKind::Select => Box::new(SelectTool::new()),
        ToolKind::Hand => Box::new(HandTool::new()),
        ToolKind::Pencil => Box::new(FreehandTool::new(kind, ElementKind::Pencil)),
        ToolKind::Pen => Box::new(FreehandTool::new(kind, ElementKind::Pen)),
        other => match other.element_kind() {
            Some(element_kind) => Box::new(ShapeTool::new(other, element_kind)),
            None => Box::new(SelectTool::new()),
        },
    }
}

/// Parse a host-supplied tool name. Unknown names fall back to select.
pub fn parse_tool(name: &str) -> ToolKind {
    ToolKind::from_name(name).unwrap_or_else(|| {
        log::warn!("unknown tool {name:?}, falling back to select");
        ToolKind::Select
    })
}

pub struct ToolDispatcher {
    strategy: Box<dyn ToolStrategy>,
    previous: ToolKind,
    /// Pointer that owns the gesture in progress.
    gesture_pointer: Option<u32>,
    is_drawing: bool,
    preview: Option<Element>,
}

impl Default for ToolDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolDispatcher {
    pub fn new() -> Self {
        Self {
            strategy: strategy_for(ToolKind::Select),
            previous: ToolKind::Select,
            gesture_pointer: None,
            is_drawing: false,
            preview: None,
        }
    }

    pub fn active_tool(&self) -> ToolKind {
        self.strategy.kind()
    }

    pub fn previous_tool(&self) -> ToolKind {
        self.previous
    }

    /// Switch tools. Any gesture in progress is abandoned.
    pub fn set_tool(&mut self, kind: ToolKind) {
        let current = self.active_tool();
        if current == kind {
            return;
        }
        self.cancel_gesture();
        self.previous = current;
        self.strategy = strategy_for(kind);
        log::debug!("tool: {current} -> {kind}");
    }

    pub fn cancel_gesture(&mut self) {
        self.strategy.cancel();
        self.gesture_pointer = None;
        self.is_drawing = false;
        self.preview = None;
    }

    pub fn in_gesture(&self) -> bool {
        self.gesture_pointer.is_some()
    }

    pub fn is_drawing(&self) -> bool {
        self.is_drawing
    }

    pub fn preview(&self) -> Option<&Element> {
        self.preview.as_ref()
    }

    pub fn live_scale(&self) -> (f64, f64) {
        self.strategy.live_scale()
    }

    pub fn pointer_down(
        &mut self,
        event: &PointerEvent,
        state: &EditorState,
        style: &DrawingStyle,
        config: &EditorConfig,
    ) -> Effects {
        if let Some(owner) = self.gesture_pointer {
            log::debug!(
                "pointer {} pressed during gesture of pointer {owner}, ignored",
                event.pointer_id
            );
            return Effects::new();
        }
        let effects = self.run(event, state, style, config, |s, e, c| s.on_pointer_down(e, c));
        if self.strategy.is_active() {
            self.gesture_pointer = Some(event.pointer_id);
        }
        effects
    }

    pub fn pointer_move(
        &mut self,
        event: &PointerEvent,
        state: &EditorState,
        style: &DrawingStyle,
        config: &EditorConfig,
    ) -> Effects {
        if self.gesture_pointer != Some(event.pointer_id) {
            return Effects::new();
        }
        self.run(event, state, style, config, |s, e, c| s.on_pointer_move(e, c))
    }

    pub fn pointer_up(
        &mut self,
        event: &PointerEvent,
        state: &EditorState,
        style: &DrawingStyle,
        config: &EditorConfig,
    ) -> Effects {
        if self.gesture_pointer != Some(event.pointer_id) {
            return Effects::new();
        }
        let effects = self.run(event, state, style, config, |s, e, c| s.on_pointer_up(e, c));
        self.gesture_pointer = None;
        effects
    }

    /// Hand the stored context values to one strategy stage and take them
    /// back afterwards.
    fn run(
        &mut self,
        event: &PointerEvent,
        state: &EditorState,
        style: &DrawingStyle,
        config: &EditorConfig,
        stage: impl FnOnce(&mut dyn ToolStrategy, &PointerEvent, &mut InteractionContext),
    ) -> Effects {
        let mut ctx = InteractionContext::new(state, style, config);
        ctx.is_drawing = self.is_drawing;
        ctx.preview = self.preview.take();
        stage(self.strategy.as_mut(), event, &mut ctx);
        self.is_drawing = ctx.is_drawing;
        self.preview = ctx.preview.take();
        ctx.take_effects()
    }
}
