//! The editor facade: one object a host drives with raw input.
//!
//! `Editor` owns the history (and through it the only live scene), the tool
//! dispatcher, the viewport and the drawing style. Tool effects and direct
//! operations are folded into history here, and the host learns about the
//! results by draining [`EditorEvent`]s.

use crate::dispatcher::ToolDispatcher;
use crate::history::HistoryManager;
use crate::input::{HitTarget, Modifiers, PointerEvent};
use crate::inspector::{self, DrawInspector, InspectorPlacement};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::state::EditorState;
use crate::tools::{Effects, ToolEffect, ToolKind};
use kurbo::{Point, Vec2};
use sb_core::config::{DrawingStyle, EditorConfig};
use sb_core::{
    Element, ElementId, ElementKind, ElementPatch, Result, Scene, TransformEnd, Viewport,
};
use sb_render::{hit_handle, hit_test};

/// Notifications for the host, drained with [`Editor::drain_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// The effective selection changed.
    SelectionChanged(Option<ElementId>),
    /// An element was added or changed by a tracked commit. Autosave hook.
    ElementCommitted(ElementId),
    ElementRemoved(ElementId),
    /// The whole scene was replaced (undo, redo, load).
    SceneRestored,
    ToolChanged(ToolKind),
    /// Something the user should be told about. Never fatal.
    Notice(String),
}

pub struct Editor {
    history: HistoryManager,
    dispatcher: ToolDispatcher,
    viewport: Viewport,
    style: DrawingStyle,
    config: EditorConfig,
    /// Last reported screen position, reused when a host cannot give one.
    last_screen: Point,
    events: Vec<EditorEvent>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            history: HistoryManager::default().with_max_depth(config.history_depth),
            dispatcher: ToolDispatcher::new(),
            viewport: Viewport::new(config.zoom),
            style: config.drawing,
            config,
            last_screen: Point::ZERO,
            events: Vec::new(),
        }
    }

    // ─── Read access ─────────────────────────────────────────────────────

    pub fn state(&self) -> &EditorState {
        self.history.present()
    }

    pub fn scene(&self) -> &Scene {
        &self.history.present().scene
    }

    /// Selected element ID, `None` when the selection is empty or stale.
    pub fn selected(&self) -> Option<ElementId> {
        self.history.present().effective_selection()
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.history.present().selected_element()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn style(&self) -> &DrawingStyle {
        &self.style
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn active_tool(&self) -> ToolKind {
        self.dispatcher.active_tool()
    }

    pub fn is_drawing(&self) -> bool {
        self.dispatcher.is_drawing()
    }

    pub fn preview(&self) -> Option<&Element> {
        self.dispatcher.preview()
    }

    pub fn live_scale(&self) -> (f64, f64) {
        self.dispatcher.live_scale()
    }

    /// Elements in paint order with the gesture preview substituted for
    /// the element it stands in for (or appended when it is new).
    pub fn display_list(&self) -> Vec<&Element> {
        let preview = self.dispatcher.preview();
        let mut list: Vec<&Element> = self
            .scene()
            .iter()
            .map(|el| match preview {
                Some(p) if p.id() == el.id() => p,
                _ => el,
            })
            .collect();
        if let Some(p) = preview.filter(|p| !self.scene().contains(p.id())) {
            list.push(p);
        }
        list
    }

    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    // ─── Tools ───────────────────────────────────────────────────────────

    pub fn set_tool(&mut self, kind: ToolKind) {
        if self.dispatcher.active_tool() == kind {
            return;
        }
        self.dispatcher.set_tool(kind);
        self.events.push(EditorEvent::ToolChanged(kind));
    }

    /// Select a tool by host name. Unknown names select the select tool.
    pub fn set_tool_by_name(&mut self, name: &str) -> ToolKind {
        let kind = crate::dispatcher::parse_tool(name);
        self.set_tool(kind);
        kind
    }

    pub fn toggle_last_tool(&mut self) {
        self.set_tool(self.dispatcher.previous_tool());
    }

    // ─── Pointer input ───────────────────────────────────────────────────

    /// `screen` is `None` when the host could not resolve a position.
    pub fn pointer_down(&mut self, pointer_id: u32, screen: Option<Point>, modifiers: Modifiers) {
        let mut event = self.pointer_event(pointer_id, screen, modifiers);
        if self.dispatcher.active_tool() == ToolKind::Select && !self.dispatcher.in_gesture() {
            event.target = event.canvas.and_then(|p| self.resolve_target(p));
        }
        let effects =
            self.dispatcher
                .pointer_down(&event, self.history.present(), &self.style, &self.config);
        self.apply(effects);
    }

    pub fn pointer_move(&mut self, pointer_id: u32, screen: Option<Point>, modifiers: Modifiers) {
        let event = self.pointer_event(pointer_id, screen, modifiers);
        let effects =
            self.dispatcher
                .pointer_move(&event, self.history.present(), &self.style, &self.config);
        self.apply(effects);
    }

    pub fn pointer_up(&mut self, pointer_id: u32, screen: Option<Point>, modifiers: Modifiers) {
        let event = self.pointer_event(pointer_id, screen, modifiers);
        let effects =
            self.dispatcher
                .pointer_up(&event, self.history.present(), &self.style, &self.config);
        self.apply(effects);
    }

    fn pointer_event(
        &mut self,
        pointer_id: u32,
        screen: Option<Point>,
        modifiers: Modifiers,
    ) -> PointerEvent {
        if let Some(s) = screen {
            self.last_screen = s;
        }
        PointerEvent {
            pointer_id,
            screen: self.last_screen,
            canvas: screen.map(|s| self.viewport.to_canvas(s)),
            modifiers,
            target: None,
        }
    }

    /// Handles of the selected element win over elements beneath them.
    fn resolve_target(&self, canvas: Point) -> Option<HitTarget> {
        let state = self.history.present();
        if let Some(el) = state.selected_element().filter(|el| el.is_draggable()) {
            if let Some(handle) = hit_handle(el, canvas, self.viewport.zoom) {
                return Some(HitTarget::Handle(el.id(), handle));
            }
        }
        hit_test(&state.scene, canvas).map(HitTarget::Element)
    }

    /// Fold one batch of tool effects into history: a single tracked
    /// commit when anything structural happened, otherwise a transient
    /// update.
    fn apply(&mut self, effects: Effects) {
        if effects.is_empty() {
            return;
        }
        let mut next = self.history.present().clone();
        let mut touched = Vec::new();
        let mut tool = None;

        for effect in effects {
            match effect {
                ToolEffect::Commit(el) => {
                    touched.push(el.id());
                    next.scene = next.scene.with_added(el);
                }
                ToolEffect::Update { id, patch } => {
                    if next.scene.contains(id) {
                        next.scene = next.scene.with_updated(id, &patch);
                        touched.push(id);
                    } else {
                        log::warn!("update for removed element {id:?} dropped");
                    }
                }
                ToolEffect::Select(selected) => next.selected = selected,
                ToolEffect::StopEditing(id) => {
                    next.scene = next.scene.with_updated(id, &ElementPatch::editing(false));
                }
                ToolEffect::SetTool(kind) => tool = Some(kind),
                ToolEffect::ToolConsumed => tool = Some(ToolKind::Select),
                ToolEffect::PanBy(delta) => self.viewport.pan_by(delta),
            }
        }

        let before = self.selected();
        if touched.is_empty() {
            self.history.set_transient(|_| next);
        } else if self.history.commit(|_| next) {
            self.events
                .extend(touched.into_iter().map(EditorEvent::ElementCommitted));
        }
        self.notify_selection(before);
        if let Some(kind) = tool {
            self.set_tool(kind);
        }
    }

    // ─── Direct operations ───────────────────────────────────────────────

    /// Tracked commit with a selection notification.
    fn record(&mut self, f: impl FnOnce(&EditorState) -> EditorState) -> bool {
        let before = self.selected();
        let changed = self.history.commit(f);
        self.notify_selection(before);
        changed
    }

    fn transient(&mut self, f: impl FnOnce(&EditorState) -> EditorState) {
        let before = self.selected();
        self.history.set_transient(f);
        self.notify_selection(before);
    }

    fn notify_selection(&mut self, before: Option<ElementId>) {
        let after = self.selected();
        if after != before {
            self.events.push(EditorEvent::SelectionChanged(after));
        }
    }

    /// Patch one element as a tracked commit. Unknown IDs are logged and
    /// ignored.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        if !self.scene().contains(id) {
            log::warn!("update_element: unknown element {id:?}");
            return false;
        }
        let changed = self.record(|s| EditorState {
            scene: s.scene.with_updated(id, patch),
            selected: s.selected,
        });
        if changed {
            self.events.push(EditorEvent::ElementCommitted(id));
        }
        changed
    }

    /// Apply one inspector edit to the selected element. `Ok(false)` when
    /// nothing is selected or the value did not change anything.
    pub fn update_property(&mut self, key: &str, value: &str) -> Result<bool> {
        let Some((id, kind)) = self.selected_element().map(|el| (el.id(), el.kind())) else {
            return Ok(false);
        };
        let patch = inspector::property_patch(kind, key, value)?;
        Ok(self.update_element(id, &patch))
    }

    /// Apply several inspector edits to the selected element as one undo
    /// step. Every edit is validated before any is applied.
    pub fn update_properties<'a>(
        &mut self,
        edits: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<bool> {
        let Some((id, kind)) = self.selected_element().map(|el| (el.id(), el.kind())) else {
            return Ok(false);
        };
        let patches = edits
            .into_iter()
            .map(|(key, value)| inspector::property_patch(kind, key, value))
            .collect::<Result<Vec<_>>>()?;

        self.history.begin_batch();
        let mut changed = false;
        for patch in &patches {
            changed |= self.history.commit(|s| EditorState {
                scene: s.scene.with_updated(id, patch),
                selected: s.selected,
            });
        }
        self.history.end_batch();
        if changed {
            self.events.push(EditorEvent::ElementCommitted(id));
        }
        Ok(changed)
    }

    /// Commit the final position of a host-driven drag.
    pub fn drag_end(&mut self, id: ElementId, x: f64, y: f64) -> bool {
        self.update_element(id, &ElementPatch::position(x, y))
    }

    /// Commit the end of a host-driven handle transform. The scale factors
    /// are folded into width/height; nothing stores them.
    pub fn transform_end(&mut self, id: ElementId, end: &TransformEnd) -> bool {
        let Some(patch) = self.scene().get(id).map(|el| el.transform_patch(end)) else {
            log::warn!("transform_end: unknown element {id:?}");
            return false;
        };
        self.update_element(id, &patch)
    }

    /// Double-click at a screen point: a text-like element under it enters
    /// inline editing and becomes selected.
    pub fn double_click(&mut self, screen: Point) -> bool {
        if self.dispatcher.active_tool() != ToolKind::Select {
            return false;
        }
        let canvas = self.viewport.to_canvas(screen);
        match hit_test(self.scene(), canvas) {
            Some(id) => self.enter_edit_mode(id),
            None => false,
        }
    }

    /// Edit mode is transient: it is never recorded in history.
    pub fn enter_edit_mode(&mut self, id: ElementId) -> bool {
        let Some(el) = self.scene().get(id) else {
            return false;
        };
        if !el.kind().is_text_like() || el.locked() {
            log::debug!("edit mode refused for {id:?} ({})", el.kind());
            return false;
        }
        self.dispatcher.cancel_gesture();
        let previous = self
            .selected_element()
            .filter(|prev| prev.is_editing() && prev.id() != id)
            .map(Element::id);
        self.transient(|s| {
            let mut scene = s.scene.with_updated(id, &ElementPatch::editing(true));
            if let Some(prev) = previous {
                scene = scene.with_updated(prev, &ElementPatch::editing(false));
            }
            EditorState {
                scene,
                selected: Some(id),
            }
        });
        true
    }

    pub fn stop_editing(&mut self) -> bool {
        let Some(id) = self
            .selected_element()
            .filter(|el| el.is_editing())
            .map(Element::id)
        else {
            return false;
        };
        self.transient(|s| EditorState {
            scene: s.scene.with_updated(id, &ElementPatch::editing(false)),
            selected: s.selected,
        });
        true
    }

    /// Finish inline editing with new content.
    pub fn set_text(&mut self, id: ElementId, text: &str) -> bool {
        let unchanged = match self.scene().get(id).and_then(|el| el.text()) {
            Some(current) => current.text == text,
            None => {
                log::warn!("set_text: {id:?} is missing or has no text");
                return false;
            }
        };
        if unchanged {
            if self.selected() == Some(id) {
                self.stop_editing();
            }
            return false;
        }
        let patch = ElementPatch {
            text: Some(text.to_string()),
            is_editing: Some(false),
            ..ElementPatch::default()
        };
        self.update_element(id, &patch)
    }

    pub fn delete_selected(&mut self) -> bool {
        match self.selected() {
            Some(id) => self.delete_element(id),
            None => false,
        }
    }

    /// Remove an element. The selection is cleared when it pointed there.
    pub fn delete_element(&mut self, id: ElementId) -> bool {
        if !self.scene().contains(id) {
            return false;
        }
        self.dispatcher.cancel_gesture();
        self.record(|s| EditorState {
            scene: s.scene.with_removed(id),
            selected: s.selected.filter(|sel| *sel != id),
        });
        self.events.push(EditorEvent::ElementRemoved(id));
        true
    }

    /// Copy the selected element one nudge down-right and select the copy.
    pub fn duplicate_selected(&mut self) -> Option<ElementId> {
        let id = self.selected()?;
        let (scene, copy) =
            self.scene()
                .with_duplicated(id, ElementId::generate(), self.config.duplicate_nudge)?;
        self.record(|_| EditorState {
            scene,
            selected: Some(copy),
        });
        self.events.push(EditorEvent::ElementCommitted(copy));
        Some(copy)
    }

    /// Place an image with a host-resolved source at a canvas point.
    pub fn insert_image(&mut self, src: &str, at: Point) -> ElementId {
        let el = Element::create(ElementKind::Image, at.x, at.y, None).update(&ElementPatch {
            src: Some(src.to_string()),
            ..ElementPatch::default()
        });
        let id = el.id();
        self.record(|s| EditorState {
            scene: s.scene.with_added(el),
            selected: Some(id),
        });
        self.events.push(EditorEvent::ElementCommitted(id));
        id
    }

    /// Change the persistent drawing style. A selected stroke matching the
    /// active draw tool follows it.
    pub fn set_drawing_style(&mut self, style: DrawingStyle) {
        self.style = style;
        let Some(target) = self.draw_inspector().and_then(|d| d.target) else {
            return;
        };
        let is_pen = self
            .scene()
            .get(target)
            .is_some_and(|el| el.kind() == ElementKind::Pen);
        let patch = ElementPatch {
            stroke: Some(style.stroke),
            stroke_width: Some(style.stroke_width),
            tension: (!is_pen).then_some(style.tension),
            ..ElementPatch::default()
        };
        self.update_element(target, &patch);
    }

    pub fn deselect(&mut self) -> bool {
        if self.selected().is_none() {
            return false;
        }
        self.stop_editing();
        self.transient(|s| s.with_selection(None));
        true
    }

    // ─── Viewport ────────────────────────────────────────────────────────

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn zoom_at(&mut self, screen: Point, factor: f64) {
        self.viewport.zoom_at(screen, factor);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.viewport.set_zoom(zoom);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.viewport.pan_by(delta);
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.restore(HistoryManager::undo)
    }

    pub fn redo(&mut self) -> bool {
        self.restore(HistoryManager::redo)
    }

    fn restore(&mut self, step: fn(&mut HistoryManager) -> bool) -> bool {
        self.dispatcher.cancel_gesture();
        let before = self.selected();
        if !step(&mut self.history) {
            return false;
        }
        self.clear_edit_flags();
        self.events.push(EditorEvent::SceneRestored);
        self.notify_selection(before);
        true
    }

    /// Restored snapshots may carry an edit flag that was live when they
    /// were taken; edit mode never survives a history step.
    fn clear_edit_flags(&mut self) {
        let editing: Vec<ElementId> = self
            .scene()
            .iter()
            .filter(|el| el.is_editing())
            .map(Element::id)
            .collect();
        if editing.is_empty() {
            return;
        }
        self.history.set_transient(|s| EditorState {
            scene: editing.iter().fold(s.scene.clone(), |scene, id| {
                scene.with_updated(*id, &ElementPatch::editing(false))
            }),
            selected: s.selected,
        });
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_len(&self) -> usize {
        self.history.undo_len()
    }

    pub fn redo_len(&self) -> usize {
        self.history.redo_len()
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Run the shortcut bound to `key`, if any. Returns whether the key was
    /// consumed. Nothing fires while `typing` is set.
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers, typing: bool) -> bool {
        let Some(action) = ShortcutMap::resolve_event(key, modifiers, typing) else {
            return false;
        };
        log::debug!("shortcut {key:?} -> {action:?}");
        if let Some(tool) = action.tool() {
            self.set_tool(tool);
            return true;
        }
        match action {
            ShortcutAction::ToggleLastTool => {
                self.toggle_last_tool();
                true
            }
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Delete => self.delete_selected(),
            ShortcutAction::Duplicate => self.duplicate_selected().is_some(),
            ShortcutAction::Deselect => self.deselect(),
            ShortcutAction::ZoomIn => {
                self.zoom_in();
                true
            }
            ShortcutAction::ZoomOut => {
                self.zoom_out();
                true
            }
            _ => false,
        }
    }

    // ─── Inspectors ──────────────────────────────────────────────────────

    pub fn inspector(&self) -> Option<InspectorPlacement> {
        inspector::inspector_for(
            self.history.present(),
            self.dispatcher.active_tool(),
            &self.viewport,
            self.config.inspector_offset,
        )
    }

    pub fn draw_inspector(&self) -> Option<DrawInspector> {
        inspector::draw_inspector(
            self.history.present(),
            self.dispatcher.active_tool(),
            &self.style,
        )
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn export_json(&self) -> Result<String> {
        self.scene().to_json()
    }

    /// Replace the scene and forget history. On error nothing changes.
    pub fn load_json(&mut self, json: &str) -> Result<()> {
        let scene = Scene::from_json(json)?;
        self.replace_scene(scene);
        Ok(())
    }

    pub fn export_msgpack(&self) -> Result<Vec<u8>> {
        self.scene().to_msgpack()
    }

    pub fn load_msgpack(&mut self, bytes: &[u8]) -> Result<()> {
        let scene = Scene::from_msgpack(bytes)?;
        self.replace_scene(scene);
        Ok(())
    }

    fn replace_scene(&mut self, scene: Scene) {
        self.dispatcher.cancel_gesture();
        let before = self.selected();
        log::info!("loaded scene with {} elements", scene.len());
        self.history.reset(EditorState::new(scene));
        self.events.push(EditorEvent::SceneRestored);
        self.notify_selection(before);
    }

    /// A host-side collaborator (image fetch, save, upload) failed. The
    /// editor state is left alone; the user gets a notice.
    pub fn report_external_failure(&mut self, operation: &str, message: &str) {
        log::warn!("{operation} failed: {message}");
        self.events
            .push(EditorEvent::Notice(format!("{operation} failed: {message}")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn drag(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) {
        editor.pointer_down(1, Some(Point::new(from.0, from.1)), Modifiers::NONE);
        editor.pointer_move(1, Some(Point::new(to.0, to.1)), Modifiers::NONE);
        editor.pointer_up(1, Some(Point::new(to.0, to.1)), Modifiers::NONE);
    }

    #[test]
    fn drawn_shape_is_committed_and_selected() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::Rectangle);
        drag(&mut editor, (10.0, 10.0), (110.0, 60.0));

        assert_eq!(editor.scene().len(), 1);
        let id = editor.selected().unwrap();
        assert_eq!(editor.active_tool(), ToolKind::Select);
        assert_eq!(editor.undo_len(), 1);
        assert_eq!(
            editor.drain_events(),
            vec![
                EditorEvent::ToolChanged(ToolKind::Rectangle),
                EditorEvent::ElementCommitted(id),
                EditorEvent::SelectionChanged(Some(id)),
                EditorEvent::ToolChanged(ToolKind::Select),
            ]
        );
    }

    #[test]
    fn selection_alone_is_not_recorded() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::Circle);
        drag(&mut editor, (0.0, 0.0), (80.0, 80.0));
        editor.pointer_down(1, Some(Point::new(500.0, 500.0)), Modifiers::NONE);
        editor.pointer_up(1, Some(Point::new(500.0, 500.0)), Modifiers::NONE);
        assert_eq!(editor.selected(), None);
        assert_eq!(editor.undo_len(), 1);
    }

    #[test]
    fn moving_with_select_tool_is_one_step() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::Rectangle);
        drag(&mut editor, (0.0, 0.0), (100.0, 100.0));
        let id = editor.selected().unwrap();

        editor.pointer_down(1, Some(Point::new(50.0, 50.0)), Modifiers::NONE);
        editor.pointer_move(1, Some(Point::new(60.0, 55.0)), Modifiers::NONE);
        editor.pointer_move(1, Some(Point::new(80.0, 70.0)), Modifiers::NONE);
        assert_eq!(editor.preview().unwrap().x(), 30.0);
        editor.pointer_up(1, Some(Point::new(80.0, 70.0)), Modifiers::NONE);

        let el = editor.scene().get(id).unwrap();
        assert_eq!((el.x(), el.y()), (30.0, 20.0));
        assert_eq!(editor.undo_len(), 2);
    }

    #[test]
    fn double_click_enters_transient_edit_mode() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::Text);
        drag(&mut editor, (0.0, 0.0), (200.0, 50.0));
        let id = editor.selected().unwrap();
        let steps = editor.undo_len();

        assert!(editor.double_click(Point::new(20.0, 20.0)));
        assert!(editor.scene().get(id).unwrap().is_editing());
        assert_eq!(editor.undo_len(), steps);

        // Editing blocks dragging.
        drag(&mut editor, (20.0, 20.0), (120.0, 120.0));
        assert_eq!(editor.scene().get(id).unwrap().x(), 0.0);

        assert!(editor.set_text(id, "Hello"));
        let el = editor.scene().get(id).unwrap();
        assert_eq!(el.text().unwrap().text, "Hello");
        assert!(!el.is_editing());
    }

    #[test]
    fn undo_never_restores_edit_mode() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::RectangleText);
        drag(&mut editor, (0.0, 0.0), (150.0, 100.0));
        let id = editor.selected().unwrap();
        editor.enter_edit_mode(id);
        editor.update_property("fontSize", "30").unwrap();
        editor.undo();
        assert!(!editor.scene().get(id).unwrap().is_editing());
    }

    #[test]
    fn property_edit_validates() {
        let mut editor = Editor::default();
        assert_eq!(editor.update_property("color", "#ff0000").unwrap(), false);

        editor.set_tool(ToolKind::Star);
        drag(&mut editor, (0.0, 0.0), (90.0, 90.0));
        assert!(editor.update_property("color", "#ff0000").unwrap());
        assert!(editor.update_property("color", "not a color").is_err());
        assert!(editor.update_property("isEditing", "true").is_err());
        assert_eq!(editor.undo_len(), 2);
    }

    #[test]
    fn grouped_property_edits_undo_together() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::CircleText);
        drag(&mut editor, (0.0, 0.0), (100.0, 100.0));
        let id = editor.selected().unwrap();
        let before = editor.state().clone();

        let changed = editor
            .update_properties([("color", "#000000"), ("text", "Go"), ("fontSize", "30")])
            .unwrap();
        assert!(changed);
        let el = editor.scene().get(id).unwrap();
        assert_eq!(el.text().unwrap().text, "Go");
        assert_eq!(el.text().unwrap().font_size, 30.0);
        assert_eq!(editor.undo_len(), 2);

        editor.undo();
        assert_eq!(editor.state(), &before);

        // One bad edit rejects the whole group.
        assert!(editor.update_properties([("text", "x"), ("width", "wide")]).is_err());
        assert_eq!(editor.state(), &before);
    }

    #[test]
    fn drawing_style_follows_to_matching_stroke() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::Pencil);
        editor.pointer_down(1, Some(Point::new(0.0, 0.0)), Modifiers::NONE);
        editor.pointer_move(1, Some(Point::new(30.0, 40.0)), Modifiers::NONE);
        editor.pointer_up(1, Some(Point::new(60.0, 10.0)), Modifiers::NONE);
        let id = editor.selected().unwrap();
        assert_eq!(editor.active_tool(), ToolKind::Pencil);

        let style = DrawingStyle {
            stroke_width: 8.0,
            ..*editor.style()
        };
        editor.set_drawing_style(style);
        assert_eq!(editor.scene().get(id).unwrap().draw().unwrap().stroke_width, 8.0);
    }

    #[test]
    fn hand_tool_pans_viewport() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::Hand);
        drag(&mut editor, (100.0, 100.0), (130.0, 90.0));
        assert_eq!(editor.viewport().pan, Vec2::new(30.0, -10.0));
        assert!(editor.scene().is_empty());
    }

    #[test]
    fn failed_load_leaves_state_alone() {
        let mut editor = Editor::default();
        editor.set_tool(ToolKind::Triangle);
        drag(&mut editor, (0.0, 0.0), (50.0, 50.0));
        let before = editor.state().clone();
        assert!(editor.load_json("[{\"type\":\"hexagon\"}]").is_err());
        assert_eq!(editor.state(), &before);
        assert_eq!(editor.undo_len(), 1);
    }

    #[test]
    fn external_failures_become_notices() {
        let mut editor = Editor::default();
        editor.report_external_failure("image load", "404");
        assert_eq!(
            editor.drain_events(),
            vec![EditorEvent::Notice("image load failed: 404".into())]
        );
    }
}
