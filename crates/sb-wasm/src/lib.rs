//! WASM bridge for Storyboard: exposes the Rust editor core to JavaScript.
//!
//! Compiled via `wasm-pack build --target web` and driven by the page's
//! canvas component. Fallible calls return JSON: `{"ok":true,...}` or
//! `{"ok":false,"error":"..."}`.

mod render2d;

use sb_core::kurbo::{Point, Vec2};
use sb_core::{DrawingStyle, EditorConfig, ElementId, TransformEnd};
use sb_editor::{Editor, EditorEvent, InspectorKind, Modifiers, ToolKind};
use serde_json::json;
use std::collections::HashMap;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

/// The main WASM-facing canvas controller.
///
/// Holds the editor and the host-loaded images. All interaction from the
/// page goes through this struct.
#[wasm_bindgen]
pub struct SbCanvas {
    editor: Editor,
    /// Decoded images by source URL, registered by the host once loaded.
    images: HashMap<String, HtmlImageElement>,
    width: f64,
    height: f64,
    dark_mode: bool,
}

#[wasm_bindgen]
impl SbCanvas {
    /// Create a canvas controller with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_editor(width, height, Editor::default())
    }

    /// Create a canvas controller from a JSON `EditorConfig`. Missing
    /// fields take their defaults.
    pub fn with_config(width: f64, height: f64, config_json: &str) -> Result<SbCanvas, JsValue> {
        let config =
            EditorConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::with_editor(width, height, Editor::new(config)))
    }

    fn with_editor(width: f64, height: f64, editor: Editor) -> Self {
        console_error_panic_hook_setup();
        init_console_logger();
        Self {
            editor,
            images: HashMap::new(),
            width,
            height,
            dark_mode: false,
        }
    }

    /// Render the scene to a Canvas2D context.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        let theme = if self.dark_mode {
            render2d::CanvasTheme::dark()
        } else {
            render2d::CanvasTheme::light()
        };
        let elements = self.editor.display_list();
        // While a gesture transforms the selection, outline the preview.
        let selected = self.editor.selected().and_then(|id| {
            elements.iter().copied().find(|el| el.id() == id)
        });
        let frame = render2d::Frame {
            elements: &elements,
            viewport: self.editor.viewport(),
            selected,
            show_handles: self.editor.active_tool() == ToolKind::Select
                && selected.is_some_and(|el| el.is_draggable()),
            images: &self.images,
            width: self.width,
            height: self.height,
        };
        render2d::render_scene(ctx, &frame, &theme);
    }

    pub fn set_theme(&mut self, is_dark: bool) {
        self.dark_mode = is_dark;
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    // ─── Pointer input ───────────────────────────────────────────────────

    /// Handle pointer down. `has_position` is false when the host could
    /// not resolve a position for the event.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_down(
        &mut self,
        pointer_id: u32,
        x: f64,
        y: f64,
        has_position: bool,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) {
        let mods = modifiers(shift, ctrl, alt, meta);
        self.editor
            .pointer_down(pointer_id, position(x, y, has_position), mods);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_move(
        &mut self,
        pointer_id: u32,
        x: f64,
        y: f64,
        has_position: bool,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) {
        let mods = modifiers(shift, ctrl, alt, meta);
        self.editor
            .pointer_move(pointer_id, position(x, y, has_position), mods);
    }

    /// Handle pointer up. Returns JSON:
    /// `{"tool":"<tool_name>","selected":"<id or empty>"}`.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_up(
        &mut self,
        pointer_id: u32,
        x: f64,
        y: f64,
        has_position: bool,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let mods = modifiers(shift, ctrl, alt, meta);
        self.editor
            .pointer_up(pointer_id, position(x, y, has_position), mods);
        json!({
            "tool": self.editor.active_tool().as_str(),
            "selected": self.get_selected_id(),
        })
        .to_string()
    }

    /// Double-click at a screen point. Returns true if a text-like element
    /// entered inline editing.
    pub fn handle_double_click(&mut self, x: f64, y: f64) -> bool {
        self.editor.double_click(Point::new(x, y))
    }

    /// Current cursor for a screen point: handle cursors over the
    /// selection's handles, `grab` for the hand tool, `default` otherwise.
    pub fn cursor_at(&self, x: f64, y: f64) -> String {
        let tool = self.editor.active_tool();
        if tool == ToolKind::Hand {
            return "grab".to_string();
        }
        if tool != ToolKind::Select {
            return "crosshair".to_string();
        }
        let canvas = self.editor.viewport().to_canvas(Point::new(x, y));
        self.editor
            .selected_element()
            .filter(|el| el.is_draggable())
            .and_then(|el| sb_render::hit_handle(el, canvas, self.editor.viewport().zoom))
            .map(|h| h.cursor())
            .unwrap_or("default")
            .to_string()
    }

    // ─── Tools ───────────────────────────────────────────────────────────

    /// Switch the active tool by name. Unknown names select the select
    /// tool. Returns the name of the tool now active.
    pub fn set_tool(&mut self, name: &str) -> String {
        self.editor.set_tool_by_name(name).as_str().to_string()
    }

    pub fn get_tool_name(&self) -> String {
        self.editor.active_tool().as_str().to_string()
    }

    pub fn toggle_last_tool(&mut self) -> String {
        self.editor.toggle_last_tool();
        self.get_tool_name()
    }

    // ─── Selection & editing ─────────────────────────────────────────────

    /// Selected element ID, or empty string if none.
    pub fn get_selected_id(&self) -> String {
        self.editor
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// The selected element as a flat record, or `null`.
    pub fn get_selected_element(&self) -> String {
        self.editor
            .selected_element()
            .and_then(|el| serde_json::to_string(el).ok())
            .unwrap_or_else(|| "null".to_string())
    }

    pub fn delete_selected(&mut self) -> bool {
        self.editor.delete_selected()
    }

    pub fn delete_element(&mut self, id: &str) -> bool {
        self.editor.delete_element(ElementId::intern(id))
    }

    /// Duplicate the selection. Returns the copy's ID or empty string.
    pub fn duplicate_selected(&mut self) -> String {
        self.editor
            .duplicate_selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn deselect(&mut self) -> bool {
        self.editor.deselect()
    }

    pub fn stop_editing(&mut self) -> bool {
        self.editor.stop_editing()
    }

    /// Commit inline-edited text.
    pub fn set_text(&mut self, id: &str, text: &str) -> bool {
        self.editor.set_text(ElementId::intern(id), text)
    }

    /// Commit the final position of a host-side drag.
    pub fn drag_end(&mut self, id: &str, x: f64, y: f64) -> bool {
        self.editor.drag_end(ElementId::intern(id), x, y)
    }

    /// Commit a host-side transform. `json` is a `TransformEnd`:
    /// `{"x","y","rotation","scaleX","scaleY"}`.
    pub fn transform_end(&mut self, id: &str, json: &str) -> String {
        match serde_json::from_str::<TransformEnd>(json) {
            Ok(end) => {
                let changed = self.editor.transform_end(ElementId::intern(id), &end);
                json!({ "ok": true, "changed": changed }).to_string()
            }
            Err(e) => error_json(e),
        }
    }

    /// Apply one inspector edit to the selected element.
    pub fn set_property(&mut self, key: &str, value: &str) -> String {
        match self.editor.update_property(key, value) {
            Ok(changed) => json!({ "ok": true, "changed": changed }).to_string(),
            Err(e) => error_json(e),
        }
    }

    /// Apply a JSON object of inspector edits as one undo step:
    /// `{"color":"#ff0000","fontSize":24}`.
    pub fn set_properties(&mut self, json: &str) -> String {
        let edits = match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(json) {
            Ok(map) => map,
            Err(e) => return error_json(e),
        };
        let raw: Vec<(String, String)> = edits
            .into_iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(s) => (key, s),
                other => (key, other.to_string()),
            })
            .collect();
        let pairs = raw.iter().map(|(k, v)| (k.as_str(), v.as_str()));
        match self.editor.update_properties(pairs) {
            Ok(changed) => json!({ "ok": true, "changed": changed }).to_string(),
            Err(e) => error_json(e),
        }
    }

    /// Replace the drawing style with a JSON `DrawingStyle`.
    pub fn set_drawing_style(&mut self, json: &str) -> String {
        match serde_json::from_str::<DrawingStyle>(json) {
            Ok(style) => {
                self.editor.set_drawing_style(style);
                json!({ "ok": true }).to_string()
            }
            Err(e) => error_json(e),
        }
    }

    /// Place a registered (or to-be-registered) image at a screen point.
    pub fn insert_image(&mut self, src: &str, x: f64, y: f64) -> String {
        let at = self.editor.viewport().to_canvas(Point::new(x, y));
        self.editor.insert_image(src, at).as_str().to_string()
    }

    /// Hand a decoded image to the renderer.
    pub fn register_image(&mut self, src: &str, image: HtmlImageElement) {
        self.images.insert(src.to_string(), image);
    }

    // ─── Inspectors ──────────────────────────────────────────────────────

    /// Floating inspector for the selection, or `null`:
    /// `{"kind":"shape","variant":"star","id":"...","left":..,"top":..}`.
    pub fn get_inspector(&self) -> String {
        let Some(p) = self.editor.inspector() else {
            return "null".to_string();
        };
        let (kind, variant) = match p.kind {
            InspectorKind::Text => ("text", None),
            InspectorKind::Image => ("image", None),
            InspectorKind::Draw => ("draw", None),
            InspectorKind::Shape(k) => ("shape", Some(k.as_str())),
        };
        json!({
            "kind": kind,
            "variant": variant,
            "id": p.element.as_str(),
            "left": p.left,
            "top": p.top,
        })
        .to_string()
    }

    /// Persistent draw toolbar while pencil or pen is active, or `null`.
    /// `radius` is the tension proxy shown on the corner-radius slider.
    pub fn get_draw_inspector(&self) -> String {
        let Some(d) = self.editor.draw_inspector() else {
            return "null".to_string();
        };
        json!({
            "target": d.target.map(|id| id.as_str()),
            "stroke": d.values.stroke.to_hex(),
            "strokeWidth": d.values.stroke_width,
            "tension": d.values.tension,
            "radius": sb_editor::inspector::tension_to_radius(d.values.tension),
        })
        .to_string()
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    /// `{"canUndo":bool,"canRedo":bool,"undo":n,"redo":n}`
    pub fn get_history(&self) -> String {
        json!({
            "canUndo": self.editor.can_undo(),
            "canRedo": self.editor.can_redo(),
            "undo": self.editor.undo_len(),
            "redo": self.editor.redo_len(),
        })
        .to_string()
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keyboard event. `typing` is true while focus is in a text
    /// input. Returns `{"changed":bool,"tool":"<tool_name>"}`.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        typing: bool,
    ) -> String {
        let changed = self
            .editor
            .handle_key(key, modifiers(shift, ctrl, alt, meta), typing);
        json!({ "changed": changed, "tool": self.editor.active_tool().as_str() }).to_string()
    }

    // ─── Viewport ────────────────────────────────────────────────────────

    pub fn zoom_in(&mut self) -> f64 {
        self.editor.zoom_in();
        self.editor.viewport().zoom
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.editor.zoom_out();
        self.editor.viewport().zoom
    }

    /// Wheel zoom around a screen point.
    pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) -> f64 {
        self.editor.zoom_at(Point::new(x, y), factor);
        self.editor.viewport().zoom
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.editor.pan_by(Vec2::new(dx, dy));
    }

    /// `{"x":..,"y":..,"zoom":..}`
    pub fn get_viewport(&self) -> String {
        let vp = self.editor.viewport();
        json!({ "x": vp.pan.x, "y": vp.pan.y, "zoom": vp.zoom }).to_string()
    }

    // ─── Persistence & events ────────────────────────────────────────────

    /// Replace the scene with a saved element array. History is cleared.
    pub fn load_json(&mut self, json: &str) -> String {
        match self.editor.load_json(json) {
            Ok(()) => json!({ "ok": true, "count": self.editor.scene().len() }).to_string(),
            Err(e) => error_json(e),
        }
    }

    pub fn export_json(&self) -> String {
        match self.editor.export_json() {
            Ok(elements) => format!(r#"{{"ok":true,"elements":{elements}}}"#),
            Err(e) => error_json(e),
        }
    }

    /// The host failed to fetch, save or upload something.
    pub fn report_external_failure(&mut self, operation: &str, message: &str) {
        self.editor.report_external_failure(operation, message);
    }

    /// Pending editor notifications as a JSON array, oldest first.
    pub fn drain_events(&mut self) -> String {
        let events: Vec<serde_json::Value> = self
            .editor
            .drain_events()
            .into_iter()
            .map(event_json)
            .collect();
        serde_json::Value::Array(events).to_string()
    }
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

fn position(x: f64, y: f64, has_position: bool) -> Option<Point> {
    has_position.then(|| Point::new(x, y))
}

fn error_json(e: impl std::fmt::Display) -> String {
    json!({ "ok": false, "error": e.to_string() }).to_string()
}

fn event_json(event: EditorEvent) -> serde_json::Value {
    match event {
        EditorEvent::SelectionChanged(id) => {
            json!({ "type": "selectionChanged", "id": id.map(|id| id.as_str()) })
        }
        EditorEvent::ElementCommitted(id) => {
            json!({ "type": "elementCommitted", "id": id.as_str() })
        }
        EditorEvent::ElementRemoved(id) => json!({ "type": "elementRemoved", "id": id.as_str() }),
        EditorEvent::SceneRestored => json!({ "type": "sceneRestored" }),
        EditorEvent::ToolChanged(tool) => json!({ "type": "toolChanged", "tool": tool.as_str() }),
        EditorEvent::Notice(message) => json!({ "type": "notice", "message": message }),
    }
}

// ─── Console logging ─────────────────────────────────────────────────────

/// Forwards `log` records to the browser console.
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        #[cfg(target_arch = "wasm32")]
        {
            let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
            match record.level() {
                log::Level::Error => web_sys::console::error_1(&msg),
                log::Level::Warn => web_sys::console::warn_1(&msg),
                log::Level::Info => web_sys::console::info_1(&msg),
                log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&msg),
            }
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn init_console_logger() {
    // Already set when a second canvas is created.
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }
}

/// Change console verbosity: `"error"`, `"warn"`, `"info"`, `"debug"` or
/// `"trace"`. Unknown names leave the level alone.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> bool {
    match level.parse::<log::LevelFilter>() {
        Ok(filter) => {
            log::set_max_level(filter);
            true
        }
        Err(_) => false,
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Storyboard WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no canvas needed) ─────────────────────────────

/// Validate a saved element array. Returns JSON: `{"ok":true,"count":n}`
/// or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate(json: &str) -> String {
    match sb_core::Scene::from_json(json) {
        Ok(scene) => json!({ "ok": true, "count": scene.len() }).to_string(),
        Err(e) => error_json(e),
    }
}

/// Names of every tool, in toolbar order, as a JSON array.
#[wasm_bindgen]
pub fn tool_names() -> String {
    let names: Vec<&str> = ToolKind::ALL.iter().map(|t| t.as_str()).collect();
    serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn errors_are_escaped_json() {
        let out = error_json("bad \"quote\"");
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["ok"], false);
        assert_eq!(v["error"], "bad \"quote\"");
    }

    #[test]
    fn validate_reports_count_or_error() {
        assert_eq!(validate("[]"), r#"{"count":0,"ok":true}"#);
        let bad: serde_json::Value = serde_json::from_str(&validate("{")).unwrap();
        assert_eq!(bad["ok"], false);
    }

    #[test]
    fn events_serialize_with_type_tags() {
        let v = event_json(EditorEvent::ToolChanged(ToolKind::ChatBubble));
        assert_eq!(v, json!({ "type": "toolChanged", "tool": "chat-bubble" }));
        let v = event_json(EditorEvent::SelectionChanged(None));
        assert_eq!(v["id"], serde_json::Value::Null);
    }

    #[test]
    fn missing_position_maps_to_none() {
        assert_eq!(position(3.0, 4.0, false), None);
        assert_eq!(position(3.0, 4.0, true), Some(Point::new(3.0, 4.0)));
    }
}
