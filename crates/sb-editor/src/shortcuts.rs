//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. Hosts pass
//! `KeyboardEvent.key` values straight through; the map decides.
//!
//! - Ctrl/⌘+Z undo, Ctrl/⌘+Shift+Z or Ctrl/⌘+Y redo
//! - Delete/Backspace remove the selection
//! - single letters switch tools, Shift+P for the pencil
//! - Tab toggles between the two most recent tools

use crate::input::Modifiers;
use crate::tools::ToolKind;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    ToolSelect,
    ToolHand,
    ToolRect,
    ToolCircle,
    ToolText,
    ToolPen,
    ToolPencil,
    ToggleLastTool,

    // ── Edit ──
    Undo,
    Redo,
    Delete,
    Duplicate,
    Deselect,

    // ── View ──
    ZoomIn,
    ZoomOut,
}

impl ShortcutAction {
    /// The tool a tool-switching action selects.
    pub fn tool(self) -> Option<ToolKind> {
        match self {
            ShortcutAction::ToolSelect => Some(ToolKind::Select),
            ShortcutAction::ToolHand => Some(ToolKind::Hand),
            ShortcutAction::ToolRect => Some(ToolKind::Rectangle),
            ShortcutAction::ToolCircle => Some(ToolKind::Circle),
            ShortcutAction::ToolText => Some(ToolKind::Text),
            ShortcutAction::ToolPen => Some(ToolKind::Pen),
            ShortcutAction::ToolPencil => Some(ToolKind::Pencil),
            _ => None,
        }
    }
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, mods: Modifiers) -> Option<ShortcutAction> {
        let cmd = mods.cmd();

        // ── Modifier combos first (most specific) ──
        if cmd && mods.shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                _ => None,
            };
        }

        if mods.alt {
            return None;
        }

        if mods.shift {
            return match key {
                "p" | "P" => Some(ShortcutAction::ToolPencil),
                _ => None,
            };
        }

        // ── Single keys (no modifiers) ──
        match key {
            "v" | "V" => Some(ShortcutAction::ToolSelect),
            "h" | "H" => Some(ShortcutAction::ToolHand),
            "r" | "R" => Some(ShortcutAction::ToolRect),
            "o" | "O" => Some(ShortcutAction::ToolCircle),
            "t" | "T" => Some(ShortcutAction::ToolText),
            "p" | "P" => Some(ShortcutAction::ToolPen),
            "Tab" => Some(ShortcutAction::ToggleLastTool),
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }

    /// Like [`resolve`](Self::resolve), but nothing fires while focus is in
    /// a text input (`typing`), so normal text editing keeps its keys.
    pub fn resolve_event(key: &str, mods: Modifiers, typing: bool) -> Option<ShortcutAction> {
        if typing {
            return None;
        }
        Self::resolve(key, mods)
    }
}
