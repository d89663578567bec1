pub mod dispatcher;
pub mod editor;
pub mod history;
pub mod input;
pub mod inspector;
pub mod shortcuts;
pub mod state;
pub mod tools;

pub use dispatcher::{ToolDispatcher, strategy_for};
pub use editor::{Editor, EditorEvent};
pub use history::HistoryManager;
pub use input::{HitTarget, Modifiers, PointerEvent};
pub use inspector::{DrawInspector, InspectorKind, InspectorPlacement};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use state::EditorState;
pub use tools::{InteractionContext, ToolEffect, ToolKind, ToolStrategy};
