//! The tracked editor state: the scene plus the selected element.

use sb_core::{Element, ElementId, Scene};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState {
    pub scene: Scene,
    /// Lookup key into `scene`; may be stale.
    pub selected: Option<ElementId>,
}

impl EditorState {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            selected: None,
        }
    }

    /// The selected element, or `None` when nothing (or a removed element)
    /// is selected.
    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.and_then(|id| self.scene.get(id))
    }

    /// Selection with stale ids resolved to `None`.
    pub fn effective_selection(&self) -> Option<ElementId> {
        self.selected_element().map(|e| e.id())
    }

    pub fn with_selection(&self, selected: Option<ElementId>) -> EditorState {
        EditorState {
            scene: self.scene.clone(),
            selected,
        }
    }

    /// Cheap equality: pointer-identical scenes short-circuit the deep compare.
    pub fn same_as(&self, other: &EditorState) -> bool {
        self.selected == other.selected
            && (self.scene.shares_all_with(&other.scene) || self.scene == other.scene)
    }
}
