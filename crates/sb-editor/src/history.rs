//! Undo/redo over whole editor states.
//!
//! The manager owns the live [`EditorState`]. Writers go through exactly one
//! of two entry points:
//!
//! - [`HistoryManager::commit`]: tracked. The previous state is pushed onto
//!   the undo stack and the redo stack is cleared.
//! - [`HistoryManager::set_transient`]: untracked. Replaces the present
//!   state in place (selection changes, edit mode).
//!
//! States are cheap to keep around: scenes share unchanged elements through
//! `Arc`, so a snapshot costs one pointer per element.
//!
//! Multi-step operations can be grouped with `begin_batch`/`end_batch`; the
//! whole batch then undoes as one step.

use crate::state::EditorState;

pub struct HistoryManager {
    present: EditorState,
    past: Vec<EditorState>,
    future: Vec<EditorState>,
    /// Retained undo steps; `None` keeps everything.
    max_depth: Option<usize>,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// State captured when the outermost batch opened.
    batch_base: Option<EditorState>,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(EditorState::default())
    }
}

impl HistoryManager {
    pub fn new(initial: EditorState) -> Self {
        Self {
            present: initial,
            past: Vec::new(),
            future: Vec::new(),
            max_depth: None,
            batch_depth: 0,
            batch_base: None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self.trim();
        self
    }

    pub fn present(&self) -> &EditorState {
        &self.present
    }

    /// Tracked mutation. Returns `false` when `f` produced an identical
    /// state, in which case nothing is recorded.
    pub fn commit(&mut self, f: impl FnOnce(&EditorState) -> EditorState) -> bool {
        let next = f(&self.present);
        if next.same_as(&self.present) {
            return false;
        }
        let previous = std::mem::replace(&mut self.present, next);
        if self.batch_depth > 0 {
            // Recorded as a whole by end_batch.
            return true;
        }
        self.push_past(previous);
        self.future.clear();
        log::debug!("history: commit ({} undo steps)", self.past.len());
        true
    }

    /// Untracked mutation: replaces the present state without touching
    /// either stack.
    pub fn set_transient(&mut self, f: impl FnOnce(&EditorState) -> EditorState) {
        self.present = f(&self.present);
    }

    /// Restore the most recent past state. No-op on an empty stack.
    pub fn undo(&mut self) -> bool {
        if self.batch_depth > 0 {
            log::warn!("history: undo ignored inside a batch");
            return false;
        }
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push(current);
        log::debug!("history: undo ({} left)", self.past.len());
        true
    }

    /// Mirror of [`undo`](Self::undo).
    pub fn redo(&mut self) -> bool {
        if self.batch_depth > 0 {
            log::warn!("history: redo ignored inside a batch");
            return false;
        }
        let Some(next) = self.future.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.push_past(current);
        log::debug!("history: redo ({} left)", self.future.len());
        true
    }

    /// Start a batch. Commits until the matching `end_batch` are applied
    /// live but recorded as one undo step.
    pub fn begin_batch(&mut self) {
        if self.batch_depth == 0 {
            self.batch_base = Some(self.present.clone());
        }
        self.batch_depth += 1;
    }

    /// Close a batch. When the outermost batch closes and the state
    /// changed, one undo step is pushed.
    pub fn end_batch(&mut self) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return;
        }
        if let Some(base) = self.batch_base.take() {
            if !base.same_as(&self.present) {
                self.push_past(base);
                self.future.clear();
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.past.len()
    }

    pub fn redo_len(&self) -> usize {
        self.future.len()
    }

    /// Replace everything with `state` and forget all history.
    pub fn reset(&mut self, state: EditorState) {
        self.present = state;
        self.past.clear();
        self.future.clear();
        self.batch_depth = 0;
        self.batch_base = None;
    }

    fn push_past(&mut self, state: EditorState) {
        self.past.push(state);
        self.trim();
    }

    fn trim(&mut self) {
        if let Some(max) = self.max_depth {
            if self.past.len() > max {
                let excess = self.past.len() - max;
                self.past.drain(..excess);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::{Element, ElementKind};

    fn add_rect(h: &mut HistoryManager, x: f64) {
        let el = Element::create(ElementKind::Rectangle, x, 0.0, None);
        h.commit(|s| EditorState {
            scene: s.scene.with_added(el),
            selected: s.selected,
        });
    }

    #[test]
    fn identical_commit_is_not_recorded() {
        let mut h = HistoryManager::default();
        assert!(!h.commit(|s| s.clone()));
        assert!(!h.can_undo());
    }

    #[test]
    fn transient_changes_skip_the_stacks() {
        let mut h = HistoryManager::default();
        add_rect(&mut h, 0.0);
        let id = h.present().scene.iter().next().map(|e| e.id());
        h.set_transient(|s| s.with_selection(id));
        assert_eq!(h.undo_len(), 1);
        assert_eq!(h.present().selected, id);
    }

    #[test]
    fn undo_redo_are_mirrors() {
        let mut h = HistoryManager::default();
        add_rect(&mut h, 0.0);
        let after = h.present().clone();
        assert!(h.undo());
        assert!(h.present().scene.is_empty());
        assert!(h.redo());
        assert_eq!(h.present(), &after);
        assert!(!h.redo());
    }

    #[test]
    fn bounded_depth_drops_oldest() {
        let mut h = HistoryManager::default().with_max_depth(Some(2));
        for i in 0..4 {
            add_rect(&mut h, i as f64);
        }
        assert_eq!(h.undo_len(), 2);
        while h.undo() {}
        assert_eq!(h.present().scene.len(), 2);
    }

    #[test]
    fn nested_batch_is_one_step() {
        let mut h = HistoryManager::default();
        h.begin_batch();
        add_rect(&mut h, 0.0);
        h.begin_batch();
        add_rect(&mut h, 10.0);
        h.end_batch();
        assert_eq!(h.undo_len(), 0);
        h.end_batch();
        assert_eq!(h.undo_len(), 1);
        assert_eq!(h.present().scene.len(), 2);
        h.undo();
        assert!(h.present().scene.is_empty());
    }

    #[test]
    fn empty_batch_records_nothing() {
        let mut h = HistoryManager::default();
        h.begin_batch();
        h.end_batch();
        h.end_batch();
        assert!(!h.can_undo());
    }
}
