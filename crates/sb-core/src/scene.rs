//! The ordered element collection.
//!
//! A `Scene` is a value: every edit returns a new scene. Elements sit
//! behind `Arc`, so a new scene shares every element it did not touch with
//! the scene it was derived from. That makes history snapshots a vector of
//! pointer copies rather than a deep clone.
//!
//! Paint order is collection order; the last element is topmost.

use crate::error::{ModelError, Result};
use crate::id::ElementId;
use crate::model::{Element, ElementPatch};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Scene {
    elements: Vec<Arc<Element>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> Self {
        Self {
            elements: elements.into_iter().map(Arc::new).collect(),
        }
    }

    /// Build a scene from loaded elements. IDs must be unique.
    pub fn try_from_elements(elements: impl IntoIterator<Item = Element>) -> Result<Self> {
        let scene = Self::from_elements(elements);
        let mut seen = HashSet::with_capacity(scene.len());
        if let Some(dup) = scene.iter().find(|el| !seen.insert(el.id())) {
            return Err(ModelError::InvalidRecord {
                id: dup.id().to_string(),
                reason: "duplicate id".to_string(),
            });
        }
        Ok(scene)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in paint order (bottom first).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.elements.iter().map(|e| e.as_ref())
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.iter().find(|e| e.id() == id)
    }

    /// Shared handle to an element, for callers that keep snapshots.
    pub fn get_shared(&self, id: ElementId) -> Option<Arc<Element>> {
        self.elements.iter().find(|e| e.id() == id).cloned()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    /// Append on top. An element whose ID already exists replaces it in place.
    pub fn with_added(&self, element: Element) -> Scene {
        let mut elements = self.elements.clone();
        match self.index_of(element.id()) {
            Some(i) => elements[i] = Arc::new(element),
            None => elements.push(Arc::new(element)),
        }
        Scene { elements }
    }

    /// Apply `patch` to one element. Unknown IDs leave the scene unchanged.
    pub fn with_updated(&self, id: ElementId, patch: &ElementPatch) -> Scene {
        match self.index_of(id) {
            Some(i) => self.with_replaced_at(i, self.elements[i].update(patch)),
            None => {
                log::warn!("update for unknown element {id:?} ignored");
                self.clone()
            }
        }
    }

    /// Swap in a whole element value (matched by ID).
    pub fn with_replaced(&self, element: Element) -> Scene {
        match self.index_of(element.id()) {
            Some(i) => self.with_replaced_at(i, element),
            None => self.clone(),
        }
    }

    fn with_replaced_at(&self, i: usize, element: Element) -> Scene {
        let mut elements = self.elements.clone();
        elements[i] = Arc::new(element);
        Scene { elements }
    }

    pub fn with_removed(&self, id: ElementId) -> Scene {
        Scene {
            elements: self
                .elements
                .iter()
                .filter(|e| e.id() != id)
                .cloned()
                .collect(),
        }
    }

    /// Insert a nudged deep copy of `id` directly above it. Returns the new
    /// scene and the copy's ID, or `None` if `id` is unknown.
    pub fn with_duplicated(
        &self,
        id: ElementId,
        new_id: ElementId,
        nudge: f64,
    ) -> Option<(Scene, ElementId)> {
        let i = self.index_of(id)?;
        let copy = self.elements[i].duplicate(new_id, nudge);
        let mut elements = self.elements.clone();
        elements.insert(i + 1, Arc::new(copy));
        Some((Scene { elements }, new_id))
    }

    /// Whether two scenes hold the very same element allocations.
    pub fn shares_all_with(&self, other: &Scene) -> bool {
        self.elements.len() == other.elements.len()
            && self
                .elements
                .iter()
                .zip(&other.elements)
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }

    // ─── Serialized forms ────────────────────────────────────────────────

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Scene> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compact binary form for autosave.
    pub fn to_msgpack(&self) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Scene> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

impl<'de> Deserialize<'de> for Scene {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let elements = Vec::<Element>::deserialize(deserializer)?;
        Scene::try_from_elements(elements).map_err(serde::de::Error::custom)
    }
}
