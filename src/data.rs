use std::collections::HashMap;

use self::element::{Element, ElementId};

pub mod element;
pub mod geometry;
pub mod overpass;

/// Decoded elements of one run, keyed by id. Filled pass by pass: nodes, then
/// ways, then relations. A later record with the same id replaces the earlier one.
#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Default, Clone, PartialEq)]
pub struct Registry {
    elements: HashMap<ElementId, Element>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn insert(&mut self, element: Element) -> Option<Element> {
        self.elements.insert(element.id, element)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Flags an element as already drawn inside a composite. Never cleared once
    /// set. Returns false when no element has this id.
    pub fn mark_skippable(&mut self, id: ElementId) -> bool {
        match self.elements.get_mut(&id) {
            Some(element) => {
                element.is_skippable = true;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Elements a renderer should draw on their own.
    pub fn renderable(&self) -> impl Iterator<Item = &Element> {
        self.elements.values().filter(|element| !element.is_skippable)
    }
}
