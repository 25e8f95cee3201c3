use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use super::geometry::{Geometry, Path};

pub type ElementId = i64;

pub type Tags = HashMap<String, String>;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Node,
    Way,
    Relation,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Node => "node",
            ElementType::Way => "way",
            ElementType::Relation => "relation",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "node" => Some(ElementType::Node),
            "way" => Some(ElementType::Way),
            "relation" => Some(ElementType::Relation),
            _ => None,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific part of an element.
#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Clone, PartialEq)]
pub enum ElementKind {
    Node,
    Way { node_refs: Vec<ElementId> },
    Relation { member_refs: Vec<ElementId> },
}

/// A decoded node, way or relation with its resolved geometry.
///
/// Everything but `is_skippable` is fixed once the element is in the registry.
/// `is_skippable` only ever goes from `false` to `true`, when a later relation
/// shows the element is already drawn as part of a composite.
#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub tags: Tags,
    pub is_interesting: bool,
    pub is_skippable: bool,
    pub geometry: Geometry,
    pub kind: ElementKind,
}

impl Element {
    pub fn element_type(&self) -> ElementType {
        match self.kind {
            ElementKind::Node => ElementType::Node,
            ElementKind::Way { .. } => ElementType::Way,
            ElementKind::Relation { .. } => ElementType::Relation,
        }
    }

    pub fn node_refs(&self) -> Option<&[ElementId]> {
        match &self.kind {
            ElementKind::Way { node_refs } => Some(node_refs),
            _ => None,
        }
    }

    pub fn member_refs(&self) -> Option<&[ElementId]> {
        match &self.kind {
            ElementKind::Relation { member_refs } => Some(member_refs),
            _ => None,
        }
    }
}

/// A relation member while its relation is being decoded. Not kept in the registry.
///
/// `coords` is only filled when the relation needs its full geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationMember {
    pub member_type: ElementType,
    pub id: ElementId,
    pub role: String,
    pub coords: Path,
}

impl RelationMember {
    pub fn is_way_with_coords(&self) -> bool {
        self.member_type == ElementType::Way && !self.coords.is_empty()
    }
}
