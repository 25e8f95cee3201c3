//! Tag policy: which elements are worth drawing on their own, which closed ways
//! are areas, and which relation types carry geometry.

use std::collections::HashSet;

use serde::Deserialize;

use crate::data::element::Tags;
use crate::data::geometry::{is_closed, MapCoords};

pub const AREA_MULTIPOLYGON: &str = "multipolygon";

/// Classification rules consulted by the decoder. Swap the implementation to
/// decode against a different tag vocabulary.
pub trait TagClassifier {
    /// True when the tags describe something worth rendering or labelling standalone.
    fn is_interesting(&self, tags: &Tags) -> bool;

    /// True when a way with these coordinates and tags should be drawn filled.
    /// An open path is never an area.
    fn is_area(&self, coords: &[MapCoords], tags: &Tags) -> bool;

    /// Relation types whose members get their geometry resolved.
    fn is_displayable_relation(&self, relation_type: &str) -> bool;

    /// Displayable relation types assembled into polygons with holes rather
    /// than grouped polylines.
    fn is_area_relation(&self, relation_type: &str) -> bool;
}

/// Table-driven classifier. Loaded from the user config or built in code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PolicyTables {
    pub interesting_keys: HashSet<String>,
    pub area_keys: HashSet<String>,
    pub linear_keys: HashSet<String>,
    /// `<key>=yes` forces a closed way to be an area, `<key>=no` forces a line.
    pub area_override_key: Option<String>,
    pub displayable_relation_types: HashSet<String>,
    pub area_relation_types: HashSet<String>,
}

fn string_set(values: &[&str]) -> HashSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

impl Default for PolicyTables {
    fn default() -> Self {
        PolicyTables {
            interesting_keys: string_set(&[
                "name", "amenity", "tourism", "shop", "historic", "leisure", "office",
                "craft", "emergency", "healthcare", "public_transport", "sport",
            ]),
            area_keys: string_set(&[
                "building", "building:part", "landuse", "natural", "leisure", "amenity",
                "tourism", "shop", "place", "water", "aeroway", "military",
            ]),
            linear_keys: string_set(&["highway", "barrier", "railway", "waterway", "power"]),
            area_override_key: Some("area".to_string()),
            displayable_relation_types: string_set(&[
                AREA_MULTIPOLYGON, "barrier", "route", "waterway",
            ]),
            area_relation_types: string_set(&[AREA_MULTIPOLYGON, "barrier"]),
        }
    }
}

impl PolicyTables {
    /// Empty tables: nothing is interesting, no way is an area, no relation is displayable.
    pub fn empty() -> Self {
        PolicyTables {
            interesting_keys: HashSet::new(),
            area_keys: HashSet::new(),
            linear_keys: HashSet::new(),
            area_override_key: None,
            displayable_relation_types: HashSet::new(),
            area_relation_types: HashSet::new(),
        }
    }
}

impl TagClassifier for PolicyTables {
    fn is_interesting(&self, tags: &Tags) -> bool {
        tags.keys().any(|key| self.interesting_keys.contains(key))
    }

    fn is_area(&self, coords: &[MapCoords], tags: &Tags) -> bool {
        if !is_closed(coords) {
            return false;
        }
        if let Some(key) = &self.area_override_key {
            match tags.get(key).map(String::as_str) {
                Some("yes") => return true,
                Some("no") => return false,
                _ => (),
            }
        }
        if tags.keys().any(|key| self.linear_keys.contains(key)) {
            return false;
        }
        tags.keys().any(|key| self.area_keys.contains(key))
    }

    fn is_displayable_relation(&self, relation_type: &str) -> bool {
        self.displayable_relation_types.contains(relation_type)
    }

    fn is_area_relation(&self, relation_type: &str) -> bool {
        self.area_relation_types.contains(relation_type)
    }
}
