use crate::classify::TagClassifier;
use crate::data::element::{Element, ElementKind};
use crate::data::geometry::{Geometry, MapCoords};
use crate::data::overpass::RawNode;
use crate::errors::{ElementError, ElementResult};

pub fn decode_node<C: TagClassifier>(raw: RawNode, classifier: &C) -> ElementResult<Element> {
    let lat = raw.lat.ok_or(ElementError::MissingField { id: raw.id, field: "lat" })?;
    let lon = raw.lon.ok_or(ElementError::MissingField { id: raw.id, field: "lon" })?;

    Ok(Element {
        id: raw.id,
        is_interesting: classifier.is_interesting(&raw.tags),
        is_skippable: false,
        geometry: Geometry::Point(MapCoords { lat, lon }),
        kind: ElementKind::Node,
        tags: raw.tags,
    })
}
