use crate::classify::TagClassifier;
use crate::data::element::{Element, ElementId, ElementKind, Tags};
use crate::data::geometry::{Geometry, MapCoords, Path};
use crate::data::overpass::{decode_coords, RawWay};
use crate::data::Registry;
use crate::errors::{ElementError, ElementResult};

/// Looks up the point of every referenced node. Fails as a whole if any node is
/// unknown or is not a point.
pub fn resolve_node_refs(node_refs: &[ElementId], registry: &Registry) -> Option<Path> {
    node_refs
        .iter()
        .map(|id| registry.get(*id).and_then(|element| element.geometry.as_point()))
        .collect()
}

/// Area or line, depending on closure and tags.
pub fn path_geometry<C: TagClassifier>(coords: Path, tags: &Tags, classifier: &C) -> Geometry {
    if classifier.is_area(&coords, tags) {
        Geometry::Polygon(coords)
    } else {
        Geometry::Polyline(coords)
    }
}

/// Resolves a way from, in order of preference, its embedded center, its
/// embedded coordinate list, or the nodes already in the registry.
///
/// A resolved line must have exactly one coordinate per node reference and at
/// least two coordinates, otherwise the way fails with `InvalidWayLength`.
pub fn decode_way<C: TagClassifier>(raw: RawWay, registry: &Registry, classifier: &C) -> ElementResult<Element> {
    let geometry = match (&raw.center, &raw.geometry) {
        (Some(center), _) => Geometry::Point(MapCoords::from(*center)),
        (None, embedded) => {
            let coords = match embedded {
                Some(entries) => decode_coords(entries),
                None => resolve_node_refs(&raw.nodes, registry)
                    .ok_or(ElementError::InvalidWayLength(raw.id))?,
            };
            if coords.len() != raw.nodes.len() || coords.len() < 2 {
                return Err(ElementError::InvalidWayLength(raw.id));
            }
            path_geometry(coords, &raw.tags, classifier)
        }
    };

    Ok(Element {
        id: raw.id,
        is_interesting: classifier.is_interesting(&raw.tags),
        is_skippable: false,
        geometry,
        kind: ElementKind::Way { node_refs: raw.nodes },
        tags: raw.tags,
    })
}
