use log::debug;

use crate::classify::TagClassifier;
use crate::data::element::{Element, ElementId, ElementKind, ElementType, RelationMember};
use crate::data::geometry::{Geometry, MapCoords, Path};
use crate::data::overpass::{decode_coords, RawMember, RawRelation};
use crate::data::Registry;
use crate::errors::{ElementError, ElementResult};
use crate::rings::{assemble_multipolygon, assemble_multipolyline};

pub const RELATION_TYPE_TAG: &str = "type";

/// Coordinates of one member: embedded geometry first, then whatever the
/// registry already holds for that id. Nested relations have none.
fn member_coords(raw: &RawMember, registry: &Registry) -> Path {
    match raw.member_type {
        ElementType::Way => {
            let embedded = raw.geometry.as_deref().map(decode_coords).unwrap_or_default();
            if !embedded.is_empty() {
                return embedded;
            }
            registry
                .get(raw.id)
                .and_then(|element| element.geometry.as_path())
                .cloned()
                .unwrap_or_default()
        }
        ElementType::Node => match (raw.lat, raw.lon) {
            (Some(lat), Some(lon)) => vec![MapCoords { lat, lon }],
            _ => registry
                .get(raw.id)
                .and_then(|element| element.geometry.as_point())
                .into_iter()
                .collect(),
        },
        ElementType::Relation => Path::new(),
    }
}

pub fn decode_member(raw: RawMember, registry: &Registry, with_geometry: bool) -> RelationMember {
    let coords = if with_geometry {
        member_coords(&raw, registry)
    } else {
        Path::new()
    };
    RelationMember {
        member_type: raw.member_type,
        id: raw.id,
        role: raw.role,
        coords,
    }
}

/// Decodes a relation and assembles its geometry when its type is displayable.
///
/// Members whose shape ends up drawn by this relation are marked skippable in
/// the registry, but only once the relation has decoded successfully.
pub fn decode_relation<C: TagClassifier>(
    raw: RawRelation,
    registry: &mut Registry,
    classifier: &C,
) -> ElementResult<Element> {
    let id = raw.id;
    let relation_type = raw.tags.get(RELATION_TYPE_TAG).map(String::as_str);
    let is_displayable = relation_type.is_some_and(|kind| classifier.is_displayable_relation(kind));
    let is_area = is_displayable && relation_type.is_some_and(|kind| classifier.is_area_relation(kind));
    let center = raw.center.map(MapCoords::from);

    let with_geometry = is_displayable && center.is_none();
    let members: Vec<RelationMember> = raw
        .members
        .into_iter()
        .map(|member| decode_member(member, registry, with_geometry))
        .collect();

    let mut skippable: Vec<ElementId> = Vec::new();
    let geometry = match center {
        Some(center) if is_area => {
            skippable.extend(members.iter().map(|member| member.id));
            Geometry::Point(center)
        }
        Some(_) => Geometry::None,
        None if is_area => {
            let assembly = assemble_multipolygon(&members);
            if assembly.is_empty() {
                return Err(ElementError::EmptyRelation(id));
            }
            skippable.extend(assembly.consumed);
            Geometry::MultiPolygon(assembly.parts)
        }
        None if is_displayable => {
            let assembly = assemble_multipolyline(&members);
            if assembly.is_empty() {
                return Err(ElementError::EmptyRelation(id));
            }
            skippable.extend(
                assembly
                    .consumed
                    .into_iter()
                    .filter(|way_id| !registry.get(*way_id).is_some_and(|way| way.is_interesting)),
            );
            Geometry::MultiPolyline(assembly.parts)
        }
        None => Geometry::None,
    };

    for member_id in &skippable {
        registry.mark_skippable(*member_id);
    }
    if !skippable.is_empty() {
        debug!(relation_id = id, skipped = skippable.len(); "Marked members as drawn by relation");
    }

    Ok(Element {
        id,
        is_interesting: classifier.is_interesting(&raw.tags),
        is_skippable: false,
        geometry,
        kind: ElementKind::Relation {
            member_refs: members.iter().map(|member| member.id).collect(),
        },
        tags: raw.tags,
    })
}
