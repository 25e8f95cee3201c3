use log::debug;

use super::contains::point_in_ring;
use super::merge::{merge_chains, Chain};
use crate::data::element::{ElementId, RelationMember};
use crate::data::geometry::{is_closed, Path, PolygonWithHoles};

pub const ROLE_OUTER: &str = "outer";
pub const ROLE_INNER: &str = "inner";

/// Role of a member way in a multipolygon. An empty role counts as outer.
pub fn is_outer_role(role: &str) -> bool {
    role == ROLE_OUTER || role.is_empty()
}

pub fn is_inner_role(role: &str) -> bool {
    role == ROLE_INNER
}

/// Shapes built from a relation's members, and the member ways that ended up in them.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly<T> {
    pub parts: Vec<T>,
    /// Ways whose coordinates appear in `parts`. Members that were dropped along
    /// the way (open chains, unclaimed holes) are not listed.
    pub consumed: Vec<ElementId>,
}

impl<T> Assembly<T> {
    fn new() -> Self {
        Assembly {
            parts: Vec::new(),
            consumed: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

fn way_chains(members: &[RelationMember], keep: impl Fn(&RelationMember) -> bool) -> Vec<Chain> {
    members
        .iter()
        .filter(|member| member.is_way_with_coords() && keep(member))
        .map(|member| Chain::new(member.id, member.coords.clone()))
        .collect()
}

fn closed_rings(chains: Vec<Chain>) -> Vec<Chain> {
    let merged = merge_chains(chains);
    let total = merged.len();
    let rings: Vec<Chain> = merged.into_iter().filter(|ring| is_closed(&ring.path)).collect();
    if rings.len() < total {
        debug!(dropped = total - rings.len(); "Dropping open chains from multipolygon");
    }
    rings
}

/// Builds polygons with holes from the outer and inner ways of a relation.
///
/// Each role is merged on its own and open results are discarded. Outer rings
/// are visited in merge order and claim every unclaimed inner ring whose first
/// coordinate lies inside them, so an inner ring belongs to at most one outer.
/// Inner rings no outer claims are dropped. Returns nothing when no outer ring closes.
pub fn assemble_multipolygon(members: &[RelationMember]) -> Assembly<PolygonWithHoles> {
    let outers = closed_rings(way_chains(members, |member| is_outer_role(&member.role)));
    let mut inners: Vec<Option<Chain>> = closed_rings(way_chains(members, |member| is_inner_role(&member.role)))
        .into_iter()
        .map(Some)
        .collect();

    let mut assembly = Assembly::new();
    for Chain { sources, path: outer } in outers {
        assembly.consumed.extend(sources);
        let mut holes = Vec::new();
        for slot in inners.iter_mut() {
            let inside = slot
                .as_ref()
                .and_then(|inner| inner.path.first())
                .is_some_and(|first| point_in_ring(*first, &outer));
            if !inside {
                continue;
            }
            if let Some(inner) = slot.take() {
                assembly.consumed.extend(inner.sources);
                holes.push(inner.path);
            }
        }
        assembly.parts.push(PolygonWithHoles { outer, inners: holes });
    }

    let unclaimed = inners.iter().flatten().count();
    if unclaimed > 0 {
        debug!(dropped = unclaimed; "Dropping inner rings outside every outer ring");
    }
    assembly
}

/// Merges every member way regardless of role; each resulting chain, open or
/// closed, is one line. Single-coordinate chains are not lines and are dropped.
pub fn assemble_multipolyline(members: &[RelationMember]) -> Assembly<Path> {
    let mut assembly = Assembly::new();
    for chain in merge_chains(way_chains(members, |_| true)) {
        if chain.path.len() < 2 {
            continue;
        }
        assembly.consumed.extend(chain.sources);
        assembly.parts.push(chain.path);
    }
    assembly
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::element::ElementType;
    use crate::data::geometry::MapCoords;

    fn path(points: &[(f64, f64)]) -> Path {
        points.iter().map(|&p| MapCoords::from(p)).collect()
    }

    fn way(id: i64, role: &str, points: &[(f64, f64)]) -> RelationMember {
        RelationMember {
            member_type: ElementType::Way,
            id,
            role: role.to_string(),
            coords: path(points),
        }
    }

    fn square(min: f64, max: f64) -> Vec<(f64, f64)> {
        vec![(min, min), (min, max), (max, max), (max, min), (min, min)]
    }

    #[test]
    fn outer_with_hole() {
        let members = vec![way(1, "outer", &square(0.0, 10.0)), way(2, "inner", &square(2.0, 4.0))];
        let assembly = assemble_multipolygon(&members);
        assert_eq!(
            assembly.parts,
            vec![PolygonWithHoles {
                outer: path(&square(0.0, 10.0)),
                inners: vec![path(&square(2.0, 4.0))],
            }]
        );
        assert_eq!(assembly.consumed, vec![1, 2]);
    }

    #[test]
    fn outer_split_across_ways() {
        let members = vec![
            way(1, "outer", &[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0)]),
            way(2, "outer", &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]),
        ];
        let assembly = assemble_multipolygon(&members);
        assert_eq!(assembly.parts.len(), 1);
        assert_eq!(assembly.parts[0].outer.len(), 5);
        assert!(is_closed(&assembly.parts[0].outer));
        assert_eq!(assembly.consumed, vec![1, 2]);
    }

    #[test]
    fn inner_goes_to_first_containing_outer() {
        let members = vec![
            way(1, "outer", &square(0.0, 10.0)),
            way(2, "outer", &square(1.0, 9.0)),
            way(3, "inner", &square(2.0, 4.0)),
        ];
        let polygons = assemble_multipolygon(&members).parts;
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0].inners.len(), 1);
        assert!(polygons[1].inners.is_empty());
    }

    #[test]
    fn open_outer_is_dropped() {
        let members = vec![
            way(1, "outer", &[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0)]),
            way(2, "outer", &square(20.0, 30.0)),
        ];
        let assembly = assemble_multipolygon(&members);
        assert_eq!(assembly.parts.len(), 1);
        assert_eq!(assembly.parts[0].outer, path(&square(20.0, 30.0)));
        assert_eq!(assembly.consumed, vec![2]);
    }

    #[test]
    fn dropped_rings_are_not_consumed() {
        let members = vec![
            way(1, "outer", &square(0.0, 10.0)),
            way(2, "outer", &[(20.0, 20.0), (20.0, 30.0), (30.0, 30.0)]),
            way(3, "inner", &square(40.0, 45.0)),
            way(4, "inner", &[(2.0, 2.0), (2.0, 4.0), (4.0, 4.0)]),
            way(5, "inner", &[(4.0, 4.0), (4.0, 2.0), (2.0, 2.0)]),
        ];
        let assembly = assemble_multipolygon(&members);
        assert_eq!(assembly.parts.len(), 1);
        assert_eq!(assembly.parts[0].inners.len(), 1);
        assert_eq!(assembly.consumed, vec![1, 4, 5]);
    }

    #[test]
    fn only_inners_gives_nothing() {
        let members = vec![way(1, "inner", &square(0.0, 1.0))];
        let assembly = assemble_multipolygon(&members);
        assert!(assembly.is_empty());
        assert!(assembly.consumed.is_empty());
    }

    #[test]
    fn empty_role_is_outer_and_other_roles_ignored() {
        let members = vec![way(1, "", &square(0.0, 1.0)), way(2, "label", &square(5.0, 6.0))];
        let assembly = assemble_multipolygon(&members);
        assert_eq!(assembly.parts.len(), 1);
        assert_eq!(assembly.parts[0].outer, path(&square(0.0, 1.0)));
        assert_eq!(assembly.consumed, vec![1]);
    }

    #[test]
    fn polyline_merges_regardless_of_role() {
        let members = vec![
            way(1, "forward", &[(0.0, 0.0), (0.0, 1.0)]),
            way(2, "", &[(0.0, 1.0), (0.0, 2.0)]),
            way(3, "backward", &[(5.0, 5.0), (6.0, 6.0)]),
            RelationMember {
                member_type: ElementType::Node,
                id: 4,
                role: "stop".to_string(),
                coords: path(&[(0.0, 2.0)]),
            },
        ];
        let assembly = assemble_multipolyline(&members);
        assert_eq!(assembly.consumed, vec![1, 2, 3]);
        assert_eq!(
            assembly.parts,
            vec![path(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]), path(&[(5.0, 5.0), (6.0, 6.0)])]
        );
    }
}
