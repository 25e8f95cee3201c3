use std::collections::VecDeque;

use crate::data::element::ElementId;
use crate::data::geometry::{is_closed, MapCoords, Path};

/// A chain of coordinates and the member ways it was stitched from.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub sources: Vec<ElementId>,
    pub path: Path,
}

impl Chain {
    pub fn new(source: ElementId, path: Path) -> Chain {
        Chain {
            sources: vec![source],
            path,
        }
    }
}

/// How a candidate chain attaches to the chain being grown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Join {
    /// base.last == candidate.first
    Append,
    /// base.last == candidate.last
    AppendReversed,
    /// base.first == candidate.last
    Prepend,
    /// base.first == candidate.first
    PrependReversed,
}

fn join_for(base: &[MapCoords], candidate: &[MapCoords]) -> Option<Join> {
    let (base_first, base_last) = (base.first()?, base.last()?);
    let (cand_first, cand_last) = (candidate.first()?, candidate.last()?);

    if base_last == cand_first {
        Some(Join::Append)
    } else if base_last == cand_last {
        Some(Join::AppendReversed)
    } else if base_first == cand_last {
        Some(Join::Prepend)
    } else if base_first == cand_first {
        Some(Join::PrependReversed)
    } else {
        None
    }
}

/// The shared endpoint appears once in the result.
fn apply(join: Join, mut base: Path, mut candidate: Path) -> Path {
    match join {
        Join::Append => {
            base.extend(candidate.into_iter().skip(1));
            base
        }
        Join::AppendReversed => {
            base.extend(candidate.into_iter().rev().skip(1));
            base
        }
        Join::Prepend => {
            candidate.extend(base.into_iter().skip(1));
            candidate
        }
        Join::PrependReversed => {
            candidate.reverse();
            candidate.extend(base.into_iter().skip(1));
            candidate
        }
    }
}

/// Joins chains that share an endpoint into maximal chains.
///
/// Greedy and order dependent: the first remaining chain becomes the base and
/// absorbs, one at a time, the first chain in pool order that touches either of
/// its ends. Growth stops once the base closes or nothing in the pool touches it.
/// Endpoints must be exactly equal to join. Empty chains are dropped.
///
/// A merged chain lists the sources of every chain it absorbed, base first.
/// Quadratic in the number of chains.
pub fn merge_chains(chains: Vec<Chain>) -> Vec<Chain> {
    let mut pool: VecDeque<Chain> = chains.into_iter().filter(|chain| !chain.path.is_empty()).collect();
    let mut merged = Vec::new();

    while let Some(mut base) = pool.pop_front() {
        while !is_closed(&base.path) {
            let found = pool
                .iter()
                .enumerate()
                .find_map(|(index, candidate)| join_for(&base.path, &candidate.path).map(|join| (index, join)));
            let Some((index, join)) = found else {
                break;
            };
            let Some(candidate) = pool.remove(index) else {
                break;
            };
            base.path = apply(join, std::mem::take(&mut base.path), candidate.path);
            base.sources.extend(candidate.sources);
        }
        merged.push(base);
    }

    merged
}

/// [`merge_chains`] for bare coordinate chains.
pub fn merge_rings(chains: Vec<Path>) -> Vec<Path> {
    let chains = chains
        .into_iter()
        .map(|path| Chain {
            sources: Vec::new(),
            path,
        })
        .collect();
    merge_chains(chains).into_iter().map(|chain| chain.path).collect()
}
