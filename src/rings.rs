//! Ring geometry for relations: joining way fragments, point containment and
//! assembling polygons with holes or grouped lines.

pub mod assemble;
pub mod contains;
pub mod merge;

pub use assemble::{assemble_multipolygon, assemble_multipolyline, Assembly};
pub use contains::point_in_ring;
pub use merge::{merge_chains, merge_rings, Chain};
