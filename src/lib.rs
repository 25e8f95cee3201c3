//! Decodes Overpass API JSON responses into a registry of elements with fully
//! resolved geometry: ways resolved from their nodes, relations assembled into
//! polygons with holes or grouped lines.

pub mod classify;
pub mod config;
pub mod data;
pub mod decode;
pub mod errors;
pub mod etl;
pub mod rings;
pub mod task;
pub mod worker;

pub use classify::{PolicyTables, TagClassifier};
pub use data::element::{Element, ElementId, ElementKind, ElementType};
pub use data::geometry::{Geometry, MapCoords, Path, PolygonWithHoles};
pub use data::Registry;
pub use decode::{DecodeStats, Decoder, Pass};
pub use errors::{ElementError, Error};
pub use task::{CancellationToken, DecodeOutcome, DecodeTask, TaskHandle, TaskStatus};
pub use worker::{DecodeRequest, DecodeWorker};
