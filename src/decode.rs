pub mod node;
pub mod relation;
pub mod way;

use std::fmt;

use log::{info, warn};
use serde_json::Value;

use crate::classify::{PolicyTables, TagClassifier};
use crate::data::element::{Element, ElementId, ElementType};
use crate::data::overpass::{decode_record, element_header, OverpassResponse};
use crate::data::Registry;
use crate::errors::{ElementError, ElementResult};
use crate::task::CancellationToken;

/// One full sweep over the response, decoding the records of a single type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Nodes,
    Ways,
    Relations,
}

impl Pass {
    /// Passes in the order they must run: each one resolves against the ones before it.
    pub const ALL: [Pass; 3] = [Pass::Nodes, Pass::Ways, Pass::Relations];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pass::Nodes => "nodes",
            Pass::Ways => "ways",
            Pass::Relations => "relations",
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            Pass::Nodes => ElementType::Node,
            Pass::Ways => ElementType::Way,
            Pass::Relations => ElementType::Relation,
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    pub nodes: usize,
    pub ways: usize,
    pub relations: usize,
    /// Records left out of the registry because they failed to decode.
    pub failed: usize,
}

impl DecodeStats {
    fn count(&mut self, element_type: ElementType) {
        match element_type {
            ElementType::Node => self.nodes += 1,
            ElementType::Way => self.ways += 1,
            ElementType::Relation => self.relations += 1,
        }
    }
}

/// Runs the three passes over a decoded response.
#[derive(Debug, Clone, Default)]
pub struct Decoder<C = PolicyTables> {
    classifier: C,
}

impl<C: TagClassifier> Decoder<C> {
    pub fn new(classifier: C) -> Self {
        Decoder { classifier }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    fn decode_one(&self, pass: Pass, id: ElementId, value: &Value, registry: &mut Registry) -> ElementResult<Element> {
        match pass {
            Pass::Nodes => node::decode_node(decode_record(id, value)?, &self.classifier),
            Pass::Ways => way::decode_way(decode_record(id, value)?, registry, &self.classifier),
            Pass::Relations => relation::decode_relation(decode_record(id, value)?, registry, &self.classifier),
        }
    }

    /// Decodes nodes, then ways, then relations. Records may appear in any order
    /// in the response; every pass looks at all of them.
    ///
    /// `token` is checked before every record. Returns `None` once cancelled,
    /// dropping everything decoded so far. `on_pass` is called as each pass starts.
    pub fn decode(
        &self,
        response: &OverpassResponse,
        token: &CancellationToken,
        on_pass: &mut dyn FnMut(Pass),
    ) -> Option<(Registry, DecodeStats)> {
        let mut registry = Registry::new();
        let mut stats = DecodeStats::default();

        let headers: Vec<(ElementType, ElementId, &Value)> = response
            .elements
            .iter()
            .filter_map(|value| match element_header(value) {
                Ok((element_type, id)) => Some((element_type, id, value)),
                Err(err) => {
                    log_failure(&err, None);
                    stats.failed += 1;
                    None
                }
            })
            .collect();

        for pass in Pass::ALL {
            on_pass(pass);
            if token.is_cancelled() {
                info!(pass = pass.as_str(); "Decode cancelled");
                return None;
            }
            let before = registry.len();
            info!(pass = pass.as_str(); "Starting pass");

            for &(element_type, id, value) in headers.iter().filter(|header| header.0 == pass.element_type()) {
                if token.is_cancelled() {
                    info!(pass = pass.as_str(), element_id = id; "Decode cancelled");
                    return None;
                }
                match self.decode_one(pass, id, value, &mut registry) {
                    Ok(element) => {
                        stats.count(element_type);
                        registry.insert(element);
                    }
                    Err(err) => {
                        log_failure(&err, Some(element_type));
                        stats.failed += 1;
                    }
                }
            }

            info!(pass = pass.as_str(), added = registry.len() - before; "Finished pass");
        }

        if token.is_cancelled() {
            return None;
        }
        Some((registry, stats))
    }
}

fn log_failure(err: &ElementError, element_type: Option<ElementType>) {
    let message = err.to_string();
    warn!(
        element_id = err.element_id(),
        element_type = element_type.map(|t| t.as_str()).unwrap_or("unknown"),
        err = message.as_str();
        "Skipping element that failed to decode"
    );
}
