use std::io;

use crate::data::element::ElementId;

/// Run-level failure. Aborts the whole decode (or ETL step) and is handed to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub message: String,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        Error {
            message: value.to_string()
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error {
            message: value.to_string()
        }
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error {
            message: value.to_string()
        }
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error {
            message: value
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure to decode a single record. The record is left out of the registry and
/// the run carries on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ElementError {
    #[error("element {id} is missing required field `{field}`")]
    MissingField { id: ElementId, field: &'static str },

    #[error("element {id} is malformed: {message}")]
    Malformed { id: ElementId, message: String },

    #[error("element {id} has unknown type `{element_type}`")]
    UnknownType { id: ElementId, element_type: String },

    #[error("way {0} did not resolve to one coordinate per node reference")]
    InvalidWayLength(ElementId),

    #[error("relation {0} produced no geometry")]
    EmptyRelation(ElementId),
}

impl ElementError {
    pub fn element_id(&self) -> ElementId {
        match self {
            ElementError::MissingField { id, .. }
            | ElementError::Malformed { id, .. }
            | ElementError::UnknownType { id, .. } => *id,
            ElementError::InvalidWayLength(id) | ElementError::EmptyRelation(id) => *id,
        }
    }
}

pub type ElementResult<T> = std::result::Result<T, ElementError>;
