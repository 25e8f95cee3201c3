//! Transport shapes of an Overpass JSON response.
//!
//! The envelope is decoded strictly. Individual records stay as raw JSON until a
//! pass picks them up, so one malformed record only costs that record.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::data::element::{ElementId, ElementType, Tags};
use crate::data::geometry::{MapCoords, Path};
use crate::errors::{ElementError, ElementResult};

#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<Value>,
    /// Set by the server when it returns a partial result, e.g. after a timeout.
    #[serde(default)]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawCoord {
    pub lat: f64,
    pub lon: f64,
}

impl From<RawCoord> for MapCoords {
    fn from(value: RawCoord) -> Self {
        MapCoords {
            lat: value.lat,
            lon: value.lon,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawNode {
    pub id: ElementId,
    #[serde(default)]
    pub tags: Tags,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RawWay {
    pub id: ElementId,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default)]
    pub nodes: Vec<ElementId>,
    pub center: Option<RawCoord>,
    pub geometry: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub struct RawMember {
    #[serde(rename = "type")]
    pub member_type: ElementType,
    #[serde(rename = "ref")]
    pub id: ElementId,
    #[serde(default)]
    pub role: String,
    pub geometry: Option<Vec<Value>>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RawRelation {
    pub id: ElementId,
    #[serde(default)]
    pub tags: Tags,
    #[serde(default)]
    pub members: Vec<RawMember>,
    pub center: Option<RawCoord>,
}

/// Reads the `type` and `id` of a record without decoding the rest of it.
pub fn element_header(value: &Value) -> ElementResult<(ElementType, ElementId)> {
    let id = value
        .get("id")
        .and_then(Value::as_i64)
        .ok_or(ElementError::MissingField { id: 0, field: "id" })?;
    let type_name = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ElementError::MissingField { id, field: "type" })?;
    let element_type = ElementType::parse(type_name).ok_or_else(|| ElementError::UnknownType {
        id,
        element_type: type_name.to_string(),
    })?;
    Ok((element_type, id))
}

/// Decodes one record into the shape of its declared type.
pub fn decode_record<T: DeserializeOwned>(id: ElementId, value: &Value) -> ElementResult<T> {
    T::deserialize(value).map_err(|err| ElementError::Malformed {
        id,
        message: err.to_string(),
    })
}

/// Decodes an embedded coordinate list, dropping entries that are not a
/// `{lat, lon}` object (Overpass writes `null` for nodes outside the query).
/// Callers decide whether the shortened list is acceptable.
pub fn decode_coords(entries: &[Value]) -> Path {
    entries
        .iter()
        .filter_map(|entry| RawCoord::deserialize(entry).ok())
        .map(MapCoords::from)
        .collect()
}
