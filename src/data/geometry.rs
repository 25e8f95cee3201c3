use std::hash::Hash;

#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Clone, Copy)]
pub struct MapCoords {
    pub lat: f64,
    pub lon: f64,
}

impl MapCoords {
    pub fn new(lat: f64, lon: f64) -> Self {
        MapCoords { lat, lon }
    }
}

impl From<(f64, f64)> for MapCoords {
    fn from((lat, lon): (f64, f64)) -> Self {
        MapCoords { lat, lon }
    }
}

impl Hash for MapCoords {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.lat.to_bits().hash(state);
        self.lon.to_bits().hash(state);
    }
}

impl Eq for MapCoords { }

/// Exact equality. Ring closure and endpoint joins rely on this, there is no tolerance.
impl PartialEq for MapCoords {
    fn eq(&self, other: &Self) -> bool {
        self.lat == other.lat && self.lon == other.lon
    }
}

/// Ordered coordinate sequence: a way's line, or a ring when closed.
pub type Path = Vec<MapCoords>;

/// A path is closed when its first and last coordinates are equal.
pub fn is_closed(path: &[MapCoords]) -> bool {
    match (path.first(), path.last()) {
        (Some(first), Some(last)) => first == last,
        _ => false,
    }
}

#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Clone, PartialEq)]
pub struct PolygonWithHoles {
    pub outer: Path,
    pub inners: Vec<Path>,
}

/// Resolved spatial representation of an element.
#[derive(rkyv::Archive, rkyv::Deserialize, rkyv::Serialize, Debug, Clone, PartialEq, Default)]
pub enum Geometry {
    #[default]
    None,
    Point(MapCoords),
    Polyline(Path),
    Polygon(Path),
    MultiPolyline(Vec<Path>),
    MultiPolygon(Vec<PolygonWithHoles>),
}

impl Geometry {
    /// Line-like coordinates of a way geometry, for reuse by relations.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Geometry::Polyline(path) | Geometry::Polygon(path) => Some(path),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<MapCoords> {
        match self {
            Geometry::Point(coords) => Some(*coords),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Geometry::None)
    }
}
