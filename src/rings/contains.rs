use crate::data::geometry::MapCoords;

/// Even-odd test of `point` against a closed `ring`, casting the ray towards
/// increasing longitude.
///
/// Only consecutive pairs are visited; the ring's repeated closing coordinate
/// provides the last edge. Points on the boundary may land either side.
pub fn point_in_ring(point: MapCoords, ring: &[MapCoords]) -> bool {
    let mut inside = false;
    for edge in ring.windows(2) {
        let (a, b) = (edge[0], edge[1]);
        if (a.lat > point.lat) != (b.lat > point.lat) {
            let crossing_lon = a.lon + (point.lat - a.lat) * (b.lon - a.lon) / (b.lat - a.lat);
            if crossing_lon > point.lon {
                inside = !inside;
            }
        }
    }
    inside
}
