use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::{json, Value};

use overpass_decode::{
    DecodeTask, Decoder, Geometry, MapCoords, Pass, PolicyTables, PolygonWithHoles, Registry,
    TaskHandle, TaskStatus,
};

#[fixture]
fn decoder() -> Arc<Decoder> {
    Arc::new(Decoder::new(PolicyTables::default()))
}

fn run(decoder: &Arc<Decoder>, elements: Value) -> TaskHandle {
    let body = json!({ "elements": elements }).to_string().into_bytes();
    let task = DecodeTask::new(decoder.clone(), body);
    let handle = task.handle();
    assert_eq!(task.run(), TaskStatus::Finished);
    handle
}

fn registry(handle: &TaskHandle) -> &Registry {
    handle.registry().expect("finished run exposes its registry")
}

fn coords(points: &[(f64, f64)]) -> Vec<MapCoords> {
    points.iter().map(|&p| MapCoords::from(p)).collect()
}

#[rstest]
fn node_with_interesting_tag(decoder: Arc<Decoder>) {
    let handle = run(
        &decoder,
        json!([{"type": "node", "id": 1, "lat": 10.0, "lon": 20.0, "tags": {"tourism": "hotel"}}]),
    );
    let node = registry(&handle).get(1).expect("node decoded");
    assert_eq!(node.geometry, Geometry::Point(MapCoords::new(10.0, 20.0)));
    assert!(node.is_interesting);
    assert!(!node.is_skippable);
}

#[rstest]
fn open_way_becomes_polyline(decoder: Arc<Decoder>) {
    let handle = run(
        &decoder,
        json!([
            {"type": "node", "id": 1, "lat": 0.0, "lon": 0.0},
            {"type": "node", "id": 2, "lat": 1.0, "lon": 1.0},
            {"type": "node", "id": 3, "lat": 2.0, "lon": 2.0},
            {"type": "way", "id": 5, "nodes": [1, 2, 3], "tags": {}}
        ]),
    );
    assert_eq!(
        registry(&handle).get(5).map(|way| &way.geometry),
        Some(&Geometry::Polyline(coords(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)])))
    );
}

#[rstest]
fn closed_area_way_becomes_polygon(decoder: Arc<Decoder>) {
    let handle = run(
        &decoder,
        json!([
            {"type": "way", "id": 5, "nodes": [1, 2, 3, 1], "tags": {"building": "yes"}},
            {"type": "node", "id": 1, "lat": 0.0, "lon": 0.0},
            {"type": "node", "id": 2, "lat": 0.0, "lon": 1.0},
            {"type": "node", "id": 3, "lat": 1.0, "lon": 1.0}
        ]),
    );
    assert_eq!(
        registry(&handle).get(5).map(|way| &way.geometry),
        Some(&Geometry::Polygon(coords(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.0, 0.0)])))
    );
}

#[rstest]
fn multipolygon_with_hole(decoder: Arc<Decoder>) {
    let outer = [(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)];
    let inner = [(2.0, 2.0), (2.0, 4.0), (4.0, 4.0), (4.0, 2.0), (2.0, 2.0)];
    let geometry = |points: &[(f64, f64)]| -> Value {
        points.iter().map(|(lat, lon)| json!({"lat": lat, "lon": lon})).collect()
    };

    let handle = run(
        &decoder,
        json!([
            {"type": "relation", "id": 100, "tags": {"type": "multipolygon", "natural": "water"},
             "members": [
                 {"type": "way", "ref": 10, "role": "outer"},
                 {"type": "way", "ref": 11, "role": "inner"}
             ]},
            {"type": "way", "id": 10, "nodes": [1, 2, 3, 4, 1], "geometry": geometry(&outer)},
            {"type": "way", "id": 11, "nodes": [5, 6, 7, 8, 5], "geometry": geometry(&inner)}
        ]),
    );
    let registry = registry(&handle);

    assert_eq!(
        registry.get(100).map(|relation| &relation.geometry),
        Some(&Geometry::MultiPolygon(vec![PolygonWithHoles {
            outer: coords(&outer),
            inners: vec![coords(&inner)],
        }]))
    );
    assert!(registry.get(10).is_some_and(|way| way.is_skippable));
    assert!(registry.get(11).is_some_and(|way| way.is_skippable));

    let renderable: Vec<i64> = registry.renderable().map(|element| element.id).collect();
    assert_eq!(renderable, vec![100]);
}

#[rstest]
fn cancelled_between_passes_exposes_nothing(decoder: Arc<Decoder>) {
    let body = json!({"elements": [
        {"type": "node", "id": 1, "lat": 0.0, "lon": 0.0},
        {"type": "node", "id": 2, "lat": 1.0, "lon": 1.0},
        {"type": "way", "id": 5, "nodes": [1, 2]}
    ]})
    .to_string()
    .into_bytes();
    let task = DecodeTask::new(decoder, body);
    let handle = task.handle();
    let canceller = handle.clone();

    let status = task.run_observed(move |pass| {
        if pass == Pass::Ways {
            canceller.cancel();
        }
    });

    assert_eq!(status, TaskStatus::Cancelled);
    assert!(!handle.is_finished());
    assert!(handle.registry().is_none());
    assert!(handle.error().is_none());
    assert!(handle.into_result().is_none());
}

#[rstest]
fn way_with_missing_node_is_omitted(decoder: Arc<Decoder>) {
    let handle = run(
        &decoder,
        json!([
            {"type": "node", "id": 1, "lat": 0.0, "lon": 0.0},
            {"type": "way", "id": 5, "nodes": [1, 2]}
        ]),
    );
    let outcome = handle.outcome().expect("finished");
    assert!(!outcome.registry.contains(5));
    assert_eq!(outcome.stats.failed, 1);
}

#[rstest]
fn embedded_geometry_keeps_every_coordinate(decoder: Arc<Decoder>) {
    let handle = run(
        &decoder,
        json!([
            {"type": "way", "id": 5, "nodes": [1, 2, 3],
             "geometry": [{"lat": 0.0, "lon": 0.0}, {"lat": 0.5, "lon": 0.5}, {"lat": 1.0, "lon": 0.0}]},
            {"type": "way", "id": 6, "nodes": [1, 2, 3],
             "geometry": [{"lat": 0.0, "lon": 0.0}, null, {"lat": 1.0, "lon": 0.0}]}
        ]),
    );
    let registry = registry(&handle);
    assert_eq!(
        registry.get(5).and_then(|way| way.geometry.as_path()).map(Vec::len),
        Some(3)
    );
    assert!(!registry.contains(6));
}

#[rstest]
fn malformed_envelope_fails_the_run(decoder: Arc<Decoder>) {
    let task = DecodeTask::new(decoder, br#"{"elements": {"type": "node"}}"#.to_vec());
    let handle = task.handle();
    assert_eq!(task.run(), TaskStatus::Failed);
    assert!(handle.registry().is_none());
    assert!(handle.error().is_some());
}

#[rstest]
fn synthetic_vocabulary_drives_classification() {
    let mut policy = PolicyTables::empty();
    policy.interesting_keys.insert("glow".to_string());
    policy.area_keys.insert("blob".to_string());
    let decoder = Arc::new(Decoder::new(policy));

    let handle = run(
        &decoder,
        json!([
            {"type": "node", "id": 1, "lat": 0.0, "lon": 0.0, "tags": {"tourism": "hotel"}},
            {"type": "node", "id": 2, "lat": 0.0, "lon": 1.0, "tags": {"glow": "yes"}},
            {"type": "node", "id": 3, "lat": 1.0, "lon": 1.0},
            {"type": "way", "id": 5, "nodes": [1, 2, 3, 1], "tags": {"blob": "1"}},
            {"type": "relation", "id": 9, "tags": {"type": "multipolygon"},
             "members": [{"type": "way", "ref": 5, "role": "outer"}]}
        ]),
    );
    let registry = registry(&handle);

    assert!(!registry.get(1).is_some_and(|node| node.is_interesting));
    assert!(registry.get(2).is_some_and(|node| node.is_interesting));
    assert!(matches!(registry.get(5).map(|way| &way.geometry), Some(Geometry::Polygon(_))));
    assert_eq!(registry.get(9).map(|relation| &relation.geometry), Some(&Geometry::None));
    assert!(!registry.get(5).is_some_and(|way| way.is_skippable));
}

#[rstest]
fn multipolygon_keeps_unused_ways_renderable(decoder: Arc<Decoder>) {
    let handle = run(
        &decoder,
        json!([
            {"type": "node", "id": 1, "lat": 0.0, "lon": 0.0},
            {"type": "node", "id": 2, "lat": 0.0, "lon": 10.0},
            {"type": "node", "id": 3, "lat": 10.0, "lon": 10.0},
            {"type": "node", "id": 4, "lat": 20.0, "lon": 20.0},
            {"type": "node", "id": 5, "lat": 20.0, "lon": 30.0},
            {"type": "node", "id": 6, "lat": 40.0, "lon": 40.0},
            {"type": "node", "id": 7, "lat": 40.0, "lon": 45.0},
            {"type": "node", "id": 8, "lat": 45.0, "lon": 45.0},
            {"type": "way", "id": 10, "nodes": [1, 2, 3, 1]},
            {"type": "way", "id": 11, "nodes": [4, 5]},
            {"type": "way", "id": 12, "nodes": [6, 7, 8, 6]},
            {"type": "relation", "id": 100, "tags": {"type": "multipolygon"},
             "members": [
                 {"type": "way", "ref": 10, "role": "outer"},
                 {"type": "way", "ref": 11, "role": "outer"},
                 {"type": "way", "ref": 12, "role": "inner"}
             ]}
        ]),
    );
    let registry = registry(&handle);

    assert_eq!(
        registry.get(100).map(|relation| &relation.geometry),
        Some(&Geometry::MultiPolygon(vec![PolygonWithHoles {
            outer: coords(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (0.0, 0.0)]),
            inners: Vec::new(),
        }]))
    );
    let mut renderable: Vec<i64> = registry
        .renderable()
        .filter(|element| element.node_refs().is_some())
        .map(|element| element.id)
        .collect();
    renderable.sort_unstable();
    assert_eq!(renderable, vec![11, 12]);
}
