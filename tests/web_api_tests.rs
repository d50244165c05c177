use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use geo_sssp::web::models::{
    DistancesResponse, MutationResponse, PathResponse, SessionSummary, WebVertex,
};
use geo_sssp::web::server::{build_app, ServerConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    build_app(&ServerConfig::default())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn create(app: &Router, body: Value) -> SessionSummary {
    let (status, bytes) = send(app, "POST", "/api/graphs", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_named_graph_lifecycle() {
    let app = app();
    let session = create(&app, json!({ "mode": "named" })).await;
    let base = format!("/api/graphs/{}", session.id);

    let (status, bytes) = send(
        &app,
        "POST",
        &format!("{}/edges", base),
        Some(json!({ "edges": [
            { "a": "A", "b": "B", "weight": 1 },
            { "a": "B", "b": "C", "weight": 2 },
            { "a": "A", "b": "C", "weight": 5 },
            { "a": "X", "b": "Y", "weight": 1 }
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let mutation: MutationResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(mutation.added, 4);
    assert_eq!(mutation.vertex_count, 5);

    let (status, bytes) = send(
        &app,
        "POST",
        &format!("{}/path", base),
        Some(json!({ "source": "A", "target": "C" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let path: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(path, json!({ "distance": 3.0, "path": ["A", "B", "C"] }));

    let (_, bytes) = send(
        &app,
        "POST",
        &format!("{}/path", base),
        Some(json!({ "source": "A", "target": "Y" })),
    )
    .await;
    let unreachable: PathResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(unreachable.distance, -1.0);
    assert!(unreachable.path.is_empty());

    let (status, bytes) = send(
        &app,
        "POST",
        &format!("{}/distances", base),
        Some(json!({ "source": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let distances: DistancesResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(distances.reached, 3);
    assert_eq!(distances.distances.len(), 5);
    let y = distances
        .distances
        .iter()
        .find(|e| e.vertex == WebVertex::Name("Y".to_string()))
        .unwrap();
    assert_eq!(y.distance, None);

    let (status, _) = send(&app, "DELETE", &base, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &base, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_coordinate_graph_and_point_query() {
    let app = app();
    let session = create(&app, json!({ "mode": "coordinate" })).await;
    let base = format!("/api/graphs/{}", session.id);

    let (status, bytes) = send(
        &app,
        "POST",
        &format!("{}/polylines", base),
        Some(json!({ "points": [
            { "lat": 26.2300, "lng": 73.0200 },
            { "lat": 26.2350, "lng": 73.0200 },
            { "lat": 26.2400, "lng": 73.0200 }
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let mutation: MutationResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(mutation.added, 2);

    let uri = format!(
        "{}/shortest-path?source_lat=26.2299&source_lng=73.0201&dest_lat=26.2401&dest_lng=73.0199",
        base
    );
    let (status, bytes) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let path: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        path["path"],
        json!([
            { "lat": 26.23, "lng": 73.02 },
            { "lat": 26.235, "lng": 73.02 },
            { "lat": 26.24, "lng": 73.02 }
        ])
    );
    assert!(path["distance"].as_f64().unwrap() > 1000.0);

    let (status, bytes) = send(&app, "GET", &format!("{}/shortest-path?source_lat=abc", base), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error["error"], "invalid_coordinates");
}

#[tokio::test]
async fn test_error_mapping() {
    let app = app();
    let session = create(&app, json!({ "mode": "named" })).await;
    let base = format!("/api/graphs/{}", session.id);

    // fractional weight on an integer graph
    let (status, _) = send(
        &app,
        "POST",
        &format!("{}/edges", base),
        Some(json!({ "edges": [{ "a": "A", "b": "B", "weight": 1.5 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // coordinate vertex on a named graph
    let (status, _) = send(
        &app,
        "POST",
        &format!("{}/edges", base),
        Some(json!({ "edges": [{ "a": { "lat": 1.0, "lng": 2.0 }, "b": "B", "weight": 1 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // unknown vertex under the default policy
    let (status, bytes) = send(
        &app,
        "POST",
        &format!("{}/path", base),
        Some(json!({ "source": "A", "target": "B" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error["error"], "vertex_not_found");

    // unknown session
    let (status, _) = send(
        &app,
        "POST",
        "/api/graphs/00000000-0000-0000-0000-000000000000/path",
        Some(json!({ "source": "A", "target": "B" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_lenient_policy_and_session_limit() {
    let app = build_app(&ServerConfig {
        max_sessions: 1,
        ..ServerConfig::default()
    });
    let session = create(&app, json!({ "mode": "named", "unknown_vertex": "unreachable" })).await;

    let (status, bytes) = send(
        &app,
        "POST",
        &format!("/api/graphs/{}/path", session.id),
        Some(json!({ "source": "A", "target": "B" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let path: PathResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(path.distance, -1.0);

    let (status, _) = send(&app, "POST", "/api/graphs", Some(json!({ "mode": "named" }))).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    let (status, bytes) = send(&app, "GET", "/api/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    let sessions: Vec<SessionSummary> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(sessions.len(), 1);
}

#[tokio::test]
async fn test_health_check() {
    let (status, bytes) = send(&app(), "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
}
