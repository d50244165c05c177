use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use log::{info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use uuid::Uuid;

use crate::engine::EngineConfig;
use crate::graph::Coord;
use crate::web::models::*;
use crate::Error;

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// A session shared between the map and in-flight requests
pub type SessionHandle = Arc<RwLock<Session>>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<Mutex<HashMap<Uuid, SessionHandle>>>,
    pub max_sessions: usize,
}

impl AppState {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            max_sessions,
        }
    }

    /// Locks the session map. It is only held long enough to look up,
    /// insert or remove a handle, never while a graph is searched.
    fn sessions(&self) -> MutexGuard<'_, HashMap<Uuid, SessionHandle>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn session(&self, session_id: Uuid) -> Result<SessionHandle, ApiError> {
        self.sessions()
            .get(&session_id)
            .cloned()
            .ok_or_else(|| session_not_found(session_id))
    }
}

// A handler that panicked mid-request cannot leave a graph half-mutated
// (inserts are validated up front), so a poisoned session is still usable.
fn summarize(handle: &SessionHandle) -> SessionSummary {
    handle.read().unwrap_or_else(PoisonError::into_inner).summary()
}

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/graphs", post(create_graph))
        .route("/api/graphs/:session_id", get(get_graph).delete(delete_graph))
        .route("/api/graphs/:session_id/edges", post(add_edges))
        .route("/api/graphs/:session_id/polylines", post(add_polyline))
        .route("/api/graphs/:session_id/path", post(find_path))
        .route("/api/graphs/:session_id/distances", post(find_all_distances))
        .route("/api/graphs/:session_id/shortest-path", get(shortest_path_between_points))
        .route("/api/sessions", get(list_sessions))
        .route("/api/health", get(health_check))
}

fn api_error(status: StatusCode, error: &str, message: String) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message,
            details: None,
        }),
    )
}

fn session_not_found(session_id: Uuid) -> ApiError {
    api_error(
        StatusCode::NOT_FOUND,
        "session_not_found",
        format!("Session not found: {}", session_id),
    )
}

/// Maps an engine error onto an HTTP status
fn engine_error(err: Error) -> ApiError {
    let (status, code) = match &err {
        Error::VertexNotFound(_) => (StatusCode::NOT_FOUND, "vertex_not_found"),
        Error::InvalidWeight(_) => (StatusCode::BAD_REQUEST, "invalid_weight"),
        Error::NonFiniteCoordinate { .. } => (StatusCode::BAD_REQUEST, "invalid_coordinates"),
        Error::ModeMismatch(_) => (StatusCode::CONFLICT, "mode_mismatch"),
        Error::DistanceOverflow(_) => (StatusCode::UNPROCESSABLE_ENTITY, "distance_overflow"),
        Error::AlgorithmError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "algorithm_failed"),
    };
    api_error(status, code, err.to_string())
}

/// Runs graph work on the blocking pool so a long search never stalls
/// the async workers
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> crate::Result<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(engine_error),
        Err(join_error) => {
            warn!("graph task failed: {}", join_error);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "task_failed",
                join_error.to_string(),
            ))
        }
    }
}

/// Runs a query against the session's graph under its read lock. Other
/// sessions, and other readers of this one, proceed concurrently.
async fn read_session<T, F>(state: &AppState, session_id: Uuid, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&SessionGraph) -> crate::Result<T> + Send + 'static,
{
    let handle = state.session(session_id)?;
    run_blocking(move || {
        let session = handle.read().unwrap_or_else(PoisonError::into_inner);
        f(&session.graph)
    })
    .await
}

/// Runs a mutation against the session's graph under its write lock
async fn write_session<T, F>(state: &AppState, session_id: Uuid, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&mut SessionGraph) -> crate::Result<T> + Send + 'static,
{
    let handle = state.session(session_id)?;
    run_blocking(move || {
        let mut session = handle.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut session.graph)
    })
    .await
}

/// Create a new empty graph
pub async fn create_graph(
    State(state): State<AppState>,
    Json(request): Json<CreateGraphRequest>,
) -> Result<(StatusCode, Json<SessionSummary>), ApiError> {
    let mut sessions = state.sessions();
    if sessions.len() >= state.max_sessions {
        warn!("session limit of {} reached", state.max_sessions);
        return Err(api_error(
            StatusCode::TOO_MANY_REQUESTS,
            "session_limit",
            format!("At most {} sessions may be open", state.max_sessions),
        ));
    }

    let config = EngineConfig {
        unknown_vertex: request.unknown_vertex,
    };
    let session = Session::new(request.mode, config);
    let summary = session.summary();
    sessions.insert(session.id, Arc::new(RwLock::new(session)));
    info!("created {:?} graph session {}", request.mode, summary.id);

    Ok((StatusCode::CREATED, Json(summary)))
}

/// Get graph summary for a session
pub async fn get_graph(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSummary>, ApiError> {
    let handle = state.session(session_id)?;
    Ok(Json(summarize(&handle)))
}

/// Discard a session and its graph
pub async fn delete_graph(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    match state.sessions().remove(&session_id) {
        Some(_) => {
            info!("deleted graph session {}", session_id);
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(session_not_found(session_id)),
    }
}

/// Add a batch of weighted edges
pub async fn add_edges(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<AddEdgesRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    write_session(&state, session_id, move |graph| {
        let added = graph.add_edges(request.edges)?;
        Ok(Json(MutationResponse {
            added,
            vertex_count: graph.vertex_count(),
            edge_count: graph.edge_count(),
        }))
    })
    .await
}

/// Add a road polyline as consecutive edges
pub async fn add_polyline(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<AddPolylineRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    write_session(&state, session_id, move |graph| {
        let added = graph.add_polyline(&request.points, request.metric)?;
        Ok(Json(MutationResponse {
            added,
            vertex_count: graph.vertex_count(),
            edge_count: graph.edge_count(),
        }))
    })
    .await
}

/// Shortest path between two vertices
pub async fn find_path(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<PathRequest>,
) -> Result<Json<PathResponse>, ApiError> {
    read_session(&state, session_id, move |graph| {
        graph.find_path(request.source, request.target).map(Json)
    })
    .await
}

/// Distance from one source to every vertex
pub async fn find_all_distances(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<DistancesRequest>,
) -> Result<Json<DistancesResponse>, ApiError> {
    read_session(&state, session_id, move |graph| {
        graph.find_all_distances(request.source).map(Json)
    })
    .await
}

/// Shortest path between the vertices nearest to two arbitrary points
pub async fn shortest_path_between_points(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    query: Result<Query<PointPathQuery>, QueryRejection>,
) -> Result<Json<PathResponse>, ApiError> {
    let invalid = |message: String| api_error(StatusCode::BAD_REQUEST, "invalid_coordinates", message);

    let Query(q) = query.map_err(|rejection| invalid(rejection.body_text()))?;
    let from = Coord::new(q.source_lat, q.source_lng).map_err(|e| invalid(e.to_string()))?;
    let to = Coord::new(q.dest_lat, q.dest_lng).map_err(|e| invalid(e.to_string()))?;

    read_session(&state, session_id, move |graph| {
        graph.find_path_between_points(&from, &to).map(Json)
    })
    .await
}

/// List all active sessions
pub async fn list_sessions(State(state): State<AppState>) -> Json<Vec<SessionSummary>> {
    // Summaries are read after the map lock is released
    let handles: Vec<SessionHandle> = state.sessions().values().cloned().collect();
    let mut summaries: Vec<SessionSummary> = handles.iter().map(summarize).collect();
    summaries.sort_by_key(|s| s.created_at);
    Json(summaries)
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
