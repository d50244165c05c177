use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::algorithm::{DistanceTable, PathResult};
use crate::engine::{CoordinateEngine, EngineConfig, NamedEngine, UnknownVertexPolicy};
use crate::graph::geo::{euclidean, haversine_m};
use crate::graph::{Coord, VertexKey, Weight};
use crate::{Error, Result};

/// Which key kind a session's graph uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphMode {
    Coordinate,
    Named,
}

/// A vertex as it appears in JSON: `{"lat": .., "lng": ..}` or a plain string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WebVertex {
    Point(Coord),
    Name(String),
}

impl WebVertex {
    pub fn into_coord(self) -> Result<Coord> {
        match self {
            WebVertex::Point(c) => Ok(c),
            WebVertex::Name(name) => Err(Error::ModeMismatch(format!(
                "expected a coordinate, got identifier {:?}",
                name
            ))),
        }
    }

    pub fn into_name(self) -> Result<String> {
        match self {
            WebVertex::Name(name) => Ok(name),
            WebVertex::Point(c) => Err(Error::ModeMismatch(format!(
                "expected an identifier, got coordinate {}",
                c
            ))),
        }
    }
}

impl From<Coord> for WebVertex {
    fn from(c: Coord) -> Self {
        WebVertex::Point(c)
    }
}

impl From<String> for WebVertex {
    fn from(name: String) -> Self {
        WebVertex::Name(name)
    }
}

/// Converts a JSON weight to the integer domain of named graphs
pub fn integer_weight(weight: f64) -> Result<u64> {
    if weight.is_finite() && weight >= 0.0 && weight.fract() == 0.0 && weight < u64::MAX as f64 {
        Ok(weight as u64)
    } else {
        Err(Error::InvalidWeight(format!(
            "{} is not a non-negative integer",
            weight
        )))
    }
}

/// The engine owned by a session
#[derive(Debug, Clone)]
pub enum SessionGraph {
    Coordinate(CoordinateEngine),
    Named(NamedEngine),
}

impl SessionGraph {
    pub fn new(mode: GraphMode, config: EngineConfig) -> Self {
        match mode {
            GraphMode::Coordinate => SessionGraph::Coordinate(CoordinateEngine::with_config(config)),
            GraphMode::Named => SessionGraph::Named(NamedEngine::with_config(config)),
        }
    }

    pub fn mode(&self) -> GraphMode {
        match self {
            SessionGraph::Coordinate(_) => GraphMode::Coordinate,
            SessionGraph::Named(_) => GraphMode::Named,
        }
    }

    pub fn vertex_count(&self) -> usize {
        match self {
            SessionGraph::Coordinate(e) => e.graph().vertex_count(),
            SessionGraph::Named(e) => e.graph().vertex_count(),
        }
    }

    pub fn edge_count(&self) -> usize {
        match self {
            SessionGraph::Coordinate(e) => e.graph().edge_count(),
            SessionGraph::Named(e) => e.graph().edge_count(),
        }
    }

    pub fn config(&self) -> EngineConfig {
        match self {
            SessionGraph::Coordinate(e) => *e.config(),
            SessionGraph::Named(e) => *e.config(),
        }
    }

    /// Inserts all edges or none: every edge is converted before the first insertion
    pub fn add_edges(&mut self, edges: Vec<WebEdge>) -> Result<usize> {
        let count = edges.len();
        match self {
            SessionGraph::Coordinate(engine) => {
                let converted = edges
                    .into_iter()
                    .map(|e| -> Result<_> {
                        let w = OrderedFloat(e.weight);
                        if !w.is_admissible() {
                            return Err(Error::InvalidWeight(format!("{}", e.weight)));
                        }
                        Ok((e.a.into_coord()?, e.b.into_coord()?, w))
                    })
                    .collect::<Result<Vec<_>>>()?;
                for (a, b, w) in converted {
                    engine.add_edge(a, b, w)?;
                }
            }
            SessionGraph::Named(engine) => {
                let converted = edges
                    .into_iter()
                    .map(|e| -> Result<_> {
                        Ok((e.a.into_name()?, e.b.into_name()?, integer_weight(e.weight)?))
                    })
                    .collect::<Result<Vec<_>>>()?;
                for (a, b, w) in converted {
                    engine.add_edge(a, b, w)?;
                }
            }
        }
        Ok(count)
    }

    pub fn add_polyline(&mut self, points: &[Coord], metric: SegmentMetric) -> Result<usize> {
        match self {
            SessionGraph::Coordinate(engine) => {
                engine.add_polyline(points, |a, b| OrderedFloat(metric.measure(a, b)))
            }
            SessionGraph::Named(_) => Err(Error::ModeMismatch(
                "polylines need a coordinate graph".to_string(),
            )),
        }
    }

    pub fn find_path(&self, source: WebVertex, target: WebVertex) -> Result<PathResponse> {
        match self {
            SessionGraph::Coordinate(engine) => {
                let result = engine.find_path(&source.into_coord()?, &target.into_coord()?)?;
                Ok(PathResponse::from_result(result))
            }
            SessionGraph::Named(engine) => {
                let result = engine.find_path(&source.into_name()?, &target.into_name()?)?;
                Ok(PathResponse::from_result(result))
            }
        }
    }

    pub fn find_all_distances(&self, source: WebVertex) -> Result<DistancesResponse> {
        match self {
            SessionGraph::Coordinate(engine) => {
                let table = engine.find_all_distances(&source.into_coord()?)?;
                Ok(DistancesResponse::from_table(&table))
            }
            SessionGraph::Named(engine) => {
                let table = engine.find_all_distances(&source.into_name()?)?;
                Ok(DistancesResponse::from_table(&table))
            }
        }
    }

    pub fn find_path_between_points(&self, from: &Coord, to: &Coord) -> Result<PathResponse> {
        match self {
            SessionGraph::Coordinate(engine) => {
                let result = engine.find_path_between_points(from, to)?;
                Ok(PathResponse::from_result(result))
            }
            SessionGraph::Named(_) => Err(Error::ModeMismatch(
                "point queries need a coordinate graph".to_string(),
            )),
        }
    }
}

/// Session containing one graph engine
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub graph: SessionGraph,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(mode: GraphMode, config: EngineConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            graph: SessionGraph::new(mode, config),
            created_at: Utc::now(),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            mode: self.graph.mode(),
            unknown_vertex: self.graph.config().unknown_vertex,
            vertex_count: self.graph.vertex_count(),
            edge_count: self.graph.edge_count(),
            created_at: self.created_at,
        }
    }
}

/// Public view of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub mode: GraphMode,
    pub unknown_vertex: UnknownVertexPolicy,
    pub vertex_count: usize,
    pub edge_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Parameters for graph creation
#[derive(Debug, Deserialize)]
pub struct CreateGraphRequest {
    pub mode: GraphMode,
    #[serde(default)]
    pub unknown_vertex: UnknownVertexPolicy,
}

/// An edge in a request body
#[derive(Debug, Clone, Deserialize)]
pub struct WebEdge {
    pub a: WebVertex,
    pub b: WebVertex,
    pub weight: f64,
}

#[derive(Debug, Deserialize)]
pub struct AddEdgesRequest {
    pub edges: Vec<WebEdge>,
}

/// How the length of a polyline segment is measured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentMetric {
    /// Great-circle metres
    #[default]
    Haversine,
    /// Planar degrees
    Euclidean,
}

impl SegmentMetric {
    pub fn measure(self, a: &Coord, b: &Coord) -> f64 {
        match self {
            SegmentMetric::Haversine => haversine_m(a, b),
            SegmentMetric::Euclidean => euclidean(a, b),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddPolylineRequest {
    pub points: Vec<Coord>,
    #[serde(default)]
    pub metric: SegmentMetric,
}

/// Response after a mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResponse {
    pub added: usize,
    pub vertex_count: usize,
    pub edge_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct PathRequest {
    pub source: WebVertex,
    pub target: WebVertex,
}

/// Single-target result: `distance` is -1 and `path` empty when unreachable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathResponse {
    pub distance: f64,
    pub path: Vec<WebVertex>,
}

impl PathResponse {
    pub fn from_result<K, W>(result: PathResult<K, W>) -> Self
    where
        K: VertexKey + Into<WebVertex>,
        W: Weight,
    {
        let (distance, path) = result.to_sentinel();
        PathResponse {
            distance,
            path: path.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DistancesRequest {
    pub source: WebVertex,
}

/// One vertex of an all-distances result; `distance` is null when unreached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceEntry {
    pub vertex: WebVertex,
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistancesResponse {
    pub source: WebVertex,
    pub reached: usize,
    pub distances: Vec<DistanceEntry>,
}

impl DistancesResponse {
    pub fn from_table<K, W>(table: &DistanceTable<K, W>) -> Self
    where
        K: VertexKey + Into<WebVertex>,
        W: Weight,
    {
        DistancesResponse {
            source: table.source().clone().into(),
            reached: table.reached_count(),
            distances: table
                .iter()
                .map(|(k, d)| DistanceEntry {
                    vertex: k.clone().into(),
                    distance: d.value().map(Weight::as_f64),
                })
                .collect(),
        }
    }
}

/// Query string of the point-to-point endpoint
#[derive(Debug, Deserialize)]
pub struct PointPathQuery {
    pub source_lat: f64,
    pub source_lng: f64,
    pub dest_lat: f64,
    pub dest_lng: f64,
}

/// Error response for API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}
