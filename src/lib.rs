//! Geo SSSP - Dijkstra shortest paths on undirected weighted graphs
//!
//! Vertices are either geographic coordinates ([`Coord`]) or opaque string
//! identifiers. Callers build a graph by adding weighted edges to a
//! [`ShortestPathEngine`] and then ask for the shortest path between two
//! vertices or for the distance from one source to every known vertex.
//!
//! Edge weights must be non-negative; inadmissible weights are rejected at
//! insertion time.

pub mod algorithm;
pub mod data_structures;
pub mod engine;
pub mod graph;
pub mod web;

pub use algorithm::{
    dijkstra::Dijkstra, Distance, DistanceTable, PathResult, SearchStats, ShortestPathAlgorithm,
};
/// Re-export main types for convenient use
pub use engine::{CoordinateEngine, EngineConfig, NamedEngine, ShortestPathEngine, UnknownVertexPolicy};
pub use graph::{Coord, UndirectedGraph, VertexKey, Weight};

/// Error types for the library
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Vertex not found in graph: {0}")]
    VertexNotFound(String),

    #[error("Invalid edge weight: {0}")]
    InvalidWeight(String),

    #[error("Coordinate components must be finite: ({lat}, {lng})")]
    NonFiniteCoordinate { lat: f64, lng: f64 },

    #[error("Path distance overflows the weight type: {0}")]
    DistanceOverflow(String),

    #[error("Graph mode mismatch: {0}")]
    ModeMismatch(String),

    #[error("Algorithm execution error: {0}")]
    AlgorithmError(String),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, Error>;
