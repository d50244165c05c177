//! The engine object handed to callers: owns one graph for its whole
//! lifetime and answers queries against it.

use log::debug;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::algorithm::{Distance, DistanceTable, PathResult, ShortestPathAlgorithm};
use crate::graph::{Coord, UndirectedGraph, VertexKey, Weight};
use crate::{Dijkstra, Error, Result};

/// What a query does when it names a vertex that was never inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownVertexPolicy {
    /// Fail with [`Error::VertexNotFound`]
    #[default]
    Error,
    /// Treat the vertex as disconnected from everything
    Unreachable,
}

/// Configuration for a [`ShortestPathEngine`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub unknown_vertex: UnknownVertexPolicy,
}

/// Engine over coordinate vertices with real-valued weights
pub type CoordinateEngine = ShortestPathEngine<Coord, OrderedFloat<f64>>;

/// Engine over text identifiers with integer weights
pub type NamedEngine = ShortestPathEngine<String, u64>;

/// Owns a graph and runs shortest path queries on it
///
/// The caller controls the whole lifecycle: create, add edges, query, drop.
/// Queries take `&self`, so a fully built engine can be shared read-only
/// across threads; mutation requires exclusive access.
#[derive(Debug, Clone)]
pub struct ShortestPathEngine<K, W, A = Dijkstra>
where
    K: VertexKey,
    W: Weight,
    A: ShortestPathAlgorithm<K, W>,
{
    graph: UndirectedGraph<K, W>,
    algorithm: A,
    config: EngineConfig,
}

impl<K, W> Default for ShortestPathEngine<K, W, Dijkstra>
where
    K: VertexKey,
    W: Weight,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, W> ShortestPathEngine<K, W, Dijkstra>
where
    K: VertexKey,
    W: Weight,
{
    /// Creates an engine with an empty graph and default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_algorithm(Dijkstra::new(), config)
    }
}

impl<K, W, A> ShortestPathEngine<K, W, A>
where
    K: VertexKey,
    W: Weight,
    A: ShortestPathAlgorithm<K, W>,
{
    pub fn with_algorithm(algorithm: A, config: EngineConfig) -> Self {
        ShortestPathEngine {
            graph: UndirectedGraph::new(),
            algorithm,
            config,
        }
    }

    /// Wraps an already built graph
    pub fn from_graph(graph: UndirectedGraph<K, W>, algorithm: A, config: EngineConfig) -> Self {
        ShortestPathEngine {
            graph,
            algorithm,
            config,
        }
    }

    pub fn graph(&self) -> &UndirectedGraph<K, W> {
        &self.graph
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn algorithm_name(&self) -> &'static str {
        self.algorithm.name()
    }

    /// Adds an undirected edge; see [`UndirectedGraph::add_edge`]
    pub fn add_edge(&mut self, a: K, b: K, weight: W) -> Result<()> {
        self.graph.add_edge(a, b, weight)
    }

    pub fn add_vertex(&mut self, key: K) -> bool {
        self.graph.add_vertex(key)
    }

    /// Adds one edge per consecutive pair of `points`; see [`UndirectedGraph::add_polyline`]
    pub fn add_polyline<F>(&mut self, points: &[K], weight_of: F) -> Result<usize>
    where
        F: FnMut(&K, &K) -> W,
    {
        self.graph.add_polyline(points, weight_of)
    }

    /// Returns true when `key` is unknown and the policy says to treat it as unreachable.
    /// Fails when the policy says unknown vertices are errors.
    fn tolerate_unknown(&self, key: &K) -> Result<bool> {
        if self.graph.contains_vertex(key) {
            return Ok(false);
        }
        match self.config.unknown_vertex {
            UnknownVertexPolicy::Error => Err(Error::VertexNotFound(format!("{:?}", key))),
            UnknownVertexPolicy::Unreachable => {
                debug!("treating unknown vertex {:?} as unreachable", key);
                Ok(true)
            }
        }
    }

    /// Shortest path between two vertices
    pub fn find_path(&self, source: &K, target: &K) -> Result<PathResult<K, W>> {
        let unknown_source = self.tolerate_unknown(source)?;
        let unknown_target = self.tolerate_unknown(target)?;
        if unknown_source || unknown_target {
            return Ok(PathResult::Unreachable);
        }
        self.algorithm.find_path(&self.graph, source, target)
    }

    /// Distance from `source` to every vertex of the graph
    ///
    /// An unknown source under [`UnknownVertexPolicy::Unreachable`] yields a
    /// table with every vertex unreached.
    pub fn find_all_distances(&self, source: &K) -> Result<DistanceTable<K, W>> {
        if self.tolerate_unknown(source)? {
            let entries = self
                .graph
                .vertices()
                .map(|k| (k.clone(), Distance::Unreached))
                .collect();
            return Ok(DistanceTable::new(source.clone(), entries));
        }
        self.algorithm.find_all_distances(&self.graph, source)
    }
}

impl<K, W, A> ShortestPathEngine<K, W, A>
where
    K: VertexKey + Send + Sync,
    W: Weight + Send + Sync,
    A: ShortestPathAlgorithm<K, W> + Sync,
{
    /// Runs one all-distances query per source in parallel
    ///
    /// Results keep the order of `sources`. A single failing source fails the
    /// whole batch: under [`UnknownVertexPolicy::Error`] one unknown source
    /// among valid ones returns `Err` and no tables. When several sources
    /// fail, which error is returned is unspecified because sources run in
    /// parallel.
    pub fn find_all_distances_batch(&self, sources: &[K]) -> Result<Vec<DistanceTable<K, W>>> {
        sources
            .par_iter()
            .map(|source| self.find_all_distances(source))
            .collect()
    }
}

impl<W, A> ShortestPathEngine<Coord, W, A>
where
    W: Weight,
    A: ShortestPathAlgorithm<Coord, W>,
{
    /// The graph vertex closest to `point` by great-circle distance
    pub fn nearest_vertex(&self, point: &Coord) -> Option<Coord> {
        self.graph.nearest_vertex(point).copied()
    }

    /// Snaps both points to their nearest vertices and finds the path between those
    pub fn find_path_between_points(&self, from: &Coord, to: &Coord) -> Result<PathResult<Coord, W>> {
        let source = self
            .nearest_vertex(from)
            .ok_or_else(|| Error::VertexNotFound(format!("no vertex near {}", from)))?;
        let target = self
            .nearest_vertex(to)
            .ok_or_else(|| Error::VertexNotFound(format!("no vertex near {}", to)))?;
        debug!("snapped {} -> {} and {} -> {}", from, source, to, target);
        self.find_path(&source, &target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coord {
        Coord::new(lat, lng).unwrap()
    }

    #[test]
    fn test_default_policy_rejects_unknown_vertices() {
        let mut engine = NamedEngine::new();
        engine.add_edge("A".into(), "B".into(), 1).unwrap();
        assert!(matches!(
            engine.find_path(&"A".into(), &"Z".into()),
            Err(Error::VertexNotFound(_))
        ));
        assert!(matches!(
            engine.find_all_distances(&"Z".into()),
            Err(Error::VertexNotFound(_))
        ));
    }

    #[test]
    fn test_unreachable_policy_is_silent() {
        let mut engine = NamedEngine::with_config(EngineConfig {
            unknown_vertex: UnknownVertexPolicy::Unreachable,
        });
        engine.add_edge("A".into(), "B".into(), 1).unwrap();

        let result = engine.find_path(&"A".into(), &"Z".into()).unwrap();
        assert_eq!(result.to_sentinel(), (-1.0, vec![]));

        let table = engine.find_all_distances(&"Z".into()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.reached_count(), 0);
    }

    #[test]
    fn test_batch_matches_single_queries() {
        let mut engine = NamedEngine::new();
        engine.add_edge("A".into(), "B".into(), 2).unwrap();
        engine.add_edge("B".into(), "C".into(), 3).unwrap();
        engine.add_vertex("D".into());

        let sources: Vec<String> = vec!["A".into(), "C".into(), "D".into()];
        let batch = engine.find_all_distances_batch(&sources).unwrap();
        assert_eq!(batch.len(), 3);
        for (source, table) in sources.iter().zip(&batch) {
            assert_eq!(table.source(), source);
            let single = engine.find_all_distances(source).unwrap();
            let a: Vec<_> = single.iter().collect();
            let b: Vec<_> = table.iter().collect();
            assert_eq!(a, b);
        }
        assert!(engine.find_all_distances_batch(&["nope".to_string()]).is_err());
    }

    #[test]
    fn test_unknown_source_fails_whole_batch() {
        let sources: Vec<String> = vec!["A".into(), "nope".into(), "B".into()];

        let mut strict = NamedEngine::new();
        strict.add_edge("A".into(), "B".into(), 2).unwrap();
        assert!(matches!(
            strict.find_all_distances_batch(&sources),
            Err(Error::VertexNotFound(key)) if key.contains("nope")
        ));

        let mut lenient = NamedEngine::with_config(EngineConfig {
            unknown_vertex: UnknownVertexPolicy::Unreachable,
        });
        lenient.add_edge("A".into(), "B".into(), 2).unwrap();
        let batch = lenient.find_all_distances_batch(&sources).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[1].reached_count(), 0);
        assert_eq!(batch[2].reached_count(), 2);
    }

    #[test]
    fn test_find_path_between_points_snaps() {
        let mut engine = CoordinateEngine::new();
        assert!(engine.find_path_between_points(&c(0.0, 0.0), &c(1.0, 1.0)).is_err());

        engine.add_edge(c(18.50, 73.80), c(18.51, 73.80), OrderedFloat(1.0)).unwrap();
        engine.add_edge(c(18.51, 73.80), c(18.52, 73.80), OrderedFloat(1.0)).unwrap();

        let result = engine
            .find_path_between_points(&c(18.4999, 73.8001), &c(18.5203, 73.7999))
            .unwrap();
        assert_eq!(result.distance(), Some(OrderedFloat(2.0)));
        assert_eq!(
            result.path(),
            &[c(18.50, 73.80), c(18.51, 73.80), c(18.52, 73.80)]
        );
    }
}
