use crate::algorithm::{DistanceTable, PathResult, SearchStats};
use crate::graph::{UndirectedGraph, VertexKey, Weight};
use crate::Result;

/// Trait for single-source shortest path algorithms over an [`UndirectedGraph`]
///
/// Implementations fail with [`Error::VertexNotFound`](crate::Error::VertexNotFound)
/// when a query vertex was never inserted into the graph.
pub trait ShortestPathAlgorithm<K, W>
where
    K: VertexKey,
    W: Weight,
{
    /// Get the name of the algorithm
    fn name(&self) -> &'static str;

    /// Shortest path from `source` to `target`, with search counters
    fn find_path_with_stats(
        &self,
        graph: &UndirectedGraph<K, W>,
        source: &K,
        target: &K,
    ) -> Result<(PathResult<K, W>, SearchStats)>;

    /// Distance from `source` to every vertex of the graph, with search counters
    fn find_all_distances_with_stats(
        &self,
        graph: &UndirectedGraph<K, W>,
        source: &K,
    ) -> Result<(DistanceTable<K, W>, SearchStats)>;

    /// Shortest path from `source` to `target`
    fn find_path(
        &self,
        graph: &UndirectedGraph<K, W>,
        source: &K,
        target: &K,
    ) -> Result<PathResult<K, W>> {
        self.find_path_with_stats(graph, source, target)
            .map(|(result, _)| result)
    }

    /// Distance from `source` to every vertex of the graph
    fn find_all_distances(
        &self,
        graph: &UndirectedGraph<K, W>,
        source: &K,
    ) -> Result<DistanceTable<K, W>> {
        self.find_all_distances_with_stats(graph, source)
            .map(|(table, _)| table)
    }
}
