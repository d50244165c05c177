use log::debug;

use crate::algorithm::{Distance, DistanceTable, PathResult, SearchStats, ShortestPathAlgorithm};
use crate::data_structures::Frontier;
use crate::graph::{UndirectedGraph, VertexKey, Weight};
use crate::{Error, Result};

/// Classic Dijkstra's algorithm with a lazily-cleaned binary heap
#[derive(Debug, Default, Clone, Copy)]
pub struct Dijkstra;

/// Per-query working state: distance and parent per vertex index.
/// `None` distance means not reached yet. `overflowed` marks vertices that
/// were offered a distance outside the weight domain.
struct Search<W> {
    distances: Vec<Option<W>>,
    parents: Option<Vec<Option<usize>>>,
    overflowed: Vec<bool>,
    stats: SearchStats,
}

impl<W: Weight> Search<W> {
    /// A vertex left unreached only because its distance overflowed
    fn overflow_at(&self, v: usize) -> bool {
        self.distances[v].is_none() && self.overflowed[v]
    }
}

impl Dijkstra {
    /// Creates a new Dijkstra algorithm instance
    pub fn new() -> Self {
        Dijkstra
    }

    fn resolve<K, W>(graph: &UndirectedGraph<K, W>, key: &K) -> Result<usize>
    where
        K: VertexKey,
        W: Weight,
    {
        graph
            .index_of(key)
            .ok_or_else(|| Error::VertexNotFound(format!("{:?}", key)))
    }

    /// Runs the relaxation loop from `source` until the frontier empties or
    /// `target` is popped
    fn run<K, W>(
        graph: &UndirectedGraph<K, W>,
        source: usize,
        target: Option<usize>,
        track_parents: bool,
    ) -> Search<W>
    where
        K: VertexKey,
        W: Weight,
    {
        let n = graph.vertex_count();
        let mut distances: Vec<Option<W>> = vec![None; n];
        let mut parents = track_parents.then(|| vec![None; n]);
        let mut overflowed = vec![false; n];
        let mut stats = SearchStats::default();

        distances[source] = Some(W::zero());

        let mut frontier = Frontier::new();
        frontier.push(source, W::zero());

        while let Some((u, dist_u)) = frontier.pop() {
            // Superseded by a shorter entry pushed later
            if matches!(distances[u], Some(best) if best < dist_u) {
                stats.stale += 1;
                continue;
            }
            stats.settled += 1;

            if Some(u) == target {
                break;
            }

            for &(v, weight) in graph.adjacency_at(u) {
                stats.relaxed += 1;
                let candidate = match dist_u.accumulate(weight) {
                    Some(candidate) => candidate,
                    None => {
                        // Cannot beat a distance that fits; only matters if v
                        // is never reached another way
                        if distances[v].is_none() {
                            overflowed[v] = true;
                        }
                        continue;
                    }
                };

                let improves = match distances[v] {
                    None => true,
                    Some(current) => candidate < current,
                };

                if improves {
                    distances[v] = Some(candidate);
                    if let Some(parents) = parents.as_mut() {
                        parents[v] = Some(u);
                    }
                    frontier.push(v, candidate);
                }
            }
        }

        stats.pushes = frontier.pushes();
        Search {
            distances,
            parents,
            overflowed,
            stats,
        }
    }

    /// Walks parent pointers back from `target` and returns the keys in
    /// source-to-target order
    fn reconstruct<K, W>(
        graph: &UndirectedGraph<K, W>,
        parents: &[Option<usize>],
        source: usize,
        target: usize,
    ) -> Result<Vec<K>>
    where
        K: VertexKey,
        W: Weight,
    {
        let mut path = Vec::new();
        let mut at = target;
        while at != source {
            if path.len() > parents.len() {
                return Err(Error::AlgorithmError(
                    "cycle in parent pointers".to_string(),
                ));
            }
            path.push(graph.key_at(at).clone());
            at = parents[at].ok_or_else(|| {
                Error::AlgorithmError(format!(
                    "broken parent chain at {:?}",
                    graph.key_at(at)
                ))
            })?;
        }
        path.push(graph.key_at(source).clone());
        path.reverse();
        Ok(path)
    }
}

impl<K, W> ShortestPathAlgorithm<K, W> for Dijkstra
where
    K: VertexKey,
    W: Weight,
{
    fn name(&self) -> &'static str {
        "Dijkstra"
    }

    fn find_path_with_stats(
        &self,
        graph: &UndirectedGraph<K, W>,
        source: &K,
        target: &K,
    ) -> Result<(PathResult<K, W>, SearchStats)> {
        let s = Self::resolve(graph, source)?;
        let t = Self::resolve(graph, target)?;

        let search = Self::run(graph, s, Some(t), true);
        debug!(
            "dijkstra {:?} -> {:?}: settled={} relaxed={} pushes={} stale={}",
            source,
            target,
            search.stats.settled,
            search.stats.relaxed,
            search.stats.pushes,
            search.stats.stale
        );

        if search.overflow_at(t) {
            return Err(Error::DistanceOverflow(format!(
                "distance from {:?} to {:?}",
                source, target
            )));
        }

        let result = match (search.distances[t], search.parents.as_deref()) {
            (Some(distance), Some(parents)) => PathResult::Reached {
                distance,
                path: Self::reconstruct(graph, parents, s, t)?,
            },
            _ => PathResult::Unreachable,
        };
        Ok((result, search.stats))
    }

    fn find_all_distances_with_stats(
        &self,
        graph: &UndirectedGraph<K, W>,
        source: &K,
    ) -> Result<(DistanceTable<K, W>, SearchStats)> {
        let s = Self::resolve(graph, source)?;

        let search = Self::run(graph, s, None, false);
        debug!(
            "dijkstra all from {:?}: settled={} relaxed={} pushes={} stale={}",
            source,
            search.stats.settled,
            search.stats.relaxed,
            search.stats.pushes,
            search.stats.stale
        );

        if let Some(v) = (0..graph.vertex_count()).find(|&v| search.overflow_at(v)) {
            return Err(Error::DistanceOverflow(format!(
                "distance from {:?} to {:?}",
                source,
                graph.key_at(v)
            )));
        }

        let entries = graph
            .vertices()
            .cloned()
            .zip(search.distances.into_iter().map(Distance::from))
            .collect();
        Ok((DistanceTable::new(source.clone(), entries), search.stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordered_float::OrderedFloat;

    fn named(edges: &[(&str, &str, u64)]) -> UndirectedGraph<String, u64> {
        let mut g = UndirectedGraph::new();
        for &(a, b, w) in edges {
            g.add_edge(a.to_string(), b.to_string(), w).unwrap();
        }
        g
    }

    fn key(s: &str) -> String {
        s.to_string()
    }

    #[test]
    fn test_prefers_cheaper_detour() {
        let g = named(&[("A", "B", 1), ("B", "C", 2), ("A", "C", 5)]);
        let result = Dijkstra::new().find_path(&g, &key("A"), &key("C")).unwrap();
        assert_eq!(result.distance(), Some(3));
        assert_eq!(result.path(), &["A", "B", "C"]);
    }

    #[test]
    fn test_source_equals_target() {
        let g = named(&[("A", "B", 1)]);
        let (result, stats) = Dijkstra::new()
            .find_path_with_stats(&g, &key("A"), &key("A"))
            .unwrap();
        assert_eq!(result.distance(), Some(0));
        assert_eq!(result.path(), &["A"]);
        // early exit before touching any adjacency
        assert_eq!(stats.relaxed, 0);
    }

    #[test]
    fn test_early_exit_settles_fewer_vertices() {
        // A chain where the target is the first hop
        let g = named(&[("A", "B", 1), ("B", "C", 1), ("C", "D", 1), ("D", "E", 1)]);
        let dijkstra = Dijkstra::new();
        let (_, single) = dijkstra
            .find_path_with_stats(&g, &key("A"), &key("B"))
            .unwrap();
        let (_, all) = dijkstra.find_all_distances_with_stats(&g, &key("A")).unwrap();
        assert_eq!(single.settled, 2);
        assert_eq!(all.settled, 5);
    }

    #[test]
    fn test_unknown_vertices_are_errors() {
        let g = named(&[("A", "B", 1)]);
        let dijkstra = Dijkstra::new();
        assert_eq!(
            dijkstra.find_path(&g, &key("X"), &key("A")).unwrap_err(),
            Error::VertexNotFound("\"X\"".to_string())
        );
        assert!(dijkstra.find_path(&g, &key("A"), &key("X")).is_err());
        assert!(dijkstra.find_all_distances(&g, &key("X")).is_err());
    }

    #[test]
    fn test_disconnected_target_is_unreachable() {
        let mut g = named(&[("A", "B", 1), ("C", "D", 1)]);
        g.add_vertex(key("E"));
        let dijkstra = Dijkstra::new();
        assert_eq!(
            dijkstra.find_path(&g, &key("A"), &key("D")).unwrap(),
            PathResult::Unreachable
        );
        assert_eq!(
            dijkstra.find_path(&g, &key("A"), &key("E")).unwrap(),
            PathResult::Unreachable
        );
    }

    #[test]
    fn test_all_distances_marks_unreached() {
        let g = named(&[("A", "B", 4), ("A", "C", 1), ("C", "B", 2), ("B", "D", 1), ("X", "Y", 1)]);
        let table = Dijkstra::new().find_all_distances(&g, &key("A")).unwrap();
        assert_eq!(table.len(), 6);
        assert_eq!(table.get(&key("A")), Some(Distance::Reached(0)));
        assert_eq!(table.get(&key("B")), Some(Distance::Reached(3)));
        assert_eq!(table.get(&key("C")), Some(Distance::Reached(1)));
        assert_eq!(table.get(&key("D")), Some(Distance::Reached(4)));
        assert_eq!(table.get(&key("X")), Some(Distance::Unreached));
        assert_eq!(table.get(&key("Y")), Some(Distance::Unreached));
    }

    #[test]
    fn test_parallel_edges_use_minimum() {
        let mut g: UndirectedGraph<String, OrderedFloat<f64>> = UndirectedGraph::new();
        g.add_edge(key("A"), key("B"), OrderedFloat(1.0)).unwrap();
        g.add_edge(key("A"), key("B"), OrderedFloat(1.0)).unwrap();
        g.add_edge(key("A"), key("B"), OrderedFloat(0.5)).unwrap();
        let result = Dijkstra::new().find_path(&g, &key("A"), &key("B")).unwrap();
        assert_eq!(result.distance(), Some(OrderedFloat(0.5)));
        assert_eq!(result.path(), &["A", "B"]);
    }

    #[test]
    fn test_zero_weight_cycle_terminates() {
        let g = named(&[("A", "B", 0), ("B", "C", 0), ("C", "A", 0), ("C", "D", 2), ("A", "A", 0)]);
        let result = Dijkstra::new().find_path(&g, &key("A"), &key("D")).unwrap();
        assert_eq!(result.distance(), Some(2));
        assert_eq!(result.path(), &["A", "C", "D"]);
    }

    #[test]
    fn test_integer_overflow_is_an_error() {
        let g = named(&[("A", "B", u64::MAX - 1), ("B", "C", 10)]);
        let dijkstra = Dijkstra::new();
        assert!(matches!(
            dijkstra.find_path(&g, &key("A"), &key("C")),
            Err(Error::DistanceOverflow(_))
        ));
        assert!(matches!(
            dijkstra.find_all_distances(&g, &key("A")),
            Err(Error::DistanceOverflow(_))
        ));
        let result = dijkstra.find_path(&g, &key("A"), &key("B")).unwrap();
        assert_eq!(result.distance(), Some(u64::MAX - 1));
    }

    #[test]
    fn test_overflowing_detour_is_ignored() {
        // B -> A overflows on the way back, C is still reached directly
        let g = named(&[("A", "B", u64::MAX - 1), ("A", "C", 5), ("B", "C", u64::MAX)]);
        let table = Dijkstra::new().find_all_distances(&g, &key("A")).unwrap();
        assert_eq!(table.get(&key("B")), Some(Distance::Reached(u64::MAX - 1)));
        assert_eq!(table.get(&key("C")), Some(Distance::Reached(5)));
    }

    #[test]
    fn test_stale_entries_are_skipped() {
        // B is first pushed at 10, then improved to 2 via C
        let g = named(&[("A", "B", 10), ("A", "C", 1), ("C", "B", 1)]);
        let (table, stats) = Dijkstra::new()
            .find_all_distances_with_stats(&g, &key("A"))
            .unwrap();
        assert_eq!(table.get(&key("B")), Some(Distance::Reached(2)));
        assert_eq!(stats.settled, 3);
        assert_eq!(stats.stale, 1);
        assert_eq!(stats.pushes, 4);
    }
}
