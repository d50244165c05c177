use crate::graph::{VertexKey, Weight};
use std::collections::HashMap;

/// Shortest known distance to a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distance<W> {
    Reached(W),
    Unreached,
}

impl<W: Weight> Distance<W> {
    pub fn is_reached(&self) -> bool {
        matches!(self, Distance::Reached(_))
    }

    /// Returns the distance if the vertex was reached
    pub fn value(self) -> Option<W> {
        match self {
            Distance::Reached(w) => Some(w),
            Distance::Unreached => None,
        }
    }
}

impl<W> From<Option<W>> for Distance<W> {
    fn from(value: Option<W>) -> Self {
        match value {
            Some(w) => Distance::Reached(w),
            None => Distance::Unreached,
        }
    }
}

/// Outcome of a single-target query
#[derive(Debug, Clone, PartialEq)]
pub enum PathResult<K, W> {
    /// The target was reached; `path` runs from source to target and
    /// includes both endpoints
    Reached { distance: W, path: Vec<K> },
    /// Source and target are in different components
    Unreachable,
}

impl<K: VertexKey, W: Weight> PathResult<K, W> {
    pub fn is_reachable(&self) -> bool {
        matches!(self, PathResult::Reached { .. })
    }

    pub fn distance(&self) -> Option<W> {
        match self {
            PathResult::Reached { distance, .. } => Some(*distance),
            PathResult::Unreachable => None,
        }
    }

    /// Vertices from source to target; empty when unreachable
    pub fn path(&self) -> &[K] {
        match self {
            PathResult::Reached { path, .. } => path.as_slice(),
            PathResult::Unreachable => &[],
        }
    }

    /// Converts to the boundary shape: `-1` and an empty path when unreachable
    pub fn to_sentinel(self) -> (f64, Vec<K>) {
        match self {
            PathResult::Reached { distance, path } => (distance.as_f64(), path),
            PathResult::Unreachable => (-1.0, Vec::new()),
        }
    }
}

/// Distance from one source to every vertex known to the graph
///
/// Entries keep the graph's vertex insertion order.
#[derive(Debug, Clone)]
pub struct DistanceTable<K, W>
where
    K: VertexKey,
    W: Weight,
{
    source: K,
    entries: Vec<(K, Distance<W>)>,
    index: HashMap<K, usize>,
}

impl<K, W> DistanceTable<K, W>
where
    K: VertexKey,
    W: Weight,
{
    pub(crate) fn new(source: K, entries: Vec<(K, Distance<W>)>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (k, _))| (k.clone(), i))
            .collect();
        DistanceTable {
            source,
            entries,
            index,
        }
    }

    pub fn source(&self) -> &K {
        &self.source
    }

    /// Distance to `vertex`, or `None` if the vertex is not in the graph
    pub fn get(&self, vertex: &K) -> Option<Distance<W>> {
        self.index.get(vertex).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, reached or not
    pub fn iter(&self) -> impl Iterator<Item = (&K, Distance<W>)> + '_ {
        self.entries.iter().map(|(k, d)| (k, *d))
    }

    /// Only the reached vertices with their distances
    pub fn reached(&self) -> impl Iterator<Item = (&K, W)> + '_ {
        self.entries
            .iter()
            .filter_map(|(k, d)| d.value().map(|w| (k, w)))
    }

    pub fn reached_count(&self) -> usize {
        self.entries.iter().filter(|(_, d)| d.is_reached()).count()
    }
}

/// Counters collected while a query runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Vertices popped with their final distance
    pub settled: usize,
    /// Adjacency entries examined
    pub relaxed: usize,
    /// Entries pushed onto the frontier
    pub pushes: usize,
    /// Superseded frontier entries that were popped and skipped
    pub stale: usize,
}
