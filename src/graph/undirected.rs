use crate::graph::geo::haversine_m;
use crate::graph::traits::{VertexKey, Weight};
use crate::graph::Coord;
use crate::{Error, Result};
use std::collections::HashMap;

/// An undirected weighted graph using adjacency lists
///
/// Keys are interned to dense indices on first sight. Every edge insertion
/// appends one adjacency entry per endpoint, so the structure is always
/// symmetric. Parallel edges accumulate as separate entries.
#[derive(Debug, Clone)]
pub struct UndirectedGraph<K, W>
where
    K: VertexKey,
    W: Weight,
{
    /// Vertex keys in insertion order: index -> key
    keys: Vec<K>,

    /// Reverse lookup: key -> index
    index: HashMap<K, usize>,

    /// Adjacency for each vertex: index -> [(neighbor index, weight)]
    adjacency: Vec<Vec<(usize, W)>>,

    /// Number of `add_edge` calls that succeeded
    edge_count: usize,
}

impl<K, W> Default for UndirectedGraph<K, W>
where
    K: VertexKey,
    W: Weight,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, W> UndirectedGraph<K, W>
where
    K: VertexKey,
    W: Weight,
{
    /// Creates a new empty graph
    pub fn new() -> Self {
        UndirectedGraph {
            keys: Vec::new(),
            index: HashMap::new(),
            adjacency: Vec::new(),
            edge_count: 0,
        }
    }

    /// Creates a new empty graph with room for the given number of vertices
    pub fn with_capacity(vertices: usize) -> Self {
        UndirectedGraph {
            keys: Vec::with_capacity(vertices),
            index: HashMap::with_capacity(vertices),
            adjacency: Vec::with_capacity(vertices),
            edge_count: 0,
        }
    }

    /// Returns the index of `key`, registering it as a new vertex if needed
    fn intern(&mut self, key: K) -> usize {
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = self.keys.len();
        self.index.insert(key.clone(), id);
        self.keys.push(key);
        self.adjacency.push(Vec::new());
        id
    }

    /// Registers an isolated vertex. Returns false if it was already known.
    pub fn add_vertex(&mut self, key: K) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        self.intern(key);
        true
    }

    /// Adds an undirected edge between `a` and `b`
    ///
    /// Appends `(b, weight)` to the adjacency of `a` and `(a, weight)` to the
    /// adjacency of `b`, creating either vertex on first use. A self edge
    /// therefore lands twice on the same list. Negative or non-finite
    /// weights are rejected before anything is inserted.
    pub fn add_edge(&mut self, a: K, b: K, weight: W) -> Result<()> {
        if !weight.is_admissible() {
            return Err(Error::InvalidWeight(format!(
                "{:?} between {:?} and {:?}",
                weight, a, b
            )));
        }

        let u = self.intern(a);
        let v = self.intern(b);
        self.adjacency[u].push((v, weight));
        self.adjacency[v].push((u, weight));
        self.edge_count += 1;
        Ok(())
    }

    /// Adds an edge between every consecutive pair of `points`
    ///
    /// The weight of each segment is computed by `weight_of`. Returns the
    /// number of edges added; fewer than two points add nothing. All
    /// segment weights are checked before the first insertion.
    pub fn add_polyline<F>(&mut self, points: &[K], mut weight_of: F) -> Result<usize>
    where
        F: FnMut(&K, &K) -> W,
    {
        let segments: Vec<W> = points
            .windows(2)
            .map(|pair| weight_of(&pair[0], &pair[1]))
            .collect();

        if let Some((i, w)) = segments.iter().enumerate().find(|(_, w)| !w.is_admissible()) {
            return Err(Error::InvalidWeight(format!(
                "{:?} on segment {} of polyline",
                w, i
            )));
        }

        for (pair, weight) in points.windows(2).zip(segments.iter()) {
            self.add_edge(pair[0].clone(), pair[1].clone(), *weight)?;
        }
        Ok(segments.len())
    }

    /// Returns the number of vertices in the graph
    pub fn vertex_count(&self) -> usize {
        self.keys.len()
    }

    /// Returns the number of undirected edges inserted (parallel edges counted separately)
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns true if the vertex exists in the graph
    pub fn contains_vertex(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Iterates over all vertex keys in insertion order
    pub fn vertices(&self) -> impl Iterator<Item = &K> + '_ {
        self.keys.iter()
    }

    /// Returns the adjacency entries of `key` in insertion order
    pub fn neighbors<'a>(&'a self, key: &K) -> impl Iterator<Item = (&'a K, W)> + 'a {
        let entries = match self.index.get(key) {
            Some(&id) => self.adjacency[id].as_slice(),
            None => &[][..],
        };
        entries.iter().map(move |&(v, w)| (&self.keys[v], w))
    }

    /// Number of adjacency entries of `key` (0 for unknown vertices)
    pub fn degree(&self, key: &K) -> usize {
        self.index.get(key).map_or(0, |&id| self.adjacency[id].len())
    }

    // Index-level access for the search algorithms

    pub(crate) fn index_of(&self, key: &K) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub(crate) fn key_at(&self, id: usize) -> &K {
        &self.keys[id]
    }

    pub(crate) fn adjacency_at(&self, id: usize) -> &[(usize, W)] {
        &self.adjacency[id]
    }
}

impl<W> UndirectedGraph<Coord, W>
where
    W: Weight,
{
    /// Finds the vertex closest to `point` by great-circle distance
    ///
    /// Ties keep the vertex inserted first. Returns `None` for an empty graph.
    pub fn nearest_vertex(&self, point: &Coord) -> Option<&Coord> {
        let mut best: Option<(&Coord, f64)> = None;
        for candidate in &self.keys {
            let d = haversine_m(point, candidate);
            match best {
                Some((_, best_d)) if best_d <= d => {}
                _ => best = Some((candidate, d)),
            }
        }
        best.map(|(c, _)| c)
    }
}
