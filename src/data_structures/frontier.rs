use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt::Debug;

/// Min-priority frontier of `(tentative distance, vertex)` pairs
///
/// Entries are never decreased in place: a better distance is pushed as a
/// new entry and the superseded one is left behind. Callers skip such stale
/// entries when they pop them.
#[derive(Debug)]
pub struct Frontier<V, P>
where
    V: Copy + Ord + Debug,
    P: Copy + Ord + Debug,
{
    /// The underlying binary heap
    heap: BinaryHeap<Reverse<(P, V)>>,

    /// Total number of pushes since creation
    pushes: usize,
}

impl<V, P> Default for Frontier<V, P>
where
    V: Copy + Ord + Debug,
    P: Copy + Ord + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, P> Frontier<V, P>
where
    V: Copy + Ord + Debug,
    P: Copy + Ord + Debug,
{
    /// Creates a new empty frontier
    pub fn new() -> Self {
        Frontier {
            heap: BinaryHeap::new(),
            pushes: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of entries currently queued, stale ones included
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn pushes(&self) -> usize {
        self.pushes
    }

    /// Queues `vertex` with the given tentative distance
    pub fn push(&mut self, vertex: V, priority: P) {
        self.heap.push(Reverse((priority, vertex)));
        self.pushes += 1;
    }

    /// Removes the entry with the smallest priority
    pub fn pop(&mut self) -> Option<(V, P)> {
        self.heap.pop().map(|Reverse((priority, vertex))| (vertex, priority))
    }

    /// Returns the entry with the smallest priority without removing it
    pub fn peek(&self) -> Option<(V, P)> {
        self.heap.peek().map(|Reverse((priority, vertex))| (*vertex, *priority))
    }
}
