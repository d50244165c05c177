pub mod dijkstra;
pub mod result;
pub mod traits;

pub use result::{Distance, DistanceTable, PathResult, SearchStats};
pub use traits::ShortestPathAlgorithm;
