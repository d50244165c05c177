pub mod coord;
pub mod generators;
pub mod geo;
pub mod traits;
pub mod undirected;

pub use coord::Coord;
pub use traits::{VertexKey, Weight};
pub use undirected::UndirectedGraph;
