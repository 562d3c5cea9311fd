//! MazeMind Graph - undirected graphs and spanning-tree algorithms
//!
//! Nodes and edges live in an arena owned by [`Graph`] and are addressed by
//! copyable ids. Edge lookup by node pair uses an order-independent
//! [`EdgeKey`] built from node identities, so two distinct pairs can never
//! share a key.

pub mod error;
pub mod graph;
pub mod grid;
pub mod paths;

pub use error::GraphError;
pub use graph::{EdgeId, EdgeKey, Graph, GraphEdge, GraphNode, NodeId};
pub use grid::GridGraph;
pub use paths::TreePaths;
