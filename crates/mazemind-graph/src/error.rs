use crate::graph::{EdgeId, NodeId};

/// Errors raised by graph operations that would otherwise corrupt the graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("node {0} is not registered in this graph")]
    UnknownNode(NodeId),

    #[error("edge {0} is not registered in this graph")]
    UnknownEdge(EdgeId),

    #[error("refusing to create a self-loop on node {0}")]
    SelfLoop(NodeId),

    #[error("an edge between {0} and {1} already exists ({2})")]
    DuplicateEdge(NodeId, NodeId, EdgeId),

    #[error("graph dimensions must be non-zero (got {width}x{height})")]
    EmptyGrid { width: u32, height: u32 },

    #[error("a {width}x{height} grid has more cells than a graph can address")]
    GridTooLarge { width: u32, height: u32 },

    #[error("graph has run out of node or edge ids")]
    CapacityExceeded,
}
