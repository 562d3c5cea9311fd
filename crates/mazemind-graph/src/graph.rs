//! Arena-backed undirected graph with randomized Kruskal reduction

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use mazemind_core::GameRng;
use tracing::{debug, warn};

use crate::error::GraphError;

/// Handle to a node owned by a [`Graph`]. Identity only: two handles are the
/// same node iff they compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The arena slot of this node
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Handle to an edge owned by a [`Graph`]. Ids are never reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u32);

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Order-independent key for an unordered node pair.
///
/// The key stores both identities (smaller first) instead of mixing them into
/// a hash, so `EdgeKey::new(a, b) == EdgeKey::new(c, d)` iff `{a, b} == {c, d}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(NodeId, NodeId);

impl EdgeKey {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn nodes(&self) -> (NodeId, NodeId) {
        (self.0, self.1)
    }
}

/// A vertex: adjacency list, incident edges, and a bookkeeping weight
#[derive(Debug, Clone, Default)]
pub struct GraphNode {
    pub weight: i32,
    neighbors: Vec<NodeId>,
    edges: Vec<EdgeId>,
}

impl GraphNode {
    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }
}

/// An undirected edge between two registered nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub weight: i32,
    pub node1: NodeId,
    pub node2: NodeId,
}

impl GraphEdge {
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.node1, self.node2)
    }

    /// The endpoint that is not `node`, if `node` is an endpoint
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if node == self.node1 {
            Some(self.node2)
        } else if node == self.node2 {
            Some(self.node1)
        } else {
            None
        }
    }
}

/// Undirected graph owning its nodes and edges
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Node arena; removed nodes leave a `None` slot so ids stay stable
    nodes: Vec<Option<GraphNode>>,
    /// Edges keyed by id; ordered so iteration is deterministic
    edges: BTreeMap<EdgeId, GraphEdge>,
    /// Pair lookup
    pair_index: HashMap<EdgeKey, EdgeId>,
    next_edge: u32,
    live_nodes: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new node with weight 0
    pub fn add_node(&mut self) -> Result<NodeId, GraphError> {
        self.add_weighted_node(0)
    }

    /// Register a new node with the given weight
    pub fn add_weighted_node(&mut self, weight: i32) -> Result<NodeId, GraphError> {
        let index = u32::try_from(self.nodes.len()).map_err(|_| GraphError::CapacityExceeded)?;
        let id = NodeId(index);
        self.nodes.push(Some(GraphNode {
            weight,
            ..Default::default()
        }));
        self.live_nodes += 1;
        Ok(id)
    }

    /// Remove a node together with every edge incident to it
    pub fn remove_node(&mut self, node: NodeId) -> Result<GraphNode, GraphError> {
        let incident = self.node_checked(node)?.edges.clone();
        for edge in incident {
            self.remove_edge(edge);
        }
        let removed = self.nodes[node.0 as usize]
            .take()
            .ok_or(GraphError::UnknownNode(node))?;
        self.live_nodes -= 1;
        Ok(removed)
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    pub fn node(&self, node: NodeId) -> Option<&GraphNode> {
        self.nodes.get(node.0 as usize).and_then(Option::as_ref)
    }

    pub fn node_mut(&mut self, node: NodeId) -> Option<&mut GraphNode> {
        self.nodes.get_mut(node.0 as usize).and_then(Option::as_mut)
    }

    fn node_checked(&self, node: NodeId) -> Result<&GraphNode, GraphError> {
        self.node(node).ok_or(GraphError::UnknownNode(node))
    }

    /// Registered nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| NodeId(i as u32))
    }

    pub fn node_count(&self) -> usize {
        self.live_nodes
    }

    /// Neighbours of a node; empty for unknown nodes
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map(GraphNode::neighbors).unwrap_or(&[])
    }

    /// Number of incident edges; 0 for unknown nodes
    pub fn degree(&self, node: NodeId) -> usize {
        self.node(node).map(GraphNode::degree).unwrap_or(0)
    }

    /// Create an edge with weight 0 between two registered nodes
    pub fn create_edge(&mut self, node1: NodeId, node2: NodeId) -> Result<EdgeId, GraphError> {
        self.create_weighted_edge(node1, node2, 0)
    }

    /// Create an edge between two registered nodes.
    ///
    /// Fails without touching the graph if either node is unknown, if the
    /// nodes are the same, or if the pair is already connected.
    pub fn create_weighted_edge(
        &mut self,
        node1: NodeId,
        node2: NodeId,
        weight: i32,
    ) -> Result<EdgeId, GraphError> {
        self.node_checked(node1)?;
        self.node_checked(node2)?;
        if node1 == node2 {
            return Err(GraphError::SelfLoop(node1));
        }

        let key = EdgeKey::new(node1, node2);
        if let Some(existing) = self.pair_index.get(&key) {
            warn!("Rejected duplicate edge {} - {} (already {})", node1, node2, existing);
            return Err(GraphError::DuplicateEdge(node1, node2, *existing));
        }

        let id = EdgeId(self.next_edge);
        self.next_edge = self.next_edge.checked_add(1).ok_or(GraphError::CapacityExceeded)?;

        for (this, other) in [(node1, node2), (node2, node1)] {
            if let Some(node) = self.node_mut(this) {
                node.neighbors.push(other);
                node.edges.push(id);
            }
        }
        self.edges.insert(id, GraphEdge { weight, node1, node2 });
        self.pair_index.insert(key, id);
        Ok(id)
    }

    /// The edge connecting two nodes, or `None` when they are not adjacent
    pub fn get_edge(&self, node1: NodeId, node2: NodeId) -> Option<EdgeId> {
        self.pair_index.get(&EdgeKey::new(node1, node2)).copied()
    }

    pub fn edge(&self, edge: EdgeId) -> Option<&GraphEdge> {
        self.edges.get(&edge)
    }

    /// All edges in creation order
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &GraphEdge)> + '_ {
        self.edges.iter().map(|(id, edge)| (*id, edge))
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.keys().copied().collect()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Remove an edge. Removing an edge that does not exist is a no-op.
    pub fn remove_edge(&mut self, edge: EdgeId) -> Option<GraphEdge> {
        let removed = self.edges.remove(&edge)?;
        self.pair_index.remove(&removed.key());

        for (this, other) in [(removed.node1, removed.node2), (removed.node2, removed.node1)] {
            if let Some(node) = self.node_mut(this) {
                if let Some(pos) = node.neighbors.iter().position(|n| *n == other) {
                    node.neighbors.swap_remove(pos);
                }
                node.edges.retain(|e| *e != edge);
            }
        }
        Some(removed)
    }

    /// Remove the edge between two nodes, if there is one
    pub fn remove_edge_between(&mut self, node1: NodeId, node2: NodeId) -> Option<GraphEdge> {
        let edge = self.get_edge(node1, node2)?;
        self.remove_edge(edge)
    }

    /// Remove every edge matching the predicate. Returns how many were removed.
    pub fn remove_edges_where(&mut self, mut predicate: impl FnMut(EdgeId, &GraphEdge) -> bool) -> usize {
        let doomed: Vec<EdgeId> = self
            .edges
            .iter()
            .filter(|(id, edge)| predicate(**id, *edge))
            .map(|(id, _)| *id)
            .collect();
        for edge in &doomed {
            self.remove_edge(*edge);
        }
        doomed.len()
    }

    /// Reduce the graph to a uniformly random spanning forest (a spanning
    /// tree when the graph is connected). Returns the number of edges kept.
    pub fn randomized_kruskals(&mut self, rng: &mut GameRng) -> Result<usize, GraphError> {
        let mut order = self.edge_ids();
        rng.shuffle(&mut order);
        self.kruskals_in_order(&order)
    }

    /// Kruskal's algorithm over a caller-supplied edge order.
    ///
    /// Each edge is kept if its endpoints are still in different components,
    /// in which case the two components are merged. Every edge not kept,
    /// including edges missing from `order`, is removed afterwards.
    pub fn kruskals_in_order(&mut self, order: &[EdgeId]) -> Result<usize, GraphError> {
        let mut component_of: HashMap<NodeId, usize> = HashMap::with_capacity(self.live_nodes);
        let mut components: Vec<Vec<NodeId>> = Vec::with_capacity(self.live_nodes);
        for node in self.nodes() {
            component_of.insert(node, components.len());
            components.push(vec![node]);
        }

        let mut kept: HashSet<EdgeId> = HashSet::with_capacity(self.live_nodes);
        for id in order {
            let edge = self.edges.get(id).ok_or(GraphError::UnknownEdge(*id))?;
            let a = component_of[&edge.node1];
            let b = component_of[&edge.node2];
            if a == b {
                continue;
            }
            kept.insert(*id);

            // Merge the smaller component into the larger one
            let (small, large) = if components[a].len() < components[b].len() {
                (a, b)
            } else {
                (b, a)
            };
            let moved = std::mem::take(&mut components[small]);
            for node in &moved {
                component_of.insert(*node, large);
            }
            components[large].extend(moved);
        }

        let removed = self.remove_edges_where(|id, _| !kept.contains(&id));
        debug!("Kruskal kept {} edges, removed {}", kept.len(), removed);
        Ok(kept.len())
    }

    /// Whether every registered node is reachable from every other one
    pub fn is_connected(&self) -> bool {
        let Some(start) = self.nodes().next() else {
            return true;
        };
        let mut seen: HashSet<NodeId> = HashSet::from([start]);
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            for next in self.neighbors(node) {
                if seen.insert(*next) {
                    stack.push(*next);
                }
            }
        }
        seen.len() == self.live_nodes
    }

    /// Connected with exactly `|nodes| - 1` edges
    pub fn is_tree(&self) -> bool {
        self.live_nodes > 0 && self.edge_count() == self.live_nodes - 1 && self.is_connected()
    }
}
