//! Single-source paths over a tree

use std::collections::{HashMap, VecDeque};

use crate::error::GraphError;
use crate::graph::{Graph, NodeId};

/// Result of a breadth-first traversal from one root.
///
/// On a tree every reachable node has exactly one simple path to the root,
/// so the BFS parent links are the whole answer.
#[derive(Debug, Clone)]
pub struct TreePaths {
    root: NodeId,
    /// Parent of each reached node; the root maps to itself
    parent: HashMap<NodeId, NodeId>,
    /// Number of edges between the root and each reached node
    depth: HashMap<NodeId, usize>,
    /// Nodes in the order BFS reached them
    visit_order: Vec<NodeId>,
}

impl TreePaths {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.depth.contains_key(&node)
    }

    /// Number of edges on the path from the root to `node`
    pub fn length(&self, node: NodeId) -> Option<usize> {
        self.depth.get(&node).copied()
    }

    /// The path from the root to `node`, both ends included
    pub fn path_to(&self, node: NodeId) -> Option<Vec<NodeId>> {
        let depth = self.length(node)?;
        let mut path = Vec::with_capacity(depth + 1);
        let mut current = node;
        path.push(current);
        while current != self.root {
            current = self.parent[&current];
            path.push(current);
        }
        path.reverse();
        Some(path)
    }

    /// Every reached node with its path length, in BFS order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, usize)> + '_ {
        self.visit_order.iter().map(|n| (*n, self.depth[n]))
    }

    /// The reached node farthest from the root. Ties go to the node BFS
    /// reached first.
    pub fn farthest(&self) -> (NodeId, usize) {
        let mut best = (self.root, 0);
        for (node, len) in self.iter() {
            if len > best.1 {
                best = (node, len);
            }
        }
        best
    }

    pub fn reached(&self) -> usize {
        self.visit_order.len()
    }
}

impl Graph {
    /// Paths from `root` to every node reachable from it, by a single BFS.
    ///
    /// Intended for graphs that are trees; on a general graph the result is
    /// still one shortest path per node.
    pub fn shortest_paths_for_tree(&self, root: NodeId) -> Result<TreePaths, GraphError> {
        if !self.contains_node(root) {
            return Err(GraphError::UnknownNode(root));
        }

        let mut paths = TreePaths {
            root,
            parent: HashMap::from([(root, root)]),
            depth: HashMap::from([(root, 0)]),
            visit_order: vec![root],
        };

        let mut queue = VecDeque::from([root]);
        while let Some(node) = queue.pop_front() {
            let next_depth = paths.depth[&node] + 1;
            for next in self.neighbors(node) {
                if paths.depth.contains_key(next) {
                    continue;
                }
                paths.parent.insert(*next, node);
                paths.depth.insert(*next, next_depth);
                paths.visit_order.push(*next);
                queue.push_back(*next);
            }
        }
        Ok(paths)
    }
}
