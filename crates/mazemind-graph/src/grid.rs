//! Square lattice graph (https://en.wikipedia.org/wiki/Lattice_graph#Square_grid_graph)

use std::collections::HashMap;

use mazemind_core::{CellCoord, Direction};

use crate::error::GraphError;
use crate::graph::{Graph, NodeId};

/// A [`Graph`] whose nodes sit on a `width x height` lattice.
///
/// Construction registers every 4-neighbour edge (no wraparound), so a fresh
/// grid has `(w-1)*h + w*(h-1)` edges.
#[derive(Debug, Clone)]
pub struct GridGraph {
    graph: Graph,
    width: u32,
    height: u32,
    /// Dense column-major lattice: index `x * height + z`
    lattice: Vec<NodeId>,
    coords: HashMap<NodeId, CellCoord>,
}

impl GridGraph {
    pub fn new(width: u32, height: u32) -> Result<Self, GraphError> {
        if width == 0 || height == 0 {
            return Err(GraphError::EmptyGrid { width, height });
        }

        let cell_count = width
            .checked_mul(height)
            .filter(|_| i32::try_from(width).is_ok() && i32::try_from(height).is_ok())
            .ok_or(GraphError::GridTooLarge { width, height })?;

        let mut graph = Graph::new();
        let cell_count = cell_count as usize;
        let mut lattice = Vec::with_capacity(cell_count);
        let mut coords = HashMap::with_capacity(cell_count);

        for x in 0..width as i32 {
            for z in 0..height as i32 {
                let node = graph.add_node()?;
                lattice.push(node);
                coords.insert(node, CellCoord::new(x, z));
            }
        }

        let mut grid = Self {
            graph,
            width,
            height,
            lattice,
            coords,
        };

        for x in 0..width as i32 {
            for z in 0..height as i32 {
                let here = CellCoord::new(x, z);
                for dir in [Direction::East, Direction::North] {
                    let (Some(a), Some(b)) = (grid.node_at(here), grid.node_at(here.step(dir))) else {
                        continue;
                    };
                    grid.graph.create_edge(a, b)?;
                }
            }
        }

        Ok(grid)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, coords: CellCoord) -> bool {
        coords.x >= 0 && coords.z >= 0 && (coords.x as u32) < self.width && (coords.z as u32) < self.height
    }

    /// Node at a lattice coordinate, `None` when out of bounds
    pub fn node_at(&self, coords: CellCoord) -> Option<NodeId> {
        if !self.contains(coords) {
            return None;
        }
        let index = coords.x as usize * self.height as usize + coords.z as usize;
        self.lattice.get(index).copied()
    }

    /// Inverse of [`GridGraph::node_at`] for every node the grid created
    pub fn node_coords(&self, node: NodeId) -> Option<CellCoord> {
        self.coords.get(&node).copied()
    }

    /// All lattice coordinates, x-major
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let height = self.height as i32;
        (0..self.width as i32).flat_map(move |x| (0..height).map(move |z| CellCoord::new(x, z)))
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }
}
