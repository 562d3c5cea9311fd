//! Maze topology: spanning-tree generation, start/exit placement, and
//! shortcut/longcut surgery that keeps the maze a tree.

use mazemind_core::{CellCoord, Direction, GameRng};
use mazemind_graph::{GridGraph, NodeId, TreePaths};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::MazeError;

/// What lies on one side of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Wall,
    Passage,
}

/// Classification of the four sides of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSides {
    pub coords: CellCoord,
    sides: [Side; Direction::COUNT],
}

impl CellSides {
    pub fn side(&self, direction: Direction) -> Side {
        self.sides[direction as usize]
    }

    /// `(direction, side)` pairs in [`Direction::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (Direction, Side)> + '_ {
        Direction::ALL.into_iter().map(|dir| (dir, self.side(dir)))
    }

    pub fn passage_count(&self) -> usize {
        self.sides.iter().filter(|s| **s == Side::Passage).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationKind {
    Shortcut,
    Longcut,
}

impl MutationKind {
    pub fn name(&self) -> &'static str {
        match self {
            MutationKind::Shortcut => "shortcut",
            MutationKind::Longcut => "longcut",
        }
    }
}

/// Result of [`MazeTopology::create_shortcut_or_longcut`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied {
        kind: MutationKind,
        /// The tree edge that was cut (from the mutated cell to its old successor)
        removed: (CellCoord, CellCoord),
        /// The new tree edge (from the mutated cell to the chosen neighbour)
        added: (CellCoord, CellCoord),
        /// Edges from the mutated cell to the exit before and after
        old_length: usize,
        new_length: usize,
    },
    /// No neighbour qualified; the maze is unchanged
    NotPossible,
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied { .. })
    }
}

/// Tree-shaped maze over a grid of cells
#[derive(Debug, Clone)]
pub struct MazeTopology {
    grid: GridGraph,
    start: Option<CellCoord>,
    exit: Option<CellCoord>,
}

impl MazeTopology {
    /// Build a `width x height` lattice and reduce it to a random spanning tree
    pub fn generate(width: u32, height: u32, rng: &mut GameRng) -> Result<Self, MazeError> {
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidSize { width, height });
        }
        let mut grid = GridGraph::new(width, height)?;
        let kept = grid.graph_mut().randomized_kruskals(rng)?;
        info!("Generated {}x{} maze with {} passages", width, height, kept);
        Ok(Self::from_grid(grid))
    }

    /// Wrap an already reduced grid. The caller guarantees it is a spanning tree.
    pub fn from_grid(grid: GridGraph) -> Self {
        Self {
            grid,
            start: None,
            exit: None,
        }
    }

    pub fn grid(&self) -> &GridGraph {
        &self.grid
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn is_valid(&self, coords: CellCoord) -> bool {
        self.grid.contains(coords)
    }

    pub fn random_coords(&self, rng: &mut GameRng) -> CellCoord {
        CellCoord::new(
            rng.index(self.width() as usize) as i32,
            rng.index(self.height() as usize) as i32,
        )
    }

    pub fn start(&self) -> Option<CellCoord> {
        self.start
    }

    pub fn exit(&self) -> Option<CellCoord> {
        self.exit
    }

    pub fn is_exit(&self, coords: CellCoord) -> bool {
        self.exit == Some(coords)
    }

    fn node(&self, coords: CellCoord) -> Result<NodeId, MazeError> {
        self.grid.node_at(coords).ok_or(MazeError::OutOfBounds(coords))
    }

    fn coords_of(&self, node: NodeId) -> CellCoord {
        // Every node in the graph was created by the grid
        self.grid.node_coords(node).unwrap_or_default()
    }

    fn exit_node(&self) -> Result<NodeId, MazeError> {
        let exit = self.exit.ok_or(MazeError::ExitNotPlaced)?;
        self.node(exit)
    }

    /// Wall or passage on one side of a cell. Sides facing out of the maze are walls.
    pub fn side(&self, coords: CellCoord, direction: Direction) -> Result<Side, MazeError> {
        let here = self.node(coords)?;
        let Some(there) = self.grid.node_at(coords.step(direction)) else {
            return Ok(Side::Wall);
        };
        Ok(match self.grid.graph().get_edge(here, there) {
            Some(_) => Side::Passage,
            None => Side::Wall,
        })
    }

    pub fn cell_sides(&self, coords: CellCoord) -> Result<CellSides, MazeError> {
        let mut sides = [Side::Wall; Direction::COUNT];
        for dir in Direction::ALL {
            sides[dir as usize] = self.side(coords, dir)?;
        }
        Ok(CellSides { coords, sides })
    }

    /// Side classification for every cell, x-major
    pub fn all_cell_sides(&self) -> Vec<CellSides> {
        self.grid
            .coords()
            .filter_map(|coords| self.cell_sides(coords).ok())
            .collect()
    }

    /// One entry per passage, as the pair of cells it joins
    pub fn hallways(&self) -> Vec<(CellCoord, CellCoord)> {
        self.grid
            .graph()
            .edges()
            .map(|(_, edge)| (self.coords_of(edge.node1), self.coords_of(edge.node2)))
            .collect()
    }

    /// Cells joined to `coords` by a passage
    pub fn tree_neighbors(&self, coords: CellCoord) -> Result<Vec<CellCoord>, MazeError> {
        let node = self.node(coords)?;
        Ok(self
            .grid
            .graph()
            .neighbors(node)
            .iter()
            .map(|n| self.coords_of(*n))
            .collect())
    }

    /// Dead-end cells (exactly one passage)
    pub fn leaves(&self) -> Vec<CellCoord> {
        let graph = self.grid.graph();
        graph
            .nodes()
            .filter(|n| graph.degree(*n) == 1)
            .map(|n| self.coords_of(n))
            .collect()
    }

    /// Pick a random dead end as the player's start and remember it
    pub fn place_player_start(&mut self, rng: &mut GameRng) -> Result<CellCoord, MazeError> {
        let leaves = self.leaves();
        let start = *rng.pick(&leaves).ok_or(MazeError::NoLeaf)?;
        self.start = Some(start);
        debug!("Player start placed at {}", start);
        Ok(start)
    }

    /// Put the exit at the cell farthest (along the tree) from `start`
    pub fn place_exit(&mut self, start: CellCoord) -> Result<CellCoord, MazeError> {
        let paths = self.grid.graph().shortest_paths_for_tree(self.node(start)?)?;
        let (far, len) = paths.farthest();
        let exit = self.coords_of(far);
        self.exit = Some(exit);
        info!("Exit placed at {} ({} steps from {})", exit, len, start);
        Ok(exit)
    }

    fn paths_from_exit(&self) -> Result<TreePaths, MazeError> {
        Ok(self.grid.graph().shortest_paths_for_tree(self.exit_node()?)?)
    }

    /// Cells from `from` to the exit, both included. Recomputed on every call.
    pub fn path_to_exit(&self, from: CellCoord) -> Result<Vec<CellCoord>, MazeError> {
        let from_node = self.node(from)?;
        let paths = self.paths_from_exit()?;
        let mut path = paths
            .path_to(from_node)
            .ok_or(MazeError::OutOfBounds(from))?;
        path.reverse();
        Ok(path.into_iter().map(|n| self.coords_of(n)).collect())
    }

    /// Number of passages between `from` and the exit
    pub fn distance_to_exit(&self, from: CellCoord) -> Result<usize, MazeError> {
        Ok(self.path_to_exit(from)?.len() - 1)
    }

    /// First step from `from` toward the exit; `None` when already there
    pub fn direction_toward_exit(&self, from: CellCoord) -> Result<Option<Direction>, MazeError> {
        let path = self.path_to_exit(from)?;
        Ok(path.get(1).and_then(|next| from.direction_to(next)))
    }

    /// Rewire one tree edge at `from` so its path to the exit becomes strictly
    /// shorter (`want_shorter`) or strictly longer.
    ///
    /// A candidate is a grid neighbour of `from` that is not joined to it by a
    /// passage and whose own route to the exit does not pass through `from`.
    /// Among candidates the one giving the shortest (or longest) new route
    /// wins; ties go to the first in [`Direction::ALL`] order. The passage from
    /// `from` toward its old successor is walled up and a passage to the
    /// candidate is opened, so the maze stays a spanning tree.
    pub fn create_shortcut_or_longcut(
        &mut self,
        from: CellCoord,
        want_shorter: bool,
    ) -> Result<MutationOutcome, MazeError> {
        let kind = if want_shorter {
            MutationKind::Shortcut
        } else {
            MutationKind::Longcut
        };
        let from_node = self.node(from)?;
        let paths = self.paths_from_exit()?;
        let route = paths.path_to(from_node).ok_or(MazeError::OutOfBounds(from))?;
        if route.len() < 2 {
            return Err(MazeError::NoInteriorEdge(from));
        }
        let old_length = route.len() - 1;
        // route runs exit..from, so the successor toward the exit is second to last
        let successor = route[route.len() - 2];

        let graph = self.grid.graph();
        let mut best: Option<(CellCoord, NodeId, usize)> = None;
        for dir in Direction::ALL {
            let candidate = from.step(dir);
            let Some(node) = self.grid.node_at(candidate) else {
                continue;
            };
            if graph.get_edge(from_node, node).is_some() {
                continue;
            }
            let Some(candidate_route) = paths.path_to(node) else {
                continue;
            };
            if candidate_route.contains(&from_node) {
                // Inside the subtree hanging off `from`; joining it would cut
                // that subtree off from the exit.
                continue;
            }
            let new_length = candidate_route.len();
            let qualifies = if want_shorter {
                new_length < old_length
            } else {
                new_length > old_length
            };
            let better = match best {
                None => true,
                Some((_, _, best_len)) if want_shorter => new_length < best_len,
                Some((_, _, best_len)) => new_length > best_len,
            };
            if qualifies && better {
                best = Some((candidate, node, new_length));
            }
        }

        let Some((target, target_node, new_length)) = best else {
            warn!("No {} possible from {}", kind.name(), from);
            return Ok(MutationOutcome::NotPossible);
        };

        let successor_coords = self.coords_of(successor);
        let graph = self.grid.graph_mut();
        graph.remove_edge_between(from_node, successor);
        graph.create_edge(from_node, target_node)?;
        debug_assert!(self.grid.graph().is_tree());

        info!(
            "Created {} at {}: cut {} -> {}, opened {} -> {} ({} -> {} steps)",
            kind.name(),
            from,
            from,
            successor_coords,
            from,
            target,
            old_length,
            new_length
        );
        Ok(MutationOutcome::Applied {
            kind,
            removed: (from, successor_coords),
            added: (from, target),
            old_length,
            new_length,
        })
    }
}
