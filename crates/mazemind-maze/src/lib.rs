//! MazeMind Maze - maze generation and mutation, independent of rendering
//!
//! A maze is a spanning tree over a [`GridGraph`](mazemind_graph::GridGraph):
//! tree edges are passages (doors and hallways), every other side of a cell is
//! a wall. The physical layer consumes [`CellSides`] and reacts to
//! [`MazeEffects`] calls; it never mutates the topology itself.

pub mod effects;
pub mod error;
pub mod layout;
pub mod topology;

pub use effects::{EffectLog, MazeEffect, MazeEffects};
pub use error::MazeError;
pub use layout::{HallwayPlacement, MazeLayout};
pub use topology::{CellSides, MazeTopology, MutationKind, MutationOutcome, Side};
