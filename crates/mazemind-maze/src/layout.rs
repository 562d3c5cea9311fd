//! Mapping between maze grid coordinates and maze-local positions

use glam::Vec3;
use mazemind_core::CellCoord;
use serde::{Deserialize, Serialize};

/// Height of a hallway above the cell floor
const HALLWAY_RAISE: f32 = 0.3;
/// Height the player is placed above the cell floor
const PLAYER_SPAWN_RAISE: f32 = 0.2;
/// Hallway geometry is shortened by this much so it stops at the doors
const HALLWAY_DOOR_GAP: f32 = 0.95;
/// Half the side length of the walkable square inside a cell
const CORNER_OFFSET: f32 = 0.5;

/// Physical spacing of the maze. All positions are local to the maze root;
/// `scale` is applied by the renderer to the whole maze.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeLayout {
    pub width: u32,
    pub height: u32,
    /// Distance between the centres of adjacent rooms
    pub room_separation: f32,
    pub scale: f32,
}

impl Default for MazeLayout {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            room_separation: 3.0,
            scale: 1.0,
        }
    }
}

/// Where and how to place the hallway for one passage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HallwayPlacement {
    pub position: Vec3,
    pub length: f32,
    /// Hallways run along x by default; rotated ones run along z
    pub rotated: bool,
}

impl MazeLayout {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Centre of a cell, centred on the maze origin
    pub fn cell_local_position(&self, coords: CellCoord) -> Vec3 {
        Vec3::new(
            self.room_separation * (coords.x as f32 - self.width as f32 * 0.5) + 0.5,
            0.0,
            self.room_separation * (coords.z as f32 - self.height as f32 * 0.5) + 0.5,
        )
    }

    /// Inverse of [`MazeLayout::cell_local_position`], snapping to the nearest cell
    pub fn cell_at_position(&self, position: Vec3) -> Option<CellCoord> {
        let x = ((position.x - 0.5) / self.room_separation + self.width as f32 * 0.5).round() as i32;
        let z = ((position.z - 0.5) / self.room_separation + self.height as f32 * 0.5).round() as i32;
        let coords = CellCoord::new(x, z);
        let inside = x >= 0 && z >= 0 && (x as u32) < self.width && (z as u32) < self.height;
        inside.then_some(coords)
    }

    /// Whether a position lies within the walkable square of its nearest cell
    pub fn is_inside_cell(&self, position: Vec3) -> bool {
        self.cell_at_position(position)
            .map(|cell| {
                let centre = self.cell_local_position(cell);
                (position.x - centre.x).abs() <= CORNER_OFFSET && (position.z - centre.z).abs() <= CORNER_OFFSET
            })
            .unwrap_or(false)
    }

    pub fn player_spawn_position(&self, coords: CellCoord) -> Vec3 {
        self.cell_local_position(coords) + Vec3::Y * PLAYER_SPAWN_RAISE
    }

    /// The four corners of a cell's walkable square: NE, NW, SE, SW
    pub fn cell_corners(&self, coords: CellCoord) -> [Vec3; 4] {
        let centre = self.cell_local_position(coords);
        [
            centre + Vec3::new(CORNER_OFFSET, 0.0, CORNER_OFFSET),
            centre + Vec3::new(-CORNER_OFFSET, 0.0, CORNER_OFFSET),
            centre + Vec3::new(CORNER_OFFSET, 0.0, -CORNER_OFFSET),
            centre + Vec3::new(-CORNER_OFFSET, 0.0, -CORNER_OFFSET),
        ]
    }

    /// Hallway between two adjacent cells
    pub fn hallway(&self, a: CellCoord, b: CellCoord) -> HallwayPlacement {
        let midpoint = (self.cell_local_position(a) + self.cell_local_position(b)) / 2.0;
        HallwayPlacement {
            position: midpoint + Vec3::Y * HALLWAY_RAISE,
            length: self.room_separation - HALLWAY_DOOR_GAP,
            rotated: a.z != b.z,
        }
    }

    /// Convert a maze-local position to world space
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        local * self.scale
    }
}
