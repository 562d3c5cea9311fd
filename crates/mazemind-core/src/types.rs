//! Core types used throughout MazeMind

use std::fmt;
use std::ops::{Add, Sub};

use glam::Quat;
use serde::{Deserialize, Serialize};

/// Integer coordinate of a maze cell. `x` runs east, `z` runs north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub z: i32,
}

impl CellCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The neighbouring coordinate one step in `direction` (may be out of bounds)
    pub fn step(self, direction: Direction) -> Self {
        self + direction.offset()
    }

    /// Manhattan distance to another coordinate
    pub fn manhattan(&self, other: &CellCoord) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.z - other.z).unsigned_abs()
    }

    /// Direction leading from `self` to an axis-aligned neighbour, if `other` is one
    pub fn direction_to(&self, other: &CellCoord) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|dir| self.step(*dir) == *other)
    }
}

impl Add for CellCoord {
    type Output = CellCoord;

    fn add(self, rhs: CellCoord) -> CellCoord {
        CellCoord::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl Sub for CellCoord {
    type Output = CellCoord;

    fn sub(self, rhs: CellCoord) -> CellCoord {
        CellCoord::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// The four compass directions around a maze cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const COUNT: usize = 4;

    /// Enumeration order used everywhere a cell's sides are walked
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Grid offset for one step in this direction
    pub const fn offset(self) -> CellCoord {
        match self {
            Direction::North => CellCoord::new(0, 1),
            Direction::South => CellCoord::new(0, -1),
            Direction::East => CellCoord::new(1, 0),
            Direction::West => CellCoord::new(-1, 0),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Yaw in degrees applied to wall/door/signpost geometry facing this way
    pub const fn yaw_degrees(self) -> f32 {
        match self {
            Direction::North => 0.0,
            Direction::South => 180.0,
            Direction::East => 90.0,
            Direction::West => 270.0,
        }
    }

    /// Rotation about the Y axis for geometry facing this way
    pub fn rotation(self) -> Quat {
        Quat::from_rotation_y(self.yaw_degrees().to_radians())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::South => "South",
            Direction::East => "East",
            Direction::West => "West",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
