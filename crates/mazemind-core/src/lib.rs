//! MazeMind Core - Core types and utilities shared by every MazeMind crate
//!
//! This crate provides the foundational types used throughout the game:
//! - Mathematical primitives (re-exported from glam)
//! - Grid coordinates and compass directions for maze cells
//! - The single injected randomness source
//! - Tick clock and countdown timers

pub mod rng;
pub mod time;
pub mod types;

pub use glam::{Quat, Vec3};
pub use rng::GameRng;
pub use time::{Countdown, TickClock, TimeConfig};
pub use types::{CellCoord, Direction};
