//! Proximity-driven waypoint tracking for path channels

use mazemind_core::{CellCoord, Countdown};

use super::{ChannelError, PlayerSnapshot};
use crate::player_path::PlayerPath;

/// Time after opening before a path response may be collected
pub const SETTLE_DELAY: f32 = 1.0;
/// Distance within which a waypoint counts as reached
pub const TRAVERSAL_RADIUS: f32 = 0.3;

/// Follows the player against a [`PlayerPath`] while a path request is open.
///
/// The path must be supplied with [`PathWatcher::set_path`] before
/// [`PathWatcher::start`]. Once started, every update marks unvisited
/// waypoints near the player. The response is ready when the settle delay has
/// passed and the player has left the cell the request was made in.
#[derive(Debug, Clone)]
pub struct PathWatcher {
    path: Option<PlayerPath>,
    origin: Option<CellCoord>,
    settle: Countdown,
}

impl PathWatcher {
    pub fn new() -> Self {
        Self {
            path: None,
            origin: None,
            settle: Countdown::new(SETTLE_DELAY),
        }
    }

    pub fn set_path(&mut self, path: PlayerPath) {
        self.path = Some(path);
    }

    pub fn path(&self) -> Option<&PlayerPath> {
        self.path.as_ref()
    }

    pub fn is_started(&self) -> bool {
        self.origin.is_some()
    }

    pub fn start(&mut self, player: &PlayerSnapshot) -> Result<(), ChannelError> {
        if self.path.is_none() {
            return Err(ChannelError::MissingPathTarget);
        }
        self.origin = Some(player.cell);
        self.settle = Countdown::new(SETTLE_DELAY);
        Ok(())
    }

    pub fn update(&mut self, player: &PlayerSnapshot, delta: f32) {
        if self.origin.is_none() {
            return;
        }
        self.settle.tick(delta);

        let Some(path) = self.path.as_mut() else {
            return;
        };
        let close: Vec<_> = path
            .unvisited()
            .filter(|(_, p)| p.distance(player.position) < TRAVERSAL_RADIUS)
            .map(|(_, p)| p)
            .collect();
        for point in close {
            path.traverse_point(point);
        }
    }

    pub fn is_ready(&self, player: &PlayerSnapshot) -> bool {
        let Some(origin) = self.origin else {
            return false;
        };
        let left = !player.in_cell || player.cell != origin;
        self.settle.is_finished() && left
    }

    /// Hand over the walked path and reset for the next request
    pub fn take_path(&mut self) -> Option<PlayerPath> {
        self.origin = None;
        self.path.take()
    }

    pub fn reset(&mut self) {
        self.path = None;
        self.origin = None;
    }
}

impl Default for PathWatcher {
    fn default() -> Self {
        Self::new()
    }
}
