//! Contract between the game logic and whatever renders the maze.

use glam::Vec3;
use mazemind_core::{CellCoord, Direction};
use tracing::debug;

/// Physical-layer hooks the game drives. Nothing here feeds back into the
/// topology; implementations only present it.
pub trait MazeEffects {
    fn open_doors(&mut self, cell: CellCoord);
    fn close_doors(&mut self, cell: CellCoord);
    fn turn_lights_red(&mut self);
    /// Place a signpost in `cell` pointing `direction`, near the player
    fn add_signpost(&mut self, cell: CellCoord, direction: Direction, near: Vec3);
    fn remove_all_signposts(&mut self);
    /// Scale every hallway by `factor`
    fn change_hallway_length(&mut self, factor: f32);
    fn spin_object(&mut self);
    fn shake_object(&mut self);
    /// The tree was rewired: one passage walled up, another opened
    fn topology_changed(&mut self, removed: (CellCoord, CellCoord), added: (CellCoord, CellCoord));
}

/// One recorded physical-layer call
#[derive(Debug, Clone, PartialEq)]
pub enum MazeEffect {
    OpenDoors(CellCoord),
    CloseDoors(CellCoord),
    LightsRed,
    Signpost {
        cell: CellCoord,
        direction: Direction,
        near: Vec3,
    },
    SignpostsCleared,
    HallwayLength(f32),
    Spin,
    Shake,
    TopologyChanged {
        removed: (CellCoord, CellCoord),
        added: (CellCoord, CellCoord),
    },
}

impl MazeEffect {
    pub fn name(&self) -> &'static str {
        match self {
            MazeEffect::OpenDoors(_) => "open_doors",
            MazeEffect::CloseDoors(_) => "close_doors",
            MazeEffect::LightsRed => "lights_red",
            MazeEffect::Signpost { .. } => "signpost",
            MazeEffect::SignpostsCleared => "signposts_cleared",
            MazeEffect::HallwayLength(_) => "hallway_length",
            MazeEffect::Spin => "spin",
            MazeEffect::Shake => "shake",
            MazeEffect::TopologyChanged { .. } => "topology_changed",
        }
    }
}

/// Headless [`MazeEffects`] that remembers every call in order.
///
/// Also tracks which cells currently have their doors shut and how many
/// signposts stand, so callers can inspect the presented state.
#[derive(Debug, Default, Clone)]
pub struct EffectLog {
    effects: Vec<MazeEffect>,
    closed: Vec<CellCoord>,
    signposts: usize,
    lights_red: bool,
    hallway_scale: Option<f32>,
}

impl EffectLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, effect: MazeEffect) {
        debug!("Maze effect: {:?}", effect);
        self.effects.push(effect);
    }

    pub fn effects(&self) -> &[MazeEffect] {
        &self.effects
    }

    pub fn count(&self, name: &str) -> usize {
        self.effects.iter().filter(|e| e.name() == name).count()
    }

    pub fn doors_closed(&self, cell: CellCoord) -> bool {
        self.closed.contains(&cell)
    }

    pub fn signpost_count(&self) -> usize {
        self.signposts
    }

    pub fn lights_red(&self) -> bool {
        self.lights_red
    }

    /// Accumulated hallway scale, 1.0 when never changed
    pub fn hallway_scale(&self) -> f32 {
        self.hallway_scale.unwrap_or(1.0)
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

impl MazeEffects for EffectLog {
    fn open_doors(&mut self, cell: CellCoord) {
        self.closed.retain(|c| *c != cell);
        self.record(MazeEffect::OpenDoors(cell));
    }

    fn close_doors(&mut self, cell: CellCoord) {
        if !self.closed.contains(&cell) {
            self.closed.push(cell);
        }
        self.record(MazeEffect::CloseDoors(cell));
    }

    fn turn_lights_red(&mut self) {
        self.lights_red = true;
        self.record(MazeEffect::LightsRed);
    }

    fn add_signpost(&mut self, cell: CellCoord, direction: Direction, near: Vec3) {
        self.signposts += 1;
        self.record(MazeEffect::Signpost { cell, direction, near });
    }

    fn remove_all_signposts(&mut self) {
        self.signposts = 0;
        self.record(MazeEffect::SignpostsCleared);
    }

    fn change_hallway_length(&mut self, factor: f32) {
        self.hallway_scale = Some(self.hallway_scale() * factor);
        self.record(MazeEffect::HallwayLength(factor));
    }

    fn spin_object(&mut self) {
        self.record(MazeEffect::Spin);
    }

    fn shake_object(&mut self) {
        self.record(MazeEffect::Shake);
    }

    fn topology_changed(&mut self, removed: (CellCoord, CellCoord), added: (CellCoord, CellCoord)) {
        self.record(MazeEffect::TopologyChanged { removed, added });
    }
}
