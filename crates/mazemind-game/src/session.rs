//! One play-through: the maze, the player's progress, and the AI watching them

use glam::Vec3;
use mazemind_core::{CellCoord, GameRng};
use mazemind_maze::{MazeEffects, MazeLayout, MazeTopology};
use tracing::info;

use crate::actions::ActionRegistry;
use crate::alignment::AlignmentThresholds;
use crate::channel::{CommunicationChannel, PlayerSnapshot};
use crate::engine::{AiWorld, GameAi, TickEvent};
use crate::error::GameError;
use crate::interchange::InterchangeTimings;
use crate::lines::DialogueLines;

/// Everything needed to start a session
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub layout: MazeLayout,
    pub thresholds: AlignmentThresholds,
    pub timings: InterchangeTimings,
    pub lines: DialogueLines,
    pub registry: ActionRegistry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    ExitReached,
}

pub struct GameSession {
    maze: MazeTopology,
    layout: MazeLayout,
    ai: GameAi,
    rng: GameRng,
    start: CellCoord,
    exit: CellCoord,
    player_cell: CellCoord,
    ticks: u64,
    last_event: Option<TickEvent>,
    exit_reached: bool,
}

impl GameSession {
    /// Generate the maze, drop the player on a dead end and put the exit as
    /// far from them as the maze allows
    pub fn begin(config: SessionConfig, mut rng: GameRng) -> Result<Self, GameError> {
        let layout = config.layout;
        let mut maze = MazeTopology::generate(layout.width, layout.height, &mut rng)?;
        let start = maze.place_player_start(&mut rng)?;
        let exit = maze.place_exit(start)?;
        let ai = GameAi::new(start, config.thresholds, config.registry, config.lines, config.timings);

        info!(
            "Session started: {}x{} maze, player at {}, exit at {}",
            layout.width, layout.height, start, exit
        );
        Ok(Self {
            maze,
            layout,
            ai,
            rng,
            start,
            exit,
            player_cell: start,
            ticks: 0,
            last_event: None,
            exit_reached: false,
        })
    }

    /// Advance one tick with the player's current state
    pub fn tick(
        &mut self,
        player: &PlayerSnapshot,
        delta: f32,
        channel: &mut dyn CommunicationChannel,
        effects: &mut dyn MazeEffects,
    ) -> Result<SessionStatus, GameError> {
        if self.exit_reached {
            return Ok(SessionStatus::ExitReached);
        }
        self.ticks += 1;
        self.player_cell = player.cell;

        if player.in_cell && self.maze.is_exit(player.cell) {
            info!("Player reached the exit after {} ticks. Game over!", self.ticks);
            channel.close();
            self.exit_reached = true;
            return Ok(SessionStatus::ExitReached);
        }

        let world = AiWorld {
            maze: &mut self.maze,
            layout: &self.layout,
            effects,
            rng: &mut self.rng,
        };
        let event = self.ai.update(world, player, delta, channel)?;
        self.last_event = Some(event);
        Ok(SessionStatus::Running)
    }

    pub fn maze(&self) -> &MazeTopology {
        &self.maze
    }

    pub fn layout(&self) -> &MazeLayout {
        &self.layout
    }

    pub fn ai(&self) -> &GameAi {
        &self.ai
    }

    pub fn start(&self) -> CellCoord {
        self.start
    }

    pub fn exit(&self) -> CellCoord {
        self.exit
    }

    pub fn player_cell(&self) -> CellCoord {
        self.player_cell
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn last_event(&self) -> Option<&TickEvent> {
        self.last_event.as_ref()
    }

    pub fn exit_reached(&self) -> bool {
        self.exit_reached
    }

    /// Where the player is placed when the session begins
    pub fn spawn_position(&self) -> Vec3 {
        self.layout.player_spawn_position(self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::HeadlessChannel;
    use mazemind_maze::EffectLog;

    fn session(seed: u64) -> GameSession {
        let config = SessionConfig {
            layout: MazeLayout::new(6, 5),
            ..Default::default()
        };
        GameSession::begin(config, GameRng::seeded(seed)).unwrap()
    }

    #[test]
    fn test_begin_places_start_and_exit() {
        for seed in 0..10 {
            let s = session(seed);
            assert_eq!(s.maze().tree_neighbors(s.start()).unwrap().len(), 1);
            assert!(s.maze().is_exit(s.exit()));
            assert_ne!(s.start(), s.exit());
            assert!((s.spawn_position().y - 0.2).abs() < 1e-6);
        }
    }

    #[test]
    fn test_exit_needs_player_inside_the_cell() {
        let mut s = session(2);
        let mut channel = HeadlessChannel::answering("yes");
        let mut effects = EffectLog::new();
        let exit = s.exit();
        let position = s.layout().cell_local_position(exit);

        let in_hallway = PlayerSnapshot {
            cell: exit,
            position,
            in_cell: false,
        };
        assert_eq!(s.tick(&in_hallway, 0.1, &mut channel, &mut effects).unwrap(), SessionStatus::Running);

        let arrived = PlayerSnapshot::new(exit, position);
        assert_eq!(s.tick(&arrived, 0.1, &mut channel, &mut effects).unwrap(), SessionStatus::ExitReached);
        assert!(s.exit_reached());
        assert_eq!(s.tick(&arrived, 0.1, &mut channel, &mut effects).unwrap(), SessionStatus::ExitReached);
        assert_eq!(s.ticks(), 2);
    }

    #[test]
    fn test_walking_the_path_reaches_exit() {
        let config = SessionConfig {
            layout: MazeLayout::new(6, 5),
            registry: ActionRegistry::new(),
            ..Default::default()
        };
        let mut s = GameSession::begin(config, GameRng::seeded(7)).unwrap();
        let mut channel = HeadlessChannel::answering("yes");
        let mut effects = EffectLog::new();
        let mut status = SessionStatus::Running;
        for _ in 0..200 {
            let cell = s.player_cell();
            let next = s.maze().path_to_exit(cell).unwrap().get(1).copied().unwrap_or(cell);
            let player = PlayerSnapshot::new(next, s.layout().cell_local_position(next));
            status = s.tick(&player, 0.5, &mut channel, &mut effects).unwrap();
            if status == SessionStatus::ExitReached {
                break;
            }
        }
        assert_eq!(status, SessionStatus::ExitReached);
        assert!(channel.transcript()[0].contains("Welcome"));
        assert!(!channel.is_open());
    }
}
