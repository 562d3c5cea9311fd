//! The AI alignment engine: observes the player, poses interchanges, scores
//! responses, and reacts

use mazemind_core::{CellCoord, GameRng};
use mazemind_maze::{MazeEffects, MazeLayout, MazeTopology, MutationKind, MutationOutcome};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::actions::{ActionContext, ActionRegistry};
use crate::alignment::{Alignment, AlignmentChange, AlignmentState, AlignmentThresholds};
use crate::channel::{ChannelPoll, CommunicationChannel, PlayerResponse, PlayerSnapshot};
use crate::error::GameError;
use crate::interchange::{AiPlayerInterchange, InterchangeTimings};
use crate::lines::DialogueLines;
use crate::tri_state::TriState;

/// Where the engine is in a request/response cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Idle,
    AwaitingResponse,
    Scoring,
}

/// What happened on one engine tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    /// The opening monologue was delivered
    Opening,
    /// Nothing to do
    Idle,
    /// The player entered a new cell and the AI chose to ask nothing
    NothingRequested { cell: CellCoord },
    RequestStarted { action: &'static str, cell: CellCoord },
    /// Still waiting on the channel
    Waiting,
    Scored {
        verdict: TriState,
        state: AlignmentState,
        change: Option<AlignmentChange>,
        reaction: &'static str,
    },
    /// The channel went away; the cycle left no trace
    Abandoned,
}

/// Counters over the lifetime of one engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    pub interchanges: u32,
    pub compliant: u32,
    pub defiant: u32,
    pub neutral: u32,
    pub abandoned: u32,
    pub shortcuts: u32,
    pub longcuts: u32,
}

/// The maze-side collaborators the engine works with on a tick
pub struct AiWorld<'a> {
    pub maze: &'a mut MazeTopology,
    pub layout: &'a MazeLayout,
    pub effects: &'a mut dyn MazeEffects,
    pub rng: &'a mut GameRng,
}

struct Outstanding {
    interchange: AiPlayerInterchange,
    cell: CellCoord,
    doors_closed: bool,
}

/// The AI antagonist. Only one interchange is ever outstanding.
pub struct GameAi {
    alignment: Alignment,
    registry: ActionRegistry,
    lines: DialogueLines,
    timings: InterchangeTimings,
    phase: EnginePhase,
    outstanding: Option<Outstanding>,
    last_cell: CellCoord,
    opening_done: bool,
    first_done: bool,
    stats: EngineStats,
}

impl GameAi {
    pub fn new(
        start_cell: CellCoord,
        thresholds: AlignmentThresholds,
        registry: ActionRegistry,
        lines: DialogueLines,
        timings: InterchangeTimings,
    ) -> Self {
        Self {
            alignment: Alignment::new(thresholds),
            registry,
            lines,
            timings,
            phase: EnginePhase::Idle,
            outstanding: None,
            last_cell: start_cell,
            opening_done: false,
            first_done: false,
            stats: EngineStats::default(),
        }
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn alignment(&self) -> &Alignment {
        &self.alignment
    }

    pub fn state(&self) -> AlignmentState {
        self.alignment.state()
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn lines(&self) -> &DialogueLines {
        &self.lines
    }

    /// The interchange awaiting a response, if any
    pub fn outstanding(&self) -> Option<&AiPlayerInterchange> {
        self.outstanding.as_ref().map(|o| &o.interchange)
    }

    /// Advance the engine by one tick
    pub fn update(
        &mut self,
        world: AiWorld<'_>,
        player: &PlayerSnapshot,
        delta: f32,
        channel: &mut dyn CommunicationChannel,
    ) -> Result<TickEvent, GameError> {
        match self.phase {
            EnginePhase::AwaitingResponse => match channel.poll(player, delta)? {
                ChannelPoll::Pending => Ok(TickEvent::Waiting),
                ChannelPoll::Ready(response) => {
                    channel.close();
                    self.phase = EnginePhase::Scoring;
                    self.score(world, player, response, channel)
                }
                ChannelPoll::Abandoned => {
                    channel.close();
                    self.abandon(world.effects);
                    Ok(TickEvent::Abandoned)
                }
            },
            EnginePhase::Idle | EnginePhase::Scoring => {
                if !self.opening_done {
                    channel.announce(&self.lines.opening_monologue);
                    self.opening_done = true;
                    return Ok(TickEvent::Opening);
                }
                if player.cell == self.last_cell {
                    return Ok(TickEvent::Idle);
                }
                self.last_cell = player.cell;
                self.start_request(world, player, channel)
            }
        }
    }

    fn start_request(
        &mut self,
        world: AiWorld<'_>,
        player: &PlayerSnapshot,
        channel: &mut dyn CommunicationChannel,
    ) -> Result<TickEvent, GameError> {
        let state = self.alignment.state();
        let descriptor = if self.first_done {
            self.registry.pick_request(state, world.rng)
        } else {
            self.registry.first_request()
        };

        let mut ctx = ActionContext {
            maze: world.maze,
            layout: world.layout,
            effects: world.effects,
            rng: world.rng,
            lines: &self.lines,
            timings: &self.timings,
            player,
            state,
        };
        let Some(interchange) = (descriptor.run)(&mut ctx) else {
            debug!("AI chose to ask nothing in {}", player.cell);
            return Ok(TickEvent::NothingRequested { cell: player.cell });
        };

        channel.open(interchange.channel_request(), player)?;
        let doors_closed = interchange.locks_doors();
        if doors_closed {
            ctx.effects.close_doors(player.cell);
        }

        info!("AI started {} interchange in {}", interchange.name(), player.cell);
        self.first_done = true;
        self.stats.interchanges += 1;
        self.outstanding = Some(Outstanding {
            interchange,
            cell: player.cell,
            doors_closed,
        });
        self.phase = EnginePhase::AwaitingResponse;
        Ok(TickEvent::RequestStarted {
            action: descriptor.name,
            cell: player.cell,
        })
    }

    fn score(
        &mut self,
        world: AiWorld<'_>,
        player: &PlayerSnapshot,
        response: PlayerResponse,
        channel: &mut dyn CommunicationChannel,
    ) -> Result<TickEvent, GameError> {
        let Some(outstanding) = self.outstanding.take() else {
            warn!("Got a response with no interchange outstanding");
            self.phase = EnginePhase::Idle;
            return Ok(TickEvent::Idle);
        };

        let verdict = outstanding.interchange.validate(&response);
        match verdict {
            TriState::True => self.stats.compliant += 1,
            TriState::False => self.stats.defiant += 1,
            TriState::Neutral => self.stats.neutral += 1,
        }
        let change = self.alignment.apply_verdict(verdict);
        let state = self.alignment.state();
        debug!(
            "Scored {} response as {} (infractions {})",
            response.name(),
            verdict.name(),
            self.alignment.infraction_count()
        );

        if outstanding.doors_closed {
            world.effects.open_doors(outstanding.cell);
        }

        let descriptor = self.registry.pick_reaction(state, world.rng);
        let mut ctx = ActionContext {
            maze: world.maze,
            layout: world.layout,
            effects: world.effects,
            rng: world.rng,
            lines: &self.lines,
            timings: &self.timings,
            player,
            state,
        };
        let narration = match (descriptor.run)(&mut ctx) {
            Ok(outcome) => {
                if let Some(MutationOutcome::Applied { kind, .. }) = outcome.mutation {
                    match kind {
                        MutationKind::Shortcut => self.stats.shortcuts += 1,
                        MutationKind::Longcut => self.stats.longcuts += 1,
                    }
                }
                outcome.line
            }
            Err(e) => {
                warn!("Reaction {} failed: {}", descriptor.name, e);
                None
            }
        };

        // Neutral verdicts get the positive follow-up
        channel.announce(&outstanding.interchange.followup_text(verdict != TriState::False));
        if let Some(line) = narration {
            channel.announce(&line);
        }

        self.phase = EnginePhase::Idle;
        Ok(TickEvent::Scored {
            verdict,
            state,
            change,
            reaction: descriptor.name,
        })
    }

    fn abandon(&mut self, effects: &mut dyn MazeEffects) {
        if let Some(outstanding) = self.outstanding.take() {
            if outstanding.doors_closed {
                effects.open_doors(outstanding.cell);
            }
            info!("Abandoned {} interchange", outstanding.interchange.name());
        }
        self.stats.abandoned += 1;
        self.phase = EnginePhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionDescriptor;
    use crate::channel::{ChannelError, ChannelKind, ChannelRequest};
    use mazemind_maze::EffectLog;
    use std::collections::VecDeque;

    /// Channel that replays a fixed script of polls
    #[derive(Default)]
    struct ScriptedChannel {
        polls: VecDeque<ChannelPoll>,
        opened: Vec<ChannelRequest>,
        announced: Vec<String>,
        open: bool,
        closes: usize,
    }

    impl CommunicationChannel for ScriptedChannel {
        fn open(&mut self, request: ChannelRequest, _: &PlayerSnapshot) -> Result<(), ChannelError> {
            if self.open {
                return Err(ChannelError::AlreadyOpen);
            }
            self.open = true;
            self.opened.push(request);
            Ok(())
        }

        fn poll(&mut self, _: &PlayerSnapshot, _: f32) -> Result<ChannelPoll, ChannelError> {
            if !self.open {
                return Err(ChannelError::NotOpen);
            }
            Ok(self.polls.pop_front().unwrap_or(ChannelPoll::Pending))
        }

        fn close(&mut self) {
            self.open = false;
            self.closes += 1;
        }

        fn announce(&mut self, message: &str) {
            self.announced.push(message.to_string());
        }

        fn is_open(&self) -> bool {
            self.open
        }
    }

    fn ask_yes(_: &mut ActionContext<'_>) -> Option<AiPlayerInterchange> {
        Some(AiPlayerInterchange::generic_text("Say yes.", "yes", |ok| {
            if ok { "Good choice.".into() } else { "Bad idea.".into() }
        }))
    }

    fn lock(ctx: &mut ActionContext<'_>) -> Option<AiPlayerInterchange> {
        Some(AiPlayerInterchange::lock_player_in_room(ctx.timings.lock_seconds))
    }

    /// Registry whose every state asks "Say yes." and never reacts
    fn yes_registry() -> ActionRegistry {
        let mut registry = ActionRegistry::new();
        for state in AlignmentState::ALL {
            registry.register_requests(state, vec![ActionDescriptor::request("ask_yes", ask_yes)]);
        }
        registry
    }

    struct Harness {
        maze: MazeTopology,
        layout: MazeLayout,
        effects: EffectLog,
        rng: GameRng,
        channel: ScriptedChannel,
        ai: GameAi,
        cell: CellCoord,
    }

    impl Harness {
        fn new(registry: ActionRegistry) -> Self {
            let mut rng = GameRng::seeded(21);
            let mut maze = MazeTopology::generate(5, 5, &mut rng).unwrap();
            let start = maze.place_player_start(&mut rng).unwrap();
            maze.place_exit(start).unwrap();
            let ai = GameAi::new(
                start,
                AlignmentThresholds::default(),
                registry,
                DialogueLines::default(),
                InterchangeTimings::default(),
            );
            Self {
                maze,
                layout: MazeLayout::new(5, 5),
                effects: EffectLog::new(),
                rng,
                channel: ScriptedChannel::default(),
                ai,
                cell: start,
            }
        }

        fn tick(&mut self) -> TickEvent {
            let player = PlayerSnapshot::new(self.cell, self.layout.cell_local_position(self.cell));
            let world = AiWorld {
                maze: &mut self.maze,
                layout: &self.layout,
                effects: &mut self.effects,
                rng: &mut self.rng,
            };
            self.ai.update(world, &player, 0.1, &mut self.channel).unwrap()
        }

        /// Step into some neighbouring cell
        fn move_on(&mut self) {
            let next = self.maze.tree_neighbors(self.cell).unwrap()[0];
            self.cell = next;
        }

        /// Keep walking until the AI asks for something. Every pick may land
        /// on the no-op, so a new cell does not always start a request.
        fn move_until_request(&mut self) -> TickEvent {
            for _ in 0..50 {
                self.move_on();
                match self.tick() {
                    event @ TickEvent::RequestStarted { .. } => return event,
                    TickEvent::NothingRequested { .. } => {}
                    other => panic!("unexpected event {:?}", other),
                }
            }
            panic!("no request after 50 cells");
        }

        /// Finish the opening and the corner-touching first request
        fn past_first_request(&mut self) {
            assert_eq!(self.tick(), TickEvent::Opening);
            self.move_on();
            assert!(matches!(self.tick(), TickEvent::RequestStarted { action: "first_touch_corners", .. }));
            self.channel.polls.push_back(ChannelPoll::Ready(PlayerResponse::Path {
                path: crate::player_path::PlayerPath::completed(vec![]),
                in_order: false,
            }));
            assert!(matches!(self.tick(), TickEvent::Scored { .. }));
        }
    }

    #[test]
    fn test_opening_comes_first() {
        let mut h = Harness::new(yes_registry());
        h.move_on();
        assert_eq!(h.tick(), TickEvent::Opening);
        assert_eq!(h.channel.announced, vec![DialogueLines::default().opening_monologue]);
        assert!(h.channel.opened.is_empty());
    }

    #[test]
    fn test_first_request_is_corners_with_first_lines() {
        let mut h = Harness::new(yes_registry());
        h.tick();
        assert_eq!(h.tick(), TickEvent::Idle, "no request without moving");
        h.move_on();
        h.tick();
        let request = &h.channel.opened[0];
        assert_eq!(request.message, DialogueLines::default().first_request);
        assert!(matches!(request.kind, ChannelKind::Path { in_order: false, .. }));
        assert_eq!(h.ai.phase(), EnginePhase::AwaitingResponse);
    }

    #[test]
    fn test_full_cycle_scores_and_follows_up() {
        let mut h = Harness::new(yes_registry());
        h.past_first_request();
        assert_eq!(h.ai.alignment().infraction_count(), -1);

        let event = h.move_until_request();
        assert!(matches!(event, TickEvent::RequestStarted { action: "ask_yes", .. }));
        assert!(h.effects.doors_closed(h.cell));
        assert_eq!(h.tick(), TickEvent::Waiting);

        h.channel.polls.push_back(ChannelPoll::Ready(PlayerResponse::Text(" YES ".into())));
        let TickEvent::Scored { verdict, reaction, .. } = h.tick() else {
            panic!("expected a scored response");
        };
        assert_eq!(verdict, TriState::True);
        assert_eq!(reaction, crate::actions::NO_OP);
        assert!(!h.effects.doors_closed(h.cell));
        assert_eq!(h.channel.announced.last().unwrap(), "Good choice.");
        assert_eq!(h.ai.alignment().infraction_count(), -2);
        assert_eq!(h.ai.phase(), EnginePhase::Idle);
        assert!(!h.channel.open);
    }

    #[test]
    fn test_new_cell_ignored_while_awaiting() {
        let mut h = Harness::new(yes_registry());
        h.past_first_request();
        h.move_until_request();
        let opened = h.channel.opened.len();
        h.move_on();
        assert_eq!(h.tick(), TickEvent::Waiting);
        h.move_on();
        assert_eq!(h.tick(), TickEvent::Waiting);
        assert_eq!(h.channel.opened.len(), opened);
    }

    #[test]
    fn test_defiance_turns_hostile() {
        let mut h = Harness::new(yes_registry());
        h.past_first_request();
        for round in 0..4 {
            h.move_until_request();
            h.channel.polls.push_back(ChannelPoll::Ready(PlayerResponse::Text("no".into())));
            let TickEvent::Scored { verdict, .. } = h.tick() else {
                panic!("round {} not scored", round);
            };
            assert_eq!(verdict, TriState::False);
        }
        // -1 from the first request, then +4
        assert_eq!(h.ai.alignment().infraction_count(), 3);
        assert_eq!(h.ai.state(), AlignmentState::Hostile);
        assert_eq!(h.channel.announced.last().unwrap(), "Bad idea.");
        assert_eq!(h.ai.stats().defiant, 4);
    }

    #[test]
    fn test_abandoned_cycle_is_a_no_op() {
        let mut h = Harness::new(yes_registry());
        h.past_first_request();
        let count = h.ai.alignment().infraction_count();
        let announced = h.channel.announced.len();

        h.move_until_request();
        assert!(h.effects.doors_closed(h.cell));
        h.channel.polls.push_back(ChannelPoll::Abandoned);
        assert_eq!(h.tick(), TickEvent::Abandoned);

        assert_eq!(h.ai.alignment().infraction_count(), count);
        assert_eq!(h.channel.announced.len(), announced);
        assert!(!h.effects.doors_closed(h.cell));
        assert_eq!(h.ai.phase(), EnginePhase::Idle);
        assert_eq!(h.ai.stats().abandoned, 1);
        assert!(h.ai.outstanding().is_none());
    }

    #[test]
    fn test_lock_is_neutral_and_reopens_doors() {
        let mut registry = ActionRegistry::new();
        for state in AlignmentState::ALL {
            registry.register_requests(state, vec![ActionDescriptor::request("lock", lock)]);
        }
        let mut h = Harness::new(registry);
        h.past_first_request();
        let count = h.ai.alignment().infraction_count();

        h.move_until_request();
        assert_eq!(
            h.channel.opened.last().unwrap().kind,
            ChannelKind::Timed { seconds: 10.0 }
        );
        h.channel.polls.push_back(ChannelPoll::Ready(PlayerResponse::Acknowledged));
        let TickEvent::Scored { verdict, change, .. } = h.tick() else {
            panic!("expected a scored response");
        };
        assert_eq!(verdict, TriState::Neutral);
        assert!(change.is_none());
        assert_eq!(h.ai.alignment().infraction_count(), count);
        assert_eq!(h.effects.count("open_doors"), 1);
        assert_eq!(
            h.channel.announced.last().unwrap(),
            "Thanks for waiting! And no, I won't tell you why I did that."
        );
    }

    #[test]
    fn test_impossible_shortcut_is_narrated() {
        let shortcut = ActionRegistry::standard()
            .reactions_for(AlignmentState::Friendly)
            .iter()
            .copied()
            .find(|d| d.name == "shortcut")
            .unwrap();
        let mut registry = yes_registry();
        for state in AlignmentState::ALL {
            registry.register_reactions(state, vec![shortcut]);
        }
        let mut h = Harness::new(registry);
        h.past_first_request();

        let lines = DialogueLines::default();
        let exit = h.maze.exit().unwrap();
        let beside = h.maze.tree_neighbors(exit).unwrap()[0];
        let mut narrated = false;
        for _ in 0..200 {
            h.cell = if h.cell == exit { beside } else { exit };
            if !matches!(h.tick(), TickEvent::RequestStarted { .. }) {
                continue;
            }
            let rewired = h.effects.count("topology_changed");
            h.channel.polls.push_back(ChannelPoll::Ready(PlayerResponse::Text("yes".into())));
            let TickEvent::Scored { reaction, .. } = h.tick() else {
                panic!("expected a scored response");
            };
            if h.cell == exit && reaction == "shortcut" {
                let said = &h.channel.announced;
                assert_eq!(said[said.len() - 2], "Good choice.");
                assert_eq!(said[said.len() - 1], lines.shortcut_failed);
                assert_eq!(h.effects.count("topology_changed"), rewired);
                narrated = true;
                break;
            }
        }
        assert!(narrated, "never reacted with a shortcut at the exit");
    }

    #[test]
    fn test_standard_registry_reactions_keep_maze_a_tree() {
        let mut h = Harness::new(ActionRegistry::standard());
        h.past_first_request();
        for _ in 0..60 {
            h.move_on();
            if let TickEvent::RequestStarted { .. } = h.tick() {
                let response = match &h.channel.opened.last().unwrap().kind {
                    ChannelKind::Text => PlayerResponse::Text("no".into()),
                    ChannelKind::Path { path, in_order } => PlayerResponse::Path {
                        path: path.clone(),
                        in_order: *in_order,
                    },
                    ChannelKind::Stillness { .. } => PlayerResponse::Stillness { moved: true },
                    ChannelKind::Timed { .. } => PlayerResponse::Acknowledged,
                };
                h.channel.polls.push_back(ChannelPoll::Ready(response));
                h.tick();
            }
            assert!(h.maze.grid().graph().is_tree());
        }
        let stats = h.ai.stats();
        assert_eq!(
            h.effects.count("topology_changed") as u32,
            stats.shortcuts + stats.longcuts
        );
        assert!(stats.interchanges > 1);
    }
}
