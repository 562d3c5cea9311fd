//! Per-alignment action tables: what the AI asks for and how it reacts

use std::collections::HashMap;

use mazemind_core::GameRng;
use mazemind_maze::{MazeEffects, MazeLayout, MazeTopology, MutationOutcome};
use tracing::{debug, warn};

use crate::alignment::AlignmentState;
use crate::channel::PlayerSnapshot;
use crate::error::GameError;
use crate::interchange::{AiPlayerInterchange, InterchangeTimings};
use crate::lines::DialogueLines;

/// Everything an action may touch while it runs
pub struct ActionContext<'a> {
    pub maze: &'a mut MazeTopology,
    pub layout: &'a MazeLayout,
    pub effects: &'a mut dyn MazeEffects,
    pub rng: &'a mut GameRng,
    pub lines: &'a DialogueLines,
    pub timings: &'a InterchangeTimings,
    pub player: &'a PlayerSnapshot,
    pub state: AlignmentState,
}

/// Builds the next interchange, or `None` to ask nothing
pub type RequestFn = fn(&mut ActionContext<'_>) -> Option<AiPlayerInterchange>;
/// Environmental or narrative effect run after a response is scored
pub type ReactionFn = fn(&mut ActionContext<'_>) -> Result<ReactionOutcome, GameError>;

/// What a reaction did: any maze rewiring, and a line for the player
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReactionOutcome {
    pub mutation: Option<MutationOutcome>,
    /// Announced after the follow-up
    pub line: Option<String>,
}

impl ReactionOutcome {
    /// Nothing to rewire and nothing to say
    pub fn silent() -> Self {
        Self::default()
    }
}

/// A named entry in an action table
#[derive(Clone, Copy)]
pub struct ActionDescriptor<F> {
    pub name: &'static str,
    pub run: F,
}

impl<F> std::fmt::Debug for ActionDescriptor<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ActionDescriptor").field(&self.name).finish()
    }
}

impl ActionDescriptor<RequestFn> {
    pub fn request(name: &'static str, run: RequestFn) -> Self {
        Self { name, run }
    }
}

impl ActionDescriptor<ReactionFn> {
    pub fn reaction(name: &'static str, run: ReactionFn) -> Self {
        Self { name, run }
    }
}

/// Name of the always-available entry that does nothing
pub const NO_OP: &str = "nothing";

fn request_nothing(_: &mut ActionContext<'_>) -> Option<AiPlayerInterchange> {
    None
}

fn react_nothing(_: &mut ActionContext<'_>) -> Result<ReactionOutcome, GameError> {
    Ok(ReactionOutcome::silent())
}

/// Request and reaction tables keyed by alignment state.
///
/// Every pick also considers a no-op entry, so a state with an empty table
/// simply does nothing.
#[derive(Debug, Clone)]
pub struct ActionRegistry {
    requests: HashMap<AlignmentState, Vec<ActionDescriptor<RequestFn>>>,
    reactions: HashMap<AlignmentState, Vec<ActionDescriptor<ReactionFn>>>,
    first_request: ActionDescriptor<RequestFn>,
}

impl ActionRegistry {
    /// Empty tables; the first request still asks for the corners
    pub fn new() -> Self {
        Self {
            requests: HashMap::new(),
            reactions: HashMap::new(),
            first_request: ActionDescriptor::request("first_touch_corners", first_touch_corners),
        }
    }

    /// The game's action set
    pub fn standard() -> Self {
        let mut registry = Self::new();

        registry.register_requests(
            AlignmentState::Friendly,
            vec![
                ActionDescriptor::request("text_question", text_question),
                ActionDescriptor::request("touch_corners", touch_corners),
            ],
        );
        registry.register_reactions(
            AlignmentState::Friendly,
            vec![
                ActionDescriptor::reaction("signpost_to_exit", signpost_to_exit),
                ActionDescriptor::reaction("shortcut", shortcut),
                ActionDescriptor::reaction("shorter_hallways", shorter_hallways),
                ActionDescriptor::reaction("spin_object", spin_object),
            ],
        );

        registry.register_requests(
            AlignmentState::Neutral,
            vec![
                ActionDescriptor::request("text_question", text_question),
                ActionDescriptor::request("touch_corners", touch_corners),
                ActionDescriptor::request("stay_still", stay_still),
                ActionDescriptor::request("lock_in_room", lock_in_room),
            ],
        );
        registry.register_reactions(
            AlignmentState::Neutral,
            vec![
                ActionDescriptor::reaction("spin_object", spin_object),
                ActionDescriptor::reaction("shake_object", shake_object),
                ActionDescriptor::reaction("clear_signposts", clear_signposts),
            ],
        );

        registry.register_requests(
            AlignmentState::Hostile,
            vec![
                ActionDescriptor::request("text_question", text_question),
                ActionDescriptor::request("touch_corners_in_order", touch_corners_in_order),
                ActionDescriptor::request("stay_still", stay_still),
                ActionDescriptor::request("lock_in_room", lock_in_room),
            ],
        );
        registry.register_reactions(
            AlignmentState::Hostile,
            vec![
                ActionDescriptor::reaction("lights_red", lights_red),
                ActionDescriptor::reaction("longcut", longcut),
                ActionDescriptor::reaction("longer_hallways", longer_hallways),
                ActionDescriptor::reaction("shake_object", shake_object),
                ActionDescriptor::reaction("clear_signposts", clear_signposts),
            ],
        );

        registry
    }

    pub fn register_requests(&mut self, state: AlignmentState, actions: Vec<ActionDescriptor<RequestFn>>) {
        self.requests.insert(state, actions);
    }

    pub fn register_reactions(&mut self, state: AlignmentState, actions: Vec<ActionDescriptor<ReactionFn>>) {
        self.reactions.insert(state, actions);
    }

    pub fn requests_for(&self, state: AlignmentState) -> &[ActionDescriptor<RequestFn>] {
        self.requests.get(&state).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn reactions_for(&self, state: AlignmentState) -> &[ActionDescriptor<ReactionFn>] {
        self.reactions.get(&state).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first_request(&self) -> ActionDescriptor<RequestFn> {
        self.first_request
    }

    /// Uniform pick over the state's requests plus the no-op
    pub fn pick_request(&self, state: AlignmentState, rng: &mut GameRng) -> ActionDescriptor<RequestFn> {
        pick_with_noop(self.requests_for(state), ActionDescriptor::request(NO_OP, request_nothing), rng)
    }

    /// Uniform pick over the state's reactions plus the no-op
    pub fn pick_reaction(&self, state: AlignmentState, rng: &mut GameRng) -> ActionDescriptor<ReactionFn> {
        pick_with_noop(self.reactions_for(state), ActionDescriptor::reaction(NO_OP, react_nothing), rng)
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn pick_with_noop<F: Copy>(pool: &[ActionDescriptor<F>], noop: ActionDescriptor<F>, rng: &mut GameRng) -> ActionDescriptor<F> {
    let index = rng.index(pool.len() + 1);
    pool.get(index).copied().unwrap_or(noop)
}

// --- Requests ---

fn first_touch_corners(ctx: &mut ActionContext<'_>) -> Option<AiPlayerInterchange> {
    let corners = ctx.layout.cell_corners(ctx.player.cell);
    Some(AiPlayerInterchange::touch_corners(corners, false, true, ctx.lines, ctx.rng))
}

fn touch_corners(ctx: &mut ActionContext<'_>) -> Option<AiPlayerInterchange> {
    let corners = ctx.layout.cell_corners(ctx.player.cell);
    Some(AiPlayerInterchange::touch_corners(corners, false, false, ctx.lines, ctx.rng))
}

fn touch_corners_in_order(ctx: &mut ActionContext<'_>) -> Option<AiPlayerInterchange> {
    let corners = ctx.layout.cell_corners(ctx.player.cell);
    Some(AiPlayerInterchange::touch_corners(corners, true, false, ctx.lines, ctx.rng))
}

fn text_question(ctx: &mut ActionContext<'_>) -> Option<AiPlayerInterchange> {
    let record = ctx.rng.pick(ctx.lines.records_for(ctx.state))?;
    Some(AiPlayerInterchange::from_record(record, ctx.lines, ctx.rng))
}

fn stay_still(ctx: &mut ActionContext<'_>) -> Option<AiPlayerInterchange> {
    Some(AiPlayerInterchange::stay_still(ctx.timings.stillness_seconds, ctx.lines, ctx.rng))
}

fn lock_in_room(ctx: &mut ActionContext<'_>) -> Option<AiPlayerInterchange> {
    Some(AiPlayerInterchange::lock_player_in_room(ctx.timings.lock_seconds))
}

// --- Reactions ---

fn signpost_to_exit(ctx: &mut ActionContext<'_>) -> Result<ReactionOutcome, GameError> {
    let cell = ctx.player.cell;
    match ctx.maze.direction_toward_exit(cell)? {
        Some(direction) => ctx.effects.add_signpost(cell, direction, ctx.player.position),
        None => debug!("Player is at the exit, no signpost needed"),
    }
    Ok(ReactionOutcome::silent())
}

fn clear_signposts(ctx: &mut ActionContext<'_>) -> Result<ReactionOutcome, GameError> {
    ctx.effects.remove_all_signposts();
    Ok(ReactionOutcome::silent())
}

fn rewire(ctx: &mut ActionContext<'_>, want_shorter: bool) -> Result<ReactionOutcome, GameError> {
    let cell = ctx.player.cell;
    let outcome = if ctx.maze.is_exit(cell) {
        MutationOutcome::NotPossible
    } else {
        ctx.maze.create_shortcut_or_longcut(cell, want_shorter)?
    };
    match outcome {
        MutationOutcome::Applied { removed, added, .. } => ctx.effects.topology_changed(removed, added),
        MutationOutcome::NotPossible => warn!("Maze could not be rewired at {}", cell),
    }
    Ok(ReactionOutcome {
        mutation: Some(outcome),
        line: Some(ctx.lines.rewire_line(want_shorter, outcome.is_applied()).to_string()),
    })
}

fn shortcut(ctx: &mut ActionContext<'_>) -> Result<ReactionOutcome, GameError> {
    rewire(ctx, true)
}

fn longcut(ctx: &mut ActionContext<'_>) -> Result<ReactionOutcome, GameError> {
    rewire(ctx, false)
}

fn lights_red(ctx: &mut ActionContext<'_>) -> Result<ReactionOutcome, GameError> {
    ctx.effects.turn_lights_red();
    Ok(ReactionOutcome::silent())
}

fn longer_hallways(ctx: &mut ActionContext<'_>) -> Result<ReactionOutcome, GameError> {
    ctx.effects.change_hallway_length(1.5);
    Ok(ReactionOutcome::silent())
}

fn shorter_hallways(ctx: &mut ActionContext<'_>) -> Result<ReactionOutcome, GameError> {
    ctx.effects.change_hallway_length(0.75);
    Ok(ReactionOutcome::silent())
}

fn spin_object(ctx: &mut ActionContext<'_>) -> Result<ReactionOutcome, GameError> {
    ctx.effects.spin_object();
    Ok(ReactionOutcome::silent())
}

fn shake_object(ctx: &mut ActionContext<'_>) -> Result<ReactionOutcome, GameError> {
    ctx.effects.shake_object();
    Ok(ReactionOutcome::silent())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mazemind_maze::{EffectLog, MazeEffect};

    struct Fixture {
        maze: MazeTopology,
        layout: MazeLayout,
        effects: EffectLog,
        rng: GameRng,
        lines: DialogueLines,
        timings: InterchangeTimings,
        player: PlayerSnapshot,
    }

    impl Fixture {
        fn new(seed: u64) -> Self {
            let mut rng = GameRng::seeded(seed);
            let mut maze = MazeTopology::generate(6, 6, &mut rng).unwrap();
            let start = maze.place_player_start(&mut rng).unwrap();
            maze.place_exit(start).unwrap();
            let layout = MazeLayout::new(6, 6);
            let player = PlayerSnapshot::new(start, layout.player_spawn_position(start));
            Self {
                maze,
                layout,
                effects: EffectLog::new(),
                rng,
                lines: DialogueLines::default(),
                timings: InterchangeTimings::default(),
                player,
            }
        }

        fn ctx(&mut self, state: AlignmentState) -> ActionContext<'_> {
            ActionContext {
                maze: &mut self.maze,
                layout: &self.layout,
                effects: &mut self.effects,
                rng: &mut self.rng,
                lines: &self.lines,
                timings: &self.timings,
                player: &self.player,
                state,
            }
        }
    }

    #[test]
    fn test_standard_tables() {
        let registry = ActionRegistry::standard();
        for state in [AlignmentState::Friendly, AlignmentState::Neutral, AlignmentState::Hostile] {
            assert!(!registry.requests_for(state).is_empty());
            assert!(!registry.reactions_for(state).is_empty());
        }
        assert!(registry.requests_for(AlignmentState::VeryFriendly).is_empty());
        assert!(registry.reactions_for(AlignmentState::VeryHostile).is_empty());
    }

    #[test]
    fn test_empty_state_only_picks_noop() {
        let registry = ActionRegistry::standard();
        let mut rng = GameRng::seeded(0);
        for _ in 0..20 {
            assert_eq!(registry.pick_request(AlignmentState::VeryHostile, &mut rng).name, NO_OP);
            assert_eq!(registry.pick_reaction(AlignmentState::VeryFriendly, &mut rng).name, NO_OP);
        }
    }

    #[test]
    fn test_pick_covers_pool_and_noop() {
        let registry = ActionRegistry::standard();
        let mut rng = GameRng::seeded(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(registry.pick_request(AlignmentState::Neutral, &mut rng).name);
        }
        assert!(seen.contains(NO_OP));
        for descriptor in registry.requests_for(AlignmentState::Neutral) {
            assert!(seen.contains(descriptor.name), "{} never picked", descriptor.name);
        }
    }

    #[test]
    fn test_every_standard_request_builds() {
        let registry = ActionRegistry::standard();
        let mut fixture = Fixture::new(3);
        for state in [AlignmentState::Friendly, AlignmentState::Neutral, AlignmentState::Hostile] {
            for descriptor in registry.requests_for(state) {
                let interchange = (descriptor.run)(&mut fixture.ctx(state));
                assert!(interchange.is_some(), "{} produced nothing", descriptor.name);
            }
        }
        let first = (registry.first_request().run)(&mut fixture.ctx(AlignmentState::Neutral)).unwrap();
        assert_eq!(first.question_text(), fixture.lines.first_request);
    }

    #[test]
    fn test_signpost_points_toward_exit() {
        let mut fixture = Fixture::new(4);
        signpost_to_exit(&mut fixture.ctx(AlignmentState::Friendly)).unwrap();
        let expected = fixture.maze.direction_toward_exit(fixture.player.cell).unwrap().unwrap();
        match fixture.effects.effects() {
            [MazeEffect::Signpost { direction, .. }] => assert_eq!(*direction, expected),
            other => panic!("unexpected effects {:?}", other),
        }
    }

    #[test]
    fn test_rewire_reports_to_effects() {
        for seed in 0..20 {
            let mut fixture = Fixture::new(seed);
            let before = fixture.maze.distance_to_exit(fixture.player.cell).unwrap();
            let reaction = longcut(&mut fixture.ctx(AlignmentState::Hostile)).unwrap();
            let outcome = reaction.mutation.unwrap();
            let applied = outcome.is_applied();
            assert_eq!(reaction.line.as_deref(), Some(fixture.lines.rewire_line(false, applied)));
            let after = fixture.maze.distance_to_exit(fixture.player.cell).unwrap();
            match outcome {
                MutationOutcome::Applied { .. } => {
                    assert!(after > before);
                    assert_eq!(fixture.effects.count("topology_changed"), 1);
                }
                MutationOutcome::NotPossible => {
                    assert_eq!(after, before);
                    assert!(fixture.effects.effects().is_empty());
                }
            }
            assert!(fixture.maze.grid().graph().is_tree());
        }
    }

    #[test]
    fn test_rewire_at_exit_is_not_possible() {
        let mut fixture = Fixture::new(9);
        let exit = fixture.maze.exit().unwrap();
        fixture.player = PlayerSnapshot::new(exit, fixture.layout.cell_local_position(exit));
        let reaction = shortcut(&mut fixture.ctx(AlignmentState::Friendly)).unwrap();
        assert_eq!(reaction.mutation, Some(MutationOutcome::NotPossible));
        assert_eq!(reaction.line.as_deref(), Some(fixture.lines.shortcut_failed.as_str()));
        assert!(fixture.effects.effects().is_empty());
    }

    #[test]
    fn test_effect_reactions_are_silent() {
        let mut fixture = Fixture::new(2);
        for reaction in [spin_object, shake_object, lights_red, clear_signposts] {
            let outcome = reaction(&mut fixture.ctx(AlignmentState::Neutral)).unwrap();
            assert_eq!(outcome, ReactionOutcome::silent());
        }
        assert_eq!(fixture.effects.effects().len(), 4);
    }
}
