//! MazeMind Game - the AI antagonist and its conversation protocol
//!
//! Provides the alignment engine, player interchanges, communication channel
//! contract, dialogue lines, and the session that ties them to a maze.

pub mod actions;
pub mod alignment;
pub mod channel;
pub mod engine;
pub mod error;
pub mod interchange;
pub mod lines;
pub mod player_path;
pub mod session;
pub mod tri_state;

pub use actions::{ActionContext, ActionDescriptor, ActionRegistry, ReactionFn, ReactionOutcome, RequestFn};
pub use alignment::{Alignment, AlignmentChange, AlignmentState, AlignmentThresholds};
pub use channel::{
    ChannelError, ChannelKind, ChannelPoll, ChannelRequest, CommunicationChannel, HeadlessChannel,
    PathWatcher, PlayerResponse, PlayerSnapshot,
};
pub use engine::{AiWorld, EnginePhase, EngineStats, GameAi, TickEvent};
pub use error::GameError;
pub use interchange::{AiPlayerInterchange, Followup, InterchangeTimings};
pub use lines::{DialogueLines, TextRecord};
pub use player_path::PlayerPath;
pub use session::{GameSession, SessionConfig, SessionStatus};
pub use tri_state::TriState;
