//! Communication channel contract between the AI and the player

pub mod headless;
pub mod watcher;

pub use headless::HeadlessChannel;
pub use watcher::PathWatcher;

use glam::Vec3;
use mazemind_core::CellCoord;

use crate::player_path::PlayerPath;

/// What a channel may observe about the player on a given tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSnapshot {
    pub cell: CellCoord,
    /// Maze-local position
    pub position: Vec3,
    /// False while the player is in a hallway between cells
    pub in_cell: bool,
}

impl PlayerSnapshot {
    pub fn new(cell: CellCoord, position: Vec3) -> Self {
        Self {
            cell,
            position,
            in_cell: true,
        }
    }
}

/// A response gathered by a channel
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerResponse {
    Text(String),
    Path { path: PlayerPath, in_order: bool },
    Stillness { moved: bool },
    /// A timed request ran out; the player had nothing to say
    Acknowledged,
}

impl PlayerResponse {
    pub fn name(&self) -> &'static str {
        match self {
            PlayerResponse::Text(_) => "text",
            PlayerResponse::Path { .. } => "path",
            PlayerResponse::Stillness { .. } => "stillness",
            PlayerResponse::Acknowledged => "acknowledged",
        }
    }
}

/// How the channel should gather the response
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelKind {
    Text,
    Path { path: PlayerPath, in_order: bool },
    /// Watch the player for `seconds` and report whether they moved
    Stillness { seconds: f32 },
    /// Wait `seconds`, then acknowledge
    Timed { seconds: f32 },
}

impl ChannelKind {
    pub fn name(&self) -> &'static str {
        match self {
            ChannelKind::Text => "text",
            ChannelKind::Path { .. } => "path",
            ChannelKind::Stillness { .. } => "stillness",
            ChannelKind::Timed { .. } => "timed",
        }
    }
}

/// Question text plus the kind of response expected
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelRequest {
    pub message: String,
    pub kind: ChannelKind,
}

/// Result of polling an open channel
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelPoll {
    Pending,
    Ready(PlayerResponse),
    /// The channel was torn down; no response will come
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    #[error("path channel started without a path to follow")]
    MissingPathTarget,

    #[error("channel already has an open request")]
    AlreadyOpen,

    #[error("channel has no open request")]
    NotOpen,
}

/// The UI side of a conversation. Polled once per tick; never blocks.
pub trait CommunicationChannel {
    /// Pose a question and start gathering a response
    fn open(&mut self, request: ChannelRequest, player: &PlayerSnapshot) -> Result<(), ChannelError>;

    /// Advance by `delta` seconds and report whether a response is ready
    fn poll(&mut self, player: &PlayerSnapshot, delta: f32) -> Result<ChannelPoll, ChannelError>;

    /// Tear down the current request, if any
    fn close(&mut self);

    /// One-way message; never produces a response
    fn announce(&mut self, message: &str);

    fn is_open(&self) -> bool;
}
