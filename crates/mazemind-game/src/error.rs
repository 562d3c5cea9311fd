use std::path::PathBuf;

use mazemind_maze::MazeError;

use crate::channel::ChannelError;

/// Errors raised by the game layer
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("maze error: {0}")]
    Maze(#[from] MazeError),

    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("malformed dialogue record in {source_name} line {line}: {message}")]
    Dialogue {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error("failed to read dialogue lines from {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
