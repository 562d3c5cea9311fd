//! Three-valued verdict for a player's response

use serde::{Deserialize, Serialize};

/// Outcome of validating a response. `Neutral` carries no alignment consequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriState {
    True,
    False,
    Neutral,
}

impl TriState {
    /// Only `True` counts as positive
    pub fn to_bool(self) -> bool {
        self == TriState::True
    }

    pub fn is_neutral(self) -> bool {
        self == TriState::Neutral
    }

    pub fn name(&self) -> &'static str {
        match self {
            TriState::True => "true",
            TriState::False => "false",
            TriState::Neutral => "neutral",
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            TriState::True
        } else {
            TriState::False
        }
    }
}
