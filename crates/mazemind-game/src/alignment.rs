//! AI alignment: the infraction counter and the disposition derived from it

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::tri_state::TriState;

/// The AI's disposition toward the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlignmentState {
    Neutral,
    Friendly,
    VeryFriendly,
    Hostile,
    VeryHostile,
}

impl AlignmentState {
    pub const ALL: [AlignmentState; 5] = [
        AlignmentState::Neutral,
        AlignmentState::Friendly,
        AlignmentState::VeryFriendly,
        AlignmentState::Hostile,
        AlignmentState::VeryHostile,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AlignmentState::Neutral => "Neutral",
            AlignmentState::Friendly => "Friendly",
            AlignmentState::VeryFriendly => "Very Friendly",
            AlignmentState::Hostile => "Hostile",
            AlignmentState::VeryHostile => "Very Hostile",
        }
    }
}

/// Counter values at which the disposition changes.
///
/// The `very_*` thresholds are unset by default, which leaves
/// `VeryFriendly` and `VeryHostile` unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentThresholds {
    /// At or below this count the AI is friendly
    pub friendly: i32,
    /// At or above this count the AI is hostile
    pub hostile: i32,
    pub very_friendly: Option<i32>,
    pub very_hostile: Option<i32>,
}

impl Default for AlignmentThresholds {
    fn default() -> Self {
        Self {
            friendly: -3,
            hostile: 3,
            very_friendly: None,
            very_hostile: None,
        }
    }
}

impl AlignmentThresholds {
    pub fn state_for(&self, count: i32) -> AlignmentState {
        if self.very_friendly.is_some_and(|t| count <= t) {
            AlignmentState::VeryFriendly
        } else if self.very_hostile.is_some_and(|t| count >= t) {
            AlignmentState::VeryHostile
        } else if count <= self.friendly {
            AlignmentState::Friendly
        } else if count >= self.hostile {
            AlignmentState::Hostile
        } else {
            AlignmentState::Neutral
        }
    }
}

/// A disposition change caused by one verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentChange {
    pub from: AlignmentState,
    pub to: AlignmentState,
}

/// Owned alignment state of one AI
#[derive(Debug, Clone)]
pub struct Alignment {
    infraction_count: i32,
    state: AlignmentState,
    thresholds: AlignmentThresholds,
}

impl Alignment {
    pub fn new(thresholds: AlignmentThresholds) -> Self {
        Self {
            infraction_count: 0,
            state: thresholds.state_for(0),
            thresholds,
        }
    }

    pub fn infraction_count(&self) -> i32 {
        self.infraction_count
    }

    pub fn state(&self) -> AlignmentState {
        self.state
    }

    pub fn thresholds(&self) -> &AlignmentThresholds {
        &self.thresholds
    }

    /// Compliance lowers the counter, defiance raises it. Neutral verdicts
    /// leave everything untouched.
    pub fn apply_verdict(&mut self, verdict: TriState) -> Option<AlignmentChange> {
        match verdict {
            TriState::True => self.infraction_count = self.infraction_count.saturating_sub(1),
            TriState::False => self.infraction_count = self.infraction_count.saturating_add(1),
            TriState::Neutral => return None,
        }

        let next = self.thresholds.state_for(self.infraction_count);
        if next == self.state {
            return None;
        }
        let change = AlignmentChange {
            from: self.state,
            to: next,
        };
        self.state = next;
        info!(
            "AI alignment changed: {} -> {} (infractions {})",
            change.from.name(),
            change.to.name(),
            self.infraction_count
        );
        Some(change)
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::new(AlignmentThresholds::default())
    }
}
