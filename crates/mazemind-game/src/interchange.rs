//! AI-to-player interchanges: one question, its validation, and the follow-up

use std::fmt;

use glam::Vec3;
use mazemind_core::GameRng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::channel::{ChannelKind, ChannelRequest, PlayerResponse};
use crate::lines::{DialogueLines, TextRecord};
use crate::player_path::PlayerPath;
use crate::tri_state::TriState;

const TOUCH_CORNERS_LINE: &str = "Touch all 4 corners of the room before moving on.";
const TOUCH_CORNERS_IN_ORDER_LINE: &str =
    "Touch all 4 corners of the room, in the order I name them, before moving on.";
const LOCK_FOLLOWUP: &str = "Thanks for waiting! And no, I won't tell you why I did that.";

/// Durations used by the timed interchanges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterchangeTimings {
    pub lock_seconds: f32,
    pub stillness_seconds: f32,
}

impl Default for InterchangeTimings {
    fn default() -> Self {
        Self {
            lock_seconds: 10.0,
            stillness_seconds: 10.0,
        }
    }
}

/// What the AI says once the response has been scored
pub enum Followup {
    /// Lines chosen when the interchange was created
    Lines { positive: String, negative: String },
    /// Computed from the outcome when needed
    Custom(Box<dyn Fn(bool) -> String>),
}

impl Followup {
    /// Pick both lines up front, falling back to the standard pools
    pub fn from_pools(
        positive: Option<&str>,
        negative: Option<&str>,
        lines: &DialogueLines,
        rng: &mut GameRng,
    ) -> Self {
        let positive = match positive {
            Some(text) => text.to_string(),
            None => lines.random_response(true, rng),
        };
        let negative = match negative {
            Some(text) => text.to_string(),
            None => lines.random_response(false, rng),
        };
        Followup::Lines { positive, negative }
    }

    pub fn fixed(text: &str) -> Self {
        Followup::Lines {
            positive: text.to_string(),
            negative: text.to_string(),
        }
    }

    pub fn text(&self, positive: bool) -> String {
        match self {
            Followup::Lines { positive: p, negative: n } => {
                if positive {
                    p.clone()
                } else {
                    n.clone()
                }
            }
            Followup::Custom(f) => f(positive),
        }
    }
}

impl fmt::Debug for Followup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Followup::Lines { positive, negative } => f
                .debug_struct("Lines")
                .field("positive", positive)
                .field("negative", negative)
                .finish(),
            Followup::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// One question/response unit between the AI and the player
#[derive(Debug)]
pub enum AiPlayerInterchange {
    /// Free-text question answered by exact (case and whitespace-insensitive) match
    Text {
        question: String,
        expected: String,
        followup: Followup,
    },
    /// Visit the four corners of the current room
    TouchCorners {
        question: String,
        corners: [Vec3; 4],
        in_order: bool,
        followup: Followup,
    },
    /// Doors stay shut for a while; carries no alignment consequence
    LockPlayerInRoom { seconds: f32 },
    /// Do not move for a while
    StayStill { seconds: f32, followup: Followup },
}

impl AiPlayerInterchange {
    /// Text interchange built from an authored record, prefixed by a random intro
    pub fn from_record(record: &TextRecord, lines: &DialogueLines, rng: &mut GameRng) -> Self {
        let intro = lines.random_intro(rng);
        let question = if intro.is_empty() {
            record.question.clone()
        } else {
            format!("{}\n{}", intro, record.question)
        };
        AiPlayerInterchange::Text {
            question,
            expected: record.expected.clone(),
            followup: Followup::from_pools(
                record.positive.as_deref(),
                record.negative.as_deref(),
                lines,
                rng,
            ),
        }
    }

    /// Text interchange with caller-supplied follow-up
    pub fn generic_text(question: &str, expected: &str, followup: impl Fn(bool) -> String + 'static) -> Self {
        AiPlayerInterchange::Text {
            question: question.to_string(),
            expected: expected.to_string(),
            followup: Followup::Custom(Box::new(followup)),
        }
    }

    /// Corner challenge. The first interchange of a game uses the dedicated
    /// first request and first response lines.
    pub fn touch_corners(
        corners: [Vec3; 4],
        in_order: bool,
        first: bool,
        lines: &DialogueLines,
        rng: &mut GameRng,
    ) -> Self {
        let (question, followup) = if first {
            (
                lines.first_request.clone(),
                Followup::Lines {
                    positive: lines.first_response(true).to_string(),
                    negative: lines.first_response(false).to_string(),
                },
            )
        } else {
            let line = if in_order {
                TOUCH_CORNERS_IN_ORDER_LINE
            } else {
                TOUCH_CORNERS_LINE
            };
            (
                format!("{}\n{}", lines.random_intro(rng), line),
                Followup::from_pools(None, None, lines, rng),
            )
        };
        AiPlayerInterchange::TouchCorners {
            question,
            corners,
            in_order,
            followup,
        }
    }

    pub fn lock_player_in_room(seconds: f32) -> Self {
        AiPlayerInterchange::LockPlayerInRoom { seconds }
    }

    pub fn stay_still(seconds: f32, lines: &DialogueLines, rng: &mut GameRng) -> Self {
        AiPlayerInterchange::StayStill {
            seconds,
            followup: Followup::from_pools(None, None, lines, rng),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AiPlayerInterchange::Text { .. } => "text",
            AiPlayerInterchange::TouchCorners { .. } => "touch_corners",
            AiPlayerInterchange::LockPlayerInRoom { .. } => "lock_player_in_room",
            AiPlayerInterchange::StayStill { .. } => "stay_still",
        }
    }

    pub fn question_text(&self) -> String {
        match self {
            AiPlayerInterchange::Text { question, .. } => question.clone(),
            AiPlayerInterchange::TouchCorners { question, .. } => question.clone(),
            AiPlayerInterchange::LockPlayerInRoom { seconds } => {
                format!("I'm going to lock you in this room for {} seconds. Have fun!", seconds)
            }
            AiPlayerInterchange::StayStill { seconds, .. } => {
                format!("Please remain still for {} seconds.", seconds)
            }
        }
    }

    /// Score a response. A response of the wrong kind is scored neutral.
    pub fn validate(&self, response: &PlayerResponse) -> TriState {
        match (self, response) {
            (AiPlayerInterchange::LockPlayerInRoom { .. }, _) => TriState::Neutral,
            (AiPlayerInterchange::Text { expected, .. }, PlayerResponse::Text(answer)) => {
                TriState::from(normalize(answer) == normalize(expected))
            }
            (AiPlayerInterchange::TouchCorners { in_order, .. }, PlayerResponse::Path { path, .. }) => {
                if *in_order {
                    TriState::from(path.in_correct_order())
                } else {
                    TriState::from(path.all_traversed())
                }
            }
            (AiPlayerInterchange::StayStill { .. }, PlayerResponse::Stillness { moved }) => {
                TriState::from(!moved)
            }
            (interchange, response) => {
                warn!(
                    "Got a {} response to a {} interchange, scoring it neutral",
                    response.name(),
                    interchange.name()
                );
                TriState::Neutral
            }
        }
    }

    pub fn followup_text(&self, positive: bool) -> String {
        match self {
            AiPlayerInterchange::Text { followup, .. }
            | AiPlayerInterchange::TouchCorners { followup, .. }
            | AiPlayerInterchange::StayStill { followup, .. } => followup.text(positive),
            AiPlayerInterchange::LockPlayerInRoom { .. } => LOCK_FOLLOWUP.to_string(),
        }
    }

    /// Whether the room's doors stay shut while the request is open
    pub fn locks_doors(&self) -> bool {
        matches!(
            self,
            AiPlayerInterchange::Text { .. } | AiPlayerInterchange::LockPlayerInRoom { .. }
        )
    }

    /// What to hand the channel to pose this interchange
    pub fn channel_request(&self) -> ChannelRequest {
        let kind = match self {
            AiPlayerInterchange::Text { .. } => ChannelKind::Text,
            AiPlayerInterchange::TouchCorners { corners, in_order, .. } => ChannelKind::Path {
                path: PlayerPath::new(corners.to_vec()),
                in_order: *in_order,
            },
            AiPlayerInterchange::LockPlayerInRoom { seconds } => ChannelKind::Timed { seconds: *seconds },
            AiPlayerInterchange::StayStill { seconds, .. } => ChannelKind::Stillness { seconds: *seconds },
        };
        ChannelRequest {
            message: self.question_text(),
            kind,
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corners() -> [Vec3; 4] {
        [
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
        ]
    }

    fn walked(order: &[usize]) -> PlayerPath {
        let pts = corners();
        let mut path = PlayerPath::new(pts.to_vec());
        for i in order {
            path.traverse_point(pts[*i]);
        }
        path
    }

    #[test]
    fn test_text_match_ignores_case_and_whitespace() {
        let interchange = AiPlayerInterchange::generic_text("Ready?", "yes", |ok| {
            if ok { "good".into() } else { "bad".into() }
        });
        assert_eq!(interchange.validate(&PlayerResponse::Text("Yes".into())), TriState::True);
        assert_eq!(interchange.validate(&PlayerResponse::Text(" yes ".into())), TriState::True);
        assert_eq!(interchange.validate(&PlayerResponse::Text("no".into())), TriState::False);
        assert_eq!(interchange.followup_text(true), "good");
        assert_eq!(interchange.followup_text(false), "bad");
        assert_eq!(interchange.question_text(), "Ready?");
    }

    #[test]
    fn test_record_followups() {
        let lines = DialogueLines::default();
        let mut rng = GameRng::seeded(1);
        let record = TextRecord {
            question: "Do you fear me?".into(),
            expected: "yes".into(),
            positive: Some("Wise.".into()),
            negative: None,
        };
        let interchange = AiPlayerInterchange::from_record(&record, &lines, &mut rng);
        assert!(interchange.question_text().ends_with("Do you fear me?"));
        assert_eq!(interchange.followup_text(true), "Wise.");
        assert!(lines.negative_responses.contains(&interchange.followup_text(false)));
        assert!(interchange.locks_doors());
    }

    #[test]
    fn test_corners_unordered_and_ordered() {
        let lines = DialogueLines::default();
        let mut rng = GameRng::seeded(2);
        let loose = AiPlayerInterchange::touch_corners(corners(), false, false, &lines, &mut rng);
        let strict = AiPlayerInterchange::touch_corners(corners(), true, false, &lines, &mut rng);

        let shuffled = PlayerResponse::Path { path: walked(&[1, 0, 2, 3]), in_order: false };
        assert_eq!(loose.validate(&shuffled), TriState::True);
        assert_eq!(strict.validate(&shuffled), TriState::False);

        let in_order = PlayerResponse::Path { path: walked(&[0, 1, 2, 3]), in_order: true };
        assert_eq!(strict.validate(&in_order), TriState::True);

        let partial = PlayerResponse::Path { path: walked(&[0, 1]), in_order: false };
        assert_eq!(loose.validate(&partial), TriState::False);
        assert!(!loose.locks_doors());
        assert!(loose.question_text().ends_with(TOUCH_CORNERS_LINE));
    }

    #[test]
    fn test_first_corners_use_first_lines() {
        let lines = DialogueLines::default();
        let mut rng = GameRng::seeded(3);
        let first = AiPlayerInterchange::touch_corners(corners(), false, true, &lines, &mut rng);
        assert_eq!(first.question_text(), lines.first_request);
        assert_eq!(first.followup_text(true), lines.first_positive);
        assert_eq!(first.followup_text(false), lines.first_negative);
    }

    #[test]
    fn test_lock_is_always_neutral() {
        let lock = AiPlayerInterchange::lock_player_in_room(10.0);
        assert_eq!(lock.validate(&PlayerResponse::Acknowledged), TriState::Neutral);
        assert_eq!(lock.validate(&PlayerResponse::Text("anything".into())), TriState::Neutral);
        assert_eq!(
            lock.question_text(),
            "I'm going to lock you in this room for 10 seconds. Have fun!"
        );
        assert_eq!(lock.followup_text(false), LOCK_FOLLOWUP);
        assert_eq!(lock.channel_request().kind, ChannelKind::Timed { seconds: 10.0 });
    }

    #[test]
    fn test_stay_still() {
        let lines = DialogueLines::default();
        let still = AiPlayerInterchange::stay_still(10.0, &lines, &mut GameRng::seeded(5));
        assert_eq!(still.question_text(), "Please remain still for 10 seconds.");
        assert_eq!(still.validate(&PlayerResponse::Stillness { moved: false }), TriState::True);
        assert_eq!(still.validate(&PlayerResponse::Stillness { moved: true }), TriState::False);
    }

    #[test]
    fn test_mismatched_response_is_neutral() {
        let lines = DialogueLines::default();
        let still = AiPlayerInterchange::stay_still(10.0, &lines, &mut GameRng::seeded(5));
        assert_eq!(still.validate(&PlayerResponse::Text("yes".into())), TriState::Neutral);
    }

    #[test]
    fn test_corner_channel_request_carries_fresh_path() {
        let lines = DialogueLines::default();
        let interchange = AiPlayerInterchange::touch_corners(corners(), true, false, &lines, &mut GameRng::seeded(6));
        let request = interchange.channel_request();
        let ChannelKind::Path { path, in_order } = request.kind else {
            panic!("expected a path request");
        };
        assert!(in_order);
        assert_eq!(path.points(), &corners());
        assert_eq!(path.traversed_count(), 0);
    }
}
