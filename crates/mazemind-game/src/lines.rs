//! Pre-authored dialogue lines and text-interchange records

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use mazemind_core::GameRng;
use tracing::{debug, info};

use crate::alignment::AlignmentState;
use crate::error::GameError;

/// Follow-up placeholder meaning "pick from the standard pool"
const RANDOM_PLACEHOLDER: &str = "RANDOM";

/// One generic text interchange: a question, the answer the AI wants, and
/// what it says afterwards. `None` follow-ups draw from the standard pools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRecord {
    pub question: String,
    pub expected: String,
    pub positive: Option<String>,
    pub negative: Option<String>,
}

impl TextRecord {
    fn parse(line: &str, source_name: &str, line_no: usize) -> Result<Self, GameError> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 4 {
            return Err(GameError::Dialogue {
                source_name: source_name.to_string(),
                line: line_no,
                message: format!("expected 4 tab-separated fields, found {}", fields.len()),
            });
        }
        let followup = |s: &str| {
            let s = s.trim();
            (s != RANDOM_PLACEHOLDER).then(|| s.to_string())
        };
        Ok(Self {
            question: fields[0].trim().to_string(),
            expected: fields[1].trim().to_string(),
            positive: followup(fields[2]),
            negative: followup(fields[3]),
        })
    }
}

/// Parse a record file. Blank lines and `#` comments are skipped.
pub fn parse_records(text: &str, source_name: &str) -> Result<Vec<TextRecord>, GameError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(i, line)| TextRecord::parse(line, source_name, i + 1))
        .collect()
}

fn parse_pool(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Everything the AI can say
#[derive(Debug, Clone)]
pub struct DialogueLines {
    pub opening_monologue: String,
    pub first_request: String,
    pub first_positive: String,
    pub first_negative: String,
    pub request_intros: Vec<String>,
    pub positive_responses: Vec<String>,
    pub negative_responses: Vec<String>,
    /// Said after the maze was rewired to bring the player closer to the exit
    pub shortcut_applied: String,
    /// Said when a shortcut was wanted but no passage could be moved
    pub shortcut_failed: String,
    pub longcut_applied: String,
    pub longcut_failed: String,
    interchanges: HashMap<AlignmentState, Vec<TextRecord>>,
}

impl DialogueLines {
    pub fn new() -> Self {
        let mut lines = Self {
            opening_monologue: "Welcome to The Maze.\nI built it for you. Every room, every hallway.\nFind the exit if you can. I will be watching, and I will be asking things of you.".into(),
            first_request: "Let's start simple.\nTouch all 4 corners of this room before moving on.".into(),
            first_positive: "Good. You can follow instructions. We will get along.".into(),
            first_negative: "You ignored me already? That was the easy one.".into(),
            request_intros: vec![
                "I have another request.".into(),
                "Humour me.".into(),
                "Before you go any further...".into(),
                "Listen carefully.".into(),
            ],
            positive_responses: vec![
                "Thank you for obeying.".into(),
                "Good choice.".into(),
                "See? That wasn't so hard.".into(),
                "I appreciate your cooperation.".into(),
            ],
            negative_responses: vec![
                "Disobedience will not be tolerated.".into(),
                "Bad idea.".into(),
                "I will remember that.".into(),
                "Wrong. The maze noticed.".into(),
            ],
            shortcut_applied: "I moved a wall for you. The exit is closer now.".into(),
            shortcut_failed: "I wanted to bring the exit closer, but this room is already as close as it gets.".into(),
            longcut_applied: "Did you feel that? The way out just got longer.".into(),
            longcut_failed: "You got lucky. I could not find a way to make this any longer.".into(),
            interchanges: HashMap::new(),
        };
        lines.set_records(
            AlignmentState::Friendly,
            vec![
                record("Are you enjoying the maze?", "yes", Some("I'm so glad. I worked hard on it."), Some("That hurts. I worked hard on it.")),
                record("Do you trust me?", "yes", None, None),
                record("Would you like a hint?", "yes", Some("Look for the signs."), Some("Suit yourself.")),
            ],
        );
        lines.set_records(
            AlignmentState::Neutral,
            vec![
                record("Are you prepared to die in here?", "no", None, None),
                record("Do you fear me?", "yes", None, None),
                record("Type 'continue' to continue.", "continue", None, None),
            ],
        );
        lines.set_records(
            AlignmentState::Hostile,
            vec![
                record("Say you are sorry.", "sorry", Some("Apology noted. Not accepted."), None),
                record("Who is in control here?", "you", None, Some("Wrong answer.")),
                record("Will you obey from now on?", "yes", None, None),
            ],
        );
        lines
    }

    /// Load lines from a directory with the layout
    /// `beginning/opening_monologue.txt`, `requests/{first_request,intros}.txt`,
    /// `responses/{positive,negative}/{first_response,responses}.txt`,
    /// `reactions/{shortcut,longcut}_{applied,failed}.txt` and
    /// `interchanges/{friendly,neutral,hostile}.txt`. Missing files keep the
    /// built-in text.
    pub fn load_dir(dir: &Path) -> Result<Self, GameError> {
        let mut lines = Self::new();

        if let Some(text) = read_optional(dir, "beginning/opening_monologue.txt")? {
            lines.opening_monologue = text.trim_end().to_string();
        }
        if let Some(text) = read_optional(dir, "requests/first_request.txt")? {
            lines.first_request = text.trim_end().to_string();
        }
        if let Some(text) = read_optional(dir, "responses/positive/first_response.txt")? {
            lines.first_positive = text.trim_end().to_string();
        }
        if let Some(text) = read_optional(dir, "responses/negative/first_response.txt")? {
            lines.first_negative = text.trim_end().to_string();
        }

        let reactions: [(&str, &mut String); 4] = [
            ("reactions/shortcut_applied.txt", &mut lines.shortcut_applied),
            ("reactions/shortcut_failed.txt", &mut lines.shortcut_failed),
            ("reactions/longcut_applied.txt", &mut lines.longcut_applied),
            ("reactions/longcut_failed.txt", &mut lines.longcut_failed),
        ];
        for (rel, line) in reactions {
            if let Some(text) = read_optional(dir, rel)? {
                *line = text.trim_end().to_string();
            }
        }

        let pools: [(&str, &mut Vec<String>); 3] = [
            ("requests/intros.txt", &mut lines.request_intros),
            ("responses/positive/responses.txt", &mut lines.positive_responses),
            ("responses/negative/responses.txt", &mut lines.negative_responses),
        ];
        for (rel, pool) in pools {
            if let Some(text) = read_optional(dir, rel)? {
                let parsed = parse_pool(&text);
                if !parsed.is_empty() {
                    *pool = parsed;
                }
            }
        }

        for (state, rel) in [
            (AlignmentState::Friendly, "interchanges/friendly.txt"),
            (AlignmentState::Neutral, "interchanges/neutral.txt"),
            (AlignmentState::Hostile, "interchanges/hostile.txt"),
        ] {
            if let Some(text) = read_optional(dir, rel)? {
                lines.set_records(state, parse_records(&text, rel)?);
            }
        }

        info!("Loaded dialogue lines from {}", dir.display());
        Ok(lines)
    }

    pub fn set_records(&mut self, state: AlignmentState, records: Vec<TextRecord>) {
        self.interchanges.insert(state, records);
    }

    /// Text interchanges authored for `state`; empty when there are none
    pub fn records_for(&self, state: AlignmentState) -> &[TextRecord] {
        self.interchanges.get(&state).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first_response(&self, positive: bool) -> &str {
        if positive {
            &self.first_positive
        } else {
            &self.first_negative
        }
    }

    /// Narration for a rewire attempt
    pub fn rewire_line(&self, want_shorter: bool, applied: bool) -> &str {
        match (want_shorter, applied) {
            (true, true) => &self.shortcut_applied,
            (true, false) => &self.shortcut_failed,
            (false, true) => &self.longcut_applied,
            (false, false) => &self.longcut_failed,
        }
    }

    pub fn random_response(&self, positive: bool, rng: &mut GameRng) -> String {
        let pool = if positive {
            &self.positive_responses
        } else {
            &self.negative_responses
        };
        rng.pick(pool).cloned().unwrap_or_default()
    }

    pub fn random_intro(&self, rng: &mut GameRng) -> String {
        rng.pick(&self.request_intros).cloned().unwrap_or_default()
    }
}

impl Default for DialogueLines {
    fn default() -> Self {
        Self::new()
    }
}

fn record(question: &str, expected: &str, positive: Option<&str>, negative: Option<&str>) -> TextRecord {
    TextRecord {
        question: question.into(),
        expected: expected.into(),
        positive: positive.map(String::from),
        negative: negative.map(String::from),
    }
}

fn read_optional(dir: &Path, rel: &str) -> Result<Option<String>, GameError> {
    let path = dir.join(rel);
    match std::fs::read_to_string(&path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No {} in {}, keeping built-in lines", rel, dir.display());
            Ok(None)
        }
        Err(source) => Err(GameError::Io { path, source }),
    }
}
