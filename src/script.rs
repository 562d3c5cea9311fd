//! Scripted stand-in for a human player
//!
//! The script walks the maze tree toward the exit, answers the AI, and decides
//! per request whether to comply. It only sees what a player would: the open
//! request, the maze it can walk, and whether its doors are shut.

use std::collections::VecDeque;

use glam::Vec3;
use mazemind_core::{CellCoord, GameRng};
use mazemind_game::{
    AlignmentState, ChannelKind, ChannelRequest, DialogueLines, GameSession, PlayerSnapshot,
};
use mazemind_maze::EffectLog;
use tracing::debug;

/// Text given when the script refuses to answer properly
const DEFIANT_ANSWER: &str = "make me";
/// Text given when no authored record matches the question
const FALLBACK_ANSWER: &str = "yes";
/// How far the script shuffles when it ignores a stillness request
const FIDGET: f32 = 0.25;

/// Build a text responder that answers authored questions with their
/// expected answer, except when the compliance roll fails.
pub fn responder(lines: DialogueLines, compliance: f64, mut rng: GameRng) -> Box<dyn FnMut(&str) -> String> {
    Box::new(move |message: &str| {
        if !rng.chance(compliance) {
            return DEFIANT_ANSWER.to_string();
        }
        AlignmentState::ALL
            .iter()
            .flat_map(|state| lines.records_for(*state))
            .find(|record| message.ends_with(record.question.as_str()))
            .map(|record| record.expected.clone())
            .unwrap_or_else(|| FALLBACK_ANSWER.to_string())
    })
}

#[derive(Debug)]
enum Plan {
    Walk,
    Trace(VecDeque<Vec3>),
    Hold,
    Fidget,
}

#[derive(Debug)]
pub struct ScriptedPlayer {
    cell: CellCoord,
    position: Vec3,
    rng: GameRng,
    compliance: f64,
    plan: Plan,
    seen: Option<ChannelRequest>,
    fidget_sign: f32,
}

impl ScriptedPlayer {
    pub fn new(session: &GameSession, compliance: f64, rng: GameRng) -> Self {
        Self {
            cell: session.start(),
            position: session.spawn_position(),
            rng,
            compliance,
            plan: Plan::Walk,
            seen: None,
            fidget_sign: 1.0,
        }
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot::new(self.cell, self.position)
    }

    /// Decide what to do this tick and return where the player ends up
    pub fn step(
        &mut self,
        session: &GameSession,
        request: Option<&ChannelRequest>,
        effects: &EffectLog,
    ) -> PlayerSnapshot {
        match request {
            Some(request) if self.seen.as_ref() != Some(request) => {
                self.plan = self.plan_for(request);
                debug!("Script reacting to {} request with {:?}", request.kind.name(), self.plan);
                self.seen = Some(request.clone());
            }
            Some(_) => {}
            None => {
                self.seen = None;
                if matches!(self.plan, Plan::Hold | Plan::Fidget) {
                    self.plan = Plan::Walk;
                }
            }
        }

        match &mut self.plan {
            Plan::Trace(corners) => match corners.pop_front() {
                Some(corner) => self.position = corner,
                None => {
                    self.plan = Plan::Walk;
                    self.walk(session, effects);
                }
            },
            Plan::Hold => {}
            Plan::Fidget => {
                self.position.x += FIDGET * self.fidget_sign;
                self.fidget_sign = -self.fidget_sign;
            }
            Plan::Walk => self.walk(session, effects),
        }
        self.snapshot()
    }

    fn plan_for(&mut self, request: &ChannelRequest) -> Plan {
        let obey = self.rng.chance(self.compliance);
        match &request.kind {
            ChannelKind::Path { path, .. } if obey => {
                let mut corners: Vec<(usize, Vec3)> = path.unvisited().collect();
                corners.sort_by_key(|(index, _)| *index);
                Plan::Trace(corners.into_iter().map(|(_, corner)| corner).collect())
            }
            ChannelKind::Path { .. } => Plan::Walk,
            ChannelKind::Stillness { .. } if obey => Plan::Hold,
            ChannelKind::Stillness { .. } => Plan::Fidget,
            ChannelKind::Timed { .. } | ChannelKind::Text => Plan::Hold,
        }
    }

    fn walk(&mut self, session: &GameSession, effects: &EffectLog) {
        if effects.doors_closed(self.cell) {
            return;
        }
        let maze = session.maze();
        let toward_exit = maze
            .path_to_exit(self.cell)
            .ok()
            .and_then(|path| path.get(1).copied());

        let wander = session.ai().state() == AlignmentState::Hostile && !self.rng.chance(self.compliance);
        let next = if wander {
            let neighbors = maze.tree_neighbors(self.cell).unwrap_or_default();
            self.rng.pick(&neighbors).copied().or(toward_exit)
        } else {
            toward_exit
        };

        if let Some(next) = next {
            self.cell = next;
            self.position = session.layout().cell_local_position(next);
        }
    }
}
