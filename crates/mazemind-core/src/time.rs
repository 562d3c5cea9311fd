//! Tick clock and countdown timers
//!
//! The game is polled once per simulation tick. Everything that "waits" in
//! MazeMind is a countdown checked on later ticks, never a blocking call.

use serde::{Deserialize, Serialize};

/// Configuration for the tick clock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeConfig {
    /// How many in-game seconds pass per real second
    pub time_scale: f32,
    /// Maximum delta time to prevent spiral of death
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_delta_time: 0.25,
        }
    }
}

/// Game time tracking across ticks
#[derive(Debug, Clone, Default)]
pub struct TickClock {
    pub config: TimeConfig,
    /// Time since game start in seconds
    pub total_time: f64,
    /// Delta time for this tick (clamped and scaled)
    pub delta_time: f32,
    /// Tick counter
    pub tick_count: u64,
    pub paused: bool,
}

impl TickClock {
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Advance by the raw delta from the previous tick
    pub fn update(&mut self, raw_delta: f32) {
        self.tick_count += 1;

        if self.paused {
            self.delta_time = 0.0;
            return;
        }

        self.delta_time = raw_delta.min(self.config.max_delta_time) * self.config.time_scale;
        self.total_time += self.delta_time as f64;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }
}

/// A countdown that finishes once enough delta time has been fed to it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: seconds.max(0.0),
        }
    }

    /// Subtract `delta` seconds. Returns `true` once the countdown is finished.
    pub fn tick(&mut self, delta: f32) -> bool {
        self.remaining = (self.remaining - delta).max(0.0);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}
