//! Game settings with persistence
//!
//! Settings are saved to `~/.config/mazemind/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use mazemind_core::TimeConfig;
use mazemind_game::{AlignmentThresholds, InterchangeTimings};
use mazemind_maze::MazeLayout;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All game settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub maze: MazeSettings,
    pub ai: AiSettings,
    pub simulation: SimulationSettings,
}

impl GameSettings {
    fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mazemind").join("settings.toml"))
    }

    /// Load settings from disk. A missing file is created with the defaults.
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, writing defaults");
            let settings = Self::default();
            if let Err(e) = settings.save() {
                warn!("Failed to write default settings: {}", e);
            }
            return settings;
        }

        Self::load_from(&path)
    }

    /// Read settings from `path`, falling back to defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                warn!("Failed to parse settings: {}, using defaults", e);
                Self::default()
            }),
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(path) = Self::settings_path() else {
            anyhow::bail!("Could not determine config directory");
        };
        self.save_to(&path)
    }

    /// Write settings to `path`, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Maze dimensions and spacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeSettings {
    /// Cells along x
    pub width: u32,
    /// Cells along z
    pub height: u32,
    /// Distance between the centres of adjacent rooms
    pub room_separation: f32,
    pub scale: f32,
}

impl Default for MazeSettings {
    fn default() -> Self {
        let layout = MazeLayout::default();
        Self {
            width: layout.width,
            height: layout.height,
            room_separation: layout.room_separation,
            scale: layout.scale,
        }
    }
}

impl MazeSettings {
    pub fn layout(&self) -> MazeLayout {
        MazeLayout {
            width: self.width,
            height: self.height,
            room_separation: self.room_separation,
            scale: self.scale,
        }
    }
}

/// How quickly the AI turns, and how long its requests last
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// Infraction count at or below which the AI is friendly
    pub friendly_threshold: i32,
    /// Infraction count at or above which the AI is hostile
    pub hostile_threshold: i32,
    pub very_friendly_threshold: Option<i32>,
    pub very_hostile_threshold: Option<i32>,
    /// Seconds the player stays locked in a room
    pub lock_seconds: f32,
    /// Seconds the player must stand still
    pub stillness_seconds: f32,
}

impl Default for AiSettings {
    fn default() -> Self {
        let thresholds = AlignmentThresholds::default();
        let timings = InterchangeTimings::default();
        Self {
            friendly_threshold: thresholds.friendly,
            hostile_threshold: thresholds.hostile,
            very_friendly_threshold: thresholds.very_friendly,
            very_hostile_threshold: thresholds.very_hostile,
            lock_seconds: timings.lock_seconds,
            stillness_seconds: timings.stillness_seconds,
        }
    }
}

impl AiSettings {
    pub fn thresholds(&self) -> AlignmentThresholds {
        AlignmentThresholds {
            friendly: self.friendly_threshold,
            hostile: self.hostile_threshold,
            very_friendly: self.very_friendly_threshold,
            very_hostile: self.very_hostile_threshold,
        }
    }

    pub fn timings(&self) -> InterchangeTimings {
        InterchangeTimings {
            lock_seconds: self.lock_seconds,
            stillness_seconds: self.stillness_seconds,
        }
    }
}

/// Headless run parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Fixed seed for a reproducible run; unset draws from entropy
    pub seed: Option<u64>,
    pub max_ticks: u64,
    /// Simulated seconds per tick
    pub tick_seconds: f32,
    /// Time scale multiplier
    pub time_scale: f32,
    /// Probability (0.0 to 1.0) that the scripted player does what it is told
    pub compliance: f64,
    /// Directory to load dialogue lines from; unset uses the built-in lines
    pub lines_dir: Option<PathBuf>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            seed: None,
            max_ticks: 2000,
            tick_seconds: 0.25,
            time_scale: 1.0,
            compliance: 0.7,
            lines_dir: None,
        }
    }
}

impl SimulationSettings {
    pub fn time_config(&self) -> TimeConfig {
        TimeConfig {
            time_scale: self.time_scale,
            ..Default::default()
        }
    }
}
