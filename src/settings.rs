//! Game tuning and configuration
//!
//! Every gameplay constant that is not a fixed dimension lives here so a host
//! can load a partial JSON file and override just what it needs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Quiz gate tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
    /// Wrong answers allowed before the engine restarts
    pub max_attempts: u8,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// Falling-block game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockSettings {
    /// Cleared rows between quiz gates
    pub rows_per_quiz: u32,
    /// Cleared rows per level
    pub rows_per_level: u32,
    /// Gravity delay at level 1 (ms)
    pub base_delay_ms: u64,
    /// Gravity delay floor (ms)
    pub min_delay_ms: u64,
    /// Delay reduction per level (ms)
    pub delay_step_ms: u64,
}

impl Default for BlockSettings {
    fn default() -> Self {
        Self {
            rows_per_quiz: 2,
            rows_per_level: 10,
            base_delay_ms: 800,
            min_delay_ms: 200,
            delay_step_ms: 50,
        }
    }
}

impl BlockSettings {
    /// Gravity delay for a level: `max(min, base - (level-1)*step)`
    pub fn tick_delay_ms(&self, level: u32) -> u64 {
        let reduction = u64::from(level.saturating_sub(1)) * self.delay_step_ms;
        self.base_delay_ms
            .saturating_sub(reduction)
            .max(self.min_delay_ms)
    }
}

/// Maze-chase game tuning (speeds and distances are in grid units)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeSettings {
    /// Simulation rate
    pub tick_hz: u32,
    pub actor_speed: f32,
    pub pursuer_speed: f32,
    pub frightened_speed: f32,
    /// Power pellet duration
    pub frightened_ticks: u32,
    /// Scatter/chase alternation period
    pub mode_period_ticks: u32,
    /// Actor/pursuer contact distance
    pub collision_radius: f32,
    /// Corner offset for occupancy checks
    pub wall_margin: f32,
    pub starting_lives: u8,

    // === Scoring ===
    pub dot_points: u64,
    pub pellet_points: u64,
    pub pursuer_points: u64,
}

impl Default for MazeSettings {
    fn default() -> Self {
        Self {
            tick_hz: 30,
            actor_speed: 0.15,
            pursuer_speed: 0.12,
            frightened_speed: 0.08,
            frightened_ticks: 200,
            mode_period_ticks: 200,
            collision_radius: 0.5,
            wall_margin: 0.3,
            starting_lives: 3,

            dot_points: 10,
            pellet_points: 50,
            pursuer_points: 200,
        }
    }
}

impl MazeSettings {
    /// Fixed delay between maze ticks (ms)
    pub fn tick_delay_ms(&self) -> u64 {
        1000 / u64::from(self.tick_hz.max(1))
    }
}

/// All tunables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quiz: QuizSettings,
    pub blocks: BlockSettings,
    pub maze: MazeSettings,
}

impl Settings {
    /// Parse settings from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the engines cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.quiz.max_attempts == 0 {
            return Err(SettingsError::Invalid("quiz.max_attempts must be at least 1".into()));
        }
        if self.blocks.rows_per_quiz == 0 || self.blocks.rows_per_level == 0 {
            return Err(SettingsError::Invalid(
                "blocks.rows_per_quiz and blocks.rows_per_level must be at least 1".into(),
            ));
        }
        if self.blocks.min_delay_ms == 0 {
            return Err(SettingsError::Invalid("blocks.min_delay_ms must be at least 1".into()));
        }
        let maze = &self.maze;
        if maze.tick_hz == 0 {
            return Err(SettingsError::Invalid("maze.tick_hz must be at least 1".into()));
        }
        // Speeds at or above one tile per tick would skip the entering-tile check
        for (name, speed) in [
            ("actor_speed", maze.actor_speed),
            ("pursuer_speed", maze.pursuer_speed),
            ("frightened_speed", maze.frightened_speed),
        ] {
            if !(speed > 0.0 && speed < 1.0) {
                return Err(SettingsError::Invalid(format!(
                    "maze.{name} must be in (0, 1), got {speed}"
                )));
            }
        }
        if !(maze.wall_margin >= 0.0 && maze.wall_margin < 0.5) {
            return Err(SettingsError::Invalid(format!(
                "maze.wall_margin must be in [0, 0.5), got {}",
                maze.wall_margin
            )));
        }
        if !(maze.collision_radius > 0.0) {
            return Err(SettingsError::Invalid("maze.collision_radius must be positive".into()));
        }
        if maze.starting_lives == 0 {
            return Err(SettingsError::Invalid("maze.starting_lives must be at least 1".into()));
        }
        Ok(())
    }
}
