//! Raid tunables: player stats and timing

use super::{load_toml, parse_toml, ConfigError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Inclusive integer range rolled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRange {
    pub min: i64,
    pub max: i64,
}

impl StatRange {
    pub fn new(min: i64, max: i64) -> Self {
        StatRange { min, max }
    }

    /// Roll a value in [min, max]
    pub fn roll(&self, rng: &mut impl Rng) -> i64 {
        if self.min >= self.max {
            self.max
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Tunable raid settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaidSettings {
    /// Starting (and max) HP for every player
    #[serde(default = "default_player_hp")]
    pub player_hp: i64,
    /// Player attack is rolled in this range on join
    #[serde(default = "default_player_attack")]
    pub player_attack: StatRange,
    /// Player defense is rolled in this range on join
    #[serde(default = "default_player_defense")]
    pub player_defense: StatRange,
    /// Join window length; does not reset when players join
    #[serde(default = "default_join_window_secs")]
    pub join_window_secs: u64,
    /// Per-turn action collection window
    #[serde(default = "default_action_window_secs")]
    pub action_window_secs: u64,
    /// Pause between a resolved turn and the next one
    #[serde(default = "default_turn_pause_secs")]
    pub turn_pause_secs: u64,
    /// Fixed RNG seed for reproducible encounters
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for RaidSettings {
    fn default() -> Self {
        RaidSettings {
            player_hp: default_player_hp(),
            player_attack: default_player_attack(),
            player_defense: default_player_defense(),
            join_window_secs: default_join_window_secs(),
            action_window_secs: default_action_window_secs(),
            turn_pause_secs: default_turn_pause_secs(),
            seed: None,
        }
    }
}

impl RaidSettings {
    pub fn join_window(&self) -> Duration {
        Duration::from_secs(self.join_window_secs)
    }

    pub fn action_window(&self) -> Duration {
        Duration::from_secs(self.action_window_secs)
    }

    pub fn turn_pause(&self) -> Duration {
        Duration::from_secs(self.turn_pause_secs)
    }

    /// Load and validate settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings: RaidSettings = load_toml(path)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let settings: RaidSettings = parse_toml(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player_hp <= 0 {
            return Err(ConfigError::ValidationError(
                "player_hp must be positive".to_string(),
            ));
        }
        for (name, range) in [("player_attack", self.player_attack), ("player_defense", self.player_defense)] {
            if range.min > range.max || range.min < 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{} range {}..={} is invalid",
                    name, range.min, range.max
                )));
            }
        }
        if self.action_window_secs == 0 {
            return Err(ConfigError::ValidationError(
                "action_window_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_player_hp() -> i64 {
    1750
}
fn default_player_attack() -> StatRange {
    StatRange::new(90, 140)
}
fn default_player_defense() -> StatRange {
    StatRange::new(30, 90)
}
fn default_join_window_secs() -> u64 {
    60
}
fn default_action_window_secs() -> u64 {
    20
}
fn default_turn_pause_secs() -> u64 {
    1
}
