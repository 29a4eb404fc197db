//! ConfigProvider implementations

use super::{load_toml, parse_reward_config, ConfigError, EncounterProfile, ProfilesConfig};
use crate::host::ConfigProvider;
use crate::reward::RewardConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads profiles and rewards from TOML files on every request.
///
/// Missing or malformed files degrade to an empty profile list or a disabled
/// reward config.
#[derive(Debug, Clone)]
pub struct TomlConfigProvider {
    profiles_path: PathBuf,
    rewards_path: PathBuf,
}

impl TomlConfigProvider {
    pub fn new(profiles_path: impl Into<PathBuf>, rewards_path: impl Into<PathBuf>) -> Self {
        TomlConfigProvider {
            profiles_path: profiles_path.into(),
            rewards_path: rewards_path.into(),
        }
    }

    /// Use `bosses.toml` and `rewards.toml` inside `dir`
    pub fn from_dir(dir: &Path) -> Self {
        Self::new(dir.join("bosses.toml"), dir.join("rewards.toml"))
    }

    fn try_load_rewards(&self) -> Result<RewardConfig, ConfigError> {
        let content = fs::read_to_string(&self.rewards_path)?;
        parse_reward_config(&content)
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn load_encounter_profiles(&self) -> Vec<EncounterProfile> {
        match load_toml::<ProfilesConfig>(&self.profiles_path) {
            Ok(config) => config.into_valid(),
            Err(e) => {
                tracing::warn!(
                    path = %self.profiles_path.display(),
                    error = %e,
                    "Failed to load boss profiles"
                );
                Vec::new()
            }
        }
    }

    fn load_reward_config(&self) -> RewardConfig {
        match self.try_load_rewards() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    path = %self.rewards_path.display(),
                    error = %e,
                    "Failed to load reward config, rewards disabled"
                );
                RewardConfig::disabled()
            }
        }
    }
}

/// In-memory configuration
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    pub profiles: Vec<EncounterProfile>,
    pub rewards: RewardConfig,
}

impl StaticConfig {
    pub fn new(profiles: Vec<EncounterProfile>, rewards: RewardConfig) -> Self {
        StaticConfig { profiles, rewards }
    }
}

impl ConfigProvider for StaticConfig {
    fn load_encounter_profiles(&self) -> Vec<EncounterProfile> {
        self.profiles.clone()
    }

    fn load_reward_config(&self) -> RewardConfig {
        self.rewards.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("raid_core_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_files_degrade() {
        let provider = TomlConfigProvider::from_dir(Path::new("/nonexistent/raid/config"));

        assert!(provider.load_encounter_profiles().is_empty());
        assert_eq!(provider.load_reward_config(), RewardConfig::disabled());
    }

    #[test]
    fn test_malformed_rewards_degrade() {
        let dir = scratch_dir("malformed");
        fs::write(dir.join("rewards.toml"), "primary = [[[").unwrap();
        fs::write(
            dir.join("bosses.toml"),
            "[[profiles]]\nname = \"Ravager\"\nbase_hp = 1000\nbase_atk = 200\nbase_def = 80\n",
        )
        .unwrap();

        let provider = TomlConfigProvider::from_dir(&dir);
        assert_eq!(provider.load_encounter_profiles().len(), 1);
        assert_eq!(provider.load_reward_config().enabled_kinds().count(), 0);

        fs::remove_dir_all(&dir).ok();
    }
}
