//! Boss profile configuration loading

use super::ConfigError;
use serde::{Deserialize, Serialize};

/// A named boss configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterProfile {
    pub name: String,
    pub base_hp: i64,
    pub base_atk: i64,
    pub base_def: i64,
    /// Artwork reference; purely cosmetic
    #[serde(default)]
    pub image_ref: Option<String>,
}

impl EncounterProfile {
    pub fn new(name: impl Into<String>, base_hp: i64, base_atk: i64, base_def: i64) -> Self {
        EncounterProfile {
            name: name.into(),
            base_hp,
            base_atk,
            base_def,
            image_ref: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationError("profile name is empty".to_string()));
        }
        if self.base_hp <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}' has non-positive base_hp",
                self.name
            )));
        }
        if self.base_atk < 0 || self.base_def < 0 {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}' has negative stats",
                self.name
            )));
        }
        Ok(())
    }
}

/// Container for boss profiles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilesConfig {
    #[serde(default)]
    pub profiles: Vec<EncounterProfile>,
}

impl ProfilesConfig {
    /// Keep only valid profiles, logging the rest
    pub fn into_valid(self) -> Vec<EncounterProfile> {
        self.profiles
            .into_iter()
            .filter(|profile| match profile.validate() {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping invalid boss profile");
                    false
                }
            })
            .collect()
    }
}

/// Parse boss profiles from a TOML string
pub fn parse_profiles(content: &str) -> Result<Vec<EncounterProfile>, ConfigError> {
    let config: ProfilesConfig = super::parse_toml(content)?;
    Ok(config.into_valid())
}
