//! Reward configuration loading

use super::ConfigError;
use crate::reward::RewardConfig;

/// Parse a reward config from a TOML string
pub fn parse_reward_config(content: &str) -> Result<RewardConfig, ConfigError> {
    let config: RewardConfig = super::parse_toml(content)?;
    for kind in std::iter::once(&config.primary).chain(config.secondary.iter()) {
        if let Some(rule) = kind
            .rules
            .iter()
            .find(|rule| rule.min_participants > rule.max_participants)
        {
            return Err(ConfigError::ValidationError(format!(
                "reward '{}' has rule with min {} above max {}",
                kind.name, rule.min_participants, rule.max_participants
            )));
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rewards() {
        let toml = r#"
[primary]
name = "crowns"

[[primary.rules]]
min_participants = 1
max_participants = 5
amount = 2

[[primary.rules]]
min_participants = 6
max_participants = 20
amount = 5

[[secondary]]
name = "coins"
enabled = false

[[secondary.rules]]
min_participants = 1
max_participants = 20
amount = 300
"#;

        let config = parse_reward_config(toml).unwrap();
        assert_eq!(config.primary.rules.len(), 2);
        assert!(config.primary.enabled);
        assert_eq!(config.primary.total_for(7), 5);
        assert!(!config.secondary[0].enabled);
    }

    #[test]
    fn test_inverted_rule_rejected() {
        let toml = r#"
[primary]
name = "crowns"

[[primary.rules]]
min_participants = 9
max_participants = 2
amount = 1
"#;

        assert!(matches!(
            parse_reward_config(toml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_missing_primary_is_parse_error() {
        assert!(matches!(
            parse_reward_config("[[secondary]]\nname = \"coins\""),
            Err(ConfigError::ParseError(_))
        ));
    }
}
