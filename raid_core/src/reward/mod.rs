//! Rewards - Scaled reward pools split among survivors

mod allocator;

pub use allocator::{allocate_rewards, distribute_units};

use crate::types::ParticipantId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reward amount for a range of joined-player counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingRule {
    pub min_participants: usize,
    pub max_participants: usize,
    pub amount: u32,
}

impl ScalingRule {
    pub fn new(min_participants: usize, max_participants: usize, amount: u32) -> Self {
        ScalingRule {
            min_participants,
            max_participants,
            amount,
        }
    }

    pub fn matches(&self, participants: usize) -> bool {
        participants >= self.min_participants && participants <= self.max_participants
    }
}

/// A single kind of reward and how its pool scales
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardKind {
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub rules: Vec<ScalingRule>,
}

fn default_enabled() -> bool {
    true
}

impl RewardKind {
    pub fn new(name: impl Into<String>, rules: Vec<ScalingRule>) -> Self {
        RewardKind {
            name: name.into(),
            enabled: true,
            rules,
        }
    }

    /// Pool size for a joined-player count (first matching rule wins)
    pub fn total_for(&self, participants: usize) -> u32 {
        self.rules
            .iter()
            .find(|rule| rule.matches(participants))
            .map(|rule| rule.amount)
            .unwrap_or(0)
    }
}

/// Primary reward plus any number of independently toggled secondary rewards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardConfig {
    pub primary: RewardKind,
    #[serde(default)]
    pub secondary: Vec<RewardKind>,
}

impl Default for RewardConfig {
    fn default() -> Self {
        RewardConfig::disabled()
    }
}

impl RewardConfig {
    /// Config that hands out nothing
    pub fn disabled() -> Self {
        RewardConfig {
            primary: RewardKind {
                name: "primary".to_string(),
                enabled: false,
                rules: Vec::new(),
            },
            secondary: Vec::new(),
        }
    }

    /// Enabled kinds in config order, primary first
    pub fn enabled_kinds(&self) -> impl Iterator<Item = &RewardKind> {
        std::iter::once(&self.primary)
            .chain(self.secondary.iter())
            .filter(|kind| kind.enabled)
    }
}

/// Units of one reward kind handed to each survivor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardAllocation {
    pub kind: String,
    /// Pool size from the matching scaling rule
    pub total: u32,
    pub awards: BTreeMap<ParticipantId, u32>,
}

impl RewardAllocation {
    /// Units actually handed out
    pub fn distributed(&self) -> u32 {
        self.awards.values().sum()
    }
}

/// Final payout of every enabled reward kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardResult {
    pub allocations: Vec<RewardAllocation>,
}

impl RewardResult {
    pub fn allocation(&self, kind: &str) -> Option<&RewardAllocation> {
        self.allocations.iter().find(|a| a.kind == kind)
    }

    /// Units of `kind` awarded to a participant
    pub fn units_for(&self, kind: &str, participant: ParticipantId) -> u32 {
        self.allocation(kind)
            .and_then(|a| a.awards.get(&participant).copied())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.allocations.iter().all(|a| a.awards.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_rule_wins() {
        let kind = RewardKind::new(
            "gems",
            vec![
                ScalingRule::new(1, 5, 3),
                ScalingRule::new(4, 10, 8),
                ScalingRule::new(11, 50, 20),
            ],
        );

        assert_eq!(kind.total_for(4), 3);
        assert_eq!(kind.total_for(6), 8);
        assert_eq!(kind.total_for(50), 20);
        assert_eq!(kind.total_for(51), 0);
        assert_eq!(kind.total_for(0), 0);
    }

    #[test]
    fn test_disabled_kinds_skipped() {
        let mut config = RewardConfig {
            primary: RewardKind::new("crowns", vec![ScalingRule::new(1, 10, 1)]),
            secondary: vec![
                RewardKind::new("coins", vec![]),
                RewardKind::new("badges", vec![]),
            ],
        };
        config.secondary[0].enabled = false;

        let names: Vec<&str> = config.enabled_kinds().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["crowns", "badges"]);
    }

    #[test]
    fn test_default_is_fully_disabled() {
        assert_eq!(RewardConfig::default().enabled_kinds().count(), 0);
    }
}
