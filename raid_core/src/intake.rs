//! Action intake - Time-boxed collection of one action per living player
//!
//! A gate is opened for a turn with the set of eligible participants and a
//! deadline. Until the deadline passes each eligible participant may submit;
//! a later submission replaces the earlier one. Closing the gate hands back
//! the final choices; players missing from the map submitted nothing.

use crate::error::RaidError;
use crate::types::{Action, ParticipantId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tokio::time::Instant;

/// Acknowledgement of an accepted submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub turn: u32,
    pub action: Action,
    /// Earlier choice this submission overwrote
    pub replaced: Option<Action>,
}

/// Per-turn action collector
#[derive(Debug, Clone, Default)]
pub struct ActionIntake {
    turn: u32,
    eligible: HashSet<ParticipantId>,
    deadline: Option<Instant>,
    submissions: HashMap<ParticipantId, Action>,
}

impl ActionIntake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start collecting for `turn` until `deadline`
    pub fn open(
        &mut self,
        turn: u32,
        eligible: impl IntoIterator<Item = ParticipantId>,
        deadline: Instant,
    ) {
        self.turn = turn;
        self.eligible = eligible.into_iter().collect();
        self.deadline = Some(deadline);
        self.submissions.clear();
    }

    pub fn is_open(&self) -> bool {
        self.deadline.is_some()
    }

    /// Open and not yet past its deadline
    pub fn accepts_at(&self, now: Instant) -> bool {
        self.deadline.map_or(false, |deadline| now <= deadline)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn is_eligible(&self, participant: ParticipantId) -> bool {
        self.eligible.contains(&participant)
    }

    pub fn submitted_count(&self) -> usize {
        self.submissions.len()
    }

    /// Record a choice; last submission wins
    pub fn submit(
        &mut self,
        participant: ParticipantId,
        action: Action,
        now: Instant,
    ) -> Result<SubmitReceipt, RaidError> {
        if !self.accepts_at(now) {
            return Err(RaidError::NoActiveTurn);
        }
        if !self.is_eligible(participant) {
            return Err(RaidError::NotAlive(participant));
        }
        let replaced = self.submissions.insert(participant, action);
        Ok(SubmitReceipt {
            turn: self.turn,
            action,
            replaced,
        })
    }

    /// Stop collecting and take the final choices
    pub fn close(&mut self) -> HashMap<ParticipantId, Action> {
        self.deadline = None;
        self.eligible.clear();
        std::mem::take(&mut self.submissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn open_gate(now: Instant) -> ActionIntake {
        let mut gate = ActionIntake::new();
        gate.open(
            3,
            [ParticipantId(1), ParticipantId(2)],
            now + Duration::from_secs(20),
        );
        gate
    }

    #[test]
    fn test_last_submission_wins() {
        let now = Instant::now();
        let mut gate = open_gate(now);

        let first = gate.submit(ParticipantId(1), Action::Attack, now).unwrap();
        assert_eq!(first.replaced, None);
        assert_eq!(first.turn, 3);

        let second = gate
            .submit(ParticipantId(1), Action::Defend, now + Duration::from_secs(5))
            .unwrap();
        assert_eq!(second.replaced, Some(Action::Attack));

        let actions = gate.close();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[&ParticipantId(1)], Action::Defend);
        // Player 2 never submitted
        assert!(!actions.contains_key(&ParticipantId(2)));
    }

    #[test]
    fn test_submission_at_deadline_accepted_after_rejected() {
        let now = Instant::now();
        let mut gate = open_gate(now);

        assert!(gate
            .submit(ParticipantId(2), Action::Heal, now + Duration::from_secs(20))
            .is_ok());
        assert_eq!(
            gate.submit(ParticipantId(1), Action::Heal, now + Duration::from_millis(20_001)),
            Err(RaidError::NoActiveTurn)
        );
    }

    #[test]
    fn test_ineligible_rejected() {
        let now = Instant::now();
        let mut gate = open_gate(now);

        assert_eq!(
            gate.submit(ParticipantId(9), Action::Attack, now),
            Err(RaidError::NotAlive(ParticipantId(9)))
        );
    }

    #[test]
    fn test_closed_gate_rejects() {
        let now = Instant::now();
        let mut gate = open_gate(now);
        gate.close();

        assert!(!gate.is_open());
        assert_eq!(
            gate.submit(ParticipantId(1), Action::Attack, now),
            Err(RaidError::NoActiveTurn)
        );
    }

    #[test]
    fn test_reopen_clears_previous_turn() {
        let now = Instant::now();
        let mut gate = open_gate(now);
        gate.submit(ParticipantId(1), Action::Attack, now).unwrap();

        gate.open(4, [ParticipantId(1)], now + Duration::from_secs(20));
        assert_eq!(gate.submitted_count(), 0);
        assert_eq!(gate.turn(), 4);
    }
}
