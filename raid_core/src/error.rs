//! User-facing errors raised by raid operations
//!
//! Every variant is recoverable: the caller reports it to the requester and
//! the encounter carries on unaffected.

use crate::types::ParticipantId;
use thiserror::Error;

/// Raid operation error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RaidError {
    #[error("a raid is already in progress")]
    AlreadyActive,
    #[error("no boss profiles are available")]
    NoProfilesAvailable,
    #[error("no boss profile named '{0}'")]
    ProfileNotFound(String),
    #[error("requester is not authorized for this operation")]
    NotAuthorized,
    #[error("there is no open join window")]
    NotInJoinWindow,
    #[error("no turn is currently collecting actions")]
    NoActiveTurn,
    #[error("participant {0} has been defeated")]
    NotAlive(ParticipantId),
    #[error("participant id {0} is reserved")]
    ReservedParticipant(ParticipantId),
    #[error("participant {0} is not in the raid")]
    NotInEncounter(ParticipantId),
    #[error("there is no active raid")]
    NoActiveEncounter,
}
