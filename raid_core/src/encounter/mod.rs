//! Encounter - Raid lifecycle, event stream and per-context registry

mod events;
mod machine;
mod registry;
mod runner;

pub use events::{
    CancelReason, EncounterSnapshot, EncounterStarted, JoinOutcome, RaidEvent, TurnOpening,
};
pub use machine::{make_rng, Encounter};
pub use registry::{pick_profile, RaidRegistry};
