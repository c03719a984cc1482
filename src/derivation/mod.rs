//! Stage derivation.
//!
//! Turns roster entries into ordered stage chains with computed durations.
//!
//! - **`duration`**: the stage duration formula
//! - **`cascade`**: elimination → semifinal → final rules and the roster-wide
//!   derivation with its missing-timing report

mod cascade;
mod duration;

pub use cascade::{cascade, derive_group, derive_stages, Derivation, MissingTiming};
pub use duration::{
    stage_duration, DurationModel, BREAK_BETWEEN_GROUPS, ELIMINATION_CAP, FINAL_CAP,
};
