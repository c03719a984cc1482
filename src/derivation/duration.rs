//! Stage duration model.
//!
//! ```text
//! duration(p, t) = p·t
//!                + (p > elimination_cap ? (p / 2)·t : 0)
//!                + (p > final_cap       ? final_cap·t : 0)
//!                + break
//! ```
//!
//! `t` is minutes per participant. The extra terms are judging overhead
//! for rounds that cut the field; `p / 2` is real division.

use serde::{Deserialize, Serialize};

/// Break between consecutive stages (minutes).
pub const BREAK_BETWEEN_GROUPS: f64 = 2.0;

/// Largest field that skips the elimination round.
pub const ELIMINATION_CAP: u32 = 19;

/// Final size; larger fields hold a semifinal first.
pub const FINAL_CAP: u32 = 8;

/// Parameters of the duration formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationModel {
    /// Fixed changeover added to every stage (minutes).
    pub break_minutes: f64,
    /// Elimination threshold and elimination survivors.
    pub elimination_cap: u32,
    /// Semifinal threshold and final size.
    pub final_cap: u32,
}

impl DurationModel {
    /// Duration in minutes of a round with `participants` competitors
    /// and `minutes_per_participant` per performance.
    pub fn duration(&self, participants: u32, minutes_per_participant: f64) -> f64 {
        let p = f64::from(participants);
        let t = minutes_per_participant;
        let mut duration = p * t;

        if participants > self.elimination_cap {
            duration += (p / 2.0) * t;
        }
        if participants > self.final_cap {
            duration += f64::from(self.final_cap) * t;
        }

        duration + self.break_minutes
    }
}

impl Default for DurationModel {
    fn default() -> Self {
        Self {
            break_minutes: BREAK_BETWEEN_GROUPS,
            elimination_cap: ELIMINATION_CAP,
            final_cap: FINAL_CAP,
        }
    }
}

/// Duration with the default model.
///
/// ```
/// use court_scheduler::derivation::stage_duration;
///
/// assert_eq!(stage_duration(25, 2.0), 93.0);
/// ```
pub fn stage_duration(participants: u32, minutes_per_participant: f64) -> f64 {
    DurationModel::default().duration(participants, minutes_per_participant)
}
