//! Schedule (solution) model.
//!
//! A schedule is the flat list of slots produced by one scheduling run:
//! every stage bound to a court and a time interval. It may be checked
//! for constraint violations after the fact (see `validation`).

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Stage;

/// Number of parallel courts.
pub const COURT_COUNT: u8 = 3;

/// A stage placed on a court and a time interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    /// Court number (1-based).
    pub court: u8,
    /// Start time.
    pub start: NaiveDateTime,
    /// End time (start + stage duration).
    pub end: NaiveDateTime,
    /// The placed stage.
    pub stage: Stage,
}

impl ScheduleSlot {
    /// Creates a new slot.
    pub fn new(court: u8, start: NaiveDateTime, end: NaiveDateTime, stage: Stage) -> Self {
        Self {
            court,
            start,
            end,
            stage,
        }
    }

    /// Length of the slot.
    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Length of the slot in fractional minutes.
    pub fn duration_minutes(&self) -> f64 {
        self.duration().num_microseconds().unwrap_or(i64::MAX) as f64 / 60_000_000.0
    }
}

/// A constraint violation found in a schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity (group ID or court label).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of schedule violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// A stage is missing from the schedule or placed twice.
    Incomplete,
    /// Court number outside `1..=COURT_COUNT`.
    InvalidCourt,
    /// A stage started before its predecessor in the chain finished.
    PrecedenceViolation,
    /// A chain moved to a different court mid-way.
    CourtChange,
    /// Two slots overlap on one court.
    CourtOverlap,
    /// A slot runs during the lunch blackout.
    BlackoutIntersection,
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

/// The output of one scheduling run.
///
/// Slots are kept sorted by `(start, court)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Placed stages.
    pub slots: Vec<ScheduleSlot>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schedule from slots, sorting them by `(start, court)`.
    pub fn from_slots(mut slots: Vec<ScheduleSlot>) -> Self {
        slots.sort_by(|a, b| a.start.cmp(&b.start).then(a.court.cmp(&b.court)));
        Self { slots }
    }

    /// Whether no stage was placed.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Earliest start across all slots.
    pub fn first_start(&self) -> Option<NaiveDateTime> {
        self.slots.iter().map(|s| s.start).min()
    }

    /// Latest end across all slots.
    pub fn last_end(&self) -> Option<NaiveDateTime> {
        self.slots.iter().map(|s| s.end).max()
    }

    /// Slots on one court, in start order.
    pub fn slots_for_court(&self, court: u8) -> Vec<&ScheduleSlot> {
        let mut slots: Vec<&ScheduleSlot> =
            self.slots.iter().filter(|s| s.court == court).collect();
        slots.sort_by_key(|s| s.start);
        slots
    }

    /// Slots of one chain, in stage order.
    pub fn slots_for_group(&self, group_id: &str) -> Vec<&ScheduleSlot> {
        let mut slots: Vec<&ScheduleSlot> = self
            .slots
            .iter()
            .filter(|s| s.stage.group_id == group_id)
            .collect();
        slots.sort_by_key(|s| s.stage.stage_order);
        slots
    }

    /// Number of slots per court (every court present, possibly zero).
    pub fn count_by_court(&self) -> BTreeMap<u8, usize> {
        let mut counts: BTreeMap<u8, usize> = (1..=COURT_COUNT).map(|c| (c, 0)).collect();
        for slot in &self.slots {
            *counts.entry(slot.court).or_insert(0) += 1;
        }
        counts
    }

    /// Completion time of a chain (end of its last slot).
    pub fn group_completion_time(&self, group_id: &str) -> Option<NaiveDateTime> {
        self.slots_for_group(group_id).iter().map(|s| s.end).max()
    }
}
