//! Tabular export rows.
//!
//! One table per court with the columns Time, Group, Subgroup, StageType,
//! Participants, DurationMinutes, EndTime, Exercises. Rows serialize with
//! those column names, so any serde format can persist them.

use serde::{Deserialize, Serialize};

use crate::models::{Schedule, ScheduleSlot, COURT_COUNT};

/// One exported slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportRow {
    /// Start as `HH:MM`.
    pub time: String,
    /// Group name.
    pub group: String,
    /// Subgroup name.
    pub subgroup: String,
    /// Round label.
    pub stage_type: String,
    /// Headcount.
    pub participants: u32,
    /// Duration rounded to one decimal.
    pub duration_minutes: f64,
    /// End as `HH:MM`.
    pub end_time: String,
    /// Exercises, comma-joined.
    pub exercises: String,
}

impl From<&ScheduleSlot> for ExportRow {
    fn from(slot: &ScheduleSlot) -> Self {
        Self {
            time: slot.start.format("%H:%M").to_string(),
            group: slot.stage.group_name.clone(),
            subgroup: slot.stage.subgroup_name.clone(),
            stage_type: slot.stage.stage_type.label().to_string(),
            participants: slot.stage.participants,
            duration_minutes: (slot.stage.duration_minutes * 10.0).round() / 10.0,
            end_time: slot.end.format("%H:%M").to_string(),
            exercises: slot.stage.exercises.join(", "),
        }
    }
}

/// Export table of one court.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourtTable {
    /// Court number.
    pub court: u8,
    /// Sheet/table name (`"Court N"`).
    pub name: String,
    /// Rows in start order.
    pub rows: Vec<ExportRow>,
}

/// Export tables for every court (empty courts included).
pub fn court_tables(schedule: &Schedule) -> Vec<CourtTable> {
    (1..=COURT_COUNT)
        .map(|court| CourtTable {
            court,
            name: format!("Court {court}"),
            rows: schedule
                .slots_for_court(court)
                .into_iter()
                .map(ExportRow::from)
                .collect(),
        })
        .collect()
}
