//! Roster ingestion helpers.
//!
//! Converts loosely typed table rows (as read from a spreadsheet or a chat
//! form) into a typed [`Roster`], and parses the user-entered start time
//! and exercise times. Reading the tables themselves is left to the caller.
//!
//! Malformed rows are skipped and reported, never fatal.

use chrono::NaiveTime;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::error::{Result, ScheduleError};
use crate::models::{Roster, RosterEntry, RoundExercises};

/// A row of the groups table: group, subgroup, headcount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    /// Group name.
    pub group: String,
    /// Subgroup name.
    pub subgroup: String,
    /// Headcount as entered (e.g. `"12"` or `"12.0"`).
    pub participants: String,
}

impl GroupRow {
    /// Creates a row.
    pub fn new(group: &str, subgroup: &str, participants: &str) -> Self {
        Self {
            group: group.to_string(),
            subgroup: subgroup.to_string(),
            participants: participants.to_string(),
        }
    }
}

/// A row of the exercises table: group and one exercise per round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRow {
    /// Group name.
    pub group: String,
    /// Elimination exercise.
    pub elimination: String,
    /// Semifinal exercise.
    pub semifinal: String,
    /// Final exercise.
    pub final_round: String,
}

impl ExerciseRow {
    /// Creates a row.
    pub fn new(group: &str, elimination: &str, semifinal: &str, final_round: &str) -> Self {
        Self {
            group: group.to_string(),
            elimination: elimination.to_string(),
            semifinal: semifinal.to_string(),
            final_round: final_round.to_string(),
        }
    }
}

/// A joined, still untyped stage-input row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterRow {
    /// Group name.
    pub group: String,
    /// Subgroup name.
    pub subgroup: String,
    /// Headcount as entered.
    pub participants: String,
    /// Exercises per round.
    pub exercises: RoundExercises,
}

/// Why a roster row was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// Group name is blank.
    #[error("missing group name")]
    MissingGroup,
    /// Subgroup name is blank.
    #[error("missing subgroup name")]
    MissingSubgroup,
    /// Headcount is not a number.
    #[error("participant count '{0}' is not a number")]
    InvalidParticipants(String),
    /// Headcount is zero.
    #[error("no participants")]
    NoParticipants,
}

/// A skipped roster row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// Zero-based position in the input.
    pub row: usize,
    /// Reason for skipping.
    pub reason: SkipReason,
}

/// Result of roster ingestion.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Well-formed entries in input order.
    pub roster: Roster,
    /// Rows that were skipped.
    pub skipped: Vec<SkippedRow>,
}

/// Joins the groups table with the exercises table by trimmed group name.
///
/// Groups absent from the exercises table get no exercises; the first
/// matching exercise row wins.
pub fn join_tables(groups: &[GroupRow], exercises: &[ExerciseRow]) -> Vec<RosterRow> {
    let mut by_group: HashMap<&str, RoundExercises> = HashMap::new();
    for row in exercises {
        by_group.entry(row.group.trim()).or_insert_with(|| {
            RoundExercises::new(&row.elimination, &row.semifinal, &row.final_round)
        });
    }

    groups
        .iter()
        .map(|g| RosterRow {
            group: g.group.trim().to_string(),
            subgroup: g.subgroup.trim().to_string(),
            participants: g.participants.trim().to_string(),
            exercises: by_group.get(g.group.trim()).cloned().unwrap_or_default(),
        })
        .collect()
}

/// Parses a headcount such as `"12"` or `"12.0"` (fractions truncate).
pub fn parse_participants(raw: &str) -> std::result::Result<u32, SkipReason> {
    let raw = raw.trim();
    let value: f64 = raw
        .parse()
        .map_err(|_| SkipReason::InvalidParticipants(raw.to_string()))?;
    if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) {
        return Err(SkipReason::InvalidParticipants(raw.to_string()));
    }
    match value.trunc() as u32 {
        0 => Err(SkipReason::NoParticipants),
        n => Ok(n),
    }
}

fn parse_row(row: &RosterRow) -> std::result::Result<RosterEntry, SkipReason> {
    let group = row.group.trim();
    let subgroup = row.subgroup.trim();
    if group.is_empty() {
        return Err(SkipReason::MissingGroup);
    }
    if subgroup.is_empty() {
        return Err(SkipReason::MissingSubgroup);
    }
    let participants = parse_participants(&row.participants)?;
    Ok(RosterEntry::new(group, subgroup, participants).with_exercises(row.exercises.clone()))
}

/// Converts joined rows into a roster, skipping malformed rows.
pub fn parse_roster(rows: &[RosterRow]) -> IngestReport {
    let mut report = IngestReport::default();
    for (i, row) in rows.iter().enumerate() {
        match parse_row(row) {
            Ok(entry) => report.roster.push(entry),
            Err(reason) => {
                warn!("skipping roster row {i}: {reason}");
                report.skipped.push(SkippedRow { row: i, reason });
            }
        }
    }
    report
}

/// Parses a start time in `H:MM` or `HH:MM` 24-hour form.
///
/// ```
/// use chrono::NaiveTime;
/// use court_scheduler::ingest::parse_start_time;
///
/// assert_eq!(parse_start_time("8:30").unwrap(), NaiveTime::from_hms_opt(8, 30, 0).unwrap());
/// assert!(parse_start_time("8.30").is_err());
/// ```
pub fn parse_start_time(raw: &str) -> Result<NaiveTime> {
    let invalid = || ScheduleError::InvalidStartTime(raw.to_string());
    let trimmed = raw.trim();
    let (hours, minutes) = trimmed.split_once(':').ok_or_else(invalid)?;

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !(1..=2).contains(&hours.len())
        || minutes.len() != 2
        || !all_digits(hours)
        || !all_digits(minutes)
    {
        return Err(invalid());
    }

    let h: u32 = hours.parse().map_err(|_| invalid())?;
    let m: u32 = minutes.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(h, m, 0).ok_or_else(invalid)
}

/// Longest accepted per-participant exercise time (minutes).
pub const MAX_EXERCISE_MINUTES: f64 = 600.0;

/// Parses a per-participant exercise time in minutes; accepts a decimal
/// comma (`"1,5"`). Values must lie in `(0, MAX_EXERCISE_MINUTES]`.
pub fn parse_exercise_minutes(raw: &str) -> Result<f64> {
    let normalized = raw.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(v) if v > 0.0 && v <= MAX_EXERCISE_MINUTES => Ok(v),
        _ => Err(ScheduleError::InvalidExerciseTime(raw.to_string())),
    }
}
