//! Scheduling configuration.
//!
//! Every field has a default matching the tournament rules the engine was
//! tuned for, so an empty JSON object is a valid configuration:
//!
//! ```
//! use court_scheduler::config::ScheduleConfig;
//!
//! let config = ScheduleConfig::from_json(r#"{ "break_minutes": 3.0 }"#).unwrap();
//! assert_eq!(config.break_minutes, 3.0);
//! assert_eq!(config.elimination_cap, 19);
//! ```

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::derivation::DurationModel;
use crate::error::Result;
use crate::models::BlackoutWindow;

/// How a stage's per-participant time is derived from the roster exercises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseMode {
    /// Each round uses its own exercise.
    #[default]
    PerRound,
    /// Every round uses the mean time of all the group's exercises.
    Averaged,
}

/// What to do when a stage's exercise has no recorded time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingTimingPolicy {
    /// Use 0 minutes per participant and report the stage.
    #[default]
    Zero,
    /// Fail derivation.
    Reject,
}

/// Configuration for one scheduling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Changeover pause added to every stage (minutes).
    pub break_minutes: f64,
    /// Headcount above which an elimination round is held; also the
    /// number of participants advancing from it.
    pub elimination_cap: u32,
    /// Headcount above which a semifinal is held; also the final size.
    pub final_cap: u32,
    /// Nominal lunch start.
    pub lunch_start: NaiveTime,
    /// Margin kept free on both sides of the lunch (minutes).
    pub lunch_tolerance_minutes: i64,
    /// Lunch length (minutes).
    pub lunch_duration_minutes: i64,
    /// Exercise-to-stage mapping.
    pub exercise_mode: ExerciseMode,
    /// Handling of exercises without a recorded time.
    pub missing_timing: MissingTimingPolicy,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        let blackout = BlackoutWindow::default();
        let model = DurationModel::default();
        Self {
            break_minutes: model.break_minutes,
            elimination_cap: model.elimination_cap,
            final_cap: model.final_cap,
            lunch_start: blackout.lunch_start,
            lunch_tolerance_minutes: blackout.tolerance_minutes,
            lunch_duration_minutes: blackout.lunch_duration_minutes,
            exercise_mode: ExerciseMode::default(),
            missing_timing: MissingTimingPolicy::default(),
        }
    }
}

impl ScheduleConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON configuration; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the exercise mode.
    pub fn with_exercise_mode(mut self, mode: ExerciseMode) -> Self {
        self.exercise_mode = mode;
        self
    }

    /// Sets the missing-timing policy.
    pub fn with_missing_timing(mut self, policy: MissingTimingPolicy) -> Self {
        self.missing_timing = policy;
        self
    }

    /// Sets the break between stages.
    pub fn with_break_minutes(mut self, minutes: f64) -> Self {
        self.break_minutes = minutes;
        self
    }

    /// Sets the lunch start.
    pub fn with_lunch_start(mut self, lunch_start: NaiveTime) -> Self {
        self.lunch_start = lunch_start;
        self
    }

    /// Duration model built from this configuration.
    pub fn duration_model(&self) -> DurationModel {
        DurationModel {
            break_minutes: self.break_minutes,
            elimination_cap: self.elimination_cap,
            final_cap: self.final_cap,
        }
    }

    /// Blackout window built from this configuration.
    pub fn blackout(&self) -> BlackoutWindow {
        BlackoutWindow::new(
            self.lunch_start,
            self.lunch_tolerance_minutes,
            self.lunch_duration_minutes,
        )
    }
}
