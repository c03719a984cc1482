//! Round cascade: roster entry → ordered stages.
//!
//! # Algorithm
//!
//! 1. More than `elimination_cap` (19) participants: elimination with the
//!    full field; `elimination_cap` advance.
//! 2. More than `final_cap` (8) remaining: semifinal; `final_cap` advance.
//! 3. Final with whoever remains.
//!
//! So ≤8 yields a final only, 9–19 a semifinal and final, ≥20 all three.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::DurationModel;
use crate::config::{ExerciseMode, MissingTimingPolicy, ScheduleConfig};
use crate::error::{Result, ScheduleError};
use crate::models::{group_id, ExerciseTimes, Roster, RosterEntry, Stage, StageType};

/// A stage whose duration was computed with a defaulted (zero) exercise time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingTiming {
    /// Chain of the affected stage.
    pub group_id: String,
    /// Round of the affected stage.
    pub stage_type: StageType,
    /// The exercise without a time; `None` when the round has no exercise at all.
    pub exercise: Option<String>,
}

/// Result of stage derivation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Derivation {
    /// Derived stages, chains in roster order.
    pub stages: Vec<Stage>,
    /// Stages that used a defaulted exercise time.
    pub missing_timings: Vec<MissingTiming>,
}

impl Derivation {
    /// Whether every stage had a recorded exercise time.
    pub fn is_fully_timed(&self) -> bool {
        self.missing_timings.is_empty()
    }

    fn extend(&mut self, other: Derivation) {
        self.stages.extend(other.stages);
        self.missing_timings.extend(other.missing_timings);
    }
}

/// Rounds held for a field of `participants`, with each round's headcount.
pub fn cascade(participants: u32, model: &DurationModel) -> Vec<(StageType, u32)> {
    let mut rounds = Vec::with_capacity(3);
    let mut remaining = participants;

    if remaining > model.elimination_cap {
        rounds.push((StageType::Elimination, remaining));
        remaining = model.elimination_cap;
    }
    if remaining > model.final_cap {
        rounds.push((StageType::Semifinal, remaining));
        remaining = model.final_cap;
    }
    rounds.push((StageType::Final, remaining));

    rounds
}

/// Derives the stage chain of one roster entry.
///
/// Entries with zero participants yield no stages.
pub fn derive_group(
    entry: &RosterEntry,
    times: &ExerciseTimes,
    config: &ScheduleConfig,
) -> Result<Derivation> {
    let mut out = Derivation::default();
    let chain_id = group_id(&entry.group_name, &entry.subgroup_name);

    if entry.participants == 0 {
        warn!("skipping '{chain_id}': no participants");
        return Ok(out);
    }

    let model = config.duration_model();

    for (order, (stage_type, participants)) in cascade(entry.participants, &model)
        .into_iter()
        .enumerate()
    {
        let (minutes, exercises, missing) = match config.exercise_mode {
            ExerciseMode::PerRound => per_round_time(entry, stage_type, times),
            ExerciseMode::Averaged => averaged_time(entry, times),
        };

        for exercise in missing {
            let gap = MissingTiming {
                group_id: chain_id.clone(),
                stage_type,
                exercise,
            };
            if config.missing_timing == MissingTimingPolicy::Reject {
                return Err(ScheduleError::MissingExerciseTime {
                    group_id: gap.group_id,
                    stage_type,
                    exercise: gap.exercise.unwrap_or_default(),
                });
            }
            warn!(
                "no time for {} of '{}' ({}); using 0",
                stage_type,
                chain_id,
                gap.exercise.as_deref().unwrap_or("no exercise")
            );
            out.missing_timings.push(gap);
        }

        let stage = Stage::new(
            &entry.group_name,
            &entry.subgroup_name,
            stage_type,
            participants,
            order as u32 + 1,
        )
        .with_exercises(exercises)
        .with_duration(model.duration(participants, minutes));

        out.stages.push(stage);
    }

    debug!("derived {} stage(s) for '{chain_id}'", out.stages.len());
    Ok(out)
}

/// Derives stages for the whole roster.
///
/// # Example
///
/// ```
/// use court_scheduler::config::ScheduleConfig;
/// use court_scheduler::derivation::derive_stages;
/// use court_scheduler::models::{ExerciseTimes, Roster, RosterEntry, RoundExercises, StageType};
///
/// let roster = Roster::new().with_entry(
///     RosterEntry::new("Group A", "Sub1", 12)
///         .with_exercises(RoundExercises::new("", "Koryo", "Taegeuk 8")),
/// );
/// let times = ExerciseTimes::new()
///     .with_time("Koryo", 1.0)
///     .with_time("Taegeuk 8", 1.0);
///
/// let derivation = derive_stages(&roster, &times, &ScheduleConfig::default()).unwrap();
/// let types: Vec<StageType> = derivation.stages.iter().map(|s| s.stage_type).collect();
/// assert_eq!(types, vec![StageType::Semifinal, StageType::Final]);
/// assert!(derivation.is_fully_timed());
/// ```
pub fn derive_stages(
    roster: &Roster,
    times: &ExerciseTimes,
    config: &ScheduleConfig,
) -> Result<Derivation> {
    let mut out = Derivation::default();
    for entry in &roster.entries {
        out.extend(derive_group(entry, times, config)?);
    }
    if !out.missing_timings.is_empty() {
        warn!(
            "{} stage(s) scheduled with a defaulted exercise time",
            out.missing_timings.len()
        );
    }
    Ok(out)
}

type StageTiming = (f64, Vec<String>, Vec<Option<String>>);

fn per_round_time(
    entry: &RosterEntry,
    stage_type: StageType,
    times: &ExerciseTimes,
) -> StageTiming {
    match entry.exercises.for_stage(stage_type) {
        Some(name) => match times.get(name) {
            Some(t) => (t, vec![name.to_string()], Vec::new()),
            None => (0.0, vec![name.to_string()], vec![Some(name.to_string())]),
        },
        None => (0.0, Vec::new(), vec![None]),
    }
}

fn averaged_time(entry: &RosterEntry, times: &ExerciseTimes) -> StageTiming {
    let names = entry.exercises.names();
    if names.is_empty() {
        return (0.0, Vec::new(), vec![None]);
    }

    let mut missing = Vec::new();
    let mut total = 0.0;
    for name in &names {
        match times.get(name) {
            Some(t) => total += t,
            None => missing.push(Some(name.to_string())),
        }
    }

    let exercises = names.iter().map(|s| s.to_string()).collect();
    (total / names.len() as f64, exercises, missing)
}
