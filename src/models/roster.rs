//! Roster model.
//!
//! The roster is the flat stage-input table: one entry per subgroup with its
//! headcount and the exercise assigned to each round.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::StageType;

/// Exercise names per round. Empty names are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundExercises {
    /// Exercise for the elimination round.
    pub elimination: Option<String>,
    /// Exercise for the semifinal.
    pub semifinal: Option<String>,
    /// Exercise for the final.
    pub final_round: Option<String>,
}

fn non_empty(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() || name.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(name.to_string())
    }
}

impl RoundExercises {
    /// Creates the triple from raw names; blank names become `None`.
    pub fn new(elimination: &str, semifinal: &str, final_round: &str) -> Self {
        Self {
            elimination: non_empty(elimination),
            semifinal: non_empty(semifinal),
            final_round: non_empty(final_round),
        }
    }

    /// Builds the triple from up to three names in round order.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let get = |i: usize| names.get(i).map(|s| s.as_ref()).unwrap_or("");
        Self::new(get(0), get(1), get(2))
    }

    /// Exercise for the given round.
    pub fn for_stage(&self, stage_type: StageType) -> Option<&str> {
        match stage_type {
            StageType::Elimination => self.elimination.as_deref(),
            StageType::Semifinal => self.semifinal.as_deref(),
            StageType::Final => self.final_round.as_deref(),
        }
    }

    /// Named exercises in round order, blanks skipped.
    pub fn names(&self) -> Vec<&str> {
        StageType::ALL
            .iter()
            .filter_map(|t| self.for_stage(*t))
            .collect()
    }

    /// Whether no round has an exercise.
    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }
}

/// One subgroup to be scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Group name.
    pub group_name: String,
    /// Subgroup name.
    pub subgroup_name: String,
    /// Initial headcount.
    pub participants: u32,
    /// Exercises per round.
    pub exercises: RoundExercises,
}

impl RosterEntry {
    /// Creates an entry with no exercises.
    pub fn new(
        group_name: impl Into<String>,
        subgroup_name: impl Into<String>,
        participants: u32,
    ) -> Self {
        Self {
            group_name: group_name.into(),
            subgroup_name: subgroup_name.into(),
            participants,
            exercises: RoundExercises::default(),
        }
    }

    /// Sets the exercises per round.
    pub fn with_exercises(mut self, exercises: RoundExercises) -> Self {
        self.exercises = exercises;
        self
    }
}

/// Stage-input table for one scheduling run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    /// Entries in input order.
    pub entries: Vec<RosterEntry>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry.
    pub fn with_entry(mut self, entry: RosterEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Adds an entry.
    pub fn push(&mut self, entry: RosterEntry) {
        self.entries.push(entry);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the roster has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct exercise names across the roster, sorted.
    pub fn unique_exercises(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|e| e.exercises.names())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Minutes per participant for each exercise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseTimes {
    times: HashMap<String, f64>,
}

impl ExerciseTimes {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time of one exercise.
    pub fn with_time(mut self, exercise: impl Into<String>, minutes: f64) -> Self {
        self.set(exercise, minutes);
        self
    }

    /// Sets the time of one exercise.
    pub fn set(&mut self, exercise: impl Into<String>, minutes: f64) {
        self.times.insert(exercise.into(), minutes);
    }

    /// Time of one exercise, if recorded.
    pub fn get(&self, exercise: &str) -> Option<f64> {
        self.times.get(exercise).copied()
    }

    /// Number of recorded exercises.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether no exercise time is recorded.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

impl FromIterator<(String, f64)> for ExerciseTimes {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            times: iter.into_iter().collect(),
        }
    }
}
