//! Stage (round) model.
//!
//! A stage is one round of competition for one subgroup. The stages of a
//! subgroup form a chain (elimination → semifinal → final) identified by a
//! shared group ID and ordered by `stage_order`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Round type within a subgroup's cascade.
///
/// Declaration order matches execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageType {
    /// Opening cut for large subgroups (more than 19 participants).
    Elimination,
    /// Cut down to the finalists (more than 8 participants).
    Semifinal,
    /// Always present.
    Final,
}

impl StageType {
    /// All stage types in execution order.
    pub const ALL: [StageType; 3] = [
        StageType::Elimination,
        StageType::Semifinal,
        StageType::Final,
    ];

    /// Lowercase display label.
    pub fn label(&self) -> &'static str {
        match self {
            StageType::Elimination => "elimination",
            StageType::Semifinal => "semifinal",
            StageType::Final => "final",
        }
    }

    /// Position in the exercise triple (elimination, semifinal, final).
    pub fn round_index(&self) -> usize {
        match self {
            StageType::Elimination => 0,
            StageType::Semifinal => 1,
            StageType::Final => 2,
        }
    }
}

impl fmt::Display for StageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Builds the chain key shared by all stages of one subgroup.
pub fn group_id(group_name: &str, subgroup_name: &str) -> String {
    format!("{group_name}_{subgroup_name}")
}

/// One round of competition for one subgroup.
///
/// Created once per scheduling run by stage derivation; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Group name (e.g., an age/belt category).
    pub group_name: String,
    /// Subgroup name, unique within the group.
    pub subgroup_name: String,
    /// Chain key: `"{group_name}_{subgroup_name}"`.
    pub group_id: String,
    /// Round type.
    pub stage_type: StageType,
    /// Headcount competing in this round.
    pub participants: u32,
    /// Exercises performed in this round (display and duration averaging).
    pub exercises: Vec<String>,
    /// Duration in minutes, computed at derivation time.
    pub duration_minutes: f64,
    /// 1-based position within the chain.
    pub stage_order: u32,
}

impl Stage {
    /// Creates a stage with no exercises and zero duration.
    pub fn new(
        group_name: impl Into<String>,
        subgroup_name: impl Into<String>,
        stage_type: StageType,
        participants: u32,
        stage_order: u32,
    ) -> Self {
        let group_name = group_name.into();
        let subgroup_name = subgroup_name.into();
        Self {
            group_id: group_id(&group_name, &subgroup_name),
            group_name,
            subgroup_name,
            stage_type,
            participants,
            exercises: Vec::new(),
            duration_minutes: 0.0,
            stage_order,
        }
    }

    /// Sets the duration (minutes).
    pub fn with_duration(mut self, duration_minutes: f64) -> Self {
        self.duration_minutes = duration_minutes;
        self
    }

    /// Sets the exercises.
    pub fn with_exercises(mut self, exercises: Vec<String>) -> Self {
        self.exercises = exercises;
        self
    }

    /// Unambiguous chain identity: `(group_name, subgroup_name)`.
    ///
    /// `group_id` is a display key; `("A_B", "C")` and `("A", "B_C")` share
    /// it but are distinct chains.
    #[inline]
    pub fn chain_key(&self) -> (&str, &str) {
        (self.group_name.as_str(), self.subgroup_name.as_str())
    }
}
