//! Error types.
//!
//! The engine itself never fails: empty input yields an empty schedule.
//! Errors arise only at the boundaries, when parsing user-supplied values
//! or when the configuration asks for strict handling of missing timings.

use thiserror::Error;

use crate::models::StageType;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Errors raised while preparing input for the scheduler.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Start time is not in `H:MM` / `HH:MM` 24-hour form.
    #[error("invalid start time '{0}': expected HH:MM")]
    InvalidStartTime(String),

    /// Exercise time is not a positive number of minutes within the cap.
    #[error("invalid exercise time '{0}': expected 0 < minutes <= 600")]
    InvalidExerciseTime(String),

    /// A stage needs an exercise that has no recorded time
    /// (only raised under `MissingTimingPolicy::Reject`).
    #[error("no time recorded for exercise '{exercise}' ({stage_type} of '{group_id}')")]
    MissingExerciseTime {
        group_id: String,
        stage_type: StageType,
        exercise: String,
    },

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = ScheduleError::InvalidStartTime("25:99".into());
        assert_eq!(e.to_string(), "invalid start time '25:99': expected HH:MM");

        let e = ScheduleError::MissingExerciseTime {
            group_id: "Group A_Sub1".into(),
            stage_type: StageType::Semifinal,
            exercise: "".into(),
        };
        assert!(e.to_string().contains("semifinal of 'Group A_Sub1'"));
    }

    #[test]
    fn test_config_error_from_json() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e: ScheduleError = err.into();
        assert!(matches!(e, ScheduleError::Config(_)));
    }
}
