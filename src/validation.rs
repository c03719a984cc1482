//! Input and output validation.
//!
//! [`validate_stages`] checks the structural integrity of derived stages
//! before scheduling. Detects:
//! - Duplicate `(group_id, stage_order)` pairs
//! - Gaps in a chain's stage order
//! - Chains without a final
//! - Zero participants or non-positive durations
//!
//! [`validate_schedule`] checks a computed schedule against the engine's
//! guarantees: completeness, court range, chain precedence and court,
//! court overlap and the lunch blackout.

use std::collections::{BTreeMap, HashMap};

use crate::models::{
    group_id, BlackoutWindow, Schedule, ScheduleSlot, Stage, StageType, TimeWindow, Violation,
    ViolationType, COURT_COUNT,
};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two stages of one chain share a stage order.
    DuplicateStage,
    /// Stage orders of a chain are not `1..=n`.
    BrokenChain,
    /// A chain has no final (or the final is not last).
    MissingFinal,
    /// A stage has no participants.
    EmptyStage,
    /// A stage has a non-positive or non-finite duration.
    InvalidDuration,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates derived stages.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_stages(stages: &[Stage]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut chains: BTreeMap<(&str, &str), Vec<&Stage>> = BTreeMap::new();

    for stage in stages {
        chains.entry(stage.chain_key()).or_default().push(stage);

        if stage.participants == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyStage,
                format!("{} of '{}' has no participants", stage.stage_type, stage.group_id),
            ));
        }
        if !(stage.duration_minutes.is_finite() && stage.duration_minutes > 0.0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!(
                    "{} of '{}' has duration {}",
                    stage.stage_type, stage.group_id, stage.duration_minutes
                ),
            ));
        }
    }

    for (_, mut chain) in chains {
        chain.sort_by_key(|s| s.stage_order);
        let id = chain[0].group_id.as_str();

        for pair in chain.windows(2) {
            if pair[0].stage_order == pair[1].stage_order {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateStage,
                    format!("'{id}' has two stages with order {}", pair[0].stage_order),
                ));
            }
        }

        let contiguous = chain
            .iter()
            .enumerate()
            .all(|(i, s)| s.stage_order == i as u32 + 1);
        if !contiguous {
            errors.push(ValidationError::new(
                ValidationErrorKind::BrokenChain,
                format!("'{id}' stage orders are not 1..={}", chain.len()),
            ));
        }

        if chain.last().map(|s| s.stage_type) != Some(StageType::Final) {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingFinal,
                format!("'{id}' does not end with a final"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks a schedule against the stages it was built from.
///
/// Returns every violation found; an empty list means the schedule holds
/// all engine guarantees.
pub fn validate_schedule(
    schedule: &Schedule,
    stages: &[Stage],
    blackout: &BlackoutWindow,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    check_completeness(schedule, stages, &mut violations);

    for slot in &schedule.slots {
        if !(1..=COURT_COUNT).contains(&slot.court) {
            violations.push(Violation::new(
                ViolationType::InvalidCourt,
                &slot.stage.group_id,
                format!("placed on court {}", slot.court),
            ));
        }

        let window = TimeWindow::new(slot.start, slot.end);
        if window.overlaps(&blackout.on(slot.start.date())) {
            violations.push(Violation::new(
                ViolationType::BlackoutIntersection,
                &slot.stage.group_id,
                format!(
                    "{} runs {}-{} during the blackout",
                    slot.stage.stage_type,
                    slot.start.format("%H:%M"),
                    slot.end.format("%H:%M")
                ),
            ));
        }
    }

    let mut chains: BTreeMap<(&str, &str), Vec<&ScheduleSlot>> = BTreeMap::new();
    for slot in &schedule.slots {
        chains.entry(slot.stage.chain_key()).or_default().push(slot);
    }
    for (_, mut chain) in chains {
        chain.sort_by_key(|s| s.stage.stage_order);
        let id = chain[0].stage.group_id.as_str();
        for pair in chain.windows(2) {
            if pair[1].start < pair[0].end {
                violations.push(Violation::new(
                    ViolationType::PrecedenceViolation,
                    id,
                    format!(
                        "{} starts before {} ends",
                        pair[1].stage.stage_type, pair[0].stage.stage_type
                    ),
                ));
            }
            if pair[1].court != pair[0].court {
                violations.push(Violation::new(
                    ViolationType::CourtChange,
                    id,
                    format!("moves from court {} to {}", pair[0].court, pair[1].court),
                ));
            }
        }
    }

    for court in 1..=COURT_COUNT {
        let slots = schedule.slots_for_court(court);
        for pair in slots.windows(2) {
            if pair[1].start < pair[0].end {
                violations.push(Violation::new(
                    ViolationType::CourtOverlap,
                    format!("court {court}"),
                    format!(
                        "'{}' overlaps '{}'",
                        pair[1].stage.group_id, pair[0].stage.group_id
                    ),
                ));
            }
        }
    }

    violations
}

fn check_completeness(schedule: &Schedule, stages: &[Stage], violations: &mut Vec<Violation>) {
    let mut expected: HashMap<((&str, &str), u32), i64> = HashMap::new();
    for stage in stages {
        *expected.entry((stage.chain_key(), stage.stage_order)).or_insert(0) += 1;
    }
    for slot in &schedule.slots {
        *expected
            .entry((slot.stage.chain_key(), slot.stage.stage_order))
            .or_insert(0) -= 1;
    }

    let mut mismatched: Vec<_> = expected.into_iter().filter(|(_, n)| *n != 0).collect();
    mismatched.sort();
    for (((group, subgroup), order), n) in mismatched {
        let id = group_id(group, subgroup);
        let message = if n > 0 {
            format!("stage {order} missing from the schedule")
        } else {
            format!("stage {order} placed {} extra time(s)", -n)
        };
        violations.push(Violation::new(ViolationType::Incomplete, id, message));
    }
}
