//! Scheduling domain models.
//!
//! # Domain Mappings
//!
//! | court-scheduler | Generic scheduling |
//! |-----------------|--------------------|
//! | RosterEntry | Job input |
//! | Stage | Operation |
//! | Court | Machine |
//! | ScheduleSlot | Assignment |
//! | BlackoutWindow | Blocked calendar period |

mod blackout;
mod roster;
mod schedule;
mod stage;

pub use blackout::{add_minutes, minutes_delta, BlackoutWindow, TimeWindow};
pub use roster::{ExerciseTimes, Roster, RosterEntry, RoundExercises};
pub use schedule::{Schedule, ScheduleSlot, Violation, ViolationType, COURT_COUNT};
pub use stage::{group_id, Stage, StageType};
