//! Competition court scheduler.
//!
//! Turns a roster of competition groups into a timed schedule across three
//! courts. Each subgroup runs a cascade of rounds (elimination, semifinal,
//! final) sized by its headcount, and all rounds of a subgroup stay on one
//! court in order. A daily lunch blackout is never scheduled over.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Stage`, `Roster`, `Schedule`, `ScheduleSlot`,
//!   `BlackoutWindow`
//! - **`derivation`**: Round cascade and stage duration model
//! - **`scheduler`**: Greedy court assignment and schedule summary
//! - **`validation`**: Stage integrity and schedule invariant checks
//! - **`ingest`**: Tabular roster parsing and start/exercise time parsing
//! - **`format`**: Per-court display blocks, text rendering, export tables
//! - **`config`**: Tunable constants, loadable from JSON
//! - **`error`**: Crate error type
//!
//! # Pipeline
//!
//! ```
//! use chrono::NaiveDate;
//! use court_scheduler::models::{ExerciseTimes, Roster, RosterEntry, RoundExercises};
//! use court_scheduler::scheduler::CourtScheduler;
//!
//! let roster = Roster::new().with_entry(
//!     RosterEntry::new("Group A", "Sub1", 25)
//!         .with_exercises(RoundExercises::new("E1", "E2", "E3")),
//! );
//! let times = ExerciseTimes::new()
//!     .with_time("E1", 1.5)
//!     .with_time("E2", 1.5)
//!     .with_time("E3", 1.0);
//!
//! let day = NaiveDate::from_ymd_opt(2024, 5, 18).unwrap();
//! let generated = CourtScheduler::new()
//!     .generate(&roster, &times, "08:00", day)
//!     .unwrap();
//!
//! assert_eq!(generated.schedule.slot_count(), 3);
//! assert!(generated.missing_timings.is_empty());
//! ```

pub mod config;
pub mod derivation;
pub mod error;
pub mod format;
pub mod ingest;
pub mod models;
pub mod scheduler;
pub mod validation;
