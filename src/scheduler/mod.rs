//! Court assignment and schedule metrics.
//!
//! # Algorithm
//!
//! `CourtScheduler` uses a greedy longest-chain-first, earliest-free-court
//! heuristic with a single lunch blackout. It is deterministic but not
//! makespan-optimal.
//!
//! # Summary
//!
//! `ScheduleSummary` reports slot counts, day bounds and court utilization.

mod courts;
mod summary;

pub use courts::{generate_schedule, order_chains, schedule, CourtScheduler, GeneratedSchedule};
pub use summary::ScheduleSummary;
