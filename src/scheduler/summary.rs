//! Schedule summary metrics.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total slots | Number of placed stages |
//! | Slots per court | Stage count on each court |
//! | First start / last end | Tournament day bounds |
//! | Busy minutes | Sum of slot lengths per court |
//! | Utilization | Busy minutes / (last end - first start) |

use chrono::NaiveDateTime;
use std::collections::BTreeMap;

use crate::models::{Schedule, COURT_COUNT};

/// Summary of a computed schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSummary {
    /// Number of placed stages.
    pub total_slots: usize,
    /// Stage count per court (every court present).
    pub slots_by_court: BTreeMap<u8, usize>,
    /// Earliest slot start.
    pub first_start: Option<NaiveDateTime>,
    /// Latest slot end.
    pub last_end: Option<NaiveDateTime>,
    /// Occupied minutes per court.
    pub busy_minutes_by_court: BTreeMap<u8, f64>,
    /// Occupied fraction of the day span per court (0.0..1.0).
    pub utilization_by_court: BTreeMap<u8, f64>,
}

impl ScheduleSummary {
    /// Computes the summary of a schedule.
    pub fn calculate(schedule: &Schedule) -> Self {
        let mut busy: BTreeMap<u8, f64> = (1..=COURT_COUNT).map(|c| (c, 0.0)).collect();
        for slot in &schedule.slots {
            *busy.entry(slot.court).or_insert(0.0) += slot.duration_minutes();
        }

        let first_start = schedule.first_start();
        let last_end = schedule.last_end();
        let span = span_minutes(first_start, last_end);

        let utilization = busy
            .iter()
            .map(|(&court, &minutes)| {
                let u = if span > 0.0 { minutes / span } else { 0.0 };
                (court, u)
            })
            .collect();

        Self {
            total_slots: schedule.slot_count(),
            slots_by_court: schedule.count_by_court(),
            first_start,
            last_end,
            busy_minutes_by_court: busy,
            utilization_by_court: utilization,
        }
    }

    /// Length of the tournament day in minutes (0 when empty).
    pub fn span_minutes(&self) -> f64 {
        span_minutes(self.first_start, self.last_end)
    }

    /// Mean utilization across courts.
    pub fn avg_utilization(&self) -> f64 {
        if self.utilization_by_court.is_empty() {
            return 0.0;
        }
        self.utilization_by_court.values().sum::<f64>() / self.utilization_by_court.len() as f64
    }
}

fn span_minutes(first: Option<NaiveDateTime>, last: Option<NaiveDateTime>) -> f64 {
    match (first, last) {
        (Some(s), Some(e)) => (e - s).num_seconds() as f64 / 60.0,
        _ => 0.0,
    }
}
