//! Per-court display blocks.
//!
//! Slots of one court are walked in start order. Consecutive slots sharing
//! the same start minute and group name merge into one [`TimeBlock`]. A
//! [`CourtBlock::Blackout`] marker is inserted where the court's timeline
//! first crosses the lunch start.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{BlackoutWindow, Schedule, ScheduleSlot, StageType};

/// Subgroups of one group starting at the same minute on one court.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBlock {
    /// Start of the first slot in the block.
    pub start: NaiveDateTime,
    /// Start as `HH:MM`.
    pub time: String,
    /// Group name.
    pub group_name: String,
    /// Subgroups in an elimination round.
    pub elimination: Vec<String>,
    /// Subgroups in a semifinal.
    pub semifinal: Vec<String>,
    /// Subgroups in a final.
    pub final_round: Vec<String>,
    /// Exercises of the first final in the block.
    pub final_exercises: Vec<String>,
}

impl TimeBlock {
    fn open(slot: &ScheduleSlot) -> Self {
        Self {
            start: slot.start,
            time: slot.start.format("%H:%M").to_string(),
            group_name: slot.stage.group_name.clone(),
            elimination: Vec::new(),
            semifinal: Vec::new(),
            final_round: Vec::new(),
            final_exercises: Vec::new(),
        }
    }

    fn matches(&self, slot: &ScheduleSlot) -> bool {
        self.time == slot.start.format("%H:%M").to_string()
            && self.group_name == slot.stage.group_name
    }

    fn add(&mut self, slot: &ScheduleSlot) {
        let subgroup = slot.stage.subgroup_name.clone();
        match slot.stage.stage_type {
            StageType::Elimination => self.elimination.push(subgroup),
            StageType::Semifinal => self.semifinal.push(subgroup),
            StageType::Final => {
                if self.final_round.is_empty() {
                    self.final_exercises = slot.stage.exercises.clone();
                }
                self.final_round.push(subgroup);
            }
        }
    }

    /// Subgroups of the given round.
    pub fn subgroups(&self, stage_type: StageType) -> &[String] {
        match stage_type {
            StageType::Elimination => &self.elimination,
            StageType::Semifinal => &self.semifinal,
            StageType::Final => &self.final_round,
        }
    }
}

/// A display block of a court's timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CourtBlock {
    /// Stages starting together.
    Slots(TimeBlock),
    /// Lunch marker.
    Blackout {
        /// Lunch start.
        start: NaiveTime,
        /// Lunch end.
        end: NaiveTime,
    },
}

/// Display blocks for one court, using the default lunch (13:00-13:30).
///
/// Schedules built with a custom lunch should use [`format_by_court_with`]
/// and pass `config.blackout()` so the marker lands where the gap is.
pub fn format_by_court(schedule: &Schedule, court: u8) -> Vec<CourtBlock> {
    format_by_court_with(schedule, court, &BlackoutWindow::default())
}

/// Display blocks for one court.
///
/// Returns an empty list when the court has no slots.
pub fn format_by_court_with(
    schedule: &Schedule,
    court: u8,
    blackout: &BlackoutWindow,
) -> Vec<CourtBlock> {
    let lunch = blackout.lunch_start;
    let mut blocks = Vec::new();
    let mut pending: Option<TimeBlock> = None;
    let mut prev_time: Option<NaiveTime> = None;

    for slot in schedule.slots_for_court(court) {
        let time = slot.start.time();

        if prev_time.is_some_and(|prev| prev < lunch && lunch <= time) {
            if let Some(block) = pending.take() {
                blocks.push(CourtBlock::Slots(block));
            }
            blocks.push(CourtBlock::Blackout {
                start: lunch,
                end: blackout.lunch_end(),
            });
        }

        let mut block = match pending.take() {
            Some(block) if block.matches(slot) => block,
            Some(block) => {
                blocks.push(CourtBlock::Slots(block));
                TimeBlock::open(slot)
            }
            None => TimeBlock::open(slot),
        };
        block.add(slot);
        pending = Some(block);
        prev_time = Some(time);
    }

    if let Some(block) = pending {
        blocks.push(CourtBlock::Slots(block));
    }
    blocks
}
