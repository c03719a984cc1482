//! Plain-text rendering of a court's timeline.
//!
//! Output uses light Markdown (`*bold*`, `_italic_`) so it can be posted to
//! chat clients as-is.

use std::fmt::Write;

use super::blocks::{format_by_court_with, CourtBlock, TimeBlock};
use crate::models::{BlackoutWindow, Schedule, StageType};

const RULE_WIDTH: usize = 50;

/// Renders one court with the default lunch (13:00-13:30).
///
/// Schedules built with a custom lunch should use [`render_court_with`]
/// and pass `config.blackout()`.
pub fn render_court(schedule: &Schedule, court: u8) -> String {
    render_court_with(schedule, court, &BlackoutWindow::default())
}

/// Renders one court.
pub fn render_court_with(schedule: &Schedule, court: u8, blackout: &BlackoutWindow) -> String {
    let blocks = format_by_court_with(schedule, court, blackout);
    if blocks.is_empty() {
        return format!("Court {court}: no performances");
    }

    let mut text = format!("*COURT {court}*\n{}\n\n", "━".repeat(RULE_WIDTH));
    for block in &blocks {
        match block {
            CourtBlock::Slots(b) => render_block(&mut text, b),
            CourtBlock::Blackout { start, end } => {
                let _ = write!(
                    text,
                    "*LUNCH ({} - {})*\n\n",
                    start.format("%H:%M"),
                    end.format("%H:%M")
                );
            }
        }
    }
    text
}

fn render_block(text: &mut String, block: &TimeBlock) {
    let _ = writeln!(text, "*{}* - {}", block.time, block.group_name);
    for (stage_type, title) in [
        (StageType::Elimination, "Elimination"),
        (StageType::Semifinal, "Semifinal"),
        (StageType::Final, "Final"),
    ] {
        let subgroups = block.subgroups(stage_type);
        if !subgroups.is_empty() {
            let _ = writeln!(text, "   {title}: {}", subgroups.join(", "));
        }
    }
    if !block.final_round.is_empty() {
        let exercises = if block.final_exercises.is_empty() {
            "-".to_string()
        } else {
            block.final_exercises.join(", ")
        };
        let _ = writeln!(text, "      Exercises: _{exercises}_");
    }
    text.push('\n');
}
