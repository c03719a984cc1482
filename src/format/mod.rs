//! Read-only views over a computed schedule.
//!
//! - **`blocks`**: per-court display blocks with the lunch marker
//! - **`text`**: plain-text rendering of those blocks
//! - **`export`**: per-court tables for persisting

mod blocks;
mod export;
mod text;

pub use blocks::{format_by_court, format_by_court_with, CourtBlock, TimeBlock};
pub use export::{court_tables, CourtTable, ExportRow};
pub use text::{render_court, render_court_with};
