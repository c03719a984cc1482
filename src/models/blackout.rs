//! Time windows and the daily lunch blackout.
//!
//! # Time Model
//! Slots are placed on wall-clock `NaiveDateTime`s. Stage durations are
//! fractional minutes and are converted at microsecond precision.
//!
//! # Blackout Rule
//! The blackout spans `[lunch_start - tolerance, lunch_start + tolerance + lunch_duration)`
//! on the candidate start's calendar day; with the defaults that is
//! `[12:30, 14:00)`. A stage whose interval intersects it is moved to the
//! blackout end. The shift is applied once and never re-checked: there is
//! only one blackout per day.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// Converts fractional minutes to a `TimeDelta` (microsecond precision).
pub fn minutes_delta(minutes: f64) -> TimeDelta {
    TimeDelta::microseconds((minutes * 60_000_000.0).round() as i64)
}

/// `start` plus fractional minutes, saturating at the representable range.
pub fn add_minutes(start: NaiveDateTime, minutes: f64) -> NaiveDateTime {
    let delta = minutes_delta(minutes);
    start.checked_add_signed(delta).unwrap_or(if delta < TimeDelta::zero() {
        NaiveDateTime::MIN
    } else {
        NaiveDateTime::MAX
    })
}

fn whole_minutes(minutes: i64) -> TimeDelta {
    TimeDelta::try_minutes(minutes).unwrap_or(if minutes < 0 {
        TimeDelta::MIN
    } else {
        TimeDelta::MAX
    })
}

fn shift(at: NaiveDateTime, minutes: i64) -> NaiveDateTime {
    let delta = whole_minutes(minutes);
    at.checked_add_signed(delta).unwrap_or(if minutes < 0 {
        NaiveDateTime::MIN
    } else {
        NaiveDateTime::MAX
    })
}

/// A wall-clock interval [start, end).
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Interval start (inclusive).
    pub start: NaiveDateTime,
    /// Interval end (exclusive).
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Creates a window from a start and a length in minutes.
    pub fn from_minutes(start: NaiveDateTime, minutes: f64) -> Self {
        Self::new(start, add_minutes(start, minutes))
    }

    /// Length of this window.
    #[inline]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whether a timestamp falls within this window.
    #[inline]
    pub fn contains(&self, time: NaiveDateTime) -> bool {
        time >= self.start && time < self.end
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// The daily lunch blackout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackoutWindow {
    /// Nominal lunch start (time of day).
    pub lunch_start: NaiveTime,
    /// Margin kept free on both sides of the lunch (minutes).
    pub tolerance_minutes: i64,
    /// Lunch length (minutes).
    pub lunch_duration_minutes: i64,
}

impl BlackoutWindow {
    /// Creates a blackout around the given lunch.
    pub fn new(
        lunch_start: NaiveTime,
        tolerance_minutes: i64,
        lunch_duration_minutes: i64,
    ) -> Self {
        Self {
            lunch_start,
            tolerance_minutes,
            lunch_duration_minutes,
        }
    }

    /// Blackout interval on the given day.
    ///
    /// Bounds saturate at the representable range for oversized margins.
    pub fn on(&self, date: NaiveDate) -> TimeWindow {
        let lunch = date.and_time(self.lunch_start);
        let after = self.tolerance_minutes.saturating_add(self.lunch_duration_minutes);
        TimeWindow::new(
            shift(lunch, self.tolerance_minutes.saturating_neg()),
            shift(lunch, after),
        )
    }

    /// The lunch itself (without tolerance) on the given day.
    pub fn lunch_on(&self, date: NaiveDate) -> TimeWindow {
        let lunch = date.and_time(self.lunch_start);
        TimeWindow::new(lunch, shift(lunch, self.lunch_duration_minutes))
    }

    /// Lunch end as a time of day (wraps past midnight).
    pub fn lunch_end(&self) -> NaiveTime {
        let wrapped = self.lunch_duration_minutes.rem_euclid(24 * 60);
        self.lunch_start + TimeDelta::minutes(wrapped)
    }

    /// Whether a stage starting at `start` would run into the blackout.
    pub fn intersects(&self, start: NaiveDateTime, duration_minutes: f64) -> bool {
        let stage = TimeWindow::from_minutes(start, duration_minutes);
        stage.overlaps(&self.on(start.date()))
    }

    /// Adjusted start for a stage: the blackout end if the stage would
    /// intersect the blackout, otherwise `start` unchanged.
    pub fn adjust(&self, start: NaiveDateTime, duration_minutes: f64) -> NaiveDateTime {
        if self.intersects(start, duration_minutes) {
            self.on(start.date()).end
        } else {
            start
        }
    }
}

impl Default for BlackoutWindow {
    fn default() -> Self {
        Self::new(NaiveTime::from_hms_opt(13, 0, 0).unwrap_or_default(), 30, 30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 18)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_minutes_delta() {
        assert_eq!(minutes_delta(47.5), TimeDelta::seconds(2850));
        assert_eq!(minutes_delta(0.0), TimeDelta::zero());
    }

    #[test]
    fn test_add_minutes_saturates() {
        assert_eq!(add_minutes(at(8, 0), 47.5), at(8, 47) + TimeDelta::seconds(30));
        assert_eq!(add_minutes(at(8, 0), 1e12), NaiveDateTime::MAX);
        assert_eq!(add_minutes(at(8, 0), -1e12), NaiveDateTime::MIN);
        assert_eq!(TimeWindow::from_minutes(at(8, 0), 1e12).end, NaiveDateTime::MAX);
    }

    #[test]
    fn test_oversized_margins_saturate() {
        let b = BlackoutWindow::new(NaiveTime::from_hms_opt(13, 0, 0).unwrap(), i64::MAX, i64::MAX);
        let window = b.on(at(0, 0).date());
        assert_eq!(window, TimeWindow::new(NaiveDateTime::MIN, NaiveDateTime::MAX));
        assert_eq!(b.adjust(at(8, 0), 10.0), NaiveDateTime::MAX);
        assert_eq!(b.lunch_on(at(0, 0).date()).end, NaiveDateTime::MAX);
    }

    #[test]
    fn test_lunch_end() {
        assert_eq!(
            BlackoutWindow::default().lunch_end(),
            NaiveTime::from_hms_opt(13, 30, 0).unwrap()
        );
        let late = BlackoutWindow::new(NaiveTime::from_hms_opt(23, 30, 0).unwrap(), 0, 60);
        assert_eq!(late.lunch_end(), NaiveTime::from_hms_opt(0, 30, 0).unwrap());
    }

    #[test]
    fn test_zero_length_stage() {
        let b = BlackoutWindow::default();
        // Empty interval at the blackout start touches nothing; strictly inside it counts
        assert_eq!(b.adjust(at(12, 30), 0.0), at(12, 30));
        assert_eq!(b.adjust(at(13, 0), 0.0), at(14, 0));
    }

    #[test]
    fn test_time_window() {
        let w = TimeWindow::new(at(10, 0), at(11, 0));
        assert_eq!(w.duration(), TimeDelta::minutes(60));
        assert!(w.contains(at(10, 0)));
        assert!(w.contains(at(10, 59)));
        assert!(!w.contains(at(11, 0))); // exclusive end
    }

    #[test]
    fn test_time_window_overlap() {
        let a = TimeWindow::new(at(10, 0), at(11, 0));
        let b = TimeWindow::new(at(10, 30), at(11, 30));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        let c = TimeWindow::new(at(11, 0), at(12, 0)); // touching
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_default_blackout_interval() {
        let b = BlackoutWindow::default();
        let day = at(0, 0).date();
        assert_eq!(b.on(day), TimeWindow::new(at(12, 30), at(14, 0)));
        assert_eq!(b.lunch_on(day), TimeWindow::new(at(13, 0), at(13, 30)));
    }

    #[test]
    fn test_adjust_clear_before() {
        let b = BlackoutWindow::default();
        // Ends exactly at 12:30: touching, not intersecting
        assert_eq!(b.adjust(at(12, 0), 30.0), at(12, 0));
    }

    #[test]
    fn test_adjust_runs_into_blackout() {
        let b = BlackoutWindow::default();
        assert_eq!(b.adjust(at(12, 0), 31.0), at(14, 0));
        assert_eq!(b.adjust(at(8, 0), 600.0), at(14, 0));
    }

    #[test]
    fn test_adjust_starts_inside_blackout() {
        let b = BlackoutWindow::default();
        assert_eq!(b.adjust(at(12, 30), 5.0), at(14, 0));
        assert_eq!(b.adjust(at(13, 59), 1.0), at(14, 0));
    }

    #[test]
    fn test_adjust_after_blackout() {
        let b = BlackoutWindow::default();
        assert_eq!(b.adjust(at(14, 0), 45.0), at(14, 0));
        assert_eq!(b.adjust(at(16, 15), 10.0), at(16, 15));
    }

    #[test]
    fn test_adjust_keeps_seconds_when_clear() {
        let b = BlackoutWindow::default();
        let start = at(9, 16) + TimeDelta::seconds(30);
        assert_eq!(b.adjust(start, 10.0), start);
    }

    #[test]
    fn test_custom_blackout() {
        let b = BlackoutWindow::new(NaiveTime::from_hms_opt(12, 0, 0).unwrap(), 0, 60);
        let day = at(0, 0).date();
        assert_eq!(b.on(day), TimeWindow::new(at(12, 0), at(13, 0)));
        assert_eq!(b.adjust(at(11, 30), 45.0), at(13, 0));
    }
}
