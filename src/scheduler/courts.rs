//! Greedy court assignment.
//!
//! # Algorithm
//!
//! 1. Group stages into chains by group ID; order each chain by `stage_order`.
//! 2. Sort chains by total duration, longest first (ties: group ID ascending).
//! 3. For each chain, place its first stage on the court that frees up
//!    earliest (lowest court number on ties), then every later stage on the
//!    same court right after its predecessor.
//! 4. Push any stage that would run into the lunch blackout to the
//!    blackout end.
//! 5. Sort all slots by `(start, court)`.
//!
//! Chains are placed one at a time to completion, so a chain's previous end
//! always equals its court's current end and courts never overlap.
//!
//! # Complexity
//! O(n log n) for n stages.

use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info};
use std::collections::{BTreeMap, HashMap};

use crate::config::ScheduleConfig;
use crate::derivation::{derive_stages, MissingTiming};
use crate::error::Result;
use crate::ingest::parse_start_time;
use crate::models::{
    add_minutes, BlackoutWindow, ExerciseTimes, Roster, Schedule, ScheduleSlot, Stage,
    COURT_COUNT,
};

/// Per-run court state.
///
/// Owned by a single `schedule` call and dropped with it.
#[derive(Debug)]
struct CourtState {
    /// End of the last slot on each court (index 0 = court 1).
    court_end: Vec<NaiveDateTime>,
    /// Court and end time of each chain's most recently placed stage,
    /// keyed by `(group_name, subgroup_name)`.
    chain_marker: HashMap<(String, String), (u8, NaiveDateTime)>,
}

impl CourtState {
    fn new(start: NaiveDateTime) -> Self {
        Self {
            court_end: vec![start; COURT_COUNT as usize],
            chain_marker: HashMap::new(),
        }
    }

    /// Court that frees up earliest; lowest number wins ties.
    fn earliest_court(&self) -> u8 {
        let mut best = 0;
        for (i, end) in self.court_end.iter().enumerate() {
            if *end < self.court_end[best] {
                best = i;
            }
        }
        best as u8 + 1
    }

    fn end_of(&self, court: u8) -> NaiveDateTime {
        self.court_end[court as usize - 1]
    }

    fn marker(&self, stage: &Stage) -> Option<(u8, NaiveDateTime)> {
        let (group, subgroup) = stage.chain_key();
        self.chain_marker
            .get(&(group.to_string(), subgroup.to_string()))
            .copied()
    }

    fn record(&mut self, stage: &Stage, court: u8, end: NaiveDateTime) {
        let (group, subgroup) = stage.chain_key();
        self.court_end[court as usize - 1] = end;
        self.chain_marker
            .insert((group.to_string(), subgroup.to_string()), (court, end));
    }
}

/// Chains in placement order: longest total duration first, ties by group ID.
///
/// Chains are keyed by `(group_name, subgroup_name)`, so names containing
/// `_` never merge two subgroups that share a group ID string.
pub fn order_chains(stages: &[Stage]) -> Vec<(String, Vec<&Stage>)> {
    let mut chains: BTreeMap<(&str, &str), Vec<&Stage>> = BTreeMap::new();
    for stage in stages {
        chains.entry(stage.chain_key()).or_default().push(stage);
    }

    let mut ordered: Vec<(String, Vec<&Stage>, f64)> = chains
        .into_iter()
        .map(|(_, mut chain)| {
            chain.sort_by_key(|s| s.stage_order);
            let total: f64 = chain.iter().map(|s| s.duration_minutes).sum();
            (chain[0].group_id.clone(), chain, total)
        })
        .collect();

    // Stable sort keeps the (group, subgroup) order for equal group IDs
    ordered.sort_by(|a, b| b.2.total_cmp(&a.2).then_with(|| a.0.cmp(&b.0)));
    ordered.into_iter().map(|(id, chain, _)| (id, chain)).collect()
}

/// Schedule together with the derivation's missing-timing report.
#[derive(Debug, Clone, Default)]
pub struct GeneratedSchedule {
    /// The computed schedule.
    pub schedule: Schedule,
    /// Stages that were timed with a defaulted exercise time.
    pub missing_timings: Vec<MissingTiming>,
}

/// Greedy court scheduler.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use court_scheduler::models::{Stage, StageType};
/// use court_scheduler::scheduler::CourtScheduler;
///
/// let stages = vec![
///     Stage::new("Group A", "Sub1", StageType::Final, 5, 1).with_duration(30.0),
///     Stage::new("Group B", "Sub1", StageType::Final, 5, 1).with_duration(20.0),
/// ];
/// let start = NaiveDate::from_ymd_opt(2024, 5, 18).unwrap().and_hms_opt(8, 0, 0).unwrap();
///
/// let schedule = CourtScheduler::new().schedule(&stages, start);
/// assert_eq!(schedule.slot_count(), 2);
/// assert_eq!(schedule.slots[0].court, 1);
/// assert_eq!(schedule.slots[1].court, 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CourtScheduler {
    config: ScheduleConfig,
}

impl CourtScheduler {
    /// Creates a scheduler with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scheduler with the given configuration.
    pub fn with_config(config: ScheduleConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Assigns every stage to a court and a start time.
    ///
    /// Empty input yields an empty schedule.
    pub fn schedule(&self, stages: &[Stage], start: NaiveDateTime) -> Schedule {
        let blackout = self.config.blackout();
        let mut state = CourtState::new(start);
        let mut slots = Vec::with_capacity(stages.len());

        for (group_id, chain) in order_chains(stages) {
            for stage in chain {
                let slot = place(&mut state, &blackout, stage);
                debug!(
                    "{} {} → court {} {}–{}",
                    group_id,
                    stage.stage_type,
                    slot.court,
                    slot.start.format("%H:%M"),
                    slot.end.format("%H:%M")
                );
                slots.push(slot);
            }
        }

        let schedule = Schedule::from_slots(slots);
        if let Some(end) = schedule.last_end() {
            info!(
                "scheduled {} stage(s) on {} courts, finishing at {}",
                schedule.slot_count(),
                COURT_COUNT,
                end.format("%H:%M")
            );
        }
        schedule
    }

    /// Derives stages from the roster and schedules them from `start_time`
    /// (`HH:MM`) on `date`.
    pub fn generate(
        &self,
        roster: &Roster,
        times: &ExerciseTimes,
        start_time: &str,
        date: NaiveDate,
    ) -> Result<GeneratedSchedule> {
        let start = date.and_time(parse_start_time(start_time)?);
        let derivation = derive_stages(roster, times, &self.config)?;
        Ok(GeneratedSchedule {
            schedule: self.schedule(&derivation.stages, start),
            missing_timings: derivation.missing_timings,
        })
    }
}

fn place(state: &mut CourtState, blackout: &BlackoutWindow, stage: &Stage) -> ScheduleSlot {
    let (court, candidate) = match state.marker(stage) {
        Some((court, prev_end)) => (court, prev_end.max(state.end_of(court))),
        None => {
            let court = state.earliest_court();
            (court, state.end_of(court))
        }
    };

    let start = blackout.adjust(candidate, stage.duration_minutes);
    let end = add_minutes(start, stage.duration_minutes);
    state.record(stage, court, end);

    ScheduleSlot::new(court, start, end, stage.clone())
}

/// Schedules stages with the default configuration.
pub fn schedule(stages: &[Stage], start: NaiveDateTime) -> Schedule {
    CourtScheduler::new().schedule(stages, start)
}

/// Parses the start time, derives stages and schedules them in one call.
pub fn generate_schedule(
    roster: &Roster,
    times: &ExerciseTimes,
    start_time: &str,
    date: NaiveDate,
    config: &ScheduleConfig,
) -> Result<GeneratedSchedule> {
    CourtScheduler::with_config(config.clone()).generate(roster, times, start_time, date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{minutes_delta, RosterEntry, RoundExercises, StageType};
    use crate::validation::validate_schedule;
    use chrono::TimeDelta;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 18).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        day().and_hms_opt(h, m, 0).unwrap()
    }

    fn hms(h: u32, m: u32, s: u32) -> NaiveDateTime {
        day().and_hms_opt(h, m, s).unwrap()
    }

    fn final_stage(group: &str, duration: f64) -> Stage {
        Stage::new(group, "Sub1", StageType::Final, 5, 1).with_duration(duration)
    }

    fn chain(group: &str, durations: &[f64]) -> Vec<Stage> {
        let skip = StageType::ALL.len() - durations.len();
        durations
            .iter()
            .zip(StageType::ALL.iter().skip(skip))
            .enumerate()
            .map(|(i, (d, t))| {
                Stage::new(group, "Sub1", *t, 10, i as u32 + 1).with_duration(*d)
            })
            .collect()
    }

    #[test]
    fn test_single_chain_scenario() {
        let stages = chain("GroupA", &[47.5, 29.0, 10.0]);
        let schedule = CourtScheduler::new().schedule(&stages, at(8, 0));

        let got: Vec<(u8, NaiveDateTime, NaiveDateTime)> = schedule
            .slots
            .iter()
            .map(|s| (s.court, s.start, s.end))
            .collect();
        assert_eq!(
            got,
            vec![
                (1, at(8, 0), hms(8, 47, 30)),
                (1, hms(8, 47, 30), hms(9, 16, 30)),
                (1, hms(9, 16, 30), hms(9, 26, 30)),
            ]
        );
    }

    #[test]
    fn test_two_small_groups_tie() {
        let stages = vec![final_stage("Group A", 7.0), final_stage("Group B", 7.0)];
        let schedule = CourtScheduler::new().schedule(&stages, at(8, 0));

        assert_eq!(schedule.slots[0].court, 1);
        assert_eq!(schedule.slots[0].stage.group_name, "Group A");
        assert_eq!(schedule.slots[1].court, 2);
        assert_eq!(schedule.slots[1].stage.group_name, "Group B");
        assert_eq!(schedule.slots[1].start, at(8, 0));
    }

    #[test]
    fn test_longest_chain_first() {
        let stages = vec![
            final_stage("Short", 10.0),
            final_stage("Long", 60.0),
            final_stage("Mid", 30.0),
        ];
        let schedule = CourtScheduler::new().schedule(&stages, at(8, 0));
        let court_of = |g: &str| {
            schedule
                .slots
                .iter()
                .find(|s| s.stage.group_name == g)
                .unwrap()
                .court
        };
        assert_eq!(court_of("Long"), 1);
        assert_eq!(court_of("Mid"), 2);
        assert_eq!(court_of("Short"), 3);
    }

    #[test]
    fn test_load_balancing() {
        // Four chains on three courts: the fourth goes to the court freeing first
        let stages = vec![
            final_stage("A", 60.0),
            final_stage("B", 50.0),
            final_stage("C", 40.0),
            final_stage("D", 30.0),
        ];
        let schedule = CourtScheduler::new().schedule(&stages, at(8, 0));
        let d = schedule
            .slots
            .iter()
            .find(|s| s.stage.group_name == "D")
            .unwrap();
        assert_eq!(d.court, 3);
        assert_eq!(d.start, at(8, 40));
    }

    #[test]
    fn test_chain_stays_on_court() {
        let mut stages = chain("A", &[20.0, 20.0, 20.0]);
        stages.extend(chain("B", &[30.0, 30.0]));
        let schedule = CourtScheduler::new().schedule(&stages, at(8, 0));

        let a = schedule.slots_for_group("A_Sub1");
        assert!(a.iter().all(|s| s.court == a[0].court));
        for pair in a.windows(2) {
            assert!(pair[1].start >= pair[0].end);
        }
    }

    #[test]
    fn test_lunch_shift() {
        // Starts 12:00, 45 min would cross 12:30 → moved to 14:00
        let stages = vec![final_stage("A", 45.0)];
        let schedule = CourtScheduler::new().schedule(&stages, at(12, 0));
        assert_eq!(schedule.slots[0].start, at(14, 0));
        assert_eq!(schedule.slots[0].end, at(14, 45));
    }

    #[test]
    fn test_lunch_shift_mid_chain() {
        // 11:00 + 80 → 12:20; next 20 min would cross 12:30
        let stages = chain("A", &[80.0, 20.0]);
        let schedule = CourtScheduler::new().schedule(&stages, at(11, 0));
        let a = schedule.slots_for_group("A_Sub1");
        assert_eq!(a[0].end, at(12, 20));
        assert_eq!(a[1].start, at(14, 0));
        assert_eq!(a[1].court, a[0].court);
    }

    #[test]
    fn test_unordered_input() {
        let mut stages = chain("A", &[20.0, 15.0, 10.0]);
        stages.reverse();
        let schedule = CourtScheduler::new().schedule(&stages, at(8, 0));
        let orders: Vec<u32> = schedule
            .slots_for_group("A_Sub1")
            .iter()
            .map(|s| s.stage.stage_order)
            .collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(schedule.slots[0].stage.stage_order, 1);
    }

    #[test]
    fn test_tie_break_by_group_id() {
        let stages = vec![final_stage("Zeta", 10.0), final_stage("Alpha", 10.0)];
        let schedule = CourtScheduler::new().schedule(&stages, at(8, 0));
        assert_eq!(schedule.slots[0].stage.group_name, "Alpha");
        assert_eq!(schedule.slots[0].court, 1);
    }

    #[test]
    fn test_output_sorted() {
        let mut stages = chain("A", &[30.0, 10.0]);
        stages.extend(chain("B", &[20.0, 20.0]));
        stages.push(final_stage("C", 5.0));
        let schedule = CourtScheduler::new().schedule(&stages, at(8, 0));
        for pair in schedule.slots.windows(2) {
            assert!((pair[0].start, pair[0].court) <= (pair[1].start, pair[1].court));
        }
    }

    #[test]
    fn test_empty_input() {
        let schedule = schedule(&[], at(8, 0));
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_order_chains() {
        let mut stages = chain("B", &[10.0, 10.0]);
        stages.extend(chain("A", &[20.0]));
        stages.extend(chain("C", &[5.0]));
        let ids: Vec<String> = order_chains(&stages).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["A_Sub1", "B_Sub1", "C_Sub1"]);
    }

    #[test]
    fn test_generate_from_roster() {
        let roster = Roster::new().with_entry(
            RosterEntry::new("GroupA", "Sub1", 25)
                .with_exercises(RoundExercises::new("E1", "E2", "E3")),
        );
        let times = ExerciseTimes::new()
            .with_time("E1", 1.0)
            .with_time("E2", 1.0)
            .with_time("E3", 1.0);

        let out = CourtScheduler::new()
            .generate(&roster, &times, "08:00", day())
            .unwrap();
        assert!(out.missing_timings.is_empty());
        assert_eq!(out.schedule.slot_count(), 3);
        assert_eq!(out.schedule.last_end(), Some(hms(9, 26, 30)));
    }

    #[test]
    fn test_generate_schedule_with_config() {
        let roster = Roster::new().with_entry(RosterEntry::new("G", "S", 5));
        let config = ScheduleConfig::default().with_break_minutes(5.0);

        let out =
            generate_schedule(&roster, &ExerciseTimes::new(), "9:00", day(), &config).unwrap();
        assert_eq!(out.missing_timings.len(), 1);
        assert_eq!(out.schedule.slots[0].start, at(9, 0));
        assert_eq!(out.schedule.slots[0].end, at(9, 5));
    }

    #[test]
    fn test_huge_exercise_time_saturates() {
        let roster = Roster::new().with_entry(
            RosterEntry::new("G", "S", 25).with_exercises(RoundExercises::new("E", "E", "E")),
        );
        let times = ExerciseTimes::new().with_time("E", 1e12);

        let out = CourtScheduler::new()
            .generate(&roster, &times, "08:00", day())
            .unwrap();
        assert_eq!(out.schedule.slot_count(), 3);
        assert_eq!(out.schedule.last_end(), Some(NaiveDateTime::MAX));
        assert!(out.schedule.slots.iter().all(|s| s.court == 1));
    }

    #[test]
    fn test_oversized_blackout_config() {
        let config = ScheduleConfig::from_json(
            r#"{ "lunch_tolerance_minutes": 9223372036854775807 }"#,
        )
        .unwrap();
        let stages = vec![final_stage("A", 10.0)];
        let schedule = CourtScheduler::with_config(config).schedule(&stages, at(8, 0));
        assert_eq!(schedule.slot_count(), 1);
        assert_eq!(schedule.slots[0].start, NaiveDateTime::MAX);
    }

    #[test]
    fn test_underscored_names_stay_separate_chains() {
        let stages = vec![
            Stage::new("A_B", "C", StageType::Final, 5, 1).with_duration(10.0),
            Stage::new("A", "B_C", StageType::Final, 5, 1).with_duration(10.0),
        ];
        let schedule = CourtScheduler::new().schedule(&stages, at(8, 0));

        let courts: Vec<(u8, NaiveDateTime)> =
            schedule.slots.iter().map(|s| (s.court, s.start)).collect();
        assert_eq!(courts, vec![(1, at(8, 0)), (2, at(8, 0))]);
        assert_eq!(schedule.slots[0].stage.group_name, "A");
        assert_eq!(order_chains(&stages).len(), 2);
    }

    #[test]
    fn test_generate_rejects_bad_start() {
        let result =
            CourtScheduler::new().generate(&Roster::new(), &ExerciseTimes::new(), "8h", day());
        assert!(result.is_err());
    }

    #[test]
    fn test_deterministic() {
        let mut stages = chain("A", &[30.0, 10.0]);
        stages.extend(chain("B", &[30.0, 10.0]));
        stages.extend(chain("C", &[25.0]));
        let a = schedule(&stages, at(9, 0));
        let b = schedule(&stages, at(9, 0));
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_random_rosters_hold_invariants() {
        let mut rng = SmallRng::seed_from_u64(42);
        let config = ScheduleConfig::default();
        let scheduler = CourtScheduler::with_config(config.clone());

        for _ in 0..50 {
            let mut roster = Roster::new();
            let mut times = ExerciseTimes::new();
            for i in 0..rng.random_range(1..12) {
                let names = [format!("E{i}a"), format!("E{i}b"), format!("E{i}c")];
                for n in &names {
                    times.set(n.clone(), rng.random_range(0.5..3.0));
                }
                let participants = rng.random_range(1..40);
                roster.push(
                    RosterEntry::new(format!("G{}", i % 4), format!("S{i}"), participants)
                        .with_exercises(RoundExercises::from_names(&names)),
                );
            }

            let start = at(rng.random_range(7..11), rng.random_range(0..60));
            let stages = derive_stages(&roster, &times, &config).unwrap().stages;
            let schedule = scheduler.schedule(&stages, start);

            assert_eq!(schedule.slot_count(), stages.len());
            let violations = validate_schedule(&schedule, &stages, &config.blackout());
            assert!(violations.is_empty(), "{violations:?}");
            for slot in &schedule.slots {
                assert!(slot.start >= start);
                assert_eq!(slot.end - slot.start, minutes_delta(slot.stage.duration_minutes));
            }
        }
    }

    #[test]
    fn test_start_after_blackout_unaffected() {
        let stages = vec![final_stage("A", 30.0)];
        let schedule = CourtScheduler::new().schedule(&stages, at(15, 0));
        assert_eq!(schedule.slots[0].start, at(15, 0));
        assert_eq!(schedule.slots[0].end, at(15, 0) + TimeDelta::minutes(30));
    }
}
