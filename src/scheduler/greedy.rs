//! Greedy slot assignment with a fallback pass.
//!
//! # Algorithm
//!
//! 1. Generate the week's slots.
//! 2. Rank threads by [`ThreadScorer`] (stable, descending).
//! 3. **Primary pass**: for each slot in generation order, evaluate every
//!    unused thread. Among those passing all hard constraints, commit the
//!    one maximizing `thread_score * 0.6 + soft_score * 0.4`. Slots with no
//!    passing thread stay open.
//! 4. **Fallback pass**: each open slot takes the highest-ranked remaining
//!    thread regardless of hard constraints. Its real check result is kept.
//! 5. Emit entries in slot generation order.
//!
//! A slot equal to an earlier one (more than 7 posts per week collapse
//! onto one day) is never filled and is reported as unfilled.
//!
//! # Complexity
//! O(s * t * (s + h)) where s=slots, t=threads, h=history entries.
//!
//! Running persona usage lives in a [`UsageLedger`] owned by one run, seeded
//! from the snapshot and never written back.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::generate_time_slots;
use crate::constraints::{check_all, ConstraintContext};
use crate::history::PlanningSnapshot;
use crate::models::{CampaignConfig, ConstraintCheckResult, ScheduledThread, ThreadPlan, TimeSlot};
use crate::scoring::ThreadScorer;

/// Weight of the slot-independent thread score in placement.
pub const THREAD_SCORE_WEIGHT: f64 = 0.6;

/// Weight of the weighted soft score in placement.
pub const SOFT_SCORE_WEIGHT: f64 = 0.4;

/// Result of one scheduling run, with fill diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOutcome {
    /// Placed threads in slot generation order.
    pub entries: Vec<ScheduledThread>,
    /// Slots nothing could be placed in.
    pub unfilled_slots: Vec<TimeSlot>,
    /// Entries placed with every hard constraint satisfied.
    pub primary_placements: usize,
    /// Entries placed by the fallback pass.
    pub fallback_placements: usize,
}

impl ScheduleOutcome {
    /// Whether every generated slot was filled.
    pub fn is_complete(&self) -> bool {
        self.unfilled_slots.is_empty()
    }

    /// Number of slots generated for the run.
    pub fn total_slots(&self) -> usize {
        self.entries.len() + self.unfilled_slots.len()
    }
}

/// Persona usage accumulated during one run.
///
/// Starts as a copy of the snapshot's prior usage; each commit adds one
/// for the thread's OP.
#[derive(Debug, Clone, Default)]
pub struct UsageLedger {
    counts: HashMap<String, f64>,
}

impl UsageLedger {
    pub fn seeded(prior: &HashMap<String, f64>) -> Self {
        Self {
            counts: prior.clone(),
        }
    }

    /// Records an authored post.
    pub fn record_post(&mut self, persona_id: &str) {
        *self.counts.entry(persona_id.to_string()).or_insert(0.0) += 1.0;
    }

    pub fn usage(&self, persona_id: &str) -> f64 {
        self.counts.get(persona_id).copied().unwrap_or(0.0)
    }

    pub fn counts(&self) -> &HashMap<String, f64> {
        &self.counts
    }
}

/// Greedy weekly scheduler.
///
/// # Example
/// ```
/// use content_planner::history::PlanningSnapshot;
/// use content_planner::models::{CampaignConfig, CommentPlan, PostCandidate, ThreadPlan};
/// use content_planner::scheduler::ContentScheduler;
/// use chrono::{TimeZone, Utc};
///
/// let monday = Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
/// let config = CampaignConfig::new("camp-1", monday, 2);
/// let threads = vec![
///     ThreadPlan::new("t1", PostCandidate::new("p1", "r/PowerPoint", "alice"))
///         .with_comment(CommentPlan::new("c1", "bob")),
///     ThreadPlan::new("t2", PostCandidate::new("p2", "r/consulting", "carol"))
///         .with_comment(CommentPlan::new("c2", "dave")),
/// ];
///
/// let scheduler = ContentScheduler::new(PlanningSnapshot::empty(monday));
/// let entries = scheduler.schedule_threads(&threads, &config);
/// assert_eq!(entries.len(), 2);
/// assert!(entries.iter().all(|e| e.constraints_satisfied.passed));
/// ```
#[derive(Debug, Clone)]
pub struct ContentScheduler {
    snapshot: PlanningSnapshot,
    scorer: ThreadScorer,
}

impl ContentScheduler {
    /// Creates a scheduler over a history snapshot, with default thread scoring.
    pub fn new(snapshot: PlanningSnapshot) -> Self {
        Self {
            snapshot,
            scorer: ThreadScorer::default(),
        }
    }

    /// Replaces the thread scorer.
    pub fn with_scorer(mut self, scorer: ThreadScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn snapshot(&self) -> &PlanningSnapshot {
        &self.snapshot
    }

    /// Schedules threads into the campaign week.
    ///
    /// Never fails: infeasibility shows up as fewer entries than slots.
    pub fn schedule_threads(
        &self,
        threads: &[ThreadPlan],
        config: &CampaignConfig,
    ) -> Vec<ScheduledThread> {
        self.schedule_with_report(threads, config).entries
    }

    /// Schedules threads and reports which slots stayed open.
    pub fn schedule_with_report(
        &self,
        threads: &[ThreadPlan],
        config: &CampaignConfig,
    ) -> ScheduleOutcome {
        let slots = generate_time_slots(config.week_start, config.posts_per_week);
        let scoring = self.snapshot.scoring_context();
        let ranked = self.scorer.rank(threads, &scoring);

        let mut run = PlacementRun::new(threads, &slots, &self.snapshot, config.posts_per_week);

        for slot_idx in run.open_slots() {
            run.place_best_passing(slot_idx, &ranked);
        }
        let primary_placements = run.placed_count();

        for slot_idx in run.open_slots() {
            if !run.place_ignoring_hard_constraints(slot_idx, &ranked) {
                break;
            }
        }

        let outcome = run.finish(primary_placements);
        for slot in &outcome.unfilled_slots {
            warn!(slot = %slot.date, "slot left unfilled");
        }
        info!(
            campaign = %config.campaign_id,
            threads = threads.len(),
            slots = slots.len(),
            primary = outcome.primary_placements,
            fallback = outcome.fallback_placements,
            unfilled = outcome.unfilled_slots.len(),
            "scheduled week"
        );
        outcome
    }
}

/// Mutable state of one scheduling invocation.
struct PlacementRun<'a> {
    threads: &'a [ThreadPlan],
    slots: &'a [TimeSlot],
    snapshot: &'a PlanningSnapshot,
    weekly_limit: usize,
    ledger: UsageLedger,
    used: HashSet<&'a str>,
    /// Committed entries in placement order; `slot_of[i]` is entry i's slot.
    schedule: Vec<ScheduledThread>,
    slot_of: Vec<usize>,
    filled: Vec<bool>,
    /// Slots repeating an earlier slot's time.
    duplicate: Vec<bool>,
}

impl<'a> PlacementRun<'a> {
    fn new(
        threads: &'a [ThreadPlan],
        slots: &'a [TimeSlot],
        snapshot: &'a PlanningSnapshot,
        weekly_limit: usize,
    ) -> Self {
        Self {
            threads,
            slots,
            snapshot,
            weekly_limit,
            ledger: UsageLedger::seeded(&snapshot.persona_usage),
            used: HashSet::new(),
            schedule: Vec::with_capacity(slots.len()),
            slot_of: Vec::with_capacity(slots.len()),
            filled: vec![false; slots.len()],
            duplicate: duplicate_slots(slots),
        }
    }

    fn evaluate(&self, thread_idx: usize, slot_idx: usize) -> ConstraintCheckResult {
        let ctx = ConstraintContext::new(self.weekly_limit)
            .with_schedule(&self.schedule)
            .with_history(&self.snapshot.history)
            .with_persona_usage(self.ledger.counts())
            .with_keyword_urgency(&self.snapshot.keyword_urgency);
        check_all(&self.threads[thread_idx], &self.slots[slot_idx], &ctx)
    }

    fn is_used(&self, thread_idx: usize) -> bool {
        self.used.contains(self.threads[thread_idx].id.as_str())
    }

    /// Primary pass for one slot.
    fn place_best_passing(&mut self, slot_idx: usize, ranked: &[(usize, f64)]) -> bool {
        let mut best: Option<(usize, f64, ConstraintCheckResult)> = None;

        for &(thread_idx, thread_score) in ranked {
            if self.is_used(thread_idx) {
                continue;
            }
            let check = self.evaluate(thread_idx, slot_idx);
            if !check.passed {
                continue;
            }
            let combined = thread_score * THREAD_SCORE_WEIGHT
                + check.soft_constraints.weighted() * SOFT_SCORE_WEIGHT;
            if best.as_ref().map_or(true, |(_, score, _)| combined > *score) {
                best = Some((thread_idx, combined, check));
            }
        }

        match best {
            Some((thread_idx, combined, check)) => {
                debug!(
                    slot = %self.slots[slot_idx].date,
                    thread = %self.threads[thread_idx].id,
                    score = combined,
                    "placed thread"
                );
                self.commit(thread_idx, slot_idx, check);
                true
            }
            None => {
                debug!(slot = %self.slots[slot_idx].date, "no thread passes hard constraints");
                false
            }
        }
    }

    /// Fallback pass for one slot: takes the highest-ranked unused thread
    /// and commits it even when its check result did not pass. Returns
    /// `false` once threads are exhausted.
    fn place_ignoring_hard_constraints(&mut self, slot_idx: usize, ranked: &[(usize, f64)]) -> bool {
        let Some(&(thread_idx, _)) = ranked.iter().find(|(idx, _)| !self.is_used(*idx)) else {
            return false;
        };

        let check = self.evaluate(thread_idx, slot_idx);
        if !check.passed {
            warn!(
                slot = %self.slots[slot_idx].date,
                thread = %self.threads[thread_idx].id,
                violations = ?check.warnings,
                "fallback placement breaks hard constraints"
            );
        } else {
            debug!(
                slot = %self.slots[slot_idx].date,
                thread = %self.threads[thread_idx].id,
                "fallback placement"
            );
        }
        self.commit(thread_idx, slot_idx, check);
        true
    }

    fn commit(&mut self, thread_idx: usize, slot_idx: usize, check: ConstraintCheckResult) {
        let threads = self.threads;
        let thread = &threads[thread_idx];
        self.ledger.record_post(thread.op_persona_id());
        self.used.insert(thread.id.as_str());
        self.schedule.push(ScheduledThread::new(
            thread.clone(),
            self.slots[slot_idx].clone(),
            check,
        ));
        self.slot_of.push(slot_idx);
        self.filled[slot_idx] = true;
    }

    fn placed_count(&self) -> usize {
        self.schedule.len()
    }

    fn open_slots(&self) -> Vec<usize> {
        (0..self.slots.len())
            .filter(|&i| !self.filled[i] && !self.duplicate[i])
            .collect()
    }

    fn finish(self, primary_placements: usize) -> ScheduleOutcome {
        let fallback_placements = self.schedule.len() - primary_placements;

        let mut placed: Vec<(usize, ScheduledThread)> =
            self.slot_of.into_iter().zip(self.schedule).collect();
        placed.sort_by_key(|(slot_idx, _)| *slot_idx);

        let unfilled_slots = self
            .slots
            .iter()
            .zip(&self.filled)
            .filter(|(_, filled)| !**filled)
            .map(|(slot, _)| slot.clone())
            .collect();

        ScheduleOutcome {
            entries: placed.into_iter().map(|(_, entry)| entry).collect(),
            unfilled_slots,
            primary_placements,
            fallback_placements,
        }
    }
}

fn duplicate_slots(slots: &[TimeSlot]) -> Vec<bool> {
    slots
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let repeated = slots[..i].contains(slot);
            if repeated {
                warn!(slot = %slot.date, "slot repeats an earlier slot; skipping");
            }
            repeated
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::SUBREDDIT_COOLDOWN_HOURS;
    use crate::fixtures::{campaign, monday, slot, thread};
    use crate::models::CommentPlan;
    use chrono::Duration;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn scheduler() -> ContentScheduler {
        ContentScheduler::new(PlanningSnapshot::empty(monday()))
    }

    fn ids(entries: &[ScheduledThread]) -> Vec<&str> {
        entries.iter().map(|e| e.thread.id.as_str()).collect()
    }

    #[test]
    fn test_empty_threads_yield_empty_schedule() {
        let outcome = scheduler().schedule_with_report(&[], &campaign(3));
        assert!(outcome.entries.is_empty());
        assert_eq!(outcome.unfilled_slots.len(), 3);
        assert_eq!(outcome.primary_placements, 0);
        assert_eq!(outcome.fallback_placements, 0);
        assert!(!outcome.is_complete());
    }

    #[test]
    fn test_distinct_subreddits_fill_every_slot() {
        let threads = vec![
            thread("a", "r/PowerPoint", "alice", "bob"),
            thread("b", "r/consulting", "carol", "dave"),
            thread("c", "r/startups", "bob", "carol"),
        ];
        let outcome = scheduler().schedule_with_report(&threads, &campaign(3));

        assert!(outcome.is_complete());
        assert_eq!(outcome.primary_placements, 3);
        assert_eq!(outcome.fallback_placements, 0);
        assert!(outcome.entries.iter().all(|e| e.constraints_satisfied.passed));
        assert_eq!(outcome.entries[0].slot, slot(7, 9));
        assert_eq!(outcome.entries[2].slot, slot(11, 15));
    }

    #[test]
    fn test_higher_engagement_takes_first_slot() {
        let threads = vec![
            thread("low", "r/PowerPoint", "alice", "bob").with_engagement(10.0),
            thread("high", "r/consulting", "carol", "dave").with_engagement(90.0),
        ];
        let entries = scheduler().schedule_threads(&threads, &campaign(2));
        assert_eq!(ids(&entries), vec!["high", "low"]);
    }

    #[test]
    fn test_same_subreddit_waits_out_cooldown() {
        // Slots: Tue 9, Wed 12, Thu 15, Fri 18, Sat 21, Sun 9, Mon 12
        let threads = vec![
            thread("a", "r/PowerPoint", "alice", "bob").with_engagement(90.0),
            thread("b", "r/PowerPoint", "carol", "dave").with_engagement(50.0),
        ];
        let outcome = scheduler().schedule_with_report(&threads, &campaign(7));

        assert_eq!(ids(&outcome.entries), vec!["a", "b"]);
        // Wed 12 is 27h after Tue 9; Thu 15 is 54h after
        assert_eq!(outcome.entries[0].slot, slot(7, 9));
        assert_eq!(outcome.entries[1].slot, slot(9, 15));
        assert_eq!(outcome.primary_placements, 2);
        assert_eq!(outcome.unfilled_slots.len(), 5);
        assert_eq!(outcome.unfilled_slots[0], slot(8, 12));
    }

    #[test]
    fn test_fallback_fills_open_slot_and_flags_it() {
        // Slots: Tue 9, Wed 12, Thu 15, Fri 18
        let threads = vec![
            thread("a", "r/PowerPoint", "alice", "bob").with_engagement(90.0),
            thread("b", "r/PowerPoint", "carol", "dave").with_engagement(60.0),
            thread("c", "r/PowerPoint", "bob", "alice").with_engagement(30.0),
        ];
        let outcome = scheduler().schedule_with_report(&threads, &campaign(4));

        // Primary: a → Tue, b → Thu. Fallback: c → Wed. Fri stays open.
        assert_eq!(ids(&outcome.entries), vec!["a", "c", "b"]);
        assert_eq!(outcome.primary_placements, 2);
        assert_eq!(outcome.fallback_placements, 1);
        assert_eq!(outcome.unfilled_slots, vec![slot(10, 18)]);

        let fallback = &outcome.entries[1];
        assert!(fallback.violates_hard_constraints());
        assert!(!fallback.constraints_satisfied.hard_constraints.subreddit_frequency);
        assert!(fallback.constraints_satisfied.warnings[0].contains("48 hours"));
    }

    #[test]
    fn test_fallback_still_uses_threads_failing_persona_rules() {
        // OP answers first: never passes, only fallback can place it
        let bad = thread("bad", "r/startups", "alice", "alice");
        let outcome = scheduler().schedule_with_report(&[bad], &campaign(1));

        assert_eq!(outcome.primary_placements, 0);
        assert_eq!(outcome.fallback_placements, 1);
        let entry = &outcome.entries[0];
        assert!(!entry.constraints_satisfied.hard_constraints.persona_no_self_reply);
    }

    #[test]
    fn test_overused_persona_loses_tie() {
        let threads = vec![
            thread("busy", "r/PowerPoint", "alice", "bob"),
            thread("fresh", "r/consulting", "carol", "dave"),
        ];
        let snapshot = PlanningSnapshot::empty(monday()).with_persona_usage("alice", 10.0);
        let entries = ContentScheduler::new(snapshot).schedule_threads(&threads, &campaign(1));
        assert_eq!(ids(&entries), vec!["fresh"]);
    }

    #[test]
    fn test_history_cooldown_blocks_primary_pass() {
        let history = vec![crate::models::PostHistory::new(
            "r/PowerPoint",
            monday() + Duration::hours(12),
        )];
        let snapshot = PlanningSnapshot::empty(monday()).with_history(history);
        let threads = vec![
            thread("pp", "r/PowerPoint", "alice", "bob").with_engagement(100.0),
            thread("co", "r/consulting", "carol", "dave").with_engagement(0.0),
        ];
        let entries = ContentScheduler::new(snapshot).schedule_threads(&threads, &campaign(1));
        assert_eq!(ids(&entries), vec!["co"]);
    }

    #[test]
    fn test_snapshot_usage_not_mutated() {
        let snapshot = PlanningSnapshot::empty(monday()).with_persona_usage("alice", 2.0);
        let scheduler = ContentScheduler::new(snapshot);
        let threads = vec![thread("a", "r/PowerPoint", "alice", "bob")];
        scheduler.schedule_threads(&threads, &campaign(1));
        assert_eq!(scheduler.snapshot().persona_usage["alice"], 2.0);
    }

    #[test]
    fn test_ledger_counts_posts() {
        let mut prior = HashMap::new();
        prior.insert("alice".to_string(), 1.5);
        let mut ledger = UsageLedger::seeded(&prior);
        ledger.record_post("alice");
        ledger.record_post("bob");
        assert!((ledger.usage("alice") - 2.5).abs() < 1e-10);
        assert_eq!(ledger.usage("bob"), 1.0);
        assert_eq!(ledger.usage("carol"), 0.0);
        assert_eq!(prior["alice"], 1.5);
    }

    #[test]
    fn test_duplicate_thread_ids_placed_once() {
        let threads = vec![
            thread("dup", "r/PowerPoint", "alice", "bob"),
            thread("dup", "r/consulting", "carol", "dave"),
        ];
        let outcome = scheduler().schedule_with_report(&threads, &campaign(2));
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.unfilled_slots.len(), 1);
    }

    #[test]
    fn test_repeated_slots_never_double_booked() {
        // Eight posts collapse onto one day; slots 5..8 repeat slots 0..3.
        let subreddits = ["r/PowerPoint", "r/consulting", "r/startups", "r/productivity"];
        let threads: Vec<ThreadPlan> = (0..8)
            .map(|i| thread(&format!("t{i}"), subreddits[i % 4], "alice", "bob"))
            .collect();

        let outcome = scheduler().schedule_with_report(&threads, &campaign(8));
        assert_eq!(outcome.entries.len(), 5);
        assert_eq!(outcome.unfilled_slots.len(), 3);
        assert_eq!(outcome.total_slots(), 8);
        for (i, a) in outcome.entries.iter().enumerate() {
            assert!(outcome.entries[i + 1..].iter().all(|b| b.slot != a.slot));
        }
    }

    #[test]
    fn test_random_weeks_keep_invariants() {
        let subreddits = ["r/PowerPoint", "r/consulting", "r/startups", "r/productivity"];
        let personas = ["alice", "bob", "carol", "dave"];
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..50 {
            let posts_per_week = rng.random_range(1..=10);
            let thread_count = rng.random_range(0..=10);

            let threads: Vec<ThreadPlan> = (0..thread_count)
                .map(|i| {
                    let op = personas[rng.random_range(0..personas.len())];
                    let sub = subreddits[rng.random_range(0..subreddits.len())];
                    let mut t = thread(&format!("t{i}"), sub, op, "bob")
                        .with_engagement(rng.random_range(0.0..100.0));
                    if rng.random_bool(0.5) {
                        t = t.with_comment(CommentPlan::new(format!("t{i}-c2"), "carol"));
                    }
                    t
                })
                .collect();

            let config = campaign(posts_per_week);
            let slots = generate_time_slots(config.week_start, posts_per_week);
            let outcome = scheduler().schedule_with_report(&threads, &config);

            // One thread per slot, one slot per thread
            let slot_positions: Vec<usize> = outcome
                .entries
                .iter()
                .map(|e| slots.iter().position(|s| *s == e.slot).unwrap())
                .collect();
            assert!(slot_positions.windows(2).all(|w| w[0] < w[1]));

            let thread_ids: HashSet<&str> = ids(&outcome.entries).into_iter().collect();
            assert_eq!(thread_ids.len(), outcome.entries.len());

            // No two entries share a slot
            for (i, a) in outcome.entries.iter().enumerate() {
                assert!(outcome.entries[i + 1..].iter().all(|b| b.slot != a.slot));
            }

            // Fallback guarantees progress over distinct slots
            let distinct_slots = slots
                .iter()
                .enumerate()
                .filter(|&(i, s)| !slots[..i].contains(s))
                .count();
            assert_eq!(outcome.entries.len(), distinct_slots.min(thread_count));
            assert_eq!(outcome.total_slots(), posts_per_week);

            // Primary placements respect the subreddit cooldown pairwise
            let passed: Vec<&ScheduledThread> = outcome
                .entries
                .iter()
                .filter(|e| e.constraints_satisfied.passed)
                .collect();
            for (i, a) in passed.iter().enumerate() {
                for b in &passed[i + 1..] {
                    if a.subreddit() == b.subreddit() {
                        assert!(
                            a.slot.distance_to(b.slot.date)
                                >= Duration::hours(SUBREDDIT_COOLDOWN_HOURS)
                        );
                    }
                }
            }
        }
    }
}
