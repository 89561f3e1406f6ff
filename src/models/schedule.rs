//! Placement (solution) models.
//!
//! A scheduled thread is a committed (thread, slot) pair together with the
//! constraint check that was computed when it was placed. Hard and soft
//! results are separate types: a low soft score never means "failed".
//!
//! # Audit
//! Fallback placements keep their real check result, so an entry with
//! `constraints_satisfied.passed == false` is how downstream reporting
//! recognises a placement that broke a hard rule.

use serde::{Deserialize, Serialize};

use super::{ThreadPlan, TimeSlot};

/// Hard constraint outcomes. Any `false` blocks primary-pass placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardConstraints {
    /// No same-subreddit post within 48 hours.
    pub subreddit_frequency: bool,
    /// Comment ordering never has a persona answering itself.
    pub persona_no_self_reply: bool,
    /// Weekly post limit not yet reached.
    pub weekly_limit: bool,
}

impl HardConstraints {
    /// Whether every hard constraint holds.
    pub fn all_passed(&self) -> bool {
        self.subreddit_frequency && self.persona_no_self_reply && self.weekly_limit
    }
}

/// Soft objective scores, each in [0, 1] (higher = better).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftConstraints {
    pub topic_diversity: f64,
    pub persona_distribution: f64,
    pub keyword_coverage: f64,
}

impl SoftConstraints {
    pub const TOPIC_WEIGHT: f64 = 0.4;
    pub const PERSONA_WEIGHT: f64 = 0.3;
    pub const KEYWORD_WEIGHT: f64 = 0.3;

    /// Weighted soft score used by the greedy placement.
    pub fn weighted(&self) -> f64 {
        self.topic_diversity * Self::TOPIC_WEIGHT
            + self.persona_distribution * Self::PERSONA_WEIGHT
            + self.keyword_coverage * Self::KEYWORD_WEIGHT
    }

    /// Unweighted mean, used as the calendar quality proxy.
    pub fn mean(&self) -> f64 {
        (self.topic_diversity + self.persona_distribution + self.keyword_coverage) / 3.0
    }
}

/// Full evaluation of one (thread, slot) candidate pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintCheckResult {
    /// All hard constraints hold. Soft scores never affect this.
    pub passed: bool,
    pub hard_constraints: HardConstraints,
    pub soft_constraints: SoftConstraints,
    /// Failed hard checks and low soft scores, human-readable.
    pub warnings: Vec<String>,
}

/// Workflow status of a scheduled thread.
///
/// Always `Draft` when produced by the scheduler; later transitions belong
/// to the approval/posting workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    #[default]
    Draft,
    Approved,
    Posted,
    Skipped,
}

/// A thread committed to a slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledThread {
    pub id: String,
    pub thread: ThreadPlan,
    pub slot: TimeSlot,
    pub status: ScheduleStatus,
    pub constraints_satisfied: ConstraintCheckResult,
}

impl ScheduledThread {
    /// Creates a draft entry with a fresh ID.
    pub fn new(thread: ThreadPlan, slot: TimeSlot, check: ConstraintCheckResult) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            thread,
            slot,
            status: ScheduleStatus::Draft,
            constraints_satisfied: check,
        }
    }

    /// Whether the placement broke a hard constraint (fallback placement).
    pub fn violates_hard_constraints(&self) -> bool {
        !self.constraints_satisfied.passed
    }

    /// Target subreddit.
    pub fn subreddit(&self) -> &str {
        self.thread.subreddit()
    }
}
