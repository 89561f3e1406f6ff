//! Constraint evaluation for a single (thread, slot) placement.
//!
//! Pure functions, no side effects. Given the in-progress schedule, prior
//! history and usage lookups, decides whether a thread may occupy a slot
//! (hard constraints) and how well it would serve the week's soft
//! objectives.
//!
//! # Hard constraints
//!
//! | Check | Fails when |
//! |-------|-----------|
//! | Subreddit frequency | Same subreddit within 48h of the slot |
//! | Persona self-reply | Consecutive same-persona comments, a reply to one's own comment, or the OP as first responder |
//! | Weekly limit | Schedule already holds `weekly_limit` entries |
//!
//! # Soft constraints
//!
//! Topic diversity, persona distribution and keyword coverage, each
//! normalized to [0, 1]. They rank placements but never block one.

mod hard;
mod similarity;
mod soft;

pub use hard::{
    check_persona_self_reply, check_subreddit_frequency, check_weekly_limit,
    SUBREDDIT_COOLDOWN_HOURS,
};
pub use similarity::{cosine_similarity, title_overlap};
pub use soft::{
    score_keyword_coverage, score_persona_distribution, score_topic_diversity,
    COMMENT_EXPOSURE_WEIGHT, HISTORY_EMBEDDING_LIMIT, PERSONA_USAGE_SATURATION,
};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{
    ConstraintCheckResult, HardConstraints, PostHistory, ScheduledThread, SoftConstraints,
    ThreadPlan, TimeSlot,
};

/// Soft scores below this produce an informational warning.
pub const LOW_SOFT_SCORE: f64 = 0.3;

/// Urgency assumed for a keyword missing from the lookup map.
pub const DEFAULT_KEYWORD_URGENCY: f64 = 0.5;

/// Outcome of one hard check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub passed: bool,
    /// Why the check failed. `None` when it passed.
    pub reason: Option<String>,
}

impl CheckOutcome {
    pub fn pass() -> Self {
        Self {
            passed: true,
            reason: None,
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            passed: false,
            reason: Some(reason.into()),
        }
    }
}

/// Read-only state a placement is evaluated against.
///
/// Borrowed for the duration of one evaluation. Missing lookups behave as
/// empty maps: zero prior persona usage and neutral keyword urgency.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintContext<'a> {
    /// Threads already committed in this run.
    pub schedule: &'a [ScheduledThread],
    /// Posts from previous weeks.
    pub history: &'a [PostHistory],
    /// Campaign `posts_per_week`.
    pub weekly_limit: usize,
    /// Prior usage per persona ID.
    pub persona_usage: Option<&'a HashMap<String, f64>>,
    /// Urgency (0-1) per keyword ID.
    pub keyword_urgency: Option<&'a HashMap<String, f64>>,
}

impl<'a> ConstraintContext<'a> {
    /// Creates a context with an empty schedule, history and lookups.
    pub fn new(weekly_limit: usize) -> Self {
        Self {
            schedule: &[],
            history: &[],
            weekly_limit,
            persona_usage: None,
            keyword_urgency: None,
        }
    }

    pub fn with_schedule(mut self, schedule: &'a [ScheduledThread]) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_history(mut self, history: &'a [PostHistory]) -> Self {
        self.history = history;
        self
    }

    pub fn with_persona_usage(mut self, usage: &'a HashMap<String, f64>) -> Self {
        self.persona_usage = Some(usage);
        self
    }

    pub fn with_keyword_urgency(mut self, urgency: &'a HashMap<String, f64>) -> Self {
        self.keyword_urgency = Some(urgency);
        self
    }

    /// Prior usage count for a persona (0 if unknown).
    pub fn prior_usage(&self, persona_id: &str) -> f64 {
        self.persona_usage
            .and_then(|m| m.get(persona_id))
            .copied()
            .unwrap_or(0.0)
    }

    /// Urgency for a keyword ([`DEFAULT_KEYWORD_URGENCY`] if unknown).
    pub fn urgency(&self, keyword_id: &str) -> f64 {
        self.keyword_urgency
            .and_then(|m| m.get(keyword_id))
            .copied()
            .unwrap_or(DEFAULT_KEYWORD_URGENCY)
    }
}

/// Evaluates every hard and soft constraint for placing `thread` in `slot`.
///
/// `passed` is the conjunction of the hard checks only. Warnings collect
/// the reason of every failed hard check and a note for every soft score
/// below [`LOW_SOFT_SCORE`].
///
/// # Example
/// ```
/// use content_planner::constraints::{check_all, ConstraintContext};
/// use content_planner::models::{CommentPlan, PostCandidate, ThreadPlan, TimeSlot};
/// use chrono::{TimeZone, Utc};
///
/// let thread = ThreadPlan::new("t1", PostCandidate::new("p1", "r/PowerPoint", "alice"))
///     .with_comment(CommentPlan::new("c1", "bob"));
/// let slot = TimeSlot::at(Utc.with_ymd_and_hms(2025, 1, 7, 9, 0, 0).unwrap());
///
/// let result = check_all(&thread, &slot, &ConstraintContext::new(3));
/// assert!(result.passed);
/// assert!((result.soft_constraints.topic_diversity - 1.0).abs() < 1e-10);
/// ```
pub fn check_all(
    thread: &ThreadPlan,
    slot: &TimeSlot,
    ctx: &ConstraintContext<'_>,
) -> ConstraintCheckResult {
    let subreddit = check_subreddit_frequency(thread, slot, ctx.schedule, ctx.history);
    let persona = check_persona_self_reply(thread);
    let limit = check_weekly_limit(ctx.schedule, ctx.weekly_limit);

    let hard_constraints = HardConstraints {
        subreddit_frequency: subreddit.passed,
        persona_no_self_reply: persona.passed,
        weekly_limit: limit.passed,
    };

    let soft_constraints = SoftConstraints {
        topic_diversity: score_topic_diversity(thread, ctx.schedule, ctx.history),
        persona_distribution: score_persona_distribution(thread, ctx),
        keyword_coverage: score_keyword_coverage(thread, ctx),
    };

    let mut warnings: Vec<String> = [subreddit, persona, limit]
        .into_iter()
        .filter_map(|outcome| outcome.reason)
        .collect();

    let soft_terms = [
        ("topic diversity", soft_constraints.topic_diversity),
        ("persona distribution", soft_constraints.persona_distribution),
        ("keyword coverage", soft_constraints.keyword_coverage),
    ];
    for (name, score) in soft_terms {
        if score < LOW_SOFT_SCORE {
            warnings.push(format!("Low {name} score ({score:.2})"));
        }
    }

    ConstraintCheckResult {
        passed: hard_constraints.all_passed(),
        hard_constraints,
        soft_constraints,
        warnings,
    }
}
