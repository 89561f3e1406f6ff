//! Content calendar model.
//!
//! The calendar is the run's output artifact: the week's scheduled
//! threads plus aggregate metadata for reporting. It is written once per
//! run and never mutated by the planner afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ScheduledThread;

/// Lifecycle of a calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarStatus {
    #[default]
    Draft,
    Approved,
    Published,
}

/// Aggregate statistics for a calendar.
///
/// `quality_score` is built from the soft-constraint scores, not from the
/// quality reviewer; the two are independent signals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMetadata {
    /// Entries per subreddit.
    pub subreddit_distribution: BTreeMap<String, u32>,
    /// Exposure per persona: 1 per authored post, 0.5 per comment.
    pub persona_usage: BTreeMap<String, f64>,
    /// Distinct keyword IDs covered, in first-seen order.
    pub keywords_covered: Vec<String>,
    /// 0-100.
    pub quality_score: u32,
    /// 0-100.
    pub diversity_score: u32,
    /// Slots requested for the week.
    pub total_slots: usize,
    /// Slots actually filled.
    pub scheduled_count: usize,
    /// Entries placed despite a failed hard constraint.
    pub constraint_violations: usize,
}

impl CalendarMetadata {
    /// Requested slots left empty.
    pub fn unfilled_slots(&self) -> usize {
        self.total_slots.saturating_sub(self.scheduled_count)
    }
}

/// A week of scheduled content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentCalendar {
    pub id: String,
    pub campaign_id: String,
    pub week_start_date: DateTime<Utc>,
    pub week_end_date: DateTime<Utc>,
    pub entries: Vec<ScheduledThread>,
    pub metadata: CalendarMetadata,
    pub status: CalendarStatus,
}

impl ContentCalendar {
    /// Number of entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Entries that broke a hard constraint.
    pub fn flagged_entries(&self) -> impl Iterator<Item = &ScheduledThread> {
        self.entries.iter().filter(|e| e.violates_hard_constraints())
    }
}
