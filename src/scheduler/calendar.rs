//! Calendar builder: folds a finished schedule into a reportable calendar.
//!
//! # Metadata
//!
//! | Field | Definition |
//! |-------|-----------|
//! | Subreddit distribution | Entries per subreddit |
//! | Persona usage | 1 per authored post + 0.5 per comment |
//! | Keywords covered | Distinct target keywords, first-seen order |
//! | Quality score | round(100 * mean over entries of the mean soft score) |
//! | Diversity score | round(100 * (subs/size * 0.3 + personas/campaign personas * 0.4 + keywords/campaign keywords * 0.3)) |
//!
//! The quality score reuses soft-constraint scores; it is unrelated to the
//! quality reviewer's verdict.

use chrono::{DateTime, Datelike, Duration, Utc};
use std::collections::{BTreeMap, HashSet};

use super::slots::start_of_day;
use crate::constraints::COMMENT_EXPOSURE_WEIGHT;
use crate::models::{
    CalendarMetadata, CalendarStatus, CampaignConfig, ContentCalendar, ScheduledThread,
};

const DAYS_PER_WEEK: i64 = 7;
const SUBREDDIT_SPREAD_WEIGHT: f64 = 0.3;
const PERSONA_SPREAD_WEIGHT: f64 = 0.4;
const KEYWORD_SPREAD_WEIGHT: f64 = 0.3;

impl CalendarMetadata {
    /// Computes calendar metadata from a schedule.
    ///
    /// # Arguments
    /// * `entries` - The finished schedule.
    /// * `config` - Campaign (persona/keyword totals and requested slot count).
    pub fn calculate(entries: &[ScheduledThread], config: &CampaignConfig) -> Self {
        let mut subreddit_distribution: BTreeMap<String, u32> = BTreeMap::new();
        let mut persona_usage: BTreeMap<String, f64> = BTreeMap::new();
        let mut keywords_covered: Vec<String> = Vec::new();
        let mut seen_keywords: HashSet<&str> = HashSet::new();

        for entry in entries {
            *subreddit_distribution
                .entry(entry.subreddit().to_string())
                .or_insert(0) += 1;

            *persona_usage
                .entry(entry.thread.op_persona_id().to_string())
                .or_insert(0.0) += 1.0;
            for comment in &entry.thread.comments {
                *persona_usage
                    .entry(comment.persona_id.clone())
                    .or_insert(0.0) += COMMENT_EXPOSURE_WEIGHT;
            }

            for keyword in &entry.thread.post.target_keywords {
                if seen_keywords.insert(keyword.as_str()) {
                    keywords_covered.push(keyword.clone());
                }
            }
        }

        let quality_score = if entries.is_empty() {
            0
        } else {
            let sum: f64 = entries
                .iter()
                .map(|e| e.constraints_satisfied.soft_constraints.mean())
                .sum();
            percent(sum / entries.len() as f64)
        };

        let diversity = ratio(subreddit_distribution.len(), entries.len())
            * SUBREDDIT_SPREAD_WEIGHT
            + ratio(persona_usage.len(), config.personas.len()) * PERSONA_SPREAD_WEIGHT
            + ratio(keywords_covered.len(), config.keywords.len()) * KEYWORD_SPREAD_WEIGHT;

        Self {
            subreddit_distribution,
            persona_usage,
            keywords_covered,
            quality_score,
            diversity_score: percent(diversity),
            total_slots: config.posts_per_week,
            scheduled_count: entries.len(),
            constraint_violations: entries
                .iter()
                .filter(|e| e.violates_hard_constraints())
                .count(),
        }
    }
}

/// Builds the week's calendar from a finished schedule.
///
/// # Example
/// ```
/// use content_planner::models::CampaignConfig;
/// use content_planner::scheduler::build_calendar;
/// use chrono::{Duration, TimeZone, Utc};
///
/// let monday = Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
/// let config = CampaignConfig::new("camp-1", monday, 3);
///
/// let calendar = build_calendar(&[], &config, "camp-1");
/// assert_eq!(calendar.week_end_date, monday + Duration::days(7));
/// assert_eq!(calendar.metadata.quality_score, 0);
/// assert_eq!(calendar.metadata.unfilled_slots(), 3);
/// ```
pub fn build_calendar(
    entries: &[ScheduledThread],
    config: &CampaignConfig,
    campaign_id: &str,
) -> ContentCalendar {
    ContentCalendar {
        id: uuid::Uuid::new_v4().to_string(),
        campaign_id: campaign_id.to_string(),
        week_start_date: config.week_start,
        week_end_date: config.week_start + Duration::days(DAYS_PER_WEEK),
        entries: entries.to_vec(),
        metadata: CalendarMetadata::calculate(entries, config),
        status: CalendarStatus::Draft,
    }
}

/// Start of the week to plan after `last`.
///
/// Without a prior calendar: the next Monday at midnight strictly after
/// `now` (a Monday `now` yields the following Monday). Otherwise the day
/// after the prior calendar's end date.
pub fn get_next_week_start(last: Option<&ContentCalendar>, now: DateTime<Utc>) -> DateTime<Utc> {
    match last {
        Some(calendar) => calendar.week_end_date + Duration::days(1),
        None => {
            let from_monday = i64::from(now.weekday().num_days_from_monday());
            start_of_day(now) + Duration::days(DAYS_PER_WEEK - from_monday)
        }
    }
}

/// [`get_next_week_start`] against the current clock.
pub fn get_next_week_start_from_now(last: Option<&ContentCalendar>) -> DateTime<Utc> {
    get_next_week_start(last, Utc::now())
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn percent(fraction: f64) -> u32 {
    (fraction * 100.0).round().max(0.0) as u32
}
