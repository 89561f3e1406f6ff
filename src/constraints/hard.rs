//! Hard constraint checks.

use chrono::Duration;
use std::collections::HashMap;

use super::CheckOutcome;
use crate::models::{PostHistory, ReplyTarget, ScheduledThread, ThreadPlan, TimeSlot};

/// Minimum spacing between two posts in the same subreddit.
pub const SUBREDDIT_COOLDOWN_HOURS: i64 = 48;

/// Rejects a placement that lands within 48 hours of another post in the
/// same subreddit.
///
/// Scheduled entries are compared in both directions (`|Δ| < 48h`). History
/// is only filtered to `posted_at >= slot - 48h`, so any history entry after
/// that bound also blocks, however far in the future it lies.
pub fn check_subreddit_frequency(
    thread: &ThreadPlan,
    slot: &TimeSlot,
    schedule: &[ScheduledThread],
    history: &[PostHistory],
) -> CheckOutcome {
    let subreddit = thread.subreddit();
    let window = Duration::hours(SUBREDDIT_COOLDOWN_HOURS);

    if let Some(clash) = schedule
        .iter()
        .find(|e| e.subreddit() == subreddit && slot.is_within(e.slot.date, window))
    {
        return CheckOutcome::fail(format!(
            "Subreddit {subreddit} already has a post scheduled within {SUBREDDIT_COOLDOWN_HOURS} hours ({})",
            clash.slot.date.format("%Y-%m-%d %H:%M")
        ));
    }

    let cutoff = slot.date - window;
    if let Some(recent) = history
        .iter()
        .find(|h| h.subreddit == subreddit && h.posted_at >= cutoff)
    {
        return CheckOutcome::fail(format!(
            "Subreddit {subreddit} was posted to within {SUBREDDIT_COOLDOWN_HOURS} hours ({})",
            recent.posted_at.format("%Y-%m-%d %H:%M")
        ));
    }

    CheckOutcome::pass()
}

/// Rejects comment plans where a persona ends up talking to itself.
///
/// Rules, checked in order:
/// 1. No two adjacent comments by the same persona.
/// 2. No comment replying to a comment by the same persona.
/// 3. The first comment is not by the OP.
pub fn check_persona_self_reply(thread: &ThreadPlan) -> CheckOutcome {
    let comments = &thread.comments;

    for pair in comments.windows(2) {
        if pair[0].persona_id == pair[1].persona_id {
            return CheckOutcome::fail(format!(
                "Persona {} has consecutive comments ({} then {})",
                pair[1].persona_id, pair[0].id, pair[1].id
            ));
        }
    }

    let authors: HashMap<&str, &str> = comments
        .iter()
        .map(|c| (c.id.as_str(), c.persona_id.as_str()))
        .collect();

    for comment in comments {
        match &comment.reply_to {
            ReplyTarget::Root => {}
            ReplyTarget::Comment(target) => {
                if authors.get(target.as_str()) == Some(&comment.persona_id.as_str()) {
                    return CheckOutcome::fail(format!(
                        "Persona {} replies to their own comment {}",
                        comment.persona_id, target
                    ));
                }
            }
        }
    }

    if let Some(first) = comments.first() {
        if first.persona_id == thread.post.op_persona_id {
            return CheckOutcome::fail(format!(
                "OP persona {} cannot be the first commenter on their own post",
                first.persona_id
            ));
        }
    }

    CheckOutcome::pass()
}

/// Rejects once the schedule already holds `weekly_limit` entries.
pub fn check_weekly_limit(schedule: &[ScheduledThread], weekly_limit: usize) -> CheckOutcome {
    if schedule.len() >= weekly_limit {
        CheckOutcome::fail(format!(
            "Weekly limit reached ({}/{} posts)",
            schedule.len(),
            weekly_limit
        ))
    } else {
        CheckOutcome::pass()
    }
}
