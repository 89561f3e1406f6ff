//! Shared test builders.

use chrono::{DateTime, TimeZone, Utc};

use crate::constraints::{check_all, ConstraintContext};
use crate::models::{
    CampaignConfig, CommentPlan, Keyword, Persona, PostCandidate, ScheduledThread, Subreddit,
    ThreadPlan, TimeSlot,
};

/// 2025-01-06, a Monday.
pub fn monday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap()
}

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, day, hour, 0, 0).unwrap()
}

pub fn slot(day: u32, hour: u32) -> TimeSlot {
    TimeSlot::at(at(day, hour))
}

/// Thread with OP `op` and one top-level comment from `commenter`.
pub fn thread(id: &str, subreddit: &str, op: &str, commenter: &str) -> ThreadPlan {
    ThreadPlan::new(
        id,
        PostCandidate::new(format!("{id}-post"), subreddit, op)
            .with_title(format!("Thread {id} about slides")),
    )
    .with_comment(CommentPlan::new(format!("{id}-c1"), commenter))
    .with_engagement(50.0)
}

/// Places `thread` in `slot` with a passing, neutral check result.
pub fn placed(thread: ThreadPlan, slot: TimeSlot) -> ScheduledThread {
    let ctx = ConstraintContext::new(usize::MAX);
    let check = check_all(&thread, &slot, &ctx);
    ScheduledThread::new(thread, slot, check)
}

pub fn campaign(posts_per_week: usize) -> CampaignConfig {
    CampaignConfig::new("camp-1", monday(), posts_per_week)
        .with_product_name("SlideForge")
        .with_persona(Persona::new("alice", "alice_designs"))
        .with_persona(Persona::new("bob", "bob_presents"))
        .with_persona(Persona::new("carol", "carol_consults"))
        .with_persona(Persona::new("dave", "dave_decks"))
        .with_subreddit(Subreddit::new("r/PowerPoint"))
        .with_subreddit(Subreddit::new("r/consulting"))
        .with_subreddit(Subreddit::new("r/startups"))
        .with_subreddit(Subreddit::new("r/productivity"))
        .with_keyword(Keyword::new("K1", "ai presentation maker"))
        .with_keyword(Keyword::new("K2", "slide templates"))
        .with_keyword(Keyword::new("K3", "pitch deck"))
        .with_keyword(Keyword::new("K4", "powerpoint alternative"))
}
