//! Weekly content calendar planning.
//!
//! Takes candidate discussion threads (already generated and reviewed),
//! assigns them to the week's time slots under hard and soft constraints,
//! and folds the result into a reportable calendar.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `ThreadPlan`, `PostCandidate`, `CommentPlan`,
//!   `TimeSlot`, `ScheduledThread`, `ContentCalendar`, `CampaignConfig`
//! - **`constraints`**: Hard pass/fail checks and soft 0–1 scores for one
//!   (thread, slot) placement
//! - **`scoring`**: Candidate ranking and weighted thread scoring rules
//! - **`scheduler`**: Slot generation, greedy assignment with fallback,
//!   calendar aggregation
//! - **`history`**: Persistence contract and the per-run read snapshot
//! - **`pipeline`**: Generation/review contracts and the weekly planner
//! - **`validation`**: Boundary checks on configuration and thread input
//!
//! # Algorithm
//!
//! The scheduler is a deliberately greedy heuristic: one pass per slot,
//! no backtracking. Slots no thread can legally fill are handed to a
//! fallback pass that places the best remaining thread regardless of hard
//! constraints and records the failed check for audit. Infeasibility is
//! reported as data (unfilled slots, `passed == false` entries), never as
//! an error.

pub mod constraints;
pub mod error;
pub mod history;
pub mod models;
pub mod pipeline;
pub mod scheduler;
pub mod scoring;
pub mod validation;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{PlannerError, Result};
