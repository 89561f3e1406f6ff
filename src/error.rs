//! Planner error type.
//!
//! Only the orchestration layer and collaborator contracts return errors.
//! Constraint checks, scoring and calendar aggregation are total functions.

use thiserror::Error;

use crate::validation::ValidationError;

/// Crate result alias.
pub type Result<T> = std::result::Result<T, PlannerError>;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Invalid campaign configuration: {}", join_messages(.errors))]
    InvalidConfig { errors: Vec<ValidationError> },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("No eligible threads: {generated} generated, {rejected} rejected by review")]
    NoEligibleThreads { generated: usize, rejected: usize },

    #[error("Content generation failed: {message}")]
    Generation { message: String },

    #[error("History store error: {message}")]
    Store { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PlannerError {
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
