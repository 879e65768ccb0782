//! Error types for task scheduling.

use thiserror::Error;

/// Failures raised synchronously out of `Task::advance` / `TaskList::advance`.
///
/// None of these are retried: they describe bugs in the driving script.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TaskError {
    /// A step-sequence yielded a value outside the accepted vocabulary.
    #[error("Invalid value yielded by {sequence}: {reason}")]
    InvalidYield { sequence: String, reason: String },
}

pub type TaskResult<T> = Result<T, TaskError>;
