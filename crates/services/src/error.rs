//! Shared error types for the services crate.

use thiserror::Error;

use coach_core::model::{AssignmentError, GoalError, JournalError, SettingsError, TodoError};
use storage::StorageError;

/// Errors emitted by `DashboardService` and the calendar helpers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error("invalid calendar month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
    #[error(transparent)]
    Goal(#[from] GoalError),
    #[error(transparent)]
    Todo(#[from] TodoError),
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
    #[error(transparent)]
    Journal(#[from] JournalError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the coach chat.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("reply provider has no replies configured")]
    NoReplies,
    #[error("no async runtime available to schedule the reply")]
    NoRuntime,
    #[error("chat state is unavailable: {0}")]
    State(String),
    #[error("reply provider failed: {0}")]
    Provider(String),
}

/// Errors emitted while loading dashboard settings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsLoadError {
    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidVar { name: String, value: String },
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
