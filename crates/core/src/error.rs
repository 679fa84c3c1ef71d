use thiserror::Error;

use crate::model::{
    AssignmentError, GoalError, JournalError, RatingError, SettingsError, TodoError,
};

/// Any validation failure raised by the domain model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Goal(#[from] GoalError),
    #[error(transparent)]
    Todo(#[from] TodoError),
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
    #[error(transparent)]
    Journal(#[from] JournalError),
    #[error(transparent)]
    Rating(#[from] RatingError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
