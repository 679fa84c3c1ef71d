use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metrics::Rated;
use crate::model::ids::JournalEntryId;
use crate::model::rating::Rating;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum JournalError {
    #[error("journal title cannot be empty")]
    EmptyTitle,
    #[error("journal content cannot be empty")]
    EmptyContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mood {
    Excellent,
    Good,
    Neutral,
    Challenging,
    Difficult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalDraft {
    pub title: String,
    pub content: String,
    pub mood: Mood,
    pub achievements: Vec<String>,
    pub challenges: Vec<String>,
    pub rating: Option<Rating>,
}

impl JournalDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            mood: Mood::Good,
            achievements: Vec::new(),
            challenges: Vec::new(),
            rating: None,
        }
    }

    /// Validate and date the entry. Blank achievement/challenge lines are dropped.
    ///
    /// # Errors
    ///
    /// Returns `JournalError` if the title or content is blank.
    pub fn validate(
        self,
        id: JournalEntryId,
        date: DateTime<Utc>,
    ) -> Result<JournalEntry, JournalError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(JournalError::EmptyTitle);
        }
        if self.content.trim().is_empty() {
            return Err(JournalError::EmptyContent);
        }

        Ok(JournalEntry {
            id,
            date,
            title: title.to_owned(),
            content: self.content,
            mood: self.mood,
            achievements: non_blank(self.achievements),
            challenges: non_blank(self.challenges),
            coach_comment: None,
            rating: self.rating,
        })
    }
}

fn non_blank(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: JournalEntryId,
    pub date: DateTime<Utc>,
    pub title: String,
    pub content: String,
    pub mood: Mood,
    pub achievements: Vec<String>,
    pub challenges: Vec<String>,
    pub coach_comment: Option<String>,
    pub rating: Option<Rating>,
}

impl Rated for JournalEntry {
    fn rating(&self) -> Option<u8> {
        self.rating.map(Rating::value)
    }
}
