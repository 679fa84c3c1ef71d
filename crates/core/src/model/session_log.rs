use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::Rated;
use crate::model::ids::SessionLogId;
use crate::model::rating::Rating;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionKind {
    FaceToFace,
    Online,
    Phone,
}

/// Record of one coaching session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLog {
    pub id: SessionLogId,
    pub date: DateTime<Utc>,
    pub duration_minutes: u32,
    pub kind: SessionKind,
    pub summary: String,
    pub coach_comments: String,
    pub student_reflection: Option<String>,
    pub next_steps: Vec<String>,
    pub rating: Option<Rating>,
}

impl SessionLog {
    #[must_use]
    pub fn new(
        id: SessionLogId,
        date: DateTime<Utc>,
        duration_minutes: u32,
        kind: SessionKind,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            id,
            date,
            duration_minutes,
            kind,
            summary: summary.into(),
            coach_comments: String::new(),
            student_reflection: None,
            next_steps: Vec::new(),
            rating: None,
        }
    }

    #[must_use]
    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Replace the student's reflection; blank text clears it.
    pub fn set_reflection(&mut self, text: &str) {
        let text = text.trim();
        self.student_reflection = (!text.is_empty()).then(|| text.to_owned());
    }

    #[must_use]
    pub fn has_reflection(&self) -> bool {
        self.student_reflection.is_some()
    }
}

impl Rated for SessionLog {
    fn rating(&self) -> Option<u8> {
        self.rating.map(Rating::value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn blank_reflection_clears() {
        let mut log = SessionLog::new(
            SessionLogId::new(1),
            fixed_now(),
            60,
            SessionKind::Online,
            "Pronunciation drills",
        );
        log.set_reflection("  Felt more confident  ");
        assert_eq!(log.student_reflection.as_deref(), Some("Felt more confident"));
        log.set_reflection("   ");
        assert!(!log.has_reflection());
    }
}
