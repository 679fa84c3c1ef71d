use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use coach_core::metrics::average_rating;
use coach_core::model::JournalEntry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct JournalStats {
    pub total: usize,
    pub this_month: usize,
    pub average_rating: f64,
    pub with_coach_comment: usize,
}

impl JournalStats {
    #[must_use]
    pub fn compute(entries: &[JournalEntry], now: DateTime<Utc>) -> Self {
        Self {
            total: entries.len(),
            this_month: entries
                .iter()
                .filter(|e| e.date.year() == now.year() && e.date.month() == now.month())
                .count(),
            average_rating: average_rating(entries),
            with_coach_comment: entries.iter().filter(|e| e.coach_comment.is_some()).count(),
        }
    }
}

/// Entries sorted newest first.
#[must_use]
pub fn newest_first(entries: &[JournalEntry]) -> Vec<&JournalEntry> {
    let mut sorted: Vec<&JournalEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use coach_core::model::{JournalDraft, JournalEntryId, Rating};
    use coach_core::time::fixed_now;

    #[test]
    fn stats_cover_month_rating_and_comments() {
        let now = fixed_now();
        let entry = |id: u64, date, rating: Option<u8>| {
            let mut draft = JournalDraft::new(format!("Day {id}"), "notes");
            draft.rating = rating.map(|r| Rating::new(r).unwrap());
            draft.validate(JournalEntryId::new(id), date).unwrap()
        };
        let mut entries = vec![
            entry(1, now, Some(5)),
            entry(2, now - Duration::days(60), Some(3)),
            entry(3, now - Duration::hours(1), None),
        ];
        entries[1].coach_comment = Some("Great consistency".into());

        let stats = JournalStats::compute(&entries, now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.this_month, 2);
        assert!((stats.average_rating - 8.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.with_coach_comment, 1);

        let order: Vec<u64> = newest_first(&entries).iter().map(|e| e.id.value()).collect();
        assert_eq!(order, vec![1, 3, 2]);
    }

    #[test]
    fn empty_journal_has_zero_average() {
        let stats = JournalStats::compute(&[], fixed_now());
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.total, 0);
    }
}
