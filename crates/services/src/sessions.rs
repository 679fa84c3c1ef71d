use chrono::{DateTime, Utc};
use serde::Serialize;

use coach_core::metrics::{average_rating, days_between};
use coach_core::model::SessionLog;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub total: usize,
    pub average_rating: f64,
    pub total_duration_minutes: u32,
    pub with_reflection: usize,
}

impl SessionStats {
    #[must_use]
    pub fn compute(logs: &[SessionLog]) -> Self {
        Self {
            total: logs.len(),
            average_rating: average_rating(logs),
            total_duration_minutes: logs
                .iter()
                .fold(0_u32, |sum, log| sum.saturating_add(log.duration_minutes)),
            with_reflection: logs.iter().filter(|log| log.has_reflection()).count(),
        }
    }
}

/// Sessions sorted newest first.
#[must_use]
pub fn newest_first(logs: &[SessionLog]) -> Vec<&SessionLog> {
    let mut sorted: Vec<&SessionLog> = logs.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Days left until the next scheduled session, rounded up.
#[must_use]
pub fn days_until_next(next_session: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    days_between(next_session, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use coach_core::model::{Rating, SessionKind, SessionLogId};
    use coach_core::time::fixed_now;

    #[test]
    fn stats_and_ordering() {
        let now = fixed_now();
        let mut older = SessionLog::new(
            SessionLogId::new(1),
            now - Duration::days(14),
            60,
            SessionKind::FaceToFace,
            "Goal setting",
        )
        .with_rating(Rating::new(5).unwrap());
        older.set_reflection("Clear plan now");
        let newer = SessionLog::new(
            SessionLogId::new(2),
            now - Duration::days(7),
            45,
            SessionKind::Online,
            "Progress review",
        )
        .with_rating(Rating::new(4).unwrap());
        let logs = vec![older, newer];

        let stats = SessionStats::compute(&logs);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.average_rating, 4.5);
        assert_eq!(stats.total_duration_minutes, 105);
        assert_eq!(stats.with_reflection, 1);

        let order: Vec<u64> = newest_first(&logs).iter().map(|l| l.id.value()).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn next_session_countdown_rounds_up() {
        let now = fixed_now();
        assert_eq!(days_until_next(now + Duration::hours(30), now), 2);
    }
}
