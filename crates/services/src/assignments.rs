use chrono::{DateTime, Utc};
use serde::Serialize;

use coach_core::model::{Assignment, AssignmentStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AssignmentFilter {
    #[default]
    All,
    Pending,
    Submitted,
    /// Reviewed or completed.
    Completed,
}

impl AssignmentFilter {
    #[must_use]
    pub fn matches(self, assignment: &Assignment) -> bool {
        match self {
            AssignmentFilter::All => true,
            AssignmentFilter::Pending => assignment.status == AssignmentStatus::Pending,
            AssignmentFilter::Submitted => assignment.status == AssignmentStatus::Submitted,
            AssignmentFilter::Completed => assignment.status.is_done(),
        }
    }

    #[must_use]
    pub fn apply(self, assignments: &[Assignment]) -> Vec<&Assignment> {
        assignments.iter().filter(|a| self.matches(a)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssignmentCounts {
    pub pending: usize,
    pub submitted: usize,
    pub completed: usize,
    pub overdue: usize,
}

impl AssignmentCounts {
    #[must_use]
    pub fn tally(assignments: &[Assignment], now: DateTime<Utc>) -> Self {
        let mut counts = Self::default();
        for assignment in assignments {
            match assignment.status {
                AssignmentStatus::Pending => counts.pending += 1,
                AssignmentStatus::Submitted => counts.submitted += 1,
                AssignmentStatus::Reviewed | AssignmentStatus::Completed => counts.completed += 1,
            }
            if assignment.is_overdue(now) {
                counts.overdue += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use coach_core::model::{AssignmentId, AssignmentKind};
    use coach_core::time::fixed_now;

    fn assignment(id: u64, status: AssignmentStatus, due_in_days: i64) -> Assignment {
        let now = fixed_now();
        let mut a = Assignment::new(
            AssignmentId::new(id),
            format!("Assignment {id}"),
            AssignmentKind::Action,
            now - Duration::days(7),
            now + Duration::days(due_in_days),
        );
        a.status = status;
        a
    }

    #[test]
    fn tallies_statuses_and_overdue() {
        let list = vec![
            assignment(1, AssignmentStatus::Pending, -1),
            assignment(2, AssignmentStatus::Pending, 3),
            assignment(3, AssignmentStatus::Submitted, -1),
            assignment(4, AssignmentStatus::Reviewed, -5),
            assignment(5, AssignmentStatus::Completed, 1),
        ];
        let counts = AssignmentCounts::tally(&list, fixed_now());
        assert_eq!(
            counts,
            AssignmentCounts {
                pending: 2,
                submitted: 1,
                completed: 2,
                overdue: 1,
            }
        );
        assert_eq!(AssignmentFilter::Completed.apply(&list).len(), 2);
        assert_eq!(AssignmentFilter::Submitted.apply(&list).len(), 1);
        assert_eq!(AssignmentFilter::All.apply(&list).len(), 5);
    }
}
