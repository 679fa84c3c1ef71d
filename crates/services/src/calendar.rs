//! Calendar events and the month grid.
//!
//! Dates are bucketed by their UTC calendar day.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::Serialize;

use coach_core::model::{
    Assignment, CalendarEvent, EventKind, EventStatus, Goal, SessionLog, TodoItem,
};

use crate::error::ServiceError;

/// Number of cells in a month view: six weeks, Sunday first.
pub const GRID_DAYS: usize = 42;

/// Records the calendar derives its events from.
#[derive(Debug, Clone, Copy)]
pub struct CalendarSources<'a> {
    pub goal: &'a Goal,
    pub sessions: &'a [SessionLog],
    pub todos: &'a [TodoItem],
    pub assignments: &'a [Assignment],
    pub next_session: Option<DateTime<Utc>>,
}

fn assignment_status(assignment: &Assignment, now: DateTime<Utc>) -> EventStatus {
    if assignment.status.is_done() {
        EventStatus::Completed
    } else if assignment.is_overdue(now) {
        EventStatus::Overdue
    } else {
        EventStatus::Pending
    }
}

/// Flatten sessions, assignments, dated to-dos, dated milestones and the
/// goal deadline into calendar events.
#[must_use]
pub fn generate_events(sources: CalendarSources<'_>, now: DateTime<Utc>) -> Vec<CalendarEvent> {
    let mut events = Vec::new();

    for session in sources.sessions {
        events.push(CalendarEvent {
            id: format!("session-{}", session.id),
            title: "Coaching session".to_owned(),
            date: session.date,
            kind: EventKind::Session,
            description: Some(session.summary.clone()),
            status: Some(EventStatus::Completed),
        });
    }

    if let Some(next) = sources.next_session {
        events.push(CalendarEvent {
            id: "next-session".to_owned(),
            title: "Next session".to_owned(),
            date: next,
            kind: EventKind::Session,
            description: None,
            status: Some(EventStatus::Pending),
        });
    }

    for assignment in sources.assignments {
        events.push(CalendarEvent {
            id: format!("assignment-{}", assignment.id),
            title: assignment.title.clone(),
            date: assignment.due_date,
            kind: EventKind::Assignment,
            description: Some(assignment.description.clone()),
            status: Some(assignment_status(assignment, now)),
        });
    }

    for todo in sources.todos {
        let Some(due) = todo.due_date else { continue };
        events.push(CalendarEvent {
            id: format!("todo-{}", todo.id),
            title: todo.title.clone(),
            date: due,
            kind: EventKind::Todo,
            description: todo.description.clone(),
            status: Some(EventStatus::classify(todo.is_completed, due, now)),
        });
    }

    let goal = sources.goal;
    for milestone in goal.milestones() {
        let Some(target) = milestone.target_date() else {
            continue;
        };
        events.push(CalendarEvent {
            id: format!("milestone-{}", milestone.id()),
            title: milestone.title().to_owned(),
            date: target,
            kind: EventKind::Milestone,
            description: milestone.description().map(str::to_owned),
            status: Some(EventStatus::classify(milestone.is_completed(), target, now)),
        });
    }

    events.push(CalendarEvent {
        id: "main-goal".to_owned(),
        title: goal.title().to_owned(),
        date: goal.target_date(),
        kind: EventKind::Goal,
        description: Some(goal.description().to_owned()),
        status: Some(EventStatus::classify(
            goal.is_completed(),
            goal.target_date(),
            now,
        )),
    });

    events
}

/// The 42 days shown for `year`/`month`, starting on the Sunday on or
/// before the 1st.
///
/// # Errors
///
/// Returns `ServiceError::InvalidMonth` if the month does not exist.
pub fn month_grid(year: i32, month: u32) -> Result<Vec<NaiveDate>, ServiceError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(ServiceError::InvalidMonth { year, month })?;
    let back = u64::from(first.weekday().num_days_from_sunday());
    let start = first
        .checked_sub_days(Days::new(back))
        .ok_or(ServiceError::InvalidMonth { year, month })?;
    Ok(start.iter_days().take(GRID_DAYS).collect())
}

/// Events falling on `date`.
#[must_use]
pub fn events_on(events: &[CalendarEvent], date: NaiveDate) -> Vec<&CalendarEvent> {
    events
        .iter()
        .filter(|event| event.date.date_naive() == date)
        .collect()
}

fn in_month(date: DateTime<Utc>, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}

/// Per-month totals shown under the calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthCounts {
    pub sessions: usize,
    pub assignments: usize,
    pub milestones: usize,
    pub completed: usize,
}

impl MonthCounts {
    #[must_use]
    pub fn tally(events: &[CalendarEvent], year: i32, month: u32) -> Self {
        let mut counts = Self::default();
        for event in events.iter().filter(|e| in_month(e.date, year, month)) {
            match event.kind {
                EventKind::Session => counts.sessions += 1,
                EventKind::Assignment => counts.assignments += 1,
                EventKind::Milestone => counts.milestones += 1,
                EventKind::Goal | EventKind::Todo => {}
            }
            if event.status == Some(EventStatus::Completed) {
                counts.completed += 1;
            }
        }
        counts
    }
}

/// One cell of the month view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
    pub counts: MonthCounts,
}

impl CalendarMonth {
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidMonth` if the month does not exist.
    pub fn build(
        events: &[CalendarEvent],
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> Result<Self, ServiceError> {
        let days = month_grid(year, month)?
            .into_iter()
            .map(|date| CalendarDay {
                date,
                in_month: date.year() == year && date.month() == month,
                is_today: date == today,
                events: events_on(events, date).into_iter().cloned().collect(),
            })
            .collect();

        Ok(Self {
            year,
            month,
            days,
            counts: MonthCounts::tally(events, year, month),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Weekday};
    use coach_core::model::{
        AssignmentId, AssignmentKind, AssignmentStatus, GoalDraft, GoalId, MilestoneDraft,
        MilestoneId, SessionKind, SessionLogId, TodoDraft, TodoId,
    };
    use coach_core::time::fixed_now;

    fn goal() -> Goal {
        let now = fixed_now();
        GoalDraft::new("TOEIC 800", now - Duration::days(10), now + Duration::days(20))
            .with_milestones(vec![
                MilestoneDraft::new("Vocabulary")
                    .completed(now)
                    .with_target_date(now - Duration::days(2))
                    .validate(MilestoneId::new(1))
                    .unwrap(),
                MilestoneDraft::new("Listening")
                    .with_target_date(now - Duration::days(1))
                    .validate(MilestoneId::new(2))
                    .unwrap(),
                MilestoneDraft::new("Undated").validate(MilestoneId::new(3)).unwrap(),
            ])
            .validate(GoalId::new(1))
            .unwrap()
    }

    #[test]
    fn generates_events_with_statuses() {
        let now = fixed_now();
        let goal = goal();
        let sessions = vec![SessionLog::new(
            SessionLogId::new(1),
            now - Duration::days(3),
            60,
            SessionKind::Online,
            "Kickoff",
        )];
        let todos = vec![
            TodoDraft::new("Overdue")
                .with_due_date(now - Duration::hours(2))
                .validate(TodoId::new(1))
                .unwrap(),
            TodoDraft::new("No date").validate(TodoId::new(2)).unwrap(),
        ];
        let mut reviewed = Assignment::new(
            AssignmentId::new(1),
            "Essay",
            AssignmentKind::Practice,
            now - Duration::days(9),
            now - Duration::days(1),
        );
        reviewed.status = AssignmentStatus::Reviewed;
        let assignments = vec![reviewed];

        let events = generate_events(
            CalendarSources {
                goal: &goal,
                sessions: &sessions,
                todos: &todos,
                assignments: &assignments,
                next_session: Some(now + Duration::days(4)),
            },
            now,
        );

        let status = |id: &str| {
            events
                .iter()
                .find(|e| e.id == id)
                .and_then(|e| e.status)
                .unwrap()
        };
        assert_eq!(events.len(), 7);
        assert_eq!(status("session-1"), EventStatus::Completed);
        assert_eq!(status("next-session"), EventStatus::Pending);
        assert_eq!(status("assignment-1"), EventStatus::Completed);
        assert_eq!(status("todo-1"), EventStatus::Overdue);
        assert_eq!(status("milestone-1"), EventStatus::Completed);
        assert_eq!(status("milestone-2"), EventStatus::Overdue);
        assert_eq!(status("main-goal"), EventStatus::Pending);
    }

    #[test]
    fn past_due_assignments_are_overdue_only_while_pending() {
        let now = fixed_now();
        let past_due = |id: u64, status: AssignmentStatus| {
            let mut assignment = Assignment::new(
                AssignmentId::new(id),
                "Essay",
                AssignmentKind::Practice,
                now - Duration::days(9),
                now - Duration::days(1),
            );
            assignment.status = status;
            assignment
        };

        assert_eq!(
            assignment_status(&past_due(1, AssignmentStatus::Pending), now),
            EventStatus::Overdue
        );
        // handed in late: waiting on the coach, not on the student
        assert_eq!(
            assignment_status(&past_due(2, AssignmentStatus::Submitted), now),
            EventStatus::Pending
        );
        assert_eq!(
            assignment_status(&past_due(3, AssignmentStatus::Reviewed), now),
            EventStatus::Completed
        );
        assert_eq!(
            assignment_status(&past_due(4, AssignmentStatus::Completed), now),
            EventStatus::Completed
        );
    }

    #[test]
    fn grid_starts_on_sunday_and_spans_six_weeks() {
        // 2024-05-01 is a Wednesday
        let grid = month_grid(2024, 5).unwrap();
        assert_eq!(grid.len(), GRID_DAYS);
        assert_eq!(grid[0], NaiveDate::from_ymd_opt(2024, 4, 28).unwrap());
        assert_eq!(grid[0].weekday(), Weekday::Sun);
        assert_eq!(grid[41], NaiveDate::from_ymd_opt(2024, 6, 8).unwrap());
    }

    #[test]
    fn grid_for_month_starting_sunday_begins_on_the_first() {
        // 2024-09-01 is a Sunday
        let grid = month_grid(2024, 9).unwrap();
        assert_eq!(grid[0], NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(matches!(
            month_grid(2024, 13),
            Err(ServiceError::InvalidMonth { month: 13, .. })
        ));
    }

    #[test]
    fn month_view_buckets_events_by_day() {
        let now = fixed_now();
        let goal = goal();
        let events = generate_events(
            CalendarSources {
                goal: &goal,
                sessions: &[],
                todos: &[],
                assignments: &[],
                next_session: None,
            },
            now,
        );
        let today = now.date_naive();
        let month = CalendarMonth::build(&events, today.year(), today.month(), today).unwrap();
        let cell = month.days.iter().find(|d| d.is_today).unwrap();
        assert!(cell.in_month);

        let yesterday = today.pred_opt().unwrap();
        assert_eq!(events_on(&events, yesterday).len(), 1);
        assert_eq!(events_on(&events, yesterday)[0].id, "milestone-2");
    }

    #[test]
    fn counts_only_the_requested_month() {
        let now = fixed_now();
        let event = |kind, date, status| CalendarEvent {
            id: String::new(),
            title: String::new(),
            date,
            kind,
            description: None,
            status: Some(status),
        };
        let events = vec![
            event(EventKind::Session, now, EventStatus::Completed),
            event(EventKind::Assignment, now, EventStatus::Pending),
            event(EventKind::Milestone, now, EventStatus::Completed),
            event(EventKind::Session, now + Duration::days(400), EventStatus::Completed),
        ];
        let counts = MonthCounts::tally(&events, now.year(), now.month());
        assert_eq!(
            counts,
            MonthCounts {
                sessions: 1,
                assignments: 1,
                milestones: 1,
                completed: 2,
            }
        );
    }
}
