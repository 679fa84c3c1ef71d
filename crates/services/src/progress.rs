use chrono::{DateTime, Utc};
use serde::Serialize;

use coach_core::layout::{MilestoneLayout, Point, compute_layout};
use coach_core::metrics;
use coach_core::model::{Goal, MilestoneId};

/// Numbers behind the goal header, progress bars and countdown.
///
/// Raw values only; rounding, percent signs and date wording are left to
/// the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub percent_complete: f64,
    pub remaining_percent: f64,
    pub days_remaining: i64,
    pub days_elapsed: i64,
    pub total_days: i64,
    pub time_elapsed_percent: f64,
    pub milestone_ratio: f64,
    pub completed_milestones: usize,
    pub total_milestones: usize,
}

impl ProgressSummary {
    #[must_use]
    pub fn is_overdue(&self) -> bool {
        self.days_remaining < 0
    }
}

#[must_use]
pub fn compute_progress_summary(goal: &Goal, now: DateTime<Utc>) -> ProgressSummary {
    let milestones = goal.milestones();
    ProgressSummary {
        percent_complete: goal.progress(),
        remaining_percent: metrics::remaining_percent(goal.progress()),
        days_remaining: metrics::days_between(goal.target_date(), now),
        days_elapsed: metrics::days_elapsed(goal.start_date(), now),
        total_days: metrics::total_days(goal.start_date(), goal.target_date()),
        time_elapsed_percent: metrics::time_elapsed_percent(
            goal.start_date(),
            goal.target_date(),
            now,
        ),
        milestone_ratio: metrics::milestone_completion_ratio(milestones),
        completed_milestones: goal.completed_milestones(),
        total_milestones: milestones.len(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    Completed,
    /// The first not-yet-reached position on the path.
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneMarker {
    pub id: MilestoneId,
    pub title: String,
    pub target_date: Option<DateTime<Utc>>,
    pub point: Point,
    pub state: MarkerState,
}

/// Everything needed to draw the milestone graph for one goal.
#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneGraphView {
    pub layout: MilestoneLayout,
    pub markers: Vec<MilestoneMarker>,
    pub completed: usize,
    pub remaining: usize,
    pub goal_progress: f64,
}

impl MilestoneGraphView {
    #[must_use]
    pub fn build(goal: &Goal) -> Self {
        let milestones = goal.milestones();
        let layout = compute_layout(milestones);
        let current = layout.current_index();

        let markers = milestones
            .iter()
            .zip(layout.points.iter())
            .enumerate()
            .map(|(index, (milestone, point))| {
                let state = if milestone.is_completed() {
                    MarkerState::Completed
                } else if current == Some(index) {
                    MarkerState::Current
                } else {
                    MarkerState::Upcoming
                };
                MilestoneMarker {
                    id: milestone.id(),
                    title: milestone.title().to_owned(),
                    target_date: milestone.target_date(),
                    point: *point,
                    state,
                }
            })
            .collect();

        let completed = layout.completed_count;
        Self {
            remaining: milestones.len() - completed,
            completed,
            markers,
            layout,
            goal_progress: goal.progress(),
        }
    }

    /// Position of the "you are here" badge.
    #[must_use]
    pub fn current_position(&self) -> Option<Point> {
        self.layout
            .current_index()
            .and_then(|i| self.layout.points.get(i).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use coach_core::model::{GoalDraft, GoalId, MilestoneDraft};
    use coach_core::time::fixed_now;

    fn goal(flags: &[bool]) -> Goal {
        let now = fixed_now();
        let milestones = flags
            .iter()
            .enumerate()
            .map(|(i, done)| {
                let draft = MilestoneDraft::new(format!("Step {i}"));
                let draft = if *done { draft.completed(now) } else { draft };
                draft.validate(MilestoneId::new(i as u64 + 1)).unwrap()
            })
            .collect();
        GoalDraft::new("TOEIC 800", now - Duration::days(30), now + Duration::days(90))
            .with_progress(64.6)
            .with_milestones(milestones)
            .validate(GoalId::new(1))
            .unwrap()
    }

    #[test]
    fn summary_counts_days_and_milestones() {
        let summary = compute_progress_summary(&goal(&[true, false, false]), fixed_now());
        assert_eq!(summary.days_remaining, 90);
        assert_eq!(summary.days_elapsed, 30);
        assert_eq!(summary.total_days, 120);
        assert!((summary.time_elapsed_percent - 25.0).abs() < 1e-9);
        assert!((summary.milestone_ratio - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.remaining_percent, 35.0);
        assert_eq!(summary.completed_milestones, 1);
        assert_eq!(summary.total_milestones, 3);
        assert!(!summary.is_overdue());
    }

    #[test]
    fn summary_without_milestones_is_defined() {
        let summary = compute_progress_summary(&goal(&[]), fixed_now() + Duration::days(100));
        assert_eq!(summary.milestone_ratio, 0.0);
        assert_eq!(summary.days_remaining, -10);
        assert!(summary.is_overdue());
    }

    #[test]
    fn graph_marks_first_open_milestone_current() {
        let view = MilestoneGraphView::build(&goal(&[true, false, false]));
        let states: Vec<MarkerState> = view.markers.iter().map(|m| m.state).collect();
        assert_eq!(
            states,
            vec![MarkerState::Completed, MarkerState::Current, MarkerState::Upcoming]
        );
        assert_eq!(view.completed, 1);
        assert_eq!(view.remaining, 2);
        assert_eq!(view.current_position(), Some(view.layout.points[1]));
    }

    #[test]
    fn out_of_order_completion_has_no_current_marker_on_done_step() {
        // completed count is 1, but index 1 is the completed one
        let view = MilestoneGraphView::build(&goal(&[false, true, false]));
        let states: Vec<MarkerState> = view.markers.iter().map(|m| m.state).collect();
        assert_eq!(
            states,
            vec![MarkerState::Upcoming, MarkerState::Completed, MarkerState::Upcoming]
        );
    }

    #[test]
    fn all_done_has_no_current_position() {
        let view = MilestoneGraphView::build(&goal(&[true, true]));
        assert_eq!(view.current_position(), None);
        assert_eq!(view.layout.completed_path.len(), 1);
    }
}
