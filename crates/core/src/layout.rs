//! Placement of milestones on the "road to the goal" graph.
//!
//! Milestones are laid out on a normalized 100×100 canvas (y grows
//! downwards, like SVG): the first sits bottom-left at `(10, 100)`, the last
//! top-right at `(90, 20)`. Vertical placement follows `sqrt(t)`, so the
//! curve climbs steeply and then flattens out.
//!
//! Consecutive points are joined by one cubic Bezier [`Segment`] each. Both
//! control points share the horizontal midpoint; the first keeps the start
//! height and the second the end height, giving each segment its own S-bend.

use std::fmt::{self, Write as _};

use crate::model::Milestone;

const MARGIN_X: f64 = 10.0;
const SPAN_X: f64 = 80.0;
const BASELINE_Y: f64 = 100.0;
const SPAN_Y: f64 = 80.0;

/// A position on the normalized canvas, both axes in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

/// Position of milestone `index` out of `count`.
///
/// A single milestone (or any `count <= 1`) sits at the `t = 0` anchor.
#[must_use]
pub fn position(index: usize, count: usize) -> Point {
    let t = if count <= 1 {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let t = index as f64 / (count - 1) as f64;
        t
    };
    Point {
        x: t * SPAN_X + MARGIN_X,
        y: BASELINE_Y - t.sqrt() * SPAN_Y,
    }
}

/// One cubic Bezier piece ending at `end`; its start is the previous end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl Segment {
    /// Curve from `from` to `to` with both control points on the horizontal midpoint.
    #[must_use]
    pub fn between(from: Point, to: Point) -> Self {
        let mid_x = from.x + (to.x - from.x) * 0.5;
        Self {
            control1: Point::new(mid_x, from.y),
            control2: Point::new(mid_x, to.y),
            end: to,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C {}, {}, {}", self.control1, self.control2, self.end)
    }
}

/// A connected run of segments starting at `start`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MilestonePath {
    start: Option<Point>,
    segments: Vec<Segment>,
}

impl MilestonePath {
    /// Join `points` in order.
    #[must_use]
    pub fn through(points: &[Point]) -> Self {
        let segments = points
            .windows(2)
            .map(|pair| Segment::between(pair[0], pair[1]))
            .collect();
        Self {
            start: points.first().copied(),
            segments,
        }
    }

    #[must_use]
    pub fn start(&self) -> Option<Point> {
        self.start
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The same path cut after its first `n` segments.
    #[must_use]
    pub fn take(&self, n: usize) -> Self {
        Self {
            start: self.start,
            segments: self.segments.iter().take(n).copied().collect(),
        }
    }

    /// SVG path data, e.g. `M 10 100 C 50 100, 50 20, 90 20`.
    ///
    /// A path without segments renders as the empty string; there is nothing
    /// to draw.
    #[must_use]
    pub fn render(&self) -> String {
        let Some(start) = self.start else {
            return String::new();
        };
        if self.segments.is_empty() {
            return String::new();
        }
        let mut out = format!("M {start}");
        for segment in &self.segments {
            // writing into a String cannot fail
            let _ = write!(out, " {segment}");
        }
        out
    }
}

/// Where each milestone sits and the curves that connect them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MilestoneLayout {
    pub points: Vec<Point>,
    pub full_path: MilestonePath,
    /// Prefix of `full_path` covering the completed milestones.
    pub completed_path: MilestonePath,
    pub completed_count: usize,
}

impl MilestoneLayout {
    /// Index of the milestone the student is working on, if any remain.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        (self.completed_count < self.points.len()).then_some(self.completed_count)
    }
}

/// Lay out `milestones` in their stored order.
#[must_use]
pub fn compute_layout(milestones: &[Milestone]) -> MilestoneLayout {
    let count = milestones.len();
    let points: Vec<Point> = (0..count).map(|i| position(i, count)).collect();
    let full_path = MilestonePath::through(&points);
    let completed_count = milestones.iter().filter(|m| m.is_completed()).count();
    let completed_path = full_path.take(completed_count);

    MilestoneLayout {
        points,
        full_path,
        completed_path,
        completed_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MilestoneDraft, MilestoneId};
    use crate::time::fixed_now;

    fn milestones(flags: &[bool]) -> Vec<Milestone> {
        flags
            .iter()
            .enumerate()
            .map(|(i, done)| {
                let draft = MilestoneDraft::new(format!("M{i}"));
                let draft = if *done {
                    draft.completed(fixed_now()).with_progress(100.0)
                } else {
                    draft
                };
                draft.validate(MilestoneId::new(i as u64 + 1)).unwrap()
            })
            .collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn endpoints_are_pinned_for_any_count() {
        for n in 2..12 {
            let first = position(0, n);
            let last = position(n - 1, n);
            assert!(close(first.x, 10.0) && close(first.y, 100.0));
            assert!(close(last.x, 90.0) && close(last.y, 20.0));
        }
    }

    #[test]
    fn x_is_monotonic() {
        let n = 7;
        let xs: Vec<f64> = (0..n).map(|i| position(i, n).x).collect();
        assert!(xs.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn empty_layout_has_nothing() {
        let layout = compute_layout(&[]);
        assert!(layout.points.is_empty());
        assert!(layout.full_path.is_empty());
        assert!(layout.completed_path.is_empty());
        assert_eq!(layout.full_path.render(), "");
        assert_eq!(layout.current_index(), None);
    }

    #[test]
    fn single_milestone_sits_at_anchor() {
        let layout = compute_layout(&milestones(&[false]));
        assert_eq!(layout.points, vec![Point::new(10.0, 100.0)]);
        assert_eq!(layout.full_path.len(), 0);
        assert_eq!(layout.full_path.render(), "");
        assert_eq!(layout.current_index(), Some(0));
    }

    #[test]
    fn three_milestone_scenario() {
        let layout = compute_layout(&milestones(&[true, false, false]));
        let ys: Vec<f64> = layout.points.iter().map(|p| p.y).collect();
        assert!(close(ys[0], 100.0));
        assert!((ys[1] - 43.431_457_5).abs() < 1e-6);
        assert!(close(ys[2], 20.0));
        assert_eq!(layout.full_path.len(), 2);
        assert_eq!(layout.completed_path.len(), 1);
        assert_eq!(layout.current_index(), Some(1));
    }

    #[test]
    fn segment_controls_share_midpoint() {
        let seg = Segment::between(Point::new(10.0, 100.0), Point::new(50.0, 40.0));
        assert_eq!(seg.control1, Point::new(30.0, 100.0));
        assert_eq!(seg.control2, Point::new(30.0, 40.0));
        assert_eq!(seg.end, Point::new(50.0, 40.0));
    }

    #[test]
    fn renders_svg_path_syntax() {
        let path = MilestonePath::through(&[position(0, 2), position(1, 2)]);
        assert_eq!(path.render(), "M 10 100 C 50 100, 50 20, 90 20");
    }

    #[test]
    fn completed_path_is_prefix_of_full_path() {
        let layout = compute_layout(&milestones(&[true, true, false, false]));
        let full = layout.full_path.render();
        let done = layout.completed_path.render();
        assert_eq!(layout.completed_path.len(), 2);
        assert!(full.starts_with(&done));
        assert_eq!(done.matches(" C ").count(), 2);
    }

    #[test]
    fn completed_segments_are_capped() {
        for (flags, expected) in [
            (vec![false, false, false], 0),
            (vec![true, false, false], 1),
            (vec![true, true, true], 2),
        ] {
            let layout = compute_layout(&milestones(&flags));
            let n = flags.len();
            assert_eq!(layout.completed_path.len(), expected);
            assert_eq!(
                layout.completed_path.len(),
                layout.completed_count.min(n - 1)
            );
        }
        let none = compute_layout(&milestones(&[false, false]));
        assert_eq!(none.completed_path.render(), "");
    }
}
