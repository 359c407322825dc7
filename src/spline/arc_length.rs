//! Fixed-distance walking along a sampled spline.
//!
//! Distances are measured along the polyline through the curve samples, not
//! along the true curve.

use bevy::prelude::*;

/// One sample on the walked curve, tagged with the control point segment it
/// originated from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplinePoint {
    pub position: Vec3,
    /// Index of the control point that starts the segment of this sample.
    pub control_point_index: usize,
}

/// A placement position produced by [`ArcLengthWalker`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementStep {
    pub position: Vec3,
    /// Direction of travel, normalized (zero on degenerate segments).
    pub direction: Vec3,
    /// Control point segment the step lies on.
    pub control_point_index: usize,
}

/// Collect curve samples into [`SplinePoint`]s.
///
/// Every `resolution + 1` consecutive samples belong to one control point. At
/// most `(resolution + 1) * control_point_count + 1` samples are taken, which
/// is exactly one lap of a looped curve.
pub fn spline_points(
    samples: impl IntoIterator<Item = Vec3>,
    resolution: usize,
    control_point_count: usize,
) -> Vec<SplinePoint> {
    let per_segment = resolution + 1;
    let cap = per_segment * control_point_count + 1;

    samples
        .into_iter()
        .take(cap)
        .enumerate()
        .map(|(i, position)| SplinePoint {
            position,
            control_point_index: i / per_segment,
        })
        .collect()
}

/// Total polyline length through the points.
pub fn polyline_length(points: &[SplinePoint]) -> f32 {
    points
        .windows(2)
        .map(|pair| pair[0].position.distance(pair[1].position))
        .sum()
}

/// Walks a polyline and yields a [`PlacementStep`] every `distance` units.
///
/// The first step is always at the first point, facing the second one.
/// Positions are measured from the start of the current polyline segment, so
/// the walk keeps advancing far from the origin where the spacing is close to
/// the float precision of the coordinates.
#[derive(Debug, Clone)]
pub struct ArcLengthWalker<'a> {
    points: &'a [SplinePoint],
    distance: f32,
    /// Distance still to travel before the next placement.
    distance_to_move: f32,
    /// Distance travelled along the current segment.
    travelled: f32,
    /// Current position on the polyline.
    cursor: Vec3,
    /// Index of the sample the cursor is heading to.
    next_index: usize,
    started: bool,
}

impl<'a> ArcLengthWalker<'a> {
    /// Create a walker. `distance` must be positive; callers clamp it through
    /// [`SplineSettings::normalize`](super::SplineSettings::normalize).
    pub fn new(points: &'a [SplinePoint], distance: f32) -> Self {
        Self {
            points,
            distance,
            distance_to_move: distance,
            travelled: 0.0,
            cursor: points.first().map(|p| p.position).unwrap_or(Vec3::ZERO),
            next_index: 1,
            started: false,
        }
    }

    fn step(&self, direction: Vec3) -> PlacementStep {
        PlacementStep {
            position: self.cursor,
            direction,
            control_point_index: self.points[self.next_index - 1].control_point_index,
        }
    }

    fn advance_segment(&mut self) {
        self.cursor = self.points[self.next_index].position;
        self.travelled = 0.0;
        self.next_index += 1;
    }
}

impl Iterator for ArcLengthWalker<'_> {
    type Item = PlacementStep;

    fn next(&mut self) -> Option<PlacementStep> {
        if self.points.len() < 2 || !(self.distance > 0.0) {
            return None;
        }

        if !self.started {
            self.started = true;
            let direction = (self.points[1].position - self.cursor).normalize_or_zero();
            return Some(self.step(direction));
        }

        while self.next_index < self.points.len() {
            let start = self.points[self.next_index - 1].position;
            let target = self.points[self.next_index].position;
            let direction = (target - start).normalize_or_zero();
            let remaining = (start.distance(target) - self.travelled).max(0.0);

            if remaining >= self.distance_to_move {
                let travelled = self.travelled + self.distance_to_move;
                self.distance_to_move = self.distance;

                // Spacing below the precision of `travelled`: nothing left to
                // place on this segment
                if travelled <= self.travelled {
                    self.advance_segment();
                    continue;
                }

                self.travelled = travelled;
                self.cursor = start + direction * travelled;
                return Some(self.step(direction));
            }

            self.distance_to_move -= remaining;
            self.advance_segment();
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spline::CatmullRomCurve;

    fn straight(points: &[Vec3], resolution: usize) -> Vec<SplinePoint> {
        let curve = CatmullRomCurve::new(points, resolution, false);
        spline_points(curve.samples(), resolution, points.len())
    }

    #[test]
    fn test_walk_straight_line() {
        let points = straight(&[Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)], 0);
        let steps: Vec<PlacementStep> = ArcLengthWalker::new(&points, 2.0).collect();

        assert_eq!(steps.len(), 6);
        for (i, step) in steps.iter().enumerate() {
            assert!((step.position.x - i as f32 * 2.0).abs() < 1e-4);
            assert!((step.direction - Vec3::X).length() < 1e-4);
            assert_eq!(step.control_point_index, 0);
        }
    }

    #[test]
    fn test_walk_carries_remainder_across_samples() {
        // Corner at (3, 0, 0): the step after it must be 1 unit up the second leg
        let points = straight(
            &[Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 5.0)],
            0,
        );
        let steps: Vec<PlacementStep> = ArcLengthWalker::new(&points, 2.0).collect();

        assert_eq!(steps.len(), 5);
        assert!((steps[1].position - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-4);
        assert!((steps[2].position - Vec3::new(3.0, 0.0, 1.0)).length() < 1e-4);
        assert!((steps[3].position - Vec3::new(3.0, 0.0, 3.0)).length() < 1e-4);
        assert!((steps[4].position - Vec3::new(3.0, 0.0, 5.0)).length() < 1e-4);
        assert_eq!(steps[1].control_point_index, 0);
        assert_eq!(steps[2].control_point_index, 1);
        assert!((steps[2].direction - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn test_spline_points_bucketing() {
        let control = [Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0)];
        let points = straight(&control, 2);

        assert_eq!(points.len(), 7);
        let indices: Vec<usize> = points.iter().map(|p| p.control_point_index).collect();
        assert_eq!(indices, vec![0, 0, 0, 1, 1, 1, 2]);
    }

    #[test]
    fn test_spline_points_cap() {
        // An endless sample source is cut off after one lap
        let endless = std::iter::repeat(Vec3::ONE);
        let points = spline_points(endless, 3, 4);
        assert_eq!(points.len(), 4 * 4 + 1);
    }

    #[test]
    fn test_looped_walk_terminates() {
        let control = [
            Vec3::ZERO,
            Vec3::new(4.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 4.0),
            Vec3::new(0.0, 0.0, 4.0),
        ];
        let curve = CatmullRomCurve::new(&control, 10, true);
        let points = spline_points(curve.samples(), 10, control.len());
        let length = polyline_length(&points);

        let count = ArcLengthWalker::new(&points, 0.01).count();
        assert!(count as f32 <= length / 0.01 + 2.0);
        assert!(points.last().unwrap().control_point_index <= control.len());
    }

    #[test]
    fn test_walk_far_from_origin_advances() {
        let start = Vec3::new(300_000.0, 0.0, 0.0);
        let points = straight(&[start, start + Vec3::new(10.0, 0.0, 0.0)], 0);

        let steps: Vec<PlacementStep> = ArcLengthWalker::new(&points, 0.01).take(5000).collect();
        assert!((1000..=1002).contains(&steps.len()), "got {} steps", steps.len());

        let last = steps.last().unwrap().position;
        assert!((last.x - 300_010.0).abs() < 0.1);
        assert!(steps.windows(2).all(|pair| pair[1].position.x >= pair[0].position.x));
    }

    #[test]
    fn test_walk_spacing_below_precision_terminates() {
        // 1e-3 is far below the spacing of f32 values around 1e6
        let start = Vec3::new(1.0e6, 0.0, 0.0);
        let points = straight(&[start, start + Vec3::new(4.0, 0.0, 0.0)], 0);

        let count = ArcLengthWalker::new(&points, 1.0e-3).take(100_000).count();
        assert!(count < 100_000);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(ArcLengthWalker::new(&[], 1.0).count(), 0);

        let single = [SplinePoint {
            position: Vec3::ONE,
            control_point_index: 0,
        }];
        assert_eq!(ArcLengthWalker::new(&single, 1.0).count(), 0);

        // Coincident samples only yield the initial step
        let coincident = [single[0], single[0]];
        let steps: Vec<PlacementStep> = ArcLengthWalker::new(&coincident, 1.0).collect();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].direction, Vec3::ZERO);
    }

    #[test]
    fn test_polyline_length() {
        let points = straight(&[Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0)], 0);
        assert!((polyline_length(&points) - 5.0).abs() < 1e-5);
    }
}
