//! Catmull-Rom interpolation through every control point.
//!
//! The curve is produced lazily: [`CatmullRomCurve::samples`] hands out a fresh
//! iterator on each call, so a curve can be walked as many times as needed.

use bevy::prelude::*;

/// A Catmull-Rom curve over borrowed control point positions.
#[derive(Debug, Clone, Copy)]
pub struct CatmullRomCurve<'a> {
    points: &'a [Vec3],
    resolution: usize,
    looped: bool,
}

impl<'a> CatmullRomCurve<'a> {
    /// Fewer points than this produce an empty curve.
    pub const MIN_POINTS: usize = 2;

    /// Create a curve with `resolution` interior samples per segment.
    pub fn new(points: &'a [Vec3], resolution: usize, looped: bool) -> Self {
        Self {
            points,
            resolution,
            looped,
        }
    }

    /// Number of segments between control points.
    pub fn segment_count(&self) -> usize {
        let n = self.points.len();
        if n < Self::MIN_POINTS {
            0
        } else if self.looped {
            n
        } else {
            n - 1
        }
    }

    /// Total number of samples [`samples`](Self::samples) yields.
    pub fn sample_count(&self) -> usize {
        match self.segment_count() {
            0 => 0,
            segments => 1 + segments * (self.resolution + 1),
        }
    }

    /// Iterate the curve from the first control point.
    pub fn samples(&self) -> CatmullRomSamples<'a> {
        CatmullRomSamples {
            curve: *self,
            segment: 0,
            step: 0,
        }
    }

    /// The four points (previous, start, end, next) for a segment.
    ///
    /// Open curves duplicate the endpoints; looped curves wrap around.
    fn segment_points(&self, segment: usize) -> (Vec3, Vec3, Vec3, Vec3) {
        let last = self.points.len() - 1;

        let start = segment;
        let previous = match (start, self.looped) {
            (0, true) => last,
            (0, false) => 0,
            _ => start - 1,
        };
        let end = match (start == last, self.looped) {
            (true, true) => 0,
            (true, false) => start,
            _ => start + 1,
        };
        let next = match (end == last, self.looped) {
            (true, true) => 0,
            (true, false) => end,
            _ => end + 1,
        };

        (
            self.points[previous],
            self.points[start],
            self.points[end],
            self.points[next],
        )
    }
}

impl<'a> IntoIterator for &CatmullRomCurve<'a> {
    type Item = Vec3;
    type IntoIter = CatmullRomSamples<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples()
    }
}

/// Lazy sample sequence of a [`CatmullRomCurve`].
#[derive(Debug, Clone)]
pub struct CatmullRomSamples<'a> {
    curve: CatmullRomCurve<'a>,
    segment: usize,
    /// 0 before the first control point has been yielded, then 1..=resolution+1
    /// within the current segment.
    step: usize,
}

impl Iterator for CatmullRomSamples<'_> {
    type Item = Vec3;

    fn next(&mut self) -> Option<Vec3> {
        let segments = self.curve.segment_count();
        if segments == 0 || self.segment >= segments {
            return None;
        }

        if self.step == 0 && self.segment == 0 {
            self.step = 1;
            return Some(self.curve.points[0]);
        }

        let steps = self.curve.resolution + 1;
        let (p0, p1, p2, p3) = self.curve.segment_points(self.segment);
        let t = self.step as f32 / steps as f32;
        let point = if self.step == steps {
            // Land exactly on the control point
            p2
        } else {
            catmull_rom(p0, p1, p2, p3, t)
        };

        if self.step == steps {
            self.segment += 1;
            self.step = 1;
        } else {
            self.step += 1;
        }

        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let total = self.curve.sample_count();
        let steps = self.curve.resolution + 1;
        let consumed = if self.step == 0 {
            0
        } else {
            1 + self.segment * steps + (self.step - 1)
        };
        let remaining = total.saturating_sub(consumed);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CatmullRomSamples<'_> {}

/// Uniform Catmull-Rom basis between `p1` and `p2`.
pub fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;

    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::new(4.0, -1.0, 1.0),
            Vec3::new(6.0, 0.5, 0.0),
        ]
    }

    #[test]
    fn test_fewer_than_two_points_is_empty() {
        let one = [Vec3::ONE];
        assert_eq!(CatmullRomCurve::new(&one, 4, false).samples().count(), 0);
        assert_eq!(CatmullRomCurve::new(&one, 4, true).samples().count(), 0);
        assert_eq!(CatmullRomCurve::new(&[], 4, true).samples().count(), 0);
    }

    #[test]
    fn test_sample_counts() {
        let points = zigzag();
        for resolution in [0, 1, 5, 10] {
            let open = CatmullRomCurve::new(&points, resolution, false);
            assert_eq!(open.samples().count(), 1 + (resolution + 1) * 3);
            assert_eq!(open.samples().len(), open.sample_count());

            let looped = CatmullRomCurve::new(&points, resolution, true);
            assert_eq!(looped.samples().count(), 1 + (resolution + 1) * 4);
        }
    }

    #[test]
    fn test_passes_through_control_points_in_order() {
        let points = zigzag();
        let resolution = 3;
        let curve = CatmullRomCurve::new(&points, resolution, false);
        let samples: Vec<Vec3> = curve.samples().collect();

        for (i, point) in points.iter().enumerate() {
            let sample = samples[i * (resolution + 1)];
            assert!((sample - *point).length() < 1e-4, "control point {i} missed");
        }
    }

    #[test]
    fn test_loop_returns_to_start() {
        let points = zigzag();
        let curve = CatmullRomCurve::new(&points, 2, true);
        let samples: Vec<Vec3> = curve.samples().collect();

        assert_eq!(samples.first(), Some(&points[0]));
        assert!((*samples.last().unwrap() - points[0]).length() < 1e-4);
    }

    #[test]
    fn test_restartable() {
        let points = zigzag();
        let curve = CatmullRomCurve::new(&points, 4, true);
        let first: Vec<Vec3> = curve.samples().collect();
        let second: Vec<Vec3> = (&curve).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_straight_line_stays_straight() {
        let points = [Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)];
        let curve = CatmullRomCurve::new(&points, 4, false);
        for sample in curve.samples() {
            assert!(sample.y.abs() < 1e-5 && sample.z.abs() < 1e-5);
            assert!((-1e-4..=10.0001).contains(&sample.x));
        }
    }

    #[test]
    fn test_catmull_rom_endpoints() {
        let (p0, p1, p2, p3) = (Vec3::ZERO, Vec3::X, Vec3::new(2.0, 1.0, 0.0), Vec3::Y);
        assert!((catmull_rom(p0, p1, p2, p3, 0.0) - p1).length() < 1e-5);
        assert!((catmull_rom(p0, p1, p2, p3, 1.0) - p2).length() < 1e-5);
    }
}
