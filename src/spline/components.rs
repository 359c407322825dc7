use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::catmull_rom::CatmullRomCurve;
use super::types::{AttachMode, ControlPoint, InstanceRotation};

/// Highest accepted number of interior samples per spline segment.
pub const MAX_CURVE_RESOLUTION: usize = 10;

/// Separation used whenever a non-positive distance is configured.
///
/// A zero distance would never advance the arc-length walk.
pub const MIN_DISTANCE_BETWEEN_OBJECTS: f32 = 0.01;

/// Highest accepted lane count.
pub const MAX_LANES: usize = 10;

/// Shape and placement configuration of a painted spline.
///
/// Fully serializable; the placed instances and the dirty flag live in the
/// [`PlacementSession`](crate::placement::PlacementSession) that owns these settings.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component, Default)]
#[serde(default)]
pub struct SplineSettings {
    /// Control points defining the spline shape.
    pub control_points: Vec<ControlPoint>,
    /// Interior samples per segment between two control points.
    pub curve_resolution: usize,
    /// Whether the last control point connects back to the first.
    pub looped: bool,
    /// Distance along the spline between consecutive placements.
    pub distance_between_objects: f32,
    /// How placed instances are rotated.
    pub instance_rotation: InstanceRotation,
    /// Blend the rotations stored on control points into the spline rotation.
    /// Only honoured together with [`InstanceRotation::Spline`].
    pub control_point_rotation: bool,
    /// Where new control points are inserted.
    pub attach_mode: AttachMode,
    /// Number of parallel lanes, centred on the spline.
    pub lanes: usize,
    /// Lateral spacing between lanes.
    pub lane_distance: f32,
    /// Leave the lane on the spline itself empty.
    pub skip_center_lane: bool,
}

impl Default for SplineSettings {
    fn default() -> Self {
        Self {
            control_points: Vec::new(),
            curve_resolution: 0,
            looped: false,
            distance_between_objects: 1.0,
            instance_rotation: InstanceRotation::default(),
            control_point_rotation: false,
            attach_mode: AttachMode::default(),
            lanes: 1,
            lane_distance: 1.0,
            skip_center_lane: false,
        }
    }
}

impl SplineSettings {
    /// Create settings for the given control point positions.
    pub fn new(positions: impl IntoIterator<Item = Vec3>) -> Self {
        Self {
            control_points: positions.into_iter().map(ControlPoint::new).collect(),
            ..default()
        }
    }

    /// Set the curve resolution.
    pub fn with_curve_resolution(mut self, resolution: usize) -> Self {
        self.curve_resolution = resolution;
        self.normalize();
        self
    }

    /// Close the spline into a loop.
    pub fn looped(mut self) -> Self {
        self.looped = true;
        self
    }

    /// Set the distance between placed objects.
    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance_between_objects = distance;
        self.normalize();
        self
    }

    /// Set the instance rotation mode.
    pub fn with_rotation(mut self, rotation: InstanceRotation) -> Self {
        self.instance_rotation = rotation;
        self.normalize();
        self
    }

    /// Enable control point rotation blending (requires [`InstanceRotation::Spline`]).
    pub fn with_control_point_rotation(mut self) -> Self {
        self.control_point_rotation = true;
        self.normalize();
        self
    }

    /// Set the lane layout.
    pub fn with_lanes(mut self, lanes: usize, lane_distance: f32, skip_center_lane: bool) -> Self {
        self.lanes = lanes;
        self.lane_distance = lane_distance;
        self.skip_center_lane = skip_center_lane;
        self.normalize();
        self
    }

    /// Set the attach mode.
    pub fn with_attach_mode(mut self, attach_mode: AttachMode) -> Self {
        self.attach_mode = attach_mode;
        self
    }

    /// Enforce the configuration invariants in place.
    ///
    /// Distances below [`MIN_DISTANCE_BETWEEN_OBJECTS`] (or not finite) are
    /// raised to it, counts are clamped to their ranges and
    /// control point rotation is switched off outside of spline rotation mode.
    pub fn normalize(&mut self) {
        self.curve_resolution = self.curve_resolution.min(MAX_CURVE_RESOLUTION);
        self.distance_between_objects = if self.distance_between_objects.is_finite() {
            self.distance_between_objects.max(MIN_DISTANCE_BETWEEN_OBJECTS)
        } else {
            MIN_DISTANCE_BETWEEN_OBJECTS
        };
        self.lanes = self.lanes.clamp(1, MAX_LANES);
        if self.instance_rotation != InstanceRotation::Spline {
            self.control_point_rotation = false;
        }
    }

    /// Control point positions in order.
    pub fn positions(&self) -> Vec<Vec3> {
        self.control_points.iter().map(|p| p.position).collect()
    }

    /// Check if the spline has enough points to place anything.
    pub fn is_valid(&self) -> bool {
        self.control_points.len() >= CatmullRomCurve::MIN_POINTS
    }

    /// Index of the control point closest to `position`.
    ///
    /// In [`AttachMode::Bounds`] only the first and last points are considered.
    pub fn find_closest_control_point(
        &self,
        position: Vec3,
        attach_mode: AttachMode,
    ) -> Option<usize> {
        let last = self.control_points.len().checked_sub(1)?;

        let mut closest: Option<(usize, f32)> = None;
        for (i, point) in self.control_points.iter().enumerate() {
            if attach_mode == AttachMode::Bounds && i != 0 && i != last {
                continue;
            }
            let distance = point.position.distance(position);
            if closest.is_none_or(|(_, best)| distance < best) {
                closest = Some((i, distance));
            }
        }

        closest.map(|(i, _)| i)
    }

    /// Insert a control point according to `attach_mode` and return its index.
    ///
    /// - Bounds: the point extends the spline before the first or after the
    ///   last point, whichever is closer.
    /// - Between: the point is spliced in next to the closest point, on the
    ///   inner side when the closest point is an endpoint.
    pub fn attach_control_point(&mut self, point: ControlPoint, attach_mode: AttachMode) -> usize {
        let len = self.control_points.len();
        let index = match self.find_closest_control_point(point.position, attach_mode) {
            None => len,
            Some(0) => match attach_mode {
                AttachMode::Bounds => 0,
                AttachMode::Between => 1,
            },
            Some(closest) if closest == len - 1 => match attach_mode {
                AttachMode::Bounds => len,
                AttachMode::Between => len - 1,
            },
            Some(closest) => closest,
        };

        self.control_points.insert(index, point);
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(count: usize) -> SplineSettings {
        SplineSettings::new((0..count).map(|i| Vec3::new(i as f32 * 10.0, 0.0, 0.0)))
    }

    #[test]
    fn test_normalize_clamps() {
        let mut settings = SplineSettings {
            curve_resolution: 50,
            distance_between_objects: -3.0,
            lanes: 0,
            instance_rotation: InstanceRotation::Prefab,
            control_point_rotation: true,
            ..default()
        };
        settings.normalize();

        assert_eq!(settings.curve_resolution, MAX_CURVE_RESOLUTION);
        assert_eq!(settings.distance_between_objects, MIN_DISTANCE_BETWEEN_OBJECTS);
        assert_eq!(settings.lanes, 1);
        assert!(!settings.control_point_rotation);

        settings.distance_between_objects = f32::NAN;
        settings.lanes = 40;
        settings.normalize();
        assert_eq!(settings.distance_between_objects, MIN_DISTANCE_BETWEEN_OBJECTS);
        assert_eq!(settings.lanes, MAX_LANES);

        settings.distance_between_objects = 1.0e-6;
        settings.normalize();
        assert_eq!(settings.distance_between_objects, MIN_DISTANCE_BETWEEN_OBJECTS);

        settings.distance_between_objects = f32::INFINITY;
        settings.normalize();
        assert_eq!(settings.distance_between_objects, MIN_DISTANCE_BETWEEN_OBJECTS);

        settings.distance_between_objects = 0.5;
        settings.normalize();
        assert_eq!(settings.distance_between_objects, 0.5);
    }

    #[test]
    fn test_control_point_rotation_kept_in_spline_mode() {
        let settings = SplineSettings::default()
            .with_rotation(InstanceRotation::Spline)
            .with_control_point_rotation();
        assert!(settings.control_point_rotation);

        let settings = settings.with_rotation(InstanceRotation::Identity);
        assert!(!settings.control_point_rotation);
    }

    #[test]
    fn test_find_closest_bounds_only_considers_endpoints() {
        let settings = line(4);
        // Closest overall is index 1, but bounds mode only looks at 0 and 3
        let near_second = Vec3::new(11.0, 0.0, 0.0);
        assert_eq!(
            settings.find_closest_control_point(near_second, AttachMode::Bounds),
            Some(0)
        );
        assert_eq!(
            settings.find_closest_control_point(near_second, AttachMode::Between),
            Some(1)
        );

        let empty = SplineSettings::default();
        assert_eq!(empty.find_closest_control_point(Vec3::ZERO, AttachMode::Bounds), None);
    }

    #[test]
    fn test_attach_bounds() {
        let mut settings = line(3);
        let before =
            settings.attach_control_point(Vec3::new(-5.0, 0.0, 0.0).into(), AttachMode::Bounds);
        assert_eq!(before, 0);
        let after =
            settings.attach_control_point(Vec3::new(30.0, 0.0, 0.0).into(), AttachMode::Bounds);
        assert_eq!(after, 4);
        assert_eq!(settings.control_points.len(), 5);
        assert_eq!(settings.control_points[4].position.x, 30.0);
    }

    #[test]
    fn test_attach_between() {
        let mut settings = line(4);
        // Closest is the first point: goes right after it
        assert_eq!(
            settings.attach_control_point(Vec3::new(-1.0, 0.0, 0.0).into(), AttachMode::Between),
            1
        );
        // Closest is the last point: goes right before it
        let last = settings.control_points.len() - 1;
        assert_eq!(
            settings.attach_control_point(Vec3::new(31.0, 0.0, 0.0).into(), AttachMode::Between),
            last
        );
        // Interior closest point: takes its index
        let mut settings = line(4);
        assert_eq!(
            settings.attach_control_point(Vec3::new(19.0, 1.0, 0.0).into(), AttachMode::Between),
            2
        );
    }

    #[test]
    fn test_attach_into_empty() {
        let mut settings = SplineSettings::default();
        assert_eq!(settings.attach_control_point(Vec3::ONE.into(), AttachMode::Between), 0);
        assert_eq!(settings.control_points.len(), 1);
    }
}
