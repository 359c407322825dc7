//! Final transforms for placement steps: lanes, rotation and scale.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::{euler_degrees, inverse_lerp, look_rotation};
use crate::prefab::{PrefabRef, PrefabSettings};
use crate::spline::{InstanceRotation, PlacementStep, SplineSettings};

/// Everything the host needs to instantiate one prefab instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementDescriptor {
    pub prefab: PrefabRef,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Lane number, 1-based from the left.
    pub lane: usize,
    /// Signed lane offset from the spline, 0 on the centre lane.
    pub lane_offset: i32,
    /// Index of the walker step this instance belongs to.
    pub step: usize,
}

/// One lane of a [`LaneLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lane {
    /// 1-based lane number.
    pub index: usize,
    /// Multiples of the lane distance from the spline; negative is left.
    pub offset: i32,
}

/// Lanes centred on the spline.
///
/// Five lanes have the offsets -2, -1, 0, 1, 2. With an even count the extra
/// lane goes to the left: four lanes are -2, -1, 0, 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneLayout {
    lanes: usize,
    skip_center_lane: bool,
}

impl LaneLayout {
    pub fn new(lanes: usize, skip_center_lane: bool) -> Self {
        Self {
            lanes,
            skip_center_lane,
        }
    }

    pub fn from_settings(settings: &SplineSettings) -> Self {
        Self::new(settings.lanes, settings.skip_center_lane)
    }

    /// Lanes that receive an instance, left to right.
    pub fn iter(&self) -> impl Iterator<Item = Lane> + '_ {
        let first = -((self.lanes / 2) as i32);
        (1..=self.lanes)
            .map(move |index| Lane {
                index,
                offset: first + (index as i32 - 1),
            })
            .filter(|lane| !(self.skip_center_lane && lane.offset == 0))
    }
}

/// Compute the descriptor for one lane of a placement step.
pub fn resolve_placement(
    settings: &SplineSettings,
    step_index: usize,
    step: &PlacementStep,
    lane: Lane,
    prefab: &PrefabSettings,
    rng: &mut impl Rng,
) -> PlacementDescriptor {
    let spline_rotation = look_rotation(step.direction);

    let lane_distance = lane.offset as f32 * settings.lane_distance;
    let position =
        step.position + prefab.position_offset + spline_rotation * Vec3::X * lane_distance;

    let scale = prefab.instance_scale(rng);

    let mut rotation = match settings.instance_rotation {
        InstanceRotation::Spline => spline_rotation,
        InstanceRotation::Prefab => prefab.prefab_rotation(rng),
        InstanceRotation::Identity => Quat::IDENTITY,
    };

    if settings.control_point_rotation && settings.instance_rotation == InstanceRotation::Spline {
        rotation *= control_point_blend(settings, step);
    }

    rotation = (rotation * euler_degrees(prefab.rotation_offset)).normalize();

    PlacementDescriptor {
        prefab: prefab.prefab.clone(),
        position,
        rotation,
        scale,
        lane: lane.index,
        lane_offset: lane.offset,
        step: step_index,
    }
}

/// Blend of the rotations stored on the control points around a step.
///
/// The weight is the projection of the step position onto the straight segment
/// between the two control points.
pub fn control_point_blend(settings: &SplineSettings, step: &PlacementStep) -> Quat {
    let points = &settings.control_points;
    let Some(last) = points.len().checked_sub(1) else {
        return Quat::IDENTITY;
    };

    let current = step.control_point_index.min(last);
    let next = if current < last {
        current + 1
    } else if settings.looped {
        0
    } else {
        last
    };

    let (from, to) = (&points[current], &points[next]);
    let t = inverse_lerp(from.position, to.position, step.position);
    from.rotation.lerp(to.rotation, t)
}
