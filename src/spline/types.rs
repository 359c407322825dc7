use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// A user-placed anchor on the spline.
///
/// Control points have no identity of their own; they are addressed by their
/// index in [`SplineSettings::control_points`](super::SplineSettings).
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Default)]
pub struct ControlPoint {
    pub position: Vec3,
    /// Only used when control point rotation blending is enabled.
    pub rotation: Quat,
}

impl Default for ControlPoint {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl ControlPoint {
    /// Create a control point with identity rotation.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..default()
        }
    }

    /// Set the rotation of this control point.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }
}

impl From<Vec3> for ControlPoint {
    fn from(position: Vec3) -> Self {
        Self::new(position)
    }
}

/// Where a newly added control point goes relative to the closest existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
#[reflect(Default)]
pub enum AttachMode {
    /// Only the first and last points are candidates; the new point extends
    /// the spline at that end.
    #[default]
    Bounds,
    /// The new point is spliced in next to the closest point.
    Between,
}

impl AttachMode {
    /// Toggle between the two modes.
    pub fn toggle(self) -> Self {
        match self {
            Self::Bounds => Self::Between,
            Self::Between => Self::Bounds,
        }
    }

    /// Get the display name for this attach mode.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bounds => "Bounds",
            Self::Between => "Between",
        }
    }
}

/// How placed instances are rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
#[reflect(Default)]
pub enum InstanceRotation {
    /// Face along the direction of travel on the spline.
    Spline,
    /// Use the prefab's own rotation settings (identity or random).
    #[default]
    Prefab,
    /// No rotation at all.
    Identity,
}

impl InstanceRotation {
    /// Get the display name for this rotation mode.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Spline => "Spline",
            Self::Prefab => "Prefab",
            Self::Identity => "Identity",
        }
    }
}
