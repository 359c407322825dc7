use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::euler_degrees;

/// Key identifying a prefab on the host side.
///
/// The Bevy host resolves it through [`PrefabLibrary`](crate::placement::PrefabLibrary)
/// or loads it as a scene asset path. Cloning copies the key, not the prefab.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
#[reflect(Default)]
#[serde(transparent)]
pub struct PrefabRef(pub String);

impl PrefabRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PrefabRef {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl std::fmt::Display for PrefabRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-axis bounds in degrees for random rotations.
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Default)]
#[serde(default)]
pub struct RotationLimits {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for RotationLimits {
    fn default() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::splat(360.0),
        }
    }
}

impl RotationLimits {
    /// Limit rotation to the Y axis only.
    pub fn yaw_only() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::new(0.0, 360.0, 0.0),
        }
    }

    /// Draw random Euler angles within the limits, in degrees.
    pub fn sample(&self, rng: &mut impl Rng) -> Vec3 {
        Vec3::new(
            random_between(rng, self.min.x, self.max.x, 0.0),
            random_between(rng, self.min.y, self.max.y, 0.0),
            random_between(rng, self.min.z, self.max.z, 0.0),
        )
    }
}

/// How a single prefab is placed.
///
/// `Clone` is a plain value copy: the [`PrefabRef`] key is shared by value,
/// every other field is copied.
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Default)]
#[serde(default)]
pub struct PrefabSettings {
    /// The prefab to instantiate.
    pub prefab: PrefabRef,
    /// Inactive prefabs are never selected.
    pub active: bool,
    /// Selection weight relative to the other active prefabs, in [0, 1].
    pub probability: f32,
    /// Added to the spline position of every instance.
    pub position_offset: Vec3,
    /// Euler rotation in degrees applied after every other rotation.
    pub rotation_offset: Vec3,
    /// Randomize rotation in
    /// [`InstanceRotation::Prefab`](crate::spline::InstanceRotation::Prefab) mode.
    pub random_rotation: bool,
    pub rotation_limits: RotationLimits,
    /// Replace the unit scale with a random uniform scale.
    pub change_scale: bool,
    pub scale_min: f32,
    pub scale_max: f32,
}

impl Default for PrefabSettings {
    fn default() -> Self {
        Self {
            prefab: PrefabRef::default(),
            active: true,
            probability: 1.0,
            position_offset: Vec3::ZERO,
            rotation_offset: Vec3::ZERO,
            random_rotation: false,
            rotation_limits: RotationLimits::default(),
            change_scale: false,
            scale_min: 0.5,
            scale_max: 1.5,
        }
    }
}

impl PrefabSettings {
    /// Create settings for a prefab with default placement options.
    pub fn new(prefab: impl Into<PrefabRef>) -> Self {
        Self {
            prefab: prefab.into(),
            ..default()
        }
    }

    /// Set the selection probability, clamped to [0, 1].
    pub fn with_probability(mut self, probability: f32) -> Self {
        self.probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Set the position offset.
    pub fn with_position_offset(mut self, offset: Vec3) -> Self {
        self.position_offset = offset;
        self
    }

    /// Set the rotation offset in Euler degrees.
    pub fn with_rotation_offset(mut self, degrees: Vec3) -> Self {
        self.rotation_offset = degrees;
        self
    }

    /// Enable random rotation within the given limits.
    pub fn with_random_rotation(mut self, limits: RotationLimits) -> Self {
        self.random_rotation = true;
        self.rotation_limits = limits;
        self
    }

    /// Enable random uniform scale in `[min, max]`.
    pub fn with_random_scale(mut self, min: f32, max: f32) -> Self {
        self.change_scale = true;
        self.scale_min = min;
        self.scale_max = max;
        self
    }

    /// Mark this prefab inactive.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Rotation for [`InstanceRotation::Prefab`](crate::spline::InstanceRotation::Prefab) mode.
    pub fn prefab_rotation(&self, rng: &mut impl Rng) -> Quat {
        if self.random_rotation {
            euler_degrees(self.rotation_limits.sample(rng))
        } else {
            Quat::IDENTITY
        }
    }

    /// The scale of a new instance.
    pub fn instance_scale(&self, rng: &mut impl Rng) -> Vec3 {
        if self.change_scale {
            Vec3::splat(random_between(rng, self.scale_min, self.scale_max, 1.0))
        } else {
            Vec3::ONE
        }
    }
}

/// Uniform value in `[a, b]`, accepting the bounds in either order.
///
/// A non-finite bound is ignored; with no finite bound `fallback` is returned.
fn random_between(rng: &mut impl Rng, a: f32, b: f32, fallback: f32) -> f32 {
    let (low, high) = match (a.is_finite(), b.is_finite()) {
        (true, true) if a <= b => (a, b),
        (true, true) => (b, a),
        (true, false) => return a,
        (false, true) => return b,
        (false, false) => return fallback,
    };
    if low == high {
        return low;
    }
    if (high - low).is_finite() {
        rng.random_range(low..=high)
    } else {
        // Span overflows f32; interpolate the bounds separately
        let t: f32 = rng.random();
        low * (1.0 - t) + high * t
    }
}
