//! Geometry utilities for spline-based placement.

use bevy::prelude::*;

/// A local coordinate frame defined by tangent, right, and up vectors.
///
/// The frame is constructed from a direction of travel with automatic handling
/// of degenerate cases (e.g., when the direction is parallel to the preferred up).
#[derive(Debug, Clone, Copy)]
pub struct CoordinateFrame {
    /// The tangent (forward along spline) direction.
    pub tangent: Vec3,
    /// The right direction (perpendicular to tangent and up).
    pub right: Vec3,
    /// The corrected up direction (perpendicular to tangent and right).
    pub up: Vec3,
}

impl CoordinateFrame {
    /// Build a frame whose forward (-Z in Bevy) points along `direction`.
    ///
    /// Falls back to X as the reference axis when `direction` is parallel to
    /// `preferred_up`. A zero direction yields an invalid frame.
    pub fn from_direction(direction: Vec3, preferred_up: Vec3) -> Self {
        let tangent = direction.normalize_or_zero();
        let back = -tangent;

        let right = preferred_up.cross(back).normalize_or_zero();

        // Handle degenerate case: direction parallel to preferred_up
        let right = if right.length_squared() < 0.001 {
            Vec3::X.cross(back).normalize_or_zero()
        } else {
            right
        };
        let up = back.cross(right).normalize_or_zero();

        Self { tangent, right, up }
    }

    /// Check if this frame is valid (non-degenerate).
    pub fn is_valid(&self) -> bool {
        self.right.length_squared() > 0.001 && self.up.length_squared() > 0.001
    }

    /// Convert to a rotation quaternion.
    ///
    /// The rotation orients an entity so that:
    /// - Its local -Z (forward) points along `tangent`
    /// - Its local +Y (up) points along `up`
    /// - Its local +X (right) points along `right`
    pub fn to_rotation(&self) -> Quat {
        if !self.is_valid() {
            return Quat::IDENTITY;
        }
        Quat::from_mat3(&Mat3::from_cols(self.right, self.up, -self.tangent))
    }
}

/// Rotation that looks along `direction` with Y as up.
///
/// Returns identity for a zero direction.
pub fn look_rotation(direction: Vec3) -> Quat {
    CoordinateFrame::from_direction(direction, Vec3::Y).to_rotation()
}

/// Normalized projection of `value` onto the segment `a..b`, clamped to [0, 1].
///
/// A zero-length segment yields 0.
pub fn inverse_lerp(a: Vec3, b: Vec3, value: Vec3) -> f32 {
    let ab = b - a;
    let length_squared = ab.length_squared();
    if length_squared <= f32::EPSILON {
        return 0.0;
    }
    ((value - a).dot(ab) / length_squared).clamp(0.0, 1.0)
}

/// Rotation from Euler angles in degrees, applied around Z, then X, then Y.
pub fn euler_degrees(angles: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        angles.y.to_radians(),
        angles.x.to_radians(),
        angles.z.to_radians(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_direction_basic() {
        let frame = CoordinateFrame::from_direction(Vec3::X, Vec3::Y);
        assert!(frame.is_valid());
        assert!((frame.tangent - Vec3::X).length() < 0.001);
        assert!((frame.up - Vec3::Y).length() < 0.001);
        assert!((frame.right - Vec3::Z).length() < 0.001);
    }

    #[test]
    fn test_from_direction_degenerate() {
        // Direction parallel to Y should still produce a valid frame
        let frame = CoordinateFrame::from_direction(Vec3::Y, Vec3::Y);
        assert!(frame.is_valid());

        let zero = CoordinateFrame::from_direction(Vec3::ZERO, Vec3::Y);
        assert!(!zero.is_valid());
        assert_eq!(zero.to_rotation(), Quat::IDENTITY);
    }

    #[test]
    fn test_look_rotation_points_forward() {
        for direction in [Vec3::X, Vec3::NEG_Z, Vec3::new(1.0, 0.5, -2.0), Vec3::NEG_Y] {
            let rotation = look_rotation(direction);
            let forward = rotation * Vec3::NEG_Z;
            assert!((forward - direction.normalize()).length() < 0.001);
        }
    }

    #[test]
    fn test_inverse_lerp() {
        let a = Vec3::ZERO;
        let b = Vec3::new(4.0, 0.0, 0.0);
        assert!((inverse_lerp(a, b, Vec3::new(1.0, 3.0, 0.0)) - 0.25).abs() < 0.001);
        assert_eq!(inverse_lerp(a, b, Vec3::new(-2.0, 0.0, 0.0)), 0.0);
        assert_eq!(inverse_lerp(a, b, Vec3::new(9.0, 0.0, 0.0)), 1.0);
        assert_eq!(inverse_lerp(a, a, Vec3::ONE), 0.0);
    }

    #[test]
    fn test_euler_degrees_yaw() {
        let rotation = euler_degrees(Vec3::new(0.0, 90.0, 0.0));
        let rotated = rotation * Vec3::NEG_Z;
        assert!((rotated - Vec3::NEG_X).length() < 0.001);
    }
}
