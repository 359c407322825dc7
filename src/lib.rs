//! # bevy_spline_painter
//!
//! A Bevy plugin for painting prefab instances along 3D splines.
//!
//! ## Features
//!
//! - Catmull-Rom splines through every control point, open or looped
//! - Instances placed at a fixed distance along the spline
//! - Parallel lanes, with an optional empty centre lane
//! - Rotation along the spline, per prefab, or blended between control points
//! - Weighted random prefab selection with random rotation and scale
//! - Deterministic placement (seeded), serializable settings
//!
//! ## Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_spline_painter::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(SplinePainterPlugin)
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) {
//!     commands.spawn(SplinePainter::new(
//!         SplineSettings::new([
//!             Vec3::new(-4.0, 0.0, 0.0),
//!             Vec3::new(0.0, 0.0, 3.0),
//!             Vec3::new(4.0, 0.0, 0.0),
//!         ])
//!         .with_curve_resolution(6)
//!         .with_lanes(3, 1.5, true),
//!         PrefabPalette::new([PrefabSettings::new("models/tree.glb#Scene0")]),
//!     ));
//! }
//! ```
//!
//! ## Without Bevy's ECS
//!
//! [`PlacementSession`](placement::PlacementSession) works on its own. Any type
//! implementing [`InstanceHost`](placement::InstanceHost) can receive the
//! placements:
//!
//! ```ignore
//! let mut session: PlacementSession = PlacementSession::new(settings, palette);
//! session.apply_if_dirty(&mut DescriptorHost);
//! for placed in session.instances() {
//!     println!("{} at {}", placed.prefab, placed.position);
//! }
//! ```
//!
//! ## Plugins
//!
//! - [`SplinePlugin`]: Spline type registration (added automatically)
//! - [`SplinePainterPlugin`]: Spawns and maintains placed instances

pub mod geometry;
pub mod placement;
pub mod prefab;
pub mod spline;

pub use placement::SplinePainterPlugin;
pub use spline::SplinePlugin;

/// Convenient re-exports of commonly used types.
pub mod prelude {
    pub use crate::placement::{
        compute_placements, DescriptorHost, InstanceHost, PlacedInstance, PlacementDescriptor,
        PlacementError, PlacementSession, PrefabLibrary, SessionState, SplinePainter,
        SplinePainterPlugin,
    };
    pub use crate::prefab::{PrefabPalette, PrefabRef, PrefabSettings, RotationLimits};
    pub use crate::spline::{
        AttachMode, CatmullRomCurve, ControlPoint, InstanceRotation, SplinePlugin,
        SplineSettings,
    };
}
