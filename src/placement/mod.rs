mod components;
mod error;
mod resolver;
mod session;
mod systems;

pub use components::*;
pub use error::PlacementError;
pub use resolver::*;
pub use session::*;
pub use systems::{apply_spline_painters, cleanup_spline_painters};

use bevy::prelude::*;

use crate::spline::SplinePlugin;

/// Plugin for painting prefab instances along splines.
///
/// Each [`SplinePainter`] owns a [`PlacementSession`]. Whenever the session is
/// dirty, its previous instances are despawned and a fresh set is spawned as
/// children of the painter entity.
///
/// # Usage
///
/// ```ignore
/// use bevy::prelude::*;
/// use bevy_spline_painter::prelude::*;
///
/// fn setup(mut commands: Commands) {
///     commands.spawn(SplinePainter::new(
///         SplineSettings::new([Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)])
///             .with_distance(2.0)
///             .with_rotation(InstanceRotation::Spline),
///         PrefabPalette::new([PrefabSettings::new("models/lamp.glb#Scene0")]),
///     ));
/// }
///
/// fn extend(mut painters: Query<&mut SplinePainter>) {
///     for mut painter in &mut painters {
///         painter.session.add_control_point(Vec3::new(20.0, 0.0, 5.0), AttachMode::Bounds);
///     }
/// }
/// ```
///
/// # Prefabs
///
/// - Keys registered in [`PrefabLibrary`] get the registered mesh and material
/// - Any other key is loaded as a scene asset path
pub struct SplinePainterPlugin;

impl Plugin for SplinePainterPlugin {
    fn build(&self, app: &mut App) {
        // Ensure SplinePlugin is added
        if !app.is_plugin_added::<SplinePlugin>() {
            app.add_plugins(SplinePlugin);
        }

        crate::prefab::register_types(app);

        app.register_type::<PlacedInstance>()
            .init_resource::<PrefabLibrary>()
            .add_systems(
                Update,
                (apply_spline_painters, cleanup_spline_painters).chain(),
            );
    }
}
