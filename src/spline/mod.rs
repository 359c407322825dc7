mod arc_length;
mod catmull_rom;
mod components;
mod types;

pub use arc_length::*;
pub use catmull_rom::*;
pub use components::*;
pub use types::*;

use bevy::prelude::*;

/// Plugin that registers spline types for reflection/serialization.
/// This plugin does NOT place anything - use `SplinePainterPlugin` for that.
pub struct SplinePlugin;

impl Plugin for SplinePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<ControlPoint>()
            .register_type::<AttachMode>()
            .register_type::<InstanceRotation>()
            .register_type::<SplineSettings>();
    }
}
