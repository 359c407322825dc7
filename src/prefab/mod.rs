//! Per-prefab placement configuration.

mod palette;
mod settings;

pub use palette::PrefabPalette;
pub use settings::*;

use bevy::prelude::*;

/// Registers prefab configuration types for reflection.
pub(crate) fn register_types(app: &mut App) {
    app.register_type::<PrefabRef>()
        .register_type::<RotationLimits>()
        .register_type::<PrefabSettings>()
        .register_type::<PrefabPalette>();
}
