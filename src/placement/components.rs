use std::collections::HashMap;

use bevy::prelude::*;

use super::session::PlacementSession;
use crate::prefab::{PrefabPalette, PrefabRef};
use crate::spline::SplineSettings;

/// Component that paints prefab instances along a spline.
///
/// Control points are in the local space of the painter entity; placed
/// instances are spawned as its children and rebuilt whenever the session is
/// dirty.
#[derive(Component, Debug, Clone, Default)]
#[require(Transform, Visibility)]
pub struct SplinePainter {
    pub session: PlacementSession<Entity>,
}

impl SplinePainter {
    /// Create a painter for the given spline and prefabs.
    pub fn new(settings: SplineSettings, palette: PrefabPalette) -> Self {
        Self {
            session: PlacementSession::new(settings, palette),
        }
    }

    /// Set the random seed used for prefab selection, rotation and scale.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.session = self.session.with_seed(seed);
        self
    }
}

/// Marker component added to every placed instance.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PlacedInstance {
    /// The painter entity that owns this instance.
    pub painter: Entity,
    /// Position of this instance in the painter's placement order.
    pub index: usize,
    /// 1-based lane number.
    pub lane: usize,
}

/// Visual components cloned onto instances of a registered prefab.
#[derive(Debug, Clone)]
pub struct PrefabVisual {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

/// Registered prefab visuals, keyed by [`PrefabRef`].
///
/// Prefabs that are not registered here are loaded as scene asset paths,
/// e.g. `"models/tree.glb#Scene0"`.
#[derive(Resource, Debug, Clone, Default)]
pub struct PrefabLibrary {
    visuals: HashMap<PrefabRef, PrefabVisual>,
}

impl PrefabLibrary {
    /// Register a mesh and material for a prefab key.
    pub fn insert(
        &mut self,
        prefab: impl Into<PrefabRef>,
        mesh: Handle<Mesh>,
        material: Handle<StandardMaterial>,
    ) {
        self.visuals
            .insert(prefab.into(), PrefabVisual { mesh, material });
    }

    pub fn get(&self, prefab: &PrefabRef) -> Option<&PrefabVisual> {
        self.visuals.get(prefab)
    }

    pub fn contains(&self, prefab: &PrefabRef) -> bool {
        self.visuals.contains_key(prefab)
    }
}
