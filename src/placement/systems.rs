use bevy::prelude::*;

use super::resolver::PlacementDescriptor;
use super::session::InstanceHost;
use super::{PlacedInstance, PrefabLibrary, SplinePainter};

/// Spawns placed instances as children of a painter entity.
struct EntityHost<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    painter: Entity,
    library: &'a PrefabLibrary,
    asset_server: Option<&'a AssetServer>,
    next_index: usize,
}

impl InstanceHost for EntityHost<'_, '_, '_> {
    type Instance = Entity;

    fn instantiate(&mut self, descriptor: &PlacementDescriptor) -> Entity {
        let index = self.next_index;
        self.next_index += 1;

        let mut entity_commands = self.commands.spawn((
            Transform {
                translation: descriptor.position,
                rotation: descriptor.rotation,
                scale: descriptor.scale,
            },
            Visibility::default(),
            PlacedInstance {
                painter: self.painter,
                index,
                lane: descriptor.lane,
            },
            ChildOf(self.painter),
        ));

        if let Some(visual) = self.library.get(&descriptor.prefab) {
            entity_commands.insert((
                Mesh3d(visual.mesh.clone()),
                MeshMaterial3d(visual.material.clone()),
            ));
        } else if let Some(asset_server) = self.asset_server {
            let scene: Handle<Scene> = asset_server.load(descriptor.prefab.0.clone());
            entity_commands.insert(SceneRoot(scene));
        } else {
            warn!("Prefab '{}' is not registered in the PrefabLibrary", descriptor.prefab);
        }

        entity_commands.id()
    }

    fn release(&mut self, instance: Entity) {
        if let Ok(mut entity_commands) = self.commands.get_entity(instance) {
            entity_commands.despawn();
        }
    }
}

/// Rebuild the instances of every dirty painter.
pub fn apply_spline_painters(
    mut commands: Commands,
    mut painters: Query<(Entity, &mut SplinePainter)>,
    library: Res<PrefabLibrary>,
    asset_server: Option<Res<AssetServer>>,
) {
    for (painter_entity, mut painter) in &mut painters {
        // Only touch dirty painters so change detection stays quiet
        if !painter.session.is_dirty() {
            continue;
        }

        let mut host = EntityHost {
            commands: &mut commands,
            painter: painter_entity,
            library: &library,
            asset_server: asset_server.as_deref(),
            next_index: 0,
        };
        painter.session.apply_if_dirty(&mut host);
    }
}

/// Cleanup instances when a painter is removed.
pub fn cleanup_spline_painters(
    mut commands: Commands,
    mut removed: RemovedComponents<SplinePainter>,
    instances: Query<(Entity, &PlacedInstance)>,
) {
    for removed_painter in removed.read() {
        for (entity, instance) in &instances {
            if instance.painter == removed_painter {
                if let Ok(mut entity_commands) = commands.get_entity(entity) {
                    entity_commands.despawn();
                }
            }
        }
    }
}
