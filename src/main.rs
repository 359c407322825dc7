//! Example spline painter application.
//!
//! Run with: `cargo run`

use bevy::prelude::*;
use bevy_spline_painter::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(SplinePainterPlugin)
        .add_systems(Startup, setup)
        .add_systems(Update, (handle_hotkeys, show_help))
        .run();
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut library: ResMut<PrefabLibrary>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 14.0, 18.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.insert_resource(GlobalAmbientLight {
        color: Color::WHITE,
        brightness: 500.0,
        ..default()
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(40.0, 40.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
    ));

    library.insert(
        "post",
        meshes.add(Cuboid::new(0.3, 1.2, 0.3)),
        materials.add(Color::srgb(0.6, 0.4, 0.2)),
    );
    library.insert(
        "stone",
        meshes.add(Sphere::new(0.3)),
        materials.add(Color::srgb(0.5, 0.5, 0.55)),
    );

    let settings = SplineSettings::new([
        Vec3::new(-8.0, 0.0, 4.0),
        Vec3::new(-3.0, 0.0, -3.0),
        Vec3::new(3.0, 0.0, 3.0),
        Vec3::new(8.0, 0.0, -4.0),
    ])
    .with_curve_resolution(8)
    .with_distance(1.0)
    .with_rotation(InstanceRotation::Spline)
    .with_lanes(3, 1.5, false);

    let palette = PrefabPalette::new([
        PrefabSettings::new("post").with_position_offset(Vec3::new(0.0, 0.6, 0.0)),
        PrefabSettings::new("stone")
            .with_probability(0.3)
            .with_position_offset(Vec3::new(0.0, 0.3, 0.0))
            .with_random_scale(0.6, 1.4),
    ]);

    commands.spawn(SplinePainter::new(settings, palette));
}

const HOTKEYS: [KeyCode; 9] = [
    KeyCode::KeyL,
    KeyCode::ArrowUp,
    KeyCode::ArrowDown,
    KeyCode::KeyC,
    KeyCode::KeyR,
    KeyCode::KeyA,
    KeyCode::KeyN,
    KeyCode::KeyX,
    KeyCode::KeyS,
];

fn handle_hotkeys(keyboard: Res<ButtonInput<KeyCode>>, mut painters: Query<&mut SplinePainter>) {
    // Mutable access marks painters changed
    if !keyboard.any_just_pressed(HOTKEYS) {
        return;
    }

    for mut painter in &mut painters {
        let session = &mut painter.session;

        if keyboard.just_pressed(KeyCode::KeyL) {
            session.edit_settings(|s| s.looped = !s.looped);
        }
        if keyboard.just_pressed(KeyCode::ArrowUp) {
            session.edit_settings(|s| s.lanes += 1);
        }
        if keyboard.just_pressed(KeyCode::ArrowDown) {
            session.edit_settings(|s| s.lanes = s.lanes.saturating_sub(1));
        }
        if keyboard.just_pressed(KeyCode::KeyC) {
            session.edit_settings(|s| s.skip_center_lane = !s.skip_center_lane);
        }
        if keyboard.just_pressed(KeyCode::KeyR) {
            session.edit_settings(|s| {
                s.instance_rotation = match s.instance_rotation {
                    InstanceRotation::Spline => InstanceRotation::Prefab,
                    InstanceRotation::Prefab => InstanceRotation::Identity,
                    InstanceRotation::Identity => InstanceRotation::Spline,
                };
            });
        }
        if keyboard.just_pressed(KeyCode::KeyA) {
            session.edit_settings(|s| s.attach_mode = s.attach_mode.toggle());
        }
        if keyboard.just_pressed(KeyCode::KeyN) {
            // Extend away from the origin at whichever end is closest
            let attach_mode = session.settings().attach_mode;
            let position = Vec3::new(12.0, 0.0, 0.0);
            session.add_control_point(position, attach_mode);
        }
        if keyboard.just_pressed(KeyCode::KeyX) {
            let last = session.settings().control_points.len().saturating_sub(1);
            session.remove_control_point(last);
        }
        if keyboard.just_pressed(KeyCode::KeyS) {
            let seed = session.seed().wrapping_add(1);
            session.reseed(seed);
        }
    }
}

fn show_help(keyboard: Res<ButtonInput<KeyCode>>, painters: Query<&SplinePainter>) {
    if !keyboard.just_pressed(KeyCode::KeyH) {
        return;
    }

    println!("\n=== Spline Painter Help ===");
    for painter in &painters {
        let settings = painter.session.settings();
        println!(
            "Points: {}  Lanes: {}  Loop: {}  Rotation: {}  Attach: {}  Instances: {}",
            settings.control_points.len(),
            settings.lanes,
            settings.looped,
            settings.instance_rotation.name(),
            settings.attach_mode.name(),
            painter.session.instances().len(),
        );
    }
    println!();
    println!("Controls:");
    println!("  H          - Show this help");
    println!("  L          - Toggle loop");
    println!("  Up/Down    - More/fewer lanes");
    println!("  C          - Toggle centre lane");
    println!("  R          - Cycle rotation mode");
    println!("  A          - Toggle attach mode");
    println!("  N          - Add control point");
    println!("  X          - Remove last control point");
    println!("  S          - Reseed");
    println!("========================\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Resource, Default)]
    struct ChangedPainters(usize);

    fn count_changed(
        painters: Query<(), Changed<SplinePainter>>,
        mut changed: ResMut<ChangedPainters>,
    ) {
        changed.0 = painters.iter().count();
    }

    fn hotkey_app() -> App {
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ChangedPainters>()
            .add_systems(Update, (handle_hotkeys, count_changed).chain());
        app.world_mut().spawn(SplinePainter::new(
            SplineSettings::new([Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)]),
            PrefabPalette::new([PrefabSettings::new("post")]),
        ));
        app
    }

    fn changed_count(app: &App) -> usize {
        app.world().resource::<ChangedPainters>().0
    }

    #[test]
    fn test_idle_hotkeys_leave_painters_unchanged() {
        let mut app = hotkey_app();
        app.update();
        assert_eq!(changed_count(&app), 1);

        app.update();
        assert_eq!(changed_count(&app), 0);
    }

    #[test]
    fn test_hotkey_edits_session() {
        let mut app = hotkey_app();
        app.update();

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyL);
        app.update();
        assert_eq!(changed_count(&app), 1);

        let looped = app
            .world_mut()
            .query::<&SplinePainter>()
            .single(app.world())
            .unwrap()
            .session
            .settings()
            .looped;
        assert!(looped);
    }
}
