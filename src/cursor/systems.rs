//! Systems spawning the target cursor and keeping it under the pointer.
use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use crate::{
    core::{config::GameConfig, session::SessionScoped},
    cursor::components::{CursorResources, CursorRing, TargetCursor, CURSOR_HOVER},
    input::components::HoverPoint,
    scene::AssetSlot,
};

const RING_RESOLUTION: u32 = 32;

fn ring_mesh((inner, outer): (f32, f32)) -> Mesh {
    Annulus::new(inner, outer)
        .mesh()
        .resolution(RING_RESOLUTION)
        .build()
        .rotated_by(Quat::from_rotation_x(-FRAC_PI_2))
}

fn cursor_color(cursor: &TargetCursor) -> Color {
    cursor.color().with_alpha(cursor.opacity())
}

/// Spawns the cursor hidden; it appears with the first hover point.
pub fn spawn_target_cursor(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let cursor = TargetCursor::from_settings(&config.cursor);

    let outer_mesh = meshes.add(ring_mesh(cursor.outer_ring()));
    let inner_mesh = meshes.add(ring_mesh(cursor.inner_ring()));
    let material = materials.add(StandardMaterial {
        base_color: cursor_color(&cursor),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    let root = commands
        .spawn((
            cursor,
            Transform::from_xyz(0.0, CURSOR_HOVER, 0.0),
            Visibility::Hidden,
            SessionScoped,
            Name::new("Target Cursor"),
        ))
        .id();

    for (ring, mesh) in [
        (CursorRing::Outer, outer_mesh.clone()),
        (CursorRing::Inner, inner_mesh.clone()),
    ] {
        commands.spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material.clone()),
            Transform::default(),
            ring,
            ChildOf(root),
        ));
    }

    commands.insert_resource(CursorResources {
        root: Some(root),
        outer_mesh: AssetSlot::new(outer_mesh),
        inner_mesh: AssetSlot::new(inner_mesh),
        material: AssetSlot::new(material),
    });
}

/// Moves the cursor to the hover point, keeping it just above the ground.
pub fn follow_hover_point(
    hover: Res<HoverPoint>,
    mut cursors: Query<(&mut Transform, &mut Visibility), With<TargetCursor>>,
) {
    let Some(point) = hover.get() else {
        return;
    };
    let Ok((mut transform, mut visibility)) = cursors.single_mut() else {
        return;
    };

    transform.translation = Vec3::new(point.x, CURSOR_HOVER, point.z);
    visibility.set_if_neq(Visibility::Visible);
}

/// Rebuilds both rings after a size change.
pub fn rebuild_cursor_rings(
    mut cursors: Query<&mut TargetCursor>,
    resources: Option<ResMut<CursorResources>>,
    mut rings: Query<(&CursorRing, &mut Mesh3d)>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let Some(mut resources) = resources else {
        return;
    };
    let Ok(mut cursor) = cursors.single_mut() else {
        return;
    };
    if !cursor.take_shape_dirty() {
        return;
    }

    let outer = meshes.add(ring_mesh(cursor.outer_ring()));
    let outer = resources.outer_mesh.replace(outer, &mut meshes);
    let inner = meshes.add(ring_mesh(cursor.inner_ring()));
    let inner = resources.inner_mesh.replace(inner, &mut meshes);

    for (ring, mut mesh) in rings.iter_mut() {
        mesh.0 = match ring {
            CursorRing::Outer => outer.clone(),
            CursorRing::Inner => inner.clone(),
        };
    }
    debug!("Target cursor rebuilt at size {:.2}", cursor.size());
}

/// Writes color and opacity into the shared ring material.
pub fn apply_cursor_material(
    mut cursors: Query<&mut TargetCursor>,
    resources: Option<Res<CursorResources>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(resources) = resources else {
        return;
    };
    let Ok(mut cursor) = cursors.single_mut() else {
        return;
    };
    if !cursor.take_material_dirty() {
        return;
    }

    if let Some(material) = resources
        .material
        .handle()
        .and_then(|handle| materials.get_mut(handle))
    {
        material.base_color = cursor_color(&cursor);
    }
}

/// Teardown: despawns the cursor and removes its meshes and material.
pub fn dispose_target_cursor(
    mut commands: Commands,
    resources: Option<ResMut<CursorResources>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(mut resources) = resources else {
        return;
    };
    if resources.release(&mut commands, &mut meshes, &mut materials) {
        debug!("Target cursor disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::{ecs::system::RunSystemOnce, mesh::VertexAttributeValues};

    fn cursor_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .insert_resource(GameConfig::default())
            .init_resource::<HoverPoint>()
            .add_systems(Startup, spawn_target_cursor)
            .add_systems(
                Update,
                (follow_hover_point, rebuild_cursor_rings, apply_cursor_material).chain(),
            );
        app.update();
        app
    }

    fn with_cursor(app: &mut App, f: impl FnOnce(&mut TargetCursor)) {
        let mut query = app.world_mut().query::<&mut TargetCursor>();
        let mut cursor = query.single_mut(app.world_mut()).expect("cursor");
        f(&mut *cursor);
    }

    fn outer_radius(mesh: &Mesh) -> f32 {
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            return 0.0;
        };
        positions
            .iter()
            .map(|p| Vec2::new(p[0], p[2]).length())
            .fold(0.0, f32::max)
    }

    #[test]
    fn cursor_hidden_until_hover_then_follows() {
        let mut app = cursor_app();
        let mut query = app
            .world_mut()
            .query_filtered::<(&Transform, &Visibility), With<TargetCursor>>();
        let (_, visibility) = query.single(app.world()).expect("cursor");
        assert_eq!(*visibility, Visibility::Hidden);

        app.world_mut()
            .resource_mut::<HoverPoint>()
            .set(Vec3::new(2.0, 0.0, -3.0));
        app.update();

        let (transform, visibility) = query.single(app.world()).expect("cursor");
        assert_eq!(*visibility, Visibility::Visible);
        assert_eq!(transform.translation, Vec3::new(2.0, CURSOR_HOVER, -3.0));
    }

    #[test]
    fn set_size_rebuilds_both_rings() {
        let mut app = cursor_app();
        with_cursor(&mut app, |cursor| cursor.set_size(1.5));
        app.update();

        assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 2);

        let mut query = app.world_mut().query::<(&CursorRing, &Mesh3d)>();
        let rings: Vec<_> = query
            .iter(app.world())
            .map(|(ring, mesh)| (*ring, mesh.0.clone()))
            .collect();
        let meshes = app.world().resource::<Assets<Mesh>>();
        for (ring, handle) in rings {
            let radius = outer_radius(meshes.get(&handle).expect("ring mesh"));
            let expected = match ring {
                CursorRing::Outer => 1.5,
                CursorRing::Inner => 0.6,
            };
            assert!((radius - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn color_and_opacity_mutate_shared_material() {
        let mut app = cursor_app();
        with_cursor(&mut app, |cursor| {
            cursor.set_color(Color::srgb(1.0, 0.0, 0.0));
            cursor.set_opacity(0.5);
        });
        app.update();

        let materials = app.world().resource::<Assets<StandardMaterial>>();
        assert_eq!(materials.len(), 1);
        let (_, material) = materials.iter().next().expect("material");
        assert_eq!(material.base_color, Color::srgba(1.0, 0.0, 0.0, 0.5));
    }

    #[test]
    fn dispose_is_idempotent() {
        let mut app = cursor_app();
        app.world_mut()
            .run_system_once(dispose_target_cursor)
            .expect("first dispose");
        app.world_mut()
            .run_system_once(dispose_target_cursor)
            .expect("second dispose");

        assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 0);
        assert_eq!(app.world().resource::<Assets<StandardMaterial>>().len(), 0);
        let mut rings = app.world_mut().query::<&CursorRing>();
        assert_eq!(rings.iter(app.world()).count(), 0);
    }
}
