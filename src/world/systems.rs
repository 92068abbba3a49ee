//! Systems for the world module.
use bevy::{prelude::*, window::WindowResized};

use crate::{
    core::{config::GameConfig, session::SessionScoped},
    player::components::Player,
    world::components::FollowCamera,
};

/// Spawns the lights and the follow camera aimed at the player's spawn point.
pub fn spawn_world_environment(mut commands: Commands, config: Res<GameConfig>) {
    commands.spawn((
        DirectionalLight {
            illuminance: 12_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(5.0, 5.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
        SessionScoped,
        Name::new("Sun"),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 3_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(-8.0, 6.0, -4.0).looking_at(Vec3::ZERO, Vec3::Y),
        SessionScoped,
        Name::new("Fill Light"),
    ));

    let follow = FollowCamera::from_settings(&config.camera);
    let placement = follow.placement_for(config.player.spawn);
    let offset = follow.offset();

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: follow.fov_degrees().to_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        placement,
        follow,
        SessionScoped,
        Name::new("Follow Camera"),
    ));

    info!(
        "World environment spawned (camera offset {:?}, fov {:.0})",
        offset, config.camera.fov_degrees
    );
}

/// Places every follow camera at the player's position plus its offset, looking at the player.
pub fn follow_player(
    players: Query<&Transform, With<Player>>,
    mut cameras: Query<(&FollowCamera, &mut Transform), Without<Player>>,
) {
    let Ok(player_transform) = players.single() else {
        return;
    };
    let target = player_transform.translation;

    for (follow, mut transform) in cameras.iter_mut() {
        *transform = follow.placement_for(target);
    }
}

/// Pushes a changed field of view into the perspective projection.
pub fn apply_camera_projection(mut cameras: Query<(&mut FollowCamera, &mut Projection)>) {
    for (mut follow, mut projection) in cameras.iter_mut() {
        if !follow.projection_dirty() {
            continue;
        }
        follow.clear_projection_dirty();

        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.fov = follow.fov_degrees().to_radians();
            debug!("Camera fov set to {:.1} degrees", follow.fov_degrees());
        }
    }
}

/// Keeps the camera aspect ratio in step with the window after a resize.
pub fn sync_viewport_on_resize(
    mut resized: MessageReader<WindowResized>,
    mut cameras: Query<&mut Projection, With<FollowCamera>>,
) {
    let Some(latest) = resized.read().last() else {
        return;
    };
    if latest.height <= 0.0 || latest.width <= 0.0 {
        return;
    }

    let aspect_ratio = latest.width / latest.height;
    for mut projection in cameras.iter_mut() {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.aspect_ratio = aspect_ratio;
        }
    }
    debug!(
        "Viewport resized to {:.0}x{:.0} (aspect {:.3})",
        latest.width, latest.height, aspect_ratio
    );
}
