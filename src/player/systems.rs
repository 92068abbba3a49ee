//! Systems spawning the player and resolving movement toward the target point.
use bevy::prelude::*;

use crate::{
    core::{config::GameConfig, session::SessionScoped, SimulationClock},
    input::components::TargetPoint,
    player::components::{
        resolve_target, DirectionArrow, Player, PlayerBody, TargetResolution, BODY_LENGTH,
        BODY_RADIUS,
    },
    scene::{release_entity, AssetSlot},
};

const BODY_COLOR: Color = Color::srgb(0.5, 0.0, 0.5);
const ARROW_COLOR: Color = Color::srgba(0.0, 1.0, 0.0, 0.7);

/// Entities and assets owned by the player, released together on teardown.
#[derive(Resource, Default)]
pub struct PlayerVisuals {
    player: Option<Entity>,
    arrow: Option<Entity>,
    body_mesh: AssetSlot<Mesh>,
    body_material: AssetSlot<StandardMaterial>,
    arrow_mesh: AssetSlot<Mesh>,
    arrow_material: AssetSlot<StandardMaterial>,
}

impl PlayerVisuals {
    /// Despawns the player and arrow and removes their assets. Safe to call twice.
    pub fn release(
        &mut self,
        commands: &mut Commands,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
    ) -> bool {
        let mut released = release_entity(commands, &mut self.player);
        released |= release_entity(commands, &mut self.arrow);
        released |= self.body_mesh.release(meshes);
        released |= self.arrow_mesh.release(meshes);
        released |= self.body_material.release(materials);
        released |= self.arrow_material.release(materials);
        released
    }
}

/// Spawns the player capsule at the configured spawn point plus its direction arrow.
pub fn spawn_player(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let body_mesh = meshes.add(Mesh::from(Capsule3d::new(BODY_RADIUS, BODY_LENGTH)));
    let body_material = materials.add(StandardMaterial {
        base_color: BODY_COLOR,
        ..default()
    });

    let player = commands
        .spawn((
            Player::new(config.player.speed),
            Transform::from_translation(config.player.spawn),
            Visibility::default(),
            SessionScoped,
            Name::new("Player"),
        ))
        .id();

    commands.spawn((
        Mesh3d(body_mesh.clone()),
        MeshMaterial3d(body_material.clone()),
        Transform::from_xyz(0.0, BODY_RADIUS + BODY_LENGTH * 0.5, 0.0),
        PlayerBody,
        ChildOf(player),
        Name::new("Player Body"),
    ));

    let arrow_mesh = meshes.add(Mesh::from(Cone::new(0.3, 1.0)));
    let arrow_material = materials.add(StandardMaterial {
        base_color: ARROW_COLOR,
        alpha_mode: AlphaMode::Blend,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    let arrow = commands
        .spawn((
            Mesh3d(arrow_mesh.clone()),
            MeshMaterial3d(arrow_material.clone()),
            Transform::from_translation(config.player.spawn),
            Visibility::Hidden,
            DirectionArrow::default(),
            SessionScoped,
            Name::new("Direction Arrow"),
        ))
        .id();

    commands.insert_resource(PlayerVisuals {
        player: Some(player),
        arrow: Some(arrow),
        body_mesh: AssetSlot::new(body_mesh),
        body_material: AssetSlot::new(body_material),
        arrow_mesh: AssetSlot::new(arrow_mesh),
        arrow_material: AssetSlot::new(arrow_material),
    });

    info!(
        "Player spawned at {:?} (speed {:.2} u/s)",
        config.player.spawn, config.player.speed
    );
}

/// Walks the player toward the target point and clears the target on arrival.
pub fn resolve_player_movement(
    clock: Res<SimulationClock>,
    mut target: ResMut<TargetPoint>,
    mut players: Query<(&mut Player, &mut Transform)>,
) {
    let Some(goal) = target.get() else {
        return;
    };
    let Ok((mut player, mut transform)) = players.single_mut() else {
        return;
    };

    match resolve_target(transform.translation, goal) {
        TargetResolution::Arrived => {
            target.clear();
            player.halt();
            info!("Player reached target {:?}", goal);
        }
        TargetResolution::Pursue(direction) => {
            player.advance(&mut transform, direction, clock.delta_secs());
        }
    }
}

/// Shows the arrow ahead of a moving player and hides it otherwise.
pub fn update_direction_arrow(
    players: Query<(&Player, &Transform)>,
    mut arrows: Query<(&DirectionArrow, &mut Transform, &mut Visibility), Without<Player>>,
) {
    let Ok((player, player_transform)) = players.single() else {
        return;
    };

    for (arrow, mut transform, mut visibility) in arrows.iter_mut() {
        match player.heading() {
            Some(heading) => {
                *transform = arrow.placement(player_transform.translation, heading);
                visibility.set_if_neq(Visibility::Visible);
            }
            None => {
                visibility.set_if_neq(Visibility::Hidden);
            }
        }
    }
}

/// Teardown: releases the player's entities and assets.
pub fn dispose_player(
    mut commands: Commands,
    visuals: Option<ResMut<PlayerVisuals>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(mut visuals) = visuals else {
        return;
    };
    if visuals.release(&mut commands, &mut meshes, &mut materials) {
        debug!("Player visuals released");
    }
}
