//! Systems spawning, animating, and disposing click indicators.
use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use crate::{
    core::{config::GameConfig, session::SessionScoped, SimulationClock},
    effects::components::{
        ActiveIndicators, ClickIndicator, IndicatorAssets, IndicatorCenter, IndicatorRing,
        IndicatorVisuals, CENTER_RADIUS, INDICATOR_HOVER, RING_INNER_RADIUS, RING_OUTER_RADIUS,
    },
    input::events::TargetCommitted,
    scene::{despawn_if_present, AssetSlot},
};

/// Builds the shared ring and center meshes.
pub fn setup_indicator_assets(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let ring_mesh = meshes.add(
        Annulus::new(RING_INNER_RADIUS, RING_OUTER_RADIUS)
            .mesh()
            .resolution(32)
            .build(),
    );
    let center_mesh = meshes.add(Circle::new(CENTER_RADIUS).mesh().resolution(32).build());

    commands.insert_resource(IndicatorAssets {
        ring_mesh: AssetSlot::new(ring_mesh),
        center_mesh: AssetSlot::new(center_mesh),
        color: config.indicator.color,
        lifetime_secs: config.indicator.lifetime_secs,
        base_opacity: config.indicator.base_opacity,
    });
}

fn indicator_material(color: Color, opacity: f32) -> StandardMaterial {
    StandardMaterial {
        base_color: color.with_alpha(opacity),
        alpha_mode: AlphaMode::Blend,
        double_sided: true,
        cull_mode: None,
        ..default()
    }
}

fn flat_on_ground() -> Transform {
    Transform::from_rotation(Quat::from_rotation_x(-FRAC_PI_2))
}

/// Spawns one indicator per committed target point.
pub fn spawn_click_indicators(
    mut commands: Commands,
    mut commits: MessageReader<TargetCommitted>,
    assets: Option<Res<IndicatorAssets>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut active: ResMut<ActiveIndicators>,
) {
    let Some(assets) = assets else {
        commits.clear();
        return;
    };
    let (Some(ring_mesh), Some(center_mesh)) =
        (assets.ring_mesh.handle(), assets.center_mesh.handle())
    else {
        commits.clear();
        return;
    };

    for commit in commits.read() {
        let ring_material = materials.add(indicator_material(assets.color, assets.base_opacity));
        let center_material =
            materials.add(indicator_material(assets.color, assets.base_opacity));

        let mut position = commit.point;
        position.y += INDICATOR_HOVER;

        let root = commands
            .spawn((
                ClickIndicator::new(assets.lifetime_secs, assets.base_opacity),
                Transform::from_translation(position),
                Visibility::default(),
                SessionScoped,
                Name::new("Click Indicator"),
            ))
            .id();

        let ring = commands
            .spawn((
                Mesh3d(ring_mesh.clone()),
                MeshMaterial3d(ring_material.clone()),
                flat_on_ground(),
                IndicatorRing,
                ChildOf(root),
            ))
            .id();

        commands.spawn((
            Mesh3d(center_mesh.clone()),
            MeshMaterial3d(center_material.clone()),
            flat_on_ground(),
            IndicatorCenter,
            ChildOf(root),
        ));

        commands.entity(root).insert(IndicatorVisuals {
            ring: Some(ring),
            ring_material: AssetSlot::new(ring_material),
            center_material: AssetSlot::new(center_material),
        });

        active.push(root);
        debug!(
            "Click indicator spawned at {:?} ({} active)",
            commit.point,
            active.len()
        );
    }
}

/// Advances every indicator; expired ones release their materials, despawn, and
/// leave the queue in the same pass.
pub fn tick_click_indicators(
    mut commands: Commands,
    clock: Res<SimulationClock>,
    mut active: ResMut<ActiveIndicators>,
    mut indicators: Query<(&mut ClickIndicator, &mut IndicatorVisuals)>,
    mut rings: Query<&mut Transform, With<IndicatorRing>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if active.is_empty() {
        return;
    }
    let delta = clock.delta_secs();

    active.retain(|&entity| {
        let Ok((mut indicator, mut visuals)) = indicators.get_mut(entity) else {
            return false;
        };

        if !indicator.advance(delta) {
            visuals.release(&mut materials);
            despawn_if_present(&mut commands, entity);
            return false;
        }

        let opacity = indicator.opacity();
        for handle in [visuals.ring_material.handle(), visuals.center_material.handle()]
            .into_iter()
            .flatten()
        {
            if let Some(material) = materials.get_mut(handle) {
                material.base_color.set_alpha(opacity);
            }
        }

        if let Some(ring) = visuals.ring {
            if let Ok(mut transform) = rings.get_mut(ring) {
                transform.scale = Vec3::splat(indicator.ring_scale());
            }
        }
        true
    });
}

/// Teardown: disposes every live indicator and the shared meshes.
pub fn dispose_click_indicators(
    mut commands: Commands,
    mut active: ResMut<ActiveIndicators>,
    mut indicators: Query<&mut IndicatorVisuals>,
    assets: Option<ResMut<IndicatorAssets>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut disposed = 0;
    for entity in active.drain() {
        if let Ok(mut visuals) = indicators.get_mut(entity) {
            visuals.release(&mut materials);
        }
        if despawn_if_present(&mut commands, entity) {
            disposed += 1;
        }
    }

    if let Some(mut assets) = assets {
        assets.ring_mesh.release(&mut meshes);
        assets.center_mesh.release(&mut meshes);
    }

    if disposed > 0 {
        debug!("Disposed {} click indicators", disposed);
    }
}
