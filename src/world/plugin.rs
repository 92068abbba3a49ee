//! WorldPlugin coordinates lighting, the follow camera, and window resize handling.
use bevy::prelude::*;

use crate::{
    core::SimulationSet,
    world::systems::{
        apply_camera_projection, follow_player, spawn_world_environment, sync_viewport_on_resize,
    },
};

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_world_environment).add_systems(
            Update,
            (
                follow_player.in_set(SimulationSet::CameraFollow),
                (
                    sync_viewport_on_resize,
                    apply_camera_projection.after(sync_viewport_on_resize),
                )
                    .in_set(SimulationSet::Presentation),
            ),
        );
    }
}
