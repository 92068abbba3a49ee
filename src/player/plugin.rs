//! Player plugin wiring spawning, movement, and the direction arrow.
use bevy::prelude::*;

use crate::{
    core::{
        session::{SessionState, TeardownSet},
        SimulationSet,
    },
    player::systems::{
        dispose_player, resolve_player_movement, spawn_player, update_direction_arrow,
    },
};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_player)
            .add_systems(
                Update,
                (
                    resolve_player_movement.in_set(SimulationSet::Movement),
                    update_direction_arrow.in_set(SimulationSet::Presentation),
                ),
            )
            .add_systems(
                OnEnter(SessionState::Closed),
                dispose_player.in_set(TeardownSet::Release),
            );
    }
}
