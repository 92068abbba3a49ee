//! ArenaPlugin wires spawning, shrinking, rebuilding, and disposal of the arena.
use bevy::prelude::*;

use crate::{
    arena::systems::{
        apply_arena_materials, dispose_arena, load_arena_textures, rebuild_arena_shapes,
        refresh_loaded_textures, shrink_arena, spawn_arena,
    },
    core::{
        session::{SessionState, TeardownSet},
        SimulationSet,
    },
};

pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (load_arena_textures, spawn_arena).chain())
            .add_systems(
                Update,
                (
                    shrink_arena.in_set(SimulationSet::Effects),
                    (
                        refresh_loaded_textures,
                        rebuild_arena_shapes,
                        apply_arena_materials,
                    )
                        .chain()
                        .in_set(SimulationSet::Presentation),
                ),
            )
            .add_systems(
                OnEnter(SessionState::Closed),
                dispose_arena.in_set(TeardownSet::Release),
            );
    }
}
