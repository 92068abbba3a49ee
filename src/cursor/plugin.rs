//! CursorPlugin wires the target cursor into the presentation stage.
use bevy::prelude::*;

use crate::{
    core::{
        session::{SessionState, TeardownSet},
        SimulationSet,
    },
    cursor::systems::{
        apply_cursor_material, dispose_target_cursor, follow_hover_point, rebuild_cursor_rings,
        spawn_target_cursor,
    },
};

pub struct CursorPlugin;

impl Plugin for CursorPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_target_cursor)
            .add_systems(
                Update,
                (follow_hover_point, rebuild_cursor_rings, apply_cursor_material)
                    .in_set(SimulationSet::Presentation),
            )
            .add_systems(
                OnEnter(SessionState::Closed),
                dispose_target_cursor.in_set(TeardownSet::Release),
            );
    }
}
