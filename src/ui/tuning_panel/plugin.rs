// src/ui/tuning_panel/plugin.rs
//
// TuningPanelPlugin registers the panel resources and systems.

use bevy::prelude::*;

use crate::core::{
    session::{SessionState, TeardownSet},
    SimulationSet,
};

use super::components::{TuningPanelRoot, TuningPanelSettings};
use super::systems::{
    dispose_tuning_panel, handle_control_buttons, refresh_value_labels, spawn_tuning_panel,
    sync_live_values, toggle_tuning_panel,
};

pub struct TuningPanelPlugin;

impl Plugin for TuningPanelPlugin {
    fn build(&self, app: &mut App) {
        info!("TuningPanelPlugin registered");

        app.insert_resource(TuningPanelSettings::default())
            .insert_resource(TuningPanelRoot::default())
            .add_systems(Startup, spawn_tuning_panel)
            .add_systems(
                Update,
                (
                    (
                        toggle_tuning_panel,
                        (sync_live_values, handle_control_buttons).chain(),
                    )
                        .in_set(SimulationSet::Input),
                    refresh_value_labels.in_set(SimulationSet::Presentation),
                ),
            )
            .add_systems(
                OnEnter(SessionState::Closed),
                dispose_tuning_panel.in_set(TeardownSet::Release),
            );
    }
}
