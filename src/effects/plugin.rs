//! EffectsPlugin wires the click indicator lifecycle into the frame stages.
use bevy::prelude::*;

use crate::{
    core::{
        session::{SessionState, TeardownSet},
        SimulationSet,
    },
    effects::{
        components::ActiveIndicators,
        systems::{
            dispose_click_indicators, setup_indicator_assets, spawn_click_indicators,
            tick_click_indicators,
        },
    },
    input::systems::sample_commit_point,
};

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveIndicators>()
            .add_systems(Startup, setup_indicator_assets)
            .add_systems(
                Update,
                (
                    spawn_click_indicators
                        .in_set(SimulationSet::Input)
                        .after(sample_commit_point),
                    tick_click_indicators.in_set(SimulationSet::Effects),
                ),
            )
            .add_systems(
                OnEnter(SessionState::Closed),
                dispose_click_indicators.in_set(TeardownSet::Release),
            );
    }
}
