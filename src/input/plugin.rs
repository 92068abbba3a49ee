//! InputPlugin registers pointer state and the sampling systems.
use bevy::prelude::*;

use crate::{
    core::{
        session::{SessionState, TeardownSet},
        SimulationSet,
    },
    input::{
        components::{HoverPoint, TargetPoint},
        events::TargetCommitted,
        systems::{
            apply_committed_target, reset_pointer_state, sample_commit_point, sample_hover_point,
        },
    },
};

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TargetPoint>()
            .init_resource::<HoverPoint>()
            .add_message::<TargetCommitted>()
            .add_systems(
                Update,
                (
                    sample_hover_point,
                    sample_commit_point,
                    apply_committed_target.after(sample_commit_point),
                )
                    .in_set(SimulationSet::Input),
            )
            .add_systems(
                OnEnter(SessionState::Closed),
                reset_pointer_state.in_set(TeardownSet::Release),
            );
    }
}
