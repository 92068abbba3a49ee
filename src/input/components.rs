//! Shared pointer-derived state read by the simulation stages.
use bevy::prelude::*;

/// Height of the ground plane every pointer ray is intersected with.
pub const GROUND_HEIGHT: f32 = 0.0;

/// Where the player is walking to.
///
/// Written only by `apply_committed_target`; read and cleared only by the
/// movement stage once the player arrives.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct TargetPoint(Option<Vec3>);

impl TargetPoint {
    pub fn get(&self) -> Option<Vec3> {
        self.0
    }

    pub fn set(&mut self, point: Vec3) {
        self.0 = Some(point);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

/// Ground point under the pointer as of the last pointer move.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct HoverPoint(Option<Vec3>);

impl HoverPoint {
    pub fn get(&self) -> Option<Vec3> {
        self.0
    }

    pub fn set(&mut self, point: Vec3) {
        self.0 = Some(point);
    }
}
