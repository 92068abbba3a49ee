//! Messages emitted by the input sampler.
use bevy::prelude::*;

/// A secondary-button press landed on the ground at `point`.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct TargetCommitted {
    pub point: Vec3,
}
