//! Player module: the capsule walking toward the target point and its direction arrow.

pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::PlayerPlugin;
