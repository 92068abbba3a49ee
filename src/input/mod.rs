//! Input module turning pointer events into world-space points on the ground plane.
pub mod components;
pub mod events;
pub mod picking;
pub mod plugin;
pub mod systems;

pub use plugin::InputPlugin;
