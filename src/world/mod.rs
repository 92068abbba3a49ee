//! World module housing lights, the follow camera, and viewport handling.
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::WorldPlugin;
