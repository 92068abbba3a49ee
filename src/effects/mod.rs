//! Ephemeral click indicators: short-lived ripples spawned where a target is committed.
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::EffectsPlugin;
