// src/ui/tuning_panel/mod.rs
//
// Runtime tuning panel: grouped -/+ controls bound to camera, player, arena,
// and cursor parameters.

pub mod bindings;
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::TuningPanelPlugin;
