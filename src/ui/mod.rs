// src/ui/mod.rs
//
// UI module providing screen-space UI elements.
//
// Current features:
// - Tuning panel (top-right grouped controls for camera, player, arena, cursor)

pub mod tuning_panel;

// Re-export the main plugin
pub use tuning_panel::TuningPanelPlugin;
