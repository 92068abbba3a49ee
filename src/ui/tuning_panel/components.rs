// src/ui/tuning_panel/components.rs
//
// Markers and resources for the tuning panel UI tree.

use bevy::prelude::*;

use super::bindings::ControlId;

/// Root node of the panel. F1 toggles its display.
#[derive(Component, Debug, Default)]
pub struct TuningPanel;

/// A `-` or `+` button nudging one control by `steps` increments.
#[derive(Component, Debug, Clone, Copy)]
pub struct ControlButton {
    pub control: ControlId,
    pub steps: f32,
}

/// Text node showing a control's current value.
#[derive(Component, Debug, Clone, Copy)]
pub struct ControlValueText(pub ControlId);

/// Layout settings for the panel.
#[derive(Resource, Debug, Clone)]
pub struct TuningPanelSettings {
    pub top_offset: f32,
    pub right_offset: f32,
    pub panel_width: f32,
    pub padding: f32,
    pub border_width: f32,
    pub header_font_size: f32,
    pub label_font_size: f32,
    pub button_size: f32,
    pub start_visible: bool,
}

impl Default for TuningPanelSettings {
    fn default() -> Self {
        Self {
            top_offset: 12.0,
            right_offset: 12.0,
            panel_width: 300.0,
            padding: 10.0,
            border_width: 2.0,
            header_font_size: 16.0,
            label_font_size: 13.0,
            button_size: 20.0,
            start_visible: true,
        }
    }
}

/// The spawned panel root, released on teardown.
#[derive(Resource, Debug, Default)]
pub struct TuningPanelRoot(pub Option<Entity>);
