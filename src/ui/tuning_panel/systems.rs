// src/ui/tuning_panel/systems.rs
//
// Systems for building the tuning panel, applying button presses, and tearing
// the panel down with the session.

use bevy::{ecs::hierarchy::ChildSpawnerCommands, prelude::*};

use crate::{
    arena::components::Arena, core::config::GameConfig, core::session::SessionScoped,
    scene::release_entity,
};

use super::bindings::{ControlBinding, ControlGroup, ControlId, TuningBindings};
use super::components::{
    ControlButton, ControlValueText, TuningPanel, TuningPanelRoot, TuningPanelSettings,
};

// Visual constants
const BACKGROUND_COLOR: Color = Color::srgba(0.1, 0.1, 0.1, 0.9);
const BORDER_COLOR: Color = Color::srgb(0.3, 0.3, 0.3);
const TEXT_COLOR: Color = Color::WHITE;
const HEADER_COLOR: Color = Color::srgb(1.0, 0.9, 0.4); // Yellow/gold
const BUTTON_COLOR: Color = Color::srgb(0.25, 0.25, 0.25);
const BUTTON_PRESSED_COLOR: Color = Color::srgb(0.45, 0.45, 0.45);

fn format_value(id: ControlId, value: f32) -> String {
    format!("{:.*}", id.precision(), value)
}

fn spawn_nudge_button(
    row: &mut ChildSpawnerCommands,
    settings: &TuningPanelSettings,
    font: &TextFont,
    control: ControlId,
    steps: f32,
    glyph: &str,
) {
    row.spawn((
        Button,
        Node {
            width: Val::Px(settings.button_size),
            height: Val::Px(settings.button_size),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(BUTTON_COLOR),
        ControlButton { control, steps },
    ))
    .with_children(|button| {
        button.spawn((Text::new(glyph), font.clone(), TextColor(TEXT_COLOR)));
    });
}

fn spawn_control_row(
    parent: &mut ChildSpawnerCommands,
    settings: &TuningPanelSettings,
    id: ControlId,
    binding: &ControlBinding,
) {
    let font = TextFont {
        font_size: settings.label_font_size,
        ..default()
    };

    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            column_gap: Val::Px(6.0),
            margin: UiRect::bottom(Val::Px(2.0)),
            ..default()
        })
        .with_children(|row| {
            row.spawn((
                Text::new(binding.label),
                font.clone(),
                TextColor(TEXT_COLOR),
                Node {
                    flex_grow: 1.0,
                    ..default()
                },
            ));

            spawn_nudge_button(row, settings, &font, id, -1.0, "-");
            row.spawn((
                Text::new(format_value(id, binding.value())),
                font.clone(),
                TextColor(TEXT_COLOR),
                Node {
                    width: Val::Px(52.0),
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                ControlValueText(id),
            ));
            spawn_nudge_button(row, settings, &font, id, 1.0, "+");
        });
}

/// Builds the bindings from the startup config and spawns the panel in the top-right corner.
pub fn spawn_tuning_panel(
    mut commands: Commands,
    config: Res<GameConfig>,
    settings: Res<TuningPanelSettings>,
    mut root: ResMut<TuningPanelRoot>,
) {
    let bindings = TuningBindings::from_config(&config);

    let panel = commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(settings.top_offset),
                right: Val::Px(settings.right_offset),
                width: Val::Px(settings.panel_width),
                padding: UiRect::all(Val::Px(settings.padding)),
                border: UiRect::all(Val::Px(settings.border_width)),
                flex_direction: FlexDirection::Column,
                display: if settings.start_visible {
                    Display::Flex
                } else {
                    Display::None
                },
                ..default()
            },
            BackgroundColor(BACKGROUND_COLOR),
            BorderColor::from(BORDER_COLOR),
            TuningPanel,
            SessionScoped,
        ))
        .with_children(|parent| {
            for group in ControlGroup::ALL {
                // Group header
                parent.spawn((
                    Text::new(group.title()),
                    TextFont {
                        font_size: settings.header_font_size,
                        ..default()
                    },
                    TextColor(HEADER_COLOR),
                    Node {
                        margin: UiRect::vertical(Val::Px(4.0)),
                        ..default()
                    },
                ));

                for (id, binding) in bindings.group(group) {
                    spawn_control_row(parent, &settings, id, binding);
                }
            }
        })
        .id();

    info!("Tuning panel spawned with {} controls", bindings.len());
    root.0 = Some(panel);
    commands.insert_resource(bindings);
}

/// Pulls values that change outside the panel back into the bindings, so a
/// press nudges from what is live (the arena shrinks on its own).
pub fn sync_live_values(bindings: Option<ResMut<TuningBindings>>, arenas: Query<&Arena>) {
    let Some(mut bindings) = bindings else {
        return;
    };
    let Ok(arena) = arenas.single() else {
        return;
    };
    if bindings.is_stale(ControlId::ArenaSize, arena.size()) {
        bindings.sync(ControlId::ArenaSize, arena.size());
    }
}

/// Nudges the pressed control and queues its setter for this frame.
pub fn handle_control_buttons(
    mut commands: Commands,
    bindings: Option<ResMut<TuningBindings>>,
    mut buttons: Query<(&Interaction, &ControlButton, &mut BackgroundColor), Changed<Interaction>>,
) {
    let Some(mut bindings) = bindings else {
        return;
    };

    for (interaction, button, mut background) in buttons.iter_mut() {
        match interaction {
            Interaction::Pressed => {
                background.0 = BUTTON_PRESSED_COLOR;
                let Some((value, setter)) = bindings.nudge(button.control, button.steps) else {
                    continue;
                };
                debug!("{} -> {}", button.control, value);
                commands.queue(move |world: &mut World| setter(world, value));
            }
            _ => background.0 = BUTTON_COLOR,
        }
    }
}

/// Keeps the value labels in sync with the bindings.
pub fn refresh_value_labels(
    bindings: Option<Res<TuningBindings>>,
    mut labels: Query<(&ControlValueText, &mut Text)>,
) {
    let Some(bindings) = bindings else {
        return;
    };
    if !bindings.is_changed() {
        return;
    }

    for (label, mut text) in labels.iter_mut() {
        if let Some(binding) = bindings.get(label.0) {
            let formatted = format_value(label.0, binding.value());
            if text.0 != formatted {
                text.0 = formatted;
            }
        }
    }
}

/// F1 shows or hides the panel.
pub fn toggle_tuning_panel(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut panels: Query<&mut Node, With<TuningPanel>>,
) {
    if !keyboard.just_pressed(KeyCode::F1) {
        return;
    }

    for mut node in panels.iter_mut() {
        node.display = match node.display {
            Display::None => Display::Flex,
            _ => Display::None,
        };
    }
}

/// Teardown: drops every binding and despawns the panel.
pub fn dispose_tuning_panel(
    mut commands: Commands,
    bindings: Option<ResMut<TuningBindings>>,
    mut root: ResMut<TuningPanelRoot>,
) {
    if let Some(mut bindings) = bindings {
        bindings.clear();
    }
    if release_entity(&mut commands, &mut root.0) {
        debug!("Tuning panel disposed");
    }
}
