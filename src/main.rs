use bevy::prelude::*;

mod arena;
mod core;
mod cursor;
mod effects;
mod input;
mod player;
mod scene;
mod ui;
mod world;

use crate::{
    arena::ArenaPlugin, core::CorePlugin, cursor::CursorPlugin, effects::EffectsPlugin,
    input::InputPlugin, player::PlayerPlugin, ui::TuningPanelPlugin, world::WorldPlugin,
};

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Lava Arena".to_string(),
                    // Keeps the browser context menu off the canvas so right click commits.
                    prevent_default_event_handling: true,
                    ..default()
                }),
                // Closing goes through the session teardown instead.
                close_when_requested: false,
                ..default()
            }),
            CorePlugin,
            WorldPlugin,
            InputPlugin,
            EffectsPlugin,
            PlayerPlugin,
            ArenaPlugin,
            CursorPlugin,
            TuningPanelPlugin, // After the spatial plugins so bindings find their components
        ))
        .run();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::session::SessionState,
        effects::components::ActiveIndicators,
        input::{components::TargetPoint, events::TargetCommitted},
        player::components::Player,
    };
    use bevy::{
        state::app::StatesPlugin,
        time::TimeUpdateStrategy,
        window::{CursorMoved, WindowCloseRequested, WindowResized},
    };
    use std::time::Duration;

    const FRAME: Duration = Duration::from_millis(100);

    fn scenario_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default(), StatesPlugin))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ButtonInput<MouseButton>>()
            .add_message::<CursorMoved>()
            .add_message::<WindowResized>()
            .add_message::<WindowCloseRequested>()
            .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
            .add_plugins((CorePlugin, InputPlugin, EffectsPlugin, PlayerPlugin));
        app.update();
        app
    }

    fn player_position(app: &mut App) -> Vec3 {
        let mut query = app
            .world_mut()
            .query_filtered::<&Transform, With<Player>>();
        query.single(app.world()).expect("player").translation
    }

    #[test]
    fn commit_spawns_indicator_and_walks_player_to_target() {
        let mut app = scenario_app();
        let goal = Vec3::new(3.0, 0.0, 4.0);

        app.world_mut()
            .resource_mut::<Messages<TargetCommitted>>()
            .write(TargetCommitted { point: goal });
        app.update();

        assert_eq!(app.world().resource::<TargetPoint>().get(), Some(goal));
        let indicators = app.world().resource::<ActiveIndicators>();
        assert_eq!(indicators.len(), 1);
        let indicator = *indicators.iter().next().expect("indicator");
        let at = app
            .world()
            .get::<Transform>(indicator)
            .expect("indicator transform")
            .translation;
        assert!((at.x - 3.0).abs() < 1e-6 && (at.z - 4.0).abs() < 1e-6);

        // One second of frames retires the indicator.
        for _ in 0..12 {
            app.update();
        }
        assert!(app.world().resource::<ActiveIndicators>().is_empty());
        assert!(app.world().resource::<TargetPoint>().get().is_some());

        // 5 units at 1.8 u/s.
        for _ in 0..60 {
            if app.world().resource::<TargetPoint>().get().is_none() {
                break;
            }
            app.update();
        }
        assert_eq!(app.world().resource::<TargetPoint>().get(), None);
        assert!(player_position(&mut app).distance(goal) < 0.1);
    }

    #[test]
    fn escape_tears_down_the_session() {
        let mut app = scenario_app();
        app.world_mut()
            .resource_mut::<Messages<TargetCommitted>>()
            .write(TargetCommitted {
                point: Vec3::new(1.0, 0.0, 1.0),
            });
        app.update();
        assert_eq!(app.world().resource::<ActiveIndicators>().len(), 1);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Escape);
        app.update();
        app.update();

        assert_eq!(
            *app.world().resource::<State<SessionState>>().get(),
            SessionState::Closed
        );
        assert!(app.world().resource::<ActiveIndicators>().is_empty());
        assert_eq!(app.world().resource::<TargetPoint>().get(), None);
        assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 0);
        assert_eq!(app.world().resource::<Assets<StandardMaterial>>().len(), 0);
        let mut players = app.world_mut().query::<&Player>();
        assert_eq!(players.iter(app.world()).count(), 0);
    }
}
