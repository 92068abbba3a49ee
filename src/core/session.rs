//! Session lifecycle: the running frame loop and its teardown as a single unit.
use bevy::{prelude::*, window::WindowCloseRequested};

use crate::scene::despawn_if_present;

/// Whether the per-frame stages are live.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Running,
    Closed,
}

/// Ordering inside `OnEnter(SessionState::Closed)`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeardownSet {
    /// Modules release their own entities and assets.
    Release,
    /// Leftover session entities are despawned and the app exits.
    Exit,
}

/// Marks root entities owned by the running session.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct SessionScoped;

/// Ends the session on Escape or when the window asks to close.
pub fn request_session_close(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut close_requests: MessageReader<WindowCloseRequested>,
    mut next_state: ResMut<NextState<SessionState>>,
) {
    let window_closing = close_requests.read().count() > 0;
    if window_closing || keyboard.just_pressed(KeyCode::Escape) {
        info!("Session close requested (window: {})", window_closing);
        next_state.set(SessionState::Closed);
    }
}

/// Despawns whatever session roots the modules did not release and exits.
pub fn finish_session(
    mut commands: Commands,
    scoped: Query<Entity, (With<SessionScoped>, Without<ChildOf>)>,
    mut exit: MessageWriter<AppExit>,
) {
    let mut remaining = 0;
    for entity in scoped.iter() {
        if despawn_if_present(&mut commands, entity) {
            remaining += 1;
        }
    }

    info!("Session torn down ({} leftover roots despawned)", remaining);
    exit.write(AppExit::Success);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    #[test]
    fn escape_closes_session_and_despawns_scoped_roots() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<SessionState>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_message::<WindowCloseRequested>()
            .add_message::<AppExit>()
            .add_systems(
                Update,
                request_session_close.run_if(in_state(SessionState::Running)),
            )
            .add_systems(OnEnter(SessionState::Closed), finish_session);

        let root = app.world_mut().spawn(SessionScoped).id();
        let child = app.world_mut().spawn(ChildOf(root)).id();
        let unrelated = app.world_mut().spawn_empty().id();

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Escape);
        app.update();
        app.update();

        assert_eq!(
            *app.world().resource::<State<SessionState>>().get(),
            SessionState::Closed
        );
        assert!(app.world().get_entity(root).is_err());
        assert!(app.world().get_entity(child).is_err());
        assert!(app.world().get_entity(unrelated).is_ok());
    }
}
