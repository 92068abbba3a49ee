//! Hover and commit sampling of the pointer against the ground plane.
use bevy::{
    prelude::*,
    window::{CursorMoved, PrimaryWindow},
};

use crate::{
    input::{
        components::{HoverPoint, TargetPoint, GROUND_HEIGHT},
        events::TargetCommitted,
        picking::viewport_ground_point,
    },
    world::components::FollowCamera,
};

/// Updates the hover point from the last pointer move of the frame.
///
/// Pointer positions that miss the ground keep the previous hover point.
pub fn sample_hover_point(
    mut cursor_moves: MessageReader<CursorMoved>,
    cameras: Query<(&Camera, &GlobalTransform), With<FollowCamera>>,
    mut hover: ResMut<HoverPoint>,
) {
    let Ok((camera, camera_transform)) = cameras.single() else {
        cursor_moves.clear();
        return;
    };

    let moves = cursor_moves.read().map(|moved| moved.position);
    update_hover(&mut hover, moves, |position| {
        viewport_ground_point(camera, camera_transform, position, GROUND_HEIGHT)
    });
}

/// Emits [`TargetCommitted`] when the secondary button is pressed over the ground.
pub fn sample_commit_point(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<FollowCamera>>,
    mut commits: MessageWriter<TargetCommitted>,
) {
    if !mouse_buttons.just_pressed(MouseButton::Right) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    let commit = commit_at(cursor, |position| {
        viewport_ground_point(camera, camera_transform, position, GROUND_HEIGHT)
    });
    match commit {
        Some(commit) => {
            commits.write(commit);
        }
        None => debug!("Right click at {:?} missed the ground plane", cursor),
    }
}

/// Projects the last of `moves` onto the ground. A miss, or no move at all,
/// leaves `hover` untouched.
fn update_hover(
    hover: &mut HoverPoint,
    moves: impl Iterator<Item = Vec2>,
    project: impl Fn(Vec2) -> Option<Vec3>,
) {
    if let Some(point) = moves.last().and_then(project) {
        hover.set(point);
    }
}

fn commit_at(cursor: Vec2, project: impl Fn(Vec2) -> Option<Vec3>) -> Option<TargetCommitted> {
    project(cursor).map(|point| TargetCommitted { point })
}

/// Sole writer of [`TargetPoint`]: the last commit of the frame wins.
pub fn apply_committed_target(
    mut commits: MessageReader<TargetCommitted>,
    mut target: ResMut<TargetPoint>,
) {
    if let Some(latest) = commits.read().last() {
        target.set(latest.point);
        info!("Movement target set to {:?}", latest.point);
    }
}

/// Teardown: drops any pending target.
pub fn reset_pointer_state(mut target: ResMut<TargetPoint>) {
    target.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ground stand-in: screen `x` maps to world `x`, screen `y` to world
    /// `z`; anything left of the origin misses.
    fn right_half_plane(position: Vec2) -> Option<Vec3> {
        (position.x >= 0.0).then(|| Vec3::new(position.x, GROUND_HEIGHT, position.y))
    }

    #[test]
    fn hover_follows_last_move() {
        let mut hover = HoverPoint::default();
        let moves = [Vec2::new(1.0, 2.0), Vec2::new(5.0, 6.0)];

        update_hover(&mut hover, moves.into_iter(), right_half_plane);

        assert_eq!(hover.get(), Some(Vec3::new(5.0, 0.0, 6.0)));
    }

    #[test]
    fn hover_miss_keeps_previous_point() {
        let mut hover = HoverPoint::default();
        hover.set(Vec3::new(3.0, 0.0, 3.0));

        let moves = [Vec2::new(8.0, 8.0), Vec2::new(-4.0, 1.0)];
        update_hover(&mut hover, moves.into_iter(), right_half_plane);
        assert_eq!(hover.get(), Some(Vec3::new(3.0, 0.0, 3.0)));

        update_hover(&mut hover, std::iter::empty(), right_half_plane);
        assert_eq!(hover.get(), Some(Vec3::new(3.0, 0.0, 3.0)));
    }

    #[test]
    fn press_over_ground_commits_point() {
        let commit = commit_at(Vec2::new(2.0, 7.0), right_half_plane);
        assert_eq!(commit.map(|c| c.point), Some(Vec3::new(2.0, 0.0, 7.0)));

        assert!(commit_at(Vec2::new(-1.0, 7.0), right_half_plane).is_none());
    }

    #[test]
    fn committed_point_reaches_target() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<TargetPoint>()
            .add_message::<TargetCommitted>()
            .add_systems(Update, apply_committed_target);

        let commit = commit_at(Vec2::new(4.0, 9.0), right_half_plane).expect("ground hit");
        app.world_mut()
            .resource_mut::<Messages<TargetCommitted>>()
            .write(commit);
        app.update();

        assert_eq!(
            app.world().resource::<TargetPoint>().get(),
            Some(Vec3::new(4.0, 0.0, 9.0))
        );
    }

    #[test]
    fn last_commit_of_frame_wins() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<TargetPoint>()
            .add_message::<TargetCommitted>()
            .add_systems(Update, apply_committed_target);

        {
            let mut messages = app.world_mut().resource_mut::<Messages<TargetCommitted>>();
            messages.write(TargetCommitted {
                point: Vec3::new(1.0, 0.0, 1.0),
            });
            messages.write(TargetCommitted {
                point: Vec3::new(3.0, 0.0, 4.0),
            });
        }
        app.update();

        assert_eq!(
            app.world().resource::<TargetPoint>().get(),
            Some(Vec3::new(3.0, 0.0, 4.0))
        );
    }

    #[test]
    fn no_commit_keeps_existing_target() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<TargetPoint>()
            .add_message::<TargetCommitted>()
            .add_systems(Update, apply_committed_target);

        app.world_mut()
            .resource_mut::<TargetPoint>()
            .set(Vec3::new(2.0, 0.0, 2.0));
        app.update();

        assert_eq!(
            app.world().resource::<TargetPoint>().get(),
            Some(Vec3::new(2.0, 0.0, 2.0))
        );
    }

    #[test]
    fn left_click_and_missing_window_commit_nothing() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ButtonInput<MouseButton>>()
            .add_message::<TargetCommitted>()
            .add_systems(Update, sample_commit_point);

        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app.update();
        assert!(app.world().resource::<Messages<TargetCommitted>>().is_empty());

        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Right);
        app.update();
        assert!(app.world().resource::<Messages<TargetCommitted>>().is_empty());
    }
}
