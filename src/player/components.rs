//! Components for the player capsule and its direction arrow.
use bevy::prelude::*;

use crate::core::config::ParamRange;

/// World units per second.
pub const PLAYER_SPEED_RANGE: ParamRange = ParamRange::new(0.06, 6.0);

/// Distance below which the player counts as having reached its target.
pub const ARRIVAL_EPSILON: f32 = 0.1;

/// Capsule radius and cylinder length of the player body.
pub const BODY_RADIUS: f32 = 0.5;
pub const BODY_LENGTH: f32 = 1.0;

/// The player-controlled entity. Its `Transform` sits on the ground plane; the
/// visible capsule is a child lifted so it stands on that point.
#[derive(Component, Debug, Clone)]
pub struct Player {
    speed: f32,
    facing: f32,
    heading: Option<Vec3>,
}

/// Result of a single [`Player::advance`] call.
#[cfg_attr(not(test), allow(dead_code))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    Stationary,
    Moved { heading: Vec3, step: f32 },
}

impl Player {
    pub fn new(speed: f32) -> Self {
        Self {
            speed: PLAYER_SPEED_RANGE.clamp(speed),
            facing: 0.0,
            heading: None,
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = PLAYER_SPEED_RANGE.clamp(speed);
    }

    /// Yaw in radians, `atan2(x, z)` of the last movement direction.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn facing(&self) -> f32 {
        self.facing
    }

    /// Normalized direction of the last movement, `None` while halted.
    pub fn heading(&self) -> Option<Vec3> {
        self.heading
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_moving(&self) -> bool {
        self.heading.is_some()
    }

    pub fn halt(&mut self) {
        self.heading = None;
    }

    /// Moves along `direction` (any length) for `delta_secs`.
    ///
    /// The step is `speed * delta_secs` along the normalized direction. It is capped
    /// at the length of `direction`, which guards against overshooting the target
    /// when a long frame or high speed would carry the player past it. A zero-length
    /// direction leaves the transform untouched and halts the player.
    pub fn advance(
        &mut self,
        transform: &mut Transform,
        direction: Vec3,
        delta_secs: f32,
    ) -> MoveOutcome {
        let distance = direction.length();
        let Some(heading) = direction.try_normalize() else {
            self.halt();
            return MoveOutcome::Stationary;
        };

        let step = (self.speed * delta_secs.max(0.0)).min(distance);
        transform.translation += heading * step;

        self.facing = heading.x.atan2(heading.z);
        transform.rotation = Quat::from_rotation_y(self.facing);
        self.heading = Some(heading);

        MoveOutcome::Moved { heading, step }
    }
}

/// What the movement stage should do about the current target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetResolution {
    Arrived,
    Pursue(Vec3),
}

pub fn resolve_target(position: Vec3, target: Vec3) -> TargetResolution {
    let direction = target - position;
    if direction.length() < ARRIVAL_EPSILON {
        TargetResolution::Arrived
    } else {
        TargetResolution::Pursue(direction)
    }
}

/// Marker for the visible capsule child of the player.
#[derive(Component, Debug, Default)]
pub struct PlayerBody;

/// Flat cone floating ahead of the player while it moves.
#[derive(Component, Debug, Clone)]
pub struct DirectionArrow {
    /// Distance ahead of the player along the heading.
    pub lead: f32,
    /// Height above the ground plane.
    pub hover: f32,
}

impl Default for DirectionArrow {
    fn default() -> Self {
        Self {
            lead: 1.2,
            hover: 0.1,
        }
    }
}

impl DirectionArrow {
    /// Arrow transform for a player at `position` heading along the unit vector `heading`.
    pub fn placement(&self, position: Vec3, heading: Vec3) -> Transform {
        let mut translation = position + heading * self.lead;
        translation.y = position.y + self.hover;
        Transform::from_translation(translation)
            .with_rotation(Quat::from_rotation_arc(Vec3::Y, heading))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn advance_moves_by_speed_along_normalized_direction() {
        let mut player = Player::new(2.0);
        let mut transform = Transform::default();

        let outcome = player.advance(&mut transform, Vec3::new(3.0, 0.0, 4.0), 0.5);

        assert!(transform.translation.distance(Vec3::new(0.6, 0.0, 0.8)) < 1e-5);
        assert!((player.facing() - 3f32.atan2(4.0)).abs() < 1e-6);
        assert!(player.is_moving());
        match outcome {
            MoveOutcome::Moved { heading, step } => {
                assert!((step - 1.0).abs() < 1e-6);
                assert!(heading.distance(Vec3::new(0.6, 0.0, 0.8)) < 1e-6);
            }
            MoveOutcome::Stationary => panic!("expected movement"),
        }
    }

    #[test]
    fn facing_follows_direction() {
        let mut player = Player::new(1.0);
        let mut transform = Transform::default();

        player.advance(&mut transform, Vec3::new(5.0, 0.0, 0.0), 0.1);
        assert!((player.facing() - FRAC_PI_2).abs() < 1e-6);

        player.advance(&mut transform, Vec3::new(0.0, 0.0, -5.0), 0.1);
        assert!((player.facing().abs() - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn zero_direction_leaves_position_and_halts() {
        let mut player = Player::new(1.0);
        let mut transform = Transform::from_xyz(1.0, 0.0, 1.0);
        player.advance(&mut transform, Vec3::X, 0.1);
        let before = transform.translation;

        let outcome = player.advance(&mut transform, Vec3::ZERO, 0.1);

        assert_eq!(outcome, MoveOutcome::Stationary);
        assert_eq!(transform.translation, before);
        assert!(!player.is_moving());
    }

    #[test]
    fn step_never_overshoots_target() {
        let mut player = Player::new(6.0);
        let mut transform = Transform::default();

        player.advance(&mut transform, Vec3::new(0.0, 0.0, 0.3), 1.0);
        assert!(transform.translation.distance(Vec3::new(0.0, 0.0, 0.3)) < 1e-6);
    }

    #[test]
    fn speed_is_clamped() {
        let mut player = Player::new(100.0);
        assert_eq!(player.speed(), PLAYER_SPEED_RANGE.max);
        player.set_speed(0.0);
        assert_eq!(player.speed(), PLAYER_SPEED_RANGE.min);
    }

    #[test]
    fn target_resolution_uses_arrival_epsilon() {
        assert_eq!(
            resolve_target(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.05)),
            TargetResolution::Arrived
        );
        assert_eq!(
            resolve_target(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0)),
            TargetResolution::Pursue(Vec3::new(0.0, 0.0, 5.0))
        );
        assert_eq!(
            resolve_target(Vec3::ZERO, Vec3::new(0.0, 0.0, ARRIVAL_EPSILON)),
            TargetResolution::Pursue(Vec3::new(0.0, 0.0, ARRIVAL_EPSILON))
        );
    }

    #[test]
    fn arrow_points_along_heading() {
        let arrow = DirectionArrow::default();
        let placement = arrow.placement(Vec3::new(1.0, 0.0, 1.0), Vec3::X);

        assert!(placement.translation.distance(Vec3::new(2.2, 0.1, 1.0)) < 1e-5);
        let tip = placement.rotation * Vec3::Y;
        assert!(tip.distance(Vec3::X) < 1e-5);
    }
}
