//! Components used by the world module.
use bevy::prelude::*;

use crate::core::config::{CameraSettings, ParamRange};

pub const CAMERA_HEIGHT_RANGE: ParamRange = ParamRange::new(10.0, 100.0);
pub const CAMERA_DISTANCE_RANGE: ParamRange = ParamRange::new(10.0, 100.0);
pub const CAMERA_FOV_RANGE: ParamRange = ParamRange::new(30.0, 120.0);

/// The primary camera, trailing the player at a fixed offset.
#[derive(Component, Debug, Clone)]
pub struct FollowCamera {
    offset: Vec3,
    fov_degrees: f32,
    projection_dirty: bool,
}

impl FollowCamera {
    pub fn new(height: f32, distance: f32, fov_degrees: f32) -> Self {
        Self {
            offset: Vec3::new(
                0.0,
                CAMERA_HEIGHT_RANGE.clamp(height),
                CAMERA_DISTANCE_RANGE.clamp(distance),
            ),
            fov_degrees: CAMERA_FOV_RANGE.clamp(fov_degrees),
            projection_dirty: true,
        }
    }

    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self::new(settings.height, settings.distance, settings.fov_degrees)
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    /// Vertical component of the offset.
    pub fn set_height(&mut self, height: f32) {
        self.offset.y = CAMERA_HEIGHT_RANGE.clamp(height);
    }

    /// Depth (z) component of the offset.
    pub fn set_distance(&mut self, distance: f32) {
        self.offset.z = CAMERA_DISTANCE_RANGE.clamp(distance);
    }

    pub fn set_fov(&mut self, fov_degrees: f32) {
        self.fov_degrees = CAMERA_FOV_RANGE.clamp(fov_degrees);
        self.projection_dirty = true;
    }

    pub fn projection_dirty(&self) -> bool {
        self.projection_dirty
    }

    pub fn clear_projection_dirty(&mut self) {
        self.projection_dirty = false;
    }

    /// Camera placement for a player standing at `target`.
    pub fn placement_for(&self, target: Vec3) -> Transform {
        Transform::from_translation(target + self.offset).looking_at(target, Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_axes_are_independent() {
        let mut camera = FollowCamera::new(50.0, 25.0, 75.0);
        camera.set_height(30.0);
        assert_eq!(camera.offset(), Vec3::new(0.0, 30.0, 25.0));

        camera.set_distance(60.0);
        assert_eq!(camera.offset(), Vec3::new(0.0, 30.0, 60.0));
    }

    #[test]
    fn setters_clamp_to_ranges() {
        let mut camera = FollowCamera::new(500.0, 1.0, 200.0);
        assert_eq!(camera.offset().y, CAMERA_HEIGHT_RANGE.max);
        assert_eq!(camera.offset().z, CAMERA_DISTANCE_RANGE.min);
        assert_eq!(camera.fov_degrees(), CAMERA_FOV_RANGE.max);

        camera.clear_projection_dirty();
        camera.set_fov(10.0);
        assert_eq!(camera.fov_degrees(), CAMERA_FOV_RANGE.min);
        assert!(camera.projection_dirty());
    }

    #[test]
    fn placement_looks_at_target() {
        let camera = FollowCamera::new(50.0, 25.0, 75.0);
        let target = Vec3::new(3.0, 0.0, -4.0);
        let placement = camera.placement_for(target);

        assert_eq!(placement.translation, Vec3::new(3.0, 50.0, 21.0));
        let towards_target = (target - placement.translation).normalize();
        assert!(placement.forward().as_vec3().distance(towards_target) < 1e-4);
    }
}
