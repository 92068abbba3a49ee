//! Ray casting from the camera onto the ground plane.
use bevy::prelude::*;

/// Intersects `ray` with the horizontal plane `y = ground_height`.
///
/// Returns `None` when the ray runs parallel to the plane or points away from it.
pub fn ground_point(ray: Ray3d, ground_height: f32) -> Option<Vec3> {
    let plane_origin = Vec3::new(0.0, ground_height, 0.0);
    ray.intersect_plane(plane_origin, InfinitePlane3d::new(Vec3::Y))
        .map(|distance| ray.get_point(distance))
}

/// Unprojects a viewport position through `camera` onto the ground plane.
pub fn viewport_ground_point(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    viewport_position: Vec2,
    ground_height: f32,
) -> Option<Vec3> {
    let ray = camera
        .viewport_to_world(camera_transform, viewport_position)
        .ok()?;
    ground_point(ray, ground_height)
}
