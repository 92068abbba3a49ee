//! Mesh builders for the arena pieces. All meshes are built lying on the XZ plane.
use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use crate::arena::components::Arena;

const LAVA_FIELD_RESOLUTION: u32 = 96;
const BOUNDARY_MINOR_RESOLUTION: usize = 16;
const BOUNDARY_MAJOR_RESOLUTION: usize = 100;

/// Textured ground square with tangents for the normal map.
pub fn ground_mesh(arena: &Arena) -> Mesh {
    let mut mesh = Plane3d::default()
        .mesh()
        .size(arena.size(), arena.size())
        .build();
    if let Err(err) = mesh.generate_tangents() {
        warn!("Ground mesh tangent generation failed: {err}");
    }
    mesh
}

/// Flat lava annulus filling everything between the ground edge and the far lava rim.
pub fn lava_field_mesh(arena: &Arena) -> Mesh {
    Annulus::new(arena.lava_inner_radius(), arena.lava_outer_radius())
        .mesh()
        .resolution(LAVA_FIELD_RESOLUTION)
        .build()
        .rotated_by(Quat::from_rotation_x(-FRAC_PI_2))
}

/// Glowing torus tracing the ground edge.
pub fn boundary_mesh(arena: &Arena) -> Mesh {
    Torus {
        minor_radius: arena.boundary_minor_radius(),
        major_radius: arena.boundary_major_radius(),
    }
    .mesh()
    .minor_resolution(BOUNDARY_MINOR_RESOLUTION)
    .major_resolution(BOUNDARY_MAJOR_RESOLUTION)
    .build()
}

/// Largest horizontal distance of any vertex from the origin, plus the vertical span.
#[cfg(test)]
pub fn mesh_extents(mesh: &Mesh) -> (f32, f32) {
    use bevy::mesh::VertexAttributeValues;

    let Some(VertexAttributeValues::Float32x3(positions)) =
        mesh.attribute(Mesh::ATTRIBUTE_POSITION)
    else {
        return (0.0, 0.0);
    };

    positions.iter().fold((0.0_f32, 0.0_f32), |(radius, height), p| {
        (
            radius.max(Vec2::new(p[0], p[2]).length()),
            height.max(p[1].abs()),
        )
    })
}
