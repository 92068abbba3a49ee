//! Arena state: shape and surface parameters plus the entities and assets they drive.
use bevy::prelude::*;

use crate::{
    core::config::{ArenaSettings, ParamRange},
    scene::{release_entity, AssetSlot},
};

pub const ARENA_SIZE_RANGE: ParamRange = ParamRange::new(20.0, 200.0);
pub const TEXTURE_REPEAT_RANGE: ParamRange = ParamRange::new(1.0, 10.0);
pub const DISPLACEMENT_RANGE: ParamRange = ParamRange::new(0.0, 1.0);
pub const UNIT_RANGE: ParamRange = ParamRange::new(0.0, 1.0);
pub const ENV_INTENSITY_RANGE: ParamRange = ParamRange::new(0.0, 2.0);
pub const LAVA_EMISSIVE_RANGE: ParamRange = ParamRange::new(0.0, 2.0);
pub const LAVA_WIDTH_RANGE: ParamRange = ParamRange::new(0.1, 5.0);

/// Surface parameters applied to the ground and lava materials in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaSurface {
    pub texture_repeat: f32,
    pub displacement_scale: f32,
    pub metalness: f32,
    pub roughness: f32,
    pub env_intensity: f32,
    pub lava_color: Color,
    pub lava_emissive_intensity: f32,
    pub lava_opacity: f32,
}

/// The square play field ringed by lava.
///
/// Shape setters mark the meshes for a rebuild, surface setters mark the
/// materials for an in-place update. Both are applied in the presentation stage
/// of the same frame.
#[derive(Component, Debug, Clone)]
pub struct Arena {
    size: f32,
    min_size: f32,
    shrink_per_second: f32,
    lava_width: f32,
    surface: ArenaSurface,
    shape_dirty: bool,
    surface_dirty: bool,
}

impl Arena {
    pub fn from_settings(settings: &ArenaSettings) -> Self {
        let min_size = ARENA_SIZE_RANGE.clamp(settings.min_size);
        Self {
            size: ARENA_SIZE_RANGE.clamp(settings.size).max(min_size),
            min_size,
            shrink_per_second: settings.shrink_per_second.max(0.0),
            lava_width: LAVA_WIDTH_RANGE.clamp(settings.lava_width),
            surface: ArenaSurface {
                texture_repeat: TEXTURE_REPEAT_RANGE.clamp(settings.texture_repeat),
                displacement_scale: DISPLACEMENT_RANGE.clamp(settings.displacement_scale),
                metalness: UNIT_RANGE.clamp(settings.metalness),
                roughness: UNIT_RANGE.clamp(settings.roughness),
                env_intensity: ENV_INTENSITY_RANGE.clamp(settings.env_intensity),
                lava_color: settings.lava_color,
                lava_emissive_intensity: LAVA_EMISSIVE_RANGE
                    .clamp(settings.lava_emissive_intensity),
                lava_opacity: UNIT_RANGE.clamp(settings.lava_opacity),
            },
            shape_dirty: true,
            surface_dirty: true,
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn lava_width(&self) -> f32 {
        self.lava_width
    }

    pub fn shrink_per_second(&self) -> f32 {
        self.shrink_per_second
    }

    pub fn surface(&self) -> &ArenaSurface {
        &self.surface
    }

    /// Inner edge of the lava field, touching the middle of each ground edge.
    pub fn lava_inner_radius(&self) -> f32 {
        self.size * 0.5
    }

    /// Outer edge of the lava field, past the ground corners by the lava width.
    pub fn lava_outer_radius(&self) -> f32 {
        self.size * 0.5 * std::f32::consts::SQRT_2 + self.lava_width
    }

    pub fn boundary_major_radius(&self) -> f32 {
        self.size * 0.5
    }

    pub fn boundary_minor_radius(&self) -> f32 {
        self.lava_width * 0.25
    }

    pub fn set_size(&mut self, size: f32) {
        let size = ARENA_SIZE_RANGE.clamp(size);
        if size != self.size {
            self.size = size;
            self.shape_dirty = true;
        }
    }

    /// Shrinks by `amount`, never below the configured minimum. Returns whether
    /// the size changed.
    pub fn shrink(&mut self, amount: f32) -> bool {
        if amount <= 0.0 || self.size <= self.min_size {
            return false;
        }
        self.size = (self.size - amount).max(self.min_size);
        self.shape_dirty = true;
        true
    }

    pub fn set_lava_width(&mut self, width: f32) {
        let width = LAVA_WIDTH_RANGE.clamp(width);
        if width != self.lava_width {
            self.lava_width = width;
            self.shape_dirty = true;
        }
    }

    pub fn set_texture_repeat(&mut self, repeat: f32) {
        self.surface.texture_repeat = TEXTURE_REPEAT_RANGE.clamp(repeat);
        self.surface_dirty = true;
    }

    pub fn set_displacement_scale(&mut self, scale: f32) {
        self.surface.displacement_scale = DISPLACEMENT_RANGE.clamp(scale);
        self.surface_dirty = true;
    }

    pub fn set_metalness(&mut self, metalness: f32) {
        self.surface.metalness = UNIT_RANGE.clamp(metalness);
        self.surface_dirty = true;
    }

    pub fn set_roughness(&mut self, roughness: f32) {
        self.surface.roughness = UNIT_RANGE.clamp(roughness);
        self.surface_dirty = true;
    }

    pub fn set_env_intensity(&mut self, intensity: f32) {
        self.surface.env_intensity = ENV_INTENSITY_RANGE.clamp(intensity);
        self.surface_dirty = true;
    }

    pub fn set_lava_color(&mut self, color: Color) {
        self.surface.lava_color = color;
        self.surface_dirty = true;
    }

    pub fn set_lava_emissive_intensity(&mut self, intensity: f32) {
        self.surface.lava_emissive_intensity = LAVA_EMISSIVE_RANGE.clamp(intensity);
        self.surface_dirty = true;
    }

    pub fn set_lava_opacity(&mut self, opacity: f32) {
        self.surface.lava_opacity = UNIT_RANGE.clamp(opacity);
        self.surface_dirty = true;
    }

    pub fn shape_dirty(&self) -> bool {
        self.shape_dirty
    }

    pub fn clear_shape_dirty(&mut self) {
        self.shape_dirty = false;
    }

    pub fn surface_dirty(&self) -> bool {
        self.surface_dirty
    }

    pub fn clear_surface_dirty(&mut self) {
        self.surface_dirty = false;
    }

    /// Forces a material refresh, e.g. once a ground texture finishes loading.
    pub fn mark_surface_dirty(&mut self) {
        self.surface_dirty = true;
    }
}

/// Which piece of the arena a mesh entity renders.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaPart {
    Ground,
    LavaField,
    Boundary,
}

/// Ground textures, loaded once and reused across rebuilds.
#[derive(Resource, Debug, Clone)]
pub struct ArenaTextures {
    pub diffuse: Handle<Image>,
    pub normal: Handle<Image>,
    pub roughness: Handle<Image>,
    pub displacement: Handle<Image>,
}

/// Entities and assets owned by the arena.
#[derive(Resource, Default)]
pub struct ArenaResources {
    pub root: Option<Entity>,
    pub ground_mesh: AssetSlot<Mesh>,
    pub lava_field_mesh: AssetSlot<Mesh>,
    pub boundary_mesh: AssetSlot<Mesh>,
    pub ground_material: AssetSlot<StandardMaterial>,
    pub lava_material: AssetSlot<StandardMaterial>,
}

impl ArenaResources {
    /// Despawns the arena hierarchy and removes its meshes and materials.
    /// Returns `false` when there was nothing left to release.
    pub fn release(
        &mut self,
        commands: &mut Commands,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
    ) -> bool {
        // Parts are children of the root and go with it.
        let mut released = release_entity(commands, &mut self.root);

        released |= self.ground_mesh.release(meshes);
        released |= self.lava_field_mesh.release(meshes);
        released |= self.boundary_mesh.release(meshes);
        released |= self.ground_material.release(materials);
        released |= self.lava_material.release(materials);
        released
    }
}
