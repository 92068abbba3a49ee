//! Target cursor state and the assets it owns.
use bevy::prelude::*;

use crate::{
    arena::components::UNIT_RANGE,
    core::config::{CursorSettings, ParamRange},
    scene::{release_entity, AssetSlot},
};

pub const CURSOR_SIZE_RANGE: ParamRange = ParamRange::new(0.1, 2.0);
/// Height the cursor floats at above the ground.
pub const CURSOR_HOVER: f32 = 0.1;

/// Two concentric rings marking the ground point under the pointer.
#[derive(Component, Debug, Clone)]
pub struct TargetCursor {
    size: f32,
    color: Color,
    opacity: f32,
    shape_dirty: bool,
    material_dirty: bool,
}

impl TargetCursor {
    pub fn from_settings(settings: &CursorSettings) -> Self {
        Self {
            size: CURSOR_SIZE_RANGE.clamp(settings.size),
            color: settings.color,
            opacity: UNIT_RANGE.clamp(settings.opacity),
            shape_dirty: false,
            material_dirty: false,
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Inner and outer radius of the outer ring.
    pub fn outer_ring(&self) -> (f32, f32) {
        (self.size * 0.8, self.size)
    }

    /// Inner and outer radius of the inner ring.
    pub fn inner_ring(&self) -> (f32, f32) {
        (self.size * 0.2, self.size * 0.4)
    }

    pub fn set_size(&mut self, size: f32) {
        self.size = CURSOR_SIZE_RANGE.clamp(size);
        self.shape_dirty = true;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.material_dirty = true;
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = UNIT_RANGE.clamp(opacity);
        self.material_dirty = true;
    }

    pub fn take_shape_dirty(&mut self) -> bool {
        std::mem::take(&mut self.shape_dirty)
    }

    pub fn take_material_dirty(&mut self) -> bool {
        std::mem::take(&mut self.material_dirty)
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorRing {
    Outer,
    Inner,
}

/// Entities and assets owned by the cursor. Both rings share one material.
#[derive(Resource, Default)]
pub struct CursorResources {
    pub root: Option<Entity>,
    pub outer_mesh: AssetSlot<Mesh>,
    pub inner_mesh: AssetSlot<Mesh>,
    pub material: AssetSlot<StandardMaterial>,
}

impl CursorResources {
    pub fn release(
        &mut self,
        commands: &mut Commands,
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
    ) -> bool {
        let mut released = release_entity(commands, &mut self.root);
        released |= self.outer_mesh.release(meshes);
        released |= self.inner_mesh.release(meshes);
        released |= self.material.release(materials);
        released
    }
}
