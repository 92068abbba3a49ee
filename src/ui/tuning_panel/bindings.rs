// src/ui/tuning_panel/bindings.rs
//
// Control table mapping each panel entry to a clamped value and the setter that
// pushes it into the world.

use bevy::{ecs::component::Mutable, prelude::*};
use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::{
    arena::components::{
        Arena, ARENA_SIZE_RANGE, DISPLACEMENT_RANGE, ENV_INTENSITY_RANGE, LAVA_EMISSIVE_RANGE,
        LAVA_WIDTH_RANGE, TEXTURE_REPEAT_RANGE, UNIT_RANGE,
    },
    core::config::{GameConfig, ParamRange},
    cursor::components::{TargetCursor, CURSOR_SIZE_RANGE},
    player::components::{Player, PLAYER_SPEED_RANGE},
    world::components::{
        FollowCamera, CAMERA_DISTANCE_RANGE, CAMERA_FOV_RANGE, CAMERA_HEIGHT_RANGE,
    },
};

pub const HUE_RANGE: ParamRange = ParamRange::new(0.0, 360.0);

/// Number of button presses needed to sweep a control across its whole range.
const STEPS_PER_RANGE: f32 = 20.0;

/// Pushes a new control value into the world.
pub type ControlSetter = Arc<dyn Fn(&mut World, f32) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ControlGroup {
    Camera,
    Player,
    Arena,
    TargetCursor,
}

impl ControlGroup {
    pub const ALL: [ControlGroup; 4] = [
        ControlGroup::Camera,
        ControlGroup::Player,
        ControlGroup::Arena,
        ControlGroup::TargetCursor,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ControlGroup::Camera => "Camera",
            ControlGroup::Player => "Player",
            ControlGroup::Arena => "Arena",
            ControlGroup::TargetCursor => "Target Cursor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ControlId {
    CameraHeight,
    CameraDistance,
    CameraFov,
    PlayerSpeed,
    ArenaSize,
    TextureRepeat,
    Displacement,
    Metalness,
    Roughness,
    EnvIntensity,
    LavaHue,
    LavaEmissive,
    LavaWidth,
    LavaOpacity,
    CursorSize,
    CursorHue,
    CursorOpacity,
}

impl ControlId {
    pub fn group(self) -> ControlGroup {
        match self {
            ControlId::CameraHeight | ControlId::CameraDistance | ControlId::CameraFov => {
                ControlGroup::Camera
            }
            ControlId::PlayerSpeed => ControlGroup::Player,
            ControlId::CursorSize | ControlId::CursorHue | ControlId::CursorOpacity => {
                ControlGroup::TargetCursor
            }
            _ => ControlGroup::Arena,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ControlId::CameraHeight => "Height",
            ControlId::CameraDistance => "Distance",
            ControlId::CameraFov => "Field of View",
            ControlId::PlayerSpeed => "Speed",
            ControlId::ArenaSize => "Size",
            ControlId::TextureRepeat => "Texture Repeat",
            ControlId::Displacement => "Displacement",
            ControlId::Metalness => "Metalness",
            ControlId::Roughness => "Roughness",
            ControlId::EnvIntensity => "Env Intensity",
            ControlId::LavaHue => "Lava Hue",
            ControlId::LavaEmissive => "Lava Glow",
            ControlId::LavaWidth => "Lava Width",
            ControlId::LavaOpacity => "Lava Opacity",
            ControlId::CursorSize => "Size",
            ControlId::CursorHue => "Hue",
            ControlId::CursorOpacity => "Opacity",
        }
    }

    pub fn range(self) -> ParamRange {
        match self {
            ControlId::CameraHeight => CAMERA_HEIGHT_RANGE,
            ControlId::CameraDistance => CAMERA_DISTANCE_RANGE,
            ControlId::CameraFov => CAMERA_FOV_RANGE,
            ControlId::PlayerSpeed => PLAYER_SPEED_RANGE,
            ControlId::ArenaSize => ARENA_SIZE_RANGE,
            ControlId::TextureRepeat => TEXTURE_REPEAT_RANGE,
            ControlId::Displacement => DISPLACEMENT_RANGE,
            ControlId::EnvIntensity => ENV_INTENSITY_RANGE,
            ControlId::LavaEmissive => LAVA_EMISSIVE_RANGE,
            ControlId::LavaWidth => LAVA_WIDTH_RANGE,
            ControlId::CursorSize => CURSOR_SIZE_RANGE,
            ControlId::LavaHue | ControlId::CursorHue => HUE_RANGE,
            ControlId::Metalness
            | ControlId::Roughness
            | ControlId::LavaOpacity
            | ControlId::CursorOpacity => UNIT_RANGE,
        }
    }

    /// Decimal places shown next to the control.
    pub fn precision(self) -> usize {
        match self {
            ControlId::CameraHeight
            | ControlId::CameraDistance
            | ControlId::CameraFov
            | ControlId::ArenaSize
            | ControlId::LavaHue
            | ControlId::CursorHue => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.group().title(), self.label())
    }
}

/// Fully saturated color at 50 % lightness.
pub fn hue_color(hue: f32) -> Color {
    Color::hsl(HUE_RANGE.clamp(hue), 1.0, 0.5)
}

fn hue_of(color: Color) -> f32 {
    Hsla::from(color).hue
}

fn update_all<C>(world: &mut World, mut apply: impl FnMut(&mut C))
where
    C: Component<Mutability = Mutable>,
{
    let mut query = world.query::<&mut C>();
    for mut component in query.iter_mut(world) {
        apply(&mut *component);
    }
}

fn setter_for(id: ControlId) -> ControlSetter {
    match id {
        ControlId::CameraHeight => Arc::new(|world: &mut World, value: f32| {
            update_all::<FollowCamera>(world, |camera| camera.set_height(value))
        }),
        ControlId::CameraDistance => Arc::new(|world: &mut World, value: f32| {
            update_all::<FollowCamera>(world, |camera| camera.set_distance(value))
        }),
        ControlId::CameraFov => Arc::new(|world: &mut World, value: f32| {
            update_all::<FollowCamera>(world, |camera| camera.set_fov(value))
        }),
        ControlId::PlayerSpeed => Arc::new(|world: &mut World, value: f32| {
            update_all::<Player>(world, |player| player.set_speed(value))
        }),
        ControlId::ArenaSize => Arc::new(|world: &mut World, value: f32| {
            update_all::<Arena>(world, |arena| arena.set_size(value))
        }),
        ControlId::TextureRepeat => Arc::new(|world: &mut World, value: f32| {
            update_all::<Arena>(world, |arena| arena.set_texture_repeat(value))
        }),
        ControlId::Displacement => Arc::new(|world: &mut World, value: f32| {
            update_all::<Arena>(world, |arena| arena.set_displacement_scale(value))
        }),
        ControlId::Metalness => Arc::new(|world: &mut World, value: f32| {
            update_all::<Arena>(world, |arena| arena.set_metalness(value))
        }),
        ControlId::Roughness => Arc::new(|world: &mut World, value: f32| {
            update_all::<Arena>(world, |arena| arena.set_roughness(value))
        }),
        ControlId::EnvIntensity => Arc::new(|world: &mut World, value: f32| {
            update_all::<Arena>(world, |arena| arena.set_env_intensity(value))
        }),
        ControlId::LavaHue => Arc::new(|world: &mut World, value: f32| {
            update_all::<Arena>(world, |arena| arena.set_lava_color(hue_color(value)))
        }),
        ControlId::LavaEmissive => Arc::new(|world: &mut World, value: f32| {
            update_all::<Arena>(world, |arena| arena.set_lava_emissive_intensity(value))
        }),
        ControlId::LavaWidth => Arc::new(|world: &mut World, value: f32| {
            update_all::<Arena>(world, |arena| arena.set_lava_width(value))
        }),
        ControlId::LavaOpacity => Arc::new(|world: &mut World, value: f32| {
            update_all::<Arena>(world, |arena| arena.set_lava_opacity(value))
        }),
        ControlId::CursorSize => Arc::new(|world: &mut World, value: f32| {
            update_all::<TargetCursor>(world, |cursor| cursor.set_size(value))
        }),
        ControlId::CursorHue => Arc::new(|world: &mut World, value: f32| {
            update_all::<TargetCursor>(world, |cursor| cursor.set_color(hue_color(value)))
        }),
        ControlId::CursorOpacity => Arc::new(|world: &mut World, value: f32| {
            update_all::<TargetCursor>(world, |cursor| cursor.set_opacity(value))
        }),
    }
}

/// One panel entry.
#[derive(Clone)]
pub struct ControlBinding {
    pub group: ControlGroup,
    pub label: &'static str,
    pub range: ParamRange,
    pub step: f32,
    value: f32,
    setter: ControlSetter,
}

impl ControlBinding {
    pub fn new(id: ControlId, value: f32) -> Self {
        let range = id.range();
        Self {
            group: id.group(),
            label: id.label(),
            range,
            step: (range.max - range.min) / STEPS_PER_RANGE,
            value: range.clamp(value),
            setter: setter_for(id),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn setter(&self) -> ControlSetter {
        Arc::clone(&self.setter)
    }

    /// Moves the value by `steps` increments, clamped to the range.
    pub fn nudge(&mut self, steps: f32) -> f32 {
        self.value = self.range.clamp(self.value + self.step * steps);
        self.value
    }
}

impl fmt::Debug for ControlBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlBinding")
            .field("group", &self.group)
            .field("label", &self.label)
            .field("range", &self.range)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// All live panel controls. Emptied on teardown.
#[derive(Resource, Debug, Default)]
pub struct TuningBindings {
    bindings: BTreeMap<ControlId, ControlBinding>,
}

impl TuningBindings {
    /// Seeds every control from the startup configuration.
    pub fn from_config(config: &GameConfig) -> Self {
        let seeds = [
            (ControlId::CameraHeight, config.camera.height),
            (ControlId::CameraDistance, config.camera.distance),
            (ControlId::CameraFov, config.camera.fov_degrees),
            (ControlId::PlayerSpeed, config.player.speed),
            (ControlId::ArenaSize, config.arena.size),
            (ControlId::TextureRepeat, config.arena.texture_repeat),
            (ControlId::Displacement, config.arena.displacement_scale),
            (ControlId::Metalness, config.arena.metalness),
            (ControlId::Roughness, config.arena.roughness),
            (ControlId::EnvIntensity, config.arena.env_intensity),
            (ControlId::LavaHue, hue_of(config.arena.lava_color)),
            (ControlId::LavaEmissive, config.arena.lava_emissive_intensity),
            (ControlId::LavaWidth, config.arena.lava_width),
            (ControlId::LavaOpacity, config.arena.lava_opacity),
            (ControlId::CursorSize, config.cursor.size),
            (ControlId::CursorHue, hue_of(config.cursor.color)),
            (ControlId::CursorOpacity, config.cursor.opacity),
        ];

        Self {
            bindings: seeds
                .into_iter()
                .map(|(id, value)| (id, ControlBinding::new(id, value)))
                .collect(),
        }
    }

    pub fn get(&self, id: ControlId) -> Option<&ControlBinding> {
        self.bindings.get(&id)
    }

    /// Controls of one group in declaration order.
    pub fn group(&self, group: ControlGroup) -> impl Iterator<Item = (ControlId, &ControlBinding)> {
        self.bindings
            .iter()
            .filter(move |(_, binding)| binding.group == group)
            .map(|(id, binding)| (*id, binding))
    }

    /// Nudges a control and hands back the new value with its setter.
    pub fn nudge(&mut self, id: ControlId, steps: f32) -> Option<(f32, ControlSetter)> {
        let binding = self.bindings.get_mut(&id)?;
        let value = binding.nudge(steps);
        Some((value, binding.setter()))
    }

    /// Whether a control lags behind a value that changed outside the panel.
    pub fn is_stale(&self, id: ControlId, live: f32) -> bool {
        self.bindings
            .get(&id)
            .is_some_and(|binding| binding.value != binding.range.clamp(live))
    }

    /// Overwrites a control with the value currently live in the world.
    pub fn sync(&mut self, id: ControlId, live: f32) {
        if let Some(binding) = self.bindings.get_mut(&id) {
            binding.value = binding.range.clamp(live);
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}
