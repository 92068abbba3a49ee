//! Game configuration sourced from `config/game.toml`.
use std::{fmt, fs, path::Path, time::Duration};

use bevy::prelude::*;
use serde::Deserialize;

use crate::{
    arena::components::{
        ARENA_SIZE_RANGE, DISPLACEMENT_RANGE, ENV_INTENSITY_RANGE, LAVA_EMISSIVE_RANGE,
        LAVA_WIDTH_RANGE, TEXTURE_REPEAT_RANGE, UNIT_RANGE,
    },
    cursor::components::CURSOR_SIZE_RANGE,
    player::components::PLAYER_SPEED_RANGE,
    world::components::{CAMERA_DISTANCE_RANGE, CAMERA_HEIGHT_RANGE, CAMERA_FOV_RANGE},
};

const CONFIG_PATH: &str = "config/game.toml";

/// Inclusive bounds for a tunable parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamps into the range; NaN collapses to the minimum.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }
}

/// Problems encountered while reading the configuration file.
#[derive(Debug)]
pub enum ConfigError {
    Read { path: String, message: String },
    Parse { path: String, message: String },
    InvalidColor { field: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "failed to read {}: {}", path, message),
            Self::Parse { path, message } => write!(f, "failed to parse {}: {}", path, message),
            Self::InvalidColor { field, value } => {
                write!(f, "invalid color for {}: {:?}", field, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, Deserialize, Default)]
struct RawGameConfig {
    #[serde(default)]
    simulation: RawSimulation,
    #[serde(default)]
    camera: RawCamera,
    #[serde(default)]
    player: RawPlayer,
    #[serde(default)]
    arena: RawArena,
    #[serde(default)]
    cursor: RawCursor,
    #[serde(default)]
    indicator: RawIndicator,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawSimulation {
    time_scale: f32,
    max_frame_delta_secs: f32,
}

impl Default for RawSimulation {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_frame_delta_secs: 0.25,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawCamera {
    height: f32,
    distance: f32,
    fov_degrees: f32,
}

impl Default for RawCamera {
    fn default() -> Self {
        Self {
            height: 50.0,
            distance: 25.0,
            fov_degrees: 75.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawPlayer {
    speed: f32,
    spawn: [f32; 2],
}

impl Default for RawPlayer {
    fn default() -> Self {
        Self {
            speed: 1.8,
            spawn: [0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawArena {
    size: f32,
    min_size: f32,
    shrink_per_second: f32,
    texture_repeat: f32,
    displacement_scale: f32,
    metalness: f32,
    roughness: f32,
    env_intensity: f32,
    lava_color: String,
    lava_emissive_intensity: f32,
    lava_width: f32,
    lava_opacity: f32,
}

impl Default for RawArena {
    fn default() -> Self {
        Self {
            size: 100.0,
            min_size: 20.0,
            shrink_per_second: 0.0,
            texture_repeat: 4.0,
            displacement_scale: 0.2,
            metalness: 0.1,
            roughness: 0.8,
            env_intensity: 1.0,
            lava_color: "#ff4400".to_string(),
            lava_emissive_intensity: 0.5,
            lava_width: 2.0,
            lava_opacity: 0.8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawCursor {
    size: f32,
    color: String,
    opacity: f32,
}

impl Default for RawCursor {
    fn default() -> Self {
        Self {
            size: 0.5,
            color: "#00ff00".to_string(),
            opacity: 0.8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawIndicator {
    lifetime_secs: f32,
    base_opacity: f32,
    color: String,
}

impl Default for RawIndicator {
    fn default() -> Self {
        Self {
            lifetime_secs: 1.0,
            base_opacity: 0.8,
            color: "#00ff00".to_string(),
        }
    }
}

/// Runtime configuration derived from `config/game.toml`.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    pub simulation: SimulationSettings,
    pub camera: CameraSettings,
    pub player: PlayerSettings,
    pub arena: ArenaSettings,
    pub cursor: CursorSettings,
    pub indicator: IndicatorSettings,
}

#[derive(Debug, Clone)]
pub struct SimulationSettings {
    pub time_scale: f32,
    pub max_frame_delta: Duration,
}

#[derive(Debug, Clone)]
pub struct CameraSettings {
    pub height: f32,
    pub distance: f32,
    pub fov_degrees: f32,
}

#[derive(Debug, Clone)]
pub struct PlayerSettings {
    /// World units per second.
    pub speed: f32,
    pub spawn: Vec3,
}

#[derive(Debug, Clone)]
pub struct ArenaSettings {
    pub size: f32,
    pub min_size: f32,
    pub shrink_per_second: f32,
    pub texture_repeat: f32,
    pub displacement_scale: f32,
    pub metalness: f32,
    pub roughness: f32,
    pub env_intensity: f32,
    pub lava_color: Color,
    pub lava_emissive_intensity: f32,
    pub lava_width: f32,
    pub lava_opacity: f32,
}

#[derive(Debug, Clone)]
pub struct CursorSettings {
    pub size: f32,
    pub color: Color,
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub struct IndicatorSettings {
    pub lifetime_secs: f32,
    pub base_opacity: f32,
    pub color: Color,
}

impl GameConfig {
    pub fn load_or_default() -> Self {
        match Self::load(Path::new(CONFIG_PATH)) {
            Ok(config) => config,
            Err(err) => {
                warn!("{}. Falling back to defaults.", err);
                RawGameConfig::default().into()
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_toml_str(&data).map_err(|err| match err {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    pub fn from_toml_str(data: &str) -> Result<Self, ConfigError> {
        toml::from_str::<RawGameConfig>(data)
            .map(Into::into)
            .map_err(|err| ConfigError::Parse {
                path: CONFIG_PATH.to_string(),
                message: err.to_string(),
            })
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        RawGameConfig::default().into()
    }
}

impl From<RawGameConfig> for GameConfig {
    fn from(value: RawGameConfig) -> Self {
        let defaults = RawGameConfig::default();

        let simulation = SimulationSettings {
            time_scale: value.simulation.time_scale.max(0.001),
            max_frame_delta: Duration::from_secs_f32(
                value.simulation.max_frame_delta_secs.clamp(0.001, 1.0),
            ),
        };

        let camera = CameraSettings {
            height: CAMERA_HEIGHT_RANGE.clamp(value.camera.height),
            distance: CAMERA_DISTANCE_RANGE.clamp(value.camera.distance),
            fov_degrees: CAMERA_FOV_RANGE.clamp(value.camera.fov_degrees),
        };

        let player = PlayerSettings {
            speed: PLAYER_SPEED_RANGE.clamp(value.player.speed),
            spawn: Vec3::new(value.player.spawn[0], 0.0, value.player.spawn[1]),
        };

        let min_size = ARENA_SIZE_RANGE.clamp(value.arena.min_size);
        let arena = ArenaSettings {
            size: ARENA_SIZE_RANGE.clamp(value.arena.size).max(min_size),
            min_size,
            shrink_per_second: value.arena.shrink_per_second.max(0.0),
            texture_repeat: TEXTURE_REPEAT_RANGE.clamp(value.arena.texture_repeat),
            displacement_scale: DISPLACEMENT_RANGE.clamp(value.arena.displacement_scale),
            metalness: UNIT_RANGE.clamp(value.arena.metalness),
            roughness: UNIT_RANGE.clamp(value.arena.roughness),
            env_intensity: ENV_INTENSITY_RANGE.clamp(value.arena.env_intensity),
            lava_color: color_or_default(
                "arena.lava_color",
                &value.arena.lava_color,
                &defaults.arena.lava_color,
            ),
            lava_emissive_intensity: LAVA_EMISSIVE_RANGE
                .clamp(value.arena.lava_emissive_intensity),
            lava_width: LAVA_WIDTH_RANGE.clamp(value.arena.lava_width),
            lava_opacity: UNIT_RANGE.clamp(value.arena.lava_opacity),
        };

        let cursor = CursorSettings {
            size: CURSOR_SIZE_RANGE.clamp(value.cursor.size),
            color: color_or_default("cursor.color", &value.cursor.color, &defaults.cursor.color),
            opacity: UNIT_RANGE.clamp(value.cursor.opacity),
        };

        let indicator = IndicatorSettings {
            lifetime_secs: value.indicator.lifetime_secs.max(0.05),
            base_opacity: UNIT_RANGE.clamp(value.indicator.base_opacity),
            color: color_or_default(
                "indicator.color",
                &value.indicator.color,
                &defaults.indicator.color,
            ),
        };

        Self {
            simulation,
            camera,
            player,
            arena,
            cursor,
            indicator,
        }
    }
}

/// Parses `#rrggbb` (or `rrggbb`) into an sRGB color.
pub fn parse_hex_color(field: &'static str, value: &str) -> Result<Color, ConfigError> {
    Srgba::hex(value.trim())
        .map(Color::Srgba)
        .map_err(|_| ConfigError::InvalidColor {
            field,
            value: value.to_string(),
        })
}

fn color_or_default(field: &'static str, value: &str, fallback: &str) -> Color {
    parse_hex_color(field, value).unwrap_or_else(|err| {
        warn!("{}. Using {}.", err, fallback);
        parse_hex_color(field, fallback).unwrap_or(Color::WHITE)
    })
}
