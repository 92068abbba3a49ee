//! CorePlugin wires configuration, the frame clock, and the ordered per-frame stages.
use bevy::prelude::*;
#[cfg(feature = "core_debug")]
use bevy::time::TimerMode;
use std::time::Duration;

use crate::core::{
    config::GameConfig,
    session::{finish_session, request_session_close, SessionState, TeardownSet},
};

const DEFAULT_TIME_SCALE: f32 = 1.0;
const MIN_TIME_SCALE: f32 = 0.001;
const DEFAULT_MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

#[cfg(feature = "core_debug")]
#[derive(Resource)]
struct FrameStatsTimer {
    timer: Timer,
}

#[cfg(feature = "core_debug")]
impl Default for FrameStatsTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }
}

/// Ordered stages of a single simulation frame. Rendering follows `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Advances [`SimulationClock`].
    Clock,
    /// Drains pointer messages into the hover and target state.
    Input,
    /// Advances ephemeral effects and disposes the finished ones.
    Effects,
    /// Moves the player toward the target point.
    Movement,
    /// Places the camera relative to the player.
    CameraFollow,
    /// Syncs visuals (arrow, cursor, rebuilt shapes, materials) with entity state.
    Presentation,
}

/// Per-frame delta source for the simulation.
///
/// The first tick always reports a zero delta since there is no previous frame to
/// measure against. Later deltas are clamped so a stalled frame cannot teleport
/// anything, then scaled by the time-scale multiplier.
#[derive(Resource, Debug)]
pub struct SimulationClock {
    time_scale: f32,
    max_frame_delta: Duration,
    primed: bool,
    last_real_delta: Duration,
    last_scaled_delta: Duration,
    elapsed: Duration,
    frames: u64,
}

impl SimulationClock {
    /// Clock running `time_scale` simulated seconds per real second.
    pub fn new(time_scale: f32) -> Self {
        Self {
            time_scale: time_scale.max(MIN_TIME_SCALE),
            max_frame_delta: DEFAULT_MAX_FRAME_DELTA,
            primed: false,
            last_real_delta: Duration::ZERO,
            last_scaled_delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frames: 0,
        }
    }

    /// Sets the largest real delta a single frame may contribute.
    pub fn with_max_frame_delta(mut self, max_frame_delta: Duration) -> Self {
        self.max_frame_delta = max_frame_delta;
        self
    }

    /// Never drops below [`MIN_TIME_SCALE`].
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(MIN_TIME_SCALE);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Clamped real delta of the current frame.
    #[cfg_attr(not(any(test, feature = "core_debug")), allow(dead_code))]
    pub fn last_real_delta(&self) -> Duration {
        self.last_real_delta
    }

    /// Clamped delta times the time scale.
    #[cfg_attr(not(any(test, feature = "core_debug")), allow(dead_code))]
    pub fn last_scaled_delta(&self) -> Duration {
        self.last_scaled_delta
    }

    /// Scaled delta of the current frame in seconds.
    pub fn delta_secs(&self) -> f32 {
        self.last_scaled_delta.as_secs_f32()
    }

    /// Sum of every scaled delta so far.
    #[cfg_attr(not(any(test, feature = "core_debug")), allow(dead_code))]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[cfg_attr(not(any(test, feature = "core_debug")), allow(dead_code))]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Feeds one frame's real delta into the clock.
    pub fn tick(&mut self, real_delta: Duration) {
        self.frames = self.frames.saturating_add(1);
        if !self.primed {
            self.primed = true;
            self.last_real_delta = Duration::ZERO;
            self.last_scaled_delta = Duration::ZERO;
            return;
        }

        self.last_real_delta = real_delta.min(self.max_frame_delta);
        self.last_scaled_delta = self.last_real_delta.mul_f32(self.time_scale);
        self.elapsed += self.last_scaled_delta;
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SCALE)
    }
}

/// Loads [`GameConfig`], registers the frame clock, the session state, and the
/// ordering of [`SimulationSet`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        let config = GameConfig::load_or_default();
        let clock = SimulationClock::new(config.simulation.time_scale)
            .with_max_frame_delta(config.simulation.max_frame_delta);

        app.insert_resource(config)
            .insert_resource(clock)
            .init_state::<SessionState>()
            .configure_sets(
                Update,
                (
                    SimulationSet::Clock,
                    SimulationSet::Input,
                    SimulationSet::Effects,
                    SimulationSet::Movement,
                    SimulationSet::CameraFollow,
                    SimulationSet::Presentation,
                )
                    .chain()
                    .run_if(in_state(SessionState::Running)),
            )
            .configure_sets(
                OnEnter(SessionState::Closed),
                (TeardownSet::Release, TeardownSet::Exit).chain(),
            )
            .add_systems(Startup, log_clock_settings)
            .add_systems(
                Update,
                (
                    update_simulation_clock.in_set(SimulationSet::Clock),
                    request_session_close.run_if(in_state(SessionState::Running)),
                ),
            )
            .add_systems(
                OnEnter(SessionState::Closed),
                finish_session.in_set(TeardownSet::Exit),
            );

        #[cfg(feature = "core_debug")]
        {
            app.insert_resource(FrameStatsTimer::default())
                .add_systems(Update, log_frame_stats.after(SimulationSet::Clock));
        }
    }
}

fn update_simulation_clock(mut clock: ResMut<SimulationClock>, time: Res<Time>) {
    clock.tick(time.delta());
}

fn log_clock_settings(clock: Res<SimulationClock>) {
    info!(
        "Simulation clock ready (scale {:.3}, max frame delta {:.3}s)",
        clock.time_scale(),
        clock.max_frame_delta.as_secs_f32()
    );
}

#[cfg(feature = "core_debug")]
fn log_frame_stats(mut timer: ResMut<FrameStatsTimer>, clock: Res<SimulationClock>) {
    if timer.timer.tick(clock.last_real_delta()).just_finished() {
        info!(
            target: "core_debug",
            "Frame {} | sim elapsed: {:.2}s | scale: {:.3} | real dt: {:.4}s | scaled dt: {:.4}s",
            clock.frames(),
            clock.elapsed().as_secs_f32(),
            clock.time_scale(),
            clock.last_real_delta().as_secs_f32(),
            clock.last_scaled_delta().as_secs_f32(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_reports_zero_delta() {
        let mut clock = SimulationClock::default();
        clock.tick(Duration::from_secs(3));

        assert_eq!(clock.last_scaled_delta(), Duration::ZERO);
        assert_eq!(clock.elapsed(), Duration::ZERO);
        assert_eq!(clock.frames(), 1);

        clock.tick(Duration::from_millis(16));
        assert!((clock.delta_secs() - 0.016).abs() < 1e-6);
    }

    #[test]
    fn scaled_delta_follows_time_scale() {
        let mut clock = SimulationClock::new(2.5);
        clock.tick(Duration::ZERO);
        clock.tick(Duration::from_millis(100));

        assert_eq!(clock.time_scale(), 2.5);
        assert_eq!(clock.last_real_delta(), Duration::from_millis(100));
        assert_eq!(
            clock.last_scaled_delta(),
            Duration::from_millis(100).mul_f32(2.5)
        );
        assert_eq!(clock.elapsed(), Duration::from_millis(100).mul_f32(2.5));
    }

    #[test]
    fn clock_clamps_long_frames() {
        let mut clock =
            SimulationClock::new(1.0).with_max_frame_delta(Duration::from_millis(100));
        clock.tick(Duration::ZERO);
        clock.tick(Duration::from_secs(5));

        assert_eq!(clock.last_real_delta(), Duration::from_millis(100));
        assert!((clock.delta_secs() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn time_scale_has_positive_floor() {
        let mut clock = SimulationClock::new(0.0);
        assert!((clock.time_scale() - MIN_TIME_SCALE).abs() < f32::EPSILON);

        clock.set_time_scale(-5.0);
        assert!((clock.time_scale() - MIN_TIME_SCALE).abs() < f32::EPSILON);
    }
}
