//! Core module hosting configuration, the frame clock, stage ordering, and session lifecycle.
pub mod config;
pub mod plugin;
pub mod session;

pub use plugin::{CorePlugin, SimulationClock, SimulationSet};
