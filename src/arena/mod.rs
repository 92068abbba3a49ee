pub mod components;
pub mod plugin;
pub mod shapes;
pub mod systems;

pub use plugin::ArenaPlugin;
