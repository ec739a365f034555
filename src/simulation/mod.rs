pub mod context;
pub mod lifecycle;
pub mod movement;
pub mod perception;
pub mod tick;
pub mod world;

pub use context::TickContext;
pub use tick::{validate_rules, EntityError, Simulation, TickReport};
pub use world::World;
