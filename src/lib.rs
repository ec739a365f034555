//! Hearthfall - persistent tick-driven world simulation
//!
//! Mobs pick one behavior per tick from a utility planner; items carry
//! data-declared interactions and scheduled behaviors resolved through
//! string-keyed registries; temporary modifiers live in an effect ledger
//! layered over the stored base attributes.

pub mod core;
pub mod effects;
pub mod entity;
pub mod interactions;
pub mod ontick;
pub mod planner;
pub mod rules;
pub mod services;
pub mod simulation;
pub mod store;

pub use crate::core::config::SimulationConfig;
pub use crate::core::error::{Result, SimError};
pub use crate::rules::GameRules;
pub use crate::services::Services;
pub use crate::simulation::{Simulation, World};
