pub mod calendar;
pub mod config;
pub mod error;
pub mod types;

pub use calendar::{Calendar, WorldDate};
pub use config::SimulationConfig;
pub use error::{ErrorCategory, Result, SimError};
