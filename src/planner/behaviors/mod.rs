//! The behavior roster

mod combat;
mod composite;
mod idle;
mod rest;
mod social;

pub use combat::{Flee, Hunt};
pub use composite::{Acquire, Build, Gather, Heal, Meal};
pub use idle::{Vandalize, Wander};
pub use rest::{Relax, Sleep};
pub use social::Chat;

use super::Plan;

/// Every behavior in evaluation order; earlier entries win ties
pub fn default_roster() -> Vec<Plan> {
    vec![
        Plan::Atomic(Box::new(Flee)),
        Plan::Atomic(Box::new(Hunt)),
        Plan::Composite(Box::new(Heal::new())),
        Plan::Composite(Box::new(Meal::new())),
        Plan::Composite(Box::new(Acquire::new())),
        Plan::Composite(Box::new(Gather::new())),
        Plan::Composite(Box::new(Build::new())),
        Plan::Atomic(Box::new(Sleep)),
        Plan::Atomic(Box::new(Relax)),
        Plan::Atomic(Box::new(Chat)),
        Plan::Atomic(Box::new(Vandalize)),
        Plan::Atomic(Box::new(Wander)),
    ]
}
