//! Utility planner - picks and drives one behavior per mob per tick
//!
//! Every behavior in the roster scores the mob; the highest finite score
//! wins, with a stubbornness bonus for whatever the mob is already doing.
//! Atomic behaviors score and act on their own. Composite behaviors score
//! as `benefit - cost` of their cheapest applicable means and hand
//! execution to that means.

pub mod behaviors;
pub mod means;

use crate::core::error::{Result, SimError};
use crate::core::types::MobId;
use crate::entity::mob::Mob;
use crate::simulation::context::TickContext;
use crate::simulation::world::World;

pub use means::Means;

pub trait Behavior: Send + Sync {
    fn key(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Line broadcast when a mob takes this behavior up
    fn reaction(&self) -> Option<&'static str> {
        None
    }
}

pub trait AtomicBehavior: Behavior {
    /// `f64::NEG_INFINITY` when not applicable this tick
    fn utility(&self, world: &World, mob: &Mob) -> f64;

    /// Returns true once finished
    fn execute(&self, ctx: &mut TickContext<'_>, mob: MobId) -> Result<bool>;
}

pub trait CompositeBehavior: Behavior {
    /// `f64::NEG_INFINITY` when not applicable this tick
    fn benefit(&self, world: &World, mob: &Mob) -> f64;

    fn means(&self) -> &[Box<dyn Means>];
}

/// One roster entry
pub enum Plan {
    Atomic(Box<dyn AtomicBehavior>),
    Composite(Box<dyn CompositeBehavior>),
}

/// Score of a plan for one mob, and the means that earned it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub utility: f64,
    pub means: Option<usize>,
}

impl Evaluation {
    const INAPPLICABLE: Evaluation = Evaluation {
        utility: f64::NEG_INFINITY,
        means: None,
    };
}

fn applicable(score: f64) -> bool {
    !score.is_nan() && score > f64::NEG_INFINITY
}

impl Plan {
    pub fn key(&self) -> &'static str {
        match self {
            Plan::Atomic(b) => b.key(),
            Plan::Composite(b) => b.key(),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Plan::Atomic(b) => b.description(),
            Plan::Composite(b) => b.description(),
        }
    }

    pub fn reaction(&self) -> Option<&'static str> {
        match self {
            Plan::Atomic(b) => b.reaction(),
            Plan::Composite(b) => b.reaction(),
        }
    }

    pub fn evaluate(&self, world: &World, mob: &Mob) -> Evaluation {
        match self {
            Plan::Atomic(b) => {
                let utility = b.utility(world, mob);
                if applicable(utility) {
                    Evaluation { utility, means: None }
                } else {
                    Evaluation::INAPPLICABLE
                }
            }
            Plan::Composite(b) => {
                let benefit = b.benefit(world, mob);
                if !applicable(benefit) {
                    return Evaluation::INAPPLICABLE;
                }
                let mut cheapest: Option<(usize, f64)> = None;
                for (index, means) in b.means().iter().enumerate() {
                    let cost = means.cost(world, mob);
                    if !cost.is_finite() {
                        continue;
                    }
                    if cheapest.map_or(true, |(_, best)| cost < best) {
                        cheapest = Some((index, cost));
                    }
                }
                match cheapest {
                    Some((index, cost)) => Evaluation {
                        utility: benefit - cost,
                        means: Some(index),
                    },
                    None => Evaluation::INAPPLICABLE,
                }
            }
        }
    }

    pub fn execute(&self, ctx: &mut TickContext<'_>, mob: MobId, means: Option<usize>) -> Result<bool> {
        match self {
            Plan::Atomic(b) => b.execute(ctx, mob),
            Plan::Composite(b) => {
                let chosen = means
                    .and_then(|i| b.means().get(i))
                    .ok_or_else(|| {
                        SimError::Invariant(format!("{} executed without a means", b.key()))
                    })?;
                chosen.execute(ctx, mob)
            }
        }
    }
}

/// The winner of one selection round
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub index: usize,
    pub key: &'static str,
    pub utility: f64,
    pub means: Option<usize>,
}

pub struct Planner {
    roster: Vec<Plan>,
    stubbornness: f64,
}

impl Planner {
    pub fn new(stubbornness: f64) -> Self {
        Self {
            roster: Vec::new(),
            stubbornness,
        }
    }

    /// The full behavior roster
    pub fn with_defaults(stubbornness: f64) -> Self {
        let mut planner = Self::new(stubbornness);
        for plan in behaviors::default_roster() {
            planner.register(plan);
        }
        planner
    }

    pub fn register(&mut self, plan: Plan) {
        self.roster.push(plan);
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.roster.iter().map(Plan::key)
    }

    pub fn plan(&self, key: &str) -> Option<&Plan> {
        self.roster.iter().find(|p| p.key() == key)
    }

    /// Strict maximum; the first of equal scores wins
    pub fn select(&self, world: &World, mob: &Mob) -> Result<Selection> {
        let mut best: Option<Selection> = None;
        for (index, plan) in self.roster.iter().enumerate() {
            let eval = plan.evaluate(world, mob);
            if !applicable(eval.utility) {
                continue;
            }
            let mut utility = eval.utility;
            if mob.action.as_deref() == Some(plan.key()) {
                utility += self.stubbornness;
            }
            if best.as_ref().map_or(true, |b| utility > b.utility) {
                best = Some(Selection {
                    index,
                    key: plan.key(),
                    utility,
                    means: eval.means,
                });
            }
        }
        best.ok_or(SimError::NoApplicableBehavior(mob.id))
    }

    pub fn execute(&self, ctx: &mut TickContext<'_>, mob: MobId, selection: &Selection) -> Result<bool> {
        let plan = self.roster.get(selection.index).ok_or_else(|| {
            SimError::Invariant(format!("selection {} outside the roster", selection.index))
        })?;
        plan.execute(ctx, mob, selection.means)
    }
}
