//! Use registry - explicit mob-on-item interactions keyed by string
//!
//! Every handler validates its own preconditions (ownership, carrying,
//! reach, facet sub-state) and answers `Ok(false)` when they fail. Errors
//! are reserved for configuration mistakes and broken invariants.

mod brewing;
mod carry;
mod consume;
mod portal;
mod smash;
mod storage;
mod trade;
mod work;

use std::collections::BTreeMap;

use crate::core::error::{Result, SimError};
use crate::core::types::{ItemId, MobId};
use crate::entity::item::{Item, Ownership};
use crate::entity::mob::Mob;
use crate::simulation::context::TickContext;
use crate::simulation::movement;
use crate::simulation::world::World;

pub use brewing::{Brew, Ladle};
pub use carry::{Give, Pickup, Release};
pub use consume::{Drink, Eat};
pub use portal::EnterPortal;
pub use smash::Smash;
pub use storage::{Stock, Withdraw};
pub use trade::Purchase;
pub use work::Build;

pub trait UseHandler: Send + Sync {
    fn key(&self) -> &'static str;

    /// Short text a client shows for this action
    fn description(&self, world: &World, actor: MobId, item: ItemId) -> String;

    /// Attempt the interaction; `Ok(false)` means it was denied
    fn interact(
        &self,
        ctx: &mut TickContext<'_>,
        actor: MobId,
        item: ItemId,
        other: Option<MobId>,
    ) -> Result<bool>;
}

/// Built once at startup and passed by reference to the tick driver
#[derive(Default)]
pub struct UseRegistry {
    handlers: BTreeMap<&'static str, Box<dyn UseHandler>>,
}

impl UseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let handlers: Vec<Box<dyn UseHandler>> = vec![
            Box::new(Pickup),
            Box::new(Release),
            Box::new(Give),
            Box::new(Eat),
            Box::new(Drink),
            Box::new(Brew),
            Box::new(Ladle),
            Box::new(Purchase),
            Box::new(Smash),
            Box::new(Stock),
            Box::new(Withdraw),
            Box::new(Build),
            Box::new(EnterPortal),
        ];
        for handler in handlers {
            registry.register(handler);
        }
        registry
    }

    pub fn register(&mut self, handler: Box<dyn UseHandler>) {
        self.handlers.insert(handler.key(), handler);
    }

    /// Unknown keys are configuration errors
    pub fn get(&self, key: &str) -> Result<&dyn UseHandler> {
        self.handlers
            .get(key)
            .map(|h| h.as_ref())
            .ok_or_else(|| SimError::UnknownUseAction(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }
}

/// Ownership check shared by every handler that respects it
///
/// Unowned items are open to anyone. Community property is open to that
/// community and its allies; personal property only to its owner.
pub fn may_interact(world: &World, actor: &Mob, item: &Item) -> bool {
    let allowed = owner_permits(world, actor, item);
    if !allowed {
        tracing::debug!(
            "{} may not interact with {} owned by {:?}",
            actor.id,
            item.id,
            item.owner
        );
    }
    allowed
}

/// The same rule without the diagnostic, for perception filters
pub fn owner_permits(world: &World, actor: &Mob, item: &Item) -> bool {
    match &item.owner {
        None => true,
        Some(Ownership::Character(owner)) => *owner == actor.id,
        Some(Ownership::Community(community)) => actor
            .community
            .as_ref()
            .is_some_and(|c| world.rules.are_allied(c, community)),
    }
}

/// A locked item needs a matching key in the actor's unlocks
pub fn may_unlock(actor: &Mob, item: &Item) -> bool {
    match &item.lock {
        None => true,
        Some(lock) => actor.unlocks.iter().any(|k| *k == lock.key),
    }
}

/// Carried by the actor, or placed within reach
pub fn within_reach(world: &World, actor: &Mob, item: &Item) -> bool {
    if item.carried_by == Some(actor.id) {
        return true;
    }
    item.position
        .is_some_and(|cell| movement::within(actor.position, cell, world.config.reach))
}

/// Log a soft failure and deny
fn deny(key: &str, actor: MobId, item: ItemId, reason: &str) -> Result<bool> {
    tracing::debug!("{} denied {} on {}: {}", key, actor, item, reason);
    Ok(false)
}

/// Actor and item rows plus the checks nearly every handler starts with
fn reachable<'w>(
    world: &'w World,
    key: &str,
    actor: MobId,
    item: ItemId,
) -> Result<Option<(&'w Mob, &'w Item)>> {
    let mob = world.store.require_mob(actor)?;
    let row = world.store.require_item(item)?;
    if !within_reach(world, mob, row) {
        tracing::debug!("{} denied {} on {}: out of reach", key, actor, item);
        return Ok(None);
    }
    if !may_interact(world, mob, row) {
        return Ok(None);
    }
    Ok(Some((mob, row)))
}
