//! Means - interchangeable ways of carrying out a composite behavior
//!
//! A means prices itself for a mob (`f64::INFINITY` when it cannot apply
//! right now) and, once chosen, drives the mob one tick closer.

mod ask;
mod fetch;
mod purchase;
mod use_carried;

use crate::core::error::Result;
use crate::core::types::{Coord, ItemId, MobId};
use crate::entity::facets::{
    try_as_cauldron, try_as_construction, try_as_edible, try_as_healing, try_as_ingredient,
    try_as_material,
};
use crate::entity::mob::Mob;
use crate::interactions::owner_permits;
use crate::simulation::context::TickContext;
use crate::simulation::movement::{self, Route};
use crate::simulation::perception::nearest_item;
use crate::simulation::world::World;

pub use ask::AskCarrier;
pub use fetch::Fetch;
pub use purchase::Purchase;
pub use use_carried::UseCarried;

pub trait Means: Send + Sync {
    fn key(&self) -> &'static str;

    /// `f64::INFINITY` when inapplicable
    fn cost(&self, world: &World, mob: &Mob) -> f64;

    /// Returns true once finished
    fn execute(&self, ctx: &mut TickContext<'_>, mob: MobId) -> Result<bool>;
}

/// Which items satisfy a behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemQuery {
    /// The mob's favorite item type
    Favorite,
    Edible,
    Healing,
    Ingredient,
    Material,
}

impl ItemQuery {
    pub fn matches(&self, world: &World, mob: &Mob, item: ItemId) -> bool {
        let store = &world.store;
        match self {
            ItemQuery::Favorite => match (&mob.favorite_item, store.item(item)) {
                (Some(favorite), Some(row)) => row.item_type == *favorite,
                _ => false,
            },
            ItemQuery::Edible => try_as_edible(store, item).is_some(),
            ItemQuery::Healing => try_as_healing(store, item).is_some(),
            ItemQuery::Ingredient => try_as_ingredient(store, item).is_some(),
            ItemQuery::Material => try_as_material(store, item).is_some(),
        }
    }

    /// The carried item, when it matches
    pub fn carried(&self, world: &World, mob: &Mob) -> Option<ItemId> {
        mob.carrying.filter(|id| self.matches(world, mob, *id))
    }
}

/// Placed items a carried item is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetQuery {
    /// A cauldron that takes the carried ingredient's color
    CauldronAccepting,
    /// An unfinished construction site
    ConstructionSite,
}

impl TargetQuery {
    pub fn nearest(&self, world: &World, mob: &Mob) -> Option<(ItemId, f64)> {
        let store = &world.store;
        let radius = world.config.vision_radius;
        match self {
            TargetQuery::CauldronAccepting => {
                let color = mob
                    .carrying
                    .and_then(|held| try_as_ingredient(store, held))
                    .map(|i| i.color);
                nearest_item(world, mob.position, radius, |item| {
                    owner_permits(world, mob, item)
                        && try_as_cauldron(store, item.id).is_some_and(|c| match &color {
                            Some(color) => c.accepts(color),
                            None => !c.is_full(),
                        })
                })
            }
            TargetQuery::ConstructionSite => nearest_item(world, mob.position, radius, |item| {
                owner_permits(world, mob, item)
                    && try_as_construction(store, item.id).is_some_and(|s| !s.is_complete())
            }),
        }
    }
}

fn walk(world: &World, distance: f64) -> f64 {
    distance * world.config.walk_cost
}

/// Extra cost of putting down something that is in the way
fn hands_penalty(world: &World, mob: &Mob) -> f64 {
    if mob.is_carrying() {
        world.config.drop_penalty
    } else {
        0.0
    }
}

/// Put the carried item down; true when hands are now free
fn free_hands(ctx: &mut TickContext<'_>, mob: MobId) -> Result<bool> {
    match ctx.world.store.require_mob(mob)?.carrying {
        Some(held) => ctx.use_item("drop", mob, held, None),
        None => Ok(true),
    }
}

fn in_reach(ctx: &TickContext<'_>, mob: MobId, cell: Coord) -> Result<bool> {
    let position = ctx.world.store.require_mob(mob)?.position;
    Ok(movement::within(position, cell, ctx.world.config.reach))
}

/// Move toward `cell`; the finished flag for a means that is not there yet
fn approach(ctx: &mut TickContext<'_>, mob: MobId, cell: Coord) -> Result<bool> {
    match movement::head_toward(ctx, mob, cell, true)? {
        Route::Moving => Ok(false),
        // standing next to it but still out of reach, or no way there
        Route::Arrived | Route::Unreachable => Ok(true),
    }
}

/// Placed position of an item
fn cell_of(world: &World, item: ItemId) -> Option<Coord> {
    world.store.item(item).and_then(|i| i.position)
}
