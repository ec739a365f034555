//! What a mob does with nothing better to do

use rand::Rng;

use crate::core::error::Result;
use crate::core::types::{Coord, ItemId, MobId};
use crate::entity::mob::Mob;
use crate::interactions::{owner_permits, within_reach};
use crate::planner::{AtomicBehavior, Behavior};
use crate::simulation::context::TickContext;
use crate::simulation::movement::{self, Route};
use crate::simulation::perception::nearest_item;
use crate::simulation::world::World;

/// Stroll to a random nearby cell; always applicable
pub struct Wander;

impl Behavior for Wander {
    fn key(&self) -> &'static str {
        "wander"
    }

    fn description(&self) -> &'static str {
        "Wandering about"
    }
}

impl AtomicBehavior for Wander {
    fn utility(&self, world: &World, mob: &Mob) -> f64 {
        world.config.wander_base + 20.0 * mob.personality.adventurousness
    }

    fn execute(&self, ctx: &mut TickContext<'_>, id: MobId) -> Result<bool> {
        let mob = ctx.world.store.require_mob(id)?;
        if mob.target.is_some() {
            return Ok(false);
        }
        // the target was cleared on arrival
        if mob.action.as_deref() == Some(self.key()) {
            return Ok(true);
        }

        let here = mob.cell();
        let radius = ctx.world.config.wander_radius.max(1);
        let goal = Coord::new(
            here.x + ctx.world.rng.gen_range(-radius..=radius),
            here.y + ctx.world.rng.gen_range(-radius..=radius),
        );
        match movement::head_toward(ctx, id, goal, true)? {
            Route::Moving => Ok(false),
            Route::Arrived | Route::Unreachable => Ok(true),
        }
    }
}

/// Smash someone else's property
pub struct Vandalize;

impl Vandalize {
    fn victim(world: &World, mob: &Mob) -> Option<(ItemId, f64)> {
        nearest_item(world, mob.position, world.config.vision_radius, |item| {
            item.owner.is_some()
                && !owner_permits(world, mob, item)
                && world.item_type(item).is_some_and(|t| t.smashable)
        })
    }
}

impl Behavior for Vandalize {
    fn key(&self) -> &'static str {
        "vandalize"
    }

    fn description(&self) -> &'static str {
        "Causing trouble"
    }

    fn reaction(&self) -> Option<&'static str> {
        Some("Heh heh")
    }
}

impl AtomicBehavior for Vandalize {
    fn utility(&self, world: &World, mob: &Mob) -> f64 {
        let Some((_, distance)) = Self::victim(world, mob) else {
            return f64::NEG_INFINITY;
        };
        let p = &mob.personality;
        50.0 * p.aggression * (1.0 - p.industriousness) - distance
    }

    fn execute(&self, ctx: &mut TickContext<'_>, id: MobId) -> Result<bool> {
        let mob = ctx.world.store.require_mob(id)?;
        let Some((item, _)) = Self::victim(ctx.world, mob) else {
            return Ok(true);
        };
        let row = ctx.world.store.require_item(item)?;
        if within_reach(ctx.world, mob, row) {
            ctx.use_item("smash", id, item, None)?;
            return Ok(true);
        }
        let Some(cell) = row.position else {
            return Ok(true);
        };
        match movement::head_toward(ctx, id, cell, true)? {
            Route::Moving => Ok(false),
            Route::Arrived | Route::Unreachable => Ok(true),
        }
    }
}
