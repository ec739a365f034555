use super::{approach, cell_of, free_hands, hands_penalty, in_reach, walk, ItemQuery, Means};
use crate::core::error::Result;
use crate::core::types::{ItemId, MobId};
use crate::entity::mob::Mob;
use crate::interactions::owner_permits;
use crate::simulation::context::TickContext;
use crate::simulation::perception::nearest_item;
use crate::simulation::world::World;

/// Walk to a free matching item and take it
///
/// With `then`, the item is used on the spot (eating from the ground)
/// instead of being picked up.
pub struct Fetch {
    pub query: ItemQuery,
    pub then: Option<&'static str>,
}

impl Fetch {
    pub fn new(query: ItemQuery, then: Option<&'static str>) -> Self {
        Self { query, then }
    }

    fn nearest(&self, world: &World, mob: &Mob) -> Option<(ItemId, f64)> {
        nearest_item(world, mob.position, world.config.vision_radius, |item| {
            let takeable = self.then.is_some()
                || world.item_type(item).is_some_and(|t| t.carryable);
            takeable
                && !world.store.has_attribute(item.id, "price")
                && owner_permits(world, mob, item)
                && self.query.matches(world, mob, item.id)
        })
    }
}

impl Means for Fetch {
    fn key(&self) -> &'static str {
        "fetch"
    }

    fn cost(&self, world: &World, mob: &Mob) -> f64 {
        if self.then.is_none() && self.query.carried(world, mob).is_some() {
            return f64::INFINITY;
        }
        let penalty = if self.then.is_some() {
            0.0
        } else {
            hands_penalty(world, mob)
        };
        self.nearest(world, mob)
            .map_or(f64::INFINITY, |(_, d)| walk(world, d) + penalty)
    }

    fn execute(&self, ctx: &mut TickContext<'_>, mob: MobId) -> Result<bool> {
        let row = ctx.world.store.require_mob(mob)?;
        let Some((item, _)) = self.nearest(ctx.world, row) else {
            return Ok(true);
        };
        let Some(cell) = cell_of(ctx.world, item) else {
            return Ok(true);
        };
        if !in_reach(ctx, mob, cell)? {
            return approach(ctx, mob, cell);
        }

        match self.then {
            Some(action) => {
                ctx.use_item(action, mob, item, None)?;
            }
            None => {
                if free_hands(ctx, mob)? {
                    ctx.use_item("pickup", mob, item, None)?;
                }
            }
        }
        Ok(true)
    }
}
