use super::{approach, cell_of, free_hands, hands_penalty, in_reach, walk, ItemQuery, Means};
use crate::core::error::Result;
use crate::core::types::{ItemId, MobId};
use crate::entity::facets::try_as_purchasable;
use crate::entity::mob::Mob;
use crate::simulation::context::TickContext;
use crate::simulation::world::World;

/// Buy a matching item the mob can afford; greedier mobs mind the price more
pub struct Purchase {
    pub query: ItemQuery,
    pub then: Option<&'static str>,
}

impl Purchase {
    pub fn new(query: ItemQuery, then: Option<&'static str>) -> Self {
        Self { query, then }
    }

    /// Cheapest offer by total cost, not nearest
    fn best_offer(&self, world: &World, mob: &Mob) -> Option<(ItemId, f64)> {
        let weight = world.config.price_weight * (0.5 + mob.personality.greed);
        let mut best: Option<(ItemId, f64)> = None;
        for item in world.store.items() {
            let Some(cell) = item.position else {
                continue;
            };
            let distance = mob.position.distance(&cell.to_position());
            if distance > world.config.vision_radius {
                continue;
            }
            let Some(offer) = try_as_purchasable(&world.store, item.id) else {
                continue;
            };
            if offer.price > mob.gold || !self.query.matches(world, mob, item.id) {
                continue;
            }
            let cost = walk(world, distance) + offer.price as f64 * weight;
            if best.map_or(true, |(_, c)| cost < c) {
                best = Some((item.id, cost));
            }
        }
        best
    }
}

impl Means for Purchase {
    fn key(&self) -> &'static str {
        "purchase"
    }

    fn cost(&self, world: &World, mob: &Mob) -> f64 {
        self.best_offer(world, mob)
            .map_or(f64::INFINITY, |(_, c)| c + hands_penalty(world, mob))
    }

    fn execute(&self, ctx: &mut TickContext<'_>, mob: MobId) -> Result<bool> {
        let row = ctx.world.store.require_mob(mob)?;
        let Some((item, _)) = self.best_offer(ctx.world, row) else {
            return Ok(true);
        };
        let Some(cell) = cell_of(ctx.world, item) else {
            return Ok(true);
        };
        if !in_reach(ctx, mob, cell)? {
            return approach(ctx, mob, cell);
        }

        if free_hands(ctx, mob)? && ctx.use_item("purchase", mob, item, None)? {
            if let Some(action) = self.then {
                ctx.use_item(action, mob, item, None)?;
            }
        }
        Ok(true)
    }
}
