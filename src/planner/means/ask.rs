use super::{approach, free_hands, hands_penalty, walk, ItemQuery, Means};
use crate::core::error::Result;
use crate::core::types::{ItemId, MobId};
use crate::entity::mob::Mob;
use crate::simulation::context::TickContext;
use crate::simulation::perception::nearest_mob;
use crate::simulation::world::World;

/// Ask a friendly mob to hand over what it carries
///
/// Shy mobs find asking costly.
pub struct AskCarrier {
    pub query: ItemQuery,
    pub then: Option<&'static str>,
}

impl AskCarrier {
    pub fn new(query: ItemQuery, then: Option<&'static str>) -> Self {
        Self { query, then }
    }

    fn nearest_carrier(&self, world: &World, mob: &Mob) -> Option<(MobId, ItemId, f64)> {
        let (carrier, distance) = nearest_mob(world, mob, world.config.vision_radius, |other| {
            !other.player
                && world.are_friendly(mob, other)
                && other
                    .carrying
                    .is_some_and(|held| self.query.matches(world, mob, held))
        })?;
        let item = world.store.mob(carrier)?.carrying?;
        Some((carrier, item, distance))
    }
}

impl Means for AskCarrier {
    fn key(&self) -> &'static str {
        "ask_carrier"
    }

    fn cost(&self, world: &World, mob: &Mob) -> f64 {
        let ask = world.config.ask_cost * (1.0 - mob.personality.extroversion);
        self.nearest_carrier(world, mob)
            .map_or(f64::INFINITY, |(_, _, d)| {
                walk(world, d) + ask + hands_penalty(world, mob)
            })
    }

    fn execute(&self, ctx: &mut TickContext<'_>, mob: MobId) -> Result<bool> {
        let row = ctx.world.store.require_mob(mob)?;
        let Some((carrier, item, distance)) = self.nearest_carrier(ctx.world, row) else {
            return Ok(true);
        };
        if distance > ctx.world.config.reach * 2.0 {
            let cell = ctx.world.store.require_mob(carrier)?.cell();
            return approach(ctx, mob, cell);
        }

        if free_hands(ctx, mob)? && ctx.use_item("give", carrier, item, Some(mob))? {
            if let Some(action) = self.then {
                ctx.use_item(action, mob, item, None)?;
            }
        }
        Ok(true)
    }
}
