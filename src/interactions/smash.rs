use serde_json::json;

use super::{deny, within_reach, UseHandler};
use crate::core::error::Result;
use crate::core::types::{ItemId, MobId};
use crate::simulation::context::TickContext;
use crate::simulation::lifecycle;
use crate::simulation::world::World;

/// Break a smashable item; ownership does not protect it
pub struct Smash;

impl UseHandler for Smash {
    fn key(&self) -> &'static str {
        "smash"
    }

    fn description(&self, _world: &World, _actor: MobId, _item: ItemId) -> String {
        "Smash it".to_string()
    }

    fn interact(
        &self,
        ctx: &mut TickContext<'_>,
        actor: MobId,
        item: ItemId,
        _other: Option<MobId>,
    ) -> Result<bool> {
        let mob = ctx.world.store.require_mob(actor)?;
        let row = ctx.world.store.require_item(item)?;
        if row.is_carried() {
            return deny(self.key(), actor, item, "someone is holding it");
        }
        if !within_reach(ctx.world, mob, row) {
            return deny(self.key(), actor, item, "out of reach");
        }
        if !ctx.world.item_type(row).is_some_and(|t| t.smashable) {
            return deny(self.key(), actor, item, "too sturdy");
        }

        lifecycle::destroy_item(ctx, item);
        ctx.publish(
            "item_smashed",
            json!({ "mob": actor.to_string(), "item": item.to_string() }),
        );
        Ok(true)
    }
}
