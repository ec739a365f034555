//! Picking up, putting down and handing over

use serde_json::json;

use super::{deny, reachable, UseHandler};
use crate::core::error::Result;
use crate::core::types::{ItemId, MobId};
use crate::entity::item::Ownership;
use crate::simulation::context::TickContext;
use crate::simulation::movement;
use crate::simulation::world::World;

pub struct Pickup;

impl UseHandler for Pickup {
    fn key(&self) -> &'static str {
        "pickup"
    }

    fn description(&self, world: &World, _actor: MobId, item: ItemId) -> String {
        let name = world
            .store
            .item(item)
            .map_or("item", |i| i.item_type.as_str());
        format!("Pick up the {}", name)
    }

    fn interact(
        &self,
        ctx: &mut TickContext<'_>,
        actor: MobId,
        item: ItemId,
        _other: Option<MobId>,
    ) -> Result<bool> {
        let Some((mob, row)) = reachable(ctx.world, self.key(), actor, item)? else {
            return Ok(false);
        };
        if mob.is_carrying() {
            return deny(self.key(), actor, item, "hands full");
        }
        if row.is_carried() {
            return deny(self.key(), actor, item, "already carried");
        }
        if !ctx.world.item_type(row).is_some_and(|t| t.carryable) {
            return deny(self.key(), actor, item, "not carryable");
        }

        ctx.world.store.pick_up(actor, item)?;
        ctx.publish(
            "item_picked_up",
            json!({ "mob": actor.to_string(), "item": item.to_string() }),
        );
        Ok(true)
    }
}

/// Put the carried item down on the actor's cell
pub struct Release;

impl UseHandler for Release {
    fn key(&self) -> &'static str {
        "drop"
    }

    fn description(&self, _world: &World, _actor: MobId, _item: ItemId) -> String {
        "Drop it".to_string()
    }

    fn interact(
        &self,
        ctx: &mut TickContext<'_>,
        actor: MobId,
        item: ItemId,
        _other: Option<MobId>,
    ) -> Result<bool> {
        if ctx.world.store.require_mob(actor)?.carrying != Some(item) {
            return deny(self.key(), actor, item, "not carrying it");
        }
        ctx.world.store.release(actor)?;
        ctx.publish(
            "item_dropped",
            json!({ "mob": actor.to_string(), "item": item.to_string() }),
        );
        Ok(true)
    }
}

/// Hand the carried item to `other`; personal ownership moves with it
pub struct Give;

impl UseHandler for Give {
    fn key(&self) -> &'static str {
        "give"
    }

    fn description(&self, _world: &World, _actor: MobId, _item: ItemId) -> String {
        "Give it away".to_string()
    }

    fn interact(
        &self,
        ctx: &mut TickContext<'_>,
        actor: MobId,
        item: ItemId,
        other: Option<MobId>,
    ) -> Result<bool> {
        let Some(receiver) = other else {
            return deny(self.key(), actor, item, "nobody to give to");
        };
        let giver = ctx.world.store.require_mob(actor)?;
        if giver.carrying != Some(item) {
            return deny(self.key(), actor, item, "not carrying it");
        }
        let Some(taker) = ctx.world.store.mob(receiver) else {
            return deny(self.key(), actor, item, "receiver is gone");
        };
        if taker.is_carrying() {
            return deny(self.key(), actor, item, "receiver's hands are full");
        }
        // handing over needs both mobs side by side
        if giver.position.distance(&taker.position) > ctx.world.config.reach * 2.0 {
            return deny(self.key(), actor, item, "receiver out of reach");
        }

        ctx.world.store.transfer(actor, receiver)?;
        let row = ctx.world.store.require_item_mut(item)?;
        if row.owner == Some(Ownership::Character(actor)) {
            row.owner = Some(Ownership::Character(receiver));
        }
        if let Some(mob) = ctx.world.store.mob_mut(actor) {
            movement::halt(mob);
        }
        ctx.publish(
            "item_given",
            json!({ "from": actor.to_string(), "to": receiver.to_string(), "item": item.to_string() }),
        );
        Ok(true)
    }
}
