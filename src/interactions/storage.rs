//! Containers hold counted stock by item type, not item rows

use serde_json::json;
use std::collections::BTreeMap;

use super::{deny, may_unlock, reachable, UseHandler};
use crate::core::error::Result;
use crate::core::types::{ItemId, MobId};
use crate::entity::facets::try_as_container;
use crate::simulation::context::TickContext;
use crate::simulation::lifecycle;
use crate::simulation::world::World;

/// Put the carried item into a container
pub struct Stock;

impl UseHandler for Stock {
    fn key(&self) -> &'static str {
        "stock"
    }

    fn description(&self, _world: &World, _actor: MobId, _item: ItemId) -> String {
        "Store the carried item".to_string()
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
        if !may_unlock(mob, row) {
            return deny(self.key(), actor, item, "locked");
        }
        let Some(held) = mob.carrying.filter(|h| *h != item) else {
            return deny(self.key(), actor, item, "nothing to store");
        };
        let Some(mut container) = try_as_container(&ctx.world.store, item)? else {
            return deny(self.key(), actor, item, "not a container");
        };
        let held_type = ctx.world.store.require_item(held)?.item_type.clone();

        container.add(&mut ctx.world.store, &held_type)?;
        lifecycle::destroy_item(ctx, held);
        ctx.publish(
            "item_stocked",
            json!({ "mob": actor.to_string(), "container": item.to_string(), "type": held_type }),
        );
        Ok(true)
    }
}

/// Take one unit out of a container into empty hands
pub struct Withdraw;

impl UseHandler for Withdraw {
    fn key(&self) -> &'static str {
        "withdraw"
    }

    fn description(&self, world: &World, _actor: MobId, item: ItemId) -> String {
        match try_as_container(&world.store, item) {
            Ok(Some(c)) if c.is_empty() => "The container is empty".to_string(),
            _ => "Take something out".to_string(),
        }
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
        if !may_unlock(mob, row) {
            return deny(self.key(), actor, item, "locked");
        }
        if mob.is_carrying() {
            return deny(self.key(), actor, item, "hands full");
        }
        let Some(mut container) = try_as_container(&ctx.world.store, item)? else {
            return deny(self.key(), actor, item, "not a container");
        };
        let Some(type_key) = container.take_any(&mut ctx.world.store)? else {
            return deny(self.key(), actor, item, "empty");
        };

        let taken = ctx.world.generate_item(&type_key, BTreeMap::new(), None)?;
        ctx.world.store.pick_up(actor, taken)?;
        ctx.publish(
            "item_withdrawn",
            json!({ "mob": actor.to_string(), "container": item.to_string(), "item": taken.to_string() }),
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::types::Coord;
    use crate::entity::facets::try_as_container;
    use crate::entity::item::Lock;
    use crate::interactions::test_support::Fixture;
    use crate::rules::{GameRules, ItemType};

    fn rules() -> GameRules {
        let mut rules = GameRules::new();
        rules.add_item_type(
            "chest",
            ItemType::new("Chest").with_attribute("inventory", "{}"),
        );
        rules.add_item_type("apple", ItemType::new("Apple").carryable());
        rules
    }

    #[test]
    fn test_stock_then_withdraw() {
        let mut fx = Fixture::new(rules());
        let mob = fx.mob();
        let chest = fx.item("chest", Coord::new(1, 0));
        let apple = fx.item("apple", Coord::new(0, 0));

        assert!(!fx.interact("stock", mob, chest, None));
        fx.world.store.pick_up(mob, apple).unwrap();
        assert!(fx.interact("stock", mob, chest, None));
        assert!(!fx.world.store.has_item(apple));
        let stock = try_as_container(&fx.world.store, chest).unwrap().unwrap();
        assert_eq!(stock.count("apple"), 1);

        assert!(fx.interact("withdraw", mob, chest, None));
        let held = fx.world.store.mob(mob).unwrap().carrying.unwrap();
        assert_eq!(fx.world.store.item(held).unwrap().item_type, "apple");
        assert!(!fx.interact("withdraw", mob, chest, None));
    }

    #[test]
    fn test_locked_container_needs_key() {
        let mut fx = Fixture::new(rules());
        let mob = fx.mob();
        let chest = fx.item("chest", Coord::new(0, 0));
        fx.world.store.item_mut(chest).unwrap().lock = Some(Lock { key: "brass".into() });
        let apple = fx.item("apple", Coord::new(0, 0));
        fx.world.store.pick_up(mob, apple).unwrap();

        assert!(!fx.interact("stock", mob, chest, None));
        fx.world.store.mob_mut(mob).unwrap().unlocks.push("brass".into());
        assert!(fx.interact("stock", mob, chest, None));
    }
}
