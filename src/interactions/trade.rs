//! Buying from stands

use serde_json::json;

use super::{deny, within_reach, UseHandler};
use crate::core::error::Result;
use crate::core::types::{ItemId, MobId};
use crate::entity::facets::try_as_purchasable;
use crate::entity::item::Ownership;
use crate::simulation::context::TickContext;
use crate::simulation::world::World;

/// Pay the price and take the item
///
/// Ownership marks the stand's stock rather than restricting it. A
/// personal owner receives the gold when still alive; the sold item loses
/// its price and owner so the buyer holds it outright.
pub struct Purchase;

impl UseHandler for Purchase {
    fn key(&self) -> &'static str {
        "purchase"
    }

    fn description(&self, world: &World, _actor: MobId, item: ItemId) -> String {
        match try_as_purchasable(&world.store, item) {
            Some(p) => format!("Buy it for {} gold", p.price),
            None => "Buy it".to_string(),
        }
    }

    fn interact(
        &self,
        ctx: &mut TickContext<'_>,
        actor: MobId,
        item: ItemId,
        _other: Option<MobId>,
    ) -> Result<bool> {
        let buyer = ctx.world.store.require_mob(actor)?;
        let row = ctx.world.store.require_item(item)?;
        if !within_reach(ctx.world, buyer, row) {
            return deny(self.key(), actor, item, "out of reach");
        }
        if buyer.is_carrying() {
            return deny(self.key(), actor, item, "hands full");
        }
        if row.is_carried() {
            return deny(self.key(), actor, item, "not on display");
        }
        let Some(offer) = try_as_purchasable(&ctx.world.store, item) else {
            return deny(self.key(), actor, item, "not for sale");
        };
        if buyer.gold < offer.price {
            return deny(self.key(), actor, item, "cannot afford it");
        }
        let seller = match &row.owner {
            Some(Ownership::Character(owner)) => Some(*owner),
            _ => None,
        };

        ctx.world.store.require_mob_mut(actor)?.gold -= offer.price;
        if let Some(seller) = seller.and_then(|s| ctx.world.store.mob_mut(s)) {
            seller.gold += offer.price;
        }
        ctx.world.store.remove_attribute(item, "price")?;
        ctx.world.store.require_item_mut(item)?.owner = None;
        ctx.world.store.pick_up(actor, item)?;
        ctx.publish(
            "item_purchased",
            json!({ "mob": actor.to_string(), "item": item.to_string(), "price": offer.price }),
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::types::Coord;
    use crate::entity::item::Ownership;
    use crate::interactions::test_support::Fixture;
    use crate::rules::{GameRules, ItemType};

    fn rules() -> GameRules {
        let mut rules = GameRules::new();
        rules.add_item_type(
            "pie",
            ItemType::new("Pie")
                .carryable()
                .with_attribute("nutrition", 40.0)
                .with_attribute("price", 6.0),
        );
        rules
    }

    #[test]
    fn test_purchase_moves_gold_and_item() {
        let mut fx = Fixture::new(rules());
        let buyer = fx.mob();
        let baker = fx.mob();
        let pie = fx.item("pie", Coord::new(1, 0));
        fx.world.store.item_mut(pie).unwrap().owner = Some(Ownership::Character(baker));

        assert!(!fx.interact("purchase", buyer, pie, None));

        fx.world.store.mob_mut(buyer).unwrap().gold = 10;
        assert!(fx.interact("purchase", buyer, pie, None));
        assert_eq!(fx.world.store.mob(buyer).unwrap().gold, 4);
        assert_eq!(fx.world.store.mob(baker).unwrap().gold, 6);
        assert_eq!(fx.world.store.carrier_of(pie), Some(buyer));
        assert!(fx.world.store.number(pie, "price").is_none());
        assert!(fx.world.store.item(pie).unwrap().owner.is_none());
    }
}
