//! Eating and drinking consume the item

use serde_json::json;

use super::{deny, reachable, UseHandler};
use crate::core::error::Result;
use crate::core::types::{EntityRef, ItemId, MobId};
use crate::entity::facets::{try_as_edible, try_as_healing, EffectGrant};
use crate::entity::needs::NeedType;
use crate::simulation::context::TickContext;
use crate::simulation::lifecycle;
use crate::simulation::world::World;

fn grant(ctx: &mut TickContext<'_>, actor: MobId, effect: Option<EffectGrant>) {
    if let Some(effect) = effect {
        ctx.apply_effect(
            EntityRef::Mob(actor),
            &effect.attribute,
            effect.delta,
            effect.duration,
        );
    }
}

pub struct Eat;

impl UseHandler for Eat {
    fn key(&self) -> &'static str {
        "eat"
    }

    fn description(&self, world: &World, _actor: MobId, item: ItemId) -> String {
        match try_as_edible(&world.store, item) {
            Some(food) => format!("Eat it ({} nutrition)", food.nutrition),
            None => "Eat it".to_string(),
        }
    }

    fn interact(
        &self,
        ctx: &mut TickContext<'_>,
        actor: MobId,
        item: ItemId,
        _other: Option<MobId>,
    ) -> Result<bool> {
        if reachable(ctx.world, self.key(), actor, item)?.is_none() {
            return Ok(false);
        }
        let Some(food) = try_as_edible(&ctx.world.store, item) else {
            return deny(self.key(), actor, item, "not edible");
        };

        ctx.world
            .store
            .require_mob_mut(actor)?
            .needs
            .change(NeedType::Satiation, food.nutrition);
        grant(ctx, actor, food.effect);
        lifecycle::destroy_item(ctx, item);
        ctx.publish(
            "mob_ate",
            json!({ "mob": actor.to_string(), "item": item.to_string(), "nutrition": food.nutrition }),
        );
        Ok(true)
    }
}

/// Drinking a healing item restores health up to the composed maximum
pub struct Drink;

impl UseHandler for Drink {
    fn key(&self) -> &'static str {
        "drink"
    }

    fn description(&self, world: &World, _actor: MobId, item: ItemId) -> String {
        match try_as_healing(&world.store, item) {
            Some(potion) => format!("Drink it (heals {})", potion.heal),
            None => "Drink it".to_string(),
        }
    }

    fn interact(
        &self,
        ctx: &mut TickContext<'_>,
        actor: MobId,
        item: ItemId,
        _other: Option<MobId>,
    ) -> Result<bool> {
        if reachable(ctx.world, self.key(), actor, item)?.is_none() {
            return Ok(false);
        }
        let Some(potion) = try_as_healing(&ctx.world.store, item) else {
            return deny(self.key(), actor, item, "nothing to drink");
        };

        let max_health = ctx.world.max_health(actor);
        let mob = ctx.world.store.require_mob_mut(actor)?;
        mob.health = (mob.health + potion.heal).clamp(0.0, max_health);
        let health = mob.health;
        grant(ctx, actor, potion.effect);
        lifecycle::destroy_item(ctx, item);
        ctx.publish(
            "mob_healed",
            json!({ "mob": actor.to_string(), "item": item.to_string(), "health": health }),
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::types::{Coord, EntityRef};
    use crate::entity::needs::NeedType;
    use crate::interactions::test_support::Fixture;
    use crate::rules::{GameRules, ItemType};

    fn rules() -> GameRules {
        let mut rules = GameRules::new();
        rules.add_item_type(
            "bread",
            ItemType::new("Bread").carryable().with_attribute("nutrition", 30.0),
        );
        rules.add_item_type(
            "tonic",
            ItemType::new("Tonic")
                .carryable()
                .with_attribute("heal", 25.0)
                .with_attribute("effect_attribute", "speed")
                .with_attribute("effect_delta", 1.0)
                .with_attribute("effect_duration", 20.0),
        );
        rules.add_item_type("rock", ItemType::new("Rock").carryable());
        rules
    }

    #[test]
    fn test_eat_raises_satiation_and_consumes() {
        let mut fx = Fixture::new(rules());
        let mob = fx.mob();
        fx.world.store.mob_mut(mob).unwrap().needs.satiation = 10.0;
        let bread = fx.item("bread", Coord::new(1, 1));
        assert!(fx.interact("eat", mob, bread, None));
        assert_eq!(
            fx.world.store.mob(mob).unwrap().needs.get(NeedType::Satiation),
            40.0
        );
        assert!(!fx.world.store.has_item(bread));

        let rock = fx.item("rock", Coord::new(0, 0));
        assert!(!fx.interact("eat", mob, rock, None));
        assert!(fx.world.store.has_item(rock));
    }

    #[test]
    fn test_drink_heals_to_cap_and_grants_effect() {
        let mut fx = Fixture::new(rules());
        let mob = fx.mob();
        fx.world.store.mob_mut(mob).unwrap().health = 90.0;
        let tonic = fx.item("tonic", Coord::new(0, 0));
        assert!(fx.interact("drink", mob, tonic, None));
        assert_eq!(fx.world.store.mob(mob).unwrap().health, 100.0);
        assert_eq!(fx.world.current(EntityRef::Mob(mob), "speed"), 2.0);
    }
}
