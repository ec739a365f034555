//! Cauldrons: stir in distinct ingredients, ladle out the brew

use serde_json::json;
use std::collections::BTreeMap;

use super::{deny, reachable, UseHandler};
use crate::core::error::Result;
use crate::core::types::{ItemId, MobId};
use crate::entity::facets::{try_as_cauldron, try_as_ingredient};
use crate::simulation::context::TickContext;
use crate::simulation::lifecycle;
use crate::simulation::world::World;

/// Add the carried ingredient to the cauldron `item`
pub struct Brew;

impl UseHandler for Brew {
    fn key(&self) -> &'static str {
        "brew"
    }

    fn description(&self, world: &World, _actor: MobId, item: ItemId) -> String {
        match try_as_cauldron(&world.store, item) {
            Some(c) => format!("Stir in an ingredient ({}/{})", c.ingredients, c.capacity),
            None => "Stir in an ingredient".to_string(),
        }
    }

    fn interact(
        &self,
        ctx: &mut TickContext<'_>,
        actor: MobId,
        item: ItemId,
        _other: Option<MobId>,
    ) -> Result<bool> {
        let Some((mob, _)) = reachable(ctx.world, self.key(), actor, item)? else {
            return Ok(false);
        };
        let Some(held) = mob.carrying else {
            return deny(self.key(), actor, item, "no ingredient in hand");
        };
        let Some(ingredient) = try_as_ingredient(&ctx.world.store, held) else {
            return deny(self.key(), actor, item, "carried item is no ingredient");
        };
        let Some(mut cauldron) = try_as_cauldron(&ctx.world.store, item) else {
            return deny(self.key(), actor, item, "not a cauldron");
        };
        if !cauldron.accepts(&ingredient.color) {
            return deny(self.key(), actor, item, "cauldron full or color already in");
        }

        cauldron.add(&mut ctx.world.store, &ingredient.color)?;
        lifecycle::destroy_item(ctx, held);
        ctx.publish(
            "cauldron_stirred",
            json!({ "mob": actor.to_string(), "cauldron": item.to_string(), "color": ingredient.color, "ingredients": cauldron.ingredients }),
        );
        Ok(true)
    }
}

/// Take the finished brew out of a full cauldron
pub struct Ladle;

impl UseHandler for Ladle {
    fn key(&self) -> &'static str {
        "ladle"
    }

    fn description(&self, _world: &World, _actor: MobId, _item: ItemId) -> String {
        "Ladle out the brew".to_string()
    }

    fn interact(
        &self,
        ctx: &mut TickContext<'_>,
        actor: MobId,
        item: ItemId,
        _other: Option<MobId>,
    ) -> Result<bool> {
        let Some((mob, _)) = reachable(ctx.world, self.key(), actor, item)? else {
            return Ok(false);
        };
        if mob.is_carrying() {
            return deny(self.key(), actor, item, "hands full");
        }
        let Some(mut cauldron) = try_as_cauldron(&ctx.world.store, item) else {
            return deny(self.key(), actor, item, "not a cauldron");
        };
        if !cauldron.is_full() {
            return deny(self.key(), actor, item, "brew not ready");
        }
        let Some(product) = cauldron.yields.clone() else {
            return deny(self.key(), actor, item, "cauldron yields nothing");
        };

        let mut overrides = BTreeMap::new();
        overrides.insert("colors".to_string(), cauldron.colors.join(",").into());
        let brew = ctx.world.generate_item(&product, overrides, None)?;
        ctx.world.store.pick_up(actor, brew)?;
        cauldron.reset(&mut ctx.world.store)?;
        ctx.publish(
            "brew_ladled",
            json!({ "mob": actor.to_string(), "cauldron": item.to_string(), "brew": brew.to_string() }),
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::types::Coord;
    use crate::entity::facets::try_as_cauldron;
    use crate::interactions::test_support::Fixture;
    use crate::rules::{GameRules, ItemType};

    fn rules() -> GameRules {
        let mut rules = GameRules::new();
        rules.add_item_type(
            "cauldron",
            ItemType::new("Cauldron")
                .with_attribute("ingredients", 0.0)
                .with_attribute("capacity", 3.0)
                .with_attribute("yields", "potion")
                .with_interaction("brew")
                .with_interaction("ladle"),
        );
        for color in ["red", "blue", "green"] {
            rules.add_item_type(
                format!("{}_herb", color),
                ItemType::new("Herb").carryable().with_attribute("color", color),
            );
        }
        rules.add_item_type(
            "potion",
            ItemType::new("Potion").carryable().with_attribute("heal", 40.0),
        );
        rules
    }

    #[test]
    fn test_duplicate_color_rejected() {
        let mut fx = Fixture::new(rules());
        let mob = fx.mob();
        let pot = fx.item("cauldron", Coord::new(1, 0));
        let first = fx.item("red_herb", Coord::new(0, 0));
        fx.world.store.pick_up(mob, first).unwrap();
        assert!(fx.interact("brew", mob, pot, None));
        assert!(!fx.world.store.has_item(first));

        let second = fx.item("red_herb", Coord::new(0, 0));
        fx.world.store.pick_up(mob, second).unwrap();
        assert!(!fx.interact("brew", mob, pot, None));
        assert!(fx.world.store.has_item(second));
        assert_eq!(try_as_cauldron(&fx.world.store, pot).unwrap().ingredients, 1);
    }

    #[test]
    fn test_ladle_requires_full_cauldron() {
        let mut fx = Fixture::new(rules());
        let mob = fx.mob();
        let pot = fx.item("cauldron", Coord::new(1, 0));
        assert!(!fx.interact("ladle", mob, pot, None));

        for color in ["red", "blue", "green"] {
            let herb = fx.item(&format!("{}_herb", color), Coord::new(0, 0));
            fx.world.store.pick_up(mob, herb).unwrap();
            assert!(fx.interact("brew", mob, pot, None));
        }
        assert!(fx.interact("ladle", mob, pot, None));
        let brew = fx.world.store.mob(mob).unwrap().carrying.unwrap();
        assert_eq!(fx.world.store.item(brew).unwrap().item_type, "potion");
        assert_eq!(try_as_cauldron(&fx.world.store, pot).unwrap().ingredients, 0);
    }
}
