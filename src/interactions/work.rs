use serde_json::json;
use std::collections::BTreeMap;

use super::{deny, reachable, UseHandler};
use crate::core::error::Result;
use crate::core::types::{ItemId, MobId};
use crate::entity::facets::{try_as_construction, try_as_material};
use crate::simulation::context::TickContext;
use crate::simulation::lifecycle;
use crate::simulation::world::World;

/// Spend the carried material on a construction site
///
/// A finished site is replaced by the item type it completes into, on
/// the same cell and with the same owner.
pub struct Build;

impl UseHandler for Build {
    fn key(&self) -> &'static str {
        "build"
    }

    fn description(&self, world: &World, _actor: MobId, item: ItemId) -> String {
        match try_as_construction(&world.store, item) {
            Some(site) => format!("Build the {} ({}/{})", site.completes, site.progress, site.required),
            None => "Build".to_string(),
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
        let Some(held) = mob.carrying else {
            return deny(self.key(), actor, item, "no material in hand");
        };
        let Some(material) = try_as_material(&ctx.world.store, held) else {
            return deny(self.key(), actor, item, "carried item is no material");
        };
        let Some(mut site) = try_as_construction(&ctx.world.store, item) else {
            return deny(self.key(), actor, item, "not a construction site");
        };
        if site.is_complete() {
            return deny(self.key(), actor, item, "already complete");
        }
        let (cell, owner) = (row.position, row.owner.clone());

        // the replacement must exist before any progress is written
        let building = if site.progress + material.value >= site.required {
            let building = ctx
                .world
                .generate_item(&site.completes, BTreeMap::new(), cell)?;
            ctx.world.store.require_item_mut(building)?.owner = owner;
            Some(building)
        } else {
            None
        };

        site.contribute(&mut ctx.world.store, material.value)?;
        lifecycle::destroy_item(ctx, held);
        ctx.publish(
            "construction_progressed",
            json!({ "mob": actor.to_string(), "site": item.to_string(), "progress": site.progress, "required": site.required }),
        );

        if let Some(building) = building {
            lifecycle::destroy_item(ctx, item);
            tracing::info!("{} completed {} as {}", actor, site.completes, building);
            ctx.publish(
                "construction_completed",
                json!({ "site": item.to_string(), "building": building.to_string(), "type": site.completes }),
            );
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::error::SimError;
    use crate::core::types::Coord;
    use crate::entity::facets::try_as_construction;
    use crate::interactions::test_support::Fixture;
    use crate::rules::{GameRules, ItemType};

    fn site_rules(completes: &str) -> GameRules {
        let mut rules = GameRules::new();
        rules.add_item_type(
            "site",
            ItemType::new("Site")
                .with_attribute("progress", 0.0)
                .with_attribute("required", 5.0)
                .with_attribute("completes", completes),
        );
        rules.add_item_type(
            "plank",
            ItemType::new("Plank").carryable().with_attribute("material", 5.0),
        );
        rules
    }

    #[test]
    fn test_site_completes_into_building() {
        let mut rules = GameRules::new();
        rules.add_item_type(
            "site",
            ItemType::new("Site")
                .with_attribute("progress", 0.0)
                .with_attribute("required", 10.0)
                .with_attribute("completes", "hut"),
        );
        rules.add_item_type("hut", ItemType::new("Hut"));
        rules.add_item_type(
            "plank",
            ItemType::new("Plank").carryable().with_attribute("material", 5.0),
        );
        let mut fx = Fixture::new(rules);
        let mob = fx.mob();
        let site = fx.item("site", Coord::new(1, 1));

        for round in 0..2 {
            let plank = fx.item("plank", Coord::new(0, 0));
            fx.world.store.pick_up(mob, plank).unwrap();
            assert!(fx.interact("build", mob, site, None));
            assert_eq!(fx.world.store.has_item(site), round == 0);
        }
        let hut = fx
            .world
            .store
            .items()
            .find(|i| i.item_type == "hut")
            .unwrap();
        assert_eq!(hut.position, Some(Coord::new(1, 1)));
    }

    #[test]
    fn test_unknown_building_leaves_site_untouched() {
        let mut fx = Fixture::new(site_rules("castle"));
        let mob = fx.mob();
        let site = fx.item("site", Coord::new(1, 1));
        let plank = fx.item("plank", Coord::new(0, 0));
        fx.world.store.pick_up(mob, plank).unwrap();

        let result = fx.ctx().use_item("build", mob, site, None);
        assert!(matches!(result, Err(SimError::UnknownItemType(_))));
        assert!(fx.world.store.has_item(plank));
        assert_eq!(fx.world.store.mob(mob).unwrap().carrying, Some(plank));
        let site_row = try_as_construction(&fx.world.store, site).unwrap();
        assert_eq!(site_row.progress, 0.0);
        assert!(!site_row.is_complete());
    }

    #[test]
    fn test_partial_progress_needs_no_building_type() {
        let mut rules = site_rules("castle");
        rules.add_item_type(
            "twig",
            ItemType::new("Twig").carryable().with_attribute("material", 2.0),
        );
        let mut fx = Fixture::new(rules);
        let mob = fx.mob();
        let site = fx.item("site", Coord::new(1, 1));
        let twig = fx.item("twig", Coord::new(0, 0));
        fx.world.store.pick_up(mob, twig).unwrap();

        assert!(fx.interact("build", mob, site, None));
        assert!(!fx.world.store.has_item(twig));
        assert_eq!(try_as_construction(&fx.world.store, site).unwrap().progress, 2.0);
    }
}
