//! Spawners keep a bounded population around themselves
//!
//! Parameters: `item` or `template` (what to spawn), `rate` (ticks
//! between attempts, default 1), `radius` (cells, default 3) and `max`
//! (how many may exist within the radius, default 1).

use rand::Rng;
use serde_json::json;
use std::collections::BTreeMap;

use super::{number_param, text_param, OnTickHandler, Params};
use crate::core::error::Result;
use crate::core::types::{Coord, ItemId};
use crate::simulation::context::TickContext;

struct Spawner {
    origin: Coord,
    radius: i32,
    max: usize,
}

impl Spawner {
    /// `None` while carried or between attempts
    fn due(ctx: &TickContext<'_>, item: ItemId, params: &Params) -> Result<Option<Self>> {
        let Some(origin) = ctx.world.store.require_item(item)?.position else {
            return Ok(None);
        };
        let rate = number_param(params, "rate", 1.0).max(1.0) as u64;
        if ctx.now() % rate != 0 {
            return Ok(None);
        }
        Ok(Some(Self {
            origin,
            radius: number_param(params, "radius", 3.0).max(0.0) as i32,
            max: number_param(params, "max", 1.0).max(0.0) as usize,
        }))
    }

    fn covers(&self, cell: Coord) -> bool {
        (cell.x - self.origin.x).abs() <= self.radius && (cell.y - self.origin.y).abs() <= self.radius
    }

    /// Random walkable cell within the radius, if one turns up
    fn pick_cell(&self, ctx: &mut TickContext<'_>) -> Option<Coord> {
        for _ in 0..8 {
            let cell = Coord::new(
                self.origin.x + ctx.world.rng.gen_range(-self.radius..=self.radius),
                self.origin.y + ctx.world.rng.gen_range(-self.radius..=self.radius),
            );
            if ctx.services.geometry.is_walkable(cell) {
                return Some(cell);
            }
        }
        None
    }
}

pub struct SpawnItem;

impl OnTickHandler for SpawnItem {
    fn key(&self) -> &'static str {
        "spawn_item"
    }

    fn on_tick(&self, ctx: &mut TickContext<'_>, item: ItemId, params: &Params) -> Result<bool> {
        let type_key = text_param(params, "item", self.key())?;
        let Some(spawner) = Spawner::due(ctx, item, params)? else {
            return Ok(true);
        };
        let present = ctx
            .world
            .store
            .items()
            .filter(|i| i.item_type == type_key && i.position.is_some_and(|p| spawner.covers(p)))
            .count();
        if present >= spawner.max {
            return Ok(true);
        }
        let Some(cell) = spawner.pick_cell(ctx) else {
            return Ok(true);
        };

        let spawned = ctx.world.generate_item(type_key, BTreeMap::new(), Some(cell))?;
        tracing::debug!("{} spawned {} ({}) at {}", item, spawned, type_key, cell);
        ctx.publish(
            "item_spawned",
            json!({ "spawner": item.to_string(), "item": spawned.to_string(), "type": type_key }),
        );
        Ok(true)
    }
}

pub struct SpawnMob;

impl OnTickHandler for SpawnMob {
    fn key(&self) -> &'static str {
        "spawn_mob"
    }

    fn on_tick(&self, ctx: &mut TickContext<'_>, item: ItemId, params: &Params) -> Result<bool> {
        let template = text_param(params, "template", self.key())?;
        let Some(spawner) = Spawner::due(ctx, item, params)? else {
            return Ok(true);
        };
        let present = ctx
            .world
            .store
            .mobs()
            .filter(|m| m.template == template && spawner.covers(m.cell()))
            .count();
        if present >= spawner.max {
            return Ok(true);
        }
        let Some(cell) = spawner.pick_cell(ctx) else {
            return Ok(true);
        };

        let mob = ctx.world.spawn_mob(template, cell)?;
        tracing::info!("{} spawned {} ({}) at {}", item, mob, template, cell);
        ctx.publish(
            "mob_spawned",
            json!({ "spawner": item.to_string(), "mob": mob.to_string(), "template": template }),
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::item::AttrValue;
    use crate::interactions::test_support::Fixture;
    use crate::rules::{GameRules, ItemType, MobTemplate};

    fn rules() -> GameRules {
        let mut rules = GameRules::new();
        rules.add_item_type("bush", ItemType::new("Bush"));
        rules.add_item_type("berry", ItemType::new("Berry").carryable());
        rules.add_item_type("den", ItemType::new("Den"));
        rules.add_template(
            "wolf",
            MobTemplate {
                name: "Wolf".into(),
                speed: 2.0,
                attack: 6.0,
                defense: 1.0,
                max_health: 40.0,
                gold: 0,
                favorite_item: None,
                community: None,
                player: false,
                unlocks: Vec::new(),
                personality: None,
            },
        );
        rules
    }

    fn params(pairs: &[(&str, AttrValue)]) -> Params {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_spawn_item_respects_max() {
        let mut fx = Fixture::new(rules());
        let bush = fx.item("bush", Coord::new(10, 10));
        let p = params(&[("item", "berry".into()), ("max", 2.0.into()), ("radius", 2.0.into())]);
        for _ in 0..10 {
            assert!(SpawnItem.on_tick(&mut fx.ctx(), bush, &p).unwrap());
        }
        let berries: Vec<_> = fx
            .world
            .store
            .items()
            .filter(|i| i.item_type == "berry")
            .collect();
        assert_eq!(berries.len(), 2);
        assert!(berries
            .iter()
            .all(|b| b.position.unwrap().distance(&Coord::new(10, 10)) <= 3.0));
    }

    #[test]
    fn test_spawn_mob_and_missing_param() {
        let mut fx = Fixture::new(rules());
        let den = fx.item("den", Coord::new(5, 5));
        let p = params(&[("template", "wolf".into())]);
        SpawnMob.on_tick(&mut fx.ctx(), den, &p).unwrap();
        SpawnMob.on_tick(&mut fx.ctx(), den, &p).unwrap();
        assert_eq!(fx.world.store.mob_count(), 1);

        let missing = params(&[]);
        assert!(SpawnMob.on_tick(&mut fx.ctx(), den, &missing).is_err());
    }
}
