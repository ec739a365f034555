//! Death, departure and destruction

use serde_json::json;
use std::collections::BTreeMap;

use crate::core::error::Result;
use crate::core::types::{ItemId, MobId};
use crate::entity::item::AttrValue;
use crate::simulation::context::TickContext;

/// Item type a dead mob's gold is dropped as, when the rules define it
pub const COINS: &str = "coins";

/// Remove a dead mob, leaving its carried item and gold on its cell
pub fn kill_mob(ctx: &mut TickContext<'_>, id: MobId) -> Result<()> {
    let dropped = ctx.world.store.release(id)?;
    let mob = ctx.world.store.require_mob(id)?;
    let (cell, gold, name) = (mob.cell(), mob.gold, mob.name.clone());

    if gold > 0 && ctx.world.rules.item_type(COINS).is_some() {
        let mut overrides = BTreeMap::new();
        overrides.insert("amount".to_string(), AttrValue::from(gold));
        ctx.world.generate_item(COINS, overrides, Some(cell))?;
    }

    ctx.world.store.remove_mob(id);
    tracing::info!("{} ({}) died at {}", name, id, cell);
    ctx.publish(
        "mob_died",
        json!({ "mob": id.to_string(), "cell": [cell.x, cell.y], "dropped": dropped.map(|i| i.to_string()), "gold": gold }),
    );
    Ok(())
}

/// Remove a mob that left for another world, taking its item along
pub fn depart_mob(ctx: &mut TickContext<'_>, id: MobId, destination: &str) -> Result<()> {
    if let Some(item) = ctx.world.store.require_mob(id)?.carrying {
        ctx.world.store.destroy_item(item);
    }
    ctx.world.store.remove_mob(id);
    tracing::info!("{} departed for {}", id, destination);
    ctx.publish(
        "mob_departed",
        json!({ "mob": id.to_string(), "destination": destination }),
    );
    Ok(())
}

/// Apply damage; kills the mob at zero health. Returns true on death.
pub fn damage_mob(ctx: &mut TickContext<'_>, id: MobId, amount: f64) -> Result<bool> {
    let mob = ctx.world.store.require_mob_mut(id)?;
    mob.health = (mob.health - amount.max(0.0)).max(0.0);
    if mob.health > 0.0 {
        return Ok(false);
    }
    kill_mob(ctx, id)?;
    Ok(true)
}

pub fn destroy_item(ctx: &mut TickContext<'_>, id: ItemId) {
    if let Some(item) = ctx.world.store.destroy_item(id) {
        ctx.publish(
            "item_destroyed",
            json!({ "item": id.to_string(), "type": item.item_type }),
        );
    }
}
