use serde_json::json;

use super::{deny, may_unlock, reachable, UseHandler};
use crate::core::error::Result;
use crate::core::types::{ItemId, MobId};
use crate::entity::facets::try_as_portal;
use crate::simulation::context::TickContext;
use crate::simulation::lifecycle;
use crate::simulation::world::World;

/// Step through a portal to the named world
///
/// The destination must appear in the world registry; an unreachable
/// registry yields no worlds, so the portal simply stays shut.
pub struct EnterPortal;

impl UseHandler for EnterPortal {
    fn key(&self) -> &'static str {
        "enter_portal"
    }

    fn description(&self, world: &World, _actor: MobId, item: ItemId) -> String {
        match try_as_portal(&world.store, item) {
            Some(p) => format!("Travel to {}", p.destination),
            None => "Enter the portal".to_string(),
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
        let Some(portal) = try_as_portal(&ctx.world.store, item) else {
            return deny(self.key(), actor, item, "not a portal");
        };
        let Some(world) = ctx
            .services
            .worlds()
            .into_iter()
            .find(|w| w.name == portal.destination)
        else {
            return deny(self.key(), actor, item, "destination offline");
        };

        ctx.publish(
            "portal_entered",
            json!({ "mob": actor.to_string(), "world": world.id.to_string(), "address": world.address }),
        );
        lifecycle::depart_mob(ctx, actor, &world.name)?;
        Ok(true)
    }
}
