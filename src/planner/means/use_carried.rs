use super::{approach, cell_of, in_reach, walk, ItemQuery, Means, TargetQuery};
use crate::core::error::Result;
use crate::core::types::MobId;
use crate::entity::mob::Mob;
use crate::simulation::context::TickContext;
use crate::simulation::world::World;

/// Apply the item already in hand, to itself or to a nearby target
pub struct UseCarried {
    pub query: ItemQuery,
    pub action: &'static str,
    pub target: Option<TargetQuery>,
}

impl UseCarried {
    pub fn on_self(query: ItemQuery, action: &'static str) -> Self {
        Self {
            query,
            action,
            target: None,
        }
    }

    pub fn on_target(query: ItemQuery, action: &'static str, target: TargetQuery) -> Self {
        Self {
            query,
            action,
            target: Some(target),
        }
    }
}

impl Means for UseCarried {
    fn key(&self) -> &'static str {
        "use_carried"
    }

    fn cost(&self, world: &World, mob: &Mob) -> f64 {
        if self.query.carried(world, mob).is_none() {
            return f64::INFINITY;
        }
        match self.target {
            None => 0.0,
            Some(target) => target
                .nearest(world, mob)
                .map_or(f64::INFINITY, |(_, d)| walk(world, d)),
        }
    }

    fn execute(&self, ctx: &mut TickContext<'_>, mob: MobId) -> Result<bool> {
        let row = ctx.world.store.require_mob(mob)?;
        let Some(held) = self.query.carried(ctx.world, row) else {
            return Ok(true);
        };
        let Some(target) = self.target else {
            ctx.use_item(self.action, mob, held, None)?;
            return Ok(true);
        };

        let Some((site, _)) = target.nearest(ctx.world, row) else {
            return Ok(true);
        };
        let Some(cell) = cell_of(ctx.world, site) else {
            return Ok(true);
        };
        if in_reach(ctx, mob, cell)? {
            ctx.use_item(self.action, mob, site, None)?;
            return Ok(true);
        }
        approach(ctx, mob, cell)
    }
}
