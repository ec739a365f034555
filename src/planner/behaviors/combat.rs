//! Reactions to hostile mobs in sight

use serde_json::json;

use crate::core::error::Result;
use crate::core::types::{Coord, EntityRef, MobId, Position};
use crate::entity::mob::{attr, Mob};
use crate::planner::{AtomicBehavior, Behavior};
use crate::simulation::context::TickContext;
use crate::simulation::lifecycle;
use crate::simulation::movement::{self, Route};
use crate::simulation::perception::nearest_hostile;
use crate::simulation::world::World;

pub struct Flee;

impl Behavior for Flee {
    fn key(&self) -> &'static str {
        "flee"
    }

    fn description(&self) -> &'static str {
        "Running away"
    }

    fn reaction(&self) -> Option<&'static str> {
        Some("Run!")
    }
}

impl AtomicBehavior for Flee {
    fn utility(&self, world: &World, mob: &Mob) -> f64 {
        if nearest_hostile(world, mob).is_none() {
            return f64::NEG_INFINITY;
        }
        let hurt = 1.0 - mob.health_ratio(world.max_health(mob.id));
        60.0 * (1.0 - mob.personality.bravery) + 40.0 * hurt
    }

    fn execute(&self, ctx: &mut TickContext<'_>, id: MobId) -> Result<bool> {
        let mob = ctx.world.store.require_mob(id)?;
        let Some((threat, _)) = nearest_hostile(ctx.world, mob) else {
            movement::halt(ctx.world.store.require_mob_mut(id)?);
            return Ok(true);
        };
        let threat_at = ctx.world.store.require_mob(threat)?.position;
        let mut away = (mob.position - threat_at).normalize();
        if away == Position::default() {
            away = Position::new(1.0, 0.0);
        }
        let goal = (mob.position + away * ctx.world.config.flee_distance).round();
        let (width, height) = ctx.services.geometry.bounds();
        let goal = Coord::new(goal.x.clamp(0, width - 1), goal.y.clamp(0, height - 1));

        match movement::head_toward(ctx, id, goal, true)? {
            Route::Moving => Ok(false),
            Route::Arrived | Route::Unreachable => Ok(true),
        }
    }
}

/// Close in on the nearest hostile and strike it
pub struct Hunt;

impl Behavior for Hunt {
    fn key(&self) -> &'static str {
        "hunt"
    }

    fn description(&self) -> &'static str {
        "Hunting"
    }

    fn reaction(&self) -> Option<&'static str> {
        Some("Grr!")
    }
}

impl AtomicBehavior for Hunt {
    fn utility(&self, world: &World, mob: &Mob) -> f64 {
        let Some((_, distance)) = nearest_hostile(world, mob) else {
            return f64::NEG_INFINITY;
        };
        let fit = mob.health_ratio(world.max_health(mob.id));
        100.0 * mob.personality.aggression * fit - distance
    }

    fn execute(&self, ctx: &mut TickContext<'_>, id: MobId) -> Result<bool> {
        let mob = ctx.world.store.require_mob(id)?;
        let Some((prey, distance)) = nearest_hostile(ctx.world, mob) else {
            return Ok(true);
        };

        if distance > ctx.world.config.reach {
            let cell = ctx.world.store.require_mob(prey)?.cell();
            return match movement::head_toward(ctx, id, cell, true)? {
                Route::Unreachable => Ok(true),
                Route::Moving | Route::Arrived => Ok(false),
            };
        }

        let attack = ctx.world.current(EntityRef::Mob(id), attr::ATTACK);
        let defense = ctx.world.current(EntityRef::Mob(prey), attr::DEFENSE);
        let damage = (attack - defense).max(1.0);
        ctx.publish(
            "mob_attacked",
            json!({ "attacker": id.to_string(), "target": prey.to_string(), "damage": damage }),
        );
        lifecycle::damage_mob(ctx, prey, damage)
    }
}
