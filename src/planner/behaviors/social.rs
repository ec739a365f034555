use serde_json::json;

use crate::core::error::Result;
use crate::core::types::MobId;
use crate::entity::mob::Mob;
use crate::entity::needs::NeedType;
use crate::planner::{AtomicBehavior, Behavior};
use crate::simulation::context::TickContext;
use crate::simulation::movement::{self, Route};
use crate::simulation::perception::nearest_mob;
use crate::simulation::world::World;

/// Seek out a friendly mob and talk; both gain social
pub struct Chat;

impl Chat {
    fn partner(world: &World, mob: &Mob) -> Option<(MobId, f64)> {
        nearest_mob(world, mob, world.config.vision_radius, |other| {
            world.are_friendly(mob, other)
        })
    }
}

impl Behavior for Chat {
    fn key(&self) -> &'static str {
        "chat"
    }

    fn description(&self) -> &'static str {
        "Chatting"
    }

    fn reaction(&self) -> Option<&'static str> {
        Some("Hello there!")
    }
}

impl AtomicBehavior for Chat {
    fn utility(&self, world: &World, mob: &Mob) -> f64 {
        if Self::partner(world, mob).is_none() {
            return f64::NEG_INFINITY;
        }
        mob.needs.deficit(NeedType::Social) * 100.0 * (0.5 + mob.personality.extroversion)
    }

    fn execute(&self, ctx: &mut TickContext<'_>, id: MobId) -> Result<bool> {
        let mob = ctx.world.store.require_mob(id)?;
        let Some((partner, distance)) = Self::partner(ctx.world, mob) else {
            return Ok(true);
        };

        if distance > ctx.world.config.reach * 2.0 {
            let cell = ctx.world.store.require_mob(partner)?.cell();
            return match movement::head_toward(ctx, id, cell, true)? {
                Route::Moving => Ok(false),
                Route::Arrived | Route::Unreachable => Ok(true),
            };
        }

        let gain = ctx.world.config.chat_gain;
        for who in [id, partner] {
            let row = ctx.world.store.require_mob_mut(who)?;
            row.needs.change(NeedType::Social, gain);
            movement::halt(row);
        }
        ctx.publish(
            "mobs_chatted",
            json!({ "mob": id.to_string(), "partner": partner.to_string() }),
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Position;
    use crate::interactions::test_support::Fixture;
    use crate::rules::GameRules;

    #[test]
    fn test_chat_lifts_both() {
        let mut fx = Fixture::new(GameRules::new());
        let a = fx.mob();
        let b = fx.mob();
        fx.world.store.mob_mut(b).unwrap().position = Position::new(1.0, 1.0);
        assert!(Chat.execute(&mut fx.ctx(), a).unwrap());
        assert_eq!(fx.world.store.mob(a).unwrap().needs.social, 95.0);
        assert_eq!(fx.world.store.mob(b).unwrap().needs.social, 95.0);
    }

    #[test]
    fn test_alone_means_inapplicable() {
        let mut fx = Fixture::new(GameRules::new());
        let a = fx.mob();
        let row = fx.world.store.mob(a).unwrap();
        assert_eq!(Chat.utility(&fx.world, row), f64::NEG_INFINITY);
    }
}
