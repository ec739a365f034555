use crate::core::error::Result;
use crate::core::types::MobId;
use crate::entity::mob::Mob;
use crate::entity::needs::{NeedType, NEED_MAX};
use crate::planner::{AtomicBehavior, Behavior};
use crate::simulation::context::TickContext;
use crate::simulation::movement;
use crate::simulation::world::World;

/// Hours counted as night
fn is_night(world: &World) -> bool {
    let hour = world.calendar.current_hour();
    !(6..22).contains(&hour)
}

/// Stand still and regain a need each tick until it is full
fn recover(ctx: &mut TickContext<'_>, id: MobId, need: NeedType, gain: f64) -> Result<bool> {
    let mob = ctx.world.store.require_mob_mut(id)?;
    movement::halt(mob);
    mob.needs.change(need, gain);
    Ok(mob.needs.get(need) >= NEED_MAX)
}

pub struct Sleep;

impl Behavior for Sleep {
    fn key(&self) -> &'static str {
        "sleep"
    }

    fn description(&self) -> &'static str {
        "Sleeping"
    }

    fn reaction(&self) -> Option<&'static str> {
        Some("Zzz")
    }
}

impl AtomicBehavior for Sleep {
    fn utility(&self, world: &World, mob: &Mob) -> f64 {
        let tired = mob.needs.deficit(NeedType::Energy) * 100.0 * (0.5 + mob.personality.laziness);
        if is_night(world) {
            tired + 15.0
        } else {
            tired
        }
    }

    fn execute(&self, ctx: &mut TickContext<'_>, id: MobId) -> Result<bool> {
        let gain = ctx.world.config.sleep_gain;
        recover(ctx, id, NeedType::Energy, gain)
    }
}

pub struct Relax;

impl Behavior for Relax {
    fn key(&self) -> &'static str {
        "relax"
    }

    fn description(&self) -> &'static str {
        "Taking it easy"
    }
}

impl AtomicBehavior for Relax {
    fn utility(&self, _world: &World, mob: &Mob) -> f64 {
        mob.needs.deficit(NeedType::Fun) * 80.0 * (0.5 + mob.personality.laziness)
    }

    fn execute(&self, ctx: &mut TickContext<'_>, id: MobId) -> Result<bool> {
        let gain = ctx.world.config.relax_gain;
        recover(ctx, id, NeedType::Fun, gain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactions::test_support::Fixture;
    use crate::rules::GameRules;

    #[test]
    fn test_sleep_restores_energy_until_full() {
        let mut fx = Fixture::new(GameRules::new());
        let mob = fx.mob();
        fx.world.store.mob_mut(mob).unwrap().needs.energy = 92.0;
        assert!(!Sleep.execute(&mut fx.ctx(), mob).unwrap());
        assert!(Sleep.execute(&mut fx.ctx(), mob).unwrap());
        assert_eq!(fx.world.store.mob(mob).unwrap().needs.energy, NEED_MAX);
    }

    #[test]
    fn test_tired_mobs_want_sleep_more() {
        let mut fx = Fixture::new(GameRules::new());
        let mob = fx.mob();
        let rested = Sleep.utility(&fx.world, fx.world.store.mob(mob).unwrap());
        fx.world.store.mob_mut(mob).unwrap().needs.energy = 10.0;
        let tired = Sleep.utility(&fx.world, fx.world.store.mob(mob).unwrap());
        assert!(tired > rested);
    }
}
