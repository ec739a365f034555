//! Path following and routing
//!
//! Paths are lists of grid cells; a mob slides between cell centers at its
//! composed speed. Routing asks the pathfinder each time it is called so
//! moving targets are tracked.

use ahash::AHashSet;

use crate::core::error::Result;
use crate::core::types::{Coord, MobId, Position};
use crate::entity::mob::Mob;
use crate::simulation::context::TickContext;
use crate::simulation::world::World;

/// Result of asking to move somewhere
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Arrived,
    Moving,
    Unreachable,
}

/// Advance along the path by `distance`, clearing the target on arrival
pub fn follow_path(mob: &mut Mob, distance: f64) -> Result<()> {
    let mut remaining = distance.max(0.0);
    while remaining > 0.0 {
        let Some(&next) = mob.path.first() else {
            break;
        };
        let goal = next.to_position();
        let gap = mob.position.distance(&goal);
        if gap <= remaining {
            mob.position = goal;
            mob.path.remove(0);
            remaining -= gap;
        } else {
            let step = (goal - mob.position).normalize() * remaining;
            mob.position = mob.position + step;
            remaining = 0.0;
        }
    }

    if mob.path.is_empty() {
        if let Some(target) = mob.target {
            if mob.position.to_target()? == target {
                mob.target = None;
            }
        }
    }
    Ok(())
}

/// Within `reach` of a cell center
pub fn within(position: Position, cell: Coord, reach: f64) -> bool {
    position.distance(&cell.to_position()) <= reach
}

/// Cells occupied by placed items whose type cannot be walked over
pub fn obstacles(world: &World) -> AHashSet<Coord> {
    world
        .store
        .items()
        .filter(|i| world.item_type(i).is_some_and(|t| !t.walkable))
        .filter_map(|i| i.position)
        .collect()
}

/// Plan a path toward `target` and store it on the mob
pub fn head_toward(ctx: &mut TickContext<'_>, id: MobId, target: Coord, fuzzy: bool) -> Result<Route> {
    let mob = ctx.world.store.require_mob(id)?;
    let here = mob.cell();
    if here == target && mob.path.is_empty() {
        return Ok(Route::Arrived);
    }

    let blocked = obstacles(ctx.world);
    let path = ctx
        .services
        .path_around(&blocked, &mob.unlocks, here, target, fuzzy);
    let Some(&last) = path.last() else {
        if fuzzy && here.distance(&target) < 1.5 {
            return Ok(Route::Arrived);
        }
        return Ok(Route::Unreachable);
    };

    let mob = ctx.world.store.require_mob_mut(id)?;
    mob.path = path;
    mob.target = Some(last);
    Ok(Route::Moving)
}

/// Drop any pending movement
pub fn halt(mob: &mut Mob) {
    mob.path.clear();
    mob.target = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SimError;
    use crate::core::types::MobId;
    use crate::store::test_support::bare_mob;

    #[test]
    fn test_follow_path_moves_by_distance() {
        let mut mob = bare_mob(MobId(1));
        mob.path = vec![Coord::new(1, 0), Coord::new(2, 0)];
        mob.target = Some(Coord::new(2, 0));

        follow_path(&mut mob, 1.5).unwrap();
        assert!((mob.position.x - 1.5).abs() < 1e-9);
        assert_eq!(mob.path, vec![Coord::new(2, 0)]);
        assert!(mob.target.is_some());

        follow_path(&mut mob, 5.0).unwrap();
        assert_eq!(mob.position, Position::new(2.0, 0.0));
        assert!(mob.path.is_empty());
        assert!(mob.target.is_none());
    }

    #[test]
    fn test_unwalkable_items_are_obstacles() {
        use crate::core::config::SimulationConfig;
        use crate::rules::{GameRules, ItemType};
        use std::collections::BTreeMap;

        let mut rules = GameRules::new();
        let mut well = ItemType::new("Well");
        well.walkable = false;
        rules.add_item_type("well", well);
        rules.add_item_type("flower", ItemType::new("Flower"));
        let mut world = World::new(SimulationConfig::default(), rules).unwrap();
        world
            .generate_item("well", BTreeMap::new(), Some(Coord::new(2, 2)))
            .unwrap();
        world
            .generate_item("flower", BTreeMap::new(), Some(Coord::new(3, 3)))
            .unwrap();

        let blocked = obstacles(&world);
        assert!(blocked.contains(&Coord::new(2, 2)));
        assert!(!blocked.contains(&Coord::new(3, 3)));
    }

    #[test]
    fn test_stalled_fractional_target_is_invariant_violation() {
        let mut mob = bare_mob(MobId(1));
        mob.position = Position::new(0.5, 0.0);
        mob.target = Some(Coord::new(1, 0));
        assert!(matches!(
            follow_path(&mut mob, 1.0),
            Err(SimError::Invariant(_))
        ));
    }
}
