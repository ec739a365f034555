//! Goal behaviors scored as benefit minus the cheapest means

use crate::entity::mob::Mob;
use crate::entity::needs::NeedType;
use crate::planner::means::{AskCarrier, Fetch, ItemQuery, Means, Purchase, TargetQuery, UseCarried};
use crate::planner::{Behavior, CompositeBehavior};
use crate::simulation::world::World;

/// The four ways of getting an item and then doing `then` with it
fn obtain(query: ItemQuery, then: Option<&'static str>) -> Vec<Box<dyn Means>> {
    let mut means: Vec<Box<dyn Means>> = Vec::new();
    if let Some(action) = then {
        means.push(Box::new(UseCarried::on_self(query, action)));
    }
    means.push(Box::new(Fetch::new(query, then)));
    means.push(Box::new(Purchase::new(query, then)));
    means.push(Box::new(AskCarrier::new(query, then)));
    means
}

/// Carry the right thing over to a target, fetching it first
fn deliver(query: ItemQuery, action: &'static str, target: TargetQuery) -> Vec<Box<dyn Means>> {
    vec![
        Box::new(UseCarried::on_target(query, action, target)),
        Box::new(Fetch::new(query, None)),
    ]
}

pub struct Meal {
    means: Vec<Box<dyn Means>>,
}

impl Meal {
    pub fn new() -> Self {
        Self {
            means: obtain(ItemQuery::Edible, Some("eat")),
        }
    }
}

impl Behavior for Meal {
    fn key(&self) -> &'static str {
        "meal"
    }

    fn description(&self) -> &'static str {
        "Getting something to eat"
    }

    fn reaction(&self) -> Option<&'static str> {
        Some("I'm starving")
    }
}

impl CompositeBehavior for Meal {
    fn benefit(&self, _world: &World, mob: &Mob) -> f64 {
        mob.needs.deficit(NeedType::Satiation) * 100.0 * (0.5 + mob.personality.gluttony)
    }

    fn means(&self) -> &[Box<dyn Means>] {
        &self.means
    }
}

/// Only ever chosen below full health
pub struct Heal {
    means: Vec<Box<dyn Means>>,
}

impl Heal {
    pub fn new() -> Self {
        Self {
            means: obtain(ItemQuery::Healing, Some("drink")),
        }
    }
}

impl Behavior for Heal {
    fn key(&self) -> &'static str {
        "heal"
    }

    fn description(&self) -> &'static str {
        "Patching up"
    }
}

impl CompositeBehavior for Heal {
    fn benefit(&self, world: &World, mob: &Mob) -> f64 {
        let max_health = world.max_health(mob.id);
        if mob.health >= max_health {
            return f64::NEG_INFINITY;
        }
        (1.0 - mob.health_ratio(max_health)) * 120.0
    }

    fn means(&self) -> &[Box<dyn Means>] {
        &self.means
    }
}

/// Get hold of the mob's favorite item type
pub struct Acquire {
    means: Vec<Box<dyn Means>>,
}

impl Acquire {
    pub fn new() -> Self {
        Self {
            means: obtain(ItemQuery::Favorite, None),
        }
    }
}

impl Behavior for Acquire {
    fn key(&self) -> &'static str {
        "acquire"
    }

    fn description(&self) -> &'static str {
        "Looking for a favorite thing"
    }
}

impl CompositeBehavior for Acquire {
    fn benefit(&self, world: &World, mob: &Mob) -> f64 {
        if mob.favorite_item.is_none() || ItemQuery::Favorite.carried(world, mob).is_some() {
            return f64::NEG_INFINITY;
        }
        20.0 + 30.0 * mob.personality.greed
    }

    fn means(&self) -> &[Box<dyn Means>] {
        &self.means
    }
}

/// Bring ingredients to cauldrons
pub struct Gather {
    means: Vec<Box<dyn Means>>,
}

impl Gather {
    pub fn new() -> Self {
        Self {
            means: deliver(ItemQuery::Ingredient, "brew", TargetQuery::CauldronAccepting),
        }
    }
}

impl Behavior for Gather {
    fn key(&self) -> &'static str {
        "gather"
    }

    fn description(&self) -> &'static str {
        "Gathering ingredients"
    }
}

impl CompositeBehavior for Gather {
    fn benefit(&self, world: &World, mob: &Mob) -> f64 {
        if TargetQuery::CauldronAccepting.nearest(world, mob).is_none() {
            return f64::NEG_INFINITY;
        }
        15.0 + 30.0 * mob.personality.industriousness
    }

    fn means(&self) -> &[Box<dyn Means>] {
        &self.means
    }
}

/// Bring materials to construction sites
pub struct Build {
    means: Vec<Box<dyn Means>>,
}

impl Build {
    pub fn new() -> Self {
        Self {
            means: deliver(ItemQuery::Material, "build", TargetQuery::ConstructionSite),
        }
    }
}

impl Behavior for Build {
    fn key(&self) -> &'static str {
        "build"
    }

    fn description(&self) -> &'static str {
        "Building"
    }
}

impl CompositeBehavior for Build {
    fn benefit(&self, world: &World, mob: &Mob) -> f64 {
        if TargetQuery::ConstructionSite.nearest(world, mob).is_none() {
            return f64::NEG_INFINITY;
        }
        15.0 + 30.0 * mob.personality.industriousness
    }

    fn means(&self) -> &[Box<dyn Means>] {
        &self.means
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactions::test_support::Fixture;
    use crate::planner::Plan;
    use crate::rules::{GameRules, ItemType};
    use crate::core::types::Coord;

    #[test]
    fn test_heal_inapplicable_at_full_health() {
        let mut fx = Fixture::new(GameRules::new());
        let mob = fx.mob();
        let row = fx.world.store.mob(mob).unwrap();
        assert_eq!(Heal::new().benefit(&fx.world, row), f64::NEG_INFINITY);
    }

    #[test]
    fn test_meal_without_food_is_inapplicable() {
        let mut fx = Fixture::new(GameRules::new());
        let mob = fx.mob();
        fx.world.store.mob_mut(mob).unwrap().needs.satiation = 0.0;
        let plan = Plan::Composite(Box::new(Meal::new()));
        let row = fx.world.store.mob(mob).unwrap();
        assert_eq!(plan.evaluate(&fx.world, row).utility, f64::NEG_INFINITY);
    }

    #[test]
    fn test_meal_prefers_free_food_over_shop() {
        let mut rules = GameRules::new();
        rules.add_item_type(
            "apple",
            ItemType::new("Apple").carryable().with_attribute("nutrition", 10.0),
        );
        rules.add_item_type(
            "pie",
            ItemType::new("Pie")
                .carryable()
                .with_attribute("nutrition", 40.0)
                .with_attribute("price", 5.0),
        );
        let mut fx = Fixture::new(rules);
        let mob = fx.mob();
        fx.world.store.mob_mut(mob).unwrap().gold = 20;
        fx.item("pie", Coord::new(1, 0));
        fx.item("apple", Coord::new(3, 0));

        let plan = Plan::Composite(Box::new(Meal::new()));
        let row = fx.world.store.mob(mob).unwrap();
        let eval = plan.evaluate(&fx.world, row);
        // fetch costs 3 walking; buying costs 1 walking plus 5 * 0.5 * 1.0
        assert_eq!(eval.means, Some(1));
    }
}
