//! Integration tests for the tick driver
//!
//! - Health stays within [0, max_health] over a long mixed run
//! - One entity's fatal error leaves the others untouched
//! - Death drops the carried item and gold
//! - Spawners keep their population bounded

use std::sync::Arc;

use hearthfall::core::error::{Result, SimError};
use hearthfall::core::types::{Coord, EntityRef, ItemId, Position};
use hearthfall::entity::mob::attr;
use hearthfall::interactions::UseRegistry;
use hearthfall::ontick::{OnTickHandler, OnTickRegistry, Params};
use hearthfall::planner::Planner;
use hearthfall::rules::{parse_rules, GameRules, ItemType, OnTickSpec};
use hearthfall::services::{EventLog, GridMap, GridPathfinder, StaticWorldRegistry};
use hearthfall::simulation::TickContext;
use hearthfall::{Services, Simulation, SimulationConfig, World};

const VILLAGE: &str = r#"
alliances = [["village", "traders"]]

[items.apple]
name = "Apple"
carryable = true
interactions = ["eat"]
attributes = { nutrition = 25 }

[items.apple_tree]
name = "Apple Tree"
walkable = false
on_tick = [{ action = "spawn_item", params = { item = "apple", rate = 5, radius = 2, max = 3 } }]

[items.coins]
name = "Coins"
carryable = true
attributes = { amount = 0 }

[items.nightshade]
name = "Nightshade"
carryable = true
interactions = ["drink"]
attributes = { heal = 0, effect_attribute = "poisoned", effect_delta = 1.0, effect_duration = 40 }

[mobs.villager]
name = "Villager"
speed = 1.0
attack = 2
defense = 1
max_health = 100
gold = 10
favorite_item = "apple"
community = "village"

[mobs.wolf]
name = "Wolf"
speed = 1.5
attack = 8
defense = 2
max_health = 60
"#;

fn logged_sim(rules: GameRules) -> (Simulation, Arc<EventLog>) {
    let log = Arc::new(EventLog::new());
    let services = Services::new(
        Box::new(GridMap::open(24, 24)),
        Box::new(GridPathfinder::default()),
        Box::new(StaticWorldRegistry::default()),
        Box::new(log.clone()),
    );
    let world = World::new(SimulationConfig::default(), rules).unwrap();
    (Simulation::new(world, services).unwrap(), log)
}

#[test]
fn test_health_bounds_hold_every_tick() {
    let (mut sim, _log) = logged_sim(parse_rules(VILLAGE).unwrap());
    sim.world
        .generate_item("apple_tree", Default::default(), Some(Coord::new(12, 12)))
        .unwrap();
    for i in 0..4 {
        sim.world.spawn_mob("villager", Coord::new(3 + i, 3)).unwrap();
    }
    for i in 0..2 {
        sim.world.spawn_mob("wolf", Coord::new(18, 18 + i)).unwrap();
    }

    for _ in 0..300 {
        let report = sim.step(1.0);
        assert!(report.is_clean(), "tick {}: {:?}", report.tick, report.errors);
        for mob in sim.world.store.mobs() {
            let max = sim.world.max_health(mob.id);
            assert!(
                (0.0..=max).contains(&mob.health),
                "{} has health {} of {}",
                mob.id,
                mob.health,
                max
            );
        }
    }
}

#[test]
fn test_broken_mob_does_not_stop_the_tick() {
    let (mut sim, _log) = logged_sim(parse_rules(VILLAGE).unwrap());
    let broken = sim.world.spawn_mob("villager", Coord::new(2, 2)).unwrap();
    let healthy = sim.world.spawn_mob("villager", Coord::new(10, 10)).unwrap();
    {
        let mob = sim.world.store.mob_mut(broken).unwrap();
        mob.position = Position::new(2.25, 2.0);
        mob.target = Some(Coord::new(3, 2));
    }

    let report = sim.step(1.0);
    assert_eq!(report.mobs_processed, 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].entity, EntityRef::Mob(broken));
    assert!(matches!(report.errors[0].error, SimError::Invariant(_)));
    assert!(sim.world.store.has_mob(broken));
    assert!(sim.world.store.has_mob(healthy));
    assert_eq!(sim.world.now(), 1);
}

#[test]
fn test_poisoned_mob_dies_and_drops_its_things() {
    let (mut sim, log) = logged_sim(parse_rules(VILLAGE).unwrap());
    let mob = sim.world.spawn_mob("villager", Coord::new(4, 4)).unwrap();
    let apple = sim
        .world
        .generate_item("apple", Default::default(), Some(Coord::new(4, 4)))
        .unwrap();
    sim.interact(mob, "pickup", apple, None).unwrap();
    {
        let row = sim.world.store.mob_mut(mob).unwrap();
        row.health = 1.0;
        row.player = true;
    }
    sim.world
        .store
        .effects
        .apply(EntityRef::Mob(mob), attr::POISONED, 1.0, 40, 0);

    sim.step(1.0);
    assert!(!sim.world.store.has_mob(mob));
    assert_eq!(sim.world.store.effects.record_count(EntityRef::Mob(mob)), 0);

    let dropped = sim.world.store.item(apple).unwrap();
    assert_eq!(dropped.position, Some(Coord::new(4, 4)));
    assert!(dropped.carried_by.is_none());

    let coins: Vec<_> = sim
        .world
        .store
        .items()
        .filter(|i| i.item_type == "coins")
        .map(|i| i.id)
        .collect();
    assert_eq!(coins.len(), 1);
    assert_eq!(sim.world.store.number(coins[0], "amount"), Some(10.0));
    assert_eq!(log.named("mob_died").len(), 1);
}

#[test]
fn test_spawner_population_is_bounded() {
    let (mut sim, _log) = logged_sim(parse_rules(VILLAGE).unwrap());
    sim.world
        .generate_item("apple_tree", Default::default(), Some(Coord::new(12, 12)))
        .unwrap();
    for _ in 0..200 {
        sim.step(1.0);
    }
    let apples = sim
        .world
        .store
        .items()
        .filter(|i| i.item_type == "apple")
        .count();
    assert!((1..=3).contains(&apples), "{} apples", apples);
}

/// Bumps a counter attribute on its item
struct Count;

impl OnTickHandler for Count {
    fn key(&self) -> &'static str {
        "count"
    }

    fn on_tick(&self, ctx: &mut TickContext<'_>, item: ItemId, _params: &Params) -> Result<bool> {
        ctx.world.store.increment_attribute(item, "count", 1.0)?;
        Ok(true)
    }
}

struct Stop;

impl OnTickHandler for Stop {
    fn key(&self) -> &'static str {
        "stop"
    }

    fn on_tick(&self, _ctx: &mut TickContext<'_>, _item: ItemId, _params: &Params) -> Result<bool> {
        Ok(false)
    }
}

#[test]
fn test_item_on_tick_stops_on_false() {
    let spec = |action: &str| OnTickSpec {
        action: action.into(),
        params: Params::new(),
    };
    let mut rules = GameRules::new();
    rules.add_item_type(
        "clock",
        ItemType::new("Clock")
            .with_attribute("count", 0.0)
            .with_on_tick(spec("count"))
            .with_on_tick(spec("stop"))
            .with_on_tick(spec("count")),
    );
    let mut on_tick = OnTickRegistry::with_defaults();
    on_tick.register(Box::new(Count));
    on_tick.register(Box::new(Stop));

    let world = World::new(SimulationConfig::default(), rules).unwrap();
    let mut sim = Simulation::with_registries(
        world,
        Services::offline(8, 8),
        UseRegistry::with_defaults(),
        on_tick,
        Planner::with_defaults(5.0),
    )
    .unwrap();
    let clock = sim
        .world
        .generate_item("clock", Default::default(), Some(Coord::new(1, 1)))
        .unwrap();

    for _ in 0..3 {
        assert!(sim.step(1.0).is_clean());
    }
    assert_eq!(sim.world.store.number(clock, "count"), Some(3.0));
}
