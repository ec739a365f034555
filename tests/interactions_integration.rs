//! Integration tests for client-directed interactions
//!
//! - Cauldrons take three distinct ingredients and refuse a fourth
//! - Community and personal ownership gate who may touch an item
//! - Effects granted by drinks refresh instead of stacking

use hearthfall::core::types::{CommunityId, Coord, EntityRef, MobId};
use hearthfall::entity::facets::try_as_cauldron;
use hearthfall::entity::item::Ownership;
use hearthfall::entity::mob::attr;
use hearthfall::entity::personality::Personality;
use hearthfall::rules::{GameRules, ItemType, MobTemplate};
use hearthfall::{Services, Simulation, SimulationConfig, World};

fn template(name: &str, community: Option<&str>) -> MobTemplate {
    MobTemplate {
        name: name.into(),
        speed: 1.0,
        attack: 2.0,
        defense: 1.0,
        max_health: 100.0,
        gold: 10,
        favorite_item: None,
        community: community.map(str::to_string),
        player: true,
        unlocks: Vec::new(),
        personality: Some(Personality::default()),
    }
}

fn rules() -> GameRules {
    let mut rules = GameRules::new();
    rules.add_item_type(
        "cauldron",
        ItemType::new("Cauldron")
            .with_interaction("brew")
            .with_interaction("ladle")
            .with_attribute("ingredients", 0.0)
            .with_attribute("capacity", 3.0)
            .with_attribute("colors", "")
            .with_attribute("yields", "potion"),
    );
    for color in ["red", "green", "blue", "yellow"] {
        rules.add_item_type(
            format!("{}_herb", color),
            ItemType::new(format!("{} herb", color))
                .carryable()
                .with_attribute("color", color),
        );
    }
    rules.add_item_type(
        "potion",
        ItemType::new("Potion").carryable().with_interaction("drink").with_attribute("heal", 10.0),
    );
    rules.add_item_type(
        "tonic",
        ItemType::new("Tonic")
            .carryable()
            .with_interaction("drink")
            .with_attribute("heal", 0.0)
            .with_attribute("effect_attribute", "speed")
            .with_attribute("effect_delta", 2.0)
            .with_attribute("effect_duration", 30.0),
    );
    rules.add_item_type("lantern", ItemType::new("Lantern").carryable());
    rules.add_template("villager", template("Villager", Some("village")));
    rules.add_template("trader", template("Trader", Some("traders")));
    rules.add_template("bandit", template("Bandit", Some("bandits")));
    rules.add_template("hermit", template("Hermit", None));
    rules.add_alliance("village", "traders");
    rules
}

fn sim() -> Simulation {
    let world = World::new(SimulationConfig::default(), rules()).unwrap();
    Simulation::new(world, Services::offline(16, 16)).unwrap()
}

fn place(sim: &mut Simulation, item_type: &str, cell: Coord) -> hearthfall::core::types::ItemId {
    sim.world
        .generate_item(item_type, Default::default(), Some(cell))
        .unwrap()
}

fn ingredients(sim: &Simulation, cauldron: hearthfall::core::types::ItemId) -> u32 {
    try_as_cauldron(&sim.world.store, cauldron).unwrap().ingredients
}

#[test]
fn test_cauldron_takes_three_then_refuses() {
    let mut sim = sim();
    let brewer = sim.world.spawn_mob("villager", Coord::new(5, 5)).unwrap();
    let cauldron = place(&mut sim, "cauldron", Coord::new(6, 5));
    assert_eq!(ingredients(&sim, cauldron), 0);

    for (expected, color) in [(1, "red"), (2, "green"), (3, "blue")] {
        let herb = place(&mut sim, &format!("{}_herb", color), Coord::new(5, 5));
        assert!(sim.interact(brewer, "pickup", herb, None).unwrap());
        assert!(sim.interact(brewer, "brew", cauldron, None).unwrap());
        assert_eq!(ingredients(&sim, cauldron), expected);
        assert!(!sim.world.store.has_item(herb));
    }

    let fourth = place(&mut sim, "yellow_herb", Coord::new(5, 5));
    assert!(sim.interact(brewer, "pickup", fourth, None).unwrap());
    assert!(!sim.interact(brewer, "brew", cauldron, None).unwrap());
    assert_eq!(ingredients(&sim, cauldron), 3);
    assert_eq!(sim.world.store.mob(brewer).unwrap().carrying, Some(fourth));

    // hands full, so ladling waits until the herb is put down
    assert!(!sim.interact(brewer, "ladle", cauldron, None).unwrap());
    assert!(sim.interact(brewer, "drop", fourth, None).unwrap());
    assert!(sim.interact(brewer, "ladle", cauldron, None).unwrap());
    assert_eq!(ingredients(&sim, cauldron), 0);
    let potion = sim.world.store.mob(brewer).unwrap().carrying.unwrap();
    assert_eq!(sim.world.store.item(potion).unwrap().item_type, "potion");
}

#[test]
fn test_community_property() {
    let mut sim = sim();
    let villager = sim.world.spawn_mob("villager", Coord::new(2, 2)).unwrap();
    let trader = sim.world.spawn_mob("trader", Coord::new(2, 2)).unwrap();
    let bandit = sim.world.spawn_mob("bandit", Coord::new(2, 2)).unwrap();
    let hermit = sim.world.spawn_mob("hermit", Coord::new(2, 2)).unwrap();

    let try_take = |sim: &mut Simulation, who: MobId| {
        let lantern = place(sim, "lantern", Coord::new(2, 2));
        sim.world.store.item_mut(lantern).unwrap().owner =
            Some(Ownership::Community(CommunityId::new("village")));
        sim.interact(who, "pickup", lantern, None).unwrap()
    };

    assert!(try_take(&mut sim, villager));
    // allied
    assert!(try_take(&mut sim, trader));
    assert!(!try_take(&mut sim, bandit));
    assert!(!try_take(&mut sim, hermit));
}

#[test]
fn test_personal_property_and_unowned_items() {
    let mut sim = sim();
    let owner = sim.world.spawn_mob("villager", Coord::new(2, 2)).unwrap();
    let neighbour = sim.world.spawn_mob("villager", Coord::new(2, 2)).unwrap();

    let lantern = place(&mut sim, "lantern", Coord::new(2, 2));
    sim.world.store.item_mut(lantern).unwrap().owner = Some(Ownership::Character(owner));
    assert!(!sim.interact(neighbour, "pickup", lantern, None).unwrap());
    assert!(sim.interact(owner, "pickup", lantern, None).unwrap());

    let loose = place(&mut sim, "lantern", Coord::new(2, 2));
    assert!(sim.interact(neighbour, "pickup", loose, None).unwrap());
}

#[test]
fn test_out_of_reach_is_soft_failure() {
    let mut sim = sim();
    let mob = sim.world.spawn_mob("villager", Coord::new(0, 0)).unwrap();
    let lantern = place(&mut sim, "lantern", Coord::new(9, 9));
    assert!(!sim.interact(mob, "pickup", lantern, None).unwrap());
    assert!(sim.world.store.item(lantern).unwrap().carried_by.is_none());
}

#[test]
fn test_tonic_refreshes_without_stacking() {
    let mut sim = sim();
    let mob = sim.world.spawn_mob("villager", Coord::new(3, 3)).unwrap();

    let first = place(&mut sim, "tonic", Coord::new(3, 3));
    assert!(sim.interact(mob, "drink", first, None).unwrap());
    assert_eq!(sim.world.current(mob, attr::SPEED), 3.0);
    let first_expiry = sim
        .world
        .store
        .effects
        .expires_at(EntityRef::Mob(mob), attr::SPEED, sim.world.now());

    for _ in 0..10 {
        sim.step(1.0);
    }
    let second = place(&mut sim, "tonic", Coord::new(3, 3));
    assert!(sim.interact(mob, "drink", second, None).unwrap());
    assert_eq!(sim.world.current(mob, attr::SPEED), 3.0);
    let refreshed = sim
        .world
        .store
        .effects
        .expires_at(EntityRef::Mob(mob), attr::SPEED, sim.world.now());
    assert!(refreshed > first_expiry);

    for _ in 0..31 {
        sim.step(1.0);
    }
    assert_eq!(sim.world.current(mob, attr::SPEED), 1.0);
    assert_eq!(sim.world.store.effects.record_count(EntityRef::Mob(mob)), 0);
}
