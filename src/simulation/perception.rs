//! Perception queries - what a mob can see within a radius

use ordered_float::OrderedFloat;

use crate::core::types::{ItemId, MobId, Position};
use crate::entity::item::Item;
use crate::entity::mob::Mob;
use crate::simulation::world::World;

/// Closest other mob within `radius` passing `filter`
pub fn nearest_mob(
    world: &World,
    observer: &Mob,
    radius: f64,
    mut filter: impl FnMut(&Mob) -> bool,
) -> Option<(MobId, f64)> {
    world
        .store
        .mobs()
        .filter(|m| m.id != observer.id)
        .map(|m| (m, observer.position.distance(&m.position)))
        .filter(|(m, d)| *d <= radius && filter(m))
        .min_by_key(|(_, d)| OrderedFloat(*d))
        .map(|(m, d)| (m.id, d))
}

/// Closest placed item within `radius` passing `filter`
pub fn nearest_item(
    world: &World,
    from: Position,
    radius: f64,
    mut filter: impl FnMut(&Item) -> bool,
) -> Option<(ItemId, f64)> {
    world
        .store
        .items()
        .filter_map(|i| i.position.map(|p| (i, from.distance(&p.to_position()))))
        .filter(|(i, d)| *d <= radius && filter(i))
        .min_by_key(|(_, d)| OrderedFloat(*d))
        .map(|(i, d)| (i.id, d))
}

/// Closest mob the observer would fight
pub fn nearest_hostile(world: &World, observer: &Mob) -> Option<(MobId, f64)> {
    nearest_mob(world, observer, world.config.vision_radius, |other| {
        !world.are_friendly(observer, other)
    })
}
