//! World state: clock, content, tables and the seeded RNG

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

use crate::core::calendar::Calendar;
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{Coord, EntityRef, ItemId, MobId, Tick};
use crate::entity::factory;
use crate::entity::item::{AttrValue, Item};
use crate::entity::mob::{attr, Mob};
use crate::rules::{GameRules, ItemType};
use crate::store::Store;

/// Everything a tick reads and writes
pub struct World {
    pub config: SimulationConfig,
    pub calendar: Calendar,
    pub rules: GameRules,
    pub store: Store,
    pub rng: ChaCha8Rng,
}

impl World {
    pub fn new(config: SimulationConfig, rules: GameRules) -> Result<Self> {
        Self::restore(config, rules, Store::new(), 0)
    }

    /// Resume from tables loaded out of a snapshot
    pub fn restore(
        config: SimulationConfig,
        rules: GameRules,
        store: Store,
        tick: Tick,
    ) -> Result<Self> {
        config.validate()?;
        let calendar = Calendar::starting_at(config.ticks_per_day, tick);
        // mixing the tick keeps a resumed run from replaying the same rolls
        let rng = ChaCha8Rng::seed_from_u64(config.seed ^ tick);
        Ok(Self {
            config,
            calendar,
            rules,
            store,
            rng,
        })
    }

    pub fn now(&self) -> Tick {
        self.calendar.current_tick()
    }

    pub fn spawn_mob(&mut self, template: &str, position: Coord) -> Result<MobId> {
        let now = self.now();
        factory::spawn_mob(
            &mut self.store,
            &self.rules,
            &mut self.rng,
            template,
            position,
            now,
        )
    }

    pub fn generate_item(
        &mut self,
        type_key: &str,
        overrides: BTreeMap<String, AttrValue>,
        position: Option<Coord>,
    ) -> Result<ItemId> {
        factory::generate_item(&mut self.store, &self.rules, type_key, overrides, position)
    }

    /// Composed value (base plus active effect) at the current tick
    pub fn current(&self, entity: impl Into<EntityRef>, attribute: &str) -> f64 {
        self.store
            .current_value(entity.into(), attribute, self.now())
    }

    pub fn max_health(&self, mob: MobId) -> f64 {
        self.current(mob, attr::MAX_HEALTH).max(0.0)
    }

    pub fn item_type(&self, item: &Item) -> Option<&ItemType> {
        self.rules.item_type(&item.item_type)
    }

    /// Mobs of one template never fight; otherwise allied communities
    pub fn are_friendly(&self, a: &Mob, b: &Mob) -> bool {
        if a.template == b.template {
            return true;
        }
        match (&a.community, &b.community) {
            (Some(x), Some(y)) => self.rules.are_allied(x, y),
            _ => false,
        }
    }
}
