//! Durable world store
//!
//! Four tables held in process and accessed synchronously: mobs, items,
//! item attributes and effect records. Tables are ordered by id so every
//! walk over them is stable across runs. Snapshots (see `snapshot`) make
//! the tables durable across restarts.

mod attributes;
mod carrying;
pub mod snapshot;

use std::collections::BTreeMap;

use crate::core::error::{Result, SimError};
use crate::core::types::{EntityRef, ItemId, MobId, Tick};
use crate::effects::EffectLedger;
use crate::entity::item::{AttrValue, Item};
use crate::entity::mob::Mob;

pub use snapshot::Snapshot;

#[derive(Debug, Clone, Default)]
pub struct Store {
    mobs: BTreeMap<MobId, Mob>,
    items: BTreeMap<ItemId, Item>,
    attributes: BTreeMap<ItemId, BTreeMap<String, AttrValue>>,
    pub effects: EffectLedger,
    next_mob: u64,
    next_item: u64,
}

impl Store {
    pub fn new() -> Self {
        Self {
            next_mob: 1,
            next_item: 1,
            ..Default::default()
        }
    }

    // === MOBS ===

    /// Insert a mob built by `build`, which receives the allocated id
    pub fn insert_mob(&mut self, build: impl FnOnce(MobId) -> Mob) -> MobId {
        let id = MobId(self.next_mob.max(1));
        self.next_mob = id.0 + 1;
        let mob = build(id);
        debug_assert_eq!(mob.id, id);
        self.mobs.insert(id, mob);
        id
    }

    pub fn mob(&self, id: MobId) -> Option<&Mob> {
        self.mobs.get(&id)
    }

    pub fn mob_mut(&mut self, id: MobId) -> Option<&mut Mob> {
        self.mobs.get_mut(&id)
    }

    pub fn require_mob(&self, id: MobId) -> Result<&Mob> {
        self.mobs.get(&id).ok_or(SimError::MobNotFound(id))
    }

    pub fn require_mob_mut(&mut self, id: MobId) -> Result<&mut Mob> {
        self.mobs.get_mut(&id).ok_or(SimError::MobNotFound(id))
    }

    pub fn has_mob(&self, id: MobId) -> bool {
        self.mobs.contains_key(&id)
    }

    /// Ids in processing order
    pub fn mob_ids(&self) -> Vec<MobId> {
        self.mobs.keys().copied().collect()
    }

    pub fn mobs(&self) -> impl Iterator<Item = &Mob> {
        self.mobs.values()
    }

    pub fn mob_count(&self) -> usize {
        self.mobs.len()
    }

    /// Delete a mob row and its effect rows
    ///
    /// A carried item is released in place (no position) and left for the
    /// caller to place or destroy.
    pub fn remove_mob(&mut self, id: MobId) -> Option<Mob> {
        let mob = self.mobs.remove(&id)?;
        if let Some(item_id) = mob.carrying {
            if let Some(item) = self.items.get_mut(&item_id) {
                item.carried_by = None;
            }
        }
        self.effects.purge(EntityRef::Mob(id));
        Some(mob)
    }

    // === ITEMS ===

    pub fn insert_item(
        &mut self,
        build: impl FnOnce(ItemId) -> Item,
        attributes: BTreeMap<String, AttrValue>,
    ) -> ItemId {
        let id = ItemId(self.next_item.max(1));
        self.next_item = id.0 + 1;
        let item = build(id);
        debug_assert_eq!(item.id, id);
        self.items.insert(id, item);
        self.attributes.insert(id, attributes);
        id
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    pub fn require_item(&self, id: ItemId) -> Result<&Item> {
        self.items.get(&id).ok_or(SimError::ItemNotFound(id))
    }

    pub fn require_item_mut(&mut self, id: ItemId) -> Result<&mut Item> {
        self.items.get_mut(&id).ok_or(SimError::ItemNotFound(id))
    }

    pub fn has_item(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn item_ids(&self) -> Vec<ItemId> {
        self.items.keys().copied().collect()
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Delete an item with its attribute rows, effect rows and carrier link
    pub fn destroy_item(&mut self, id: ItemId) -> Option<Item> {
        let item = self.items.remove(&id)?;
        self.attributes.remove(&id);
        self.effects.purge(EntityRef::Item(id));
        if let Some(carrier) = item.carried_by {
            if let Some(mob) = self.mobs.get_mut(&carrier) {
                if mob.carrying == Some(id) {
                    mob.carrying = None;
                }
            }
        }
        Some(item)
    }

    // === COMPOSED VIEW ===

    /// Persisted base value of an attribute, before effects
    pub fn base_value(&self, entity: EntityRef, attribute: &str) -> f64 {
        match entity {
            EntityRef::Mob(id) => self.mob(id).map_or(0.0, |m| m.base_attribute(attribute)),
            EntityRef::Item(id) => self.number(id, attribute).unwrap_or(0.0),
        }
    }

    /// Base value plus the single active effect delta
    pub fn current_value(&self, entity: EntityRef, attribute: &str, now: Tick) -> f64 {
        self.base_value(entity, attribute) + self.effects.active_delta(entity, attribute, now)
    }
}
