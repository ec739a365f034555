//! JSON snapshots of every table
//!
//! Rows are written as flat lists, one list per table, so a snapshot reads
//! like a relational dump and restores ids exactly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::Store;
use crate::core::error::Result;
use crate::core::types::{ItemId, Tick};
use crate::effects::{EffectLedger, EffectRecord};
use crate::entity::item::{AttrValue, Item};
use crate::entity::mob::Mob;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeRow {
    pub item: ItemId,
    pub name: String,
    pub value: AttrValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub tick: Tick,
    /// Id counters, so ids of destroyed rows are never handed out again
    #[serde(default)]
    pub next_mob: u64,
    #[serde(default)]
    pub next_item: u64,
    pub mobs: Vec<Mob>,
    pub items: Vec<Item>,
    pub attributes: Vec<AttributeRow>,
    pub effects: Vec<EffectRecord>,
}

impl Store {
    pub fn snapshot(&self, tick: Tick) -> Snapshot {
        let attributes = self
            .attributes
            .iter()
            .flat_map(|(item, bag)| {
                bag.iter().map(move |(name, value)| AttributeRow {
                    item: *item,
                    name: name.clone(),
                    value: value.clone(),
                })
            })
            .collect();

        Snapshot {
            version: SNAPSHOT_VERSION,
            tick,
            next_mob: self.next_mob,
            next_item: self.next_item,
            mobs: self.mobs.values().cloned().collect(),
            items: self.items.values().cloned().collect(),
            attributes,
            effects: self.effects.rows(),
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut attributes: BTreeMap<ItemId, BTreeMap<String, AttrValue>> = snapshot
            .items
            .iter()
            .map(|i| (i.id, BTreeMap::new()))
            .collect();
        for row in snapshot.attributes {
            attributes.entry(row.item).or_default().insert(row.name, row.value);
        }

        let next_mob = snapshot.mobs.iter().map(|m| m.id.0 + 1).max().unwrap_or(1);
        let next_item = snapshot.items.iter().map(|i| i.id.0 + 1).max().unwrap_or(1);

        Self {
            mobs: snapshot.mobs.into_iter().map(|m| (m.id, m)).collect(),
            items: snapshot.items.into_iter().map(|i| (i.id, i)).collect(),
            attributes,
            effects: EffectLedger::from_rows(snapshot.effects),
            next_mob: next_mob.max(snapshot.next_mob),
            next_item: next_item.max(snapshot.next_item),
        }
    }

    /// Write every table to `path`
    pub fn save_snapshot(&self, path: &Path, tick: Tick) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot(tick))?;
        std::fs::write(path, json)?;
        tracing::info!(
            "Saved snapshot at tick {} ({} mobs, {} items) to {}",
            tick,
            self.mobs.len(),
            self.items.len(),
            path.display()
        );
        Ok(())
    }

    /// Restore tables written by `save_snapshot`; returns the saved tick
    pub fn load_snapshot(path: &Path) -> Result<(Self, Tick)> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        let tick = snapshot.tick;
        Ok((Self::from_snapshot(snapshot), tick))
    }
}
