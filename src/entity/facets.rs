//! Typed views over an item's attribute bag
//!
//! A facet exists for an item exactly when the bag holds the attributes it
//! needs, so any item type gains a facet purely from its configured
//! attributes. The `try_as_*` constructors check once; methods that mutate
//! write straight back to the store.

use std::collections::BTreeMap;

use crate::core::error::{Result, SimError};
use crate::core::types::{ItemId, Tick};
use crate::store::Store;

/// An effect an item grants when consumed
#[derive(Debug, Clone, PartialEq)]
pub struct EffectGrant {
    pub attribute: String,
    pub delta: f64,
    pub duration: Tick,
}

impl EffectGrant {
    /// Reads `effect_attribute`, `effect_delta` and `effect_duration`
    fn from_item(store: &Store, item: ItemId) -> Option<Self> {
        Some(Self {
            attribute: store.text(item, "effect_attribute")?.to_string(),
            delta: store.number(item, "effect_delta")?,
            duration: store.number(item, "effect_duration")?.max(0.0) as Tick,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edible {
    pub item: ItemId,
    pub nutrition: f64,
    pub effect: Option<EffectGrant>,
}

pub fn try_as_edible(store: &Store, item: ItemId) -> Option<Edible> {
    Some(Edible {
        item,
        nutrition: store.number(item, "nutrition")?,
        effect: EffectGrant::from_item(store, item),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Healing {
    pub item: ItemId,
    pub heal: f64,
    pub effect: Option<EffectGrant>,
}

pub fn try_as_healing(store: &Store, item: ItemId) -> Option<Healing> {
    Some(Healing {
        item,
        heal: store.number(item, "heal")?,
        effect: EffectGrant::from_item(store, item),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub item: ItemId,
    pub color: String,
}

pub fn try_as_ingredient(store: &Store, item: ItemId) -> Option<Ingredient> {
    Some(Ingredient {
        item,
        color: store.text(item, "color")?.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cauldron {
    pub item: ItemId,
    pub ingredients: u32,
    pub capacity: u32,
    pub colors: Vec<String>,
    /// Item type ladled out once full
    pub yields: Option<String>,
}

pub fn try_as_cauldron(store: &Store, item: ItemId) -> Option<Cauldron> {
    let ingredients = store.number(item, "ingredients")?;
    let capacity = store.number(item, "capacity")?;
    let colors = store
        .text(item, "colors")
        .map(|s| {
            s.split(',')
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Some(Cauldron {
        item,
        ingredients: ingredients.max(0.0) as u32,
        capacity: capacity.max(0.0) as u32,
        colors,
        yields: store
            .text(item, "yields")
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    })
}

impl Cauldron {
    pub fn is_full(&self) -> bool {
        self.ingredients >= self.capacity
    }

    /// Room left and this color not yet in the brew
    pub fn accepts(&self, color: &str) -> bool {
        !self.is_full() && !self.colors.iter().any(|c| c == color)
    }

    pub fn add(&mut self, store: &mut Store, color: &str) -> Result<()> {
        let count = store.increment_attribute(self.item, "ingredients", 1.0)?;
        self.ingredients = count as u32;
        self.colors.push(color.to_string());
        store.set_attribute(self.item, "colors", self.colors.join(","))
    }

    pub fn reset(&mut self, store: &mut Store) -> Result<()> {
        self.ingredients = 0;
        self.colors.clear();
        store.set_attribute(self.item, "ingredients", 0.0)?;
        store.set_attribute(self.item, "colors", "")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Purchasable {
    pub item: ItemId,
    pub price: i64,
}

pub fn try_as_purchasable(store: &Store, item: ItemId) -> Option<Purchasable> {
    Some(Purchasable {
        item,
        price: store.number(item, "price")?.max(0.0).round() as i64,
    })
}

/// Counted stock serialized as a JSON map in the `inventory` attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub item: ItemId,
    pub inventory: BTreeMap<String, i64>,
}

/// `Ok(None)` when the item is no container; a corrupt or negative
/// inventory is an invariant violation
pub fn try_as_container(store: &Store, item: ItemId) -> Result<Option<Container>> {
    let Some(raw) = store.text(item, "inventory") else {
        return Ok(None);
    };
    let inventory: BTreeMap<String, i64> = if raw.trim().is_empty() {
        BTreeMap::new()
    } else {
        serde_json::from_str(raw).map_err(|e| {
            SimError::Invariant(format!("{} has unreadable inventory: {}", item, e))
        })?
    };
    if let Some((key, count)) = inventory.iter().find(|(_, c)| **c < 0) {
        return Err(SimError::Invariant(format!(
            "{} holds negative count {} of '{}'",
            item, count, key
        )));
    }
    Ok(Some(Container { item, inventory }))
}

impl Container {
    pub fn count(&self, item_type: &str) -> i64 {
        self.inventory.get(item_type).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.inventory.values().all(|c| *c == 0)
    }

    fn persist(&self, store: &mut Store) -> Result<()> {
        let json = serde_json::to_string(&self.inventory)?;
        store.set_attribute(self.item, "inventory", json)
    }

    pub fn add(&mut self, store: &mut Store, item_type: &str) -> Result<()> {
        *self.inventory.entry(item_type.to_string()).or_insert(0) += 1;
        self.persist(store)
    }

    /// Remove one unit of the first stocked type, by name
    pub fn take_any(&mut self, store: &mut Store) -> Result<Option<String>> {
        let Some(key) = self
            .inventory
            .iter()
            .find(|(_, c)| **c > 0)
            .map(|(k, _)| k.clone())
        else {
            return Ok(None);
        };
        if let Some(count) = self.inventory.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.inventory.remove(&key);
            }
        }
        self.persist(store)?;
        Ok(Some(key))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Construction {
    pub item: ItemId,
    pub progress: f64,
    pub required: f64,
    /// Item type that replaces the site once finished
    pub completes: String,
}

pub fn try_as_construction(store: &Store, item: ItemId) -> Option<Construction> {
    Some(Construction {
        item,
        progress: store.number(item, "progress")?,
        required: store.number(item, "required")?,
        completes: store.text(item, "completes")?.to_string(),
    })
}

impl Construction {
    pub fn is_complete(&self) -> bool {
        self.progress >= self.required
    }

    pub fn contribute(&mut self, store: &mut Store, amount: f64) -> Result<bool> {
        self.progress = store.increment_attribute(self.item, "progress", amount)?;
        Ok(self.is_complete())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub item: ItemId,
    pub value: f64,
}

pub fn try_as_material(store: &Store, item: ItemId) -> Option<Material> {
    Some(Material {
        item,
        value: store.number(item, "material")?,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portal {
    pub item: ItemId,
    pub destination: String,
}

pub fn try_as_portal(store: &Store, item: ItemId) -> Option<Portal> {
    Some(Portal {
        item,
        destination: store.text(item, "destination")?.to_string(),
    })
}
