//! Data-declared game content: item types, mob templates, alliances
//!
//! Nothing here knows about behavior. Item types name their interaction
//! and on-tick keys as plain strings; the registries resolve them.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::CommunityId;
use crate::entity::item::AttrValue;
use crate::entity::personality::Personality;

pub use loader::{load_rules, parse_rules};

/// One scheduled behavior declared by an item type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnTickSpec {
    /// Key into the on-tick registry
    pub action: String,
    /// Passed opaquely to the handler
    #[serde(default)]
    pub params: BTreeMap<String, AttrValue>,
}

/// Immutable descriptor shared by every item of one type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemType {
    pub name: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub carryable: bool,
    #[serde(default)]
    pub smashable: bool,
    #[serde(default = "default_walkable")]
    pub walkable: bool,
    /// Keys into the use registry that clients may invoke
    #[serde(default)]
    pub interactions: Vec<String>,
    #[serde(default)]
    pub on_tick: Vec<OnTickSpec>,
    /// Initial attribute bag; overrides at generation win
    #[serde(default)]
    pub attributes: BTreeMap<String, AttrValue>,
}

fn default_walkable() -> bool {
    true
}

impl ItemType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subtype: None,
            carryable: false,
            smashable: false,
            walkable: true,
            interactions: Vec::new(),
            on_tick: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn carryable(mut self) -> Self {
        self.carryable = true;
        self
    }

    pub fn smashable(mut self) -> Self {
        self.smashable = true;
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_interaction(mut self, key: impl Into<String>) -> Self {
        self.interactions.push(key.into());
        self
    }

    pub fn with_on_tick(mut self, spec: OnTickSpec) -> Self {
        self.on_tick.push(spec);
        self
    }

    /// Every use key a client may invoke on items of this type
    pub fn allows(&self, key: &str) -> bool {
        let carry_key = matches!(key, "pickup" | "drop" | "give");
        (carry_key && self.carryable) || self.interactions.iter().any(|k| k == key)
    }
}

/// Named blueprint the mob factory spawns from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobTemplate {
    pub name: String,
    pub speed: f64,
    pub attack: f64,
    pub defense: f64,
    pub max_health: f64,
    #[serde(default)]
    pub gold: i64,
    #[serde(default)]
    pub favorite_item: Option<String>,
    #[serde(default)]
    pub community: Option<String>,
    #[serde(default)]
    pub player: bool,
    #[serde(default)]
    pub unlocks: Vec<String>,
    /// Rolled from the world RNG when absent
    #[serde(default)]
    pub personality: Option<Personality>,
}

/// All content loaded at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameRules {
    #[serde(default)]
    pub items: BTreeMap<String, ItemType>,
    #[serde(default)]
    pub mobs: BTreeMap<String, MobTemplate>,
    /// Symmetric community pairs
    #[serde(default)]
    pub alliances: Vec<[String; 2]>,
}

impl GameRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_type(&self, key: &str) -> Option<&ItemType> {
        self.items.get(key)
    }

    pub fn template(&self, key: &str) -> Option<&MobTemplate> {
        self.mobs.get(key)
    }

    pub fn add_item_type(&mut self, key: impl Into<String>, item_type: ItemType) {
        self.items.insert(key.into(), item_type);
    }

    pub fn add_template(&mut self, key: impl Into<String>, template: MobTemplate) {
        self.mobs.insert(key.into(), template);
    }

    pub fn add_alliance(&mut self, a: impl Into<String>, b: impl Into<String>) {
        self.alliances.push([a.into(), b.into()]);
    }

    /// Same community, or a declared alliance in either direction
    pub fn are_allied(&self, a: &CommunityId, b: &CommunityId) -> bool {
        a == b
            || self.alliances.iter().any(|[x, y]| {
                (x == &a.0 && y == &b.0) || (x == &b.0 && y == &a.0)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alliance_is_symmetric() {
        let mut rules = GameRules::new();
        rules.add_alliance("elves", "dwarves");
        let elves = CommunityId::new("elves");
        let dwarves = CommunityId::new("dwarves");
        let orcs = CommunityId::new("orcs");
        assert!(rules.are_allied(&elves, &dwarves));
        assert!(rules.are_allied(&dwarves, &elves));
        assert!(rules.are_allied(&orcs, &orcs));
        assert!(!rules.are_allied(&orcs, &elves));
    }

    #[test]
    fn test_carry_keys_implied_by_carryable() {
        let apple = ItemType::new("Apple").carryable();
        assert!(apple.allows("pickup"));
        assert!(apple.allows("give"));
        assert!(!apple.allows("eat"));

        let rock = ItemType::new("Rock").with_interaction("smash");
        assert!(!rock.allows("pickup"));
        assert!(rock.allows("smash"));
    }
}
