//! Mob rows: template stats, runtime state, personality and needs

use serde::{Deserialize, Serialize};

use crate::core::types::{CommunityId, Coord, ItemId, MobId, Position};
use crate::entity::needs::Needs;
use crate::entity::personality::Personality;

/// Attribute names readable through the composed (base + effect) view
pub mod attr {
    pub const SPEED: &str = "speed";
    pub const ATTACK: &str = "attack";
    pub const DEFENSE: &str = "defense";
    pub const MAX_HEALTH: &str = "max_health";
    pub const POISONED: &str = "poisoned";
}

/// Base stats copied from the template at spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobStats {
    pub speed: f64,
    pub attack: f64,
    pub defense: f64,
    pub max_health: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mob {
    pub id: MobId,
    pub name: String,
    pub template: String,
    pub stats: MobStats,
    pub gold: i64,
    pub favorite_item: Option<String>,

    pub health: f64,
    pub position: Position,
    pub path: Vec<Coord>,
    pub target: Option<Coord>,
    /// Owning side of the carrying relation
    pub carrying: Option<ItemId>,
    /// Key of the behavior currently running, if any
    pub action: Option<String>,
    pub community: Option<CommunityId>,
    /// Lock keys this mob holds
    pub unlocks: Vec<String>,
    /// Client-directed; skips planning
    pub player: bool,

    pub personality: Personality,
    pub needs: Needs,
}

impl Mob {
    /// Persisted base value of a modifiable attribute
    pub fn base_attribute(&self, name: &str) -> f64 {
        match name {
            attr::SPEED => self.stats.speed,
            attr::ATTACK => self.stats.attack,
            attr::DEFENSE => self.stats.defense,
            attr::MAX_HEALTH => self.stats.max_health,
            _ => 0.0,
        }
    }

    /// Cell the mob currently stands on
    pub fn cell(&self) -> Coord {
        self.position.round()
    }

    pub fn is_carrying(&self) -> bool {
        self.carrying.is_some()
    }

    pub fn health_ratio(&self, max_health: f64) -> f64 {
        if max_health <= 0.0 {
            0.0
        } else {
            (self.health / max_health).clamp(0.0, 1.0)
        }
    }
}
