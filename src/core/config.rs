//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. Values can be overridden from a
//! TOML file; missing keys keep their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Result, SimError};
use crate::core::types::Tick;

/// Configuration for the simulation systems
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === PLANNER ===
    /// Utility bonus granted to the behavior a mob is already running
    ///
    /// Dampens oscillation between near-tied behaviors. Must be positive
    /// so an exact tie resolves in favor of the current behavior.
    pub stubbornness: f64,

    // === PERCEPTION ===
    /// How far a mob notices threats, targets and items (tiles)
    pub vision_radius: f64,

    /// Distance at which a mob can touch an item or another mob (tiles)
    pub reach: f64,

    // === NEEDS ===
    /// Minimum ticks between two batched needs updates for one mob
    pub needs_update_interval: Tick,

    /// Satiation lost per elapsed tick
    pub satiation_decay: f64,

    /// Social drive lost per elapsed tick
    pub social_decay: f64,

    /// Energy lost per elapsed tick
    pub energy_decay: f64,

    /// Fun lost per elapsed tick
    pub fun_decay: f64,

    // === POISON ===
    /// Poisoned mobs take damage every this many ticks
    pub poison_interval: Tick,

    /// Lower bound of one poison hit
    pub poison_damage_min: f64,

    /// Upper bound of one poison hit
    pub poison_damage_max: f64,

    // === MOVEMENT ===
    /// Radius of the random destination picked by wandering mobs
    pub wander_radius: i32,

    /// How far a fleeing mob tries to run from its threat
    pub flee_distance: f64,

    /// Node budget of one pathfinding search
    pub max_path_nodes: usize,

    // === MEANS COSTS ===
    /// Cost of walking one tile to reach an item or a mob
    pub walk_cost: f64,

    /// Weight of one gold coin when comparing purchase against walking
    ///
    /// Scaled per mob by greed, so greedy mobs avoid buying.
    pub price_weight: f64,

    /// Fixed cost of asking another mob for an item
    ///
    /// Scaled per mob by (1 - extroversion), so shy mobs rather fetch.
    pub ask_cost: f64,

    /// Extra cost when the mob has to drop what it carries first
    pub drop_penalty: f64,

    // === BEHAVIOR GAINS ===
    /// Social drive restored to both parties by one chat
    pub chat_gain: f64,

    /// Energy restored per tick of sleep
    pub sleep_gain: f64,

    /// Fun restored per tick of relaxing
    pub relax_gain: f64,

    /// Baseline utility of wandering; keeps one behavior always finite
    pub wander_base: f64,

    // === CALENDAR ===
    /// Ticks in one in-game day
    pub ticks_per_day: u64,

    // === RANDOMNESS ===
    /// Seed for the world RNG
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            stubbornness: 5.0,

            vision_radius: 12.0,
            reach: 1.5,

            needs_update_interval: 10,
            satiation_decay: 0.05,
            social_decay: 0.03,
            energy_decay: 0.04,
            fun_decay: 0.02,

            poison_interval: 5,
            poison_damage_min: 1.0,
            poison_damage_max: 5.0,

            wander_radius: 8,
            flee_distance: 10.0,
            max_path_nodes: 4096,

            walk_cost: 1.0,
            price_weight: 0.5,
            ask_cost: 15.0,
            drop_penalty: 5.0,

            chat_gain: 25.0,
            sleep_gain: 5.0,
            relax_gain: 4.0,
            wander_base: 10.0,

            ticks_per_day: 1000,

            seed: 42,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load overrides from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SimulationConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.stubbornness <= 0.0 {
            return Err(SimError::Config(format!(
                "stubbornness ({}) must be positive",
                self.stubbornness
            )));
        }

        if self.reach <= 0.0 || self.vision_radius < self.reach {
            return Err(SimError::Config(format!(
                "reach ({}) must be positive and <= vision_radius ({})",
                self.reach, self.vision_radius
            )));
        }

        if self.needs_update_interval == 0 || self.poison_interval == 0 {
            return Err(SimError::Config(
                "needs_update_interval and poison_interval must be >= 1".into(),
            ));
        }

        if self.poison_damage_min < 0.0 || self.poison_damage_max < self.poison_damage_min {
            return Err(SimError::Config(format!(
                "poison damage range [{}, {}] is invalid",
                self.poison_damage_min, self.poison_damage_max
            )));
        }

        if self.ticks_per_day == 0 {
            return Err(SimError::Config("ticks_per_day must be >= 1".into()));
        }

        Ok(())
    }
}
