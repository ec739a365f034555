//! Personality traits
//!
//! Eight independent scalars in [0, 1], fixed at mob construction and
//! individually mutable afterwards. Behaviors read them as weights.

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trait {
    Aggression,
    Bravery,
    Adventurousness,
    Greed,
    Gluttony,
    Industriousness,
    Extroversion,
    Laziness,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Personality {
    pub aggression: f64,
    pub bravery: f64,
    pub adventurousness: f64,
    pub greed: f64,
    pub gluttony: f64,
    pub industriousness: f64,
    pub extroversion: f64,
    pub laziness: f64,
}

impl Default for Personality {
    fn default() -> Self {
        Self {
            aggression: 0.5,
            bravery: 0.5,
            adventurousness: 0.5,
            greed: 0.5,
            gluttony: 0.5,
            industriousness: 0.5,
            extroversion: 0.5,
            laziness: 0.5,
        }
    }
}

impl Personality {
    /// Roll every trait uniformly
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            aggression: rng.gen(),
            bravery: rng.gen(),
            adventurousness: rng.gen(),
            greed: rng.gen(),
            gluttony: rng.gen(),
            industriousness: rng.gen(),
            extroversion: rng.gen(),
            laziness: rng.gen(),
        }
    }

    pub fn get(&self, t: Trait) -> f64 {
        match t {
            Trait::Aggression => self.aggression,
            Trait::Bravery => self.bravery,
            Trait::Adventurousness => self.adventurousness,
            Trait::Greed => self.greed,
            Trait::Gluttony => self.gluttony,
            Trait::Industriousness => self.industriousness,
            Trait::Extroversion => self.extroversion,
            Trait::Laziness => self.laziness,
        }
    }

    pub fn set(&mut self, t: Trait, value: f64) {
        let value = value.clamp(0.0, 1.0);
        match t {
            Trait::Aggression => self.aggression = value,
            Trait::Bravery => self.bravery = value,
            Trait::Adventurousness => self.adventurousness = value,
            Trait::Greed => self.greed = value,
            Trait::Gluttony => self.gluttony = value,
            Trait::Industriousness => self.industriousness = value,
            Trait::Extroversion => self.extroversion = value,
            Trait::Laziness => self.laziness = value,
        }
    }

    /// Clamp every trait into [0, 1] after deserializing hand-written data
    pub fn clamped(mut self) -> Self {
        for t in [
            Trait::Aggression,
            Trait::Bravery,
            Trait::Adventurousness,
            Trait::Greed,
            Trait::Gluttony,
            Trait::Industriousness,
            Trait::Extroversion,
            Trait::Laziness,
        ] {
            let v = self.get(t);
            self.set(t, v);
        }
        self
    }
}
