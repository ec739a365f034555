//! Bounded drives that push mobs toward behaviors
//!
//! Every drive lives in [0, 100]; 100 means fully satisfied. Decay is
//! batched: a mob only rewrites its needs once `needs_update_interval`
//! ticks have passed since its own last update, and then applies the
//! decay for every elapsed tick at once.

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::Tick;

pub const NEED_MIN: f64 = 0.0;
pub const NEED_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeedType {
    Satiation,
    Social,
    Energy,
    Fun,
}

impl NeedType {
    pub const ALL: [NeedType; 4] = [
        NeedType::Satiation,
        NeedType::Social,
        NeedType::Energy,
        NeedType::Fun,
    ];

    fn decay_rate(&self, config: &SimulationConfig) -> f64 {
        match self {
            NeedType::Satiation => config.satiation_decay,
            NeedType::Social => config.social_decay,
            NeedType::Energy => config.energy_decay,
            NeedType::Fun => config.fun_decay,
        }
    }
}

/// The four drives of one mob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Needs {
    pub satiation: f64,
    pub social: f64,
    pub energy: f64,
    pub fun: f64,
    /// Tick of the last batched decay
    pub last_update: Tick,
}

impl Default for Needs {
    fn default() -> Self {
        Self::starting_at(0)
    }
}

impl Needs {
    /// Fresh needs for a mob created at `tick`
    pub fn starting_at(tick: Tick) -> Self {
        Self {
            satiation: 80.0,
            social: 70.0,
            energy: 90.0,
            fun: 70.0,
            last_update: tick,
        }
    }

    pub fn get(&self, need: NeedType) -> f64 {
        match need {
            NeedType::Satiation => self.satiation,
            NeedType::Social => self.social,
            NeedType::Energy => self.energy,
            NeedType::Fun => self.fun,
        }
    }

    fn slot(&mut self, need: NeedType) -> &mut f64 {
        match need {
            NeedType::Satiation => &mut self.satiation,
            NeedType::Social => &mut self.social,
            NeedType::Energy => &mut self.energy,
            NeedType::Fun => &mut self.fun,
        }
    }

    /// Apply an immediate delta, clamped to [0, 100]
    pub fn change(&mut self, need: NeedType, delta: f64) {
        let slot = self.slot(need);
        *slot = (*slot + delta).clamp(NEED_MIN, NEED_MAX);
    }

    /// How far the drive is from satisfied, in [0, 1]
    pub fn deficit(&self, need: NeedType) -> f64 {
        (NEED_MAX - self.get(need)) / NEED_MAX
    }

    /// Batched decay
    ///
    /// Returns true when an update was written. The applied decay is
    /// `rate * (now - last_update)`, so skipping updates never loses decay.
    pub fn tick(&mut self, now: Tick, config: &SimulationConfig) -> bool {
        let elapsed = now.saturating_sub(self.last_update);
        if elapsed < config.needs_update_interval.max(1) {
            return false;
        }

        for need in NeedType::ALL {
            let rate = need.decay_rate(config);
            self.change(need, -rate * elapsed as f64);
        }
        self.last_update = now;
        true
    }
}
