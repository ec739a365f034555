//! Calendar system for time-of-day tracking
//!
//! The calendar owns the global tick counter; it is the only clock the
//! simulation reads.

use serde::{Deserialize, Serialize};

use crate::core::types::Tick;

/// Snapshot of the world clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldDate {
    pub global_tick: Tick,
    pub hour: u32,
}

/// Calendar tracks simulation time with day/hour granularity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    tick: Tick,
    ticks_per_day: u64,
}

impl Calendar {
    pub fn new(ticks_per_day: u64) -> Self {
        Self {
            tick: 0,
            ticks_per_day: ticks_per_day.max(1),
        }
    }

    /// Resume at a tick restored from a snapshot
    pub fn starting_at(ticks_per_day: u64, tick: Tick) -> Self {
        Self {
            tick,
            ..Self::new(ticks_per_day)
        }
    }

    pub fn advance(&mut self) {
        self.tick += 1;
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn current_day(&self) -> u64 {
        self.tick / self.ticks_per_day
    }

    pub fn current_hour(&self) -> u32 {
        let tick_in_day = self.tick % self.ticks_per_day;
        let hours_per_day = 24;
        ((tick_in_day * hours_per_day) / self.ticks_per_day) as u32
    }

    pub fn date(&self) -> WorldDate {
        WorldDate {
            global_tick: self.tick,
            hour: self.current_hour(),
        }
    }

    pub fn ticks_per_day(&self) -> u64 {
        self.ticks_per_day
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_advances() {
        let mut cal = Calendar::new(1000);
        assert_eq!(cal.current_tick(), 0);
        assert_eq!(cal.current_day(), 0);

        cal.advance();
        assert_eq!(cal.current_tick(), 1);

        for _ in 0..999 {
            cal.advance();
        }
        assert_eq!(cal.current_tick(), 1000);
        assert_eq!(cal.current_day(), 1);
    }

    #[test]
    fn test_date_hour() {
        let cal = Calendar::starting_at(24, 30);
        let date = cal.date();
        assert_eq!(date.global_tick, 30);
        assert_eq!(date.hour, 6);
    }
}
