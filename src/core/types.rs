//! Core type definitions used throughout the codebase

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Simulation tick counter (simulation time unit)
pub type Tick = u64;

/// Identifier of a mob row in the store
#[derive(
    Debug, Display, From, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[display(fmt = "mob#{}", _0)]
pub struct MobId(pub u64);

/// Identifier of an item row in the store
#[derive(
    Debug, Display, From, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[display(fmt = "item#{}", _0)]
pub struct ItemId(pub u64);

/// Community (faction, village, guild) a mob belongs to
#[derive(Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommunityId(pub String);

impl CommunityId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Any entity that can carry effect records
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    #[display(fmt = "{}", _0)]
    Mob(MobId),
    #[display(fmt = "{}", _0)]
    Item(ItemId),
}

impl From<MobId> for EntityRef {
    fn from(id: MobId) -> Self {
        EntityRef::Mob(id)
    }
}

impl From<ItemId> for EntityRef {
    fn from(id: ItemId) -> Self {
        EntityRef::Item(id)
    }
}

/// Grid cell coordinate
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[display(fmt = "({}, {})", x, y)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Continuous position at the center of this cell
    pub fn to_position(self) -> Position {
        Position::new(self.x as f64, self.y as f64)
    }

    pub fn distance(&self, other: &Self) -> f64 {
        self.to_position().distance(&other.to_position())
    }

    /// The eight surrounding cells
    pub fn neighbors(&self) -> impl Iterator<Item = Coord> + '_ {
        const OFFSETS: [(i32, i32); 8] = [
            (1, 0),
            (-1, 0),
            (0, 1),
            (0, -1),
            (1, 1),
            (1, -1),
            (-1, 1),
            (-1, -1),
        ];
        OFFSETS
            .iter()
            .map(move |(dx, dy)| Coord::new(self.x + dx, self.y + dy))
    }
}

/// Continuous 2D position of a mob
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0001 {
            Self { x: self.x / len, y: self.y / len }
        } else {
            Self::default()
        }
    }

    /// Nearest grid cell
    pub fn round(&self) -> Coord {
        Coord::new(self.x.round() as i32, self.y.round() as i32)
    }

    /// Exact conversion into a movement target
    ///
    /// Movement targets are grid cells; a fractional position here means
    /// a behavior computed a target without snapping it first.
    pub fn to_target(&self) -> Result<Coord> {
        if self.x.fract() != 0.0 || self.y.fract() != 0.0 {
            return Err(SimError::Invariant(format!(
                "non-integer movement target ({}, {})",
                self.x, self.y
            )));
        }
        Ok(Coord::new(self.x as i32, self.y as i32))
    }
}

impl std::ops::Add for Position {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Position {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f64> for Position {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(MobId(7).to_string(), "mob#7");
        assert_eq!(ItemId(3).to_string(), "item#3");
        assert_eq!(EntityRef::from(ItemId(3)).to_string(), "item#3");
    }

    #[test]
    fn test_fractional_target_is_invariant_violation() {
        let ok = Position::new(3.0, -2.0).to_target().unwrap();
        assert_eq!(ok, Coord::new(3, -2));

        let err = Position::new(3.5, 1.0).to_target();
        assert!(matches!(err, Err(SimError::Invariant(_))));
    }

    #[test]
    fn test_neighbors_are_adjacent() {
        let c = Coord::new(0, 0);
        let n: Vec<Coord> = c.neighbors().collect();
        assert_eq!(n.len(), 8);
        assert!(n.iter().all(|o| c.distance(o) < 1.5));
    }
}
