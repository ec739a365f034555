//! Collaborators the simulation consumes but does not own
//!
//! Each concern is a trait so tests and the binary can plug in their own
//! implementations. Defaults live in the submodules.

pub mod broadcast;
pub mod geometry;
pub mod pathfinding;
pub mod registry;

use ahash::AHashSet;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::Coord;

pub use broadcast::{EventLog, PublishedEvent, TraceBroadcaster};
pub use geometry::GridMap;
pub use pathfinding::GridPathfinder;
pub use registry::{HttpWorldRegistry, StaticWorldRegistry};

/// Static layout of the world
pub trait WorldGeometry: Send + Sync {
    fn is_walkable(&self, pos: Coord) -> bool;
    /// Lock key guarding a cell, if any
    fn lock_at(&self, pos: Coord) -> Option<&str>;
    fn spawn_coord(&self, rng: &mut ChaCha8Rng) -> Coord;
    /// Width and height in cells
    fn bounds(&self) -> (i32, i32);
}

pub trait Pathfinder: Send + Sync {
    /// Cells to walk, excluding `start`
    ///
    /// With `fuzzy`, an unwalkable `end` is replaced by a walkable
    /// neighbor. An empty path means unreachable (or already there).
    fn generate_path(
        &self,
        geometry: &dyn WorldGeometry,
        unlocks: &[String],
        start: Coord,
        end: Coord,
        fuzzy: bool,
    ) -> Vec<Coord>;
}

/// Geometry with extra cells blocked, such as those under unwalkable items
pub struct Obstructed<'a> {
    pub base: &'a dyn WorldGeometry,
    pub blocked: &'a AHashSet<Coord>,
}

impl WorldGeometry for Obstructed<'_> {
    fn is_walkable(&self, pos: Coord) -> bool {
        !self.blocked.contains(&pos) && self.base.is_walkable(pos)
    }

    fn lock_at(&self, pos: Coord) -> Option<&str> {
        self.base.lock_at(pos)
    }

    fn spawn_coord(&self, rng: &mut ChaCha8Rng) -> Coord {
        self.base.spawn_coord(rng)
    }

    fn bounds(&self) -> (i32, i32) {
        self.base.bounds()
    }
}

/// Another world a portal can lead to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldInfo {
    pub id: uuid::Uuid,
    pub name: String,
    #[serde(default)]
    pub address: String,
}

/// Remote list of live worlds
pub trait WorldRegistry: Send + Sync {
    fn get_worlds(&self) -> Result<Vec<WorldInfo>>;
}

/// Fire-and-forget event sink
pub trait Broadcaster: Send + Sync {
    fn publish(&self, event: &str, payload: serde_json::Value);
}

/// Everything external a tick may call
pub struct Services {
    pub geometry: Box<dyn WorldGeometry>,
    pub pathfinder: Box<dyn Pathfinder>,
    pub registry: Box<dyn WorldRegistry>,
    pub broadcaster: Box<dyn Broadcaster>,
}

impl Services {
    pub fn new(
        geometry: Box<dyn WorldGeometry>,
        pathfinder: Box<dyn Pathfinder>,
        registry: Box<dyn WorldRegistry>,
        broadcaster: Box<dyn Broadcaster>,
    ) -> Self {
        Self {
            geometry,
            pathfinder,
            registry,
            broadcaster,
        }
    }

    /// Open grid, no remote worlds, events traced but not retained
    ///
    /// Pass an `Arc<EventLog>` to `Services::new` to read events back.
    pub fn offline(width: i32, height: i32) -> Self {
        Self::new(
            Box::new(GridMap::open(width, height)),
            Box::new(GridPathfinder::default()),
            Box::new(StaticWorldRegistry::default()),
            Box::new(TraceBroadcaster),
        )
    }

    pub fn path(&self, unlocks: &[String], start: Coord, end: Coord, fuzzy: bool) -> Vec<Coord> {
        self.pathfinder
            .generate_path(&*self.geometry, unlocks, start, end, fuzzy)
    }

    /// Like `path`, treating `blocked` cells as unwalkable
    pub fn path_around(
        &self,
        blocked: &AHashSet<Coord>,
        unlocks: &[String],
        start: Coord,
        end: Coord,
        fuzzy: bool,
    ) -> Vec<Coord> {
        let geometry = Obstructed {
            base: &*self.geometry,
            blocked,
        };
        self.pathfinder
            .generate_path(&geometry, unlocks, start, end, fuzzy)
    }

    pub fn publish(&self, event: &str, payload: serde_json::Value) {
        self.broadcaster.publish(event, payload);
    }

    /// World list, degraded to empty when the registry is unreachable
    pub fn worlds(&self) -> Vec<WorldInfo> {
        match self.registry.get_worlds() {
            Ok(worlds) => worlds,
            Err(e) => {
                tracing::warn!("World registry unavailable, portal list empty: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_around_blocked_cells() {
        let services = Services::offline(3, 3);
        let start = Coord::new(0, 1);
        let end = Coord::new(2, 1);
        assert_eq!(services.path(&[], start, end, false).len(), 2);

        let blocked: AHashSet<Coord> = [Coord::new(1, 0), Coord::new(1, 1)].into_iter().collect();
        let path = services.path_around(&blocked, &[], start, end, false);
        assert!(path.contains(&Coord::new(1, 2)));
        assert!(!path.iter().any(|c| blocked.contains(c)));

        let walled: AHashSet<Coord> = (0..3).map(|y| Coord::new(1, y)).collect();
        assert!(services.path_around(&walled, &[], start, end, false).is_empty());
    }
}
