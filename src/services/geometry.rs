//! Rectangular grid world

use ahash::{AHashMap, AHashSet};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::WorldGeometry;
use crate::core::types::Coord;

/// Bounded grid with blocked and locked cells
#[derive(Debug, Clone)]
pub struct GridMap {
    pub width: i32,
    pub height: i32,
    blocked: AHashSet<Coord>,
    locks: AHashMap<Coord, String>,
    spawn_points: Vec<Coord>,
}

impl GridMap {
    /// Every cell walkable
    pub fn open(width: i32, height: i32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            blocked: AHashSet::new(),
            locks: AHashMap::new(),
            spawn_points: Vec::new(),
        }
    }

    pub fn in_bounds(&self, pos: Coord) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub fn block(&mut self, pos: Coord) {
        self.blocked.insert(pos);
    }

    pub fn lock(&mut self, pos: Coord, key: impl Into<String>) {
        self.locks.insert(pos, key.into());
    }

    pub fn add_spawn_point(&mut self, pos: Coord) {
        self.spawn_points.push(pos);
    }
}

impl WorldGeometry for GridMap {
    fn is_walkable(&self, pos: Coord) -> bool {
        self.in_bounds(pos) && !self.blocked.contains(&pos)
    }

    fn lock_at(&self, pos: Coord) -> Option<&str> {
        self.locks.get(&pos).map(String::as_str)
    }

    fn spawn_coord(&self, rng: &mut ChaCha8Rng) -> Coord {
        if !self.spawn_points.is_empty() {
            return self.spawn_points[rng.gen_range(0..self.spawn_points.len())];
        }
        // bounded retries; an all-blocked map falls back to the origin
        for _ in 0..64 {
            let c = Coord::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height));
            if self.is_walkable(c) {
                return c;
            }
        }
        Coord::new(0, 0)
    }

    fn bounds(&self) -> (i32, i32) {
        (self.width, self.height)
    }
}
