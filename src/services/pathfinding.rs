//! Bounded breadth-first pathfinding over the grid

use ahash::AHashMap;
use std::collections::VecDeque;

use super::{Pathfinder, WorldGeometry};
use crate::core::types::Coord;

#[derive(Debug, Clone)]
pub struct GridPathfinder {
    /// Search gives up after visiting this many cells
    pub max_nodes: usize,
}

impl Default for GridPathfinder {
    fn default() -> Self {
        Self { max_nodes: 4096 }
    }
}

impl GridPathfinder {
    pub fn new(max_nodes: usize) -> Self {
        Self { max_nodes }
    }

    fn passable(geometry: &dyn WorldGeometry, unlocks: &[String], c: Coord) -> bool {
        geometry.is_walkable(c)
            && geometry
                .lock_at(c)
                .map_or(true, |key| unlocks.iter().any(|u| u == key))
    }
}

impl Pathfinder for GridPathfinder {
    fn generate_path(
        &self,
        geometry: &dyn WorldGeometry,
        unlocks: &[String],
        start: Coord,
        end: Coord,
        fuzzy: bool,
    ) -> Vec<Coord> {
        if start == end {
            return Vec::new();
        }

        let end_passable = Self::passable(geometry, unlocks, end);
        if !end_passable && !fuzzy {
            return Vec::new();
        }
        let is_goal = |c: Coord| {
            if end_passable {
                c == end
            } else {
                c != end && c.distance(&end) < 1.5
            }
        };
        if is_goal(start) {
            return Vec::new();
        }

        let mut came_from: AHashMap<Coord, Coord> = AHashMap::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);
        came_from.insert(start, start);

        let mut found = None;
        while let Some(current) = queue.pop_front() {
            if came_from.len() > self.max_nodes {
                break;
            }
            for next in current.neighbors() {
                if came_from.contains_key(&next) || !Self::passable(geometry, unlocks, next) {
                    continue;
                }
                came_from.insert(next, current);
                if is_goal(next) {
                    found = Some(next);
                    break;
                }
                queue.push_back(next);
            }
            if found.is_some() {
                break;
            }
        }

        let Some(goal) = found else {
            return Vec::new();
        };
        let mut path = vec![goal];
        let mut cursor = goal;
        while let Some(&prev) = came_from.get(&cursor) {
            if prev == start {
                break;
            }
            path.push(prev);
            cursor = prev;
        }
        path.reverse();
        path
    }
}
