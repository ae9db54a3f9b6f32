//! Terrain grid and procedural cave generation.
//!
//! The generator seeds random walls, smooths them with cellular-automata
//! passes, then keeps a single flood-filled floor component so every floor
//! tile is reachable from every other. Undersized caves are discarded and
//! regenerated, with a bounded retry count.

use std::collections::VecDeque;

use log::{debug, warn};
use rand::Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ecs::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Floor,
}

/// Probability that a cell starts as wall before smoothing.
const WALL_PROBABILITY: f64 = 0.45;

/// One cellular-automata smoothing pass, applied `reps` times: a cell with
/// at least `to_wall` wall neighbors (8-neighborhood, out-of-bounds counts
/// as wall) becomes wall, one with at most `to_floor` becomes floor, and
/// anything in between is left alone.
struct SmoothPass {
    to_wall: u32,
    to_floor: u32,
    reps: u32,
}

const SMOOTHING_PASSES: &[SmoothPass] = &[
    SmoothPass {
        to_wall: 5,
        to_floor: 3,
        reps: 4,
    },
    SmoothPass {
        to_wall: 5,
        to_floor: 2,
        reps: 2,
    },
];

/// Smallest acceptable reachable floor area, as a fraction of the grid.
const MIN_CAVE_FRACTION: f64 = 0.25;

/// Cap on regeneration attempts. The smoothing parameters make a pass fail
/// only rarely, so hitting this cap means something is wrong with the
/// requested dimensions rather than bad luck.
const MAX_GEN_ATTEMPTS: u32 = 24;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapGenError {
    #[error("no cave with enough reachable floor after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

/// The rectangular terrain grid of a level, plus the monotonic set of tiles
/// the player has ever seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    width: i32,
    height: i32,
    tiles: Vec<TileKind>,
    explored: FxHashSet<Point>,
    floor_count: usize,
}

impl Map {
    /// Generate a connected cave. Fails only when `MAX_GEN_ATTEMPTS`
    /// candidate maps in a row come out below the minimum reachable area.
    pub fn generate<R: Rng>(width: i32, height: i32, rng: &mut R) -> Result<Self, MapGenError> {
        assert!(width > 0 && height > 0, "map dimensions must be positive");
        let min_floor = ((width * height) as f64 * MIN_CAVE_FRACTION) as usize;

        for attempt in 1..=MAX_GEN_ATTEMPTS {
            let mut map = Self::random_fill(width, height, rng);
            for pass in SMOOTHING_PASSES {
                for _ in 0..pass.reps {
                    map.smooth(pass);
                }
            }

            if !map.tiles.contains(&TileKind::Floor) {
                warn!("cave attempt {attempt}: smoothing left no floor at all");
                continue;
            }

            // Keep only the component reachable from a random floor seed;
            // smoothing alone does not guarantee connectivity.
            let seed = map.sample_floor(rng);
            let reachable = map.flood_fill(seed);
            for y in 0..height {
                for x in 0..width {
                    let p = Point::new(x, y);
                    if map.tile(p) == Some(TileKind::Floor) && !reachable.contains(&p) {
                        let idx = map.index(p);
                        map.tiles[idx] = TileKind::Wall;
                    }
                }
            }

            if reachable.len() < min_floor {
                warn!(
                    "cave attempt {attempt}: reachable area {} below minimum {min_floor}, regenerating",
                    reachable.len()
                );
                continue;
            }

            map.floor_count = reachable.len();
            debug!(
                "generated {width}x{height} cave with {} floor tiles on attempt {attempt}",
                map.floor_count
            );
            return Ok(map);
        }

        Err(MapGenError::RetriesExhausted {
            attempts: MAX_GEN_ATTEMPTS,
        })
    }

    fn random_fill<R: Rng>(width: i32, height: i32, rng: &mut R) -> Self {
        let tiles = (0..width * height)
            .map(|_| {
                if rng.gen_bool(WALL_PROBABILITY) {
                    TileKind::Wall
                } else {
                    TileKind::Floor
                }
            })
            .collect();
        Self {
            width,
            height,
            tiles,
            explored: FxHashSet::default(),
            floor_count: 0,
        }
    }

    /// Build a map from rows of `#` (wall) and `.` (floor). Test fixture.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.len()) as i32;
        let tiles: Vec<TileKind> = rows
            .iter()
            .flat_map(|row| row.chars())
            .map(|c| {
                if c == '#' {
                    TileKind::Wall
                } else {
                    TileKind::Floor
                }
            })
            .collect();
        let floor_count = tiles.iter().filter(|&&t| t == TileKind::Floor).count();
        Self {
            width,
            height,
            tiles,
            explored: FxHashSet::default(),
            floor_count,
        }
    }

    fn smooth(&mut self, pass: &SmoothPass) {
        let mut next = self.tiles.clone();
        for y in 0..self.height {
            for x in 0..self.width {
                let p = Point::new(x, y);
                let walls = self.wall_neighbors(p);
                if walls >= pass.to_wall {
                    next[self.index(p)] = TileKind::Wall;
                } else if walls <= pass.to_floor {
                    next[self.index(p)] = TileKind::Floor;
                }
            }
        }
        self.tiles = next;
    }

    /// Wall count over the 8-neighborhood; out-of-bounds neighbors count as
    /// wall so the border closes in on itself.
    fn wall_neighbors(&self, p: Point) -> u32 {
        let mut walls = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let q = Point::new(p.x + dx, p.y + dy);
                if self.tile(q).unwrap_or(TileKind::Wall) == TileKind::Wall {
                    walls += 1;
                }
            }
        }
        walls
    }

    /// The 4-connected floor component containing `seed`. Diagonal-only
    /// passages are treated as disconnected and end up culled.
    fn flood_fill(&self, seed: Point) -> FxHashSet<Point> {
        let mut reachable = FxHashSet::default();
        let mut frontier = VecDeque::new();
        reachable.insert(seed);
        frontier.push_back(seed);
        while let Some(p) = frontier.pop_front() {
            for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
                let q = Point::new(p.x + dx, p.y + dy);
                if self.tile(q) == Some(TileKind::Floor) && reachable.insert(q) {
                    frontier.push_back(q);
                }
            }
        }
        reachable
    }

    fn index(&self, p: Point) -> usize {
        (p.y * self.width + p.x) as usize
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    pub fn tile(&self, p: Point) -> Option<TileKind> {
        if self.in_bounds(p) {
            Some(self.tiles[self.index(p)])
        } else {
            None
        }
    }

    pub fn walkable(&self, p: Point) -> bool {
        self.tile(p) == Some(TileKind::Floor)
    }

    /// Number of reachable floor tiles.
    pub fn floor_count(&self) -> usize {
        self.floor_count
    }

    /// A uniformly random floor tile, by rejection sampling.
    ///
    /// Precondition: the map has at least one floor tile; sampling diverges
    /// otherwise. Generated maps always satisfy this.
    pub fn random_floor<R: Rng>(&self, rng: &mut R) -> Point {
        self.sample_floor(rng)
    }

    fn sample_floor<R: Rng>(&self, rng: &mut R) -> Point {
        loop {
            let p = Point::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height));
            if self.walkable(p) {
                return p;
            }
        }
    }

    // --- Explored tracking -------------------------------------------------

    /// Mark a tile as explored. Exploration is monotonic: there is no way to
    /// un-explore a tile.
    pub fn mark_explored(&mut self, p: Point) {
        if self.in_bounds(p) {
            self.explored.insert(p);
        }
    }

    pub fn is_explored(&self, p: Point) -> bool {
        self.explored.contains(&p)
    }

    pub fn explored(&self) -> &FxHashSet<Point> {
        &self.explored
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
