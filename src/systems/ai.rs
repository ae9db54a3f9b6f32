//! AI decision-making: the sleep/wander/hunt state machine plus A* path
//! planning. Emits at most one one-tile movement intent per entity per
//! tick; the bump system resolves it.

use rand::Rng;

use crate::ecs::components::{Ai, AiState, Bump, Position};
use crate::ecs::{DIRS_8, EntityId, Point, Registry};
use crate::map::Map;
use crate::path::astar;

/// Step cost for a tile currently occupied by a blocking entity. High
/// enough to prefer a detour, low enough that a crowd never deadlocks an
/// entity with no other route.
const BLOCKED_TILE_COST: i32 = 8;

/// Attempts at sampling a wander destination before giving up for the tick.
const WANDER_PICK_TRIES: u32 = 128;

pub fn update<R: Rng>(registry: &mut Registry, map: &Map, rng: &mut R, entity: EntityId) {
    let Some(&Position(pos)) = registry.get::<Position>(entity) else {
        return;
    };
    let Some(mut ai) = registry.get::<Ai>(entity).copied() else {
        return;
    };

    match ai.state {
        AiState::Sleeping => return,
        AiState::Wandering => {
            // Pick a fresh destination once the old one is reached (or was
            // never set).
            if ai.dest.is_none_or(|d| d == pos) {
                ai.dest = pick_wander_dest(map, rng, pos);
            }
        }
        AiState::Hunting => {
            // Recomputed every tick so the chase tracks a moving target.
            ai.dest = registry.get::<Position>(Registry::PLAYER).map(|p| p.0);
        }
    }
    registry.insert(entity, ai);

    let Some(dest) = ai.dest else {
        return;
    };

    let path = astar(
        pos,
        dest,
        |p| {
            DIRS_8
                .iter()
                .map(|&d| p + d)
                .filter(|&q| map.walkable(q))
                .collect()
        },
        |_, q| {
            if registry.no_blocking_entity_at(q) {
                1
            } else {
                BLOCKED_TILE_COST
            }
        },
        |p, q| p.chebyshev(q),
    );

    // First step after the current cell; hold position when no route
    // exists or we already stand at the destination.
    if let Some(path) = path {
        if let Some(&step) = path.get(1) {
            registry.insert(entity, Bump(step - pos));
        }
    }
}

fn pick_wander_dest<R: Rng>(map: &Map, rng: &mut R, pos: Point) -> Option<Point> {
    // Bounded rejection loop; a map whose only floor tile is `pos` has no
    // valid destination, and waiting a tick is fine.
    for _ in 0..WANDER_PICK_TRIES {
        let p = map.random_floor(rng);
        if p != pos {
            return Some(p);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
