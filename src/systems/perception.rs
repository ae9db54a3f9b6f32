//! Perception: per-entity sighting of other entities.
//!
//! Rebuilds each perceiver's visibility window and perceived-entity list
//! from scratch every tick, then drives AI state: a mob that sees the
//! player hunts, one that does not wanders. Sleep is never broken here —
//! whatever wakes a sleeper, it is not a line of sight.

use rustc_hash::FxHashSet;

use crate::ecs::components::{Ai, AiState, Perception, Position, Visible};
use crate::ecs::{EntityId, Point, Registry};
use crate::fov::shadowcast;
use crate::map::Map;

pub fn update(registry: &mut Registry, map: &Map, entity: EntityId) {
    let Some(&Position(pos)) = registry.get::<Position>(entity) else {
        return;
    };
    let Some(radius) = registry.get::<Perception>(entity).map(|p| p.radius) else {
        return;
    };

    let visible: FxHashSet<Point> = shadowcast(pos, radius, |p| map.walkable(p))
        .into_iter()
        .filter(|&p| pos.chebyshev(p) <= radius)
        .collect();

    let mut perceived = Vec::new();
    for other in registry.entities_with::<Visible>() {
        if other == entity {
            continue;
        }
        if let Some(&Position(other_pos)) = registry.get::<Position>(other) {
            if visible.contains(&other_pos) {
                perceived.push(other);
            }
        }
    }

    let player_seen = perceived.contains(&Registry::PLAYER);
    if let Some(per) = registry.get_mut::<Perception>(entity) {
        per.visible = visible;
        per.perceived = perceived;
    }

    if entity != Registry::PLAYER {
        if let Some(ai) = registry.get_mut::<Ai>(entity) {
            if ai.state != AiState::Sleeping {
                ai.state = if player_seen {
                    AiState::Hunting
                } else {
                    AiState::Wandering
                };
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
