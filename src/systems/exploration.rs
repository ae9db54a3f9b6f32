//! Exploration: marks terrain seen by vision-carrying entities as explored.
//!
//! Distinct from perception, which tracks entities; this system tracks the
//! map. Both share the shadowcasting primitive. Typically only the player
//! carries `Vision`, but nothing here assumes that — a potion of telepathy
//! could hand it to anything.

use rustc_hash::FxHashSet;

use crate::ecs::components::{Position, Vision};
use crate::ecs::{EntityId, Point, Registry};
use crate::fov::shadowcast;
use crate::map::Map;

pub fn update(registry: &mut Registry, map: &mut Map, entity: EntityId) {
    let Some(&Position(pos)) = registry.get::<Position>(entity) else {
        return;
    };
    let Some(radius) = registry.get::<Vision>(entity).map(|v| v.radius) else {
        return;
    };

    let visible: FxHashSet<Point> = shadowcast(pos, radius, |p| map.walkable(p))
        .into_iter()
        .filter(|&p| map.in_bounds(p) && pos.chebyshev(p) <= radius)
        .collect();

    for &p in &visible {
        map.mark_explored(p);
    }
    if let Some(vision) = registry.get_mut::<Vision>(entity) {
        vision.visible = visible;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
