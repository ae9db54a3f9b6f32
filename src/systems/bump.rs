//! Movement/combat resolution for queued bump intents.
//!
//! The intent is consumed whether or not the move succeeds. A bump into a
//! blocking entity with health becomes an attack: the hit is queued on the
//! target rather than applied, so several attackers in one tick aggregate
//! before any health mutation.

use crate::ecs::components::{
    Bump, Damage, DamageEffect, DamageQueue, Health, LogKind, Obstruct, Position,
};
use crate::ecs::{EntityId, Point, Registry};
use crate::map::Map;
use crate::systems::push_log;

pub fn update(registry: &mut Registry, map: &Map, entity: EntityId) {
    if !registry.has::<Position>(entity) {
        return;
    }
    let Some(Bump(delta)) = registry.remove::<Bump>(entity) else {
        return;
    };
    if delta == Point::ZERO {
        return;
    }
    let Some(&Position(pos)) = registry.get::<Position>(entity) else {
        return;
    };
    let dest = pos + delta;

    if !map.walkable(dest) {
        push_log(registry, "The wall is firm and unyielding!", LogKind::Special);
        return;
    }

    let targets: Vec<EntityId> = registry
        .entities_at(dest)
        .into_iter()
        .filter(|&t| registry.has::<Health>(t) && registry.has::<Obstruct>(t))
        .collect();

    match targets.as_slice() {
        [] => {
            if let Some(p) = registry.get_mut::<Position>(entity) {
                p.0 = dest;
            }
        }
        &[target] => {
            // No attack power, no attack; the bump is spent regardless.
            let Some(&Damage(amount)) = registry.get::<Damage>(entity) else {
                return;
            };
            let effect = DamageEffect {
                source: entity,
                amount,
            };
            if let Some(queue) = registry.get_mut::<DamageQueue>(target) {
                queue.0.push(effect);
            } else {
                registry.insert(target, DamageQueue(vec![effect]));
            }
        }
        many => panic!(
            "tile occupancy invariant broken: {} blocking entities with health at {dest:?}",
            many.len()
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
