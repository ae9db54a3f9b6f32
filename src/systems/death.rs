//! Death transformation: a flagged entity becomes an inert, collectible
//! corpse under the same id. Consuming the marker first makes the pass
//! idempotent — a second visit finds nothing to do.

use log::debug;

use crate::ecs::components::{
    Ai, AreaOfEffect, Bump, Collectible, Consumable, Damage, DamageQueue, Death, DrawOrder,
    Healing, Health, Inventory, LogKind, Name, Obstruct, Perception, Position, Ranged, Renderable,
    Visible,
};
use crate::ecs::{EntityId, Registry};
use crate::systems::{name_of, push_log};

/// A corpse makes for a meager meal.
const CORPSE_HEALING: i32 = 2;

pub fn update(registry: &mut Registry, entity: EntityId) {
    if registry.remove::<Death>(entity).is_none() {
        return;
    }

    let name = name_of(registry, entity);
    let pos = registry.get::<Position>(entity).map(|p| p.0);
    debug!("entity {entity:?} ({name}) dies at {pos:?}");

    // Strip everything behavioral; the id lives on but nothing will ever
    // act on, target, or collide with it again.
    registry.remove::<Obstruct>(entity);
    registry.remove::<Visible>(entity);
    registry.remove::<Perception>(entity);
    registry.remove::<Ai>(entity);
    registry.remove::<Bump>(entity);
    registry.remove::<Damage>(entity);
    registry.remove::<Ranged>(entity);
    registry.remove::<AreaOfEffect>(entity);
    registry.remove::<DamageQueue>(entity);
    registry.remove::<Health>(entity);

    // Carried items spill onto the corpse's tile.
    if let Some(Inventory { items }) = registry.remove::<Inventory>(entity) {
        if let Some(p) = pos {
            for item in items {
                registry.insert(item, Position(p));
            }
        }
    }

    registry.insert(entity, Name(format!("{name} corpse")));
    registry.insert(
        entity,
        Renderable {
            glyph: '%',
            order: DrawOrder::Corpse,
        },
    );
    registry.insert(entity, Collectible);
    registry.insert(entity, Consumable);
    registry.insert(entity, Healing(CORPSE_HEALING));

    let text = if entity == Registry::PLAYER {
        "You have died!".to_string()
    } else {
        format!("{name} has died!")
    };
    push_log(registry, text, LogKind::MonsterAttack);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
