//! The update systems and the fixed tick pipeline.
//!
//! The system set is closed, so there is no dynamic dispatch: a tick is one
//! explicit, ordered sequence of function calls over the registry. Each
//! system takes the stores it works on as plain parameters, which keeps
//! every system unit-testable without global state.

use rand::Rng;

use crate::ecs::components::{LogEntry, LogKind, Name};
use crate::ecs::{EntityId, Registry};
use crate::map::Map;

pub mod ai;
pub mod animation;
pub mod bump;
pub mod damage;
pub mod death;
pub mod exploration;
pub mod perception;

/// Run one gameplay tick over a snapshot of the live entity list.
///
/// Entities created mid-tick (blood decals, log carriers) are not in the
/// snapshot and are therefore not visited until the next tick. The second
/// pass resolves the damage queued by the first, then transforms anything
/// that died.
pub fn run_tick<R: Rng>(registry: &mut Registry, map: &mut Map, rng: &mut R) {
    let snapshot: Vec<EntityId> = registry.entities().to_vec();
    for &entity in &snapshot {
        perception::update(registry, map, entity);
        ai::update(registry, map, rng, entity);
        bump::update(registry, map, entity);
        exploration::update(registry, map, entity);
    }
    for &entity in &snapshot {
        damage::update(registry, entity);
        death::update(registry, entity);
    }
}

/// Advance every animation by one animation-clock tick.
///
/// Driven by the presentation layer's real-time timer, independent of
/// [`run_tick`]; animations keep playing while the game waits for input.
pub fn advance_animations(registry: &mut Registry) {
    for entity in registry.entities_with::<crate::ecs::components::Animation>() {
        animation::update(registry, entity);
    }
}

/// Spawn a transient log-carrier entity. The game façade drains these into
/// the message log at the end of the tick.
pub(crate) fn push_log(registry: &mut Registry, text: impl Into<String>, kind: LogKind) {
    let carrier = registry.create();
    registry.insert(
        carrier,
        LogEntry {
            text: text.into(),
            kind,
        },
    );
}

/// Display name of an entity, for log phrasing.
pub(crate) fn name_of(registry: &Registry, entity: EntityId) -> String {
    registry
        .get::<Name>(entity)
        .map_or_else(|| "something".to_string(), |n| n.0.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_log_creates_a_carrier_entity() {
        let mut registry = Registry::new();
        push_log(&mut registry, "ouch", LogKind::Info);
        let carriers = registry.entities_with::<LogEntry>();
        assert_eq!(carriers.len(), 1);
        assert_eq!(
            registry.get::<LogEntry>(carriers[0]).map(|l| l.text.as_str()),
            Some("ouch")
        );
    }

    #[test]
    fn name_of_falls_back_for_nameless_entities() {
        let mut registry = Registry::new();
        let e = registry.create();
        assert_eq!(name_of(&registry, e), "something");
        registry.insert(e, Name("Goblin".into()));
        assert_eq!(name_of(&registry, e), "Goblin");
    }
}
