//! Damage resolution: applies the hits queued by the bump system (and item
//! use), emits combat narration, and flags deaths for the death system.
//!
//! Keeping accounting here and transformation there makes the two phases
//! independently testable.

use crate::ecs::components::{
    DamageQueue, Death, DrawOrder, Health, LogKind, Name, Position, Renderable,
};
use crate::ecs::{EntityId, Point, Registry};
use crate::systems::{name_of, push_log};

pub fn update(registry: &mut Registry, entity: EntityId) {
    if !registry.has::<Health>(entity) {
        return;
    }
    let Some(DamageQueue(effects)) = registry.remove::<DamageQueue>(entity) else {
        return;
    };

    let victim_name = name_of(registry, entity);
    let victim_pos = registry.get::<Position>(entity).map(|p| p.0);

    for effect in effects {
        let hp_after = match registry.get_mut::<Health>(entity) {
            Some(health) => {
                health.hp = (health.hp - effect.amount).max(0);
                health.hp
            }
            None => break,
        };

        let (text, kind) = if effect.source == Registry::PLAYER {
            (
                format!("You stab the {victim_name} with your sword!"),
                LogKind::PlayerAttack,
            )
        } else if entity == Registry::PLAYER {
            (
                format!("The {} mauls you!", name_of(registry, effect.source)),
                LogKind::MonsterAttack,
            )
        } else {
            (
                format!(
                    "The {} hits the {victim_name}.",
                    name_of(registry, effect.source)
                ),
                LogKind::PlayerAttack,
            )
        };
        push_log(registry, text, kind);

        if hp_after == 0 {
            if let Some(p) = victim_pos {
                if !registry.blood_at(p) {
                    spawn_blood(registry, p);
                }
            }
            registry.insert(entity, Death);
        }
    }
}

fn spawn_blood(registry: &mut Registry, p: Point) {
    let decal = registry.create();
    registry.insert(decal, Name("blood".into()));
    registry.insert(decal, Position(p));
    registry.insert(
        decal,
        Renderable {
            glyph: '.',
            order: DrawOrder::Floor,
        },
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{DamageEffect, LogEntry, Obstruct};

    fn spawn_named(registry: &mut Registry, name: &str, hp: i32, pos: Point) -> EntityId {
        let e = registry.create();
        registry.insert(e, Name(name.into()));
        registry.insert(e, Health { hp, maxhp: hp });
        registry.insert(e, Position(pos));
        registry.insert(e, Obstruct);
        e
    }

    fn queue(registry: &mut Registry, target: EntityId, source: EntityId, amount: i32) {
        let effect = DamageEffect { source, amount };
        if let Some(q) = registry.get_mut::<DamageQueue>(target) {
            q.0.push(effect);
        } else {
            registry.insert(target, DamageQueue(vec![effect]));
        }
    }

    fn log_lines(registry: &Registry) -> Vec<String> {
        registry
            .entities_with::<LogEntry>()
            .into_iter()
            .filter_map(|e| registry.get::<LogEntry>(e).map(|l| l.text.clone()))
            .collect()
    }

    #[test]
    fn applies_damage_and_clears_the_queue() {
        let mut registry = Registry::new();
        let player = spawn_named(&mut registry, "Player", 18, Point::new(0, 0));
        let goblin = spawn_named(&mut registry, "Goblin", 10, Point::new(1, 0));
        queue(&mut registry, goblin, player, 5);

        update(&mut registry, goblin);

        assert_eq!(registry.get::<Health>(goblin).unwrap().hp, 5);
        assert!(registry.get::<DamageQueue>(goblin).is_none());
        assert_eq!(
            log_lines(&registry),
            vec!["You stab the Goblin with your sword!"]
        );
        assert!(!registry.has::<Death>(goblin), "still alive");
        assert!(!registry.blood_at(Point::new(1, 0)), "no decal while hp > 0");
    }

    #[test]
    fn net_hp_change_equals_the_applied_sum() {
        let mut registry = Registry::new();
        let player = spawn_named(&mut registry, "Player", 18, Point::new(0, 0));
        let troll = spawn_named(&mut registry, "Troll", 20, Point::new(1, 0));
        queue(&mut registry, troll, player, 5);
        queue(&mut registry, troll, player, 3);
        queue(&mut registry, troll, player, 4);

        update(&mut registry, troll);

        assert_eq!(registry.get::<Health>(troll).unwrap().hp, 20 - (5 + 3 + 4));
        assert_eq!(log_lines(&registry).len(), 3, "one line per hit");
    }

    #[test]
    fn hp_is_floored_at_zero() {
        let mut registry = Registry::new();
        let player = spawn_named(&mut registry, "Player", 18, Point::new(0, 0));
        let goblin = spawn_named(&mut registry, "Goblin", 4, Point::new(1, 0));
        queue(&mut registry, goblin, player, 9);

        update(&mut registry, goblin);

        assert_eq!(registry.get::<Health>(goblin).unwrap().hp, 0);
        assert!(registry.has::<Death>(goblin));
    }

    #[test]
    fn lethal_hit_spawns_a_single_blood_decal() {
        let mut registry = Registry::new();
        let player = spawn_named(&mut registry, "Player", 18, Point::new(0, 0));
        let goblin = spawn_named(&mut registry, "Goblin", 4, Point::new(2, 2));
        queue(&mut registry, goblin, player, 4);
        queue(&mut registry, goblin, player, 4);

        update(&mut registry, goblin);

        assert!(registry.blood_at(Point::new(2, 2)));
        let decals = registry
            .entities_with::<Name>()
            .into_iter()
            .filter(|&e| registry.get::<Name>(e).is_some_and(|n| n.0 == "blood"))
            .count();
        assert_eq!(decals, 1, "the second lethal hit reuses the decal");
    }

    #[test]
    fn monster_hitting_the_player_uses_second_person() {
        let mut registry = Registry::new();
        let player = spawn_named(&mut registry, "Player", 18, Point::new(0, 0));
        let goblin = spawn_named(&mut registry, "Goblin", 10, Point::new(1, 0));
        queue(&mut registry, player, goblin, 2);

        update(&mut registry, player);

        assert_eq!(log_lines(&registry), vec!["The Goblin mauls you!"]);
        assert_eq!(registry.get::<Health>(player).unwrap().hp, 16);
    }

    #[test]
    fn monster_on_monster_phrasing() {
        let mut registry = Registry::new();
        let _player = spawn_named(&mut registry, "Player", 18, Point::new(0, 0));
        let goblin = spawn_named(&mut registry, "Goblin", 10, Point::new(1, 0));
        let troll = spawn_named(&mut registry, "Troll", 20, Point::new(2, 0));
        queue(&mut registry, goblin, troll, 5);

        update(&mut registry, goblin);

        assert_eq!(log_lines(&registry), vec!["The Troll hits the Goblin."]);
    }

    #[test]
    fn entities_without_health_are_skipped() {
        let mut registry = Registry::new();
        let decal = registry.create();
        registry.insert(decal, DamageQueue(vec![]));

        update(&mut registry, decal);

        // Queue left in place; the system only drains health-bearers.
        assert!(registry.get::<DamageQueue>(decal).is_some());
    }
}
