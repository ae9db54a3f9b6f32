//! The game façade: registry + map + message log + seeded RNG, with the
//! entry points the input and presentation layers are allowed to touch.
//!
//! The input layer mutates gameplay only through the intent helpers here
//! (queue a move, use an item) followed by [`Game::tick`]; the presentation
//! layer gets read-only queries. Rendering, key mapping, and save/load all
//! live outside this crate.

use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::ecs::components::{
    AreaOfEffect, Bump, Collectible, Consumable, Damage, DamageEffect, DamageQueue, Healing,
    Health, Inventory, LogEntry, LogKind, Obstruct, Position, Ranged, Vision,
};
use crate::ecs::{EntityId, Point, Registry};
use crate::map::{Map, MapGenError};
use crate::systems;

mod message_log;
mod spawn;

pub use message_log::{LogLine, MessageLog};

/// World-building knobs. The defaults match a classic 80x24 session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub map_width: i32,
    pub map_height: i32,
    pub monsters: u32,
    pub potions: u32,
    pub scrolls: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_width: 80,
            map_height: 24,
            monsters: 6,
            potions: 5,
            scrolls: 2,
        }
    }
}

/// The whole simulation state for one session.
pub struct Game {
    pub registry: Registry,
    pub map: Map,
    pub log: MessageLog,
    rng: StdRng,
}

impl Game {
    /// Generate a world and populate it. The same `(config, seed)` pair
    /// always produces the same world.
    pub fn new(config: &GameConfig, seed: u64) -> Result<Self, MapGenError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let map = Map::generate(config.map_width, config.map_height, &mut rng)?;
        let mut game = Self {
            registry: Registry::new(),
            map,
            log: MessageLog::new(),
            rng,
        };

        let start = game.map.random_floor(&mut game.rng);
        let player = game.spawn_player_at(start);
        debug_assert_eq!(player, Registry::PLAYER);
        game.populate(config.monsters, config.potions, config.scrolls);

        // Prime senses so the first frame has a field of view.
        let snapshot = game.registry.entities().to_vec();
        for &entity in &snapshot {
            systems::perception::update(&mut game.registry, &game.map, entity);
            systems::exploration::update(&mut game.registry, &mut game.map, entity);
        }
        debug!("new game: seed {seed}, {} entities", game.registry.len());
        Ok(game)
    }

    /// Bare world on a fixed map, for tests: no population, no priming.
    #[cfg(test)]
    pub(crate) fn bare(rows: &[&str]) -> Self {
        Self {
            registry: Registry::new(),
            map: Map::from_rows(rows),
            log: MessageLog::new(),
            rng: StdRng::seed_from_u64(0),
        }
    }

    // --- Input layer entry points ------------------------------------------

    /// Queue a one-tile movement intent for the player.
    pub fn queue_player_move(&mut self, delta: Point) {
        self.registry.insert(Registry::PLAYER, Bump(delta));
    }

    /// Pass the turn without moving.
    pub fn wait_turn(&mut self) {
        self.queue_player_move(Point::ZERO);
    }

    /// Advance the world by one gameplay tick, then fold the narrative the
    /// systems produced into the message log.
    pub fn tick(&mut self) {
        systems::run_tick(&mut self.registry, &mut self.map, &mut self.rng);
        self.collect_messages();
    }

    /// Advance animations by one animation-clock tick. Called from the
    /// presentation layer's real-time timer, never from the turn pipeline.
    pub fn advance_animations(&mut self) {
        systems::advance_animations(&mut self.registry);
    }

    fn collect_messages(&mut self) {
        for carrier in self.registry.entities_with::<LogEntry>() {
            if let Some(entry) = self.registry.remove::<LogEntry>(carrier) {
                self.log.push(entry.text, entry.kind);
            }
            self.registry.delete(carrier);
        }
    }

    // --- Inventory ----------------------------------------------------------

    /// Pick up a collectible at the player's feet. The item loses its
    /// position and lives on only as an inventory reference.
    pub fn pickup(&mut self) -> bool {
        let Some(&Position(pos)) = self.registry.get::<Position>(Registry::PLAYER) else {
            return false;
        };
        for item in self.registry.entities_at(pos) {
            if item == Registry::PLAYER || !self.registry.has::<Collectible>(item) {
                continue;
            }
            let name = systems::name_of(&self.registry, item);
            let Some(inv) = self.registry.get_mut::<Inventory>(Registry::PLAYER) else {
                return false;
            };
            inv.items.push(item);
            self.registry.remove::<Position>(item);
            self.log
                .push(format!("You pick up the {name}."), LogKind::Special);
            return true;
        }
        false
    }

    /// Consume a healing item from the given inventory slot.
    pub fn use_item(&mut self, slot: usize) -> bool {
        let Some(item) = self.inventory_item(slot) else {
            return false;
        };
        if !self.registry.has::<Consumable>(item) {
            return false;
        }
        let Some(&Healing(amount)) = self.registry.get::<Healing>(item) else {
            return false;
        };
        let name = systems::name_of(&self.registry, item);
        let Some(health) = self.registry.get_mut::<Health>(Registry::PLAYER) else {
            return false;
        };
        health.hp = (health.hp + amount).min(health.maxhp);
        self.consume(slot, item);
        self.log
            .push(format!("You consume the {name}."), LogKind::Special);
        true
    }

    /// Aim a ranged consumable at a tile. Hits are queued as ordinary
    /// damage effects and resolve on the next tick, exactly like melee.
    pub fn use_item_at(&mut self, slot: usize, target: Point) -> bool {
        let Some(item) = self.inventory_item(slot) else {
            return false;
        };
        if !self.registry.has::<Consumable>(item) {
            return false;
        }
        let Some(&Ranged(range)) = self.registry.get::<Ranged>(item) else {
            return false;
        };
        let Some(&Damage(amount)) = self.registry.get::<Damage>(item) else {
            return false;
        };
        let Some(&Position(origin)) = self.registry.get::<Position>(Registry::PLAYER) else {
            return false;
        };
        if origin.chebyshev(target) > range {
            self.log.push("That is out of range.", LogKind::Special);
            return false;
        }

        let victims: Vec<EntityId> = match self.registry.get::<AreaOfEffect>(item) {
            Some(&AreaOfEffect(radius)) => self
                .registry
                .entities_with::<Health>()
                .into_iter()
                .filter(|&e| self.registry.has::<Obstruct>(e))
                .filter(|&e| {
                    self.registry
                        .get::<Position>(e)
                        .is_some_and(|p| p.0.chebyshev(target) <= radius)
                })
                .collect(),
            None => self
                .registry
                .entities_at(target)
                .into_iter()
                .filter(|&e| self.registry.has::<Health>(e) && self.registry.has::<Obstruct>(e))
                .collect(),
        };
        if victims.is_empty() {
            self.log
                .push("It fizzles against empty air.", LogKind::Special);
            return false;
        }

        for victim in victims {
            let effect = DamageEffect {
                source: Registry::PLAYER,
                amount,
            };
            if let Some(queue) = self.registry.get_mut::<DamageQueue>(victim) {
                queue.0.push(effect);
            } else {
                self.registry.insert(victim, DamageQueue(vec![effect]));
            }
        }
        let name = systems::name_of(&self.registry, item);
        self.consume(slot, item);
        self.log
            .push(format!("You unleash the {name}!"), LogKind::Special);
        true
    }

    /// Drop an inventory item at the player's feet.
    pub fn drop_item(&mut self, slot: usize) -> bool {
        let Some(&Position(pos)) = self.registry.get::<Position>(Registry::PLAYER) else {
            return false;
        };
        let Some(inv) = self.registry.get_mut::<Inventory>(Registry::PLAYER) else {
            return false;
        };
        if slot >= inv.items.len() {
            return false;
        }
        let item = inv.items.remove(slot);
        let name = systems::name_of(&self.registry, item);
        self.registry.insert(item, Position(pos));
        self.log
            .push(format!("You drop the {name}."), LogKind::Special);
        true
    }

    fn inventory_item(&self, slot: usize) -> Option<EntityId> {
        self.registry
            .get::<Inventory>(Registry::PLAYER)
            .and_then(|inv| inv.items.get(slot).copied())
    }

    /// Remove a spent item from the inventory and the world.
    fn consume(&mut self, slot: usize, item: EntityId) {
        if let Some(inv) = self.registry.get_mut::<Inventory>(Registry::PLAYER) {
            if inv.items.get(slot) == Some(&item) {
                inv.items.remove(slot);
            }
        }
        self.registry.delete(item);
    }

    // --- Presentation layer queries ----------------------------------------

    /// True if `p` lies in the field of view of any vision-carrying entity.
    pub fn in_fov(&self, p: Point) -> bool {
        self.registry.entities_with::<Vision>().into_iter().any(|e| {
            self.registry
                .get::<Vision>(e)
                .is_some_and(|v| v.visible.contains(&p))
        })
    }

    pub fn player_dead(&self) -> bool {
        self.registry.player_dead()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
