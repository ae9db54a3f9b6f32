//! Entity factories: fixed component bundles for the player, monster
//! species, items, and decor.

use rand::Rng;

use crate::ecs::components::{
    Ai, AiState, AreaOfEffect, Collectible, Consumable, Damage, DrawOrder, Healing, Health,
    Inventory, Name, Obstruct, Perception, Position, Ranged, Renderable, Visible, Vision,
};
use crate::ecs::{EntityId, Point};
use crate::game::Game;

impl Game {
    pub fn spawn_player_at(&mut self, pos: Point) -> EntityId {
        let player = self.registry.create();
        self.registry.insert(player, Name("Player".into()));
        self.registry.insert(player, Position(pos));
        self.registry.insert(
            player,
            Renderable {
                glyph: '@',
                order: DrawOrder::Actor,
            },
        );
        self.registry.insert(player, Health::new(18));
        self.registry.insert(player, Damage(5));
        self.registry.insert(player, Vision::new(20));
        self.registry.insert(player, Inventory::default());
        self.registry.insert(player, Obstruct);
        self.registry.insert(player, Visible);
        player
    }

    pub fn spawn_goblin_at(&mut self, pos: Point) -> EntityId {
        let goblin = self.registry.create();
        self.registry.insert(goblin, Name("Goblin".into()));
        self.registry.insert(goblin, Position(pos));
        self.registry.insert(
            goblin,
            Renderable {
                glyph: 'g',
                order: DrawOrder::Actor,
            },
        );
        self.registry.insert(goblin, Health::new(10));
        self.registry.insert(goblin, Damage(2));
        self.registry.insert(goblin, Perception::new(8));
        self.registry.insert(goblin, Ai::new(AiState::Wandering));
        self.registry.insert(goblin, Obstruct);
        self.registry.insert(goblin, Visible);
        goblin
    }

    pub fn spawn_troll_at(&mut self, pos: Point) -> EntityId {
        let troll = self.registry.create();
        self.registry.insert(troll, Name("Troll".into()));
        self.registry.insert(troll, Position(pos));
        self.registry.insert(
            troll,
            Renderable {
                glyph: 'T',
                order: DrawOrder::Actor,
            },
        );
        self.registry.insert(troll, Health::new(20));
        self.registry.insert(troll, Damage(5));
        self.registry.insert(troll, Perception::new(6));
        self.registry.insert(troll, Ai::new(AiState::Wandering));
        self.registry.insert(troll, Obstruct);
        self.registry.insert(troll, Visible);
        troll
    }

    pub fn spawn_health_potion_at(&mut self, pos: Point) -> EntityId {
        let potion = self.registry.create();
        self.registry.insert(potion, Name("Health Potion".into()));
        self.registry.insert(potion, Position(pos));
        self.registry.insert(
            potion,
            Renderable {
                glyph: '!',
                order: DrawOrder::Item,
            },
        );
        self.registry.insert(potion, Collectible);
        self.registry.insert(potion, Consumable);
        self.registry.insert(potion, Healing(5));
        potion
    }

    pub fn spawn_lightning_scroll_at(&mut self, pos: Point) -> EntityId {
        let scroll = self.registry.create();
        self.registry.insert(scroll, Name("Lightning Scroll".into()));
        self.registry.insert(scroll, Position(pos));
        self.registry.insert(
            scroll,
            Renderable {
                glyph: '?',
                order: DrawOrder::Item,
            },
        );
        self.registry.insert(scroll, Collectible);
        self.registry.insert(scroll, Consumable);
        self.registry.insert(scroll, Ranged(5));
        self.registry.insert(scroll, Damage(8));
        scroll
    }

    pub fn spawn_fireball_scroll_at(&mut self, pos: Point) -> EntityId {
        let scroll = self.registry.create();
        self.registry.insert(scroll, Name("Fireball Scroll".into()));
        self.registry.insert(scroll, Position(pos));
        self.registry.insert(
            scroll,
            Renderable {
                glyph: '?',
                order: DrawOrder::Item,
            },
        );
        self.registry.insert(scroll, Collectible);
        self.registry.insert(scroll, Consumable);
        self.registry.insert(scroll, Ranged(6));
        self.registry.insert(scroll, AreaOfEffect(3));
        self.registry.insert(scroll, Damage(12));
        scroll
    }

    /// A random floor tile with no blocking entity on it.
    ///
    /// Precondition: such a tile exists; generated maps with the default
    /// population are nowhere near crowded enough to exhaust them.
    pub(crate) fn free_floor_tile(&mut self) -> Point {
        loop {
            let p = self.map.random_floor(&mut self.rng);
            if self.registry.no_blocking_entity_at(p) {
                return p;
            }
        }
    }

    /// Scatter the configured monster and item population on free tiles.
    pub(crate) fn populate(&mut self, monsters: u32, potions: u32, scrolls: u32) {
        for _ in 0..monsters {
            let pos = self.free_floor_tile();
            if self.rng.gen_range(0..100) < 80 {
                self.spawn_goblin_at(pos);
            } else {
                self.spawn_troll_at(pos);
            }
        }
        for _ in 0..potions {
            let pos = self.free_floor_tile();
            self.spawn_health_potion_at(pos);
        }
        for i in 0..scrolls {
            let pos = self.free_floor_tile();
            if i % 2 == 0 {
                self.spawn_lightning_scroll_at(pos);
            } else {
                self.spawn_fireball_scroll_at(pos);
            }
        }
    }
}
