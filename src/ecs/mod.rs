//! Entity-component storage and core value types.
//!
//! This module owns the data layout for entities and related primitives.
//! It is intentionally free of game-logic and rendering concerns: systems
//! and the game façade receive the registry as an explicit parameter.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub mod components;

use components::{
    Ai, Animation, AreaOfEffect, Bump, Collectible, Consumable, Damage, DamageQueue, Death,
    Healing, Health, Inventory, LogEntry, Name, Obstruct, Perception, Position, Ranged,
    Renderable, Visible, Vision,
};

// ---------------------------------------------------------------------------
// Core value types
// ---------------------------------------------------------------------------

/// Unique identifier for an entity in the game world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// A 2-D point on the game grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance: the number of 8-directional steps between points.
    pub fn chebyshev(self, other: Point) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// The eight one-tile step offsets, matching 8-directional movement.
pub const DIRS_8: [Point; 8] = [
    Point::new(-1, -1),
    Point::new(0, -1),
    Point::new(1, -1),
    Point::new(-1, 0),
    Point::new(1, 0),
    Point::new(-1, 1),
    Point::new(0, 1),
    Point::new(1, 1),
];

// ---------------------------------------------------------------------------
// Component storage
// ---------------------------------------------------------------------------

/// Map from entity IDs to component data, one per component type.
pub type ComponentStore<C> = FxHashMap<EntityId, C>;

/// A component type with a dedicated, strongly-typed store on the registry.
///
/// Implemented by the `register_components!` invocation below; adding a new
/// component means adding one line there.
pub trait Component: Sized {
    fn store(registry: &Registry) -> &ComponentStore<Self>;
    fn store_mut(registry: &mut Registry) -> &mut ComponentStore<Self>;
}

macro_rules! register_components {
    ($($field:ident: $ty:ty,)+) => {
        /// Entity registry: the live entity list plus one typed store per
        /// component type.
        #[derive(Debug, Default)]
        pub struct Registry {
            /// Live entity ids, in creation order. Queries iterate this list,
            /// so their results come back in creation order too.
            entities: Vec<EntityId>,
            next_id: u32,
            $(pub(crate) $field: ComponentStore<$ty>,)+
        }

        $(impl Component for $ty {
            fn store(registry: &Registry) -> &ComponentStore<Self> {
                &registry.$field
            }

            fn store_mut(registry: &mut Registry) -> &mut ComponentStore<Self> {
                &mut registry.$field
            }
        })+

        impl Registry {
            /// Remove every component held by `entity`.
            fn purge(&mut self, entity: EntityId) {
                $(self.$field.remove(&entity);)+
            }
        }
    };
}

register_components! {
    positions: Position,
    renderables: Renderable,
    names: Name,
    healths: Health,
    damages: Damage,
    obstructs: Obstruct,
    visibles: Visible,
    perceptions: Perception,
    visions: Vision,
    ais: Ai,
    bumps: Bump,
    inventories: Inventory,
    collectibles: Collectible,
    consumables: Consumable,
    healings: Healing,
    ranged: Ranged,
    aoes: AreaOfEffect,
    damage_queues: DamageQueue,
    deaths: Death,
    animations: Animation,
    log_entries: LogEntry,
}

impl Registry {
    /// The player's handle. The player is the first entity created in a
    /// session and its id is never recycled.
    pub const PLAYER: EntityId = EntityId(0);

    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh entity with no components and return its id.
    pub fn create(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(id);
        id
    }

    /// Delete an entity and all of its components. Subsequent lookups for
    /// this id return absence, never stale data.
    pub fn delete(&mut self, entity: EntityId) {
        self.entities.retain(|&e| e != entity);
        self.purge(entity);
    }

    pub fn exists(&self, entity: EntityId) -> bool {
        self.entities.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Live entity ids in creation order. Callers that mutate the registry
    /// while iterating should copy this first (snapshot discipline).
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    // --- Component CRUD ----------------------------------------------------

    /// Attach a component, replacing (and returning) any previous instance
    /// of the same type.
    pub fn insert<C: Component>(&mut self, entity: EntityId, component: C) -> Option<C> {
        C::store_mut(self).insert(entity, component)
    }

    pub fn remove<C: Component>(&mut self, entity: EntityId) -> Option<C> {
        C::store_mut(self).remove(&entity)
    }

    pub fn get<C: Component>(&self, entity: EntityId) -> Option<&C> {
        C::store(self).get(&entity)
    }

    pub fn get_mut<C: Component>(&mut self, entity: EntityId) -> Option<&mut C> {
        C::store_mut(self).get_mut(&entity)
    }

    pub fn has<C: Component>(&self, entity: EntityId) -> bool {
        C::store(self).contains_key(&entity)
    }

    // --- Queries -----------------------------------------------------------

    /// All live entities carrying a `C` component, in creation order.
    ///
    /// Creation order is not a priority order; callers that need draw order
    /// or attack order must sort explicitly.
    pub fn entities_with<C: Component>(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .copied()
            .filter(|e| C::store(self).contains_key(e))
            .collect()
    }

    /// All live entities positioned at `p`, in creation order.
    pub fn entities_at(&self, p: Point) -> Vec<EntityId> {
        self.entities
            .iter()
            .copied()
            .filter(|e| self.positions.get(e).is_some_and(|pos| pos.0 == p))
            .collect()
    }

    /// True if no entity with an `Obstruct` component occupies `p`.
    pub fn no_blocking_entity_at(&self, p: Point) -> bool {
        !self
            .entities_at(p)
            .iter()
            .any(|e| self.obstructs.contains_key(e))
    }

    /// True if a blood decal already lies at `p`.
    pub fn blood_at(&self, p: Point) -> bool {
        self.entities_at(p)
            .iter()
            .any(|e| self.names.get(e).is_some_and(|n| n.0 == "blood"))
    }

    /// True once the player has died. The death transformation strips the
    /// player's `Health`, so a missing component means a corpse; the `Death`
    /// marker covers the in-tick window before the transformation runs.
    pub fn player_dead(&self) -> bool {
        self.has::<Death>(Self::PLAYER) || !self.has::<Health>(Self::PLAYER)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::components::DrawOrder;
    use super::*;

    fn named(registry: &mut Registry, name: &str) -> EntityId {
        let e = registry.create();
        registry.insert(e, Name(name.into()));
        e
    }

    // -- entity lifecycle ----------------------------------------------------

    #[test]
    fn create_assigns_sequential_ids() {
        let mut registry = Registry::new();
        assert_eq!(registry.create(), EntityId(0));
        assert_eq!(registry.create(), EntityId(1));
        assert_eq!(registry.create(), EntityId(2));
    }

    #[test]
    fn first_entity_is_the_player_handle() {
        let mut registry = Registry::new();
        assert_eq!(registry.create(), Registry::PLAYER);
    }

    #[test]
    fn delete_clears_all_components() {
        let mut registry = Registry::new();
        let e = named(&mut registry, "goblin");
        registry.insert(e, Position(Point::new(3, 4)));
        registry.insert(e, Health::new(10));
        registry.insert(e, Obstruct);

        registry.delete(e);

        assert!(!registry.exists(e));
        assert!(registry.get::<Name>(e).is_none());
        assert!(registry.get::<Position>(e).is_none());
        assert!(registry.get::<Health>(e).is_none());
        assert!(!registry.has::<Obstruct>(e));
        assert!(registry.entities_at(Point::new(3, 4)).is_empty());
    }

    #[test]
    fn deleted_ids_are_not_recycled() {
        let mut registry = Registry::new();
        let a = registry.create();
        registry.delete(a);
        let b = registry.create();
        assert_ne!(a, b);
    }

    // -- component crud ------------------------------------------------------

    #[test]
    fn insert_replaces_existing_component() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry.insert(e, Damage(2));
        let old = registry.insert(e, Damage(5));
        assert_eq!(old, Some(Damage(2)));
        assert_eq!(registry.get::<Damage>(e), Some(&Damage(5)));
    }

    #[test]
    fn missing_component_is_an_explicit_absence() {
        let mut registry = Registry::new();
        let e = registry.create();
        assert!(registry.get::<Health>(e).is_none());
        assert!(registry.remove::<Health>(e).is_none());
        assert!(!registry.has::<Health>(e));
    }

    #[test]
    fn get_mut_mutates_in_place() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry.insert(e, Health::new(10));
        if let Some(h) = registry.get_mut::<Health>(e) {
            h.hp -= 3;
        }
        assert_eq!(registry.get::<Health>(e).map(|h| h.hp), Some(7));
    }

    // -- queries -------------------------------------------------------------

    #[test]
    fn entities_with_returns_creation_order() {
        let mut registry = Registry::new();
        let a = named(&mut registry, "a");
        let _skip = registry.create();
        let b = named(&mut registry, "b");
        let c = named(&mut registry, "c");
        assert_eq!(registry.entities_with::<Name>(), vec![a, b, c]);
    }

    #[test]
    fn entities_at_filters_by_position() {
        let mut registry = Registry::new();
        let here = Point::new(2, 2);
        let a = registry.create();
        registry.insert(a, Position(here));
        let b = registry.create();
        registry.insert(b, Position(Point::new(9, 9)));
        let c = registry.create();
        registry.insert(c, Position(here));

        assert_eq!(registry.entities_at(here), vec![a, c]);
        let _ = b;
    }

    #[test]
    fn no_blocking_entity_at_sees_obstructs_only() {
        let mut registry = Registry::new();
        let p = Point::new(1, 1);
        let decal = registry.create();
        registry.insert(decal, Position(p));
        assert!(registry.no_blocking_entity_at(p));

        let guard = registry.create();
        registry.insert(guard, Position(p));
        registry.insert(guard, Obstruct);
        assert!(!registry.no_blocking_entity_at(p));
    }

    #[test]
    fn blood_at_matches_by_name() {
        let mut registry = Registry::new();
        let p = Point::new(4, 4);
        let e = named(&mut registry, "blood");
        registry.insert(e, Position(p));
        registry.insert(
            e,
            Renderable {
                glyph: '.',
                order: DrawOrder::Floor,
            },
        );
        assert!(registry.blood_at(p));
        assert!(!registry.blood_at(Point::new(5, 4)));
    }

    #[test]
    fn player_dead_tracks_health_and_marker() {
        let mut registry = Registry::new();
        let player = registry.create();
        registry.insert(player, Health::new(18));
        assert!(!registry.player_dead());

        registry.insert(player, Death);
        assert!(registry.player_dead());

        registry.remove::<Death>(player);
        registry.remove::<Health>(player);
        assert!(registry.player_dead());
    }

    // -- points --------------------------------------------------------------

    #[test]
    fn chebyshev_distance_counts_diagonal_steps() {
        let a = Point::new(0, 0);
        assert_eq!(a.chebyshev(Point::new(3, 3)), 3);
        assert_eq!(a.chebyshev(Point::new(-2, 1)), 2);
        assert_eq!(a.chebyshev(a), 0);
    }

    #[test]
    fn point_arithmetic() {
        let p = Point::new(2, 3) + Point::new(-1, 1);
        assert_eq!(p, Point::new(1, 4));
        assert_eq!(Point::new(5, 5) - Point::new(2, 1), Point::new(3, 4));
    }
}
