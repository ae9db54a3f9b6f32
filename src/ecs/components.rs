//! Component types. Presence of a component on an entity implies the
//! matching capability; systems query for component sets and nothing else.
//!
//! All of these are plain data. Behavior lives in `crate::systems`.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::{EntityId, Point};

/// Location on the map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position(pub Point);

/// Draw-order tier, lowest drawn first. Actors cover items, items cover
/// corpses, corpses cover floor decals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DrawOrder {
    Floor,
    Corpse,
    Item,
    Actor,
}

/// How the presentation layer draws this entity. Color theming is the
/// presentation layer's business; the core only picks glyph and tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Renderable {
    pub glyph: char,
    pub order: DrawOrder,
}

/// Display name, used in log phrasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);

/// Hit points. `hp` is floored at zero by the damage system, never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub hp: i32,
    pub maxhp: i32,
}

impl Health {
    pub fn new(maxhp: i32) -> Self {
        Self { hp: maxhp, maxhp }
    }
}

/// Attack power applied on a successful bump attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Damage(pub i32);

/// Marks an entity as blocking tile occupancy and attack resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstruct;

/// Marks an entity as perceivable by others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visible;

/// Line-of-sight sensing of other entities. `visible` and `perceived` are
/// rebuilt from scratch every tick by the perception system.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Perception {
    pub radius: i32,
    pub visible: FxHashSet<Point>,
    pub perceived: Vec<EntityId>,
}

impl Perception {
    pub fn new(radius: i32) -> Self {
        Self {
            radius,
            ..Self::default()
        }
    }
}

/// Terrain sight: the exploration system recomputes `visible` each tick and
/// marks those map cells explored. Typically only the player carries this.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vision {
    pub radius: i32,
    pub visible: FxHashSet<Point>,
}

impl Vision {
    pub fn new(radius: i32) -> Self {
        Self {
            radius,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    Sleeping,
    Wandering,
    Hunting,
}

/// Finite-state behavior. `dest` is absent until the entity has somewhere
/// to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ai {
    pub state: AiState,
    pub dest: Option<Point>,
}

impl Ai {
    pub fn new(state: AiState) -> Self {
        Self { state, dest: None }
    }
}

/// A queued one-tile movement intent (a delta), resolved and consumed by the
/// bump system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bump(pub Point);

/// Ordered list of carried item entity ids.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub items: Vec<EntityId>,
}

/// Item capability tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collectible;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Healing(pub i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranged(pub i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaOfEffect(pub i32);

/// A single pending hit. Queued by the bump system (and item use), applied
/// by the damage system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageEffect {
    pub source: EntityId,
    pub amount: i32,
}

/// Pending hits against one entity. Unlike every other component, several
/// effects may accumulate here within a single tick; the damage system
/// drains the whole queue at once.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DamageQueue(pub Vec<DamageEffect>);

/// Transient flag consumed by the death system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Death;

/// One animation frame: a glyph held for `ticks` animation-clock ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub glyph: char,
    pub ticks: u32,
}

/// Frame-based animation, advanced on a real-time clock independent of the
/// turn pipeline. `repeat` follows the convention: [`Animation::FOREVER`]
/// loops endlessly, `0` deletes the entity after one pass, `N > 0` plays
/// `N` extra loops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animation {
    pub frames: Vec<Frame>,
    pub index: usize,
    pub elapsed: u32,
    pub repeat: i32,
}

impl Animation {
    pub const FOREVER: i32 = -1;

    pub fn new(frames: Vec<Frame>, repeat: i32) -> Self {
        Self {
            frames,
            index: 0,
            elapsed: 0,
            repeat,
        }
    }
}

/// Phrasing class for narrative log lines; the theming layer maps these to
/// colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogKind {
    Info,
    PlayerAttack,
    MonsterAttack,
    Special,
}

/// A narrative line carried by a transient entity. Systems create these
/// mid-tick; the game façade collects them into the message log at tick end
/// and deletes the carriers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub text: String,
    pub kind: LogKind,
}
