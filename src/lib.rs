#![warn(clippy::all, rust_2018_idioms)]

//! Turn-based simulation core for a grid-based roguelike.
//!
//! The crate is organized leaf-first: [`ecs`] owns entity/component
//! storage, [`map`] the terrain and cave generator, [`fov`] and [`path`]
//! the shared shadowcasting and A* primitives, [`systems`] the fixed tick
//! pipeline, and [`game`] the façade the input and presentation layers
//! talk to. Rendering, key mapping, and save/load are external
//! collaborators and do not appear here.

pub mod ecs;
pub mod fov;
pub mod game;
pub mod map;
pub mod path;
pub mod systems;

pub use ecs::{EntityId, Point, Registry};
pub use game::{Game, GameConfig, LogLine, MessageLog};
pub use map::{Map, MapGenError, TileKind};
