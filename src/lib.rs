//! Grid ray casting for a first-person pseudo-3D view.
//!
//! A [`Map`] holds the tile grid, a [`Player`] walks around it, and a
//! [`RayCaster`] finds, for every screen column, the nearest wall along that
//! column's ray. Drawing is left to the caller.

pub mod config;
pub mod game;
pub mod input;
pub mod map;
pub mod player;
pub mod ray;

pub use config::Config;
pub use game::Game;
pub use input::{Action, Controls, Intent, Motion};
pub use map::{Map, MapError, Tile};
pub use player::{normalize_angle, Player, Pose};
pub use ray::{Axis, Cardinal, RayCaster, RayHit};
