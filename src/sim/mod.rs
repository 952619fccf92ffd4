//! Deterministic simulation module
//!
//! All gameplay physics lives here. This module must stay pure and deterministic:
//! - Discrete ticks only, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (by player and platform index)
//! - No rendering or input dependencies

pub mod collision;
pub mod geometry;
pub mod physics;
pub mod quadtree;
pub mod world;

pub use collision::{
    CollisionResponse, circle_circle_collision, circle_circle_solve, rect_circle_collision,
    rect_circle_solve,
};
pub use geometry::{Circle, Rect};
pub use physics::PhysicsEngine;
pub use quadtree::QuadTree;
pub use world::{Move, Movement, Platform, Player, World};
