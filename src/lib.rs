//! Boid flocking on a torus, backed by a region quadtree.
//!
//! # Contracts
//!
//! - The world is the rectangle `[0, width] x [0, height]`; opposite edges are identified.
//! - The quadtree is rebuilt from scratch every tick and only ever holds indices into the
//!   boid list of the owning [`Simulation`].

pub mod angle;
pub mod boid;
pub mod config;
pub mod flock;
pub mod geometry;
pub mod quadtree;
pub mod simulation;

pub use boid::{Boid, BoidId};
pub use config::{Behavior, ConfigError, SimConfig, Weights};
pub use geometry::{Circle, Point, Rect, Vec2};
pub use quadtree::Quadtree;
pub use simulation::{SimError, Simulation};
