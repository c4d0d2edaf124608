use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// The three steering sub-behaviors.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Behavior {
    Separation,
    Alignment,
    Cohesion,
}

/// How strongly each sub-behavior bends the turn rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub separation: f64,
    pub alignment: f64,
    pub cohesion: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            separation: 0.05,
            alignment: 0.073,
            cohesion: 0.015,
        }
    }
}

impl Weights {
    pub fn get(&self, which: Behavior) -> f64 {
        match which {
            Behavior::Separation => self.separation,
            Behavior::Alignment => self.alignment,
            Behavior::Cohesion => self.cohesion,
        }
    }

    pub fn set(&mut self, which: Behavior, value: f64) {
        match which {
            Behavior::Separation => self.separation = value,
            Behavior::Alignment => self.alignment = value,
            Behavior::Cohesion => self.cohesion = value,
        }
    }

    fn is_finite(&self) -> bool {
        self.separation.is_finite() && self.alignment.is_finite() && self.cohesion.is_finite()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Optional RNG seed for a reproducible initial population.
    pub seed: Option<u64>,
    /// Width of the toroidal world in world units.
    pub width: f64,
    /// Height of the toroidal world in world units.
    pub height: f64,
    /// Number of boids created at startup.
    pub initial_population: usize,
    /// Entries a quadtree leaf holds before it subdivides.
    pub tree_capacity: usize,
    /// Radius of the neighborhood every boid reacts to.
    pub awareness_range: f64,
    /// Radius below which neighbors push a boid away. Must be below `awareness_range`.
    pub collision_range: f64,
    /// Lower bound of the uniformly drawn initial speed.
    pub min_speed: f64,
    /// Upper bound of the uniformly drawn initial speed.
    pub max_speed: f64,
    pub weights: Weights,
    /// Drop neighbors reported more than once by overlapping wrapped query circles.
    /// Off by default: every copy then counts as a separate neighbor.
    pub dedup_neighbors: bool,
    /// Softening length of the separation push: a neighbor at distance `d` pushes with
    /// `1 / (d² + min_separation_distance²)`.
    pub min_separation_distance: f64,
    /// Compute steering for all boids in parallel.
    pub parallel: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            width: 900.0,
            height: 900.0,
            initial_population: 100,
            tree_capacity: 1,
            awareness_range: 150.0,
            collision_range: 55.0,
            min_speed: 2.2,
            max_speed: 2.5,
            weights: Weights::default(),
            dedup_neighbors: false,
            min_separation_distance: 1e-3,
            parallel: false,
        }
    }
}

impl SimConfig {
    /// The world rectangle, anchored at the origin.
    pub fn world(&self) -> Rect {
        Rect::new(Point::new(0.0, 0.0), self.width, self.height)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: SimConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::Invalid("world extents must be positive"));
        }
        if !(self.width.is_finite() && self.height.is_finite()) {
            return Err(ConfigError::Invalid("world extents must be finite"));
        }
        if self.tree_capacity == 0 {
            return Err(ConfigError::Invalid("tree_capacity must be non-zero"));
        }
        if !(self.awareness_range > 0.0) {
            return Err(ConfigError::Invalid("awareness_range must be positive"));
        }
        if !(self.collision_range > 0.0 && self.collision_range < self.awareness_range) {
            return Err(ConfigError::Invalid(
                "collision_range must be positive and below awareness_range",
            ));
        }
        if !(self.min_speed >= 0.0 && self.min_speed <= self.max_speed) {
            return Err(ConfigError::Invalid(
                "speed range must satisfy 0 <= min_speed <= max_speed",
            ));
        }
        if !self.weights.is_finite() {
            return Err(ConfigError::Invalid("weights must be finite"));
        }
        if !(self.min_separation_distance >= 0.0) {
            return Err(ConfigError::Invalid(
                "min_separation_distance must not be negative",
            ));
        }
        Ok(())
    }
}
