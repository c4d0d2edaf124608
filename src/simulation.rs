use crate::boid::{Boid, BoidId};
use crate::config::{Behavior, ConfigError, SimConfig, Weights};
use crate::flock::{self, Turn};
use crate::geometry::{Point, Rect, Vec2};
use crate::quadtree::Quadtree;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use rayon::prelude::*;
use std::f64::consts::TAU;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Some boid was not accepted by the rebuilt index. The index can no longer be trusted,
    /// so the simulation must stop.
    #[error("spatial index holds {found} boids but {expected} exist")]
    IndexMismatch { expected: usize, found: usize },
}

/// Owns the boids, the steering parameters and the index built from last tick's positions.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    boids: Vec<Boid>,
    tree: Quadtree,
    // initial population plus every spawn
    population: usize,
    ticks: u64,
}

impl Simulation {
    /// Scatter `initial_population` boids uniformly over the world.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let boids = (0..config.initial_population)
            .map(|_| random_boid(&mut rng, &config))
            .collect();

        Self::with_boids(config, boids)
    }

    /// Start from the given boids. They must lie inside the world.
    pub fn with_boids(config: SimConfig, boids: Vec<Boid>) -> Result<Self, SimError> {
        config.validate()?;

        let tree = Quadtree::new(config.world(), config.tree_capacity);
        let mut sim = Self {
            population: boids.len(),
            config,
            boids,
            tree,
            ticks: 0,
        };
        sim.rebuild()?;

        log::info!(
            "simulation created: {} boids in a {}x{} world",
            sim.population,
            sim.config.width,
            sim.config.height
        );
        Ok(sim)
    }

    /// Advance every boid, steer it against last tick's index, wrap, then rebuild the index.
    pub fn tick(&mut self) -> Result<(), SimError> {
        if self.config.parallel {
            self.steer_parallel();
        } else {
            self.steer_sequential();
        }

        let world = self.config.world();
        for boid in self.boids.iter_mut() {
            boid.wrap(&world);
        }

        self.rebuild()?;
        self.ticks += 1;
        Ok(())
    }

    /// Boids later in the list see the already moved and turned state of earlier ones.
    fn steer_sequential(&mut self) {
        for i in 0..self.boids.len() {
            self.boids[i].advance();
            let turn = flock::flock(&self.tree, &self.boids, BoidId(i), &self.config);
            turn.apply(&mut self.boids[i]);
        }
    }

    /// Move everyone first, then steer everyone against the same snapshot.
    fn steer_parallel(&mut self) {
        self.boids.par_iter_mut().for_each(Boid::advance);

        let (tree, boids, config) = (&self.tree, &self.boids, &self.config);
        let turns = (0..boids.len())
            .into_par_iter()
            .map(|i| flock::flock(tree, boids, BoidId(i), config))
            .collect::<Vec<Turn>>();

        for (boid, turn) in self.boids.iter_mut().zip(turns) {
            turn.apply(boid);
        }
    }

    fn rebuild(&mut self) -> Result<(), SimError> {
        let tree = Quadtree::from_iterator(
            self.config.world(),
            self.config.tree_capacity,
            self.boids
                .iter()
                .enumerate()
                .map(|(i, boid)| (boid.position, BoidId(i))),
        );

        let found = tree.len();
        if found != self.population {
            log::error!(
                "index rebuild lost boids: {} of {} indexed at tick {}",
                found,
                self.population,
                self.ticks
            );
            return Err(SimError::IndexMismatch {
                expected: self.population,
                found,
            });
        }

        if log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "index rebuilt: {} boids, {} nodes, depth {}",
                found,
                tree.node_count(),
                tree.depth()
            );
        }
        self.tree = tree;
        Ok(())
    }

    /// Add a boid. The index picks it up at the next rebuild.
    ///
    /// Any finite position is accepted: the next wrap brings it into the world.
    pub fn spawn(
        &mut self,
        position: Point,
        heading: f64,
        speed: f64,
    ) -> Result<BoidId, SimError> {
        if !(position.x.is_finite() && position.y.is_finite()) {
            return Err(ConfigError::Invalid("spawn position must be finite").into());
        }
        if !heading.is_finite() {
            return Err(ConfigError::Invalid("spawn heading must be finite").into());
        }
        if !(speed.is_finite() && speed >= 0.0) {
            let reason = "spawn speed must be finite and non-negative";
            return Err(ConfigError::Invalid(reason).into());
        }

        let id = BoidId(self.boids.len());
        self.boids.push(Boid::new(position, heading, speed));
        self.population += 1;
        log::info!("spawned {:?} at ({:.1}, {:.1})", id, position.x, position.y);
        Ok(id)
    }

    pub fn set_weight(&mut self, which: Behavior, value: f64) -> Result<(), SimError> {
        if !value.is_finite() {
            return Err(ConfigError::Invalid("weights must be finite").into());
        }
        self.config.weights.set(which, value);
        log::info!("{:?} weight set to {}", which, value);
        Ok(())
    }

    /// Change the world extents. Boids are not moved; the next wrap brings stragglers back.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), SimError> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(ConfigError::Invalid("world extents must be positive").into());
        }
        self.config.width = width;
        self.config.height = height;
        log::info!("world resized to {}x{}", width, height);
        Ok(())
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    /// The index as of the last rebuild.
    pub fn tree(&self) -> &Quadtree {
        &self.tree
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn weights(&self) -> &Weights {
        &self.config.weights
    }

    pub fn world(&self) -> Rect {
        self.config.world()
    }

    /// Number of boids the index is expected to hold after the next rebuild.
    pub fn population(&self) -> usize {
        self.population
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Length of the mean heading vector: 1 when everyone flies the same way, near 0 for a
    /// disordered swarm.
    pub fn polarization(&self) -> f64 {
        if self.boids.is_empty() {
            return 0.0;
        }
        let mut sum = Vec2::ZERO;
        for boid in self.boids.iter() {
            sum += Vec2::from_angle(boid.heading);
        }
        sum /= self.boids.len() as f64;
        sum.mag()
    }
}

fn random_boid(rng: &mut impl Rng, config: &SimConfig) -> Boid {
    let position = Point::new(
        rng.gen_range(0.0, config.width),
        rng.gen_range(0.0, config.height),
    );
    let heading = rng.gen_range(0.0, TAU);
    let speed = if config.min_speed < config.max_speed {
        rng.gen_range(config.min_speed, config.max_speed)
    } else {
        config.min_speed
    };
    Boid::new(position, heading, speed)
}
