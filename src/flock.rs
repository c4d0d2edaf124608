//! Steering: separation, alignment and cohesion on a torus.
//!
//! Every behavior yields a signed turn in `(-pi, pi]` relative to the boid's heading, or 0
//! when it has nothing to say. They are mixed into the boid's turn rate by [`steer`].
use crate::angle::{angle_difference, circular_mean, shortest_difference};
use crate::boid::{Boid, BoidId};
use crate::config::SimConfig;
use crate::geometry::{Circle, Point, Rect, Vec2};
use crate::quadtree::Quadtree;
use arrayvec::ArrayVec;

/// Fraction of the previous turn rate carried into the next tick.
pub const TURN_DAMPING: f64 = 0.025;

/// The awareness circle and its eight copies shifted by one world extent.
pub type Neighborhood = ArrayVec<[Circle; 9]>;

/// New heading and turn rate of a boid after one steering step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Turn {
    pub heading: f64,
    pub turn_rate: f64,
}

impl Turn {
    pub fn apply(self, boid: &mut Boid) {
        boid.heading = self.heading;
        boid.turn_rate = self.turn_rate;
    }
}

/// Query circles around `center` in each tile of a 3x3 tiling of `world`.
///
/// Querying all of them against the untiled index finds neighbors across the seams.
pub fn neighborhood(center: Point, range: f64, world: &Rect) -> Neighborhood {
    const TILES: [f64; 3] = [-1.0, 0.0, 1.0];

    let mut circles = Neighborhood::new();
    for i in TILES.iter() {
        for j in TILES.iter() {
            let shifted = Point::new(center.x + i * world.width, center.y + j * world.height);
            circles.push(Circle::new(shifted, range));
        }
    }
    circles
}

/// Shortest displacement from `from` to `to` when opposite edges of `world` are glued.
pub fn toroidal_offset(from: Point, to: Point, world: &Rect) -> Vec2 {
    Vec2::new(
        shortest_difference(to.x, from.x, world.width),
        shortest_difference(to.y, from.y, world.height),
    )
}

/// Collect the boids the index reports within the awareness range of boid `id`.
///
/// The boid itself is dropped by identity. Unless `dedup_neighbors` is set, a boid caught
/// by two of the wrapped circles is pushed twice.
pub fn neighbors<'a>(
    tree: &Quadtree,
    boids: &'a [Boid],
    id: BoidId,
    config: &SimConfig,
    out: &mut Vec<&'a Boid>,
) {
    let boid = &boids[id.0];
    let circles = neighborhood(boid.position, config.awareness_range, &config.world());

    let mut found = Vec::new();
    tree.query_ranges(&circles, &mut found);

    let mut ids = found
        .into_iter()
        .map(|(_, other)| *other)
        .filter(|other| *other != id)
        .collect::<Vec<_>>();
    if config.dedup_neighbors {
        ids.sort_unstable();
        ids.dedup();
    }

    // boids spawned since the last rebuild are not indexed yet
    out.extend(ids.into_iter().filter_map(|other| boids.get(other.0)));
}

/// Turn away from neighbors inside the collision range.
///
/// Each neighbor pushes along the unit direction away from it with strength
/// `1 / (d² + min_separation_distance²)`: inverse square at a distance, bounded up close, and
/// always stronger for a closer neighbor.
pub fn separation(boid: &Boid, neighbors: &[&Boid], config: &SimConfig) -> f64 {
    let world = config.world();
    let range_sq = config.collision_range * config.collision_range;
    let floor_sq = config.min_separation_distance * config.min_separation_distance;

    let mut away = Vec2::ZERO;
    for other in neighbors {
        let mut offset = toroidal_offset(other.position, boid.position, &world);
        let dist_sq = offset.sq_mag();
        // a coincident neighbor gives no direction to flee in
        if dist_sq == 0.0 || dist_sq >= range_sq {
            continue;
        }
        offset /= dist_sq.sqrt() * (dist_sq + floor_sq);
        away += offset;
    }

    if away.is_zero() {
        return 0.0;
    }
    angle_difference(away.angle(), boid.heading)
}

/// Turn towards the circular mean of the neighbors' headings.
pub fn alignment(boid: &Boid, neighbors: &[&Boid]) -> f64 {
    match circular_mean(neighbors.iter().map(|other| other.heading)) {
        Some(mean) => angle_difference(mean, boid.heading),
        None => 0.0,
    }
}

/// Turn towards the mean toroidal offset to the neighbors.
pub fn cohesion(boid: &Boid, neighbors: &[&Boid], config: &SimConfig) -> f64 {
    let world = config.world();

    let mut center = Vec2::ZERO;
    for other in neighbors {
        center += toroidal_offset(boid.position, other.position, &world);
    }
    if center.is_zero() {
        return 0.0;
    }
    center /= neighbors.len() as f64;
    angle_difference(center.angle(), boid.heading)
}

/// Damp the turn rate, add the weighted behaviors and turn.
pub fn steer(boid: &Boid, neighbors: &[&Boid], config: &SimConfig) -> Turn {
    let weights = &config.weights;

    let mut turn_rate = boid.turn_rate * TURN_DAMPING;
    turn_rate += separation(boid, neighbors, config) * weights.separation;
    turn_rate += alignment(boid, neighbors) * weights.alignment;
    turn_rate += cohesion(boid, neighbors, config) * weights.cohesion;

    Turn {
        heading: boid.heading + turn_rate,
        turn_rate,
    }
}

/// Steering of boid `id` against `tree`, which may lag behind `boids` by a tick.
pub fn flock(tree: &Quadtree, boids: &[Boid], id: BoidId, config: &SimConfig) -> Turn {
    let mut near = Vec::new();
    neighbors(tree, boids, id, config, &mut near);
    steer(&boids[id.0], &near, config)
}
