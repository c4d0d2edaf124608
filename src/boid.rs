use crate::geometry::{Point, Rect, Vec2};

/// Stable index of a boid in the owning simulation's boid list.
///
/// Boids are never removed during a run, so an id stays valid for as long as the list lives.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct BoidId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    pub position: Point,
    /// Radians. Never normalized, it keeps accumulating turns.
    pub heading: f64,
    /// Radians per tick.
    pub turn_rate: f64,
    /// World units per tick.
    pub speed: f64,
}

impl Boid {
    pub fn new(position: Point, heading: f64, speed: f64) -> Self {
        Self {
            position,
            heading,
            turn_rate: 0.0,
            speed,
        }
    }

    /// Move one tick along the current heading.
    pub fn advance(&mut self) {
        let mut step = Vec2::from_angle(self.heading);
        step *= self.speed;
        self.position += step;
    }

    /// Teleport a coordinate that left `[0, extent]` to the opposite edge.
    ///
    /// This is a single reset and not a modulo: a boid faster than the world is wide would
    /// end up on the wrong side.
    pub fn wrap(&mut self, world: &Rect) {
        let (min_x, max_x) = (world.origin.x, world.origin.x + world.width);
        let (min_y, max_y) = (world.origin.y, world.origin.y + world.height);

        if self.position.x < min_x {
            self.position.x = max_x;
        } else if self.position.x > max_x {
            self.position.x = min_x;
        }
        if self.position.y < min_y {
            self.position.y = max_y;
        } else if self.position.y > max_y {
            self.position.y = min_y;
        }
    }
}
