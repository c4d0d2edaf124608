use std::ops::{Add, AddAssign, DivAssign, MulAssign, Sub, SubAssign};

/// Absolute position in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn sq_distance(&self, rhs: &Self) -> f64 {
        let x = self.x - rhs.x;
        let y = self.y - rhs.y;
        x * x + y * y
    }
}

impl AddAssign<Vec2> for Point {
    fn add_assign(&mut self, v: Vec2) {
        self.x += v.x;
        self.y += v.y;
    }
}

impl Add<Vec2> for Point {
    type Output = Self;

    fn add(mut self, rhs: Vec2) -> Self {
        self += rhs;
        self
    }
}

impl Sub for Point {
    type Output = Vec2;

    fn sub(self, rhs: Self) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Displacement or direction. Arithmetic is in place, the way steering accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` radians.
    pub fn from_angle(angle: f64) -> Self {
        let (y, x) = angle.sin_cos();
        Self { x, y }
    }

    /// Angle of this vector in `(-pi, pi]`.
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    pub fn sq_mag(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn mag(&self) -> f64 {
        self.sq_mag().sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, v: Self) {
        self.x += v.x;
        self.y += v.y;
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, v: Self) {
        self.x -= v.x;
        self.y -= v.y;
    }
}

impl MulAssign<f64> for Vec2 {
    fn mul_assign(&mut self, s: f64) {
        self.x *= s;
        self.y *= s;
    }
}

impl DivAssign<f64> for Vec2 {
    fn div_assign(&mut self, s: f64) {
        self.x /= s;
        self.y /= s;
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

/// Axis aligned rectangle spanning `[origin, origin + extent]` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(origin: Point, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Closed on all four sides, so a point on an edge shared by two siblings is inside both.
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.origin.x
            && point.x <= self.origin.x + self.width
            && point.y >= self.origin.y
            && point.y <= self.origin.y + self.height
    }

    /// Separating axis test with strict comparisons: rectangles that merely touch along an
    /// edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.origin.x < other.origin.x + other.width
            && self.origin.x + self.width > other.origin.x
            && self.origin.y < other.origin.y + other.height
            && self.origin.y + self.height > other.origin.y
    }

    /// Split into four equal quadrants, in `[nw, ne, sw, se]` order (y grows southwards).
    pub fn quadrants(&self) -> [Rect; 4] {
        let Point { x, y } = self.origin;
        let w = self.width / 2.0;
        let h = self.height / 2.0;

        // | nw | ne |
        // | -- | -- |
        // | sw | se |
        [
            Rect::new(Point::new(x, y), w, h),
            Rect::new(Point::new(x + w, y), w, h),
            Rect::new(Point::new(x, y + h), w, h),
            Rect::new(Point::new(x + w, y + h), w, h),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// The axis aligned square enclosing the circle.
    pub fn bounding_rect(&self) -> Rect {
        let r = self.radius;
        Rect::new(
            Point::new(self.center.x - r, self.center.y - r),
            r * 2.0,
            r * 2.0,
        )
    }

    /// Open disc test: points exactly `radius` away are outside.
    pub fn contains(&self, point: &Point) -> bool {
        self.center.sq_distance(point) < self.radius * self.radius
    }
}
