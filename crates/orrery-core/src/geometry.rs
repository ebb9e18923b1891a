use serde::{Deserialize, Serialize};

pub const FULL_TURN: f64 = 360.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Semi-axes of the orbit ellipse, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Radius {
    pub x: f64,
    pub y: f64,
}

impl Radius {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

/// Normalises an angle in degrees to `[0, 360)`.
pub fn wrap360(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(FULL_TURN);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= FULL_TURN { 0.0 } else { wrapped }
}

/// Signed minimal rotation in degrees that carries `from` onto `to`, in `(-180, 180]`.
pub fn shortest_delta(from: f64, to: f64) -> f64 {
    let delta = ((to - from).rem_euclid(FULL_TURN) + 540.0).rem_euclid(FULL_TURN) - 180.0;
    if delta <= -180.0 { delta + FULL_TURN } else { delta }
}

/// Offset of a node from the ring centre for the given global rotation.
pub fn position_of(base_angle: f64, rotation: f64, radius: Radius) -> Point {
    let angle = (base_angle + rotation).to_radians();
    Point::new(angle.cos() * radius.x, angle.sin() * radius.y)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CyclicSteps {
    pub clockwise: usize,
    pub counterclockwise: usize,
}

impl CyclicSteps {
    pub fn is_zero(&self) -> bool {
        self.clockwise == 0 && self.counterclockwise == 0
    }
}

/// Single-step counts needed to walk from index `from` to `to` on a ring of `n`.
pub fn cyclic_steps(from: usize, to: usize, n: usize) -> CyclicSteps {
    if n == 0 {
        return CyclicSteps::default();
    }
    let clockwise = (to % n + n - from % n) % n;
    if clockwise == 0 {
        return CyclicSteps::default();
    }
    CyclicSteps {
        clockwise,
        counterclockwise: n - clockwise,
    }
}
