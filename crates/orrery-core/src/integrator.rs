//! Per-frame update of the free-running orbit: speed decay, rotation advance and
//! radius expansion. Everything here is a pure function of the previous state.

use crate::config::Tuning;
use crate::geometry::{Radius, wrap360};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub rotation: f64,
    pub speed: f64,
    pub radius: Radius,
    /// Set once expansion begins.
    pub target_radius: Option<Radius>,
}

impl OrbitState {
    pub fn new(speed: f64, radius: Radius) -> Self {
        Self {
            rotation: 0.0,
            speed,
            radius,
            target_radius: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags {
    pub slowing: bool,
    pub expanding: bool,
    /// A selection transition owns the rotation this frame.
    pub hold_rotation: bool,
}

pub fn integrate(state: OrbitState, flags: Flags, tuning: &Tuning, frames: f64) -> OrbitState {
    let mut next = state;

    if flags.slowing && next.speed > tuning.speed_epsilon {
        next.speed *= tuning.decay_factor.powf(frames);
        if next.speed < tuning.speed_epsilon {
            next.speed = 0.0;
        }
    }

    if !flags.hold_rotation && next.speed > 0.0 {
        next.rotation = wrap360(next.rotation + next.speed * frames);
    }

    if flags.expanding
        && let Some(target) = next.target_radius
    {
        let step_x = tuning.expansion_step * frames;
        let step_y = step_x * tuning.expansion_step_y_ratio;
        next.radius = Radius::new(
            (next.radius.x + step_x).min(target.x).max(next.radius.x),
            (next.radius.y + step_y).min(target.y).max(next.radius.y),
        );
    }

    next
}
