use crate::config::Tuning;
use crate::geometry::{cyclic_steps, shortest_delta, wrap360};
use crate::node::Node;
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn apply(self, index: usize, n: usize) -> usize {
        match self {
            Self::Right => (index + 1) % n,
            Self::Left => (index + n - 1) % n,
        }
    }
}

/// Carousel state once the ring becomes interactive.
///
/// Input that arrives while a transition is in flight is dropped, not queued.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: usize,
    target_rotation: f64,
    transitioning: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn target_rotation(&self) -> f64 {
        self.target_rotation
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Selects the first node and holds the ring where it currently is.
    pub fn reset(&mut self, rotation: f64) {
        self.selected = 0;
        self.target_rotation = wrap360(rotation);
        self.transitioning = false;
    }

    /// Rotation that brings `node` to rest at `reference_angle`.
    pub fn rotation_for(node: &Node, reference_angle: f64) -> f64 {
        wrap360(reference_angle - node.base_angle)
    }

    /// Moves one node in `direction` and retargets the rotation, even mid-transition.
    pub fn step(&mut self, direction: Direction, nodes: &[Node], reference_angle: f64) -> usize {
        if nodes.is_empty() {
            return self.selected;
        }
        self.selected = direction.apply(self.selected, nodes.len());
        self.target_rotation = Self::rotation_for(&nodes[self.selected], reference_angle);
        self.transitioning = true;
        self.selected
    }

    pub fn cycle(&mut self, direction: Direction, nodes: &[Node], reference_angle: f64) -> bool {
        if self.transitioning {
            log::trace!("cycle {} dropped mid-transition", direction);
            return false;
        }
        self.step(direction, nodes, reference_angle);
        true
    }

    /// Direction and step count for a jump to `clicked`. Clockwise wins ties.
    pub fn plan_jump(&self, clicked: usize, n: usize) -> Option<(Direction, usize)> {
        if clicked >= n || clicked == self.selected {
            return None;
        }
        let steps = cyclic_steps(self.selected, clicked, n);
        if steps.clockwise <= steps.counterclockwise {
            Some((Direction::Right, steps.clockwise))
        } else {
            Some((Direction::Left, steps.counterclockwise))
        }
    }

    /// Proportional nudge of `rotation` toward the target. Returns the new rotation.
    pub fn advance(&mut self, rotation: f64, tuning: &Tuning, frames: f64) -> f64 {
        if !self.transitioning {
            return rotation;
        }
        let delta = shortest_delta(rotation, self.target_rotation);
        if delta.abs() > tuning.snap_threshold {
            let gain = 1.0 - (1.0 - tuning.transition_gain).powf(frames);
            wrap360(rotation + delta * gain)
        } else {
            self.transitioning = false;
            self.target_rotation
        }
    }
}
