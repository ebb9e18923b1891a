use crate::geometry::Radius;
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::time::Duration;
use thiserror::Error;

/// Every constant of the choreography. Durations are written in milliseconds.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Frame rate the per-frame constants below are expressed against.
    pub reference_fps: f64,
    /// Degrees added to the rotation per reference frame while orbiting.
    pub initial_speed: f64,
    pub decay_factor: f64,
    pub speed_epsilon: f64,
    pub expansion_factor: f64,
    /// Horizontal radius growth per reference frame, in pixels.
    pub expansion_step: f64,
    pub expansion_step_y_ratio: f64,
    /// Where the selected node comes to rest. 0° is the 3 o'clock direction.
    pub reference_angle: f64,
    pub transition_gain: f64,
    pub snap_threshold: f64,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub lead_time: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub fallback_timeout: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub expand_delay: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub labels_delay: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub interactive_delay: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub cascade_interval: Duration,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            reference_fps: 60.0,
            initial_speed: 0.6,
            decay_factor: 0.96,
            speed_epsilon: 0.01,
            expansion_factor: 1.382,
            expansion_step: 2.0,
            expansion_step_y_ratio: 0.8,
            reference_angle: 0.0,
            transition_gain: 0.15,
            snap_threshold: 0.5,
            lead_time: Duration::from_millis(2500),
            fallback_timeout: Duration::from_millis(5000),
            expand_delay: Duration::from_millis(2000),
            labels_delay: Duration::from_millis(1000),
            interactive_delay: Duration::from_millis(300),
            cascade_interval: Duration::from_millis(200),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TuningError {
    #[error("{field} must be a finite number greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must lie in the open range (0, 1), got {value}")]
    NotAFraction { field: &'static str, value: f64 },
    #[error("expansion_factor must be at least 1.0, got {0}")]
    ShrinkingExpansion(f64),
    #[error("reference_angle must be finite")]
    ReferenceAngle,
    #[error("initial_speed {initial_speed} must exceed speed_epsilon {speed_epsilon} or the orbit never settles")]
    SpeedBelowEpsilon { initial_speed: f64, speed_epsilon: f64 },
}

impl Tuning {
    pub fn validate(&self) -> Result<(), TuningError> {
        for (field, value) in [
            ("reference_fps", self.reference_fps),
            ("initial_speed", self.initial_speed),
            ("speed_epsilon", self.speed_epsilon),
            ("expansion_step", self.expansion_step),
            ("snap_threshold", self.snap_threshold),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        for (field, value) in [
            ("decay_factor", self.decay_factor),
            ("expansion_step_y_ratio", self.expansion_step_y_ratio),
            ("transition_gain", self.transition_gain),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(TuningError::NotAFraction { field, value });
            }
        }

        if self.initial_speed <= self.speed_epsilon {
            return Err(TuningError::SpeedBelowEpsilon {
                initial_speed: self.initial_speed,
                speed_epsilon: self.speed_epsilon,
            });
        }

        if !(self.expansion_factor.is_finite() && self.expansion_factor >= 1.0) {
            return Err(TuningError::ShrinkingExpansion(self.expansion_factor));
        }
        if !self.reference_angle.is_finite() {
            return Err(TuningError::ReferenceAngle);
        }
        Ok(())
    }

    /// How many reference frames `dt` is worth.
    pub fn frames(&self, dt: Duration) -> f64 {
        dt.as_secs_f64() * self.reference_fps
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub min_width: f64,
    pub radius_x: f64,
    pub radius_y: f64,
}

impl Breakpoint {
    pub fn radius(&self) -> Radius {
        Radius::new(self.radius_x, self.radius_y)
    }
}

/// Viewport width to orbit radius lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Breakpoints(Vec<Breakpoint>);

impl Default for Breakpoints {
    fn default() -> Self {
        Self(vec![
            Breakpoint {
                min_width: 0.0,
                radius_x: 150.0,
                radius_y: 120.0,
            },
            Breakpoint {
                min_width: 640.0,
                radius_x: 230.0,
                radius_y: 180.0,
            },
            Breakpoint {
                min_width: 1024.0,
                radius_x: 300.0,
                radius_y: 230.0,
            },
        ])
    }
}

impl Breakpoints {
    pub fn new(breakpoints: Vec<Breakpoint>) -> Self {
        Self(breakpoints)
    }

    /// Radius of the widest breakpoint that fits `width`. Narrower viewports than every
    /// breakpoint get the smallest one.
    pub fn radius_for(&self, width: f64) -> Radius {
        let fitting = self
            .0
            .iter()
            .filter(|b| b.min_width <= width)
            .max_by(|a, b| a.min_width.total_cmp(&b.min_width));

        fitting
            .or_else(|| self.0.iter().min_by(|a, b| a.min_width.total_cmp(&b.min_width)))
            .map(Breakpoint::radius)
            .unwrap_or_else(|| Breakpoints::default().radius_for(width))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(Tuning::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_decay() {
        let tuning = Tuning {
            decay_factor: 1.0,
            ..Tuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NotAFraction {
                field: "decay_factor",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_shrinking_expansion() {
        let tuning = Tuning {
            expansion_factor: 0.5,
            ..Tuning::default()
        };
        assert_eq!(
            tuning.validate(),
            Err(TuningError::ShrinkingExpansion(0.5))
        );
    }

    #[test]
    fn test_validate_rejects_speed_at_or_below_epsilon() {
        for initial_speed in [0.01, 0.005] {
            let tuning = Tuning {
                initial_speed,
                ..Tuning::default()
            };
            assert_eq!(
                tuning.validate(),
                Err(TuningError::SpeedBelowEpsilon {
                    initial_speed,
                    speed_epsilon: 0.01,
                })
            );
        }
    }

    #[test]
    fn test_tuning_durations_deserialize_from_millis() {
        let tuning: Tuning =
            serde_json::from_str(r#"{ "lead_time": 1500, "initial_speed": 1.2 }"#).unwrap();
        assert_eq!(tuning.lead_time, Duration::from_millis(1500));
        assert_eq!(tuning.initial_speed, 1.2);
        assert_eq!(tuning.fallback_timeout, Duration::from_millis(5000));
    }

    #[test]
    fn test_frames_at_reference_rate() {
        let tuning = Tuning::default();
        assert!((tuning.frames(Duration::from_secs(1)) - 60.0).abs() < 1e-9);
        assert!((tuning.frames(Duration::from_millis(500)) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_breakpoint_lookup() {
        let breakpoints = Breakpoints::default();
        assert_eq!(breakpoints.radius_for(320.0), Radius::new(150.0, 120.0));
        assert_eq!(breakpoints.radius_for(640.0), Radius::new(230.0, 180.0));
        assert_eq!(breakpoints.radius_for(1920.0), Radius::new(300.0, 230.0));
    }

    #[test]
    fn test_breakpoint_lookup_below_smallest() {
        let breakpoints = Breakpoints::new(vec![Breakpoint {
            min_width: 800.0,
            radius_x: 10.0,
            radius_y: 8.0,
        }]);
        assert_eq!(breakpoints.radius_for(100.0), Radius::new(10.0, 8.0));
        assert!(!breakpoints.is_empty());
    }
}
