//! Choreography engine for a ring of nodes orbiting a focal media element.
//!
//! The engine starts with the ring spinning, waits for the media (or a fallback
//! timeout) to decide when to slow down, expands the ring, reveals labels and
//! finally hands the ring to the user as a carousel. Hosts drive it with
//! [`Engine::tick`] and feed it [`EngineEvent`]s; every tick yields a [`Frame`].

pub mod config;
pub mod engine;
pub mod gate;
pub mod geometry;
pub mod integrator;
pub mod macros;
pub mod node;
pub mod phase;
pub mod selection;
pub mod timer;

pub use config::{Breakpoint, Breakpoints, Tuning, TuningError};
pub use engine::{Engine, EngineError, EngineEvent, Frame, Input, Key, MediaSignal, NodeOffset};
pub use geometry::{CyclicSteps, Point, Radius};
pub use node::{Node, NodeId};
pub use phase::Phase;
pub use selection::Direction;
