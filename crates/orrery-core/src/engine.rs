use crate::config::{Tuning, TuningError};
use crate::gate::{GatePath, Latch, MediaGate};
use crate::geometry::{Radius, position_of};
use crate::integrator::{self, Flags, OrbitState};
use crate::node::{Node, NodeId};
use crate::phase::{Phase, PhaseEvent};
use crate::selection::{Direction, Selection};
use crate::timer::{TimerKind, TimerQueue};
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("The ring needs at least one node")]
    NoNodes,
    #[error("Duplicate node id '{0}'")]
    DuplicateNode(NodeId),
    #[error("Invalid tuning: {0}")]
    Tuning(#[from] TuningError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSignal {
    DurationKnown(Duration),
    PlaybackStarted,
    /// The media looped or was restarted from the beginning.
    PlaybackRestarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive)]
pub enum Key {
    #[strum(serialize = "ArrowLeft", serialize = "Left")]
    ArrowLeft,
    #[strum(serialize = "ArrowRight", serialize = "Right")]
    ArrowRight,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Cycle(Direction),
    Select(usize),
    Key(Key),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    Media(MediaSignal),
    Input(Input),
    Resize(Radius),
    ReducedMotion(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeOffset {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

/// Everything the presentation needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub phase: Phase,
    pub selected_index: usize,
    pub labels_visible: bool,
    pub offsets: Vec<NodeOffset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Running,
    Paused,
    TornDown,
}

pub struct Engine {
    tuning: Tuning,
    nodes: Vec<Node>,
    base_radius: Radius,
    orbit: OrbitState,
    phase: Phase,
    gate: MediaGate,
    selection: Selection,
    timers: TimerQueue,
    lifecycle: Lifecycle,
}

impl Engine {
    pub fn new(
        ids: Vec<NodeId>,
        radius: Radius,
        reduced_motion: bool,
        tuning: Tuning,
    ) -> Result<Self, EngineError> {
        tuning.validate()?;
        if ids.is_empty() {
            return Err(EngineError::NoNodes);
        }
        {
            let mut seen = HashSet::new();
            if let Some(dup) = ids.iter().find(|id| !seen.insert(*id)) {
                return Err(EngineError::DuplicateNode(dup.clone()));
            }
        }

        let mut engine = Self {
            orbit: OrbitState::new(tuning.initial_speed, radius),
            nodes: Node::ring(ids),
            base_radius: radius,
            phase: Phase::Orbiting,
            gate: MediaGate::new(),
            selection: Selection::new(),
            timers: TimerQueue::new(),
            lifecycle: Lifecycle::Running,
            tuning,
        };

        if reduced_motion {
            engine.enter_static();
        } else {
            engine
                .timers
                .schedule_in(engine.tuning.fallback_timeout, TimerKind::Fallback);
        }
        log::debug!(
            "engine mounted with {} nodes in {}",
            engine.nodes.len(),
            engine.phase
        );
        Ok(engine)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected_index(&self) -> usize {
        self.selection.selected_index()
    }

    pub fn target_rotation(&self) -> f64 {
        self.selection.target_rotation()
    }

    pub fn rotation(&self) -> f64 {
        self.orbit.rotation
    }

    pub fn speed(&self) -> f64 {
        self.orbit.speed
    }

    pub fn radius(&self) -> Radius {
        self.orbit.radius
    }

    pub fn target_radius(&self) -> Option<Radius> {
        self.orbit.target_radius
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn latch(&self) -> Latch {
        self.gate.latch()
    }

    /// Time the engine has been ticked for, excluding pauses.
    pub fn elapsed(&self) -> Duration {
        self.timers.now()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// True while a rotation or a multi-step jump is still playing out.
    pub fn is_transitioning(&self) -> bool {
        self.selection.is_transitioning()
            || self
                .timers
                .has_pending(|k| matches!(k, TimerKind::CascadeStep(_)))
    }

    pub fn is_paused(&self) -> bool {
        self.lifecycle == Lifecycle::Paused
    }

    pub fn is_torn_down(&self) -> bool {
        self.lifecycle == Lifecycle::TornDown
    }

    /// Advances the clock by `dt`, fires due timers, then integrates one frame.
    pub fn tick(&mut self, dt: Duration) -> Frame {
        if self.lifecycle != Lifecycle::Running || self.phase == Phase::Static {
            return self.frame();
        }

        self.timers.advance(dt);
        while let Some((at, kind)) = self.timers.pop_due() {
            self.fire(at, kind);
        }

        let frames = self.tuning.frames(dt);
        let flags = Flags {
            slowing: self.phase.is_decelerating(),
            expanding: self.phase.is_expanding(),
            hold_rotation: self.selection.is_transitioning(),
        };
        self.orbit = integrator::integrate(self.orbit, flags, &self.tuning, frames);
        self.orbit.rotation = self
            .selection
            .advance(self.orbit.rotation, &self.tuning, frames);

        self.frame()
    }

    pub fn frame(&self) -> Frame {
        let offsets = self
            .nodes
            .iter()
            .map(|node| {
                let p = if self.phase == Phase::Static {
                    Default::default()
                } else {
                    position_of(node.base_angle, self.orbit.rotation, self.orbit.radius)
                };
                NodeOffset {
                    id: node.id.clone(),
                    x: p.x,
                    y: p.y,
                }
            })
            .collect();

        Frame {
            phase: self.phase,
            selected_index: self.selection.selected_index(),
            labels_visible: self.phase.labels_visible(),
            offsets,
        }
    }

    pub fn dispatch(&mut self, event: EngineEvent) {
        if self.lifecycle == Lifecycle::TornDown {
            log::trace!("ignoring {:?} after teardown", event);
            return;
        }
        match event {
            EngineEvent::Media(signal) => self.on_media(signal),
            EngineEvent::Input(input) => self.on_input(input),
            EngineEvent::Resize(radius) => self.resize(radius),
            EngineEvent::ReducedMotion(true) => self.enter_static(),
            EngineEvent::ReducedMotion(false) => {
                log::debug!("reduced motion lifted; staying in {}", self.phase)
            }
        }
    }

    /// Stops ticks from advancing anything. State and pending timers are kept.
    pub fn pause(&mut self) {
        if self.lifecycle == Lifecycle::Running {
            self.lifecycle = Lifecycle::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.lifecycle == Lifecycle::Paused {
            self.lifecycle = Lifecycle::Running;
        }
    }

    /// Cancels every timer and stops reacting to ticks and events. Safe to call twice.
    pub fn teardown(&mut self) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        self.timers.clear();
        self.lifecycle = Lifecycle::TornDown;
        log::debug!("engine torn down in {}", self.phase);
    }

    fn on_media(&mut self, signal: MediaSignal) {
        if self.phase == Phase::Static {
            return;
        }
        let lead = self.tuning.lead_time;
        let armed = match signal {
            MediaSignal::DurationKnown(duration) => self.gate.on_duration(duration, lead),
            MediaSignal::PlaybackStarted => self.gate.on_playback_started(lead),
            MediaSignal::PlaybackRestarted => {
                self.restart();
                return;
            }
        };
        if let Some(delay) = armed {
            log::info!("slowdown synced to media, due in {:?}", delay);
            self.timers.schedule_in(delay, TimerKind::PrimarySlow);
        }
    }

    fn on_input(&mut self, input: Input) {
        if self.phase != Phase::Interactive {
            log::trace!("{:?} ignored in {}", input, self.phase);
            return;
        }
        if self.is_transitioning() {
            log::trace!("{:?} dropped mid-transition", input);
            return;
        }

        let reference = self.tuning.reference_angle;
        match input {
            Input::Cycle(direction) => {
                self.selection.cycle(direction, &self.nodes, reference);
            }
            Input::Key(Key::ArrowLeft) => {
                self.selection.cycle(Direction::Left, &self.nodes, reference);
            }
            Input::Key(Key::ArrowRight) => {
                self.selection.cycle(Direction::Right, &self.nodes, reference);
            }
            Input::Key(Key::Other) => {}
            Input::Select(index) => {
                let Some((direction, count)) = self.selection.plan_jump(index, self.nodes.len())
                else {
                    return;
                };
                log::debug!("jumping to {} via {} x{}", index, direction, count);
                self.selection.step(direction, &self.nodes, reference);
                for k in 1..count {
                    self.timers.schedule_in(
                        self.tuning.cascade_interval * k as u32,
                        TimerKind::CascadeStep(direction),
                    );
                }
            }
        }
    }

    fn fire(&mut self, at: Duration, kind: TimerKind) {
        match kind {
            TimerKind::PrimarySlow => {
                if self.gate.fire(GatePath::Primary, self.orbit.speed) {
                    self.begin_sequence(at);
                }
            }
            TimerKind::Fallback => {
                if self.gate.fire(GatePath::Fallback, self.orbit.speed) {
                    log::info!("media never synced, forcing the sequence");
                    self.begin_sequence(at);
                }
            }
            TimerKind::BeginExpand => {
                if self.apply(PhaseEvent::BeginExpand) {
                    self.timers
                        .schedule_at(at + self.tuning.labels_delay, TimerKind::ShowLabels);
                }
            }
            TimerKind::ShowLabels => {
                if self.apply(PhaseEvent::ShowLabels) {
                    self.timers.schedule_at(
                        at + self.tuning.interactive_delay,
                        TimerKind::LabelsSettled,
                    );
                }
            }
            TimerKind::LabelsSettled => {
                self.apply(PhaseEvent::LabelsSettled);
            }
            TimerKind::CascadeStep(direction) => {
                if self.phase == Phase::Interactive {
                    self.selection
                        .step(direction, &self.nodes, self.tuning.reference_angle);
                }
            }
        }
    }

    fn begin_sequence(&mut self, at: Duration) {
        if self.apply(PhaseEvent::BeginSlow) {
            self.timers
                .schedule_at(at + self.tuning.expand_delay, TimerKind::BeginExpand);
        }
    }

    fn apply(&mut self, event: PhaseEvent) -> bool {
        let Some(next) = self.phase.next(event) else {
            log::trace!("{} has no effect in {}", event, self.phase);
            return false;
        };
        log::info!("phase {} -> {} on {}", self.phase, next, event);
        self.phase = next;

        match next {
            Phase::Expanded => {
                self.orbit.target_radius =
                    Some(self.orbit.radius.scaled(self.tuning.expansion_factor));
            }
            Phase::Interactive => self.selection.reset(self.orbit.rotation),
            Phase::Static => {
                self.timers.clear();
                self.orbit.speed = 0.0;
                self.selection.reset(self.orbit.rotation);
            }
            _ => {}
        }
        true
    }

    fn enter_static(&mut self) {
        self.apply(PhaseEvent::ReduceMotion);
    }

    /// A media loop before the gate has fired restarts the countdown from now.
    /// Once either path has latched, the choreography runs to completion.
    fn restart(&mut self) {
        if self.phase == Phase::Static || !self.gate.can_restart() {
            log::debug!(
                "media restart ignored in {} ({:?})",
                self.phase,
                self.gate.latch()
            );
            return;
        }
        self.gate.reset();
        self.timers.cancel_where(|k| k == TimerKind::PrimarySlow);
        self.orbit.speed = self.tuning.initial_speed;
        self.apply(PhaseEvent::Restart);

        if let Some(delay) = self.gate.on_playback_started(self.tuning.lead_time) {
            log::info!("media restarted, slowdown due in {:?}", delay);
            self.timers.schedule_in(delay, TimerKind::PrimarySlow);
        }
    }

    /// Updates the radius inputs only. Rotation and phase are untouched.
    fn resize(&mut self, radius: Radius) {
        let previous = self.base_radius;
        self.base_radius = radius;

        match self.orbit.target_radius {
            None => self.orbit.radius = radius,
            Some(_) => {
                let rescale = |current: f64, old: f64, new: f64| {
                    if old > 0.0 { current * new / old } else { new }
                };
                self.orbit.radius = Radius::new(
                    rescale(self.orbit.radius.x, previous.x, radius.x),
                    rescale(self.orbit.radius.y, previous.y, radius.y),
                );
                self.orbit.target_radius = Some(radius.scaled(self.tuning.expansion_factor));
            }
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.teardown();
    }
}
