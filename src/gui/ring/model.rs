use crate::config::{Config, NodeConfig};
use crate::gui::ring::{HIT_SLOP, ICON_SIZE, MAX_FRAME_GAP_MS, NODE_RADIUS, REFERENCE_HEIGHT};
use gdk_pixbuf::Pixbuf;
use gtk4::gdk;
use orrery_core::geometry::position_of;
use orrery_core::{Breakpoints, Engine, EngineError, EngineEvent, Frame, Key, Phase, Point};
use std::path::Path;
use std::time::Duration;

/// The caller-owned content of one node.
#[derive(Clone)]
pub struct NodeVisual {
    pub label: String,
    pub pixbuf: Option<Pixbuf>,
}

impl NodeVisual {
    pub fn from_config(cfg: &NodeConfig) -> Self {
        Self {
            label: cfg.display_label().to_string(),
            pixbuf: cfg.icon.as_deref().and_then(Self::load_icon),
        }
    }

    fn load_icon(path: &Path) -> Option<Pixbuf> {
        Pixbuf::from_file_at_scale(path, ICON_SIZE, ICON_SIZE, true)
            .inspect_err(|e| log::warn!("Failed to load icon {}: {}", path.display(), e))
            .ok()
    }
}

/// One mounted ring: the engine plus what the view needs to draw it.
pub struct RingState {
    pub engine: Engine,
    pub visuals: Vec<NodeVisual>,
    pub frame: Frame,
    pub center: Point,
    pub scale_factor: f64,
    breakpoints: Breakpoints,
    last_frame_time: Option<i64>,
}

impl RingState {
    pub fn new(
        config: &Config,
        width: f64,
        height: f64,
        reduced_motion: bool,
    ) -> Result<Self, EngineError> {
        let radius = config.breakpoints.radius_for(width);
        let engine = Engine::new(
            config.node_ids(),
            radius,
            reduced_motion,
            config.tuning.clone(),
        )?;

        Ok(Self {
            frame: engine.frame(),
            engine,
            visuals: config.nodes.iter().map(NodeVisual::from_config).collect(),
            center: Point::new(width / 2.0, height / 2.0),
            scale_factor: scale_for(height),
            breakpoints: config.breakpoints.clone(),
            last_frame_time: None,
        })
    }

    /// `frame_time` is the frame clock's timestamp in microseconds.
    pub fn tick(&mut self, frame_time: i64) {
        let dt = frame_delta(self.last_frame_time, frame_time);
        self.last_frame_time = Some(frame_time);
        self.frame = self.engine.tick(dt);
    }

    pub fn dispatch(&mut self, event: EngineEvent) {
        self.engine.dispatch(event);
        self.frame = self.engine.frame();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.center = Point::new(width / 2.0, height / 2.0);
        self.scale_factor = scale_for(height);
        self.dispatch(EngineEvent::Resize(self.breakpoints.radius_for(width)));
    }

    pub fn pause(&mut self) {
        self.engine.pause();
        self.last_frame_time = None;
    }

    pub fn resume(&mut self) {
        self.engine.resume();
    }

    /// Node centres in widget coordinates. In the static phase the engine emits no
    /// offsets, so the nodes are laid out on the unrotated ring instead.
    pub fn node_centers(&self) -> Vec<Point> {
        if self.frame.phase == Phase::Static {
            let radius = self.engine.radius();
            return self
                .engine
                .nodes()
                .iter()
                .map(|n| {
                    let p = position_of(n.base_angle, 0.0, radius);
                    Point::new(self.center.x + p.x, self.center.y + p.y)
                })
                .collect();
        }

        self.frame
            .offsets
            .iter()
            .map(|o| Point::new(self.center.x + o.x, self.center.y + o.y))
            .collect()
    }

    pub fn node_radius(&self) -> f64 {
        NODE_RADIUS * self.scale_factor
    }

    pub fn hit_test(&self, point: Point) -> Option<usize> {
        nearest_node(
            &self.node_centers(),
            point,
            self.node_radius() + HIT_SLOP * self.scale_factor,
        )
    }
}

fn scale_for(height: f64) -> f64 {
    (height / REFERENCE_HEIGHT * 2.0).clamp(0.5, 1.5)
}

/// Time between two frame clock timestamps. The first frame after a (re)start and any
/// stall longer than the cap are clamped so the ring never jumps.
pub fn frame_delta(previous: Option<i64>, now: i64) -> Duration {
    let Some(previous) = previous else {
        return Duration::ZERO;
    };
    let micros = (now - previous).max(0) as u64;
    Duration::from_micros(micros).min(Duration::from_millis(MAX_FRAME_GAP_MS))
}

pub fn nearest_node(centers: &[Point], point: Point, max_distance: f64) -> Option<usize> {
    centers
        .iter()
        .enumerate()
        .map(|(i, c)| (i, c.distance_to(point)))
        .filter(|(_, d)| *d <= max_distance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

pub fn key_for(key: gdk::Key) -> Option<Key> {
    if key == gdk::Key::Left || key == gdk::Key::KP_Left {
        Some(Key::ArrowLeft)
    } else if key == gdk::Key::Right || key == gdk::Key::KP_Right {
        Some(Key::ArrowRight)
    } else {
        None
    }
}
