pub mod model;
pub mod view;

pub use model::{NodeVisual, RingState, frame_delta, key_for, nearest_node};
pub use view::draw;

pub const REFERENCE_HEIGHT: f64 = 1440.0;
pub const ICON_SIZE: i32 = 128;
pub const NODE_RADIUS: f64 = 44.0; // node bg circle size
pub const HIT_SLOP: f64 = 12.0; // extra click tolerance around a node
pub const FOCAL_RADIUS: f64 = 96.0;
pub const LABEL_FONT_SIZE: f64 = 15.0;
pub const LABEL_GAP: f64 = 14.0;
pub const SELECTED_SCALE: f64 = 1.2;
pub const MAX_FRAME_GAP_MS: u64 = 250;
