use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;

const MONITOR_FRACTION: f64 = 0.8;
const FALLBACK_SIZE: (i32, i32) = (1280, 800);

/// Sizes the window to most of the first monitor.
pub fn init_window(window: &gtk::ApplicationWindow) {
    let (width, height) = primary_monitor_size()
        .map(|(w, h)| {
            (
                (w as f64 * MONITOR_FRACTION) as i32,
                (h as f64 * MONITOR_FRACTION) as i32,
            )
        })
        .unwrap_or(FALLBACK_SIZE);
    window.set_default_size(width, height);
}

fn primary_monitor_size() -> Option<(i32, i32)> {
    let display = gdk::Display::default()?;
    let monitor = display
        .monitors()
        .item(0)
        .and_then(|item| item.downcast::<gdk::Monitor>().ok())?;
    let geometry = monitor.geometry();
    Some((geometry.width(), geometry.height()))
}

/// The desktop asks for reduced motion by turning animations off.
pub fn prefers_reduced_motion() -> bool {
    gtk::Settings::default().is_some_and(|s| !s.is_gtk_enable_animations())
}

/// Live subscription to the desktop's animation setting.
pub struct MotionWatch {
    settings: gtk::Settings,
    handler: glib::SignalHandlerId,
}

impl MotionWatch {
    pub fn new(on_change: impl Fn(bool) + 'static) -> Option<Self> {
        let settings = gtk::Settings::default()?;
        let handler = settings
            .connect_gtk_enable_animations_notify(move |s| on_change(!s.is_gtk_enable_animations()));
        Some(Self { settings, handler })
    }

    pub fn close(self) {
        self.settings.disconnect(self.handler);
    }
}
