use gtk::prelude::*;
use gtk4 as gtk;
use orrery_core::MediaSignal;
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

/// A backwards jump of the playback position larger than this counts as a restart.
pub const RESTART_JUMP_US: i64 = 500_000;

/// Plays the focal media on loop and reports its timing to the engine.
pub struct MediaBridge {
    stream: gtk::MediaFile,
    handlers: Vec<glib::SignalHandlerId>,
}

impl MediaBridge {
    pub fn open(path: &Path, emit: impl Fn(MediaSignal) + Clone + 'static) -> Self {
        let stream = gtk::MediaFile::for_filename(path);
        stream.set_loop(true);
        stream.set_muted(true);

        let mut handlers = Vec::new();

        let on_duration = emit.clone();
        handlers.push(stream.connect_duration_notify(move |s| {
            if let Some(duration) = duration_of(s.duration()) {
                on_duration(MediaSignal::DurationKnown(duration));
            }
        }));

        let on_playing = emit.clone();
        handlers.push(stream.connect_playing_notify(move |s| {
            if s.is_playing() {
                on_playing(MediaSignal::PlaybackStarted);
            }
        }));

        let last = Rc::new(Cell::new(0_i64));
        handlers.push(stream.connect_timestamp_notify(move |s| {
            let now = s.timestamp();
            if is_restart(last.get(), now) {
                emit(MediaSignal::PlaybackRestarted);
            }
            last.set(now);
        }));

        handlers.push(stream.connect_error_notify(|s| {
            if let Some(e) = s.error() {
                log::warn!("Media failed, the ring will run on its fallback: {}", e);
            }
        }));

        log::info!("Playing focal media {}", path.display());
        stream.play();
        Self { stream, handlers }
    }

    pub fn stream(&self) -> &gtk::MediaFile {
        &self.stream
    }

    pub fn close(self) {
        for handler in self.handlers {
            self.stream.disconnect(handler);
        }
        self.stream.pause();
    }
}

/// GTK reports durations in microseconds, with 0 meaning unknown.
pub fn duration_of(micros: i64) -> Option<Duration> {
    (micros > 0).then(|| Duration::from_micros(micros as u64))
}

pub fn is_restart(previous_us: i64, current_us: i64) -> bool {
    previous_us - current_us > RESTART_JUMP_US
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_of() {
        assert_eq!(duration_of(0), None);
        assert_eq!(duration_of(-1), None);
        assert_eq!(duration_of(10_000_000), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_loop_wrap_is_a_restart() {
        assert!(is_restart(9_950_000, 10_000));
        assert!(!is_restart(10_000, 26_000));
        // small seeks backwards from decoder jitter are not restarts
        assert!(!is_restart(2_000_000, 1_900_000));
    }
}
