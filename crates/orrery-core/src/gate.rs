//! Decides the single instant the orbit starts slowing down.
//!
//! Two paths compete: the media reports its duration and the slowdown is timed to land
//! `lead_time` before the end, or the media never gets that far and a fallback timeout
//! forces the sequence. Whichever fires first latches; the loser becomes a no-op.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Latch {
    #[default]
    Open,
    Primary,
    /// Set by the fallback path. Sticky: media restarts can no longer reset the ring.
    Forced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePath {
    Primary,
    Fallback,
}

#[derive(Debug, Clone, Default)]
pub struct MediaGate {
    latch: Latch,
    duration: Option<Duration>,
    primary_scheduled: bool,
}

impl MediaGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latch(&self) -> Latch {
        self.latch
    }

    /// Records the media duration. Returns the delay for the primary timer when it
    /// should be armed now.
    pub fn on_duration(&mut self, duration: Duration, lead_time: Duration) -> Option<Duration> {
        self.duration = Some(duration);
        self.arm(lead_time)
    }

    pub fn on_playback_started(&mut self, lead_time: Duration) -> Option<Duration> {
        self.arm(lead_time)
    }

    fn arm(&mut self, lead_time: Duration) -> Option<Duration> {
        if self.latch != Latch::Open || self.primary_scheduled {
            return None;
        }
        let delay = self.duration?.saturating_sub(lead_time);
        self.primary_scheduled = true;
        Some(delay)
    }

    /// Attempts to claim the latch for `path`. The fallback only claims it when the
    /// media never armed the primary timer and the ring is still moving.
    pub fn fire(&mut self, path: GatePath, speed: f64) -> bool {
        if self.latch != Latch::Open {
            log::debug!("gate already latched ({:?}), ignoring {:?}", self.latch, path);
            return false;
        }
        match path {
            GatePath::Primary => {
                self.latch = Latch::Primary;
                true
            }
            GatePath::Fallback if !self.primary_scheduled && speed > 0.0 => {
                self.latch = Latch::Forced;
                true
            }
            GatePath::Fallback => false,
        }
    }

    /// Media restarts only count before either path has fired.
    pub fn can_restart(&self) -> bool {
        self.latch == Latch::Open
    }

    /// Reopens the latch after a media restart, keeping the known duration.
    pub fn reset(&mut self) {
        self.latch = Latch::Open;
        self.primary_scheduled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEAD: Duration = Duration::from_millis(2500);

    #[test]
    fn test_duration_arms_primary_once() {
        let mut gate = MediaGate::new();
        assert_eq!(
            gate.on_duration(Duration::from_millis(10_000), LEAD),
            Some(Duration::from_millis(7500))
        );
        assert_eq!(gate.on_duration(Duration::from_millis(10_000), LEAD), None);
        assert_eq!(gate.on_playback_started(LEAD), None);
    }

    #[test]
    fn test_short_media_fires_immediately() {
        let mut gate = MediaGate::new();
        assert_eq!(
            gate.on_duration(Duration::from_millis(1000), LEAD),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_playback_without_duration_arms_nothing() {
        let mut gate = MediaGate::new();
        assert_eq!(gate.on_playback_started(LEAD), None);
        // nothing armed, so the fallback still wins
        assert!(gate.fire(GatePath::Fallback, 0.6));
    }

    #[test]
    fn test_fallback_loses_once_primary_is_scheduled() {
        let mut gate = MediaGate::new();
        gate.on_duration(Duration::from_millis(20_000), LEAD);
        assert!(!gate.fire(GatePath::Fallback, 0.6));
        assert_eq!(gate.latch(), Latch::Open);
        assert!(gate.fire(GatePath::Primary, 0.6));
        assert_eq!(gate.latch(), Latch::Primary);
    }

    #[test]
    fn test_fallback_needs_motion() {
        let mut gate = MediaGate::new();
        assert!(!gate.fire(GatePath::Fallback, 0.0));
        assert!(gate.fire(GatePath::Fallback, 0.6));
        assert_eq!(gate.latch(), Latch::Forced);
    }

    #[test]
    fn test_forced_latch_blocks_primary_and_restart() {
        let mut gate = MediaGate::new();
        assert!(gate.fire(GatePath::Fallback, 0.6));
        assert_eq!(gate.on_duration(Duration::from_millis(10_000), LEAD), None);
        assert!(!gate.fire(GatePath::Primary, 0.6));
        assert!(!gate.can_restart());
    }

    #[test]
    fn test_reset_reopens_and_keeps_duration() {
        let mut gate = MediaGate::new();
        gate.on_duration(Duration::from_millis(10_000), LEAD);
        assert!(gate.can_restart());
        assert!(gate.fire(GatePath::Primary, 0.6));
        assert!(!gate.can_restart());
        gate.reset();
        assert_eq!(gate.latch(), Latch::Open);
        assert_eq!(gate.on_playback_started(LEAD), Some(Duration::from_millis(7500)));
    }
}
