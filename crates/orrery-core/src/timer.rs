//! One-shot timers on the engine's own clock.
//!
//! The clock only moves when the host ticks the engine, so a paused engine keeps every
//! pending timer exactly where it was.

use crate::selection::Direction;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Media-derived moment to begin slowing.
    PrimarySlow,
    /// Wall-clock guard for media that never progresses.
    Fallback,
    BeginExpand,
    ShowLabels,
    LabelsSettled,
    CascadeStep(Direction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timer {
    due: Duration,
    seq: u64,
    kind: TimerKind,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_seq: u64,
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn advance(&mut self, dt: Duration) {
        self.now += dt;
    }

    pub fn schedule_in(&mut self, delay: Duration, kind: TimerKind) {
        self.schedule_at(self.now + delay, kind);
    }

    pub fn schedule_at(&mut self, due: Duration, kind: TimerKind) {
        log::trace!("timer {:?} due at {:?}", kind, due);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer { due, seq, kind });
    }

    /// Removes and returns the earliest timer due by now. Equal due times fire in
    /// scheduling order.
    pub fn pop_due(&mut self) -> Option<(Duration, TimerKind)> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= self.now)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(i, _)| i)?;
        let timer = self.timers.swap_remove(idx);
        Some((timer.due, timer.kind))
    }

    pub fn cancel_where(&mut self, mut pred: impl FnMut(TimerKind) -> bool) {
        self.timers.retain(|t| !pred(t.kind));
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn has_pending(&self, mut pred: impl FnMut(TimerKind) -> bool) -> bool {
        self.timers.iter().any(|t| pred(t.kind))
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut queue = TimerQueue::new();
        queue.schedule_in(ms(300), TimerKind::ShowLabels);
        queue.schedule_in(ms(100), TimerKind::BeginExpand);
        queue.advance(ms(500));

        assert_eq!(queue.pop_due(), Some((ms(100), TimerKind::BeginExpand)));
        assert_eq!(queue.pop_due(), Some((ms(300), TimerKind::ShowLabels)));
        assert_eq!(queue.pop_due(), None);
    }

    #[test]
    fn test_nothing_fires_early() {
        let mut queue = TimerQueue::new();
        queue.schedule_in(ms(5000), TimerKind::Fallback);
        queue.advance(ms(4999));
        assert_eq!(queue.pop_due(), None);
        queue.advance(ms(1));
        assert_eq!(queue.pop_due(), Some((ms(5000), TimerKind::Fallback)));
    }

    #[test]
    fn test_ties_fire_in_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule_at(ms(10), TimerKind::CascadeStep(Direction::Left));
        queue.schedule_at(ms(10), TimerKind::CascadeStep(Direction::Right));
        queue.advance(ms(10));
        assert_eq!(
            queue.pop_due().map(|(_, k)| k),
            Some(TimerKind::CascadeStep(Direction::Left))
        );
        assert_eq!(
            queue.pop_due().map(|(_, k)| k),
            Some(TimerKind::CascadeStep(Direction::Right))
        );
    }

    #[test]
    fn test_cancel_gate_timers() {
        let mut queue = TimerQueue::new();
        queue.schedule_in(ms(1), TimerKind::Fallback);
        queue.schedule_in(ms(1), TimerKind::PrimarySlow);
        queue.schedule_in(ms(1), TimerKind::LabelsSettled);
        queue.cancel_where(|k| matches!(k, TimerKind::Fallback | TimerKind::PrimarySlow));
        assert_eq!(queue.len(), 1);
        assert!(queue.has_pending(|k| k == TimerKind::LabelsSettled));
        queue.clear();
        assert!(queue.is_empty());
    }
}
