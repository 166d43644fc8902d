//! One-shot deferred callbacks on a millisecond timeline.
//!
//! Each effect owns a single [`Deferred`] slot, so at most one tick is ever
//! pending per effect. The owner polls the slot with the current time and
//! runs its tick when the slot fires; the tick then reschedules the slot.
//! Ticks of one owner are therefore strictly sequential.

/// Milliseconds since the timeline started.
pub type Millis = u64;

/// A single pending one-shot deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deferred {
    due: Option<Millis>,
}

impl Deferred {
    /// An idle slot with nothing scheduled.
    pub const fn idle() -> Self {
        Self { due: None }
    }

    /// A slot that fires `delay` ms after `now`.
    pub fn after(now: Millis, delay: Millis) -> Self {
        Self {
            due: Some(now.saturating_add(delay)),
        }
    }

    /// Schedule the slot, replacing anything already pending.
    pub fn schedule(&mut self, at: Millis, delay: Millis) {
        self.due = Some(at.saturating_add(delay));
    }

    /// Drop the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.due = None;
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    #[inline]
    pub fn due(&self) -> Option<Millis> {
        self.due
    }

    /// Fire the slot if its deadline has passed.
    ///
    /// Returns the deadline that fired and leaves the slot idle. The caller
    /// reschedules relative to the returned deadline, not to `now`, so a late
    /// frame does not stretch the rhythm of a text effect.
    pub fn fire(&mut self, now: Millis) -> Option<Millis> {
        match self.due {
            Some(due) if due <= now => {
                self.due = None;
                Some(due)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_never_fires() {
        let mut slot = Deferred::idle();
        assert!(!slot.is_pending());
        assert_eq!(slot.fire(u64::MAX), None);
    }

    #[test]
    fn test_fires_once_at_deadline() {
        let mut slot = Deferred::after(100, 50);
        assert_eq!(slot.fire(149), None);
        assert_eq!(slot.fire(150), Some(150));
        assert_eq!(slot.fire(500), None);
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut slot = Deferred::after(0, 10);
        slot.cancel();
        assert_eq!(slot.fire(1000), None);
        assert_eq!(slot.due(), None);
    }

    #[test]
    fn test_schedule_replaces() {
        let mut slot = Deferred::after(0, 10);
        slot.schedule(0, 100);
        assert_eq!(slot.fire(50), None);
        assert_eq!(slot.fire(100), Some(100));
    }
}
