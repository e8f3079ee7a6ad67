// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-slot deferred-advance timer.

/// Identifies one scheduling of an [`AdvanceTimer`].
///
/// Handles are never reused, so a handle held across a reschedule compares unequal
/// to the new one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Pending {
    handle: TimerHandle,
    deadline: u64,
}

/// A cancellable timer with room for exactly one pending deadline.
///
/// [`AdvanceTimer::schedule`] clears the slot before filling it, so two deadlines can
/// never be pending at once. Time is supplied by the host in milliseconds; the timer
/// fires from [`AdvanceTimer::fire_due`].
///
/// ```
/// use tourguide_playback::AdvanceTimer;
///
/// let mut timer = AdvanceTimer::default();
/// let first = timer.schedule(0, 1000);
/// let second = timer.schedule(10, 1000);
/// assert_ne!(first, second);
/// assert_eq!(timer.deadline(), Some(1010));
///
/// assert_eq!(timer.fire_due(1009), None);
/// assert_eq!(timer.fire_due(1010), Some(second));
/// assert!(!timer.is_pending());
/// ```
#[derive(Clone, Debug, Default)]
pub struct AdvanceTimer {
    slot: Option<Pending>,
    issued: u64,
}

impl AdvanceTimer {
    /// Cancel any pending deadline, then arm one `delay_ms` after `now`.
    pub fn schedule(&mut self, now: u64, delay_ms: u64) -> TimerHandle {
        self.cancel();
        self.issued += 1;
        let handle = TimerHandle(self.issued);
        self.slot = Some(Pending {
            handle,
            deadline: now.saturating_add(delay_ms),
        });
        handle
    }

    /// Cancel the pending deadline. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        self.slot.take().is_some()
    }

    /// Returns `true` if a deadline is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    /// The pending deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<u64> {
        self.slot.map(|p| p.deadline)
    }

    /// The handle of the pending deadline, if any.
    #[must_use]
    pub fn handle(&self) -> Option<TimerHandle> {
        self.slot.map(|p| p.handle)
    }

    /// Milliseconds left until the pending deadline; `0` if it is already due.
    #[must_use]
    pub fn remaining(&self, now: u64) -> Option<u64> {
        self.slot.map(|p| p.deadline.saturating_sub(now))
    }

    /// Clear and return the pending handle if its deadline is at or before `now`.
    pub fn fire_due(&mut self, now: u64) -> Option<TimerHandle> {
        match self.slot {
            Some(p) if p.deadline <= now => {
                self.slot = None;
                Some(p.handle)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_most_one_deadline() {
        let mut t = AdvanceTimer::default();
        t.schedule(0, 500);
        t.schedule(0, 2000);
        assert_eq!(t.deadline(), Some(2000));
        // The earlier deadline was replaced, not queued.
        assert_eq!(t.fire_due(600), None);
        assert!(t.fire_due(2000).is_some());
        assert_eq!(t.fire_due(5000), None);
    }

    #[test]
    fn cancel_clears_slot() {
        let mut t = AdvanceTimer::default();
        assert!(!t.cancel());
        t.schedule(100, 100);
        assert_eq!(t.remaining(150), Some(50));
        assert!(t.cancel());
        assert_eq!(t.remaining(150), None);
        assert_eq!(t.handle(), None);
    }

    #[test]
    fn deadline_saturates() {
        let mut t = AdvanceTimer::default();
        t.schedule(u64::MAX - 1, 10);
        assert_eq!(t.deadline(), Some(u64::MAX));
    }
}
