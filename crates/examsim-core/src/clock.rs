//! Countdown clock for timed sessions.
//!
//! The clock does not own a timer. Whoever drives it (the runner, or a test)
//! calls [`SessionClock::tick`] once per elapsed second; the clock decides
//! whether that tick counts and reports expiry exactly once.

use serde::{Deserialize, Serialize};

/// Lifecycle of a [`SessionClock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockStatus {
    /// Created but never started.
    Idle,
    Running,
    Paused,
    /// Reached zero. Terminal.
    Expired,
    /// Halted before reaching zero. Terminal.
    Stopped,
}

/// Outcome of a single clock operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    /// The call had no effect.
    Ignored,
    /// One second elapsed.
    Ticked { remaining: u64 },
    /// The clock reached zero. Emitted once per clock.
    Expired,
}

/// A one-second-resolution countdown with pause and resume.
#[derive(Debug, Clone)]
pub struct SessionClock {
    remaining: u64,
    status: ClockStatus,
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionClock {
    pub fn new() -> Self {
        Self {
            remaining: 0,
            status: ClockStatus::Idle,
        }
    }

    /// Arm the clock with `initial_secs` and start counting down.
    ///
    /// A zero budget expires immediately, without a tick. Starting an already
    /// terminal clock is ignored.
    pub fn start(&mut self, initial_secs: u64) -> ClockEvent {
        if self.is_terminal() {
            return ClockEvent::Ignored;
        }
        self.remaining = initial_secs;
        if initial_secs == 0 {
            self.status = ClockStatus::Expired;
            return ClockEvent::Expired;
        }
        self.status = ClockStatus::Running;
        ClockEvent::Ticked {
            remaining: initial_secs,
        }
    }

    /// Stop counting, keeping the remaining time. Returns `true` if the clock
    /// was running.
    pub fn pause(&mut self) -> bool {
        if self.status != ClockStatus::Running {
            return false;
        }
        self.status = ClockStatus::Paused;
        true
    }

    /// Continue counting from the preserved value. Returns `true` if the clock
    /// was paused.
    pub fn resume(&mut self) -> bool {
        if self.status != ClockStatus::Paused {
            return false;
        }
        self.status = ClockStatus::Running;
        true
    }

    /// Account for one elapsed second.
    pub fn tick(&mut self) -> ClockEvent {
        if self.status != ClockStatus::Running {
            return ClockEvent::Ignored;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.status = ClockStatus::Expired;
            ClockEvent::Expired
        } else {
            ClockEvent::Ticked {
                remaining: self.remaining,
            }
        }
    }

    /// Halt the clock for good. Expired clocks stay expired.
    pub fn stop(&mut self) {
        if self.status != ClockStatus::Expired {
            self.status = ClockStatus::Stopped;
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn status(&self) -> ClockStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == ClockStatus::Running
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, ClockStatus::Expired | ClockStatus::Stopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_budget_expires_without_tick() {
        let mut clock = SessionClock::new();
        assert_eq!(clock.start(0), ClockEvent::Expired);
        assert_eq!(clock.status(), ClockStatus::Expired);
        assert_eq!(clock.tick(), ClockEvent::Ignored);
        assert_eq!(clock.remaining(), 0);
    }

    #[test]
    fn counts_down_and_expires_once() {
        let mut clock = SessionClock::new();
        clock.start(3);
        assert_eq!(clock.tick(), ClockEvent::Ticked { remaining: 2 });
        assert_eq!(clock.tick(), ClockEvent::Ticked { remaining: 1 });
        assert_eq!(clock.tick(), ClockEvent::Expired);
        for _ in 0..5 {
            assert_eq!(clock.tick(), ClockEvent::Ignored);
        }
        assert_eq!(clock.remaining(), 0);
    }

    #[test]
    fn paused_ticks_do_not_count() {
        let mut clock = SessionClock::new();
        clock.start(10);
        clock.tick();
        assert!(clock.pause());
        assert!(!clock.pause());
        for _ in 0..4 {
            assert_eq!(clock.tick(), ClockEvent::Ignored);
        }
        assert_eq!(clock.remaining(), 9);
        assert!(clock.resume());
        assert!(!clock.resume());
        assert_eq!(clock.tick(), ClockEvent::Ticked { remaining: 8 });
    }

    #[test]
    fn operations_after_expiry_are_noops() {
        let mut clock = SessionClock::new();
        clock.start(1);
        assert_eq!(clock.tick(), ClockEvent::Expired);
        assert!(!clock.pause());
        assert!(!clock.resume());
        clock.stop();
        assert_eq!(clock.status(), ClockStatus::Expired);
        assert_eq!(clock.start(30), ClockEvent::Ignored);
    }

    #[test]
    fn stop_halts_ticking() {
        let mut clock = SessionClock::new();
        clock.start(60);
        clock.tick();
        clock.stop();
        assert_eq!(clock.tick(), ClockEvent::Ignored);
        assert!(!clock.resume());
        assert_eq!(clock.remaining(), 59);
        assert!(clock.is_terminal());
    }

    #[test]
    fn idle_clock_ignores_ticks() {
        let mut clock = SessionClock::new();
        assert_eq!(clock.tick(), ClockEvent::Ignored);
        assert!(!clock.pause());
        assert_eq!(clock.status(), ClockStatus::Idle);
    }
}
