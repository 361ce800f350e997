//! Two-phase confirmation with timed auto-disarm
//!
//! Destructive controls (entry delete, full reset) arm on the first
//! trigger and fire only on a second trigger within the window. The
//! event-loop clock drives expiry, so teardown is a plain `disarm`.

use std::time::{Duration, Instant};

const ARM_WINDOW: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Armed { since: Instant },
}

#[derive(Debug, Clone, Copy)]
pub struct Confirm {
    phase: Phase,
}

impl Confirm {
    pub fn new() -> Self {
        Self { phase: Phase::Idle }
    }

    /// First trigger arms. A second trigger inside the window confirms and
    /// returns to idle; after the window it only re-arms.
    pub fn trigger(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::Armed { since: now };
                false
            }
            Phase::Armed { since } if now.duration_since(since) <= ARM_WINDOW => {
                self.phase = Phase::Idle;
                true
            }
            Phase::Armed { .. } => {
                self.phase = Phase::Armed { since: now };
                false
            }
        }
    }

    /// Expire a stale arm. Called on every event-loop tick.
    pub fn tick(&mut self, now: Instant) {
        if let Phase::Armed { since } = self.phase
            && now.duration_since(since) > ARM_WINDOW
        {
            self.phase = Phase::Idle;
        }
    }

    /// Cancel outright (target deleted, selection changed, view torn down)
    pub fn disarm(&mut self) {
        self.phase = Phase::Idle;
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.phase, Phase::Armed { .. })
    }
}

impl Default for Confirm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_trigger_within_window_confirms() {
        let mut confirm = Confirm::new();
        let t0 = Instant::now();

        assert!(!confirm.trigger(t0));
        assert!(confirm.is_armed());
        assert!(confirm.trigger(t0 + Duration::from_secs(1)));
        assert!(!confirm.is_armed());
    }

    #[test]
    fn test_lapsed_arm_rearms_instead_of_confirming() {
        let mut confirm = Confirm::new();
        let t0 = Instant::now();

        assert!(!confirm.trigger(t0));
        // past the window: this trigger must not fire
        assert!(!confirm.trigger(t0 + Duration::from_secs(4)));
        assert!(confirm.is_armed());
        // but the fresh arm confirms normally
        assert!(confirm.trigger(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn test_tick_expires_stale_arm() {
        let mut confirm = Confirm::new();
        let t0 = Instant::now();

        confirm.trigger(t0);
        confirm.tick(t0 + Duration::from_secs(2));
        assert!(confirm.is_armed());
        confirm.tick(t0 + Duration::from_secs(4));
        assert!(!confirm.is_armed());
    }

    #[test]
    fn test_disarm_cancels() {
        let mut confirm = Confirm::new();
        let t0 = Instant::now();

        confirm.trigger(t0);
        confirm.disarm();
        assert!(!confirm.is_armed());
        // next trigger arms again rather than confirming
        assert!(!confirm.trigger(t0 + Duration::from_millis(100)));
    }

    #[test]
    fn test_confirm_fires_once() {
        let mut confirm = Confirm::new();
        let t0 = Instant::now();

        confirm.trigger(t0);
        assert!(confirm.trigger(t0 + Duration::from_secs(1)));
        // the machine is idle again: a further trigger only arms
        assert!(!confirm.trigger(t0 + Duration::from_secs(1)));
    }
}
