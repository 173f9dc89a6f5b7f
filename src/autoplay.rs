use std::time::{Duration, Instant};

/// Fixed-cadence driver that replays the correct click sequence.
///
/// Holds only the on/off flag and the next due instant; the session decides
/// what a due tick actually clicks, so autoplay can never bypass the
/// validator or the state machine.
#[derive(Debug)]
pub struct Autoplay {
    enabled: bool,
    interval: Duration,
    next_due: Option<Instant>,
}

impl Autoplay {
    pub fn new(interval: Duration) -> Self {
        Self {
            enabled: false,
            interval,
            next_due: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the driver. Enabling schedules the first synthetic click one
    /// full interval from `now`, matching a just-started interval timer.
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.enabled {
            self.disable();
        } else {
            self.enabled = true;
            self.next_due = Some(now + self.interval);
        }
        self.enabled
    }

    /// Stop the cadence. Idempotent; called on toggle-off, on the final
    /// click, and whenever a run starts or ends.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.next_due = None;
    }

    /// Whether a cadence tick is due at `now`. Consumes the due slot and
    /// schedules the next one.
    pub fn due(&mut self, now: Instant) -> bool {
        if !self.enabled {
            return false;
        }
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}
