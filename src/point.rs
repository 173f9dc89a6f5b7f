use std::time::{Duration, Instant};

/// Identity of a spawned point, unique across the life of a session.
///
/// `run` is the session's run token and `seq` the generation index within
/// that run, so two points never share an id even when spawned within the
/// same clock tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointId {
    pub run: u32,
    pub seq: u32,
}

/// A point placed on the board. Position and label are fixed at spawn.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub id: PointId,
    pub x: f64,
    pub y: f64,
    pub label: usize,
}

/// Runtime phase of one point within a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointPhase {
    /// Spawned and clickable.
    Idle,
    /// Clicked; exit countdown running.
    Triggered,
    /// Countdown finished or force-stopped; the point is gone.
    Expired,
}

/// What a countdown tick observed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Countdown {
    /// Still counting down. `fraction` is elapsed/exit clamped to [0, 1];
    /// consumers derive opacity and the remaining-time readout from it.
    Running { fraction: f64, remaining_secs: f64 },
    /// The countdown just reached its end. Reported exactly once.
    Expired,
}

/// Owns the Idle -> Triggered -> Expired lifecycle of a single point.
///
/// The countdown is continuous: each tick recomputes elapsed time since the
/// trigger instant rather than accumulating fixed steps.
#[derive(Debug)]
pub struct PointController {
    phase: PointPhase,
    triggered_at: Option<Instant>,
    exit: Duration,
}

impl PointController {
    pub fn new(exit: Duration) -> Self {
        Self {
            phase: PointPhase::Idle,
            triggered_at: None,
            exit,
        }
    }

    pub fn phase(&self) -> PointPhase {
        self.phase
    }

    /// Start the exit countdown. Only valid from Idle; re-triggering an
    /// already triggered or expired point is silently ignored.
    ///
    /// Returns whether the transition happened, so the caller knows if this
    /// click should reach the sequence validator.
    pub fn trigger(&mut self, now: Instant) -> bool {
        if self.phase != PointPhase::Idle {
            return false;
        }
        self.phase = PointPhase::Triggered;
        self.triggered_at = Some(now);
        true
    }

    /// Advance the countdown. Returns None unless the point is Triggered.
    /// The transition to Expired happens here, exactly once.
    pub fn tick(&mut self, now: Instant) -> Option<Countdown> {
        if self.phase != PointPhase::Triggered {
            return None;
        }
        let started = self.triggered_at?;
        let elapsed = now.saturating_duration_since(started);
        if elapsed >= self.exit {
            self.phase = PointPhase::Expired;
            return Some(Countdown::Expired);
        }
        let fraction = (elapsed.as_secs_f64() / self.exit.as_secs_f64()).clamp(0.0, 1.0);
        let remaining_secs = (self.exit - elapsed).as_secs_f64();
        Some(Countdown::Running {
            fraction,
            remaining_secs,
        })
    }

    /// Halt the countdown without reporting expiry. Valid from any phase and
    /// idempotent; used when a run ends or the point set is replaced.
    pub fn force_stop(&mut self) {
        self.phase = PointPhase::Expired;
        self.triggered_at = None;
    }
}
