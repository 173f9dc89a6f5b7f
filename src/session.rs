use std::time::{Duration, Instant};

use crate::autoplay::Autoplay;
use crate::point::{Countdown, Point, PointController, PointId, PointPhase};
use crate::sequence::{evaluate_click, Verdict};
use crate::spawn::spawn_points;

/// Top-level session state. Cleared and Failed are terminal until a new run
/// is started; a restart goes straight back to Running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Idle,
    Running,
    Cleared,
    Failed,
}

/// Events the presentation layer reacts to. Queued on the session and
/// drained once per loop iteration.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// The point set was replaced wholesale (new run).
    PointsChanged,
    /// Carries terminal outcomes too: Cleared and Failed arrive here.
    StateChanged(GameState),
    ExpectedLabelChanged(usize),
    /// Per-frame countdown readout for one triggered point.
    PointTick {
        id: PointId,
        fraction: f64,
        remaining_secs: f64,
    },
    /// The point's countdown ran out; it is no longer drawn.
    PointExpired(PointId),
}

/// Externally supplied timing and layout constants.
#[derive(Clone, Copy, Debug)]
pub struct Tuning {
    /// Visual point radius; affects spawn bounds only.
    pub point_radius: f64,
    /// Exit countdown duration per triggered point.
    pub exit: Duration,
    /// Autoplay cadence interval.
    pub autoplay_interval: Duration,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            point_radius: 2.0,
            exit: Duration::from_millis(3000),
            autoplay_interval: Duration::from_millis(1000),
        }
    }
}

/// One game session: owns the spawned points and their lifecycle
/// controllers, the sequencing cursor, and the autoplay driver.
///
/// Single-writer rule: `state` and `expected_label` are mutated here and
/// nowhere else; spawner, controllers, and validator only return data.
#[derive(Debug)]
pub struct Session {
    state: GameState,
    expected_label: usize,
    points: Vec<Point>,
    // parallel to `points`
    controllers: Vec<PointController>,
    autoplay: Autoplay,
    tuning: Tuning,
    run: u32,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    // winning point whose expiry the Cleared transition waits on
    pending_clear: Option<PointId>,
    events: Vec<SessionEvent>,
}

impl Session {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            state: GameState::Idle,
            expected_label: 1,
            points: Vec::new(),
            controllers: Vec::new(),
            autoplay: Autoplay::new(tuning.autoplay_interval),
            tuning,
            run: 0,
            started_at: None,
            finished_at: None,
            pending_clear: None,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn expected_label(&self) -> usize {
        self.expected_label
    }

    pub fn total_points(&self) -> usize {
        self.points.len()
    }

    pub fn autoplay_enabled(&self) -> bool {
        self.autoplay.is_enabled()
    }

    /// Points still on the board, with their current phase. Expired points
    /// are destroyed visually and excluded.
    pub fn visible_points(&self) -> impl Iterator<Item = (&Point, PointPhase)> {
        self.points
            .iter()
            .zip(self.controllers.iter())
            .map(|(p, c)| (p, c.phase()))
            .filter(|(_, phase)| *phase != PointPhase::Expired)
    }

    pub fn point(&self, id: PointId) -> Option<&Point> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Session clock for the header timer; frozen at the terminal instant.
    pub fn elapsed_secs(&self, now: Instant) -> f64 {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.saturating_duration_since(start).as_secs_f64(),
            (Some(start), None) => now.saturating_duration_since(start).as_secs_f64(),
            _ => 0.0,
        }
    }

    /// Begin a new run: discard the old point set, force-stop its
    /// countdowns, spawn `count` fresh points into a `width` x `height`
    /// board, reset the cursor, and disable autoplay. Allowed from any
    /// state, including mid-run.
    pub fn start(&mut self, count: usize, width: f64, height: f64, now: Instant) {
        self.stop_all_countdowns();
        self.autoplay.disable();

        self.run = self.run.wrapping_add(1);
        let mut rng = rand::thread_rng();
        self.points = spawn_points(
            count,
            width,
            height,
            self.tuning.point_radius,
            self.run,
            &mut rng,
        );
        self.controllers = self
            .points
            .iter()
            .map(|_| PointController::new(self.tuning.exit))
            .collect();

        self.expected_label = 1;
        self.pending_clear = None;
        self.started_at = Some(now);
        self.finished_at = None;
        self.state = GameState::Running;

        self.events.push(SessionEvent::PointsChanged);
        self.events.push(SessionEvent::StateChanged(GameState::Running));
        self.events.push(SessionEvent::ExpectedLabelChanged(1));
    }

    /// A click on a specific point, from the user or from autoplay. Ignored
    /// outside Running, for unknown ids, and for non-Idle points.
    pub fn point_clicked(&mut self, id: PointId, now: Instant) {
        if self.state != GameState::Running {
            return;
        }
        let Some(idx) = self.points.iter().position(|p| p.id == id) else {
            return;
        };
        // trigger() disables further input on this point synchronously, so
        // at most one validated click is ever in flight per point
        if !self.controllers[idx].trigger(now) {
            return;
        }

        let label = self.points[idx].label;
        match evaluate_click(label, self.points.len(), self.expected_label) {
            Verdict::Reject => self.fail(now),
            Verdict::Advance(next) => {
                self.expected_label = next;
                self.events.push(SessionEvent::ExpectedLabelChanged(next));
            }
            Verdict::Complete => {
                // Cleared is deferred until this point's countdown finishes
                self.pending_clear = Some(id);
            }
        }
    }

    /// Click the point carrying `label`, if it is still on the board and
    /// Idle. Convenience path for label-keyed input.
    pub fn click_label(&mut self, label: usize, now: Instant) {
        let id = self
            .points
            .iter()
            .zip(self.controllers.iter())
            .find(|(p, c)| p.label == label && c.phase() == PointPhase::Idle)
            .map(|(p, _)| p.id);
        if let Some(id) = id {
            self.point_clicked(id, now);
        }
    }

    /// Flip autoplay. Only meaningful while Running; ignored otherwise.
    pub fn toggle_autoplay(&mut self, now: Instant) -> bool {
        if self.state != GameState::Running {
            return false;
        }
        self.autoplay.toggle(now)
    }

    /// Advance every live timer to `now`: fire a due autoplay click, then
    /// progress each triggered point's countdown, resolving the deferred
    /// Cleared transition when the winning point expires.
    pub fn on_tick(&mut self, now: Instant) {
        if self.state == GameState::Running && self.autoplay.due(now) {
            let target = self.expected_label;
            let is_final = target == self.points.len();
            self.click_label(target, now);
            if is_final {
                // the final synthetic click ends the cadence
                self.autoplay.disable();
            }
        }

        for idx in 0..self.controllers.len() {
            match self.controllers[idx].tick(now) {
                Some(Countdown::Running {
                    fraction,
                    remaining_secs,
                }) => self.events.push(SessionEvent::PointTick {
                    id: self.points[idx].id,
                    fraction,
                    remaining_secs,
                }),
                Some(Countdown::Expired) => {
                    let id = self.points[idx].id;
                    self.events.push(SessionEvent::PointExpired(id));
                    if self.pending_clear == Some(id) {
                        self.clear(now);
                    }
                }
                None => {}
            }
        }
    }

    /// Force-terminate without a verdict (e.g. quitting the app): every
    /// countdown and the autoplay cadence halt; `state` is left as is.
    pub fn stop(&mut self) {
        self.stop_all_countdowns();
        self.autoplay.disable();
    }

    /// Take the queued outbound events.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    fn fail(&mut self, now: Instant) {
        self.state = GameState::Failed;
        self.finished_at = Some(now);
        self.pending_clear = None;
        self.stop_all_countdowns();
        self.autoplay.disable();
        self.events.push(SessionEvent::StateChanged(GameState::Failed));
    }

    fn clear(&mut self, now: Instant) {
        self.state = GameState::Cleared;
        self.finished_at = Some(now);
        self.pending_clear = None;
        self.stop_all_countdowns();
        self.autoplay.disable();
        self.events.push(SessionEvent::StateChanged(GameState::Cleared));
    }

    fn stop_all_countdowns(&mut self) {
        for ctrl in &mut self.controllers {
            ctrl.force_stop();
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}
