use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use blip::point::PointId;
use blip::session::{GameState, Session, SessionEvent, Tuning};

const W: f64 = 80.0;
const H: f64 = 24.0;

fn id_of(session: &Session, label: usize) -> PointId {
    session
        .visible_points()
        .find(|(p, _)| p.label == label)
        .map(|(p, _)| p.id)
        .expect("label not on board")
}

// Happy path: three points clicked in order; Cleared arrives only after the
// final point's countdown elapses.
#[test]
fn full_run_clears_after_final_countdown() {
    let now = Instant::now();
    let mut session = Session::new(Tuning::default());
    session.start(3, W, H, now);

    session.point_clicked(id_of(&session, 1), now);
    assert_eq!(session.expected_label(), 2);
    assert_eq!(session.state(), GameState::Running);

    session.point_clicked(id_of(&session, 2), now + Duration::from_millis(200));
    assert_eq!(session.expected_label(), 3);

    let final_click = now + Duration::from_millis(400);
    session.point_clicked(id_of(&session, 3), final_click);
    assert_eq!(session.state(), GameState::Running, "clear is deferred");

    session.on_tick(final_click + Duration::from_millis(2999));
    assert_eq!(session.state(), GameState::Running);

    session.on_tick(final_click + Duration::from_millis(3000));
    assert_eq!(session.state(), GameState::Cleared);
    assert!(session
        .drain_events()
        .contains(&SessionEvent::StateChanged(GameState::Cleared)));
}

// Failure: the wrong label ends the run immediately, no countdown wait.
#[test]
fn wrong_label_fails_without_waiting() {
    let now = Instant::now();
    let mut session = Session::new(Tuning::default());
    session.start(3, W, H, now);

    session.point_clicked(id_of(&session, 2), now);
    assert_eq!(session.state(), GameState::Failed);
}

// Restart mid-run: the new point set replaces the old one and no stale
// countdown from the discarded run ever fires.
#[test]
fn restart_mid_run_replaces_the_board() {
    let now = Instant::now();
    let mut session = Session::new(Tuning::default());
    session.start(5, W, H, now);
    session.point_clicked(id_of(&session, 1), now);

    session.start(4, W, H, now + Duration::from_millis(100));
    assert_eq!(session.state(), GameState::Running);
    assert_eq!(session.expected_label(), 1);
    let labels: Vec<usize> = session
        .visible_points()
        .map(|(p, _)| p.label)
        .collect();
    assert_eq!(labels, vec![1, 2, 3, 4]);
    session.drain_events();

    session.on_tick(now + Duration::from_secs(60));
    assert!(session
        .drain_events()
        .iter()
        .all(|e| !matches!(e, SessionEvent::PointExpired(_))));
}

// Autoplay: one click per cadence tick, self-disabling on the final click,
// then the deferred clear.
#[test]
fn autoplay_replays_the_sequence() {
    let now = Instant::now();
    let mut session = Session::new(Tuning::default());
    session.start(2, W, H, now);
    assert!(session.toggle_autoplay(now));

    session.on_tick(now + Duration::from_millis(1000));
    assert_eq!(session.expected_label(), 2);

    session.on_tick(now + Duration::from_millis(2000));
    assert!(!session.autoplay_enabled());
    assert_eq!(session.state(), GameState::Running);

    session.on_tick(now + Duration::from_millis(2000 + 3000));
    assert_eq!(session.state(), GameState::Cleared);
}

// Ignored input: terminal states accept no clicks and emit nothing.
#[test]
fn terminal_state_ignores_clicks() {
    let now = Instant::now();
    let mut session = Session::new(Tuning::default());
    session.start(1, W, H, now);
    let winner = id_of(&session, 1);
    session.point_clicked(winner, now);
    session.on_tick(now + Duration::from_millis(3000));
    assert_eq!(session.state(), GameState::Cleared);
    session.drain_events();

    session.point_clicked(winner, now + Duration::from_millis(3100));
    session.point_clicked(PointId { run: 99, seq: 0 }, now + Duration::from_millis(3100));
    assert_eq!(session.state(), GameState::Cleared);
    assert!(session.drain_events().is_empty());
}

// Drive the session through the Runner/TestEventSource loop, the way the
// binary does, without a TTY.
#[test]
fn headless_run_via_runner() {
    let mut session = Session::new(Tuning {
        exit: Duration::from_millis(50),
        ..Tuning::default()
    });

    let (tx, rx) = mpsc::channel();
    let es = blip::runtime::TestEventSource::new(rx);
    let ticker = blip::runtime::FixedTicker::new(Duration::from_millis(5));
    let runner = blip::runtime::Runner::new(es, ticker);

    session.start(2, W, H, Instant::now());

    // synthetic label-keyed clicks, as the digit keys produce
    for digit in ['1', '2'] {
        tx.send(blip::runtime::BlipEvent::Key(KeyEvent::new(
            KeyCode::Char(digit),
            KeyModifiers::NONE,
        )))
        .unwrap();
    }

    for _ in 0..200u32 {
        match runner.step() {
            blip::runtime::BlipEvent::Key(key) => {
                if let KeyCode::Char(c @ '1'..='9') = key.code {
                    let label = c as usize - '0' as usize;
                    session.click_label(label, Instant::now());
                }
            }
            blip::runtime::BlipEvent::Tick => session.on_tick(Instant::now()),
            _ => {}
        }
        if session.state() == GameState::Cleared {
            break;
        }
    }

    assert_eq!(session.state(), GameState::Cleared);
}
