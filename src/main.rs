mod ui;

use blip::{
    config::{Config, ConfigStore, FileConfigStore},
    point::PointId,
    runtime::{BlipEvent, CrosstermEventSource, FixedTicker, Runner},
    session::{Session, SessionEvent},
    TICK_RATE_MS,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    collections::HashMap,
    error::Error,
    io::{self, stdin},
    time::{Duration, Instant},
};

/// single-screen terminal reaction game
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Numbered points appear at random positions on the board; click them in ascending order before the run gets away from you. Each clicked point fades out on a fixed countdown, and clicking the wrong number ends the run."
)]
pub struct Cli {
    /// number of points to spawn per run
    #[clap(short = 'n', long)]
    number_of_points: Option<usize>,

    /// per-point exit countdown in milliseconds
    #[clap(long)]
    exit_ms: Option<u64>,

    /// autoplay cadence in milliseconds
    #[clap(long)]
    autoplay_interval_ms: Option<u64>,

    /// visual point radius in cells (affects spawn bounds)
    #[clap(long)]
    point_radius: Option<f64>,
}

impl Cli {
    /// Overlay the flags that were given onto the persisted config.
    fn apply(&self, cfg: &mut Config) {
        if let Some(n) = self.number_of_points {
            cfg.number_of_points = n.max(1);
        }
        if let Some(ms) = self.exit_ms {
            cfg.exit_ms = ms;
        }
        if let Some(ms) = self.autoplay_interval_ms {
            cfg.autoplay_interval_ms = ms;
        }
        if let Some(r) = self.point_radius {
            cfg.point_radius = r.max(0.0);
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub config: Config,
    pub number_of_points: usize,
    /// latest countdown readout per triggered point: (fraction, remaining seconds)
    pub ticks: HashMap<PointId, (f64, f64)>,
    pub elapsed_secs: f64,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            session: Session::new(config.tuning()),
            number_of_points: config.number_of_points.max(1),
            config,
            ticks: HashMap::new(),
            elapsed_secs: 0.0,
        }
    }

    pub fn start_run(&mut self, board: Rect, now: Instant) {
        let inner = ui::board_inner(board);
        self.session.start(
            self.number_of_points,
            inner.width as f64,
            inner.height as f64,
            now,
        );
        self.apply_events(now);
    }

    /// Drain the session's outbound events into presentation state.
    pub fn apply_events(&mut self, now: Instant) {
        for event in self.session.drain_events() {
            match event {
                SessionEvent::PointsChanged => self.ticks.clear(),
                SessionEvent::PointTick {
                    id,
                    fraction,
                    remaining_secs,
                } => {
                    self.ticks.insert(id, (fraction, remaining_secs));
                }
                SessionEvent::PointExpired(id) => {
                    self.ticks.remove(&id);
                }
                SessionEvent::StateChanged(_) | SessionEvent::ExpectedLabelChanged(_) => {}
            }
        }
        self.elapsed_secs = self.session.elapsed_secs(now);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    cli.apply(&mut config);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.clone());
    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // remember the point count the player settled on
    config.number_of_points = app.number_of_points;
    let _ = store.save(&config);

    res
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        let (_, board) = ui::layout(area);
        let now = Instant::now();

        match runner.step() {
            BlipEvent::Tick => {
                app.session.on_tick(now);
                app.apply_events(now);
            }
            BlipEvent::Resize => {}
            BlipEvent::Mouse(mouse) => {
                handle_mouse(app, board, mouse, now);
            }
            BlipEvent::Key(key) => {
                match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Char('p') | KeyCode::Enter => app.start_run(board, now),
                    KeyCode::Char('a') => {
                        app.session.toggle_autoplay(now);
                    }
                    KeyCode::Up => {
                        app.number_of_points = (app.number_of_points + 1).min(99);
                    }
                    KeyCode::Down => {
                        app.number_of_points = app.number_of_points.saturating_sub(1).max(1);
                    }
                    KeyCode::Char(c @ '1'..='9') => {
                        // label-keyed click for the first nine points
                        let label = c as usize - '0' as usize;
                        app.session.click_label(label, now);
                        app.apply_events(now);
                    }
                    _ => {}
                }
            }
        }
    }

    // quitting force-terminates outstanding timers without a verdict
    app.session.stop();
    Ok(())
}

fn handle_mouse(app: &mut App, board: Rect, mouse: MouseEvent, now: Instant) {
    if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
        return;
    }
    let inner = ui::board_inner(board);
    let hit = ui::hit_point(
        app.session.visible_points(),
        inner,
        mouse.column,
        mouse.row,
        app.config.point_radius,
    );
    if let Some(id) = hit {
        app.session.point_clicked(id, now);
        app.apply_events(now);
    }
}
