use std::{
    env,
    io::{self, IsTerminal},
    sync::Arc,
    time::Duration,
};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use neural_playground::{
    headless,
    progress::{Progress, StepTracker, TRAINING_LESSON},
    Controller, PlaygroundConfig, Trainer,
};
use parking_lot::Mutex;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::{self, Runtime};

use crate::{
    state::session::SessionState,
    ui::screens::{menu, Action, Screen},
};

const FRAME: Duration = Duration::from_millis(33);

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }

        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Runs the TUI application, or a headless run when there's no terminal to draw on.
///
/// # Errors
/// Returns an error if the configuration is invalid or the terminal breaks mid-session.
pub fn run() -> Result<()> {
    let config = match env::args().nth(1) {
        Some(path) => PlaygroundConfig::load(path)?,
        None => PlaygroundConfig::default(),
    };
    config.validate()?;

    if !io::stdout().is_terminal() {
        warn!("stdout is not a terminal, running headless");
        return run_headless(&config);
    }

    let guard = match TerminalGuard::enter() {
        Ok(guard) => guard,
        Err(e) => {
            warn!("cannot set up the terminal ({e}), running headless");
            return run_headless(&config);
        }
    };

    let runtime = runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()?;

    let progress = Arc::new(Mutex::new(Progress::new()));
    let tracker = StepTracker::new(progress.clone(), TRAINING_LESSON);
    let trainer = Trainer::new(config.hidden_units()?, config.learning_rate, config.rng())
        .with_completion(tracker);
    let controller = Controller::new(
        trainer,
        config.speed(),
        min_interval(&config),
        runtime.handle().clone(),
    );

    let mut session = SessionState::new(controller, progress, config.log_every);
    let ret = event_loop(&mut session);

    session.pause();
    drop(guard);
    shutdown(runtime);

    ret
}

fn event_loop(session: &mut SessionState) -> Result<()> {
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut screen = Screen::Menu(menu::MenuState::new());

    loop {
        session.tick();

        // A frame that fails to draw is dropped, training keeps going.
        if let Err(e) = terminal.draw(|f| screen.draw(f, session)) {
            warn!("frame dropped: {e}");
        }

        if event::poll(FRAME)? {
            if let Event::Key(k) = event::read()? {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match screen.handle_key(k.code, session) {
                    Action::Quit => break,
                    Action::Transition(next) => screen = next,
                    Action::None => {}
                }
            }
        }
    }

    terminal.show_cursor()?;
    Ok(())
}

/// The controller never steps faster than the screen redraws.
fn min_interval(config: &PlaygroundConfig) -> Duration {
    config.min_interval().max(FRAME)
}

fn run_headless(config: &PlaygroundConfig) -> Result<()> {
    let report = headless::run(config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn shutdown(runtime: Runtime) {
    runtime.shutdown_timeout(Duration::from_millis(100));
    info!("bye");
}
