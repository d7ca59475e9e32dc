use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::{io, path::PathBuf, time::{Duration, Instant}};

mod app;
mod cues;
mod engine;
mod input;
mod logging;
mod settings;
mod ui;

use app::{App, Mode};
use cues::CuePlayer;
use settings::SettingsStore;
use ui::Theme;

// ============================================================================
// Type Aliases & Constants
// ============================================================================

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
const FRAME_RATE: Duration = Duration::from_millis(33);
const TICK_RATE: Duration = Duration::from_secs(1);

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser)]
#[command(author, version, about = "HIIT interval timer for the terminal")]
struct Args {
    /// Settings file (defaults to the per-user config dir)
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Color theme: classic or dark
    #[arg(short = 't', long, default_value = "classic")]
    theme: String,
    #[arg(long)]
    no_sound: bool,
    /// Start immediately instead of counting Ready/Set/Go
    #[arg(long)]
    no_pre_roll: bool,
    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    let store = SettingsStore::new(args.settings.unwrap_or_else(SettingsStore::default_path));
    log::info!("Settings file: {}", store.path().display());

    let mut app = App::new(store, !args.no_pre_roll);
    let theme = ui::get_theme(&args.theme);
    let player = CuePlayer::new(!args.no_sound);

    let mut terminal = setup_or_restore(setup_terminal, restore_terminal)?;

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        default_hook(info);
    }));

    let res = run(&mut terminal, &mut app, &theme, &player);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = &res {
        log::error!("Exited with error: {}", e);
    }
    log::info!("=== hiit-timer stopped ===");
    res
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Best-effort undo of `setup_terminal`, safe to call at any point of it.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

/// Run `setup`, calling `restore` if it fails part-way.
fn setup_or_restore<T>(
    setup: impl FnOnce() -> io::Result<T>,
    restore: impl FnOnce(),
) -> io::Result<T> {
    setup().inspect_err(|_| restore())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    theme: &Theme,
    player: &CuePlayer,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::render_ui(f, app, theme))?;

        let timeout = FRAME_RATE.min(TICK_RATE.saturating_sub(last_tick.elapsed()));
        if event::poll(timeout)? {
            let event = event::read()?;
            let area = terminal.size()?;
            if let Some(command) = input::map_event(&event, app.mode(), area) {
                let was_pre_roll = matches!(app.mode(), Mode::PreRoll { .. });
                player.announce(app.handle(command));

                // Each pre-roll word gets a full second.
                if !was_pre_roll && matches!(app.mode(), Mode::PreRoll { .. }) {
                    last_tick = Instant::now();
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }

        if last_tick.elapsed() >= TICK_RATE {
            player.announce(app.tick());
            last_tick += TICK_RATE;
            // Don't replay missed seconds after a stall (e.g. suspended terminal).
            if last_tick.elapsed() >= TICK_RATE {
                last_tick = Instant::now();
            }
        }
    }
}
