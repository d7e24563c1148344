pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod logging;
pub mod scene;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_support;

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use app::events::{AppEvent, spawn_input_task};
use app::state::{AppMode, AppState};
use cli::{Cli, IconMode};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use scene::tuning::SceneTuning;
use tokio::sync::mpsc;

pub async fn run(cli: Cli) -> Result<()> {
    cli.validate()?;
    if let Some(path) = &cli.log_file {
        logging::init_file_logger(path)?;
    }
    let tuning = load_tuning(&cli)?;

    let mut terminal = setup_terminal()?;
    let result = run_inner(&mut terminal, cli, tuning).await;
    restore_terminal(&mut terminal)?;
    result
}

fn load_tuning(cli: &Cli) -> Result<SceneTuning> {
    match &cli.tuning {
        Some(path) => {
            let tuning = SceneTuning::load(path)
                .with_context(|| format!("loading tuning from {}", path.display()))?;
            log::info!("scene tuning loaded from {}", path.display());
            Ok(tuning)
        }
        None => Ok(SceneTuning::default()),
    }
}

async fn run_inner(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    cli: Cli,
    tuning: SceneTuning,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(256);
    let input_stream = spawn_input_task();
    tokio::pin!(input_stream);
    let size = terminal.size()?;
    let mut app = AppState::new(&cli, Rect::new(0, 0, size.width, size.height), tuning);
    log::info!("terminal-skies started at {}x{}", size.width, size.height);

    tx.send(AppEvent::Bootstrap).await?;

    while app.running {
        tokio::select! {
            maybe_input = input_stream.next() => {
                if let Some(input) = maybe_input {
                    app.handle_event(AppEvent::Input(input), &tx, &cli).await?;
                }
            }
            maybe_event = rx.recv() => {
                if let Some(event) = maybe_event {
                    app.handle_event(event, &tx, &cli).await?;
                }
            }
        }

        terminal.draw(|frame| ui::render(frame, &app, &cli))?;

        if app.mode == AppMode::Quit {
            app.running = false;
        }
    }

    log::info!("terminal-skies exiting");
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

#[must_use]
pub fn icon_mode(cli: &Cli) -> IconMode {
    if cli.ascii_icons {
        IconMode::Ascii
    } else if cli.emoji_icons {
        IconMode::Emoji
    } else {
        IconMode::Unicode
    }
}

fn install_panic_hook() {
    let existing = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
        existing(panic);
    }));
}
