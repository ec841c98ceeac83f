pub mod cli;
pub mod domain;
pub mod host;
pub mod logging;
pub mod render;
pub mod settings;
pub mod sky;
pub mod ui;

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use cli::Cli;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use host::{
    events::{HostEvent, spawn_input_task, spawn_shutdown_task},
    state::AppState,
    viewport::ViewportSize,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::{RuntimeSettings, load_runtime_settings, save_runtime_settings};
use tokio::sync::mpsc;
use tracing::info;

pub async fn run(cli: Cli) -> Result<()> {
    cli.validate()?;
    logging::init(cli.log_file.as_deref())?;

    let (settings, path) = load_runtime_settings(&cli, true);
    if cli.save_settings {
        let path = path.context("no settings location: set MIRROR_SKY_CONFIG_DIR or HOME")?;
        save_runtime_settings(&path, &settings)?;
        info!(path = %path.display(), "settings saved");
    }

    let mut terminal = setup_terminal()?;
    let result = run_inner(&mut terminal, &cli, settings).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn run_inner(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    cli: &Cli,
    settings: RuntimeSettings,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<HostEvent>(256);
    let input_stream = spawn_input_task();
    tokio::pin!(input_stream);
    spawn_shutdown_task(tx.clone());

    let size = terminal.size()?;
    let mut app = AppState::new(cli, settings, ViewportSize::from_cells(size.width, size.height));

    tx.send(HostEvent::Bootstrap).await?;

    while app.running {
        tokio::select! {
            maybe_input = input_stream.next() => {
                if let Some(input) = maybe_input {
                    app.handle_event(HostEvent::Input(input), &tx).await?;
                }
            }
            maybe_event = rx.recv() => {
                if let Some(event) = maybe_event {
                    app.handle_event(event, &tx).await?;
                }
            }
        }

        terminal.draw(|frame| ui::render(frame, &app))?;
    }

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn install_panic_hook() {
    let existing = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
        existing(panic);
    }));
}
