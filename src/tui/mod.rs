//! Terminal UI for Strictly Codenames.

mod app;
mod input;
mod ui;

use anyhow::Result;
use app::App;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;
use strictly_codenames::{
    ClientCommand, ClientConfig, GameEvent, GameOrchestrator, HttpRemote, RemoteMoveProxy,
    TurnController,
};
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

/// Runs the TUI client against the configured remote.
pub async fn run_tui(config: ClientConfig) -> Result<()> {
    // Log to a file so the alternate screen stays clean
    let log_file = std::fs::File::create(config.log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,strictly_codenames=debug")
            }),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!(server_url = %config.server_url(), "Starting Strictly Codenames TUI");

    let remote = HttpRemote::new(config.server_url(), config.request_timeout())?;
    let proxy = RemoteMoveProxy::new(remote, config.pacing())
        .with_publish_updates(*config.publish_updates());

    // Deal before touching the terminal so failures print normally
    let board = config.apply_difficulty(proxy.new_board().await?);
    let controller = TurnController::new(board);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let orchestrator = GameOrchestrator::new(controller, proxy, event_tx);
    let game = tokio::spawn(orchestrator.run(command_rx));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut event_rx, command_tx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    game.abort();
    if let Err(err) = res {
        error!(error = ?err, "Game loop error");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Draws, forwards keys as commands, and applies orchestrator events.
#[instrument(skip_all)]
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    event_rx: &mut mpsc::UnboundedReceiver<GameEvent>,
    command_tx: mpsc::UnboundedSender<ClientCommand>,
) -> Result<()> {
    let mut app = App::new();

    loop {
        while let Ok(event) = event_rx.try_recv() {
            app.handle_event(event);
        }

        terminal.draw(|f| ui::draw(f, &app))?;

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if key.code == KeyCode::Char('q') {
                info!("User quit");
                return Ok(());
            }
            if let Some(command) = app.handle_key(key.code)
                && command_tx.send(command).is_err()
            {
                error!("Game loop stopped");
                return Ok(());
            }
        }

        tokio::task::yield_now().await;
    }
}
