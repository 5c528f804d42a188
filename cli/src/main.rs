//! Moodping CLI - binary entry point and terminal session management.
//!
//! # Architecture
//!
//! ```text
//! main() -> wiring (config, identity, client, event worker)
//!        -> wizard task: run_wizards(context, commands)
//!        -> TerminalSession -> run_app() frame loop
//! ```
//!
//! The frame loop never awaits the network. Key presses become
//! [`WizardCommand`]s for the wizard task; the wizard task publishes snapshots
//! and notices back through [`moodping_tui::view_channel`].
//!
//! [`WizardCommand`]: moodping_engine::WizardCommand

use std::{
    fs::{self, OpenOptions},
    io::{Stdout, stdout},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use moodping_engine::moodping_client::ApiClient;
use moodping_engine::moodping_config::{self, MoodpingConfig, ResolvedConfig};
use moodping_engine::moodping_core::{FileStore, Identity, MemoryStore};
use moodping_engine::{EventLogger, WizardContext, run_wizards};
use moodping_tui::{InputPump, Screen, ViewUpdates, draw, handle_events, view_channel};

const COMMAND_CAPACITY: usize = 32;
const NOTICE_CAPACITY: usize = 16;
const FRAME_DURATION: Duration = Duration::from_millis(16);
const SPINNER_FRAME_INTERVAL: u32 = 5;
const EVENT_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Never log to the terminal the TUI draws on.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.moodping/logs/moodping.log
    if let Some(app_dir) = moodping_config::app_dir() {
        candidates.push(app_dir.join("logs").join("moodping.log"));
    }

    // Fallback: ./.moodping/logs/moodping.log
    candidates.push(PathBuf::from(".moodping").join("logs").join("moodping.log"));

    candidates
}

fn load_config() -> Result<ResolvedConfig> {
    let config = MoodpingConfig::load()
        .context("failed to load ~/.moodping/config.toml")?
        .unwrap_or_default();
    let resolved = config.resolve().context("invalid configuration")?;
    tracing::info!(
        base_url = %resolved.base_url,
        events = resolved.events.enabled,
        storage = %resolved.storage_path.display(),
        "Configuration resolved"
    );
    Ok(resolved)
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Raw mode, bracketed paste and the alternate screen are restored even after
/// panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnableBracketedPaste, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            let _ = execute!(out, LeaveAlternateScreen, DisableBracketedPaste);
            return Err(err.into());
        }

        match Terminal::new(CrosstermBackend::new(out)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen, DisableBracketedPaste);
                Err(err.into())
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        );
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = load_config()?;

    let identity = Arc::new(Identity::new(
        Arc::new(FileStore::new(&config.storage_path)),
        Arc::new(MemoryStore::new()),
    ));
    let api = ApiClient::new(&config.base_url, config.request_timeout)
        .context("failed to build HTTP client")?;

    let (events, event_worker) = if config.events.enabled {
        let (logger, worker) =
            EventLogger::spawn(api.clone(), identity.clone(), config.events.queue_capacity);
        (logger, Some(worker))
    } else {
        tracing::info!("UX event logging disabled");
        (EventLogger::disabled(), None)
    };

    let (view, mut updates) = view_channel(NOTICE_CAPACITY);
    let view = Arc::new(view);
    let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);

    let context = WizardContext {
        api,
        identity,
        events,
        view: view.clone(),
        navigator: view,
        locale: config.locale,
    };
    let wizard_task = tokio::spawn(run_wizards(context, command_rx));

    let mut screen = Screen::new(command_tx, config.locale, config.ui);
    let result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut screen, &mut updates).await
    };

    // A submission may be waiting on the server; do not hold the exit for it.
    drop(screen);
    wizard_task.abort();
    let _ = wizard_task.await;

    if let Some(worker) = event_worker
        && tokio::time::timeout(EVENT_FLUSH_TIMEOUT, worker)
            .await
            .is_err()
    {
        tracing::warn!("Gave up waiting for pending UX events");
    }

    result
}

async fn run_app<B>(
    terminal: &mut Terminal<B>,
    screen: &mut Screen,
    updates: &mut ViewUpdates,
) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut frame_count: u32 = 0;

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        let quit_now = match handle_events(screen, &mut input) {
            Ok(q) => q,
            Err(e) => break Err(e),
        };
        if quit_now {
            break Ok(());
        }

        updates.apply(screen);

        frame_count = frame_count.wrapping_add(1);
        if frame_count % SPINNER_FRAME_INTERVAL == 0 {
            screen.advance_tick();
        }

        if let Err(e) = terminal.draw(|frame| draw(frame, screen)) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}
