//! Headless mode runner - main event loop
//!
//! Drives the Engine for one round, feeding it operator commands from stdin
//! and writing every engine event to stdout as NDJSON.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};

use bidboard_app::config::{self, Settings};
use bidboard_app::{Engine, EngineEvent, Message};
use bidboard_core::prelude::*;
use bidboard_core::RoundId;
use bidboard_remote::{GameDataService, HttpGameDataService};

use super::commands::{parse_command, Command};
use super::HeadlessEvent;

/// Capacity of the stdin command channel
const COMMAND_CHANNEL_CAPACITY: usize = 32;

/// One input to the headless loop
enum Input {
    Engine(Option<Message>),
    Operator(Option<Command>),
}

/// Run in headless mode against the configured game-data service
pub async fn run_headless(settings: Settings, round_id: RoundId) -> Result<()> {
    info!("═══════════════════════════════════════════════════════");
    info!("Bid board starting in HEADLESS mode");
    info!("Round: {}", round_id);
    info!("Service: {}", settings.remote.base_url);
    info!("═══════════════════════════════════════════════════════");

    let service = config::service_config(&settings.remote)
        .and_then(HttpGameDataService::new)
        .context("Failed to create game-data client")
        .inspect_err(|e| HeadlessEvent::error(e.user_message(), e.is_fatal()).emit())?;
    let mut engine = Engine::new(settings, Arc::new(service));

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(COMMAND_CHANNEL_CAPACITY);
    std::thread::spawn(move || {
        spawn_stdin_reader_blocking(cmd_tx);
    });

    let result = run_round(&mut engine, round_id, cmd_rx).await;

    info!("Bid board headless mode exiting");
    result
}

/// Enter `round_id` and run the event loop until quit, then shut down.
pub async fn run_round<S>(
    engine: &mut Engine<S>,
    round_id: RoundId,
    cmd_rx: mpsc::Receiver<Command>,
) -> Result<()>
where
    S: GameDataService + Send + Sync + 'static,
{
    let mut events = engine.subscribe();

    engine.process_message(Message::EnterRound { round_id });
    emit_pending_events(&mut events);

    let result = headless_event_loop(engine, &mut events, cmd_rx).await;

    engine.shutdown().await;
    emit_pending_events(&mut events);
    result
}

/// Main headless event loop
async fn headless_event_loop<S>(
    engine: &mut Engine<S>,
    events: &mut broadcast::Receiver<EngineEvent>,
    mut cmd_rx: mpsc::Receiver<Command>,
) -> Result<()>
where
    S: GameDataService + Send + Sync + 'static,
{
    let mut stdin_open = true;

    loop {
        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        let input = tokio::select! {
            msg = engine.msg_rx.recv() => Input::Engine(msg),
            cmd = cmd_rx.recv(), if stdin_open => Input::Operator(cmd),
        };

        match input {
            Input::Engine(Some(msg)) => engine.process_message(msg),
            Input::Engine(None) => {
                info!("Message channel closed");
                break;
            }
            Input::Operator(Some(Command::Board)) => match engine.projection() {
                Some(projection) => HeadlessEvent::board(projection).emit(),
                None => HeadlessEvent::error("no round is open", false).emit(),
            },
            Input::Operator(Some(command)) => {
                if let Some(msg) = command.into_message() {
                    engine.process_message(msg);
                }
            }
            Input::Operator(None) => {
                // Keep following the round after stdin closes; signals still quit
                info!("Stdin closed");
                stdin_open = false;
            }
        }

        emit_pending_events(events);
    }

    Ok(())
}

/// Write every queued engine event to stdout.
fn emit_pending_events(events: &mut broadcast::Receiver<EngineEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => HeadlessEvent::from_engine_event(event).emit(),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!("Headless output lagged, {} events dropped", skipped);
            }
            Err(_) => break,
        }
    }
}

/// Read operator commands from stdin (blocking, runs on its own thread)
fn spawn_stdin_reader_blocking(cmd_tx: mpsc::Sender<Command>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    let reader = stdin.lock();

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };

        match parse_command(&line) {
            Ok(Some(command)) => {
                info!("Stdin: {:?}", command);
                if cmd_tx.blocking_send(command).is_err() || command == Command::Quit {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Bad stdin command {:?}: {}", line.trim(), e);
                HeadlessEvent::error(e.to_string(), false).emit();
            }
        }
    }

    info!("Stdin reader exiting");
}
