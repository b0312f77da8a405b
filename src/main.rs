use anyhow::{Context, Result};
use clap::Parser;
use glosscast_capture::Recognizer;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glosscast", about = "Live sign language translation for video calls")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = glosscast_core::AppConfig::load_from_file(&cli.config)
        .with_context(|| format!("failed to load config from {:?}", cli.config))?;

    // Set up TUI log buffer and layered tracing subscriber
    let log_buffer = Arc::new(Mutex::new(VecDeque::<String>::new()));
    let ui_log_layer = glosscast_tui::UiLogLayer::new(Arc::clone(&log_buffer), 1000);

    let env_filter = EnvFilter::try_new(&config.general.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::Registry::default()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(ui_log_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    tracing::info!("glosscast starting");

    // Join the call
    let session: Arc<dyn glosscast_session::CallSession> = match config.session.provider.as_str() {
        "local" => {
            let hub = glosscast_session::LocalHub::new(&config.session.call_id);
            Arc::new(hub.join(&config.session.participant))
        }
        other => {
            return Err(glosscast_core::SessionError::ProviderNotFound(other.to_string()).into());
        }
    };
    tracing::info!(
        call_id = %config.session.call_id,
        participant = %config.session.participant,
        "joined call"
    );

    // Channels between capture, translation, reconciliation and the TUI
    let (state_tx, state_rx) =
        tokio::sync::watch::channel(glosscast_core::DisplayState::default());
    let (event_tx, event_rx) =
        tokio::sync::mpsc::unbounded_channel::<glosscast_core::StateEvent>();
    let (transcript_tx, transcript_rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    let (cmd_tx, mut cmd_rx) =
        tokio::sync::mpsc::unbounded_channel::<glosscast_core::UiCommand>();

    // Fold local events, call events and the shared-state poll into one
    // display snapshot stream for the TUI
    let mut reconciler = glosscast_session::Reconciler::new(
        Arc::clone(&session),
        event_rx,
        state_tx,
        Duration::from_millis(config.session.state_poll_interval_ms),
    );
    reconciler.start();

    // Speech capture
    let registry = glosscast_capture::RecognizerRegistry::new();
    let mut recognizer = registry.create(&config.capture.recognizer).with_context(|| {
        format!(
            "failed to create recognizer '{}' (available: {:?})",
            config.capture.recognizer,
            registry.list_recognizers()
        )
    })?;

    let recognizer_config = match config.capture.recognizer.as_str() {
        "scripted" => {
            if let Some(ref scripted_cfg) = config.capture.scripted {
                toml::Value::try_from(scripted_cfg)
                    .context("failed to serialize scripted config")?
            } else {
                toml::Value::Table(Default::default())
            }
        }
        "whisper" => {
            if let Some(ref whisper_cfg) = config.capture.whisper {
                toml::Value::try_from(whisper_cfg)
                    .context("failed to serialize whisper config")?
            } else {
                toml::Value::Table(Default::default())
            }
        }
        _ => toml::Value::Table(Default::default()),
    };

    recognizer
        .initialize(&config.capture.language, recognizer_config)
        .await
        .with_context(|| {
            format!(
                "failed to initialize recognizer '{}'",
                config.capture.recognizer
            )
        })?;
    tracing::info!(
        language = %config.capture.language,
        "recognizer '{}' active",
        recognizer.name(),
    );

    let controller = Arc::new(glosscast_capture::CaptureController::new(
        Arc::from(recognizer),
        event_tx.clone(),
        transcript_tx,
    ));

    // Translation worker; a missing [translate] section means this
    // client only displays what others broadcast
    let mut worker = match config.translate {
        Some(ref translate_cfg) => {
            let service = Arc::new(glosscast_translate::HttpGlossService::new(translate_cfg));
            let mut worker = glosscast_translate::TranslationWorker::new(
                service,
                Arc::clone(&session),
                event_tx.clone(),
                transcript_rx,
                Duration::from_millis(translate_cfg.poll_interval_ms),
                translate_cfg.max_poll_secs.map(Duration::from_secs),
            );
            worker.start();
            tracing::info!(submit_url = %translate_cfg.submit_url, "translation service active");
            Some(worker)
        }
        None => {
            drop(transcript_rx);
            tracing::info!("no [translate] section, running in receive-only mode");
            None
        }
    };

    // Command handler task
    let cmd_controller = Arc::clone(&controller);
    let cmd_task = tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                glosscast_core::UiCommand::ToggleListening => cmd_controller.toggle(),
                glosscast_core::UiCommand::Quit => break,
            }
        }
    });

    tracing::info!("TUI active, press 'l' to speak and 'q' to quit");

    // Run TUI (blocks until user quits)
    glosscast_tui::run(state_rx, cmd_tx, log_buffer)
        .await
        .context("TUI error")?;

    tracing::info!("shutting down");
    controller.stop_listening();
    let _ = cmd_task.await;
    // Last capture handle: dropping it closes the transcript channel
    drop(controller);

    if let Some(ref mut worker) = worker {
        worker.shutdown().await;
    }
    drop(event_tx);
    reconciler.shutdown().await;

    tracing::info!("glosscast stopped");
    Ok(())
}
