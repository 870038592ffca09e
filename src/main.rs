//! Headless entry point — submit one image to the analysis backend.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse command-line flags.
//! 3. Load [`AppConfig`] (defaults on first run) and apply flag overrides.
//! 4. Build the HTTP backend, console view and audio player.
//! 5. Spawn the [`PageController`] on a current-thread tokio runtime.
//! 6. Replay the flags as page events, close the channel and wait for every
//!    outstanding request to settle.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc;

use image_analysis::{
    api::{BestEffortPreferences, HttpAudioPlayer, HttpBackend},
    config::AppConfig,
    pipeline::{new_shared_state, PageController, PageEvent, SubmissionState},
    selection::{FileCandidate, Selection},
    view::ConsoleView,
};

const USAGE: &str = "usage: image-analysis [--language=CODE] [--audio-language=CODE] \
[--ui-language=CODE] [--backend=URL] [--config=PATH] <IMAGE>";

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    file: Option<PathBuf>,
    language: Option<String>,
    audio_language: Option<String>,
    ui_language: Option<String>,
    backend: Option<String>,
    config: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();

    for arg in args {
        if let Some(value) = arg.strip_prefix("--language=") {
            parsed.language = Some(value.to_string());
        } else if let Some(value) = arg.strip_prefix("--audio-language=") {
            parsed.audio_language = Some(value.to_string());
        } else if let Some(value) = arg.strip_prefix("--ui-language=") {
            parsed.ui_language = Some(value.to_string());
        } else if let Some(value) = arg.strip_prefix("--backend=") {
            parsed.backend = Some(value.to_string());
        } else if let Some(value) = arg.strip_prefix("--config=") {
            parsed.config = Some(PathBuf::from(value));
        } else if arg.starts_with("--") {
            bail!("unknown argument `{arg}`\n{USAGE}");
        } else if parsed.file.is_some() {
            bail!("only one image can be submitted\n{USAGE}");
        } else {
            parsed.file = Some(PathBuf::from(arg));
        }
    }

    if parsed.file.is_none() && parsed.ui_language.is_none() {
        bail!("no image given\n{USAGE}");
    }
    Ok(parsed)
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("image-analysis failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = parse_args(env::args().skip(1))?;

    let loaded = match &args.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    if let Some(url) = &args.backend {
        config.backend.base_url = url.clone();
    }
    if let Some(code) = &args.language {
        config.languages.recognition = code.clone();
    }

    let file = args
        .file
        .as_deref()
        .map(|path| {
            FileCandidate::from_path(path)
                .with_context(|| format!("cannot read {}", path.display()))
        })
        .transpose()?;

    let backend = HttpBackend::from_config(&config.backend)?;
    log::info!("image-analysis: backend {}", config.backend.base_url);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let state = new_shared_state();
    let view = Arc::new(ConsoleView::new());
    let player = Arc::new(HttpAudioPlayer::new(backend.clone()));

    let controller = PageController::new(
        Arc::clone(&state),
        Selection::new(config.languages.audio.clone()),
        Arc::new(backend.clone()),
        BestEffortPreferences::new(Arc::new(backend)),
        view.clone(),
        player.clone(),
        config.texts.clone(),
    );

    runtime.block_on(async {
        let (events_tx, events_rx) = mpsc::channel::<PageEvent>(16);
        let run = tokio::spawn(controller.run(events_rx));

        let mut events = Vec::new();
        if let Some(code) = args.ui_language.clone() {
            events.push(PageEvent::UiLanguageChosen(code));
        }
        if config.languages.recognition != image_analysis::selection::AUTO_LANGUAGE {
            events.push(PageEvent::RecognitionLanguageChosen(
                config.languages.recognition.clone(),
            ));
        }
        if let Some(code) = args.audio_language.clone() {
            events.push(PageEvent::AudioLanguageChosen(code));
        }
        if let Some(file) = file {
            events.push(PageEvent::FilesPicked(vec![file]));
            events.push(PageEvent::SubmitRequested);
        }

        for event in events {
            if events_tx.send(event).await.is_err() {
                log::error!("image-analysis: controller stopped early");
                break;
            }
        }
        drop(events_tx);

        run.await.context("controller task panicked")
    })?;

    if let Some(source) = player.source() {
        log::info!("image-analysis: narration source {source}");
    }

    let final_state = state
        .lock()
        .map_err(|e| anyhow::anyhow!("page state lock poisoned: {e}"))?
        .clone();
    log::info!(
        "image-analysis: finished after {} submission(s), audio {:?}",
        final_state.submissions,
        final_state.audio
    );

    Ok(match final_state.last_outcome {
        Some(SubmissionState::Failed(_)) => ExitCode::FAILURE,
        _ if args.file.is_some() && final_state.submissions == 0 => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
