//! Submission Controller — the page's single event loop.
//!
//! [`PageController`] consumes [`PageEvent`]s from a `tokio::sync::mpsc`
//! channel.  Network work never blocks the loop: each request is spawned as
//! its own task and its result comes back as a [`Completion`] on an internal
//! channel, so user events keep being handled (and duplicate submits keep
//! being ignored) while a request is outstanding.
//!
//! # Submission flow
//!
//! ```text
//! SubmitRequested
//!   ├─ Submitting            → ignored
//!   ├─ no file               → Failed(NoFileSelected) → Idle
//!   ├─ file fails re-check   → error shown, stays Idle
//!   └─ valid file            → hide transient, progress on, submit off
//!                              spawn analyze                    [Submitting]
//!                                ├─ Err           → Failed(Transport)
//!                                ├─ success=false → Failed(Server)
//!                                └─ success=true  → Succeeded, render,
//!                                                   spawn HEAD probe
//!                              progress off, submit on           [Idle]
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::{AnalysisApi, AnalysisResult, AnalyzeRequest, ApiError, BestEffortPreferences};
use crate::config::UiTexts;
use crate::selection::{FileCandidate, FileSource, Selection, SelectionManager, ValidationOutcome};
use crate::view::{AudioLoadError, AudioPlayer, PageView};

use super::renderer::{AudioLoad, AudioProbe, ResultRenderer};
use super::state::{SharedState, SubmissionError, SubmissionState};

// ---------------------------------------------------------------------------
// PageEvent
// ---------------------------------------------------------------------------

/// User actions delivered to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    RecognitionLanguageChosen(String),
    AudioLanguageChosen(String),
    UiLanguageChosen(String),
    FilesPicked(Vec<FileCandidate>),
    DragEntered,
    DragLeft,
    FilesDropped(Vec<FileCandidate>),
    SubmitRequested,
}

/// Results of spawned work, fed back into the loop.
#[derive(Debug)]
enum Completion {
    Analysis(Result<AnalysisResult, ApiError>),
    Probe {
        generation: u64,
        url: String,
        outcome: Result<u16, ApiError>,
    },
    AudioLoad {
        generation: u64,
        outcome: Result<(), AudioLoadError>,
    },
    UiLanguage {
        code: String,
        outcome: Result<serde_json::Value, ApiError>,
    },
    /// Best-effort notification settled; nothing to apply.
    Notified,
}

// ---------------------------------------------------------------------------
// PageController
// ---------------------------------------------------------------------------

/// Owns the submission state machine and drives the other two components.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use image_analysis::api::{BestEffortPreferences, HttpAudioPlayer, HttpBackend};
/// use image_analysis::config::AppConfig;
/// use image_analysis::pipeline::{new_shared_state, PageController, PageEvent};
/// use image_analysis::selection::Selection;
/// use image_analysis::view::ConsoleView;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let backend = HttpBackend::from_config(&config.backend).unwrap();
/// let state = new_shared_state();
///
/// let controller = PageController::new(
///     state.clone(),
///     Selection::new(config.languages.audio.clone()),
///     Arc::new(backend.clone()),
///     BestEffortPreferences::new(Arc::new(backend.clone())),
///     Arc::new(ConsoleView::new()),
///     Arc::new(HttpAudioPlayer::new(backend)),
///     config.texts.clone(),
/// );
///
/// let (events_tx, events_rx) = tokio::sync::mpsc::channel(16);
/// events_tx.send(PageEvent::SubmitRequested).await.unwrap();
/// drop(events_tx);
/// controller.run(events_rx).await;
/// # }
/// ```
pub struct PageController {
    state: SharedState,
    submission: SubmissionState,
    selection: SelectionManager,
    renderer: ResultRenderer,
    api: Arc<dyn AnalysisApi>,
    view: Arc<dyn PageView>,
    texts: UiTexts,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    outstanding: usize,
}

impl PageController {
    pub fn new(
        state: SharedState,
        selection: Selection,
        api: Arc<dyn AnalysisApi>,
        preferences: BestEffortPreferences,
        view: Arc<dyn PageView>,
        player: Arc<dyn AudioPlayer>,
        texts: UiTexts,
    ) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            state,
            submission: SubmissionState::Idle,
            selection: SelectionManager::new(selection, preferences, texts.clone()),
            renderer: ResultRenderer::new(Arc::clone(&view), player, texts.clone()),
            api,
            view,
            texts,
            completion_tx,
            completion_rx,
            outstanding: 0,
        }
    }

    pub fn selection(&self) -> &Selection {
        self.selection.selection()
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run until `events` is closed *and* every spawned request has settled.
    pub async fn run(mut self, mut events: mpsc::Receiver<PageEvent>) {
        let mut events_open = true;

        loop {
            if !events_open && self.outstanding == 0 {
                break;
            }

            tokio::select! {
                biased;

                event = events.recv(), if events_open => match event {
                    Some(event) => self.handle_event(event),
                    None => events_open = false,
                },
                Some(done) = self.completion_rx.recv(), if self.outstanding > 0 => {
                    self.outstanding -= 1;
                    self.handle_completion(done);
                }
                else => break,
            }
        }

        log::info!("controller: event channel closed, shutting down");
    }

    // -----------------------------------------------------------------------
    // Event handlers
    // -----------------------------------------------------------------------

    fn handle_event(&mut self, event: PageEvent) {
        let busy = self.submission.is_busy();
        match event {
            PageEvent::RecognitionLanguageChosen(code) => {
                self.selection.set_recognition_language(&code);
            }
            PageEvent::AudioLanguageChosen(code) => {
                let notice = self.selection.set_audio_language(&code, self.view.as_ref());
                self.spawn_tracked(
                    async move {
                        notice.await;
                        Completion::Notified
                    },
                    Completion::Notified,
                );
            }
            PageEvent::UiLanguageChosen(code) => {
                log::info!("controller: changing UI language to {code}");
                let request = self.selection.ui_language_request(&code);
                let fallback = Completion::UiLanguage {
                    code: code.clone(),
                    outcome: Err(ApiError::Request("language task aborted".into())),
                };
                self.spawn_tracked(
                    async move {
                        Completion::UiLanguage {
                            code,
                            outcome: request.await,
                        }
                    },
                    fallback,
                );
            }
            PageEvent::FilesPicked(files) => self.offer_files(files, FileSource::Picker, busy),
            PageEvent::DragEntered => self.view.set_drop_highlight(true),
            PageEvent::DragLeft => self.view.set_drop_highlight(false),
            PageEvent::FilesDropped(files) => {
                self.view.set_drop_highlight(false);
                self.offer_files(files, FileSource::Drop, busy);
            }
            PageEvent::SubmitRequested => self.submit(),
        }
    }

    fn offer_files(&mut self, files: Vec<FileCandidate>, source: FileSource, busy: bool) {
        let offered = self
            .selection
            .offer_files(files, source, self.view.as_ref(), busy);
        // Audio checks still running for the previous result are now stale.
        if offered.is_some() && !busy {
            self.renderer.invalidate();
            self.publish_audio();
        }
    }

    fn submit(&mut self) {
        if self.submission.is_busy() {
            log::info!("controller: already submitting, ignoring duplicate submission");
            return;
        }

        let Some(file) = self.selection.selection().file().cloned() else {
            self.fail(SubmissionError::NoFileSelected);
            self.return_to_idle();
            return;
        };

        if let ValidationOutcome::Rejected(reason) = file.validate() {
            log::warn!("controller: selected file no longer valid: {reason}");
            self.view.show_error(reason.message(&self.texts));
            return;
        }

        let generation = self.renderer.begin_cycle();
        self.view.hide_transient_messages();
        self.view.set_progress_visible(true);
        self.view.set_submit_enabled(false);

        let selection = self.selection.selection();
        let request = AnalyzeRequest::new(
            file,
            selection.recognition_language(),
            selection.audio_language(),
        );

        self.set_submission(SubmissionState::Submitting);
        self.publish(|st| {
            st.submissions += 1;
            st.audio = Default::default();
        });

        log::info!(
            "controller: starting analysis (generation {generation}), language={:?}, audio_language={}",
            request.language,
            request.audio_language
        );

        let api = Arc::clone(&self.api);
        self.spawn_tracked(
            async move { Completion::Analysis(api.analyze(request).await) },
            Completion::Analysis(Err(ApiError::Request("analysis task aborted".into()))),
        );
    }

    fn handle_completion(&mut self, done: Completion) {
        match done {
            Completion::Analysis(outcome) => self.finish_submission(outcome),
            Completion::Probe {
                generation,
                url,
                outcome,
            } => {
                if let Some(load) = self.renderer.probe_finished(generation, url, outcome) {
                    self.start_load(load);
                }
                self.publish_audio();
            }
            Completion::AudioLoad {
                generation,
                outcome,
            } => {
                self.renderer.load_finished(generation, outcome);
                self.publish_audio();
            }
            Completion::UiLanguage { code, outcome } => match outcome {
                Ok(body) => {
                    log::info!("controller: UI language changed to {code}: {body}");
                    self.view.reload();
                }
                Err(e) => log::error!("controller: error changing UI language: {e}"),
            },
            Completion::Notified => {}
        }
    }

    fn finish_submission(&mut self, outcome: Result<AnalysisResult, ApiError>) {
        if !self.submission.is_busy() {
            log::warn!("controller: analysis completion without a submission in flight");
            return;
        }

        match outcome {
            Err(e) => self.fail(SubmissionError::Transport(e)),
            Ok(result) if !result.success => {
                self.fail(SubmissionError::Server(
                    result.error_message().map(str::to_string),
                ));
            }
            Ok(result) => {
                log::info!("controller: analysis succeeded");
                let probe = self.renderer.render(&result);
                self.set_submission(SubmissionState::Succeeded(result));
                if let Some(probe) = probe {
                    self.start_probe(probe);
                }
                self.publish_audio();
            }
        }

        // Single exit from Submitting for every outcome.
        self.view.set_progress_visible(false);
        self.view.set_submit_enabled(true);
        self.return_to_idle();
    }

    // -----------------------------------------------------------------------
    // Audio sub-protocol
    // -----------------------------------------------------------------------

    fn start_probe(&mut self, probe: AudioProbe) {
        let api = Arc::clone(&self.api);
        let fallback = Completion::Probe {
            generation: probe.generation,
            url: probe.url.clone(),
            outcome: Err(ApiError::Request("probe task aborted".into())),
        };
        self.spawn_tracked(
            async move {
                let outcome = api.probe(&probe.url).await;
                Completion::Probe {
                    generation: probe.generation,
                    url: probe.url,
                    outcome,
                }
            },
            fallback,
        );
    }

    fn start_load(&mut self, load: AudioLoad) {
        let player = self.renderer.player();
        let fallback = Completion::AudioLoad {
            generation: load.generation,
            outcome: Err(AudioLoadError("audio load task aborted".into())),
        };
        self.spawn_tracked(
            async move {
                Completion::AudioLoad {
                    generation: load.generation,
                    outcome: player.load(&load.url).await,
                }
            },
            fallback,
        );
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Spawn `work` and count it as outstanding until its completion is
    /// delivered.  `fallback` is delivered instead if the task panics, so
    /// [`run`](Self::run) never waits on a completion that cannot arrive.
    fn spawn_tracked<F>(&mut self, work: F, fallback: Completion)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        self.outstanding += 1;
        let tx = self.completion_tx.clone();
        let task = tokio::spawn(work);
        tokio::spawn(async move {
            let done = match task.await {
                Ok(done) => done,
                Err(e) => {
                    log::error!("controller: spawned task failed: {e}");
                    fallback
                }
            };
            let _ = tx.send(done);
        });
    }

    fn fail(&mut self, error: SubmissionError) {
        let message = error.user_message(&self.texts);
        log::error!("controller: submission failed: {error}");
        self.view.show_error(&message);
        self.set_submission(SubmissionState::Failed(error));
    }

    /// Leave a terminal state, keeping it as the last outcome.
    fn return_to_idle(&mut self) {
        let previous = std::mem::replace(&mut self.submission, SubmissionState::Idle);
        log::debug!("controller: {} → Idle", previous.label());
        self.publish(|st| {
            st.submission = SubmissionState::Idle;
            st.last_outcome = Some(previous);
        });
    }

    fn set_submission(&mut self, next: SubmissionState) {
        log::debug!("controller: {} → {}", self.submission.label(), next.label());
        self.submission = next.clone();
        self.publish(|st| st.submission = next);
    }

    fn publish_audio(&self) {
        let audio = self.renderer.audio();
        self.publish(|st| st.audio = audio);
    }

    fn publish(&self, update: impl FnOnce(&mut super::state::PageState)) {
        match self.state.lock() {
            Ok(mut st) => update(&mut st),
            Err(e) => log::error!("controller: page state lock poisoned: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
