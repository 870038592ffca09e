//! Result Renderer — turns a successful [`AnalysisResult`] into visible state
//! and runs the narration verification sub-protocol.
//!
//! ```text
//! no audio_url ─────────────────────────▶ NotAttempted  (player hidden)
//! audio_url ──▶ Verifying ──HEAD non-2xx / error──▶ Unreachable (hidden)
//!                         ──HEAD 2xx──▶ load ──loaded──▶ Verified  (shown)
//!                                            ──error───▶ LoadError (hidden)
//! ```
//!
//! The renderer never performs I/O itself: [`render`](ResultRenderer::render)
//! and [`probe_finished`](ResultRenderer::probe_finished) hand back tickets
//! that the controller turns into spawned tasks.  Every ticket carries the
//! generation of the cycle that issued it; completions from an older
//! generation are dropped.

use std::sync::Arc;

use crate::api::{AnalysisResult, ApiError};
use crate::config::UiTexts;
use crate::view::{text_to_markup, AudioLoadError, AudioPlayer, PageView};

use super::state::AudioVerification;

/// Probe to issue for the current cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioProbe {
    pub generation: u64,
    pub url: String,
}

/// Load to start after a successful probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioLoad {
    pub generation: u64,
    pub url: String,
}

pub struct ResultRenderer {
    view: Arc<dyn PageView>,
    player: Arc<dyn AudioPlayer>,
    texts: UiTexts,
    generation: u64,
    audio: AudioVerification,
}

impl ResultRenderer {
    pub fn new(view: Arc<dyn PageView>, player: Arc<dyn AudioPlayer>, texts: UiTexts) -> Self {
        Self {
            view,
            player,
            texts,
            generation: 0,
            audio: AudioVerification::NotAttempted,
        }
    }

    pub fn audio(&self) -> AudioVerification {
        self.audio
    }

    pub fn player(&self) -> Arc<dyn AudioPlayer> {
        Arc::clone(&self.player)
    }

    /// Discard the previous cycle's narration state.  Anything still in
    /// flight for it becomes stale.
    pub fn begin_cycle(&mut self) -> u64 {
        self.generation += 1;
        self.audio = AudioVerification::NotAttempted;
        self.view.set_audio_player_visible(false);
        self.generation
    }

    /// Make any in-flight probe or load stale without touching the view.
    /// Used when the user picks a new file after a result was shown.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        if self.audio == AudioVerification::Verifying {
            log::debug!("render: abandoning audio verification for new selection");
            self.audio = AudioVerification::NotAttempted;
        }
    }

    /// Apply a successful result.  Returns the probe to run, if any.
    pub fn render(&mut self, result: &AnalysisResult) -> Option<AudioProbe> {
        if let Some(name) = result.detected_language_name() {
            self.view.show_detected_language(name);
        }

        // An absent text leaves the previous content in place.
        if let Some(text) = result.text() {
            self.view.set_result_markup(&text_to_markup(text));
        }

        let probe = match result.audio_url() {
            None => {
                log::info!("render: no audio URL in response");
                self.audio = AudioVerification::NotAttempted;
                self.view.set_audio_player_visible(false);
                self.view
                    .show_audio_debug("Audio Debug:\nStatus: No audio URL provided");
                None
            }
            Some(url) => {
                log::info!("render: audio URL received: {url}");
                self.audio = AudioVerification::Verifying;
                self.view.show_audio_debug(&format!(
                    "Audio Debug:\nURL: {url}\nLanguage: {}\nStatus: Loading...",
                    result.audio_language().unwrap_or("Not specified")
                ));
                Some(AudioProbe {
                    generation: self.generation,
                    url: url.to_string(),
                })
            }
        };

        self.view.set_result_visible(true);
        self.view.show_success(&self.texts.analysis_success);
        probe
    }

    /// Handle the `HEAD` probe's answer.  Returns the load to start when the
    /// resource is reachable.
    pub fn probe_finished(
        &mut self,
        generation: u64,
        url: String,
        outcome: Result<u16, ApiError>,
    ) -> Option<AudioLoad> {
        if !self.is_current(generation) {
            log::debug!("render: discarding stale probe for {url} (generation {generation})");
            return None;
        }

        match outcome {
            Ok(status) if (200..300).contains(&status) => {
                self.player.reset();
                Some(AudioLoad { generation, url })
            }
            Ok(status) => {
                self.mark_unreachable(&format!("Audio URL not accessible: {status}"));
                None
            }
            Err(e) => {
                self.mark_unreachable(&e.to_string());
                None
            }
        }
    }

    /// Handle the player's load outcome.
    pub fn load_finished(&mut self, generation: u64, outcome: Result<(), AudioLoadError>) {
        if !self.is_current(generation) {
            log::debug!("render: discarding stale audio load (generation {generation})");
            return;
        }

        match outcome {
            Ok(()) => {
                log::info!("render: audio loaded successfully");
                self.audio = AudioVerification::Verified;
                self.view.set_audio_player_visible(true);
                self.view.append_audio_debug("Status: ✅ Loaded successfully");
            }
            Err(e) => {
                log::error!("render: {e}");
                self.audio = AudioVerification::LoadError;
                self.view.set_audio_player_visible(false);
                self.view.append_audio_debug("Status: ❌ Failed to load");
            }
        }
    }

    fn mark_unreachable(&mut self, detail: &str) {
        log::error!("render: audio URL test failed: {detail}");
        self.audio = AudioVerification::Unreachable;
        self.view
            .append_audio_debug(&format!("Status: ❌ URL test failed: {detail}"));
        self.view.set_audio_player_visible(false);
    }

    /// A completion counts only for the live cycle and only once.
    fn is_current(&self, generation: u64) -> bool {
        generation == self.generation && self.audio == AudioVerification::Verifying
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
