//! Presentation handles.
//!
//! The page is a fixed set of surfaces: submit control, progress indicator,
//! error and success banners, file summary, drop zone, audio-language
//! buttons, language-info panel, result text, audio debug panel and the
//! audio player.  [`PageView`] exposes exactly those; [`AudioPlayer`] is the
//! media element behind the player.
//!
//! Implementations only render.  Every decision about *what* to show is made
//! by the pipeline.

pub mod console;
pub mod markup;

#[cfg(test)]
pub mod recording;

use async_trait::async_trait;
use thiserror::Error;

use crate::selection::FileCandidate;

pub use console::ConsoleView;
pub use markup::text_to_markup;

/// The page's visible surfaces.
pub trait PageView: Send + Sync {
    fn set_submit_enabled(&self, enabled: bool);

    fn set_progress_visible(&self, visible: bool);

    /// Show `message` in the error banner and hide the success banner.
    fn show_error(&self, message: &str);

    /// Show `message` in the success banner and hide the error banner.
    fn show_success(&self, message: &str);

    /// Hide error, success, result, language-info and audio-debug surfaces.
    /// Idempotent.
    fn hide_transient_messages(&self);

    /// Describe the accepted file; `label` is the localised prefix.
    fn show_file_summary(&self, label: &str, file: &FileCandidate);

    fn set_drop_highlight(&self, active: bool);

    /// Mark the control for `code` as selected and every other one as not.
    fn mark_audio_language(&self, code: &str);

    /// Fill in the detected language and reveal the language-info panel.
    fn show_detected_language(&self, name: &str);

    /// Replace the result text with already-converted markup.
    fn set_result_markup(&self, markup: &str);

    fn set_result_visible(&self, visible: bool);

    /// Replace the audio debug panel's content and reveal it.
    fn show_audio_debug(&self, text: &str);

    /// Append one line to the audio debug panel.
    fn append_audio_debug(&self, line: &str);

    fn set_audio_player_visible(&self, visible: bool);

    /// Full page reload.
    fn reload(&self);
}

/// The narration failed to load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("audio failed to load: {0}")]
pub struct AudioLoadError(pub String);

/// Media element behind the audio player.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Drop the current source so nothing from a previous cycle can play.
    fn reset(&self);

    /// Assign `url` and load it.  Resolves once, with either the loaded-data
    /// outcome or the error outcome.
    async fn load(&self, url: &str) -> Result<(), AudioLoadError>;
}
