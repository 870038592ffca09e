//! Selection Manager — owns the language choices and the chosen file.
//!
//! Both file entry points (picker and drop) go through
//! [`SelectionManager::offer_files`], which runs the one validation routine
//! in [`super::validate`].

use std::future::Future;
use std::sync::Arc;

use crate::api::{ApiError, BestEffortPreferences};
use crate::config::UiTexts;
use crate::view::PageView;

use super::validate::{FileCandidate, ValidationOutcome};

/// Recognition language value meaning "let the backend detect it".
pub const AUTO_LANGUAGE: &str = "auto";

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Current user selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    recognition_language: String,
    audio_language: String,
    file: Option<FileCandidate>,
}

impl Selection {
    /// Fresh selection: auto-detect recognition, no file.
    pub fn new(audio_language: impl Into<String>) -> Self {
        Self {
            recognition_language: AUTO_LANGUAGE.into(),
            audio_language: audio_language.into(),
            file: None,
        }
    }

    pub fn recognition_language(&self) -> &str {
        &self.recognition_language
    }

    pub fn audio_language(&self) -> &str {
        &self.audio_language
    }

    pub fn file(&self) -> Option<&FileCandidate> {
        self.file.as_ref()
    }
}

/// Where a file came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSource {
    Picker,
    Drop,
}

// ---------------------------------------------------------------------------
// SelectionManager
// ---------------------------------------------------------------------------

pub struct SelectionManager {
    selection: Selection,
    preferences: BestEffortPreferences,
    texts: UiTexts,
}

impl SelectionManager {
    pub fn new(selection: Selection, preferences: BestEffortPreferences, texts: UiTexts) -> Self {
        Self {
            selection,
            preferences,
            texts,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn set_recognition_language(&mut self, code: &str) {
        log::debug!("selection: recognition language = {code}");
        self.selection.recognition_language = code.to_string();
    }

    /// Store the narration language and mark its control.  Returns the
    /// backend notification, whose outcome is only logged.
    pub fn set_audio_language(
        &mut self,
        code: &str,
        view: &dyn PageView,
    ) -> impl Future<Output = ()> + Send + 'static {
        log::debug!("selection: audio language = {code}");
        self.selection.audio_language = code.to_string();
        view.mark_audio_language(code);
        self.preferences.audio_language_notice(code)
    }

    /// Request for `POST /set_ui_language`.  The caller decides what a
    /// successful answer means for the page.
    pub fn ui_language_request(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<serde_json::Value, ApiError>> + Send + 'static {
        let api = Arc::clone(self.preferences.inner());
        let code = code.to_string();
        async move { api.set_ui_language(&code).await }
    }

    /// Offer the files from one picker change or drop.  Only the first file
    /// counts; an empty list is ignored and returns `None`.
    ///
    /// `busy` is true while a submission is in flight: the submit control is
    /// left alone then, since the controller re-enables it on completion.
    pub fn offer_files(
        &mut self,
        files: Vec<FileCandidate>,
        source: FileSource,
        view: &dyn PageView,
        busy: bool,
    ) -> Option<ValidationOutcome> {
        let file = files.into_iter().next()?;
        Some(self.select_file(file, source, view, busy))
    }

    fn select_file(
        &mut self,
        file: FileCandidate,
        source: FileSource,
        view: &dyn PageView,
        busy: bool,
    ) -> ValidationOutcome {
        log::debug!(
            "selection: validating {} ({}, {} bytes) from {source:?}",
            file.name,
            file.media_type,
            file.size()
        );

        let outcome = file.validate();
        match &outcome {
            ValidationOutcome::Accepted => {
                view.show_file_summary(&self.texts.selected_file, &file);
                if !busy {
                    view.set_submit_enabled(true);
                }
                view.hide_transient_messages();
                self.selection.file = Some(file);
            }
            ValidationOutcome::Rejected(reason) => {
                log::info!("selection: rejected {}: {reason}", file.name);
                self.selection.file = None;
                view.show_error(reason.message(&self.texts));
                if !busy {
                    view.set_submit_enabled(false);
                }
            }
        }
        outcome
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
