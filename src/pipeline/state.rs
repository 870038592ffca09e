//! Submission state machine and the shared page snapshot.
//!
//! [`SubmissionState`] drives the controller.  [`AudioVerification`] tracks
//! the narration sub-protocol of one result.  [`PageState`] is what outside
//! observers read through [`SharedState`]; only the controller writes it.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::api::{AnalysisResult, ApiError};
use crate::config::UiTexts;

// ---------------------------------------------------------------------------
// SubmissionError
// ---------------------------------------------------------------------------

/// Why a submission cycle failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("no file selected")]
    NoFileSelected,

    #[error("transport failure: {0}")]
    Transport(ApiError),

    /// The backend answered `success: false`.
    #[error("server reported: {}", .0.as_deref().unwrap_or("no message"))]
    Server(Option<String>),
}

impl SubmissionError {
    /// Message for the error banner.
    ///
    /// ```
    /// use image_analysis::config::UiTexts;
    /// use image_analysis::pipeline::SubmissionError;
    ///
    /// let err = SubmissionError::Server(Some("unsupported language".into()));
    /// assert_eq!(err.user_message(&UiTexts::default()), "Error: unsupported language");
    /// ```
    pub fn user_message(&self, texts: &UiTexts) -> String {
        match self {
            SubmissionError::NoFileSelected => texts.no_file_error.clone(),
            SubmissionError::Transport(e) => format!("{} {e}", texts.network_error),
            SubmissionError::Server(message) => format!(
                "{} {}",
                texts.error_prefix,
                message.as_deref().unwrap_or(&texts.analysis_failed)
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// SubmissionState
// ---------------------------------------------------------------------------

/// Lifecycle of one submission.
///
/// ```text
/// Idle ──submit, valid file──▶ Submitting ──success=true──▶ Succeeded ─┐
///  ▲  ──submit, no file──▶ Failed ─┐       ──error──────▶ Failed ─────┤
///  └───────────────────────────────┴───────────────────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded(AnalysisResult),
    Failed(SubmissionError),
}

impl SubmissionState {
    /// `true` while a request is outstanding; submit is ignored then.
    pub fn is_busy(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "Idle",
            SubmissionState::Submitting => "Submitting",
            SubmissionState::Succeeded(_) => "Succeeded",
            SubmissionState::Failed(_) => "Failed",
        }
    }
}

// ---------------------------------------------------------------------------
// AudioVerification
// ---------------------------------------------------------------------------

/// Narration availability for the current result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioVerification {
    #[default]
    NotAttempted,
    Verifying,
    Verified,
    Unreachable,
    LoadError,
}

// ---------------------------------------------------------------------------
// PageState
// ---------------------------------------------------------------------------

/// Snapshot of the controller for observers.
#[derive(Debug, Clone, Default)]
pub struct PageState {
    /// Current submission phase.
    pub submission: SubmissionState,

    /// Narration status of the most recent cycle.
    pub audio: AudioVerification,

    /// Terminal state (`Succeeded` / `Failed`) of the most recent cycle,
    /// kept after the controller has returned to `Idle`.
    pub last_outcome: Option<SubmissionState>,

    /// Number of network submissions started.
    pub submissions: u64,
}

/// Thread-safe handle to [`PageState`].  Do not hold the lock across
/// `.await` points.
pub type SharedState = Arc<Mutex<PageState>>;

pub fn new_shared_state() -> SharedState {
    Arc::new(Mutex::new(PageState::default()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
