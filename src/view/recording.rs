//! Recording test doubles for [`PageView`] and [`AudioPlayer`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::selection::FileCandidate;

use super::{AudioLoadError, AudioPlayer, PageView};

/// One call made on the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOp {
    SubmitEnabled(bool),
    ProgressVisible(bool),
    Error(String),
    Success(String),
    HideTransient,
    FileSummary(String),
    DropHighlight(bool),
    AudioLanguageMarked(String),
    DetectedLanguage(String),
    ResultMarkup(String),
    ResultVisible(bool),
    AudioDebug(String),
    AudioDebugAppend(String),
    AudioPlayerVisible(bool),
    Reload,
}

/// Records every call in order.
#[derive(Debug, Default)]
pub struct RecordingView {
    ops: Mutex<Vec<ViewOp>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<ViewOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn count(&self, op: &ViewOp) -> usize {
        self.ops.lock().unwrap().iter().filter(|o| *o == op).count()
    }

    pub fn contains(&self, op: &ViewOp) -> bool {
        self.count(op) > 0
    }

    pub fn last_error(&self) -> Option<String> {
        self.ops.lock().unwrap().iter().rev().find_map(|op| match op {
            ViewOp::Error(m) => Some(m.clone()),
            _ => None,
        })
    }

    pub fn last_success(&self) -> Option<String> {
        self.ops.lock().unwrap().iter().rev().find_map(|op| match op {
            ViewOp::Success(m) => Some(m.clone()),
            _ => None,
        })
    }

    /// Last explicit player visibility, `None` if never set.
    pub fn player_visible(&self) -> Option<bool> {
        self.ops.lock().unwrap().iter().rev().find_map(|op| match op {
            ViewOp::AudioPlayerVisible(v) => Some(*v),
            _ => None,
        })
    }

    pub fn submit_enabled(&self) -> Option<bool> {
        self.ops.lock().unwrap().iter().rev().find_map(|op| match op {
            ViewOp::SubmitEnabled(v) => Some(*v),
            _ => None,
        })
    }

    /// Every line appended to the audio debug panel.
    pub fn debug_appends(&self) -> Vec<String> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| match op {
                ViewOp::AudioDebugAppend(l) => Some(l.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, op: ViewOp) {
        self.ops.lock().unwrap().push(op);
    }
}

impl PageView for RecordingView {
    fn set_submit_enabled(&self, enabled: bool) {
        self.push(ViewOp::SubmitEnabled(enabled));
    }

    fn set_progress_visible(&self, visible: bool) {
        self.push(ViewOp::ProgressVisible(visible));
    }

    fn show_error(&self, message: &str) {
        self.push(ViewOp::Error(message.to_string()));
    }

    fn show_success(&self, message: &str) {
        self.push(ViewOp::Success(message.to_string()));
    }

    fn hide_transient_messages(&self) {
        self.push(ViewOp::HideTransient);
    }

    fn show_file_summary(&self, _label: &str, file: &FileCandidate) {
        self.push(ViewOp::FileSummary(file.name.clone()));
    }

    fn set_drop_highlight(&self, active: bool) {
        self.push(ViewOp::DropHighlight(active));
    }

    fn mark_audio_language(&self, code: &str) {
        self.push(ViewOp::AudioLanguageMarked(code.to_string()));
    }

    fn show_detected_language(&self, name: &str) {
        self.push(ViewOp::DetectedLanguage(name.to_string()));
    }

    fn set_result_markup(&self, markup: &str) {
        self.push(ViewOp::ResultMarkup(markup.to_string()));
    }

    fn set_result_visible(&self, visible: bool) {
        self.push(ViewOp::ResultVisible(visible));
    }

    fn show_audio_debug(&self, text: &str) {
        self.push(ViewOp::AudioDebug(text.to_string()));
    }

    fn append_audio_debug(&self, line: &str) {
        self.push(ViewOp::AudioDebugAppend(line.to_string()));
    }

    fn set_audio_player_visible(&self, visible: bool) {
        self.push(ViewOp::AudioPlayerVisible(visible));
    }

    fn reload(&self) {
        self.push(ViewOp::Reload);
    }
}

/// Player whose load outcome is fixed up front.
pub struct ScriptedPlayer {
    outcome: Result<(), AudioLoadError>,
    resets: AtomicUsize,
    loads: Mutex<Vec<String>>,
}

impl ScriptedPlayer {
    pub fn loads_ok() -> Self {
        Self::with_outcome(Ok(()))
    }

    pub fn fails_to_load() -> Self {
        Self::with_outcome(Err(AudioLoadError("decode error".into())))
    }

    fn with_outcome(outcome: Result<(), AudioLoadError>) -> Self {
        Self {
            outcome,
            resets: AtomicUsize::new(0),
            loads: Mutex::new(Vec::new()),
        }
    }

    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }

    pub fn loads(&self) -> Vec<String> {
        self.loads.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioPlayer for ScriptedPlayer {
    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }

    async fn load(&self, url: &str) -> Result<(), AudioLoadError> {
        self.loads.lock().unwrap().push(url.to_string());
        self.outcome.clone()
    }
}
