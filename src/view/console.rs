//! Terminal rendition of the page for headless runs.
//!
//! Banners, results and the audio debug panel are printed to stdout as they
//! become visible; control-state changes go to the log.

use std::sync::Mutex;

use crate::selection::FileCandidate;

use super::PageView;

#[derive(Debug, Default)]
struct ConsoleState {
    audio_debug: Vec<String>,
    player_visible: bool,
}

/// [`PageView`] that writes to the terminal.
#[derive(Debug, Default)]
pub struct ConsoleView {
    state: Mutex<ConsoleState>,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the audio player ended up visible.
    pub fn player_visible(&self) -> bool {
        self.state.lock().map(|s| s.player_visible).unwrap_or(false)
    }

    /// Lines currently in the audio debug panel.
    pub fn audio_debug(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| s.audio_debug.clone())
            .unwrap_or_default()
    }
}

impl PageView for ConsoleView {
    fn set_submit_enabled(&self, enabled: bool) {
        log::debug!("view: submit {}", if enabled { "enabled" } else { "disabled" });
    }

    fn set_progress_visible(&self, visible: bool) {
        if visible {
            log::info!("analysing...");
        }
    }

    fn show_error(&self, message: &str) {
        println!("✗ {message}");
    }

    fn show_success(&self, message: &str) {
        println!("✓ {message}");
    }

    fn hide_transient_messages(&self) {
        if let Ok(mut st) = self.state.lock() {
            st.audio_debug.clear();
        }
    }

    fn show_file_summary(&self, label: &str, file: &FileCandidate) {
        println!(
            "{label} {}  (Size: {} MB | Type: {})",
            file.name,
            file.size_mb(),
            file.media_type
        );
    }

    fn set_drop_highlight(&self, active: bool) {
        log::debug!("view: drop highlight {active}");
    }

    fn mark_audio_language(&self, code: &str) {
        log::info!("audio language: {code}");
    }

    fn show_detected_language(&self, name: &str) {
        println!("Detected language: {name}");
    }

    fn set_result_markup(&self, markup: &str) {
        let text = markup
            .replace("<br>", "\n")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&amp;", "&");
        println!("{text}");
    }

    fn set_result_visible(&self, _visible: bool) {}

    fn show_audio_debug(&self, text: &str) {
        if let Ok(mut st) = self.state.lock() {
            st.audio_debug = text.lines().map(str::to_string).collect();
        }
        for line in text.lines() {
            println!("  [audio] {line}");
        }
    }

    fn append_audio_debug(&self, line: &str) {
        if let Ok(mut st) = self.state.lock() {
            st.audio_debug.push(line.to_string());
        }
        println!("  [audio] {line}");
    }

    fn set_audio_player_visible(&self, visible: bool) {
        if let Ok(mut st) = self.state.lock() {
            st.player_visible = visible;
        }
    }

    fn reload(&self) {
        log::info!("view: page reload requested");
    }
}
