//! Backend access for the analysis page.
//!
//! * [`AnalysisApi`] — `POST /analyze` and the audio `HEAD` probe.
//! * [`PreferencesApi`] — the two session-language endpoints.
//! * [`HttpBackend`] — `reqwest` implementation of both.
//! * [`BestEffortPreferences`] — fire-and-forget wrapper that logs failures.
//! * [`HttpAudioPlayer`] — narration loader for headless runs.
//! * [`AnalyzeRequest`] / [`AnalysisResult`] — the analysis wire types.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use image_analysis::api::{AnalysisApi, AnalyzeRequest, HttpBackend};
//! use image_analysis::config::AppConfig;
//! use image_analysis::selection::FileCandidate;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let backend = HttpBackend::from_config(&config.backend).unwrap();
//!     let file = FileCandidate::from_path("report.jpg".as_ref()).unwrap();
//!
//!     let result = backend
//!         .analyze(AnalyzeRequest::new(file, "auto", "en-IN"))
//!         .await
//!         .unwrap();
//!     println!("{:?}", result.text());
//! }
//! ```

pub mod audio;
pub mod client;
pub mod notify;
pub mod request;

#[cfg(test)]
pub mod mock;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use audio::HttpAudioPlayer;
pub use client::{AnalysisApi, ApiError, HttpBackend, PreferencesApi};
pub use notify::BestEffortPreferences;
pub use request::{AnalysisResult, AnalyzeRequest};
