//! Submission lifecycle for the image-analysis page.
//!
//! This module ties selection, the backend client and the view together and
//! exposes the shared state that observers read.
//!
//! # Architecture
//!
//! ```text
//! PageEvent (mpsc)
//!        │
//!        ▼
//! PageController::run()  ← async tokio task
//!        │
//!        ├─ language / file events → SelectionManager
//!        │
//!        └─ SubmitRequested
//!              │
//!              ├─ spawn analyze                 → Submitting
//!              ├─ ResultRenderer::render        → Succeeded / Failed
//!              └─ spawn HEAD probe, player load → AudioVerification
//!
//! SharedState (Arc<Mutex<PageState>>) ←─── read by observers
//! ```
//!
//! Spawned work reports back to the loop through an internal channel, so the
//! loop is the only writer of page state.

pub mod controller;
pub mod renderer;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use controller::{PageController, PageEvent};
pub use renderer::{AudioLoad, AudioProbe, ResultRenderer};
pub use state::{
    new_shared_state, AudioVerification, PageState, SharedState, SubmissionError,
    SubmissionState,
};
