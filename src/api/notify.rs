//! Best-effort preference notifier.
//!
//! Wraps any [`PreferencesApi`] for calls whose outcome the user never sees:
//! failures are logged and swallowed, success responses are logged.

use std::future::Future;
use std::sync::Arc;

use super::client::PreferencesApi;

/// Fire-and-forget front for a [`PreferencesApi`].
#[derive(Clone)]
pub struct BestEffortPreferences {
    inner: Arc<dyn PreferencesApi>,
}

impl BestEffortPreferences {
    pub fn new(inner: Arc<dyn PreferencesApi>) -> Self {
        Self { inner }
    }

    /// The wrapped API, for calls whose outcome does matter.
    pub fn inner(&self) -> &Arc<dyn PreferencesApi> {
        &self.inner
    }

    /// Tell the backend about a new default narration language.
    ///
    /// Never fails.
    pub async fn notify_audio_language(&self, code: &str) {
        match self.inner.set_audio_language(code).await {
            Ok(body) => log::info!("audio language changed: {body}"),
            Err(e) => log::warn!("error changing audio language to {code}: {e}"),
        }
    }

    /// Owned version of [`notify_audio_language`](Self::notify_audio_language)
    /// that the caller can spawn and track.
    pub fn audio_language_notice(&self, code: &str) -> impl Future<Output = ()> + Send + 'static {
        let this = self.clone();
        let code = code.to_string();
        async move { this.notify_audio_language(&code).await }
    }
}
