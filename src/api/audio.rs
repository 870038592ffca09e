//! HTTP-backed narration player for headless runs.
//!
//! "Loading" means downloading the whole resource: a 2xx answer with a
//! non-empty body is a successful load, anything else a load error.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::view::{AudioLoadError, AudioPlayer};

use super::client::HttpBackend;

pub struct HttpAudioPlayer {
    backend: HttpBackend,
    source: Mutex<Option<String>>,
}

impl HttpAudioPlayer {
    pub fn new(backend: HttpBackend) -> Self {
        Self {
            backend,
            source: Mutex::new(None),
        }
    }

    /// The source most recently assigned, if any.
    pub fn source(&self) -> Option<String> {
        self.source.lock().ok().and_then(|s| s.clone())
    }
}

#[async_trait]
impl AudioPlayer for HttpAudioPlayer {
    fn reset(&self) {
        if let Ok(mut source) = self.source.lock() {
            *source = None;
        }
    }

    async fn load(&self, url: &str) -> Result<(), AudioLoadError> {
        if let Ok(mut source) = self.source.lock() {
            *source = Some(url.to_string());
        }

        let resolved = self
            .backend
            .resolve(url)
            .map_err(|e| AudioLoadError(e.to_string()))?;
        let response = self
            .backend
            .client()
            .get(resolved)
            .send()
            .await
            .map_err(|e| AudioLoadError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AudioLoadError(format!("status {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AudioLoadError(e.to_string()))?;
        if bytes.is_empty() {
            return Err(AudioLoadError("empty audio resource".into()));
        }

        log::debug!("audio: loaded {} bytes from {url}", bytes.len());
        Ok(())
    }
}
