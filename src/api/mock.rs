//! Scripted backend and a one-shot loopback server used by unit tests
//! across the crate.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use super::client::{AnalysisApi, ApiError, PreferencesApi};
use super::request::{AnalysisResult, AnalyzeRequest};

/// Returns pre-configured answers and records every call.
pub struct ScriptedBackend {
    analysis: Result<AnalysisResult, ApiError>,
    analysis_delay: Duration,
    probe: Result<u16, ApiError>,
    preferences_fail: bool,
    preferences_delay: Duration,
    analyze_calls: Mutex<Vec<AnalyzeRequest>>,
    probe_calls: Mutex<Vec<String>>,
    audio_language_calls: Mutex<Vec<String>>,
    ui_language_calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    /// Succeeds with an empty result, probes answer 200.
    pub fn new() -> Self {
        Self {
            analysis: Ok(AnalysisResult {
                success: true,
                ..AnalysisResult::default()
            }),
            analysis_delay: Duration::ZERO,
            probe: Ok(200),
            preferences_fail: false,
            preferences_delay: Duration::ZERO,
            analyze_calls: Mutex::new(Vec::new()),
            probe_calls: Mutex::new(Vec::new()),
            audio_language_calls: Mutex::new(Vec::new()),
            ui_language_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_analysis(mut self, result: AnalysisResult) -> Self {
        self.analysis = Ok(result);
        self
    }

    pub fn with_analysis_error(mut self, error: ApiError) -> Self {
        self.analysis = Err(error);
        self
    }

    /// Hold every analysis response back for `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.analysis_delay = delay;
        self
    }

    pub fn with_probe(mut self, probe: Result<u16, ApiError>) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_failing_preferences(mut self) -> Self {
        self.preferences_fail = true;
        self
    }

    /// Hold every preference answer back for `delay`.  The call is recorded
    /// only once the delay has passed.
    pub fn with_preferences_delay(mut self, delay: Duration) -> Self {
        self.preferences_delay = delay;
        self
    }

    pub fn analyze_calls(&self) -> Vec<AnalyzeRequest> {
        self.analyze_calls.lock().unwrap().clone()
    }

    pub fn probe_calls(&self) -> Vec<String> {
        self.probe_calls.lock().unwrap().clone()
    }

    pub fn audio_language_calls(&self) -> Vec<String> {
        self.audio_language_calls.lock().unwrap().clone()
    }

    pub fn ui_language_calls(&self) -> Vec<String> {
        self.ui_language_calls.lock().unwrap().clone()
    }

    fn preference_answer(&self, key: &str, code: &str) -> Result<serde_json::Value, ApiError> {
        if self.preferences_fail {
            Err(ApiError::Request("connection refused".into()))
        } else {
            Ok(serde_json::json!({ "success": true, key: code }))
        }
    }
}

#[async_trait]
impl AnalysisApi for ScriptedBackend {
    async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalysisResult, ApiError> {
        self.analyze_calls.lock().unwrap().push(request);
        if !self.analysis_delay.is_zero() {
            tokio::time::sleep(self.analysis_delay).await;
        }
        self.analysis.clone()
    }

    async fn probe(&self, url: &str) -> Result<u16, ApiError> {
        self.probe_calls.lock().unwrap().push(url.to_string());
        self.probe.clone()
    }
}

#[async_trait]
impl PreferencesApi for ScriptedBackend {
    async fn set_audio_language(&self, code: &str) -> Result<serde_json::Value, ApiError> {
        if !self.preferences_delay.is_zero() {
            tokio::time::sleep(self.preferences_delay).await;
        }
        self.audio_language_calls.lock().unwrap().push(code.to_string());
        self.preference_answer("audio_language", code)
    }

    async fn set_ui_language(&self, code: &str) -> Result<serde_json::Value, ApiError> {
        self.ui_language_calls.lock().unwrap().push(code.to_string());
        self.preference_answer("language", code)
    }
}

// ---------------------------------------------------------------------------
// OneShotServer
// ---------------------------------------------------------------------------

/// Loopback HTTP server that answers exactly one request with a canned
/// response and hands back the raw request it received.
pub struct OneShotServer {
    pub base_url: String,
    handle: Option<tokio::task::JoinHandle<String>>,
}

impl OneShotServer {
    /// `status_line` is e.g. `"200 OK"`; `body` is sent as JSON.
    pub async fn respond(status_line: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let raw = read_request(&mut stream).await;
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
            raw
        });

        Self {
            base_url: format!("http://{addr}"),
            handle: Some(handle),
        }
    }

    /// The request as received, lossily decoded.
    pub async fn request(mut self) -> String {
        self.handle.take().unwrap().await.unwrap()
    }
}

impl Drop for OneShotServer {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}

/// Read one request: headers, then a `content-length` or chunked body.
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let body_len = buf.len() - (end + 4);
            let content_length = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok());
            let complete = match content_length {
                Some(len) => body_len >= len,
                None if head.contains("transfer-encoding: chunked") => {
                    buf.ends_with(b"0\r\n\r\n")
                }
                None => true,
            };
            if complete {
                break;
            }
        }
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    String::from_utf8_lossy(&buf).into_owned()
}
