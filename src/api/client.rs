//! Backend traits and the `reqwest` implementation.
//!
//! The controller only ever talks to [`AnalysisApi`] and [`PreferencesApi`]
//! trait objects; [`HttpBackend`] implements both against the page's origin.
//! All connection details come from [`BackendConfig`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;

use crate::config::BackendConfig;

use super::request::{AnalysisResult, AnalyzeRequest};

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Transport-level failures.  A server that answers `success: false` is *not*
/// an `ApiError`; that is reported inside [`AnalysisResult`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Connection, DNS, TLS or body-encoding failure.
    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-2xx status.
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// The body was not the JSON we expected.
    #[error("malformed response: {0}")]
    Parse(String),

    /// A URL could not be built from the base URL and a path.
    #[error("invalid URL {0:?}")]
    Url(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Analysis submission and audio probing.
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    /// `POST /analyze`.  Non-2xx statuses and malformed bodies are errors.
    async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalysisResult, ApiError>;

    /// `HEAD <url>`; returns the status code the server answered with.
    async fn probe(&self, url: &str) -> Result<u16, ApiError>;
}

/// Session preference endpoints.
#[async_trait]
pub trait PreferencesApi: Send + Sync {
    /// `POST /set_audio_language`.
    async fn set_audio_language(&self, code: &str) -> Result<serde_json::Value, ApiError>;

    /// `POST /set_ui_language`.
    async fn set_ui_language(&self, code: &str) -> Result<serde_json::Value, ApiError>;
}

// ---------------------------------------------------------------------------
// HttpBackend
// ---------------------------------------------------------------------------

/// `reqwest`-backed implementation of both backend traits.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    /// Build from config.  The HTTP client carries the per-request timeout.
    pub fn from_config(config: &BackendConfig) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|_| ApiError::Url(config.base_url.clone()))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, base_url })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Resolve an absolute or origin-relative URL against the base URL.
    pub fn resolve(&self, url: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(url)
            .map_err(|_| ApiError::Url(url.to_string()))
    }

    async fn post_language(&self, path: &str, code: &str) -> Result<serde_json::Value, ApiError> {
        let url = self.resolve(path)?;
        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({ "language": code }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl AnalysisApi for HttpBackend {
    async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalysisResult, ApiError> {
        let url = self.resolve("/analyze")?;
        log::info!(
            "analyze: uploading {} ({} bytes, {}), language={:?}, audio_language={}",
            request.file.name,
            request.file.size(),
            request.file.media_type,
            request.language,
            request.audio_language
        );

        let form = request.into_form()?;
        let response = self.client.post(url).multipart(form).send().await?;

        let status = response.status();
        log::debug!("analyze: response status {status}");
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn probe(&self, url: &str) -> Result<u16, ApiError> {
        let url = self.resolve(url)?;
        let response = self.client.head(url).send().await?;
        Ok(response.status().as_u16())
    }
}

#[async_trait]
impl PreferencesApi for HttpBackend {
    async fn set_audio_language(&self, code: &str) -> Result<serde_json::Value, ApiError> {
        self.post_language("/set_audio_language", code).await
    }

    async fn set_ui_language(&self, code: &str) -> Result<serde_json::Value, ApiError> {
        self.post_language("/set_ui_language", code).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::OneShotServer;
    use crate::selection::FileCandidate;

    fn backend(base: &str) -> HttpBackend {
        HttpBackend::from_config(&BackendConfig {
            base_url: base.into(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let config = BackendConfig {
            base_url: "not a url".into(),
            timeout_secs: 5,
        };
        assert!(matches!(
            HttpBackend::from_config(&config),
            Err(ApiError::Url(_))
        ));
    }

    #[test]
    fn resolves_relative_audio_url_against_origin() {
        let b = backend("http://localhost:5000/app/");
        assert_eq!(
            b.resolve("/static/audio/x.mp3").unwrap().as_str(),
            "http://localhost:5000/static/audio/x.mp3"
        );
    }

    #[test]
    fn absolute_url_is_kept() {
        let b = backend("http://localhost:5000");
        assert_eq!(
            b.resolve("https://cdn.example.org/a.mp3").unwrap().as_str(),
            "https://cdn.example.org/a.mp3"
        );
    }

    #[test]
    fn status_error_message_carries_code() {
        assert_eq!(ApiError::Status(502).to_string(), "HTTP error! status: 502");
    }

    #[test]
    fn backend_is_object_safe_for_both_traits() {
        let b = backend("http://localhost:5000");
        let _: Box<dyn AnalysisApi> = Box::new(b.clone());
        let _: Box<dyn PreferencesApi> = Box::new(b);
    }

    // ---- Against a loopback server ---

    fn png_request(recognition: &str) -> AnalyzeRequest {
        AnalyzeRequest::new(
            FileCandidate::new("scan.png", "image/png", vec![0x89, b'P', b'N', b'G']),
            recognition,
            "en-IN",
        )
    }

    #[tokio::test]
    async fn non_2xx_is_an_error_whatever_the_body_says() {
        let server = OneShotServer::respond("500 Internal Server Error", r#"{"success":true}"#).await;
        let b = backend(&server.base_url);

        let result = b.analyze(png_request("auto")).await;

        assert_eq!(result, Err(ApiError::Status(500)));
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = OneShotServer::respond("200 OK", "<html>oops</html>").await;
        let b = backend(&server.base_url);

        let result = b.analyze(png_request("auto")).await;

        assert!(matches!(result, Err(ApiError::Parse(_))));
    }

    #[tokio::test]
    async fn auto_language_upload_carries_image_and_audio_language_only() {
        let server = OneShotServer::respond(
            "200 OK",
            r#"{"success":true,"text_response":"ok","audio_url":"/static/audio/x.mp3"}"#,
        )
        .await;
        let b = backend(&server.base_url);

        let result = b.analyze(png_request("auto")).await.unwrap();
        let request = server.request().await;

        assert!(result.success);
        assert_eq!(result.audio_url(), Some("/static/audio/x.mp3"));
        assert!(request.starts_with("POST /analyze "));
        assert!(request.contains("multipart/form-data"));
        assert!(request.contains(r#"name="image"; filename="scan.png""#));
        assert!(request.contains(r#"name="audio_language""#));
        assert!(!request.contains(r#"name="language""#));
    }

    #[tokio::test]
    async fn explicit_language_is_uploaded() {
        let server = OneShotServer::respond("200 OK", r#"{"success":false,"error":"x"}"#).await;
        let b = backend(&server.base_url);

        let result = b.analyze(png_request("hi-IN")).await.unwrap();
        let request = server.request().await;

        assert!(!result.success);
        assert!(request.contains(r#"name="language""#));
        assert!(request.contains("hi-IN"));
    }

    #[tokio::test]
    async fn head_check_returns_status_unchanged() {
        let server = OneShotServer::respond("404 Not Found", "").await;
        let b = backend(&server.base_url);

        let status = b.probe("/static/audio/gone.mp3").await;
        let request = server.request().await;

        assert_eq!(status, Ok(404));
        assert!(request.starts_with("HEAD /static/audio/gone.mp3 "));
    }

    #[tokio::test]
    async fn language_preference_posts_json() {
        let server =
            OneShotServer::respond("200 OK", r#"{"success":true,"language":"ta-IN"}"#).await;
        let b = backend(&server.base_url);

        let body = b.set_ui_language("ta-IN").await.unwrap();
        let request = server.request().await;

        assert_eq!(body["language"], "ta-IN");
        assert!(request.starts_with("POST /set_ui_language "));
        assert!(request.contains(r#"{"language":"ta-IN"}"#));
    }

    #[tokio::test]
    async fn language_preference_non_2xx_is_an_error() {
        let server = OneShotServer::respond("503 Service Unavailable", "{}").await;
        let b = backend(&server.base_url);

        assert_eq!(
            b.set_audio_language("ta-IN").await,
            Err(ApiError::Status(503))
        );
    }

    /// Nothing listens on port 9 of the loopback interface.
    #[tokio::test]
    async fn probe_against_closed_port_is_a_transport_error() {
        let b = backend("http://127.0.0.1:9");
        assert!(b.probe("/audio/x.mp3").await.is_err());
    }
}
