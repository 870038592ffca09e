//! Wire types for `POST /analyze`.

use serde::{Deserialize, Serialize};

use crate::selection::{FileCandidate, AUTO_LANGUAGE};

use super::ApiError;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";
/// Optional recognition-language field.
pub const LANGUAGE_FIELD: &str = "language";
/// Narration-language field; always present.
pub const AUDIO_LANGUAGE_FIELD: &str = "audio_language";

// ---------------------------------------------------------------------------
// AnalyzeRequest
// ---------------------------------------------------------------------------

/// One analysis submission, ready to be encoded as multipart form data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRequest {
    pub file: FileCandidate,
    /// `None` asks the backend to auto-detect.
    pub language: Option<String>,
    pub audio_language: String,
}

impl AnalyzeRequest {
    /// Build a request from the current selections.  A recognition language
    /// of `"auto"` is dropped so the backend falls back to detection.
    pub fn new(file: FileCandidate, recognition_language: &str, audio_language: &str) -> Self {
        let language = (recognition_language != AUTO_LANGUAGE)
            .then(|| recognition_language.to_string());
        Self {
            file,
            language,
            audio_language: audio_language.to_string(),
        }
    }

    /// The text fields of the form, in the order they are appended.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::with_capacity(2);
        if let Some(lang) = &self.language {
            fields.push((LANGUAGE_FIELD, lang.clone()));
        }
        fields.push((AUDIO_LANGUAGE_FIELD, self.audio_language.clone()));
        fields
    }

    /// Encode as a `reqwest` multipart form.
    pub fn into_form(self) -> Result<reqwest::multipart::Form, ApiError> {
        let fields = self.text_fields();
        let part = reqwest::multipart::Part::bytes(self.file.data)
            .file_name(self.file.name)
            .mime_str(&self.file.media_type)
            .map_err(|e| ApiError::Request(format!("invalid media type: {e}")))?;

        let mut form = reqwest::multipart::Form::new().part(IMAGE_FIELD, part);
        for (name, value) in fields {
            form = form.text(name, value);
        }
        Ok(form)
    }
}

// ---------------------------------------------------------------------------
// AnalysisResult
// ---------------------------------------------------------------------------

/// Response body of `POST /analyze`.
///
/// `success` is required; a body without it is treated as malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub success: bool,
    #[serde(default)]
    pub detected_language: Option<String>,
    #[serde(default)]
    pub language_name: Option<String>,
    #[serde(default)]
    pub text_response: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub audio_language: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl AnalysisResult {
    /// Display name of the detected language, only when both the code and
    /// the name were reported.
    pub fn detected_language_name(&self) -> Option<&str> {
        non_empty(&self.detected_language)?;
        non_empty(&self.language_name)
    }

    pub fn text(&self) -> Option<&str> {
        non_empty(&self.text_response)
    }

    pub fn audio_url(&self) -> Option<&str> {
        non_empty(&self.audio_url)
    }

    pub fn audio_language(&self) -> Option<&str> {
        non_empty(&self.audio_language)
    }

    pub fn error_message(&self) -> Option<&str> {
        non_empty(&self.error)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
