//! Upload candidates and the pre-submission validation rule.
//!
//! Validation looks only at metadata: the *declared* media type and the byte
//! size.  Content is never sniffed.  Rules are checked in a fixed order so the
//! message shown for a file that breaks several rules is deterministic:
//!
//! ```text
//! media type ──▶ too large ──▶ empty
//! ```

use std::path::Path;

use thiserror::Error;

use crate::config::UiTexts;

/// Declared media types accepted for upload.
pub const ACCEPTED_MEDIA_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/bmp",
    "image/tiff",
];

/// Upload limit: 16 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

// ---------------------------------------------------------------------------
// RejectReason / ValidationOutcome
// ---------------------------------------------------------------------------

/// Why a candidate file was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("unsupported media type {media_type:?}")]
    WrongType { media_type: String },

    #[error("file is {size} bytes, limit is {MAX_UPLOAD_BYTES}")]
    TooLarge { size: u64 },

    #[error("file is empty")]
    Empty,
}

impl RejectReason {
    /// The user-facing message for this reason.
    pub fn message<'a>(&self, texts: &'a UiTexts) -> &'a str {
        match self {
            RejectReason::WrongType { .. } => &texts.invalid_file,
            RejectReason::TooLarge { .. } => &texts.file_too_large,
            RejectReason::Empty => &texts.empty_file,
        }
    }
}

/// Result of running [`validate`] on a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted,
    Rejected(RejectReason),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted)
    }
}

/// Validate a file from its declared media type and size.
///
/// ```
/// use image_analysis::selection::{validate, RejectReason, ValidationOutcome};
///
/// assert_eq!(validate("image/png", 2_000_000), ValidationOutcome::Accepted);
/// assert_eq!(validate("image/png", 0), ValidationOutcome::Rejected(RejectReason::Empty));
/// ```
pub fn validate(media_type: &str, size: u64) -> ValidationOutcome {
    if !ACCEPTED_MEDIA_TYPES.contains(&media_type) {
        return ValidationOutcome::Rejected(RejectReason::WrongType {
            media_type: media_type.to_string(),
        });
    }
    if size > MAX_UPLOAD_BYTES {
        return ValidationOutcome::Rejected(RejectReason::TooLarge { size });
    }
    if size == 0 {
        return ValidationOutcome::Rejected(RejectReason::Empty);
    }
    ValidationOutcome::Accepted
}

// ---------------------------------------------------------------------------
// FileCandidate
// ---------------------------------------------------------------------------

/// A file offered by the user, either from the picker or a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Original file name, forwarded as the multipart file name.
    pub name: String,
    /// Media type as declared by the source (not sniffed).
    pub media_type: String,
    /// Raw file contents.  Left empty for a file read from disk that
    /// already fails validation on its metadata.
    pub data: Vec<u8>,
    size: u64,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self {
            name: name.into(),
            media_type: media_type.into(),
            data,
            size,
        }
    }

    /// Read a file from disk, declaring its media type from the extension the
    /// same way a browser file input would.
    ///
    /// The rule is checked against the file's metadata first; contents are
    /// only read for a file that passes it.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".into());
        let media_type = media_type_for_extension(path);
        let size = std::fs::metadata(path)?.len();

        if let ValidationOutcome::Rejected(reason) = validate(media_type, size) {
            log::debug!("selection: not reading {}: {reason}", path.display());
            return Ok(Self {
                name,
                media_type: media_type.to_string(),
                data: Vec::new(),
                size,
            });
        }

        let data = std::fs::read(path)?;
        Ok(Self::new(name, media_type, data))
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn validate(&self) -> ValidationOutcome {
        validate(&self.media_type, self.size())
    }

    /// Human-readable size in MiB with two decimals, e.g. `"1.50"`.
    pub fn size_mb(&self) -> String {
        format!("{:.2}", self.size() as f64 / 1024.0 / 1024.0)
    }
}

/// Declared media type for a path, keyed on its lowercase extension.
pub fn media_type_for_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
