//! User-visible message table.
//!
//! [`UiTexts`] is resolved once, when configuration is loaded: every key the
//! settings file leaves out takes the built-in English string.  Callers read
//! plain fields and never need to check whether a message exists.

use serde::{Deserialize, Serialize};

/// Localised strings shown in the page's banners and file summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiTexts {
    /// Shown when submit is pressed with nothing selected.
    pub no_file_error: String,
    /// Prepended (with a space) to a server-reported error.
    pub error_prefix: String,
    /// Prepended (with a space) to a transport failure's detail.
    pub network_error: String,
    /// Shown when the declared media type is not an accepted image type.
    pub invalid_file: String,
    /// Shown when the file exceeds the upload limit.
    pub file_too_large: String,
    /// Shown for a zero-byte file.
    pub empty_file: String,
    /// Label in front of the accepted file's name.
    pub selected_file: String,
    /// Used when the server reports failure without a message.
    pub analysis_failed: String,
    /// Success banner.
    pub analysis_success: String,
}

impl Default for UiTexts {
    fn default() -> Self {
        Self {
            no_file_error: "Please select a file first".into(),
            error_prefix: "Error:".into(),
            network_error: "Network error:".into(),
            invalid_file: "Please upload only image files".into(),
            file_too_large: "File is too large. Maximum size is 16MB.".into(),
            empty_file: "The uploaded file is empty.".into(),
            selected_file: "Selected file:".into(),
            analysis_failed: "Analysis failed".into(),
            analysis_success: "Analysis completed successfully!".into(),
        }
    }
}
