//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and handed to the
//! controller by value.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{AppPaths, UiTexts};

// ---------------------------------------------------------------------------
// BackendConfig
// ---------------------------------------------------------------------------

/// Connection settings for the analysis backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL every endpoint path (and relative audio URLs) resolves
    /// against, e.g. `http://localhost:5000`.
    pub base_url: String,
    /// Maximum seconds to wait for any single request.  Analysis includes
    /// server-side OCR and speech synthesis.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".into(),
            timeout_secs: 120,
        }
    }
}

// ---------------------------------------------------------------------------
// LanguageConfig
// ---------------------------------------------------------------------------

/// Initial language selections for a fresh page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Recognition hint; `"auto"` lets the backend detect the language.
    pub recognition: String,
    /// Narration language.  Always sent with an analysis request.
    pub audio: String,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            recognition: crate::selection::AUTO_LANGUAGE.into(),
            audio: "en-IN".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// Every section is `#[serde(default)]`, so a file that only overrides a
/// couple of message strings is still a complete configuration once loaded.
///
/// ```rust,no_run
/// use image_analysis::config::AppConfig;
///
/// let config = AppConfig::load().unwrap();
/// println!("{}", config.backend.base_url);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Analysis backend connection.
    pub backend: BackendConfig,
    /// Initial language selections.
    pub languages: LanguageConfig,
    /// User-visible message table.
    pub texts: UiTexts,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
