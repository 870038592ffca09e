//! Configuration module.
//!
//! Provides `AppConfig` (top-level settings), the `UiTexts` message table,
//! `AppPaths` for the platform config directory, and TOML persistence via
//! `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;
pub mod texts;

pub use paths::AppPaths;
pub use settings::{AppConfig, BackendConfig, LanguageConfig};
pub use texts::UiTexts;
