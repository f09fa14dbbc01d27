//! User settings persistence via TOML.
//!
//! Settings are read from `<config_dir>/poe/settings.toml` and never written
//! back. Missing or corrupted config files return sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

use poe_chain::LedgerConfig;
use serde::{Deserialize, Serialize};

/// User-configurable settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Development account used to sign claim calls.
    pub account: String,
    /// Time the local ledger takes to seal a block, in milliseconds.
    pub block_time_ms: u64,
    /// Shortest claim the local ledger accepts, in bytes (0 = any).
    pub min_claim_len: u32,
    /// UI theme.
    pub theme: Theme,
}

/// UI theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl From<Theme> for iced::Theme {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Light => iced::Theme::Light,
            Theme::Dark => iced::Theme::Dark,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            account: "alice".to_string(),
            block_time_ms: 2000,
            min_claim_len: 0,
            theme: Theme::Dark,
        }
    }
}

impl Settings {
    /// Load settings from the default config path.
    ///
    /// Returns defaults if the file doesn't exist or is corrupted.
    pub fn load() -> Self {
        Self::load_from_dir(Self::config_dir())
    }

    /// Load settings from a specific config directory.
    pub fn load_from_dir(config_dir: PathBuf) -> Self {
        let path = config_dir.join("settings.toml");
        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(settings) => {
                    tracing::info!(path = %path.display(), "settings loaded");
                    settings
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "corrupted settings file, using defaults"
                    );
                    Self::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    path = %path.display(),
                    "settings file not found, using defaults"
                );
                Self::default()
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to read settings file, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Configuration for the local ledger.
    pub fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig {
            block_time: Duration::from_millis(self.block_time_ms),
            min_claim_len: self.min_claim_len,
            ..LedgerConfig::default()
        }
    }

    /// Get the default config directory.
    fn config_dir() -> PathBuf {
        directories::ProjectDirs::from("", "", "poe")
            .map(|d| d.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("poe-config"))
    }
}
