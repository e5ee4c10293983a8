//! TOML configuration file loading
//!
//! Supports `~/.config/voyage/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ConciergeConfigFile {
    /// Turn-taking configuration
    #[serde(default)]
    pub dialogue: DialogueFileConfig,

    /// Speech output configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,
}

/// Turn-taking configuration
#[derive(Debug, Default, Deserialize)]
pub struct DialogueFileConfig {
    /// Pause between acknowledging a booking request and the first question
    pub ack_delay_ms: Option<u64>,

    /// Pause between the completion summary and the completion event
    pub completion_delay_ms: Option<u64>,

    /// Consecutive rejected answers before a booking is abandoned
    pub max_attempts: Option<u32>,
}

/// Speech output configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// Speaking rate multiplier
    pub rate: Option<f64>,

    /// Voice pitch
    pub pitch: Option<f64>,

    /// Print prompts without speaking them
    pub muted: Option<bool>,
}

/// Load the TOML config file from the standard path
///
/// Returns `ConciergeConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> ConciergeConfigFile {
    let Some(path) = config_file_path() else {
        return ConciergeConfigFile::default();
    };

    if !path.exists() {
        return ConciergeConfigFile::default();
    }

    match read_config_file(&path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "loaded config file");
            config
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to load config file, using defaults"
            );
            ConciergeConfigFile::default()
        }
    }
}

/// Read and parse a config file at an explicit path
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML
pub fn read_config_file(path: &Path) -> Result<ConciergeConfigFile> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Return the config file path: `~/.config/voyage/config.toml`
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("voyage").join("config.toml"))
}
