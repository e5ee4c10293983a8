//! Configuration management for the Voyage concierge

pub mod file;

use std::path::Path;
use std::time::Duration;

use crate::{Error, Result};

/// The single supported speech locale
pub const LOCALE: &str = "fa-IR";

/// Concierge configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Turn-taking configuration
    pub dialogue: DialogueConfig,

    /// Speech output configuration
    pub voice: VoiceConfig,
}

/// Turn-taking configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogueConfig {
    /// Pause between acknowledging a booking request and the first question
    pub ack_delay: Duration,

    /// Pause between the completion summary and the completion event
    pub completion_delay: Duration,

    /// Consecutive rejected answers before the booking is abandoned.
    /// `None` re-asks forever.
    pub max_attempts: Option<u32>,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            ack_delay: Duration::from_millis(1500),
            completion_delay: Duration::from_secs(3),
            max_attempts: None,
        }
    }
}

impl DialogueConfig {
    /// Same turn-taking with no thinking delays
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            ack_delay: Duration::ZERO,
            completion_delay: Duration::ZERO,
            max_attempts: None,
        }
    }
}

/// Speech output configuration
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceConfig {
    /// Speaking rate multiplier (0.1 to 10.0)
    pub rate: f64,

    /// Voice pitch (0.0 to 2.0)
    pub pitch: f64,

    /// Print prompts without speaking them
    pub muted: bool,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            rate: 0.9,
            pitch: 1.0,
            muted: false,
        }
    }
}

impl VoiceConfig {
    /// Locale used for recognition and synthesis
    #[must_use]
    pub const fn lang(&self) -> &'static str {
        LOCALE
    }
}

impl Config {
    /// Load configuration (env > toml > default)
    ///
    /// With `path`, that file must exist and parse. Without it, the standard
    /// config file is used when present.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit config file cannot be read, or a value is
    /// out of range
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let fc = match path {
            Some(path) => {
                let fc = file::read_config_file(path)?;
                tracing::info!(path = %path.display(), "loaded config file");
                fc
            }
            None => file::load_config_file(),
        };
        Self::from_sources(&fc, |key| std::env::var(key).ok())
    }

    /// Assemble configuration from a parsed file and an environment lookup
    ///
    /// # Errors
    ///
    /// Returns error if a resulting value is out of range
    pub fn from_sources(
        fc: &file::ConciergeConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let defaults = DialogueConfig::default();
        let millis = |key: &str, file_value: Option<u64>, default: Duration| {
            env(key)
                .and_then(|s| s.parse().ok())
                .or(file_value)
                .map_or(default, Duration::from_millis)
        };

        let dialogue = DialogueConfig {
            ack_delay: millis("VOYAGE_ACK_DELAY_MS", fc.dialogue.ack_delay_ms, defaults.ack_delay),
            completion_delay: millis(
                "VOYAGE_COMPLETION_DELAY_MS",
                fc.dialogue.completion_delay_ms,
                defaults.completion_delay,
            ),
            max_attempts: env("VOYAGE_MAX_ATTEMPTS")
                .and_then(|s| s.parse().ok())
                .or(fc.dialogue.max_attempts),
        };

        let voice_defaults = VoiceConfig::default();
        let voice = VoiceConfig {
            rate: fc.voice.rate.unwrap_or(voice_defaults.rate),
            pitch: fc.voice.pitch.unwrap_or(voice_defaults.pitch),
            muted: env("VOYAGE_MUTED")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .or(fc.voice.muted)
                .unwrap_or(voice_defaults.muted),
        };

        let config = Self { dialogue, voice };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.dialogue.max_attempts == Some(0) {
            return Err(Error::Config("max_attempts must be at least 1".to_string()));
        }
        if !(0.1..=10.0).contains(&self.voice.rate) {
            return Err(Error::Config(format!(
                "voice rate {} outside 0.1..=10.0",
                self.voice.rate
            )));
        }
        if !(0.0..=2.0).contains(&self.voice.pitch) {
            return Err(Error::Config(format!(
                "voice pitch {} outside 0.0..=2.0",
                self.voice.pitch
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::file::ConciergeConfigFile;
    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_sources(&ConciergeConfigFile::default(), env_of(&[])).unwrap();
        assert_eq!(config.dialogue, DialogueConfig::default());
        assert_eq!(config.dialogue.ack_delay, Duration::from_millis(1500));
        assert_eq!(config.dialogue.completion_delay, Duration::from_millis(3000));
        assert_eq!(config.voice, VoiceConfig::default());
        assert_eq!(config.voice.lang(), "fa-IR");
    }

    #[test]
    fn test_env_overrides_file() {
        let fc: ConciergeConfigFile = toml::from_str(
            "[dialogue]\nack_delay_ms = 200\nmax_attempts = 5\n[voice]\nmuted = false\n",
        )
        .unwrap();
        let env = env_of(&[("VOYAGE_ACK_DELAY_MS", "0"), ("VOYAGE_MUTED", "true")]);

        let config = Config::from_sources(&fc, env).unwrap();
        assert_eq!(config.dialogue.ack_delay, Duration::ZERO);
        assert_eq!(config.dialogue.max_attempts, Some(5));
        assert!(config.voice.muted);
    }

    #[test]
    fn test_unparseable_env_falls_back() {
        let env = env_of(&[("VOYAGE_COMPLETION_DELAY_MS", "soon")]);
        let config = Config::from_sources(&ConciergeConfigFile::default(), env).unwrap();
        assert_eq!(config.dialogue.completion_delay, Duration::from_millis(3000));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let env = env_of(&[("VOYAGE_MAX_ATTEMPTS", "0")]);
        let result = Config::from_sources(&ConciergeConfigFile::default(), env);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rate_out_of_range() {
        let fc: ConciergeConfigFile = toml::from_str("[voice]\nrate = 42.0\n").unwrap();
        assert!(Config::from_sources(&fc, env_of(&[])).is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voyage.toml");
        std::fs::write(&path, "[voice]\npitch = 1.5\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!((config.voice.pitch - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_explicit_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_immediate_has_no_delays() {
        let config = DialogueConfig::immediate();
        assert!(config.ack_delay.is_zero());
        assert!(config.completion_delay.is_zero());
    }
}
