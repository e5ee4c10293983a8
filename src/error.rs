//! Error types for the Voyage concierge
//!
//! The dialogue core never fails: a rejected answer is handled by re-prompting.
//! These errors only surface at the shell boundary (configuration, speech
//! capabilities, record assembly).

use thiserror::Error;

use crate::booking::FieldKey;

/// Result type alias for concierge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the concierge shell
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Speech capability error (lifecycle misuse, closed device)
    #[error("voice error: {0}")]
    Voice(String),

    /// A booking record was requested before every field was collected
    #[error("booking incomplete: missing {0}")]
    IncompleteBooking(FieldKey),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
