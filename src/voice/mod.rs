//! Speech capabilities
//!
//! Recognition and synthesis are injected into the session as capability
//! objects with an explicit `start()`/`stop()` lifecycle. The dialogue core
//! never touches them; it only sees finalized text.

mod console;
mod line;

use async_trait::async_trait;

pub use console::ConsoleSpeaker;
pub use line::LineRecognizer;

use crate::Result;

/// Source of finalized user utterances
#[async_trait]
pub trait SpeechInput: Send {
    /// Begin capturing speech
    async fn start(&mut self) -> Result<()>;

    /// Pause capture; no utterance is delivered until the next `start()`
    async fn stop(&mut self) -> Result<()>;

    /// Whether capture is running
    fn is_listening(&self) -> bool;

    /// Wait for the next finalized utterance
    ///
    /// Returns `Ok(None)` once the source is exhausted. Must be cancel-safe.
    async fn next_utterance(&mut self) -> Result<Option<String>>;
}

/// Sink for assistant speech
#[async_trait]
pub trait SpeechOutput: Send {
    /// Say `text` to the user
    async fn speak(&mut self, text: &str) -> Result<()>;

    /// Interrupt anything still being spoken
    async fn cancel(&mut self) -> Result<()> {
        Ok(())
    }
}
