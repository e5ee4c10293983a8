//! Console stand-in for a speech synthesizer

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};

use super::SpeechOutput;
use crate::config::VoiceConfig;
use crate::Result;

/// Prefix written before each assistant line
const ASSISTANT_PREFIX: &str = "assistant> ";

/// Writes assistant speech as text lines
///
/// Every prompt is written; synthesis itself is only simulated and is skipped
/// entirely when muted.
pub struct ConsoleSpeaker<W> {
    writer: W,
    voice: VoiceConfig,
    spoken: usize,
}

impl ConsoleSpeaker<Stdout> {
    /// Speak to standard output
    #[must_use]
    pub fn stdout(voice: VoiceConfig) -> Self {
        Self::new(tokio::io::stdout(), voice)
    }
}

impl<W: AsyncWrite + Unpin + Send> ConsoleSpeaker<W> {
    pub const fn new(writer: W, voice: VoiceConfig) -> Self {
        Self {
            writer,
            voice,
            spoken: 0,
        }
    }

    /// Number of prompts synthesized (muted prompts excluded)
    #[must_use]
    pub const fn spoken(&self) -> usize {
        self.spoken
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> SpeechOutput for ConsoleSpeaker<W> {
    async fn speak(&mut self, text: &str) -> Result<()> {
        let line = format!("{ASSISTANT_PREFIX}{text}\n");
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;

        if self.voice.muted {
            tracing::trace!("muted, not synthesizing");
            return Ok(());
        }

        self.spoken += 1;
        tracing::debug!(
            lang = self.voice.lang(),
            rate = self.voice.rate,
            pitch = self.voice.pitch,
            chars = text.chars().count(),
            "synthesizing"
        );
        Ok(())
    }
}
