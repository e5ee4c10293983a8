//! Line-driven stand-in for a speech recognizer
//!
//! Each non-blank line of the reader is one finalized utterance.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use super::SpeechInput;
use crate::{Error, Result};

/// Recognizer that reads utterances from text lines
pub struct LineRecognizer<R> {
    lines: Lines<R>,
    listening: bool,
    delivered: usize,
}

impl LineRecognizer<BufReader<Stdin>> {
    /// Read utterances from standard input
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> LineRecognizer<R> {
    /// Read utterances from `reader`
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            listening: false,
            delivered: 0,
        }
    }

    /// Number of utterances delivered so far
    #[must_use]
    pub const fn delivered(&self) -> usize {
        self.delivered
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> SpeechInput for LineRecognizer<R> {
    async fn start(&mut self) -> Result<()> {
        if !self.listening {
            tracing::trace!("recognizer started");
            self.listening = true;
        }
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        if self.listening {
            tracing::trace!("recognizer stopped");
            self.listening = false;
        }
        Ok(())
    }

    fn is_listening(&self) -> bool {
        self.listening
    }

    async fn next_utterance(&mut self) -> Result<Option<String>> {
        if !self.listening {
            return Err(Error::Voice("recognizer not started".to_string()));
        }

        // `next_line` is cancel-safe, a dropped call loses no input
        while let Some(line) = self.lines.next_line().await? {
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            self.delivered += 1;
            tracing::debug!(utterance = text, "utterance recognized");
            return Ok(Some(text.to_string()));
        }

        tracing::debug!(delivered = self.delivered, "input exhausted");
        Ok(None)
    }
}
