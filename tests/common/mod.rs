//! Shared test utilities

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use voyage_concierge::{
    DialogueConfig, DialogueController, Error, MemorySink, Result, SpeechInput, SpeechOutput,
};

/// Answers that satisfy every field, in field order
pub const VALID_ANSWERS: [&str; 5] = ["تهران", "به شیراز", "فردا صبح", "دو نفر", "مریم کریمی"];

/// Controller with no thinking delays, reporting into a memory sink
#[must_use]
pub fn immediate_controller() -> (DialogueController, Arc<MemorySink>) {
    controller_with(DialogueConfig::immediate())
}

/// Controller with the given config, reporting into a memory sink
#[must_use]
pub fn controller_with(config: DialogueConfig) -> (DialogueController, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    (DialogueController::new(config, sink.clone()), sink)
}

/// Scripted recognizer that refuses to deliver while stopped
pub struct ScriptedInput {
    lines: VecDeque<String>,
    listening: bool,
    /// Wait forever instead of closing once the script runs out
    endless: bool,
}

impl ScriptedInput {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(ToString::to_string).collect(),
            listening: false,
            endless: false,
        }
    }

    pub fn endless(lines: &[&str]) -> Self {
        Self {
            endless: true,
            ..Self::new(lines)
        }
    }
}

#[async_trait]
impl SpeechInput for ScriptedInput {
    async fn start(&mut self) -> Result<()> {
        self.listening = true;
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.listening = false;
        Ok(())
    }

    fn is_listening(&self) -> bool {
        self.listening
    }

    async fn next_utterance(&mut self) -> Result<Option<String>> {
        if !self.listening {
            return Err(Error::Voice("utterance requested while capture paused".to_string()));
        }
        match self.lines.pop_front() {
            Some(line) => Ok(Some(line)),
            None if self.endless => std::future::pending().await,
            None => Ok(None),
        }
    }
}

/// Synthesizer that records everything it is asked to say
#[derive(Clone, Default)]
pub struct RecordingOutput {
    spoken: Arc<Mutex<Vec<String>>>,
    cancels: Arc<AtomicUsize>,
}

impl RecordingOutput {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    /// How many times speech was interrupted
    pub fn cancels(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechOutput for RecordingOutput {
    async fn speak(&mut self, text: &str) -> Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn cancel(&mut self) -> Result<()> {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
