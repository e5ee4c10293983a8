//! Conversation session
//!
//! The shell around the dialogue controller: it feeds recognized utterances
//! in one at a time, speaks whatever the controller says, and keeps speech
//! capture paused while a response is still in flight.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::booking::BookingRecord;
use crate::dialogue::{DialogueController, prompts};
use crate::events::{ChannelSink, DialogueEvent, EventEnvelope};
use crate::transcript::{Speaker, Transcript};
use crate::voice::{SpeechInput, SpeechOutput};
use crate::{Config, Result};

/// How often a paused session re-checks for pending continuations
const PENDING_POLL: Duration = Duration::from_millis(50);

/// What a finished session produced
#[derive(Debug)]
pub struct SessionOutcome {
    pub session_id: String,
    /// Present when the booking was completed
    pub record: Option<BookingRecord>,
    pub transcript: Transcript,
    /// Every controller event, in emission order
    pub events: Vec<EventEnvelope>,
}

/// One booking conversation over injected speech capabilities
pub struct Session<I, O> {
    id: String,
    config: Config,
    input: I,
    output: O,
}

impl<I: SpeechInput, O: SpeechOutput> Session<I, O> {
    pub fn new(config: Config, input: I, output: O) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            config,
            input,
            output,
        }
    }

    /// Session identifier used in event envelopes
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Run until the booking completes or input is exhausted
    ///
    /// # Errors
    ///
    /// Returns error if a speech capability fails
    pub async fn run(self) -> Result<SessionOutcome> {
        self.run_until(std::future::pending()).await
    }

    /// Run until the booking completes, input is exhausted, or `shutdown` resolves
    ///
    /// # Errors
    ///
    /// Returns error if a speech capability fails
    pub async fn run_until(mut self, shutdown: impl Future<Output = ()>) -> Result<SessionOutcome> {
        tokio::pin!(shutdown);

        let (sink, mut rx) = ChannelSink::new();
        let controller = DialogueController::new(self.config.dialogue, Arc::new(sink));
        let mut run = RunState {
            transcript: Transcript::new(),
            events: Vec::new(),
            record: None,
        };

        tracing::info!(session_id = %self.id, "session started");
        self.say(&mut run.transcript, prompts::WELCOME).await?;

        loop {
            // Read before draining: a finished continuation has already sent its event
            let pending = controller.pending_continuations();
            while let Ok(event) = rx.try_recv() {
                self.deliver(&mut run, event).await?;
            }
            if run.record.is_some() {
                break;
            }

            if pending > 0 {
                self.input.stop().await?;
                tokio::select! {
                    () = &mut shutdown => {
                        tracing::info!("shutdown requested");
                        self.output.cancel().await?;
                        break;
                    }
                    Some(event) = rx.recv() => self.deliver(&mut run, event).await?,
                    () = tokio::time::sleep(PENDING_POLL) => {}
                }
                continue;
            }

            self.input.start().await?;
            let utterance = tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("shutdown requested");
                    self.output.cancel().await?;
                    break;
                }
                utterance = self.input.next_utterance() => utterance?,
            };

            let Some(text) = utterance else {
                tracing::info!("input closed before booking completed");
                break;
            };

            self.input.stop().await?;
            run.transcript.push(Speaker::User, text.as_str());
            let outcome = controller.handle_utterance(&text);
            tracing::debug!(?outcome, "turn handled");
        }

        self.input.stop().await?;
        tracing::info!(
            session_id = %self.id,
            completed = run.record.is_some(),
            turns = run.transcript.len(),
            "session finished"
        );

        Ok(SessionOutcome {
            session_id: self.id,
            record: run.record,
            transcript: run.transcript,
            events: run.events,
        })
    }

    async fn say(&mut self, transcript: &mut Transcript, text: &str) -> Result<()> {
        transcript.push(Speaker::Assistant, text);
        self.output.speak(text).await
    }

    async fn deliver(&mut self, run: &mut RunState, event: DialogueEvent) -> Result<()> {
        run.events.push(EventEnvelope::new(&self.id, event.clone()));

        match event {
            DialogueEvent::Prompt { text } => self.say(&mut run.transcript, &text).await,
            DialogueEvent::BookingComplete { answers } => {
                let record = BookingRecord::from_answers(&answers)?;
                tracing::info!(booking_id = %record.id, "booking record ready");
                run.record = Some(record);
                Ok(())
            }
        }
    }
}

struct RunState {
    transcript: Transcript,
    events: Vec<EventEnvelope>,
    record: Option<BookingRecord>,
}
