//! Outbound dialogue events
//!
//! The controller reports everything it has to say through a [`DialogueSink`].
//! Delivery is best-effort: a sink whose consumer has gone away logs and drops
//! the event, it never propagates an error back into the dialogue.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::booking::BookingAnswers;

/// Something the controller wants the external layer to act on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogueEvent {
    /// Display and speak `text`
    Prompt { text: String },
    /// Every field is collected; leave the conversation
    BookingComplete { answers: BookingAnswers },
}

impl DialogueEvent {
    /// Dotted event name used in envelopes
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Prompt { .. } => "voyage.dialogue.prompt",
            Self::BookingComplete { .. } => "voyage.booking.completed",
        }
    }
}

/// Receiver of controller output
///
/// Called after the controller has released its state, so implementations
/// may call back into the controller.
pub trait DialogueSink: Send + Sync {
    /// A prompt for the user
    fn on_prompt(&self, text: &str);

    /// The booking is complete; fires once per conversation
    fn on_booking_complete(&self, answers: &BookingAnswers);
}

/// Forwards events over an unbounded tokio channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<DialogueEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver it feeds
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DialogueEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: DialogueEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::debug!(
                event_type = e.0.event_type(),
                "dialogue event dropped, receiver closed"
            );
        }
    }
}

impl DialogueSink for ChannelSink {
    fn on_prompt(&self, text: &str) {
        self.send(DialogueEvent::Prompt {
            text: text.to_string(),
        });
    }

    fn on_booking_complete(&self, answers: &BookingAnswers) {
        self.send(DialogueEvent::BookingComplete {
            answers: answers.clone(),
        });
    }
}

/// Collects events in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DialogueEvent>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event received so far
    #[must_use]
    pub fn events(&self) -> Vec<DialogueEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Prompt texts received so far
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                DialogueEvent::Prompt { text } => Some(text),
                DialogueEvent::BookingComplete { .. } => None,
            })
            .collect()
    }

    /// Answer sets delivered by completion events
    #[must_use]
    pub fn completions(&self) -> Vec<BookingAnswers> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                DialogueEvent::BookingComplete { answers } => Some(answers),
                DialogueEvent::Prompt { .. } => None,
            })
            .collect()
    }

    /// Drain and return every event
    pub fn take(&self) -> Vec<DialogueEvent> {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *events)
    }

    fn push(&self, event: DialogueEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl DialogueSink for MemorySink {
    fn on_prompt(&self, text: &str) {
        self.push(DialogueEvent::Prompt {
            text: text.to_string(),
        });
    }

    fn on_booking_complete(&self, answers: &BookingAnswers) {
        self.push(DialogueEvent::BookingComplete {
            answers: answers.clone(),
        });
    }
}

/// A dialogue event wrapped for machine consumption
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    /// Unique event ID (UUID v4)
    pub id: String,
    /// Event type (e.g., `"voyage.dialogue.prompt"`)
    #[serde(rename = "type")]
    pub event_type: String,
    /// Session the event belongs to
    pub session_id: String,
    /// Source service identifier
    pub source: String,
    pub data: DialogueEvent,
    /// ISO 8601 timestamp
    pub timestamp: String,
}

impl EventEnvelope {
    /// Wrap `event` with a fresh id and the current time
    #[must_use]
    pub fn new(session_id: &str, event: DialogueEvent) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_type: event.event_type().to_string(),
            session_id: session_id.to_string(),
            source: "voyage-concierge".to_string(),
            data: event,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
