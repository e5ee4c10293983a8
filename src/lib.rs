//! Voyage Concierge - voice-driven trip booking assistant
//!
//! This library provides the core of the concierge:
//! - Field registry with per-field validators
//! - Dialogue controller that collects fields turn by turn
//! - Session shell wiring speech capabilities to the controller
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 Speech capabilities                  │
//! │        Recognizer (start/stop)  │  Synthesizer       │
//! └────────────────────┬────────────────────────────────┘
//!                      │ utterance text / prompt text
//! ┌────────────────────▼────────────────────────────────┐
//! │                      Session                         │
//! │   Transcript  │  capture pausing  │  booking record  │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │               Dialogue Controller                    │
//! │   Intent classification  │  slot filling  │  timers  │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                  Field Registry                      │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod booking;
pub mod config;
pub mod dialogue;
pub mod error;
pub mod events;
pub mod session;
pub mod transcript;
pub mod voice;

pub use booking::{
    BookingAnswers, BookingRecord, City, FIELDS, FieldKey, FieldSpec, detect_city,
    next_required_field,
};
pub use config::{Config, DialogueConfig, VoiceConfig};
pub use dialogue::{DialogueController, DialogueSnapshot, DialogueState, Intent, TurnOutcome};
pub use error::{Error, Result};
pub use events::{ChannelSink, DialogueEvent, DialogueSink, EventEnvelope, MemorySink};
pub use session::{Session, SessionOutcome};
pub use transcript::{ConversationTurn, Speaker, Transcript};
pub use voice::{ConsoleSpeaker, LineRecognizer, SpeechInput, SpeechOutput};
