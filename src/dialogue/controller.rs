//! Turn-taking state machine
//!
//! ```text
//!            booking intent                valid answer (more missing)
//!   Idle ─────────────────────▶ Awaiting(k) ──────────────────────────▶ Awaiting(k')
//!    ▲ │ greeting/help/other        │  ▲ invalid answer
//!    │ └────────────┘               │  └──────┘
//!    └──────────────────────────────┘
//!          last answer → summary, then completion event
//! ```
//!
//! While idle, utterances are classified by keyword. While a field is pending,
//! every utterance is an answer attempt for that field, booking keywords
//! included.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use serde::Serialize;

use super::prompts::{self, BOOKING_ACK, HANDOFF};
use super::scheduler::TaskScope;
use super::Intent;
use crate::booking::{BookingAnswers, FieldKey, next_required_field};
use crate::config::DialogueConfig;
use crate::events::DialogueSink;

/// Which mode the controller is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "field", rename_all = "snake_case")]
pub enum DialogueState {
    /// No field pending; utterances are classified
    Idle,
    /// The next utterance answers this field
    AwaitingField(FieldKey),
}

/// How a single utterance was routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Idle utterance classified
    Classified(Intent),
    /// Answer stored for the field
    Accepted(FieldKey),
    /// Answer rejected, field re-asked
    Rejected(FieldKey),
    /// Too many rejections for the field, booking dropped
    Abandoned(FieldKey),
}

/// Point-in-time view of a controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogueSnapshot {
    pub state: DialogueState,
    pub answers: BookingAnswers,
}

/// Collects booking fields from alternating user and assistant turns
///
/// Utterances must be delivered one at a time. Prompts and the completion
/// event go to the [`DialogueSink`] given at construction.
pub struct DialogueController {
    shared: Arc<Shared>,
}

impl DialogueController {
    /// Create an idle controller with no answers
    #[must_use]
    pub fn new(config: DialogueConfig, sink: Arc<dyn DialogueSink>) -> Self {
        Self {
            shared: Arc::new(Shared {
                conversation: Mutex::new(Conversation::default()),
                sink,
                config,
                tasks: TaskScope::new(),
            }),
        }
    }

    /// Route one finalized utterance
    #[must_use]
    pub fn handle_utterance(&self, text: &str) -> TurnOutcome {
        let (outcome, step, generation) = {
            let mut conv = self.shared.lock();
            let (outcome, step) = match conv.awaiting {
                None => self.shared.classify(&mut conv, text),
                Some(key) => self.shared.answer(&mut conv, key, text),
            };
            (outcome, step, conv.generation)
        };

        Shared::carry_out(&self.shared, generation, step);
        outcome
    }

    /// Drop all answers, return to idle and cancel pending continuations
    pub fn reset(&self) {
        let generation = {
            let mut conv = self.shared.lock();
            self.shared.restart(&mut conv);
            conv.generation
        };
        tracing::debug!(generation, "dialogue reset");
    }

    /// Current mode
    #[must_use]
    pub fn state(&self) -> DialogueState {
        self.shared
            .lock()
            .awaiting
            .map_or(DialogueState::Idle, DialogueState::AwaitingField)
    }

    /// Copy of the answers collected so far
    #[must_use]
    pub fn answers(&self) -> BookingAnswers {
        self.shared.lock().answers.clone()
    }

    /// State and answers read under one lock
    #[must_use]
    pub fn snapshot(&self) -> DialogueSnapshot {
        let conv = self.shared.lock();
        DialogueSnapshot {
            state: conv
                .awaiting
                .map_or(DialogueState::Idle, DialogueState::AwaitingField),
            answers: conv.answers.clone(),
        }
    }

    /// Whether the completion summary has been emitted for this booking
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.shared.lock().completed
    }

    /// Delayed continuations still waiting to fire
    #[must_use]
    pub fn pending_continuations(&self) -> usize {
        self.shared.tasks.pending()
    }
}

impl std::fmt::Debug for DialogueController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogueController")
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

struct Shared {
    conversation: Mutex<Conversation>,
    sink: Arc<dyn DialogueSink>,
    config: DialogueConfig,
    tasks: TaskScope,
}

#[derive(Debug, Default)]
struct Conversation {
    answers: BookingAnswers,
    awaiting: Option<FieldKey>,
    /// Bumped on every reset; continuations from older generations are ignored
    generation: u64,
    /// Consecutive rejections for the pending field
    rejections: u32,
    completed: bool,
}

/// Output of one state transition
#[derive(Default)]
struct Step {
    prompts: Vec<&'static str>,
    summary: Option<String>,
    follow_up: Option<(Duration, Continuation)>,
}

impl Step {
    fn prompt(text: &'static str) -> Self {
        Self {
            prompts: vec![text],
            ..Self::default()
        }
    }
}

enum Continuation {
    /// Ask for the next missing field
    Advance,
    /// Fire the completion event
    Complete(BookingAnswers),
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Conversation> {
        self.conversation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn restart(&self, conv: &mut Conversation) {
        self.tasks.cancel_all();
        conv.answers.clear();
        conv.awaiting = None;
        conv.rejections = 0;
        conv.completed = false;
        conv.generation += 1;
    }

    fn classify(&self, conv: &mut Conversation, text: &str) -> (TurnOutcome, Step) {
        let intent = Intent::classify(text);
        tracing::debug!(%intent, "classified idle utterance");

        if !intent.starts_booking() {
            return (
                TurnOutcome::Classified(intent),
                Step::prompt(prompts::intent_reply(intent)),
            );
        }

        self.restart(conv);
        tracing::info!(generation = conv.generation, "booking started");
        let step = Step {
            prompts: vec![BOOKING_ACK],
            summary: None,
            follow_up: Some((self.config.ack_delay, Continuation::Advance)),
        };
        (TurnOutcome::Classified(intent), step)
    }

    fn answer(&self, conv: &mut Conversation, key: FieldKey, text: &str) -> (TurnOutcome, Step) {
        let field = key.spec();

        if field.accepts(text) {
            conv.answers.insert(key, text);
            conv.awaiting = None;
            tracing::debug!(field = %key, "answer accepted");
            return (TurnOutcome::Accepted(key), self.advance(conv));
        }

        conv.rejections += 1;
        let exhausted = self
            .config
            .max_attempts
            .is_some_and(|max| conv.rejections >= max);

        if exhausted {
            tracing::warn!(
                field = %key,
                attempts = conv.rejections,
                "too many rejected answers, abandoning booking"
            );
            self.restart(conv);
            return (TurnOutcome::Abandoned(key), Step::prompt(HANDOFF));
        }

        tracing::debug!(field = %key, attempt = conv.rejections, "answer rejected");
        (TurnOutcome::Rejected(key), Step::prompt(field.clarification))
    }

    fn advance(&self, conv: &mut Conversation) -> Step {
        if let Some(field) = next_required_field(&conv.answers) {
            conv.awaiting = Some(field.key);
            conv.rejections = 0;
            tracing::debug!(field = %field.key, "asking for field");
            return Step::prompt(field.question);
        }

        conv.awaiting = None;
        if conv.completed {
            return Step::default();
        }
        conv.completed = true;
        tracing::info!(generation = conv.generation, "all booking fields collected");

        Step {
            prompts: Vec::new(),
            summary: Some(prompts::booking_summary(&conv.answers)),
            follow_up: Some((
                self.config.completion_delay,
                Continuation::Complete(conv.answers.clone()),
            )),
        }
    }

    /// Emit a step's prompts and schedule its continuation
    ///
    /// Must be called without the conversation lock held.
    fn carry_out(this: &Arc<Self>, generation: u64, step: Step) {
        for text in step.prompts {
            this.sink.on_prompt(text);
        }
        if let Some(summary) = step.summary {
            this.sink.on_prompt(&summary);
        }
        if let Some((delay, continuation)) = step.follow_up {
            Self::schedule(this, generation, delay, continuation);
        }
    }

    fn schedule(this: &Arc<Self>, generation: u64, delay: Duration, continuation: Continuation) {
        let weak: Weak<Self> = Arc::downgrade(this);
        let task = move || {
            if let Some(shared) = weak.upgrade() {
                Self::resume(&shared, generation, continuation);
            }
        };

        if let Err(task) = this.tasks.run_after(delay, task) {
            task();
        }
    }

    fn resume(this: &Arc<Self>, generation: u64, continuation: Continuation) {
        let step = {
            let mut conv = this.lock();
            if conv.generation != generation {
                tracing::trace!(
                    scheduled = generation,
                    current = conv.generation,
                    "stale continuation ignored"
                );
                return;
            }

            match continuation {
                Continuation::Advance => this.advance(&mut conv),
                Continuation::Complete(answers) => {
                    drop(conv);
                    tracing::info!("booking complete");
                    this.sink.on_booking_complete(&answers);
                    return;
                }
            }
        };

        Self::carry_out(this, generation, step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemorySink;

    fn controller() -> (DialogueController, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let config = DialogueConfig {
            ack_delay: Duration::ZERO,
            completion_delay: Duration::ZERO,
            max_attempts: None,
        };
        (DialogueController::new(config, sink.clone()), sink)
    }

    #[test]
    fn test_starts_idle_and_empty() {
        let (ctl, sink) = controller();
        assert_eq!(ctl.state(), DialogueState::Idle);
        assert!(ctl.answers().is_empty());
        assert!(!ctl.is_complete());
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_booking_intent_asks_first_field() {
        let (ctl, sink) = controller();
        let outcome = ctl.handle_utterance("میخوام بلیط رزرو کنم");

        assert_eq!(outcome, TurnOutcome::Classified(Intent::Booking));
        assert_eq!(ctl.state(), DialogueState::AwaitingField(FieldKey::Origin));
        assert_eq!(
            sink.prompts(),
            vec![BOOKING_ACK, FieldKey::Origin.spec().question]
        );
    }

    #[test]
    fn test_completion_fires_once() {
        let (ctl, sink) = controller();
        let _ = ctl.handle_utterance("بلیط");
        for answer in ["تهران", "شیراز", "فردا", "دو نفر", "مریم"] {
            let _ = ctl.handle_utterance(answer);
        }

        assert!(ctl.is_complete());
        assert_eq!(ctl.state(), DialogueState::Idle);
        assert_eq!(sink.completions().len(), 1);

        // Idle chatter after completion does not re-fire
        let _ = ctl.handle_utterance("سلام");
        assert_eq!(sink.completions().len(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let (ctl, _sink) = controller();
        let _ = ctl.handle_utterance("رزرو");
        let _ = ctl.handle_utterance("تهران");
        ctl.reset();

        assert_eq!(
            ctl.snapshot(),
            DialogueSnapshot {
                state: DialogueState::Idle,
                answers: BookingAnswers::new(),
            }
        );
    }

    #[test]
    fn test_snapshot_serializes_state() {
        let (ctl, _sink) = controller();
        let _ = ctl.handle_utterance("پرواز");
        let json = serde_json::to_value(ctl.snapshot()).unwrap();
        assert_eq!(json["state"]["state"], "awaiting_field");
        assert_eq!(json["state"]["field"], "origin");
    }
}
