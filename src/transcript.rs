//! Append-only conversation log kept by the session shell

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who said a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

/// One line of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: Uuid,
    pub speaker: Speaker,
    pub text: String,
    pub time: DateTime<Utc>,
}

/// Ordered list of turns; turns are never edited or removed
#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    turns: Vec<ConversationTurn>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn and return it
    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) -> &ConversationTurn {
        self.turns.push(ConversationTurn {
            id: Uuid::new_v4(),
            speaker,
            text: text.into(),
            time: Utc::now(),
        });
        &self.turns[self.turns.len() - 1]
    }

    #[must_use]
    pub const fn turns(&self) -> &[ConversationTurn] {
        self.turns.as_slice()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Texts spoken by `speaker`, in order
    pub fn texts_by(&self, speaker: Speaker) -> impl Iterator<Item = &str> {
        self.turns
            .iter()
            .filter(move |t| t.speaker == speaker)
            .map(|t| t.text.as_str())
    }
}
