//! Keyword intent classification for idle utterances

use serde::Serialize;

/// Ticket, reservation and flight terms
const BOOKING_KEYWORDS: &[&str] = &["بلیط", "رزرو", "پرواز"];

const GREETING_KEYWORDS: &[&str] = &["سلام", "درود"];

const HELP_KEYWORDS: &[&str] = &["کمک"];

/// What an idle utterance asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Start a new booking
    Booking,
    Greeting,
    Help,
    /// Nothing recognized
    Unknown,
}

impl Intent {
    /// Classify `text` by keyword
    ///
    /// Booking beats greeting beats help, so "hello, I want a ticket" starts a
    /// booking.
    #[must_use]
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        let mentions = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        if mentions(BOOKING_KEYWORDS) {
            Self::Booking
        } else if mentions(GREETING_KEYWORDS) {
            Self::Greeting
        } else if mentions(HELP_KEYWORDS) {
            Self::Help
        } else {
            Self::Unknown
        }
    }

    /// Whether this intent changes dialogue state
    #[must_use]
    pub const fn starts_booking(self) -> bool {
        matches!(self, Self::Booking)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Booking => write!(f, "booking"),
            Self::Greeting => write!(f, "greeting"),
            Self::Help => write!(f, "help"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
