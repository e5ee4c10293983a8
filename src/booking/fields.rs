//! Field registry
//!
//! The fixed, ordered list of fields a booking needs. Each field carries the
//! question that asks for it, the clarification used when an answer is
//! rejected, and a validator deciding whether an utterance is acceptable.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::BookingAnswers;
use super::city::detect_city;

/// Any decimal digit, Persian and Arabic-Indic digits included
static DIGIT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").expect("valid regex"));

/// Relative day, weekday and month names accepted as a departure date
const DATE_KEYWORDS: &[&str] = &[
    "فردا",
    "امروز",
    "دوشنبه",
    "سه‌شنبه",
    "چهارشنبه",
    "پنج‌شنبه",
    "جمعه",
    "شنبه",
    "یکشنبه",
    "آذر",
    "دی",
    "بهمن",
];

/// Number words (one to six) and the word for "person"
const PASSENGER_KEYWORDS: &[&str] = &["یک", "دو", "سه", "چهار", "پنج", "شش", "نفر"];

/// Key of a booking field
///
/// Variant order is the order in which fields are asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    Origin,
    Destination,
    DepartureDate,
    Passengers,
    PassengerName,
}

impl FieldKey {
    /// Wire name of the key
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Destination => "destination",
            Self::DepartureDate => "departureDate",
            Self::Passengers => "passengers",
            Self::PassengerName => "passengerName",
        }
    }

    /// Registry entry for this key
    #[must_use]
    pub fn spec(self) -> &'static FieldSpec {
        // FIELDS is declared in key order
        &FIELDS[self as usize]
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Static definition of one booking field
#[derive(Debug)]
pub struct FieldSpec {
    /// Field key
    pub key: FieldKey,
    /// Question asking for the field
    pub question: &'static str,
    /// Re-ask used when an answer is rejected
    pub clarification: &'static str,
    validator: fn(&str) -> bool,
}

impl FieldSpec {
    /// Whether `text` is an acceptable answer for this field
    #[must_use]
    pub fn accepts(&self, text: &str) -> bool {
        (self.validator)(&text.to_lowercase())
    }
}

/// Every booking field, in the order they are collected
pub static FIELDS: [FieldSpec; 5] = [
    FieldSpec {
        key: FieldKey::Origin,
        question: "از کدام شهر می‌خواهید سفر کنید؟",
        clarification: "لطفاً نام شهر مبدأ را واضح‌تر بگویید. مثل تهران، اصفهان، شیراز",
        validator: is_city,
    },
    FieldSpec {
        key: FieldKey::Destination,
        question: "به کدام شهر می‌خواهید سفر کنید؟",
        clarification: "لطفاً نام شهر مقصد را واضح‌تر بگویید.",
        validator: is_city,
    },
    FieldSpec {
        key: FieldKey::DepartureDate,
        question: "تاریخ پرواز چه روزی باشد؟",
        clarification: "لطفاً تاریخ پرواز را مشخص کنید. مثل فردا، دوشنبه، یا ۱۵ آذر",
        validator: is_departure_date,
    },
    FieldSpec {
        key: FieldKey::Passengers,
        question: "چند نفر قرار است سفر کنید؟",
        clarification: "لطفاً تعداد مسافران را مشخص کنید. مثل یک نفر، دو نفر",
        validator: is_passenger_count,
    },
    FieldSpec {
        key: FieldKey::PassengerName,
        question: "نام مسافر چیست؟",
        clarification: "لطفاً نام مسافر را بگویید.",
        validator: is_passenger_name,
    },
];

/// First field (in fixed order) that has no answer yet
///
/// Returns `None` once every field is present.
#[must_use]
pub fn next_required_field(answers: &BookingAnswers) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|field| !answers.contains(field.key))
}

fn contains_digit(text: &str) -> bool {
    DIGIT_REGEX.is_match(text)
}

fn is_city(text: &str) -> bool {
    detect_city(text).is_some()
}

fn is_departure_date(text: &str) -> bool {
    DATE_KEYWORDS.iter().any(|k| text.contains(k)) || contains_digit(text)
}

fn is_passenger_count(text: &str) -> bool {
    PASSENGER_KEYWORDS.iter().any(|k| text.contains(k)) || contains_digit(text)
}

const fn is_passenger_name(_text: &str) -> bool {
    true
}
