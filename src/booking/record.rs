//! Completed booking record handed to the external layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BookingAnswers, City, FieldKey, detect_city};
use crate::{Error, Result};

/// A fully collected booking
///
/// Answers are kept verbatim. Cities are resolved against the closed city set
/// so a booking form can be prefilled; nothing else is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    /// Record identifier
    pub id: Uuid,
    /// When the final answer was collected
    pub completed_at: DateTime<Utc>,
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub passengers: String,
    pub passenger_name: String,
    /// City mentioned in the origin answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_city: Option<City>,
    /// City mentioned in the destination answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_city: Option<City>,
}

impl BookingRecord {
    /// Build a record from a complete answer set
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteBooking`] naming the first missing field
    pub fn from_answers(answers: &BookingAnswers) -> Result<Self> {
        let take = |key: FieldKey| {
            answers
                .get(key)
                .map(ToString::to_string)
                .ok_or(Error::IncompleteBooking(key))
        };

        let origin = take(FieldKey::Origin)?;
        let destination = take(FieldKey::Destination)?;

        Ok(Self {
            id: Uuid::new_v4(),
            completed_at: Utc::now(),
            origin_city: detect_city(&origin),
            destination_city: detect_city(&destination),
            origin,
            destination,
            departure_date: take(FieldKey::DepartureDate)?,
            passengers: take(FieldKey::Passengers)?,
            passenger_name: take(FieldKey::PassengerName)?,
        })
    }
}
