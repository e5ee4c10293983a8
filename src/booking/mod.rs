//! Booking data: field registry, collected answers and the final record

mod answers;
mod city;
mod fields;
mod record;

pub use answers::BookingAnswers;
pub use city::{City, detect_city};
pub use fields::{FIELDS, FieldKey, FieldSpec, next_required_field};
pub use record::BookingRecord;
