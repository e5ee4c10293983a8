//! Fixed assistant prompts

use super::Intent;
use crate::booking::{BookingAnswers, FieldKey};

/// First assistant turn of every session
pub const WELCOME: &str = "سلام! من دستیار هوش مصنوعی شما هستم. می‌توانم به شما در رزرو بلیط هواپیما کمک کنم. چطور می‌توانم کمکتان کنم؟";

/// Acknowledges a booking request before the first question
pub const BOOKING_ACK: &str = "عالی! می‌خواهید بلیط هواپیما رزرو کنید. برای شروع،";

pub const GREETING: &str = "سلام و درود! خوش آمدید. چطور می‌توانم به شما کمک کنم؟ آیا می‌خواهید بلیط هواپیما رزرو کنید؟";

pub const HELP: &str = "البته! من می‌توانم به شما در رزرو بلیط هواپیما کمک کنم. برای شروع نیاز دارم که اطلاعات پرواز شما را بدانم. آیا آماده‌اید؟";

pub const FALLBACK: &str = "متوجه نشدم. می‌توانید سوال خود را واضح‌تر بپرسید؟ یا اگر می‌خواهید بلیط رزرو کنید، همین الان شروع کنیم.";

/// Emitted when a booking is dropped after too many rejected answers
pub const HANDOFF: &str = "متأسفانه نتوانستم پاسخ شما را متوجه شوم. این رزرو لغو شد؛ هر وقت آماده بودید دوباره درخواست بلیط بدهید.";

/// Reply to an idle utterance of the given intent
#[must_use]
pub const fn intent_reply(intent: Intent) -> &'static str {
    match intent {
        Intent::Booking => BOOKING_ACK,
        Intent::Greeting => GREETING,
        Intent::Help => HELP,
        Intent::Unknown => FALLBACK,
    }
}

/// Completion summary listing every answer in field order
#[must_use]
pub fn booking_summary(answers: &BookingAnswers) -> String {
    let get = |key| answers.get(key).unwrap_or_default();
    format!(
        "عالی! اطلاعات شما کامل شد:\n\
         مبدأ: {}\n\
         مقصد: {}\n\
         تاریخ: {}\n\
         تعداد مسافر: {}\n\
         نام مسافر: {}\n\
         اکنون فرم رزرو را برایتان باز می‌کنم.",
        get(FieldKey::Origin),
        get(FieldKey::Destination),
        get(FieldKey::DepartureDate),
        get(FieldKey::Passengers),
        get(FieldKey::PassengerName),
    )
}
