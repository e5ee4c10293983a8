//! Closed set of supported cities

use serde::{Deserialize, Serialize};

/// A city the concierge can book flights from or to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    #[serde(rename = "thr")]
    Tehran,
    #[serde(rename = "isf")]
    Isfahan,
    #[serde(rename = "shz")]
    Shiraz,
    #[serde(rename = "mhd")]
    Mashhad,
    #[serde(rename = "tbz")]
    Tabriz,
    #[serde(rename = "ahz")]
    Ahvaz,
    #[serde(rename = "krj")]
    Karaj,
    #[serde(rename = "qom")]
    Qom,
}

impl City {
    /// All supported cities, in matching priority order
    pub const ALL: [Self; 8] = [
        Self::Tehran,
        Self::Isfahan,
        Self::Shiraz,
        Self::Mashhad,
        Self::Tabriz,
        Self::Ahvaz,
        Self::Karaj,
        Self::Qom,
    ];

    /// Three-letter city code used by the booking form
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Tehran => "thr",
            Self::Isfahan => "isf",
            Self::Shiraz => "shz",
            Self::Mashhad => "mhd",
            Self::Tabriz => "tbz",
            Self::Ahvaz => "ahz",
            Self::Karaj => "krj",
            Self::Qom => "qom",
        }
    }

    /// City name as spoken in the fixed locale
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tehran => "تهران",
            Self::Isfahan => "اصفهان",
            Self::Shiraz => "شیراز",
            Self::Mashhad => "مشهد",
            Self::Tabriz => "تبریز",
            Self::Ahvaz => "اهواز",
            Self::Karaj => "کرج",
            Self::Qom => "قم",
        }
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Find the first known city mentioned anywhere in `text`
///
/// Plain substring match on the lowercased text. No fuzzy matching.
#[must_use]
pub fn detect_city(text: &str) -> Option<City> {
    let lower = text.to_lowercase();
    City::ALL.into_iter().find(|city| lower.contains(city.label()))
}
