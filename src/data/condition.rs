//! Weather condition families, icons and background themes
//!
//! OpenWeatherMap condition codes are grouped by their hundreds digit:
//! - 2xx: Thunderstorm
//! - 3xx: Drizzle
//! - 5xx: Rain
//! - 6xx: Snow
//! - 7xx: Atmosphere (mist, smoke, haze, fog, ...)
//! - 800: Clear
//! - 801-802: Few / scattered clouds
//! - 803-804: Broken / overcast clouds

use serde::{Deserialize, Serialize};

/// Coarse condition family derived from a condition code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionFamily {
    Thunderstorm,
    Rain,
    Snow,
    Atmosphere,
    Clear,
    FewClouds,
    Clouds,
    Unknown,
}

impl ConditionFamily {
    /// Map an OpenWeatherMap condition code to its family
    pub fn from_code(code: u16) -> Self {
        match code {
            200..=299 => ConditionFamily::Thunderstorm,
            300..=599 => ConditionFamily::Rain,
            600..=699 => ConditionFamily::Snow,
            700..=799 => ConditionFamily::Atmosphere,
            800 => ConditionFamily::Clear,
            801 | 802 => ConditionFamily::FewClouds,
            803..=899 => ConditionFamily::Clouds,
            _ => ConditionFamily::Unknown,
        }
    }
}

/// Background theme for the current conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Background {
    Stormy,
    Rainy,
    Snowy,
    Cloudy,
    ClearDay,
    ClearNight,
    Plain,
}

impl Background {
    /// Pick the background for a condition code and time of day
    pub fn select(code: u16, is_night: bool) -> Self {
        match ConditionFamily::from_code(code) {
            ConditionFamily::Thunderstorm => Background::Stormy,
            ConditionFamily::Rain => Background::Rainy,
            ConditionFamily::Snow => Background::Snowy,
            ConditionFamily::Atmosphere | ConditionFamily::FewClouds | ConditionFamily::Clouds => {
                Background::Cloudy
            }
            ConditionFamily::Clear if is_night => Background::ClearNight,
            ConditionFamily::Clear => Background::ClearDay,
            ConditionFamily::Unknown => Background::Plain,
        }
    }

    /// Theme class name
    pub fn name(self) -> &'static str {
        match self {
            Background::Stormy => "stormy",
            Background::Rainy => "rainy",
            Background::Snowy => "snowy",
            Background::Cloudy => "cloudy",
            Background::ClearDay => "clear-day",
            Background::ClearNight => "clear-night",
            Background::Plain => "plain",
        }
    }
}

/// Glyph for a condition code, with moon variants at night
pub fn condition_icon(code: u16, is_night: bool) -> &'static str {
    match ConditionFamily::from_code(code) {
        ConditionFamily::Thunderstorm => "\u{26C8}", // ⛈
        ConditionFamily::Rain => "\u{1F327}",        // 🌧
        ConditionFamily::Snow => "\u{2744}",         // ❄
        ConditionFamily::Atmosphere => "\u{1F32B}",  // 🌫
        ConditionFamily::Clear if is_night => "\u{1F319}", // 🌙
        ConditionFamily::Clear => "\u{2600}",        // ☀
        ConditionFamily::FewClouds if is_night => "\u{2601}", // ☁
        ConditionFamily::FewClouds => "\u{26C5}",    // ⛅
        ConditionFamily::Clouds => "\u{2601}",       // ☁
        ConditionFamily::Unknown => "?",
    }
}
