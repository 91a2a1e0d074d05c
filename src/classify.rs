//! Band tables for classifying measurements
//!
//! Each table maps a continuous value onto a discrete band carrying a label, a
//! color token and a severity rank. Lookups are total: values above the last
//! bound (and NaN) land in the open-ended top band, negative values in the
//! first band.

use serde::Serialize;

use crate::data::Pollutant;

/// Named palette entries resolved to concrete colors by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColorToken {
    AqiGood,
    AqiModerate,
    AqiUnhealthySensitive,
    AqiUnhealthy,
    AqiVeryUnhealthy,
    AqiHazardous,
    AccentGreen,
    AccentYellow,
    AccentPink,
    AccentRed,
}

impl ColorToken {
    pub fn name(self) -> &'static str {
        match self {
            ColorToken::AqiGood => "aqi-good",
            ColorToken::AqiModerate => "aqi-moderate",
            ColorToken::AqiUnhealthySensitive => "aqi-unhealthy-sensitive",
            ColorToken::AqiUnhealthy => "aqi-unhealthy",
            ColorToken::AqiVeryUnhealthy => "aqi-very-unhealthy",
            ColorToken::AqiHazardous => "aqi-hazardous",
            ColorToken::AccentGreen => "accent-green",
            ColorToken::AccentYellow => "accent-yellow",
            ColorToken::AccentPink => "accent-pink",
            ColorToken::AccentRed => "accent-red",
        }
    }
}

/// One band of a table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    /// Largest value (inclusive) that still falls in this band
    pub upper_bound: f64,
    /// Display label
    pub label: &'static str,
    /// Color token for the label/value
    pub color: ColorToken,
    /// Severity rank, 0 = best
    pub severity: u8,
}

/// Ordered bands for one kind of measurement
#[derive(Debug)]
pub struct BandTable {
    /// Measurement name
    pub name: &'static str,
    /// Bands with finite bounds, ascending
    bounded: &'static [Band],
    /// Open-ended band above the last bound
    top: Band,
}

impl BandTable {
    /// Returns the first band whose upper bound is >= `value`, else the top band
    pub fn classify(&self, value: f64) -> &Band {
        self.bounded
            .iter()
            .find(|band| value <= band.upper_bound)
            .unwrap_or(&self.top)
    }

    /// All bands in ascending order
    pub fn bands(&self) -> impl Iterator<Item = &Band> {
        self.bounded.iter().chain(std::iter::once(&self.top))
    }
}

const fn band(upper_bound: f64, label: &'static str, color: ColorToken, severity: u8) -> Band {
    Band {
        upper_bound,
        label,
        color,
        severity,
    }
}

/// US EPA style AQI severity bands
const GOOD: &str = "Good";
const MODERATE: &str = "Moderate";
const SENSITIVE: &str = "Unhealthy for Sensitive Groups";
const UNHEALTHY: &str = "Unhealthy";
const VERY_UNHEALTHY: &str = "Very Unhealthy";
const HAZARDOUS: &str = "Hazardous";

const HAZARDOUS_BAND: Band = band(f64::INFINITY, HAZARDOUS, ColorToken::AqiHazardous, 5);

pub static AQI: BandTable = BandTable {
    name: "AQI",
    bounded: &[
        band(50.0, GOOD, ColorToken::AqiGood, 0),
        band(100.0, MODERATE, ColorToken::AqiModerate, 1),
        band(150.0, SENSITIVE, ColorToken::AqiUnhealthySensitive, 2),
        band(200.0, UNHEALTHY, ColorToken::AqiUnhealthy, 3),
        band(300.0, VERY_UNHEALTHY, ColorToken::AqiVeryUnhealthy, 4),
    ],
    top: HAZARDOUS_BAND,
};

pub static PM25: BandTable = BandTable {
    name: "PM2.5",
    bounded: &[
        band(12.0, GOOD, ColorToken::AqiGood, 0),
        band(35.4, MODERATE, ColorToken::AqiModerate, 1),
        band(55.4, SENSITIVE, ColorToken::AqiUnhealthySensitive, 2),
        band(150.4, UNHEALTHY, ColorToken::AqiUnhealthy, 3),
        band(250.4, VERY_UNHEALTHY, ColorToken::AqiVeryUnhealthy, 4),
    ],
    top: HAZARDOUS_BAND,
};

pub static PM10: BandTable = BandTable {
    name: "PM10",
    bounded: &[
        band(54.0, GOOD, ColorToken::AqiGood, 0),
        band(154.0, MODERATE, ColorToken::AqiModerate, 1),
        band(254.0, SENSITIVE, ColorToken::AqiUnhealthySensitive, 2),
        band(354.0, UNHEALTHY, ColorToken::AqiUnhealthy, 3),
        band(424.0, VERY_UNHEALTHY, ColorToken::AqiVeryUnhealthy, 4),
    ],
    top: HAZARDOUS_BAND,
};

pub static O3: BandTable = BandTable {
    name: "O3",
    bounded: &[
        band(54.0, GOOD, ColorToken::AqiGood, 0),
        band(70.0, MODERATE, ColorToken::AqiModerate, 1),
        band(85.0, SENSITIVE, ColorToken::AqiUnhealthySensitive, 2),
        band(105.0, UNHEALTHY, ColorToken::AqiUnhealthy, 3),
        band(200.0, VERY_UNHEALTHY, ColorToken::AqiVeryUnhealthy, 4),
    ],
    top: HAZARDOUS_BAND,
};

pub static NO2: BandTable = BandTable {
    name: "NO2",
    bounded: &[
        band(53.0, GOOD, ColorToken::AqiGood, 0),
        band(100.0, MODERATE, ColorToken::AqiModerate, 1),
        band(360.0, SENSITIVE, ColorToken::AqiUnhealthySensitive, 2),
        band(649.0, UNHEALTHY, ColorToken::AqiUnhealthy, 3),
        band(1249.0, VERY_UNHEALTHY, ColorToken::AqiVeryUnhealthy, 4),
    ],
    top: HAZARDOUS_BAND,
};

pub static UV_INDEX: BandTable = BandTable {
    name: "UV index",
    bounded: &[
        band(2.0, "Low", ColorToken::AccentGreen, 0),
        band(5.0, "Moderate", ColorToken::AccentYellow, 1),
        band(7.0, "High", ColorToken::AccentPink, 2),
        band(10.0, "Very High", ColorToken::AccentRed, 3),
    ],
    top: band(f64::INFINITY, "Extreme", ColorToken::AqiHazardous, 4),
};

/// Table for a pollutant
pub fn pollutant_table(pollutant: Pollutant) -> &'static BandTable {
    match pollutant {
        Pollutant::Pm25 => &PM25,
        Pollutant::Pm10 => &PM10,
        Pollutant::O3 => &O3,
        Pollutant::No2 => &NO2,
    }
}

/// Number of lit segments (1-6) on the six-step AQI scale
pub fn aqi_scale_segments(aqi: f64) -> u8 {
    AQI.classify(aqi).severity + 1
}

/// 16-point compass labels, clockwise from north
const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Compass label for a wind direction in degrees
pub fn compass_direction(degrees: f64) -> &'static str {
    let normalized = degrees.rem_euclid(360.0);
    // NaN casts to 0, which reads as north
    let index = (normalized / 22.5).round() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[index]
}

/// Wind force on the Beaufort scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BeaufortForce {
    /// Force number 0-12
    pub force: u8,
    /// Descriptive name
    pub description: &'static str,
}

/// Upper speed limits (exclusive, m/s) for forces 0-11
const BEAUFORT_LIMITS: [f64; 12] = [
    0.5, 1.5, 3.3, 5.5, 7.9, 10.7, 13.8, 17.1, 20.7, 24.4, 28.4, 32.6,
];

const BEAUFORT_NAMES: [&str; 13] = [
    "Calm",
    "Light air",
    "Light breeze",
    "Gentle breeze",
    "Moderate breeze",
    "Fresh breeze",
    "Strong breeze",
    "High wind",
    "Gale",
    "Strong gale",
    "Storm",
    "Violent storm",
    "Hurricane",
];

/// Beaufort force for a wind speed in m/s
pub fn beaufort(speed: f64) -> BeaufortForce {
    let force = BEAUFORT_LIMITS
        .iter()
        .position(|limit| speed < *limit)
        .unwrap_or(BEAUFORT_LIMITS.len());
    BeaufortForce {
        force: force as u8,
        description: BEAUFORT_NAMES[force],
    }
}
