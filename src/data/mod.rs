//! Core data models for skydash
//!
//! This module contains the value types shared by the API clients, the
//! forecast engine and the dashboard: locations, current conditions,
//! forecast samples, daily summaries and air quality readings.

pub mod air_quality;
pub mod condition;
pub mod weather;

pub use air_quality::{AirQualityClient, AirQualityError};
pub use condition::{condition_icon, Background, ConditionFamily};
pub use weather::{WeatherClient, WeatherError};

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

/// A named place with coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Display name (city)
    pub name: String,
    /// Latitude coordinate
    pub latitude: f64,
    /// Longitude coordinate
    pub longitude: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }
}

/// Observed weather at a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Observation time (Unix seconds, UTC)
    pub observed_at: i64,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Feels-like temperature in Celsius
    pub feels_like: f64,
    /// Lowest temperature currently observed in the area
    pub temperature_min: f64,
    /// Highest temperature currently observed in the area
    pub temperature_max: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Sea-level pressure in hPa
    pub pressure: u32,
    /// Visibility in meters, if reported
    pub visibility: Option<u32>,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Meteorological wind direction in degrees
    pub wind_degrees: f64,
    /// OpenWeatherMap condition code
    pub weather_code: u16,
    /// Human-readable condition, lowercase as delivered
    pub description: String,
    /// OpenWeatherMap icon id, e.g. "03d"
    pub icon: String,
    /// Sunrise (Unix seconds, UTC)
    pub sunrise: i64,
    /// Sunset (Unix seconds, UTC)
    pub sunset: i64,
    /// Shift from UTC in seconds for the location
    pub timezone_offset: i32,
}

impl CurrentConditions {
    /// Whether the provider flagged this observation as night-time
    pub fn is_night(&self) -> bool {
        self.icon.ends_with('n')
    }

    /// The location's fixed UTC offset, falling back to UTC when out of range
    pub fn timezone(&self) -> FixedOffset {
        timezone_from_offset(self.timezone_offset)
    }
}

/// Converts a UTC offset in seconds into a `FixedOffset`
pub fn timezone_from_offset(offset_seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(offset_seconds).unwrap_or(Utc.fix())
}

/// Converts Unix seconds into a datetime in the given offset
pub fn local_datetime(timestamp: i64, tz: FixedOffset) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.with_timezone(&tz))
}

/// One 3-hour forecast slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Start of the slot (Unix seconds, UTC)
    pub timestamp: i64,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Feels-like temperature in Celsius
    pub feels_like: f64,
    /// OpenWeatherMap condition code
    pub weather_code: u16,
    /// Probability of precipitation in [0, 1], if delivered
    pub precipitation_probability: Option<f64>,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Meteorological wind direction in degrees
    pub wind_degrees: f64,
    /// Whether the slot falls in the night part of the day
    #[serde(default)]
    pub is_night: bool,
}

/// Aggregated forecast for one UTC calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Calendar day (UTC)
    pub date: NaiveDate,
    /// Timestamp of the first sample seen for this day
    pub representative_timestamp: i64,
    /// Lowest sample temperature
    pub temperature_min: f64,
    /// Highest sample temperature
    pub temperature_max: f64,
    /// Most frequent condition code, first-seen wins ties
    pub dominant_weather_code: u16,
    /// Mean probability of precipitation in [0, 1]
    pub mean_precipitation_probability: f64,
}

impl DailySummary {
    /// Day key in "YYYY-MM-DD" form
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Pollutants tracked on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Pm25,
    Pm10,
    O3,
    No2,
}

impl Pollutant {
    /// All pollutants in display order
    pub const ALL: [Pollutant; 4] = [Pollutant::Pm25, Pollutant::Pm10, Pollutant::O3, Pollutant::No2];

    /// Short display label
    pub fn label(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::O3 => "O3",
            Pollutant::No2 => "NO2",
        }
    }
}

/// An air quality index with optional per-pollutant values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityReading {
    /// Overall AQI
    pub index: u32,
    /// Concentration per pollutant; missing keys were not reported
    pub pollutants: BTreeMap<Pollutant, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_conditions(icon: &str, offset: i32) -> CurrentConditions {
        CurrentConditions {
            observed_at: 1_721_052_000,
            temperature: 22.0,
            feels_like: 23.0,
            temperature_min: 20.0,
            temperature_max: 24.0,
            humidity: 65,
            pressure: 1015,
            visibility: Some(10_000),
            wind_speed: 4.5,
            wind_degrees: 220.0,
            weather_code: 802,
            description: "scattered clouds".to_string(),
            icon: icon.to_string(),
            sunrise: 1_721_016_000,
            sunset: 1_721_073_600,
            timezone_offset: offset,
        }
    }

    #[test]
    fn test_is_night_follows_icon_suffix() {
        assert!(!sample_conditions("03d", 0).is_night());
        assert!(sample_conditions("03n", 0).is_night());
    }

    #[test]
    fn test_timezone_uses_offset() {
        let conditions = sample_conditions("01d", 3600);
        assert_eq!(conditions.timezone().local_minus_utc(), 3600);
    }

    #[test]
    fn test_timezone_out_of_range_falls_back_to_utc() {
        assert_eq!(timezone_from_offset(200_000).local_minus_utc(), 0);
    }

    #[test]
    fn test_local_datetime_applies_offset() {
        use chrono::Timelike;

        // 2024-07-15T12:00:00Z
        let dt = local_datetime(1_721_044_800, timezone_from_offset(-7 * 3600)).unwrap();
        assert_eq!(dt.hour(), 5);
    }

    #[test]
    fn test_daily_summary_date_key() {
        let summary = DailySummary {
            date: NaiveDate::from_ymd_opt(2024, 7, 5).unwrap(),
            representative_timestamp: 0,
            temperature_min: 1.0,
            temperature_max: 2.0,
            dominant_weather_code: 800,
            mean_precipitation_probability: 0.0,
        };
        assert_eq!(summary.date_key(), "2024-07-05");
    }

    #[test]
    fn test_pollutant_labels() {
        let labels: Vec<&str> = Pollutant::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["PM2.5", "PM10", "O3", "NO2"]);
    }
}
