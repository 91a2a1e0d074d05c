//! Presentation-ready view of one dashboard refresh
//!
//! `DashboardSnapshot::build` turns raw inputs (current conditions, forecast
//! samples and an optional air quality reading) into the values every panel
//! shows. It is pure: the clock and the random source are passed in.

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};
use rand::Rng;
use serde::Serialize;
use tracing::warn;

use crate::aggregate::{aggregate_daily, AggregateError};
use crate::classify::{self, Band, BeaufortForce};
use crate::data::{
    condition_icon, local_datetime, AirQualityReading, Background, CurrentConditions, DailySummary,
    ForecastSample, Location, Pollutant,
};
use crate::format::{format_clock, format_hour, title_case, whole_degrees};
use crate::simulate::{simulate_air_quality, simulate_uv_index, Jitter};
use crate::sun::{arc_point, sun_position_fraction, ArcPoint};

/// Number of 3-hour slots in the hourly strip (24 hours)
pub const HOURLY_SLOTS: usize = 8;

/// Number of days in the outlook, not counting today
pub const OUTLOOK_DAYS: usize = 5;

/// Raw data gathered for one refresh
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotInputs {
    pub location: Location,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastSample>,
    /// Live air quality, `None` when the source had nothing usable
    pub air_quality: Option<AirQualityReading>,
}

/// Where the air quality numbers came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AirQualitySource {
    Live,
    Simulated,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentPanel {
    pub temperature: i64,
    pub feels_like: i64,
    pub high: i64,
    pub low: i64,
    pub description: String,
    pub icon: &'static str,
    pub weather_code: u16,
}

/// One slot of the hourly strip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlySlot {
    pub timestamp: i64,
    /// Local hour label, e.g. "3 PM"
    pub label: String,
    /// Unrounded, feeds the trend line
    pub temperature: f64,
    pub icon: &'static str,
    pub wind: BeaufortForce,
    pub uv_index: f64,
    pub uv_band: Band,
}

/// One day of the outlook
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyOutlook {
    pub date: NaiveDate,
    pub day_name: String,
    pub short_date: String,
    pub high: i64,
    pub low: i64,
    pub icon: &'static str,
    /// Chance of rain in whole percent
    pub rain_chance: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsPanel {
    pub feels_like: i64,
    /// Compass point the wind blows from
    pub wind_direction: &'static str,
    pub wind_speed: i64,
    pub humidity: u8,
    pub uv_index: f64,
    pub uv_band: Band,
    /// Visibility in km with one decimal, `None` when not reported
    pub visibility_km: Option<f64>,
    pub pressure: u32,
}

/// Value and band of one pollutant; `value` is `None` when not reported
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantLevel {
    pub pollutant: Pollutant,
    pub value: Option<f64>,
    pub band: Option<Band>,
}

impl PollutantLevel {
    /// Rounded value, or "N/A"
    pub fn display_value(&self) -> String {
        match self.value {
            Some(value) => format!("{}", value.round() as i64),
            None => "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirQualityPanel {
    pub source: AirQualitySource,
    pub index: u32,
    pub band: Band,
    /// Lit segments (1-6) of the AQI scale
    pub scale_segments: u8,
    pub pollutants: Vec<PollutantLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunPanel {
    pub sunrise: String,
    pub sunset: String,
    /// Progress of daylight in [0, 1]
    pub fraction: f64,
    pub position: ArcPoint,
}

/// Everything the dashboard renders for one refresh
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub location: Location,
    /// "Updated h:MM AM" in the location's time
    pub updated: String,
    pub current: CurrentPanel,
    pub hourly: Vec<HourlySlot>,
    pub daily: Vec<DailyOutlook>,
    pub details: DetailsPanel,
    pub air_quality: AirQualityPanel,
    /// `None` when the provider sent an unusable sunrise/sunset pair
    pub sun: Option<SunPanel>,
    pub background: Background,
}

impl DashboardSnapshot {
    /// Builds every panel from raw inputs.
    ///
    /// # Arguments
    /// * `inputs` - Data gathered for this refresh
    /// * `now` - Unix seconds used for the sun position and the current UV
    /// * `jitter` - Variation applied when air quality has to be simulated
    /// * `rng` - Random source for the jitter
    ///
    /// # Returns
    /// * `Err(AggregateError)` - If the forecast cannot be aggregated by day
    pub fn build<R: Rng>(
        inputs: SnapshotInputs,
        now: i64,
        jitter: &Jitter,
        rng: &mut R,
    ) -> Result<Self, AggregateError> {
        let SnapshotInputs {
            location,
            current,
            forecast,
            air_quality,
        } = inputs;

        let tz = current.timezone();
        let days = aggregate_daily(&forecast)?;

        Ok(Self {
            location,
            updated: format!("Updated {}", local_clock(now, tz)),
            current: current_panel(&current, days.first()),
            hourly: hourly_slots(&forecast, tz),
            daily: daily_outlook(&days),
            details: details_panel(&current, now, tz),
            air_quality: air_quality_panel(&current, air_quality, jitter, rng),
            sun: sun_panel(&current, now, tz),
            background: Background::select(current.weather_code, current.is_night()),
        })
    }
}

fn local_clock(timestamp: i64, tz: FixedOffset) -> String {
    local_datetime(timestamp, tz)
        .map(|time| format_clock(&time))
        .unwrap_or_else(|| "--:--".to_string())
}

fn local_hour(timestamp: i64, tz: FixedOffset) -> u32 {
    local_datetime(timestamp, tz).map_or(0, |time: DateTime<FixedOffset>| time.hour())
}

fn current_panel(current: &CurrentConditions, today: Option<&DailySummary>) -> CurrentPanel {
    let (high, low) = match today {
        Some(day) => (day.temperature_max, day.temperature_min),
        None => (current.temperature_max, current.temperature_min),
    };

    CurrentPanel {
        temperature: whole_degrees(current.temperature),
        feels_like: whole_degrees(current.feels_like),
        high: whole_degrees(high),
        low: whole_degrees(low),
        description: title_case(&current.description),
        icon: condition_icon(current.weather_code, current.is_night()),
        weather_code: current.weather_code,
    }
}

fn hourly_slots(forecast: &[ForecastSample], tz: FixedOffset) -> Vec<HourlySlot> {
    forecast
        .iter()
        .take(HOURLY_SLOTS)
        .map(|sample| {
            let hour = local_hour(sample.timestamp, tz);
            let uv_index = simulate_uv_index(hour, sample.weather_code);
            HourlySlot {
                timestamp: sample.timestamp,
                label: format_hour(hour),
                temperature: sample.temperature,
                icon: condition_icon(sample.weather_code, sample.is_night),
                wind: classify::beaufort(sample.wind_speed),
                uv_index,
                uv_band: *classify::UV_INDEX.classify(uv_index),
            }
        })
        .collect()
}

fn daily_outlook(days: &[DailySummary]) -> Vec<DailyOutlook> {
    // The first day is today, already covered by the current panel
    days.iter()
        .skip(1)
        .take(OUTLOOK_DAYS)
        .map(|day| DailyOutlook {
            date: day.date,
            day_name: crate::format::day_name(&day.date),
            short_date: crate::format::short_date(&day.date),
            high: whole_degrees(day.temperature_max),
            low: whole_degrees(day.temperature_min),
            icon: condition_icon(day.dominant_weather_code, false),
            rain_chance: (day.mean_precipitation_probability.clamp(0.0, 1.0) * 100.0).round() as u8,
        })
        .collect()
}

fn details_panel(current: &CurrentConditions, now: i64, tz: FixedOffset) -> DetailsPanel {
    let uv_index = simulate_uv_index(local_hour(now, tz), current.weather_code);

    DetailsPanel {
        feels_like: whole_degrees(current.feels_like),
        wind_direction: classify::compass_direction(current.wind_degrees),
        wind_speed: current.wind_speed.round() as i64,
        humidity: current.humidity,
        uv_index,
        uv_band: *classify::UV_INDEX.classify(uv_index),
        visibility_km: current
            .visibility
            .map(|meters| (f64::from(meters) / 100.0).round() / 10.0),
        pressure: current.pressure,
    }
}

fn air_quality_panel<R: Rng>(
    current: &CurrentConditions,
    live: Option<AirQualityReading>,
    jitter: &Jitter,
    rng: &mut R,
) -> AirQualityPanel {
    let (source, reading) = match live {
        Some(reading) => (AirQualitySource::Live, reading),
        None => (
            AirQualitySource::Simulated,
            simulate_air_quality(current.weather_code, f64::from(current.humidity), jitter, rng),
        ),
    };

    let index = f64::from(reading.index);
    let pollutants = Pollutant::ALL
        .into_iter()
        .map(|pollutant| {
            let value = reading.pollutants.get(&pollutant).copied();
            PollutantLevel {
                pollutant,
                value,
                band: value.map(|v| *classify::pollutant_table(pollutant).classify(v)),
            }
        })
        .collect();

    AirQualityPanel {
        source,
        index: reading.index,
        band: *classify::AQI.classify(index),
        scale_segments: classify::aqi_scale_segments(index),
        pollutants,
    }
}

fn sun_panel(current: &CurrentConditions, now: i64, tz: FixedOffset) -> Option<SunPanel> {
    match sun_position_fraction(now, current.sunrise, current.sunset) {
        Ok(fraction) => Some(SunPanel {
            sunrise: local_clock(current.sunrise, tz),
            sunset: local_clock(current.sunset, tz),
            fraction,
            position: arc_point(fraction),
        }),
        Err(e) => {
            warn!(error = %e, "Omitting sun panel");
            None
        }
    }
}
