//! Daily aggregation of 3-hour forecast samples
//!
//! Buckets forecast samples by UTC calendar day and reduces each bucket to a
//! [`DailySummary`]: temperature range, dominant condition and mean chance of
//! precipitation.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use thiserror::Error;

use crate::data::{DailySummary, ForecastSample};

/// Errors that can occur while aggregating forecast samples
#[derive(Debug, Error, PartialEq)]
pub enum AggregateError {
    /// A sample lacks a value required for aggregation
    #[error("Sample at {timestamp} is missing required field '{field}'")]
    MissingField {
        field: &'static str,
        timestamp: i64,
    },

    /// A day bucket ended up with no samples
    #[error("No samples for day {0}")]
    EmptyGroup(NaiveDate),

    /// A sample timestamp cannot be represented as a calendar date
    #[error("Timestamp {0} is out of range")]
    InvalidTimestamp(i64),
}

/// Samples collected for one calendar day, in input order
#[derive(Debug, Default)]
struct DayBucket<'a> {
    samples: Vec<&'a ForecastSample>,
}

/// Aggregates forecast samples into one summary per UTC calendar day.
///
/// # Returns
/// * `Ok(Vec<DailySummary>)` - Summaries ascending by representative timestamp;
///   empty when `samples` is empty
/// * `Err(AggregateError)` - If a sample lacks a precipitation probability
///
/// # Behavior
/// - The representative timestamp of a day is its first sample in input order
/// - The dominant condition is the most frequent code; ties go to the code
///   that appeared first within the day
pub fn aggregate_daily(samples: &[ForecastSample]) -> Result<Vec<DailySummary>, AggregateError> {
    let mut buckets: BTreeMap<NaiveDate, DayBucket<'_>> = BTreeMap::new();

    for sample in samples {
        let date = utc_date(sample.timestamp)?;
        buckets.entry(date).or_default().samples.push(sample);
    }

    let mut summaries = buckets
        .into_iter()
        .map(|(date, bucket)| summarize_day(date, &bucket.samples))
        .collect::<Result<Vec<_>, _>>()?;

    summaries.sort_by_key(|summary| summary.representative_timestamp);
    Ok(summaries)
}

/// UTC calendar date of a Unix timestamp
fn utc_date(timestamp: i64) -> Result<NaiveDate, AggregateError> {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.date_naive())
        .ok_or(AggregateError::InvalidTimestamp(timestamp))
}

/// Reduces one day's samples to a summary
fn summarize_day(
    date: NaiveDate,
    samples: &[&ForecastSample],
) -> Result<DailySummary, AggregateError> {
    let first = samples.first().ok_or(AggregateError::EmptyGroup(date))?;

    let (temperature_min, temperature_max) = samples.iter().fold(
        (first.temperature, first.temperature),
        |(min, max), sample| (min.min(sample.temperature), max.max(sample.temperature)),
    );

    Ok(DailySummary {
        date,
        representative_timestamp: first.timestamp,
        temperature_min,
        temperature_max,
        dominant_weather_code: dominant_code(samples).ok_or(AggregateError::EmptyGroup(date))?,
        mean_precipitation_probability: mean_precipitation(samples)?,
    })
}

/// Most frequent weather code; the earliest code wins a tie
fn dominant_code(samples: &[&ForecastSample]) -> Option<u16> {
    // (code, count) in first-seen order
    let mut counts: Vec<(u16, usize)> = Vec::new();
    for sample in samples {
        match counts.iter_mut().find(|(code, _)| *code == sample.weather_code) {
            Some((_, count)) => *count += 1,
            None => counts.push((sample.weather_code, 1)),
        }
    }

    let mut best: Option<(u16, usize)> = None;
    for (code, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((code, count));
        }
    }
    best.map(|(code, _)| code)
}

/// Arithmetic mean of the precipitation probabilities, clamped to [0, 1]
fn mean_precipitation(samples: &[&ForecastSample]) -> Result<f64, AggregateError> {
    let values = samples
        .iter()
        .map(|sample| {
            sample
                .precipitation_probability
                .ok_or(AggregateError::MissingField {
                    field: "precipitation_probability",
                    timestamp: sample.timestamp,
                })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let Some(&anchor) = values.first() else {
        return Ok(0.0);
    };

    // Summing offsets from the first value keeps a uniform day exact.
    let offset_sum: f64 = values.iter().map(|value| value - anchor).sum();
    let mean = anchor + offset_sum / values.len() as f64;
    Ok(mean.clamp(0.0, 1.0))
}
