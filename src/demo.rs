//! Sample data for running without an API key
//!
//! The values are fixed apart from being anchored at `now`, so the demo
//! dashboard looks the same on every refresh.

use std::collections::BTreeMap;

use crate::dashboard::SnapshotInputs;
use crate::data::{AirQualityReading, CurrentConditions, ForecastSample, Location, Pollutant};

/// Number of 3-hour slots in the sample forecast (5 days)
const SAMPLE_SLOTS: i64 = 40;
const SLOT_SECONDS: i64 = 3 * 3_600;
const SIX_HOURS: i64 = 6 * 3_600;

/// Placeholder location shown in demo mode
pub fn sample_location() -> Location {
    Location::new("Sample City", 40.7128, -74.0060)
}

/// Sample inputs anchored at `now` (Unix seconds)
pub fn sample_inputs(now: i64) -> SnapshotInputs {
    SnapshotInputs {
        location: sample_location(),
        current: sample_current(now),
        forecast: sample_forecast(now),
        air_quality: Some(AirQualityReading {
            index: 45,
            pollutants: BTreeMap::from([
                (Pollutant::Pm25, 10.0),
                (Pollutant::Pm10, 25.0),
                (Pollutant::O3, 35.0),
                (Pollutant::No2, 15.0),
            ]),
        }),
    }
}

fn sample_current(now: i64) -> CurrentConditions {
    CurrentConditions {
        observed_at: now,
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
        icon: "03d".to_string(),
        sunrise: now - SIX_HOURS,
        sunset: now + SIX_HOURS,
        timezone_offset: 0,
    }
}

/// Temperatures follow a sine wave around 22°C
fn sample_forecast(now: i64) -> Vec<ForecastSample> {
    (0..SAMPLE_SLOTS)
        .map(|i| {
            let wave = (i as f64 / 3.0).sin();
            ForecastSample {
                timestamp: now + i * SLOT_SECONDS,
                temperature: 22.0 + wave * 4.0,
                feels_like: 23.0 + wave * 3.0,
                weather_code: if i % 8 == 0 { 800 } else { 802 },
                precipitation_probability: Some((i % 5) as f64 * 0.1),
                wind_speed: 4.5 + (i % 3) as f64 * 0.75,
                wind_degrees: 220.0 + ((i % 5) - 2) as f64 * 10.0,
                is_night: !(7..18).contains(&(i % 8 * 3)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DashboardSnapshot;
    use crate::simulate::Jitter;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const NOW: i64 = 1_721_044_800;

    #[test]
    fn test_sample_inputs_shape() {
        let inputs = sample_inputs(NOW);

        assert_eq!(inputs.location.name, "Sample City");
        assert_eq!(inputs.forecast.len(), 40);
        assert_eq!(inputs.forecast[0].timestamp, NOW);
        assert_eq!(inputs.forecast[39].timestamp, NOW + 39 * SLOT_SECONDS);
        assert!(inputs.current.sunrise < NOW && NOW < inputs.current.sunset);
        assert!(inputs
            .forecast
            .iter()
            .all(|s| matches!(s.precipitation_probability, Some(p) if (0.0..=0.4).contains(&p))));
    }

    #[test]
    fn test_sample_is_deterministic() {
        assert_eq!(sample_inputs(NOW), sample_inputs(NOW));
    }

    #[test]
    fn test_sample_builds_a_full_dashboard() {
        let snapshot =
            DashboardSnapshot::build(sample_inputs(NOW), NOW, &Jitter::default(), &mut StdRng::seed_from_u64(9))
                .expect("sample data aggregates");

        assert_eq!(snapshot.hourly.len(), 8);
        assert_eq!(snapshot.daily.len(), 5);
        assert_eq!(snapshot.air_quality.index, 45);
        assert_eq!(snapshot.air_quality.band.label, "Good");
        let sun = snapshot.sun.expect("sun panel");
        assert!((sun.fraction - 0.5).abs() < 1e-9);
    }
}
