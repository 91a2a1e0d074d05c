//! Fallback simulators for data the live sources do not provide
//!
//! The free OpenWeatherMap tier carries no UV index, and air quality stations
//! are not available everywhere. These functions synthesize plausible values
//! from the time of day and the current condition code so the dashboard can
//! always show something. They never fail.

use std::collections::BTreeMap;

use rand::Rng;

use crate::data::{AirQualityReading, ConditionFamily, Pollutant};

/// Peak simulated UV index at solar noon under a clear sky
const UV_PEAK: f64 = 8.0;

/// Default relative variation applied to simulated pollutant values
const DEFAULT_JITTER_AMPLITUDE: f64 = 0.2;

/// Humidity above which a clear sky is assumed to trap pollutants
const HUMID_CLEAR_SKY_PERCENT: f64 = 70.0;

/// Simulates the UV index for a local hour (0-23) and condition code.
///
/// A parabola peaking at noon over 06:00-18:00, zero outside it, scaled by
/// how much the sky is obstructed and rounded to a whole index.
pub fn simulate_uv_index(local_hour: u32, weather_code: u16) -> f64 {
    let base = if (6..=18).contains(&local_hour) {
        let offset = (f64::from(local_hour) - 12.0) / 6.0;
        (UV_PEAK * (1.0 - offset * offset)).max(0.0)
    } else {
        0.0
    };

    (base * clarity_factor(weather_code)).round()
}

/// Share of UV that reaches the ground for a condition code
fn clarity_factor(weather_code: u16) -> f64 {
    match weather_code {
        800..=801 => 1.0,
        802..=804 => 0.7,
        _ => 0.3,
    }
}

/// Simulates an AQI value from the weather and humidity
pub fn simulate_aqi(weather_code: u16, humidity_percent: f64) -> u32 {
    match ConditionFamily::from_code(weather_code) {
        // Storms and precipitation wash the air out
        ConditionFamily::Thunderstorm => 30,
        ConditionFamily::Rain => 40,
        ConditionFamily::Snow => 35,
        // Mist and fog trap pollutants
        ConditionFamily::Atmosphere => 120,
        ConditionFamily::Clear if humidity_percent > HUMID_CLEAR_SKY_PERCENT => 90,
        ConditionFamily::Clear => 50,
        ConditionFamily::FewClouds | ConditionFamily::Clouds => 80,
        ConditionFamily::Unknown => 70,
    }
}

/// Typical pollutant concentrations for an AQI value
pub fn baseline_pollutants(aqi: u32) -> BTreeMap<Pollutant, f64> {
    // PM2.5, PM10, O3, NO2
    let values: [f64; 4] = match aqi {
        0..=50 => [8.0, 20.0, 30.0, 20.0],
        51..=100 => [20.0, 50.0, 60.0, 50.0],
        101..=150 => [40.0, 100.0, 80.0, 150.0],
        151..=200 => [70.0, 150.0, 95.0, 200.0],
        201..=300 => [120.0, 250.0, 150.0, 400.0],
        _ => [250.0, 350.0, 200.0, 650.0],
    };

    Pollutant::ALL.into_iter().zip(values).collect()
}

/// Relative random variation applied to simulated pollutant values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jitter {
    /// Maximum relative deviation, e.g. 0.2 for ±20%
    pub amplitude: f64,
}

impl Default for Jitter {
    fn default() -> Self {
        Self {
            amplitude: DEFAULT_JITTER_AMPLITUDE,
        }
    }
}

impl Jitter {
    /// No variation; simulated values equal their baselines
    pub fn none() -> Self {
        Self { amplitude: 0.0 }
    }

    /// Applies `value * (1 + u * amplitude)` with `u` uniform in [-1, 1]
    pub fn apply<R: Rng>(&self, value: f64, rng: &mut R) -> f64 {
        if self.amplitude == 0.0 {
            return value;
        }
        let unit: f64 = rng.random_range(-1.0..=1.0);
        value * (1.0 + unit * self.amplitude)
    }
}

/// Simulates a full air quality reading when no live data is available
pub fn simulate_air_quality<R: Rng>(
    weather_code: u16,
    humidity_percent: f64,
    jitter: &Jitter,
    rng: &mut R,
) -> AirQualityReading {
    let index = simulate_aqi(weather_code, humidity_percent);
    let pollutants = baseline_pollutants(index)
        .into_iter()
        .map(|(pollutant, value)| (pollutant, jitter.apply(value, rng)))
        .collect();

    AirQualityReading { index, pollutants }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_uv_peaks_at_noon_under_clear_sky() {
        assert_eq!(simulate_uv_index(12, 800), 8.0);
        assert_eq!(simulate_uv_index(12, 801), 8.0);
    }

    #[test]
    fn test_uv_is_zero_at_night() {
        assert_eq!(simulate_uv_index(0, 800), 0.0);
        assert_eq!(simulate_uv_index(5, 800), 0.0);
        assert_eq!(simulate_uv_index(19, 800), 0.0);
        assert_eq!(simulate_uv_index(23, 800), 0.0);
    }

    #[test]
    fn test_uv_is_zero_at_the_edges_of_daylight() {
        assert_eq!(simulate_uv_index(6, 800), 0.0);
        assert_eq!(simulate_uv_index(18, 800), 0.0);
    }

    #[test]
    fn test_uv_reduced_by_clouds_and_fog() {
        // 8 * 0.7 = 5.6
        assert_eq!(simulate_uv_index(12, 803), 6.0);
        // 8 * 0.3 = 2.4
        assert_eq!(simulate_uv_index(12, 701), 2.0);
        assert_eq!(simulate_uv_index(12, 500), 2.0);
    }

    #[test]
    fn test_uv_shoulder_hours() {
        // 8 * (1 - (3/6)^2) = 6
        assert_eq!(simulate_uv_index(9, 800), 6.0);
        assert_eq!(simulate_uv_index(15, 800), 6.0);
    }

    #[test]
    fn test_simulate_aqi_table() {
        assert_eq!(simulate_aqi(211, 50.0), 30);
        assert_eq!(simulate_aqi(311, 50.0), 40);
        assert_eq!(simulate_aqi(502, 50.0), 40);
        assert_eq!(simulate_aqi(601, 50.0), 35);
        assert_eq!(simulate_aqi(741, 50.0), 120);
        assert_eq!(simulate_aqi(800, 50.0), 50);
        assert_eq!(simulate_aqi(800, 70.0), 50);
        assert_eq!(simulate_aqi(800, 71.0), 90);
        assert_eq!(simulate_aqi(802, 50.0), 80);
        assert_eq!(simulate_aqi(100, 50.0), 70);
    }

    #[test]
    fn test_baseline_pollutants_per_band() {
        let good = baseline_pollutants(45);
        assert_eq!(good[&Pollutant::Pm25], 8.0);
        assert_eq!(good[&Pollutant::No2], 20.0);

        let sensitive = baseline_pollutants(120);
        assert_eq!(sensitive[&Pollutant::Pm10], 100.0);
        assert_eq!(sensitive[&Pollutant::No2], 150.0);

        let hazardous = baseline_pollutants(400);
        assert_eq!(hazardous[&Pollutant::O3], 200.0);
        assert_eq!(hazardous[&Pollutant::No2], 650.0);
        assert_eq!(hazardous.len(), 4);
    }

    #[test]
    fn test_zero_jitter_reproduces_baseline() {
        let mut rng = StdRng::seed_from_u64(7);
        let reading = simulate_air_quality(741, 50.0, &Jitter::none(), &mut rng);

        assert_eq!(reading.index, 120);
        assert_eq!(reading.pollutants, baseline_pollutants(120));
    }

    #[test]
    fn test_default_jitter_stays_within_twenty_percent() {
        let mut rng = StdRng::seed_from_u64(42);
        let baseline = baseline_pollutants(50);

        for _ in 0..200 {
            let reading = simulate_air_quality(800, 40.0, &Jitter::default(), &mut rng);
            for (pollutant, value) in &reading.pollutants {
                let base = baseline[pollutant];
                assert!(*value >= base * 0.8 - 1e-9 && *value <= base * 1.2 + 1e-9);
            }
        }
    }

    #[test]
    fn test_seeded_jitter_is_reproducible() {
        let first = simulate_air_quality(800, 40.0, &Jitter::default(), &mut StdRng::seed_from_u64(3));
        let second = simulate_air_quality(800, 40.0, &Jitter::default(), &mut StdRng::seed_from_u64(3));
        assert_eq!(first, second);
    }
}
