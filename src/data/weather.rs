//! OpenWeatherMap API client
//!
//! This module fetches current conditions, the 5-day/3-hour forecast and
//! geocoding results from OpenWeatherMap and parses them into our data
//! structures. All requests use metric units.

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument};

use super::{CurrentConditions, ForecastSample, Location};

/// Base URL for the OpenWeatherMap API
const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";
const GEOCODE_PATH: &str = "/geo/1.0/direct";
const REVERSE_GEOCODE_PATH: &str = "/geo/1.0/reverse";

/// Unit system requested from the API (Celsius, m/s)
const UNITS: &str = "metric";

/// Errors that can occur when fetching weather data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("{endpoint} API error: {status}")]
    Status { endpoint: &'static str, status: u16 },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// Geocoding returned no match
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// The request URL could not be built
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

/// Client for the OpenWeatherMap weather and geocoding APIs
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    /// Create a new WeatherClient for the public API
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, OPENWEATHER_BASE_URL)
    }

    /// Create a new WeatherClient against a custom base URL (mock servers, proxies)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Fetch current conditions for the given coordinates
    #[instrument(skip(self), fields(lat = %lat, lon = %lon))]
    pub async fn fetch_current(&self, lat: f64, lon: f64) -> Result<CurrentConditions, WeatherError> {
        let params = coordinate_params(lat, lon, true);
        let response: OwmCurrentResponse = self.get_json("Current Weather", CURRENT_PATH, &params).await?;
        parse_current(response)
    }

    /// Fetch the 5-day forecast in 3-hour slots for the given coordinates
    #[instrument(skip(self), fields(lat = %lat, lon = %lon))]
    pub async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<Vec<ForecastSample>, WeatherError> {
        let params = coordinate_params(lat, lon, true);
        let response: OwmForecastResponse = self.get_json("Forecast", FORECAST_PATH, &params).await?;
        parse_forecast(response)
    }

    /// Resolve a city name to coordinates
    #[instrument(skip(self))]
    pub async fn geocode(&self, city: &str) -> Result<Location, WeatherError> {
        let params = vec![("q", city.to_string()), ("limit", "1".to_string())];
        let results: Vec<OwmGeoResult> = self.get_json("Geocoding", GEOCODE_PATH, &params).await?;
        first_location(results, city)
    }

    /// Resolve coordinates to a place name
    #[instrument(skip(self), fields(lat = %lat, lon = %lon))]
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Location, WeatherError> {
        let mut params = coordinate_params(lat, lon, false);
        params.push(("limit", "1".to_string()));
        let results: Vec<OwmGeoResult> = self
            .get_json("Reverse geocoding", REVERSE_GEOCODE_PATH, &params)
            .await?;

        // Keep the coordinates the user asked for, only borrow the name
        let place = first_location(results, &format!("{lat},{lon}"))?;
        Ok(Location::new(place.name, lat, lon))
    }

    /// Issues one GET request and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, WeatherError> {
        let url = Url::parse_with_params(
            &format!("{}{}", self.base_url, path),
            params
                .iter()
                .map(|(key, value)| (*key, value.as_str()))
                .chain(std::iter::once(("appid", self.api_key.as_str()))),
        )
        .map_err(|e| WeatherError::InvalidUrl(e.to_string()))?;

        debug!(endpoint, path, "Requesting OpenWeatherMap");

        // The URL carries the API key, keep it out of error messages
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(reqwest::Error::without_url)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Query parameters for a coordinate lookup
fn coordinate_params(lat: f64, lon: f64, with_units: bool) -> Vec<(&'static str, String)> {
    let mut params = vec![("lat", lat.to_string()), ("lon", lon.to_string())];
    if with_units {
        params.push(("units", UNITS.to_string()));
    }
    params
}

/// Parse the current weather response into CurrentConditions
fn parse_current(response: OwmCurrentResponse) -> Result<CurrentConditions, WeatherError> {
    let condition = response
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::MissingField("weather".to_string()))?;

    Ok(CurrentConditions {
        observed_at: response.dt,
        temperature: response.main.temp,
        feels_like: response.main.feels_like,
        temperature_min: response.main.temp_min,
        temperature_max: response.main.temp_max,
        humidity: response.main.humidity.clamp(0.0, 100.0).round() as u8,
        pressure: response.main.pressure.max(0.0).round() as u32,
        visibility: response.visibility,
        wind_speed: response.wind.speed,
        wind_degrees: response.wind.deg.unwrap_or(0.0),
        weather_code: condition.id,
        description: condition.description,
        icon: condition.icon,
        sunrise: response.sys.sunrise,
        sunset: response.sys.sunset,
        timezone_offset: response.timezone,
    })
}

/// Parse the forecast list into ForecastSamples
fn parse_forecast(response: OwmForecastResponse) -> Result<Vec<ForecastSample>, WeatherError> {
    response
        .list
        .into_iter()
        .map(|entry| {
            let condition = entry.weather.first().ok_or_else(|| {
                WeatherError::MissingField(format!("weather for forecast slot {}", entry.dt))
            })?;

            Ok(ForecastSample {
                timestamp: entry.dt,
                temperature: entry.main.temp,
                feels_like: entry.main.feels_like,
                weather_code: condition.id,
                precipitation_probability: entry.pop,
                wind_speed: entry.wind.speed,
                wind_degrees: entry.wind.deg.unwrap_or(0.0),
                is_night: entry.sys.map_or(condition.icon.ends_with('n'), |sys| sys.pod == "n"),
            })
        })
        .collect()
}

/// First geocoding hit as a Location
fn first_location(results: Vec<OwmGeoResult>, query: &str) -> Result<Location, WeatherError> {
    results
        .into_iter()
        .next()
        .map(|hit| Location::new(hit.name, hit.lat, hit.lon))
        .ok_or_else(|| WeatherError::LocationNotFound(query.to_string()))
}

/// Condition entry shared by the current and forecast responses
#[derive(Debug, Deserialize)]
struct OwmCondition {
    id: u16,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

/// `main` block of the current weather response
#[derive(Debug, Deserialize)]
struct OwmCurrentMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmCurrentSys {
    sunrise: i64,
    sunset: i64,
}

/// Current weather response structure
#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    weather: Vec<OwmCondition>,
    main: OwmCurrentMain,
    visibility: Option<u32>,
    wind: OwmWind,
    dt: i64,
    sys: OwmCurrentSys,
    #[serde(default)]
    timezone: i32,
}

/// `main` block of a forecast entry
#[derive(Debug, Deserialize)]
struct OwmForecastMain {
    temp: f64,
    feels_like: f64,
}

/// Day/night marker of a forecast entry
#[derive(Debug, Deserialize)]
struct OwmForecastSys {
    pod: String,
}

#[derive(Debug, Deserialize)]
struct OwmForecastEntry {
    dt: i64,
    main: OwmForecastMain,
    weather: Vec<OwmCondition>,
    wind: OwmWind,
    pop: Option<f64>,
    sys: Option<OwmForecastSys>,
}

/// 5-day/3-hour forecast response structure
#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    list: Vec<OwmForecastEntry>,
}

/// One geocoding hit
#[derive(Debug, Deserialize)]
struct OwmGeoResult {
    name: String,
    lat: f64,
    lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sample valid current weather response
    const CURRENT_RESPONSE: &str = r#"{
        "coord": {"lon": -0.1257, "lat": 51.5085},
        "weather": [{"id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03d"}],
        "base": "stations",
        "main": {
            "temp": 22.4,
            "feels_like": 23.1,
            "temp_min": 20.2,
            "temp_max": 24.6,
            "pressure": 1015,
            "humidity": 65
        },
        "visibility": 10000,
        "wind": {"speed": 4.5, "deg": 220},
        "clouds": {"all": 40},
        "dt": 1721052000,
        "sys": {"country": "GB", "sunrise": 1721016000, "sunset": 1721073600},
        "timezone": 3600,
        "id": 2643743,
        "name": "London",
        "cod": 200
    }"#;

    /// Sample forecast response with three slots
    const FORECAST_RESPONSE: &str = r#"{
        "cod": "200",
        "message": 0,
        "cnt": 3,
        "list": [
            {
                "dt": 1721001600,
                "main": {"temp": 15.2, "feels_like": 14.8, "humidity": 80},
                "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01n"}],
                "wind": {"speed": 2.1, "deg": 200},
                "pop": 0,
                "sys": {"pod": "n"},
                "dt_txt": "2024-07-15 00:00:00"
            },
            {
                "dt": 1721012400,
                "main": {"temp": 14.1, "feels_like": 13.5, "humidity": 84},
                "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10n"}],
                "wind": {"speed": 3.4, "deg": 210},
                "pop": 0.35,
                "sys": {"pod": "n"},
                "dt_txt": "2024-07-15 03:00:00"
            },
            {
                "dt": 1721023200,
                "main": {"temp": 16.8, "feels_like": 16.2, "humidity": 70},
                "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
                "wind": {"speed": 4.0},
                "sys": {"pod": "d"},
                "dt_txt": "2024-07-15 06:00:00"
            }
        ],
        "city": {"name": "London", "timezone": 3600, "sunrise": 1721016000, "sunset": 1721073600}
    }"#;

    #[test]
    fn test_parse_current_response() {
        let response: OwmCurrentResponse =
            serde_json::from_str(CURRENT_RESPONSE).expect("Failed to parse valid response");
        let current = parse_current(response).expect("Failed to parse conditions");

        assert_eq!(current.observed_at, 1_721_052_000);
        assert!((current.temperature - 22.4).abs() < 0.01);
        assert!((current.feels_like - 23.1).abs() < 0.01);
        assert!((current.temperature_min - 20.2).abs() < 0.01);
        assert!((current.temperature_max - 24.6).abs() < 0.01);
        assert_eq!(current.humidity, 65);
        assert_eq!(current.pressure, 1015);
        assert_eq!(current.visibility, Some(10_000));
        assert!((current.wind_speed - 4.5).abs() < 0.01);
        assert!((current.wind_degrees - 220.0).abs() < 0.01);
        assert_eq!(current.weather_code, 802);
        assert_eq!(current.description, "scattered clouds");
        assert_eq!(current.icon, "03d");
        assert_eq!(current.sunrise, 1_721_016_000);
        assert_eq!(current.sunset, 1_721_073_600);
        assert_eq!(current.timezone_offset, 3600);
    }

    #[test]
    fn test_parse_current_without_weather_entry() {
        let body = CURRENT_RESPONSE.replace(
            r#"[{"id": 802, "main": "Clouds", "description": "scattered clouds", "icon": "03d"}]"#,
            "[]",
        );
        let response: OwmCurrentResponse = serde_json::from_str(&body).expect("Failed to parse");

        match parse_current(response) {
            Err(WeatherError::MissingField(field)) => assert_eq!(field, "weather"),
            other => panic!("Expected MissingField error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_current_missing_main_block() {
        let missing_main = r#"{
            "weather": [{"id": 800, "description": "clear sky", "icon": "01d"}],
            "wind": {"speed": 1.0, "deg": 90},
            "dt": 1721052000,
            "sys": {"sunrise": 1721016000, "sunset": 1721073600}
        }"#;

        let result: Result<OwmCurrentResponse, _> = serde_json::from_str(missing_main);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_forecast_response() {
        let response: OwmForecastResponse =
            serde_json::from_str(FORECAST_RESPONSE).expect("Failed to parse forecast");
        let samples = parse_forecast(response).expect("Failed to parse samples");

        assert_eq!(samples.len(), 3);

        let first = &samples[0];
        assert_eq!(first.timestamp, 1_721_001_600);
        assert!((first.temperature - 15.2).abs() < 0.01);
        assert_eq!(first.weather_code, 800);
        assert_eq!(first.precipitation_probability, Some(0.0));
        assert!(first.is_night);

        let second = &samples[1];
        assert_eq!(second.weather_code, 500);
        assert_eq!(second.precipitation_probability, Some(0.35));
        assert!((second.wind_degrees - 210.0).abs() < 0.01);
    }

    #[test]
    fn test_forecast_keeps_missing_pop_as_none() {
        let response: OwmForecastResponse =
            serde_json::from_str(FORECAST_RESPONSE).expect("Failed to parse forecast");
        let samples = parse_forecast(response).expect("Failed to parse samples");

        let third = &samples[2];
        assert_eq!(third.precipitation_probability, None);
        assert_eq!(third.wind_degrees, 0.0);
        assert!(!third.is_night);
    }

    #[test]
    fn test_forecast_slot_without_weather_is_an_error() {
        let body = r#"{"list": [{
            "dt": 1721001600,
            "main": {"temp": 15.2, "feels_like": 14.8},
            "weather": [],
            "wind": {"speed": 2.1, "deg": 200},
            "pop": 0.1
        }]}"#;
        let response: OwmForecastResponse = serde_json::from_str(body).expect("Failed to parse");

        assert!(matches!(
            parse_forecast(response),
            Err(WeatherError::MissingField(_))
        ));
    }

    #[test]
    fn test_forecast_night_falls_back_to_icon() {
        let body = r#"{"list": [{
            "dt": 1721001600,
            "main": {"temp": 15.2, "feels_like": 14.8},
            "weather": [{"id": 800, "icon": "01n"}],
            "wind": {"speed": 2.1},
            "pop": 0.0
        }]}"#;
        let response: OwmForecastResponse = serde_json::from_str(body).expect("Failed to parse");
        let samples = parse_forecast(response).unwrap();
        assert!(samples[0].is_night);
    }

    #[test]
    fn test_first_location() {
        let results: Vec<OwmGeoResult> = serde_json::from_str(
            r#"[{"name": "London", "lat": 51.5073, "lon": -0.1276, "country": "GB", "state": "England"}]"#,
        )
        .unwrap();

        let location = first_location(results, "london").unwrap();
        assert_eq!(location.name, "London");
        assert!((location.latitude - 51.5073).abs() < 0.0001);
        assert!((location.longitude - (-0.1276)).abs() < 0.0001);
    }

    #[test]
    fn test_first_location_empty() {
        match first_location(Vec::new(), "Atlantis") {
            Err(WeatherError::LocationNotFound(query)) => assert_eq!(query, "Atlantis"),
            other => panic!("Expected LocationNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_coordinate_params() {
        let params = coordinate_params(51.5, -0.12, true);
        assert_eq!(
            params,
            vec![
                ("lat", "51.5".to_string()),
                ("lon", "-0.12".to_string()),
                ("units", "metric".to_string())
            ]
        );
        assert_eq!(coordinate_params(1.0, 2.0, false).len(), 2);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = WeatherClient::with_base_url("key", "http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
        assert_eq!(WeatherClient::new("key").base_url, OPENWEATHER_BASE_URL);
    }

    #[test]
    fn test_status_error_message() {
        let error = WeatherError::Status {
            endpoint: "Forecast",
            status: 401,
        };
        assert_eq!(error.to_string(), "Forecast API error: 401");
    }
}
