//! Air quality API client for the World Air Quality Index project (WAQI)
//!
//! Looks up the nearest station by coordinates first and falls back to a
//! station search by city name. Responses without a usable AQI are treated
//! as unavailable so the caller can substitute simulated values.

use std::collections::BTreeMap;

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use super::{AirQualityReading, Pollutant};

/// Base URL of the WAQI feed endpoint
const WAQI_BASE_URL: &str = "https://api.waqi.info/feed";

/// Errors that can occur when fetching air quality data
#[derive(Debug, Error)]
pub enum AirQualityError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The API answered with a non-success status
    #[error("Air quality API error: {0}")]
    Status(u16),

    /// Neither lookup produced a usable reading
    #[error("No air quality data available for {0}")]
    Unavailable(String),
}

/// Response envelope from the feed endpoint
#[derive(Debug, Deserialize)]
struct FeedResponse {
    status: String,
    /// An object on success, an error message string otherwise
    #[serde(default)]
    data: Value,
}

/// Client for fetching station readings from WAQI
#[derive(Debug, Clone)]
pub struct AirQualityClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Base URL for the API (allows override for testing)
    base_url: String,
    token: String,
}

impl AirQualityClient {
    /// Creates a new AirQualityClient for the public API
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, WAQI_BASE_URL)
    }

    /// Creates a new AirQualityClient with a custom base URL
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Fetches the current reading near a location
    ///
    /// # Arguments
    /// * `lat`, `lon` - Coordinates used for the nearest-station lookup
    /// * `city` - Name used for the fallback station search
    ///
    /// # Returns
    /// * `Ok(AirQualityReading)` - AQI plus whichever pollutants the station reports
    /// * `Err(AirQualityError)` - If the request fails or no station has data
    ///
    /// # Behavior
    /// - Queries `geo:{lat};{lon}` first
    /// - If that body is not `ok` or lacks a numeric AQI, searches by city name once
    /// - Returns `Unavailable` when both lookups come back empty
    #[instrument(skip(self), fields(lat = %lat, lon = %lon))]
    pub async fn fetch(&self, lat: f64, lon: f64, city: &str) -> Result<AirQualityReading, AirQualityError> {
        let geo_station = format!("geo:{};{}", lat, lon);
        if let Some(reading) = self.fetch_station(&geo_station).await? {
            return Ok(reading);
        }

        debug!(city, "No reading for coordinates, searching by city");
        self.fetch_station(city)
            .await?
            .ok_or_else(|| AirQualityError::Unavailable(city.to_string()))
    }

    /// Queries one station path; `None` when the body holds no usable reading
    async fn fetch_station(&self, station: &str) -> Result<Option<AirQualityReading>, AirQualityError> {
        let url = self.station_url(station)?;
        debug!(station, "Requesting WAQI feed");

        // The URL carries the token, keep it out of error messages
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        if !status.is_success() {
            return Err(AirQualityError::Status(status.as_u16()));
        }

        let text = response.text().await.map_err(reqwest::Error::without_url)?;
        let feed: FeedResponse = serde_json::from_str(&text)?;
        Ok(parse_feed(&feed))
    }

    /// Builds `{base}/{station}/?token=...`, percent-encoding the station
    fn station_url(&self, station: &str) -> Result<Url, AirQualityError> {
        let unavailable = || AirQualityError::Unavailable(station.to_string());

        let mut url = Url::parse(&self.base_url).map_err(|_| unavailable())?;
        url.path_segments_mut()
            .map_err(|_| unavailable())?
            .pop_if_empty()
            .push(station)
            .push("");
        url.query_pairs_mut().append_pair("token", &self.token);
        Ok(url)
    }
}

/// Extracts a reading from a feed body
fn parse_feed(feed: &FeedResponse) -> Option<AirQualityReading> {
    if feed.status != "ok" {
        return None;
    }

    // Stations without a current value report "-" instead of a number
    let aqi = feed.data.get("aqi")?.as_f64()?;
    if !aqi.is_finite() || aqi < 0.0 {
        return None;
    }

    let iaqi = feed.data.get("iaqi");
    let pollutants: BTreeMap<Pollutant, f64> = Pollutant::ALL
        .into_iter()
        .filter_map(|pollutant| {
            let value = iaqi?.get(iaqi_key(pollutant))?.get("v")?.as_f64()?;
            Some((pollutant, value))
        })
        .collect();

    Some(AirQualityReading {
        index: aqi.round() as u32,
        pollutants,
    })
}

/// Key of a pollutant inside the `iaqi` object
fn iaqi_key(pollutant: Pollutant) -> &'static str {
    match pollutant {
        Pollutant::Pm25 => "pm25",
        Pollutant::Pm10 => "pm10",
        Pollutant::O3 => "o3",
        Pollutant::No2 => "no2",
    }
}
