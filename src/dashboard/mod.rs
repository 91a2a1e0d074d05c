//! Weather data orchestration
//!
//! The `Dashboard` owns the API clients, the saved preferences and the last
//! built snapshot. It fetches current conditions, the forecast and air quality
//! concurrently, isolates air quality failures behind the simulator and turns
//! the results into a [`DashboardSnapshot`].

pub mod snapshot;

pub use snapshot::{
    AirQualityPanel, AirQualitySource, CurrentPanel, DailyOutlook, DashboardSnapshot, DetailsPanel,
    HourlySlot, PollutantLevel, SnapshotInputs, SunPanel,
};

use chrono::Utc;
use futures::future::join3;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::aggregate::AggregateError;
use crate::data::{AirQualityClient, AirQualityReading, Location, WeatherClient, WeatherError};
use crate::demo;
use crate::prefs::{PreferenceStore, Preferences, Theme};
use crate::simulate::Jitter;

/// Errors that can occur while loading the dashboard
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Weather or geocoding request failed
    #[error(transparent)]
    Weather(#[from] WeatherError),

    /// The forecast could not be summarized by day
    #[error("Invalid forecast data: {0}")]
    Aggregate(#[from] AggregateError),

    /// Refresh was requested before any location was loaded
    #[error("No location selected")]
    NoLocation,
}

/// Session state behind the dashboard screen
pub struct Dashboard {
    /// OpenWeatherMap client; `None` runs on sample data
    weather_client: Option<WeatherClient>,
    /// WAQI client; `None` always simulates air quality
    air_quality_client: Option<AirQualityClient>,
    store: PreferenceStore,
    preferences: Preferences,
    jitter: Jitter,
    snapshot: Option<DashboardSnapshot>,
}

impl Dashboard {
    /// Creates a dashboard, loading saved preferences from `store`
    pub fn new(
        weather_client: Option<WeatherClient>,
        air_quality_client: Option<AirQualityClient>,
        store: PreferenceStore,
    ) -> Self {
        let preferences = store.load();
        Self {
            weather_client,
            air_quality_client,
            store,
            preferences,
            jitter: Jitter::default(),
            snapshot: None,
        }
    }

    /// Dashboard that only ever shows sample data
    pub fn demo(store: PreferenceStore) -> Self {
        Self::new(None, None, store)
    }

    /// Replaces the variation used for simulated air quality
    pub fn with_jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = jitter;
        self
    }

    /// Whether data comes from the built-in sample instead of the network
    pub fn is_demo(&self) -> bool {
        self.weather_client.is_none()
    }

    pub fn theme(&self) -> Theme {
        self.preferences.theme
    }

    /// Location saved from an earlier run
    pub fn saved_location(&self) -> Option<&Location> {
        self.preferences.location.as_ref()
    }

    /// Most recently built snapshot
    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.snapshot.as_ref()
    }

    /// Switches between dark and light and remembers the choice
    pub fn toggle_theme(&mut self) -> Theme {
        self.preferences.theme = self.preferences.theme.toggled();
        self.persist();
        self.preferences.theme
    }

    /// Resolves a city name and loads it
    pub async fn load_city(&mut self, name: &str) -> Result<&DashboardSnapshot, DashboardError> {
        let location = match &self.weather_client {
            Some(client) => client.geocode(name).await?,
            None => demo::sample_location(),
        };
        self.load_location(location).await
    }

    /// Names the place at the coordinates and loads it
    pub async fn load_coordinates(&mut self, lat: f64, lon: f64) -> Result<&DashboardSnapshot, DashboardError> {
        let location = match &self.weather_client {
            Some(client) => client.reverse_geocode(lat, lon).await?,
            None => demo::sample_location(),
        };
        self.load_location(location).await
    }

    /// Reloads the location currently shown, or the saved one
    pub async fn refresh(&mut self) -> Result<&DashboardSnapshot, DashboardError> {
        let location = self
            .snapshot
            .as_ref()
            .map(|snapshot| snapshot.location.clone())
            .or_else(|| self.preferences.location.clone())
            .ok_or(DashboardError::NoLocation)?;
        self.load_location(location).await
    }

    /// Remembers the location, fetches all sources and builds a new snapshot
    ///
    /// # Behavior
    /// - Current conditions, forecast and air quality are requested concurrently
    /// - A weather or forecast failure fails the whole load
    /// - An air quality failure is logged and replaced by simulated values
    /// - On failure the previous snapshot stays in place
    #[instrument(skip(self, location), fields(location = %location.name))]
    pub async fn load_location(&mut self, location: Location) -> Result<&DashboardSnapshot, DashboardError> {
        if !self.is_demo() {
            self.preferences.location = Some(location.clone());
            self.persist();
        }

        let now = Utc::now().timestamp();
        let inputs = match &self.weather_client {
            Some(client) => fetch_inputs(client, self.air_quality_client.as_ref(), location).await?,
            None => demo::sample_inputs(now),
        };

        let snapshot = DashboardSnapshot::build(inputs, now, &self.jitter, &mut rand::rng())?;
        info!(
            location = %snapshot.location.name,
            air_quality = ?snapshot.air_quality.source,
            "Dashboard updated"
        );
        Ok(&*self.snapshot.insert(snapshot))
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.preferences) {
            warn!(error = %e, "Failed to save preferences");
        }
    }
}

/// Fetches the three sources concurrently
async fn fetch_inputs(
    weather: &WeatherClient,
    air_quality: Option<&AirQualityClient>,
    location: Location,
) -> Result<SnapshotInputs, DashboardError> {
    let (lat, lon) = (location.latitude, location.longitude);

    let (current, forecast, air_quality) = join3(
        weather.fetch_current(lat, lon),
        weather.fetch_forecast(lat, lon),
        fetch_air_quality(air_quality, &location),
    )
    .await;

    Ok(SnapshotInputs {
        current: current?,
        forecast: forecast?,
        air_quality,
        location,
    })
}

/// Live air quality, or `None` so the caller falls back to simulation
async fn fetch_air_quality(client: Option<&AirQualityClient>, location: &Location) -> Option<AirQualityReading> {
    let client = client?;
    match client
        .fetch(location.latitude, location.longitude, &location.name)
        .await
    {
        Ok(reading) => Some(reading),
        Err(e) => {
            warn!(error = %e, "Air quality unavailable, using simulated values");
            None
        }
    }
}
