//! Command-line interface parsing for skydash
//!
//! This module handles parsing of CLI arguments using clap, including the
//! starting location, API credentials (also read from the environment) and
//! the --demo flag for running on sample data.

use clap::Parser;
use thiserror::Error;

/// City loaded when neither the command line nor a saved preference names one
pub const DEFAULT_CITY: &str = "London";

/// Error types for CLI argument parsing
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    /// Only one of --lat / --lon was given
    #[error("--lat and --lon must be given together")]
    IncompleteCoordinates,

    #[error("Invalid latitude: {0}. Must be between -90 and 90")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0}. Must be between -180 and 180")]
    InvalidLongitude(f64),

    /// --city was given an empty name
    #[error("City name must not be empty")]
    EmptyCity,
}

/// skydash - Weather dashboard for the terminal
#[derive(Parser, Debug)]
#[command(name = "skydash")]
#[command(about = "Current conditions, forecast, air quality and daylight in your terminal")]
#[command(version)]
pub struct Cli {
    /// City to show on startup (defaults to the last location, then London)
    ///
    /// Examples:
    ///   skydash --city Paris
    ///   skydash --city "New York"
    #[arg(long, value_name = "NAME", conflicts_with_all = ["lat", "lon"])]
    pub city: Option<String>,

    /// Latitude to show on startup, used together with --lon
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude to show on startup, used together with --lat
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// OpenWeatherMap API key; without one the dashboard runs on sample data
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// WAQI token for live air quality; without one air quality is simulated
    #[arg(long, env = "WAQI_TOKEN", hide_env_values = true)]
    pub waqi_token: Option<String>,

    /// Show sample data instead of calling any API
    #[arg(long)]
    pub demo: bool,
}

/// Where the dashboard starts
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StartLocation {
    /// Last saved location, else [`DEFAULT_CITY`]
    #[default]
    Saved,
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StartupConfig {
    pub start: StartLocation,
    /// OpenWeatherMap key; `None` in demo mode
    pub api_key: Option<String>,
    pub waqi_token: Option<String>,
    /// Run on sample data
    pub demo: bool,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if the location arguments are incomplete or out of range
    ///
    /// # Behavior
    /// - A missing or blank API key selects demo mode
    /// - Blank credentials are treated as absent
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let start = match (&cli.city, cli.lat, cli.lon) {
            (Some(city), _, _) => {
                let city = city.trim();
                if city.is_empty() {
                    return Err(CliError::EmptyCity);
                }
                StartLocation::City(city.to_string())
            }
            (None, Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(CliError::InvalidLatitude(lat));
                }
                if !(-180.0..=180.0).contains(&lon) {
                    return Err(CliError::InvalidLongitude(lon));
                }
                StartLocation::Coordinates { lat, lon }
            }
            (None, None, None) => StartLocation::Saved,
            (None, _, _) => return Err(CliError::IncompleteCoordinates),
        };

        let api_key = non_blank(cli.api_key.as_deref());
        let demo = cli.demo || api_key.is_none();

        Ok(StartupConfig {
            start,
            api_key: if demo { None } else { api_key },
            waqi_token: non_blank(cli.waqi_token.as_deref()),
            demo,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
