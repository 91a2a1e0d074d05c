//! Application state management for skydash
//!
//! This module contains the main application state, handling keyboard input,
//! queued data loads, and the transition from the loading screen to the
//! dashboard.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use tracing::warn;

use crate::cli::{StartLocation, StartupConfig, DEFAULT_CITY};
use crate::dashboard::{Dashboard, DashboardError, DashboardSnapshot};
use crate::data::{AirQualityClient, WeatherClient};
use crate::prefs::{PreferenceStore, Theme};

/// Application state enum representing the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Initial loading state while fetching data
    Loading,
    /// Dashboard view (possibly without data if the first load failed)
    Dashboard,
}

/// How key presses are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a city name
    Search,
}

/// A data load waiting to be run by the event loop
#[derive(Debug, Clone, PartialEq)]
pub enum LoadRequest {
    /// First load from the startup configuration
    Startup,
    /// Reload the location on screen
    Refresh,
    /// Search for a city
    City(String),
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    pub input_mode: InputMode,
    /// City name typed so far in search mode
    pub search_input: String,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Last error, shown in the status line
    pub status: Option<String>,
    /// Timestamp of last successful refresh
    pub last_refresh: Option<DateTime<Local>>,
    /// Load queued by a key press
    pending_load: Option<LoadRequest>,
    start: StartLocation,
    dashboard: Dashboard,
}

impl App {
    /// Creates a new App around a dashboard, queueing the startup load
    pub fn new(dashboard: Dashboard, start: StartLocation) -> Self {
        Self {
            state: AppState::Loading,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            should_quit: false,
            show_help: false,
            status: None,
            last_refresh: None,
            pending_load: Some(LoadRequest::Startup),
            start,
            dashboard,
        }
    }

    /// Creates a new App instance with the given startup configuration.
    ///
    /// # Arguments
    /// * `config` - The startup configuration derived from CLI arguments
    pub fn with_startup_config(config: StartupConfig) -> Self {
        let store = PreferenceStore::new();
        let dashboard = match config.api_key {
            Some(api_key) if !config.demo => Dashboard::new(
                Some(WeatherClient::new(api_key)),
                config.waqi_token.map(AirQualityClient::new),
                store,
            ),
            _ => Dashboard::demo(store),
        };
        Self::new(dashboard, config.start)
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.dashboard.snapshot()
    }

    pub fn theme(&self) -> Theme {
        self.dashboard.theme()
    }

    pub fn is_demo(&self) -> bool {
        self.dashboard.is_demo()
    }

    /// Takes the queued load, if any
    pub fn take_pending_load(&mut self) -> Option<LoadRequest> {
        self.pending_load.take()
    }

    /// Runs a load and records its outcome in the status line
    pub async fn run_load(&mut self, request: LoadRequest) {
        let result = match request {
            LoadRequest::Startup => self.load_start().await,
            LoadRequest::Refresh => self.dashboard.refresh().await.map(|_| ()),
            LoadRequest::City(name) => self.dashboard.load_city(&name).await.map(|_| ()),
        };

        match result {
            Ok(()) => {
                self.status = None;
                self.last_refresh = Some(Local::now());
            }
            Err(e) => {
                warn!(error = %e, "Load failed");
                self.status = Some(e.to_string());
            }
        }
        self.state = AppState::Dashboard;
    }

    async fn load_start(&mut self) -> Result<(), DashboardError> {
        match self.start.clone() {
            StartLocation::City(name) => self.dashboard.load_city(&name).await.map(|_| ()),
            StartLocation::Coordinates { lat, lon } => self.dashboard.load_coordinates(lat, lon).await.map(|_| ()),
            StartLocation::Saved => match self.dashboard.saved_location().cloned() {
                Some(location) => self.dashboard.load_location(location).await.map(|_| ()),
                None => self.dashboard.load_city(DEFAULT_CITY).await.map(|_| ()),
            },
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Arguments
    /// * `key_event` - The keyboard event to handle
    ///
    /// # Key Bindings
    /// - `q` or `Esc`: Quit the application
    /// - `r`: Refresh the current location
    /// - `t`: Toggle dark/light theme
    /// - `/`: Start typing a city name (`Enter` searches, `Esc` cancels)
    /// - `?`: Toggle the help overlay
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            if matches!(key_event.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        if self.input_mode == InputMode::Search {
            self.handle_search_key(key_event);
            return;
        }

        match self.state {
            AppState::Loading => {
                // Only quit is allowed during loading
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::Dashboard => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Char('r') => {
                    self.pending_load = Some(LoadRequest::Refresh);
                }
                KeyCode::Char('t') => {
                    self.dashboard.toggle_theme();
                }
                KeyCode::Char('/') => {
                    self.input_mode = InputMode::Search;
                    self.search_input.clear();
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
        }
    }

    fn handle_search_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.search_input.clear();
            }
            KeyCode::Enter => {
                let city = self.search_input.trim().to_string();
                self.input_mode = InputMode::Normal;
                self.search_input.clear();
                if !city.is_empty() {
                    self.pending_load = Some(LoadRequest::City(city));
                }
            }
            KeyCode::Backspace => {
                self.search_input.pop();
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
            }
            _ => {}
        }
    }
}
