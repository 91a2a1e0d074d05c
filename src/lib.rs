//! skydash library
//!
//! Weather dashboard core: forecast aggregation, classification tables,
//! fallback simulators and sun position, the API clients, the orchestrating
//! `Dashboard` and the terminal UI on top of it.

pub mod aggregate;
pub mod app;
pub mod classify;
pub mod cli;
pub mod dashboard;
pub mod data;
pub mod demo;
pub mod format;
pub mod logging;
pub mod prefs;
pub mod simulate;
pub mod sun;
pub mod ui;
