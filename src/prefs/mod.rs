//! Preferences persisted between runs
//!
//! Stores the selected theme and the last location as a small JSON file in
//! the platform config directory (`~/.config/skydash/` on Linux). A missing
//! or unreadable file simply yields the defaults.

mod store;

pub use store::{Preferences, PreferenceStore, Theme};
