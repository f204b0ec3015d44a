//! Configuration module for markbar
//!
//! User preferences, their JSON form, and persistence to the platform
//! config directory.

mod persistence;
mod settings;

pub use persistence::{load_config, save_config_silent};
pub use settings::{ListMarker, Settings, Theme, ViewMode, WindowSize};
