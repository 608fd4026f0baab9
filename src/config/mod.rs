// SPDX-License-Identifier: MPL-2.0
//! This module handles the carousel's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[carousel]` - Transition duration and the photo field holding the image source
//! - `[display]` - Mobile breakpoint, touch capability and directory sort order
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `ICED_CAROUSEL_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use iced_carousel::config;
//!
//! let (mut config, _warning) = config::load();
//! config.carousel.transition_duration_ms = Some(450);
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "IcedCarousel";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "ICED_CAROUSEL_CONFIG_DIR";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Alphabetical,
    ModifiedDate,
    CreatedDate,
}

/// Slide transition duration, guaranteed to be within 0–5000 ms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionDuration(u32);

impl TransitionDuration {
    /// Creates a new transition duration, clamping to the valid range.
    #[must_use]
    pub fn new(millis: u32) -> Self {
        Self(millis.clamp(MIN_TRANSITION_DURATION_MS, MAX_TRANSITION_DURATION_MS))
    }

    /// Returns the value in milliseconds.
    #[must_use]
    pub fn millis(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(u64::from(self.0))
    }

    /// Delay after which a started transition settles.
    #[must_use]
    pub fn settle_delay(self) -> Duration {
        self.as_duration() + SETTLE_PADDING
    }
}

impl Default for TransitionDuration {
    fn default() -> Self {
        Self(DEFAULT_TRANSITION_DURATION_MS)
    }
}

/// Engine-facing configuration: `{ transitionDuration, src }`.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselConfig {
    pub transition_duration: TransitionDuration,
    /// Name of the photo record field holding the image source.
    pub src_key: String,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            transition_duration: TransitionDuration::default(),
            src_key: DEFAULT_SRC_KEY.to_string(),
        }
    }
}

/// Carousel behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CarouselSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_duration_ms: Option<u32>,

    /// Photo field holding the image source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

impl Default for CarouselSection {
    fn default() -> Self {
        Self {
            transition_duration_ms: Some(DEFAULT_TRANSITION_DURATION_MS),
            src: Some(DEFAULT_SRC_KEY.to_string()),
        }
    }
}

/// Layout and input settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplaySection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_breakpoint_px: Option<f32>,

    /// Forces touch support on or off; detected by the front-end when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub touch_capable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            mobile_breakpoint_px: Some(DEFAULT_MOBILE_BREAKPOINT_PX),
            touch_capable: None,
            sort_order: Some(SortOrder::default()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub carousel: CarouselSection,
    #[serde(default)]
    pub display: DisplaySection,
}

impl Config {
    /// Builds the engine configuration, filling unset values with defaults.
    #[must_use]
    pub fn carousel_config(&self) -> CarouselConfig {
        CarouselConfig {
            transition_duration: TransitionDuration::new(
                self.carousel
                    .transition_duration_ms
                    .unwrap_or(DEFAULT_TRANSITION_DURATION_MS),
            ),
            src_key: self
                .carousel
                .src
                .clone()
                .unwrap_or_else(|| DEFAULT_SRC_KEY.to_string()),
        }
    }

    #[must_use]
    pub fn mobile_breakpoint(&self) -> f32 {
        self.display
            .mobile_breakpoint_px
            .filter(|px| px.is_finite() && *px >= 0.0)
            .unwrap_or(DEFAULT_MOBILE_BREAKPOINT_PX)
    }

    #[must_use]
    pub fn sort_order(&self) -> SortOrder {
        self.display.sort_order.unwrap_or_default()
    }
}

fn config_dir_override() -> Option<PathBuf> {
    std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from)
}

fn get_default_config_path() -> Option<PathBuf> {
    if let Some(dir) = config_dir_override() {
        return Some(dir.join(CONFIG_FILE));
    }
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

/// Resolves the config file inside an explicit directory (CLI override).
#[must_use]
pub fn path_in_dir(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

/// Loads the configuration from the default location.
///
/// Never fails: a missing file yields defaults, an unreadable or invalid
/// file yields defaults plus a warning message for the caller to surface.
#[must_use]
pub fn load() -> (Config, Option<String>) {
    match get_default_config_path() {
        Some(path) if path.exists() => load_or_default(&path),
        _ => (Config::default(), None),
    }
}

/// Loads from `path`, falling back to defaults with a warning on failure.
#[must_use]
pub fn load_or_default(path: &Path) -> (Config, Option<String>) {
    match load_from_path(path) {
        Ok(config) => (config, None),
        Err(err) => {
            log::warn!("Falling back to default settings: {err}");
            (Config::default(), Some(err.to_string()))
        }
    }
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Reads and parses a settings file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`]
/// if it is not valid TOML for [`Config`].
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(Error::from)
}

/// Writes a settings file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if serialization or any filesystem operation fails.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
