//! Listing configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ListingError;

/// Default window for the delayed rename, in milliseconds.
pub const DEFAULT_RENAME_DELAY_MS: u64 = 500;

/// Default distance in pixels a press must travel before a drag starts.
pub const DEFAULT_DRAG_THRESHOLD: u16 = 5;

/// Tunables for a [`DirListing`](crate::DirListing).
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// rename_delay_ms = 300
/// drag_threshold = 8
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// How long a second click on the sole selected row waits before it
    /// turns into a rename. Also the double-click suppression window.
    pub rename_delay_ms: u64,

    /// Pointer travel (either axis) that turns a press into a drag.
    pub drag_threshold: u16,

    /// Title of the overwrite confirmation prompt.
    pub overwrite_title: String,

    /// `chrono` format string for the absolute modification time.
    pub modified_format: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            rename_delay_ms: DEFAULT_RENAME_DELAY_MS,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            overwrite_title: "Overwrite file?".to_string(),
            modified_format: "%Y-%m-%d %H:%M".to_string(),
        }
    }
}

impl ListingConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delayed rename window.
    pub fn rename_delay(mut self, delay: Duration) -> Self {
        self.rename_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the drag threshold in pixels.
    pub fn drag_threshold(mut self, threshold: u16) -> Self {
        self.drag_threshold = threshold;
        self
    }

    /// Set the overwrite prompt title.
    pub fn overwrite_title(mut self, title: impl Into<String>) -> Self {
        self.overwrite_title = title.into();
        self
    }

    /// The delayed rename window as a [`Duration`].
    pub fn rename_delay_duration(&self) -> Duration {
        Duration::from_millis(self.rename_delay_ms)
    }

    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ListingError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ListingError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
