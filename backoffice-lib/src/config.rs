//! Dashboard configuration

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

/// Errors raised when a configuration is rejected.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON could not be parsed.
    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value outside its allowed range.
    #[error("Invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Settings shared by every screen.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use backoffice_lib::config::DashboardConfig;
///
/// let config = DashboardConfig::default()
///     .with_default_page_size(25)
///     .with_fetch_timeout(Duration::from_secs(10));
/// assert!(config.validate().is_ok());
///
/// let loaded = DashboardConfig::from_json(r#"{ "page_window": 1 }"#).unwrap();
/// assert_eq!(loaded.default_page_size, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Rows per page when a screen opens.
    ///
    /// Default: 10
    pub default_page_size: usize,

    /// Page sizes offered by the pagination bar.
    ///
    /// Default: 10, 25, 50, 100
    pub page_size_options: Vec<usize>,

    /// Page buttons shown on either side of the current page.
    ///
    /// Default: 2
    pub page_window: usize,

    /// How many days ahead confirmed rosters raise an "upcoming" notification.
    ///
    /// Default: 1 (tomorrow)
    pub notification_lookahead_days: u32,

    /// A fetch running longer than this counts as failed.
    ///
    /// Default: 30 seconds
    #[serde(with = "duration_secs")]
    pub fetch_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            page_size_options: vec![10, 25, 50, 100],
            page_window: 2,
            notification_lookahead_days: 1,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

impl DashboardConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that page sizes are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 {
            return Err(ConfigError::invalid("default_page_size", "must be greater than 0"));
        }
        if self.page_size_options.is_empty() {
            return Err(ConfigError::invalid("page_size_options", "must not be empty"));
        }
        if self.page_size_options.contains(&0) {
            return Err(ConfigError::invalid("page_size_options", "sizes must be greater than 0"));
        }
        Ok(())
    }

    pub fn with_default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size;
        self
    }

    pub fn with_page_size_options(mut self, options: Vec<usize>) -> Self {
        self.page_size_options = options;
        self
    }

    pub fn with_page_window(mut self, window: usize) -> Self {
        self.page_window = window;
        self
    }

    pub fn with_notification_lookahead_days(mut self, days: u32) -> Self {
        self.notification_lookahead_days = days;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
