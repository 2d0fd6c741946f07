use std::time::Duration;

pub const DEFAULT_SOURCE_LOCATION: &str = "/editorial-calendar.json";
pub const DEFAULT_SITE_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Config {
    /// URL, site-relative path or filesystem path of the calendar document
    pub source_location: String,
    pub site_origin: String,
    /// `None` disables the periodic refresh
    pub refresh_interval: Option<Duration>,
    pub fetch_timeout: Duration,
    /// Transient failure retries within a single fetch
    pub max_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_location: DEFAULT_SOURCE_LOCATION.to_string(),
            site_origin: DEFAULT_SITE_ORIGIN.to_string(),
            refresh_interval: Some(DEFAULT_REFRESH_INTERVAL),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            max_retries: 0,
        }
    }
}
