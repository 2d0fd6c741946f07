use crate::config::model::{Config, DEFAULT_SOURCE_LOCATION};
use std::env;
use tracing::warn;

pub const SOURCE_LOCATION_VAR: &str = "EDITORIAL_CALENDAR_URL";

/// Only the source location is read from the environment, everything else keeps
/// the defaults of [`Config`]. Never panics: the process-wide calendar is built from
/// this on first lookup.
pub fn load_config() -> Config {
    Config {
        source_location: load_string_config(SOURCE_LOCATION_VAR, DEFAULT_SOURCE_LOCATION),
        ..Config::default()
    }
}

fn load_string_config(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        Ok(_) => default.to_string(),
        Err(env::VarError::NotPresent) => default.to_string(),
        Err(env::VarError::NotUnicode(_)) => {
            warn!("Config '{}' is not valid unicode, using '{}'", name, default);
            default.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{DEFAULT_FETCH_TIMEOUT, DEFAULT_REFRESH_INTERVAL};

    #[test_log::test]
    fn should_read_only_the_source_location_from_the_environment() {
        env::set_var(SOURCE_LOCATION_VAR, " https://cdn.example.com/calendar.json ");
        env::set_var("EDITORIAL_CALENDAR_TIMEOUT_SECS", "30s");

        let config = load_config();

        env::remove_var(SOURCE_LOCATION_VAR);
        env::remove_var("EDITORIAL_CALENDAR_TIMEOUT_SECS");

        assert_eq!(config.source_location, "https://cdn.example.com/calendar.json");
        assert_eq!(config.refresh_interval, Some(DEFAULT_REFRESH_INTERVAL));
        assert_eq!(config.fetch_timeout, DEFAULT_FETCH_TIMEOUT);
        assert_eq!(config.max_retries, 0);
    }

    #[test_log::test]
    fn blank_strings_fall_back_to_the_default() {
        env::set_var("EDITORIAL_CALENDAR_TEST_BLANK", "   ");

        assert_eq!(
            load_string_config("EDITORIAL_CALENDAR_TEST_BLANK", DEFAULT_SOURCE_LOCATION),
            DEFAULT_SOURCE_LOCATION
        );
        assert_eq!(
            load_string_config("EDITORIAL_CALENDAR_TEST_UNSET", DEFAULT_SOURCE_LOCATION),
            DEFAULT_SOURCE_LOCATION
        );
    }
}
