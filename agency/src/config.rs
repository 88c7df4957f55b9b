//! Service configuration.

use std::env;

use tracing::warn;

use crate::window::WindowDefault;

/// Environment variable selecting [`ServiceConfig::default_window`].
pub const ENV_DEFAULT_WINDOW: &str = "CURRENCY_CONVERT_DEFAULT_WINDOW";
/// Environment variable selecting [`ServiceConfig::strict_ingestion`].
pub const ENV_STRICT_INGESTION: &str = "CURRENCY_CONVERT_STRICT_INGESTION";

/// Agency service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// How omitted date bounds on a rate query are filled in.
    pub default_window: WindowDefault,
    /// Discard a whole update when any record in it is rejected.
    pub strict_ingestion: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_window: WindowDefault::Latest,
            strict_ingestion: false,
        }
    }
}

impl ServiceConfig {
    /// Load from the process environment, keeping defaults for anything
    /// unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_DEFAULT_WINDOW) {
            match value.parse::<WindowDefault>() {
                Ok(window) => config.default_window = window,
                Err(error) => warn!(key = ENV_DEFAULT_WINDOW, %error, "Ignoring config value"),
            }
        }

        if let Some(value) = lookup(ENV_STRICT_INGESTION) {
            match parse_flag(&value) {
                Some(flag) => config.strict_ingestion = flag,
                None => warn!(key = ENV_STRICT_INGESTION, value = %value, "Ignoring config value"),
            }
        }

        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.default_window, WindowDefault::Latest);
        assert!(!config.strict_ingestion);
    }

    #[test]
    fn test_from_lookup_reads_values() {
        let config = ServiceConfig::from_lookup(lookup(&[
            (ENV_DEFAULT_WINDOW, "now"),
            (ENV_STRICT_INGESTION, "TRUE"),
        ]));
        assert_eq!(config.default_window, WindowDefault::Now);
        assert!(config.strict_ingestion);
    }

    #[test]
    fn test_from_lookup_keeps_defaults_on_bad_values() {
        let config = ServiceConfig::from_lookup(lookup(&[
            (ENV_DEFAULT_WINDOW, "tomorrow"),
            (ENV_STRICT_INGESTION, "maybe"),
        ]));
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn test_from_lookup_empty() {
        assert_eq!(ServiceConfig::from_lookup(lookup(&[])), ServiceConfig::default());
    }
}
