//! Logging setup
//!
//! The uhttp crates only emit `tracing` events; whoever runs them decides where
//! those events go. `init_logging` is the default wiring for binaries and
//! integration tests.

use std::env;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Configuration for the global log subscriber
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directive used when `RUST_LOG` is unset or invalid (e.g. "info", "uhttp=debug")
    pub default_directive: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_directive: "info".to_string(),
            json: false,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback filter directive
    pub fn default_directive(mut self, directive: impl Into<String>) -> Self {
        self.default_directive = directive.into();
        self
    }

    /// Enable/disable JSON output
    pub fn json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    /// Load from environment variables.
    ///
    /// `UHTTP_LOG_JSON` switches to JSON output when set to `1` or `true`.
    pub fn from_env() -> Self {
        let json = env::var("UHTTP_LOG_JSON")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true"))
            .unwrap_or(false);
        Self::default().json(json)
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.default_directive))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Install the global subscriber.
///
/// Returns an error if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter = config.env_filter();

    if config.json {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.default_directive, "info");
        assert!(!config.json);
    }

    #[test]
    fn test_builder_pattern() {
        let config = LogConfig::new().default_directive("uhttp=debug").json(true);
        assert_eq!(config.default_directive, "uhttp=debug");
        assert!(config.json);
    }

    #[test]
    fn test_second_init_fails() {
        let config = LogConfig::new().default_directive("warn");
        // first call only fails if another test got there first
        let _ = init_logging(&config);
        assert!(init_logging(&config).is_err());
    }
}
