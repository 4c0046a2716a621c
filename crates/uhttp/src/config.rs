//! HTTP client configuration

use crate::error::{HttpError, HttpResult};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Configuration for HTTP client
///
/// Values are passed to the underlying client without range checks. A zero
/// timeout makes every request time out immediately.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL joined with relative request URLs (e.g., "https://api.example.com/v1/")
    pub base_url: Option<String>,

    /// Total request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Maximum idle connections kept in the pool (per host)
    pub pool_max_idle_per_host: usize,

    /// Idle connection timeout
    pub pool_idle_timeout: Duration,

    /// Whether to follow redirects
    pub follow_redirects: bool,

    /// Maximum number of redirects to follow
    pub max_redirects: usize,

    /// User-Agent header value
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 100,
            pool_idle_timeout: Duration::from_secs(90),
            follow_redirects: true,
            max_redirects: 10,
            user_agent: format!("uhttp/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Config with the two knobs most callers touch: timeout in whole seconds
    /// and the idle pool size
    pub fn with_limits(timeout_secs: u64, max_idle_connections: usize) -> Self {
        Self::default()
            .timeout(Duration::from_secs(timeout_secs))
            .pool_max_idle_per_host(max_idle_connections)
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `UHTTP_TIMEOUT_SECS`, `UHTTP_MAX_IDLE_CONNS` and `UHTTP_BASE_URL`;
    /// unset variables keep their defaults.
    pub fn from_env() -> HttpResult<Self> {
        let mut config = Self::default();
        if let Some(secs) = parse_var::<u64>("UHTTP_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(max) = parse_var::<usize>("UHTTP_MAX_IDLE_CONNS")? {
            config.pool_max_idle_per_host = max;
        }
        if let Ok(url) = env::var("UHTTP_BASE_URL") {
            config.base_url = Some(url);
        }
        Ok(config)
    }

    /// Prefix for relative request URLs.
    ///
    /// Joined with standard URL resolution, so keep the trailing slash when
    /// the base has a path: `http://h/v1/` + `users` is `http://h/v1/users`,
    /// while `http://h/v1` + `users` drops `v1`. Absolute request URLs ignore
    /// it.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Deadline for a whole call, from connect until the response body has
    /// been read. Exceeding it fails the call with a timeout category.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `timeout` in fractional seconds
    pub fn timeout_secs(mut self, secs: f64) -> Self {
        self.timeout = Duration::from_secs_f64(secs);
        self
    }

    /// Deadline for TCP connect alone; still bounded by `timeout`.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Idle keep-alive connections retained per host after a call completes.
    /// Zero disables reuse.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Redirects are followed before the status check, so a 302 chain ending
    /// in 200 succeeds. With `false` the 302 itself is returned and rejected.
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Hops allowed when `follow_redirects` is on
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Sent on every request; defaults to `uhttp/<version>`
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

fn parse_var<T: FromStr>(name: &str) -> HttpResult<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| HttpError::Config(format!("{}={:?}: {}", name, raw, e))),
        Err(_) => Ok(None),
    }
}
