//! HTTP error types and handling

use thiserror::Error;

/// Errors returned by `HttpClient` operations, one variant per failure stage
#[derive(Error, Debug)]
pub enum HttpError {
    /// URL could not be parsed or joined onto the base URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request could not be built (bad header value, unsupported URL, ...)
    #[error("Invalid request: {0}")]
    Request(#[source] reqwest::Error),

    /// Connection, DNS or timeout failure while sending
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Response status was not 200
    #[error("Unexpected status {status}, expected 200")]
    Status { status: u16 },

    /// Response body could not be read
    #[error("Body read error: {0}")]
    Body(#[source] reqwest::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration or client construction failure
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type for HTTP operations
pub type HttpResult<T> = Result<T, HttpError>;

/// Error category for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpErrorCategory {
    /// Invalid request construction
    Request,
    /// Connection-related errors (DNS, TCP, TLS)
    Connection,
    /// Timeout errors
    Timeout,
    /// Status other than 200
    Status,
    /// Reading the response body failed
    Body,
    /// JSON encode/decode errors
    Decode,
    /// Configuration errors
    Config,
    /// Unknown/other errors
    Unknown,
}

impl HttpErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Connection => "connection",
            Self::Timeout => "timeout",
            Self::Status => "status",
            Self::Body => "body",
            Self::Decode => "decode",
            Self::Config => "config",
            Self::Unknown => "unknown",
        }
    }
}

impl HttpError {
    /// Classify a `send()` failure: builder errors are the caller's fault,
    /// everything else happened on the wire.
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_builder() {
            HttpError::Request(err)
        } else {
            HttpError::Transport(err)
        }
    }

    /// Categorize the error for reporting
    pub fn category(&self) -> HttpErrorCategory {
        match self {
            HttpError::InvalidUrl(_) | HttpError::Request(_) => HttpErrorCategory::Request,
            HttpError::Transport(e) => {
                if e.is_timeout() {
                    HttpErrorCategory::Timeout
                } else if e.is_connect() {
                    HttpErrorCategory::Connection
                } else {
                    HttpErrorCategory::Unknown
                }
            }
            HttpError::Status { .. } => HttpErrorCategory::Status,
            HttpError::Body(e) => {
                if e.is_timeout() {
                    HttpErrorCategory::Timeout
                } else {
                    HttpErrorCategory::Body
                }
            }
            HttpError::Json(_) => HttpErrorCategory::Decode,
            HttpError::Config(_) => HttpErrorCategory::Config,
        }
    }

    /// Status code of a non-200 response
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status } => Some(*status),
            _ => None,
        }
    }

    /// True if the request timed out, while connecting, sending or reading
    pub fn is_timeout(&self) -> bool {
        self.category() == HttpErrorCategory::Timeout
    }

    /// Sanitize error message (remove credentials before it reaches a log)
    pub fn sanitized_message(&self) -> String {
        let msg = self.to_string();
        sanitize_error_message(&msg)
    }
}

/// Sanitize error messages by removing credentials
fn sanitize_error_message(msg: &str) -> String {
    use regex::Regex;
    use std::sync::OnceLock;

    static URL_CREDS_RE: OnceLock<Regex> = OnceLock::new();
    static AUTH_HEADER_RE: OnceLock<Regex> = OnceLock::new();

    let url_creds_re = URL_CREDS_RE
        .get_or_init(|| Regex::new(r"(https?)://[^@/\s]+@").expect("valid regex"));
    let auth_header_re = AUTH_HEADER_RE.get_or_init(|| {
        Regex::new(r"(?i)(authorization:\s*(?:basic|bearer)|bearer)\s+\S+")
            .expect("valid regex")
    });

    let sanitized = url_creds_re.replace_all(msg, "$1://[REDACTED]@");
    let sanitized = auth_header_re.replace_all(&sanitized, "$1 [REDACTED]");

    sanitized.to_string()
}
