//! Per-call request descriptors

use crate::form::{FormFields, FORM_CONTENT_TYPE};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::Method;
use url::Url;

/// Content type sent with raw and serialized JSON bodies
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Request authentication
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Auth {
    #[default]
    None,
    /// HTTP Basic credentials
    Basic { username: String, password: String },
}

impl Auth {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Auth::Basic {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keep passwords out of `{:?}` output and therefore out of logs.
impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Auth::None => f.write_str("None"),
            Auth::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Request body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    #[default]
    None,
    /// Already-encoded JSON, sent as-is
    Json(Bytes),
    /// Form fields, encoded on send
    Form(FormFields),
}

/// Everything needed to issue one request
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// Operation name used in log events ("get", "post_form", ...)
    pub op: &'static str,
    pub method: Method,
    /// Absolute URL, or relative to the client's base URL
    pub url: String,
    pub auth: Auth,
    pub body: RequestBody,
}

impl RequestSpec {
    pub fn new(op: &'static str, method: Method, url: impl Into<String>) -> Self {
        Self {
            op,
            method,
            url: url.into(),
            auth: Auth::None,
            body: RequestBody::None,
        }
    }

    pub fn get(op: &'static str, url: impl Into<String>) -> Self {
        Self::new(op, Method::GET, url)
    }

    pub fn post(op: &'static str, url: impl Into<String>) -> Self {
        Self::new(op, Method::POST, url)
    }

    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Resolve the target URL, joining relative URLs onto `base_url`
    pub fn resolve_url(&self, base_url: Option<&str>) -> Result<Url, url::ParseError> {
        match Url::parse(&self.url) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => match base_url {
                Some(base) => Url::parse(base)?.join(&self.url),
                None => Err(url::ParseError::RelativeUrlWithoutBase),
            },
            Err(e) => Err(e),
        }
    }

    /// Turn the descriptor into a reqwest builder on the shared client
    pub fn build_reqwest(self, client: &reqwest::Client, url: Url) -> reqwest::RequestBuilder {
        let mut builder = client.request(self.method, url);

        if let Auth::Basic { username, password } = self.auth {
            builder = builder.basic_auth(username, Some(password));
        }

        match self.body {
            RequestBody::None => builder,
            RequestBody::Json(bytes) => builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(bytes),
            RequestBody::Form(form) => builder
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(form.encode()),
        }
    }
}
