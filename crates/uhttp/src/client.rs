//! HTTP client with connection pooling and JSON request operations

use crate::config::HttpClientConfig;
use crate::error::{HttpError, HttpResult};
use crate::form::FormFields;
use crate::request::{Auth, RequestBody, RequestSpec};
use crate::response::{decode_json, read_ok_body};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::panic::Location;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};
use uhttp_common::RawJson;

/// JSON HTTP client with connection pooling
///
/// Configuration is fixed at construction; clones share the same pool.
///
/// # Example
///
/// ```ignore
/// use serde::Deserialize;
/// use uhttp::{FormFields, HttpClient};
///
/// #[derive(Deserialize)]
/// struct Reply {
///     code: i32,
///     logid: String,
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = HttpClient::with_limits(10, 20)?;
///
///     let mut form = FormFields::new();
///     form.add("park_code", "1234");
///     let reply: Reply = client.post_form("http://127.0.0.1:9630/mul_vpl_clean", &form).await?;
///     println!("code: {}, logid: {}", reply.code, reply.logid);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<HttpClientInner>,
}

struct HttpClientInner {
    client: reqwest::Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> HttpResult<Self> {
        let redirect = if config.follow_redirects {
            reqwest::redirect::Policy::limited(config.max_redirects)
        } else {
            reqwest::redirect::Policy::none()
        };

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout)
            .user_agent(&config.user_agent)
            .redirect(redirect)
            .build()
            .map_err(|e| HttpError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            inner: Arc::new(HttpClientInner { client, config }),
        })
    }

    /// Create a client with a request timeout (whole seconds) and an idle
    /// pool size; everything else keeps its default
    pub fn with_limits(timeout_secs: u64, max_idle_connections: usize) -> HttpResult<Self> {
        Self::new(HttpClientConfig::with_limits(
            timeout_secs,
            max_idle_connections,
        ))
    }

    /// Create a client with default configuration
    pub fn default_client() -> HttpResult<Self> {
        Self::new(HttpClientConfig::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.inner.config
    }

    /// Get the base URL
    pub fn base_url(&self) -> Option<&str> {
        self.inner.config.base_url.as_deref()
    }

    /// GET `url` and decode the JSON response
    #[track_caller]
    pub fn get<T: DeserializeOwned>(&self, url: &str) -> impl Future<Output = HttpResult<T>> {
        self.dispatch(RequestSpec::get("get", url), Location::caller())
    }

    /// GET `url` with HTTP Basic credentials and decode the JSON response
    #[track_caller]
    pub fn get_auth<T: DeserializeOwned>(
        &self,
        url: &str,
        username: &str,
        password: &str,
    ) -> impl Future<Output = HttpResult<T>> {
        let spec = RequestSpec::get("get_auth", url).auth(Auth::basic(username, password));
        self.dispatch(spec, Location::caller())
    }

    /// POST an already-encoded JSON body and decode the JSON response
    #[track_caller]
    pub fn post<T: DeserializeOwned>(
        &self,
        url: &str,
        body: impl Into<Bytes>,
    ) -> impl Future<Output = HttpResult<T>> {
        let spec = RequestSpec::post("post", url).body(RequestBody::Json(body.into()));
        self.dispatch(spec, Location::caller())
    }

    /// POST an already-encoded JSON body with HTTP Basic credentials
    #[track_caller]
    pub fn post_auth<T: DeserializeOwned>(
        &self,
        url: &str,
        username: &str,
        password: &str,
        body: impl Into<Bytes>,
    ) -> impl Future<Output = HttpResult<T>> {
        let spec = RequestSpec::post("post_auth", url)
            .auth(Auth::basic(username, password))
            .body(RequestBody::Json(body.into()));
        self.dispatch(spec, Location::caller())
    }

    /// POST form fields as `application/x-www-form-urlencoded`
    #[track_caller]
    pub fn post_form<T: DeserializeOwned>(
        &self,
        url: &str,
        form: &FormFields,
    ) -> impl Future<Output = HttpResult<T>> {
        let spec = RequestSpec::post("post_form", url).body(RequestBody::Form(form.clone()));
        self.dispatch(spec, Location::caller())
    }

    /// Serialize `body` to JSON, POST it and decode the JSON response
    #[track_caller]
    pub fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> impl Future<Output = HttpResult<T>> {
        let caller = Location::caller();
        let encoded = serde_json::to_vec(body).map_err(HttpError::Json);
        let spec = RequestSpec::post("post_json", url);
        let client = self.clone();
        async move {
            let body = encoded.inspect_err(|err| log_failure("post_json", caller, err))?;
            client
                .execute(spec.body(RequestBody::Json(body.into())), caller)
                .await
        }
    }

    // Returned futures own a handle on the pool, so they are `'static` and
    // can be spawned.
    fn dispatch<T: DeserializeOwned>(
        &self,
        spec: RequestSpec,
        caller: &'static Location<'static>,
    ) -> impl Future<Output = HttpResult<T>> {
        let client = self.clone();
        async move { client.execute(spec, caller).await }
    }

    /// Issue one request described by `spec`; every failure is logged once
    /// with the caller's location before being returned.
    async fn execute<T: DeserializeOwned>(
        &self,
        spec: RequestSpec,
        caller: &'static Location<'static>,
    ) -> HttpResult<T> {
        let op = spec.op;
        self.run(spec)
            .await
            .inspect_err(|err| log_failure(op, caller, err))
    }

    async fn run<T: DeserializeOwned>(&self, spec: RequestSpec) -> HttpResult<T> {
        let op = spec.op;
        let url = spec.resolve_url(self.base_url())?;
        let url_str = url.to_string();

        let start = Instant::now();
        let response = spec
            .build_reqwest(&self.inner.client, url)
            .send()
            .await
            .map_err(HttpError::from_send)?;
        let body = read_ok_body(response).await?;
        let latency_ms = start.elapsed().as_millis() as u64;

        debug!(op, url = %url_str, latency_ms, body = %RawJson(&body), "resp_body");
        decode_json(&body)
    }
}

fn log_failure(op: &'static str, caller: &Location<'_>, err: &HttpError) {
    error!(
        op,
        caller = %caller,
        category = err.category().as_str(),
        status = err.status(),
        error = %err.sanitized_message(),
        "request failed"
    );
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.inner.config.base_url)
            .field("timeout", &self.inner.config.timeout)
            .field("pool_max_idle_per_host", &self.inner.config.pool_max_idle_per_host)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_client_creation() {
        let config = HttpClientConfig::new()
            .base_url("https://api.example.com")
            .timeout_secs(30.0);

        let client = HttpClient::new(config).unwrap();
        assert_eq!(client.base_url(), Some("https://api.example.com"));
    }

    #[test]
    fn test_default_client() {
        let client = HttpClient::default_client().unwrap();
        assert!(client.base_url().is_none());
        assert_eq!(client.config().timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_with_limits() {
        let client = HttpClient::with_limits(10, 20).unwrap();
        assert_eq!(client.config().timeout, Duration::from_secs(10));
        assert_eq!(client.config().pool_max_idle_per_host, 20);
    }

    #[test]
    fn test_clones_share_config() {
        let client = HttpClient::with_limits(5, 1).unwrap();
        let clone = client.clone();
        assert!(Arc::ptr_eq(&client.inner, &clone.inner));
    }

    #[tokio::test]
    async fn test_relative_url_without_base_fails_before_sending() {
        let client = HttpClient::default_client().unwrap();
        let err = client.get::<serde_json::Value>("/users/1").await.unwrap_err();
        assert!(matches!(
            err,
            HttpError::InvalidUrl(url::ParseError::RelativeUrlWithoutBase)
        ));
    }

    #[tokio::test]
    async fn test_post_json_unserializable_body() {
        use std::collections::HashMap;

        // JSON object keys must be strings
        let mut body = HashMap::new();
        body.insert((1, 2), "v");

        let client = HttpClient::default_client().unwrap();
        let err = client
            .post_json::<_, serde_json::Value>("http://127.0.0.1:1/", &body)
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Json(_)));
    }
}
