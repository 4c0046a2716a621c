//! uhttp: thin JSON HTTP client
//!
//! Every operation issues exactly one request, accepts only status 200, reads
//! the whole body, logs it at debug level and decodes it into the caller's type.
//!
//! # Architecture
//!
//! - `HttpClient`: connection-pooled client, configured once at construction
//! - `HttpClientConfig`: timeout, idle pool size and the other client knobs
//! - `FormFields`: form body for `post_form`
//! - `HttpError`: one variant per failure stage
//!
//! Logging goes through `tracing`; install a subscriber (for example
//! `uhttp_common::init_logging`) to see it.

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod request;
pub mod response;

pub use client::HttpClient;
pub use config::HttpClientConfig;
pub use error::{HttpError, HttpErrorCategory, HttpResult};
pub use form::FormFields;
pub use request::Auth;

pub use uhttp_common::RawJson;
