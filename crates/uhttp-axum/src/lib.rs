//! uhttp-axum: body logging middleware
//!
//! `BodyLogLayer` logs, at debug level:
//! - the body of every POST request (message `gin_request_body`), after which
//!   the handler still receives the complete body
//! - the body of every status-200 response (message `gin_response_body`),
//!   byte-for-byte what the client receives
//!
//! Both events carry the request path as `action`.
//!
//! ```ignore
//! use axum::{routing::post, Router};
//! use uhttp_axum::BodyLogLayer;
//!
//! let app: Router = Router::new()
//!     .route("/orders", post(create_order))
//!     .layer(BodyLogLayer::new());
//! ```

pub mod body;
pub mod layer;

pub use body::CapturedBody;
pub use layer::{BodyLogLayer, BodyLogService};

/// Message of the request body event
pub const REQUEST_BODY_MESSAGE: &str = "gin_request_body";

/// Message of the response body event
pub const RESPONSE_BODY_MESSAGE: &str = "gin_response_body";
