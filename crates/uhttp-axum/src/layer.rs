//! Body logging middleware
//!
//! Requests pass through two hooks around the inner service:
//! - before: POST bodies are read, logged and put back
//! - after: 200 responses get their body wrapped in a `CapturedBody`

use crate::body::CapturedBody;
use crate::REQUEST_BODY_MESSAGE;
use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, Method, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use futures::future::BoxFuture;
use http_body_util::BodyExt;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::{debug, error};
use uhttp_common::RawJson;

/// Layer that logs POST request bodies and status-200 response bodies
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyLogLayer;

impl BodyLogLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for BodyLogLayer {
    type Service = BodyLogService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BodyLogService { inner }
    }
}

/// Service produced by `BodyLogLayer`
#[derive(Debug, Clone)]
pub struct BodyLogService<S> {
    inner: S,
}

impl<S> BodyLogService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S> Service<Request> for BodyLogService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        // `self.inner` is the instance that was polled ready; keep the fresh
        // clone for the next call.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let action = req.uri().path().to_string();
            let req = if req.method() == Method::POST {
                replay_request_body(req, &action).await
            } else {
                req
            };

            let response = inner.call(req).await?;
            Ok(capture_response_body(response, action))
        })
    }
}

/// Read the whole request body, log it, and hand the handler a fresh body
/// over the same bytes. A read failure is logged and the handler gets an
/// empty body without a `Content-Length`.
async fn replay_request_body(req: Request, action: &str) -> Request {
    let (mut parts, body) = req.into_parts();
    let bytes = match body.collect().await {
        Ok(collected) => {
            let bytes = collected.to_bytes();
            debug!(action, body = %RawJson(&bytes), "{}", REQUEST_BODY_MESSAGE);
            bytes
        }
        Err(err) => {
            error!(action, error = %err, "failed to read request body");
            parts.headers.remove(header::CONTENT_LENGTH);
            Bytes::new()
        }
    };
    Request::from_parts(parts, Body::from(bytes))
}

fn capture_response_body(response: Response, action: String) -> Response {
    if response.status() != StatusCode::OK {
        return response;
    }
    response.map(|body| Body::new(CapturedBody::new(body, action)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_wraps_plain_service() {
        let echo = tower::service_fn(|req: Request| async move {
            let bytes = req.into_body().collect().await.unwrap().to_bytes();
            Ok::<_, Infallible>(Response::new(Body::from(bytes)))
        });
        let service = BodyLogLayer::new().layer(echo);

        let req = Request::builder()
            .method(Method::POST)
            .uri("/echo")
            .body(Body::from("{\"n\":1}"))
            .unwrap();
        let response = service.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"{\"n\":1}");
    }

    #[tokio::test]
    async fn test_events_use_exported_messages() {
        use tracing::instrument::WithSubscriber;
        use uhttp_common::capture::EventCapture;

        let capture = EventCapture::new();
        let echo = tower::service_fn(|req: Request| async move {
            Ok::<_, Infallible>(Response::new(req.into_body()))
        });
        let req = Request::builder()
            .method(Method::POST)
            .uri("/orders")
            .body(Body::from("[]"))
            .unwrap();

        async move {
            let response = BodyLogLayer::new().layer(echo).oneshot(req).await.unwrap();
            response.into_body().collect().await.unwrap();
        }
        .with_subscriber(capture.subscriber())
        .await;

        let messages: Vec<_> = capture.events().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["gin_request_body", "gin_response_body"]);
        assert_eq!(messages, vec![REQUEST_BODY_MESSAGE, crate::RESPONSE_BODY_MESSAGE]);
    }

    #[test]
    fn test_non_200_response_is_untouched() {
        let mut response = Response::new(Body::from("nope"));
        *response.status_mut() = StatusCode::NOT_FOUND;
        let response = capture_response_body(response, "/x".to_string());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
