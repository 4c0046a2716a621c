//! Response body capture

use crate::RESPONSE_BODY_MESSAGE;
use axum::body::Body;
use bytes::{Bytes, BytesMut};
use http_body::{Body as HttpBody, Frame, SizeHint};
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::debug;
use uhttp_common::RawJson;

/// Response body that forwards every frame unchanged and keeps a copy of the
/// data frames.
///
/// The copy is logged once, when the stream ends or the body is dropped,
/// whichever comes first. A body dropped early (client gone) logs what was
/// sent so far.
pub struct CapturedBody {
    inner: Body,
    captured: BytesMut,
    action: String,
    logged: bool,
}

impl CapturedBody {
    pub fn new(inner: Body, action: impl Into<String>) -> Self {
        Self {
            inner,
            captured: BytesMut::new(),
            action: action.into(),
            logged: false,
        }
    }

    fn emit(&mut self) {
        if self.logged {
            return;
        }
        self.logged = true;
        debug!(
            action = %self.action,
            body = %RawJson(&self.captured),
            "{}",
            RESPONSE_BODY_MESSAGE
        );
    }
}

impl HttpBody for CapturedBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = &mut *self;
        let polled = Pin::new(&mut this.inner).poll_frame(cx);
        match &polled {
            Poll::Ready(Some(Ok(frame))) => {
                if let Some(data) = frame.data_ref() {
                    this.captured.extend_from_slice(data);
                }
            }
            Poll::Ready(None) => this.emit(),
            _ => {}
        }
        polled
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl Drop for CapturedBody {
    fn drop(&mut self) {
        self.emit();
    }
}

impl std::fmt::Debug for CapturedBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedBody")
            .field("action", &self.action)
            .field("captured_len", &self.captured.len())
            .field("logged", &self.logged)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use http_body_util::BodyExt;
    use std::convert::Infallible;
    use tracing::instrument::WithSubscriber;
    use uhttp_common::capture::EventCapture;

    #[tokio::test]
    async fn test_forwards_and_captures_frames() {
        let capture = EventCapture::new();
        let chunks = vec![
            Ok::<_, Infallible>(Bytes::from_static(b"{\"a\":")),
            Ok(Bytes::from_static(b"[1,")),
            Ok(Bytes::from_static(b"2]}")),
        ];
        let body = CapturedBody::new(Body::from_stream(stream::iter(chunks)), "/multi");

        let forwarded = async move { body.collect().await.unwrap().to_bytes() }
            .with_subscriber(capture.subscriber())
            .await;

        assert_eq!(&forwarded[..], b"{\"a\":[1,2]}");
        let logged = capture.with_message(RESPONSE_BODY_MESSAGE);
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].field("body"), Some("{\"a\":[1,2]}"));
        assert_eq!(logged[0].field("action"), Some("/multi"));
    }

    #[test]
    fn test_drop_without_polling_logs_once() {
        let capture = EventCapture::new();
        tracing::subscriber::with_default(capture.subscriber(), || {
            let body = CapturedBody::new(Body::from("unsent"), "/gone");
            drop(body);
        });

        let logged = capture.with_message(RESPONSE_BODY_MESSAGE);
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].field("body"), Some(""));
    }
}
