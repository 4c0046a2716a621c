//! In-memory event capture for tests
//!
//! ```ignore
//! use tracing::instrument::WithSubscriber;
//! use uhttp_common::capture::EventCapture;
//!
//! let capture = EventCapture::new();
//! do_work().with_subscriber(capture.subscriber()).await;
//! assert_eq!(capture.with_message("resp_body").len(), 1);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// One recorded event
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub message: String,
    /// Every non-message field, rendered as text
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|v| v.as_str())
    }
}

/// Layer that stores every event it sees; clones share the same store
#[derive(Clone, Default)]
pub struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl EventCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with this layer attached, for `with_subscriber` / `with_default`
    pub fn subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
        tracing_subscriber::registry().with(self.clone())
    }

    /// Snapshot of all recorded events
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.lock().clone()
    }

    /// Recorded events whose message equals `message`
    pub fn with_message(&self, message: &str) -> Vec<CapturedEvent> {
        self.lock()
            .iter()
            .filter(|e| e.message == message)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CapturedEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<S: Subscriber> Layer<S> for EventCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        self.lock().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: BTreeMap<String, String>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.insert(field.name().to_string(), value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{:?}", value);
        if field.name() == "message" {
            self.message = rendered;
        } else {
            self.fields.insert(field.name().to_string(), rendered);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawJson;

    #[test]
    fn test_records_message_and_fields() {
        let capture = EventCapture::new();
        tracing::subscriber::with_default(capture.subscriber(), || {
            tracing::debug!(op = "get", latency_ms = 12u64, body = %RawJson(br#"{"a":1}"#), "resp_body");
        });

        let events = capture.with_message("resp_body");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::DEBUG);
        assert_eq!(events[0].field("op"), Some("get"));
        assert_eq!(events[0].field("latency_ms"), Some("12"));
        assert_eq!(events[0].field("body"), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_clear() {
        let capture = EventCapture::new();
        tracing::subscriber::with_default(capture.subscriber(), || {
            tracing::info!("one");
        });
        assert_eq!(capture.events().len(), 1);
        capture.clear();
        assert!(capture.events().is_empty());
    }
}
