//! Tracing layer forwarding events over a channel.

use std::fmt;
use std::sync::mpsc::Sender;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// One captured tracing event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Event level.
    pub level: Level,
    /// Formatted `message` field.
    pub message: String,
}

/// Layer that sends every event it sees as a [`LogRecord`].
///
/// A dropped receiver is ignored; logging never fails the caller.
#[derive(Debug, Clone)]
pub struct CaptureLayer {
    tx: Sender<LogRecord>,
}

impl CaptureLayer {
    /// Create a layer sending into `tx`.
    pub fn new(tx: Sender<LogRecord>) -> Self {
        Self { tx }
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let _ = self.tx.send(LogRecord {
            level: *event.metadata().level(),
            message: visitor.message,
        });
    }
}

#[cfg(test)]
#[path = "capture_tests.rs"]
mod tests;
