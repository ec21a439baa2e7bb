// In-memory capture of the client's own tracing output
//
// While the TUI owns the alternate screen, anything printed to stdout would
// garble the display, so a custom tracing layer diverts log events into a
// bounded ring buffer instead. The Logs view renders the buffer as the
// "client log" section alongside the backend feeds.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// Ring buffer capacity; older entries fall off the front.
const CAPACITY: usize = 500;

/// One captured tracing event.
#[derive(Debug, Clone)]
pub struct ClientLogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
}

impl ClientLogEntry {
    /// Single-line rendering for the Logs view.
    pub fn display(&self) -> String {
        format!(
            "[{}] {:5} {}",
            self.timestamp.format("%H:%M:%S"),
            self.level.as_str(),
            self.message
        )
    }
}

/// Shared, bounded buffer of captured log entries.
#[derive(Clone, Default)]
pub struct ClientLogBuffer {
    entries: Arc<Mutex<VecDeque<ClientLogEntry>>>,
}

impl ClientLogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, entry: ClientLogEntry) {
        let mut entries = self.entries.lock().unwrap();
        if entries.len() >= CAPACITY {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Snapshot of all entries, oldest first.
    pub fn snapshot(&self) -> Vec<ClientLogEntry> {
        self.entries.lock().unwrap().iter().cloned().collect()
    }
}

/// Tracing layer that fills a `ClientLogBuffer`.
pub struct CaptureLayer {
    buffer: ClientLogBuffer,
}

impl CaptureLayer {
    pub fn new(buffer: ClientLogBuffer) -> Self {
        Self { buffer }
    }
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut message = String::new();
        event.record(&mut MessageVisitor(&mut message));

        self.buffer.push(ClientLogEntry {
            timestamp: Utc::now(),
            level: *event.metadata().level(),
            message,
        });
    }
}

/// Pulls the `message` field out of a tracing event.
struct MessageVisitor<'a>(&'a mut String);

impl tracing::field::Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let rendered = format!("{:?}", value);
            // Debug-formatting a &str adds quotes; strip them back off
            *self.0 = rendered
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .unwrap_or(&rendered)
                .to_string();
        }
    }
}
