/*!
 * Tracing Layer
 * Forwards `tracing` events as interop log entries
 */

use super::{is_own_target, Destination};
use crate::core::Level;
use crate::dispatch::Dispatch;
use crate::strings::StaticStringRef;
use std::fmt::Write;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// `tracing_subscriber` layer feeding the log stream
///
/// The message field becomes the entry's text; other fields are appended as
/// `name=value`.
#[derive(Debug, Clone, Default)]
pub struct TelemetryLayer {
    destination: Destination,
}

impl TelemetryLayer {
    /// Forward to the global dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward to a specific dispatcher
    pub fn with_dispatch(dispatch: Dispatch) -> Self {
        Self {
            destination: Destination::Fixed(dispatch),
        }
    }
}

impl<S> Layer<S> for TelemetryLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        if is_own_target(target) {
            return;
        }
        let level = Level::from(*metadata.level());
        if !self.destination.enabled(level) {
            return;
        }
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.destination
            .log(level, StaticStringRef::from_static(target), visitor.finish().into());
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }

    fn push_field(&mut self, field: &Field, value: std::fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", field.name(), value);
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.push_field(field, format_args!("{}", value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            self.push_field(field, format_args!("{:?}", value));
        }
    }
}
