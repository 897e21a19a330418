/*!
 * Span Events
 * Begin/end records stored in thread stream blocks
 */

use super::metadata::{SpanLocation, SpanMetadata};
use crate::queue::HeterogeneousQueue;
use crate::strings::StaticStringRef;

#[derive(Debug, Clone)]
pub struct BeginThreadSpanEvent {
    pub desc: &'static SpanMetadata,
    pub time: i64,
}

crate::wire_record!(BeginThreadSpanEvent {
    desc: &'static SpanMetadata => "thread_span_desc",
    time: i64 => "time",
});

#[derive(Debug, Clone)]
pub struct EndThreadSpanEvent {
    pub desc: &'static SpanMetadata,
    pub time: i64,
}

crate::wire_record!(EndThreadSpanEvent {
    desc: &'static SpanMetadata => "thread_span_desc",
    time: i64 => "time",
});

#[derive(Debug, Clone)]
pub struct BeginThreadNamedSpanEvent {
    pub location: &'static SpanLocation,
    pub name: StaticStringRef,
    pub time: i64,
}

crate::wire_record!(BeginThreadNamedSpanEvent {
    location: &'static SpanLocation => "thread_span_location",
    name: StaticStringRef => "name",
    time: i64 => "time",
});

#[derive(Debug, Clone)]
pub struct EndThreadNamedSpanEvent {
    pub location: &'static SpanLocation,
    pub name: StaticStringRef,
    pub time: i64,
}

crate::wire_record!(EndThreadNamedSpanEvent {
    location: &'static SpanLocation => "thread_span_location",
    name: StaticStringRef => "name",
    time: i64 => "time",
});

crate::declare_queue! {
    /// Records of a thread block
    pub enum ThreadEvent {
        BeginScope(BeginThreadSpanEvent),
        EndScope(EndThreadSpanEvent),
        BeginNamed(BeginThreadNamedSpanEvent),
        EndNamed(EndThreadNamedSpanEvent),
    }
}

pub type ThreadQueue = HeterogeneousQueue<ThreadEvent>;

impl ThreadEvent {
    pub fn time(&self) -> i64 {
        match self {
            ThreadEvent::BeginScope(evt) => evt.time,
            ThreadEvent::EndScope(evt) => evt.time,
            ThreadEvent::BeginNamed(evt) => evt.time,
            ThreadEvent::EndNamed(evt) => evt.time,
        }
    }

    pub fn is_begin(&self) -> bool {
        matches!(self, ThreadEvent::BeginScope(_) | ThreadEvent::BeginNamed(_))
    }

    /// Span name, from the descriptor or the event
    pub fn name(&self) -> &'static str {
        match self {
            ThreadEvent::BeginScope(evt) => evt.desc.name,
            ThreadEvent::EndScope(evt) => evt.desc.name,
            ThreadEvent::BeginNamed(evt) => evt.name.as_str(),
            ThreadEvent::EndNamed(evt) => evt.name.as_str(),
        }
    }
}
