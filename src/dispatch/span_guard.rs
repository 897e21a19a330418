/*!
 * Span Guards
 * RAII scopes emitting the end event of a span on drop
 */

use super::global;
use crate::events::{SpanLocation, SpanMetadata};
use crate::strings::StaticStringRef;
use std::marker::PhantomData;

/// Span with a static name, ended when dropped
///
/// Not `Send`: begin and end must land in the same thread stream.
#[must_use = "the span ends as soon as the guard is dropped"]
pub struct SpanGuard {
    desc: &'static SpanMetadata,
    _not_send: PhantomData<*const ()>,
}

impl SpanGuard {
    pub fn enter(desc: &'static SpanMetadata) -> Self {
        global::begin_scope(desc);
        Self {
            desc,
            _not_send: PhantomData,
        }
    }
}

impl Drop for SpanGuard {
    fn drop(&mut self) {
        global::end_scope(self.desc);
    }
}

/// Span named at runtime, ended when dropped
#[must_use = "the span ends as soon as the guard is dropped"]
pub struct NamedSpanGuard {
    location: &'static SpanLocation,
    name: StaticStringRef,
    _not_send: PhantomData<*const ()>,
}

impl NamedSpanGuard {
    pub fn enter(location: &'static SpanLocation, name: impl Into<StaticStringRef>) -> Self {
        let name = name.into();
        global::begin_named_span(location, name);
        Self {
            location,
            name,
            _not_send: PhantomData,
        }
    }
}

impl Drop for NamedSpanGuard {
    fn drop(&mut self) {
        global::end_named_span(self.location, self.name);
    }
}
