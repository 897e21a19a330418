/*!
 * Thread Streams
 * One span stream per (dispatcher, thread), owned by the thread itself
 *
 * The owning thread is the only writer, so pushes take no lock. Other
 * threads reach a stream only through its handle, whose flag asks the owner
 * to rotate on its next push.
 */

use super::dispatcher::DispatchInner;
use crate::core::DualTime;
use crate::stream::{ThreadBlock, ThreadStream};
use parking_lot::Mutex;
use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

// ============================================================================
// Registry (shared)
// ============================================================================

/// Cross-thread view of a thread stream
#[derive(Debug)]
pub struct ThreadStreamHandle {
    stream_id: String,
    flush_requested: AtomicBool,
}

impl ThreadStreamHandle {
    pub fn new(stream_id: String) -> Self {
        Self {
            stream_id,
            flush_requested: AtomicBool::new(false),
        }
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    pub fn request_flush(&self) {
        self.flush_requested.store(true, Ordering::Release);
    }

    /// Consume a pending flush request
    pub fn take_flush_request(&self) -> bool {
        self.flush_requested.swap(false, Ordering::AcqRel)
    }
}

/// Handles of every live thread stream of one dispatcher
#[derive(Default)]
pub struct ThreadStreamRegistry {
    handles: Mutex<Vec<Arc<ThreadStreamHandle>>>,
}

impl ThreadStreamRegistry {
    pub fn register(&self, handle: Arc<ThreadStreamHandle>) {
        self.handles.lock().push(handle);
    }

    /// Ask every thread stream to rotate on its next push
    ///
    /// Also forgets streams whose thread has exited.
    pub fn mark_all_full(&self) {
        let mut handles = self.handles.lock();
        handles.retain(|handle| Arc::strong_count(handle) > 1);
        for handle in handles.iter() {
            handle.request_flush();
        }
    }

    /// Number of thread streams whose thread is still alive
    pub fn len(&self) -> usize {
        self.handles
            .lock()
            .iter()
            .filter(|handle| Arc::strong_count(handle) > 1)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stream_ids(&self) -> Vec<String> {
        self.handles
            .lock()
            .iter()
            .filter(|handle| Arc::strong_count(handle) > 1)
            .map(|handle| handle.stream_id.clone())
            .collect()
    }
}

// ============================================================================
// Thread-Local Storage
// ============================================================================

/// Thread stream as stored in the owning thread
pub(crate) struct LocalStream {
    dispatch_id: u64,
    owner: Weak<DispatchInner>,
    pub(crate) stream: ThreadStream,
    pub(crate) handle: Arc<ThreadStreamHandle>,
}

impl LocalStream {
    pub(crate) fn new(
        dispatch_id: u64,
        owner: Weak<DispatchInner>,
        stream: ThreadStream,
        handle: Arc<ThreadStreamHandle>,
    ) -> Self {
        Self {
            dispatch_id,
            owner,
            stream,
            handle,
        }
    }

    /// Rotate if full or if another thread asked for it
    pub(crate) fn rotate_if_needed(&mut self) -> Option<ThreadBlock> {
        if self.handle.take_flush_request() {
            self.stream.mark_full();
        }
        if self.stream.is_full() {
            self.stream.rotate(DualTime::now())
        } else {
            None
        }
    }
}

impl Drop for LocalStream {
    // Best effort: ships the pending block when the thread exits while its
    // dispatcher is still alive.
    fn drop(&mut self) {
        let Some(owner) = self.owner.upgrade() else {
            return;
        };
        if let Some(block) = self.stream.rotate(DualTime::now()) {
            owner.sink().on_process_thread_block(Arc::new(block));
        }
    }
}

thread_local! {
    static LOCAL_STREAMS: RefCell<Vec<LocalStream>> = const { RefCell::new(Vec::new()) };
    static INITIALIZING: Cell<bool> = const { Cell::new(false) };
}

/// Whether the calling thread already has a stream for this dispatcher
pub(crate) fn has_local_stream(dispatch_id: u64) -> bool {
    LOCAL_STREAMS
        .try_with(|cell| {
            cell.try_borrow()
                .map(|streams| streams.iter().any(|s| s.dispatch_id == dispatch_id))
                .unwrap_or(false)
        })
        .unwrap_or(false)
}

/// Run `f` on the calling thread's stream for this dispatcher, if any
///
/// Returns `None` when there is no stream, when called re-entrantly from
/// inside another `with_local_stream`, or during thread teardown.
pub(crate) fn with_local_stream<R>(dispatch_id: u64, f: impl FnOnce(&mut LocalStream) -> R) -> Option<R> {
    LOCAL_STREAMS
        .try_with(|cell| {
            let mut streams = cell.try_borrow_mut().ok()?;
            let local = streams.iter_mut().find(|s| s.dispatch_id == dispatch_id)?;
            Some(f(local))
        })
        .ok()
        .flatten()
}

/// Store a freshly created stream, dropping streams of dead dispatchers
pub(crate) fn install_local_stream(local: LocalStream) -> bool {
    LOCAL_STREAMS
        .try_with(move |cell| match cell.try_borrow_mut() {
            Ok(mut streams) => {
                streams.retain(|s| s.owner.strong_count() > 0);
                streams.push(local);
                true
            }
            Err(_) => false,
        })
        .unwrap_or(false)
}

/// Mark the calling thread as creating a stream
///
/// Returns false if it already is, which means stream creation re-entered
/// the emission path.
pub(crate) fn begin_initializing() -> bool {
    INITIALIZING
        .try_with(|flag| !flag.replace(true))
        .unwrap_or(false)
}

pub(crate) fn end_initializing() {
    let _ = INITIALIZING.try_with(|flag| flag.set(false));
}

/// Name and id of the calling thread, as thread stream properties
pub(crate) fn current_thread_properties() -> Vec<(String, String)> {
    let thread = std::thread::current();
    let id = format!("{:?}", thread.id());
    let id = id
        .trim_start_matches("ThreadId(")
        .trim_end_matches(')')
        .to_string();
    vec![
        ("thread-id".to_string(), id),
        (
            "thread-name".to_string(),
            thread.name().unwrap_or_default().to_string(),
        ),
    ]
}
