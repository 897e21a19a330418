/*!
 * Flush Monitor
 * Periodic forced rotation of every stream
 */

use super::dispatcher::Dispatch;
use super::global;
use crate::core::limits::DEFAULT_FLUSH_PERIOD;
use parking_lot::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// Flushes the log and metric streams and marks every thread stream full
/// once per period
///
/// Thread streams are only marked: their owner rotates them on its next span,
/// since only the owner may touch them. The calling thread's stream is
/// flushed directly.
pub struct FlushMonitor {
    period: Duration,
    last_flush: Mutex<Instant>,
}

impl FlushMonitor {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_flush: Mutex::new(Instant::now()),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time left before the next flush is due
    pub fn time_to_flush(&self) -> Duration {
        let next = *self.last_flush.lock() + self.period;
        next.saturating_duration_since(Instant::now())
    }

    /// Flush the global dispatcher if due; returns the time until the next tick
    pub fn tick(&self) -> Duration {
        match global::current() {
            Some(dispatch) => self.tick_with(&dispatch),
            None => self.skip_if_due(),
        }
    }

    /// Start a new period without flushing if one is due
    ///
    /// Used when there is nothing to flush, so a due monitor does not stay due.
    pub fn skip_if_due(&self) -> Duration {
        let remaining = self.time_to_flush();
        if !remaining.is_zero() {
            return remaining;
        }
        *self.last_flush.lock() = Instant::now();
        self.period
    }

    /// Flush `dispatch` if due; returns the time until the next tick
    pub fn tick_with(&self, dispatch: &Dispatch) -> Duration {
        let remaining = self.time_to_flush();
        if !remaining.is_zero() {
            return remaining;
        }
        self.flush(dispatch);
        self.period
    }

    /// Flush now regardless of the period
    pub fn flush(&self, dispatch: &Dispatch) {
        debug!(dispatch_id = dispatch.id(), "periodic telemetry flush");
        dispatch.flush_log_stream();
        dispatch.flush_metric_stream();
        dispatch.mark_all_thread_streams_full();
        dispatch.flush_current_thread_stream();
        *self.last_flush.lock() = Instant::now();
    }
}

impl Default for FlushMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_FLUSH_PERIOD)
    }
}
