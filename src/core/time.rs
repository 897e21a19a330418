/*!
 * Time Sources
 * Tick counter for event timestamps paired with wall-clock time for display
 */

use std::sync::OnceLock;
use std::time::Instant;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Ticks per second of `now_ticks` (nanosecond resolution)
pub const TICKS_FREQUENCY: i64 = 1_000_000_000;

fn tick_origin() -> &'static Instant {
    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    ORIGIN.get_or_init(Instant::now)
}

/// Monotonic tick counter, offset from the first time it is read in this process
#[inline]
pub fn now_ticks() -> i64 {
    tick_origin().elapsed().as_nanos() as i64
}

/// Frequency of the tick counter, reported in the process registration
#[inline]
pub fn tick_frequency() -> i64 {
    TICKS_FREQUENCY
}

/// A tick value and the wall-clock time sampled together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DualTime {
    pub ticks: i64,
    pub time: OffsetDateTime,
}

impl DualTime {
    pub fn now() -> Self {
        Self {
            ticks: now_ticks(),
            time: OffsetDateTime::now_utc(),
        }
    }

    /// ISO-8601 rendering of the wall-clock part
    pub fn format_iso8601(&self) -> String {
        // Rfc3339 only fails on years outside 0..=9999
        self.time
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.time.unix_timestamp().to_string())
    }
}
