/*!
 * Limits and Constants
 *
 * Centralized location for buffer sizes, paddings, timeouts and retry counts.
 * Performance-critical constants are marked with [PERF].
 */

use std::time::Duration;

// =============================================================================
// STREAM BUFFERS
// =============================================================================

/// Default log block capacity (10MB)
pub const DEFAULT_LOG_BUFFER_SIZE: usize = 10 * 1024 * 1024;

/// Default metric block capacity (10MB)
pub const DEFAULT_METRIC_BUFFER_SIZE: usize = 10 * 1024 * 1024;

/// Default thread (span) block capacity (10MB)
pub const DEFAULT_THREAD_BUFFER_SIZE: usize = 10 * 1024 * 1024;

/// Headroom kept free in a log block before it reports full
/// Bounds the overshoot of a single log entry with a short message
pub const LOG_BLOCK_PADDING: usize = 128;

/// Headroom kept free in a metric block before it reports full
pub const METRIC_BLOCK_PADDING: usize = 32;

/// Headroom kept free in a thread block before it reports full
pub const THREAD_BLOCK_PADDING: usize = 32;

/// Initial reservation for dependency queues (1MB)
/// [PERF] Dependencies are few compared to events, this rarely grows
pub const DEPENDENCY_QUEUE_RESERVE: usize = 1024 * 1024;

/// Upper bound on the up-front reservation of a block buffer (1MB)
/// [PERF] Capacity is a soft budget, the buffer still grows past this
pub const MAX_BLOCK_RESERVE: usize = 1024 * 1024;

// =============================================================================
// HTTP SINK
// =============================================================================

/// Timeout for process registration requests
pub const INSERT_PROCESS_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for stream registration requests
pub const INSERT_STREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for log and metric block uploads
pub const INSERT_BLOCK_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for thread block uploads
/// Span blocks are large and frequent, a slow endpoint must not pile them up
pub const INSERT_THREAD_BLOCK_TIMEOUT: Duration = Duration::from_secs(2);

/// Number of retries after a failed upload (total attempts = retries + 1)
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Longest time the sink worker sleeps without checking the flush monitor
pub const WORKER_WAKEUP_PERIOD: Duration = Duration::from_secs(60);

// =============================================================================
// FLUSH MONITOR
// =============================================================================

/// Default automatic flush period
pub const DEFAULT_FLUSH_PERIOD: Duration = Duration::from_secs(60);

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Environment variable carrying the parent process id to child processes
pub const PARENT_PROCESS_ENV: &str = "TELEMETRY_PARENT_PROCESS";
