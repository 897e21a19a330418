/*!
 * Telemetry Demo - Main Entry Point
 *
 * Emits logs, metrics and spans from a few worker threads through the
 * global dispatcher. Set TELEMETRY_SINK_URL to upload them; without it the
 * blocks are captured and discarded.
 */

use anyhow::Context;
use std::time::{Duration, Instant};
use telemetry_capture::core::{Level, Verbosity};
use telemetry_capture::dispatch::global;
use telemetry_capture::{init_telemetry, init_tracing, LogBridge, StaticStringRef, TelemetryConfig};

const WORKERS: usize = 4;
const ITERATIONS: u64 = 200;

fn main() -> anyhow::Result<()> {
    init_tracing(true);
    LogBridge::install(log::LevelFilter::Info).context("installing the log bridge")?;

    let config = TelemetryConfig::from_env();
    let guard = init_telemetry(config).context("initializing telemetry")?;
    tracing::info!(installed = guard.is_installed(), "telemetry demo starting");

    global::set_context("demo", "telemetry-demo");
    telemetry_capture::info!("demo started with {} workers", WORKERS);
    telemetry_capture::log_static!(Level::Debug, "static message, no formatting");

    let started = Instant::now();
    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| {
            std::thread::Builder::new()
                .name(format!("demo-worker-{}", worker))
                .spawn(move || run_worker(worker))
                .context("spawning a demo worker")
        })
        .collect::<anyhow::Result<_>>()?;
    for handle in handles {
        if handle.join().is_err() {
            anyhow::bail!("a demo worker panicked");
        }
    }

    telemetry_capture::fmetric!("demo_duration", "seconds", started.elapsed().as_secs_f64());
    log::info!("workers finished in {:?}", started.elapsed());
    telemetry_capture::warn!("demo finishing");

    drop(guard);
    tracing::info!("telemetry demo done");
    Ok(())
}

fn run_worker(worker: usize) {
    let _span = telemetry_capture::span_scope!("run_worker");
    let properties = global::property_set(&[("worker", worker.to_string())]);
    for i in 0..ITERATIONS {
        let _step = telemetry_capture::span_named!(StaticStringRef::intern(&format!("step_{}", i % 4)));
        telemetry_capture::imetric!("iteration", "count", i);
        telemetry_capture::imetric!(lod: Verbosity::Max, "worker_load", "percent", (i * 7 + worker as u64) % 100);
        if let Some(properties) = properties {
            if i % 50 == 0 {
                telemetry_capture::debug!(properties: properties, "worker {} reached {}", worker, i);
            }
        }
        std::thread::sleep(Duration::from_micros(200));
    }
    global::flush_current_thread_stream();
}
