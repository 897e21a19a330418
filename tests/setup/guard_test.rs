/*!
 * Telemetry Guard Tests
 * Install on init, flush and uninstall on drop
 */

use serial_test::serial;
use telemetry_capture::dispatch::global;
use telemetry_capture::{init_telemetry, TelemetryConfig, TelemetryError};

#[test]
#[serial]
fn test_guard_installs_and_uninstalls() {
    let guard = init_telemetry(TelemetryConfig::default()).expect("init");
    assert!(guard.is_installed());
    assert!(global::is_initialized());
    assert!(!guard.sink().is_busy());

    let second = init_telemetry(TelemetryConfig::default()).expect("second init");
    assert!(!second.is_installed());
    drop(second);
    assert!(global::is_initialized());

    drop(guard);
    assert!(!global::is_initialized());
}

#[test]
#[serial]
fn test_invalid_api_key_is_rejected() {
    let config = TelemetryConfig {
        sink_url: Some("http://127.0.0.1:9/ingestion".to_string()),
        api_key: Some("line\nbreak".to_string()),
        ..TelemetryConfig::default()
    };
    let err = init_telemetry(config).unwrap_err();
    assert!(matches!(err, TelemetryError::Signing(_)));
    assert!(!global::is_initialized());
}

#[test]
#[serial]
fn test_invalid_sink_url_is_rejected() {
    let config = TelemetryConfig {
        sink_url: Some("::not a url::".to_string()),
        ..TelemetryConfig::default()
    };
    let err = init_telemetry(config).unwrap_err();
    assert!(matches!(err, TelemetryError::Configuration(_)));
}
