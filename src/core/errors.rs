/*!
 * Error Types
 * Centralized error handling with thiserror and miette diagnostics
 *
 * Only the shipping side (sinks, transport, configuration) produces errors.
 * The emission API swallows every failure: telemetry must stay invisible to
 * the host application.
 */

use miette::Diagnostic;
use thiserror::Error;

/// Common result type for telemetry operations
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors raised while encoding, compressing or uploading telemetry
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum TelemetryError {
    #[error("Failed to encode {context}: {message}")]
    #[diagnostic(
        code(telemetry::encoding_failed),
        help("The wire envelope could not be serialized. The block is dropped.")
    )]
    Encoding {
        context: &'static str,
        message: String,
    },

    #[error("Compression failed: {0}")]
    #[diagnostic(
        code(telemetry::compression_failed),
        help("The LZ4 frame encoder rejected the payload.")
    )]
    Compression(#[from] std::io::Error),

    #[error("HTTP transport error: {0}")]
    #[diagnostic(
        code(telemetry::transport),
        help("Check connectivity with the ingestion endpoint.")
    )]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response status {status} from {url}: {body}")]
    #[diagnostic(
        code(telemetry::unexpected_status),
        help("The ingestion service refused the request. See the response body.")
    )]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Failed to sign request: {0}")]
    #[diagnostic(
        code(telemetry::signing_failed),
        help("The authenticator could not attach credentials to the request.")
    )]
    Signing(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(telemetry::configuration),
        help("Review the TELEMETRY_* environment variables.")
    )]
    Configuration(String),

    #[error("Sink is shut down")]
    #[diagnostic(
        code(telemetry::sink_shut_down),
        help("The sink worker has exited; the request was discarded.")
    )]
    SinkShutDown,
}

impl TelemetryError {
    /// Build an encoding error from any displayable cause
    pub fn encoding(context: &'static str, cause: impl std::fmt::Display) -> Self {
        TelemetryError::Encoding {
            context,
            message: cause.to_string(),
        }
    }

    /// Whether a fresh attempt of the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TelemetryError::Transport(_) | TelemetryError::UnexpectedStatus { .. }
        )
    }
}
