/*!
 * Authentication
 * Credentials attached to outgoing ingestion requests
 */

use crate::core::{TelemetryError, TelemetryResult};
use reqwest::blocking::Request;
use reqwest::header::{HeaderValue, AUTHORIZATION};

/// Signs requests before they are sent
///
/// The HTTP sink holds queued work until `is_ready` returns true, then calls
/// `sign` on every request. A signing failure drops that request.
pub trait Authenticator: Send + Sync {
    fn is_ready(&self) -> bool;
    fn sign(&self, request: &mut Request) -> TelemetryResult<()>;
}

/// Sends requests unsigned
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAuth;

impl Authenticator for NoAuth {
    fn is_ready(&self) -> bool {
        true
    }

    fn sign(&self, _request: &mut Request) -> TelemetryResult<()> {
        Ok(())
    }
}

/// Static bearer token
pub struct ApiKeyAuthenticator {
    header: HeaderValue,
}

impl ApiKeyAuthenticator {
    pub fn new(api_key: &str) -> TelemetryResult<Self> {
        let mut header = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| TelemetryError::Signing(format!("invalid api key: {}", e)))?;
        header.set_sensitive(true);
        Ok(Self { header })
    }
}

impl std::fmt::Debug for ApiKeyAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuthenticator").finish_non_exhaustive()
    }
}

impl Authenticator for ApiKeyAuthenticator {
    fn is_ready(&self) -> bool {
        true
    }

    fn sign(&self, request: &mut Request) -> TelemetryResult<()> {
        request
            .headers_mut()
            .insert(AUTHORIZATION, self.header.clone());
        Ok(())
    }
}
