//! HTTP plumbing for remote providers
//!
//! One `reqwest::Client` per provider instance, configured with the connect
//! and request timeouts from configuration. Every request is sent exactly
//! once; failures are mapped onto [`LlmError`] and never retried.

use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::LlmError;
use docflow_utils::logging::duration_millis;
use docflow_utils::redaction::{redact_error_message, truncate_chars};

/// Connect timeout, capped by the request timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound on how much of an error body is kept in the error message
pub(crate) const MAX_ERROR_BODY_CHARS: usize = 512;

/// How a request carries its credential.
#[derive(Debug, Clone, Copy)]
pub(crate) enum RequestAuth<'a> {
    /// `Authorization: Bearer <key>`
    Bearer(&'a str),
    /// The key in a provider-specific header
    Header { name: &'static str, key: &'a str },
}

#[derive(Clone)]
pub(crate) struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Build a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the client cannot be constructed
    pub fn new(timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| LlmError::Misconfiguration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST `body` as JSON with the given credential and return the raw
    /// response text of a 2xx answer.
    ///
    /// # Errors
    ///
    /// - `LlmError::Timeout` when the client-side timeout fires
    /// - `LlmError::Transport` for connection-level failures
    /// - `LlmError::HttpStatus` for any non-2xx status
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        auth: RequestAuth<'_>,
        body: &B,
        provider_name: &str,
    ) -> Result<String, LlmError> {
        debug!(
            provider = provider_name,
            timeout_ms = duration_millis(self.timeout()),
            "Sending HTTP request"
        );

        let request = self.client.post(url).json(body);
        let request = match auth {
            RequestAuth::Bearer(key) => request.bearer_auth(key),
            RequestAuth::Header { name, key } => request.header(name, key),
        };

        let response = request
            .send()
            .await
            .map_err(|e| self.map_transport_error(&e, provider_name))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(&e, provider_name))?;

        if !status.is_success() {
            return Err(LlmError::HttpStatus {
                provider: provider_name.to_string(),
                status: status.as_u16(),
                message: error_body_excerpt(&text),
            });
        }

        Ok(text)
    }

    fn map_transport_error(&self, error: &reqwest::Error, provider_name: &str) -> LlmError {
        if error.is_timeout() {
            return LlmError::Timeout {
                duration: self.timeout(),
            };
        }
        LlmError::Transport(format!(
            "{provider_name} request failed: {}",
            redact_error_message(&error.to_string())
        ))
    }
}

/// Redacted, length-bounded excerpt of an upstream error body.
pub(crate) fn error_body_excerpt(body: &str) -> String {
    let redacted = redact_error_message(body.trim());
    truncate_chars(&redacted, MAX_ERROR_BODY_CHARS).to_string()
}
